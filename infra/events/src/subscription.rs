use parking_lot::Mutex;
use tokio::task::JoinHandle;

/// Cancellation token for a handler registered with
/// [`Emitter::subscribe`](crate::Emitter::subscribe).
///
/// Delivery stops when the token is cancelled or dropped. A handler call that is
/// already running is allowed to finish.
#[must_use = "Dropping a subscription cancels it immediately"]
#[derive(Debug)]
pub struct Subscription {
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    pub(crate) const fn new(task: JoinHandle<()>) -> Self {
        Self { task: Some(task) }
    }

    /// Stops delivering notifications to the handler.
    pub fn cancel(mut self) {
        self.abort();
    }

    /// Returns `true` while the listener task is still delivering notifications.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.abort();
    }
}

/// Owns a group of subscriptions that are cancelled together.
#[derive(Debug, Default)]
pub struct SubscriptionSet {
    subscriptions: Mutex<Vec<Subscription>>,
}

impl SubscriptionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, subscription: Subscription) {
        self.subscriptions.lock().push(subscription);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.lock().is_empty()
    }

    /// Cancels every held subscription and returns how many were cancelled.
    pub fn cancel_all(&self) -> usize {
        let drained = std::mem::take(&mut *self.subscriptions.lock());
        let count = drained.len();
        drained.into_iter().for_each(Subscription::cancel);
        count
    }
}
