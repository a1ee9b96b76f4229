use crate::error::{EventError, EventErrorExt};
use crate::subscription::Subscription;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, mpsc};
use tracing::trace;

/// A safe default for raw listener buffers.
/// Registry changes are small and infrequent; 64 covers bursts during startup.
pub const DEFAULT_CAPACITY: usize = 64;
const MIN_CAPACITY: usize = 1;

/// Marker trait for types that can be sent through an [`Emitter`].
///
/// Any type that is `Send + Sync + 'static` automatically implements this trait.
pub trait Event: Send + Sync + 'static {}
impl<T: Send + Sync + 'static> Event for T {}

type HandlerQueues<E> = Arc<Mutex<Vec<mpsc::UnboundedSender<Arc<E>>>>>;

/// A typed, cloneable notification source.
///
/// Every clone shares the same listeners; listeners observe events in emission
/// order. Handler subscriptions each own an unbounded queue and never miss an
/// event. Raw [`Emitter::listen`] receivers share a bounded buffer of
/// [`Emitter::capacity`] events. Everything closes once the last clone is dropped.
pub struct Emitter<E> {
    sender: broadcast::Sender<Arc<E>>,
    handlers: HandlerQueues<E>,
    capacity: usize,
}

impl<E> Clone for Emitter<E> {
    fn clone(&self) -> Self {
        Self { sender: self.sender.clone(), handlers: Arc::clone(&self.handlers), capacity: self.capacity }
    }
}

impl<E> fmt::Debug for Emitter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("event", &std::any::type_name::<E>())
            .field("capacity", &self.capacity)
            .field("receivers", &self.sender.receiver_count())
            .field("handlers", &self.handlers.lock().len())
            .finish()
    }
}

impl<E: Event> Default for Emitter<E> {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(DEFAULT_CAPACITY);
        Self { sender, handlers: Arc::default(), capacity: DEFAULT_CAPACITY }
    }
}

impl<E: Event> Emitter<E> {
    /// Creates an emitter with [`DEFAULT_CAPACITY`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an emitter whose raw receivers buffer up to `capacity` events.
    ///
    /// Handler subscriptions are unaffected by the capacity.
    ///
    /// # Errors
    /// Returns [`EventError::InvalidCapacity`] if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self, EventError> {
        if capacity < MIN_CAPACITY {
            return Err(EventError::InvalidCapacity {
                message: format!("capacity must be >= {MIN_CAPACITY}").into(),
                context: Some(std::any::type_name::<E>().into()),
            });
        }
        let (sender, _) = broadcast::channel(capacity);
        Ok(Self { sender, handlers: Arc::default(), capacity })
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of live listeners (raw receivers and handler subscriptions).
    #[must_use]
    pub fn listener_count(&self) -> usize {
        let handlers = self.handlers.lock().iter().filter(|queue| !queue.is_closed()).count();
        self.sender.receiver_count() + handlers
    }

    /// Emits an event and returns how many listeners it was queued for.
    ///
    /// Emitting without listeners is not an error; the event is dropped.
    pub fn emit(&self, event: E) -> usize {
        self.emit_arc(Arc::new(event))
    }

    /// Emits a shared event instance without re-wrapping.
    ///
    /// Handler queues are fed under one lock, so concurrent emitters cannot
    /// interleave differently for different subscribers.
    pub fn emit_arc(&self, event: Arc<E>) -> usize {
        let mut delivered = {
            let mut handlers = self.handlers.lock();
            handlers.retain(|queue| queue.send(Arc::clone(&event)).is_ok());
            handlers.len()
        };
        delivered += self.sender.send(event).unwrap_or(0);

        if delivered == 0 {
            trace!(event = std::any::type_name::<E>(), "Event dropped: no active listeners");
        } else {
            trace!(event = std::any::type_name::<E>(), count = delivered, "Event dispatched");
        }
        delivered
    }

    /// Returns a raw receiver that observes every event emitted from now on.
    ///
    /// The receiver shares a buffer of [`Emitter::capacity`] events and skips
    /// ahead when it falls behind; see [`EventReceiverExt`](crate::EventReceiverExt).
    #[must_use]
    pub fn listen(&self) -> broadcast::Receiver<Arc<E>> {
        self.sender.subscribe()
    }

    /// Registers a handler invoked for every event emitted after this call returns.
    ///
    /// The handler runs on a task spawned on the current tokio runtime, so delivery
    /// is asynchronous with respect to [`Emitter::emit`]. Events are delivered one at
    /// a time in emission order, and none are skipped however far the handler falls
    /// behind.
    ///
    /// # Errors
    /// Returns [`EventError::NoRuntime`] when called outside a tokio runtime.
    ///
    /// # Examples
    /// ```rust
    /// use taskschema_events::Emitter;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> Result<(), taskschema_events::EventError> {
    /// let emitter = Emitter::<String>::new();
    /// let subscription = emitter.subscribe(|name| println!("changed: {name}"))?;
    /// emitter.emit("tasks.json".to_owned());
    /// subscription.cancel();
    /// # Ok(())
    /// # }
    /// ```
    pub fn subscribe<F>(&self, mut handler: F) -> Result<Subscription, EventError>
    where
        F: FnMut(Arc<E>) + Send + 'static,
    {
        let runtime = Handle::try_current().context("Subscribing requires a tokio runtime")?;
        let (queue, mut receiver) = mpsc::unbounded_channel();
        self.handlers.lock().push(queue);

        let task = runtime.spawn(async move {
            while let Some(event) = receiver.recv().await {
                handler(event);
            }
            trace!(event = std::any::type_name::<E>(), "Emitter closed; listener finished");
        });

        Ok(Subscription::new(task))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_capacity_is_rejected() {
        let err = Emitter::<u8>::with_capacity(0).unwrap_err();
        assert!(matches!(err, EventError::InvalidCapacity { .. }));
    }

    #[test]
    fn test_emit_without_listeners_is_dropped() {
        let emitter = Emitter::<u8>::new();
        assert_eq!(emitter.emit(1), 0);
        assert_eq!(emitter.listener_count(), 0);
    }

    #[test]
    fn test_subscribe_outside_runtime_fails() {
        let emitter = Emitter::<u8>::new();
        let err = emitter.subscribe(|_| {}).unwrap_err();
        assert!(matches!(err, EventError::NoRuntime { .. }));
    }

    #[test]
    fn test_clones_share_the_channel() {
        let emitter = Emitter::<u8>::with_capacity(4).unwrap();
        let clone = emitter.clone();
        let _rx = emitter.listen();

        assert_eq!(clone.listener_count(), 1);
        assert_eq!(clone.emit(7), 1);
        assert_eq!(clone.capacity(), 4);
    }

    #[tokio::test]
    async fn test_handler_queue_ignores_capacity() {
        let emitter = Emitter::<usize>::with_capacity(1).unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _subscription = emitter.subscribe(move |event: Arc<usize>| {
            let _ = tx.send(*event);
        })
        .unwrap();
        assert_eq!(emitter.listener_count(), 1);

        for i in 0..10 {
            assert_eq!(emitter.emit(i), 1);
        }
        for i in 0..10 {
            assert_eq!(rx.recv().await, Some(i));
        }
    }

    #[tokio::test]
    async fn test_cancelled_handler_is_pruned_on_emit() {
        let emitter = Emitter::<u8>::new();
        let subscription = emitter.subscribe(|_| {}).unwrap();
        subscription.cancel();
        tokio::time::timeout(std::time::Duration::from_secs(1), async {
            while emitter.listener_count() > 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();

        assert_eq!(emitter.emit(1), 0);
        assert_eq!(emitter.listener_count(), 0);
    }
}
