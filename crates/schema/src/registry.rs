//! In-process registries for problem matchers and task definitions, and a
//! settable remote task type source.
//!
//! Hosts that keep contributions elsewhere implement the traits in
//! [`crate::source`] directly; these types cover single-process setups and tests.

use crate::source::{
    ChangeHandler, ProblemMatcherSource, RemoteTaskTypeSource, SourceError, TaskDefinitionSource,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::fmt::Debug;
use std::sync::Arc;
use taskschema_domain::config::EventSettings;
use taskschema_domain::registry::{ProblemMatcherEntry, RegistryChange, TaskDefinitionEntry};
use taskschema_events::{Emitter, EventError, Subscription};
use tracing::debug;

/// An entry addressable by name inside a [`MemoryRegistry`].
pub trait RegistryItem: Debug + Clone + Send + Sync + 'static {
    fn key(&self) -> &str;
}

impl RegistryItem for ProblemMatcherEntry {
    fn key(&self) -> &str {
        &self.name
    }
}

impl RegistryItem for TaskDefinitionEntry {
    fn key(&self) -> &str {
        &self.task_type
    }
}

/// Insertion-ordered entries plus a change emitter.
///
/// Re-adding a name replaces its definition in place and still reports
/// [`RegistryChange::Added`]. Changes are emitted after the write lock is released.
#[derive(Debug)]
pub struct MemoryRegistry<T> {
    entries: Arc<RwLock<Vec<T>>>,
    changes: Emitter<RegistryChange>,
}

impl<T> Clone for MemoryRegistry<T> {
    fn clone(&self) -> Self {
        Self { entries: Arc::clone(&self.entries), changes: self.changes.clone() }
    }
}

impl<T: RegistryItem> Default for MemoryRegistry<T> {
    fn default() -> Self {
        Self { entries: Arc::default(), changes: Emitter::new() }
    }
}

impl<T: RegistryItem> MemoryRegistry<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// Returns [`EventError::InvalidCapacity`] if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self, EventError> {
        Ok(Self { entries: Arc::default(), changes: Emitter::with_capacity(capacity)? })
    }

    /// Builds a registry whose raw change receivers buffer `settings.capacity` events.
    ///
    /// # Errors
    /// Returns [`EventError::InvalidCapacity`] if the configured capacity is zero.
    pub fn from_settings(settings: &EventSettings) -> Result<Self, EventError> {
        Self::with_capacity(settings.capacity)
    }

    /// Adds or replaces `entry`.
    pub fn insert(&self, entry: T) {
        let name = entry.key().to_owned();
        {
            let mut entries = self.entries.write();
            match entries.iter_mut().find(|existing| existing.key() == name) {
                Some(existing) => *existing = entry,
                None => entries.push(entry),
            }
        }
        debug!(name, kind = std::any::type_name::<T>(), "Registry entry added");
        self.changes.emit(RegistryChange::Added(name));
    }

    /// Removes the entry named `name`. Returns `false` and emits nothing if absent.
    pub fn remove(&self, name: &str) -> bool {
        let removed = {
            let mut entries = self.entries.write();
            let before = entries.len();
            entries.retain(|entry| entry.key() != name);
            entries.len() != before
        };
        if removed {
            debug!(name, kind = std::any::type_name::<T>(), "Registry entry removed");
            self.changes.emit(RegistryChange::Removed(name.to_owned()));
        }
        removed
    }

    #[must_use]
    pub fn all(&self) -> Vec<T> {
        self.entries.read().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Raw change stream, for hosts that prefer polling a receiver.
    #[must_use]
    pub fn changes(&self) -> &Emitter<RegistryChange> {
        &self.changes
    }

    /// # Errors
    /// Returns [`EventError::NoRuntime`] outside a tokio runtime.
    pub fn subscribe<F>(&self, handler: F) -> Result<Subscription, EventError>
    where
        F: FnMut(Arc<RegistryChange>) + Send + 'static,
    {
        self.changes.subscribe(handler)
    }
}

pub type ProblemMatcherRegistry = MemoryRegistry<ProblemMatcherEntry>;
pub type TaskDefinitionRegistry = MemoryRegistry<TaskDefinitionEntry>;

impl ProblemMatcherRegistry {
    pub fn add(&self, entry: ProblemMatcherEntry) {
        self.insert(entry);
    }
}

impl TaskDefinitionRegistry {
    pub fn register(&self, entry: TaskDefinitionEntry) {
        self.insert(entry);
    }

    pub fn unregister(&self, task_type: &str) -> bool {
        self.remove(task_type)
    }
}

impl ProblemMatcherSource for ProblemMatcherRegistry {
    fn problem_matchers(&self) -> Vec<ProblemMatcherEntry> {
        self.all()
    }

    fn on_change(&self, handler: ChangeHandler) -> Result<Subscription, EventError> {
        self.subscribe(handler)
    }
}

impl TaskDefinitionSource for TaskDefinitionRegistry {
    fn task_definitions(&self) -> Vec<TaskDefinitionEntry> {
        self.all()
    }

    fn on_change(&self, handler: ChangeHandler) -> Result<Subscription, EventError> {
        self.subscribe(handler)
    }
}

/// A remote task type source answering from a settable list.
#[derive(Debug, Clone, Default)]
pub struct StaticRemoteTypes {
    types: Arc<RwLock<Vec<String>>>,
}

impl StaticRemoteTypes {
    pub fn new(types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let remote = Self::default();
        remote.set(types);
        remote
    }

    /// Replaces the answer of subsequent queries. Does not notify anyone.
    pub fn set(&self, types: impl IntoIterator<Item = impl Into<String>>) {
        *self.types.write() = types.into_iter().map(Into::into).collect();
    }
}

#[async_trait]
impl RemoteTaskTypeSource for StaticRemoteTypes {
    async fn task_types(&self) -> Result<Vec<String>, SourceError> {
        Ok(self.types.read().clone())
    }
}
