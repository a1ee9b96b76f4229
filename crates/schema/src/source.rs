//! Seams to the three inputs of the schema: the local problem matcher registry,
//! the local task definition registry and the remote task type query.

use async_trait::async_trait;
use std::borrow::Cow;
use std::fmt::Debug;
use std::sync::Arc;
use taskschema_domain::registry::{ProblemMatcherEntry, RegistryChange, TaskDefinitionEntry};
use taskschema_events::{EventError, Subscription};

/// Failures of a remote task type source.
#[taskschema_derive::schema_error]
pub enum SourceError {
    /// The remote side could not be reached or refused the query.
    #[error("Source unavailable{}: {message}", format_context(.context))]
    Unavailable { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal source error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Callback invoked for every change a registry reports.
pub type ChangeHandler = Box<dyn FnMut(Arc<RegistryChange>) + Send + 'static>;

/// The local problem matcher registry.
pub trait ProblemMatcherSource: Debug + Send + Sync {
    /// Current contents. Always a complete snapshot, never a delta.
    fn problem_matchers(&self) -> Vec<ProblemMatcherEntry>;

    /// Registers `handler` for every add or remove reported after this call returns.
    ///
    /// # Errors
    /// Returns [`EventError`] when the listener cannot be installed.
    fn on_change(&self, handler: ChangeHandler) -> Result<Subscription, EventError>;
}

/// The local task definition registry.
pub trait TaskDefinitionSource: Debug + Send + Sync {
    /// Current contents. Always a complete snapshot, never a delta.
    fn task_definitions(&self) -> Vec<TaskDefinitionEntry>;

    /// Registers `handler` for every register or unregister reported after this call returns.
    ///
    /// # Errors
    /// Returns [`EventError`] when the listener cannot be installed.
    fn on_change(&self, handler: ChangeHandler) -> Result<Subscription, EventError>;
}

/// A remote query for additional task types (e.g. task providers living in
/// another process).
#[async_trait]
pub trait RemoteTaskTypeSource: Debug + Send + Sync {
    /// # Errors
    /// Returns [`SourceError`] when the remote side cannot answer.
    async fn task_types(&self) -> Result<Vec<String>, SourceError>;
}
