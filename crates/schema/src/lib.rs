//! # Task Schema Core
//!
//! Publishes a JSON schema for `tasks.json` files whose `type` and
//! `problemMatcher` fields enumerate whatever the registries currently hold.
//!
//! The schema is a fixed template with two dynamic slots:
//!
//! * **task types**: `shell` and `process`, plus every locally registered task
//!   definition, plus the names a remote source reports;
//! * **problem matchers**: every registered matcher name, prefixed with `$`.
//!
//! [`TaskSchemaService`] recomputes a slot whenever its registry reports a change and
//! republishes the whole document. The first publication adds the resource and
//! associates it with the configured file patterns; later ones only update it.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use taskschema_core::{
//!     MemoryAssociationIndex, MemoryResourceStore, ProblemMatcherRegistry, PublishTarget,
//!     SchemaSources, StaticRemoteTypes, TaskDefinitionRegistry, TaskSchemaService,
//! };
//! use taskschema_core::domain::registry::ProblemMatcherEntry;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), taskschema_core::SchemaError> {
//! let matchers = ProblemMatcherRegistry::new();
//! matchers.add(ProblemMatcherEntry::new("tsc"));
//!
//! let store = MemoryResourceStore::new();
//! let service = TaskSchemaService::builder()
//!     .sources(SchemaSources {
//!         problem_matchers: Arc::new(matchers),
//!         task_definitions: Arc::new(TaskDefinitionRegistry::new()),
//!         remote_task_types: Arc::new(StaticRemoteTypes::new(["npm"])),
//!     })
//!     .target(PublishTarget { store: Arc::new(store.clone()), associations: Arc::new(MemoryAssociationIndex::new()) })
//!     .build()?;
//!
//! let published = service.start().await?;
//! assert!(published.content.contains("\"$tsc\""));
//! assert_eq!(service.snapshot().task_types(), ["npm", "process", "shell"]);
//! # service.stop();
//! # Ok(())
//! # }
//! ```

mod assembly;
mod builder;
mod error;
mod names;
mod publisher;
pub mod registry;
mod service;
pub mod source;
pub mod store;
mod template;

pub use crate::assembly::{assemble, render};
pub use crate::builder::{NoSources, NoTarget, ServiceBuilder, WithSources, WithTarget};
pub use crate::error::{SchemaError, SchemaErrorExt};
pub use crate::names::{NameSets, normalize_matcher_name};
pub use crate::publisher::{PublishOutcome, PublishedSchema};
pub use crate::registry::{
    MemoryRegistry, ProblemMatcherRegistry, RegistryItem, StaticRemoteTypes, TaskDefinitionRegistry,
};
pub use crate::service::{PublishTarget, SchemaSources, TaskSchemaService};
pub use crate::source::{
    ChangeHandler, ProblemMatcherSource, RemoteTaskTypeSource, SourceError, TaskDefinitionSource,
};
pub use crate::store::{
    MemoryAssociationIndex, MemoryResourceStore, ResourceStore, SchemaAssociation, SchemaAssociations,
    StoreError,
};
pub use crate::template::{PROBLEM_MATCHER_POINTER, TASK_TYPE_POINTER, template};
pub use taskschema_domain as domain;
