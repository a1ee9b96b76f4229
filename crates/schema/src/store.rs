//! Where the schema is published: a keyed resource store plus an index mapping
//! file name patterns to schema URLs.

use fxhash::FxHashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::debug;

/// Failures of the resource store or association index.
#[taskschema_derive::schema_error]
pub enum StoreError {
    /// No resource is registered under the id; the caller may add it instead.
    #[error("Resource not found{}: {id}", format_context(.context))]
    NotFound { id: String, context: Option<Cow<'static, str>> },

    #[error("Resource already exists{}: {id}", format_context(.context))]
    AlreadyExists { id: String, context: Option<Cow<'static, str>> },

    #[error("Store unavailable{}: {message}", format_context(.context))]
    Unavailable { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// A keyed store of published documents.
pub trait ResourceStore: Debug + Send + Sync {
    /// Replaces the content of an existing resource.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] if `id` was never added.
    fn update(&self, id: &str, content: Arc<str>) -> Result<(), StoreError>;

    /// Registers a new resource.
    ///
    /// # Errors
    /// Returns [`StoreError::AlreadyExists`] if `id` is already present.
    fn add(&self, id: &str, content: Arc<str>) -> Result<(), StoreError>;
}

/// Associates file name patterns with schema URLs.
pub trait SchemaAssociations: Debug + Send + Sync {
    /// # Errors
    /// Returns [`StoreError`] when the association cannot be recorded.
    fn register_schema(&self, association: SchemaAssociation) -> Result<(), StoreError>;
}

/// Declares that files matching `file_match` are validated by the schema at `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaAssociation {
    pub file_match: Vec<String>,
    pub url: String,
}

/// In-process [`ResourceStore`]; every resource is a watch channel so readers
/// can follow its content.
#[derive(Debug, Clone, Default)]
pub struct MemoryResourceStore {
    inner: Arc<StoreInner>,
}

#[derive(Debug, Default)]
struct StoreInner {
    resources: RwLock<FxHashMap<String, watch::Sender<Arc<str>>>>,
    adds: AtomicU64,
    updates: AtomicU64,
}

impl MemoryResourceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current content of `id`, if it was ever added.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<str>> {
        self.inner.resources.read().get(id).map(|tx| tx.borrow().clone())
    }

    /// Follows the content of `id`. The receiver starts at the current value.
    #[must_use]
    pub fn watch(&self, id: &str) -> Option<watch::Receiver<Arc<str>>> {
        self.inner.resources.read().get(id).map(watch::Sender::subscribe)
    }

    /// Number of successful `add` calls.
    #[must_use]
    pub fn adds(&self) -> u64 {
        self.inner.adds.load(Ordering::Acquire)
    }

    /// Number of successful `update` calls.
    #[must_use]
    pub fn updates(&self) -> u64 {
        self.inner.updates.load(Ordering::Acquire)
    }
}

impl ResourceStore for MemoryResourceStore {
    fn update(&self, id: &str, content: Arc<str>) -> Result<(), StoreError> {
        let resources = self.inner.resources.read();
        let Some(tx) = resources.get(id) else {
            return Err(StoreError::NotFound { id: id.to_owned(), context: None });
        };
        tx.send_replace(content);
        self.inner.updates.fetch_add(1, Ordering::AcqRel);
        debug!(id, "Resource updated");
        Ok(())
    }

    fn add(&self, id: &str, content: Arc<str>) -> Result<(), StoreError> {
        let mut resources = self.inner.resources.write();
        if resources.contains_key(id) {
            return Err(StoreError::AlreadyExists { id: id.to_owned(), context: None });
        }
        let (tx, _) = watch::channel(content);
        resources.insert(id.to_owned(), tx);
        self.inner.adds.fetch_add(1, Ordering::AcqRel);
        debug!(id, "Resource added");
        Ok(())
    }
}

/// In-process [`SchemaAssociations`].
#[derive(Debug, Clone, Default)]
pub struct MemoryAssociationIndex {
    entries: Arc<RwLock<Vec<SchemaAssociation>>>,
}

impl MemoryAssociationIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every association in registration order.
    #[must_use]
    pub fn associations(&self) -> Vec<SchemaAssociation> {
        self.entries.read().clone()
    }

    /// URL of the first schema whose patterns match `file_name`.
    ///
    /// A pattern matches by equality, or by prefix when it ends in `*`.
    #[must_use]
    pub fn lookup(&self, file_name: &str) -> Option<String> {
        self.entries
            .read()
            .iter()
            .find(|entry| entry.file_match.iter().any(|pattern| matches_pattern(pattern, file_name)))
            .map(|entry| entry.url.clone())
    }
}

impl SchemaAssociations for MemoryAssociationIndex {
    fn register_schema(&self, association: SchemaAssociation) -> Result<(), StoreError> {
        debug!(url = %association.url, file_match = ?association.file_match, "Schema associated");
        self.entries.write().push(association);
        Ok(())
    }
}

fn matches_pattern(pattern: &str, file_name: &str) -> bool {
    pattern.strip_suffix('*').map_or(pattern == file_name, |prefix| file_name.starts_with(prefix))
}
