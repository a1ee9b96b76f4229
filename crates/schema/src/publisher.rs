use crate::error::{SchemaError, SchemaErrorExt};
use crate::store::{ResourceStore, SchemaAssociation, SchemaAssociations, StoreError};
use std::sync::Arc;
use tracing::{debug, info};

/// How a document reached the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// First publication: the resource was added and associated with its files.
    Registered,
    /// An existing resource was overwritten in place.
    Updated,
}

/// The most recent successful publication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedSchema {
    pub id: String,
    pub content: Arc<str>,
    pub outcome: PublishOutcome,
    /// Counts successful publications, starting at 1.
    pub generation: u64,
}

/// Writes canonical schema text under a fixed id.
#[derive(Debug, Clone)]
pub(crate) struct Publisher {
    id: String,
    file_match: Vec<String>,
    store: Arc<dyn ResourceStore>,
    associations: Arc<dyn SchemaAssociations>,
}

impl Publisher {
    pub(crate) fn new(
        id: String,
        file_match: Vec<String>,
        store: Arc<dyn ResourceStore>,
        associations: Arc<dyn SchemaAssociations>,
    ) -> Self {
        Self { id, file_match, store, associations }
    }

    pub(crate) fn id(&self) -> &str {
        &self.id
    }

    /// Tries an in-place update; on `NotFound` adds the resource and registers the
    /// file association. Associations are never re-registered on updates.
    pub(crate) fn publish(&self, content: Arc<str>) -> Result<PublishOutcome, SchemaError> {
        match self.store.update(&self.id, Arc::clone(&content)) {
            Ok(()) => {
                debug!(id = %self.id, bytes = content.len(), "Schema updated");
                Ok(PublishOutcome::Updated)
            },
            Err(StoreError::NotFound { .. }) => {
                self.store.add(&self.id, content).context("Adding schema resource")?;
                self.associations
                    .register_schema(SchemaAssociation { file_match: self.file_match.clone(), url: self.id.clone() })
                    .context("Associating schema with files")?;
                info!(id = %self.id, file_match = ?self.file_match, "Schema registered");
                Ok(PublishOutcome::Registered)
            },
            Err(source) => Err(SchemaError::Store { source, context: Some("Updating schema resource".into()) }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryAssociationIndex, MemoryResourceStore};

    fn publisher() -> (Publisher, MemoryResourceStore, MemoryAssociationIndex) {
        let store = MemoryResourceStore::new();
        let index = MemoryAssociationIndex::new();
        let publisher =
            Publisher::new("tasks://t".into(), vec!["tasks.json".into()], Arc::new(store.clone()), Arc::new(index.clone()));
        (publisher, store, index)
    }

    #[test]
    fn test_first_publish_registers_then_updates() {
        let (publisher, store, index) = publisher();

        assert_eq!(publisher.publish("1".into()).unwrap(), PublishOutcome::Registered);
        assert_eq!(publisher.publish("2".into()).unwrap(), PublishOutcome::Updated);
        assert_eq!(publisher.publish("3".into()).unwrap(), PublishOutcome::Updated);

        assert_eq!(store.get("tasks://t").as_deref(), Some("3"));
        assert_eq!((store.adds(), store.updates()), (1, 2));
        assert_eq!(index.associations().len(), 1);
        assert_eq!(index.lookup("tasks.json").as_deref(), Some(publisher.id()));
    }

    #[test]
    fn test_existing_resource_is_not_reassociated() {
        let (publisher, store, index) = publisher();
        store.add("tasks://t", "0".into()).unwrap();

        assert_eq!(publisher.publish("1".into()).unwrap(), PublishOutcome::Updated);
        assert!(index.associations().is_empty());
    }
}
