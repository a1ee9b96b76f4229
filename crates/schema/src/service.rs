use crate::assembly::{assemble, render};
use crate::builder::ServiceBuilder;
use crate::error::{SchemaError, SchemaErrorExt};
use crate::names::NameSets;
use crate::publisher::{PublishedSchema, Publisher};
use crate::source::{ProblemMatcherSource, RemoteTaskTypeSource, TaskDefinitionSource};
use crate::store::{ResourceStore, SchemaAssociations};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::{Arc, Weak};
use taskschema_domain::config::SchemaSettings;
use taskschema_domain::registry::RegistryChange;
use taskschema_events::SubscriptionSet;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// The inputs the schema is aggregated from.
#[derive(Debug, Clone)]
pub struct SchemaSources {
    pub problem_matchers: Arc<dyn ProblemMatcherSource>,
    pub task_definitions: Arc<dyn TaskDefinitionSource>,
    pub remote_task_types: Arc<dyn RemoteTaskTypeSource>,
}

/// Where the schema is published.
#[derive(Debug, Clone)]
pub struct PublishTarget {
    pub store: Arc<dyn ResourceStore>,
    pub associations: Arc<dyn SchemaAssociations>,
}

/// Keeps a published tasks schema in sync with the registries it enumerates.
///
/// Every recomputation replaces one name set, assembles the document from both
/// sets and publishes it while holding a single state lock, so each publication
/// reflects one consistent snapshot. The task type path awaits the remote source
/// before taking the lock; concurrent task type refreshes are not coalesced and the
/// one that completes last determines the published content.
///
/// Cloning is cheap; clones share the same state and listeners.
#[derive(Debug, Clone)]
pub struct TaskSchemaService {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    settings: SchemaSettings,
    sources: SchemaSources,
    publisher: Publisher,
    state: Mutex<State>,
    published: watch::Sender<Option<PublishedSchema>>,
    listeners: SubscriptionSet,
}

#[derive(Debug, Default)]
struct State {
    names: NameSets,
    generation: u64,
}

impl TaskSchemaService {
    #[must_use = "The builder must be finished with build()"]
    pub fn builder() -> ServiceBuilder {
        ServiceBuilder::default()
    }

    pub(crate) fn new(settings: SchemaSettings, sources: SchemaSources, target: PublishTarget) -> Self {
        let publisher =
            Publisher::new(settings.id.clone(), settings.file_match.clone(), target.store, target.associations);
        let (published, _) = watch::channel(None);

        Self {
            inner: Arc::new(Inner {
                settings,
                sources,
                publisher,
                state: Mutex::new(State::default()),
                published,
                listeners: SubscriptionSet::new(),
            }),
        }
    }

    /// Computes both name sets, publishes once and starts listening for registry changes.
    ///
    /// Calling `start` again recomputes and republishes; listeners are only
    /// installed when none are active.
    ///
    /// # Errors
    /// * [`SchemaError::RemoteTypes`] if the remote task type query fails; nothing is
    ///   published and no listener is installed.
    /// * [`SchemaError::Store`] if the first publication is rejected.
    /// * [`SchemaError::Subscription`] if a listener cannot be installed (e.g. outside
    ///   a tokio runtime).
    #[instrument(skip(self), fields(schema_id = %self.inner.settings.id))]
    pub async fn start(&self) -> Result<PublishedSchema, SchemaError> {
        let remote = self.inner.remote_task_types().await?;
        let published = self.inner.commit("all", |names, sources| {
            let matchers = names.replace_problem_matchers(local_matcher_names(sources));
            let types = names.replace_task_types(local_task_types(sources).chain(remote));
            matchers || types
        })?;

        if self.inner.listeners.is_empty() {
            self.listen()?;
        }

        info!(generation = published.generation, outcome = ?published.outcome, "Task schema service started");
        Ok(published)
    }

    /// Recomputes the problem matcher names from the local registry and republishes.
    ///
    /// # Errors
    /// Returns [`SchemaError::Store`] if the publication is rejected.
    pub fn refresh_problem_matchers(&self) -> Result<PublishedSchema, SchemaError> {
        self.inner.refresh_problem_matchers()
    }

    /// Recomputes the task type names from the defaults, the local registry and the
    /// remote source, then republishes.
    ///
    /// # Errors
    /// Returns [`SchemaError::RemoteTypes`] if the remote query fails, in which case
    /// the task type set is unchanged and nothing is published, or
    /// [`SchemaError::Store`] if the publication is rejected.
    pub async fn refresh_task_types(&self) -> Result<PublishedSchema, SchemaError> {
        self.inner.refresh_task_types().await
    }

    /// Cancels every registry listener and returns how many were active.
    ///
    /// Task type refreshes already in flight still complete and publish.
    pub fn stop(&self) -> usize {
        let cancelled = self.inner.listeners.cancel_all();
        info!(schema_id = %self.inner.settings.id, cancelled, "Task schema listeners stopped");
        cancelled
    }

    #[must_use]
    pub fn is_listening(&self) -> bool {
        !self.inner.listeners.is_empty()
    }

    /// Both name sets as of the last successful publication.
    #[must_use]
    pub fn snapshot(&self) -> NameSets {
        self.inner.state.lock().names.clone()
    }

    /// The document assembled from the current name sets.
    ///
    /// # Errors
    /// Returns [`SchemaError::Template`] if the template lacks a splice point.
    pub fn schema(&self) -> Result<Value, SchemaError> {
        assemble(&self.snapshot())
    }

    /// Follows successful publications. Holds `None` until the first one.
    #[must_use]
    pub fn published(&self) -> watch::Receiver<Option<PublishedSchema>> {
        self.inner.published.subscribe()
    }

    #[must_use]
    pub fn settings(&self) -> &SchemaSettings {
        &self.inner.settings
    }

    fn listen(&self) -> Result<(), SchemaError> {
        let result = self.install_listeners();
        if result.is_err() {
            self.inner.listeners.cancel_all();
        }
        result
    }

    fn install_listeners(&self) -> Result<(), SchemaError> {
        let weak = Arc::downgrade(&self.inner);
        let subscription = self
            .inner
            .sources
            .problem_matchers
            .on_change(Box::new(move |change: Arc<RegistryChange>| {
                let Some(inner) = weak.upgrade() else { return };
                debug!(name = change.name(), "Problem matcher registry changed");
                if let Err(err) = inner.refresh_problem_matchers() {
                    warn!(error = %err, "Problem matcher refresh failed");
                }
            }))
            .context("Listening to problem matcher changes")?;
        self.inner.listeners.push(subscription);

        let weak = Arc::downgrade(&self.inner);
        let subscription = self
            .inner
            .sources
            .task_definitions
            .on_change(Box::new(move |change: Arc<RegistryChange>| {
                debug!(name = change.name(), "Task definition registry changed");
                spawn_task_type_refresh(&weak);
            }))
            .context("Listening to task definition changes")?;
        self.inner.listeners.push(subscription);

        debug!(count = self.inner.listeners.len(), "Registry listeners installed");
        Ok(())
    }
}

/// Each notification gets its own refresh; none is cancelled by a later one.
fn spawn_task_type_refresh(weak: &Weak<Inner>) {
    let Some(inner) = weak.upgrade() else { return };
    tokio::spawn(async move {
        if let Err(err) = inner.refresh_task_types().await {
            warn!(error = %err, "Task type refresh failed");
        }
    });
}

impl Inner {
    fn refresh_problem_matchers(&self) -> Result<PublishedSchema, SchemaError> {
        self.commit("problem_matchers", |names, sources| {
            names.replace_problem_matchers(local_matcher_names(sources))
        })
    }

    async fn refresh_task_types(&self) -> Result<PublishedSchema, SchemaError> {
        let remote = self.remote_task_types().await?;
        self.commit("task_types", |names, sources| names.replace_task_types(local_task_types(sources).chain(remote)))
    }

    async fn remote_task_types(&self) -> Result<Vec<String>, SchemaError> {
        let remote = self.sources.remote_task_types.task_types().await.context("Querying remote task types")?;
        debug!(count = remote.len(), "Remote task types received");
        Ok(remote)
    }

    /// Applies `update` to a copy of the name sets, then assembles and publishes
    /// under the state lock. The sets are only replaced once publication succeeds.
    fn commit<F>(&self, slot: &'static str, update: F) -> Result<PublishedSchema, SchemaError>
    where
        F: FnOnce(&mut NameSets, &SchemaSources) -> bool,
    {
        let mut state = self.state.lock();
        let mut names = state.names.clone();
        let changed = update(&mut names, &self.sources);

        let content = render(&assemble(&names)?)?;
        let outcome = self.publisher.publish(Arc::clone(&content))?;

        state.names = names;
        state.generation += 1;
        let published =
            PublishedSchema { id: self.publisher.id().to_owned(), content, outcome, generation: state.generation };
        self.published.send_replace(Some(published.clone()));

        debug!(
            slot,
            changed,
            generation = published.generation,
            outcome = ?published.outcome,
            task_types = state.names.task_types().len(),
            problem_matchers = state.names.problem_matchers().len(),
            "Task schema published"
        );
        Ok(published)
    }
}

fn local_matcher_names(sources: &SchemaSources) -> impl Iterator<Item = String> {
    sources.problem_matchers.problem_matchers().into_iter().map(|entry| entry.name)
}

fn local_task_types(sources: &SchemaSources) -> impl Iterator<Item = String> {
    sources.task_definitions.task_definitions().into_iter().map(|definition| definition.task_type)
}
