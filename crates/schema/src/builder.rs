use crate::error::SchemaError;
use crate::service::{PublishTarget, SchemaSources, TaskSchemaService};
use private::Sealed;
use taskschema_domain::config::SchemaSettings;

#[derive(Debug, Default)]
pub struct NoSources;
#[derive(Debug)]
pub struct WithSources(SchemaSources);
#[derive(Debug, Default)]
pub struct NoTarget;
#[derive(Debug)]
pub struct WithTarget(PublishTarget);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoSources {}
impl Sealed for WithSources {}
impl Sealed for NoTarget {}
impl Sealed for WithTarget {}

/// Wires a [`TaskSchemaService`] to its collaborators.
///
/// Sources and a publish target are required before [`ServiceBuilder::build`]
/// becomes available; settings default to [`SchemaSettings::default`].
#[allow(private_bounds)]
#[derive(Debug, Default)]
pub struct ServiceBuilder<S: Sealed = NoSources, T: Sealed = NoTarget> {
    sources: S,
    target: T,
    settings: SchemaSettings,
}

#[allow(private_bounds)]
impl<S: Sealed, T: Sealed> ServiceBuilder<S, T> {
    /// Overrides the schema id and file patterns.
    #[must_use = "The builder must be finished with build()"]
    pub fn settings(mut self, settings: SchemaSettings) -> Self {
        self.settings = settings;
        self
    }
}

#[allow(private_bounds)]
impl<T: Sealed> ServiceBuilder<NoSources, T> {
    #[must_use = "The builder must be finished with build()"]
    pub fn sources(self, sources: SchemaSources) -> ServiceBuilder<WithSources, T> {
        ServiceBuilder { sources: WithSources(sources), target: self.target, settings: self.settings }
    }
}

#[allow(private_bounds)]
impl<S: Sealed> ServiceBuilder<S, NoTarget> {
    #[must_use = "The builder must be finished with build()"]
    pub fn target(self, target: PublishTarget) -> ServiceBuilder<S, WithTarget> {
        ServiceBuilder { sources: self.sources, target: WithTarget(target), settings: self.settings }
    }
}

impl ServiceBuilder<WithSources, WithTarget> {
    /// Validates the settings and creates an idle service. Nothing is published
    /// until [`TaskSchemaService::start`] runs.
    ///
    /// # Errors
    /// Returns [`SchemaError::InvalidSettings`] for an empty schema id or an empty
    /// file pattern list.
    pub fn build(self) -> Result<TaskSchemaService, SchemaError> {
        validate(&self.settings)?;
        Ok(TaskSchemaService::new(self.settings, self.sources.0, self.target.0))
    }
}

fn validate(settings: &SchemaSettings) -> Result<(), SchemaError> {
    if settings.id.trim().is_empty() {
        return Err(SchemaError::InvalidSettings { message: "schema id cannot be empty".into(), context: None });
    }
    if settings.file_match.iter().all(|pattern| pattern.trim().is_empty()) {
        return Err(SchemaError::InvalidSettings {
            message: "at least one file pattern is required".into(),
            context: Some(settings.id.clone().into()),
        });
    }
    Ok(())
}
