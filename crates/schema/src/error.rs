use crate::source::SourceError;
use crate::store::StoreError;
use std::borrow::Cow;
use taskschema_events::EventError;

/// Errors surfaced by the schema service.
#[taskschema_derive::schema_error]
pub enum SchemaError {
    /// The remote task type query failed; the previous task type set is kept.
    #[error("Remote task types unavailable{}: {source}", format_context(.context))]
    RemoteTypes { source: SourceError, context: Option<Cow<'static, str>> },

    /// The resource store or association index rejected the publication.
    #[error("Publication failed{}: {source}", format_context(.context))]
    Store { source: StoreError, context: Option<Cow<'static, str>> },

    #[error("Serialization failure{}: {source}", format_context(.context))]
    Serialize { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// A registry listener could not be installed.
    #[error("Subscription failed{}: {source}", format_context(.context))]
    Subscription { source: EventError, context: Option<Cow<'static, str>> },

    /// The built-in template lacks a slot the assembly writes into.
    #[error("Template error{}: {message}", format_context(.context))]
    Template { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid settings{}: {message}", format_context(.context))]
    InvalidSettings { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
