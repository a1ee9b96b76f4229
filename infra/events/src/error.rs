use std::borrow::Cow;

/// Errors that can occur while wiring emitters and subscriptions.
#[taskschema_derive::schema_error]
pub enum EventError {
    /// Capacity must be greater than zero for broadcast buffers.
    #[error("Invalid capacity{}: {message}", format_context(.context))]
    InvalidCapacity { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A handler subscription was requested outside a tokio runtime.
    #[error("No async runtime{}: {source}", format_context(.context))]
    NoRuntime { source: tokio::runtime::TryCurrentError, context: Option<Cow<'static, str>> },
}
