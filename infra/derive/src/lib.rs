#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros for the task schema workspace.
//!
//! Every crate in the workspace declares its error enum through
//! [`macro@schema_error`], so errors share one shape: named fields, an optional
//! `context` annotation, and `?`-friendly conversions from upstream errors.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! taskschema-derive = { path = "../infra/derive" }
//! thiserror = "2"
//! ```

mod error;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for defining crate-level error enums.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already present.
/// * A `<ErrorName>Ext` trait adding `.context(...)` to `Result<T, ErrorName>` and to
///   `Result<T, SourceError>` for every variant holding a `source` field.
/// * `From<SourceError>` for every variant holding a `source` field.
/// * `From<&'static str>` and `From<String>` when an `Internal { message, context }`
///   variant exists.
/// * A private `format_context` helper for use in `#[error(...)]` strings.
///
/// # Requirements
///
/// 1. Applied to an **enum** with named-field variants only.
/// 2. Variants holding a `source` (by name, `#[source]` or `#[from]`) must also hold
///    `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[taskschema_derive::schema_error]
/// pub enum StoreError {
///     #[error("Serialization failure{}: {source}", format_context(.context))]
///     Serialize { source: serde_json::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal store fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn encode(value: &serde_json::Value) -> Result<String, StoreError> {
///     serde_json::to_string(value).context("Encoding schema document")
/// }
/// ```
#[proc_macro_attribute]
pub fn schema_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    error::expand(input).into()
}
