//! # Events
//!
//! Typed change notifications for registries and other observable collaborators.
//!
//! ## Overview
//!
//! An [`Emitter<E>`] is owned by whatever produces notifications. Consumers either
//! register a handler with [`Emitter::subscribe`], which returns a [`Subscription`]
//! acting as a cancellation token, or take a raw `broadcast` receiver with
//! [`Emitter::listen`]. Delivery is always asynchronous: nothing runs inside
//! [`Emitter::emit`].
//!
//! Handlers are fed from an unbounded per-subscription queue and see every event.
//! Raw receivers share a bounded buffer and skip ahead when they lag.
//!
//! # Example
//!
//! ```rust
//! use taskschema_events::{Emitter, EventError, EventReceiverExt};
//!
//! #[derive(Debug, PartialEq)]
//! enum Change { Added(String) }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), EventError> {
//!     let emitter = Emitter::<Change>::new();
//!     let mut rx = emitter.listen();
//!
//!     emitter.emit(Change::Added("tsc".to_owned()));
//!
//!     let event = EventReceiverExt::recv(&mut rx).await;
//!     assert_eq!(event.as_deref(), Some(&Change::Added("tsc".to_owned())));
//!     Ok(())
//! }
//! ```

mod emitter;
mod error;
mod receiver;
mod subscription;

pub use emitter::{DEFAULT_CAPACITY, Emitter, Event};
pub use error::{EventError, EventErrorExt};
pub use receiver::EventReceiverExt;
pub use subscription::{Subscription, SubscriptionSet};
