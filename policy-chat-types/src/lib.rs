#![deny(missing_docs)]
//! Core types for the policy dashboard chat stream.
//!
//! This crate holds the data model shared by the stream consumer and anything
//! that renders its output: the per-request [`StreamSession`], the events the
//! consumer emits ([`StreamEvent`], [`RenderEvent`]), the [`FramingMode`]
//! selector, and the [`StreamError`] taxonomy. It performs no I/O.

pub mod conversation;
pub mod error;
pub mod event;
pub mod framing;
pub mod session;

pub use conversation::*;
pub use error::*;
pub use event::*;
pub use framing::*;
pub use session::*;
