#![deny(missing_docs)]
//! Incremental consumer for the policy dashboard's streamed chat responses.
//!
//! The single-policy chat answers in plain text, optionally preceded by a
//! JSON header carrying the conversation id. The comparison chat answers in
//! NDJSON. Both are decoded by the same loop ([`consume`]) with the framing
//! injected as a [`FrameParser`], producing [`StreamEvent`]s that carry the
//! cumulative display text.
//!
//! # Usage
//!
//! ```no_run
//! use futures::StreamExt;
//! use policy_chat_stream::{ChatClient, ChatThread};
//! use policy_chat_types::StreamEvent;
//!
//! # async fn run() {
//! let client = ChatClient::new();
//! let mut thread = ChatThread::new();
//! let mut handle = thread.ask(&client, "What does my home policy exclude?", Some(1)).await;
//! while let Some(event) = handle.receiver.next().await {
//!     thread.observe(&event);
//!     if let StreamEvent::Render(render) = event {
//!         println!("{}", render.text);
//!     }
//! }
//! # }
//! ```
//!
//! [`StreamEvent`]: policy_chat_types::StreamEvent

pub mod client;
pub mod config;
pub mod consumer;
pub mod decoder;
pub mod error;
pub mod handle;
pub mod markup;
pub mod parser;
pub mod thread;

pub use client::ChatClient;
pub use config::ClientConfig;
pub use consumer::{ChunkConsumer, consume};
pub use decoder::Utf8Decoder;
pub use error::ClientError;
pub use handle::{StreamHandle, Transcript};
pub use parser::FrameParser;
pub use thread::ChatThread;
