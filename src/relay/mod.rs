//! Request relay engine.
//!
//! # Data Flow
//! ```text
//! Accepted TCP connection
//!     → server.rs (task per connection)
//!     → controller.rs (per-connection state flow)
//!         → reader.rs (bounded request/head capture)
//!         → request.rs (Host extraction, URL rewrite)
//!         → resolver.rs (origin address lookup)
//!         → response.rs (status line, error responder)
//!     → response streamed back to client
//! ```
//!
//! # Design Decisions
//! - One bounded read per direction per connection; bodies are streamed
//! - Pattern matching over raw request text, no structured HTTP parser
//! - Resolution and connect failures share one error-response branch
//! - No keep-alive: one request, one origin connection, then close

pub mod controller;
pub mod error;
pub mod reader;
pub mod request;
pub mod resolver;
pub mod response;
pub mod server;

pub use error::{RelayError, RelayResult};
pub use request::TargetHost;
pub use server::RelayServer;
