//! Minimal forwarding HTTP proxy library.

// Core subsystems
pub mod config;
pub mod net;
pub mod relay;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::ProxyConfig;
pub use lifecycle::Shutdown;
pub use relay::RelayServer;
