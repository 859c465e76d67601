//! Relay server: accept loop and per-connection task dispatch.
//!
//! # Responsibilities
//! - Accept connections from the bounded listener
//! - Spawn one relay task per accepted connection
//! - Observe the shutdown signal and drain in-flight relays
//!
//! The accept loop itself is a single task; concurrency comes from worker
//! multiplicity, one spawned task per connection, with no shared mutable
//! state between them. Configuration is shared read-only via `Arc`.

use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tokio::sync::broadcast;

use crate::config::ProxyConfig;
use crate::net::{ConnectionTracker, Listener};
use crate::relay::controller::handle_connection;

/// The forwarding proxy server.
pub struct RelayServer {
    config: Arc<ProxyConfig>,
    tracker: ConnectionTracker,
}

impl RelayServer {
    /// Create a new relay server with the given configuration.
    pub fn new(config: ProxyConfig) -> Self {
        Self {
            config: Arc::new(config),
            tracker: ConnectionTracker::new(),
        }
    }

    /// Accept and relay connections until the shutdown signal fires, then
    /// drain in-flight relays before returning.
    pub async fn run(
        &self,
        listener: Listener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Relay server starting");

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (mut stream, peer, permit) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            tracing::warn!(error = %e, "Accept failed");
                            continue;
                        }
                    };

                    let config = Arc::clone(&self.config);
                    let guard = self.tracker.track();
                    tokio::spawn(async move {
                        // Permit and guard are held for the task's lifetime.
                        let _permit = permit;
                        tracing::debug!(connection_id = %guard.id(), peer_addr = %peer, "Relay started");

                        handle_connection(&mut stream, config).await;

                        let _ = stream.shutdown().await;
                        tracing::debug!(connection_id = %guard.id(), "Relay finished");
                    });
                }
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown signal received, draining connections");
                    break;
                }
            }
        }

        self.tracker.wait_for_drain().await;
        tracing::info!("Relay server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}
