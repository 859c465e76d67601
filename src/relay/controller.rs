//! Per-connection relay control flow.
//!
//! # Data Flow
//! ```text
//! ReadRequest → ParseAndRewrite → ConnectOrigin → SendRequest
//!     → ReadResponseHead → LogAndSendHead → StreamRemainder → Close
//! ```
//! Resolution and connect failures escape to the error responder; stream
//! I/O failures mid-relay terminate the handler quietly. The origin socket
//! is released on every exit path before the handler returns; the client
//! socket is closed by the server task once the handler returns.
//!
//! There is no timeout, cancellation, or retry anywhere in this path: a
//! stalled origin or client blocks only its own connection task.

use std::path::Path;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::config::ProxyConfig;
use crate::observability::metrics;
use crate::relay::error::{RelayError, RelayResult};
use crate::relay::reader::read_bounded;
use crate::relay::request::{build_absolute_uri, extract_target_host, strip_absolute_prefix, TargetHost};
use crate::relay::resolver::resolve_origin;
use crate::relay::response::{send_error_response, status_line};

/// Handle one client connection: read a single request, relay it to the
/// resolved origin, and stream the response back.
pub async fn handle_connection<S>(mut client: S, config: Arc<ProxyConfig>)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let request_bytes = match read_bounded(&mut client, config.relay.buffer_size).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(error = %e, "Failed to read client request");
            return;
        }
    };

    // A zero-byte request proceeds: parsing finds no Host header and the
    // request takes the error-response branch via failed resolution.
    let request_text = String::from_utf8_lossy(&request_bytes).into_owned();
    let target = extract_target_host(&request_text, config.relay.default_origin_port);

    match relay_to_origin(&mut client, &request_text, &target, &config).await {
        Ok(()) => {}
        Err(RelayError::Unreachable { host, source }) => {
            tracing::warn!(host = %host, error = %source, "Origin unreachable");
            metrics::record_error_response();

            let domain = if host.is_empty() { "unknown" } else { host.as_str() };
            let page = Path::new(&config.relay.error_page_path);
            if let Err(e) = send_error_response(&mut client, domain, page).await {
                tracing::error!(error = %e, path = %config.relay.error_page_path, "Failed to serve error page");
            }
        }
        Err(RelayError::Io(e)) => {
            tracing::debug!(error = %e, "Relay terminated");
        }
    }
}

/// Resolve, connect, and run the relay; guarantees the origin socket is
/// released before returning, whichever branch is taken.
async fn relay_to_origin<S>(
    client: &mut S,
    request_text: &str,
    target: &TargetHost,
    config: &ProxyConfig,
) -> RelayResult<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let origin_addr = resolve_origin(target).await.map_err(|e| RelayError::Unreachable {
        host: target.host.clone(),
        source: e,
    })?;

    let rewritten = strip_absolute_prefix(request_text);
    let absolute_uri = build_absolute_uri(request_text, &target.host);

    let mut origin = TcpStream::connect(origin_addr)
        .await
        .map_err(|e| RelayError::Unreachable {
            host: target.host.clone(),
            source: e,
        })?;

    let result = relay_streams(client, &mut origin, &rewritten, &absolute_uri, config).await;

    let _ = origin.shutdown().await;
    result
}

/// Forward the rewritten request and stream the response back to the client.
async fn relay_streams<S>(
    client: &mut S,
    origin: &mut TcpStream,
    rewritten: &str,
    absolute_uri: &str,
    config: &ProxyConfig,
) -> RelayResult<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    origin.write_all(rewritten.as_bytes()).await?;

    // The head is captured bounded (for status-line parsing) and echoed to
    // the client immediately; the body below is relayed in full.
    let head = read_bounded(origin, config.relay.buffer_size).await?;
    client.write_all(&head).await?;

    let status = status_line(&head);
    tracing::info!(target: "access", uri = %absolute_uri, status = %status);
    metrics::record_transaction(&status);

    tokio::io::copy(origin, client).await?;

    Ok(())
}
