//! Bounded stream reader.
//!
//! # Responsibilities
//! - Capture a request (or the first chunk of a response) in one pass
//! - Cap the capture at the configured buffer capacity
//! - Stop as soon as the stream has no further immediately-available bytes
//!
//! This is not a read-until-EOF or read-until-Content-Length operation: it
//! captures only what is ready now, up to capacity. Messages larger than the
//! capacity are truncated here for parsing and logging; the remaining bytes
//! stay in the stream for the streaming stage to relay.

use futures_util::future::poll_immediate;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Read at most `capacity` bytes from `stream`.
///
/// The first read awaits data (or end-of-stream). Every subsequent read is
/// taken only if it completes without waiting, so a client that has sent a
/// short request is never blocked on while more bytes trickle in.
pub async fn read_bounded<R>(stream: &mut R, capacity: usize) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut data = Vec::with_capacity(capacity);
    let mut chunk = vec![0u8; capacity];

    let n = stream.read(&mut chunk).await?;
    if n == 0 {
        return Ok(data);
    }
    data.extend_from_slice(&chunk[..n]);

    while data.len() < capacity {
        let remaining = capacity - data.len();
        match poll_immediate(stream.read(&mut chunk[..remaining])).await {
            Some(Ok(0)) | None => break,
            Some(Ok(n)) => data.extend_from_slice(&chunk[..n]),
            Some(Err(e)) => return Err(e),
        }
    }

    Ok(data)
}
