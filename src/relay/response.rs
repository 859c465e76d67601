//! Response-side helpers: status line extraction and the error responder.
//!
//! # Responsibilities
//! - Pull the status line out of a bounded response head for logging
//! - Emit the fixed 403 error response when the origin cannot be reached
//!
//! The error page is re-read from disk on every occurrence. A missing or
//! unreadable page file is a deployment error: the read failure propagates
//! and the connection closes without a response body, with no fallback.

use std::path::Path;

use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Extract the status line from the first line of a response head.
///
/// Everything after the first space of line 0 (so `HTTP/1.1 200 OK` logs as
/// `200 OK`). A line with no space is returned whole.
pub fn status_line(head: &[u8]) -> String {
    let text = String::from_utf8_lossy(head);
    let first = text.split(['\r', '\n']).next().unwrap_or_default();
    match first.find(' ') {
        Some(idx) => first[idx + 1..].to_string(),
        None => first.to_string(),
    }
}

/// Write the fixed 403 error response for an unreachable origin.
///
/// The body is a short inline snippet naming the offending domain, followed
/// by the static error page; Content-Length covers both.
pub async fn send_error_response<W>(
    stream: &mut W,
    domain: &str,
    error_page_path: &Path,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let page = tokio::fs::read(error_page_path).await?;
    let snippet = format!("<p>{}", domain);

    let head = format!(
        "HTTP/1.1 403 Forbidden\r\nContent-Type: text/html\r\nContent-Length: {}\r\n\r\n{}",
        page.len() + snippet.len(),
        snippet
    );

    stream.write_all(head.as_bytes()).await?;
    stream.write_all(&page).await?;
    Ok(())
}
