//! Relay error definitions.

use thiserror::Error;

/// Errors that can occur while relaying a single request.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The origin could not be reached: DNS resolution failed or the TCP
    /// connect was refused/unreachable. Both cases are deliberately one
    /// variant and take the same error-response branch.
    #[error("could not reach origin {host}: {source}")]
    Unreachable {
        host: String,
        #[source]
        source: std::io::Error,
    },

    /// Stream I/O failed mid-relay (client disconnect, origin reset).
    /// Not answered with an error page; the handler just cleans up.
    #[error("stream I/O failure: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;
