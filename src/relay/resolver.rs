//! Origin address resolution.
//!
//! # Responsibilities
//! - Resolve the target hostname to a socket address
//! - Pair the first resolved address with the requested port
//!
//! Resolution failure is not distinguished from a later connect failure:
//! both feed the same "could not reach origin" branch in the controller.

use std::net::SocketAddr;

use crate::relay::request::TargetHost;

/// Resolve a target host to the first address DNS returns.
///
/// An empty hostname or an unresolvable name yields an I/O error.
pub async fn resolve_origin(target: &TargetHost) -> std::io::Result<SocketAddr> {
    let mut addrs = tokio::net::lookup_host((target.host.as_str(), target.port)).await?;
    addrs.next().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("no addresses resolved for {}", target.host),
        )
    })
}
