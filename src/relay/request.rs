//! Request parsing and URL rewriting.
//!
//! # Responsibilities
//! - Extract the target host (and optional port) from the Host header
//! - Derive the absolute URI used for transaction logging
//! - Rewrite absolute-form request targets into origin-form
//!
//! # Design Decisions
//! - Pattern matching against the raw request text, not a structured HTTP
//!   parser; method, version and all other headers are ignored
//! - A missing Host header yields an empty hostname, which fails DNS
//!   resolution downstream; that is the error-response path

use std::sync::LazyLock;

use regex::Regex;

/// First `Host:` header line, case-insensitive, with optional numeric port.
static HOST_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^host: (?:(?P<host>.+?):(?P<port>\d+)|(?P<bare>.+?))\s")
        .expect("host header pattern is valid")
});

/// First absolute-URL substring: `http://` followed by host-like characters.
static ABSOLUTE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"http://[a-z0-9.:]*").expect("absolute url pattern is valid")
});

/// Origin endpoint named by a request's Host header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetHost {
    /// Hostname as written in the header; empty when no Host header matched.
    pub host: String,
    /// Port from the header, or the configured default.
    pub port: u16,
}

/// Extract the target host from the raw request text.
///
/// The first matching Host header wins. A missing port, or a port that does
/// not parse as a valid port number, falls back to `default_port`.
pub fn extract_target_host(request_text: &str, default_port: u16) -> TargetHost {
    match HOST_HEADER.captures(request_text) {
        Some(caps) => {
            let host = caps
                .name("host")
                .or_else(|| caps.name("bare"))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            let port = caps
                .name("port")
                .and_then(|m| m.as_str().parse::<u16>().ok())
                .unwrap_or(default_port);
            TargetHost { host, port }
        }
        None => TargetHost {
            host: String::new(),
            port: default_port,
        },
    }
}

/// Derive the absolute URI of a request for logging.
///
/// An absolute request target is used verbatim (cut at the first space); an
/// origin-form target is prefixed with `http://` and the hostname. Requests
/// without a parseable request line fall back to the bare hostname.
pub fn build_absolute_uri(request_text: &str, hostname: &str) -> String {
    let first_line = match request_text.lines().next() {
        Some(line) => line,
        None => return hostname.to_string(),
    };

    let mut tokens = first_line.split(' ');
    let target = match (tokens.next(), tokens.next()) {
        (Some(_), Some(target)) => target,
        _ => return hostname.to_string(),
    };

    if target.starts_with("http://") || target.starts_with("https://") {
        return target.split(' ').next().unwrap_or_default().to_string();
    }

    format!("http://{}{}", hostname, target)
}

/// Remove the first absolute-URL substring from the request text so the
/// request line carries only a path.
///
/// This is a textual removal of every occurrence of the matched substring,
/// not a structural edit of the request line; a request that repeats the
/// same substring elsewhere loses those occurrences too. Text without an
/// absolute-URL substring is returned unchanged, so the rewrite is
/// idempotent.
pub fn strip_absolute_prefix(request_text: &str) -> String {
    match ABSOLUTE_URL.find(request_text) {
        Some(matched) => request_text.replace(matched.as_str(), ""),
        None => request_text.to_string(),
    }
}
