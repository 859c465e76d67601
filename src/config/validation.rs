//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (buffer capacity, ports, limits)
//! - Check addresses actually parse as socket addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::ProxyConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// An address field does not parse as `host:port`.
    InvalidAddress { field: &'static str, value: String },
    /// A numeric field is outside its allowed range.
    InvalidRange { field: &'static str, reason: &'static str },
    /// A required path field is empty.
    EmptyPath { field: &'static str },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidAddress { field, value } => {
                write!(f, "{} is not a valid socket address: {}", field, value)
            }
            ValidationError::InvalidRange { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            ValidationError::EmptyPath { field } => {
                write!(f, "{} must not be empty", field)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Run all semantic checks over a parsed configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.listener.max_connections == 0 {
        errors.push(ValidationError::InvalidRange {
            field: "listener.max_connections",
            reason: "must be greater than zero",
        });
    }

    if config.relay.buffer_size == 0 {
        errors.push(ValidationError::InvalidRange {
            field: "relay.buffer_size",
            reason: "must be greater than zero",
        });
    }

    if config.relay.default_origin_port == 0 {
        errors.push(ValidationError::InvalidRange {
            field: "relay.default_origin_port",
            reason: "port 0 is not routable",
        });
    }

    if config.relay.error_page_path.is_empty() {
        errors.push(ValidationError::EmptyPath {
            field: "relay.error_page_path",
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&ProxyConfig::default()).is_ok());
    }

    #[test]
    fn collects_all_errors_not_just_first() {
        let mut config = ProxyConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.relay.buffer_size = 0;
        config.relay.error_page_path = String::new();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn rejects_port_zero_origin_default() {
        let mut config = ProxyConfig::default();
        config.relay.default_origin_port = 0;

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(
            errors[0],
            ValidationError::InvalidRange { field: "relay.default_origin_port", .. }
        ));
    }

    #[test]
    fn metrics_address_checked_only_when_enabled() {
        let mut config = ProxyConfig::default();
        config.observability.metrics_address = "bogus".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
