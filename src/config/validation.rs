//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Detect conflicting tokens and malformed grants
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    InvalidBindAddress(String),

    #[error("observability.metrics_address {0:?} is not a socket address")]
    InvalidMetricsAddress(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("limits.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("rest.skin_namespace must be non-empty and must not contain '/'")]
    InvalidSkinNamespace,

    #[error("security token for {0} is empty")]
    EmptyToken(String),

    #[error("security token for {0} is assigned more than once")]
    DuplicateToken(String),

    #[error("grant for {0} names an empty permission")]
    EmptyPermission(String),

    #[error("grant location {0:?} must start with '/'")]
    RelativeLocation(String),
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    let namespace = &config.rest.skin_namespace;
    if namespace.is_empty() || namespace.contains('/') {
        errors.push(ValidationError::InvalidSkinNamespace);
    }

    let mut seen = HashSet::new();
    for token in &config.security.tokens {
        if token.token.is_empty() {
            errors.push(ValidationError::EmptyToken(token.principal.clone()));
        } else if !seen.insert(token.token.as_str()) {
            errors.push(ValidationError::DuplicateToken(token.principal.clone()));
        }
    }

    for grant in &config.security.grants {
        if grant.permission.is_empty() {
            errors.push(ValidationError::EmptyPermission(grant.principal.clone()));
        }
        if let Some(location) = &grant.location {
            if !location.starts_with('/') {
                errors.push(ValidationError::RelativeLocation(location.clone()));
            }
        }
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
    use crate::config::schema::{GrantConfig, TokenConfig};

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ServiceConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ServiceConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.timeouts.request_secs = 0;
        config.rest.skin_namespace = "++rest++/".into();
        config.security.tokens = vec![
            TokenConfig { principal: "a".into(), token: "same".into() },
            TokenConfig { principal: "b".into(), token: "same".into() },
        ];
        config.security.grants = vec![GrantConfig {
            principal: "a".into(),
            permission: "content.Manage".into(),
            location: Some("app".into()),
        }];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidBindAddress("not-an-address".into()),
                ValidationError::ZeroRequestTimeout,
                ValidationError::InvalidSkinNamespace,
                ValidationError::DuplicateToken("b".into()),
                ValidationError::RelativeLocation("app".into()),
            ]
        );
    }
}
