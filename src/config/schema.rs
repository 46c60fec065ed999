//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the REST service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// REST publication settings.
    pub rest: RestConfig,

    /// Authentication tokens and permission grants.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// REST publication settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RestConfig {
    /// Path segment prefix selecting a skin, as in `++rest++b`.
    pub skin_namespace: String,

    /// Realm advertised in `WWW-Authenticate` challenges.
    pub realm: String,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            skin_namespace: "++rest++".to_string(),
            realm: "restskin".to_string(),
        }
    }
}

/// Authentication tokens and permission grants.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SecurityConfig {
    /// Bearer tokens accepted for authentication.
    pub tokens: Vec<TokenConfig>,

    /// Permission grants.
    pub grants: Vec<GrantConfig>,
}

/// A bearer token and the principal it authenticates.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenConfig {
    /// Principal identifier.
    pub principal: String,

    /// Opaque token sent as `Authorization: Bearer <token>`.
    pub token: String,
}

/// Grants a permission to a principal, optionally below a location.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GrantConfig {
    /// Principal identifier, or `anybody` for every caller.
    pub principal: String,

    /// Permission identifier.
    pub permission: String,

    /// Resource path the grant is scoped to (e.g. "/app"). Global if absent.
    #[serde(default)]
    pub location: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: ServiceConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.rest.skin_namespace, "++rest++");
        assert!(config.security.grants.is_empty());
    }

    #[test]
    fn test_grants_parse() {
        let config: ServiceConfig = toml::from_str(
            r#"
            [rest]
            realm = "zoo"

            [[security.tokens]]
            principal = "keeper"
            token = "s3cret"

            [[security.grants]]
            principal = "anybody"
            permission = "mammoth.Touch"
            location = "/"
            "#,
        )
        .unwrap();

        assert_eq!(config.rest.realm, "zoo");
        assert_eq!(config.rest.skin_namespace, "++rest++");
        assert_eq!(config.security.tokens[0].principal, "keeper");
        assert_eq!(config.security.grants[0].location.as_deref(), Some("/"));
    }
}
