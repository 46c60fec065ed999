//! Bearer-token authentication.

use std::collections::HashMap;

use axum::http::{header, HeaderMap};

use crate::config::SecurityConfig;
use crate::security::permission::Principal;

/// Maps bearer tokens to principal ids.
#[derive(Debug, Clone, Default)]
pub struct TokenAuthenticator {
    tokens: HashMap<String, String>,
}

impl TokenAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &SecurityConfig) -> Self {
        let tokens = config
            .tokens
            .iter()
            .map(|t| (t.token.clone(), t.principal.clone()))
            .collect();
        Self { tokens }
    }

    pub fn with_token(mut self, token: impl Into<String>, principal: impl Into<String>) -> Self {
        self.tokens.insert(token.into(), principal.into());
        self
    }

    /// Identify the caller. Missing, malformed or unknown credentials
    /// leave the caller anonymous.
    pub fn authenticate(&self, headers: &HeaderMap) -> Principal {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .and_then(|token| self.tokens.get(token.trim()))
            .map(|principal| Principal::Authenticated(principal.clone()))
            .unwrap_or(Principal::Anonymous)
    }
}
