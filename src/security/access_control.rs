//! Permission checks for resolved handlers.
//!
//! # Responsibilities
//! - Decide whether a principal holds a permission at a location
//! - Apply grants made on a container to everything below it
//!
//! # Design Decisions
//! - Public permissions never consult grants
//! - Deny unless some grant matches (fail closed)

use std::fmt;

use crate::config::SecurityConfig;
use crate::security::permission::{Permission, Principal};
use crate::traversal::path_segments;

/// Principal id in grants that matches every caller, anonymous included.
pub const ANYBODY: &str = "anybody";

/// Authorization collaborator consulted before a handler runs.
pub trait SecurityPolicy: Send + Sync + fmt::Debug {
    /// Whether `principal` holds `permission` on the resource at `location`.
    fn is_authorized(&self, principal: &Principal, permission: &Permission, location: &[String]) -> bool;
}

/// A permission granted to a principal, globally or below a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    pub principal: String,
    pub permission: String,
    /// Names from the root; empty means the grant applies everywhere.
    pub location: Vec<String>,
}

impl Grant {
    pub fn global(principal: impl Into<String>, permission: impl Into<String>) -> Self {
        Self {
            principal: principal.into(),
            permission: permission.into(),
            location: Vec::new(),
        }
    }

    /// A grant on the resource at `location` and everything it contains.
    pub fn local(principal: impl Into<String>, permission: impl Into<String>, location: &str) -> Self {
        Self {
            principal: principal.into(),
            permission: permission.into(),
            location: path_segments(location),
        }
    }

    fn applies(&self, principal: &Principal, permission: &str, location: &[String]) -> bool {
        let principal_matches =
            self.principal == ANYBODY || principal.id() == Some(self.principal.as_str());
        principal_matches && self.permission == permission && location.starts_with(&self.location)
    }
}

/// Grant table checked against every non-public permission.
#[derive(Debug, Clone, Default)]
pub struct GrantPolicy {
    grants: Vec<Grant>,
}

impl GrantPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &SecurityConfig) -> Self {
        let grants = config
            .grants
            .iter()
            .map(|g| match &g.location {
                Some(location) => Grant::local(&g.principal, &g.permission, location),
                None => Grant::global(&g.principal, &g.permission),
            })
            .collect();
        Self { grants }
    }

    pub fn with_grant(mut self, grant: Grant) -> Self {
        self.grants.push(grant);
        self
    }

    pub fn grants(&self) -> &[Grant] {
        &self.grants
    }
}

impl SecurityPolicy for GrantPolicy {
    fn is_authorized(&self, principal: &Principal, permission: &Permission, location: &[String]) -> bool {
        match permission {
            Permission::Public => true,
            Permission::Named(id) => self
                .grants
                .iter()
                .any(|grant| grant.applies(principal, id, location)),
        }
    }
}
