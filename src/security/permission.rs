//! Permissions guarding handlers and the principals checked against them.

use std::fmt;

use serde::{Serialize, Serializer};

/// Permission a caller needs before a handler is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Permission {
    /// No check at all.
    #[default]
    Public,
    /// A named permission resolved by the security policy.
    Named(String),
}

impl Permission {
    /// Identifier used for [`Permission::Public`] in configuration files.
    pub const PUBLIC_ID: &'static str = "public";

    pub fn named(id: impl Into<String>) -> Self {
        Permission::Named(id.into())
    }

    /// Parse an identifier, mapping [`Self::PUBLIC_ID`] to `Public`.
    pub fn from_id(id: &str) -> Self {
        if id == Self::PUBLIC_ID {
            Permission::Public
        } else {
            Permission::Named(id.to_string())
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Permission::Public => Self::PUBLIC_ID,
            Permission::Named(id) => id,
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Permission::Public)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl Serialize for Permission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

/// The caller a request is made on behalf of.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Principal {
    #[default]
    Anonymous,
    Authenticated(String),
}

impl Principal {
    pub fn id(&self) -> Option<&str> {
        match self {
            Principal::Anonymous => None,
            Principal::Authenticated(id) => Some(id),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Principal::Anonymous)
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Principal::Anonymous => f.write_str("anonymous"),
            Principal::Authenticated(id) => f.write_str(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_id_round_trip() {
        assert_eq!(Permission::from_id("public"), Permission::Public);
        assert_eq!(
            Permission::from_id("content.Manage"),
            Permission::named("content.Manage")
        );
        assert_eq!(Permission::named("content.Manage").id(), "content.Manage");
        assert!(Permission::default().is_public());
    }
}
