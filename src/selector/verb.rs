//! The closed set of HTTP verbs a REST handler can be registered for.

use std::fmt;

use serde::Serialize;

/// HTTP verb with REST dispatch support.
///
/// Anything outside this set (HEAD, OPTIONS, made-up methods) never
/// matches a handler and always ends in a 405.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    /// Order in which verbs are probed and listed in the `Allow` header.
    pub const ALLOW_ORDER: [Verb; 4] = [Verb::Delete, Verb::Get, Verb::Post, Verb::Put];

    /// Parse a request method. Matching is case-sensitive.
    pub fn parse(method: &str) -> Option<Self> {
        match method {
            "GET" => Some(Verb::Get),
            "POST" => Some(Verb::Post),
            "PUT" => Some(Verb::Put),
            "DELETE" => Some(Verb::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_sensitive() {
        assert_eq!(Verb::parse("GET"), Some(Verb::Get));
        assert_eq!(Verb::parse("DELETE"), Some(Verb::Delete));
        assert_eq!(Verb::parse("get"), None);
        assert_eq!(Verb::parse("FROG"), None);
        assert_eq!(Verb::parse("HEAD"), None);
    }

    #[test]
    fn test_allow_order() {
        let names: Vec<_> = Verb::ALLOW_ORDER.iter().map(Verb::as_str).collect();
        assert_eq!(names, ["DELETE", "GET", "POST", "PUT"]);
    }
}
