//! Ordered response header set
//!
//! Headers are validated once at startup and appended, in declared order,
//! to every outgoing response.

use hyper::header::{HeaderName, HeaderValue};

use super::types::{HeaderEntry, HeadersConfig};
use crate::error::ConfigError;

const CORS: &[(&str, &str)] = &[
    ("Access-Control-Allow-Origin", "*"),
    (
        "Access-Control-Allow-Methods",
        "GET, POST, PUT, DELETE, OPTIONS",
    ),
    (
        "Access-Control-Allow-Headers",
        "Content-Type, Authorization",
    ),
];

const NO_CACHE: &[(&str, &str)] = &[
    ("Cache-Control", "no-cache, no-store, must-revalidate"),
    ("Pragma", "no-cache"),
    ("Expires", "0"),
];

const SECURITY: &[(&str, &str)] = &[
    ("X-Content-Type-Options", "nosniff"),
    ("X-Frame-Options", "DENY"),
    ("X-XSS-Protection", "1; mode=block"),
];

/// Ordered collection of (name, value) pairs.
///
/// A name may repeat only in consecutive entries, since a response
/// `HeaderMap` groups values by name and the wire order must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    entries: Vec<(HeaderName, HeaderValue)>,
}

impl HeaderSet {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build from (name, value) pairs, failing on the first bad entry
    pub fn try_from_pairs<'a, I>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut set = Self::new();
        for (name, value) in pairs {
            set.push(name, value)?;
        }
        Ok(set)
    }

    /// Append a header, validating name, value and placement
    pub fn push(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidHeader {
            name: name.to_string(),
            value: value.to_string(),
        };
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        let value = HeaderValue::from_str(value).map_err(|_| invalid())?;

        let repeats_last = self.entries.last().is_some_and(|(last, _)| *last == name);
        if !repeats_last && self.entries.iter().any(|(existing, _)| *existing == name) {
            return Err(ConfigError::SplitHeader(name.to_string()));
        }

        self.entries.push((name, value));
        Ok(())
    }

    /// Append every header of a named preset
    pub fn push_preset(&mut self, preset: &str) -> Result<(), ConfigError> {
        let pairs = match preset {
            "cors" => CORS,
            "no_cache" => NO_CACHE,
            "security" => SECURITY,
            other => return Err(ConfigError::UnknownPreset(other.to_string())),
        };
        for (name, value) in pairs {
            self.push(name, value)?;
        }
        Ok(())
    }

    /// Build from configuration: presets first, then explicit entries
    pub fn from_config(config: &HeadersConfig) -> Result<Self, ConfigError> {
        let mut set = Self::new();
        for preset in &config.presets {
            set.push_preset(preset)?;
        }
        for HeaderEntry { name, value } in &config.custom {
            set.push(name, value)?;
        }
        Ok(set)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&HeaderName, &HeaderValue)> {
        self.entries.iter().map(|(n, v)| (n, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_declared_order() {
        let set = HeaderSet::try_from_pairs([("X-B", "2"), ("X-A", "1"), ("X-C", "3")]).unwrap();
        let names: Vec<&str> = set.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["x-b", "x-a", "x-c"]);
    }

    #[test]
    fn test_keeps_adjacent_duplicates() {
        let mut set = HeaderSet::new();
        set.push("Cache-Control", "no-cache").unwrap();
        set.push("Cache-Control", "no-store").unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_rejects_split_duplicates() {
        let mut set = HeaderSet::new();
        set.push("Cache-Control", "no-cache").unwrap();
        set.push("X-Frame-Options", "DENY").unwrap();
        assert!(matches!(
            set.push("cache-control", "no-store"),
            Err(ConfigError::SplitHeader(name)) if name == "cache-control"
        ));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_try_from_pairs_surfaces_invalid_entry() {
        let result = HeaderSet::try_from_pairs([("X-A", "1"), ("Bad Name", "x"), ("X-B", "2")]);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidHeader { name, .. }) if name == "Bad Name"
        ));
    }

    #[test]
    fn test_preset_then_custom_override_rejected() {
        let config = HeadersConfig {
            presets: vec!["security".to_string()],
            custom: vec![HeaderEntry {
                name: "X-Frame-Options".to_string(),
                value: "SAMEORIGIN".to_string(),
            }],
        };
        assert!(matches!(
            HeaderSet::from_config(&config),
            Err(ConfigError::SplitHeader(_))
        ));
    }

    #[test]
    fn test_rejects_invalid_header() {
        let mut set = HeaderSet::new();
        assert!(matches!(
            set.push("Bad Name", "x"),
            Err(ConfigError::InvalidHeader { .. })
        ));
        assert!(set.push("X-Ok", "line\nbreak").is_err());
        assert!(set.is_empty());
    }

    #[test]
    fn test_presets_then_custom() {
        let config = HeadersConfig {
            presets: vec!["security".to_string(), "cors".to_string()],
            custom: vec![HeaderEntry {
                name: "X-Served-By".to_string(),
                value: "spa-serve".to_string(),
            }],
        };
        let set = HeaderSet::from_config(&config).unwrap();
        let names: Vec<&str> = set.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names.first(), Some(&"x-content-type-options"));
        assert_eq!(names.get(3), Some(&"access-control-allow-origin"));
        assert_eq!(names.last(), Some(&"x-served-by"));
        assert_eq!(set.len(), 7);
    }

    #[test]
    fn test_unknown_preset() {
        let config = HeadersConfig {
            presets: vec!["gzip".to_string()],
            custom: vec![],
        };
        assert!(matches!(
            HeaderSet::from_config(&config),
            Err(ConfigError::UnknownPreset(p)) if p == "gzip"
        ));
    }
}
