use crate::error::NavError;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use url::form_urlencoded;

/// A route request: path plus query parameters. Query keys are kept sorted so
/// the rendered form is stable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    path: String,
    query: BTreeMap<String, String>,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: normalize_path(path.into()),
            query: BTreeMap::new(),
        }
    }

    pub fn from_parts(path: impl Into<String>, query: BTreeMap<String, String>) -> Self {
        Self {
            path: normalize_path(path.into()),
            query,
        }
    }

    /// Parses `/path?k=v&…`. A `#fragment` is ignored; repeated keys keep the last value.
    pub fn parse(raw: &str) -> Result<Self, NavError> {
        let trimmed = raw.trim();
        let without_fragment = trimmed.split('#').next().unwrap_or_default();
        let (path, query) = match without_fragment.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (without_fragment, None),
        };

        if !path.starts_with('/') {
            return Err(NavError::InvalidLocation(raw.to_string()));
        }

        let query = query
            .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();

        Ok(Self::from_parts(path, query))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &BTreeMap<String, String> {
        &self.query
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }
}

fn normalize_path(mut path: String) -> String {
    if path.is_empty() {
        return "/".to_string();
    }
    while path.len() > 1 && path.ends_with('/') {
        path.pop();
    }
    path
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if !self.query.is_empty() {
            let encoded = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(self.query.iter())
                .finish();
            write!(f, "?{encoded}")?;
        }
        Ok(())
    }
}

impl FromStr for Location {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Location {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_decodes_query() {
        let loc = Location::parse("/login?from=%2Fsettings").unwrap();
        assert_eq!(loc.path(), "/login");
        assert_eq!(loc.query_value("from"), Some("/settings"));
    }

    #[test]
    fn test_display_encodes_query() {
        let loc = Location::new("/login").with_query("from", "/settings");
        assert_eq!(loc.to_string(), "/login?from=%2Fsettings");
    }

    #[test]
    fn test_parse_normalizes_trailing_slash_and_fragment() {
        let loc = Location::parse("/settings/#top").unwrap();
        assert_eq!(loc, Location::new("/settings"));
        assert_eq!(Location::parse("/").unwrap().path(), "/");
    }

    #[test]
    fn test_parse_rejects_relative_paths() {
        assert_eq!(
            Location::parse("settings"),
            Err(NavError::InvalidLocation("settings".to_string()))
        );
        assert!(Location::parse("").is_err());
    }

    #[test]
    fn test_query_order_is_stable() {
        let a = Location::parse("/x?b=2&a=1").unwrap();
        let b = Location::parse("/x?a=1&b=2").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "/x?a=1&b=2");
    }

    #[test]
    fn test_serializes_as_string() {
        let loc = Location::new("/login").with_query("from", "/settings");
        assert_eq!(
            serde_json::to_string(&loc).unwrap(),
            "\"/login?from=%2Fsettings\""
        );
    }
}
