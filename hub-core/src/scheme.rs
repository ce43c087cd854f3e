//! Deterministic mapping between external identifiers and hub URIs.
//!
//! Every managed resource lives at `{base}/{kind}/{id}`, and the named
//! graph holding a resource is the resource URI itself. Because the
//! mapping is pure string work, any component can recompute a URI or a
//! graph name from an id without asking the store.

use oxrdf::NamedNode;

use crate::error::{CoreError, Result};

/// The hub's URI authority, e.g. `https://data.example.org`.
///
/// Identifiers are normalized before being embedded in a URI, so the
/// constructed `NamedNode`s are always valid IRIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriScheme {
    base: String,
}

impl UriScheme {
    pub fn new(base: &str) -> Result<Self> {
        let trimmed = base.trim_end_matches('/');
        NamedNode::new(trimmed).map_err(|_| CoreError::InvalidBaseUri {
            uri: base.to_string(),
        })?;
        Ok(Self {
            base: trimmed.to_string(),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Lowercases an external identifier and replaces every character that
    /// is not IRI-path-safe with `-`. Idempotent, so ids extracted from hub
    /// URIs normalize to themselves.
    pub fn normalize_id(id: &str) -> String {
        id.trim()
            .chars()
            .map(|c| match c {
                'a'..='z' | '0'..='9' | '-' | '.' | '_' | '~' => c,
                'A'..='Z' => c.to_ascii_lowercase(),
                _ => '-',
            })
            .collect()
    }

    fn node(&self, kind: &str, id: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("{}/{}/{}", self.base, kind, Self::normalize_id(id)))
    }

    fn extract(&self, kind: &str, uri: &str) -> Option<String> {
        let prefix = format!("{}/{}/", self.base, kind);
        let id = uri.strip_prefix(prefix.as_str())?;
        if id.is_empty() || id.contains('/') {
            return None;
        }
        Some(id.to_string())
    }

    pub fn catalogue_uri(&self, id: &str) -> NamedNode {
        self.node("catalogue", id)
    }

    pub fn dataset_uri(&self, id: &str) -> NamedNode {
        self.node("dataset", id)
    }

    pub fn record_uri(&self, id: &str) -> NamedNode {
        self.node("record", id)
    }

    pub fn distribution_uri(&self, id: &str) -> NamedNode {
        self.node("distribution", id)
    }

    pub fn metrics_uri(&self, id: &str) -> NamedNode {
        self.node("metrics", id)
    }

    /// Graph names coincide with resource URIs; metrics graphs get their
    /// own name so quality data never shadows the dataset graph.
    pub fn catalogue_graph(&self, id: &str) -> String {
        self.catalogue_uri(id).into_string()
    }

    pub fn dataset_graph(&self, id: &str) -> String {
        self.dataset_uri(id).into_string()
    }

    pub fn metrics_graph(&self, id: &str) -> String {
        self.metrics_uri(id).into_string()
    }

    pub fn catalogue_id(&self, uri: &str) -> Option<String> {
        self.extract("catalogue", uri)
    }

    pub fn dataset_id(&self, uri: &str) -> Option<String> {
        self.extract("dataset", uri)
    }

    pub fn record_id(&self, uri: &str) -> Option<String> {
        self.extract("record", uri)
    }

    pub fn distribution_id(&self, uri: &str) -> Option<String> {
        self.extract("distribution", uri)
    }

    pub fn metrics_id(&self, uri: &str) -> Option<String> {
        self.extract("metrics", uri)
    }

    /// Mints a fresh 128-bit hex identifier for resources submitted
    /// without one.
    pub fn mint_id() -> String {
        format!("{:032x}", rand::random::<u128>())
    }

    /// The nth candidate when probing for a free dataset slot: the id
    /// itself first, then `id_1`, `id_2`, …
    pub fn slot_candidate(id: &str, attempt: usize) -> String {
        if attempt == 0 {
            id.to_string()
        } else {
            format!("{id}_{attempt}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_is_trimmed_and_validated() {
        let scheme = UriScheme::new("https://data.example.org/").unwrap();
        assert_eq!(scheme.base(), "https://data.example.org");
        assert!(UriScheme::new("not a uri").is_err());
    }

    #[test]
    fn uri_round_trip() {
        let scheme = UriScheme::new("https://data.example.org").unwrap();
        let uri = scheme.dataset_uri("abc-123");
        assert_eq!(uri.as_str(), "https://data.example.org/dataset/abc-123");
        assert_eq!(scheme.dataset_id(uri.as_str()), Some("abc-123".to_string()));
        assert_eq!(scheme.catalogue_id(uri.as_str()), None);
        assert_eq!(scheme.dataset_id("https://other.org/dataset/abc"), None);
    }

    #[test]
    fn ids_are_normalized() {
        assert_eq!(UriScheme::normalize_id("My Data Set"), "my-data-set");
        assert_eq!(UriScheme::normalize_id("a/b#c"), "a-b-c");
        // already-normalized ids pass through unchanged
        assert_eq!(UriScheme::normalize_id("abc_1.x~y"), "abc_1.x~y");
    }

    #[test]
    fn slot_candidates() {
        assert_eq!(UriScheme::slot_candidate("base", 0), "base");
        assert_eq!(UriScheme::slot_candidate("base", 1), "base_1");
        assert_eq!(UriScheme::slot_candidate("base", 7), "base_7");
    }

    #[test]
    fn minted_ids_are_hex_and_distinct() {
        let a = UriScheme::mint_id();
        let b = UriScheme::mint_id();
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
