//! Canonical content checksums.
//!
//! Two payloads describing the same metadata must hash identically even
//! when serialization order or blank node labels differ, otherwise the
//! change detector would re-store every harvested dataset on every run.
//! Blank node labels are canonicalized first, then the sorted N-Triples
//! text is digested with MD5 (the algorithm the record envelope declares
//! via `spdx:checksumAlgorithm_md5`).

use md5::{Digest, Md5};
use oxrdf::dataset::CanonicalizationAlgorithm;
use oxrdf::Graph;

/// Canonical N-Triples rendition: relabeled blank nodes, one triple per
/// line, lexicographically sorted.
pub fn canonical_ntriples(graph: &Graph) -> String {
    let mut canonical = graph.clone();
    canonical.canonicalize(CanonicalizationAlgorithm::Unstable);
    let mut lines: Vec<String> = canonical.iter().map(|t| format!("{t} .")).collect();
    lines.sort_unstable();
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Lowercase hex MD5 of the canonical rendition.
pub fn canonical_hash(graph: &Graph) -> String {
    hex::encode(Md5::digest(canonical_ntriples(graph).as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::read_graph;
    use oxrdfio::RdfFormat;

    fn parse(turtle: &str) -> Graph {
        read_graph(turtle.as_bytes(), RdfFormat::Turtle).unwrap()
    }

    #[test]
    fn hash_ignores_statement_order() {
        let a = parse("<urn:s> <urn:p> \"x\" . <urn:s> <urn:q> \"y\" .");
        let b = parse("<urn:s> <urn:q> \"y\" . <urn:s> <urn:p> \"x\" .");
        assert_eq!(canonical_hash(&a), canonical_hash(&b));
    }

    #[test]
    fn hash_ignores_blank_node_labels() {
        let a = parse("<urn:s> <urn:p> _:a . _:a <urn:q> \"v\" .");
        let b = parse("<urn:s> <urn:p> _:zzz . _:zzz <urn:q> \"v\" .");
        assert_eq!(canonical_hash(&a), canonical_hash(&b));
    }

    #[test]
    fn hash_detects_content_change() {
        let a = parse("<urn:s> <urn:p> \"x\" .");
        let b = parse("<urn:s> <urn:p> \"y\" .");
        assert_ne!(canonical_hash(&a), canonical_hash(&b));
    }

    #[test]
    fn hash_is_lowercase_hex_md5() {
        let hash = canonical_hash(&parse("<urn:s> <urn:p> \"x\" ."));
        assert_eq!(hash.len(), 32);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
