//! Catalog-record provenance: who points at what, when it appeared, when
//! it last changed, and the checksum of its current content.
//!
//! The record is stored inside the dataset's graph and is the only place
//! the hub writes provenance. A harvested payload may bring its own
//! catalog record; the envelope folds it onto the hub's record resource
//! before these functions run.

use chrono::{SecondsFormat, Utc};
use oxrdf::{BlankNode, Graph, Literal, NamedNodeRef, Subject, TermRef, TripleRef};

use hub_vocab::{dcat, dcterms, foaf, hub, rdf as rdf_vocab, spdx, xsd};

use crate::rdf;

/// UTC timestamp truncated to whole seconds, e.g. `2026-08-29T10:15:30Z`.
/// Fixed-width, so lexicographic order is chronological order.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Writes a fresh record envelope for a newly created dataset.
pub fn init_record(
    graph: &mut Graph,
    record: NamedNodeRef<'_>,
    dataset: NamedNodeRef<'_>,
    external_id: &str,
    hash: &str,
) {
    graph.insert(TripleRef::new(record, rdf_vocab::TYPE, dcat::CATALOG_RECORD));
    graph.insert(TripleRef::new(record, foaf::PRIMARY_TOPIC, dataset));
    // the hub's view wins over anything a folded harvested record carried
    rdf::set_literal(
        graph,
        record.into(),
        dcterms::IDENTIFIER,
        Literal::new_simple_literal(external_id),
    );
    let now = Literal::new_typed_literal(now_timestamp(), xsd::DATE_TIME);
    rdf::set_literal(graph, record.into(), dcterms::CREATED, now.clone());
    rdf::set_literal(graph, record.into(), dcterms::MODIFIED, now);
    attach_checksum(graph, record, hash);
}

/// Refreshes a carried-over record envelope after a content change:
/// bumps `dct:modified` and swaps in the new checksum value.
///
/// `dct:modified` never moves backwards. If the stored value is somehow
/// ahead of this host's clock, it is kept as is.
pub fn touch_record(graph: &mut Graph, record: NamedNodeRef<'_>, hash: &str) {
    let now = now_timestamp();
    let modified = match rdf::first_literal(graph, record.into(), dcterms::MODIFIED) {
        Some(existing) if existing.as_str() > now.as_str() => existing,
        _ => now,
    };
    rdf::set_literal(
        graph,
        record.into(),
        dcterms::MODIFIED,
        Literal::new_typed_literal(modified, xsd::DATE_TIME),
    );
    match checksum_node(graph, record) {
        Some(node) => rdf::set_literal(
            graph,
            node.as_ref(),
            spdx::CHECKSUM_VALUE,
            Literal::new_simple_literal(hash),
        ),
        None => attach_checksum(graph, record, hash),
    }
}

fn attach_checksum(graph: &mut Graph, record: NamedNodeRef<'_>, hash: &str) {
    let node = BlankNode::default();
    graph.insert(TripleRef::new(record, spdx::CHECKSUM, &node));
    graph.insert(TripleRef::new(&node, rdf_vocab::TYPE, spdx::CHECKSUM_CLASS));
    graph.insert(TripleRef::new(&node, spdx::ALGORITHM, spdx::ALGORITHM_MD5));
    let value = Literal::new_simple_literal(hash);
    graph.insert(TripleRef::new(&node, spdx::CHECKSUM_VALUE, &value));
}

fn checksum_node(graph: &Graph, record: NamedNodeRef<'_>) -> Option<Subject> {
    match graph.object_for_subject_predicate(record, spdx::CHECKSUM)? {
        TermRef::NamedNode(n) => Some(Subject::from(n.into_owned())),
        TermRef::BlankNode(b) => Some(Subject::from(b.into_owned())),
        TermRef::Literal(_) => None,
    }
}

pub fn record_checksum(graph: &Graph, record: NamedNodeRef<'_>) -> Option<String> {
    let node = checksum_node(graph, record)?;
    rdf::first_literal(graph, node.as_ref(), spdx::CHECKSUM_VALUE)
}

pub fn record_created(graph: &Graph, record: NamedNodeRef<'_>) -> Option<String> {
    rdf::first_literal(graph, record.into(), dcterms::CREATED)
}

pub fn record_modified(graph: &Graph, record: NamedNodeRef<'_>) -> Option<String> {
    rdf::first_literal(graph, record.into(), dcterms::MODIFIED)
}

/// Marks the record as waiting for a machine translation round trip.
pub fn mark_translation_in_process(graph: &mut Graph, record: NamedNodeRef<'_>) {
    rdf::set_literal(
        graph,
        record.into(),
        hub::TRANSLATION_STATUS,
        Literal::new_simple_literal("in_process"),
    );
}

/// Marks the record as translated and stamps the delivery time.
pub fn mark_translation_received(graph: &mut Graph, record: NamedNodeRef<'_>) {
    rdf::set_literal(
        graph,
        record.into(),
        hub::TRANSLATION_STATUS,
        Literal::new_simple_literal("completed"),
    );
    rdf::set_literal(
        graph,
        record.into(),
        hub::TRANSLATION_RECEIVED,
        Literal::new_typed_literal(now_timestamp(), xsd::DATE_TIME),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::NamedNode;

    fn uris() -> (NamedNode, NamedNode) {
        (
            NamedNode::new("https://hub.example.org/record/ds-1").unwrap(),
            NamedNode::new("https://hub.example.org/dataset/ds-1").unwrap(),
        )
    }

    #[test]
    fn init_writes_full_envelope() {
        let (record, dataset) = uris();
        let mut graph = Graph::new();
        init_record(&mut graph, record.as_ref(), dataset.as_ref(), "ext-1", "abc123");

        assert_eq!(record_checksum(&graph, record.as_ref()), Some("abc123".into()));
        assert_eq!(
            rdf::first_named_object(&graph, (&record).into(), foaf::PRIMARY_TOPIC),
            Some(dataset)
        );
        assert_eq!(
            rdf::first_literal(&graph, (&record).into(), dcterms::IDENTIFIER),
            Some("ext-1".into())
        );
        let created = record_created(&graph, record.as_ref()).unwrap();
        assert_eq!(created, record_modified(&graph, record.as_ref()).unwrap());
        assert!(created.ends_with('Z'));
    }

    #[test]
    fn touch_swaps_checksum_and_keeps_created() {
        let (record, dataset) = uris();
        let mut graph = Graph::new();
        init_record(&mut graph, record.as_ref(), dataset.as_ref(), "ext-1", "aaa");
        let created = record_created(&graph, record.as_ref()).unwrap();

        touch_record(&mut graph, record.as_ref(), "bbb");
        assert_eq!(record_checksum(&graph, record.as_ref()), Some("bbb".into()));
        assert_eq!(record_created(&graph, record.as_ref()), Some(created));
        // still exactly one checksum value
        let node = checksum_node(&graph, record.as_ref()).unwrap();
        assert_eq!(
            graph
                .triples_for_subject(node.as_ref())
                .filter(|t| t.predicate == spdx::CHECKSUM_VALUE)
                .count(),
            1
        );
    }

    #[test]
    fn modified_never_moves_backwards() {
        let (record, dataset) = uris();
        let mut graph = Graph::new();
        init_record(&mut graph, record.as_ref(), dataset.as_ref(), "ext-1", "aaa");
        let future = "2999-01-01T00:00:00Z";
        rdf::set_literal(
            &mut graph,
            (&record).into(),
            dcterms::MODIFIED,
            Literal::new_typed_literal(future, xsd::DATE_TIME),
        );
        touch_record(&mut graph, record.as_ref(), "bbb");
        assert_eq!(record_modified(&graph, record.as_ref()).unwrap(), future);
    }

    #[test]
    fn touch_on_bare_record_attaches_checksum() {
        let (record, _) = uris();
        let mut graph = Graph::new();
        touch_record(&mut graph, record.as_ref(), "ccc");
        assert_eq!(record_checksum(&graph, record.as_ref()), Some("ccc".into()));
    }

    #[test]
    fn translation_markers() {
        let (record, dataset) = uris();
        let mut graph = Graph::new();
        init_record(&mut graph, record.as_ref(), dataset.as_ref(), "ext-1", "aaa");
        mark_translation_in_process(&mut graph, record.as_ref());
        assert_eq!(
            rdf::first_literal(&graph, (&record).into(), hub::TRANSLATION_STATUS),
            Some("in_process".into())
        );
        mark_translation_received(&mut graph, record.as_ref());
        assert_eq!(
            rdf::first_literal(&graph, (&record).into(), hub::TRANSLATION_STATUS),
            Some("completed".into())
        );
        assert!(rdf::first_literal(&graph, (&record).into(), hub::TRANSLATION_RECEIVED).is_some());
    }
}
