//! The versioned catalogue envelope.
//!
//! Catalogues are simpler than datasets: no distributions to reconcile
//! and no catalog record. Change detection compares the descriptive
//! content only, because the membership links and the hub-maintained
//! timestamps churn on every harvest regardless.

use oxrdf::{Graph, Literal, NamedNode, TermRef, TripleRef};
use oxrdfio::RdfFormat;

use hub_vocab::{dcat, dcterms, lang, xsd};

use crate::canon::canonical_hash;
use crate::error::{CoreError, Result};
use crate::rdf;
use crate::record::now_timestamp;
use crate::scheme::UriScheme;

#[derive(Debug, Clone)]
pub struct CatalogueEnvelope {
    id: String,
    scheme: UriScheme,
    graph: Graph,
}

impl CatalogueEnvelope {
    /// Parses a submitted catalogue and rebases it onto its hub URI
    /// straight away; catalogue identity is fixed by the request path, so
    /// there is nothing to reconcile.
    pub fn parse(
        content: &[u8],
        content_type: &str,
        id: &str,
        scheme: &UriScheme,
    ) -> Result<Self> {
        let format = rdf::format_from_content_type(content_type).ok_or_else(|| {
            CoreError::UnsupportedContentType {
                content_type: content_type.to_string(),
            }
        })?;
        let mut graph = rdf::read_graph(content, format)?;
        let subjects = rdf::typed_subjects(&graph, dcat::CATALOG);
        if subjects.is_empty() {
            return Err(CoreError::MissingResource {
                class: "dcat:Catalog",
            });
        }
        let id = UriScheme::normalize_id(id);
        let uri = scheme.catalogue_uri(&id);
        for subject in subjects {
            rdf::rename_resource(&mut graph, &subject, uri.as_ref());
        }
        Ok(Self {
            id,
            scheme: scheme.clone(),
            graph,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn uri(&self) -> NamedNode {
        self.scheme.catalogue_uri(&self.id)
    }

    pub fn graph_name(&self) -> String {
        self.scheme.catalogue_graph(&self.id)
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    /// Checksum of the descriptive content: membership links and the
    /// hub-maintained `dct:issued`/`dct:modified` stamps are excluded so
    /// that identical submissions compare equal across revisions.
    pub fn content_hash(&self) -> String {
        comparable_hash(&self.graph, &self.uri())
    }

    /// Stamps a first revision.
    pub fn init(&mut self) {
        let uri = self.uri();
        let now = now_timestamp();
        rdf::set_literal(
            &mut self.graph,
            (&uri).into(),
            dcterms::ISSUED,
            Literal::new_typed_literal(now.clone(), xsd::DATE_TIME),
        );
        rdf::set_literal(
            &mut self.graph,
            (&uri).into(),
            dcterms::MODIFIED,
            Literal::new_typed_literal(now, xsd::DATE_TIME),
        );
    }

    /// Prepares a replacement revision: keeps the original issue date and
    /// the membership links, refreshes the modification date.
    pub fn apply_update(&mut self, old_graph: &Graph) {
        let uri = self.uri();
        let issued = rdf::first_literal(old_graph, (&uri).into(), dcterms::ISSUED)
            .unwrap_or_else(now_timestamp);
        rdf::set_literal(
            &mut self.graph,
            (&uri).into(),
            dcterms::ISSUED,
            Literal::new_typed_literal(issued, xsd::DATE_TIME),
        );
        rdf::set_literal(
            &mut self.graph,
            (&uri).into(),
            dcterms::MODIFIED,
            Literal::new_typed_literal(now_timestamp(), xsd::DATE_TIME),
        );
        for predicate in [dcat::DATASET, dcat::RECORD] {
            for object in old_graph.objects_for_subject_predicate(&uri, predicate) {
                self.graph.insert(TripleRef::new(&uri, predicate, object));
            }
        }
    }

    /// The declared harvesting source type, e.g. `dcat-ap`.
    pub fn source_type(&self) -> Option<String> {
        let uri = self.uri();
        rdf::first_literal(&self.graph, (&uri).into(), dcterms::TYPE).or_else(|| {
            rdf::first_named_object(&self.graph, (&uri).into(), dcterms::TYPE)
                .map(|n| n.into_string())
        })
    }

    /// The declared default language as an ISO 639-1 code.
    pub fn source_language(&self) -> Option<String> {
        source_language(&self.graph, &self.uri())
    }

    pub fn serialize(&self, format: RdfFormat) -> Result<String> {
        rdf::write_graph(&self.graph, format)
    }
}

/// Descriptive-content checksum of a catalogue graph; see
/// [`CatalogueEnvelope::content_hash`].
pub fn comparable_hash(graph: &Graph, catalogue_uri: &NamedNode) -> String {
    let mut comparable = graph.clone();
    let volatile: Vec<oxrdf::Triple> = comparable
        .triples_for_subject(catalogue_uri)
        .filter(|t| {
            t.predicate == dcat::DATASET
                || t.predicate == dcat::RECORD
                || t.predicate == dcterms::ISSUED
                || t.predicate == dcterms::MODIFIED
        })
        .map(|t| t.into_owned())
        .collect();
    for t in &volatile {
        comparable.remove(t);
    }
    canonical_hash(&comparable)
}

/// The catalogue's declared default language as an ISO 639-1 code, read
/// from a stored catalogue graph.
pub fn source_language(graph: &Graph, catalogue_uri: &NamedNode) -> Option<String> {
    for object in graph.objects_for_subject_predicate(catalogue_uri, dcterms::LANGUAGE) {
        match object {
            TermRef::NamedNode(n) => {
                if let Some(code) = lang::iso_code(n.as_str()) {
                    return Some(code.to_string());
                }
            }
            TermRef::Literal(l) => return Some(l.value().to_lowercase()),
            TermRef::BlankNode(_) => {}
        }
    }
    None
}
