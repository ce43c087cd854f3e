//! Thin glue over `oxrdf`/`oxrdfio`: payload parsing, serialization, and
//! the small set of graph surgeries the envelopes need (concise bounded
//! descriptions and resource renaming).

use std::collections::HashSet;

use oxrdf::{Graph, Literal, NamedNode, NamedNodeRef, Subject, SubjectRef, Term, TermRef, Triple};
use oxrdf::{GraphNameRef, QuadRef, TripleRef};
use oxrdfio::{RdfFormat, RdfParser, RdfSerializer};

use hub_vocab::rdf as rdf_vocab;

use crate::error::{CoreError, Result};

/// Maps an HTTP content type onto a parsable RDF format, ignoring media
/// type parameters such as `charset`.
pub fn format_from_content_type(content_type: &str) -> Option<RdfFormat> {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    RdfFormat::from_media_type(essence)
}

/// Parses a payload into a graph. Named graphs in quad formats are
/// flattened; the hub assigns graph names itself.
pub fn read_graph(data: &[u8], format: RdfFormat) -> Result<Graph> {
    let mut graph = Graph::new();
    for quad in RdfParser::from_format(format).for_reader(data) {
        let quad = quad.map_err(|e| CoreError::Parse {
            message: e.to_string(),
        })?;
        graph.insert(&Triple::new(quad.subject, quad.predicate, quad.object));
    }
    Ok(graph)
}

pub fn write_graph(graph: &Graph, format: RdfFormat) -> Result<String> {
    let mut serializer = RdfSerializer::from_format(format).for_writer(Vec::new());
    for t in graph.iter() {
        serializer
            .serialize_quad(QuadRef::new(
                t.subject,
                t.predicate,
                t.object,
                GraphNameRef::DefaultGraph,
            ))
            .map_err(|e| CoreError::Serialize {
                message: e.to_string(),
            })?;
    }
    let bytes = serializer.finish().map_err(|e| CoreError::Serialize {
        message: e.to_string(),
    })?;
    String::from_utf8(bytes).map_err(|e| CoreError::Serialize {
        message: e.to_string(),
    })
}

/// Serializes named graphs together, for quad formats such as TriG.
pub fn write_named_graphs(graphs: &[(NamedNode, &Graph)], format: RdfFormat) -> Result<String> {
    let mut serializer = RdfSerializer::from_format(format).for_writer(Vec::new());
    for (name, graph) in graphs {
        for t in graph.iter() {
            serializer
                .serialize_quad(QuadRef::new(
                    t.subject,
                    t.predicate,
                    t.object,
                    GraphNameRef::NamedNode(name.as_ref()),
                ))
                .map_err(|e| CoreError::Serialize {
                    message: e.to_string(),
                })?;
        }
    }
    let bytes = serializer.finish().map_err(|e| CoreError::Serialize {
        message: e.to_string(),
    })?;
    String::from_utf8(bytes).map_err(|e| CoreError::Serialize {
        message: e.to_string(),
    })
}

/// Concise bounded description of `root`: all its triples plus,
/// recursively, the triples of every blank node it reaches.
pub fn extract_resource(graph: &Graph, root: SubjectRef<'_>) -> Graph {
    let mut out = Graph::new();
    let mut seen: HashSet<Subject> = HashSet::new();
    let mut queue: Vec<Subject> = vec![root.into_owned()];
    while let Some(subject) = queue.pop() {
        if !seen.insert(subject.clone()) {
            continue;
        }
        for t in graph.triples_for_subject(subject.as_ref()) {
            out.insert(t);
            if let TermRef::BlankNode(b) = t.object {
                queue.push(Subject::BlankNode(b.into_owned()));
            }
        }
    }
    out
}

/// Rewrites every occurrence of `from` (as subject or object) to `to`.
pub fn rename_resource(graph: &mut Graph, from: &Subject, to: NamedNodeRef<'_>) {
    if let Subject::NamedNode(n) = from {
        if n.as_ref() == to {
            return;
        }
    }
    let from_term: Term = from.clone().into();
    let affected: Vec<Triple> = graph
        .iter()
        .filter(|t| t.subject == from.as_ref() || t.object == from_term.as_ref())
        .map(TripleRef::into_owned)
        .collect();
    for t in &affected {
        graph.remove(t);
    }
    for t in affected {
        let subject = if t.subject == *from {
            Subject::from(to.into_owned())
        } else {
            t.subject
        };
        let object = if t.object == from_term {
            Term::from(to.into_owned())
        } else {
            t.object
        };
        graph.insert(&Triple::new(subject, t.predicate, object));
    }
}

/// All subjects carrying `rdf:type class`.
pub fn typed_subjects(graph: &Graph, class: NamedNodeRef<'_>) -> Vec<Subject> {
    graph
        .subjects_for_predicate_object(rdf_vocab::TYPE, class)
        .map(SubjectRef::into_owned)
        .collect()
}

pub fn first_literal(
    graph: &Graph,
    subject: SubjectRef<'_>,
    predicate: NamedNodeRef<'_>,
) -> Option<String> {
    graph
        .objects_for_subject_predicate(subject, predicate)
        .find_map(|o| match o {
            TermRef::Literal(l) => Some(l.value().to_string()),
            _ => None,
        })
}

pub fn first_named_object(
    graph: &Graph,
    subject: SubjectRef<'_>,
    predicate: NamedNodeRef<'_>,
) -> Option<NamedNode> {
    graph
        .objects_for_subject_predicate(subject, predicate)
        .find_map(|o| match o {
            TermRef::NamedNode(n) => Some(n.into_owned()),
            _ => None,
        })
}

/// Replaces every `subject predicate *` triple with a single literal value.
pub fn set_literal(
    graph: &mut Graph,
    subject: SubjectRef<'_>,
    predicate: NamedNodeRef<'_>,
    literal: Literal,
) {
    let old: Vec<Triple> = graph
        .triples_for_subject(subject)
        .filter(|t| t.predicate == predicate)
        .map(TripleRef::into_owned)
        .collect();
    for t in &old {
        graph.remove(t);
    }
    graph.insert(TripleRef::new(subject, predicate, &literal));
}

#[cfg(test)]
mod tests {
    use super::*;
    use hub_vocab::{dcat, dcterms};

    fn sample() -> Graph {
        let turtle = br#"
            @prefix dcat: <http://www.w3.org/ns/dcat#> .
            @prefix dct: <http://purl.org/dc/terms/> .
            <urn:ds> a dcat:Dataset ;
                dct:title "A title"@en ;
                dcat:distribution [ a dcat:Distribution ; dct:title "CSV dump" ] .
        "#;
        read_graph(turtle, RdfFormat::Turtle).unwrap()
    }

    #[test]
    fn parse_and_serialize_round_trip() {
        let graph = sample();
        assert_eq!(graph.len(), 5);
        let nt = write_graph(&graph, RdfFormat::NTriples).unwrap();
        let reparsed = read_graph(nt.as_bytes(), RdfFormat::NTriples).unwrap();
        assert_eq!(reparsed.len(), 5);
    }

    #[test]
    fn named_graphs_serialize_as_quads() {
        let graph = sample();
        let name = NamedNode::new("https://hub.example.org/dataset/ds").unwrap();
        let trig = write_named_graphs(&[(name.clone(), &graph)], RdfFormat::TriG).unwrap();
        assert!(trig.contains(name.as_str()));
        assert!(trig.contains("A title"));
    }

    #[test]
    fn content_type_parameters_are_ignored() {
        assert_eq!(
            format_from_content_type("text/turtle; charset=utf-8"),
            Some(RdfFormat::Turtle)
        );
        assert_eq!(format_from_content_type("application/json"), None);
    }

    #[test]
    fn malformed_payload_is_a_parse_error() {
        let err = read_graph(b"this is not turtle", RdfFormat::Turtle).unwrap_err();
        assert!(matches!(err, CoreError::Parse { .. }));
    }

    #[test]
    fn extract_follows_blank_nodes() {
        let graph = sample();
        let root = NamedNode::new("urn:ds").unwrap();
        let cbd = extract_resource(&graph, (&root).into());
        // dataset triples plus the blank distribution's two triples
        assert_eq!(cbd.len(), 5);

        let dist = typed_subjects(&graph, dcat::DISTRIBUTION_CLASS)
            .pop()
            .unwrap();
        let dist_cbd = extract_resource(&graph, dist.as_ref());
        assert_eq!(dist_cbd.len(), 2);
    }

    #[test]
    fn rename_rewrites_subjects_and_objects() {
        let mut graph = sample();
        let old = Subject::from(NamedNode::new("urn:ds").unwrap());
        let new = NamedNode::new("https://hub.example.org/dataset/ds").unwrap();
        rename_resource(&mut graph, &old, new.as_ref());
        assert_eq!(graph.len(), 5);
        assert!(graph.triples_for_subject(&new).count() > 0);
        assert_eq!(graph.triples_for_subject(&old).count(), 0);
    }

    #[test]
    fn rename_rewrites_object_positions() {
        let mut graph = Graph::new();
        let a = NamedNode::new("urn:a").unwrap();
        let b = NamedNode::new("urn:b").unwrap();
        graph.insert(TripleRef::new(&a, dcat::DISTRIBUTION, &b));
        let new = NamedNode::new("urn:c").unwrap();
        rename_resource(&mut graph, &Subject::from(b), new.as_ref());
        assert_eq!(
            first_named_object(&graph, (&a).into(), dcat::DISTRIBUTION),
            Some(new)
        );
    }

    #[test]
    fn set_literal_replaces_existing_values() {
        let mut graph = sample();
        let subject = NamedNode::new("urn:ds").unwrap();
        set_literal(
            &mut graph,
            (&subject).into(),
            dcterms::TITLE,
            Literal::new_simple_literal("replaced"),
        );
        assert_eq!(
            first_literal(&graph, (&subject).into(), dcterms::TITLE),
            Some("replaced".to_string())
        );
        assert_eq!(
            graph
                .objects_for_subject_predicate(&subject, dcterms::TITLE)
                .count(),
            1
        );
    }
}
