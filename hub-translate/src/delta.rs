//! The flat dictionary sent to the translation service, and the delta
//! logic that avoids re-translating unchanged text.
//!
//! Dictionary keys: `title` and `description` for the dataset itself,
//! `<distribution-id>titl` / `<distribution-id>desc` for distributions.

use std::collections::BTreeMap;

use oxrdf::{Graph, NamedNodeRef, Subject, SubjectRef, TermRef};

use hub_core::{rdf, UriScheme};
use hub_vocab::{dcat, dcterms};

use crate::tags::is_machine_translated;

const TITLE_SUFFIX: &str = "titl";
const DESCRIPTION_SUFFIX: &str = "desc";

/// Picks the text to translate: the literal in the original language
/// (ignoring machine translations), or an untagged literal.
fn source_text(
    graph: &Graph,
    subject: SubjectRef<'_>,
    predicate: NamedNodeRef<'_>,
    original_language: &str,
) -> Option<String> {
    let mut untagged = None;
    for object in graph.objects_for_subject_predicate(subject, predicate) {
        let TermRef::Literal(literal) = object else {
            continue;
        };
        match literal.language() {
            Some(tag) if is_machine_translated(tag) => {}
            Some(tag) => {
                let primary = tag.split('-').next().unwrap_or(tag);
                if primary.eq_ignore_ascii_case(original_language) {
                    return Some(literal.value().to_string());
                }
            }
            None => untagged = Some(literal.value().to_string()),
        }
    }
    untagged
}

/// The full translation dictionary for a stored dataset graph.
pub fn data_dict(
    graph: &Graph,
    scheme: &UriScheme,
    dataset_id: &str,
    original_language: &str,
) -> BTreeMap<String, String> {
    let mut dict = BTreeMap::new();
    let dataset = scheme.dataset_uri(dataset_id);
    if let Some(text) = source_text(graph, (&dataset).into(), dcterms::TITLE, original_language) {
        dict.insert("title".to_string(), text);
    }
    if let Some(text) = source_text(
        graph,
        (&dataset).into(),
        dcterms::DESCRIPTION,
        original_language,
    ) {
        dict.insert("description".to_string(), text);
    }
    for subject in rdf::typed_subjects(graph, dcat::DISTRIBUTION_CLASS) {
        let Subject::NamedNode(uri) = &subject else {
            continue;
        };
        let Some(id) = scheme.distribution_id(uri.as_str()) else {
            continue;
        };
        if let Some(text) = source_text(graph, subject.as_ref(), dcterms::TITLE, original_language)
        {
            dict.insert(format!("{id}{TITLE_SUFFIX}"), text);
        }
        if let Some(text) = source_text(
            graph,
            subject.as_ref(),
            dcterms::DESCRIPTION,
            original_language,
        ) {
            dict.insert(format!("{id}{DESCRIPTION_SUFFIX}"), text);
        }
    }
    dict
}

/// The fields that actually need translating: everything on a first
/// submission, only the changed fields on an update.
pub fn translation_delta(
    new_graph: &Graph,
    old_graph: Option<&Graph>,
    scheme: &UriScheme,
    dataset_id: &str,
    original_language: &str,
) -> BTreeMap<String, String> {
    let mut dict = data_dict(new_graph, scheme, dataset_id, original_language);
    if let Some(old_graph) = old_graph {
        let old_dict = data_dict(old_graph, scheme, dataset_id, original_language);
        dict.retain(|key, value| old_dict.get(key) != Some(value));
    }
    dict
}

/// Splits a dictionary key back into its target subject and predicate.
/// Returns the distribution id (if any) and the predicate.
pub fn parse_field_key(key: &str) -> Option<(Option<&str>, NamedNodeRef<'static>)> {
    match key {
        "title" => Some((None, dcterms::TITLE)),
        "description" => Some((None, dcterms::DESCRIPTION)),
        _ => {
            let (id, suffix) = key.split_at(key.len().checked_sub(4)?);
            match suffix {
                TITLE_SUFFIX => Some((Some(id), dcterms::TITLE)),
                DESCRIPTION_SUFFIX => Some((Some(id), dcterms::DESCRIPTION)),
                _ => None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hub_core::rdf::read_graph;
    use oxrdfio::RdfFormat;

    fn scheme() -> UriScheme {
        UriScheme::new("https://hub.example.org").unwrap()
    }

    fn graph(title: &str) -> Graph {
        let turtle = format!(
            r#"
            @prefix dcat: <http://www.w3.org/ns/dcat#> .
            @prefix dct: <http://purl.org/dc/terms/> .
            <https://hub.example.org/dataset/ds-1> a dcat:Dataset ;
                dct:title "{title}"@en ;
                dct:description "Hourly measurements"@en ;
                dcat:distribution <https://hub.example.org/distribution/d1> .
            <https://hub.example.org/distribution/d1> a dcat:Distribution ;
                dct:title "CSV"@en .
        "#
        );
        read_graph(turtle.as_bytes(), RdfFormat::Turtle).unwrap()
    }

    #[test]
    fn dict_covers_dataset_and_distributions() {
        let dict = data_dict(&graph("Air quality"), &scheme(), "ds-1", "en");
        assert_eq!(dict.get("title").map(String::as_str), Some("Air quality"));
        assert_eq!(
            dict.get("description").map(String::as_str),
            Some("Hourly measurements")
        );
        assert_eq!(dict.get("d1titl").map(String::as_str), Some("CSV"));
        assert!(!dict.contains_key("d1desc"));
    }

    #[test]
    fn delta_drops_unchanged_fields() {
        let old = graph("Air quality");
        let new = graph("Air quality v2");
        let delta = translation_delta(&new, Some(&old), &scheme(), "ds-1", "en");
        assert_eq!(delta.len(), 1);
        assert_eq!(
            delta.get("title").map(String::as_str),
            Some("Air quality v2")
        );

        let full = translation_delta(&new, None, &scheme(), "ds-1", "en");
        assert_eq!(full.len(), 3);
    }

    #[test]
    fn field_keys_round_trip() {
        assert_eq!(parse_field_key("title"), Some((None, dcterms::TITLE)));
        assert_eq!(
            parse_field_key("d1desc"),
            Some((Some("d1"), dcterms::DESCRIPTION))
        );
        assert_eq!(parse_field_key("d1titl"), Some((Some("d1"), dcterms::TITLE)));
        assert_eq!(parse_field_key("bogus"), None);
        assert_eq!(parse_field_key("abc"), None);
    }
}
