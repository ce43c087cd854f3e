//! Projection of stored RDF graphs onto the flat JSON documents the
//! search index consumes.
//!
//! Literal maps are keyed by primary language subtag; untagged literals
//! fall back to the catalogue's default language. Machine-translated
//! literals (tags carrying the `mtec` extension) are listed separately so
//! the search UI can badge them.

use oxrdf::{Graph, NamedNodeRef, Subject, SubjectRef, TermRef};
use serde_json::{json, Map, Value};

use hub_core::{rdf, record, UriScheme};
use hub_vocab::{dcat, dcterms, foaf, lang};

fn primary_subtag(tag: &str) -> String {
    tag.split('-').next().unwrap_or(tag).to_lowercase()
}

/// Language-keyed literal map plus the subset of languages that were
/// machine translated.
fn lang_map(
    graph: &Graph,
    subject: SubjectRef<'_>,
    predicate: NamedNodeRef<'_>,
    default_language: &str,
) -> (Map<String, Value>, Vec<String>) {
    let mut values = Map::new();
    let mut translated = Vec::new();
    for object in graph.objects_for_subject_predicate(subject, predicate) {
        let TermRef::Literal(literal) = object else {
            continue;
        };
        let key = match literal.language() {
            Some(tag) => {
                let key = primary_subtag(tag);
                if tag.contains("mtec") && !translated.contains(&key) {
                    translated.push(key.clone());
                }
                key
            }
            None => default_language.to_string(),
        };
        // a source-language literal wins over a machine translation that
        // landed under the same primary subtag
        values
            .entry(key)
            .or_insert_with(|| Value::String(literal.value().to_string()));
    }
    translated.sort();
    (values, translated)
}

fn publisher(graph: &Graph, subject: SubjectRef<'_>) -> Value {
    let Some(node) = graph
        .objects_for_subject_predicate(subject, dcterms::PUBLISHER)
        .next()
    else {
        return Value::Null;
    };
    let publisher_subject: Subject = match node {
        TermRef::NamedNode(n) => Subject::from(n.into_owned()),
        TermRef::BlankNode(b) => Subject::from(b.into_owned()),
        TermRef::Literal(l) => return json!({ "name": l.value() }),
    };
    match rdf::first_literal(graph, publisher_subject.as_ref(), foaf::NAME) {
        Some(name) => json!({ "name": name }),
        None => Value::Null,
    }
}

/// Projects a stored dataset graph (content plus record envelope) onto a
/// search document.
pub fn dataset_document(
    graph: &Graph,
    scheme: &UriScheme,
    id: &str,
    catalogue_id: Option<&str>,
    default_language: &str,
) -> Value {
    let dataset = scheme.dataset_uri(id);
    let record_uri = scheme.record_uri(id);

    let (title, title_translated) =
        lang_map(graph, (&dataset).into(), dcterms::TITLE, default_language);
    let (description, description_translated) = lang_map(
        graph,
        (&dataset).into(),
        dcterms::DESCRIPTION,
        default_language,
    );

    let keywords: Vec<String> = graph
        .objects_for_subject_predicate(&dataset, dcat::KEYWORD)
        .filter_map(|o| match o {
            TermRef::Literal(l) => Some(l.value().to_string()),
            _ => None,
        })
        .collect();
    let themes: Vec<String> = graph
        .objects_for_subject_predicate(&dataset, dcat::THEME)
        .filter_map(|o| match o {
            TermRef::NamedNode(n) => Some(n.as_str().to_string()),
            _ => None,
        })
        .collect();

    let distributions: Vec<Value> = rdf::typed_subjects(graph, dcat::DISTRIBUTION_CLASS)
        .into_iter()
        .map(|subject| distribution_document(graph, scheme, &subject, default_language))
        .collect();

    let mut document = json!({
        "id": id,
        "title": title,
        "description": description,
        "keywords": keywords,
        "themes": themes,
        "publisher": publisher(graph, (&dataset).into()),
        "issued": record::record_created(graph, record_uri.as_ref()),
        "modified": record::record_modified(graph, record_uri.as_ref()),
        "machine_translated": {
            "title": title_translated,
            "description": description_translated,
        },
        "distributions": distributions,
    });
    if let Some(catalogue_id) = catalogue_id {
        document["catalog"] = json!({ "id": catalogue_id });
    }
    document
}

fn distribution_document(
    graph: &Graph,
    scheme: &UriScheme,
    subject: &Subject,
    default_language: &str,
) -> Value {
    let id = match subject {
        Subject::NamedNode(n) => scheme
            .distribution_id(n.as_str())
            .unwrap_or_else(|| n.as_str().to_string()),
        Subject::BlankNode(b) => b.as_str().to_string(),
    };
    let (title, _) = lang_map(graph, subject.as_ref(), dcterms::TITLE, default_language);
    let (description, _) = lang_map(
        graph,
        subject.as_ref(),
        dcterms::DESCRIPTION,
        default_language,
    );
    let format = rdf::first_named_object(graph, subject.as_ref(), dcterms::FORMAT)
        .map(|n| {
            n.as_str()
                .rsplit('/')
                .next()
                .unwrap_or(n.as_str())
                .to_string()
        })
        .or_else(|| rdf::first_literal(graph, subject.as_ref(), dcterms::FORMAT));
    let urls = |predicate: NamedNodeRef<'_>| -> Vec<String> {
        graph
            .objects_for_subject_predicate(subject.as_ref(), predicate)
            .filter_map(|o| match o {
                TermRef::NamedNode(n) => Some(n.as_str().to_string()),
                _ => None,
            })
            .collect()
    };
    json!({
        "id": id,
        "title": title,
        "description": description,
        "format": format,
        "access_url": urls(dcat::ACCESS_URL),
        "download_url": urls(dcat::DOWNLOAD_URL),
    })
}

/// Projects a stored catalogue graph onto a search document.
pub fn catalogue_document(
    graph: &Graph,
    scheme: &UriScheme,
    id: &str,
    default_language: &str,
) -> Value {
    let catalogue = scheme.catalogue_uri(id);
    let (title, _) = lang_map(graph, (&catalogue).into(), dcterms::TITLE, default_language);
    let (description, _) = lang_map(
        graph,
        (&catalogue).into(),
        dcterms::DESCRIPTION,
        default_language,
    );
    let languages: Vec<String> = graph
        .objects_for_subject_predicate(&catalogue, dcterms::LANGUAGE)
        .filter_map(|o| match o {
            TermRef::NamedNode(n) => lang::iso_code(n.as_str()).map(str::to_string),
            TermRef::Literal(l) => Some(l.value().to_lowercase()),
            _ => None,
        })
        .collect();
    // spatial coverage is an authority IRI; the index wants its tail
    let country = rdf::first_named_object(graph, (&catalogue).into(), dcterms::SPATIAL)
        .map(|n| {
            n.as_str()
                .rsplit('/')
                .next()
                .unwrap_or(n.as_str())
                .to_lowercase()
        });
    json!({
        "id": id,
        "title": title,
        "description": description,
        "publisher": publisher(graph, (&catalogue).into()),
        "languages": languages,
        "country": country,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdfio::RdfFormat;

    fn scheme() -> UriScheme {
        UriScheme::new("https://hub.example.org").unwrap()
    }

    #[test]
    fn dataset_projection_covers_translations_and_distributions() {
        let turtle = r#"
            @prefix dcat: <http://www.w3.org/ns/dcat#> .
            @prefix dct: <http://purl.org/dc/terms/> .
            @prefix foaf: <http://xmlns.com/foaf/0.1/> .
            <https://hub.example.org/dataset/ds-1> a dcat:Dataset ;
                dct:title "Air quality"@en , "Qualité de l'air"@fr-t-en-t0-mtec ;
                dct:description "Hourly measurements"@en ;
                dcat:keyword "air" , "environment" ;
                dct:publisher [ foaf:name "City of Example" ] ;
                dcat:distribution <https://hub.example.org/distribution/d1> .
            <https://hub.example.org/distribution/d1> a dcat:Distribution ;
                dct:title "CSV"@en ;
                dcat:accessURL <http://example.org/file.csv> .
            <https://hub.example.org/record/ds-1>
                dct:created "2026-01-01T00:00:00Z" ;
                dct:modified "2026-02-01T00:00:00Z" .
        "#;
        let graph = rdf::read_graph(turtle.as_bytes(), RdfFormat::Turtle).unwrap();
        let doc = dataset_document(&graph, &scheme(), "ds-1", Some("cat"), "en");

        assert_eq!(doc["id"], "ds-1");
        assert_eq!(doc["catalog"]["id"], "cat");
        assert_eq!(doc["title"]["en"], "Air quality");
        assert_eq!(doc["title"]["fr"], "Qualité de l'air");
        assert_eq!(doc["machine_translated"]["title"], json!(["fr"]));
        assert_eq!(doc["publisher"]["name"], "City of Example");
        assert_eq!(doc["issued"], "2026-01-01T00:00:00Z");
        assert_eq!(doc["modified"], "2026-02-01T00:00:00Z");
        let dist = &doc["distributions"][0];
        assert_eq!(dist["id"], "d1");
        assert_eq!(dist["access_url"], json!(["http://example.org/file.csv"]));
    }

    #[test]
    fn untagged_literals_use_the_default_language() {
        let turtle = r#"
            @prefix dcat: <http://www.w3.org/ns/dcat#> .
            @prefix dct: <http://purl.org/dc/terms/> .
            <https://hub.example.org/dataset/ds-1> a dcat:Dataset ; dct:title "Luftdaten" .
        "#;
        let graph = rdf::read_graph(turtle.as_bytes(), RdfFormat::Turtle).unwrap();
        let doc = dataset_document(&graph, &scheme(), "ds-1", None, "de");
        assert_eq!(doc["title"]["de"], "Luftdaten");
        assert!(doc.get("catalog").is_none());
    }

    #[test]
    fn catalogue_projection() {
        let turtle = r#"
            @prefix dcat: <http://www.w3.org/ns/dcat#> .
            @prefix dct: <http://purl.org/dc/terms/> .
            <https://hub.example.org/catalogue/cat> a dcat:Catalog ;
                dct:title "Municipal data"@en ;
                dct:spatial <http://publications.europa.eu/resource/authority/country/DEU> ;
                dct:language <http://publications.europa.eu/resource/authority/language/DEU> .
        "#;
        let graph = rdf::read_graph(turtle.as_bytes(), RdfFormat::Turtle).unwrap();
        let doc = catalogue_document(&graph, &scheme(), "cat", "en");
        assert_eq!(doc["id"], "cat");
        assert_eq!(doc["title"]["en"], "Municipal data");
        assert_eq!(doc["languages"], json!(["de"]));
        assert_eq!(doc["country"], "deu");
    }
}
