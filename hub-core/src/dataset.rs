//! The versioned dataset envelope.
//!
//! A `DatasetEnvelope` wraps one harvested payload on its way into the
//! store: it parses the payload, computes the canonical checksum, rebases
//! the dataset and its distributions onto hub URIs (reconciling
//! distribution identity against the previously stored revision), carries
//! machine-translated literals forward, and maintains the catalog-record
//! provenance.

use std::collections::HashMap;

use oxrdf::{Graph, Literal, NamedNode, Subject, SubjectRef, TermRef, TripleRef};
use oxrdfio::RdfFormat;
use tracing::debug;

use hub_vocab::{dcat, dcterms};

use crate::canon::canonical_hash;
use crate::error::{CoreError, Result};
use crate::rdf;
use crate::record;
use crate::scheme::UriScheme;

#[derive(Debug, Clone)]
pub struct DatasetEnvelope {
    /// Hub-internal id, the last path segment of the dataset URI. May be
    /// reassigned by `init` (free-slot probing) or `apply_update` (adopting
    /// the stored revision's slot).
    id: String,
    /// The identifier the submitter knows the dataset by; recorded on the
    /// catalog record and used for lookups.
    external_id: String,
    hash: String,
    catalogue_id: String,
    scheme: UriScheme,
    graph: Graph,
}

impl DatasetEnvelope {
    /// Parses a submitted payload. The checksum is taken over the payload
    /// as submitted, before any renaming, so identical submissions hash
    /// identically regardless of what the hub does to them afterwards.
    pub fn parse(
        content: &[u8],
        content_type: &str,
        id: &str,
        catalogue_id: &str,
        scheme: &UriScheme,
    ) -> Result<Self> {
        let format = rdf::format_from_content_type(content_type).ok_or_else(|| {
            CoreError::UnsupportedContentType {
                content_type: content_type.to_string(),
            }
        })?;
        let graph = rdf::read_graph(content, format)?;
        if rdf::typed_subjects(&graph, dcat::DATASET_CLASS).is_empty() {
            return Err(CoreError::MissingResource {
                class: "dcat:Dataset",
            });
        }
        let hash = canonical_hash(&graph);
        Ok(Self {
            id: UriScheme::normalize_id(id),
            external_id: id.to_string(),
            hash,
            catalogue_id: UriScheme::normalize_id(catalogue_id),
            scheme: scheme.clone(),
            graph,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn catalogue_id(&self) -> &str {
        &self.catalogue_id
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub fn uri(&self) -> NamedNode {
        self.scheme.dataset_uri(&self.id)
    }

    pub fn graph_name(&self) -> String {
        self.scheme.dataset_graph(&self.id)
    }

    pub fn record_uri(&self) -> NamedNode {
        self.scheme.record_uri(&self.id)
    }

    pub fn metrics_graph_name(&self) -> String {
        self.scheme.metrics_graph(&self.id)
    }

    pub fn catalogue_uri(&self) -> NamedNode {
        self.scheme.catalogue_uri(&self.catalogue_id)
    }

    pub fn catalogue_graph_name(&self) -> String {
        self.scheme.catalogue_graph(&self.catalogue_id)
    }

    /// Prepares a first revision: claims the given slot, rebases all
    /// resources onto hub URIs and writes a fresh record envelope.
    pub fn init(&mut self, slot_id: &str) -> Result<()> {
        self.id = UriScheme::normalize_id(slot_id);
        self.rename_references(&HashMap::new())?;
        let record_uri = self.record_uri();
        let dataset_uri = self.uri();
        let external_id = self.external_id.clone();
        let hash = self.hash.clone();
        record::init_record(
            &mut self.graph,
            record_uri.as_ref(),
            dataset_uri.as_ref(),
            &external_id,
            &hash,
        );
        Ok(())
    }

    /// Prepares a replacement revision: adopts the stored revision's slot,
    /// reconciles distribution identity against it, carries the record
    /// envelope and machine translations over, and bumps the provenance.
    pub fn apply_update(&mut self, old_graph: &Graph, record_uri: &NamedNode) -> Result<()> {
        if let Some(id) = self.scheme.record_id(record_uri.as_str()) {
            self.id = id;
        }
        let old_distributions = distribution_identity_map(old_graph);
        self.rename_references(&old_distributions)?;

        let old_record = rdf::extract_resource(old_graph, record_uri.into());
        for t in old_record.iter() {
            self.graph.insert(t);
        }
        let own_record = self.record_uri();
        let hash = self.hash.clone();
        record::touch_record(&mut self.graph, own_record.as_ref(), &hash);

        self.carry_translations(old_graph);
        Ok(())
    }

    /// Rewrites the dataset resource onto its hub URI and every
    /// distribution onto a stable hub URI: the one a matching old
    /// distribution held, or a freshly minted one.
    fn rename_references(&mut self, old_distributions: &HashMap<String, NamedNode>) -> Result<()> {
        let dataset_uri = self.uri();
        for subject in rdf::typed_subjects(&self.graph, dcat::DATASET_CLASS) {
            rdf::rename_resource(&mut self.graph, &subject, dataset_uri.as_ref());
        }
        // a harvested catalog record folds onto the hub's record resource
        let record_uri = self.record_uri();
        for subject in rdf::typed_subjects(&self.graph, dcat::CATALOG_RECORD) {
            rdf::rename_resource(&mut self.graph, &subject, record_uri.as_ref());
        }
        for subject in rdf::typed_subjects(&self.graph, dcat::DISTRIBUTION_CLASS) {
            let key = identity_key(&self.graph, subject.as_ref()).ok_or_else(|| {
                CoreError::DistributionWithoutIdentity {
                    subject: subject.to_string(),
                }
            })?;
            let target = match old_distributions.get(&key) {
                Some(kept) => kept.clone(),
                None => self.scheme.distribution_uri(&UriScheme::mint_id()),
            };
            rdf::rename_resource(&mut self.graph, &subject, target.as_ref());
            if rdf::first_literal(&self.graph, (&target).into(), dcterms::IDENTIFIER).is_none()
                && rdf::first_named_object(&self.graph, (&target).into(), dcterms::IDENTIFIER)
                    .is_none()
            {
                let key_literal = Literal::new_simple_literal(&key);
                self.graph.insert(TripleRef::new(
                    &target,
                    dcterms::IDENTIFIER,
                    &key_literal,
                ));
            }
        }
        Ok(())
    }

    /// Copies machine-translated titles and descriptions from the stored
    /// revision onto resources that survived the update, unless the new
    /// payload already supplies that language itself.
    fn carry_translations(&mut self, old_graph: &Graph) {
        let mut subjects = vec![Subject::from(self.uri())];
        subjects.extend(rdf::typed_subjects(&self.graph, dcat::DISTRIBUTION_CLASS));
        let mut carried: Vec<(Subject, oxrdf::NamedNodeRef<'static>, Literal)> = Vec::new();
        for subject in &subjects {
            for predicate in [dcterms::TITLE, dcterms::DESCRIPTION] {
                for object in old_graph.objects_for_subject_predicate(subject.as_ref(), predicate) {
                    let TermRef::Literal(literal) = object else {
                        continue;
                    };
                    let Some(tag) = literal.language() else {
                        continue;
                    };
                    if !tag.contains("mtec") {
                        continue;
                    }
                    if !self.has_language(subject.as_ref(), predicate, tag) {
                        carried.push((subject.clone(), predicate, literal.into_owned()));
                    }
                }
            }
        }
        for (subject, predicate, literal) in carried {
            self.graph
                .insert(TripleRef::new(subject.as_ref(), predicate, &literal));
        }
    }

    fn has_language(
        &self,
        subject: SubjectRef<'_>,
        predicate: oxrdf::NamedNodeRef<'_>,
        tag: &str,
    ) -> bool {
        self.graph
            .objects_for_subject_predicate(subject, predicate)
            .any(|o| match o {
                TermRef::Literal(l) => l.language() == Some(tag),
                _ => false,
            })
    }

    /// Gives every distribution without an access URL one. See
    /// [`fill_access_urls`].
    pub fn set_access_urls(&mut self, uploader: Option<&dyn DataUploader>) {
        fill_access_urls(&mut self.graph, &self.scheme, uploader);
    }

    /// The record envelope's concise bounded description, for callers that
    /// serve the record on its own.
    pub fn record_graph(&self) -> Graph {
        let record = self.record_uri();
        rdf::extract_resource(&self.graph, (&record).into())
    }

    pub fn serialize(&self, format: RdfFormat) -> Result<String> {
        rdf::write_graph(&self.graph, format)
    }
}

/// Resolves the URL a distribution's bytes are served from when the hub
/// hosts the data itself. A hub without hosted data passes `None` wherever
/// one of these is accepted.
pub trait DataUploader {
    fn data_url(&self, distribution_id: &str) -> Option<String>;
}

/// Gives every distribution without an access URL one, in priority order:
/// the hosting service's URL for the distribution, the declared download
/// URL, the distribution's own URI.
pub fn fill_access_urls(
    graph: &mut Graph,
    scheme: &UriScheme,
    uploader: Option<&dyn DataUploader>,
) {
    let mut additions: Vec<(Subject, NamedNode)> = Vec::new();
    for subject in rdf::typed_subjects(graph, dcat::DISTRIBUTION_CLASS) {
        if rdf::first_named_object(graph, subject.as_ref(), dcat::ACCESS_URL).is_some() {
            continue;
        }
        let hosted = uploader.and_then(|u| match &subject {
            Subject::NamedNode(n) => scheme
                .distribution_id(n.as_str())
                .and_then(|id| u.data_url(&id))
                .and_then(|url| NamedNode::new(url).ok()),
            _ => None,
        });
        let url = hosted
            .or_else(|| rdf::first_named_object(graph, subject.as_ref(), dcat::DOWNLOAD_URL))
            .or_else(|| match &subject {
                Subject::NamedNode(n) => Some(n.clone()),
                _ => None,
            });
        if let Some(url) = url {
            additions.push((subject, url));
        }
    }
    for (subject, url) in additions {
        graph.insert(TripleRef::new(subject.as_ref(), dcat::ACCESS_URL, &url));
    }
}

/// The lone `dcat:Distribution` of a single-distribution payload.
pub fn single_distribution(graph: &Graph) -> Result<Subject> {
    let mut subjects = rdf::typed_subjects(graph, dcat::DISTRIBUTION_CLASS);
    match subjects.len() {
        1 => Ok(subjects.remove(0)),
        0 => Err(CoreError::MissingResource {
            class: "dcat:Distribution",
        }),
        _ => Err(CoreError::AmbiguousResource {
            class: "dcat:Distribution",
        }),
    }
}

/// The identifier a submitted payload carries on its own
/// `dcat:CatalogRecord`, if any. Lets a submission without an external id
/// keep the id its harvester embedded instead of getting a minted one.
pub fn embedded_record_id(graph: &Graph) -> Option<String> {
    rdf::typed_subjects(graph, dcat::CATALOG_RECORD)
        .into_iter()
        .find_map(|record| rdf::first_literal(graph, record.as_ref(), dcterms::IDENTIFIER))
}

/// The identity key of a distribution, in priority order: declared
/// `dct:identifier`, the resource's own URI, `dct:title`, `dcat:accessURL`.
pub fn identity_key(graph: &Graph, subject: SubjectRef<'_>) -> Option<String> {
    for object in graph.objects_for_subject_predicate(subject, dcterms::IDENTIFIER) {
        match object {
            TermRef::Literal(l) => return Some(l.value().to_string()),
            TermRef::NamedNode(n) => return Some(n.as_str().to_string()),
            TermRef::BlankNode(_) => {}
        }
    }
    if let SubjectRef::NamedNode(n) = subject {
        return Some(n.as_str().to_string());
    }
    if let Some(title) = rdf::first_literal(graph, subject, dcterms::TITLE) {
        return Some(title);
    }
    rdf::first_named_object(graph, subject, dcat::ACCESS_URL).map(|n| n.into_string())
}

/// Identity keys of the stored revision's distributions. Blank-node
/// distributions cannot lend their URI to a successor and are skipped;
/// duplicate keys keep the later entry.
pub fn distribution_identity_map(graph: &Graph) -> HashMap<String, NamedNode> {
    let mut map = HashMap::new();
    for subject in rdf::typed_subjects(graph, dcat::DISTRIBUTION_CLASS) {
        let Subject::NamedNode(uri) = subject else {
            debug!("skipping blank-node distribution in stored revision");
            continue;
        };
        let Some(key) = identity_key(graph, (&uri).into()) else {
            continue;
        };
        if let Some(previous) = map.insert(key.clone(), uri) {
            debug!(key = %key, previous = %previous, "duplicate distribution identity key");
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{record_checksum, record_created, record_modified};

    fn scheme() -> UriScheme {
        UriScheme::new("https://hub.example.org").unwrap()
    }

    fn parse(turtle: &str, id: &str) -> DatasetEnvelope {
        DatasetEnvelope::parse(turtle.as_bytes(), "text/turtle", id, "cat", &scheme()).unwrap()
    }

    const SIMPLE: &str = r#"
        @prefix dcat: <http://www.w3.org/ns/dcat#> .
        @prefix dct: <http://purl.org/dc/terms/> .
        <urn:source-ds> a dcat:Dataset ;
            dct:title "Air quality"@en ;
            dcat:distribution [ a dcat:Distribution ;
                dct:identifier "dist-a" ;
                dct:title "CSV"@en ] .
    "#;

    #[test]
    fn parse_rejects_unknown_content_type() {
        let err = DatasetEnvelope::parse(b"{}", "application/json", "x", "cat", &scheme())
            .unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedContentType { .. }));
    }

    #[test]
    fn parse_requires_a_dataset_resource() {
        let err = DatasetEnvelope::parse(
            b"<urn:a> <urn:b> <urn:c> .",
            "text/turtle",
            "x",
            "cat",
            &scheme(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::MissingResource { .. }));
    }

    #[test]
    fn hash_is_stable_across_submissions() {
        let a = parse(SIMPLE, "ds-1");
        let b = parse(SIMPLE, "ds-1");
        assert_eq!(a.hash(), b.hash());
    }

    #[test]
    fn init_rebases_everything_onto_hub_uris() {
        let mut env = parse(SIMPLE, "Ds One");
        env.init("ds-one").unwrap();

        assert_eq!(env.uri().as_str(), "https://hub.example.org/dataset/ds-one");
        // the dataset resource was renamed
        assert!(env
            .graph()
            .triples_for_subject(&env.uri())
            .next()
            .is_some());
        // the blank distribution got a minted hub URI and kept its identifier
        let dists = rdf::typed_subjects(env.graph(), dcat::DISTRIBUTION_CLASS);
        assert_eq!(dists.len(), 1);
        let Subject::NamedNode(dist) = &dists[0] else {
            panic!("distribution was not renamed");
        };
        assert!(dist.as_str().starts_with("https://hub.example.org/distribution/"));
        assert_eq!(
            rdf::first_literal(env.graph(), dists[0].as_ref(), dcterms::IDENTIFIER),
            Some("dist-a".into())
        );
        // record envelope written with the payload hash and external id
        let record = env.record_uri();
        assert_eq!(
            record_checksum(env.graph(), record.as_ref()),
            Some(env.hash().to_string())
        );
        assert_eq!(
            rdf::first_literal(env.graph(), (&record).into(), dcterms::IDENTIFIER),
            Some("Ds One".into())
        );
    }

    #[test]
    fn update_keeps_matching_distribution_uris() {
        let mut first = parse(SIMPLE, "ds-1");
        first.init("ds-1").unwrap();
        let old_dist = rdf::typed_subjects(first.graph(), dcat::DISTRIBUTION_CLASS)
            .pop()
            .unwrap();

        // same identifier, changed title, plus a brand new distribution
        let changed = r#"
            @prefix dcat: <http://www.w3.org/ns/dcat#> .
            @prefix dct: <http://purl.org/dc/terms/> .
            <urn:source-ds> a dcat:Dataset ;
                dct:title "Air quality v2"@en ;
                dcat:distribution [ a dcat:Distribution ;
                    dct:identifier "dist-a" ;
                    dct:title "CSV v2"@en ] ;
                dcat:distribution [ a dcat:Distribution ;
                    dct:identifier "dist-b" ;
                    dct:title "JSON"@en ] .
        "#;
        let mut second = parse(changed, "ds-1");
        second
            .apply_update(first.graph(), &first.record_uri())
            .unwrap();

        let dists = rdf::typed_subjects(second.graph(), dcat::DISTRIBUTION_CLASS);
        assert_eq!(dists.len(), 2);
        assert!(dists.contains(&old_dist), "dist-a lost its URI");
        let new_dist = dists.iter().find(|d| **d != old_dist).unwrap();
        let Subject::NamedNode(new_uri) = new_dist else {
            panic!("new distribution was not renamed");
        };
        assert!(new_uri.as_str().starts_with("https://hub.example.org/distribution/"));
    }

    #[test]
    fn update_carries_record_and_bumps_checksum() {
        let mut first = parse(SIMPLE, "ds-1");
        first.init("ds-1").unwrap();
        let record = first.record_uri();
        let created = record_created(first.graph(), record.as_ref()).unwrap();

        let changed = SIMPLE.replace("Air quality", "Air quality v2");
        let mut second = parse(&changed, "ds-1");
        second.apply_update(first.graph(), &record).unwrap();

        assert_ne!(first.hash(), second.hash());
        assert_eq!(
            record_checksum(second.graph(), record.as_ref()),
            Some(second.hash().to_string())
        );
        assert_eq!(
            record_created(second.graph(), record.as_ref()),
            Some(created)
        );
        assert!(record_modified(second.graph(), record.as_ref()).is_some());
    }

    #[test]
    fn embedded_record_identifier_is_found() {
        let turtle = r#"
            @prefix dcat: <http://www.w3.org/ns/dcat#> .
            @prefix dct: <http://purl.org/dc/terms/> .
            <urn:ds> a dcat:Dataset ; dct:title "T"@en .
            <urn:rec> a dcat:CatalogRecord ; dct:identifier "harvested-id" .
        "#;
        let graph = rdf::read_graph(turtle.as_bytes(), RdfFormat::Turtle).unwrap();
        assert_eq!(embedded_record_id(&graph), Some("harvested-id".into()));
        assert_eq!(embedded_record_id(parse(SIMPLE, "x").graph()), None);
    }

    #[test]
    fn identity_priority_falls_back_through_uri_title_and_access_url() {
        let turtle = r#"
            @prefix dcat: <http://www.w3.org/ns/dcat#> .
            @prefix dct: <http://purl.org/dc/terms/> .
            <urn:d1> a dcat:Distribution ; dct:identifier "id-1" ; dct:title "t1" .
            <urn:d2> a dcat:Distribution ; dct:title "t2" .
            _:d3 a dcat:Distribution ; dct:title "only title" .
            _:d4 a dcat:Distribution ; dcat:accessURL <http://example.org/file> .
        "#;
        let graph = rdf::read_graph(turtle.as_bytes(), RdfFormat::Turtle).unwrap();
        let key_of = |iri: &str| {
            let n = NamedNode::new(iri).unwrap();
            identity_key(&graph, (&n).into())
        };
        assert_eq!(key_of("urn:d1"), Some("id-1".into()));
        assert_eq!(key_of("urn:d2"), Some("urn:d2".into()));

        let blanks: Vec<Subject> = rdf::typed_subjects(&graph, dcat::DISTRIBUTION_CLASS)
            .into_iter()
            .filter(|s| matches!(s, Subject::BlankNode(_)))
            .collect();
        let keys: Vec<Option<String>> = blanks
            .iter()
            .map(|s| identity_key(&graph, s.as_ref()))
            .collect();
        assert!(keys.contains(&Some("only title".into())));
        assert!(keys.contains(&Some("http://example.org/file".into())));
    }

    #[test]
    fn identity_less_distribution_is_rejected() {
        let turtle = r#"
            @prefix dcat: <http://www.w3.org/ns/dcat#> .
            <urn:ds> a dcat:Dataset ; dcat:distribution [ a dcat:Distribution ] .
        "#;
        let mut env = parse(turtle, "ds-1");
        let err = env.init("ds-1").unwrap_err();
        assert!(matches!(err, CoreError::DistributionWithoutIdentity { .. }));
    }

    #[test]
    fn machine_translations_are_carried_forward() {
        let mut first = parse(SIMPLE, "ds-1");
        first.init("ds-1").unwrap();
        let dataset_uri = first.uri();
        let translated = Literal::new_language_tagged_literal(
            "Qualité de l'air",
            "fr-t-en-t0-mtec",
        )
        .unwrap();
        first.graph_mut().insert(TripleRef::new(
            &dataset_uri,
            dcterms::TITLE,
            &translated,
        ));

        let changed = SIMPLE.replace("Air quality", "Air quality v2");
        let mut second = parse(&changed, "ds-1");
        second
            .apply_update(first.graph(), &first.record_uri())
            .unwrap();
        let titles: Vec<String> = second
            .graph()
            .objects_for_subject_predicate(&dataset_uri, dcterms::TITLE)
            .filter_map(|o| match o {
                TermRef::Literal(l) if l.language() == Some("fr-t-en-t0-mtec") => {
                    Some(l.value().to_string())
                }
                _ => None,
            })
            .collect();
        assert_eq!(titles, vec!["Qualité de l'air".to_string()]);
    }

    #[test]
    fn fresh_translations_in_the_payload_win_over_carried_ones() {
        let mut first = parse(SIMPLE, "ds-1");
        first.init("ds-1").unwrap();
        let dataset_uri = first.uri();
        let stale =
            Literal::new_language_tagged_literal("Stale", "fr-t-en-t0-mtec").unwrap();
        first
            .graph_mut()
            .insert(TripleRef::new(&dataset_uri, dcterms::TITLE, &stale));

        let changed = SIMPLE.replace(
            "dct:title \"Air quality\"@en ;",
            "dct:title \"Air quality\"@en , \"Fraîche\"@fr-t-en-t0-mtec ;",
        );
        let mut second = parse(&changed, "ds-1");
        second
            .apply_update(first.graph(), &first.record_uri())
            .unwrap();
        let titles: Vec<String> = second
            .graph()
            .objects_for_subject_predicate(&dataset_uri, dcterms::TITLE)
            .filter_map(|o| match o {
                TermRef::Literal(l) if l.language() == Some("fr-t-en-t0-mtec") => {
                    Some(l.value().to_string())
                }
                _ => None,
            })
            .collect();
        assert_eq!(titles, vec!["Fraîche".to_string()]);
    }

    #[test]
    fn access_urls_are_filled_in() {
        let turtle = r#"
            @prefix dcat: <http://www.w3.org/ns/dcat#> .
            @prefix dct: <http://purl.org/dc/terms/> .
            <urn:ds> a dcat:Dataset ;
                dcat:distribution [ a dcat:Distribution ;
                    dct:identifier "d1" ;
                    dcat:downloadURL <http://example.org/file.csv> ] ;
                dcat:distribution [ a dcat:Distribution ; dct:identifier "d2" ] .
        "#;
        let mut env = parse(turtle, "ds-1");
        env.init("ds-1").unwrap();
        env.set_access_urls(None);
        for subject in rdf::typed_subjects(env.graph(), dcat::DISTRIBUTION_CLASS) {
            let access =
                rdf::first_named_object(env.graph(), subject.as_ref(), dcat::ACCESS_URL);
            assert!(access.is_some(), "distribution {subject} has no access URL");
        }
    }

    struct StubUploader;

    impl DataUploader for StubUploader {
        fn data_url(&self, distribution_id: &str) -> Option<String> {
            Some(format!("https://files.example.org/data/{distribution_id}"))
        }
    }

    #[test]
    fn hosted_data_wins_the_access_url() {
        let mut env = parse(SIMPLE, "ds-1");
        env.init("ds-1").unwrap();
        env.set_access_urls(Some(&StubUploader));

        let dists = rdf::typed_subjects(env.graph(), dcat::DISTRIBUTION_CLASS);
        let Subject::NamedNode(dist) = &dists[0] else {
            panic!("distribution was not renamed");
        };
        let dist_id = scheme().distribution_id(dist.as_str()).unwrap();
        let access = rdf::first_named_object(env.graph(), dists[0].as_ref(), dcat::ACCESS_URL)
            .unwrap();
        assert_eq!(
            access.as_str(),
            format!("https://files.example.org/data/{dist_id}")
        );
        // filling is idempotent once an access URL exists
        env.set_access_urls(None);
        let urls: Vec<_> = env
            .graph()
            .objects_for_subject_predicate(dists[0].as_ref(), dcat::ACCESS_URL)
            .collect();
        assert_eq!(urls.len(), 1);
    }

    #[test]
    fn single_distribution_payloads() {
        let one = r#"
            @prefix dcat: <http://www.w3.org/ns/dcat#> .
            @prefix dct: <http://purl.org/dc/terms/> .
            <urn:d1> a dcat:Distribution ; dct:identifier "d1" .
        "#;
        let graph = rdf::read_graph(one.as_bytes(), RdfFormat::Turtle).unwrap();
        assert!(matches!(
            single_distribution(&graph),
            Ok(Subject::NamedNode(_))
        ));

        let none = rdf::read_graph(b"<urn:a> <urn:b> <urn:c> .", RdfFormat::Turtle).unwrap();
        assert!(matches!(
            single_distribution(&none),
            Err(CoreError::MissingResource { .. })
        ));

        let two = r#"
            @prefix dcat: <http://www.w3.org/ns/dcat#> .
            <urn:d1> a dcat:Distribution . <urn:d2> a dcat:Distribution .
        "#;
        let graph = rdf::read_graph(two.as_bytes(), RdfFormat::Turtle).unwrap();
        assert!(matches!(
            single_distribution(&graph),
            Err(CoreError::AmbiguousResource { .. })
        ));
    }
}
