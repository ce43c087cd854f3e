//! RDF vocabulary constants for the metadata hub.
//!
//! This crate provides a centralized location for the vocabulary IRIs used
//! throughout the hub: DCAT, Dublin Core terms, FOAF, SPDX (checksums),
//! DQV (quality measurements), and the hub's own provenance terms.
//!
//! Constants are `NamedNodeRef`s so they can be used directly with the
//! `oxrdf` model types without re-validation.

/// DCAT vocabulary (http://www.w3.org/ns/dcat#)
pub mod dcat {
    use oxrdf::NamedNodeRef;

    pub const CATALOG: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/dcat#Catalog");

    pub const CATALOG_RECORD: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/dcat#CatalogRecord");

    pub const DATASET_CLASS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/dcat#Dataset");

    pub const DISTRIBUTION_CLASS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/dcat#Distribution");

    /// Membership link from a catalogue to a dataset.
    pub const DATASET: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/dcat#dataset");

    /// Membership link from a catalogue to a catalog record.
    pub const RECORD: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/dcat#record");

    pub const DISTRIBUTION: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/dcat#distribution");

    pub const ACCESS_URL: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/dcat#accessURL");

    pub const DOWNLOAD_URL: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/dcat#downloadURL");

    pub const KEYWORD: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/dcat#keyword");

    pub const THEME: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/dcat#theme");
}

/// Dublin Core terms (http://purl.org/dc/terms/)
pub mod dcterms {
    use oxrdf::NamedNodeRef;

    pub const IDENTIFIER: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/terms/identifier");

    pub const TITLE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/terms/title");

    pub const DESCRIPTION: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/terms/description");

    pub const CREATED: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/terms/created");

    pub const MODIFIED: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/terms/modified");

    pub const ISSUED: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/terms/issued");

    pub const FORMAT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/terms/format");

    pub const LICENSE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/terms/license");

    pub const PUBLISHER: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/terms/publisher");

    /// Declared harvesting source type on a catalogue (e.g. "dcat-ap").
    pub const TYPE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/terms/type");

    /// Declared default language on a catalogue.
    pub const LANGUAGE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/terms/language");

    pub const SPATIAL: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/terms/spatial");
}

/// FOAF vocabulary (http://xmlns.com/foaf/0.1/)
pub mod foaf {
    use oxrdf::NamedNodeRef;

    pub const PRIMARY_TOPIC: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://xmlns.com/foaf/0.1/primaryTopic");

    pub const NAME: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://xmlns.com/foaf/0.1/name");

    pub const HOMEPAGE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://xmlns.com/foaf/0.1/homepage");
}

/// SPDX vocabulary (http://spdx.org/rdf/terms#), used for record checksums
pub mod spdx {
    use oxrdf::NamedNodeRef;

    pub const CHECKSUM_CLASS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://spdx.org/rdf/terms#Checksum");

    pub const CHECKSUM: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://spdx.org/rdf/terms#checksum");

    pub const ALGORITHM: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://spdx.org/rdf/terms#algorithm");

    pub const CHECKSUM_VALUE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://spdx.org/rdf/terms#checksumValue");

    pub const ALGORITHM_MD5: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://spdx.org/rdf/terms#checksumAlgorithm_md5");
}

/// DQV vocabulary (http://www.w3.org/ns/dqv#), used for quality metrics
pub mod dqv {
    use oxrdf::NamedNodeRef;

    pub const QUALITY_MEASUREMENT_CLASS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/dqv#QualityMeasurement");

    pub const HAS_QUALITY_MEASUREMENT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/dqv#hasQualityMeasurement");

    pub const IS_MEASUREMENT_OF: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/dqv#isMeasurementOf");

    pub const VALUE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/dqv#value");
}

/// RDF vocabulary (http://www.w3.org/1999/02/22-rdf-syntax-ns#)
pub mod rdf {
    use oxrdf::NamedNodeRef;

    pub const TYPE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#type");
}

/// XSD datatypes used by the hub
pub mod xsd {
    use oxrdf::NamedNodeRef;

    pub const DATE_TIME: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2001/XMLSchema#dateTime");
}

/// Hub-internal provenance terms (translation status markers on records)
pub mod hub {
    use oxrdf::NamedNodeRef;

    pub const TRANSLATION_STATUS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("https://europeandataportal.eu/voc#translationStatus");

    pub const TRANSLATION_RECEIVED: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("https://europeandataportal.eu/voc#translationReceived");
}

/// EU publications-office language authority table, mapping ISO 639-1
/// codes to authority IRIs and back. Catalogues declare their language as
/// an authority IRI; the translation service speaks ISO codes.
pub mod lang {
    const AUTHORITY_BASE: &str = "http://publications.europa.eu/resource/authority/language/";

    const CODES: &[(&str, &str)] = &[
        ("bg", "BUL"),
        ("cs", "CES"),
        ("da", "DAN"),
        ("de", "DEU"),
        ("el", "ELL"),
        ("en", "ENG"),
        ("es", "SPA"),
        ("et", "EST"),
        ("fi", "FIN"),
        ("fr", "FRA"),
        ("ga", "GLE"),
        ("hr", "HRV"),
        ("hu", "HUN"),
        ("is", "ISL"),
        ("it", "ITA"),
        ("lt", "LIT"),
        ("lv", "LAV"),
        ("mt", "MLT"),
        ("nl", "NLD"),
        ("no", "NOR"),
        ("nb", "NOB"),
        ("nn", "NNO"),
        ("pl", "POL"),
        ("pt", "POR"),
        ("ro", "RON"),
        ("sk", "SLK"),
        ("sl", "SLV"),
        ("sv", "SWE"),
        ("uk", "UKR"),
    ];

    /// ISO 639-1 code for an authority IRI, e.g. `…/language/ENG` → `en`.
    pub fn iso_code(authority_iri: &str) -> Option<&'static str> {
        let tail = authority_iri.strip_prefix(AUTHORITY_BASE)?;
        CODES
            .iter()
            .find(|(_, auth)| *auth == tail)
            .map(|(iso, _)| *iso)
    }

    /// Authority IRI for an ISO 639-1 code, e.g. `en` → `…/language/ENG`.
    pub fn authority_iri(iso: &str) -> Option<String> {
        let iso = iso.to_ascii_lowercase();
        CODES
            .iter()
            .find(|(code, _)| *code == iso)
            .map(|(_, auth)| format!("{AUTHORITY_BASE}{auth}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_codes_round_trip() {
        let iri = lang::authority_iri("en").unwrap();
        assert_eq!(
            iri,
            "http://publications.europa.eu/resource/authority/language/ENG"
        );
        assert_eq!(lang::iso_code(&iri), Some("en"));
        assert_eq!(lang::authority_iri("EN"), lang::authority_iri("en"));
        assert_eq!(lang::iso_code("http://example.org/ENG"), None);
        assert_eq!(lang::authority_iri("zz"), None);
    }

    #[test]
    fn constants_are_valid_iris() {
        // NamedNodeRef::new validates; the unchecked constants must pass it.
        for iri in [
            dcat::DATASET_CLASS.as_str(),
            dcterms::IDENTIFIER.as_str(),
            foaf::PRIMARY_TOPIC.as_str(),
            spdx::CHECKSUM.as_str(),
            dqv::HAS_QUALITY_MEASUREMENT.as_str(),
            rdf::TYPE.as_str(),
            hub::TRANSLATION_STATUS.as_str(),
        ] {
            assert!(oxrdf::NamedNodeRef::new(iri).is_ok(), "invalid IRI: {iri}");
        }
    }
}
