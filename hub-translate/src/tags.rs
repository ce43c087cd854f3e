//! BCP 47 transformed-content tags for machine translations.
//!
//! A machine-produced literal is tagged `<target>-t-<source>-t0-mtec`:
//! the `t` extension names the source language, `t0` marks mechanical
//! transformation, `mtec` is the hub's translation engine identifier.

use oxrdf::{Graph, SubjectRef, TermRef};

/// Marker carried by every machine-produced language tag.
pub const MACHINE_SUFFIX: &str = "t0-mtec";

/// Normalizes codes the translation service emits but DCAT consumers do
/// not expect; Norwegian Bokmål comes back as `nb`.
fn normalize(code: &str) -> &str {
    match code {
        "nb" => "no",
        other => other,
    }
}

pub fn build_language_tag(target: &str, original: &str) -> String {
    format!("{}-t-{}-{MACHINE_SUFFIX}", normalize(target), normalize(original))
}

pub fn is_machine_translated(tag: &str) -> bool {
    tag.contains("mtec")
}

/// The target language of a machine-translation tag, e.g.
/// `fr-t-en-t0-mtec` → `fr`.
pub fn target_language(tag: &str) -> Option<&str> {
    if !is_machine_translated(tag) {
        return None;
    }
    tag.split('-').next()
}

/// Languages a resource already provides natively (non-machine title
/// literals), as primary subtags, sorted and de-duplicated.
pub fn available_languages(
    graph: &Graph,
    subject: SubjectRef<'_>,
    predicate: oxrdf::NamedNodeRef<'_>,
) -> Vec<String> {
    let mut languages: Vec<String> = graph
        .objects_for_subject_predicate(subject, predicate)
        .filter_map(|o| match o {
            TermRef::Literal(l) => l.language(),
            _ => None,
        })
        .filter(|tag| !is_machine_translated(tag))
        .map(|tag| tag.split('-').next().unwrap_or(tag).to_lowercase())
        .collect();
    languages.sort();
    languages.dedup();
    languages
}

/// The language translations should start from: the first language the
/// title is natively available in, or the catalogue's declared language.
pub fn original_language(
    graph: &Graph,
    subject: SubjectRef<'_>,
    fallback: &str,
) -> String {
    available_languages(graph, subject, hub_vocab::dcterms::TITLE)
        .into_iter()
        .next()
        .unwrap_or_else(|| fallback.to_string())
}
