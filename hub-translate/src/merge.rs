//! Merging a translation delivery back into a stored dataset graph.

use oxrdf::{Graph, Literal, NamedNode, NamedNodeRef, SubjectRef, TermRef, Triple, TripleRef};
use tracing::debug;

use hub_core::UriScheme;

use crate::delta::parse_field_key;
use crate::error::{Result, TranslationError};
use crate::tags::{build_language_tag, is_machine_translated, target_language};
use crate::TranslationDelivery;

/// Applies a delivery to the graph it was requested for. Fields whose
/// subject disappeared between request and delivery are skipped; the
/// harvester clearly knows something the translation service does not.
pub fn apply_translations(
    graph: &mut Graph,
    scheme: &UriScheme,
    dataset_id: &str,
    delivery: &TranslationDelivery,
) -> Result<()> {
    for (target, fields) in &delivery.translations {
        let tag = build_language_tag(target, &delivery.original_language);
        for (key, text) in fields {
            let (distribution_id, predicate) =
                parse_field_key(key).ok_or_else(|| TranslationError::UnknownField {
                    key: key.clone(),
                })?;
            let subject: NamedNode = match distribution_id {
                Some(id) => scheme.distribution_uri(id),
                None => scheme.dataset_uri(dataset_id),
            };
            if graph.triples_for_subject(&subject).next().is_none() {
                debug!(%subject, key, "translated subject no longer present, skipping");
                continue;
            }
            replace_machine_literal(graph, (&subject).into(), predicate, &tag, text);
        }
    }
    Ok(())
}

/// Drops any machine translation for the same target language (whatever
/// its source) and inserts the new literal.
fn replace_machine_literal(
    graph: &mut Graph,
    subject: SubjectRef<'_>,
    predicate: NamedNodeRef<'_>,
    tag: &str,
    text: &str,
) {
    let target = tag.split('-').next().unwrap_or(tag);
    let stale: Vec<Triple> = graph
        .triples_for_subject(subject)
        .filter(|t| {
            t.predicate == predicate
                && match t.object {
                    TermRef::Literal(l) => l
                        .language()
                        .is_some_and(|lang| {
                            is_machine_translated(lang) && target_language(lang) == Some(target)
                        }),
                    _ => false,
                }
        })
        .map(TripleRef::into_owned)
        .collect();
    for t in &stale {
        graph.remove(t);
    }
    if let Ok(literal) = Literal::new_language_tagged_literal(text, tag) {
        graph.insert(TripleRef::new(subject, predicate, &literal));
    }
}
