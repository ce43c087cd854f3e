//! The metrics envelope: quality measurements about a dataset, stored in
//! a sibling graph so they never shadow the dataset's own revision.

use oxrdf::{Graph, NamedNode};
use oxrdfio::RdfFormat;

use crate::canon::canonical_hash;
use crate::error::{CoreError, Result};
use crate::rdf;
use crate::scheme::UriScheme;

#[derive(Debug, Clone)]
pub struct MetricsEnvelope {
    dataset_id: String,
    hash: String,
    scheme: UriScheme,
    graph: Graph,
}

impl MetricsEnvelope {
    pub fn parse(
        content: &[u8],
        content_type: &str,
        dataset_id: &str,
        scheme: &UriScheme,
    ) -> Result<Self> {
        let format = rdf::format_from_content_type(content_type).ok_or_else(|| {
            CoreError::UnsupportedContentType {
                content_type: content_type.to_string(),
            }
        })?;
        let graph = rdf::read_graph(content, format)?;
        if graph.is_empty() {
            return Err(CoreError::MissingResource {
                class: "dqv:QualityMeasurement",
            });
        }
        let hash = canonical_hash(&graph);
        Ok(Self {
            dataset_id: UriScheme::normalize_id(dataset_id),
            hash,
            scheme: scheme.clone(),
            graph,
        })
    }

    pub fn dataset_id(&self) -> &str {
        &self.dataset_id
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn dataset_uri(&self) -> NamedNode {
        self.scheme.dataset_uri(&self.dataset_id)
    }

    pub fn graph_name(&self) -> String {
        self.scheme.metrics_graph(&self.dataset_id)
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn serialize(&self, format: RdfFormat) -> Result<String> {
        rdf::write_graph(&self.graph, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_name() {
        let scheme = UriScheme::new("https://hub.example.org").unwrap();
        let turtle = r#"
            @prefix dqv: <http://www.w3.org/ns/dqv#> .
            <urn:m> a dqv:QualityMeasurement ; dqv:value "42" .
        "#;
        let env =
            MetricsEnvelope::parse(turtle.as_bytes(), "text/turtle", "ds-1", &scheme).unwrap();
        assert_eq!(env.graph_name(), "https://hub.example.org/metrics/ds-1");
        assert_eq!(env.hash().len(), 32);

        let err = MetricsEnvelope::parse(b"", "text/turtle", "ds-1", &scheme).unwrap_err();
        assert!(matches!(err, CoreError::MissingResource { .. }));
    }
}
