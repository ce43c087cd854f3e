//! Seam to the data hosting service. The hub stores metadata only; when
//! an operator also deploys the upload service, access URLs of hosted
//! distributions must point at its download endpoint.

use hub_core::dataset::DataUploader;

/// Derives download URLs on the hosting service from distribution ids.
#[derive(Debug, Clone)]
pub struct HostedDataUrls {
    base_url: String,
}

impl HostedDataUrls {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl DataUploader for HostedDataUrls {
    fn data_url(&self, distribution_id: &str) -> Option<String> {
        Some(format!("{}/data/{distribution_id}", self.base_url))
    }
}
