//! Recording translation client for tests.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::Result;
use crate::{TranslationClient, TranslationRequest};

#[derive(Debug, Default, Clone)]
pub struct MemoryTranslationClient {
    requests: Arc<RwLock<Vec<TranslationRequest>>>,
}

impl MemoryTranslationClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<TranslationRequest> {
        self.requests.read().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.read().len()
    }
}

#[async_trait]
impl TranslationClient for MemoryTranslationClient {
    async fn request_translation(&self, request: &TranslationRequest) -> Result<()> {
        self.requests.write().push(request.clone());
        Ok(())
    }
}
