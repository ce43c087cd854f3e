//! Shared fixtures: all services wired against in-memory backends.

use std::sync::Arc;

use hub_index::MemoryIndexClient;
use hub_service::{
    BatchReconciler, CatalogueService, DatasetService, HubConfig, MemoryPipeline, MetricsService,
};
use hub_store::MemoryStore;
use hub_translate::MemoryTranslationClient;

pub type Datasets =
    DatasetService<MemoryStore, MemoryIndexClient, MemoryTranslationClient, MemoryPipeline>;

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub index: Arc<MemoryIndexClient>,
    pub translator: Arc<MemoryTranslationClient>,
    pub pipeline: Arc<MemoryPipeline>,
    pub datasets: Datasets,
    pub catalogues: CatalogueService<MemoryStore, MemoryIndexClient>,
    pub metrics: MetricsService<MemoryStore>,
    pub batch: BatchReconciler<MemoryStore, MemoryIndexClient, MemoryPipeline>,
}

pub fn config() -> HubConfig {
    HubConfig {
        base_uri: "https://hub.example.org".to_string(),
        ..HubConfig::default()
    }
}

pub fn harness(config: HubConfig) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let index = Arc::new(MemoryIndexClient::new());
    let translator = Arc::new(MemoryTranslationClient::new());
    let pipeline = Arc::new(MemoryPipeline::new(true));
    let datasets = DatasetService::new(
        store.clone(),
        index.clone(),
        translator.clone(),
        pipeline.clone(),
        config.clone(),
    )
    .unwrap();
    let catalogues = CatalogueService::new(store.clone(), index.clone(), config.clone()).unwrap();
    let metrics = MetricsService::new(store.clone(), &config).unwrap();
    let batch =
        BatchReconciler::new(store.clone(), index.clone(), pipeline.clone(), &config).unwrap();
    Harness {
        store,
        index,
        translator,
        pipeline,
        datasets,
        catalogues,
        metrics,
        batch,
    }
}

pub const CATALOGUE_TTL: &str = r#"
    @prefix dcat: <http://www.w3.org/ns/dcat#> .
    @prefix dct: <http://purl.org/dc/terms/> .
    <urn:src-cat> a dcat:Catalog ;
        dct:title "Test catalogue"@en ;
        dct:type "dcat-ap" ;
        dct:language <http://publications.europa.eu/resource/authority/language/ENG> .
"#;

pub async fn seed_catalogue(harness: &Harness) {
    harness
        .catalogues
        .put_catalogue("cat", CATALOGUE_TTL.as_bytes(), "text/turtle")
        .await
        .unwrap();
}

pub fn dataset_ttl(title: &str, dist_identifier: &str) -> String {
    format!(
        r#"
        @prefix dcat: <http://www.w3.org/ns/dcat#> .
        @prefix dct: <http://purl.org/dc/terms/> .
        <urn:src-ds> a dcat:Dataset ;
            dct:title "{title}"@en ;
            dcat:distribution [ a dcat:Distribution ;
                dct:identifier "{dist_identifier}" ;
                dct:title "CSV"@en ;
                dcat:accessURL <http://example.org/file.csv> ] .
    "#
    )
}
