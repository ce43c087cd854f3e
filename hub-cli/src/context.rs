//! Wires the command-line flags into live store and index clients.

use std::sync::Arc;

use hub_index::HttpIndexClient;
use hub_service::{BatchReconciler, HttpPipeline, HubConfig, ValidationConfig};
use hub_store::{GatewayConfig, HttpGateway, SparqlStore};

use crate::cli::Cli;
use crate::error::{CliError, CliResult};

pub type Store = SparqlStore<HttpGateway>;
pub type Reconciler = BatchReconciler<Store, HttpIndexClient, HttpPipeline>;

pub struct Context {
    pub store: Arc<Store>,
    pub reconciler: Reconciler,
}

pub fn build(cli: &Cli) -> CliResult<Context> {
    let gateway = HttpGateway::new(GatewayConfig {
        endpoint: cli.store_endpoint.clone(),
        username: cli.store_username.clone(),
        password: cli.store_password.clone(),
        ..GatewayConfig::default()
    });
    let store = Arc::new(SparqlStore::new(gateway));
    let index = Arc::new(HttpIndexClient::new(
        &cli.index_url,
        cli.index_api_key.clone(),
    ));
    let pipeline = Arc::new(HttpPipeline::new(&cli.pipeline_url));

    let config = HubConfig {
        base_uri: cli.base_uri.clone(),
        partition_size: cli.partition_size,
        validation: ValidationConfig {
            enabled: true,
            pipe_name: cli.pipe.clone(),
        },
        ..HubConfig::default()
    };
    let reconciler = BatchReconciler::new(store.clone(), index, pipeline, &config)
        .map_err(|e| CliError::Usage(e.to_string()))?;
    Ok(Context { store, reconciler })
}
