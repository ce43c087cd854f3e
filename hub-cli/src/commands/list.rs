use hub_core::UriScheme;
use hub_store::MetadataStore;

use crate::context::Context;
use crate::error::{CliError, CliResult};

pub async fn run(ctx: &Context, base_uri: &str) -> CliResult<()> {
    let scheme = UriScheme::new(base_uri).map_err(|e| CliError::Usage(e.to_string()))?;
    let graphs = ctx.store.list_catalogues().await?;
    let mut ids: Vec<String> = graphs
        .iter()
        .filter_map(|g| scheme.catalogue_id(g))
        .collect();
    ids.sort();
    for id in ids {
        println!("{id}");
    }
    Ok(())
}
