use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hub", about = "Metadata hub maintenance CLI", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output (also respects NO_COLOR env var)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Base URI the hub mints identifiers under
    #[arg(long, global = true, env = "HUB_BASE_URI", default_value = "http://localhost:8080")]
    pub base_uri: String,

    /// Triple store endpoint, e.g. http://store:3030/hub
    #[arg(long, global = true, env = "HUB_STORE_ENDPOINT", default_value = "http://localhost:3030/hub")]
    pub store_endpoint: String,

    /// Triple store basic-auth user
    #[arg(long, global = true, env = "HUB_STORE_USERNAME")]
    pub store_username: Option<String>,

    /// Triple store basic-auth password
    #[arg(long, global = true, env = "HUB_STORE_PASSWORD", hide_env_values = true)]
    pub store_password: Option<String>,

    /// Search index base URL
    #[arg(long, global = true, env = "HUB_INDEX_URL", default_value = "http://localhost:8081")]
    pub index_url: String,

    /// Search index API key
    #[arg(long, global = true, env = "HUB_INDEX_API_KEY", hide_env_values = true)]
    pub index_api_key: Option<String>,

    /// Validation pipeline service base URL
    #[arg(long, global = true, env = "HUB_PIPELINE_URL", default_value = "http://localhost:8098")]
    pub pipeline_url: String,

    /// Validation pipe to trigger
    #[arg(long, global = true, env = "HUB_PIPELINE_PIPE", default_value = "validating")]
    pub pipe: String,

    /// Members processed concurrently per batch partition
    #[arg(long, global = true, default_value_t = 1000)]
    pub partition_size: usize,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the catalogues the store holds
    List,

    /// Drop membership links whose dataset graphs no longer exist
    Repair {
        /// Catalogue identifier
        catalogue: String,
    },

    /// Re-align the search index with the store for one catalogue
    Sync {
        /// Catalogue identifier
        catalogue: String,
    },

    /// Re-run the validation pipeline for every dataset of a catalogue
    Launch {
        /// Catalogue identifier
        catalogue: String,
    },

    /// Delete every member dataset of a catalogue
    Clear {
        /// Catalogue identifier
        catalogue: String,

        /// Required flag to confirm deletion
        #[arg(long)]
        force: bool,

        /// Leave the search index entries in place
        #[arg(long)]
        keep_index: bool,
    },
}
