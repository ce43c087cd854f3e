mod cli;
mod commands;
mod context;
mod error;
mod output;

use clap::Parser;
use cli::{Cli, Commands};
use error::exit_with_error;

fn init_tracing(cli: &Cli) {
    // CLI tracing policy:
    //   --quiet  → always "off"
    //   --verbose → "info" for hub crates, RUST_LOG honoured if set
    //   default  → "warn", so store trouble surfaces during long runs
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    } else {
        tracing_subscriber::EnvFilter::new("warn")
    };

    let ansi = !(cli.no_color || std::env::var_os("NO_COLOR").is_some());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(ansi)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    init_tracing(&cli);

    if let Err(e) = run(cli).await {
        exit_with_error(e);
    }
}

async fn run(cli: Cli) -> error::CliResult<()> {
    let ctx = context::build(&cli)?;

    match &cli.command {
        Commands::List => commands::list::run(&ctx, &cli.base_uri).await,

        Commands::Repair { catalogue } => {
            commands::repair::run(&ctx, catalogue, cli.quiet).await
        }

        Commands::Sync { catalogue } => commands::sync::run(&ctx, catalogue, cli.quiet).await,

        Commands::Launch { catalogue } => {
            commands::launch::run(&ctx, catalogue, cli.quiet).await
        }

        Commands::Clear {
            catalogue,
            force,
            keep_index,
        } => commands::clear::run(&ctx, catalogue, *force, *keep_index, cli.quiet).await,
    }
}
