//! amclient - command line client for an Archivematica dashboard and its
//! Storage Service.
//!
//! Every subcommand maps onto one call of the `archivematica` library.
//! Service URLs and API keys come from global flags or their environment
//! variables; logs go to stderr so stdout stays machine readable.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use commands::{ingest, package, storage, transfer};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let client = cli.service.connect()?;

    match cli.command {
        Commands::Transfer(cmd) => transfer::handle(&client, cmd).await,
        Commands::Ingest(cmd) => ingest::handle(&client, cmd).await,
        Commands::Package(cmd) => package::handle(&client, cmd).await,
        Commands::Location(cmd) => storage::location(&client, cmd).await,
        Commands::Space(cmd) => storage::space(&client, cmd).await,
        Commands::Pipeline(cmd) => storage::pipeline(&client, cmd).await,
        Commands::ProcessingConfig(args) => commands::processing_config(&client, args).await,
    }
}

/// Library events are named `archivematica`; `-v` raises only those, while
/// `RUST_LOG` overrides everything.
fn init_logging(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(cli.verbose)));

    let layer = fmt::layer().with_writer(std::io::stderr);
    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.json().with_current_span(false))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.with_target(cli.verbose > 1))
            .init();
    }
}

fn default_directives(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "warn,archivematica=info",
        2 => "warn,archivematica=debug,amclient=debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_library_level_first() {
        assert_eq!(default_directives(0), "warn");
        assert!(default_directives(1).contains("archivematica=info"));
        assert!(!default_directives(1).contains("amclient="));
        assert!(default_directives(2).contains("amclient=debug"));
        assert_eq!(default_directives(5), "trace");
    }

    #[test]
    fn default_directives_parse() {
        for verbose in 0..4 {
            assert!(EnvFilter::try_new(default_directives(verbose)).is_ok());
        }
    }
}
