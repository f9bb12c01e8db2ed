//! Ingest subcommands.

use anyhow::{Context, Result};
use archivematica::Archivematica;
use clap::{Args, Subcommand};

use super::{UnitSubcommand, run_unit};
use crate::output;

#[derive(Args, Debug)]
pub struct IngestCommand {
    #[command(subcommand)]
    pub command: IngestSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum IngestSubcommand {
    /// List units waiting for a decision
    Waiting {
        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Copy metadata files into a SIP
    AddMetadata {
        /// SIP UUID
        sip_uuid: String,

        /// Source as LOCATION_UUID:RELATIVE_PATH (repeatable)
        #[arg(long = "path", required = true)]
        source_paths: Vec<String>,
    },

    #[command(flatten)]
    Unit(UnitSubcommand),
}

pub async fn handle(client: &Archivematica, cmd: IngestCommand) -> Result<()> {
    let ingest = client.ingest();
    match cmd.command {
        IngestSubcommand::Waiting { pretty } => {
            let waiting = ingest
                .list_waiting()
                .await
                .context("Failed to list waiting units")?;
            if waiting.is_empty() {
                output::note("No units waiting.");
            }
            for record in &waiting {
                output::value(record, pretty)?;
            }
        }
        IngestSubcommand::AddMetadata {
            sip_uuid,
            source_paths,
        } => {
            ingest
                .add_metadata(&sip_uuid, &source_paths)
                .await
                .context("Failed to add metadata")?;
            output::success(&format!("Metadata added to {}", sip_uuid));
        }
        IngestSubcommand::Unit(cmd) => run_unit(ingest, cmd).await?,
    }
    Ok(())
}
