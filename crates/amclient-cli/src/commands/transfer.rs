//! Transfer subcommands.

use anyhow::{Context, Result};
use archivematica::{Archivematica, TransferPath, TransferType};
use clap::{Args, Subcommand};

use super::{UnitSubcommand, run_unit};
use crate::output;

#[derive(Args, Debug)]
pub struct TransferCommand {
    #[command(subcommand)]
    pub command: TransferSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum TransferSubcommand {
    /// Start a transfer from one or more transfer source paths
    Start(StartArgs),

    /// List transfers waiting for approval
    Unapproved {
        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Approve a transfer waiting in a directory
    Approve {
        /// Directory name shown by `unapproved`
        directory: String,

        /// Transfer type
        #[arg(long = "type", default_value = "standard")]
        transfer_type: TransferType,
    },

    /// Start a partial reingest of an AIP
    Reingest {
        /// AIP name
        name: String,

        /// AIP UUID
        uuid: String,
    },

    #[command(flatten)]
    Unit(UnitSubcommand),
}

#[derive(Args, Debug)]
pub struct StartArgs {
    /// Transfer name
    pub name: String,

    /// Source as LOCATION_UUID:RELATIVE_PATH (repeatable)
    #[arg(long = "path", required = true)]
    pub paths: Vec<TransferPath>,

    /// Transfer type
    #[arg(long = "type", default_value = "standard")]
    pub transfer_type: TransferType,

    /// Accession number
    #[arg(long, default_value = "")]
    pub accession: String,

    /// Access system row id (repeatable)
    #[arg(long = "row-id")]
    pub row_ids: Vec<String>,
}

pub async fn handle(client: &Archivematica, cmd: TransferCommand) -> Result<()> {
    let transfer = client.transfer();
    match cmd.command {
        TransferSubcommand::Start(args) => {
            let path = transfer
                .start(
                    &args.name,
                    args.transfer_type,
                    &args.accession,
                    &args.paths,
                    &args.row_ids,
                )
                .await
                .context("Failed to start transfer")?;
            output::success("Transfer started");
            output::field("Path", &path);
        }
        TransferSubcommand::Unapproved { pretty } => {
            let waiting = transfer
                .unapproved()
                .await
                .context("Failed to list unapproved transfers")?;
            if waiting.is_empty() {
                output::note("No transfers waiting for approval.");
            }
            for record in &waiting {
                output::value(record, pretty)?;
            }
        }
        TransferSubcommand::Approve {
            directory,
            transfer_type,
        } => {
            let uuid = transfer
                .approve(&directory, transfer_type)
                .await
                .context("Failed to approve transfer")?;
            output::success("Transfer approved");
            output::field("UUID", &uuid);
        }
        TransferSubcommand::Reingest { name, uuid } => {
            let reingest_uuid = transfer
                .reingest(&name, &uuid)
                .await
                .context("Failed to start reingest")?;
            output::success("Reingest started");
            output::field("Reingest UUID", &reingest_uuid);
        }
        TransferSubcommand::Unit(cmd) => run_unit(transfer, cmd).await?,
    }
    Ok(())
}
