//! Subcommand implementations.

pub mod ingest;
pub mod package;
pub mod storage;
pub mod transfer;

use anyhow::{Context, Result};
use archivematica::{Archivematica, Operation};
use clap::{Args, Subcommand};

use crate::output;

#[derive(Args, Debug)]
pub struct ProcessingConfigArgs {
    /// Configuration name
    #[arg(default_value = "default")]
    pub name: String,
}

pub async fn processing_config(client: &Archivematica, args: ProcessingConfigArgs) -> Result<()> {
    let xml = client
        .processing_config(&args.name)
        .await
        .context("Failed to fetch processing configuration")?;
    println!("{}", xml);
    Ok(())
}

/// Subcommands every unit kind supports.
#[derive(Subcommand, Debug)]
pub enum UnitSubcommand {
    /// List completed units
    Completed,

    /// Show the status of one unit
    Status {
        /// Unit UUID
        uuid: String,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Hide a unit from the dashboard
    Delete {
        /// Unit UUID
        uuid: String,
    },

    /// Hide every completed unit
    CloseCompleted,
}

pub async fn run_unit(op: &dyn Operation, cmd: UnitSubcommand) -> Result<()> {
    let unit = op.unit();
    match cmd {
        UnitSubcommand::Completed => {
            let uuids = op
                .completed()
                .await
                .with_context(|| format!("Failed to list completed {}s", unit))?;
            if uuids.is_empty() {
                output::note(&format!("No completed {}s.", unit));
            }
            for uuid in uuids {
                println!("{}", uuid);
            }
        }
        UnitSubcommand::Status { uuid, pretty } => {
            let status = op
                .status(&uuid)
                .await
                .with_context(|| format!("Failed to get status of {} {}", unit, uuid))?;
            output::value(&status, pretty)?;
        }
        UnitSubcommand::Delete { uuid } => {
            op.delete(&uuid)
                .await
                .with_context(|| format!("Failed to hide {} {}", unit, uuid))?;
            output::success(&format!("Hid {} {}", unit, uuid));
        }
        UnitSubcommand::CloseCompleted => {
            let report = op
                .close_completed()
                .await
                .with_context(|| format!("Failed to close completed {}s", unit))?;
            output::close_report(&report);
        }
    }
    Ok(())
}
