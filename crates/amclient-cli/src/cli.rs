//! CLI argument definitions.

use std::fmt;

use anyhow::{Context, Result};
use archivematica::Archivematica;
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use crate::commands::ProcessingConfigArgs;
use crate::commands::ingest::IngestCommand;
use crate::commands::package::PackageCommand;
use crate::commands::storage::{LocationCommand, PipelineCommand, SpaceCommand};
use crate::commands::transfer::TransferCommand;

/// Archivematica and Storage Service client.
#[derive(Parser, Debug)]
#[command(name = "amclient")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub service: ServiceArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the two services live and how to authenticate against them.
#[derive(Args)]
pub struct ServiceArgs {
    /// Archivematica dashboard URL
    #[arg(long, env = "AM_URL", default_value = "http://127.0.0.1:62080", global = true)]
    pub am_url: String,

    /// Storage Service URL
    #[arg(long, env = "SS_URL", default_value = "http://127.0.0.1:62081", global = true)]
    pub ss_url: String,

    /// Archivematica API user
    #[arg(long, env = "AM_USER", default_value = "", global = true)]
    pub am_user: String,

    /// Archivematica API key
    #[arg(long, env = "AM_API_KEY", default_value = "", hide_env_values = true, global = true)]
    pub am_key: String,

    /// Storage Service API user
    #[arg(long, env = "SS_USER", default_value = "", global = true)]
    pub ss_user: String,

    /// Storage Service API key
    #[arg(long, env = "SS_API_KEY", default_value = "", hide_env_values = true, global = true)]
    pub ss_key: String,
}

impl ServiceArgs {
    /// Build a client with both credential pairs applied.
    pub fn connect(&self) -> Result<Archivematica> {
        let client = Archivematica::new(&self.am_url, &self.ss_url)
            .context("Invalid service URL")?;
        client
            .set_am_credentials(&self.am_user, &self.am_key)
            .set_ss_credentials(&self.ss_user, &self.ss_key);
        debug!(am = %client.am_url(), ss = %client.ss_url(), "client configured");
        Ok(client)
    }
}

impl fmt::Debug for ServiceArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceArgs")
            .field("am_url", &self.am_url)
            .field("ss_url", &self.ss_url)
            .field("am_user", &self.am_user)
            .field("am_key", &"[REDACTED]")
            .field("ss_user", &self.ss_user)
            .field("ss_key", &"[REDACTED]")
            .finish()
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transfers on the dashboard
    Transfer(TransferCommand),

    /// Ingests (SIPs) on the dashboard
    Ingest(IngestCommand),

    /// Packages held by the Storage Service
    Package(PackageCommand),

    /// Storage Service locations
    Location(LocationCommand),

    /// Storage Service spaces
    Space(SpaceCommand),

    /// Pipelines registered with the Storage Service
    Pipeline(PipelineCommand),

    /// Print a processing configuration as XML
    ProcessingConfig(ProcessingConfigArgs),
}
