//! Package subcommands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use archivematica::{Archivematica, PackageType, ReingestType};
use clap::{Args, Subcommand};

use crate::output;

#[derive(Args, Debug)]
pub struct PackageCommand {
    #[command(subcommand)]
    pub command: PackageSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PackageSubcommand {
    /// List packages, optionally only AIPs or DIPs
    List {
        /// AIP or DIP
        #[arg(long = "type")]
        package_type: Option<PackageType>,

        /// Print only UUIDs
        #[arg(long)]
        uuids: bool,
    },

    /// Show one package
    Details {
        /// Package UUID
        uuid: String,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Download a package into a directory
    Download {
        /// Package UUID
        uuid: String,

        /// Destination directory
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },

    /// List the DIPs generated from an AIP
    Dips {
        /// AIP UUID
        aip_uuid: String,
    },

    /// Map every AIP to its DIPs
    AipDipMap {
        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Register a copy of an existing package at another location
    Copy(CopyArgs),

    /// Send an AIP back through a pipeline
    Reingest {
        /// AIP UUID
        uuid: String,

        /// Pipeline UUID
        #[arg(long)]
        pipeline: String,

        /// FULL, OBJECTS or METADATA_ONLY
        #[arg(long = "type", default_value = "FULL")]
        reingest_type: ReingestType,

        /// Processing configuration name
        #[arg(long, default_value = "default")]
        processing_config: String,
    },

    /// Request deletion of a package
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct CopyArgs {
    /// UUID of the package to copy
    pub old_uuid: String,

    /// UUID for the new package
    pub new_uuid: String,

    /// Location to register the copy in
    #[arg(long)]
    pub location: String,

    /// Path of the copy inside the location
    #[arg(long)]
    pub path: String,

    /// Package type of the copy
    #[arg(long = "type", default_value = "AIP")]
    pub package_type: PackageType,

    /// Record the original as a related package
    #[arg(long)]
    pub related: bool,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Package UUID
    pub uuid: String,

    /// Pipeline UUID
    #[arg(long)]
    pub pipeline: String,

    /// Reason recorded with the request
    #[arg(long)]
    pub reason: String,

    /// Dashboard user id of the requester
    #[arg(long)]
    pub user_id: i64,

    /// Email of the requester
    #[arg(long)]
    pub user_email: String,
}

pub async fn handle(client: &Archivematica, cmd: PackageCommand) -> Result<()> {
    let package = client.package();
    match cmd.command {
        PackageSubcommand::List {
            package_type,
            uuids,
        } => {
            let listing = package
                .fetch_all(package_type)
                .await
                .context("Failed to list packages")?;
            output::note(&format!("{} packages", listing.total_count));
            for record in &listing {
                if uuids {
                    println!("{}", record.uuid().unwrap_or_default());
                } else {
                    output::line(record)?;
                }
            }
        }
        PackageSubcommand::Details { uuid, pretty } => {
            let record = package
                .details(&uuid)
                .await
                .context("Failed to get package details")?;
            output::value(&record, pretty)?;
        }
        PackageSubcommand::Download { uuid, dir } => {
            output::note(&format!("Downloading {}...", uuid));
            let path = package
                .download(&uuid, &dir)
                .await
                .context("Failed to download package")?;
            output::success("Package downloaded");
            output::field("Path", &path.display().to_string());
        }
        PackageSubcommand::Dips { aip_uuid } => {
            let dips = package
                .dip_uuids_for_aip(&aip_uuid)
                .await
                .context("Failed to list DIPs")?;
            if dips.is_empty() {
                output::note(&format!("No DIPs found for {}.", aip_uuid));
            }
            for uuid in dips {
                println!("{}", uuid);
            }
        }
        PackageSubcommand::AipDipMap { pretty } => {
            let mapping = package
                .map_aips_to_dips()
                .await
                .context("Failed to map AIPs to DIPs")?;
            output::value(&mapping, pretty)?;
        }
        PackageSubcommand::Copy(args) => {
            let related = args.related.then_some(args.old_uuid.as_str());
            let record = package
                .create_from_existing(
                    &args.new_uuid,
                    &args.old_uuid,
                    &args.location,
                    &args.path,
                    args.package_type,
                    related,
                )
                .await
                .context("Failed to register package copy")?;
            output::success("Package registered");
            output::line(&record)?;
        }
        PackageSubcommand::Reingest {
            uuid,
            pipeline,
            reingest_type,
            processing_config,
        } => {
            let reingest_uuid = package
                .reingest(&uuid, &pipeline, reingest_type, &processing_config)
                .await
                .context("Failed to start reingest")?;
            output::success("Reingest started");
            output::field("Reingest UUID", &reingest_uuid);
        }
        PackageSubcommand::Delete(args) => {
            let id = package
                .delete(
                    &args.uuid,
                    &args.pipeline,
                    &args.reason,
                    args.user_id,
                    &args.user_email,
                )
                .await
                .context("Failed to request deletion")?;
            output::success("Deletion requested");
            output::field("Request id", &id.to_string());
        }
    }
    Ok(())
}
