//! Location, space and pipeline subcommands.

use anyhow::{Context, Result};
use archivematica::{Archivematica, DjangoFilter, LocationPurpose, MoveFile, NewPipeline, SpaceType};
use clap::{Args, Subcommand};
use serde_json::{Map, Value};

use crate::output;

// ============================================================================
// Locations
// ============================================================================

#[derive(Args, Debug)]
pub struct LocationCommand {
    #[command(subcommand)]
    pub command: LocationSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum LocationSubcommand {
    /// List every location
    List,

    /// Show one location
    Details {
        /// Location UUID
        uuid: String,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// List a directory inside a location
    Browse {
        /// Location UUID
        uuid: String,

        /// Path inside the location (defaults to its root)
        #[arg(default_value = "")]
        path: String,
    },

    /// Create a location in a space
    Create {
        /// Description
        #[arg(long)]
        description: String,

        /// Pipeline UUID or URI
        #[arg(long)]
        pipeline: String,

        /// Space UUID or URI
        #[arg(long)]
        space: String,

        /// Purpose code (AR, AS, CP, DS, SD, SS, BL, TS, RP)
        #[arg(long)]
        purpose: LocationPurpose,

        /// Path relative to the space
        #[arg(long)]
        relative_path: String,

        /// Make this the default location for its purpose
        #[arg(long)]
        default: bool,
    },

    /// Copy files into a location from another one
    Move {
        /// Destination location UUID
        uuid: String,

        /// Origin location UUID
        #[arg(long)]
        origin: String,

        /// Pipeline UUID
        #[arg(long)]
        pipeline: String,

        /// File as SOURCE=DESTINATION (repeatable)
        #[arg(long = "file", required = true, value_parser = parse_move)]
        files: Vec<MoveFile>,
    },
}

pub async fn location(client: &Archivematica, cmd: LocationCommand) -> Result<()> {
    let location = client.location();
    match cmd.command {
        LocationSubcommand::List => {
            let listing = location.get_all().await.context("Failed to list locations")?;
            for record in &listing {
                output::line(record)?;
            }
        }
        LocationSubcommand::Details { uuid, pretty } => {
            let record = location
                .details(&uuid)
                .await
                .context("Failed to get location details")?;
            output::value(&record, pretty)?;
        }
        LocationSubcommand::Browse { uuid, path } => {
            let result = location
                .browse_path(&uuid, &path)
                .await
                .context("Failed to browse location")?;
            for entry in &result.entries {
                if result.directories.contains(entry) {
                    println!("{}/", entry);
                } else {
                    println!("{}", entry);
                }
            }
        }
        LocationSubcommand::Create {
            description,
            pipeline,
            space,
            purpose,
            relative_path,
            default,
        } => {
            let record = location
                .create(&description, &pipeline, &space, default, purpose, &relative_path)
                .await
                .context("Failed to create location")?;
            output::success("Location created");
            output::line(&record)?;
        }
        LocationSubcommand::Move {
            uuid,
            origin,
            pipeline,
            files,
        } => {
            location
                .move_to(&uuid, &origin, &pipeline, &files)
                .await
                .context("Failed to move files")?;
            output::success(&format!("Moved {} file(s)", files.len()));
        }
    }
    Ok(())
}

fn parse_move(s: &str) -> std::result::Result<MoveFile, String> {
    s.split_once('=')
        .map(|(source, destination)| MoveFile::new(source, destination))
        .ok_or_else(|| format!("expected SOURCE=DESTINATION, got '{}'", s))
}

// ============================================================================
// Spaces
// ============================================================================

#[derive(Args, Debug)]
pub struct SpaceCommand {
    #[command(subcommand)]
    pub command: SpaceSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum SpaceSubcommand {
    /// List spaces
    List {
        /// Filter as FIELD=VALUE (repeatable)
        #[arg(long = "filter", value_parser = parse_filter)]
        filters: Vec<DjangoFilter>,
    },

    /// Show one space
    Details {
        /// Space UUID
        uuid: String,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// List a path inside a space
    Browse {
        /// Space UUID
        uuid: String,

        /// Absolute path inside the space
        #[arg(default_value = "")]
        path: String,
    },

    /// Create a space
    Create {
        /// Space type, by name (e.g. DuraCloud) or code (e.g. DC)
        #[arg(long = "type")]
        space_type: SpaceType,

        /// Field as KEY=VALUE; VALUE is read as JSON when it parses (repeatable)
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, Value)>,
    },
}

pub async fn space(client: &Archivematica, cmd: SpaceCommand) -> Result<()> {
    let space = client.space();
    match cmd.command {
        SpaceSubcommand::List { filters } => {
            let listing = space
                .get_all_filtered(&filters)
                .await
                .context("Failed to list spaces")?;
            for record in &listing {
                output::line(record)?;
            }
        }
        SpaceSubcommand::Details { uuid, pretty } => {
            let record = space
                .details(&uuid)
                .await
                .context("Failed to get space details")?;
            output::value(&record, pretty)?;
        }
        SpaceSubcommand::Browse { uuid, path } => {
            let listing = space
                .browse(&uuid, &path)
                .await
                .context("Failed to browse space")?;
            output::value(&listing, true)?;
        }
        SpaceSubcommand::Create { space_type, fields } => {
            let fields: Map<String, Value> = fields.into_iter().collect();
            let record = space
                .create(space_type, &fields)
                .await
                .context("Failed to create space")?;
            output::success(&format!("{} space created", space_type.display_name()));
            output::line(&record)?;
        }
    }
    Ok(())
}

fn parse_field(s: &str) -> std::result::Result<(String, Value), String> {
    let (key, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

fn parse_filter(s: &str) -> std::result::Result<DjangoFilter, String> {
    s.split_once('=')
        .map(|(field, value)| DjangoFilter::new(field, value))
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{}'", s))
}

// ============================================================================
// Pipelines
// ============================================================================

#[derive(Args, Debug)]
pub struct PipelineCommand {
    #[command(subcommand)]
    pub command: PipelineSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PipelineSubcommand {
    /// List every pipeline
    List,

    /// Show one pipeline
    Details {
        /// Pipeline UUID
        uuid: String,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Find pipelines by description
    Find {
        /// Description, or its prefix without --exact
        description: String,

        /// Match the whole description
        #[arg(long)]
        exact: bool,
    },

    /// Register a pipeline
    Create {
        /// Pipeline UUID
        uuid: String,

        /// Description
        #[arg(long)]
        description: String,

        /// Dashboard API user the Storage Service calls back with
        #[arg(long, default_value = "")]
        api_user: String,

        /// Dashboard API key the Storage Service calls back with
        #[arg(long, default_value = "", hide_default_value = true)]
        api_key: String,

        /// Create the default locations under this shared path
        #[arg(long)]
        shared_path: Option<String>,

        /// Address the Storage Service reaches the pipeline at
        #[arg(long)]
        remote_name: Option<String>,
    },
}

pub async fn pipeline(client: &Archivematica, cmd: PipelineCommand) -> Result<()> {
    let pipeline = client.pipeline();
    match cmd.command {
        PipelineSubcommand::List => {
            let listing = pipeline.get_all().await.context("Failed to list pipelines")?;
            for record in &listing {
                output::line(record)?;
            }
        }
        PipelineSubcommand::Details { uuid, pretty } => {
            let record = pipeline
                .get_by_uuid(&uuid)
                .await
                .context("Failed to get pipeline")?;
            output::value(&record, pretty)?;
        }
        PipelineSubcommand::Find { description, exact } => {
            let listing = pipeline
                .get_by_description(&description, exact)
                .await
                .context("Failed to find pipelines")?;
            if listing.is_empty() {
                output::note("No matching pipelines.");
            }
            for record in &listing {
                output::line(record)?;
            }
        }
        PipelineSubcommand::Create {
            uuid,
            description,
            api_user,
            api_key,
            shared_path,
            remote_name,
        } => {
            let mut request = NewPipeline::new(uuid, description).with_api_credentials(api_user, api_key);
            if let Some(shared_path) = shared_path {
                request = request.with_default_locations(shared_path);
            }
            if let Some(remote_name) = remote_name {
                request = request.with_remote_name(remote_name);
            }

            let record = pipeline
                .create(&request)
                .await
                .context("Failed to register pipeline")?;
            output::success("Pipeline registered");
            output::line(&record)?;
        }
    }
    Ok(())
}
