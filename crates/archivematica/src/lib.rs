//! archivematica - client library for Archivematica and its Storage Service
//!
//! The [`Archivematica`] facade talks to two services: the dashboard, which
//! runs transfers and ingests, and the Storage Service, which holds packages,
//! locations, spaces and pipelines. Each service has its own base URL and
//! its own API key.
//!
//! # Example
//!
//! ```no_run
//! use archivematica::{Archivematica, Operation};
//!
//! # async fn example() -> Result<(), archivematica::Error> {
//! let am = Archivematica::new("http://localhost:62080", "http://localhost:62081")?;
//! am.set_am_credentials("test", "test")
//!     .set_ss_credentials("test", "test");
//!
//! let report = am.transfer().close_completed().await?;
//! println!("closed {} transfers", report.close_succeeded.len());
//!
//! for (aip, dips) in am.package().map_aips_to_dips().await? {
//!     println!("{}: {:?}", aip, dips);
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod filter;
pub mod http;
pub mod ingest;
pub mod listing;
pub mod operation;
pub mod package;
pub mod record;
pub mod storage;
pub mod transfer;
pub mod types;

pub use auth::Credentials;
pub use client::Archivematica;
pub use error::Error;
pub use filter::DjangoFilter;
pub use ingest::Ingest;
pub use listing::PaginatedListing;
pub use operation::{CloseCompletedReport, Operation, UnitKind};
pub use package::Package;
pub use record::Record;
pub use storage::{BrowseResult, Location, MoveFile, NewPipeline, Pipeline, Space, SpaceType};
pub use transfer::{Transfer, TransferPath};
pub use types::{
    LocationPurpose, PackageType, ReingestType, ResourceKind, ServiceUrl, TransferType,
    resource_uri,
};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
