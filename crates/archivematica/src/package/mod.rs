//! Storage Service package operations.
//!
//! Packages are AIPs, DIPs, transfers and the other units the Storage
//! Service tracks under `/api/v2/file/`.

mod download;
mod matching;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::Result;
use crate::error::{Error, InvalidInputError};
use crate::http::body;
use crate::http::{ApiClient, assert_response_code};
use crate::listing::{self, PaginatedListing};
use crate::record::Record;
use crate::types::{PackageType, ReingestType, ResourceKind, resource_uri};

pub use download::{CHUNK_SIZE, content_type_to_extension, disposition_filename, download_filename};
pub use matching::{dip_matches_aip, dips_for_aip, map_aips_to_dips};

/// Request body for creating a package from an existing one.
#[derive(Debug, Serialize)]
struct NewPackageRequest<'a> {
    uuid: &'a str,
    origin_location: Value,
    origin_path: Value,
    origin_pipeline: Value,
    size: Value,
    package_type: PackageType,
    current_location: String,
    current_path: &'a str,
    related_packages: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ReingestRequest<'a> {
    pipeline: &'a str,
    reingest_type: ReingestType,
    processing_config: &'a str,
}

#[derive(Debug, Serialize)]
struct DeleteRequest<'a> {
    pipeline: &'a str,
    event_reason: &'a str,
    user_id: i64,
    user_email: &'a str,
}

/// Package operations.
#[derive(Debug, Clone)]
pub struct Package {
    api: ApiClient,
}

impl Package {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Every package of every type.
    pub async fn get_all(&self) -> Result<PaginatedListing> {
        self.fetch_all(None).await
    }

    pub async fn get_all_aips(&self) -> Result<PaginatedListing> {
        self.fetch_all(Some(PackageType::Aip)).await
    }

    pub async fn get_all_dips(&self) -> Result<PaginatedListing> {
        self.fetch_all(Some(PackageType::Dip)).await
    }

    /// Every package, optionally limited to AIPs or DIPs.
    ///
    /// Any other package type is rejected before a request is made.
    #[instrument(skip(self))]
    pub async fn fetch_all(&self, package_type: Option<PackageType>) -> Result<PaginatedListing> {
        let mut params = Vec::new();
        if let Some(package_type) = package_type {
            if !matches!(package_type, PackageType::Aip | PackageType::Dip) {
                return Err(InvalidInputError::ListingFilter {
                    value: package_type.to_string(),
                }
                .into());
            }
            params.push(("package_type".to_string(), package_type.to_string()));
        }

        listing::fetch_all(
            &self.api,
            "/api/v2/file/",
            &params,
            "Unable to get all package details",
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn details(&self, uuid: &str) -> Result<Record> {
        let failure = format!("Unable to GET details of package {}", uuid);
        let value = self
            .api
            .send_json(
                self.api.get(&format!("/api/v2/file/{}/", uuid)),
                StatusCode::OK,
                &failure,
            )
            .await?;
        body::into_record(value, &failure)
    }

    /// Register a copy of an existing package at a new location.
    ///
    /// The origin fields are read from the existing package's details.
    #[instrument(skip(self))]
    pub async fn create_from_existing(
        &self,
        new_uuid: &str,
        old_uuid: &str,
        new_location: &str,
        new_relative_path: &str,
        package_type: PackageType,
        related_package: Option<&str>,
    ) -> Result<Record> {
        if new_uuid == old_uuid {
            return Err(InvalidInputError::DuplicateUuid {
                uuid: old_uuid.to_string(),
            }
            .into());
        }

        let existing = self.details(old_uuid).await?;
        let field = |key: &str| existing.get(key).cloned().unwrap_or(Value::Null);

        let request = NewPackageRequest {
            uuid: new_uuid,
            origin_location: field("current_location"),
            origin_path: field("current_path"),
            origin_pipeline: field("origin_pipeline"),
            size: field("size"),
            package_type,
            current_location: resource_uri(ResourceKind::Location, new_location),
            current_path: new_relative_path,
            related_packages: related_package
                .map(|uuid| vec![resource_uri(ResourceKind::Package, uuid)])
                .unwrap_or_default(),
        };

        let failure = format!(
            "Unable to create new package from existing package ({})",
            old_uuid
        );
        let value = self
            .api
            .send_json(
                self.api.post("/api/v2/file/").json(&request),
                StatusCode::CREATED,
                &failure,
            )
            .await?;
        body::into_record(value, &failure)
    }

    /// Ask the Storage Service to reingest an AIP, returning the reingest UUID.
    #[instrument(skip(self))]
    pub async fn reingest(
        &self,
        uuid: &str,
        pipeline_uuid: &str,
        reingest_type: ReingestType,
        processing_config: &str,
    ) -> Result<String> {
        let request = ReingestRequest {
            pipeline: pipeline_uuid,
            reingest_type,
            processing_config,
        };

        let failure = format!("Unable to initiate reingest of AIP {}", uuid);
        let value = self
            .api
            .send_json(
                self.api
                    .post(&format!("/api/v2/file/{}/reingest/", uuid))
                    .json(&request),
                StatusCode::ACCEPTED,
                &failure,
            )
            .await?;
        body::require_string(&value, "reingest_uuid", &failure)
    }

    /// Request deletion of a package, returning the deletion request id.
    #[instrument(skip(self, user_email))]
    pub async fn delete(
        &self,
        uuid: &str,
        pipeline_uuid: &str,
        reason: &str,
        user_id: i64,
        user_email: &str,
    ) -> Result<i64> {
        if user_id < 1 {
            return Err(InvalidInputError::UserId { value: user_id }.into());
        }

        let request = DeleteRequest {
            pipeline: pipeline_uuid,
            event_reason: reason,
            user_id,
            user_email,
        };

        let failure = format!("Unable to delete package {}", uuid);
        let value = self
            .api
            .send_json(
                self.api
                    .post(&format!("/api/v2/file/{}/delete_aip/", uuid))
                    .json(&request),
                StatusCode::ACCEPTED,
                &failure,
            )
            .await?;

        body::require_string(&value, "id", &failure)?
            .parse()
            .map_err(|_| Error::request(None, failure))
    }

    /// Map every AIP UUID to the UUIDs of the DIPs generated from it.
    #[instrument(skip(self))]
    pub async fn map_aips_to_dips(&self) -> Result<BTreeMap<String, Vec<String>>> {
        let dips = self.get_all_dips().await?;
        let aips = self.get_all_aips().await?;
        Ok(map_aips_to_dips(&aips.objects, &dips.objects))
    }

    /// The DIPs generated from one AIP.
    #[instrument(skip(self))]
    pub async fn dips_for_aip(&self, aip_uuid: &str) -> Result<Vec<Record>> {
        let dips = self.get_all_dips().await?;
        Ok(dips_for_aip(&dips.objects, aip_uuid))
    }

    /// UUIDs of the DIPs generated from one AIP.
    pub async fn dip_uuids_for_aip(&self, aip_uuid: &str) -> Result<Vec<String>> {
        Ok(self
            .dips_for_aip(aip_uuid)
            .await?
            .iter()
            .filter_map(|dip| dip.uuid().map(str::to_string))
            .collect())
    }

    /// Download a package into `directory` and return the written path.
    ///
    /// `directory` must exist, be a directory and be writable; this is
    /// checked before the request is sent. The body is written to a staging
    /// file in `directory` and renamed once complete, so a failed download
    /// leaves nothing behind. The filename comes from [`download_filename`].
    /// An existing file with that name is replaced.
    #[instrument(skip(self, directory), fields(dest = %directory.as_ref().display()))]
    pub async fn download(&self, uuid: &str, directory: impl AsRef<Path>) -> Result<PathBuf> {
        let directory = directory.as_ref();
        let staging = download::stage_in(directory).await?;

        let response = self
            .api
            .send(self.api.get(&format!("/api/v2/file/{}/download/", uuid)))
            .await?;
        let response = assert_response_code(
            response,
            StatusCode::OK,
            &format!("Unable to download package {}", uuid),
        )
        .await?;

        let filename = download_filename(&response, uuid);
        let path = download::destination(directory, &filename);
        debug!(path = %path.display(), "saving package");

        let written = download::save_response(response, staging, &path).await?;
        info!(path = %path.display(), bytes = written, "package downloaded");
        Ok(path)
    }
}
