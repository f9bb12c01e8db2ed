//! Storage Service locations.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::Result;
use crate::error::Error;
use crate::http::ApiClient;
use crate::http::body;
use crate::listing::{self, PaginatedListing};
use crate::record::Record;
use crate::types::{LocationPurpose, ResourceKind, resource_uri};

/// A decoded location listing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BrowseResult {
    pub directories: Vec<String>,
    pub entries: Vec<String>,
    /// Per-entry properties keyed by entry name.
    pub properties: Map<String, Value>,
}

impl BrowseResult {
    /// Decode a browse response. Directory names, entry names and property
    /// keys arrive base64 encoded; property values are kept as they are.
    pub fn from_response(value: &Value) -> Result<Self> {
        let decode_all = |key: &str| -> Result<Vec<String>> {
            value
                .get(key)
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .map(|item| decode_name(item.as_str().unwrap_or_default()))
                        .collect()
                })
                .unwrap_or_else(|| Ok(Vec::new()))
        };

        let directories = decode_all("directories")?;
        let entries = decode_all("entries")?;

        let mut properties = Map::new();
        if let Some(props) = value.get("properties").and_then(Value::as_object) {
            for (key, prop) in props {
                properties.insert(decode_name(key)?, prop.clone());
            }
        }

        Ok(Self {
            directories,
            entries,
            properties,
        })
    }
}

/// A file to copy between locations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveFile {
    pub source: String,
    pub destination: String,
}

impl MoveFile {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct NewLocationRequest<'a> {
    description: &'a str,
    pipeline: Vec<String>,
    space: String,
    default: bool,
    purpose: LocationPurpose,
    relative_path: &'a str,
}

#[derive(Debug, Serialize)]
struct MoveRequest<'a> {
    origin_location: String,
    pipeline: String,
    files: &'a [MoveFile],
}

/// Location operations.
#[derive(Debug, Clone)]
pub struct Location {
    api: ApiClient,
}

impl Location {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Every location.
    pub async fn get_all(&self) -> Result<PaginatedListing> {
        listing::fetch_all(&self.api, "/api/v2/location/", &[], "Failed to get all locations").await
    }

    /// Create a location in `space` for `pipeline`.
    ///
    /// `pipeline` and `space` may be UUIDs or resource URIs.
    #[instrument(skip(self))]
    pub async fn create(
        &self,
        description: &str,
        pipeline: &str,
        space: &str,
        default: bool,
        purpose: LocationPurpose,
        relative_path: &str,
    ) -> Result<Record> {
        let request = NewLocationRequest {
            description,
            pipeline: vec![resource_uri(ResourceKind::Pipeline, pipeline)],
            space: resource_uri(ResourceKind::Space, space),
            default,
            purpose,
            relative_path,
        };

        let failure = "Failure to create new location";
        let value = self
            .api
            .send_json(
                self.api.post("/api/v2/location/").json(&request),
                StatusCode::CREATED,
                failure,
            )
            .await?;
        body::into_record(value, failure)
    }

    #[instrument(skip(self))]
    pub async fn details(&self, uuid: &str) -> Result<Record> {
        let failure = format!("Failed to get location details ({})", uuid);
        let value = self
            .api
            .send_json(
                self.api.get(&format!("/api/v2/location/{}/", uuid)),
                StatusCode::OK,
                &failure,
            )
            .await?;
        body::into_record(value, &failure)
    }

    /// Copy `files` from `origin_location` into the location `uuid`. Both
    /// locations must be attached to `pipeline`.
    #[instrument(skip(self, files), fields(file_count = files.len()))]
    pub async fn move_to(
        &self,
        uuid: &str,
        origin_location: &str,
        pipeline: &str,
        files: &[MoveFile],
    ) -> Result<()> {
        let request = MoveRequest {
            origin_location: resource_uri(ResourceKind::Location, origin_location),
            pipeline: resource_uri(ResourceKind::Pipeline, pipeline),
            files,
        };

        self.api
            .send_json(
                self.api
                    .post(&format!("/api/v2/location/{}/", uuid))
                    .json(&request),
                StatusCode::NO_CONTENT,
                &format!(
                    "Failure to move files from {} to {} on pipeline {}",
                    origin_location, uuid, pipeline
                ),
            )
            .await?;
        Ok(())
    }

    /// List a directory inside a location. An empty `path` lists its root.
    #[instrument(skip(self))]
    pub async fn browse_path(&self, uuid: &str, path: &str) -> Result<BrowseResult> {
        let mut request = self.api.get(&format!("/api/v2/location/{}/browse/", uuid));
        if !path.is_empty() {
            request = request.query(&[("path", BASE64.encode(path))]);
        }

        let value = self
            .api
            .send_json(request, StatusCode::OK, &format!("Failed to browse location ({})", uuid))
            .await?;

        let result = BrowseResult::from_response(&value)?;
        debug!(
            directories = result.directories.len(),
            entries = result.entries.len(),
            "browsed location"
        );
        Ok(result)
    }
}

fn decode_name(encoded: &str) -> Result<String> {
    let bytes = BASE64.decode(encoded.trim()).map_err(|e| {
        Error::request(
            None,
            format!("Browse response contained an invalid name '{}': {}", encoded, e),
        )
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
