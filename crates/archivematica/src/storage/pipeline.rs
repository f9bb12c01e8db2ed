//! Pipelines registered with the Storage Service.

use std::fmt;

use reqwest::StatusCode;
use serde::Serialize;
use tracing::instrument;

use crate::Result;
use crate::filter::DjangoFilter;
use crate::http::ApiClient;
use crate::http::body;
use crate::listing::{self, PaginatedListing};
use crate::record::Record;

/// A pipeline to register.
///
/// `shared_path` is only sent when `create_default_locations` is set, and
/// neither it nor `remote_name` is sent when empty.
#[derive(Clone, Default, Serialize)]
pub struct NewPipeline {
    pub uuid: String,
    pub description: String,
    pub api_username: String,
    pub api_key: String,
    pub create_default_locations: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_name: Option<String>,
}

impl NewPipeline {
    pub fn new(uuid: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    /// The dashboard user and key the Storage Service calls back with.
    pub fn with_api_credentials(mut self, username: impl Into<String>, key: impl Into<String>) -> Self {
        self.api_username = username.into();
        self.api_key = key.into();
        self
    }

    /// Create the default locations, optionally under `shared_path`.
    pub fn with_default_locations(mut self, shared_path: impl Into<String>) -> Self {
        self.create_default_locations = true;
        self.shared_path = Some(shared_path.into()).filter(|p| !p.is_empty());
        self
    }

    pub fn with_remote_name(mut self, remote_name: impl Into<String>) -> Self {
        self.remote_name = Some(remote_name.into()).filter(|n| !n.is_empty());
        self
    }

    fn normalized(&self) -> Self {
        let mut pipeline = self.clone();
        if !pipeline.create_default_locations {
            pipeline.shared_path = None;
        }
        pipeline.shared_path = pipeline.shared_path.filter(|p| !p.is_empty());
        pipeline.remote_name = pipeline.remote_name.filter(|n| !n.is_empty());
        pipeline
    }
}

impl fmt::Debug for NewPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewPipeline")
            .field("uuid", &self.uuid)
            .field("description", &self.description)
            .field("api_username", &self.api_username)
            .field("api_key", &"[REDACTED]")
            .field("create_default_locations", &self.create_default_locations)
            .field("shared_path", &self.shared_path)
            .field("remote_name", &self.remote_name)
            .finish()
    }
}

/// Pipeline operations.
#[derive(Debug, Clone)]
pub struct Pipeline {
    api: ApiClient,
}

impl Pipeline {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Every pipeline.
    pub async fn get_all(&self) -> Result<PaginatedListing> {
        self.list(None, "Request to get all pipelines failed.").await
    }

    /// Pipelines whose description equals, or with `exact` false starts
    /// with, `description`.
    #[instrument(skip(self))]
    pub async fn get_by_description(&self, description: &str, exact: bool) -> Result<PaginatedListing> {
        let mut filter = DjangoFilter::new("description", description);
        if !exact {
            filter = filter.starts_with();
        }
        self.list(
            Some(filter),
            &format!("Request to get pipeline by description ({}) failed", description),
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_by_uuid(&self, uuid: &str) -> Result<Record> {
        let failure = format!("Failed to get Pipeline by UUID ({})", uuid);
        let value = self
            .api
            .send_json(
                self.api.get(&format!("/api/v2/pipeline/{}/", uuid)),
                StatusCode::OK,
                &failure,
            )
            .await?;
        body::into_record(value, &failure)
    }

    /// Register a pipeline.
    #[instrument(skip(self, pipeline), fields(uuid = %pipeline.uuid))]
    pub async fn create(&self, pipeline: &NewPipeline) -> Result<Record> {
        let request = pipeline.normalized();

        let failure = format!("Failed to create new pipeline with UUID ({})", pipeline.uuid);
        let value = self
            .api
            .send_json(
                self.api.post("/api/v2/pipeline/").json(&request),
                StatusCode::CREATED,
                &failure,
            )
            .await?;
        body::into_record(value, &failure)
    }

    async fn list(&self, filter: Option<DjangoFilter>, context: &str) -> Result<PaginatedListing> {
        let params: Vec<(String, String)> = filter.iter().map(DjangoFilter::query_pair).collect();
        listing::fetch_all(&self.api, "/api/v2/pipeline/", &params, context).await
    }
}
