//! Storage Service spaces.

use reqwest::StatusCode;
use serde_json::{Map, Value};
use tracing::instrument;

use crate::Result;
use crate::filter::DjangoFilter;
use crate::http::ApiClient;
use crate::http::body;
use crate::listing::{self, PaginatedListing};
use crate::record::Record;

use super::space_type::SpaceType;

/// Space operations.
#[derive(Debug, Clone)]
pub struct Space {
    api: ApiClient,
}

impl Space {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Every space.
    pub async fn get_all(&self) -> Result<PaginatedListing> {
        self.get_all_filtered(&[]).await
    }

    /// Spaces matching every filter.
    #[instrument(skip(self, filters), fields(filter_count = filters.len()))]
    pub async fn get_all_filtered(&self, filters: &[DjangoFilter]) -> Result<PaginatedListing> {
        let params: Vec<(String, String)> = filters.iter().map(DjangoFilter::query_pair).collect();
        listing::fetch_all(&self.api, "/api/v2/space/", &params, "Failed to get spaces").await
    }

    #[instrument(skip(self))]
    pub async fn details(&self, uuid: &str) -> Result<Record> {
        let failure = format!("Failed to get details about space ({})", uuid);
        let value = self
            .api
            .send_json(
                self.api.get(&format!("/api/v2/space/{}/", uuid)),
                StatusCode::OK,
                &failure,
            )
            .await?;
        body::into_record(value, &failure)
    }

    /// List a path inside a space.
    ///
    /// Unlike location browsing, the path is sent and returned as-is.
    #[instrument(skip(self))]
    pub async fn browse(&self, uuid: &str, path: &str) -> Result<Value> {
        let mut request = self.api.get(&format!("/api/v2/space/{}/browse/", uuid));
        if !path.is_empty() {
            request = request.query(&[("path", path)]);
        }

        self.api
            .send_json(
                request,
                StatusCode::OK,
                &format!("Request to browse space ({}) failed.", uuid),
            )
            .await
    }

    /// Create a space. `fields` are checked against `space_type` before any
    /// request is made; see [`SpaceType::payload`].
    #[instrument(skip(self, fields))]
    pub async fn create(&self, space_type: SpaceType, fields: &Map<String, Value>) -> Result<Record> {
        let payload = space_type.payload(fields)?;

        let failure = format!("Failed to create space of type ({})", space_type.display_name());
        let value = self
            .api
            .send_json(
                self.api.post("/api/v2/space/").json(&payload),
                StatusCode::CREATED,
                &failure,
            )
            .await?;
        body::into_record(value, &failure)
    }
}
