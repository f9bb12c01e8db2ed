//! Ingest operations against the Archivematica dashboard.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::StatusCode;
use tracing::{debug, instrument};

use crate::Result;
use crate::http::ApiClient;
use crate::http::body;
use crate::operation::{self, Operation, UnitKind};
use crate::record::Record;

#[derive(Debug, Clone)]
pub struct Ingest {
    api: ApiClient,
}

impl Ingest {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Units waiting for a user decision.
    ///
    /// Returns an empty list when the dashboard does not report success.
    #[instrument(skip(self))]
    pub async fn list_waiting(&self) -> Result<Vec<Record>> {
        let value = self
            .api
            .send_json(
                self.api.get("/api/ingest/waiting"),
                StatusCode::OK,
                "Failed to get waiting ingests",
            )
            .await?;

        if !body::message_is(&value, "Fetched units successfully.") {
            debug!("waiting ingests response did not report success");
            return Ok(Vec::new());
        }
        Ok(value.get("results").map(body::records).unwrap_or_default())
    }

    /// Copy metadata files into a SIP. `source_paths` are sent base64 encoded.
    #[instrument(skip(self, source_paths), fields(path_count = source_paths.len()))]
    pub async fn add_metadata(&self, sip_uuid: &str, source_paths: &[String]) -> Result<()> {
        let mut form: Vec<(&str, String)> = vec![("sip_uuid", sip_uuid.to_string())];
        form.extend(
            source_paths
                .iter()
                .map(|p| ("source_paths[]", BASE64.encode(p))),
        );

        self.api
            .send_json(
                self.api.post("/api/ingest/copy_metadata_files/").form(&form),
                StatusCode::NO_CONTENT,
                &format!("Unable to add metadata to ingest {}", sip_uuid),
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Operation for Ingest {
    fn unit(&self) -> UnitKind {
        UnitKind::Ingest
    }

    async fn completed(&self) -> Result<Vec<String>> {
        operation::completed(&self.api, UnitKind::Ingest).await
    }

    async fn status(&self, uuid: &str) -> Result<Record> {
        operation::status(&self.api, UnitKind::Ingest, uuid).await
    }

    async fn delete(&self, uuid: &str) -> Result<()> {
        operation::delete(&self.api, UnitKind::Ingest, uuid).await
    }
}
