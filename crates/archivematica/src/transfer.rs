//! Transfer operations against the Archivematica dashboard.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::StatusCode;
use tracing::{debug, instrument};

use crate::Result;
use crate::error::{Error, InvalidInputError};
use crate::http::ApiClient;
use crate::http::body;
use crate::operation::{self, Operation, UnitKind};
use crate::record::Record;
use crate::types::TransferType;

/// A directory to include in a new transfer: a transfer source location and
/// a path relative to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferPath {
    pub location_uuid: String,
    pub relative_path: String,
}

impl TransferPath {
    pub fn new(location_uuid: impl Into<String>, relative_path: impl Into<String>) -> Self {
        Self {
            location_uuid: location_uuid.into(),
            relative_path: relative_path.into(),
        }
    }

    /// The form value the dashboard expects: base64 of `<location>:<path>`.
    pub fn encoded(&self) -> String {
        BASE64.encode(self.to_string())
    }
}

impl fmt::Display for TransferPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.location_uuid, self.relative_path)
    }
}

impl FromStr for TransferPath {
    type Err = Error;

    /// Parse `<location_uuid>:<relative_path>`.
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((location, path)) if !location.is_empty() => Ok(Self::new(location, path)),
            _ => Err(InvalidInputError::Other {
                message: format!("transfer path '{}' must look like <location_uuid>:<path>", s),
            }
            .into()),
        }
    }
}

/// Transfer operations.
#[derive(Debug, Clone)]
pub struct Transfer {
    api: ApiClient,
}

impl Transfer {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Start a transfer and return its path on the dashboard.
    ///
    /// An empty `row_ids` is sent as a single empty value.
    #[instrument(skip(self, paths, row_ids), fields(path_count = paths.len()))]
    pub async fn start(
        &self,
        name: &str,
        transfer_type: TransferType,
        accession: &str,
        paths: &[TransferPath],
        row_ids: &[String],
    ) -> Result<String> {
        let mut form: Vec<(&str, String)> = vec![
            ("name", name.to_string()),
            ("type", transfer_type.as_str().to_string()),
            ("accession", accession.to_string()),
        ];
        form.extend(paths.iter().map(|p| ("paths[]", p.encoded())));
        if row_ids.is_empty() {
            form.push(("row_ids[]", String::new()));
        } else {
            form.extend(row_ids.iter().map(|id| ("row_ids[]", id.clone())));
        }

        let value = self
            .api
            .send_json(
                self.api.post("/api/v2/transfer/unapproved/").form(&form),
                StatusCode::CREATED,
                &format!("Request to start transfer ({}) failed", name),
            )
            .await?;

        let path = body::require_string(
            &value,
            "path",
            &format!("Request to start transfer ({}) missing 'path' element", name),
        )?;
        debug!(%path, "transfer started");
        Ok(path)
    }

    /// Transfers waiting for approval.
    #[instrument(skip(self))]
    pub async fn unapproved(&self) -> Result<Vec<Record>> {
        let value = self
            .api
            .send_json(
                self.api.get("/api/v2/transfer/unapproved/"),
                StatusCode::OK,
                "Request to list transfers failed",
            )
            .await?;

        if !body::message_is(&value, "Fetched unapproved transfers successfully.") {
            return Err(Error::request(
                None,
                "Request to list transfers missing expected message",
            ));
        }
        Ok(value.get("results").map(body::records).unwrap_or_default())
    }

    /// Approve a transfer waiting in `directory`, returning its UUID.
    #[instrument(skip(self))]
    pub async fn approve(&self, directory: &str, transfer_type: TransferType) -> Result<String> {
        let form = [("type", transfer_type.as_str()), ("directory", directory)];
        let failure = format!("Request to approve directory ({}) failed", directory);

        let value = self
            .api
            .send_json(
                self.api.post("/api/v2/transfer/approve/").form(&form),
                StatusCode::OK,
                &failure,
            )
            .await?;

        let approved = value.get("message").and_then(|m| m.as_str()) == Some("Approval successful.");
        if !approved || value.get("error").is_some() {
            return Err(Error::request(None, failure));
        }
        body::require_string(&value, "uuid", &failure)
    }

    /// Start a partial reingest of the AIP `name`, returning the reingest UUID.
    #[instrument(skip(self))]
    pub async fn reingest(&self, name: &str, uuid: &str) -> Result<String> {
        let form = [("name", name), ("uuid", uuid)];

        let value = self
            .api
            .send_json(
                self.api.post("/api/transfer/reingest/").form(&form),
                StatusCode::CREATED,
                &format!("Re-ingest request ({}) failed", uuid),
            )
            .await?;

        let failure = format!("Request for re-ingest ({}) did not succeed", uuid);
        if !body::message_is(&value, "Approval successful.") {
            return Err(Error::request(None, failure));
        }
        body::require_string(&value, "reingest_uuid", &failure)
    }
}

#[async_trait]
impl Operation for Transfer {
    fn unit(&self) -> UnitKind {
        UnitKind::Transfer
    }

    async fn completed(&self) -> Result<Vec<String>> {
        operation::completed(&self.api, UnitKind::Transfer).await
    }

    async fn status(&self, uuid: &str) -> Result<Record> {
        operation::status(&self.api, UnitKind::Transfer, uuid).await
    }

    async fn delete(&self, uuid: &str) -> Result<()> {
        operation::delete(&self.api, UnitKind::Transfer, uuid).await
    }
}
