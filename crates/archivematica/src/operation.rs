//! Behaviour shared by transfers and ingests.
//!
//! Both kinds of unit are listed, inspected and hidden through the same
//! endpoints, differing only in the unit name embedded in the path.

use std::fmt;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::Result;
use crate::error::Error;
use crate::http::ApiClient;
use crate::http::body;
use crate::record::Record;

/// The kind of unit an [`Operation`] manages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Transfer,
    Ingest,
}

impl UnitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitKind::Transfer => "transfer",
            UnitKind::Ingest => "ingest",
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`Operation::close_completed`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseCompletedReport {
    /// Every completed unit that was found.
    pub completed: Vec<String>,
    /// Units that were hidden.
    pub close_succeeded: Vec<String>,
    /// Units whose delete request failed.
    pub close_failed: Vec<String>,
}

/// Operations on Archivematica units (transfers or ingests).
#[async_trait]
pub trait Operation: Send + Sync {
    /// The kind of unit this operation manages.
    fn unit(&self) -> UnitKind;

    /// UUIDs of completed units.
    async fn completed(&self) -> Result<Vec<String>>;

    /// Status of one unit.
    ///
    /// The record carries either a `status` or an `error` key.
    async fn status(&self, uuid: &str) -> Result<Record>;

    /// Hide a unit from the dashboard.
    async fn delete(&self, uuid: &str) -> Result<()>;

    /// Hide every completed unit.
    ///
    /// A failure listing completed units is returned. A failure hiding one
    /// unit is recorded in the report and the remaining units are still
    /// attempted.
    async fn close_completed(&self) -> Result<CloseCompletedReport> {
        let completed = self.completed().await?;
        let mut report = CloseCompletedReport {
            completed: completed.clone(),
            ..Default::default()
        };

        for uuid in completed {
            match self.delete(&uuid).await {
                Ok(()) => report.close_succeeded.push(uuid),
                Err(e) => {
                    warn!(unit = %self.unit(), %uuid, error = %e, "failed to close unit");
                    report.close_failed.push(uuid);
                }
            }
        }

        debug!(
            succeeded = report.close_succeeded.len(),
            failed = report.close_failed.len(),
            "closed completed units"
        );
        Ok(report)
    }
}

#[instrument(skip(api))]
pub(crate) async fn completed(api: &ApiClient, unit: UnitKind) -> Result<Vec<String>> {
    let value = api
        .send_json(
            api.get(&format!("/api/v2/{}/completed/", unit)),
            StatusCode::OK,
            &format!("Request for completed {}s failed", unit),
        )
        .await?;

    if !body::message_is(&value, &format!("Fetched completed {}s successfully.", unit)) {
        return Err(Error::request(
            None,
            format!("Request for completed {}s did not succeed", unit),
        ));
    }

    Ok(value.get("results").map(body::strings).unwrap_or_default())
}

#[instrument(skip(api))]
pub(crate) async fn status(api: &ApiClient, unit: UnitKind, uuid: &str) -> Result<Record> {
    let value = api
        .send_json(
            api.get(&format!("/api/v2/{}/status/{}/", unit, uuid)),
            StatusCode::OK,
            "Request for status failed",
        )
        .await?;

    let failure = "Request for status response is missing 'status' and 'error' keys.";
    let record = body::into_record(value, failure)?;
    if !record.contains_key("status") && !record.contains_key("error") {
        return Err(Error::request(None, failure));
    }
    Ok(record)
}

#[instrument(skip(api))]
pub(crate) async fn delete(api: &ApiClient, unit: UnitKind, uuid: &str) -> Result<()> {
    let value = api
        .send_json(
            api.delete(&format!("/api/{}/{}/delete/", unit, uuid)),
            StatusCode::OK,
            &format!("Request to hide {} ({}) failed", unit, uuid),
        )
        .await?;

    if value.get("removed").and_then(serde_json::Value::as_bool) != Some(true) {
        return Err(Error::request(
            None,
            format!("Could not hide {} ({})", unit, uuid),
        ));
    }
    Ok(())
}
