//! The client facade.

use reqwest::StatusCode;
use tracing::{debug, instrument};

use crate::Result;
use crate::auth::{CredentialCell, Credentials};
use crate::error::Error;
use crate::http::{ApiClient, build_http_client};
use crate::ingest::Ingest;
use crate::package::Package;
use crate::storage::{Location, Pipeline, Space};
use crate::transfer::Transfer;
use crate::types::ServiceUrl;

/// A client for one Archivematica dashboard and its Storage Service.
///
/// Every sub-client is built when the facade is created and shares one
/// connection pool. Credentials can be set at any time; each request reads
/// the credentials current when it is sent.
///
/// # Example
///
/// ```no_run
/// use archivematica::{Archivematica, Operation};
///
/// # async fn example() -> archivematica::Result<()> {
/// let am = Archivematica::new("http://localhost:62080", "http://localhost:62081")?;
/// am.set_am_credentials("test", "test").set_ss_credentials("test", "test");
///
/// for uuid in am.transfer().completed().await? {
///     println!("{}", uuid);
/// }
/// let aips = am.package().get_all_aips().await?;
/// println!("{} AIPs", aips.total_count);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Archivematica {
    am: ApiClient,
    ss: ApiClient,
    transfer: Transfer,
    ingest: Ingest,
    package: Package,
    location: Location,
    space: Space,
    pipeline: Pipeline,
}

impl Archivematica {
    /// Create a client for the dashboard at `am_url` and the Storage Service
    /// at `ss_url`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if either URL is not an absolute
    /// http(s) URL.
    pub fn new(am_url: impl AsRef<str>, ss_url: impl AsRef<str>) -> Result<Self> {
        let am_url = ServiceUrl::new(am_url)?;
        let ss_url = ServiceUrl::new(ss_url)?;
        let http = build_http_client()?;

        let am = ApiClient::with_client(http.clone(), am_url, CredentialCell::default());
        let ss = ApiClient::with_client(http, ss_url, CredentialCell::default());
        debug!(am = %am.base(), ss = %ss.base(), "created client");

        Ok(Self {
            transfer: Transfer::new(am.clone()),
            ingest: Ingest::new(am.clone()),
            package: Package::new(ss.clone()),
            location: Location::new(ss.clone()),
            space: Space::new(ss.clone()),
            pipeline: Pipeline::new(ss.clone()),
            am,
            ss,
        })
    }

    /// Set the dashboard API user and key.
    pub fn set_am_credentials(&self, username: impl Into<String>, key: impl Into<String>) -> &Self {
        self.am.credentials().set(Credentials::new(username, key));
        self
    }

    /// Set the Storage Service API user and key.
    pub fn set_ss_credentials(&self, username: impl Into<String>, key: impl Into<String>) -> &Self {
        self.ss.credentials().set(Credentials::new(username, key));
        self
    }

    pub fn am_url(&self) -> &ServiceUrl {
        self.am.base()
    }

    pub fn ss_url(&self) -> &ServiceUrl {
        self.ss.base()
    }

    pub fn am_username(&self) -> String {
        self.am.credentials().get().username().to_string()
    }

    pub fn ss_username(&self) -> String {
        self.ss.credentials().get().username().to_string()
    }

    pub fn transfer(&self) -> &Transfer {
        &self.transfer
    }

    pub fn ingest(&self) -> &Ingest {
        &self.ingest
    }

    pub fn package(&self) -> &Package {
        &self.package
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn space(&self) -> &Space {
        &self.space
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Fetch a named processing configuration as raw XML.
    #[instrument(skip(self))]
    pub async fn processing_config(&self, name: &str) -> Result<String> {
        let response = self
            .am
            .send(self.am.get(&format!("/api/v2/processing-configuration/{}", name)))
            .await?;

        let status = response.status();
        let reason = status.canonical_reason().unwrap_or("Unknown Status");
        if status == StatusCode::FORBIDDEN {
            return Err(Error::Authorization {
                status: status.as_u16(),
                message: format!("Invalid credentials or insufficient permissions: {}", reason),
            });
        }
        if status != StatusCode::OK {
            return Err(Error::request(
                Some(status.as_u16()),
                format!("Failed to get processing configuration for {}: {}", name, reason),
            ));
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_normalized() {
        let am = Archivematica::new("http://127.0.0.1:62080/ ", "http://127.0.0.1:62081/").unwrap();
        assert_eq!(am.am_url().as_str(), "http://127.0.0.1:62080");
        assert_eq!(am.ss_url().as_str(), "http://127.0.0.1:62081");
    }

    #[test]
    fn invalid_url_is_rejected() {
        let err = Archivematica::new("not a url", "http://127.0.0.1:62081").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn credentials_are_per_service() {
        let am = Archivematica::new("http://127.0.0.1:62080", "http://127.0.0.1:62081").unwrap();
        assert_eq!(am.am_username(), "");

        am.set_am_credentials("dashboard", "k1")
            .set_ss_credentials("storage", "k2");
        assert_eq!(am.am_username(), "dashboard");
        assert_eq!(am.ss_username(), "storage");
    }
}
