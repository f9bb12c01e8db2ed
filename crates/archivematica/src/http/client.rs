//! HTTP transport for one service.

use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::auth::CredentialCell;
use crate::error::{Error, InvalidInputError};
use crate::types::ServiceUrl;

use super::classify;

/// HTTP client bound to one base URL and one credential pair.
///
/// The `Authorization` header is filled in from the credential cell when the
/// request is dispatched, and only when the caller has not set one.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base: ServiceUrl,
    credentials: CredentialCell,
}

impl ApiClient {
    /// Create a client with its own connection pool.
    pub fn new(base: ServiceUrl, credentials: CredentialCell) -> Result<Self, Error> {
        Ok(Self::with_client(build_http_client()?, base, credentials))
    }

    /// Create a client that shares an existing connection pool.
    pub fn with_client(
        client: reqwest::Client,
        base: ServiceUrl,
        credentials: CredentialCell,
    ) -> Self {
        Self {
            client,
            base,
            credentials,
        }
    }

    /// Returns the base URL requests are resolved against.
    pub fn base(&self) -> &ServiceUrl {
        &self.base
    }

    /// Returns the credential cell read at dispatch time.
    pub fn credentials(&self) -> &CredentialCell {
        &self.credentials
    }

    /// Start a request for an API path under the base URL.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.base.endpoint(path))
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.request(Method::POST, path)
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.request(Method::DELETE, path)
    }

    /// Dispatch a request, adding the `Authorization` header if it is absent.
    #[instrument(skip(self, builder), fields(base = %self.base))]
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, Error> {
        let mut request = builder.build()?;

        if !request.headers().contains_key(AUTHORIZATION) {
            let mut value = HeaderValue::from_str(&self.credentials.authorization_header())
                .map_err(|_| InvalidInputError::Credentials)?;
            value.set_sensitive(true);
            request.headers_mut().insert(AUTHORIZATION, value);
        }

        debug!(method = %request.method(), url = %request.url(), "sending request");
        let response = self.client.execute(request).await?;
        trace!(status = %response.status(), "received response");

        Ok(response)
    }

    /// Dispatch a request and decode its JSON body, classifying the status.
    pub async fn send_json(
        &self,
        builder: RequestBuilder,
        expected: StatusCode,
        context: &str,
    ) -> Result<Value, Error> {
        let response = self.send(builder).await?;
        classify::decode_json_response(response, expected, context).await
    }
}

/// Build the HTTP client shared by both services.
pub fn build_http_client() -> Result<reqwest::Client, Error> {
    Ok(reqwest::Client::builder()
        .user_agent(concat!("archivematica-rs/", env!("CARGO_PKG_VERSION")))
        .build()?)
}
