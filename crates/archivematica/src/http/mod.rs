//! HTTP transport and response classification.

pub(crate) mod body;
mod classify;
mod client;

pub use classify::{assert_response_code, decode_json_response};
pub use client::{ApiClient, build_http_client};
