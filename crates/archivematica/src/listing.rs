//! Offset pagination over Storage Service list endpoints.
//!
//! List endpoints answer with `{meta: {total_count, next, offset}, objects}`.
//! [`fetch_all`] keeps requesting pages until `meta.next` is null and returns
//! every object in arrival order.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::error::Error;
use crate::http::ApiClient;
use crate::http::body;
use crate::record::Record;

/// Upper bound on the pages fetched for one listing.
pub const MAX_PAGES: usize = 10_000;

/// A fully materialized listing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PaginatedListing {
    /// Total number of objects the server reported.
    pub total_count: u64,
    /// Offset to request next. Always `None` once a listing is returned.
    pub next: Option<u64>,
    /// Objects in arrival order.
    pub objects: Vec<Record>,
}

impl PaginatedListing {
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.objects.iter()
    }

    /// The `uuid` of each object that has one.
    pub fn uuids(&self) -> Vec<String> {
        self.objects
            .iter()
            .filter_map(|r| r.uuid().map(str::to_string))
            .collect()
    }
}

impl IntoIterator for PaginatedListing {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.into_iter()
    }
}

impl<'a> IntoIterator for &'a PaginatedListing {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}

/// Decode one page.
///
/// The next offset is `meta.offset + 1` when `meta.next` is set and `None`
/// otherwise; the server's own `next` URL is not followed.
pub(crate) fn process_listing(body: &Value, context: &str) -> Result<PaginatedListing, Error> {
    let meta = body
        .get("meta")
        .and_then(Value::as_object)
        .ok_or_else(|| Error::request(None, format!("{}: response has no 'meta' element", context)))?;

    let total_count = meta.get("total_count").and_then(as_count).unwrap_or(0);

    let next = match meta.get("next") {
        None | Some(Value::Null) => None,
        Some(_) => Some(meta.get("offset").and_then(as_count).unwrap_or(0) + 1),
    };

    Ok(PaginatedListing {
        total_count,
        next,
        objects: body.get("objects").map(body::records).unwrap_or_default(),
    })
}

/// Fetch every page of a list endpoint.
///
/// `params` are sent with every request; `offset` is added after the first
/// page. A server whose offsets fail to increase, or that keeps answering
/// past [`MAX_PAGES`] pages, is reported as a request failure.
#[instrument(skip(api, params), fields(base = %api.base()))]
pub(crate) async fn fetch_all(
    api: &ApiClient,
    path: &str,
    params: &[(String, String)],
    context: &str,
) -> Result<PaginatedListing, Error> {
    let mut listing = PaginatedListing::default();
    let mut pages = 0usize;

    loop {
        let mut query: Vec<(String, String)> = Vec::with_capacity(params.len() + 1);
        if let Some(offset) = listing.next {
            query.push(("offset".to_string(), offset.to_string()));
        }
        query.extend_from_slice(params);

        let value = api
            .send_json(api.get(path).query(&query), StatusCode::OK, context)
            .await?;
        let page = process_listing(&value, context)?;
        pages += 1;
        trace!(page = pages, objects = page.objects.len(), next = ?page.next, "fetched page");

        if let (Some(requested), Some(next)) = (listing.next, page.next)
            && next <= requested
        {
            return Err(Error::request(
                None,
                format!("{}: pagination did not advance past offset {}", context, requested),
            ));
        }

        listing.total_count = page.total_count;
        listing.next = page.next;
        listing.objects.extend(page.objects);

        if listing.next.is_none() {
            break;
        }
        if pages >= MAX_PAGES {
            return Err(Error::request(
                None,
                format!("{}: gave up after {} pages", context, MAX_PAGES),
            ));
        }
    }

    debug!(pages, total = listing.total_count, "listing complete");
    Ok(listing)
}

fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn next_is_offset_plus_one() {
        let body = json!({
            "meta": {"total_count": 3, "next": "/api/v2/file/?offset=20", "offset": 0},
            "objects": [{"uuid": "a"}]
        });
        let page = process_listing(&body, "ctx").unwrap();
        assert_eq!(page.total_count, 3);
        assert_eq!(page.next, Some(1));
        assert_eq!(page.uuids(), vec!["a"]);
    }

    #[test]
    fn null_next_terminates() {
        let body = json!({
            "meta": {"total_count": "1", "next": null, "offset": 4},
            "objects": []
        });
        let page = process_listing(&body, "ctx").unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.next, None);
        assert!(page.is_empty());
    }

    #[test]
    fn missing_meta_is_an_error() {
        let err = process_listing(&json!({"objects": []}), "Unable to list").unwrap_err();
        assert_eq!(err.to_string(), "Unable to list: response has no 'meta' element");
    }
}
