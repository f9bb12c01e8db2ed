//! Shared helpers for the mock server tests.

#![allow(dead_code)]

use archivematica::Archivematica;
use serde_json::{Value, json};
use wiremock::MockServer;

/// Base URL of a mock server.
pub fn mock_url(server: &MockServer) -> String {
    format!("http://127.0.0.1:{}", server.address().port())
}

/// A client whose dashboard and Storage Service are both mock servers.
pub fn mock_client(am: &MockServer, ss: &MockServer) -> Archivematica {
    let client = Archivematica::new(mock_url(am), mock_url(ss)).unwrap();
    client
        .set_am_credentials("demo", "dashboard-key")
        .set_ss_credentials("admin", "storage-key");
    client
}

/// One page of a list endpoint.
pub fn listing_page(objects: Vec<Value>, offset: u64, has_next: bool, total_count: u64) -> Value {
    let next = if has_next {
        json!(format!("/api/v2/file/?offset={}", offset + 1))
    } else {
        Value::Null
    };
    json!({
        "meta": {
            "limit": 20,
            "next": next,
            "offset": offset,
            "previous": null,
            "total_count": total_count
        },
        "objects": objects
    })
}

/// A package record as the Storage Service returns it.
pub fn package(uuid: &str, package_type: &str, current_path: &str) -> Value {
    json!({
        "uuid": uuid,
        "package_type": package_type,
        "current_path": current_path,
        "current_location": "/api/v2/location/loc-1/",
        "origin_pipeline": "/api/v2/pipeline/pipe-1/",
        "size": 1024,
        "status": "UPLOADED",
        "resource_uri": format!("/api/v2/file/{}/", uuid)
    })
}
