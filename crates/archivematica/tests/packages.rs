//! Mock Storage Service tests for packages: listings, AIP/DIP matching,
//! package requests and downloads.

mod common;

use archivematica::error::{FilesystemError, InvalidInputError};
use archivematica::{Archivematica, Error, PackageType, ReingestType};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{listing_page, mock_client, package};

// ============================================================================
// Listing Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_all_follows_every_page() {
    let am = MockServer::start().await;
    let ss = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/file/"))
        .and(query_param_is_missing("offset"))
        .and(query_param("package_type", "AIP"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing_page(
            vec![package("aip-1", "AIP", "/aips/aip-1.7z")],
            0,
            true,
            3,
        )))
        .expect(1)
        .mount(&ss)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/file/"))
        .and(query_param("offset", "1"))
        .and(query_param("package_type", "AIP"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing_page(
            vec![package("aip-2", "AIP", "/aips/aip-2.7z")],
            1,
            true,
            3,
        )))
        .expect(1)
        .mount(&ss)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/file/"))
        .and(query_param("offset", "2"))
        .and(query_param("package_type", "AIP"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing_page(
            vec![package("aip-3", "AIP", "/aips/aip-3.7z")],
            2,
            false,
            3,
        )))
        .expect(1)
        .mount(&ss)
        .await;

    let client = mock_client(&am, &ss);
    let listing = client.package().get_all_aips().await.unwrap();

    assert_eq!(listing.total_count, 3);
    assert_eq!(listing.next, None);
    assert_eq!(listing.uuids(), vec!["aip-1", "aip-2", "aip-3"]);
}

#[tokio::test]
async fn test_fetch_all_stops_when_offset_does_not_advance() {
    let am = MockServer::start().await;
    let ss = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/file/"))
        .and(query_param_is_missing("offset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing_page(
            vec![package("p-1", "AIP", "/aips/p-1")],
            0,
            true,
            5,
        )))
        .mount(&ss)
        .await;

    // Keeps reporting offset 0 no matter which page was asked for.
    Mock::given(method("GET"))
        .and(path("/api/v2/file/"))
        .and(query_param("offset", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing_page(
            vec![package("p-1", "AIP", "/aips/p-1")],
            0,
            true,
            5,
        )))
        .expect(1)
        .mount(&ss)
        .await;

    let client = mock_client(&am, &ss);
    let err = client.package().get_all().await.unwrap_err();

    assert!(matches!(err, Error::Request { .. }));
    assert!(err.to_string().contains("pagination did not advance past offset 1"));
}

#[tokio::test]
async fn test_fetch_all_without_meta() {
    let am = MockServer::start().await;
    let ss = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/file/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"objects": []})))
        .mount(&ss)
        .await;

    let client = mock_client(&am, &ss);
    let err = client.package().get_all_dips().await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unable to get all package details: response has no 'meta' element"
    );
}

#[tokio::test]
async fn test_fetch_all_rejects_other_package_types() {
    let am = MockServer::start().await;
    let ss = MockServer::start().await;

    let client = mock_client(&am, &ss);
    let err = client
        .package()
        .fetch_all(Some(PackageType::Sip))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::InvalidInput(InvalidInputError::ListingFilter { .. })
    ));
    assert!(ss.received_requests().await.unwrap().is_empty());
}

// ============================================================================
// AIP/DIP Matching Tests
// ============================================================================

async fn mount_aips_and_dips(ss: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v2/file/"))
        .and(query_param("package_type", "AIP"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing_page(
            vec![
                package("aip-1", "AIP", "/aips/aip-1.7z"),
                package("aip-2", "AIP", "/aips/aip-2.7z"),
            ],
            0,
            false,
            2,
        )))
        .mount(ss)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/file/"))
        .and(query_param("package_type", "DIP"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing_page(
            vec![
                package("dip-1", "DIP", "/dips/first-aip-1"),
                package("dip-2", "DIP", "/dips/other"),
                package("dip-3", "DIP", "/dips/second-aip-1"),
            ],
            0,
            false,
            3,
        )))
        .mount(ss)
        .await;
}

#[tokio::test]
async fn test_map_aips_to_dips() {
    let am = MockServer::start().await;
    let ss = MockServer::start().await;
    mount_aips_and_dips(&ss).await;

    let client = mock_client(&am, &ss);
    let mapping = client.package().map_aips_to_dips().await.unwrap();

    assert_eq!(mapping.len(), 2);
    assert_eq!(mapping["aip-1"], vec!["dip-1", "dip-3"]);
    assert!(mapping["aip-2"].is_empty());
}

#[tokio::test]
async fn test_dips_for_aip() {
    let am = MockServer::start().await;
    let ss = MockServer::start().await;
    mount_aips_and_dips(&ss).await;

    let client = mock_client(&am, &ss);
    let dips = client.package().dips_for_aip("aip-1").await.unwrap();
    assert_eq!(dips.len(), 2);
    assert_eq!(dips[0].current_path(), Some("/dips/first-aip-1"));

    let uuids = client.package().dip_uuids_for_aip("aip-2").await.unwrap();
    assert!(uuids.is_empty());
}

// ============================================================================
// Package Request Tests
// ============================================================================

#[tokio::test]
async fn test_create_from_existing() {
    let am = MockServer::start().await;
    let ss = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/file/old/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(package("old", "AIP", "/aips/old.7z")))
        .mount(&ss)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v2/file/"))
        .and(body_json(json!({
            "uuid": "new",
            "origin_location": "/api/v2/location/loc-1/",
            "origin_path": "/aips/old.7z",
            "origin_pipeline": "/api/v2/pipeline/pipe-1/",
            "size": 1024,
            "package_type": "AIP",
            "current_location": "/api/v2/location/loc-2/",
            "current_path": "copies/new.7z",
            "related_packages": ["/api/v2/file/old/"]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(package("new", "AIP", "copies/new.7z")))
        .expect(1)
        .mount(&ss)
        .await;

    let client = mock_client(&am, &ss);
    let created = client
        .package()
        .create_from_existing("new", "old", "loc-2", "copies/new.7z", PackageType::Aip, Some("old"))
        .await
        .unwrap();
    assert_eq!(created.uuid(), Some("new"));
}

#[tokio::test]
async fn test_create_from_existing_rejects_same_uuid() {
    let am = MockServer::start().await;
    let ss = MockServer::start().await;

    let client = mock_client(&am, &ss);
    let err = client
        .package()
        .create_from_existing("same", "same", "loc-2", "x", PackageType::Aip, None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::InvalidInput(InvalidInputError::DuplicateUuid { .. })
    ));
    assert!(ss.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_reingest_package() {
    let am = MockServer::start().await;
    let ss = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/file/aip-1/reingest/"))
        .and(body_json(json!({
            "pipeline": "pipe-1",
            "reingest_type": "METADATA_ONLY",
            "processing_config": "default"
        })))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "error": false,
            "message": "Package aip-1 sent to pipeline for re-ingest",
            "reingest_uuid": "r-1"
        })))
        .mount(&ss)
        .await;

    let client = mock_client(&am, &ss);
    let uuid = client
        .package()
        .reingest("aip-1", "pipe-1", ReingestType::MetadataOnly, "default")
        .await
        .unwrap();
    assert_eq!(uuid, "r-1");
}

#[tokio::test]
async fn test_delete_package() {
    let am = MockServer::start().await;
    let ss = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/file/aip-1/delete_aip/"))
        .and(body_json(json!({
            "pipeline": "pipe-1",
            "event_reason": "duplicate",
            "user_id": 7,
            "user_email": "archivist@example.org"
        })))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "message": "Delete request created successfully.",
            "id": 42
        })))
        .mount(&ss)
        .await;

    let client = mock_client(&am, &ss);
    let id = client
        .package()
        .delete("aip-1", "pipe-1", "duplicate", 7, "archivist@example.org")
        .await
        .unwrap();
    assert_eq!(id, 42);
}

#[tokio::test]
async fn test_delete_package_requires_user_id() {
    let am = MockServer::start().await;
    let ss = MockServer::start().await;

    let client = mock_client(&am, &ss);
    let err = client
        .package()
        .delete("aip-1", "pipe-1", "duplicate", 0, "archivist@example.org")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::InvalidInput(InvalidInputError::UserId { value: 0 })
    ));
    assert!(ss.received_requests().await.unwrap().is_empty());
}

// ============================================================================
// Download Tests
// ============================================================================

#[tokio::test]
async fn test_download_uses_disposition_filename() {
    let am = MockServer::start().await;
    let ss = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/file/aip-1/download/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"archive bytes".to_vec(), "application/x-gzip-compressed")
                .insert_header("Content-Disposition", "attachment; filename=\"aip-1.tar\""),
        )
        .mount(&ss)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let client = mock_client(&am, &ss);
    let written = client.package().download("aip-1", dir.path()).await.unwrap();

    assert_eq!(written, dir.path().join("aip-1.tar"));
    assert_eq!(std::fs::read(&written).unwrap(), b"archive bytes");
}

#[tokio::test]
async fn test_download_guesses_extension_from_content_type() {
    let am = MockServer::start().await;
    let ss = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/file/aip-1/download/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"gz bytes".to_vec(), "application/x-gzip-compressed"),
        )
        .mount(&ss)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let client = mock_client(&am, &ss);
    let written = client.package().download("aip-1", dir.path()).await.unwrap();

    assert_eq!(written, dir.path().join("package-aip-1.gz"));
    assert_eq!(std::fs::read(&written).unwrap(), b"gz bytes");
}

#[tokio::test]
async fn test_download_replaces_existing_file() {
    let am = MockServer::start().await;
    let ss = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/file/aip-1/download/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"new".to_vec(), "application/x-tar")
                .insert_header("Content-Disposition", "attachment; filename=\"aip-1.tar\""),
        )
        .mount(&ss)
        .await;

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("aip-1.tar"), b"an older and longer download").unwrap();

    let client = mock_client(&am, &ss);
    let written = client.package().download("aip-1", dir.path()).await.unwrap();
    assert_eq!(std::fs::read(&written).unwrap(), b"new");
}

#[tokio::test]
async fn test_download_missing_package() {
    let am = MockServer::start().await;
    let ss = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/file/gone/download/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&ss)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let client = mock_client(&am, &ss);
    let err = client.package().download("gone", dir.path()).await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_download_to_missing_directory_sends_nothing() {
    let am = MockServer::start().await;
    let ss = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/file/aip-1/download/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ss)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    let client = mock_client(&am, &ss);
    let err = client.package().download("aip-1", &missing).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Filesystem(FilesystemError::UnusableDirectory { .. })
    ));
}

#[tokio::test]
async fn test_download_to_file_sends_nothing() {
    let am = MockServer::start().await;
    let ss = MockServer::start().await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("not-a-dir");
    std::fs::write(&file, b"").unwrap();

    let client = mock_client(&am, &ss);
    let err = client.package().download("aip-1", &file).await.unwrap_err();

    assert!(matches!(err, Error::Filesystem(_)));
    assert!(ss.received_requests().await.unwrap().is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_download_to_unwritable_directory_sends_nothing() {
    use std::os::unix::fs::PermissionsExt;

    let am = MockServer::start().await;
    let ss = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/file/aip-1/download/"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"bytes".to_vec()))
        .mount(&ss)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let locked = dir.path().join("locked");
    std::fs::create_dir(&locked).unwrap();
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o555)).unwrap();

    // root ignores directory modes; the check only means something without it.
    if std::fs::File::create(locked.join("x")).is_ok() {
        return;
    }

    let client = mock_client(&am, &ss);
    let result = client.package().download("aip-1", &locked).await;
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

    assert!(matches!(
        result.unwrap_err(),
        Error::Filesystem(FilesystemError::UnusableDirectory { .. })
    ));
    assert!(ss.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_truncated_download_leaves_nothing_behind() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    // Promises 100000 bytes, sends 10000, then hangs up.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        socket
            .write_all(
                b"HTTP/1.1 200 OK\r\n\
                  Content-Type: application/x-tar\r\n\
                  Content-Length: 100000\r\n\
                  Connection: close\r\n\r\n",
            )
            .await
            .unwrap();
        socket.write_all(&[0u8; 10000]).await.unwrap();
        socket.flush().await.unwrap();
    });

    let am = MockServer::start().await;
    let client = Archivematica::new(
        common::mock_url(&am),
        format!("http://127.0.0.1:{}", port),
    )
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let err = client.package().download("aip-1", dir.path()).await.unwrap_err();
    server.await.unwrap();

    assert!(matches!(err, Error::Filesystem(FilesystemError::Io { .. })));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
