//! Integration tests for content upload, download and usage.

mod helpers;

use http::{StatusCode, header};
use serde_json::json;

#[tokio::test]
async fn test_upload_and_download() {
    let app = helpers::TestApp::new().await;
    let token = app.token("alice");
    let docs = app.create_folder(&token, "Docs", None).await;

    let uploaded = app
        .upload(&token, Some(&docs), "notes.txt", "application/octet-stream", b"hello drive")
        .await;
    assert_eq!(uploaded.status, StatusCode::CREATED);
    let data = &uploaded.body["data"];
    assert_eq!(data["kind"], "file");
    assert_eq!(data["name"], "notes.txt");
    assert_eq!(data["parent_id"], docs.as_str());
    assert_eq!(data["size_bytes"], 11);
    assert_eq!(data["mime_type"], "text/plain");
    assert!(data["content_url"].as_str().is_some());

    let file = uploaded.id();
    let content = app
        .get_raw(&format!("/api/files/{file}/content"), &token)
        .await;
    assert_eq!(content.status, StatusCode::OK);
    assert_eq!(&content.body[..], b"hello drive");
    assert_eq!(content.headers[header::CONTENT_TYPE], "text/plain");
    let disposition = content.headers[header::CONTENT_DISPOSITION]
        .to_str()
        .expect("header");
    assert!(disposition.starts_with("inline"));

    let attachment = app
        .get_raw(&format!("/api/files/{file}/content?download=true"), &token)
        .await;
    let disposition = attachment.headers[header::CONTENT_DISPOSITION]
        .to_str()
        .expect("header");
    assert_eq!(disposition, "attachment; filename=\"notes.txt\"");
}

#[tokio::test]
async fn test_download_is_owner_only() {
    let app = helpers::TestApp::new().await;
    let alice = app.token("alice");
    let uploaded = app
        .upload(&alice, None, "secret.txt", "text/plain", b"mine")
        .await;
    let file = uploaded.id();

    let bob = app.token("bob");
    let response = app
        .get_raw(&format!("/api/files/{file}/content"), &bob)
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_folder_has_no_content() {
    let app = helpers::TestApp::new().await;
    let token = app.token("alice");
    let docs = app.create_folder(&token, "Docs", None).await;

    let response = app
        .get_raw(&format!("/api/files/{docs}/content"), &token)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_into_missing_folder_keeps_no_object() {
    let app = helpers::TestApp::new().await;
    let token = app.token("alice");

    let response = app
        .upload(
            &token,
            Some("00000000-0000-0000-0000-000000000001"),
            "lost.txt",
            "text/plain",
            b"nowhere",
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(app.objects.is_empty());
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_upload_into_trashed_folder_is_rejected() {
    let app = helpers::TestApp::new().await;
    let token = app.token("alice");
    let docs = app.create_folder(&token, "Docs", None).await;
    app.request("POST", &format!("/api/nodes/{docs}/trash"), None, Some(&token))
        .await;

    let response = app
        .upload(&token, Some(&docs), "late.txt", "text/plain", b"late")
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(app.objects.is_empty());
}

#[tokio::test]
async fn test_upload_requires_identity() {
    let app = helpers::TestApp::new().await;
    let response = app
        .upload("not-a-jwt", None, "a.txt", "text/plain", b"x")
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_usage_counts_live_files() {
    let app = helpers::TestApp::new().await;
    let token = app.token("alice");
    let docs = app.create_folder(&token, "Docs", None).await;
    app.upload(&token, Some(&docs), "a.bin", "application/octet-stream", &[0u8; 100])
        .await;
    let b = app
        .upload(&token, None, "b.bin", "application/octet-stream", &[0u8; 50])
        .await
        .id();

    app.request("POST", &format!("/api/nodes/{b}/trash"), None, Some(&token))
        .await;

    let usage = app.request("GET", "/api/usage", None, Some(&token)).await;
    assert_eq!(usage.status, StatusCode::OK);
    let data = &usage.body["data"];
    assert_eq!(data["used_bytes"], 100);
    assert_eq!(data["file_count"], 1);
    assert_eq!(data["folder_count"], 1);
    assert_eq!(data["trashed_count"], 1);
    assert_eq!(data["quota_bytes"], app.config.storage.quota_bytes);

    // Another owner's usage is independent.
    let bob = app.token("bob");
    let usage = app.request("GET", "/api/usage", None, Some(&bob)).await;
    assert_eq!(usage.body["data"]["used_bytes"], 0);
}

#[tokio::test]
async fn test_file_record_cannot_claim_foreign_object() {
    let app = helpers::TestApp::new().await;
    let bob = app.token("bob");
    let uploaded = app
        .upload(&bob, None, "private.txt", "text/plain", b"bob only")
        .await;
    let key = uploaded.body["data"]["storage_key"]
        .as_str()
        .expect("storage key")
        .to_string();

    let alice = app.token("alice");
    let response = app
        .request(
            "POST",
            "/api/files",
            Some(json!({ "name": "stolen.txt", "storage_key": key })),
            Some(&alice),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let listing = app.request("GET", "/api/files", None, Some(&alice)).await;
    assert!(listing.names().is_empty());
    assert!(app.objects.contains(&key));
}
