//! Integration tests for two-phase permanent deletion.

mod helpers;

use http::StatusCode;

#[tokio::test]
async fn test_live_descendants_block_deletion() {
    let app = helpers::TestApp::new().await;
    let token = app.token("alice");
    let docs = app.create_folder(&token, "Docs", None).await;
    app.create_file(&token, "a.pdf", Some(&docs)).await;

    let response = app
        .request("DELETE", &format!("/api/nodes/{docs}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(app.store.len().await, 2);
}

#[tokio::test]
async fn test_trashed_subtree_is_removed_with_its_objects() {
    let app = helpers::TestApp::new().await;
    let token = app.token("alice");
    let docs = app.create_folder(&token, "Docs", None).await;
    let uploaded = app
        .upload(&token, Some(&docs), "notes.txt", "text/plain", b"hello")
        .await;
    assert_eq!(uploaded.status, StatusCode::CREATED);
    let key = uploaded.body["data"]["storage_key"]
        .as_str()
        .expect("storage key")
        .to_string();
    assert!(app.objects.contains(&key));

    app.request("POST", &format!("/api/nodes/{docs}/trash"), None, Some(&token))
        .await;
    let accepted = app
        .request("DELETE", &format!("/api/nodes/{docs}"), None, Some(&token))
        .await;
    assert_eq!(accepted.status, StatusCode::ACCEPTED);
    assert_eq!(accepted.body["data"]["phase"], "requested");
    let task_id = accepted.body["data"]["task_id"]
        .as_str()
        .expect("task id")
        .to_string();

    let status = app.wait_for_phase(&token, &task_id, "complete").await;
    assert_eq!(status["node_count"], 2);
    assert_eq!(status["records_deleted"], 2);
    assert!(status["orphaned_keys"].as_array().expect("keys").is_empty());

    assert!(app.store.is_empty().await);
    assert!(!app.objects.contains(&key));

    let trash = app.request("GET", "/api/trash", None, Some(&token)).await;
    assert!(trash.names().is_empty());

    let health = app.request("GET", "/api/health", None, None).await;
    assert_eq!(health.body["data"]["deletion_queue"]["completed"], 1);
}

#[tokio::test]
async fn test_single_file_can_be_deleted_without_trashing() {
    let app = helpers::TestApp::new().await;
    let token = app.token("alice");
    let file = app.create_file(&token, "a.pdf", None).await;

    let accepted = app
        .request("DELETE", &format!("/api/nodes/{file}"), None, Some(&token))
        .await;
    assert_eq!(accepted.status, StatusCode::ACCEPTED);
    let task_id = accepted.body["data"]["task_id"].as_str().expect("task id").to_string();

    app.wait_for_phase(&token, &task_id, "complete").await;
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_storage_failure_still_removes_records() {
    let app = helpers::TestApp::new().await;
    let token = app.token("alice");
    let uploaded = app
        .upload(&token, None, "photo.png", "image/png", b"\x89PNG")
        .await;
    let file = uploaded.id();
    let key = uploaded.body["data"]["storage_key"]
        .as_str()
        .expect("storage key")
        .to_string();

    app.objects.set_unavailable(true);
    let accepted = app
        .request("DELETE", &format!("/api/nodes/{file}"), None, Some(&token))
        .await;
    let task_id = accepted.body["data"]["task_id"].as_str().expect("task id").to_string();

    let status = app.wait_for_phase(&token, &task_id, "complete").await;
    assert_eq!(status["orphaned_keys"], serde_json::json!([key]));
    assert!(app.store.is_empty().await);

    app.objects.set_unavailable(false);
    assert!(app.objects.contains(&key));

    let health = app.request("GET", "/api/health", None, None).await;
    assert_eq!(health.body["data"]["deletion_queue"]["orphaned_objects"], 1);
}

#[tokio::test]
async fn test_deletion_status_is_owner_only() {
    let app = helpers::TestApp::new().await;
    let alice = app.token("alice");
    let file = app.create_file(&alice, "a.pdf", None).await;
    let accepted = app
        .request("DELETE", &format!("/api/nodes/{file}"), None, Some(&alice))
        .await;
    let task_id = accepted.body["data"]["task_id"].as_str().expect("task id").to_string();

    let bob = app.token("bob");
    let response = app
        .request("GET", &format!("/api/deletions/{task_id}"), None, Some(&bob))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let unknown = app
        .request(
            "GET",
            "/api/deletions/00000000-0000-0000-0000-000000000001",
            None,
            Some(&alice),
        )
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_disabled_worker_rejects_deletion() {
    let app = helpers::TestApp::with_config(|config| config.worker.enabled = false).await;
    let token = app.token("alice");
    let file = app.create_file(&token, "a.pdf", None).await;

    let response = app
        .request("DELETE", &format!("/api/nodes/{file}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(app.store.len().await, 1);
}
