//! Integration tests for tree operations: listing, trash, restore, navigation.

mod helpers;

use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_report_scenario() {
    let app = helpers::TestApp::new().await;
    let token = app.token("alice");

    let docs = app.create_folder(&token, "Docs", None).await;
    let year = app.create_folder(&token, "2024", Some(&docs)).await;
    app.create_file(&token, "report.pdf", Some(&year)).await;

    let files = app
        .request("GET", &format!("/api/files?parent_id={year}"), None, Some(&token))
        .await;
    assert_eq!(files.status, StatusCode::OK);
    assert_eq!(files.names(), vec!["report.pdf"]);

    // Trash the top folder: everything below goes with it.
    let trashed = app
        .request("POST", &format!("/api/nodes/{docs}/trash"), None, Some(&token))
        .await;
    assert_eq!(trashed.status, StatusCode::OK);
    assert_eq!(trashed.body["data"]["trashed"], true);

    let roots = app.request("GET", "/api/folders", None, Some(&token)).await;
    assert!(roots.names().is_empty());
    let files = app
        .request("GET", &format!("/api/files?parent_id={year}"), None, Some(&token))
        .await;
    assert!(files.names().is_empty());

    let trash = app.request("GET", "/api/trash", None, Some(&token)).await;
    let mut names = trash.names();
    names.sort();
    assert_eq!(names, vec!["2024", "Docs", "report.pdf"]);

    // Restore brings the subtree back.
    let restored = app
        .request("POST", &format!("/api/nodes/{docs}/restore"), None, Some(&token))
        .await;
    assert_eq!(restored.status, StatusCode::OK);
    assert_eq!(restored.body["data"]["trashed"], false);
    assert!(restored.body["data"]["trashed_at"].is_null());

    let files = app
        .request("GET", &format!("/api/files?parent_id={year}"), None, Some(&token))
        .await;
    assert_eq!(files.names(), vec!["report.pdf"]);
    let trash = app.request("GET", "/api/trash", None, Some(&token)).await;
    assert!(trash.names().is_empty());

    let chain = app
        .request("GET", &format!("/api/ancestors?folder_id={year}"), None, Some(&token))
        .await;
    assert_eq!(chain.names(), vec!["Docs"]);
}

#[tokio::test]
async fn test_double_trash_then_restore_parent() {
    let app = helpers::TestApp::new().await;
    let token = app.token("alice");

    let folder = app.create_folder(&token, "Projects", None).await;
    let file_a = app.create_file(&token, "a.pdf", Some(&folder)).await;

    app.request("POST", &format!("/api/nodes/{file_a}/trash"), None, Some(&token))
        .await;
    app.request("POST", &format!("/api/nodes/{folder}/trash"), None, Some(&token))
        .await;
    app.request("POST", &format!("/api/nodes/{folder}/restore"), None, Some(&token))
        .await;

    // The cascade does not remember that a.pdf was trashed first.
    let files = app
        .request("GET", &format!("/api/files?parent_id={folder}"), None, Some(&token))
        .await;
    assert_eq!(files.names(), vec!["a.pdf"]);
}

#[tokio::test]
async fn test_restore_child_of_trashed_folder_moves_it_to_root() {
    let app = helpers::TestApp::new().await;
    let token = app.token("alice");

    let folder = app.create_folder(&token, "Old", None).await;
    let file = app.create_file(&token, "keep.pdf", Some(&folder)).await;
    app.request("POST", &format!("/api/nodes/{folder}/trash"), None, Some(&token))
        .await;

    let restored = app
        .request("POST", &format!("/api/nodes/{file}/restore"), None, Some(&token))
        .await;
    assert_eq!(restored.status, StatusCode::OK);
    assert!(restored.body["data"]["parent_id"].is_null());

    let roots = app.request("GET", "/api/files", None, Some(&token)).await;
    assert_eq!(roots.names(), vec!["keep.pdf"]);
}

#[tokio::test]
async fn test_rename_rejects_blank_names() {
    let app = helpers::TestApp::new().await;
    let token = app.token("alice");
    let folder = app.create_folder(&token, "Docs", None).await;

    for blank in ["", "   "] {
        let response = app
            .request(
                "PATCH",
                &format!("/api/nodes/{folder}"),
                Some(json!({ "name": blank })),
                Some(&token),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["error"], "VALIDATION_ERROR");
    }

    let roots = app.request("GET", "/api/folders", None, Some(&token)).await;
    assert_eq!(roots.names(), vec!["Docs"]);
}

#[tokio::test]
async fn test_rename_trims_and_updates() {
    let app = helpers::TestApp::new().await;
    let token = app.token("alice");
    let folder = app.create_folder(&token, "Docs", None).await;

    let response = app
        .request(
            "PATCH",
            &format!("/api/nodes/{folder}"),
            Some(json!({ "name": "  Papers  " })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["name"], "Papers");
}

#[tokio::test]
async fn test_sibling_folder_names_are_unique() {
    let app = helpers::TestApp::new().await;
    let token = app.token("alice");
    app.create_folder(&token, "Music", None).await;
    let other = app.create_folder(&token, "Videos", None).await;

    let duplicate = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({ "name": "music" })),
            Some(&token),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let rename = app
        .request(
            "PATCH",
            &format!("/api/nodes/{other}"),
            Some(json!({ "name": "MUSIC" })),
            Some(&token),
        )
        .await;
    assert_eq!(rename.status, StatusCode::CONFLICT);

    // Different owners never clash.
    let bob = app.token("bob");
    app.create_folder(&bob, "Music", None).await;
}

#[tokio::test]
async fn test_create_under_file_is_rejected() {
    let app = helpers::TestApp::new().await;
    let token = app.token("alice");
    let file = app.create_file(&token, "a.pdf", None).await;

    let response = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({ "name": "inside", "parent_id": file })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_resolve_path() {
    let app = helpers::TestApp::new().await;
    let token = app.token("alice");
    let docs = app.create_folder(&token, "My Docs", None).await;
    let year = app.create_folder(&token, "2024", Some(&docs)).await;

    let found = app
        .request("GET", "/api/resolve?path=My-Docs/2024", None, Some(&token))
        .await;
    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.body["data"]["id"], year.as_str());

    let missing = app
        .request("GET", "/api/resolve?path=My-Docs/2025", None, Some(&token))
        .await;
    assert_eq!(missing.status, StatusCode::OK);
    assert!(missing.body["data"].is_null());

    let empty = app.request("GET", "/api/resolve?path=", None, Some(&token)).await;
    assert!(empty.body["data"].is_null());
}

#[tokio::test]
async fn test_ancestors_of_root_folder() {
    let app = helpers::TestApp::new().await;
    let token = app.token("alice");
    let docs = app.create_folder(&token, "Docs", None).await;

    let chain = app
        .request("GET", &format!("/api/ancestors?folder_id={docs}"), None, Some(&token))
        .await;
    assert!(chain.names().is_empty());

    let none = app.request("GET", "/api/ancestors", None, Some(&token)).await;
    assert!(none.names().is_empty());
}

#[tokio::test]
async fn test_missing_node_is_not_found() {
    let app = helpers::TestApp::new().await;
    let token = app.token("alice");

    let response = app
        .request(
            "POST",
            "/api/nodes/00000000-0000-0000-0000-000000000001/trash",
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_restore_keeps_folder_names_unique() {
    let app = helpers::TestApp::new().await;
    let token = app.token("alice");
    let first = app.create_folder(&token, "A", None).await;
    app.request("POST", &format!("/api/nodes/{first}/trash"), None, Some(&token))
        .await;
    app.create_folder(&token, "A", None).await;

    let restored = app
        .request("POST", &format!("/api/nodes/{first}/restore"), None, Some(&token))
        .await;
    assert_eq!(restored.status, StatusCode::OK);
    assert_eq!(restored.body["data"]["name"], "A (2)");

    let roots = app.request("GET", "/api/folders", None, Some(&token)).await;
    assert_eq!(roots.names(), vec!["A (2)", "A"]);
}
