//! Integration tests for identity and ownership checks.

mod helpers;

use http::StatusCode;
use serde_json::json;

use drive_core::types::OwnerId;

#[tokio::test]
async fn test_anonymous_queries_degrade_to_empty() {
    let app = helpers::TestApp::new().await;
    let token = app.token("alice");
    let docs = app.create_folder(&token, "Docs", None).await;

    for path in ["/api/folders", "/api/files", "/api/trash"] {
        let response = app.request("GET", path, None, None).await;
        assert_eq!(response.status, StatusCode::OK, "{path}");
        assert!(response.names().is_empty(), "{path}");
    }

    let chain = app
        .request("GET", &format!("/api/ancestors?folder_id={docs}"), None, None)
        .await;
    assert!(chain.names().is_empty());

    let resolved = app.request("GET", "/api/resolve?path=Docs", None, None).await;
    assert_eq!(resolved.status, StatusCode::OK);
    assert!(resolved.body["data"].is_null());

    let usage = app.request("GET", "/api/usage", None, None).await;
    assert_eq!(usage.status, StatusCode::OK);
    assert_eq!(usage.body["data"]["used_bytes"], 0);
    assert_eq!(usage.body["data"]["folder_count"], 0);
}

#[tokio::test]
async fn test_anonymous_mutations_are_unauthorized() {
    let app = helpers::TestApp::new().await;
    let token = app.token("alice");
    let docs = app.create_folder(&token, "Docs", None).await;

    let create = app
        .request("POST", "/api/folders", Some(json!({ "name": "x" })), None)
        .await;
    assert_eq!(create.status, StatusCode::UNAUTHORIZED);

    let rename = app
        .request(
            "PATCH",
            &format!("/api/nodes/{docs}"),
            Some(json!({ "name": "y" })),
            None,
        )
        .await;
    assert_eq!(rename.status, StatusCode::UNAUTHORIZED);

    let trash = app
        .request("POST", &format!("/api/nodes/{docs}/trash"), None, None)
        .await;
    assert_eq!(trash.status, StatusCode::UNAUTHORIZED);

    let delete = app
        .request("DELETE", &format!("/api/nodes/{docs}"), None, None)
        .await;
    assert_eq!(delete.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_tokens_are_rejected() {
    let app = helpers::TestApp::new().await;

    let garbage = app
        .request("GET", "/api/folders", None, Some("not-a-jwt"))
        .await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
    assert_eq!(garbage.body["error"], "UNAUTHORIZED");

    let expired = app
        .encoder
        .issue_with_ttl(&OwnerId::new("alice"), chrono::Duration::minutes(-10))
        .expect("token");
    let response = app.request("GET", "/api/folders", None, Some(&expired)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let mut other = app.config.auth.clone();
    other.jwt_secret = "some-other-secret".to_string();
    let forged = drive_auth::JwtEncoder::new(&other)
        .issue(&OwnerId::new("alice"))
        .expect("token");
    let response = app.request("GET", "/api/folders", None, Some(&forged)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_foreign_mutations_are_forbidden() {
    let app = helpers::TestApp::new().await;
    let alice = app.token("alice");
    let bob = app.token("bob");
    let docs = app.create_folder(&alice, "Docs", None).await;

    let rename = app
        .request(
            "PATCH",
            &format!("/api/nodes/{docs}"),
            Some(json!({ "name": "Mine" })),
            Some(&bob),
        )
        .await;
    assert_eq!(rename.status, StatusCode::FORBIDDEN);

    for action in ["trash", "restore"] {
        let response = app
            .request("POST", &format!("/api/nodes/{docs}/{action}"), None, Some(&bob))
            .await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "{action}");
    }

    let delete = app
        .request("DELETE", &format!("/api/nodes/{docs}"), None, Some(&bob))
        .await;
    assert_eq!(delete.status, StatusCode::FORBIDDEN);

    let nested = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({ "name": "intruder", "parent_id": docs })),
            Some(&bob),
        )
        .await;
    assert_eq!(nested.status, StatusCode::FORBIDDEN);

    // Nothing changed for the owner.
    let roots = app.request("GET", "/api/folders", None, Some(&alice)).await;
    assert_eq!(roots.names(), vec!["Docs"]);
    assert_eq!(roots.body["data"][0]["trashed"], false);
}

#[tokio::test]
async fn test_owners_do_not_see_each_other() {
    let app = helpers::TestApp::new().await;
    let alice = app.token("alice");
    let bob = app.token("bob");
    let docs = app.create_folder(&alice, "Docs", None).await;

    let listing = app.request("GET", "/api/folders", None, Some(&bob)).await;
    assert!(listing.names().is_empty());

    let chain = app
        .request("GET", &format!("/api/ancestors?folder_id={docs}"), None, Some(&bob))
        .await;
    assert!(chain.names().is_empty());

    let resolved = app.request("GET", "/api/resolve?path=Docs", None, Some(&bob)).await;
    assert!(resolved.body["data"].is_null());
}
