//! Shared test helpers for integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, Bytes};
use http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use drive_auth::JwtEncoder;
use drive_core::config::AppConfig;
use drive_core::types::OwnerId;
use drive_database::MemoryNodeStore;
use drive_storage::MemoryObjectStore;
use drive_worker::{DeletionQueue, WorkerHandle, spawn_deletion_worker};

const BOUNDARY: &str = "drive-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Entity store behind the router
    pub store: Arc<MemoryNodeStore>,
    /// Object store behind the router
    pub objects: Arc<MemoryObjectStore>,
    /// Deletion queue shared with the worker
    pub queue: Arc<DeletionQueue>,
    /// Running deletion worker, when enabled
    pub worker: Option<WorkerHandle>,
    /// Mints bearer tokens with the app's secret
    pub encoder: JwtEncoder,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a new test application over in-memory stores
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test application after adjusting the default config
    pub async fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "integration-test-secret".to_string();
        config.storage.max_upload_size_bytes = 1024 * 1024;
        config.worker.backoff_base_ms = 1;
        config.worker.max_attempts = 2;
        adjust(&mut config);

        let store = Arc::new(MemoryNodeStore::new());
        let objects = Arc::new(MemoryObjectStore::new());
        let (queue, worker) = spawn_deletion_worker(&config.worker, store.clone(), objects.clone());

        let state = drive_api::AppState::new(
            config.clone(),
            store.clone(),
            objects.clone(),
            queue.clone(),
        );

        Self {
            router: drive_api::build_app(state),
            store,
            objects,
            queue,
            worker,
            encoder: JwtEncoder::new(&config.auth),
            config,
        }
    }

    /// A valid bearer token for `owner`
    pub fn token(&self, owner: &str) -> String {
        self.encoder
            .issue(&OwnerId::new(owner))
            .expect("Failed to issue token")
    }

    /// Send a JSON request and parse the JSON response
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Upload `data` as a multipart form
    pub async fn upload(
        &self,
        token: &str,
        parent_id: Option<&str>,
        file_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> TestResponse {
        let mut body = Vec::new();
        if let Some(parent) = parent_id {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"parent_id\"\r\n\r\n{parent}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let req = Request::builder()
            .method("POST")
            .uri("/api/files/upload")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .header("Authorization", format!("Bearer {}", token))
            .body(Body::from(body))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Fetch raw bytes, e.g. file content
    pub async fn get_raw(&self, path: &str, token: &str) -> RawResponse {
        let req = Request::builder()
            .method("GET")
            .uri(path)
            .header("Authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
            .await
            .expect("Failed to read body");

        RawResponse {
            status,
            headers,
            body,
        }
    }

    /// Create a folder and return its id
    pub async fn create_folder(&self, token: &str, name: &str, parent_id: Option<&str>) -> String {
        let response = self
            .request(
                "POST",
                "/api/folders",
                Some(serde_json::json!({ "name": name, "parent_id": parent_id })),
                Some(token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.id()
    }

    /// Create a file record and return its id
    pub async fn create_file(&self, token: &str, name: &str, parent_id: Option<&str>) -> String {
        let response = self
            .request(
                "POST",
                "/api/files",
                Some(serde_json::json!({
                    "name": name,
                    "parent_id": parent_id,
                    "mime_type": "application/pdf",
                    "size_bytes": 1024,
                })),
                Some(token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.id()
    }

    /// Poll a deletion task until it reaches `phase`
    pub async fn wait_for_phase(&self, token: &str, task_id: &str, phase: &str) -> Value {
        let path = format!("/api/deletions/{task_id}");
        for _ in 0..400 {
            let response = self.request("GET", &path, None, Some(token)).await;
            if response.body["data"]["phase"] == phase {
                return response.body["data"].clone();
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("Deletion task {task_id} never reached {phase}");
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// `data.id` of a single-node response
    pub fn id(&self) -> String {
        self.body["data"]["id"]
            .as_str()
            .expect("Response has no data.id")
            .to_string()
    }

    /// `data` as an array of node names
    pub fn names(&self) -> Vec<String> {
        self.body["data"]
            .as_array()
            .expect("Response data is not an array")
            .iter()
            .filter_map(|node| node["name"].as_str().map(String::from))
            .collect()
    }
}

/// Response with an unparsed body
#[derive(Debug)]
pub struct RawResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Body bytes
    pub body: Bytes,
}
