#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use cameo_api::config::ServerConfig;
use cameo_api::router::build_app_router;
use cameo_api::state::AppState;
use cameo_core::image::ImageArtifact;
use cameo_core::scene::AspectRatio;
use cameo_genai::{GenerationError, ImageGenerator, SceneCharacter};
use cameo_pipeline::Studio;
use cameo_store::{LocalStore, MemoryStore};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        data_dir: PathBuf::from("unused"),
    }
}

// ---------------------------------------------------------------------------
// Scripted generator
// ---------------------------------------------------------------------------

/// Returns queued results in order; once the queue is empty every call
/// fails with `NoImageReturned`. Records the prompt of each call.
#[derive(Default)]
pub struct FakeGenerator {
    results: Mutex<VecDeque<Result<ImageArtifact, GenerationError>>>,
    prompts: Mutex<Vec<String>>,
    credential: bool,
}

impl FakeGenerator {
    pub fn new() -> Self {
        Self {
            credential: true,
            ..Default::default()
        }
    }

    pub fn without_credential() -> Self {
        Self::new()
            .then(Err(GenerationError::MissingCredential))
            .with_credential(false)
    }

    pub fn then(self, result: Result<ImageArtifact, GenerationError>) -> Self {
        self.results.lock().unwrap().push_back(result);
        self
    }

    pub fn then_image(self, payload: &str) -> Self {
        self.then(Ok(png(payload)))
    }

    fn with_credential(mut self, credential: bool) -> Self {
        self.credential = credential;
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn respond(&self, prompt: &str) -> Result<ImageArtifact, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(GenerationError::NoImageReturned))
    }
}

#[async_trait]
impl ImageGenerator for FakeGenerator {
    async fn generate_character(&self, prompt: &str) -> Result<ImageArtifact, GenerationError> {
        self.respond(prompt)
    }

    async fn generate_scene(
        &self,
        prompt: &str,
        _characters: &[SceneCharacter],
        _aspect_ratio: AspectRatio,
    ) -> Result<ImageArtifact, GenerationError> {
        self.respond(prompt)
    }

    async fn edit_scene(
        &self,
        _base_image: &ImageArtifact,
        edit_prompt: &str,
    ) -> Result<ImageArtifact, GenerationError> {
        self.respond(edit_prompt)
    }

    fn has_credential(&self) -> bool {
        self.credential
    }
}

pub fn png(payload: &str) -> ImageArtifact {
    ImageArtifact::from_base64("image/png", payload).unwrap()
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build the full application router over an in-memory library, mirroring
/// `main.rs` so tests exercise the production middleware stack.
pub async fn build_test_app(generator: Arc<FakeGenerator>) -> Router {
    build_test_app_with_store(generator, MemoryStore::new()).await
}

pub async fn build_test_app_with_store(generator: Arc<FakeGenerator>, backend: MemoryStore) -> Router {
    let config = test_config();
    let store = LocalStore::open(backend).await.unwrap();
    let state = AppState {
        studio: Studio::new(generator, store),
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: &Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_empty(app: &Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// POST a multipart form with a single `file` field.
pub async fn post_file(app: &Router, uri: &str, filename: &str, bytes: &[u8]) -> Response {
    let boundary = "cameo-test-boundary";
    let mut body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
