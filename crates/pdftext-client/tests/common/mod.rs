//! In-process stand-in for the extraction service.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, State};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// A multipart field received by `/extract`.
#[derive(Debug, Clone)]
pub struct Upload {
    pub field: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Everything the fake service saw.
#[derive(Debug, Default)]
pub struct Seen {
    pub hits: usize,
    pub api_keys: Vec<Option<String>>,
    pub user_agents: Vec<Option<String>>,
    pub content_types: Vec<Option<String>>,
    pub uploads: Vec<Upload>,
    pub json_bodies: Vec<Value>,
}

pub type Recorder = Arc<Mutex<Seen>>;

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn record_headers(seen: &Recorder, headers: &HeaderMap) {
    let mut seen = seen.lock().unwrap();
    seen.hits += 1;
    seen.api_keys.push(header(headers, "x-api-key"));
    seen.user_agents.push(header(headers, "user-agent"));
    seen.content_types.push(header(headers, "content-type"));
}

async fn health(State(seen): State<Recorder>, headers: HeaderMap) -> Json<Value> {
    record_headers(&seen, &headers);
    Json(json!({"status": "ok", "version": "1.0.0"}))
}

async fn extract(
    State(seen): State<Recorder>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Json<Value> {
    record_headers(&seen, &headers);

    let mut uploads = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.unwrap().to_vec();
        uploads.push(Upload {
            field: name,
            file_name,
            content_type,
            bytes,
        });
    }

    let (file_name, file_size) = uploads
        .first()
        .map(|u| (u.file_name.clone().unwrap_or_default(), u.bytes.len()))
        .unwrap_or_default();
    seen.lock().unwrap().uploads.extend(uploads);

    Json(json!({
        "pages": [{"page": 1, "text": "Sample extracted text from PDF."}],
        "page_count": 1,
        "file_name": file_name,
        "file_size": file_size
    }))
}

async fn extract_from_gcs(
    State(seen): State<Recorder>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    record_headers(&seen, &headers);
    let output = body.get("output_gcs_url").cloned();
    seen.lock().unwrap().json_bodies.push(body);

    let mut response = json!({
        "pages": [
            {"page": 1, "text": "Sample extracted text from GCS PDF page 1."},
            {"page": 2, "text": "Sample extracted text from GCS PDF page 2."}
        ],
        "page_count": 2,
        "file_name": "test.pdf",
        "file_size": 2048,
        "method": "pdfplumber"
    });
    if let Some(output) = output {
        response["output_location"] = output;
    }
    Json(response)
}

/// Router answering like a healthy extraction service.
pub fn service(seen: Recorder) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/extract", post(extract))
        .route("/extract-from-gcs", post(extract_from_gcs))
        .with_state(seen)
}

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Serve the healthy fake service and return its base URL and recorder.
pub async fn spawn_service() -> (String, Recorder) {
    let seen = Recorder::default();
    let url = spawn(service(seen.clone())).await;
    (url, seen)
}
