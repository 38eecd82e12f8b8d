use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use uuid::Uuid;

use photomap::config::{CloudinaryConfig, Config, SignatureAlgorithm};
use photomap::db::SubmissionStore;
use photomap::error::AppError;
use photomap::models::{NewSubmission, Submission};
use photomap::upload::{Photo, UploadSink, UploadedPhoto};

/// Smallest byte string the tests pass off as a PNG.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

/// In-memory stand-in for the submissions table.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<Submission>>,
    pub fail_inserts: AtomicBool,
    pub fail_reads: AtomicBool,
}

impl MemoryStore {
    pub fn rows(&self) -> Vec<Submission> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn insert(&self, new: &NewSubmission) -> Result<Submission, AppError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolClosed));
        }
        let row = Submission {
            id: Uuid::now_v7(),
            contact_handle: new.contact_handle.clone(),
            photo_url: new.photo_url.clone(),
            latitude: new.latitude,
            longitude: new.longitude,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn list_recent_first(&self) -> Result<Vec<Submission>, AppError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolClosed));
        }
        // Newest insert first; the stable sort keeps that order for equal timestamps.
        let mut rows: Vec<Submission> = self.rows.lock().unwrap().iter().rev().cloned().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}

/// Upload sink that hands out predictable URLs and remembers what happened.
#[derive(Default)]
pub struct FakeSink {
    counter: AtomicUsize,
    pub uploads: Mutex<Vec<(String, Vec<u8>)>>,
    pub deleted: Mutex<Vec<String>>,
    pub fail_uploads: AtomicBool,
}

impl FakeSink {
    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl UploadSink for FakeSink {
    async fn upload(&self, photo: &Photo) -> Result<UploadedPhoto, AppError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(AppError::Upload("sink unavailable".to_string()));
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let asset_id = format!("user_photos/photo-{n}");
        self.uploads
            .lock()
            .unwrap()
            .push((asset_id.clone(), photo.bytes.to_vec()));
        Ok(UploadedPhoto {
            url: format!(
                "https://res.cloudinary.com/demo/image/upload/{asset_id}.{}",
                photo.format.extension()
            ),
            asset_id,
        })
    }

    async fn delete(&self, asset_id: &str) -> Result<(), AppError> {
        self.deleted.lock().unwrap().push(asset_id.to_string());
        Ok(())
    }
}

/// A running test server backed by in-memory collaborators.
pub struct TestApp {
    pub addr: SocketAddr,
    pub store: Arc<MemoryStore>,
    pub sink: Arc<FakeSink>,
    pub client: Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Submit a complete, valid form with a PNG photo.
    pub async fn submit(&self, handle: &str, lat: &str, lng: &str) -> StatusCode {
        let form = Form::new()
            .text("contactHandle", handle.to_string())
            .text("latitude", lat.to_string())
            .text("longitude", lng.to_string())
            .part("photo", png_part());
        self.submit_form(form).await.0
    }

    /// Submit an arbitrary multipart form, return (status, body text).
    pub async fn submit_form(&self, form: Form) -> (StatusCode, String) {
        let resp = self
            .client
            .post(self.url("/submit"))
            .multipart(form)
            .send()
            .await
            .expect("submit request failed");
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        (status, body)
    }

    /// Fetch the admin page, return (status, html).
    pub async fn admin(&self) -> (StatusCode, String) {
        let resp = self
            .client
            .get(self.url("/admin"))
            .send()
            .await
            .expect("admin request failed");
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        (status, body)
    }
}

pub fn png_part() -> Part {
    Part::bytes(PNG_BYTES.to_vec())
        .file_name("me.png")
        .mime_str("image/png")
        .unwrap()
}

/// Pull the embedded marker array out of the admin page.
pub fn markers_from_html(html: &str) -> Value {
    let start = html
        .find("const markers = ")
        .expect("marker array not found")
        + "const markers = ".len();
    let end = start + html[start..].find(";\n").expect("marker array not terminated");
    serde_json::from_str(&html[start..end]).expect("marker array is not JSON")
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        max_body_size: 1_048_576,
        log_level: "warn".to_string(),
        maps_api_key: "test-maps-key".to_string(),
        cloudinary: CloudinaryConfig {
            cloud_name: "demo".to_string(),
            api_key: "123".to_string(),
            api_secret: "secret".to_string(),
            folder: "user_photos".to_string(),
            signature_algorithm: SignatureAlgorithm::Sha1,
        },
    }
}

/// Spawn the app on a random port with fresh fakes.
pub async fn spawn_app() -> TestApp {
    let store = Arc::new(MemoryStore::default());
    let sink = Arc::new(FakeSink::default());

    let app = photomap::build_app(test_config(), store.clone(), sink.clone());

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        store,
        sink,
        client: Client::new(),
    }
}
