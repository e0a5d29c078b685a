use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb, codecs::jpeg::JpegEncoder};
use serde::de::DeserializeOwned;
use std::{
    io::Cursor,
    sync::{Arc, Mutex},
};
use tower::ServiceExt;
use upload_api::{
    config::Config,
    domain::upload::entity::StoredObject,
    infrastructure::storage::traits::StorageService,
    presentation::http::{routes::create_router, state::AppState},
};
use uuid::Uuid;

pub const PUBLIC_URL: &str = "https://cdn.test.local";
pub const UPLOAD_PATH: &str = "/api/upload";

#[derive(Debug, Clone)]
pub struct StoredPut {
    pub object: StoredObject,
    pub data: Vec<u8>,
}

/// Keeps every write in memory so tests can inspect what reached the bucket.
#[derive(Clone, Default)]
pub struct RecordingStorage {
    puts: Arc<Mutex<Vec<StoredPut>>>,
}

impl RecordingStorage {
    pub fn puts(&self) -> Vec<StoredPut> {
        self.puts.lock().expect("storage lock poisoned").clone()
    }
}

#[async_trait]
impl StorageService for RecordingStorage {
    async fn upload(&self, object: &StoredObject, data: Vec<u8>) -> anyhow::Result<String> {
        self.puts
            .lock()
            .expect("storage lock poisoned")
            .push(StoredPut {
                object: object.clone(),
                data,
            });
        Ok(self.get_url(object.key.as_str()))
    }

    fn get_url(&self, key: &str) -> String {
        format!("{}/{}", PUBLIC_URL, key)
    }
}

/// Object store that is always down.
#[derive(Clone, Default)]
pub struct FailingStorage;

#[async_trait]
impl StorageService for FailingStorage {
    async fn upload(&self, _object: &StoredObject, _data: Vec<u8>) -> anyhow::Result<String> {
        anyhow::bail!("simulated storage outage")
    }

    fn get_url(&self, key: &str) -> String {
        format!("{}/{}", PUBLIC_URL, key)
    }
}

pub fn build_config(max_upload_bytes: usize) -> Config {
    Config {
        r2_access_key: "test".to_string(),
        r2_secret_key: "test".to_string(),
        r2_endpoint: "https://test.r2.cloudflarestorage.com".to_string(),
        r2_region: "auto".to_string(),
        r2_force_path_style: false,
        r2_bucket: "test".to_string(),
        r2_public_url: PUBLIC_URL.to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        upload_path: UPLOAD_PATH.to_string(),
        upload_key_prefix: "cms".to_string(),
        max_upload_bytes,
        image_max_width: 2000,
        webp_quality: 85.0,
        webp_effort: 4,
    }
}

pub struct TestApp {
    pub app: Router,
    pub storage: RecordingStorage,
}

pub fn spawn_app() -> TestApp {
    spawn_app_with_limit(upload_api::config::DEFAULT_MAX_UPLOAD_BYTES)
}

pub fn spawn_app_with_limit(max_upload_bytes: usize) -> TestApp {
    let storage = RecordingStorage::default();
    let state = AppState::new(build_config(max_upload_bytes), Arc::new(storage.clone()));
    TestApp {
        app: create_router(state),
        storage,
    }
}

pub fn spawn_app_with_storage(storage: Arc<dyn StorageService>) -> Router {
    let state = AppState::new(
        build_config(upload_api::config::DEFAULT_MAX_UPLOAD_BYTES),
        storage,
    );
    create_router(state)
}

pub async fn send(app: &Router, req: Request<Body>) -> axum::response::Response {
    app.clone().oneshot(req).await.expect("request failed")
}

pub async fn read_json<T: DeserializeOwned>(res: axum::response::Response) -> T {
    let bytes = to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    serde_json::from_slice(&bytes).expect("failed to parse json")
}

pub async fn read_text(res: axum::response::Response) -> String {
    let bytes = to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    String::from_utf8(bytes.to_vec()).expect("invalid utf8")
}

pub async fn expect_status(
    res: axum::response::Response,
    expected: StatusCode,
) -> axum::response::Response {
    let actual = res.status();

    if actual == expected {
        return res;
    }

    let body = read_text(res).await;
    panic!(
        "HTTP status mismatch. Expected {}, got {}. Response body: {}",
        expected, actual, body
    );
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        filename: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    },
}

pub fn multipart_body(parts: &[Part<'_>]) -> (String, Vec<u8>) {
    let boundary = format!("----upload-boundary-{}", Uuid::now_v7());
    let mut body = Vec::new();

    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                filename,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        name, filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

    (boundary, body)
}

pub fn file_part<'a>(data: &'a [u8]) -> Part<'a> {
    Part::File {
        name: "file",
        filename: "image.png",
        content_type: "image/png",
        data,
    }
}

pub fn upload_request(parts: &[Part<'_>]) -> Request<Body> {
    let (boundary, body) = multipart_body(parts);
    Request::builder()
        .method("POST")
        .uri(UPLOAD_PATH)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .expect("failed to build upload request")
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("failed to encode png");
    bytes
}

/// Landscape JPEG whose left half is red and right half blue, tagged with the
/// given EXIF orientation.
pub fn jpeg_with_orientation(width: u32, height: u32, orientation: u16) -> Vec<u8> {
    let image = ImageBuffer::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgb([255u8, 0, 0])
        } else {
            Rgb([0u8, 0, 255])
        }
    });
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, 95)
        .encode_image(&image)
        .expect("failed to encode jpeg");

    // APP1 segment holding a big-endian TIFF header and a single IFD0 entry
    let mut app1 = vec![0xFF, 0xE1, 0x00, 0x22];
    app1.extend_from_slice(b"Exif\0\0");
    app1.extend_from_slice(&[b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08]);
    app1.extend_from_slice(&[0x00, 0x01]);
    app1.extend_from_slice(&[0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
    app1.extend_from_slice(&orientation.to_be_bytes());
    app1.extend_from_slice(&[0x00, 0x00]);
    app1.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

    let mut out = Vec::with_capacity(jpeg.len() + app1.len());
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&app1);
    out.extend_from_slice(&jpeg[2..]);
    out
}

pub fn assert_status(status: StatusCode, expected: StatusCode) {
    assert_eq!(status, expected, "expected {}, got {}", expected, status);
}
