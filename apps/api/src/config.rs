//! Application configuration loading from environment variables.
//!
//! All configuration is loaded from the environment at startup via standard `std::env::var`
//! (a `.env` file is honoured through `dotenvy` in `main`). The resulting [`Config`] is
//! cloned into the shared state and never mutated afterwards.
//!
//! # Environment Variables
//!
//! ## Required Variables
//! - `CF_ACCOUNT_ID`: Cloudflare account id, used to derive the R2 endpoint
//! - `R2_ACCESS_KEY`: Cloudflare R2 access key
//! - `R2_SECRET_KEY`: Cloudflare R2 secret key
//! - `R2_BUCKET`: bucket receiving the optimized images
//! - `R2_PUBLIC_URL`: public base URL mapped onto the bucket contents
//!
//! ## Optional Variables
//! - `RUST_LOG`: Logging level (default: "info,upload_api=debug,tower_http=debug")
//! - `R2_ENDPOINT`: Explicit S3 endpoint (default: derived from `CF_ACCOUNT_ID`)
//! - `R2_REGION`: AWS region (default: "auto")
//! - `R2_FORCE_PATH_STYLE`: Use path-style URLs (default: false)
//! - `HOST`: Server bind address (default: "0.0.0.0")
//! - `PORT`: Server port (default: 3000)
//! - `UPLOAD_PATH`: Route of the upload endpoint (default: "/api/upload")
//! - `UPLOAD_KEY_PREFIX`: Namespace of stored object keys (default: "cms")
//! - `MAX_UPLOAD_BYTES`: Largest accepted file (default: 10 MiB)
//! - `IMAGE_MAX_WIDTH`: Width bound of stored images (default: 2000)
//! - `WEBP_QUALITY`: Lossy WebP quality, 0-100 (default: 85)
//! - `WEBP_EFFORT`: libwebp compression method, 0-6 (default: 4)

use serde::Deserialize;

/// 10 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Complete server configuration loaded from environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Cloudflare R2 access key ID
    pub r2_access_key: String,

    /// Cloudflare R2 secret access key
    pub r2_secret_key: String,

    /// R2 API endpoint (e.g., `https://<account>.r2.cloudflarestorage.com`)
    pub r2_endpoint: String,

    /// AWS region for R2 (typically "auto")
    pub r2_region: String,

    /// Use path-style URLs instead of virtual-hosted-style (for S3-compatible services)
    pub r2_force_path_style: bool,

    /// Bucket where optimized images are stored
    pub r2_bucket: String,

    /// Public URL for accessing stored objects, without trailing slash
    pub r2_public_url: String,

    /// Server bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Path the upload handler is mounted on
    pub upload_path: String,

    /// Namespace placed in front of every generated object key
    pub upload_key_prefix: String,

    /// Maximum size in bytes of the uploaded file
    pub max_upload_bytes: usize,

    /// Images wider than this are scaled down, aspect preserved
    pub image_max_width: u32,

    /// Lossy WebP quality factor
    pub webp_quality: f32,

    /// libwebp `method` (0 = fastest, 6 = smallest output)
    pub webp_effort: i32,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required environment variable is missing or
    /// cannot be parsed to the expected type.
    pub fn from_env() -> anyhow::Result<Self> {
        let r2_endpoint = match std::env::var("R2_ENDPOINT") {
            Ok(endpoint) => endpoint,
            Err(_) => r2_endpoint_for_account(&env_required("CF_ACCOUNT_ID")?),
        };

        let webp_quality: f32 = env_or("WEBP_QUALITY", 85.0)?;
        if !(0.0..=100.0).contains(&webp_quality) {
            anyhow::bail!("WEBP_QUALITY must be between 0 and 100, got {}", webp_quality);
        }

        Ok(Self {
            r2_access_key: env_required("R2_ACCESS_KEY")?,
            r2_secret_key: env_required("R2_SECRET_KEY")?,
            r2_endpoint,
            r2_region: env_or("R2_REGION", "auto".to_string())?,
            r2_force_path_style: env_or("R2_FORCE_PATH_STYLE", false)?,
            r2_bucket: env_required("R2_BUCKET")?,
            r2_public_url: normalize_public_url(&env_required("R2_PUBLIC_URL")?),
            host: env_or("HOST", "0.0.0.0".to_string())?,
            port: env_or("PORT", 3000)?,
            upload_path: upload_route(&env_or("UPLOAD_PATH", "/api/upload".to_string())?)?,
            upload_key_prefix: env_or("UPLOAD_KEY_PREFIX", "cms".to_string())?,
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            image_max_width: env_or("IMAGE_MAX_WIDTH", 2000)?,
            webp_quality,
            webp_effort: env_or("WEBP_EFFORT", 4_i32)?.clamp(0, 6),
        })
    }
}

/// Endpoint of the S3-compatible API for a Cloudflare account.
pub fn r2_endpoint_for_account(account_id: &str) -> String {
    format!("https://{}.r2.cloudflarestorage.com", account_id.trim())
}

fn normalize_public_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn normalize_route(path: &str) -> String {
    format!("/{}", path.trim().trim_matches('/'))
}

/// Route reserved for the liveness check.
pub const HEALTH_PATH: &str = "/health";

/// Normalizes `UPLOAD_PATH` and refuses routes the router already serves.
///
/// # Errors
///
/// Returns an error if the path collides with [`HEALTH_PATH`].
fn upload_route(path: &str) -> anyhow::Result<String> {
    let route = normalize_route(path);
    if route == HEALTH_PATH {
        anyhow::bail!("UPLOAD_PATH must not be {}", HEALTH_PATH);
    }
    Ok(route)
}

/// Load a required environment variable.
///
/// # Errors
///
/// Returns an error if the variable is not set.
fn env_required(key: &str) -> anyhow::Result<String> {
    std::env::var(key).map_err(|_| anyhow::anyhow!("Missing required environment variable: {}", key))
}

/// Load an environment variable with a default value.
///
/// # Errors
///
/// Returns an error if the variable is set but cannot be parsed.
fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}
