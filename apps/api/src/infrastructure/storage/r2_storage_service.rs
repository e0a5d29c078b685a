use super::traits::StorageService;
use crate::{config::Config, domain::upload::entity::StoredObject};
use anyhow::Context;
use async_trait::async_trait;
use aws_sdk_s3::{
    Client, config::BehaviorVersion, config::Credentials, config::Region, primitives::ByteStream,
};

/// Cloudflare R2 (or any S3-compatible store) behind [`StorageService`].
///
/// Built once at startup; the client is cheap to share across requests.
pub struct R2StorageService {
    client: Client,
    bucket: String,
    public_url: String,
}

impl R2StorageService {
    pub fn new(
        key: String,
        secret: String,
        endpoint: String,
        region: String,
        force_path_style: bool,
        bucket: String,
        public_url: String,
    ) -> Self {
        let creds = Credentials::new(key, secret, None, None, "r2");
        let config = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .credentials_provider(creds)
            .endpoint_url(endpoint)
            .region(Region::new(region))
            .force_path_style(force_path_style)
            .build();
        Self {
            client: Client::from_conf(config),
            bucket,
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.r2_access_key.clone(),
            config.r2_secret_key.clone(),
            config.r2_endpoint.clone(),
            config.r2_region.clone(),
            config.r2_force_path_style,
            config.r2_bucket.clone(),
            config.r2_public_url.clone(),
        )
    }
}

#[async_trait]
impl StorageService for R2StorageService {
    async fn upload(&self, object: &StoredObject, data: Vec<u8>) -> anyhow::Result<String> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(object.key.as_str())
            .body(ByteStream::from(data))
            .content_type(&object.content_type)
            .cache_control(&object.cache_control)
            .send()
            .await
            .with_context(|| format!("PutObject {}/{} failed", self.bucket, object.key))?;
        Ok(self.get_url(object.key.as_str()))
    }

    fn get_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_url, key)
    }
}
