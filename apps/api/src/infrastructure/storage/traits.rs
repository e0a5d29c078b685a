use crate::domain::upload::entity::StoredObject;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Writes `data` under `object.key` and returns the object's public URL.
    async fn upload(&self, object: &StoredObject, data: Vec<u8>) -> anyhow::Result<String>;
    fn get_url(&self, key: &str) -> String;
}
