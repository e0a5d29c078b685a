use crate::{
    application::upload_image::dto::UploadResult,
    domain::upload::{
        entity::{OptimizedImage, RawImage, StoredObject},
        errors::UploadError,
        value_objects::ObjectKey,
    },
    infrastructure::{
        image::{TranscodeError, WebpTranscoder},
        storage::traits::StorageService,
    },
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Transcodes one uploaded image and writes it to object storage.
///
/// The pipeline is strictly linear: transcode, generate a fresh key, store,
/// build the public URL. Any failure returns early and nothing is written
/// unless every prior step succeeded, so there is no partial state to undo.
pub struct UploadImageUseCase {
    storage: Arc<dyn StorageService>,
    transcoder: Arc<WebpTranscoder>,
    key_prefix: String,
}

impl UploadImageUseCase {
    pub fn new(
        storage: Arc<dyn StorageService>,
        transcoder: Arc<WebpTranscoder>,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            transcoder,
            key_prefix: key_prefix.into(),
        }
    }

    /// Runs the pipeline for `image`.
    ///
    /// # Errors
    /// - [`UploadError::Transcode`] if the bytes are not a decodable image or
    ///   encoding fails
    /// - [`UploadError::Storage`] if the object store rejects the write
    #[instrument(skip(self, image), fields(
        image_size = image.size(),
        file_name = image.file_name.as_deref().unwrap_or("")
    ))]
    pub async fn execute(&self, image: RawImage) -> Result<UploadResult, UploadError> {
        let transcoder = self.transcoder.clone();
        let optimized = tokio::task::spawn_blocking(move || transcoder.transcode(&image.data))
            .await
            .map_err(|e| UploadError::Transcode(format!("transcode task aborted: {}", e)))??;

        let object = StoredObject::webp(ObjectKey::generate(
            &self.key_prefix,
            OptimizedImage::EXTENSION,
        ));
        debug!(
            key = %object.key,
            width = optimized.width,
            height = optimized.height,
            bytes = optimized.size(),
            "Uploading optimized image"
        );

        let url = self
            .storage
            .upload(&object, optimized.data)
            .await
            .map_err(|e| UploadError::Storage(format!("{:#}", e)))?;

        info!(key = %object.key, "Stored optimized image");
        Ok(UploadResult { url })
    }
}

impl From<TranscodeError> for UploadError {
    fn from(err: TranscodeError) -> Self {
        UploadError::Transcode(err.to_string())
    }
}
