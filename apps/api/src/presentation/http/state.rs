use crate::{
    application::upload_image::use_case::UploadImageUseCase,
    config::Config,
    infrastructure::{
        image::{TranscodeOptions, WebpTranscoder},
        storage::traits::StorageService,
    },
};
use std::sync::Arc;

/// Process-wide handles shared by every request. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub upload_use_case: Arc<UploadImageUseCase>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, storage: Arc<dyn StorageService>) -> Self {
        let transcoder = Arc::new(WebpTranscoder::new(TranscodeOptions::from(&config)));
        let upload_use_case = Arc::new(UploadImageUseCase::new(
            storage,
            transcoder,
            config.upload_key_prefix.clone(),
        ));
        Self {
            upload_use_case,
            config,
        }
    }
}
