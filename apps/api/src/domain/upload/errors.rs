use thiserror::Error;

/// Everything that can stop an upload between request and response.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("No file uploaded")]
    NoFile,
    #[error("File exceeds the {limit} byte upload limit")]
    PayloadTooLarge { limit: usize },
    #[error("Malformed multipart body: {0}")]
    Multipart(String),
    #[error("Image transcoding failed: {0}")]
    Transcode(String),
    #[error("Object storage write failed: {0}")]
    Storage(String),
}
