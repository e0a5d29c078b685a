use crate::{
    application::upload_image::dto::UploadResult,
    domain::upload::{entity::RawImage, errors::UploadError},
    presentation::http::{errors::AppError, state::AppState},
};
use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
};
use bytes::BytesMut;

/// Multipart field carrying the image.
pub const FILE_FIELD: &str = "file";

pub async fn upload_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResult>, AppError> {
    let multipart = multipart.map_err(|e| UploadError::Multipart(e.body_text()))?;
    let image = read_file_field(multipart, state.config.max_upload_bytes).await?;
    let result = state.upload_use_case.execute(image).await?;
    Ok(Json(result))
}

/// Answers every verb other than POST on the upload route.
pub async fn method_not_allowed() -> AppError {
    UploadError::MethodNotAllowed.into()
}

/// Streams the first non-empty `file` part into memory, refusing to buffer
/// more than `limit` bytes. Only parts named `file` that carry a filename
/// count as uploads, and any after the first are skipped.
async fn read_file_field(mut multipart: Multipart, limit: usize) -> Result<RawImage, UploadError> {
    let mut image = None;

    while let Some(mut field) = multipart.next_field().await.map_err(|e| multipart_error(e, limit))? {
        // A part without a filename is a form value, not an uploaded file
        if field.name() != Some(FILE_FIELD) || field.file_name().is_none() {
            continue;
        }
        if image.is_some() {
            tracing::debug!("Ignoring additional file part");
            continue;
        }

        let file_name = field.file_name().map(str::to_owned);
        let mut data = BytesMut::new();
        while let Some(chunk) = field.chunk().await.map_err(|e| multipart_error(e, limit))? {
            if data.len() + chunk.len() > limit {
                return Err(UploadError::PayloadTooLarge { limit });
            }
            data.extend_from_slice(&chunk);
        }

        if data.is_empty() {
            continue;
        }
        image = Some(RawImage {
            data: data.freeze(),
            file_name,
        });
    }

    image.ok_or(UploadError::NoFile)
}

fn multipart_error(err: MultipartError, limit: usize) -> UploadError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::PayloadTooLarge { limit }
    } else {
        UploadError::Multipart(err.body_text())
    }
}
