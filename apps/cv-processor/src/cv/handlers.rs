use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::{debug, field, info};
use uuid::Uuid;

use crate::cv::process::process_upload;
use crate::errors::AppError;
use crate::models::cv::{StructuredCv, UploadedFile};
use crate::state::AppState;

const FILE_FIELD: &str = "file";

/// POST /upload-cv/
#[tracing::instrument(
    name = "upload_cv",
    skip_all,
    fields(request_id = %Uuid::new_v4(), filename = field::Empty, fingerprint = field::Empty)
)]
pub async fn handle_upload_cv(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<StructuredCv>, AppError> {
    let upload = read_upload(multipart).await?;
    tracing::Span::current().record("filename", upload.filename.as_str());
    info!("Received file upload: {}", upload.filename);

    let cv = process_upload(&state, upload).await?;
    Ok(Json(cv))
}

/// Pulls the `file` field out of the form; other fields are ignored.
async fn read_upload(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            debug!("Skipping form field {:?}", field.name());
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;

        return Ok(UploadedFile {
            filename,
            content_type,
            bytes,
        });
    }

    Err(AppError::Validation(format!(
        "No file provided. Use form field '{FILE_FIELD}'"
    )))
}
