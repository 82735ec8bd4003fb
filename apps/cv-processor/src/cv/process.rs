use tracing::{error, info, warn};

use crate::cache::Fingerprint;
use crate::errors::AppError;
use crate::extraction::extract_blocking;
use crate::models::cv::{StructuredCv, UploadedFile};
use crate::state::AppState;

/// Rejects anything that is not a PDF before any parsing happens.
pub fn validate_upload(upload: &UploadedFile) -> Result<(), AppError> {
    if !upload.has_pdf_extension() {
        return Err(AppError::InvalidFileType(format!(
            "Only PDF files are accepted (got '{}')",
            upload.filename
        )));
    }
    if !upload.has_pdf_signature() {
        return Err(AppError::InvalidFileType(format!(
            "'{}' is not a PDF document",
            upload.filename
        )));
    }
    Ok(())
}

/// Runs one upload through extract → cache lookup → analyze → cache store.
///
/// Cache failures never fail the request: a broken read falls through to a
/// live analysis, a broken write still returns the fresh result.
pub async fn process_upload(
    state: &AppState,
    upload: UploadedFile,
) -> Result<StructuredCv, AppError> {
    validate_upload(&upload)?;

    let fingerprint = Fingerprint::of(&upload.bytes);
    tracing::Span::current().record("fingerprint", fingerprint.as_str());
    info!(
        "Processing '{}' ({} bytes, {})",
        upload.filename,
        upload.bytes.len(),
        upload.content_type.as_deref().unwrap_or("no content type")
    );

    let cv_text = extract_blocking(state.extractor.clone(), upload.bytes).await?;

    match state.cache.get::<StructuredCv>(&fingerprint).await {
        Ok(Some(cached)) => {
            info!("Returning cached result for '{}'", upload.filename);
            return Ok(cached);
        }
        Ok(None) => {}
        Err(e) => warn!("Cache read failed, analyzing live: {e}"),
    }

    let cv = state.analyzer.analyze(&cv_text).await?;

    if let Err(e) = state.cache.put(&fingerprint, &cv).await {
        error!("Failed to cache analysis for {fingerprint}: {e}");
    }

    Ok(cv)
}
