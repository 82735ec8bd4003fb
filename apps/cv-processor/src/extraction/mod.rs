//! PDF text extraction.
//!
//! Parsing is CPU-bound. Callers on the async runtime go through
//! [`extract_blocking`], which moves the work onto the blocking pool and turns
//! a panicking parser into an [`ExtractionError`].

use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Failed to read PDF: {0}")]
    Parse(String),

    #[error("PDF contains no extractable text")]
    NoText,

    #[error("PDF extraction aborted: {0}")]
    Aborted(String),
}

/// Turns raw document bytes into plain text.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// Production extractor backed by `pdf-extract`. Pages are emitted in order.
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let text = pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractionError::Parse(e.to_string()))?;

        if text.trim().is_empty() {
            return Err(ExtractionError::NoText);
        }

        debug!("Extracted {} characters from PDF", text.len());
        Ok(text)
    }
}

/// Runs `extractor` on the blocking thread pool.
pub async fn extract_blocking(
    extractor: Arc<dyn TextExtractor>,
    bytes: Bytes,
) -> Result<String, ExtractionError> {
    let text = tokio::task::spawn_blocking(move || extractor.extract(&bytes))
        .await
        .map_err(|e| ExtractionError::Aborted(e.to_string()))??;

    info!("Text extraction complete ({} chars)", text.len());
    Ok(text)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// Builds a one-page PDF whose content stream draws `text` (or nothing).
    pub fn pdf_with_text(text: Option<&str>) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let operations = match text {
            Some(text) => vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
            None => vec![],
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content stream"),
        ));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).expect("serialize pdf");
        bytes
    }
}
