use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Leading bytes of every PDF file.
pub const PDF_MAGIC: &[u8] = b"%PDF-";

/// A file received through the upload endpoint. Lives for one request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn has_pdf_extension(&self) -> bool {
        self.filename.to_ascii_lowercase().ends_with(".pdf")
    }

    pub fn has_pdf_signature(&self) -> bool {
        self.bytes.starts_with(PDF_MAGIC)
    }
}

/// The structured record the model extracted from a CV.
///
/// The field layout is whatever the prompt asked for; the only shape enforced
/// here is that the record is a JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructuredCv(Map<String, Value>);

impl StructuredCv {
    pub fn field_count(&self) -> usize {
        self.0.len()
    }
}

impl TryFrom<Value> for StructuredCv {
    /// Non-object values are handed back unchanged.
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}
