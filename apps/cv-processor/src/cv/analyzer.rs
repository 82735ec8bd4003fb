//! CV analysis: turns extracted text into a [`StructuredCv`].
//!
//! `AppState` carries an `Arc<dyn CvAnalyzer>`; `LlmCvAnalyzer` is the
//! production backend.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::cv::prompts::{build_analysis_prompt, CV_ANALYSIS_SYSTEM};
use crate::llm_client::{LlmClient, LlmError};
use crate::models::cv::StructuredCv;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{0}")]
    Llm(#[from] LlmError),

    #[error("Model returned {0} instead of a JSON object")]
    NotAnObject(&'static str),
}

#[async_trait]
pub trait CvAnalyzer: Send + Sync {
    async fn analyze(&self, cv_text: &str) -> Result<StructuredCv, AnalysisError>;
}

pub struct LlmCvAnalyzer(pub LlmClient);

#[async_trait]
impl CvAnalyzer for LlmCvAnalyzer {
    async fn analyze(&self, cv_text: &str) -> Result<StructuredCv, AnalysisError> {
        info!(
            "Sending CV text to {} (length: {} chars)",
            self.0.model(),
            cv_text.len()
        );

        let prompt = build_analysis_prompt(cv_text);
        let reply: Value = self.0.call_json(&prompt, CV_ANALYSIS_SYSTEM).await?;

        let cv = StructuredCv::try_from(reply)
            .map_err(|other| AnalysisError::NotAnObject(json_kind(&other)))?;

        info!("Parsed analysis with {} top-level fields", cv.field_count());
        Ok(cv)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
