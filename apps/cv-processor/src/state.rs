use std::sync::Arc;

use crate::cache::ResultCache;
use crate::config::Config;
use crate::cv::analyzer::CvAnalyzer;
use crate::extraction::TextExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub extractor: Arc<dyn TextExtractor>,
    /// Pluggable analysis backend. Default: `LlmCvAnalyzer`.
    pub analyzer: Arc<dyn CvAnalyzer>,
    pub cache: ResultCache,
}
