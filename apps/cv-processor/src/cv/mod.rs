// CV upload pipeline: validation, extraction, cache lookup, analysis.
// All model calls go through llm_client via the CvAnalyzer trait.

pub mod analyzer;
pub mod handlers;
pub mod process;
pub mod prompts;
