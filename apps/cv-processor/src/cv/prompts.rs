// CV analysis prompt templates.

pub const CV_ANALYSIS_SYSTEM: &str = "\
You are an expert CV analyzer. \
Extract structured information from the given CV and return it in JSON format. \
You MUST respond with a single valid JSON object only. No markdown fences, no explanations.";

pub const CV_ANALYSIS_PROMPT: &str = r#"Analyze this CV text and extract structured information as JSON.

Use these top-level fields where the CV provides them, and omit the rest:
- "name": string
- "contact": {"email", "phone", "location", "links"}
- "summary": string
- "skills": [string]
- "work_experience": [{"company", "title", "start_date", "end_date", "location", "highlights": [string]}]
- "education": [{"institution", "degree", "field", "start_date", "end_date"}]
- "certifications": [string]
- "languages": [string]

Copy facts as written. Do NOT invent details that are not in the text.

CV TEXT:
{cv_text}"#;

/// Embeds the extracted CV text into the analysis prompt.
pub fn build_analysis_prompt(cv_text: &str) -> String {
    CV_ANALYSIS_PROMPT.replace("{cv_text}", cv_text.trim())
}
