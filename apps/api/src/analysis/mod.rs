//! Analysis orchestration: prompt construction, the LLM call, and defensive
//! decoding of the model's JSON reply.

pub mod prompts;
pub mod result;
pub mod truncation;

use tracing::warn;

use crate::analysis::prompts::{
    ANALYSIS_PROMPT_TEMPLATE, ANALYSIS_PROMPT_WITH_JD_TEMPLATE, ANALYSIS_SYSTEM,
};
use crate::analysis::result::ResumeAnalysis;
use crate::errors::AppError;
use crate::llm_client::LlmClient;

/// Upper bound on raw model output echoed back in error messages.
const RAW_SNIPPET_CHARS: usize = 500;

/// Runs the analysis call for already-budgeted input and decodes the reply.
pub async fn analyze_resume(
    llm: &LlmClient,
    resume_text: &str,
    job_description: Option<&str>,
) -> Result<ResumeAnalysis, AppError> {
    let prompt = build_prompt(resume_text, job_description);
    let raw = llm.call(ANALYSIS_SYSTEM, &prompt).await?;
    parse_analysis(&raw)
}

fn build_prompt(resume_text: &str, job_description: Option<&str>) -> String {
    match job_description {
        Some(jd) => ANALYSIS_PROMPT_WITH_JD_TEMPLATE
            .replace("{resume_text}", resume_text)
            .replace("{jd_text}", jd),
        None => ANALYSIS_PROMPT_TEMPLATE.replace("{resume_text}", resume_text),
    }
}

/// Parses the model reply as strict JSON, falling back to the contents of a
/// fenced code block if the model ignored the output instructions.
fn parse_analysis(raw: &str) -> Result<ResumeAnalysis, AppError> {
    let analysis = match serde_json::from_str::<ResumeAnalysis>(raw.trim()) {
        Ok(analysis) => analysis,
        Err(first_err) => {
            warn!("AI response was not directly parseable JSON: {first_err}");
            let Some(inner) = extract_fenced_json(raw) else {
                return Err(AppError::Analysis(format!(
                    "AI response was not valid JSON: {first_err}. Raw response: {}",
                    snippet(raw)
                )));
            };
            serde_json::from_str::<ResumeAnalysis>(inner).map_err(|e| {
                AppError::Analysis(format!(
                    "AI response was not valid JSON, even after extracting from a fenced block: {e}. Raw response: {}",
                    snippet(raw)
                ))
            })?
        }
    };

    // Duck-typed shape check the upstream contract requires: one field.
    if analysis.overall_impression.trim().is_empty() {
        return Err(AppError::Analysis(
            "AI response is missing the overallImpression field".to_string(),
        ));
    }

    Ok(analysis)
}

/// Returns the contents of the first fenced code block that looks like a
/// JSON object. Accepts both ``` and ```json fences.
fn extract_fenced_json(raw: &str) -> Option<&str> {
    let start = raw.find("```")?;
    let after = &raw[start + 3..];
    let after = after.strip_prefix("json").unwrap_or(after);
    let end = after.find("```")?;
    let inner = after[..end].trim();
    inner.starts_with('{').then_some(inner)
}

fn snippet(raw: &str) -> String {
    raw.chars().take(RAW_SNIPPET_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_REPLY: &str = r#"{"overallImpression": "Solid resume.", "strengths": ["Impact"]}"#;

    #[test]
    fn test_parse_strict_json_reply() {
        let analysis = parse_analysis(VALID_REPLY).unwrap();
        assert_eq!(analysis.overall_impression, "Solid resume.");
    }

    #[test]
    fn test_parse_falls_back_to_fenced_block() {
        let raw = format!("Here is your analysis:\n```json\n{VALID_REPLY}\n```\nHope it helps!");
        let analysis = parse_analysis(&raw).unwrap();
        assert_eq!(analysis.overall_impression, "Solid resume.");
    }

    #[test]
    fn test_parse_accepts_untagged_fence() {
        let raw = format!("```\n{VALID_REPLY}\n```");
        let analysis = parse_analysis(&raw).unwrap();
        assert_eq!(analysis.strengths, vec!["Impact".to_string()]);
    }

    #[test]
    fn test_parse_rejects_missing_overall_impression() {
        let err = parse_analysis(r#"{"strengths": ["a"]}"#).unwrap_err();
        assert!(matches!(err, AppError::Analysis(_)));
    }

    #[test]
    fn test_parse_rejects_prose_reply() {
        let err = parse_analysis("Your resume looks great, keep it up!").unwrap_err();
        assert!(matches!(err, AppError::Analysis(_)));
    }

    #[test]
    fn test_fenced_extraction_ignores_non_json_blocks() {
        assert!(extract_fenced_json("```\nnot json\n```").is_none());
    }

    #[test]
    fn test_prompt_includes_jd_section_only_when_present() {
        let with_jd = build_prompt("resume body", Some("jd body"));
        assert!(with_jd.contains("jobDescriptionMatch"));
        assert!(with_jd.contains("jd body"));

        let without_jd = build_prompt("resume body", None);
        assert!(!without_jd.contains("jobDescriptionMatch"));
        assert!(without_jd.contains("no job description was provided"));
    }
}
