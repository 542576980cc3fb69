//! Typed, defensively-decoded shape of the model's analysis reply.
//!
//! The external model dictates the exact shape and its adherence varies, so
//! every subsection is optional: absent or malformed sections decode to
//! their empty representation instead of failing the whole request. The
//! only required field, `overallImpression`, is presence-checked by the
//! orchestrator.

use serde::{Deserialize, Deserializer, Serialize};

/// Structured feedback for one resume, serialized back to the client as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeAnalysis {
    pub overall_impression: String,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ats_friendliness: Option<AtsFriendliness>,
    pub relevant_skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatting_and_structure: Option<FormattingFeedback>,
    /// Only present when a job description was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_description_match: Option<JobDescriptionMatch>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AtsFriendliness {
    #[serde(deserialize_with = "lenient_score")]
    pub score: Option<f64>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormattingFeedback {
    pub clarity: Option<String>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobDescriptionMatch {
    #[serde(deserialize_with = "lenient_score")]
    pub match_score: Option<f64>,
    pub matching_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub alignment_feedback: Option<String>,
}

/// Accepts a number, a numeric string, or anything else (mapped to absent).
/// Free-tier models return `"85"` about as often as `85`.
fn lenient_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_response_decodes() {
        let raw = r#"{
            "overallImpression": "Strong backend resume.",
            "strengths": ["Clear impact statements"],
            "areasForImprovement": ["Add metrics to older roles"],
            "atsFriendliness": {"score": 82, "suggestions": ["Use standard section headers"]},
            "relevantSkills": ["Rust", "PostgreSQL"],
            "formattingAndStructure": {"clarity": "Good", "suggestions": []},
            "jobDescriptionMatch": {
                "matchScore": 74,
                "matchingKeywords": ["Rust"],
                "missingKeywords": ["Kubernetes"],
                "alignmentFeedback": "Close fit."
            }
        }"#;
        let analysis: ResumeAnalysis = serde_json::from_str(raw).unwrap();
        assert_eq!(analysis.overall_impression, "Strong backend resume.");
        assert_eq!(analysis.ats_friendliness.unwrap().score, Some(82.0));
        assert_eq!(
            analysis.job_description_match.unwrap().match_score,
            Some(74.0)
        );
    }

    #[test]
    fn test_minimal_response_decodes_with_defaults() {
        let raw = r#"{"overallImpression": "Fine."}"#;
        let analysis: ResumeAnalysis = serde_json::from_str(raw).unwrap();
        assert!(analysis.strengths.is_empty());
        assert!(analysis.ats_friendliness.is_none());
        assert!(analysis.job_description_match.is_none());
    }

    #[test]
    fn test_string_score_is_accepted() {
        let raw = r#"{"score": "85", "suggestions": []}"#;
        let ats: AtsFriendliness = serde_json::from_str(raw).unwrap();
        assert_eq!(ats.score, Some(85.0));
    }

    #[test]
    fn test_non_numeric_score_decodes_to_absent() {
        let raw = r#"{"score": "Pending", "suggestions": []}"#;
        let ats: AtsFriendliness = serde_json::from_str(raw).unwrap();
        assert_eq!(ats.score, None);
    }

    #[test]
    fn test_absent_sections_are_not_serialized() {
        let analysis = ResumeAnalysis {
            overall_impression: "ok".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&analysis).unwrap();
        assert!(json.get("atsFriendliness").is_none());
        assert!(json.get("jobDescriptionMatch").is_none());
        assert_eq!(json["overallImpression"], "ok");
    }
}
