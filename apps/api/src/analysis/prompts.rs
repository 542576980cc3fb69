// LLM prompt constants for the resume analysis module.

/// System prompt — enforces JSON-only output.
pub const ANALYSIS_SYSTEM: &str = "You are an expert AI resume analyzer. Output only valid JSON.";

/// Analysis prompt template, general-feedback variant.
/// Replace `{resume_text}` before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are an expert AI resume analyzer. Analyze the following resume text.
Provide a detailed, structured analysis in JSON format. The JSON output MUST be a single, valid JSON object and nothing else. Do not include any markdown formatting (like ```json) around the JSON output.

The JSON structure should include:
- "overallImpression": "string (1-2 sentences summary)"
- "strengths": ["string array of key strengths"]
- "areasForImprovement": ["string array of specific, actionable suggestions"]
- "atsFriendliness": { "score": "number (0-100, estimate)", "suggestions": ["string array for ATS optimization"] }
- "relevantSkills": ["string array of skills extracted from the resume relevant to general job applications"]
- "formattingAndStructure": { "clarity": "string (e.g., Good, Fair, Needs Improvement)", "suggestions": ["string array for formatting improvements"] }

Resume Text:
---
{resume_text}
---
Provide general feedback as no job description was provided.
"#;

/// Analysis prompt template, job-match variant.
/// Replace `{resume_text}` and `{jd_text}` before sending.
pub const ANALYSIS_PROMPT_WITH_JD_TEMPLATE: &str = r#"You are an expert AI resume analyzer. Analyze the following resume text.
Provide a detailed, structured analysis in JSON format. The JSON output MUST be a single, valid JSON object and nothing else. Do not include any markdown formatting (like ```json) around the JSON output.

The JSON structure should include:
- "overallImpression": "string (1-2 sentences summary)"
- "strengths": ["string array of key strengths"]
- "areasForImprovement": ["string array of specific, actionable suggestions"]
- "atsFriendliness": { "score": "number (0-100, estimate)", "suggestions": ["string array for ATS optimization"] }
- "relevantSkills": ["string array of skills extracted from the resume relevant to general job applications"]
- "formattingAndStructure": { "clarity": "string (e.g., Good, Fair, Needs Improvement)", "suggestions": ["string array for formatting improvements"] }
- "jobDescriptionMatch": {
 "matchScore": "number (0-100, estimate of how well the resume matches the JD)",
 "matchingKeywords": ["string array of keywords from JD found in resume"],
 "missingKeywords": ["string array of important keywords from JD NOT found in resume"],
 "alignmentFeedback": "string (feedback on how well the resume aligns with the JD and suggestions for improvement)"
}

Resume Text:
---
{resume_text}
---

Job Description:
---
{jd_text}
---
"#;
