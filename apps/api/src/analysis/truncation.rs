//! Content-budget truncation — keeps the combined resume + job-description
//! text under the downstream model's context window.
//!
//! Policy, in order: cap the job description first (head truncation), then
//! give the resume whatever remains of the combined budget, keeping the
//! opening and closing regions (contact/summary and recent experience are
//! the most information-dense parts of a resume).

use serde::Serialize;

/// Marker appended when the job description is head-truncated.
pub const JD_TRUNCATION_MARKER: &str = "\n[job description truncated]";
/// Marker joining the retained head and tail of a truncated resume.
pub const ELISION_MARKER: &str = "\n\n[... middle section omitted ...]\n\n";

/// Percentage of the allowed resume length kept from the start of the text.
const HEAD_PERCENT: usize = 60;
/// Percentage kept from the end.
const TAIL_PERCENT: usize = 30;

/// Character caps for the analysis input. Constructed once at the call site;
/// tests substitute small budgets.
#[derive(Debug, Clone, Copy)]
pub struct ContentBudget {
    /// Combined ceiling for resume + job description.
    pub combined_cap: usize,
    pub resume_cap: usize,
    pub jd_cap: usize,
}

impl Default for ContentBudget {
    fn default() -> Self {
        // Sized for the default free-tier model's context window.
        Self {
            combined_cap: 18_000,
            resume_cap: 15_000,
            jd_cap: 6_000,
        }
    }
}

/// Which inputs were cut. Surfaced in the upload response so the caller can
/// warn the end user that analysis may be incomplete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TruncationInfo {
    pub resume_truncated: bool,
    pub job_description_truncated: bool,
}

/// Resume + optional job description after the budget has been applied.
#[derive(Debug, Clone)]
pub struct BudgetedInput {
    pub resume_text: String,
    pub job_description: Option<String>,
    /// Present only when something was actually cut.
    pub truncation: Option<TruncationInfo>,
}

impl ContentBudget {
    /// Applies the budget. All lengths are counted in characters, not bytes,
    /// so multi-byte text never splits a code point.
    pub fn apply(&self, resume_text: &str, job_description: Option<&str>) -> BudgetedInput {
        let mut jd_truncated = false;

        // Trim only to decide emptiness; within-budget text passes through
        // byte-for-byte.
        let job_description = job_description
            .filter(|jd| !jd.trim().is_empty())
            .map(|jd| {
                if char_len(jd) > self.jd_cap {
                    jd_truncated = true;
                    let mut cut = head_chars(jd, self.jd_cap);
                    cut.push_str(JD_TRUNCATION_MARKER);
                    cut
                } else {
                    jd.to_string()
                }
            });

        let jd_len = job_description.as_deref().map(char_len).unwrap_or(0);
        let remaining = self.combined_cap.saturating_sub(jd_len);
        let allowed = self.resume_cap.min(remaining);

        let (resume_text, resume_truncated) = if char_len(resume_text) > allowed {
            let mut cut = head_chars(resume_text, allowed * HEAD_PERCENT / 100);
            cut.push_str(ELISION_MARKER);
            cut.push_str(&tail_chars(resume_text, allowed * TAIL_PERCENT / 100));
            (cut, true)
        } else {
            (resume_text.to_string(), false)
        };

        let truncation = (resume_truncated || jd_truncated).then_some(TruncationInfo {
            resume_truncated,
            job_description_truncated: jd_truncated,
        });

        BudgetedInput {
            resume_text,
            job_description,
            truncation,
        }
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// First `n` characters of `s`.
fn head_chars(s: &str, n: usize) -> String {
    match s.char_indices().nth(n) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Last `n` characters of `s`.
fn tail_chars(s: &str, n: usize) -> String {
    if n == 0 {
        return String::new();
    }
    let total = char_len(s);
    if n >= total {
        return s.to_string();
    }
    match s.char_indices().nth(total - n) {
        Some((idx, _)) => s[idx..].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_budget() -> ContentBudget {
        ContentBudget {
            combined_cap: 200,
            resume_cap: 100,
            jd_cap: 50,
        }
    }

    /// Deterministic text of `n` characters.
    fn text_of(n: usize) -> String {
        (0..n)
            .map(|i| char::from_digit((i % 10) as u32, 10).unwrap())
            .collect()
    }

    #[test]
    fn test_within_budget_is_a_noop() {
        let budget = small_budget();
        let resume = text_of(80);
        let jd = text_of(40);

        let out = budget.apply(&resume, Some(&jd));

        assert_eq!(out.resume_text, resume);
        assert_eq!(out.job_description.as_deref(), Some(jd.as_str()));
        assert!(out.truncation.is_none());
    }

    #[test]
    fn test_long_resume_keeps_exact_head_and_tail() {
        let budget = small_budget();
        let resume = text_of(300);

        let out = budget.apply(&resume, None);

        // allowed = min(resume_cap, combined_cap) = 100 → head 60, tail 30
        let head: String = resume.chars().take(60).collect();
        let tail: String = resume.chars().skip(300 - 30).collect();
        assert!(out.resume_text.starts_with(&head));
        assert!(out.resume_text.ends_with(&tail));
        assert!(out.resume_text.contains(ELISION_MARKER));
        assert!(out.resume_text.chars().count() <= 100 + ELISION_MARKER.chars().count());
        assert_eq!(
            out.truncation,
            Some(TruncationInfo {
                resume_truncated: true,
                job_description_truncated: false,
            })
        );
    }

    #[test]
    fn test_long_jd_is_head_truncated_with_marker() {
        let budget = small_budget();
        let jd = text_of(80);

        let out = budget.apply("short resume", Some(&jd));

        let jd_out = out.job_description.unwrap();
        let head: String = jd.chars().take(50).collect();
        assert!(jd_out.starts_with(&head));
        assert!(jd_out.ends_with(JD_TRUNCATION_MARKER));
        assert_eq!(
            out.truncation,
            Some(TruncationInfo {
                resume_truncated: false,
                job_description_truncated: true,
            })
        );
    }

    #[test]
    fn test_jd_length_reduces_resume_budget() {
        let budget = ContentBudget {
            combined_cap: 100,
            resume_cap: 100,
            jd_cap: 60,
        };
        let jd = text_of(60);
        let resume = text_of(90);

        let out = budget.apply(&resume, Some(&jd));

        // remaining = 100 - 60 = 40 → head 24, tail 12
        let head: String = resume.chars().take(24).collect();
        let tail: String = resume.chars().skip(90 - 12).collect();
        assert!(out.resume_text.starts_with(&head));
        assert!(out.resume_text.ends_with(&tail));
        assert!(out.truncation.unwrap().resume_truncated);
    }

    #[test]
    fn test_within_budget_jd_keeps_surrounding_whitespace() {
        let budget = small_budget();
        let jd = format!("  {}\n", text_of(40));

        let out = budget.apply("resume body", Some(&jd));

        assert_eq!(out.job_description.as_deref(), Some(jd.as_str()));
        assert!(out.truncation.is_none());
    }

    #[test]
    fn test_blank_jd_is_treated_as_absent() {
        let out = small_budget().apply("resume body", Some("   \n "));
        assert!(out.job_description.is_none());
        assert!(out.truncation.is_none());
    }

    #[test]
    fn test_multibyte_text_counts_characters_not_bytes() {
        let budget = ContentBudget {
            combined_cap: 50,
            resume_cap: 20,
            jd_cap: 10,
        };
        let resume: String = "é".repeat(40);

        let out = budget.apply(&resume, None);

        let head: String = resume.chars().take(12).collect();
        let tail: String = resume.chars().skip(40 - 6).collect();
        assert!(out.resume_text.starts_with(&head));
        assert!(out.resume_text.ends_with(&tail));
    }

    #[test]
    fn test_truncation_info_serializes_camel_case() {
        let info = TruncationInfo {
            resume_truncated: true,
            job_description_truncated: false,
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["resumeTruncated"], true);
        assert_eq!(json["jobDescriptionTruncated"], false);
    }
}
