//! Verdict extraction from free-form model output.
//!
//! The safety, category and confidence decisions are substring heuristics
//! over the case-folded response. They misfire on text that merely discusses
//! prohibited topics; the dashboard depends on this exact behaviour, so it is
//! reproduced as-is and tuned only through `HeuristicPolicy`.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use super::analysis::build_detailed_analysis;
use super::confidence::compute_verdict_confidence;
use super::policy::{contains_any, HeuristicPolicy};
use super::types::{ClassificationVerdict, ContentKind, VerdictSource};
use super::ClassificationError;

pub const SAFE_CATEGORY: &str = "safe";
pub const SAFE_REASON: &str = "No policy violations detected";
pub const DEFAULT_UNSAFE_REASON: &str = "Potential policy violation detected";

/// Fields an embedded JSON object may carry the completion text in.
const EMBEDDED_TEXT_FIELDS: &[&str] = &["text", "response", "content", "analysis"];

static BECAUSE_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bbecause\s+([^.!?\n]+)").expect("because pattern is valid")
});

static ISSUES_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bissues?\b[ \t]*:?\s*([^.!?\n]+)").expect("issues pattern is valid")
});

/// Turn a raw completion into a verdict.
///
/// Fails only when there is no text to analyse, so the caller can fall back.
pub fn extract_verdict(
    raw: &str,
    kind: ContentKind,
    policy: &HeuristicPolicy,
) -> Result<ClassificationVerdict, ClassificationError> {
    let text = unwrap_embedded_text(raw);
    if text.trim().is_empty() {
        return Err(ClassificationError::ProviderMalformedResponse(
            "Completion contains no text".into(),
        ));
    }

    let lowered = text.to_lowercase();
    let safe = is_safe(&lowered, policy);

    let reason = if safe {
        SAFE_REASON.to_string()
    } else {
        extract_reason(&text)
    };

    Ok(ClassificationVerdict {
        safe,
        reason,
        category: determine_category(safe, &lowered, kind, policy),
        confidence: compute_verdict_confidence(safe, &text, policy),
        raw_response: Some(raw.to_string()),
        detailed_analysis: build_detailed_analysis(&text),
        source: VerdictSource::Provider,
    })
}

/// Unsafe if any unsafe marker appears anywhere in the case-folded text.
pub fn is_safe(lowered: &str, policy: &HeuristicPolicy) -> bool {
    !contains_any(lowered, &policy.unsafe_markers)
}

/// Reason for an unsafe verdict: the `because` clause, else the `issue(s)`
/// clause, else a fixed default.
pub fn extract_reason(text: &str) -> String {
    [&*BECAUSE_CLAUSE, &*ISSUES_CLAUSE]
        .iter()
        .filter_map(|re| re.captures(text))
        .filter_map(|caps| caps.get(1))
        .map(|m| clean_clause(m.as_str()))
        .find(|clause| !clause.is_empty())
        .unwrap_or_else(|| DEFAULT_UNSAFE_REASON.to_string())
}

fn clean_clause(clause: &str) -> String {
    clause
        .trim()
        .trim_start_matches(['-', '*', ' ', '\t'])
        .trim_end_matches(['*', ' ', '\t', ',', ';', ':'])
        .to_string()
}

/// Category label: `safe`, or a `{kind}_...` violation label chosen by
/// keyword priority: violence, adult, hate, generic.
pub fn determine_category(
    safe: bool,
    lowered: &str,
    kind: ContentKind,
    policy: &HeuristicPolicy,
) -> String {
    if safe {
        return SAFE_CATEGORY.to_string();
    }
    let suffix = if contains_any(lowered, &policy.violence_terms) {
        "policy_violation"
    } else if contains_any(lowered, &policy.adult_terms) {
        "adult_content"
    } else if contains_any(lowered, &policy.hate_terms) {
        "hate_speech"
    } else {
        "policy_violation"
    };
    format!("{kind}_{suffix}")
}

/// If the completion is a JSON object wrapping the answer, return the
/// wrapped text. Anything else is returned unchanged.
fn unwrap_embedded_text(raw: &str) -> Cow<'_, str> {
    let trimmed = raw.trim();
    if !trimmed.starts_with('{') {
        return Cow::Borrowed(raw);
    }
    let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(trimmed)
    else {
        return Cow::Borrowed(raw);
    };
    EMBEDDED_TEXT_FIELDS
        .iter()
        .find_map(|field| map.get(*field).and_then(|v| v.as_str()))
        .map(|s| Cow::Owned(s.to_string()))
        .unwrap_or(Cow::Borrowed(raw))
}
