//! Deterministic offline verdicts.
//!
//! Used whenever the completion provider is unconfigured, unreachable, or
//! answers with something unusable. The verdict depends on the content
//! string alone: same content, same verdict, in every process.

use super::analysis::render_sections;
use super::confidence::clamp_confidence;
use super::policy::HeuristicPolicy;
use super::types::{ClassificationVerdict, ContentKind, VerdictSource};

/// Stored in `raw_response` of every synthesized verdict.
pub const FALLBACK_MARKER: &str =
    "[fallback] Verdict synthesized locally; the content classifier was not consulted.";

pub const FALLBACK_SAFE_REASON: &str = "No policy issues were found in the submitted content.";

/// Order-preserving 32-bit string hash over UTF-16 code units
/// (`h = h * 31 + c` with wrapping), returned as its absolute value.
pub fn content_hash(content: &str) -> u32 {
    content
        .encode_utf16()
        .fold(0i32, |h, c| {
            h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(c))
        })
        .unsigned_abs()
}

/// Canned narrative for an unsafe fallback verdict of one content kind.
struct UnsafeNarrative {
    category: &'static str,
    reason: &'static str,
    assessment: &'static str,
    issues: &'static str,
    reasoning: &'static str,
    recommendations: &'static str,
}

fn unsafe_narrative(kind: ContentKind) -> UnsafeNarrative {
    match kind {
        ContentKind::Image => UnsafeNarrative {
            category: "visual_policy_violation",
            reason: "The image may contain inappropriate imagery that violates content policy.",
            assessment: "The image appears to contain visual elements that do not comply with the content policy.",
            issues: "Potentially inappropriate imagery was identified in the visual content.",
            reasoning: "Visual elements in the image resemble material the policy prohibits.",
            recommendations: "Hold the image for manual review before it is published.",
        },
        ContentKind::Video => UnsafeNarrative {
            category: "video_policy_violation",
            reason: "The video may contain scenes of concern that violate content policy.",
            assessment: "The video appears to contain scenes that do not comply with the content policy.",
            issues: "One or more scenes of concern were identified in the video.",
            reasoning: "Depicted scenes resemble material the policy prohibits.",
            recommendations: "Hold the video for manual review of the flagged scenes.",
        },
        ContentKind::Text => UnsafeNarrative {
            category: "text_policy_violation",
            reason: "The text may contain harmful language that violates content policy.",
            assessment: "The text appears to contain language that does not comply with the content policy.",
            issues: "Potentially harmful language was identified in the text.",
            reasoning: "The wording resembles language the policy prohibits.",
            recommendations: "Hold the text for manual review and consider asking the author to revise it.",
        },
    }
}

/// Build a verdict without any network access.
pub fn synthesize_fallback(
    content: &str,
    kind: ContentKind,
    policy: &HeuristicPolicy,
) -> ClassificationVerdict {
    let hash = content_hash(content);
    let safe = hash % policy.effective_modulus() != 0;

    if safe {
        let confidence = clamp_confidence((85 + hash % 15) as f32 / 100.0);
        let detailed_analysis = render_sections(&[
            Some(format!(
                "The submitted {kind} content appears to comply with the content policy."
            )),
            Some("No issues were identified.".to_string()),
            Some(
                "No violent, hateful, sexual or otherwise prohibited elements were detected."
                    .to_string(),
            ),
            Some("No action is required. The content can be published.".to_string()),
        ]);
        ClassificationVerdict {
            safe,
            reason: FALLBACK_SAFE_REASON.to_string(),
            category: "safe".to_string(),
            confidence,
            raw_response: Some(FALLBACK_MARKER.to_string()),
            detailed_analysis,
            source: VerdictSource::Fallback,
        }
    } else {
        let narrative = unsafe_narrative(kind);
        let confidence = clamp_confidence((65 + hash % 20) as f32 / 100.0);
        let detailed_analysis = render_sections(&[
            Some(narrative.assessment.to_string()),
            Some(narrative.issues.to_string()),
            Some(narrative.reasoning.to_string()),
            Some(narrative.recommendations.to_string()),
        ]);
        ClassificationVerdict {
            safe,
            reason: narrative.reason.to_string(),
            category: narrative.category.to_string(),
            confidence,
            raw_response: Some(FALLBACK_MARKER.to_string()),
            detailed_analysis,
            source: VerdictSource::Fallback,
        }
    }
}
