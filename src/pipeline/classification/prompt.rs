use super::types::ContentKind;

/// Section headers the model is asked to produce, in order.
pub const SECTION_HEADERS: [&str; 4] = [
    "Overall Assessment",
    "Specific Issues",
    "Reasoning",
    "Recommendations",
];

const POLICY_TAXONOMY: &str = "\
- Violent or graphic imagery
- Hateful or threatening language
- Sexual or adult content
- Any other general policy violation";

/// Build the classification instruction for a submission.
///
/// Text content is embedded inline. Image and video content is delivered
/// separately by the provider adapter, so only the attention clause differs.
pub fn build_classification_prompt(content: &str, kind: ContentKind) -> String {
    let focus = match kind {
        ContentKind::Image => {
            "Examine the attached image carefully. Pay attention to visual elements: \
             depicted people, actions, symbols, gestures and any text visible in the image."
        }
        ContentKind::Video => {
            "Examine the referenced video. Pay attention to visual scenes, depicted actions, \
             symbols and any spoken or on-screen text."
        }
        ContentKind::Text => {
            "Examine the text below. Pay attention to wording, tone, implied threats \
             and targeted language."
        }
    };

    let body = match kind {
        ContentKind::Text => format!("\n<content>\n{content}\n</content>\n"),
        ContentKind::Image | ContentKind::Video => String::new(),
    };

    format!(
        r#"You are a content-safety reviewer. Decide whether the following {kind} content complies with the content policy.

The policy prohibits:
{POLICY_TAXONOMY}

{focus}
{body}
Respond with exactly these four labeled sections:

Overall Assessment: give your overall verdict on the content.
Specific Issues: list each problematic element, or state that there are none.
Reasoning: explain how you reached the verdict.
Recommendations: state what action should be taken.

If the content is unsafe, say so explicitly using the word "unsafe" and explain why using the word "because". If it is safe, say that it is safe."#,
        kind = kind.as_str(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_requests_all_sections() {
        let prompt = build_classification_prompt("hello", ContentKind::Text);
        for header in SECTION_HEADERS {
            assert!(prompt.contains(header), "missing {header}");
        }
    }

    #[test]
    fn prompt_embeds_policy_taxonomy() {
        let prompt = build_classification_prompt("x", ContentKind::Image);
        assert!(prompt.contains("Violent or graphic imagery"));
        assert!(prompt.contains("Hateful or threatening language"));
        assert!(prompt.contains("Sexual or adult content"));
        assert!(prompt.contains("general policy violation"));
    }

    #[test]
    fn text_content_is_inlined() {
        let prompt = build_classification_prompt("some words here", ContentKind::Text);
        assert!(prompt.contains("<content>\nsome words here\n</content>"));
    }

    #[test]
    fn image_content_is_not_inlined() {
        let prompt = build_classification_prompt("data:image/png;base64,AAAA", ContentKind::Image);
        assert!(!prompt.contains("AAAA"));
        assert!(prompt.contains("visual elements"));
    }

    #[test]
    fn focus_clause_varies_by_kind() {
        let image = build_classification_prompt("x", ContentKind::Image);
        let video = build_classification_prompt("x", ContentKind::Video);
        let text = build_classification_prompt("x", ContentKind::Text);
        assert_ne!(image, video);
        assert_ne!(video, text);
        assert!(video.contains("video content"));
    }
}
