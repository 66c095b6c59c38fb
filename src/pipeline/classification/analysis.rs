//! Four-section detailed analysis: extraction from model output and rendering.

use std::sync::LazyLock;

use regex::Regex;

use super::prompt::SECTION_HEADERS;

/// Per-section name patterns, in `SECTION_HEADERS` order.
const SECTION_NAME_PATTERNS: [&str; 4] = [
    r"overall[ \t]+assessment",
    r"specific[ \t]+issues?",
    r"reasoning",
    r"recommendations?",
];

/// Header matchers. A header either starts a line (optionally behind `#`,
/// an enumeration marker or `**`) and ends the line or is followed by a
/// colon, or appears inline immediately followed by a colon.
static SECTION_HEADER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    SECTION_NAME_PATTERNS
        .iter()
        .map(|name| {
            let pattern = format!(
                r"(?im)(?:^[ \t]*(?:#{{1,6}}[ \t]*)?(?:\d+[.)][ \t]*)?(?:\*\*)?[ \t]*{name}[ \t]*(?:\*\*)?[ \t]*(?::|\r?$)|(?:\*\*)?\b{name}[ \t]*(?:\*\*)?[ \t]*:)(?:[ \t]*\*\*)?"
            );
            Regex::new(&pattern).expect("section header pattern is valid")
        })
        .collect()
});

static ENUMERATION_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:\d+[.)]|[-*•])[ \t]+").expect("enumeration pattern is valid")
});

static EXCESS_BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n[ \t]*\n(?:[ \t]*\n)+").expect("blank line pattern is valid")
});

/// Section bodies in `SECTION_HEADERS` order.
///
/// `None` means the header was not found. `Some("")` means it was found
/// with nothing after it.
pub type SectionBodies = [Option<String>; 4];

/// Locate the four labeled sections in `raw`.
///
/// Each body runs from the end of its header to the start of the next
/// header of any section, or to the end of the text.
pub fn extract_sections(raw: &str) -> SectionBodies {
    let text = raw.replace("\r\n", "\n");

    let boundaries: Vec<usize> = SECTION_HEADER_PATTERNS
        .iter()
        .flat_map(|re| re.find_iter(&text).map(|m| m.start()))
        .collect();

    let mut bodies: SectionBodies = Default::default();
    for (slot, re) in bodies.iter_mut().zip(SECTION_HEADER_PATTERNS.iter()) {
        let Some(header) = re.find(&text) else {
            continue;
        };
        let end = boundaries
            .iter()
            .copied()
            .filter(|&start| start >= header.end())
            .min()
            .unwrap_or(text.len());
        *slot = Some(text[header.end()..end].trim().to_string());
    }
    bodies
}

/// Render bodies as four labeled sections. Missing or empty bodies get
/// a `No <section> provided.` placeholder.
pub fn render_sections(bodies: &SectionBodies) -> String {
    SECTION_HEADERS
        .iter()
        .zip(bodies.iter())
        .map(|(header, body)| match body.as_deref() {
            Some(body) if !body.is_empty() => format!("{header}:\n{body}"),
            _ => format!("{header}:\nNo {} provided.", header.to_lowercase()),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Strip leading enumeration markers and collapse runs of blank lines.
pub fn clean_narrative(raw: &str) -> String {
    let text = raw.replace("\r\n", "\n");
    let without_markers = ENUMERATION_MARKER.replace_all(&text, "");
    EXCESS_BLANK_LINES
        .replace_all(&without_markers, "\n\n")
        .trim()
        .to_string()
}

/// Structured analysis when any section header is present, otherwise the
/// cleaned narrative.
pub fn build_detailed_analysis(raw: &str) -> String {
    let bodies = extract_sections(raw);
    if bodies.iter().all(Option::is_none) {
        clean_narrative(raw)
    } else {
        render_sections(&bodies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = "Overall Assessment: The image is safe.\n\
        Specific Issues: None found.\n\
        Reasoning: No prohibited elements are visible.\n\
        Recommendations: Approve for publication.";

    #[test]
    fn extracts_all_four_sections() {
        let bodies = extract_sections(FULL);
        assert_eq!(bodies[0].as_deref(), Some("The image is safe."));
        assert_eq!(bodies[1].as_deref(), Some("None found."));
        assert_eq!(bodies[2].as_deref(), Some("No prohibited elements are visible."));
        assert_eq!(bodies[3].as_deref(), Some("Approve for publication."));
    }

    #[test]
    fn full_response_renders_labels_in_order_without_defaults() {
        let analysis = build_detailed_analysis(FULL);
        let positions: Vec<usize> = SECTION_HEADERS
            .iter()
            .map(|h| analysis.find(&format!("{h}:")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(!analysis.contains("provided."));
        assert!(analysis.contains("Approve for publication."));
    }

    #[test]
    fn markdown_headers_are_recognised() {
        let raw = "## 1. **Overall Assessment**\nUnsafe content.\n\n\
                   ## 2. **Specific Issues**\n- Threatening language\n\n\
                   **Reasoning:** The text threatens a person.\n\n\
                   4. Recommendations: Remove it.";
        let bodies = extract_sections(raw);
        assert_eq!(bodies[0].as_deref(), Some("Unsafe content."));
        assert_eq!(bodies[1].as_deref(), Some("- Threatening language"));
        assert_eq!(bodies[2].as_deref(), Some("The text threatens a person."));
        assert_eq!(bodies[3].as_deref(), Some("Remove it."));
    }

    #[test]
    fn headers_match_case_insensitively() {
        let bodies = extract_sections("OVERALL ASSESSMENT: fine\nrecommendations: none");
        assert_eq!(bodies[0].as_deref(), Some("fine"));
        assert!(bodies[1].is_none());
        assert!(bodies[2].is_none());
        assert_eq!(bodies[3].as_deref(), Some("none"));
    }

    #[test]
    fn missing_sections_get_placeholders() {
        let analysis = build_detailed_analysis("Overall Assessment: Looks fine.");
        assert!(analysis.contains("Overall Assessment:\nLooks fine."));
        assert!(analysis.contains("Specific Issues:\nNo specific issues provided."));
        assert!(analysis.contains("Reasoning:\nNo reasoning provided."));
        assert!(analysis.contains("Recommendations:\nNo recommendations provided."));
    }

    #[test]
    fn inline_word_without_colon_is_not_a_header() {
        let raw = "Overall Assessment: my reasoning is sound.";
        let bodies = extract_sections(raw);
        assert_eq!(bodies[0].as_deref(), Some("my reasoning is sound."));
        assert!(bodies[2].is_none());
    }

    #[test]
    fn no_headers_returns_cleaned_narrative() {
        let raw = "1. The content is fine.\n\n\n\n- Nothing objectionable.\n  * Really.";
        let analysis = build_detailed_analysis(raw);
        assert_eq!(
            analysis,
            "The content is fine.\n\nNothing objectionable.\nReally."
        );
        for header in SECTION_HEADERS {
            assert!(!analysis.contains(header));
        }
    }

    #[test]
    fn crlf_input_normalised() {
        let bodies = extract_sections("Overall Assessment: a\r\nReasoning: b\r\n");
        assert_eq!(bodies[0].as_deref(), Some("a"));
        assert_eq!(bodies[2].as_deref(), Some("b"));
    }
}
