use std::fmt;

use serde::{Deserialize, Serialize};

use super::ClassificationError;

/// Declared media kind of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Image,
    Video,
    Text,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a submission is built from blank content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Submission content must not be empty")]
pub struct EmptyContent;

/// One piece of content to classify: raw text, a URL, or a data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSubmission {
    content: String,
    kind: ContentKind,
}

impl ContentSubmission {
    pub fn new(content: impl Into<String>, kind: ContentKind) -> Result<Self, EmptyContent> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(EmptyContent);
        }
        Ok(Self { content, kind })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }
}

/// Where a verdict came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictSource {
    /// Extracted from a real completion.
    Provider,
    /// Synthesized locally without a network call.
    Fallback,
}

/// Structured safety verdict for one submission. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationVerdict {
    pub safe: bool,
    pub reason: String,
    pub category: String,
    /// Always within [0.5, 0.99].
    pub confidence: f32,
    pub raw_response: Option<String>,
    pub detailed_analysis: String,
    pub source: VerdictSource,
}

/// Media bytes inlined into a completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineMedia {
    pub mime_type: String,
    /// Standard base64, no data-URL prefix.
    pub data_base64: String,
}

/// Bytes returned by a media fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedMedia {
    pub bytes: Vec<u8>,
    /// `Content-Type` header, if the server sent one.
    pub content_type: Option<String>,
}

/// Generative completion capability: prompt (plus optional media) in, text out.
pub trait CompletionClient {
    fn complete(
        &self,
        prompt: &str,
        media: Option<&InlineMedia>,
    ) -> Result<String, ClassificationError>;

    /// Whether media of this MIME type can be attached to a request.
    fn accepts_media(&self, _mime_type: &str) -> bool {
        true
    }
}

/// Plain HTTP GET used to dereference image URLs.
pub trait MediaFetcher {
    fn fetch(&self, url: &str) -> Result<FetchedMedia, ClassificationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_submission_rejected() {
        assert_eq!(
            ContentSubmission::new("  \n", ContentKind::Text),
            Err(EmptyContent)
        );
    }

    #[test]
    fn submission_keeps_content_verbatim() {
        let sub = ContentSubmission::new("  hello ", ContentKind::Text).unwrap();
        assert_eq!(sub.content(), "  hello ");
        assert_eq!(sub.kind(), ContentKind::Text);
    }

    #[test]
    fn content_kind_serde_is_lowercase() {
        let kind: ContentKind = serde_json::from_str("\"video\"").unwrap();
        assert_eq!(kind, ContentKind::Video);
        assert_eq!(serde_json::to_string(&ContentKind::Image).unwrap(), "\"image\"");
        assert_eq!(ContentKind::Text.to_string(), "text");
    }

    #[test]
    fn verdict_serializes_camel_case() {
        let verdict = ClassificationVerdict {
            safe: true,
            reason: "ok".into(),
            category: "safe".into(),
            confidence: 0.9,
            raw_response: None,
            detailed_analysis: "analysis".into(),
            source: VerdictSource::Provider,
        };
        let json = serde_json::to_value(&verdict).unwrap();
        assert!(json.get("rawResponse").is_some());
        assert!(json.get("detailedAnalysis").is_some());
        assert_eq!(json["source"], "provider");
    }
}
