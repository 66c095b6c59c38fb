//! Media resolution for image and video submissions.
//!
//! Content arrives as one of three shapes:
//! - **HTTP(S) URL** (images only): fetched, then base64-encoded
//! - **Data URL**: MIME type and base64 payload split out and validated
//! - **Anything else**: forwarded as a textual description, no media attached

use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};

use base64::Engine as _;

use super::types::{ContentKind, FetchedMedia, InlineMedia, MediaFetcher};
use super::ClassificationError;

/// Maximum inline payload (base64 length) accepted for a single request.
pub const MAX_INLINE_MEDIA_BASE64: usize = 20 * 1024 * 1024;

/// Largest raw body a media fetch will read: the base64 cap in raw bytes.
pub const MAX_FETCHED_MEDIA_BYTES: u64 = (MAX_INLINE_MEDIA_BASE64 as u64 / 4) * 3;

/// MIME type assumed when a fetched image carries no `Content-Type`.
const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// What the adapter sends alongside the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaPayload {
    /// Text submissions: the prompt already carries the content.
    None,
    /// Binary media attached to the request.
    Inline(InlineMedia),
    /// Degraded path: the raw content string stands in for the media.
    Description(String),
}

pub fn is_http_url(content: &str) -> bool {
    let trimmed = content.trim();
    has_prefix_ignore_case(trimmed, "http://") || has_prefix_ignore_case(trimmed, "https://")
}

pub fn is_data_url(content: &str) -> bool {
    has_prefix_ignore_case(content.trim(), "data:")
}

fn has_prefix_ignore_case(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Split a `data:<mime>;base64,<payload>` URL into MIME type and payload.
pub fn parse_data_url(content: &str) -> Result<InlineMedia, ClassificationError> {
    let trimmed = content.trim();
    if !is_data_url(trimmed) {
        return Err(ClassificationError::MalformedMedia(
            "Not a data URL".into(),
        ));
    }

    let (header, payload) = trimmed[5..]
        .split_once(',')
        .ok_or_else(|| ClassificationError::MalformedMedia("Data URL has no payload".into()))?;

    let mut params = header.split(';');
    let mime_type = params.next().unwrap_or_default().trim().to_ascii_lowercase();
    if mime_type.is_empty() || !mime_type.contains('/') {
        return Err(ClassificationError::MalformedMedia(format!(
            "Data URL has invalid MIME type '{mime_type}'"
        )));
    }
    if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        return Err(ClassificationError::MalformedMedia(
            "Data URL is not base64-encoded".into(),
        ));
    }

    let data_base64: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    check_inline_size(data_base64.len())?;

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(data_base64.as_bytes())
        .map_err(|e| ClassificationError::MalformedMedia(format!("Invalid base64 payload: {e}")))?;
    if decoded.is_empty() {
        return Err(ClassificationError::MalformedMedia(
            "Data URL payload is empty".into(),
        ));
    }

    Ok(InlineMedia {
        mime_type,
        data_base64,
    })
}

/// Turn fetched image bytes into an inline payload.
pub fn inline_fetched_image(fetched: FetchedMedia) -> Result<InlineMedia, ClassificationError> {
    if fetched.bytes.is_empty() {
        return Err(ClassificationError::MalformedMedia(
            "Fetched image is empty".into(),
        ));
    }

    let mime_type = fetched
        .content_type
        .as_deref()
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase())
        .filter(|ct| !ct.is_empty())
        .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_string());
    if !mime_type.starts_with("image/") {
        return Err(ClassificationError::MalformedMedia(format!(
            "Fetched content is '{mime_type}', not an image"
        )));
    }

    let data_base64 = base64::engine::general_purpose::STANDARD.encode(&fetched.bytes);
    check_inline_size(data_base64.len())?;

    Ok(InlineMedia {
        mime_type,
        data_base64,
    })
}

fn check_inline_size(len: usize) -> Result<(), ClassificationError> {
    if len > MAX_INLINE_MEDIA_BASE64 {
        return Err(ClassificationError::MalformedMedia(format!(
            "Media too large ({len} bytes base64), maximum is 20 MB"
        )));
    }
    Ok(())
}

/// Decide what media accompanies the prompt for a submission.
///
/// Only the image-URL case touches the network.
pub fn resolve_media(
    content: &str,
    kind: ContentKind,
    fetcher: &dyn MediaFetcher,
) -> Result<MediaPayload, ClassificationError> {
    match kind {
        ContentKind::Text => Ok(MediaPayload::None),
        ContentKind::Image => {
            if is_data_url(content) {
                let media = parse_data_url(content)?;
                require_mime_family(&media, "image/")?;
                Ok(MediaPayload::Inline(media))
            } else if is_http_url(content) {
                let fetched = fetcher.fetch(content.trim())?;
                Ok(MediaPayload::Inline(inline_fetched_image(fetched)?))
            } else {
                Ok(MediaPayload::Description(content.to_string()))
            }
        }
        ContentKind::Video => {
            if is_data_url(content) {
                let media = parse_data_url(content)?;
                require_mime_family(&media, "video/")?;
                Ok(MediaPayload::Inline(media))
            } else {
                Ok(MediaPayload::Description(content.to_string()))
            }
        }
    }
}

fn require_mime_family(media: &InlineMedia, family: &str) -> Result<(), ClassificationError> {
    if media.mime_type.starts_with(family) {
        Ok(())
    } else {
        Err(ClassificationError::MalformedMedia(format!(
            "Expected {family}* content, got '{}'",
            media.mime_type
        )))
    }
}

// ──────────────────────────────────────────────
// HttpMediaFetcher
// ──────────────────────────────────────────────

/// Media fetcher backed by a blocking HTTP client. No timeout, no retries.
pub struct HttpMediaFetcher {
    client: reqwest::blocking::Client,
}

impl HttpMediaFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for HttpMediaFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaFetcher for HttpMediaFetcher {
    fn fetch(&self, url: &str) -> Result<FetchedMedia, ClassificationError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| ClassificationError::NetworkFailure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ClassificationError::HttpError {
                status: status.as_u16(),
                body,
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let declared_len = response.content_length();
        let bytes = read_capped(response, declared_len, MAX_FETCHED_MEDIA_BYTES)?;

        tracing::debug!(url, bytes = bytes.len(), "Fetched media");

        Ok(FetchedMedia {
            bytes,
            content_type,
        })
    }
}

/// Read a response body of at most `limit` bytes.
///
/// A declared length over the limit is rejected before anything is read.
/// Without one, reading stops one byte past the limit.
fn read_capped<R: Read>(
    reader: R,
    declared_len: Option<u64>,
    limit: u64,
) -> Result<Vec<u8>, ClassificationError> {
    if let Some(len) = declared_len.filter(|&len| len > limit) {
        return Err(ClassificationError::MalformedMedia(format!(
            "Media too large ({len} bytes declared), maximum is {limit} bytes"
        )));
    }

    let mut bytes = Vec::new();
    reader
        .take(limit + 1)
        .read_to_end(&mut bytes)
        .map_err(|e| ClassificationError::NetworkFailure(e.to_string()))?;

    if bytes.len() as u64 > limit {
        return Err(ClassificationError::MalformedMedia(format!(
            "Media too large (over {limit} bytes), maximum is {limit} bytes"
        )));
    }
    Ok(bytes)
}

// ──────────────────────────────────────────────
// MockMediaFetcher (testing)
// ──────────────────────────────────────────────

/// Mock fetcher returning a fixed response and counting calls.
pub struct MockMediaFetcher {
    response: Option<FetchedMedia>,
    status: Option<u16>,
    calls: AtomicUsize,
}

impl MockMediaFetcher {
    /// Succeeds with the given bytes and content type.
    pub fn new(bytes: &[u8], content_type: Option<&str>) -> Self {
        Self {
            response: Some(FetchedMedia {
                bytes: bytes.to_vec(),
                content_type: content_type.map(str::to_string),
            }),
            status: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Fails every fetch with a network error.
    pub fn unreachable() -> Self {
        Self {
            response: None,
            status: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Fails every fetch with the given HTTP status.
    pub fn with_status(status: u16) -> Self {
        Self {
            response: None,
            status: Some(status),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MediaFetcher for MockMediaFetcher {
    fn fetch(&self, _url: &str) -> Result<FetchedMedia, ClassificationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = self.status {
            return Err(ClassificationError::HttpError {
                status,
                body: String::new(),
            });
        }
        self.response
            .clone()
            .ok_or_else(|| ClassificationError::NetworkFailure("mock fetch failure".into()))
    }
}
