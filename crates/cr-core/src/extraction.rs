//! Extraction data model shared by the gateway, the selector and the API.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Proxy schemes the extractor understands.
const PROXY_SCHEMES: &[&str] = &["http", "https", "socks4", "socks4a", "socks5", "socks5h"];

/// Title reported when the extractor does not provide one.
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Codec value the extractor uses for an absent stream.
pub const NO_CODEC: &str = "none";

/// A caller's request to resolve a share link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRequest {
    /// Raw share text; may contain captions or emoji around the link.
    pub url: String,
    /// Optional proxy URI, `scheme://[user:pass@]host:port`.
    #[serde(default)]
    pub proxy: Option<String>,
}

impl ExtractionRequest {
    pub fn new(url: impl Into<String>, proxy: Option<String>) -> Self {
        Self {
            url: url.into(),
            proxy,
        }
    }

    /// Check the request invariants. Both fields are trimmed and an empty
    /// proxy folds into `None`.
    pub fn validated(mut self) -> Result<Self> {
        self.url = self.url.trim().to_string();
        if self.url.is_empty() {
            return Err(Error::Validation("url must not be empty".into()));
        }

        self.proxy = self
            .proxy
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        if let Some(ref proxy) = self.proxy {
            validate_proxy(proxy)?;
        }

        Ok(self)
    }
}

fn validate_proxy(proxy: &str) -> Result<()> {
    let parsed = url::Url::parse(proxy)
        .map_err(|e| Error::Validation(format!("invalid proxy URI: {e}")))?;

    if !PROXY_SCHEMES.contains(&parsed.scheme()) {
        return Err(Error::Validation(format!(
            "unsupported proxy scheme '{}' (valid: {})",
            parsed.scheme(),
            PROXY_SCHEMES.join(", ")
        )));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(Error::Validation("proxy URI has no host".into()));
    }
    if parsed.port_or_known_default().is_none() {
        return Err(Error::Validation("proxy URI has no port".into()));
    }

    Ok(())
}

/// One media variant offered by the extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatCandidate {
    pub url: Option<String>,
    pub vcodec: Option<String>,
    pub acodec: Option<String>,
}

impl FormatCandidate {
    pub fn has_video(&self) -> bool {
        codec_present(self.vcodec.as_deref())
    }

    pub fn has_audio(&self) -> bool {
        codec_present(self.acodec.as_deref())
    }

    /// Video and audio in one container.
    pub fn is_muxed(&self) -> bool {
        self.has_video() && self.has_audio()
    }
}

fn codec_present(codec: Option<&str>) -> bool {
    matches!(codec, Some(c) if c != NO_CODEC)
}

/// Metadata returned by the extractor for a single video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Direct URL surfaced at the top level, if any.
    pub direct_url: Option<String>,
    pub title: String,
    pub thumbnail: Option<String>,
    /// Human-readable duration such as `"0:31"`.
    pub duration_label: Option<String>,
    pub uploader: Option<String>,
    /// Candidate variants in extractor order.
    pub formats: Vec<FormatCandidate>,
}

impl Default for ExtractionResult {
    fn default() -> Self {
        Self {
            direct_url: None,
            title: UNKNOWN_TITLE.into(),
            thumbnail: None,
            duration_label: None,
            uploader: None,
            formats: Vec::new(),
        }
    }
}

/// The outcome handed back to callers: metadata plus the selected URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedVideo {
    pub title: String,
    pub video_url: String,
    pub thumbnail: Option<String>,
    pub duration: Option<String>,
    pub uploader: Option<String>,
}

impl ResolvedVideo {
    /// Combine extraction metadata with the URL chosen for it.
    pub fn new(result: ExtractionResult, video_url: String) -> Self {
        Self {
            title: result.title,
            video_url,
            thumbnail: result.thumbnail,
            duration: result.duration_label,
            uploader: result.uploader,
        }
    }
}
