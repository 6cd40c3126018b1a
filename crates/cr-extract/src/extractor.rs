//! The seam between the gateway and the external extraction tool.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use cr_core::{ExtractionResult, Result};

/// Options handed to an [`Extractor`] for a single call.
///
/// The gateway always asks for metadata only; an extractor must never fetch
/// the media payload to local storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Format preference, e.g. `"best"`.
    pub format: String,
    /// Suppress progress and diagnostic output.
    pub quiet: bool,
    pub no_warnings: bool,
    pub skip_download: bool,
    pub socket_timeout: Duration,
    /// Netscape cookie file to send with requests.
    pub cookie_file: Option<PathBuf>,
    /// Proxy URI for all outbound connections.
    pub proxy: Option<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            format: "best".into(),
            quiet: true,
            no_warnings: true,
            skip_download: true,
            socket_timeout: Duration::from_secs(15),
            cookie_file: None,
            proxy: None,
        }
    }
}

/// Resolves a page URL into metadata and candidate media URLs.
///
/// Implementations map a "not found / access denied" outcome to
/// [`cr_core::Error::AccessDenied`] and every other failure to
/// [`cr_core::Error::Extraction`].
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Short backend name used in logs.
    fn name(&self) -> &'static str;

    async fn extract_info(&self, url: &str, options: &ExtractOptions) -> Result<ExtractionResult>;
}
