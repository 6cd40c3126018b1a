//! Extraction gateway: per-host connection policy in front of the extractor.
//!
//! For each request, in order:
//!
//! 1. Normalize the share text to a URL.
//! 2. Host belongs to an authenticated platform: connect directly (any
//!    caller proxy is ignored) and attach the platform's cookie jar,
//!    regenerating it first if it has gone missing.
//! 3. Otherwise, if the caller supplied a proxy, use it.
//! 4. Otherwise connect directly with no credentials.
//!
//! The extractor then runs once with the fixed metadata-only options. There
//! is no retry at this layer.

use std::sync::Arc;
use std::time::Duration;

use cr_core::config::Config;
use cr_core::{Error, ExtractionRequest, ExtractionResult, ResolvedVideo, Result};

use crate::cookies::CredentialStore;
use crate::extractor::{ExtractOptions, Extractor};
use crate::normalize::normalize;
use crate::select::select_direct_url;

/// Message reported when the extractor returned no usable URL.
pub const NO_VALID_URL: &str = "Failed to extract valid video URL.";

/// Front door for all extractions.
#[derive(Clone)]
pub struct ExtractionGateway {
    extractor: Arc<dyn Extractor>,
    platforms: Vec<Arc<CredentialStore>>,
    base_options: ExtractOptions,
}

impl ExtractionGateway {
    /// Gateway with no authenticated platforms and default options.
    pub fn new(extractor: Arc<dyn Extractor>) -> Self {
        Self {
            extractor,
            platforms: Vec::new(),
            base_options: ExtractOptions::default(),
        }
    }

    /// Build from configuration. Platforms without credentials are skipped.
    pub fn from_config(config: &Config, extractor: Arc<dyn Extractor>) -> Self {
        let base_options = ExtractOptions {
            format: config.extractor.format.clone(),
            socket_timeout: Duration::from_secs(config.extractor.socket_timeout_secs),
            ..ExtractOptions::default()
        };

        let mut gateway = Self {
            base_options,
            ..Self::new(extractor)
        };

        for platform in &config.platforms {
            match platform.cookies.as_deref() {
                Some(cookies) if !cookies.is_empty() => {
                    gateway = gateway.with_platform(CredentialStore::new(
                        platform.domain.trim_start_matches('.'),
                        cookies,
                        platform.jar_path(),
                    ));
                }
                _ => tracing::warn!(
                    "No cookies configured for {}; it will be treated as a public host",
                    platform.domain
                ),
            }
        }

        gateway
    }

    /// Register an authenticated platform.
    pub fn with_platform(mut self, store: CredentialStore) -> Self {
        self.platforms.push(Arc::new(store));
        self
    }

    pub fn platforms(&self) -> &[Arc<CredentialStore>] {
        &self.platforms
    }

    /// Generate every platform's cookie jar. Failures are logged only.
    pub async fn prepare(&self) {
        for store in &self.platforms {
            if let Err(e) = store.ensure_cookie_jar().await {
                tracing::error!("{e}; {} will be extracted without cookies", store.domain());
            }
        }
    }

    /// The authenticated platform serving `url`, if any.
    pub fn platform_for(&self, url: &str) -> Option<&Arc<CredentialStore>> {
        let parsed = url::Url::parse(url).ok()?;
        let host = parsed.host_str()?;
        self.platforms
            .iter()
            .find(|store| host_matches(host, store.domain()))
    }

    /// Decide cookies and proxy for an already normalized URL.
    pub async fn connection_options(&self, url: &str, proxy: Option<&str>) -> ExtractOptions {
        let mut options = self.base_options.clone();

        if let Some(store) = self.platform_for(url) {
            if proxy.is_some() {
                tracing::debug!("Ignoring caller proxy for {}", store.domain());
            }
            tracing::info!(
                "Using direct connection and cookie jar for {}",
                store.domain()
            );

            if store.is_present() {
                options.cookie_file = Some(store.path().to_path_buf());
            } else {
                tracing::warn!(
                    "Cookie jar {} missing, regenerating",
                    store.path().display()
                );
                match store.ensure_cookie_jar().await {
                    Ok(path) => options.cookie_file = Some(path),
                    Err(e) => tracing::error!("{e}; continuing without cookies"),
                }
            }
        } else if let Some(proxy) = proxy {
            tracing::info!("Using provided proxy for extraction");
            options.proxy = Some(proxy.to_string());
        }

        options
    }

    /// Run the extractor for a request.
    pub async fn extract(&self, request: &ExtractionRequest) -> Result<ExtractionResult> {
        let url = normalize(&request.url);
        tracing::info!("Received extraction request for: {url}");
        if url != request.url {
            tracing::debug!("Normalized from share text: {:?}", request.url);
        }

        let options = self.connection_options(&url, request.proxy.as_deref()).await;

        let result = self.extractor.extract_info(&url, &options).await;
        if let Err(ref e) = result {
            tracing::error!(extractor = self.extractor.name(), "{e}");
        }
        result
    }

    /// Extract and select the direct URL.
    ///
    /// # Errors
    ///
    /// Extractor errors pass through; a result with no usable URL is
    /// [`Error::Extraction`] with [`NO_VALID_URL`].
    pub async fn resolve(&self, request: &ExtractionRequest) -> Result<ResolvedVideo> {
        let result = self.extract(request).await?;
        let Some(video_url) = select_direct_url(&result) else {
            tracing::error!("No direct URL among {} formats", result.formats.len());
            return Err(Error::Extraction(NO_VALID_URL.into()));
        };
        Ok(ResolvedVideo::new(result, video_url))
    }
}

/// `host` is `domain` or one of its subdomains (ASCII case-insensitive).
fn host_matches(host: &str, domain: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    let domain = domain.trim_start_matches('.').to_ascii_lowercase();
    host == domain || host.ends_with(&format!(".{domain}"))
}
