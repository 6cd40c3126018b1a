//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries all
//! sub-configs for the server, auth, authenticated platforms, the extractor
//! and the result cache. Every section defaults sensibly so a completely
//! empty `{}` file is valid.
//!
//! Secrets never live in source: the API key and platform cookie strings come
//! from the config file or, preferably, from environment variables applied by
//! [`Config::apply_env`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::Error;

/// Environment variable overriding [`AuthConfig::api_key`].
pub const API_KEY_ENV: &str = "CLIPRESOLVE_API_KEY";

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub platforms: Vec<PlatformConfig>,
    pub extractor: ExtractorConfig,
    pub cache: CacheConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            platforms: vec![PlatformConfig::douyin()],
            extractor: ExtractorConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Apply environment overrides for secrets.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    /// Like [`Config::apply_env`] but with an injectable lookup.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.is_empty()) {
            self.auth.api_key = Some(key);
        }

        for platform in &mut self.platforms {
            let Some(ref var) = platform.cookies_env else {
                continue;
            };
            if let Some(cookies) = lookup(var).filter(|c| !c.is_empty()) {
                platform.cookies = Some(cookies);
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0; a random port will be assigned".into());
        }

        if self.auth.api_key.as_deref().map_or(true, str::is_empty) {
            warnings.push(format!(
                "auth.api_key is not set (set {API_KEY_ENV}); every request will be rejected"
            ));
        }

        for (i, platform) in self.platforms.iter().enumerate() {
            if platform.domain.trim().is_empty() {
                warnings.push(format!("platforms[{i}].domain is empty"));
            }
            if platform.cookies.as_deref().map_or(true, str::is_empty) {
                warnings.push(format!(
                    "platforms[{i}] ({}) has no cookies{}",
                    platform.domain,
                    platform
                        .cookies_env
                        .as_ref()
                        .map(|v| format!(" (set {v})"))
                        .unwrap_or_default()
                ));
            }
        }

        if self.extractor.socket_timeout_secs == 0 {
            warnings.push("extractor.socket_timeout_secs is 0".into());
        }
        if self.extractor.process_timeout_secs <= self.extractor.socket_timeout_secs {
            warnings.push(
                "extractor.process_timeout_secs should exceed socket_timeout_secs".into(),
            );
        }

        if self.cache.enabled && self.cache.ttl_secs == 0 {
            warnings.push("cache is enabled but ttl_secs is 0; nothing will be cached".into());
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
        }
    }
}

/// Shared-secret authentication for the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Value expected in the `x-api-key` header.
    pub api_key: Option<String>,
}

/// A platform whose extraction requires a session cookie jar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Registrable domain, e.g. `douyin.com`. Subdomains match too.
    pub domain: String,
    /// Static `name=value; name=value` credential string.
    #[serde(default)]
    pub cookies: Option<String>,
    /// Environment variable holding the credential string.
    #[serde(default)]
    pub cookies_env: Option<String>,
    /// Where to write the jar; defaults to `<temp>/<domain>_cookies.txt`.
    #[serde(default)]
    pub jar_path: Option<PathBuf>,
}

impl PlatformConfig {
    fn douyin() -> Self {
        Self {
            domain: "douyin.com".into(),
            cookies: None,
            cookies_env: Some("CLIPRESOLVE_DOUYIN_COOKIES".into()),
            jar_path: None,
        }
    }

    /// Resolved jar location.
    pub fn jar_path(&self) -> PathBuf {
        self.jar_path.clone().unwrap_or_else(|| {
            let stem = self.domain.trim_start_matches('.').replace('.', "_");
            std::env::temp_dir().join(format!("{stem}_cookies.txt"))
        })
    }
}

/// External extractor (yt-dlp) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Explicit path to the yt-dlp binary; looked up in `PATH` otherwise.
    pub binary: Option<PathBuf>,
    /// Format preference passed to the extractor.
    pub format: String,
    /// Per-socket network timeout handed to the extractor.
    pub socket_timeout_secs: u64,
    /// Hard cap on the extractor process as a whole.
    pub process_timeout_secs: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            binary: None,
            format: "best".into(),
            socket_timeout_secs: 15,
            process_timeout_secs: 60,
        }
    }
}

/// In-memory cache of successful extractions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: 7200,
        }
    }
}
