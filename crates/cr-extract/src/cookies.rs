//! Cookie-jar credential store.
//!
//! Platforms that gate extraction behind a session get a static credential
//! string (`name=value; name=value`) from configuration. The store renders it
//! as a Netscape cookie file, the format the extractor's `--cookies` flag
//! reads, and writes it to a well-known path.
//!
//! Writes replace the whole file and take no lock. Two requests regenerating
//! at once write identical bytes (same credentials, same clock second), so a
//! race only risks a reader seeing a partially written file.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use cr_core::{Error, Result};

/// Lifetime stamped on every generated cookie: one year.
pub const COOKIE_TTL_SECS: i64 = 31_536_000;

const JAR_HEADER: &str =
    "# Netscape HTTP Cookie File\n# This file is generated by clipresolve. Do not edit.\n\n";

/// One line of a Netscape cookie file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieRecord {
    pub domain: String,
    pub include_subdomains: bool,
    pub path: String,
    pub secure_only: bool,
    /// Unix timestamp in seconds.
    pub expires_at: i64,
    pub name: String,
    pub value: String,
}

impl CookieRecord {
    fn to_line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
            self.domain,
            flag(self.include_subdomains),
            self.path,
            flag(self.secure_only),
            self.expires_at,
            self.name,
            self.value
        )
    }
}

fn flag(b: bool) -> &'static str {
    if b {
        "TRUE"
    } else {
        "FALSE"
    }
}

/// An ordered set of cookie records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    records: Vec<CookieRecord>,
}

impl CookieJar {
    /// Build a jar for `domain` from a credential string.
    ///
    /// Every valid pair yields two records: one for `.domain` and one for
    /// the bare `domain`.
    pub fn from_credentials(domain: &str, credentials: &str, expires_at: i64) -> Self {
        let bare = domain.trim_start_matches('.');
        let dotted = format!(".{bare}");

        let records = parse_credentials(credentials)
            .into_iter()
            .flat_map(|(name, value)| {
                [dotted.as_str(), bare].map(|d| CookieRecord {
                    domain: d.to_string(),
                    include_subdomains: true,
                    path: "/".into(),
                    secure_only: false,
                    expires_at,
                    name: name.clone(),
                    value: value.clone(),
                })
            })
            .collect();

        Self { records }
    }

    pub fn records(&self) -> &[CookieRecord] {
        &self.records
    }

    /// Render in Netscape cookie-file format.
    pub fn render(&self) -> String {
        let mut out = String::from(JAR_HEADER);
        for record in &self.records {
            out.push_str(&record.to_line());
        }
        out
    }
}

/// Split a `name=value; name=value` string into pairs.
///
/// Segments are separated by `"; "` and split on the first `=` only, so
/// values may contain `=` (base64, URL-encoded blobs). Segments without `=`,
/// or containing tabs or newlines, are skipped with a warning.
pub fn parse_credentials(raw: &str) -> Vec<(String, String)> {
    raw.split("; ")
        .filter_map(|segment| {
            let Some((name, value)) = segment.split_once('=') else {
                tracing::warn!("Skipping cookie segment without '=': {segment:?}");
                return None;
            };
            if segment.contains(['\t', '\n', '\r']) {
                tracing::warn!("Skipping cookie segment with control characters: {name:?}");
                return None;
            }
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}

/// Persists the cookie jar for one authenticated platform.
#[derive(Debug)]
pub struct CredentialStore {
    domain: String,
    credentials: String,
    path: PathBuf,
    generations: AtomicU64,
}

impl CredentialStore {
    pub fn new(
        domain: impl Into<String>,
        credentials: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            domain: domain.into(),
            credentials: credentials.into(),
            path: path.into(),
            generations: AtomicU64::new(0),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the jar file currently exists on disk.
    pub fn is_present(&self) -> bool {
        self.path.exists()
    }

    /// Number of successful jar writes since construction.
    pub fn generations(&self) -> u64 {
        self.generations.load(Ordering::Relaxed)
    }

    /// Render the jar as of `now` (unix seconds).
    pub fn render_at(&self, now: i64) -> String {
        CookieJar::from_credentials(&self.domain, &self.credentials, now + COOKIE_TTL_SECS)
            .render()
    }

    /// (Re)generate the jar file, overwriting any existing one, and return
    /// its path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CredentialPersist`] when the file cannot be written.
    /// Callers are expected to log it and carry on without cookies.
    pub async fn ensure_cookie_jar(&self) -> Result<PathBuf> {
        let contents = self.render_at(chrono::Utc::now().timestamp());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| Error::credential_persist(&self.path, e))?;
            }
        }

        tokio::fs::write(&self.path, contents)
            .await
            .map_err(|e| Error::credential_persist(&self.path, e))?;

        self.generations.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            domain = %self.domain,
            "Cookie jar generated at {}",
            self.path.display()
        );
        Ok(self.path.clone())
    }
}
