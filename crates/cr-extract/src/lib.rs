//! # cr-extract
//!
//! Share-link resolution for clipresolve.
//!
//! This crate provides:
//!
//! - **URL normalization** ([`normalize`]) -- pull the link out of share text.
//! - **Credential store** ([`CredentialStore`]) -- Netscape cookie jars for
//!   platforms that require a session.
//! - **Extraction gateway** ([`ExtractionGateway`]) -- per-host connection
//!   policy in front of the external extractor.
//! - **Format selection** ([`select_direct_url`]) -- pick the single URL to
//!   hand back to callers.
//! - **yt-dlp backend** ([`YtDlp`]) -- the [`Extractor`] implementation that
//!   shells out to the CLI via [`ToolCommand`].

pub mod command;
pub mod cookies;
pub mod extractor;
pub mod gateway;
pub mod normalize;
pub mod select;
pub mod tools;
pub mod ytdlp;

// ---- Re-exports for convenience ----

pub use command::{ToolCommand, ToolOutput};
pub use cookies::{parse_credentials, CookieJar, CookieRecord, CredentialStore};
pub use extractor::{ExtractOptions, Extractor};
pub use gateway::ExtractionGateway;
pub use normalize::normalize;
pub use select::select_direct_url;
pub use tools::{ToolInfo, ToolRegistry};
pub use ytdlp::YtDlp;
