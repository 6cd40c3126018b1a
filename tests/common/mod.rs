//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], a full [`AppContext`] wired to a
//! [`MockExtractor`] instead of yt-dlp, with the douyin.com cookie jar
//! pointed into a temp directory. [`TestHarness::with_server`] starts Axum
//! on a random port for HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cr_core::config::Config;
use cr_core::{ExtractionResult, FormatCandidate};
use cr_extract::{ExtractOptions, ExtractionGateway, Extractor};
use cr_server::context::AppContext;
use cr_server::router::build_router;
use tempfile::TempDir;

pub const TEST_API_KEY: &str = "test-secret-key";
pub const TEST_COOKIES: &str = "sessionid=abc123; ttwid=1%7Cxyz";

type Responder = Box<dyn Fn() -> cr_core::Result<ExtractionResult> + Send + Sync>;

/// Stand-in extractor that counts calls and records the options it saw.
pub struct MockExtractor {
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, ExtractOptions)>>,
    respond: Responder,
}

impl MockExtractor {
    pub fn new(respond: impl Fn() -> cr_core::Result<ExtractionResult> + Send + Sync + 'static) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        }
    }

    /// Always returns `result`.
    pub fn returning(result: ExtractionResult) -> Self {
        Self::new(move || Ok(result.clone()))
    }

    /// A typical successful extraction with one muxed format.
    pub fn succeeding() -> Self {
        Self::returning(sample_result())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_call(&self) -> Option<(String, ExtractOptions)> {
        self.seen.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Extractor for MockExtractor {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn extract_info(
        &self,
        url: &str,
        options: &ExtractOptions,
    ) -> cr_core::Result<ExtractionResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap()
            .push((url.to_string(), options.clone()));
        (self.respond)()
    }
}

pub fn sample_result() -> ExtractionResult {
    ExtractionResult {
        direct_url: None,
        title: "Cat jumps".into(),
        thumbnail: Some("https://cdn.example/t.jpg".into()),
        duration_label: Some("0:31".into()),
        uploader: Some("catfan".into()),
        formats: vec![
            FormatCandidate {
                url: Some("https://cdn.example/audio.m4a".into()),
                vcodec: Some("none".into()),
                acodec: Some("mp4a.40.2".into()),
            },
            FormatCandidate {
                url: Some("https://cdn.example/muxed.mp4".into()),
                vcodec: Some("h264".into()),
                acodec: Some("aac".into()),
            },
        ],
    }
}

/// Config with an API key and douyin.com credentials whose jar lives in `dir`.
pub fn test_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.auth.api_key = Some(TEST_API_KEY.into());
    config.platforms[0].cookies = Some(TEST_COOKIES.into());
    config.platforms[0].jar_path = Some(dir.path().join("douyin_cookies.txt"));
    config
}

/// Test harness wrapping a fully-constructed [`AppContext`].
///
/// The cookie jar is not generated up front, so the first request for a
/// platform URL exercises regeneration.
pub struct TestHarness {
    pub ctx: AppContext,
    pub extractor: Arc<MockExtractor>,
    pub dir: TempDir,
}

impl TestHarness {
    pub fn new(extractor: MockExtractor) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let config = test_config(&dir);
        Self::build(config, extractor, dir)
    }

    /// Harness with a caller-adjusted configuration.
    pub fn with_config(
        extractor: MockExtractor,
        adjust: impl FnOnce(&mut Config),
    ) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let mut config = test_config(&dir);
        adjust(&mut config);
        Self::build(config, extractor, dir)
    }

    fn build(config: Config, extractor: MockExtractor, dir: TempDir) -> Self {
        let extractor = Arc::new(extractor);
        let gateway = ExtractionGateway::from_config(&config, extractor.clone());
        let ctx = AppContext::new(config, gateway);
        Self {
            ctx,
            extractor,
            dir,
        }
    }

    /// Start an Axum server on a random port and return the bound address.
    pub async fn serve(&self) -> SocketAddr {
        let app = build_router(self.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        addr
    }

    /// Harness plus running server.
    pub async fn with_server(extractor: MockExtractor) -> (Self, SocketAddr) {
        let harness = Self::new(extractor);
        let addr = harness.serve().await;
        (harness, addr)
    }

    pub fn jar_path(&self) -> PathBuf {
        self.dir.path().join("douyin_cookies.txt")
    }
}

/// POST a JSON body to `/api/extract` with the given key.
pub async fn post_extract(
    addr: SocketAddr,
    api_key: Option<&str>,
    body: serde_json::Value,
) -> reqwest::Response {
    let client = reqwest::Client::new();
    let mut req = client
        .post(format!("http://{addr}/api/extract"))
        .json(&body);
    if let Some(key) = api_key {
        req = req.header("x-api-key", key);
    }
    req.send().await.expect("request failed")
}
