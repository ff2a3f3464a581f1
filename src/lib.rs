pub mod ddg;
pub mod ddg_server;
pub mod google;
pub mod google_server;
pub mod rate_limit;
pub mod types;

use std::time::Duration;

use tracing::warn;

/// Failure talking to the upstream search API.
///
/// `Status` carries the raw upstream status and body so the Google variant
/// can forward them verbatim; the DuckDuckGo variant folds every case into a
/// generic 502.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("upstream returned status {status}")]
    Status { status: u16, body: String },
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Process-scoped state for the DuckDuckGo proxy.
///
/// Built once at startup and shared across requests; cleared only by process
/// exit.
#[derive(Clone, Debug)]
pub struct DdgState {
    pub api_url: String,
    pub http_client: reqwest::Client,
    /// Normalized answers per query, keyed `ddg:<query>`.
    pub cache: moka::future::Cache<String, types::InstantAnswer>,
    pub limiter: rate_limit::RateLimiter,
}

impl DdgState {
    pub fn new(http_client: reqwest::Client) -> Self {
        Self::with_ttl(http_client, Duration::from_secs(60))
    }

    /// `new` with an explicit cache TTL, so expiry is testable.
    pub fn with_ttl(http_client: reqwest::Client, ttl: Duration) -> Self {
        Self {
            api_url: ddg::DDG_API_URL.to_string(),
            http_client,
            cache: moka::future::Cache::builder()
                .max_capacity(10_000)
                .time_to_live(ttl)
                .build(),
            limiter: rate_limit::RateLimiter::new(60, Duration::from_secs(60)),
        }
    }
}

/// Process-scoped state for the Google Custom Search proxy.
#[derive(Clone, Debug)]
pub struct GoogleState {
    pub http_client: reqwest::Client,
    pub config: GoogleConfig,
}

impl GoogleState {
    pub fn new(http_client: reqwest::Client, config: GoogleConfig) -> Self {
        Self { http_client, config }
    }
}

/// Google Custom Search credentials, read from the environment at startup.
#[derive(Clone, Debug, Default)]
pub struct GoogleConfig {
    pub api_key: Option<String>,
    pub cx: Option<String>,
}

impl GoogleConfig {
    /// Reads `GOOGLE_API_KEY` and `GOOGLE_CX`. Missing values only warn
    /// here; requests fail with 500 until both are present.
    pub fn from_env() -> Self {
        let api_key = std::env::var("GOOGLE_API_KEY").ok();
        let cx = std::env::var("GOOGLE_CX").ok();
        if api_key.is_none() {
            warn!("GOOGLE_API_KEY is not set; /search will return 500");
        }
        if cx.is_none() {
            warn!("GOOGLE_CX is not set; /search will return 500");
        }
        Self { api_key, cx }
    }

    /// Both credentials, or `None` when the server is not configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.api_key.as_deref(), self.cx.as_deref()) {
            (Some(key), Some(cx)) => Some((key, cx)),
            _ => None,
        }
    }
}

/// Listen port from `PORT`, defaulting to 3000.
pub fn listen_port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000)
}

/// Shared outbound client; the 8 second timeout bounds every upstream call.
pub fn upstream_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(8))
        .build()
}
