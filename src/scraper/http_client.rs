use crate::config::SourceConfig;
use crate::scraper::error::ScrapeError;
use anyhow::{Context, Result};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep_until};
use tracing::debug;

pub struct HttpClient {
    inner: reqwest::Client,
    throttle: Throttle,
}

impl HttpClient {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .cookie_store(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            inner,
            throttle: Throttle::new(Duration::from_millis(config.request_delay_ms)),
        })
    }

    /// One polite GET. Non-2xx responses are returned as `ScrapeError::Status`.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        self.throttle.wait().await;
        debug!("GET {}", url);

        let resp = self
            .inner
            .get(url)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            }
            .into());
        }

        resp.text().await.context("Failed to read response body")
    }
}

// ── Throttle ──────────────────────────────────────────────────────────────────

/// Spaces request starts at least `delay` apart, shared by every task
/// using the client.
struct Throttle {
    delay: Duration,
    next: Mutex<Option<Instant>>,
}

impl Throttle {
    fn new(delay: Duration) -> Self {
        Self { delay, next: Mutex::new(None) }
    }

    /// The first call goes straight through.
    async fn wait(&self) {
        let mut next = self.next.lock().await;
        if let Some(at) = *next {
            sleep_until(at).await;
        }
        *next = Some(Instant::now() + self.delay);
    }
}
