pub mod error;
pub mod http_client;
pub mod parsers;

use crate::config::SourceConfig;
use crate::models::RosterEntry;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};
use url::Url;

use self::error::ScrapeError;
use self::http_client::HttpClient;
use self::parsers::parse_roster;

// ── Source trait ──────────────────────────────────────────────────────────────

/// Where character pages come from. `page` is a roster path.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, page: &str) -> Result<String>;
}

// ── Saved pages on disk ───────────────────────────────────────────────────────

/// Reads saved pages from disk. Relative paths resolve against `root`.
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl PageSource for FileSource {
    async fn fetch_page(&self, page: &str) -> Result<String> {
        let path = self.root.join(page);
        debug!("Reading {:?}", path);
        tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read page {:?}", path))
    }
}

// ── Live site ─────────────────────────────────────────────────────────────────

pub struct HttpSource {
    client: HttpClient,
    base_url: Url,
    roster_path: String,
    roster_selector: String,
    name_selector: String,
}

impl HttpSource {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Bad base_url {:?}", config.base_url))?;
        Ok(Self {
            client: HttpClient::new(config)?,
            base_url,
            roster_path: config.roster_path.clone(),
            roster_selector: config.roster_selector.clone(),
            name_selector: config.name_selector.clone(),
        })
    }

    /// Absolute URL for a site-relative path. "/en/characters/Hulk" → https://…/en/characters/Hulk
    pub fn page_url(&self, page: &str) -> Result<Url> {
        page_url(&self.base_url, page)
    }

    /// Walk the roster page and list every character it links to.
    pub async fn fetch_roster(&self) -> Result<Vec<RosterEntry>> {
        let html = self.fetch_page(&self.roster_path).await
            .context("Failed to fetch roster page")?;
        let roster = parse_roster(&html, &self.roster_selector, &self.name_selector)?;
        info!("Roster: {} characters", roster.len());
        Ok(roster)
    }
}

fn page_url(base: &Url, page: &str) -> Result<Url> {
    Ok(base.join(page).map_err(ScrapeError::from)?)
}

#[async_trait]
impl PageSource for HttpSource {
    async fn fetch_page(&self, page: &str) -> Result<String> {
        let url = self.page_url(page)?;
        self.client.get_text(url.as_str()).await
    }
}
