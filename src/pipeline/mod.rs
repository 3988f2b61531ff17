//! Pipeline orchestrator: page source → panel text → segmenter → JSON.
//!
//! For every roster entry:
//!   1. Fetch the character page from the configured `PageSource`
//!   2. Pull the ability panel text out with the configured selector
//!   3. Strip the panel header and segment it into ability → description
//!   4. Read traits, description and portrait from the same page
//!
//! A page that cannot be fetched counts as an error and is left out of the
//! report. A page without an ability panel is kept with an empty map.

use crate::config::{AppConfig, SourceConfig};
use crate::models::{AbilityReport, CharacterAbilities, ChunkMap, RosterEntry};
use crate::scraper::PageSource;
use crate::scraper::error::ScrapeError;
use crate::scraper::parsers::{parse_character_details, parse_panel_text};
use crate::segmenter::{duplicate_labels, segment_chunks, strip_header};
use crate::stats::common_abilities;
use crate::storage::{CHARACTERS_FILE, COMMON_FILE, JsonStore};
use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

pub struct Pipeline {
    config: AppConfig,
    source: Arc<dyn PageSource>,
}

impl Pipeline {
    pub fn new(config: AppConfig, source: Arc<dyn PageSource>) -> Self {
        Self { config, source }
    }

    pub async fn run(&self, roster: Vec<RosterEntry>) -> Result<(AbilityReport, PipelineStats)> {
        info!("=== Segmenting abilities for {} characters ===", roster.len());

        let sem = Arc::new(Semaphore::new(self.config.pipeline.concurrency.max(1)));
        let source_cfg = Arc::new(self.config.source.clone());
        let mut handles = Vec::new();

        for entry in roster {
            let source = Arc::clone(&self.source);
            let cfg = Arc::clone(&source_cfg);
            let sem = Arc::clone(&sem);
            let name = entry.name.clone();

            let handle = tokio::spawn(async move {
                let _permit = sem.acquire().await?;

                let html = source.fetch_page(&entry.path).await
                    .with_context(|| format!("fetch_page({})", entry.path))?;

                Ok::<CharacterAbilities, anyhow::Error>(character_from_html(entry, &html, &cfg)?)
            });

            handles.push((name, handle));
        }

        let mut characters = Vec::new();
        let mut stats = PipelineStats::default();

        for (name, handle) in handles {
            match handle.await {
                Ok(Ok(c)) => {
                    stats.abilities += c.abilities.len();
                    if c.abilities.is_empty() {
                        stats.empty += 1;
                    }
                    stats.duplicates += c.duplicates.len();
                    characters.push(c);
                }
                Ok(Err(e)) => { warn!("{}: {:#}", name, e); stats.errors += 1; }
                Err(e) => { error!("Task panic for {}: {}", name, e); stats.errors += 1; }
            }
        }
        stats.characters = characters.len();

        info!("=== Done: {} characters | {} abilities | {} empty | {} duplicate labels | {} errors ===",
            stats.characters, stats.abilities, stats.empty, stats.duplicates, stats.errors,
        );

        let report = AbilityReport {
            scraped_at: Utc::now().naive_utc(),
            characters,
        };
        Ok((report, stats))
    }

    /// Write the report and its common-abilities table to `output.dir`.
    pub fn save(&self, report: &AbilityReport) -> Result<()> {
        let out = &self.config.output;
        let store = JsonStore::open(&out.dir, out.pretty)?;
        store.write(CHARACTERS_FILE, report)?;
        store.write(COMMON_FILE, &common_abilities(&report.characters, out.top))?;
        Ok(())
    }
}

/// Segment one character page. A missing panel yields an empty map.
pub fn character_from_html(
    entry: RosterEntry,
    html: &str,
    cfg: &SourceConfig,
) -> Result<CharacterAbilities, ScrapeError> {
    let panel = match parse_panel_text(html, &cfg.panel_selector) {
        Ok(text) => text,
        Err(ScrapeError::PanelNotFound(sel)) => {
            warn!("{}: no ability panel (`{}`)", entry.name, sel);
            String::new()
        }
        Err(e) => return Err(e),
    };

    let chunks = segment_chunks(strip_header(&panel, &cfg.header));
    let duplicates = duplicate_labels(&chunks);
    if !duplicates.is_empty() {
        warn!("{}: repeated ability names, last description kept: {:?}", entry.name, duplicates);
    }

    let abilities = chunks.into_iter().collect::<ChunkMap>();
    if abilities.is_empty() && !panel.trim().is_empty() {
        warn!("{}: ability panel has text but no labels were found", entry.name);
    }
    debug!("{}: {} abilities", entry.name, abilities.len());

    let details = parse_character_details(html, cfg)?;

    Ok(CharacterAbilities {
        name: entry.name,
        path: entry.path,
        traits: details.traits,
        description: details.description,
        image_url: details.image_url,
        abilities,
        duplicates,
    })
}

#[derive(Debug, Default)]
pub struct PipelineStats {
    pub characters: usize,
    pub abilities: usize,
    pub empty: usize,
    pub duplicates: usize,
    pub errors: usize,
}
