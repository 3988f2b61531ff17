mod config;
mod models;
mod pipeline;
mod scraper;
mod segmenter;
mod stats;
mod storage;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::AppConfig;
use crate::models::{AbilityReport, RosterEntry};
use crate::pipeline::Pipeline;
use crate::scraper::parsers::parse_effects;
use crate::scraper::{FileSource, HttpSource, PageSource};
use crate::segmenter::{segment, segment_panel};
use crate::storage::{EFFECTS_FILE, JsonStore, read_json, to_json};

#[derive(Parser)]
#[command(name = "msf-abilities", about = "Character ability segmenter for MSF pages", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Segment a raw ability text block (file or stdin) and print it as JSON
    Segment {
        /// Text file; reads stdin when omitted
        file: Option<PathBuf>,

        /// Keep the panel header instead of stripping it
        #[arg(long)]
        keep_header: bool,

        /// Print one `label: body` line per ability instead of JSON
        #[arg(long)]
        lines: bool,
    },

    /// Segment saved character pages from disk
    Extract {
        #[arg(required = true)]
        pages: Vec<PathBuf>,
    },

    /// Fetch character pages from the site (whole roster when no paths given)
    Fetch {
        /// Site-relative paths, e.g. /en/characters/Hulk
        paths: Vec<String>,

        /// Stop after this many characters
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Scrape the status effects page into positive / negative / other lists
    Effects {
        /// Saved effects page; fetched from the site when omitted
        file: Option<PathBuf>,
    },

    /// Print the most common ability names from a saved report
    Tally {
        report: PathBuf,

        #[arg(short, long)]
        top: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "msf_abilities=info,warn",
        1 => "msf_abilities=debug,info",
        _ => "trace",
    };

    // Logs go to stderr so `segment` output can be piped.
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::new(filter))
        .init();

    let config = AppConfig::load()?;

    match cli.command {
        Command::Segment { file, keep_header, lines } => {
            let text = match &file {
                Some(path) => std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {:?}", path))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf).context("Failed to read stdin")?;
                    buf
                }
            };
            let map = if keep_header { segment(&text) } else { segment_panel(&text, &config.source.header) };
            if map.is_empty() {
                info!("No ability labels found");
            }
            if lines {
                for (label, body) in map.iter() {
                    println!("{}: {}", label, body);
                }
            } else {
                println!("{}", to_json(&map, config.output.pretty)?);
            }
        }

        Command::Extract { pages } => {
            let started = Instant::now();
            let roster: Vec<RosterEntry> = pages
                .iter()
                .map(|p| RosterEntry::from_path(&p.to_string_lossy()))
                .collect();

            let pipeline = Pipeline::new(config, Arc::new(FileSource::new(".")));
            let (report, _stats) = pipeline.run(roster).await?;
            pipeline.save(&report)?;
            info!("Extract finished in {:.2?}", started.elapsed());
        }

        Command::Fetch { paths, limit } => {
            let started = Instant::now();
            let source = Arc::new(HttpSource::new(&config.source)?);

            let mut roster = if paths.is_empty() {
                source.fetch_roster().await?
            } else {
                paths.iter().map(|p| RosterEntry::from_path(p)).collect()
            };
            if let Some(n) = limit {
                info!("Limiting to {} characters", n);
                roster.truncate(n);
            }

            let pipeline = Pipeline::new(config, source);
            let (report, _stats) = pipeline.run(roster).await?;
            pipeline.save(&report)?;
            info!("Fetch finished in {:.2?}", started.elapsed());
        }

        Command::Effects { file } => {
            let html = match &file {
                Some(path) => std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {:?}", path))?,
                None => {
                    let source = HttpSource::new(&config.source)?;
                    source.fetch_page(&config.source.effects_path).await
                        .context("Failed to fetch effects page")?
                }
            };

            let effects = parse_effects(&html)?;
            info!(
                "Effects: {} total | {} positive | {} negative | {} other",
                effects.len(), effects.positive.len(), effects.negative.len(), effects.other.len()
            );
            let store = JsonStore::open(&config.output.dir, config.output.pretty)?;
            store.write(EFFECTS_FILE, &effects)?;
        }

        Command::Tally { report, top } => {
            let report: AbilityReport = read_json(&report)?;
            let rows = stats::common_abilities(&report.characters, top.unwrap_or(config.output.top));
            if rows.is_empty() {
                println!("No abilities in report.");
            } else {
                println!("{} characters, scraped {}", report.characters.len(), report.scraped_at);
                for row in &rows {
                    println!("  {:>4}  {}", row.count, row.ability);
                }
            }
        }
    }

    Ok(())
}
