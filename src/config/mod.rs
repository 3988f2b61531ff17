use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Where pages come from and how the ability panel is located in them
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_roster_path")]
    pub roster_path: String,

    #[serde(default = "default_roster_selector")]
    pub roster_selector: String,

    #[serde(default = "default_name_selector")]
    pub name_selector: String,

    #[serde(default = "default_panel_selector")]
    pub panel_selector: String,

    #[serde(default = "default_traits_selector")]
    pub traits_selector: String,

    #[serde(default = "default_description_selector")]
    pub description_selector: String,

    /// Image whose `src` is the character portrait.
    #[serde(default = "default_portrait_selector")]
    pub portrait_selector: String,

    #[serde(default = "default_effects_path")]
    pub effects_path: String,

    /// Fixed title at the top of the panel text, removed before segmenting.
    #[serde(default = "default_header")]
    pub header: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// JSON output
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_true")]
    pub pretty: bool,

    /// How many entries the common-abilities table keeps.
    #[serde(default = "default_top")]
    pub top: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

// ── Defaults ─────────────────────────────────────────────────────────────────

fn default_base_url() -> String {
    "https://marvelstrikeforce.com".to_string()
}
fn default_roster_path() -> String {
    "/en/characters".to_string()
}
fn default_roster_selector() -> String {
    "li.character".to_string()
}
fn default_name_selector() -> String {
    "h4".to_string()
}
fn default_panel_selector() -> String {
    "div.hero-abilities".to_string()
}
fn default_traits_selector() -> String {
    "a.traits".to_string()
}
fn default_description_selector() -> String {
    "div.description".to_string()
}
fn default_portrait_selector() -> String {
    "div.portrait-wrapper img".to_string()
}
fn default_effects_path() -> String {
    "/en/effects".to_string()
}
fn default_header() -> String {
    "Character Abilities".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_request_delay_ms() -> u64 {
    1500
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; msf-abilities/0.1)".to_string()
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("assets")
}
fn default_true() -> bool {
    true
}
fn default_top() -> usize {
    100
}
fn default_concurrency() -> usize {
    1
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            roster_path: default_roster_path(),
            roster_selector: default_roster_selector(),
            name_selector: default_name_selector(),
            panel_selector: default_panel_selector(),
            traits_selector: default_traits_selector(),
            description_selector: default_description_selector(),
            portrait_selector: default_portrait_selector(),
            effects_path: default_effects_path(),
            header: default_header(),
            timeout_secs: default_timeout_secs(),
            request_delay_ms: default_request_delay_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            pretty: true,
            top: default_top(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

// ── Loader ───────────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from file + environment overrides
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::File::with_name("config/local")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(config::Environment::with_prefix("MSF").separator("__"))
            .build()?;

        let app_cfg = cfg.try_deserialize().unwrap_or_else(|e| {
            warn!("Invalid configuration ({}), using defaults", e);
            AppConfig::default()
        });
        Ok(app_cfg)
    }
}
