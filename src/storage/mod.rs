use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::info;

pub const CHARACTERS_FILE: &str = "characters_abilities.json";
pub const COMMON_FILE: &str = "common_abilities.json";
pub const EFFECTS_FILE: &str = "effects_data.json";

// ── JSON store ────────────────────────────────────────────────────────────────

/// Writes reports as JSON files under one directory.
pub struct JsonStore {
    dir: PathBuf,
    pretty: bool,
}

impl JsonStore {
    pub fn open(dir: &Path, pretty: bool) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Could not create dir {:?}", dir))?;
        Ok(Self { dir: dir.to_path_buf(), pretty })
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    pub fn write<T: Serialize>(&self, name: &str, value: &T) -> Result<PathBuf> {
        let path = self.path(name);
        let json = to_json(value, self.pretty)?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write {:?}", path))?;
        info!("Wrote {:?}", path);
        Ok(path)
    }
}

pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("JSON serialisation failed")
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&text).with_context(|| format!("Malformed JSON in {:?}", path))
}
