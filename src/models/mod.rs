use chrono::NaiveDateTime;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ── Chunk ─────────────────────────────────────────────────────────────────────

/// One (label, body) pair in scan order, duplicates included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub label: String,
    pub body: String,
}

// ── ChunkMap ──────────────────────────────────────────────────────────────────

/// Ordered label → body mapping.
///
/// Keys are unique. Re-inserting an existing label replaces its body but the
/// key keeps the position of its first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkMap {
    entries: Vec<(String, String)>,
}

impl ChunkMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair, returning the previous body if the label was present.
    pub fn insert(&mut self, label: impl Into<String>, body: impl Into<String>) -> Option<String> {
        let label = label.into();
        let body = body.into();
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some((_, existing)) => Some(std::mem::replace(existing, body)),
            None => {
                self.entries.push((label, body));
                None
            }
        }
    }

    #[cfg(test)]
    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, b)| b.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(l, b)| (l.as_str(), b.as_str()))
    }
}

impl FromIterator<Chunk> for ChunkMap {
    fn from_iter<I: IntoIterator<Item = Chunk>>(iter: I) -> Self {
        let mut map = ChunkMap::new();
        for chunk in iter {
            map.insert(chunk.label, chunk.body);
        }
        map
    }
}

impl Serialize for ChunkMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, body) in &self.entries {
            map.serialize_entry(label, body)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ChunkMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ChunkMapVisitor;

        impl<'de> Visitor<'de> for ChunkMapVisitor {
            type Value = ChunkMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of ability name to description")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ChunkMap, A::Error> {
                let mut map = ChunkMap::new();
                while let Some((label, body)) = access.next_entry::<String, String>()? {
                    map.insert(label, body);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(ChunkMapVisitor)
    }
}

// ── Roster ────────────────────────────────────────────────────────────────────

/// A character as listed on the roster page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RosterEntry {
    pub name: String,
    /// Detail page, relative to the site root.
    pub path: String,
}

impl RosterEntry {
    /// Entry for a bare path; the name is its last segment without extension.
    /// "/en/characters/IronMan" → "IronMan" | "pages/hulk.html" → "hulk"
    pub fn from_path(path: &str) -> Self {
        let last = path
            .trim_end_matches(['/', '\\'])
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(path);
        let name = match last.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => last,
        };
        Self {
            name: name.to_string(),
            path: path.to_string(),
        }
    }
}

// ── Character record ──────────────────────────────────────────────────────────

/// Everything besides abilities that a character page shows.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CharacterDetails {
    pub traits: Vec<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CharacterAbilities {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub abilities: ChunkMap,
    /// Labels seen more than once in the panel; only the last body was kept.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub duplicates: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AbilityReport {
    pub scraped_at: NaiveDateTime,
    pub characters: Vec<CharacterAbilities>,
}

// ── Status effects ────────────────────────────────────────────────────────────

/// Column an effect is listed under on the effects page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Positive,
    Negative,
    Other,
}

impl EffectKind {
    /// "Positive Effects" → Positive. Anything unrecognised is Other.
    pub fn from_heading(heading: &str) -> Self {
        let heading = heading.to_lowercase();
        if heading.contains("positive") {
            EffectKind::Positive
        } else if heading.contains("negative") {
            EffectKind::Negative
        } else {
            EffectKind::Other
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Effect {
    pub name: String,
    pub description: String,
    pub expires: Option<String>,
    pub opposite: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EffectsData {
    pub positive: Vec<Effect>,
    pub negative: Vec<Effect>,
    pub other: Vec<Effect>,
}

impl EffectsData {
    pub fn push(&mut self, kind: EffectKind, effect: Effect) {
        match kind {
            EffectKind::Positive => self.positive.push(effect),
            EffectKind::Negative => self.negative.push(effect),
            EffectKind::Other => self.other.push(effect),
        }
    }

    pub fn len(&self) -> usize {
        self.positive.len() + self.negative.len() + self.other.len()
    }
}

// ── Tally ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AbilityCount {
    pub ability: String,
    pub count: usize,
}
