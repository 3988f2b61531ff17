//! Splits a free-text ability panel into named chunks.
//!
//! A label is an uppercase ASCII letter followed by letters, apostrophes,
//! hyphens and single interior whitespace, and it must be followed by a run
//! of at least two whitespace characters. That run is the only thing that
//! separates a label from body text; title-case words inside a body that are
//! single-spaced never start a new chunk.
//!
//! ```text
//! "Invisible Woman  Grants stealth.  Iron Fist  Grants +50% Defense."
//!  └── label ────┘  └── body ─────┘  └ label ┘  └── body ─────────┘
//! ```

use crate::models::{Chunk, ChunkMap};
use regex::Regex;
use std::sync::LazyLock;

static LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Z](?:[a-zA-Z'’\-]|\s[a-zA-Z'’\-])*)\s{2,}").expect("label pattern is valid")
});

// ── Segmenting ────────────────────────────────────────────────────────────────

/// Ordered label → body mapping for `text`. Later duplicates overwrite.
pub fn segment(text: &str) -> ChunkMap {
    segment_chunks(text).into_iter().collect()
}

/// Every chunk in scan order, duplicates kept.
///
/// Text ahead of the first label is dropped. Trailing whitespace is still
/// scanned so a final `"Label  "` yields an empty body instead of vanishing.
pub fn segment_chunks(text: &str) -> Vec<Chunk> {
    let text = text.trim_start();
    let mut chunks = Vec::new();
    let mut pending: Option<(&str, usize)> = None;

    for caps in LABEL.captures_iter(text) {
        let (Some(whole), Some(label)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if let Some((prev, body_start)) = pending.take() {
            chunks.push(chunk(prev, &text[body_start..whole.start()]));
        }
        pending = Some((label.as_str(), whole.end()));
    }

    if let Some((prev, body_start)) = pending {
        chunks.push(chunk(prev, &text[body_start..]));
    }

    chunks
}

fn chunk(label: &str, body: &str) -> Chunk {
    Chunk {
        label: label.trim_end().to_string(),
        body: body.trim().to_string(),
    }
}

/// Labels that appear more than once, in order of their second appearance.
pub fn duplicate_labels(chunks: &[Chunk]) -> Vec<String> {
    let mut seen: Vec<&str> = Vec::new();
    let mut dups: Vec<String> = Vec::new();
    for c in chunks {
        if seen.contains(&c.label.as_str()) {
            if !dups.contains(&c.label) {
                dups.push(c.label.clone());
            }
        } else {
            seen.push(&c.label);
        }
    }
    dups
}

// ── Header ────────────────────────────────────────────────────────────────────

/// Drop a fixed panel title from the front of `text`.
/// "Character Abilities  Strike  ..." → "Strike  ..."
///
/// The header only counts when whitespace or end of input follows it.
/// Trailing whitespace is left alone; the scan needs it for a final label.
pub fn strip_header<'a>(text: &'a str, header: &str) -> &'a str {
    let text = text.trim_start();
    if header.is_empty() {
        return text;
    }
    match text.strip_prefix(header) {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest.trim_start(),
        _ => text,
    }
}

/// Header-stripped segmentation of a whole ability panel.
pub fn segment_panel(text: &str, header: &str) -> ChunkMap {
    segment(strip_header(text, header))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(map: &ChunkMap) -> Vec<(&str, &str)> {
        map.iter().collect()
    }

    /// Every run of two or more whitespace characters becomes exactly two spaces.
    fn canonical_gaps(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut run = String::new();
        for ch in text.chars() {
            if ch.is_whitespace() {
                run.push(ch);
                continue;
            }
            if run.chars().count() >= 2 {
                out.push_str("  ");
            } else {
                out.push_str(&run);
            }
            run.clear();
            out.push(ch);
        }
        if run.chars().count() >= 2 {
            out.push_str("  ");
        } else {
            out.push_str(&run);
        }
        out
    }

    #[test]
    fn test_empty_input() {
        assert!(segment("").is_empty());
        assert!(segment("   \n\t ").is_empty());
    }

    #[test]
    fn test_no_labels() {
        assert!(segment("just a sentence with no double spaces").is_empty());
        assert!(segment("Single Spaced Title Case Words Only.").is_empty());
    }

    #[test]
    fn test_two_space_threshold() {
        let map = segment("Invisible Woman  Grants stealth.  Iron Fist  Grants +50% Defense.");
        assert_eq!(
            pairs(&map),
            vec![
                ("Invisible Woman", "Grants stealth."),
                ("Iron Fist", "Grants +50% Defense."),
            ]
        );
    }

    #[test]
    fn test_single_spaced_words_stay_in_body() {
        // "Iron Fist" is still followed by a gap, so it opens a chunk.
        let map = segment("Invisible Woman  Grants stealth. Iron Fist  Grants +50% Defense.");
        assert_eq!(map.get("Invisible Woman"), Some("Grants stealth."));
        assert_eq!(map.get("Iron Fist"), Some("Grants +50% Defense."));

        let map = segment("Basic  Attack primary target for 120% Damage. Apply Slow.");
        assert_eq!(
            pairs(&map),
            vec![("Basic", "Attack primary target for 120% Damage. Apply Slow.")]
        );
    }

    #[test]
    fn test_apostrophes_and_hyphens_in_label() {
        let map = segment("Captain's Fury-Strike  Deal damage.  Kree’s Wrath  Gain Offense Up.");
        assert_eq!(
            pairs(&map),
            vec![
                ("Captain's Fury-Strike", "Deal damage."),
                ("Kree’s Wrath", "Gain Offense Up."),
            ]
        );
    }

    #[test]
    fn test_trailing_label_has_empty_body() {
        let map = segment("Strike  Deal damage.  Passive  ");
        assert_eq!(pairs(&map), vec![("Strike", "Deal damage."), ("Passive", "")]);
    }

    #[test]
    fn test_label_without_trailing_gap_is_body() {
        let map = segment("Strike  Deal damage.  Passive");
        assert_eq!(pairs(&map), vec![("Strike", "Deal damage.  Passive")]);
    }

    #[test]
    fn test_leading_unlabeled_text_dropped() {
        let map = segment("stray text  Real Label  Real body.");
        assert_eq!(pairs(&map), vec![("Real Label", "Real body.")]);
    }

    #[test]
    fn test_duplicate_label_last_wins() {
        let text = "Strike  First.  Guard  Block.  Strike  Second.";
        let map = segment(text);
        assert_eq!(pairs(&map), vec![("Strike", "Second."), ("Guard", "Block.")]);
        assert_eq!(duplicate_labels(&segment_chunks(text)), vec!["Strike".to_string()]);
    }

    #[test]
    fn test_mixed_whitespace_runs() {
        let map = segment("Ultimate\t\n   Attack all enemies.\r\n\r\nPassive \t Heal allies.");
        assert_eq!(
            pairs(&map),
            vec![("Ultimate", "Attack all enemies."), ("Passive", "Heal allies.")]
        );
    }

    #[test]
    fn test_label_never_spans_a_gap() {
        let map = segment("Iron Man  Hulk  Smash.");
        assert_eq!(pairs(&map), vec![("Iron Man", ""), ("Hulk", "Smash.")]);
    }

    #[test]
    fn test_canonical_gaps_idempotent() {
        let text = "Basic \t\n Attack primary target.   \n  Special\t\tGain Speed Up.\n\n\nUltimate   Deal damage.";
        let normalized = canonical_gaps(text);
        assert_eq!(normalized, "Basic  Attack primary target.  Special  Gain Speed Up.  Ultimate  Deal damage.");
        assert_eq!(segment(text), segment(&normalized));
        assert_eq!(segment(text).len(), 3);
    }

    #[test]
    fn test_gaps_inside_a_body_are_kept_verbatim() {
        let text = "Strike  Deal damage.\t\t\tthen heal allies.  Guard  Block.";
        let normalized = canonical_gaps(text);

        let raw = segment(text);
        let canon = segment(&normalized);
        assert_eq!(raw.labels().collect::<Vec<_>>(), canon.labels().collect::<Vec<_>>());
        assert_eq!(raw.get("Strike"), Some("Deal damage.\t\t\tthen heal allies."));
        assert_eq!(canon.get("Strike"), Some("Deal damage.  then heal allies."));
        assert_ne!(raw, canon);
        assert_eq!(raw.get("Guard"), canon.get("Guard"));
    }

    #[test]
    fn test_round_trip_generated() {
        const LABELS: [&str; 7] = [
            "Basic",
            "X",
            "Captain's Fury-Strike",
            "Kree’s Wrath",
            "On Ally Death",
            "T'Challa Claws",
            "Anti-Mutant Field",
        ];
        const BODIES: [&str; 5] = [
            "",
            "Deal damage.",
            "Gain +2 Speed Up.",
            "attack all enemies; Apply Bleed x2.",
            "Flip 1 negative effect. Gain Barrier.",
        ];

        for seed in 0..300usize {
            let len = 1 + seed % 6;
            let pairs_in: Vec<(&str, &str)> = (0..len)
                .map(|i| {
                    (
                        LABELS[(seed * 7 + i * 3 + seed / 7) % LABELS.len()],
                        BODIES[(seed * 5 + i * 11) % BODIES.len()],
                    )
                })
                .collect();
            let joined: String = pairs_in.iter().map(|(l, b)| format!("{l}  {b}  ")).collect();

            let chunks = segment_chunks(&joined);
            let recovered: Vec<(&str, &str)> = chunks
                .iter()
                .map(|c| (c.label.as_str(), c.body.as_str()))
                .collect();
            assert_eq!(recovered, pairs_in, "seed {seed}: {joined:?}");

            let mut expected = ChunkMap::new();
            for (l, b) in &pairs_in {
                expected.insert(*l, *b);
            }
            assert_eq!(segment(&joined), expected, "seed {seed}: {joined:?}");
        }
    }

    #[test]
    fn test_round_trip_synthetic() {
        let pairs_in = [
            ("Basic", "Attack primary target for 300% Piercing."),
            ("Special", "Gain Offense Up for 2 turns."),
            ("Ultimate", "Attack all enemies. Apply Bleed x2."),
            ("Passive", ""),
            ("On Ally Death", "Flip 1 negative effect."),
            ("T'Challa's Claws", "Counter."),
            ("Basic", "Overwritten: +5 Speed."),
        ];
        let joined: String = pairs_in
            .iter()
            .map(|(l, b)| format!("{l}  {b}  "))
            .collect();

        let chunks = segment_chunks(&joined);
        let recovered: Vec<(&str, &str)> = chunks
            .iter()
            .map(|c| (c.label.as_str(), c.body.as_str()))
            .collect();
        assert_eq!(recovered, pairs_in.to_vec());

        let map = segment(&joined);
        assert_eq!(map.len(), 6);
        assert_eq!(map.get("Basic"), Some("Overwritten: +5 Speed."));
        assert_eq!(map.labels().next(), Some("Basic"));
    }

    #[test]
    fn test_strip_header() {
        assert_eq!(
            strip_header("  Character Abilities  Basic  Hit.", "Character Abilities"),
            "Basic  Hit."
        );
        assert_eq!(strip_header("Basic  Hit.", "Character Abilities"), "Basic  Hit.");
        assert_eq!(strip_header(" Basic  Hit. ", ""), "Basic  Hit. ");
        assert_eq!(strip_header("Character Abilities", "Character Abilities"), "");
    }

    #[test]
    fn test_strip_header_needs_a_boundary() {
        assert_eq!(
            strip_header("Character AbilitiesX  Hit.", "Character Abilities"),
            "Character AbilitiesX  Hit."
        );
    }

    #[test]
    fn test_panel_keeps_trailing_empty_body() {
        let map = segment_panel(
            "Character Abilities  Strike  Deal damage.  Passive  ",
            "Character Abilities",
        );
        assert_eq!(pairs(&map), vec![("Strike", "Deal damage."), ("Passive", "")]);
    }
}
