use crate::config::SourceConfig;
use crate::models::{CharacterDetails, Effect, EffectKind, EffectsData, RosterEntry};
use crate::scraper::error::ScrapeError;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

fn selector(s: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(s).map_err(|e| ScrapeError::Selector {
        selector: s.to_string(),
        reason: format!("{:?}", e),
    })
}

/// Text nodes concatenated verbatim; whitespace runs are kept as-is.
fn raw_text(el: ElementRef) -> String {
    el.text().collect::<String>()
}

// ── Ability panel ─────────────────────────────────────────────────────────────

/// Visible text of the first element matching `panel_selector`.
pub fn parse_panel_text(html: &str, panel_selector: &str) -> Result<String, ScrapeError> {
    let doc = Html::parse_document(html);
    let sel = selector(panel_selector)?;

    let panel = doc
        .select(&sel)
        .next()
        .ok_or_else(|| ScrapeError::PanelNotFound(panel_selector.to_string()))?;

    let text = raw_text(panel);
    debug!("panel `{}`: {} chars", panel_selector, text.len());
    Ok(text)
}

// ── Character details ─────────────────────────────────────────────────────────

/// Trimmed text of the first match under `el`, if any.
fn first_text(el: ElementRef, sel: &Selector) -> Option<String> {
    el.select(sel).next().map(|e| raw_text(e).trim().to_string())
}

/// Traits, description and portrait URL from a character page.
/// Missing pieces are left empty rather than treated as errors.
pub fn parse_character_details(html: &str, cfg: &SourceConfig) -> Result<CharacterDetails, ScrapeError> {
    let doc = Html::parse_document(html);
    let traits_sel = selector(&cfg.traits_selector)?;
    let description_sel = selector(&cfg.description_selector)?;
    let portrait_sel = selector(&cfg.portrait_selector)?;
    let root = doc.root_element();

    let traits = doc
        .select(&traits_sel)
        .map(|el| raw_text(el).trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    let description = first_text(root, &description_sel).filter(|d| !d.is_empty());

    let image_url = doc
        .select(&portrait_sel)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(|src| src.trim().to_string());

    Ok(CharacterDetails { traits, description, image_url })
}

// ── Effects page ──────────────────────────────────────────────────────────────

/// "Expires: End of turn" → "End of turn"
fn info_value(text: &str) -> String {
    text.rsplit(':').next().unwrap_or(text).trim().to_string()
}

/// Status effects grouped by the column heading they are listed under.
pub fn parse_effects(html: &str) -> Result<EffectsData, ScrapeError> {
    let doc = Html::parse_document(html);
    let column_sel = selector("div.column")?;
    let heading_sel = selector("h2.is-unselectable")?;
    let effect_sel = selector("li.effect")?;
    let name_sel = selector("h3")?;
    let description_sel = selector("p")?;
    let info_sel = selector("ul.other-info li")?;

    let mut data = EffectsData::default();

    for column in doc.select(&column_sel) {
        let kind = column
            .select(&heading_sel)
            .next()
            .map(|h| EffectKind::from_heading(raw_text(h).trim()))
            .unwrap_or(EffectKind::Other);

        for item in column.select(&effect_sel) {
            let mut effect = Effect {
                name: first_text(item, &name_sel).unwrap_or_else(|| "Unnamed Effect".to_string()),
                description: first_text(item, &description_sel)
                    .unwrap_or_else(|| "No description".to_string()),
                expires: None,
                opposite: None,
            };

            for info in item.select(&info_sel) {
                let text = raw_text(info);
                let text = text.trim();
                if text.contains("Expires") {
                    effect.expires = Some(info_value(text));
                } else if text.contains("Opposite") {
                    effect.opposite = Some(info_value(text));
                }
            }

            data.push(kind, effect);
        }
    }

    debug!(
        "effects: {} positive, {} negative, {} other",
        data.positive.len(), data.negative.len(), data.other.len()
    );
    Ok(data)
}

// ── Roster page ───────────────────────────────────────────────────────────────

/// Character name + detail-page link for every roster item.
/// Items missing either are skipped.
pub fn parse_roster(
    html: &str,
    item_selector: &str,
    name_selector: &str,
) -> Result<Vec<RosterEntry>, ScrapeError> {
    let doc = Html::parse_document(html);
    let item_sel = selector(item_selector)?;
    let name_sel = selector(name_selector)?;
    let a_sel = selector("a")?;

    let mut entries = Vec::new();

    for item in doc.select(&item_sel) {
        let name = item
            .select(&name_sel)
            .next()
            .map(|el| raw_text(el).trim().to_string())
            .filter(|n| !n.is_empty());

        let path = item
            .select(&a_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(|h| h.trim().to_string());

        match (name, path) {
            (Some(name), Some(path)) => entries.push(RosterEntry { name, path }),
            (name, _) => warn!("Skipping roster item without name or link ({:?})", name),
        }
    }

    Ok(entries)
}
