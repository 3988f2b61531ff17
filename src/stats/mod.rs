//! Ability-name frequency across a roster, for tag-cloud style filtering.

use crate::models::{AbilityCount, CharacterAbilities};
use std::collections::HashMap;

/// Most common ability names, count desc then name asc, at most `top` rows.
pub fn common_abilities(characters: &[CharacterAbilities], top: usize) -> Vec<AbilityCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for c in characters {
        for label in c.abilities.labels() {
            *counts.entry(label).or_default() += 1;
        }
    }

    let mut rows: Vec<AbilityCount> = counts
        .into_iter()
        .map(|(ability, count)| AbilityCount { ability: ability.to_string(), count })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.ability.cmp(&b.ability)));
    rows.truncate(top);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmenter::segment;

    fn character(name: &str, panel: &str) -> CharacterAbilities {
        CharacterAbilities {
            name: name.to_string(),
            path: format!("/en/characters/{name}"),
            abilities: segment(panel),
            ..Default::default()
        }
    }

    #[test]
    fn test_common_abilities_ordering() {
        let roster = vec![
            character("Hulk", "Smash  Hit.  Rage  Gain Offense Up.  Passive  Regen."),
            character("Thor", "Smash  Hit.  Passive  Heal."),
            character("Loki", "Passive  Stealth.  Trick  Flip."),
        ];

        let rows = common_abilities(&roster, 3);
        let got: Vec<(&str, usize)> = rows.iter().map(|r| (r.ability.as_str(), r.count)).collect();
        assert_eq!(got, vec![("Passive", 3), ("Smash", 2), ("Rage", 1)]);
    }

    #[test]
    fn test_common_abilities_empty() {
        assert!(common_abilities(&[], 100).is_empty());
    }
}
