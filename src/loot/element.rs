//! Elemental damage types
//!
//! Decides whether an item carries an element, rolls it against the element
//! table, pulls bonus damage dice out of the entry and merges exclusive pairs
//! into combination elements.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::roll::RollSource;
use crate::data::rules::{ElementRules, GuildEntry};
use crate::error::{LootError, Result};
use crate::items::item::Rarity;

/// Upper bound on rerolls for guilds that guarantee an element
pub const MAX_ELEMENT_ATTEMPTS: u32 = 1000;

/// Elemental damage types, including the merged combination types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Cryo,
    Corrosive,
    Explosive,
    Incendiary,
    Radiation,
    Shock,
    #[serde(rename = "corroshock")]
    CorroShock,
    #[serde(rename = "explosivcryo")]
    ExplosivCryo,
    #[serde(rename = "incendiaradiation", alias = "incendiation")]
    IncendiaRadiation,
}

/// Exclusive pairs and the element they merge into
const COMBINATIONS: [(Element, Element, Element); 3] = [
    (Element::Corrosive, Element::Shock, Element::CorroShock),
    (Element::Explosive, Element::Cryo, Element::ExplosivCryo),
    (Element::Incendiary, Element::Radiation, Element::IncendiaRadiation),
];

impl Element {
    /// The six elements that can be rolled directly
    pub const BASE: [Element; 6] = [
        Element::Cryo,
        Element::Corrosive,
        Element::Explosive,
        Element::Incendiary,
        Element::Radiation,
        Element::Shock,
    ];

    /// Lowercase key used in rule files
    pub fn key(&self) -> &'static str {
        match self {
            Element::Cryo => "cryo",
            Element::Corrosive => "corrosive",
            Element::Explosive => "explosive",
            Element::Incendiary => "incendiary",
            Element::Radiation => "radiation",
            Element::Shock => "shock",
            Element::CorroShock => "corroshock",
            Element::ExplosivCryo => "explosivcryo",
            Element::IncendiaRadiation => "incendiaradiation",
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Element::Cryo => "Cryo",
            Element::Corrosive => "Corrosive",
            Element::Explosive => "Explosive",
            Element::Incendiary => "Incendiary",
            Element::Radiation => "Radiation",
            Element::Shock => "Shock",
            Element::CorroShock => "CorroShock",
            Element::ExplosivCryo => "ExplosivCryo",
            Element::IncendiaRadiation => "IncendiaRadiation",
        }
    }

    /// The pair a combination element was merged from
    pub fn components(&self) -> Option<(Element, Element)> {
        COMBINATIONS
            .iter()
            .find(|(_, _, combo)| combo == self)
            .map(|(a, b, _)| (*a, *b))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Element {
    type Err = LootError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cryo" => Ok(Element::Cryo),
            "corrosive" => Ok(Element::Corrosive),
            "explosive" => Ok(Element::Explosive),
            "incendiary" => Ok(Element::Incendiary),
            "radiation" => Ok(Element::Radiation),
            "shock" => Ok(Element::Shock),
            "corroshock" => Ok(Element::CorroShock),
            "explosivcryo" | "crysplosive" => Ok(Element::ExplosivCryo),
            "incendiaradiation" | "incendiation" => Ok(Element::IncendiaRadiation),
            _ => Err(LootError::UnknownElement(s.to_string())),
        }
    }
}

/// One cell of the element table: a single element or a list, each
/// possibly annotated with a bonus die such as `"shock (+1d6)"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ElementEntry {
    Single(String),
    Many(Vec<String>),
}

impl ElementEntry {
    fn raw(&self) -> Vec<&str> {
        match self {
            ElementEntry::Single(s) => vec![s.as_str()],
            ElementEntry::Many(list) => list.iter().map(String::as_str).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.raw().iter().all(|s| s.trim().is_empty())
    }

    /// Bare elements plus the bonus die found on any of them
    pub fn parse(&self) -> Result<(Vec<Element>, Option<String>)> {
        let mut elements = Vec::new();
        let mut bonus = None;

        for raw in self.raw() {
            if raw.trim().is_empty() {
                continue;
            }
            if let Some(die) = extract_bonus(raw) {
                bonus = Some(die);
            }
            let bare = raw.split_whitespace().next().unwrap_or_default();
            elements.push(bare.parse::<Element>()?);
        }

        Ok((elements, bonus))
    }
}

/// Pull `"+1d6"` out of `"shock (+1d6)"`
fn extract_bonus(raw: &str) -> Option<String> {
    let open = raw.find('(')?;
    let close = raw[open..].find(')').map(|i| open + i).unwrap_or(raw.len());
    let inner = raw[open + 1..close].trim();
    if inner.is_empty() {
        None
    } else {
        Some(inner.to_string())
    }
}

/// Normalize a caller-supplied damage die to `"+NdX"`
pub fn normalize_bonus(die: &str) -> String {
    let trimmed = die.trim().trim_start_matches('(').trim_end_matches(')').trim();
    if trimmed.starts_with('+') {
        trimmed.to_string()
    } else {
        format!("+{trimmed}")
    }
}

/// Replace every exclusive pair with its combination element
///
/// Works on a copy; singletons and combination elements pass through.
pub fn merge_combinations(elements: &[Element]) -> Vec<Element> {
    let mut merged = elements.to_vec();
    for (a, b, combo) in COMBINATIONS {
        let first = merged.iter().position(|e| *e == a);
        let second = merged.iter().position(|e| *e == b);
        if let (Some(i), Some(j)) = (first, second) {
            merged.remove(i.max(j));
            merged.remove(i.min(j));
            merged.push(combo);
        }
    }
    merged
}

/// Whether `element` is already on the item, directly or inside a combination
pub fn has_element(elements: &[Element], element: Element) -> bool {
    elements.iter().any(|e| {
        *e == element
            || e.components()
                .map(|(a, b)| a == element || b == element)
                .unwrap_or(false)
    })
}

/// Add an element granted by a modifier, then re-merge pairs
pub fn grant_element(elements: &[Element], element: Element) -> Vec<Element> {
    if has_element(elements, element) {
        return elements.to_vec();
    }
    let mut granted = elements.to_vec();
    granted.push(element);
    merge_combinations(&granted)
}

/// Apply a guild's rarity boost: `roll + roll * pct / 100`, capped at `max`
pub fn boost_roll(roll: u32, percent: u32, max: u32) -> u32 {
    (roll + roll * percent / 100).min(max)
}

/// Inputs for one element resolution
#[derive(Debug, Clone)]
pub struct ElementRequest<'a> {
    pub guild_name: &'a str,
    pub guild: &'a GuildEntry,
    pub rarity: Rarity,
    /// Whether the rarity roll (or a forced flag) was elemental
    pub rarity_elemental: bool,
    /// Elements picked by the caller; skips rolling when non-empty
    pub selected: &'a [Element],
    /// Caller-supplied bonus die; beats any rolled bonus
    pub damage_override: Option<&'a str>,
}

/// Elements resolved for an item, already merged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementOutcome {
    pub elements: Vec<Element>,
    pub bonus: Option<String>,
    /// Number of element table rolls made
    pub rolls: u32,
}

/// Run the element state machine for one item
pub fn resolve_elements(
    rules: &ElementRules,
    request: &ElementRequest<'_>,
    rolls: &mut impl RollSource,
) -> Result<ElementOutcome> {
    let mut outcome = ElementOutcome::default();

    if !request.selected.is_empty() {
        outcome.elements = request.selected.to_vec();
    } else if request.guild.element_roll && request.rarity_elemental {
        let (elements, bonus) = roll_once(rules, request, rolls)?;
        outcome.rolls += 1;
        outcome.elements = elements;
        outcome.bonus = bonus;
    }

    if outcome.elements.is_empty() && request.guild.guaranteed_element {
        if !rules.has_entry_for(request.rarity) {
            return Err(exhausted(request, 0));
        }
        while outcome.elements.is_empty() {
            if outcome.rolls >= MAX_ELEMENT_ATTEMPTS {
                return Err(exhausted(request, outcome.rolls));
            }
            let (elements, bonus) = roll_once(rules, request, rolls)?;
            outcome.rolls += 1;
            outcome.elements = elements;
            outcome.bonus = bonus;
        }
        log::debug!(
            "{} guaranteed element resolved after {} rolls",
            request.guild_name,
            outcome.rolls
        );
    }

    if let Some(die) = request.damage_override.filter(|d| !d.trim().is_empty()) {
        outcome.bonus = Some(normalize_bonus(die));
    }

    outcome.elements = merge_combinations(&outcome.elements);
    Ok(outcome)
}

fn exhausted(request: &ElementRequest<'_>, attempts: u32) -> LootError {
    LootError::ElementRetryExhausted {
        guild: request.guild_name.to_string(),
        rarity: request.rarity.key().to_string(),
        attempts,
    }
}

/// One roll on the element table: d100, boost, bucket, index by rarity
fn roll_once(
    rules: &ElementRules,
    request: &ElementRequest<'_>,
    rolls: &mut impl RollSource,
) -> Result<(Vec<Element>, Option<String>)> {
    let die = rules
        .table
        .max_bound()
        .ok_or(LootError::EmptyTable("element"))?;
    let raw = rolls.d(die);
    let boost = request.guild.element_boost.get(&request.rarity).copied().unwrap_or(0);
    let roll = boost_roll(raw, boost, die);

    let entry = rules
        .table
        .resolve_entry(roll)
        .and_then(|(_, by_rarity)| by_rarity.get(&request.rarity))
        .and_then(Option::as_ref);

    log::debug!("Element roll {} (boosted {}) -> {:?}", raw, roll, entry);

    match entry {
        Some(entry) => entry.parse(),
        None => Ok((Vec::new(), None)),
    }
}

/// Flavor text for each element on an item
pub fn element_info(info: &BTreeMap<Element, String>, elements: &[Element]) -> Vec<String> {
    let mut lines = Vec::new();
    for element in elements {
        match info.get(element) {
            Some(text) => lines.push(text.clone()),
            None => {
                if let Some((a, b)) = element.components() {
                    lines.extend(info.get(&a).cloned());
                    lines.extend(info.get(&b).cloned());
                }
            }
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RuleSet;
    use crate::loot::roll::{ScriptedRolls, SeededRolls};

    fn guild(element_roll: bool, guaranteed: bool) -> GuildEntry {
        let mut entry = GuildEntry {
            element_roll,
            guaranteed_element: guaranteed,
            ..GuildEntry::default()
        };
        if guaranteed {
            entry.element_boost.insert(Rarity::Rare, 10);
            entry.element_boost.insert(Rarity::Epic, 15);
            entry.element_boost.insert(Rarity::Legendary, 20);
        }
        entry
    }

    fn request<'a>(guild: &'a GuildEntry, rarity: Rarity, elemental: bool) -> ElementRequest<'a> {
        ElementRequest {
            guild_name: "test",
            guild,
            rarity,
            rarity_elemental: elemental,
            selected: &[],
            damage_override: None,
        }
    }

    #[test]
    fn test_merge_is_order_independent() {
        let a = merge_combinations(&[Element::Shock, Element::Corrosive]);
        let b = merge_combinations(&[Element::Corrosive, Element::Shock]);
        assert_eq!(a, vec![Element::CorroShock]);
        assert_eq!(a, b);
        assert_eq!(merge_combinations(&a), a);
    }

    #[test]
    fn test_singletons_never_merge() {
        assert_eq!(merge_combinations(&[Element::Cryo]), vec![Element::Cryo]);
        assert_eq!(
            merge_combinations(&[Element::Cryo, Element::Shock]),
            vec![Element::Cryo, Element::Shock]
        );
        assert!(merge_combinations(&[]).is_empty());
    }

    #[test]
    fn test_all_pairs_merge() {
        assert_eq!(
            merge_combinations(&[Element::Cryo, Element::Explosive]),
            vec![Element::ExplosivCryo]
        );
        assert_eq!(
            merge_combinations(&[Element::Radiation, Element::Incendiary]),
            vec![Element::IncendiaRadiation]
        );
        assert_eq!(
            merge_combinations(&[Element::Cryo, Element::Shock, Element::Corrosive]),
            vec![Element::Cryo, Element::CorroShock]
        );
    }

    #[test]
    fn test_entry_bonus_extraction() {
        let entry = ElementEntry::Many(vec!["corrosive".into(), "shock (+1d6)".into()]);
        let (elements, bonus) = entry.parse().unwrap();
        assert_eq!(elements, vec![Element::Corrosive, Element::Shock]);
        assert_eq!(bonus.as_deref(), Some("+1d6"));

        let single = ElementEntry::Single("cryo".into());
        assert_eq!(single.parse().unwrap(), (vec![Element::Cryo], None));

        let bad = ElementEntry::Single("plasma".into());
        assert!(matches!(bad.parse(), Err(LootError::UnknownElement(_))));
    }

    #[test]
    fn test_normalize_bonus() {
        assert_eq!(normalize_bonus("1d6"), "+1d6");
        assert_eq!(normalize_bonus("(+2d8)"), "+2d8");
        assert_eq!(normalize_bonus(" +1d4 "), "+1d4");
    }

    #[test]
    fn test_boost_is_capped() {
        assert_eq!(boost_roll(50, 10, 100), 55);
        assert_eq!(boost_roll(95, 20, 100), 100);
        assert_eq!(boost_roll(9, 15, 100), 10);
        assert_eq!(boost_roll(40, 0, 100), 40);
    }

    #[test]
    fn test_grant_is_noop_when_present() {
        assert_eq!(grant_element(&[], Element::Cryo), vec![Element::Cryo]);
        assert_eq!(grant_element(&[Element::Cryo], Element::Cryo), vec![Element::Cryo]);
        assert_eq!(
            grant_element(&[Element::CorroShock], Element::Shock),
            vec![Element::CorroShock]
        );
        assert_eq!(
            grant_element(&[Element::Corrosive], Element::Shock),
            vec![Element::CorroShock]
        );
    }

    #[test]
    fn test_ineligible_guild_rolls_nothing() {
        let rules = RuleSet::default();
        let entry = guild(false, false);
        let mut rolls = ScriptedRolls::new([100]);
        let outcome = resolve_elements(&rules.elements, &request(&entry, Rarity::Legendary, true), &mut rolls).unwrap();
        assert!(outcome.elements.is_empty());
        assert_eq!(rolls.consumed(), 0);
    }

    #[test]
    fn test_non_elemental_rarity_rolls_nothing() {
        let rules = RuleSet::default();
        let entry = guild(true, false);
        let mut rolls = ScriptedRolls::new([100]);
        let outcome = resolve_elements(&rules.elements, &request(&entry, Rarity::Rare, false), &mut rolls).unwrap();
        assert!(outcome.elements.is_empty());
    }

    #[test]
    fn test_elemental_roll_low_bucket_is_empty() {
        let rules = RuleSet::default();
        let entry = guild(true, false);
        let mut rolls = ScriptedRolls::new([10]);
        let outcome = resolve_elements(&rules.elements, &request(&entry, Rarity::Rare, true), &mut rolls).unwrap();
        assert!(outcome.elements.is_empty());
        assert_eq!(outcome.rolls, 1);
    }

    #[test]
    fn test_guaranteed_guild_retries_until_element() {
        let rules = RuleSet::default();
        let entry = guild(true, true);
        // two misses, then a hit in the top bucket
        let mut rolls = ScriptedRolls::new([5, 12, 99]);
        let outcome = resolve_elements(&rules.elements, &request(&entry, Rarity::Common, false), &mut rolls).unwrap();
        assert!(!outcome.elements.is_empty());
        assert_eq!(outcome.rolls, 3);
    }

    #[test]
    fn test_selected_elements_skip_rolling_and_merge() {
        let rules = RuleSet::default();
        let entry = guild(true, true);
        let selected = [Element::Shock, Element::Corrosive];
        let req = ElementRequest {
            selected: &selected,
            damage_override: Some("1d8"),
            ..request(&entry, Rarity::Epic, true)
        };
        let mut rolls = ScriptedRolls::new([]);
        let outcome = resolve_elements(&rules.elements, &req, &mut rolls).unwrap();
        assert_eq!(outcome.elements, vec![Element::CorroShock]);
        assert_eq!(outcome.bonus.as_deref(), Some("+1d8"));
        assert_eq!(rolls.consumed(), 0);
    }

    #[test]
    fn test_malformed_table_fails_instead_of_hanging() {
        let mut rules = RuleSet::default();
        for (_, by_rarity) in rules.elements.table.iter_mut() {
            by_rarity.insert(Rarity::Epic, None);
        }
        let entry = guild(true, true);
        let mut rolls = SeededRolls::new(1);
        let result = resolve_elements(&rules.elements, &request(&entry, Rarity::Epic, true), &mut rolls);
        assert!(matches!(result, Err(LootError::ElementRetryExhausted { .. })));
    }

    #[test]
    fn test_guaranteed_guild_always_elemental() {
        let rules = RuleSet::default();
        let entry = guild(true, true);
        let mut rolls = SeededRolls::new(2024);
        for rarity in [Rarity::Rare, Rarity::Epic, Rarity::Legendary] {
            for _ in 0..2000 {
                let outcome = resolve_elements(&rules.elements, &request(&entry, rarity, false), &mut rolls).unwrap();
                assert!(!outcome.elements.is_empty());
            }
        }
    }

    #[test]
    fn test_element_info_falls_back_to_components() {
        let mut info = BTreeMap::new();
        info.insert(Element::Corrosive, "melts".to_string());
        info.insert(Element::Shock, "zaps".to_string());
        assert_eq!(element_info(&info, &[Element::CorroShock]), vec!["melts", "zaps"]);
        assert!(element_info(&info, &[Element::Cryo]).is_empty());
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("Incendiation".parse::<Element>().unwrap(), Element::IncendiaRadiation);
        assert_eq!("crysplosive".parse::<Element>().unwrap(), Element::ExplosivCryo);
        assert_eq!(Element::CorroShock.components(), Some((Element::Corrosive, Element::Shock)));
        assert_eq!(Element::Cryo.components(), None);
    }
}
