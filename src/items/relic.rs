//! Relic generation

use std::fmt;

use serde::Serialize;

use super::art::{pick_art, ArtRequest, ArtSampler};
use super::item::{write_wrapped, ItemCategory, Rarity};
use crate::data::rules::RelicEntry;
use crate::data::RuleSet;
use crate::error::{LootError, Result};
use crate::loot::text::lexicon_name;
use crate::loot::{explicit, Element, RollSource};
use crate::tables::RangeKey;

#[derive(Debug, Clone, Default)]
pub struct RelicOptions {
    /// Relic table key; beats the filters
    pub id: Option<String>,
    /// Narrows the table when some relic carries it; always set on the record
    pub rarity: Option<Rarity>,
    /// Narrows the table when some relic carries it (`"Amulet"`); any text
    /// is kept on the record
    pub kind: Option<String>,
    pub name: Option<String>,
    pub effect: Option<String>,
    pub class_effect: Option<String>,
    pub class: Option<String>,
    pub art: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Relic {
    pub name: String,
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub rarity: Rarity,
    pub effect: String,
    pub class: String,
    pub class_effect: String,
    pub cost: u32,
    pub elements: Vec<Element>,
    pub art: Option<String>,
}

/// Table entries matching the rarity and type filters, `None` when no
/// filter applies
///
/// A rarity or type that no relic carries is ignored rather than matching
/// nothing.
fn filtered<'a>(
    rules: &'a RuleSet,
    rarity: Option<Rarity>,
    kind: Option<&str>,
) -> Option<Vec<(&'a RangeKey, &'a RelicEntry)>> {
    let relics = &rules.relics.relics;
    let rarity = rarity.filter(|r| relics.values().any(|entry| entry.rarity == *r));
    let kind = kind.filter(|k| relics.values().any(|entry| entry.kind.eq_ignore_ascii_case(k)));
    if rarity.is_none() && kind.is_none() {
        return None;
    }
    let matches = relics
        .iter()
        .filter(|(_, entry)| rarity.map_or(true, |r| entry.rarity == r))
        .filter(|(_, entry)| kind.map_or(true, |k| entry.kind.eq_ignore_ascii_case(k)))
        .collect();
    Some(matches)
}

pub fn generate_relic(
    rules: &RuleSet,
    options: &RelicOptions,
    rolls: &mut impl RollSource,
    art: &mut dyn ArtSampler,
) -> Result<Relic> {
    let relics = &rules.relics;
    let kind_filter = explicit(options.kind.as_deref());

    let (id, entry) = match explicit(options.id.as_deref()) {
        Some(id) => relics.relics.get_entry(id).ok_or_else(|| LootError::MissingEntry {
            table: "relic",
            key: id.to_string(),
        })?,
        None => {
            let candidates = filtered(rules, options.rarity, kind_filter);
            if let Some(candidates) = candidates.as_ref().filter(|c| !c.is_empty()) {
                candidates[rolls.pick(candidates.len())]
            } else {
                if candidates.is_some() {
                    log::warn!("No relic matches the filters, rolling on the full table");
                }
                let die = relics.relics.max_bound().ok_or(LootError::EmptyTable("relic"))?;
                let roll = rolls.d(die);
                relics.relics.resolve_entry(roll).ok_or_else(|| LootError::MissingEntry {
                    table: "relic",
                    key: roll.to_string(),
                })?
            }
        }
    };

    let class = match explicit(options.class.as_deref()) {
        Some(class) => class.to_string(),
        None => {
            let die = relics.classes.max_bound().ok_or(LootError::EmptyTable("class"))?;
            let roll = rolls.d(die);
            relics
                .classes
                .resolve_entry(roll)
                .map(|(_, c)| c.clone())
                .ok_or_else(|| LootError::MissingEntry {
                    table: "class",
                    key: roll.to_string(),
                })?
        }
    };

    let name = match explicit(options.name.as_deref()) {
        Some(name) => name.to_string(),
        None => lexicon_name(&relics.lexicon, 1, rolls),
    };

    let rarity = options.rarity.unwrap_or(entry.rarity);
    let kind = kind_filter.map_or_else(|| entry.kind.clone(), str::to_string);

    let cost = relics.cost.get(&rarity).copied().ok_or_else(|| LootError::MissingEntry {
        table: "relic cost",
        key: rarity.key().to_string(),
    })?;

    let art = pick_art(
        options.art.as_deref(),
        art,
        ArtRequest {
            category: ItemCategory::Relic,
            guild: None,
            kind: Some(kind.as_str()),
        },
    );

    let relic = Relic {
        name,
        id: id.to_string(),
        kind,
        rarity,
        effect: explicit(options.effect.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| entry.effect.clone()),
        class,
        class_effect: explicit(options.class_effect.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| entry.class_effect.clone()),
        cost,
        elements: Vec::new(),
        art,
    };

    log::info!("Generated {} {} relic ({})", relic.rarity.name(), relic.kind, relic.name);
    Ok(relic)
}

impl fmt::Display for Relic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{} {} Relic", self.rarity.name(), self.kind)?;
        write_wrapped(f, "Effect", &self.effect)?;
        write_wrapped(f, &self.class, &self.class_effect)?;
        writeln!(f, "Cost: ${}", self.cost)
    }
}
