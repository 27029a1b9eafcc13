//! Potion generation

use std::fmt;

use serde::Serialize;

use super::art::{pick_art, ArtRequest, ArtSampler};
use super::item::{write_wrapped, ItemCategory};
use crate::data::RuleSet;
use crate::error::{LootError, Result};
use crate::loot::{explicit, Element, RollSource};

#[derive(Debug, Clone, Default)]
pub struct PotionOptions {
    /// Potion table key (`"26-30"`) or a roll inside one
    pub id: Option<String>,
    pub art: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Potion {
    pub name: String,
    pub id: String,
    pub effect: String,
    pub cost: Option<u32>,
    pub tina_potion: bool,
    /// Final roll on the Tina table, bonus included
    pub tina_roll: Option<u32>,
    pub elements: Vec<Element>,
    pub art: Option<String>,
}

pub fn generate_potion(
    rules: &RuleSet,
    options: &PotionOptions,
    rolls: &mut impl RollSource,
    art: &mut dyn ArtSampler,
) -> Result<Potion> {
    let potions = &rules.potions;

    let (id, entry) = match explicit(options.id.as_deref()) {
        Some(id) => potions
            .potions
            .get_entry(id)
            .or_else(|| {
                id.parse::<u32>()
                    .ok()
                    .and_then(|roll| potions.potions.resolve_entry(roll))
            })
            .ok_or_else(|| LootError::MissingEntry {
                table: "potion",
                key: id.to_string(),
            })?,
        None => potions
            .potions
            .nth(rolls.pick(potions.potions.len()))
            .ok_or(LootError::EmptyTable("potion"))?,
    };

    let mut name = entry.name.clone();
    let mut effect = entry.info.clone();
    let mut tina_roll = None;

    if let Some(bonus) = potions.tina_ranges.get(id.as_str()) {
        let die = potions
            .tina_potions
            .max_bound()
            .ok_or(LootError::EmptyTable("tina potion"))?;
        let roll = (rolls.d(die) + bonus).min(die);
        let (_, tina) = potions
            .tina_potions
            .resolve_entry(roll)
            .ok_or_else(|| LootError::MissingEntry {
                table: "tina potion",
                key: roll.to_string(),
            })?;
        log::debug!("Tina potion roll {} (+{})", roll, bonus);
        name = tina.name.clone();
        effect = tina.info.clone();
        tina_roll = Some(roll);
    }

    let art = pick_art(
        options.art.as_deref(),
        art,
        ArtRequest {
            category: ItemCategory::Potion,
            guild: None,
            kind: None,
        },
    );

    let potion = Potion {
        name,
        id: id.to_string(),
        effect,
        cost: entry.cost,
        tina_potion: tina_roll.is_some(),
        tina_roll,
        elements: Vec::new(),
        art,
    };

    log::info!("Generated potion {} ({})", potion.name, potion.id);
    Ok(potion)
}

impl fmt::Display for Potion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        if self.tina_potion {
            writeln!(f, "Tina Potion")?;
        } else {
            writeln!(f, "Potion")?;
        }
        write_wrapped(f, "Effect", &self.effect)?;
        if let Some(cost) = self.cost {
            writeln!(f, "Cost: ${}", cost)?;
        }
        Ok(())
    }
}
