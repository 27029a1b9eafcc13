//! Shield generation

use std::fmt;

use serde::Serialize;

use super::art::{pick_art, ArtRequest, ArtSampler};
use super::item::{write_wrapped, ItemCategory};
use crate::data::RuleSet;
use crate::error::{LootError, Result};
use crate::loot::text::lexicon_name;
use crate::loot::{explicit, Element, RollSource};

#[derive(Debug, Clone, Default)]
pub struct ShieldOptions {
    pub name: Option<String>,
    pub guild: Option<String>,
    /// Tier key, `"1"` through `"5"`
    pub tier: Option<String>,
    pub capacity: Option<u32>,
    pub recharge: Option<u32>,
    pub effect: Option<String>,
    pub art: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Shield {
    pub name: String,
    pub guild: String,
    pub tier: String,
    pub capacity: u32,
    pub recharge: u32,
    pub effect: String,
    pub cost: Option<u32>,
    pub elements: Vec<Element>,
    pub art: Option<String>,
}

pub fn generate_shield(
    rules: &RuleSet,
    options: &ShieldOptions,
    rolls: &mut impl RollSource,
    art: &mut dyn ArtSampler,
) -> Result<Shield> {
    let shields = &rules.shields;

    let guild = match explicit(options.guild.as_deref()) {
        Some(guild) => guild.to_string(),
        None => {
            let die = shields.guilds.max_bound().ok_or(LootError::EmptyTable("shield guild"))?;
            let roll = rolls.d(die);
            shields
                .guilds
                .resolve_entry(roll)
                .map(|(_, g)| g.clone())
                .ok_or_else(|| LootError::MissingEntry {
                    table: "shield guild",
                    key: roll.to_string(),
                })?
        }
    };

    let (guild, tiers) = shields
        .tiers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(&guild))
        .ok_or_else(|| LootError::MissingEntry {
            table: "shield tiers",
            key: guild.clone(),
        })?;

    let (tier_key, tier) = match explicit(options.tier.as_deref()) {
        Some(key) => tiers.get_entry(key).ok_or_else(|| LootError::MissingEntry {
            table: "shield tier",
            key: key.to_string(),
        })?,
        None => {
            let die = tiers.max_bound().ok_or(LootError::EmptyTable("shield tier"))?;
            let roll = rolls.d(die);
            tiers.resolve_entry(roll).ok_or_else(|| LootError::MissingEntry {
                table: "shield tier",
                key: roll.to_string(),
            })?
        }
    };

    let name = match explicit(options.name.as_deref()) {
        Some(name) => name.to_string(),
        None => lexicon_name(&shields.lexicon, 1, rolls),
    };

    let effect = explicit(options.effect.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| tier.effect.clone());

    let art = pick_art(
        options.art.as_deref(),
        art,
        ArtRequest {
            category: ItemCategory::Shield,
            guild: Some(guild.as_str()),
            kind: None,
        },
    );

    let shield = Shield {
        name,
        guild: guild.clone(),
        tier: tier_key.to_string(),
        capacity: options.capacity.unwrap_or(tier.capacity),
        recharge: options.recharge.unwrap_or(tier.recharge),
        effect,
        cost: tier.cost,
        elements: Vec::new(),
        art,
    };

    log::info!("Generated tier {} {} shield ({})", shield.tier, shield.guild, shield.name);
    Ok(shield)
}

impl fmt::Display for Shield {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{} Shield | Tier {}", self.guild, self.tier)?;
        writeln!(f, "Capacity: {}  Recharge: {}", self.capacity, self.recharge)?;
        write_wrapped(f, "Effect", &self.effect)?;
        if let Some(cost) = self.cost {
            writeln!(f, "Cost: ${}", cost)?;
        }
        Ok(())
    }
}
