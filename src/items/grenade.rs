//! Grenade generation

use std::fmt;

use serde::Serialize;

use super::art::{pick_art, ArtRequest, ArtSampler};
use super::item::{element_list, write_wrapped, ItemCategory};
use crate::data::RuleSet;
use crate::error::{LootError, Result};
use crate::loot::text::lexicon_name;
use crate::loot::{explicit, Element, RollSource};

#[derive(Debug, Clone, Default)]
pub struct GrenadeOptions {
    pub name: Option<String>,
    pub guild: Option<String>,
    pub tier: Option<String>,
    pub damage: Option<String>,
    pub kind: Option<String>,
    pub effect: Option<String>,
    /// Element substituted into elemental guild effects
    pub element: Option<Element>,
    pub art: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Grenade {
    pub name: String,
    pub guild: String,
    pub tier: String,
    pub damage: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub effect: String,
    pub cost: Option<u32>,
    pub elements: Vec<Element>,
    pub art: Option<String>,
}

pub fn generate_grenade(
    rules: &RuleSet,
    options: &GrenadeOptions,
    rolls: &mut impl RollSource,
    art: &mut dyn ArtSampler,
) -> Result<Grenade> {
    let grenades = &rules.grenades;

    let guild = match explicit(options.guild.as_deref()) {
        Some(guild) => guild.to_string(),
        None => {
            let die = grenades.guilds.max_bound().ok_or(LootError::EmptyTable("grenade guild"))?;
            let roll = rolls.d(die);
            grenades
                .guilds
                .resolve_entry(roll)
                .map(|(_, g)| g.clone())
                .ok_or_else(|| LootError::MissingEntry {
                    table: "grenade guild",
                    key: roll.to_string(),
                })?
        }
    };

    let (guild, tiers) = grenades
        .tiers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(&guild))
        .ok_or_else(|| LootError::MissingEntry {
            table: "grenade tiers",
            key: guild.clone(),
        })?;

    let (tier_key, tier) = match explicit(options.tier.as_deref()) {
        Some(key) => tiers.get_entry(key).ok_or_else(|| LootError::MissingEntry {
            table: "grenade tier",
            key: key.to_string(),
        })?,
        None => {
            let die = tiers.max_bound().ok_or(LootError::EmptyTable("grenade tier"))?;
            let roll = rolls.d(die);
            tiers.resolve_entry(roll).ok_or_else(|| LootError::MissingEntry {
                table: "grenade tier",
                key: roll.to_string(),
            })?
        }
    };

    let name = match explicit(options.name.as_deref()) {
        Some(name) => name.to_string(),
        None => lexicon_name(&grenades.lexicon, 1, rolls),
    };

    let mut elements = Vec::new();
    let effect = match explicit(options.effect.as_deref()) {
        Some(effect) => effect.to_string(),
        None if grenades.is_elemental_guild(guild)
            && tier.effect.contains(&grenades.element_placeholder) =>
        {
            let element = options
                .element
                .unwrap_or_else(|| Element::BASE[rolls.pick(Element::BASE.len())]);
            log::debug!("{} grenade deals {} damage", guild, element);
            elements.push(element);
            tier.effect.replace(&grenades.element_placeholder, element.name())
        }
        None => tier.effect.clone(),
    };

    let art = pick_art(
        options.art.as_deref(),
        art,
        ArtRequest {
            category: ItemCategory::Grenade,
            guild: Some(guild.as_str()),
            kind: Some(tier.kind.as_str()),
        },
    );

    let grenade = Grenade {
        name,
        guild: guild.clone(),
        tier: tier_key.to_string(),
        damage: explicit(options.damage.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| tier.damage.clone()),
        kind: explicit(options.kind.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| tier.kind.clone()),
        effect,
        cost: tier.cost,
        elements,
        art,
    };

    log::info!("Generated tier {} {} grenade ({})", grenade.tier, grenade.guild, grenade.name);
    Ok(grenade)
}

impl fmt::Display for Grenade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{} {} | Tier {}", self.guild, self.kind, self.tier)?;
        writeln!(f, "Damage: {}", self.damage)?;
        if !self.elements.is_empty() {
            writeln!(f, "Elements: {}", element_list(&self.elements))?;
        }
        write_wrapped(f, "Effect", &self.effect)?;
        if let Some(cost) = self.cost {
            writeln!(f, "Cost: ${}", cost)?;
        }
        Ok(())
    }
}
