//! Melee weapon generation
//!
//! Shares the gun rarity grid, cost table and item levels, but rolls its
//! guild uniformly and uses its own d20 prefix table.

use std::fmt;

use serde::Serialize;

use super::art::{pick_art, ArtRequest, ArtSampler};
use super::item::{element_list, write_wrapped, ItemCategory, Rarity};
use crate::data::RuleSet;
use crate::error::{LootError, Result};
use crate::loot::element::{element_info, grant_element, merge_combinations};
use crate::loot::modifier::modifier_at;
use crate::loot::text::{lexicon_name, title_case};
use crate::loot::{
    compose_name, explicit, resolve_elements, resolve_modifier, resolve_rarity, Element,
    ElementRequest, Modifier, ModifierChoice, RollSource, StatMods,
};

/// Prefix roll forced on common melee weapons; the blank entry
const COMMON_PREFIX_ROLL: u32 = 1;

const MAX_LEVEL: u32 = 30;

#[derive(Debug, Clone, Default)]
pub struct MeleeOptions {
    pub name: Option<String>,
    pub item_level: Option<String>,
    pub guild: Option<String>,
    pub rarity: Option<Rarity>,
    pub force_element: bool,
    pub elements: Vec<Element>,
    pub element_damage: Option<String>,
    pub prefix: ModifierChoice,
    /// Red text written by the caller; may still grant an element
    pub red_text: Option<Modifier>,
    pub art: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeleeWeapon {
    pub name: String,
    pub item_level: String,
    pub guild: String,
    pub rarity: Rarity,
    pub damage: String,
    pub cost: u32,
    pub guild_mod: Option<String>,
    pub guild_info: Option<String>,
    pub elements: Vec<Element>,
    pub element_bonus: Option<String>,
    pub element_info: Vec<String>,
    pub prefix: Option<Modifier>,
    pub red_text: Option<Modifier>,
    pub stat_mods: StatMods,
    pub art: Option<String>,
}

pub fn generate_melee(
    rules: &RuleSet,
    options: &MeleeOptions,
    rolls: &mut impl RollSource,
    art: &mut dyn ArtSampler,
) -> Result<MeleeWeapon> {
    let melee = &rules.melee;

    let item_level = match explicit(options.item_level.as_deref()) {
        Some(level) => rules.guns.item_level(level).ok_or_else(|| LootError::MissingEntry {
            table: "item level",
            key: level.to_string(),
        })?,
        None => {
            let roll = rolls.d(MAX_LEVEL);
            rules
                .guns
                .item_levels
                .iter()
                .rev()
                .find(|level| level.contains(roll))
                .ok_or_else(|| LootError::MissingEntry {
                    table: "item level",
                    key: roll.to_string(),
                })?
        }
    };

    let base_name = match explicit(options.name.as_deref()) {
        Some(name) => name.to_string(),
        None => {
            let words = rolls.d(2);
            lexicon_name(&rules.guns.lexicon, words, rolls)
        }
    };

    let (guild_name, guild) = match explicit(options.guild.as_deref()) {
        Some(name) => melee.guild(name).ok_or_else(|| LootError::MissingEntry {
            table: "melee guild",
            key: name.to_string(),
        })?,
        None => melee
            .guilds
            .iter()
            .nth(rolls.pick(melee.guilds.len()))
            .map(|(name, entry)| (name.as_str(), entry))
            .ok_or(LootError::EmptyTable("melee guild"))?,
    };

    let rarity_roll = resolve_rarity(&rules.guns.rarity, options.rarity, options.force_element, rolls)?;
    let rarity = rarity_roll.rarity;

    let cost = rules.guns.cost.get(&rarity).copied().ok_or_else(|| LootError::MissingEntry {
        table: "gun cost",
        key: rarity.key().to_string(),
    })?;
    let guild_mod = guild.tier(rarity).map(str::to_string);

    let outcome = resolve_elements(
        &rules.elements,
        &ElementRequest {
            guild_name,
            guild,
            rarity,
            rarity_elemental: rarity_roll.elemental,
            selected: &options.elements,
            damage_override: options.element_damage.as_deref(),
        },
        rolls,
    )?;
    let mut elements = outcome.elements;

    let prefix = match (&options.prefix, rarity) {
        (ModifierChoice::Random(_), Rarity::Common) => {
            modifier_at(&melee.prefixes, COMMON_PREFIX_ROLL)
        }
        (choice, _) => resolve_modifier(choice, &melee.prefixes, rarity, rolls),
    };

    let red_text = options.red_text.clone().filter(|r| !r.is_blank());
    if let Some(granted) = red_text.as_ref().and_then(Modifier::granted_element) {
        elements = grant_element(&elements, granted);
    }
    let elements = merge_combinations(&elements);

    let damage = melee
        .damage
        .get(item_level.as_str())
        .cloned()
        .ok_or_else(|| LootError::MissingEntry {
            table: "melee damage",
            key: item_level.to_string(),
        })?;

    let mut stat_mods = guild_mod
        .as_deref()
        .map(StatMods::parse_guild_mod)
        .unwrap_or_default();
    for modifier in prefix.iter().chain(red_text.iter()) {
        stat_mods += modifier.stat_bonus;
    }

    let art = pick_art(
        options.art.as_deref(),
        art,
        ArtRequest {
            category: ItemCategory::Melee,
            guild: Some(guild_name),
            kind: None,
        },
    );

    let weapon = MeleeWeapon {
        name: compose_name(prefix.as_ref().map(|p| p.name.as_str()), &base_name),
        item_level: item_level.to_string(),
        guild: guild_name.to_string(),
        rarity,
        damage,
        cost,
        guild_mod,
        guild_info: guild.info.clone(),
        element_info: element_info(&rules.elements.info, &elements),
        elements,
        element_bonus: outcome.bonus,
        prefix,
        red_text,
        stat_mods,
        art,
    };

    log::info!(
        "Generated {} {} melee weapon ({}, level {})",
        weapon.rarity.name(),
        weapon.guild,
        weapon.name,
        weapon.item_level
    );
    Ok(weapon)
}

impl fmt::Display for MeleeWeapon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(
            f,
            "{} Melee Weapon | {} | Level {}",
            self.rarity.name(),
            title_case(&self.guild),
            self.item_level
        )?;
        writeln!(f, "Damage: {}", self.damage)?;
        match &self.element_bonus {
            Some(bonus) => writeln!(f, "Elements: {} ({})", element_list(&self.elements), bonus)?,
            None => writeln!(f, "Elements: {}", element_list(&self.elements))?,
        }
        if let Some(guild_mod) = &self.guild_mod {
            write_wrapped(f, "Guild", guild_mod)?;
        }
        if let Some(prefix) = &self.prefix {
            write_wrapped(f, &prefix.name, &prefix.info)?;
        }
        if let Some(red_text) = &self.red_text {
            write_wrapped(f, &red_text.name, &red_text.info)?;
        }
        writeln!(f, "Cost: ${}", self.cost)
    }
}
