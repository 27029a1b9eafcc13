//! Gun generation

use std::fmt;

use serde::Serialize;

use super::art::{pick_art, ArtRequest, ArtSampler};
use super::item::{element_list, write_wrapped, ItemCategory, Rarity};
use crate::data::RuleSet;
use crate::error::{LootError, Result};
use crate::loot::element::{element_info, grant_element, merge_combinations};
use crate::loot::text::{lexicon_name, title_case};
use crate::loot::{
    compose_name, explicit, resolve_elements, resolve_modifier, resolve_rarity, Element,
    ElementRequest, Modifier, ModifierChoice, RollSource, StatMods,
};

/// Highest character level; the item level die
const MAX_LEVEL: u32 = 30;

/// Caller overrides for a gun; unset fields are rolled
#[derive(Debug, Clone, Default)]
pub struct GunOptions {
    pub name: Option<String>,
    /// Item level bracket (`"7-12"`) or a level inside one (`"9"`)
    pub item_level: Option<String>,
    /// Type name (`"pistol"`) or type table key (`"1"`)
    pub gun_type: Option<String>,
    pub guild: Option<String>,
    pub rarity: Option<Rarity>,
    /// Stat table profile; defaults to the table's default balance
    pub balance: Option<String>,
    /// Treat the rarity as elemental regardless of the roll
    pub force_element: bool,
    pub elements: Vec<Element>,
    /// Bonus element damage die, e.g. `"1d6"`
    pub element_damage: Option<String>,
    pub prefix: ModifierChoice,
    pub red_text: ModifierChoice,
    pub art: Option<String>,
}

/// One accuracy band of a gun
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccuracyBand {
    pub roll: String,
    pub hits: u32,
    pub crits: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Gun {
    pub name: String,
    pub item_level: String,
    pub gun_type: String,
    pub guild: String,
    pub rarity: Rarity,
    pub balance: String,
    pub damage: String,
    pub range: u32,
    pub accuracy: Vec<AccuracyBand>,
    pub guild_mod: Option<String>,
    pub guild_info: Option<String>,
    pub cost: u32,
    pub elements: Vec<Element>,
    pub element_bonus: Option<String>,
    pub element_info: Vec<String>,
    pub prefix: Option<Modifier>,
    pub red_text: Option<Modifier>,
    pub stat_mods: StatMods,
    pub art: Option<String>,
}

impl Gun {
    /// Type as shown on cards, e.g. `"Submachine Gun"`
    pub fn type_name(&self) -> String {
        title_case(&self.gun_type)
    }
}

pub fn generate_gun(
    rules: &RuleSet,
    options: &GunOptions,
    rolls: &mut impl RollSource,
    art: &mut dyn ArtSampler,
) -> Result<Gun> {
    let guns = &rules.guns;

    let item_level = match explicit(options.item_level.as_deref()) {
        Some(level) => guns.item_level(level).ok_or_else(|| LootError::MissingEntry {
            table: "item level",
            key: level.to_string(),
        })?,
        None => {
            let roll = rolls.d(MAX_LEVEL);
            guns.item_levels
                .iter()
                .rev()
                .find(|level| level.contains(roll))
                .ok_or_else(|| LootError::MissingEntry {
                    table: "item level",
                    key: roll.to_string(),
                })?
        }
    };
    log::debug!("Gun item level {}", item_level);

    let base_name = match explicit(options.name.as_deref()) {
        Some(name) => name.to_string(),
        None => {
            let words = rolls.d(2);
            lexicon_name(&guns.lexicon, words, rolls)
        }
    };

    let gun_type = match explicit(options.gun_type.as_deref()) {
        Some(key) => guns.gun_type(key).ok_or_else(|| LootError::MissingEntry {
            table: "gun type",
            key: key.to_string(),
        })?,
        None => {
            let die = guns.types.max_bound().ok_or(LootError::EmptyTable("gun type"))?;
            let roll = rolls.d(die);
            guns.types.resolve_entry(roll).ok_or_else(|| LootError::MissingEntry {
                table: "gun type",
                key: roll.to_string(),
            })?
        }
    };
    let (_, type_entry) = gun_type;

    let guild_key = match explicit(options.guild.as_deref()) {
        Some(guild) => guild.to_string(),
        None => {
            let die = type_entry.guild.max_bound().ok_or(LootError::EmptyTable("gun guild"))?;
            let roll = rolls.d(die);
            type_entry
                .guild
                .resolve_entry(roll)
                .map(|(_, guild)| guild.clone())
                .ok_or_else(|| LootError::MissingEntry {
                    table: "gun guild",
                    key: roll.to_string(),
                })?
        }
    };
    let (guild_name, guild) = guns.guild(&guild_key).ok_or_else(|| LootError::MissingEntry {
        table: "guild",
        key: guild_key.clone(),
    })?;

    let balance = explicit(options.balance.as_deref())
        .unwrap_or(guns.default_balance.as_str())
        .to_string();
    let stats = guns
        .stats(&balance, &type_entry.name, item_level)
        .ok_or_else(|| LootError::MissingEntry {
            table: "gun stats",
            key: format!("{}/{}/{}", balance, type_entry.name, item_level),
        })?;

    let rarity_roll = resolve_rarity(&guns.rarity, options.rarity, options.force_element, rolls)?;
    let rarity = rarity_roll.rarity;

    let cost = guns.cost.get(&rarity).copied().ok_or_else(|| LootError::MissingEntry {
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

    let prefix = resolve_modifier(&options.prefix, &guns.prefixes, rarity, rolls);
    let red_text = resolve_modifier(&options.red_text, &guns.red_text, rarity, rolls);
    if let Some(granted) = red_text.as_ref().and_then(Modifier::granted_element) {
        elements = grant_element(&elements, granted);
    }
    let elements = merge_combinations(&elements);

    let mut stat_mods = guild_mod
        .as_deref()
        .map(StatMods::parse_guild_mod)
        .unwrap_or_default();
    for modifier in prefix.iter().chain(red_text.iter()) {
        stat_mods += modifier.stat_bonus;
    }

    let name = compose_name(prefix.as_ref().map(|p| p.name.as_str()), &base_name);

    let accuracy = stats
        .accuracy_bands()
        .into_iter()
        .map(|(roll, acc)| AccuracyBand {
            roll: roll.to_string(),
            hits: acc.hits,
            crits: acc.crits,
        })
        .collect();

    let art = pick_art(
        options.art.as_deref(),
        art,
        ArtRequest {
            category: ItemCategory::Gun,
            guild: Some(guild_name),
            kind: Some(type_entry.name.as_str()),
        },
    );

    let gun = Gun {
        name,
        item_level: item_level.to_string(),
        gun_type: type_entry.name.clone(),
        guild: guild_name.to_string(),
        rarity,
        balance,
        damage: stats.damage.clone(),
        range: stats.range,
        accuracy,
        guild_mod,
        guild_info: guild.info.clone(),
        cost,
        element_info: element_info(&rules.elements.info, &elements),
        elements,
        element_bonus: outcome.bonus,
        prefix,
        red_text,
        stat_mods,
        art,
    };

    log::info!(
        "Generated {} {} {} ({}, level {})",
        gun.rarity.name(),
        gun.guild,
        gun.gun_type,
        gun.name,
        gun.item_level
    );
    Ok(gun)
}

impl fmt::Display for Gun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(
            f,
            "{} {} | {} | Level {}",
            self.rarity.name(),
            self.type_name(),
            title_case(&self.guild),
            self.item_level
        )?;
        writeln!(f, "Damage: {}  Range: {}", self.damage, self.range)?;
        for band in &self.accuracy {
            writeln!(f, "  {:>5}: {} hits, {} crits", band.roll, band.hits, band.crits)?;
        }
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
        if !self.stat_mods.is_zero() {
            writeln!(f, "Mods: {}", self.stat_mods)?;
        }
        writeln!(f, "Cost: ${}", self.cost)
    }
}
