//! Prefixes and red text
//!
//! Both are named modifiers picked from a roll-range table. A modifier can
//! reach into the rest of the item: grant an element or add stat mods.

use std::convert::Infallible;
use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::element::Element;
use super::roll::RollSource;
use crate::items::item::Rarity;
use crate::tables::RangeTable;

/// Info text marker for modifiers that add an element
pub const ELEMENT_GRANT_MARKER: &str = "Element type.";

/// Flat bonuses to the four stat mods
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatMods {
    pub acc: i32,
    pub dmg: i32,
    pub spd: i32,
    pub mst: i32,
}

impl StatMods {
    pub fn is_zero(&self) -> bool {
        *self == StatMods::default()
    }

    /// Sum the `"+N STAT Mod"` terms of a guild mod such as
    /// `"+2 DMG Mod, -1 ACC Mod"`; other text is ignored
    pub fn parse_guild_mod(text: &str) -> Self {
        let mut mods = StatMods::default();
        for term in text.split(',') {
            let words: Vec<&str> = term.split_whitespace().collect();
            let [value, stat, suffix] = words.as_slice() else {
                continue;
            };
            if !suffix.eq_ignore_ascii_case("mod") {
                continue;
            }
            let Ok(value) = value.parse::<i32>() else {
                continue;
            };
            match stat.to_ascii_uppercase().as_str() {
                "ACC" => mods.acc += value,
                "DMG" => mods.dmg += value,
                "SPD" => mods.spd += value,
                "MST" => mods.mst += value,
                _ => {}
            }
        }
        mods
    }
}

impl Add for StatMods {
    type Output = StatMods;

    fn add(self, other: StatMods) -> StatMods {
        StatMods {
            acc: self.acc + other.acc,
            dmg: self.dmg + other.dmg,
            spd: self.spd + other.spd,
            mst: self.mst + other.mst,
        }
    }
}

impl AddAssign for StatMods {
    fn add_assign(&mut self, other: StatMods) {
        *self = *self + other;
    }
}

impl fmt::Display for StatMods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ACC {:+} DMG {:+} SPD {:+} MST {:+}",
            self.acc, self.dmg, self.spd, self.mst
        )
    }
}

/// A named prefix or red text entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    pub name: String,
    #[serde(default)]
    pub info: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grants_element: Option<Element>,
    #[serde(default, skip_serializing_if = "StatMods::is_zero")]
    pub stat_bonus: StatMods,
}

impl Modifier {
    pub fn new(name: impl Into<String>, info: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            info: info.into(),
            ..Self::default()
        }
    }

    /// Blank table entries mean "no modifier"
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
    }

    /// The element this modifier adds, from the structured field or the info text
    pub fn granted_element(&self) -> Option<Element> {
        self.grants_element.or_else(|| parse_element_grant(&self.info))
    }
}

/// Prefix a base name, skipping blank prefixes
pub fn compose_name(prefix: Option<&str>, base: &str) -> String {
    match prefix.map(str::trim).filter(|p| !p.is_empty()) {
        Some(prefix) => format!("{prefix} {base}"),
        None => base.to_string(),
    }
}

/// Best-effort element grant from text like `"Cryo Element type. ..."`
pub fn parse_element_grant(info: &str) -> Option<Element> {
    if !info.contains(ELEMENT_GRANT_MARKER) {
        return None;
    }
    info.split(|c: char| !c.is_ascii_alphabetic())
        .filter(|word| !word.is_empty())
        .find_map(|word| word.parse::<Element>().ok())
}

/// Which rarities a random modifier roll applies to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RarityGate {
    #[default]
    All,
    EpicsAndUp,
    LegendariesOnly,
}

impl RarityGate {
    pub fn allows(&self, rarity: Rarity) -> bool {
        match self {
            RarityGate::All => true,
            RarityGate::EpicsAndUp => rarity >= Rarity::Epic,
            RarityGate::LegendariesOnly => rarity == Rarity::Legendary,
        }
    }
}

/// How to pick a modifier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModifierChoice {
    #[default]
    None,
    Random(RarityGate),
    /// A table key, or a roll value inside one
    Explicit(String),
}

impl FromStr for ModifierChoice {
    type Err = Infallible;

    /// Accepts `none`, `random`, `random (epics+)`, `random (legendaries)`,
    /// a table key, or the `"[key] Name"` form shown in pickers
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lower = trimmed.to_ascii_lowercase();
        let choice = match lower.as_str() {
            "" | "none" => ModifierChoice::None,
            "random" | "random (all rarities)" | "random (all)" => {
                ModifierChoice::Random(RarityGate::All)
            }
            "random (epics+)" | "random (epic+)" => ModifierChoice::Random(RarityGate::EpicsAndUp),
            "random (legendaries)" | "random (legendary)" => {
                ModifierChoice::Random(RarityGate::LegendariesOnly)
            }
            _ => {
                let key = trimmed
                    .strip_prefix('[')
                    .and_then(|rest| rest.split_once(']'))
                    .map(|(key, _)| key.trim())
                    .unwrap_or(trimmed);
                ModifierChoice::Explicit(key.to_string())
            }
        };
        Ok(choice)
    }
}

/// Pick a modifier from `table` for an item of `rarity`
pub fn resolve_modifier(
    choice: &ModifierChoice,
    table: &RangeTable<Modifier>,
    rarity: Rarity,
    rolls: &mut impl RollSource,
) -> Option<Modifier> {
    let picked = match choice {
        ModifierChoice::None => None,
        ModifierChoice::Random(gate) => {
            if !gate.allows(rarity) {
                return None;
            }
            let die = table.max_bound()?;
            let roll = rolls.d(die);
            log::debug!("Modifier roll {} on d{}", roll, die);
            table.resolve_entry(roll).map(|(_, m)| m)
        }
        ModifierChoice::Explicit(key) => table.get(key).or_else(|| {
            key.trim()
                .parse::<u32>()
                .ok()
                .and_then(|roll| table.resolve_entry(roll))
                .map(|(_, m)| m)
        }),
    };

    match picked {
        Some(modifier) if !modifier.is_blank() => Some(modifier.clone()),
        Some(_) => None,
        None => {
            if let ModifierChoice::Explicit(key) = choice {
                log::warn!("No modifier for key {:?}", key);
            }
            None
        }
    }
}

/// Roll a modifier from a fixed die value, used where a rule forces a roll
pub fn modifier_at(table: &RangeTable<Modifier>, roll: u32) -> Option<Modifier> {
    table
        .resolve_entry(roll)
        .map(|(_, m)| m)
        .filter(|m| !m.is_blank())
        .cloned()
}
