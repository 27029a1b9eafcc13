//! Typed rule tables
//!
//! One struct per rule file. Everything is deserialized once and shared
//! read-only by the generators.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::items::item::Rarity;
use crate::loot::element::{Element, ElementEntry};
use crate::loot::modifier::Modifier;
use crate::loot::rarity::RarityGrid;
use crate::tables::{RangeKey, RangeTable};

/// A guild (manufacturer) row shared by guns and melee weapons
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuildEntry {
    /// Whether items of this guild may roll an element at all
    #[serde(default)]
    pub element_roll: bool,
    /// Always-elemental guilds reroll until an element resolves
    #[serde(default)]
    pub guaranteed_element: bool,
    /// Percentage boost applied to the element roll, per rarity
    #[serde(default)]
    pub element_boost: BTreeMap<Rarity, u32>,
    #[serde(default)]
    pub info: Option<String>,
    /// Guild mod text per rarity
    #[serde(default)]
    pub tiers: BTreeMap<Rarity, String>,
}

impl GuildEntry {
    pub fn tier(&self, rarity: Rarity) -> Option<&str> {
        self.tiers.get(&rarity).map(String::as_str)
    }
}

/// Case-insensitive lookup in a guild map, returning the key as written
pub fn find_guild<'a>(
    guilds: &'a BTreeMap<String, GuildEntry>,
    name: &str,
) -> Option<(&'a str, &'a GuildEntry)> {
    let wanted = name.trim();
    guilds
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(wanted))
        .map(|(key, entry)| (key.as_str(), entry))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GunTypeEntry {
    #[serde(rename = "type")]
    pub name: String,
    /// Guild column rolled for this type
    pub guild: RangeTable<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accuracy {
    pub hits: u32,
    pub crits: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GunStats {
    pub damage: String,
    pub range: u32,
    /// Accuracy roll band (`"2-7"`, `"16+"`) to hits and crits
    pub accuracy: BTreeMap<String, Accuracy>,
}

impl GunStats {
    /// Accuracy bands ordered from the lowest roll upwards
    pub fn accuracy_bands(&self) -> Vec<(&str, Accuracy)> {
        let mut bands: Vec<(&str, Accuracy)> = self
            .accuracy
            .iter()
            .map(|(band, acc)| (band.as_str(), *acc))
            .collect();
        bands.sort_by_key(|(band, _)| band_floor(band));
        bands
    }
}

fn band_floor(band: &str) -> u32 {
    band.chars()
        .take_while(char::is_ascii_digit)
        .collect::<String>()
        .parse()
        .unwrap_or(0)
}

/// Balance profile -> gun type -> item level -> stat block
pub type GunStatTable = BTreeMap<String, BTreeMap<String, RangeTable<GunStats>>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GunRules {
    pub item_levels: Vec<RangeKey>,
    pub default_balance: String,
    pub types: RangeTable<GunTypeEntry>,
    pub guilds: BTreeMap<String, GuildEntry>,
    pub stats: GunStatTable,
    pub rarity: RarityGrid,
    pub cost: BTreeMap<Rarity, u32>,
    pub prefixes: RangeTable<Modifier>,
    pub red_text: RangeTable<Modifier>,
    pub lexicon: RangeTable<String>,
}

impl GunRules {
    pub fn guild(&self, name: &str) -> Option<(&str, &GuildEntry)> {
        find_guild(&self.guilds, name)
    }

    /// Gun type by table key (`"3"`) or by type name (`"shotgun"`)
    pub fn gun_type(&self, key_or_name: &str) -> Option<(&RangeKey, &GunTypeEntry)> {
        let wanted = key_or_name.trim();
        self.types.get_entry(wanted).or_else(|| {
            self.types
                .iter()
                .find(|(_, entry)| entry.name.eq_ignore_ascii_case(wanted))
        })
    }

    /// Item level bracket by key (`"7-12"`) or by a level inside it (`"9"`)
    pub fn item_level(&self, key_or_level: &str) -> Option<&RangeKey> {
        let wanted = RangeKey::parse(key_or_level).ok()?;
        self.item_levels
            .iter()
            .find(|level| **level == wanted)
            .or_else(|| {
                if wanted.width() == 1 {
                    self.item_levels.iter().rev().find(|level| level.contains(wanted.lower()))
                } else {
                    None
                }
            })
    }

    pub fn stats(&self, balance: &str, gun_type: &str, level: &RangeKey) -> Option<&GunStats> {
        self.stats
            .get(balance)?
            .get(gun_type)?
            .get(level.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementRules {
    /// d100 bucket -> rarity -> element entry (null for none)
    pub table: RangeTable<BTreeMap<Rarity, Option<ElementEntry>>>,
    #[serde(default)]
    pub info: BTreeMap<Element, String>,
}

impl ElementRules {
    /// Whether any bucket can produce an element at this rarity
    pub fn has_entry_for(&self, rarity: Rarity) -> bool {
        self.table.values().any(|by_rarity| {
            by_rarity
                .get(&rarity)
                .and_then(Option::as_ref)
                .map(|entry| !entry.is_empty())
                .unwrap_or(false)
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShieldTier {
    pub capacity: u32,
    pub recharge: u32,
    pub effect: String,
    #[serde(default)]
    pub cost: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShieldRules {
    pub guilds: RangeTable<String>,
    pub tiers: BTreeMap<String, RangeTable<ShieldTier>>,
    pub lexicon: RangeTable<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrenadeTier {
    pub damage: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub effect: String,
    #[serde(default)]
    pub cost: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrenadeRules {
    pub guilds: RangeTable<String>,
    /// Guilds whose effect text carries an element placeholder
    #[serde(default)]
    pub elemental_guilds: Vec<String>,
    #[serde(default = "default_placeholder")]
    pub element_placeholder: String,
    pub tiers: BTreeMap<String, RangeTable<GrenadeTier>>,
    pub lexicon: RangeTable<String>,
}

fn default_placeholder() -> String {
    "xx".to_string()
}

impl GrenadeRules {
    pub fn is_elemental_guild(&self, guild: &str) -> bool {
        self.elemental_guilds.iter().any(|g| g.eq_ignore_ascii_case(guild))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelicEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub rarity: Rarity,
    pub effect: String,
    pub class_effect: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelicRules {
    pub relics: RangeTable<RelicEntry>,
    pub cost: BTreeMap<Rarity, u32>,
    pub classes: RangeTable<String>,
    pub lexicon: RangeTable<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PotionEntry {
    pub name: String,
    pub info: String,
    #[serde(default)]
    pub cost: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TinaEntry {
    pub name: String,
    pub info: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PotionRules {
    pub potions: RangeTable<PotionEntry>,
    /// Potion ids that redirect to the Tina table, with their roll bonus
    pub tina_ranges: RangeTable<u32>,
    pub tina_potions: RangeTable<TinaEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeleeRules {
    pub guilds: BTreeMap<String, GuildEntry>,
    pub prefixes: RangeTable<Modifier>,
    /// Item level -> damage die
    pub damage: RangeTable<String>,
}

impl MeleeRules {
    pub fn guild(&self, name: &str) -> Option<(&str, &GuildEntry)> {
        find_guild(&self.guilds, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RuleSet;

    #[test]
    fn test_guild_lookup_ignores_case() {
        let rules = RuleSet::default();
        let (name, entry) = rules.guns.guild("Malefactor").unwrap();
        assert_eq!(name, "malefactor");
        assert!(entry.guaranteed_element);
        assert_eq!(entry.element_boost.get(&Rarity::Legendary), Some(&20));
        assert!(rules.guns.guild("acme").is_none());
    }

    #[test]
    fn test_gun_type_by_key_or_name() {
        let rules = RuleSet::default();
        let (key, by_key) = rules.guns.gun_type("1").unwrap();
        assert_eq!(key.as_str(), "1");
        assert_eq!(by_key.name, "pistol");
        let (_, by_name) = rules.guns.gun_type("Shotgun").unwrap();
        assert_eq!(by_name.name, "shotgun");
    }

    #[test]
    fn test_item_level_by_bracket_or_level() {
        let rules = RuleSet::default();
        assert_eq!(rules.guns.item_level("7-12").unwrap().as_str(), "7-12");
        assert_eq!(rules.guns.item_level("9").unwrap().as_str(), "7-12");
        assert!(rules.guns.item_level("99").is_none());
        assert!(rules.guns.item_level("later").is_none());
    }

    #[test]
    fn test_accuracy_bands_sorted_by_roll() {
        let rules = RuleSet::default();
        let level = rules.guns.item_level("1-6").unwrap();
        let stats = rules.guns.stats("standard", "pistol", level).unwrap();
        let bands: Vec<&str> = stats.accuracy_bands().iter().map(|(b, _)| *b).collect();
        assert_eq!(bands, vec!["2-7", "8-15", "16+"]);
    }

    #[test]
    fn test_every_rarity_can_roll_an_element() {
        let rules = RuleSet::default();
        for rarity in Rarity::ALL {
            assert!(rules.elements.has_entry_for(rarity), "{rarity:?}");
        }
    }

    #[test]
    fn test_grenade_elemental_guild() {
        let rules = RuleSet::default();
        assert!(rules.grenades.is_elemental_guild("malefactor"));
        assert!(!rules.grenades.is_elemental_guild("Torgue"));
        assert_eq!(rules.grenades.element_placeholder, "xx");
    }
}
