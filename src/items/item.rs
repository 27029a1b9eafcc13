//! Item definitions
//!
//! Rarities, categories and the item record handed back to callers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::grenade::Grenade;
use super::gun::Gun;
use super::melee::MeleeWeapon;
use super::potion::Potion;
use super::relic::Relic;
use super::shield::Shield;
use crate::error::LootError;
use crate::loot::Element;

/// Item rarity tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[serde(alias = "Common")]
    Common,
    #[serde(alias = "Uncommon")]
    Uncommon,
    #[serde(alias = "Rare")]
    Rare,
    #[serde(alias = "Epic")]
    Epic,
    #[serde(alias = "Legendary")]
    Legendary,
}

impl Rarity {
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];

    /// Get display color as a hex string
    pub fn color(&self) -> &'static str {
        match self {
            Rarity::Common => "#a5a49f",
            Rarity::Uncommon => "#0ea11f",
            Rarity::Rare => "#00a0ff",
            Rarity::Epic => "#7000a4",
            Rarity::Legendary => "#ffa500",
        }
    }

    /// Get rarity name
    pub fn name(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
        }
    }

    /// Lowercase key used in rule files
    pub fn key(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Rarity {
    type Err = LootError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rarity::ALL
            .into_iter()
            .find(|r| r.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LootError::UnknownRarity(s.to_string()))
    }
}

/// Main item categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Gun,
    Shield,
    Relic,
    Grenade,
    Potion,
    Melee,
}

impl ItemCategory {
    pub const ALL: [ItemCategory; 6] = [
        ItemCategory::Gun,
        ItemCategory::Shield,
        ItemCategory::Relic,
        ItemCategory::Grenade,
        ItemCategory::Potion,
        ItemCategory::Melee,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ItemCategory::Gun => "Gun",
            ItemCategory::Shield => "Shield",
            ItemCategory::Relic => "Relic",
            ItemCategory::Grenade => "Grenade",
            ItemCategory::Potion => "Potion",
            ItemCategory::Melee => "Melee Weapon",
        }
    }

    /// Whether items of this category carry a rarity
    pub fn has_rarity(&self) -> bool {
        matches!(self, ItemCategory::Gun | ItemCategory::Relic | ItemCategory::Melee)
    }
}

/// A generated item of any category
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum Item {
    Gun(Gun),
    Shield(Shield),
    Relic(Relic),
    Grenade(Grenade),
    Potion(Potion),
    Melee(MeleeWeapon),
}

impl Item {
    pub fn category(&self) -> ItemCategory {
        match self {
            Item::Gun(_) => ItemCategory::Gun,
            Item::Shield(_) => ItemCategory::Shield,
            Item::Relic(_) => ItemCategory::Relic,
            Item::Grenade(_) => ItemCategory::Grenade,
            Item::Potion(_) => ItemCategory::Potion,
            Item::Melee(_) => ItemCategory::Melee,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Item::Gun(g) => &g.name,
            Item::Shield(s) => &s.name,
            Item::Relic(r) => &r.name,
            Item::Grenade(g) => &g.name,
            Item::Potion(p) => &p.name,
            Item::Melee(m) => &m.name,
        }
    }

    /// Rarity, for categories that have one
    pub fn rarity(&self) -> Option<Rarity> {
        match self {
            Item::Gun(g) => Some(g.rarity),
            Item::Relic(r) => Some(r.rarity),
            Item::Melee(m) => Some(m.rarity),
            Item::Shield(_) | Item::Grenade(_) | Item::Potion(_) => None,
        }
    }

    pub fn elements(&self) -> &[Element] {
        match self {
            Item::Gun(g) => &g.elements,
            Item::Shield(s) => &s.elements,
            Item::Relic(r) => &r.elements,
            Item::Grenade(g) => &g.elements,
            Item::Potion(p) => &p.elements,
            Item::Melee(m) => &m.elements,
        }
    }

    pub fn cost(&self) -> Option<u32> {
        match self {
            Item::Gun(g) => Some(g.cost),
            Item::Shield(s) => s.cost,
            Item::Relic(r) => Some(r.cost),
            Item::Grenade(g) => g.cost,
            Item::Potion(p) => p.cost,
            Item::Melee(m) => Some(m.cost),
        }
    }

    pub fn guild(&self) -> Option<&str> {
        match self {
            Item::Gun(g) => Some(&g.guild),
            Item::Shield(s) => Some(&s.guild),
            Item::Grenade(g) => Some(&g.guild),
            Item::Melee(m) => Some(&m.guild),
            Item::Relic(_) | Item::Potion(_) => None,
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Gun(g) => fmt::Display::fmt(g, f),
            Item::Shield(s) => fmt::Display::fmt(s, f),
            Item::Relic(r) => fmt::Display::fmt(r, f),
            Item::Grenade(g) => fmt::Display::fmt(g, f),
            Item::Potion(p) => fmt::Display::fmt(p, f),
            Item::Melee(m) => fmt::Display::fmt(m, f),
        }
    }
}

/// Write a card line of wrapped text under a label
pub(crate) fn write_wrapped(f: &mut fmt::Formatter<'_>, label: &str, text: &str) -> fmt::Result {
    let lines = crate::loot::wrap_text(text, crate::loot::text::CARD_LINE_LENGTH);
    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            writeln!(f, "{label}: {line}")?;
        } else {
            writeln!(f, "{:width$}  {line}", "", width = label.len())?;
        }
    }
    Ok(())
}

/// Elements as `"Cryo, Shock"`, or `"None"`
pub(crate) fn element_list(elements: &[Element]) -> String {
    if elements.is_empty() {
        "None".to_string()
    } else {
        elements.iter().map(Element::name).collect::<Vec<_>>().join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rarity_parse_any_case() {
        assert_eq!("Epic".parse::<Rarity>().unwrap(), Rarity::Epic);
        assert_eq!("LEGENDARY".parse::<Rarity>().unwrap(), Rarity::Legendary);
        assert!(matches!("mythic".parse::<Rarity>(), Err(LootError::UnknownRarity(_))));
    }

    #[test]
    fn test_rarity_order() {
        let mut rarities = vec![Rarity::Epic, Rarity::Common, Rarity::Legendary, Rarity::Rare];
        rarities.sort();
        assert_eq!(rarities, vec![Rarity::Common, Rarity::Rare, Rarity::Epic, Rarity::Legendary]);
        assert!(Rarity::Legendary > Rarity::Uncommon);
    }

    #[test]
    fn test_rarity_serde_accepts_capitalized() {
        let rarity: Rarity = serde_json::from_str("\"Uncommon\"").unwrap();
        assert_eq!(rarity, Rarity::Uncommon);
        assert_eq!(serde_json::to_string(&Rarity::Rare).unwrap(), "\"rare\"");
    }

    #[test]
    fn test_categories_with_rarity() {
        let with: Vec<_> = ItemCategory::ALL.into_iter().filter(|c| c.has_rarity()).collect();
        assert_eq!(with, vec![ItemCategory::Gun, ItemCategory::Relic, ItemCategory::Melee]);
    }
}
