//! Item system
//!
//! One generator per category. Each takes the rule tables, caller
//! overrides, a roll source and an art sampler, and returns a fresh record.

pub mod art;
pub mod grenade;
pub mod gun;
pub mod item;
pub mod melee;
pub mod potion;
pub mod relic;
pub mod shield;

pub use art::{ArtRequest, ArtSampler, NoArt};
pub use grenade::{generate_grenade, Grenade, GrenadeOptions};
pub use gun::{generate_gun, Gun, GunOptions};
pub use item::{Item, ItemCategory, Rarity};
pub use melee::{generate_melee, MeleeOptions, MeleeWeapon};
pub use potion::{generate_potion, Potion, PotionOptions};
pub use relic::{generate_relic, Relic, RelicOptions};
pub use shield::{generate_shield, Shield, ShieldOptions};

use crate::data::RuleSet;
use crate::error::Result;
use crate::loot::RollSource;

/// What to generate, with the caller's overrides
#[derive(Debug, Clone)]
pub enum ItemRequest {
    Gun(GunOptions),
    Shield(ShieldOptions),
    Relic(RelicOptions),
    Grenade(GrenadeOptions),
    Potion(PotionOptions),
    Melee(MeleeOptions),
}

impl ItemRequest {
    /// A request with every field left to the dice
    pub fn random(category: ItemCategory) -> Self {
        match category {
            ItemCategory::Gun => ItemRequest::Gun(GunOptions::default()),
            ItemCategory::Shield => ItemRequest::Shield(ShieldOptions::default()),
            ItemCategory::Relic => ItemRequest::Relic(RelicOptions::default()),
            ItemCategory::Grenade => ItemRequest::Grenade(GrenadeOptions::default()),
            ItemCategory::Potion => ItemRequest::Potion(PotionOptions::default()),
            ItemCategory::Melee => ItemRequest::Melee(MeleeOptions::default()),
        }
    }

    pub fn category(&self) -> ItemCategory {
        match self {
            ItemRequest::Gun(_) => ItemCategory::Gun,
            ItemRequest::Shield(_) => ItemCategory::Shield,
            ItemRequest::Relic(_) => ItemCategory::Relic,
            ItemRequest::Grenade(_) => ItemCategory::Grenade,
            ItemRequest::Potion(_) => ItemCategory::Potion,
            ItemRequest::Melee(_) => ItemCategory::Melee,
        }
    }
}

/// Generate one item of the requested category
pub fn generate(
    rules: &RuleSet,
    request: &ItemRequest,
    rolls: &mut impl RollSource,
    art: &mut dyn ArtSampler,
) -> Result<Item> {
    Ok(match request {
        ItemRequest::Gun(options) => Item::Gun(generate_gun(rules, options, rolls, art)?),
        ItemRequest::Shield(options) => Item::Shield(generate_shield(rules, options, rolls, art)?),
        ItemRequest::Relic(options) => Item::Relic(generate_relic(rules, options, rolls, art)?),
        ItemRequest::Grenade(options) => Item::Grenade(generate_grenade(rules, options, rolls, art)?),
        ItemRequest::Potion(options) => Item::Potion(generate_potion(rules, options, rolls, art)?),
        ItemRequest::Melee(options) => Item::Melee(generate_melee(rules, options, rolls, art)?),
    })
}
