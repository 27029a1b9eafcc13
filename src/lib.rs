//! bnb-loot - Bunkers & Badasses loot generator
//!
//! Rolls guns, shields, relics, grenades, potions and melee weapons from
//! editable rule tables, honoring any field the caller fixes up front.

pub mod data;
pub mod error;
pub mod export;
pub mod items;
pub mod loot;
pub mod tables;

// Re-export commonly used types
pub use data::RuleSet;
pub use error::{LootError, Result};
pub use items::{generate, ArtSampler, Item, ItemCategory, ItemRequest, NoArt, Rarity};
pub use loot::{Element, ModifierChoice, RollSource, ScriptedRolls, SeededRolls};
