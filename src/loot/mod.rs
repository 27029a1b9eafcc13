//! Loot resolution engine
//!
//! Dice, rarity, element and modifier resolution shared by every item
//! generator.

pub mod element;
pub mod modifier;
pub mod rarity;
pub mod roll;
pub mod text;

pub use element::{
    grant_element, merge_combinations, resolve_elements, Element, ElementEntry, ElementOutcome,
    ElementRequest, MAX_ELEMENT_ATTEMPTS,
};
pub use modifier::{
    compose_name, resolve_modifier, Modifier, ModifierChoice, RarityGate, StatMods,
};
pub use rarity::{resolve_rarity, RarityCell, RarityGrid, RarityRoll};
pub use roll::{RollSource, ScriptedRolls, SeededRolls};
pub use text::{explicit, wrap_text};
