//! Rarity rolls
//!
//! The rarity grid is addressed by two independent rolls: a row die and a
//! column die. Some cells are flagged elemental, which gates the element
//! roll for guilds that allow one.

use serde::{Deserialize, Serialize};

use super::roll::RollSource;
use crate::error::{LootError, Result};
use crate::items::item::Rarity;
use crate::tables::RangeTable;

const ELEMENT_FLAG: &str = "element";

/// One cell of the rarity grid: `"rare"` or `["rare", "element"]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RarityCell {
    Plain(Rarity),
    Flagged(Rarity, String),
}

impl RarityCell {
    pub fn rarity(&self) -> Rarity {
        match self {
            RarityCell::Plain(rarity) | RarityCell::Flagged(rarity, _) => *rarity,
        }
    }

    pub fn is_elemental(&self) -> bool {
        matches!(self, RarityCell::Flagged(_, flag) if flag.eq_ignore_ascii_case(ELEMENT_FLAG))
    }
}

/// Row roll -> column roll -> cell
pub type RarityGrid = RangeTable<RangeTable<RarityCell>>;

/// Resolved rarity and whether it unlocks the element roll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RarityRoll {
    pub rarity: Rarity,
    pub elemental: bool,
}

/// Roll a row then a column on the grid
pub fn roll_rarity(grid: &RarityGrid, rolls: &mut impl RollSource) -> Result<RarityRoll> {
    let rows = grid.max_bound().ok_or(LootError::EmptyTable("rarity"))?;
    let row_roll = rolls.d(rows);
    let (row_key, row) = grid
        .resolve_entry(row_roll)
        .ok_or_else(|| missing(row_roll.to_string()))?;

    let columns = row.max_bound().ok_or(LootError::EmptyTable("rarity"))?;
    let column_roll = rolls.d(columns);
    let (_, cell) = row
        .resolve_entry(column_roll)
        .ok_or_else(|| missing(format!("{row_key}/{column_roll}")))?;

    log::debug!("Rarity roll {}/{} -> {:?}", row_roll, column_roll, cell);
    Ok(RarityRoll {
        rarity: cell.rarity(),
        elemental: cell.is_elemental(),
    })
}

fn missing(key: String) -> LootError {
    LootError::MissingEntry { table: "rarity", key }
}

/// Decide whether an explicitly chosen rarity rolls as elemental
///
/// Rolls over every grid cell holding that rarity; the item is elemental
/// when the roll lands among the elemental cells, so the odds match the
/// grid.
pub fn explicit_rarity_is_elemental(
    grid: &RarityGrid,
    rarity: Rarity,
    rolls: &mut impl RollSource,
) -> bool {
    let cells = grid
        .values()
        .flat_map(|row| row.values())
        .filter(|cell| cell.rarity() == rarity);

    let (total, elemental) = cells.fold((0u32, 0u32), |(total, elemental), cell| {
        (total + 1, elemental + u32::from(cell.is_elemental()))
    });

    if total == 0 {
        log::warn!("Rarity {} does not appear in the rarity grid", rarity.name());
        return false;
    }

    rolls.d(total) <= elemental
}

/// Explicit rarity (with elemental back-check) or a grid roll
///
/// `force_element` marks the result elemental regardless of the roll.
pub fn resolve_rarity(
    grid: &RarityGrid,
    explicit: Option<Rarity>,
    force_element: bool,
    rolls: &mut impl RollSource,
) -> Result<RarityRoll> {
    let mut roll = match explicit {
        Some(rarity) => RarityRoll {
            rarity,
            elemental: explicit_rarity_is_elemental(grid, rarity, rolls),
        },
        None => roll_rarity(grid, rolls)?,
    };
    roll.elemental |= force_element;
    Ok(roll)
}
