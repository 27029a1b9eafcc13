//! Error types for rule loading and item generation

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can abort the generation of a single item
#[derive(Debug, Error)]
pub enum LootError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed range key {0:?}: expected \"N\" or \"N-M\"")]
    MalformedRangeKey(String),

    #[error("no entry for {key:?} in the {table} table")]
    MissingEntry { table: &'static str, key: String },

    #[error("the {0} table is empty")]
    EmptyTable(&'static str),

    #[error("no element resolved for {guild} at {rarity} after {attempts} attempts; the element table has no entry for that rarity")]
    ElementRetryExhausted {
        guild: String,
        rarity: String,
        attempts: u32,
    },

    #[error("unknown rarity {0:?}")]
    UnknownRarity(String),

    #[error("unknown element {0:?}")]
    UnknownElement(String),
}

pub type Result<T> = std::result::Result<T, LootError>;
