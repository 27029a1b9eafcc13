//! Rule tables
//!
//! Typed views of the JSON rule files and the loader that reads them,
//! so tables can be edited without recompiling.

pub mod loader;
pub mod rules;

pub use loader::{export_default_rules, user_rules_dir, RuleSet};
pub use rules::{GuildEntry, GunStats};
