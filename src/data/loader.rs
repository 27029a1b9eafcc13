//! Rule file loader
//!
//! Loads the rule tables from JSON files, falling back to the copies
//! embedded in the binary for any file that is missing.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use super::rules::{
    ElementRules, GrenadeRules, GunRules, MeleeRules, PotionRules, RelicRules, ShieldRules,
};
use crate::error::{LootError, Result};

const GUNS: &str = include_str!("../../assets/rules/guns.json");
const ELEMENTS: &str = include_str!("../../assets/rules/elements.json");
const SHIELDS: &str = include_str!("../../assets/rules/shields.json");
const GRENADES: &str = include_str!("../../assets/rules/grenades.json");
const RELICS: &str = include_str!("../../assets/rules/relics.json");
const POTIONS: &str = include_str!("../../assets/rules/potions.json");
const MELEE: &str = include_str!("../../assets/rules/melee.json");

/// File name and embedded contents of every rule file
pub const RULE_FILES: [(&str, &str); 7] = [
    ("guns.json", GUNS),
    ("elements.json", ELEMENTS),
    ("shields.json", SHIELDS),
    ("grenades.json", GRENADES),
    ("relics.json", RELICS),
    ("potions.json", POTIONS),
    ("melee.json", MELEE),
];

/// All rule tables, loaded once and shared read-only
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub guns: GunRules,
    pub elements: ElementRules,
    pub shields: ShieldRules,
    pub grenades: GrenadeRules,
    pub relics: RelicRules,
    pub potions: PotionRules,
    pub melee: MeleeRules,
}

impl RuleSet {
    /// Load from the user rules directory, or use the embedded defaults
    pub fn new() -> Self {
        let Some(dir) = user_rules_dir() else {
            return Self::default();
        };
        if !dir.exists() {
            return Self::default();
        }
        Self::load_from_dir(&dir).unwrap_or_else(|e| {
            log::warn!("Failed to load rules from {:?}: {}. Using defaults.", dir, e);
            Self::default()
        })
    }

    /// Load every rule file from `dir`
    ///
    /// A missing file falls back to its embedded default; a file that
    /// exists but does not parse is an error.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Ok(Self {
            guns: load_file(dir, "guns.json", GUNS)?,
            elements: load_file(dir, "elements.json", ELEMENTS)?,
            shields: load_file(dir, "shields.json", SHIELDS)?,
            grenades: load_file(dir, "grenades.json", GRENADES)?,
            relics: load_file(dir, "relics.json", RELICS)?,
            potions: load_file(dir, "potions.json", POTIONS)?,
            melee: load_file(dir, "melee.json", MELEE)?,
        })
    }

    /// Parse the embedded defaults
    pub fn embedded() -> Result<Self> {
        Ok(Self {
            guns: parse("guns.json", GUNS)?,
            elements: parse("elements.json", ELEMENTS)?,
            shields: parse("shields.json", SHIELDS)?,
            grenades: parse("grenades.json", GRENADES)?,
            relics: parse("relics.json", RELICS)?,
            potions: parse("potions.json", POTIONS)?,
            melee: parse("melee.json", MELEE)?,
        })
    }
}

impl Default for RuleSet {
    /// Panics only if the embedded tables are broken, which the loader tests catch
    fn default() -> Self {
        Self::embedded().expect("embedded rule files are valid")
    }
}

fn parse<T: DeserializeOwned>(file: &str, content: &str) -> Result<T> {
    serde_json::from_str(content).map_err(|source| LootError::Parse {
        file: file.to_string(),
        source,
    })
}

fn load_file<T: DeserializeOwned>(dir: &Path, file: &str, default: &str) -> Result<T> {
    let path = dir.join(file);
    if !path.exists() {
        log::info!("{} not found in {:?}, using built-in table", file, dir);
        return parse(file, default);
    }

    let content = fs::read_to_string(&path).map_err(|source| LootError::Io {
        path: path.clone(),
        source,
    })?;
    log::debug!("Loaded {:?}", path);
    parse(file, &content)
}

/// Per-user rules directory
pub fn user_rules_dir() -> Option<PathBuf> {
    use directories::ProjectDirs;

    ProjectDirs::from("com", "bnb-loot", "BnbLoot").map(|proj_dirs| {
        let mut path = proj_dirs.config_dir().to_path_buf();
        path.push("rules");
        path
    })
}

/// Write the embedded rule files into `dir` for editing
pub fn export_default_rules(dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|source| LootError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(RULE_FILES.len());
    for (file, content) in RULE_FILES {
        let path = dir.join(file);
        fs::write(&path, content).map_err(|source| LootError::Io {
            path: path.clone(),
            source,
        })?;
        written.push(path);
    }

    log::info!("Exported {} rule files to {:?}", written.len(), dir);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("bnb-loot-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_embedded_rules_parse() {
        let rules = RuleSet::embedded().unwrap();
        assert_eq!(rules.guns.item_levels.len(), 5);
        assert_eq!(rules.guns.types.max_bound(), Some(6));
        assert_eq!(rules.elements.table.max_bound(), Some(100));
        assert_eq!(rules.shields.guilds.max_bound(), Some(8));
        assert_eq!(rules.potions.tina_potions.max_bound(), Some(30));
    }

    #[test]
    fn test_missing_dir_falls_back_to_defaults() {
        let dir = scratch_dir("missing");
        let rules = RuleSet::load_from_dir(&dir).unwrap();
        assert_eq!(rules.guns.default_balance, "standard");
    }

    #[test]
    fn test_export_then_load_roundtrip() {
        let dir = scratch_dir("export");
        let written = export_default_rules(&dir).unwrap();
        assert_eq!(written.len(), RULE_FILES.len());
        assert!(dir.join("melee.json").exists());

        let rules = RuleSet::load_from_dir(&dir).unwrap();
        assert!(rules.guns.guild("malefactor").is_some());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = scratch_dir("malformed");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("potions.json"), "{ not json").unwrap();

        let err = RuleSet::load_from_dir(&dir).unwrap_err();
        assert!(matches!(err, LootError::Parse { ref file, .. } if file == "potions.json"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_bad_range_key_fails_at_load() {
        let dir = scratch_dir("badkey");
        fs::create_dir_all(&dir).unwrap();
        let broken = MELEE.replace("\"2-4\"", "\"2-x\"");
        fs::write(dir.join("melee.json"), broken).unwrap();

        assert!(RuleSet::load_from_dir(&dir).is_err());
        let _ = fs::remove_dir_all(&dir);
    }
}
