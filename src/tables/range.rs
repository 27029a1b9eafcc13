//! Range-keyed lookup tables
//!
//! Rule tables are keyed either by an exact roll (`"7"`) or by an inclusive
//! range (`"51-65"`). A roll is bucketed by scanning every key; when ranges
//! overlap the last matching key in file order wins.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::{LootError, Result};

/// A parsed `"N"` or `"N-M"` table key
///
/// Keeps the key text as written so that item records echo the table
/// (`"01-05"` stays `"01-05"`). Equality compares bounds only.
#[derive(Debug, Clone, Eq)]
pub struct RangeKey {
    raw: String,
    lower: u32,
    upper: u32,
}

impl RangeKey {
    /// Parse a key, failing on anything that is not `N` or `N-M` with `N <= M`
    pub fn parse(key: &str) -> Result<Self> {
        let malformed = || LootError::MalformedRangeKey(key.to_string());
        let trimmed = key.trim();

        let (lower, upper) = match trimmed.split_once('-') {
            Some((lo, hi)) => (
                lo.trim().parse::<u32>().map_err(|_| malformed())?,
                hi.trim().parse::<u32>().map_err(|_| malformed())?,
            ),
            None => {
                let value = trimmed.parse::<u32>().map_err(|_| malformed())?;
                (value, value)
            }
        };

        if lower > upper {
            return Err(malformed());
        }

        Ok(Self {
            raw: trimmed.to_string(),
            lower,
            upper,
        })
    }

    /// Inclusive bounds check
    pub fn contains(&self, roll: u32) -> bool {
        self.lower <= roll && roll <= self.upper
    }

    pub fn lower(&self) -> u32 {
        self.lower
    }

    pub fn upper(&self) -> u32 {
        self.upper
    }

    /// Key text as it appears in the rule file
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Number of roll values covered by this key
    pub fn width(&self) -> u32 {
        self.upper - self.lower + 1
    }
}

impl PartialEq for RangeKey {
    fn eq(&self, other: &Self) -> bool {
        self.lower == other.lower && self.upper == other.upper
    }
}

impl fmt::Display for RangeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl TryFrom<String> for RangeKey {
    type Error = LootError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl Serialize for RangeKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for RangeKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        RangeKey::parse(&raw).map_err(de::Error::custom)
    }
}

/// Resolve a roll against raw string keys
///
/// Every key is validated, so a malformed key fails the lookup even if an
/// earlier key already matched.
pub fn resolve_key<'a, I>(roll: u32, keys: I) -> Result<Option<&'a str>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut found = None;
    for key in keys {
        if RangeKey::parse(key)?.contains(roll) {
            found = Some(key);
        }
    }
    Ok(found)
}

/// An ordered table of range-keyed entries
#[derive(Debug, Clone)]
pub struct RangeTable<T> {
    entries: Vec<(RangeKey, T)>,
}

impl<T> Default for RangeTable<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T> RangeTable<T> {
    pub fn new(entries: Vec<(RangeKey, T)>) -> Self {
        Self { entries }
    }

    /// The key whose bounds contain `roll`, last match winning
    pub fn resolve(&self, roll: u32) -> Option<&RangeKey> {
        self.resolve_entry(roll).map(|(key, _)| key)
    }

    /// The entry whose bounds contain `roll`, last match winning
    pub fn resolve_entry(&self, roll: u32) -> Option<(&RangeKey, &T)> {
        let mut found = None;
        for (key, value) in &self.entries {
            if key.contains(roll) {
                found = Some((key, value));
            }
        }
        found
    }

    /// Direct lookup of an exact key (`"1-5"` also matches `"01-05"`)
    pub fn get(&self, key: &str) -> Option<&T> {
        self.get_entry(key).map(|(_, value)| value)
    }

    pub fn get_entry(&self, key: &str) -> Option<(&RangeKey, &T)> {
        let wanted = RangeKey::parse(key).ok()?;
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| *k == wanted)
            .map(|(k, v)| (k, v))
    }

    /// Highest upper bound; the die size for rolls on this table
    pub fn max_bound(&self) -> Option<u32> {
        self.entries.iter().map(|(k, _)| k.upper).max()
    }

    pub fn min_bound(&self) -> Option<u32> {
        self.entries.iter().map(|(k, _)| k.lower).min()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RangeKey, &T)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&RangeKey, &mut T)> {
        self.entries.iter_mut().map(|(k, v)| (&*k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &RangeKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry by position in file order
    pub fn nth(&self, index: usize) -> Option<(&RangeKey, &T)> {
        self.entries.get(index).map(|(k, v)| (k, v))
    }
}

impl<T> FromIterator<(RangeKey, T)> for RangeTable<T> {
    fn from_iter<I: IntoIterator<Item = (RangeKey, T)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<T: Serialize> Serialize for RangeTable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key.as_str(), value)?;
        }
        map.end()
    }
}

struct RangeTableVisitor<T> {
    marker: PhantomData<T>,
}

impl<'de, T: Deserialize<'de>> Visitor<'de> for RangeTableVisitor<T> {
    type Value = RangeTable<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map keyed by \"N\" or \"N-M\" ranges")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, T>()? {
            let key = RangeKey::parse(&key).map_err(de::Error::custom)?;
            entries.push((key, value));
        }
        Ok(RangeTable { entries })
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for RangeTable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(RangeTableVisitor { marker: PhantomData })
    }
}
