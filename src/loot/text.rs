//! Text helpers for names and item cards

use super::roll::RollSource;
use crate::tables::RangeTable;

/// Line width of effect text on item cards
pub const CARD_LINE_LENGTH: usize = 32;

/// Treat `"random"` (any case) and blank strings as "no override"
pub fn explicit(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("random"))
}

/// Word-wrap `text` to lines of at most `line_length` characters
///
/// Words longer than a line get a line of their own.
pub fn wrap_text(text: &str, line_length: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= line_length {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// `"submachine_gun"` -> `"Submachine Gun"`
pub fn title_case(text: &str) -> String {
    text.split(|c: char| c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Build a name from `words` random lexicon entries
pub fn lexicon_name(lexicon: &RangeTable<String>, words: u32, rolls: &mut impl RollSource) -> String {
    let mut parts = Vec::with_capacity(words as usize);
    for _ in 0..words {
        if let Some((_, word)) = lexicon.nth(rolls.pick(lexicon.len())) {
            parts.push(word.as_str());
        }
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loot::roll::ScriptedRolls;
    use crate::tables::RangeKey;

    #[test]
    fn test_explicit_sentinels() {
        assert_eq!(explicit(Some("Random")), None);
        assert_eq!(explicit(Some("RANDOM")), None);
        assert_eq!(explicit(Some("  ")), None);
        assert_eq!(explicit(None), None);
        assert_eq!(explicit(Some(" epic ")), Some("epic"));
    }

    #[test]
    fn test_wrap_text() {
        let lines = wrap_text("Deals damage in a 2 square radius. Bounces once.", CARD_LINE_LENGTH);
        assert_eq!(lines, vec!["Deals damage in a 2 square", "radius. Bounces once."]);
        assert!(lines.iter().all(|l| l.len() <= CARD_LINE_LENGTH));
        assert!(wrap_text("", 10).is_empty());
        assert_eq!(wrap_text("Supercalifragilistic ok", 5), vec!["Supercalifragilistic", "ok"]);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("submachine_gun"), "Submachine Gun");
        assert_eq!(title_case("cryo"), "Cryo");
        assert_eq!(title_case("alas!"), "Alas!");
    }

    #[test]
    fn test_lexicon_name() {
        let lexicon: RangeTable<String> = ["Widow", "Maker", "Boom"]
            .iter()
            .enumerate()
            .map(|(i, w)| (RangeKey::parse(&(i + 1).to_string()).unwrap(), w.to_string()))
            .collect();
        let mut rolls = ScriptedRolls::new([1, 2]);
        assert_eq!(lexicon_name(&lexicon, 2, &mut rolls), "Widow Maker");
        let mut rolls = ScriptedRolls::new([3]);
        assert_eq!(lexicon_name(&lexicon, 1, &mut rolls), "Boom");
    }
}
