//! FoundryVTT item export
//!
//! Maps a generated gun onto the Bunkers & Badasses FoundryVTT item schema.

use serde_json::{json, Map, Value};

use crate::items::gun::{AccuracyBand, Gun};
use crate::loot::text::title_case;
use crate::loot::Element;

/// Element keys of the item schema, in schema order
const ELEMENT_KEYS: [&str; 9] = [
    "cryo",
    "corrosive",
    "explosive",
    "incendiary",
    "radiation",
    "shock",
    "corroshock",
    "crysplosive",
    "incendiaradiation",
];

fn schema_key(element: Element) -> &'static str {
    match element {
        Element::ExplosivCryo => "crysplosive",
        other => other.key(),
    }
}

fn first_integer(text: &str) -> Option<i64> {
    text.split(|c: char| !c.is_ascii_digit() && c != '-' && c != '+')
        .find_map(|word| word.trim_start_matches('+').parse::<i64>().ok())
}

fn accuracy(band: Option<&AccuracyBand>) -> Value {
    match band {
        Some(band) => json!({ "hits": band.hits, "crits": band.crits }),
        None => json!({ "hits": 0, "crits": 0 }),
    }
}

/// Build the FoundryVTT item JSON for a gun
///
/// With `hide_red_text` the red text effect is left out of the player
/// facing field and kept only in the GM copy.
pub fn gun_to_foundry(gun: &Gun, hide_red_text: bool) -> Value {
    let guild = gun.guild.to_ascii_lowercase();

    let mut elements = Map::new();
    let mut bonus = gun
        .element_bonus
        .as_deref()
        .map(|b| b.trim_start_matches('(').trim_start_matches('+').trim_end_matches(')'));
    for key in ELEMENT_KEYS {
        let enabled = gun.elements.iter().any(|e| schema_key(*e) == key);
        let damage = if enabled {
            bonus.take().unwrap_or(" ")
        } else {
            ""
        };
        elements.insert(key.to_string(), json!({ "enabled": enabled, "damage": damage }));
    }
    elements.insert(
        "kinetic".to_string(),
        json!({ "enabled": true, "damage": gun.damage }),
    );

    let mods = gun.stat_mods;
    let (red_text, red_text_effect) = match &gun.red_text {
        Some(red) => (red.name.as_str(), red.info.as_str()),
        None => ("", ""),
    };

    let level = gun
        .item_level
        .split('-')
        .next()
        .and_then(|l| l.trim().parse::<u32>().ok())
        .unwrap_or(1);
    let shown_effect = if hide_red_text { "" } else { red_text_effect };

    let mut system = json!({
        "type": {
            "name": title_case(&gun.gun_type),
            "value": gun.gun_type.replace('_', " ").to_lowercase(),
        },
        "level": level,
        "rarity": {
            "name": gun.rarity.name(),
            "value": gun.rarity.key(),
            "colorValue": gun.rarity.color(),
        },
        "guild": title_case(&gun.guild),
        "guildBonus": gun.guild_mod.clone().unwrap_or_default(),
        "splash": false,
        "overheat": Value::Null,
        "bonusCritDmg": 0,
        "hitBonus": 0,
        "redText": red_text,
        "redTextEffect": shown_effect,
        "redTextEffectBM": red_text_effect,
        "elements": elements,
        "prefix": {
            "name": gun.prefix.as_ref().map(|p| p.name.as_str()).unwrap_or(" "),
            "effects": gun.prefix.as_ref().map(|p| p.info.as_str()).unwrap_or(" "),
        },
        "accuracy": {
            "low": accuracy(gun.accuracy.first()),
            "mid": accuracy(gun.accuracy.get(1)),
            "high": accuracy(gun.accuracy.get(2)),
        },
        "damage": gun.damage,
        "range": gun.range,
        "statMods": {
            "acc": mods.acc,
            "dmg": mods.dmg,
            "spd": mods.spd,
            "mst": mods.mst,
        },
    });

    match guild.as_str() {
        "torgue" => system["splash"] = json!(true),
        "skuldugger" => {
            let overheat = gun
                .guild_info
                .as_deref()
                .and_then(|info| info.split("Overheat:").nth(1))
                .and_then(first_integer);
            system["overheat"] = json!(overheat);
        }
        "blackpowder" => {
            let crit = gun.guild_mod.as_deref().and_then(first_integer).unwrap_or(0);
            system["bonusCritDmg"] = json!(crit);
        }
        "dahlia" => system["hitBonus"] = json!(1),
        _ => {}
    }

    json!({
        "name": gun.name,
        "type": "gun",
        "img": gun.art.clone().unwrap_or_default(),
        "system": system,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RuleSet;
    use crate::items::art::NoArt;
    use crate::items::gun::{generate_gun, GunOptions};
    use crate::items::Rarity;
    use crate::loot::{ModifierChoice, SeededRolls};

    fn gun(guild: &str, options: GunOptions) -> Gun {
        let rules = RuleSet::default();
        let options = GunOptions {
            guild: Some(guild.into()),
            item_level: Some("7-12".into()),
            gun_type: Some("pistol".into()),
            ..options
        };
        generate_gun(&rules, &options, &mut SeededRolls::new(21), &mut NoArt).unwrap()
    }

    #[test]
    fn test_common_fields() {
        let gun = gun("dahlia", GunOptions {
            rarity: Some(Rarity::Epic),
            ..GunOptions::default()
        });
        let value = gun_to_foundry(&gun, false);
        assert_eq!(value["name"], gun.name.as_str());
        assert_eq!(value["system"]["level"], 7);
        assert_eq!(value["system"]["type"]["name"], "Pistol");
        assert_eq!(value["system"]["rarity"]["colorValue"], "#7000a4");
        assert_eq!(value["system"]["hitBonus"], 1);
        assert_eq!(value["system"]["elements"]["kinetic"]["damage"], "1d8");
        assert_eq!(value["system"]["accuracy"]["high"]["crits"], 1);
        assert_eq!(value["system"]["statMods"]["spd"], 2);
    }

    #[test]
    fn test_guild_specific_fields() {
        let torgue = gun_to_foundry(&gun("torgue", GunOptions::default()), false);
        assert_eq!(torgue["system"]["splash"], true);

        let skuldugger = gun_to_foundry(&gun("skuldugger", GunOptions::default()), false);
        assert_eq!(skuldugger["system"]["overheat"], 4);

        let blackpowder = gun_to_foundry(
            &gun("blackpowder", GunOptions {
                rarity: Some(Rarity::Rare),
                ..GunOptions::default()
            }),
            false,
        );
        assert_eq!(blackpowder["system"]["bonusCritDmg"], 3);
    }

    #[test]
    fn test_elements_and_bonus() {
        let gun = gun("skuldugger", GunOptions {
            elements: vec![Element::Explosive, Element::Cryo, Element::Shock],
            element_damage: Some("1d6".into()),
            ..GunOptions::default()
        });
        let value = gun_to_foundry(&gun, false);
        let elements = &value["system"]["elements"];
        assert_eq!(elements["crysplosive"]["enabled"], true);
        assert_eq!(elements["shock"]["enabled"], true);
        assert_eq!(elements["cryo"]["enabled"], false);
        // bonus lands on the first enabled element in schema order
        assert_eq!(elements["shock"]["damage"], "1d6");
        assert_eq!(elements["crysplosive"]["damage"], " ");
    }

    #[test]
    fn test_hidden_red_text() {
        let gun = gun("alas!", GunOptions {
            red_text: ModifierChoice::Explicit("85-94".into()),
            ..GunOptions::default()
        });
        let value = gun_to_foundry(&gun, true);
        assert_eq!(value["system"]["redText"], "Bottomless");
        assert_eq!(value["system"]["redTextEffect"], "");
        assert_eq!(value["system"]["redTextEffectBM"], "Never needs to reload.");
    }
}
