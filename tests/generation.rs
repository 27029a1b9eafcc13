//! End-to-end generation scenarios against the built-in rule tables

use bnb_loot::items::{
    generate_gun, generate_melee, generate_potion, GunOptions, MeleeOptions, PotionOptions,
};
use bnb_loot::loot::{merge_combinations, Modifier, RarityGate, ScriptedRolls};
use bnb_loot::{
    generate, Element, Item, ItemCategory, ItemRequest, ModifierChoice, NoArt, Rarity, RuleSet,
    SeededRolls,
};

#[test]
fn malefactor_always_rolls_an_element() {
    let rules = RuleSet::default();
    let mut rolls = SeededRolls::new(1337);

    for rarity in [Rarity::Rare, Rarity::Epic, Rarity::Legendary] {
        let options = GunOptions {
            guild: Some("malefactor".into()),
            rarity: Some(rarity),
            ..GunOptions::default()
        };
        for _ in 0..10_000 {
            let gun = generate_gun(&rules, &options, &mut rolls, &mut NoArt).unwrap();
            assert!(!gun.elements.is_empty(), "{rarity:?} malefactor gun without element");
        }
    }
}

#[test]
fn explicit_rarity_is_never_rerolled() {
    let rules = RuleSet::default();
    let mut rolls = SeededRolls::new(5);
    let request = ItemRequest::Gun(GunOptions {
        rarity: Some(Rarity::Epic),
        ..GunOptions::default()
    });
    for _ in 0..500 {
        let item = generate(&rules, &request, &mut rolls, &mut NoArt).unwrap();
        assert_eq!(item.rarity(), Some(Rarity::Epic));
    }
}

#[test]
fn legendary_malefactor_pistol_at_level_seven() {
    let rules = RuleSet::default();
    let options = GunOptions {
        item_level: Some("7-12".into()),
        gun_type: Some("pistol".into()),
        guild: Some("malefactor".into()),
        rarity: Some(Rarity::Legendary),
        ..GunOptions::default()
    };
    let (_, malefactor) = rules.guns.guild("malefactor").unwrap();
    let expected_mod = malefactor.tier(Rarity::Legendary).map(str::to_string);

    for seed in 0..200 {
        let gun = generate_gun(&rules, &options, &mut SeededRolls::new(seed), &mut NoArt).unwrap();
        assert_eq!(gun.rarity, Rarity::Legendary);
        assert_eq!(gun.item_level, "7-12");
        assert!(!gun.elements.is_empty());
        assert_eq!(gun.guild_mod, expected_mod);
    }
}

#[test]
fn tina_potion_uses_tina_table() {
    let rules = RuleSet::default();
    let options = PotionOptions {
        id: Some("01-05".into()),
        ..PotionOptions::default()
    };
    let tina_names: Vec<&str> = rules.potions.tina_potions.values().map(|t| t.name.as_str()).collect();

    let mut rolls = SeededRolls::new(3);
    for _ in 0..100 {
        let potion = generate_potion(&rules, &options, &mut rolls, &mut NoArt).unwrap();
        assert!(potion.tina_potion);
        assert!(tina_names.contains(&potion.name.as_str()));
    }
}

#[test]
fn prefix_composes_name() {
    let rules = RuleSet::default();
    let options = GunOptions {
        name: Some("Widowmaker".into()),
        prefix: ModifierChoice::Explicit("1-10".into()),
        ..GunOptions::default()
    };
    let gun = generate_gun(&rules, &options, &mut SeededRolls::new(9), &mut NoArt).unwrap();
    assert_eq!(gun.name, "Savage Widowmaker");
}

#[test]
fn red_text_grant_adds_element_once() {
    let rules = RuleSet::default();
    let frostbite = ModifierChoice::Explicit("1-8".into());

    let bare = GunOptions {
        guild: Some("torgue".into()),
        red_text: frostbite.clone(),
        ..GunOptions::default()
    };
    let gun = generate_gun(&rules, &bare, &mut SeededRolls::new(2), &mut NoArt).unwrap();
    assert_eq!(gun.elements, vec![Element::Cryo]);

    let already_cryo = GunOptions {
        elements: vec![Element::Cryo],
        ..bare
    };
    let gun = generate_gun(&rules, &already_cryo, &mut SeededRolls::new(2), &mut NoArt).unwrap();
    assert_eq!(gun.elements, vec![Element::Cryo]);
}

#[test]
fn melee_red_text_from_caller_grants_element() {
    let rules = RuleSet::default();
    let options = MeleeOptions {
        guild: Some("blackpowder".into()),
        red_text: Some(Modifier::new("Ice Pick", "Element type. Cryo")),
        ..MeleeOptions::default()
    };
    let weapon = generate_melee(&rules, &options, &mut SeededRolls::new(4), &mut NoArt).unwrap();
    assert!(weapon.elements.contains(&Element::Cryo));
}

#[test]
fn merged_elements_never_hold_a_full_pair() {
    let rules = RuleSet::default();
    let mut rolls = SeededRolls::new(99);
    let options = GunOptions {
        force_element: true,
        red_text: ModifierChoice::Random(RarityGate::All),
        ..GunOptions::default()
    };
    for _ in 0..2000 {
        let gun = generate_gun(&rules, &options, &mut rolls, &mut NoArt).unwrap();
        assert_eq!(merge_combinations(&gun.elements), gun.elements);
    }
}

#[test]
fn same_seed_same_items() {
    let rules = RuleSet::default();
    for category in ItemCategory::ALL {
        let request = ItemRequest::random(category);
        let a = generate(&rules, &request, &mut SeededRolls::new(31), &mut NoArt).unwrap();
        let b = generate(&rules, &request, &mut SeededRolls::new(31), &mut NoArt).unwrap();
        assert_eq!(
            serde_json::to_value(&a).unwrap(),
            serde_json::to_value(&b).unwrap()
        );
    }
}

#[test]
fn scripted_shield_card() {
    let rules = RuleSet::default();
    // guild 8 (Hyperius), tier 1, first lexicon word
    let mut rolls = ScriptedRolls::new([8, 1, 1]);
    let item = generate(&rules, &ItemRequest::random(ItemCategory::Shield), &mut rolls, &mut NoArt).unwrap();
    let Item::Shield(shield) = &item else {
        panic!("expected a shield, got {:?}", item.category());
    };
    assert_eq!(shield.guild, "Hyperius");
    assert_eq!(shield.tier, "1");
    let card = item.to_string();
    assert!(card.starts_with("Aegis\nHyperius Shield | Tier 1\n"));
    assert!(card.lines().all(|line| line.len() <= 40));
}
