//! bnb-loot - Entry Point
//!
//! Command line front end: parses overrides, loads the rule tables and
//! prints generated items as text cards or JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use bnb_loot::data::{export_default_rules, RuleSet};
use bnb_loot::export::gun_to_foundry;
use bnb_loot::items::{
    generate, GrenadeOptions, GunOptions, Item, ItemRequest, MeleeOptions, NoArt, PotionOptions,
    RelicOptions, ShieldOptions,
};
use bnb_loot::loot::{Element, Modifier, ModifierChoice, SeededRolls};
use bnb_loot::Rarity;

/// Bunkers & Badasses loot generator
#[derive(Parser, Debug)]
#[command(name = "bnb-loot")]
#[command(about = "Generate Bunkers & Badasses loot from rule tables")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate items of one category
    Generate {
        #[command(flatten)]
        run: RunArgs,

        #[command(subcommand)]
        category: Category,
    },
    /// Write the built-in rule tables to a directory for editing
    ExportRules {
        /// Target directory
        dir: PathBuf,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Seed for reproducible rolls
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    /// Directory of rule JSON files (defaults to the user rules directory)
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// Number of items to generate
    #[arg(short = 'n', long, default_value_t = 1, global = true)]
    count: usize,

    /// Print items as JSON instead of text cards
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Category {
    Gun(GunArgs),
    Shield(ShieldArgs),
    Relic(RelicArgs),
    Grenade(GrenadeArgs),
    Potion(PotionArgs),
    Melee(MeleeArgs),
}

#[derive(Args, Debug)]
struct GunArgs {
    #[arg(long)]
    name: Option<String>,
    /// Item level bracket ("7-12") or level ("9")
    #[arg(long)]
    level: Option<String>,
    /// Gun type name or table key
    #[arg(long = "type")]
    gun_type: Option<String>,
    #[arg(long)]
    guild: Option<String>,
    #[arg(long)]
    rarity: Option<Rarity>,
    /// Stat table balance profile
    #[arg(long)]
    balance: Option<String>,
    /// Always allow the element roll
    #[arg(long)]
    force_element: bool,
    /// Fixed elements (repeatable)
    #[arg(long = "element")]
    elements: Vec<Element>,
    /// Bonus element damage die, e.g. 1d6
    #[arg(long)]
    element_damage: Option<String>,
    /// none, random, "random (epics+)", "random (legendaries)" or a table key
    #[arg(long, default_value = "none")]
    prefix: ModifierChoice,
    #[arg(long, default_value = "none")]
    red_text: ModifierChoice,
    #[arg(long)]
    art: Option<String>,
    /// Print FoundryVTT item JSON
    #[arg(long)]
    foundry: bool,
    /// Leave the red text effect out of the FoundryVTT player view
    #[arg(long, requires = "foundry")]
    hide_red_text: bool,
}

#[derive(Args, Debug)]
struct ShieldArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    guild: Option<String>,
    #[arg(long)]
    tier: Option<String>,
    #[arg(long)]
    capacity: Option<u32>,
    #[arg(long)]
    recharge: Option<u32>,
    #[arg(long)]
    effect: Option<String>,
    #[arg(long)]
    art: Option<String>,
}

#[derive(Args, Debug)]
struct RelicArgs {
    /// Relic table key
    #[arg(long)]
    id: Option<String>,
    #[arg(long)]
    rarity: Option<Rarity>,
    #[arg(long = "type")]
    kind: Option<String>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    effect: Option<String>,
    #[arg(long)]
    class: Option<String>,
    #[arg(long)]
    class_effect: Option<String>,
    #[arg(long)]
    art: Option<String>,
}

#[derive(Args, Debug)]
struct GrenadeArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    guild: Option<String>,
    #[arg(long)]
    tier: Option<String>,
    #[arg(long)]
    damage: Option<String>,
    #[arg(long = "type")]
    kind: Option<String>,
    #[arg(long)]
    effect: Option<String>,
    #[arg(long)]
    element: Option<Element>,
    #[arg(long)]
    art: Option<String>,
}

#[derive(Args, Debug)]
struct PotionArgs {
    /// Potion table key or roll
    #[arg(long)]
    id: Option<String>,
    #[arg(long)]
    art: Option<String>,
}

#[derive(Args, Debug)]
struct MeleeArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    level: Option<String>,
    #[arg(long)]
    guild: Option<String>,
    #[arg(long)]
    rarity: Option<Rarity>,
    #[arg(long)]
    force_element: bool,
    #[arg(long = "element")]
    elements: Vec<Element>,
    #[arg(long)]
    element_damage: Option<String>,
    #[arg(long, default_value = "none")]
    prefix: ModifierChoice,
    #[arg(long)]
    red_text_name: Option<String>,
    #[arg(long, requires = "red_text_name")]
    red_text_info: Option<String>,
    #[arg(long)]
    art: Option<String>,
}

impl Category {
    fn into_request(self) -> ItemRequest {
        match self {
            Category::Gun(a) => ItemRequest::Gun(GunOptions {
                name: a.name,
                item_level: a.level,
                gun_type: a.gun_type,
                guild: a.guild,
                rarity: a.rarity,
                balance: a.balance,
                force_element: a.force_element,
                elements: a.elements,
                element_damage: a.element_damage,
                prefix: a.prefix,
                red_text: a.red_text,
                art: a.art,
            }),
            Category::Shield(a) => ItemRequest::Shield(ShieldOptions {
                name: a.name,
                guild: a.guild,
                tier: a.tier,
                capacity: a.capacity,
                recharge: a.recharge,
                effect: a.effect,
                art: a.art,
            }),
            Category::Relic(a) => ItemRequest::Relic(RelicOptions {
                id: a.id,
                rarity: a.rarity,
                kind: a.kind,
                name: a.name,
                effect: a.effect,
                class_effect: a.class_effect,
                class: a.class,
                art: a.art,
            }),
            Category::Grenade(a) => ItemRequest::Grenade(GrenadeOptions {
                name: a.name,
                guild: a.guild,
                tier: a.tier,
                damage: a.damage,
                kind: a.kind,
                effect: a.effect,
                element: a.element,
                art: a.art,
            }),
            Category::Potion(a) => ItemRequest::Potion(PotionOptions { id: a.id, art: a.art }),
            Category::Melee(a) => ItemRequest::Melee(MeleeOptions {
                name: a.name,
                item_level: a.level,
                guild: a.guild,
                rarity: a.rarity,
                force_element: a.force_element,
                elements: a.elements,
                element_damage: a.element_damage,
                prefix: a.prefix,
                red_text: a
                    .red_text_name
                    .map(|name| Modifier::new(name, a.red_text_info.unwrap_or_default())),
                art: a.art,
            }),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::ExportRules { dir } => {
            let written = export_default_rules(&dir)
                .with_context(|| format!("exporting rules to {}", dir.display()))?;
            for path in written {
                println!("{}", path.display());
            }
            Ok(())
        }
        Command::Generate { run, category } => run_generate(run, category),
    }
}

fn run_generate(run: RunArgs, category: Category) -> Result<()> {
    let rules = match &run.rules {
        Some(dir) => RuleSet::load_from_dir(dir)
            .with_context(|| format!("loading rules from {}", dir.display()))?,
        None => RuleSet::new(),
    };

    let foundry = match &category {
        Category::Gun(a) if a.foundry => Some(a.hide_red_text),
        _ => None,
    };

    let mut rolls = match run.seed {
        Some(seed) => {
            log::info!("Using seed {}", seed);
            SeededRolls::new(seed)
        }
        None => SeededRolls::from_entropy(),
    };

    let request = category.into_request();
    let mut items = Vec::with_capacity(run.count);
    for _ in 0..run.count {
        items.push(generate(&rules, &request, &mut rolls, &mut NoArt)?);
    }

    if let Some(hide_red_text) = foundry {
        let exported: Vec<_> = items
            .iter()
            .filter_map(|item| match item {
                Item::Gun(gun) => Some(gun_to_foundry(gun, hide_red_text)),
                _ => None,
            })
            .collect();
        print_json(&exported)?;
    } else if run.json {
        print_json(&items)?;
    } else {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                println!();
            }
            print!("{}", item);
        }
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(values: &[T]) -> Result<()> {
    let text = match values {
        [single] => serde_json::to_string_pretty(single)?,
        many => serde_json::to_string_pretty(many)?,
    };
    println!("{}", text);
    Ok(())
}
