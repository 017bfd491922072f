//! mu-sim: headless monster arena
//!
//! Loads the reward rates and catalogs, spawns monsters and scripted
//! fighters on one map and ticks the world, logging every notification.

mod arena;

use std::error::Error;
use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mu_core::GameRng;
use mu_core::combat::AttackProfile;
use mu_core::magic::{SkillCatalog, SpellId};
use mu_core::map::Cell;
use mu_core::monster::MonsterCatalog;
use mu_core::object::ItemCatalog;
use mu_core::world::{ServerRates, millis};

use arena::Arena;

const ITEMS_JSON: &str = include_str!("../../mu-core/data/items.json");
const SKILLS_JSON: &str = include_str!("../../mu-core/data/skills.json");
const MONSTERS_JSON: &str = include_str!("../../mu-core/data/monsters.json");

/// Headless monster arena
#[derive(Parser, Debug)]
#[command(name = "mu-sim")]
#[command(author, version, about = "Tick a monster arena and log what happens", long_about = None)]
struct Args {
    /// Reward rates file (JSON); built-in defaults when omitted
    #[arg(long)]
    rates: Option<PathBuf>,

    /// Directory holding items.json, skills.json and monsters.json;
    /// the bundled catalogs when omitted
    #[arg(long)]
    data: Option<PathBuf>,

    /// Number of frames to run
    #[arg(long, default_value_t = 6_000)]
    ticks: u32,

    /// RNG seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Number of monsters to spawn
    #[arg(long, default_value_t = 12)]
    monsters: usize,

    /// Frame length in milliseconds
    #[arg(long = "tick-ms", default_value_t = 100)]
    tick_ms: u32,
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let args = Args::parse();

    let rates = match &args.rates {
        Some(path) => ServerRates::load_from_file(path)?,
        None => ServerRates::default(),
    };
    let (items, skills, monsters) = match &args.data {
        Some(dir) => (
            ItemCatalog::load_from_file(&dir.join("items.json"))?,
            SkillCatalog::load_from_file(&dir.join("skills.json"))?,
            MonsterCatalog::load_from_file(&dir.join("monsters.json"))?,
        ),
        None => (
            ItemCatalog::parse(ITEMS_JSON)?,
            SkillCatalog::parse(SKILLS_JSON)?,
            MonsterCatalog::parse(MONSTERS_JSON)?,
        ),
    };

    let rng = match args.seed {
        Some(seed) => GameRng::new(seed),
        None => GameRng::from_entropy(),
    };
    info!(
        seed = rng.seed(),
        items = items.len(),
        species = monsters.len(),
        experience_rate = rates.experience,
        zen_rate = rates.zen,
        drop_rate = rates.drop_rate,
        "arena_starting"
    );

    let mut arena = Arena::new(Utc::now(), rng, items, skills, rates, millis(args.tick_ms));
    arena.populate(&monsters, args.monsters);
    if let Some(&first) = monsters.ids().first() {
        arena.add_npc(&monsters, first, Cell::new(62, 58));
    }
    arena.add_fighter(
        20,
        1_500,
        AttackProfile {
            success: 60,
            damage_min: 25,
            damage_max: 40,
            ..Default::default()
        },
        false,
    );
    arena.add_fighter(
        45,
        2_500,
        AttackProfile {
            success: 120,
            damage_min: 50,
            damage_max: 80,
            spell: Some(SpellId(3)),
            spell_damage: Some((17, 22)),
        },
        true,
    );
    arena.add_fighter(
        80,
        4_000,
        AttackProfile {
            success: 200,
            damage_min: 90,
            damage_max: 140,
            ..Default::default()
        },
        false,
    );

    for _ in 0..args.ticks {
        arena.step();
    }

    let stats = arena.stats();
    info!(
        ticks = args.ticks,
        moves = stats.moves,
        attack_results = stats.attack_results,
        monster_deaths = stats.deaths,
        kill_reports = stats.kills,
        player_deaths = stats.player_deaths,
        item_drops = stats.item_drops,
        zen_dropped = stats.zen_dropped,
        "arena_finished"
    );
    for (player, experience) in arena.experience() {
        info!(player = player.0, experience, "fighter_experience");
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
