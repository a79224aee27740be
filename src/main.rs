//! Headless battle runner
//!
//! Runs a full battle to completion and prints a JSON or text summary.
//! Useful for tuning the combat constants and for deterministic replays:
//! the same seed always produces the same battle.

use armies::{
    Allegiance, BattleEvent, BattleOutcome, FormationTemplate, SimulationConfig,
    SimulationContext, Vec2,
};
use clap::Parser;
use serde::Serialize;

/// Headless battle runner - fight a battle and report the outcome
#[derive(Parser, Debug)]
#[command(name = "armies")]
#[command(about = "Run a headless battle and output the result")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum ticks before calling the battle a draw
    #[arg(long, default_value_t = 20_000)]
    max_ticks: u64,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Enable verbose per-event logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct BattleResult {
    outcome: String,
    ticks: u64,
    player_losses: usize,
    enemy_losses: usize,
    arrows_loosed: usize,
    melee_strikes: usize,
    seed: u64,
}

/// The stock battle: a deep block of player infantry screened by archers,
/// against two thin enemy archer lines
fn player_formation() -> FormationTemplate {
    let mut rows = vec![vec![1u8; 25]; 11];
    rows.extend(vec![vec![3u8; 25]; 2]);
    FormationTemplate::new(rows).expect("stock formation is well-formed")
}

fn enemy_formation() -> FormationTemplate {
    FormationTemplate::uniform(2, 25, 3).expect("stock formation is well-formed")
}

fn main() {
    let args = Args::parse();

    let filter = if args.verbose {
        "armies=debug"
    } else {
        "armies=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!("Starting battle with seed {seed}");

    let config = SimulationConfig::default();
    let mut ctx = match SimulationContext::with_seed(config, seed) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Failed to set up battle: {e}");
            std::process::exit(1);
        }
    };

    ctx.spawn_unit(player_formation(), Allegiance::Player, Vec2::new(650.0, 250.0));
    ctx.spawn_unit(enemy_formation(), Allegiance::Enemy, Vec2::new(650.0, 800.0));

    let player_strength = ctx.roster(Allegiance::Player).len();
    let enemy_strength = ctx.roster(Allegiance::Enemy).len();

    let dt = ctx.config().tick_seconds;
    let mut arrows_loosed = 0;
    let mut melee_strikes = 0;
    let mut ticks = 0;

    for _ in 0..args.max_ticks {
        let events = ctx.advance(dt);
        ticks += 1;
        for event in &events {
            match event {
                BattleEvent::ArrowLaunched { .. } => arrows_loosed += 1,
                BattleEvent::MeleeStrike { .. } => melee_strikes += 1,
                BattleEvent::SoldierDied { soldier, tick } => {
                    tracing::info!("soldier {:?} fell on tick {}", soldier, tick);
                }
                _ => {}
            }
        }
        if ctx.outcome() != BattleOutcome::InProgress {
            break;
        }
    }

    let outcome = match ctx.outcome() {
        BattleOutcome::Victory { winner } => format!("{winner:?} victory"),
        BattleOutcome::Stalemate => "stalemate".to_string(),
        BattleOutcome::InProgress => "draw (tick limit)".to_string(),
    };

    let result = BattleResult {
        outcome,
        ticks,
        player_losses: player_strength - ctx.roster(Allegiance::Player).len(),
        enemy_losses: enemy_strength - ctx.roster(Allegiance::Enemy).len(),
        arrows_loosed,
        melee_strikes,
        seed,
    };

    if args.format == "json" {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).expect("result serializes")
        );
    } else {
        println!("Outcome: {}", result.outcome);
        println!("Ticks:   {}", result.ticks);
        println!(
            "Losses:  player {} / enemy {}",
            result.player_losses, result.enemy_losses
        );
        println!(
            "Fire:    {} arrows, {} melee strikes",
            result.arrows_loosed, result.melee_strikes
        );
        println!("Seed:    {}", result.seed);
    }
}
