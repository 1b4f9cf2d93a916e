use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use minestalker_core::{AdversaryRules, Difficulty, EndCause, RandomDice, RoundController, RoundStats};
use serde::Serialize;

use crate::bot::Bot;

#[derive(Args, Debug)]
pub(crate) struct SimulateArgs {
    /// Tier whose board preset is played
    #[arg(short, long, default_value = "easy")]
    difficulty: Difficulty,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// How many rounds to play; round N uses seed + N
    #[arg(short, long, default_value_t = 1)]
    games: u32,

    /// Give up on a round after this many bot actions
    #[arg(long, default_value_t = 2_000)]
    max_turns: u32,

    /// TOML file overriding the adversary rules
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Print one JSON object per round
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct SimulatedRound {
    game: u32,
    seed: u64,
    actions: u32,
    end_cause: Option<EndCause>,
    score: Option<u32>,
    stats: RoundStats,
}

fn load_rules(path: &Path) -> Result<AdversaryRules> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Could not read rules file {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Invalid rules in {}", path.display()))
}

pub(crate) fn run(args: &SimulateArgs) -> Result<()> {
    let rules = match &args.rules {
        Some(path) => load_rules(path)?,
        None => AdversaryRules::default(),
    };
    let config = args.difficulty.config_with_rules(rules);
    config
        .validate()
        .with_context(|| format!("Rules do not fit the {} board", args.difficulty))?;

    let base_seed = args.seed.unwrap_or_else(rand::random);
    log::info!("Simulating {} {} round(s) from seed {}", args.games, args.difficulty, base_seed);

    let mut wins = 0;
    for game in 0..args.games {
        let seed = base_seed.wrapping_add(u64::from(game));
        let mut round = RoundController::new(config, RandomDice::from_seed(seed))
            .with_context(|| format!("Could not set up round {game}"))?;
        let actions = Bot::new(seed).play(&mut round, args.max_turns)?;
        if !round.is_finished() {
            round.quit();
        }

        let result = SimulatedRound {
            game,
            seed,
            actions,
            end_cause: round.end_cause(),
            score: round.score(),
            stats: round.stats(),
        };
        if result.score.is_some() {
            wins += 1;
        }

        if args.json {
            println!("{}", serde_json::to_string(&result)?);
        } else {
            println!(
                "#{:<3} seed {:<20} {:?} after {} actions, {} turns, {} safe cells hidden, {} adversaries defeated ({:?})",
                result.game,
                result.seed,
                result.stats.state,
                result.actions,
                result.stats.turns,
                result.stats.safe_cells_remaining,
                result.stats.adversaries_defeated,
                result.end_cause,
            );
        }
    }

    log::info!("Won {} of {} rounds", wins, args.games);
    Ok(())
}
