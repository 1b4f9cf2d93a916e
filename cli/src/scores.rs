use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use minestalker_core::{Difficulty, Leaderboard};
use minestalker_protocol::{load_leaderboard, write_records};

#[derive(Subcommand, Debug)]
pub(crate) enum ScoresCommand {
    /// Print the ranked tables
    Show {
        #[arg(short, long)]
        file: PathBuf,

        /// Only this tier
        #[arg(short, long)]
        difficulty: Option<Difficulty>,
    },
    /// Add a score as the most recent entry and save the file
    Submit {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long)]
        difficulty: Difficulty,

        /// Seconds taken to win
        #[arg(short, long)]
        score: u32,

        #[arg(short, long)]
        name: String,
    },
}

/// A missing file is an empty leaderboard.
fn load(path: &Path) -> Result<Leaderboard> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            log::info!("{} does not exist yet", path.display());
            String::new()
        }
        Err(err) => {
            return Err(err).with_context(|| format!("Could not read scores from {}", path.display()));
        }
    };

    let (board, skipped) = load_leaderboard(&text);
    if !skipped.is_empty() {
        log::warn!("Ignored {} malformed line(s) in {}", skipped.len(), path.display());
    }
    Ok(board)
}

fn print_tier(board: &Leaderboard, difficulty: Difficulty) {
    println!("{difficulty}");
    let list = board.list(difficulty);
    if list.is_empty() {
        println!("  (no scores)");
    }
    for (index, entry) in list.iter().enumerate() {
        let marker = if entry.recent { "*" } else { " " };
        println!("{marker}{:>3}. {:>6}s  {}", index + 1, entry.score, entry.name);
    }
}

pub(crate) fn run(command: ScoresCommand) -> Result<()> {
    match command {
        ScoresCommand::Show { file, difficulty } => {
            let board = load(&file)?;
            match difficulty {
                Some(difficulty) => print_tier(&board, difficulty),
                None => Difficulty::ALL
                    .into_iter()
                    .for_each(|difficulty| print_tier(&board, difficulty)),
            }
        }
        ScoresCommand::Submit {
            file,
            difficulty,
            score,
            name,
        } => {
            let mut board = load(&file)?;
            let rank = board.insert(difficulty, score, name, true);
            fs::write(&file, write_records(&board))
                .with_context(|| format!("Could not write scores to {}", file.display()))?;

            match rank {
                Some(rank) => println!("Ranked #{rank} on {difficulty}"),
                None => println!("Did not place on {difficulty}"),
            }
        }
    }
    Ok(())
}
