//! Plain-text score records, one per line: `difficulty score name`.
//!
//! The name is the rest of the line and may contain spaces.

use core::fmt;
use core::str::FromStr;

use minestalker_core::{Difficulty, Leaderboard, MAX_RANKED_SCORES};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("missing {0} field")]
    MissingField(&'static str),
    #[error("score {0:?} is not a whole number of seconds")]
    BadScore(String),
    #[error("unknown difficulty {0:?}")]
    UnknownDifficulty(String),
    #[error("empty player name")]
    EmptyName,
}

pub type Result<T> = core::result::Result<T, RecordError>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub difficulty: Difficulty,
    pub score: u32,
    pub name: String,
}

impl fmt::Display for ScoreRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.difficulty, self.score, self.name)
    }
}

impl FromStr for ScoreRecord {
    type Err = RecordError;

    fn from_str(line: &str) -> Result<Self> {
        let mut fields = line.splitn(3, ' ');

        let difficulty = fields
            .next()
            .filter(|field| !field.is_empty())
            .ok_or(RecordError::MissingField("difficulty"))?;
        let difficulty = difficulty
            .parse::<Difficulty>()
            .map_err(|_| RecordError::UnknownDifficulty(difficulty.to_owned()))?;

        let score = fields.next().ok_or(RecordError::MissingField("score"))?;
        let score = score
            .parse::<u32>()
            .map_err(|_| RecordError::BadScore(score.to_owned()))?;

        let name = fields.next().ok_or(RecordError::MissingField("name"))?;
        if name.trim().is_empty() {
            return Err(RecordError::EmptyName);
        }

        Ok(Self {
            difficulty,
            score,
            name: name.to_owned(),
        })
    }
}

/// A line that could not be read back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-indexed line number.
    pub line: usize,
    pub error: RecordError,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedRecords {
    pub records: Vec<ScoreRecord>,
    pub skipped: Vec<SkippedLine>,
}

/// Reads every well-formed record, skipping blank lines silently and malformed ones with a warning.
pub fn parse_records(text: &str) -> ParsedRecords {
    let mut parsed = ParsedRecords::default();

    for (index, line) in text.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<ScoreRecord>() {
            Ok(record) => parsed.records.push(record),
            Err(error) => {
                log::warn!("Skipping score line {}: {}", index + 1, error);
                parsed.skipped.push(SkippedLine {
                    line: index + 1,
                    error,
                });
            }
        }
    }

    log::debug!(
        "Loaded {} score records, skipped {}",
        parsed.records.len(),
        parsed.skipped.len()
    );
    parsed
}

/// Files records into their tiers in file order, none of them marked as recent.
pub fn leaderboard_from_records<'a>(records: impl IntoIterator<Item = &'a ScoreRecord>) -> Leaderboard {
    let mut board = Leaderboard::new();
    for record in records {
        board.insert(record.difficulty, record.score, record.name.clone(), false);
    }
    board
}

pub fn load_leaderboard(text: &str) -> (Leaderboard, Vec<SkippedLine>) {
    let parsed = parse_records(text);
    (leaderboard_from_records(&parsed.records), parsed.skipped)
}

/// Serializes a leaderboard tier by tier (easy, medium, hard, secret), best first.
pub fn write_records(board: &Leaderboard) -> String {
    let mut out = String::new();
    for difficulty in Difficulty::ALL {
        for entry in board.list(difficulty).iter().take(MAX_RANKED_SCORES) {
            let record = ScoreRecord {
                difficulty,
                score: entry.score,
                name: entry.name.clone(),
            };
            out.push_str(&record.to_string());
            out.push('\n');
        }
    }
    out
}
