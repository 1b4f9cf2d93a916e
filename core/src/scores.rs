use serde::{Deserialize, Serialize};

use crate::*;

/// Entries kept per list; worse scores fall off the end.
pub const MAX_RANKED_SCORES: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub score: u32,
    pub name: String,
    pub recent: bool,
}

/// Best scores of one tier, lowest (fastest) first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedScoreList {
    entries: Vec<RankedEntry>,
}

impl RankedScoreList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts after every entry with an equal or better score and drops whatever falls past the
    /// cap. Returns the 1-indexed rank of the new entry, or `None` when it did not make the list.
    pub fn insert(&mut self, score: u32, name: impl Into<String>, mark_recent: bool) -> Option<usize> {
        let position = self.entries.partition_point(|entry| entry.score <= score);
        if position >= MAX_RANKED_SCORES {
            return None;
        }

        if mark_recent {
            for entry in &mut self.entries {
                entry.recent = false;
            }
        }
        self.entries.insert(
            position,
            RankedEntry {
                score,
                name: name.into(),
                recent: mark_recent,
            },
        );
        self.entries.truncate(MAX_RANKED_SCORES);

        Some(position + 1)
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry_at(&self, rank: usize) -> Result<&RankedEntry> {
        rank.checked_sub(1)
            .and_then(|index| self.entries.get(index))
            .ok_or(GameError::RankOutOfRange {
                rank,
                count: self.count(),
            })
    }

    pub fn score_at(&self, rank: usize) -> Result<u32> {
        self.entry_at(rank).map(|entry| entry.score)
    }

    pub fn name_at(&self, rank: usize) -> Result<&str> {
        self.entry_at(rank).map(|entry| entry.name.as_str())
    }

    /// Rank of the entry submitted last, if it is still listed.
    pub fn index_of_most_recent(&self) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.recent)
            .map(|index| index + 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankedEntry> {
        self.entries.iter()
    }
}

/// One ranked list per difficulty tier.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    tiers: [RankedScoreList; 4],
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self, difficulty: Difficulty) -> &RankedScoreList {
        &self.tiers[difficulty.slot()]
    }

    pub fn list_mut(&mut self, difficulty: Difficulty) -> &mut RankedScoreList {
        &mut self.tiers[difficulty.slot()]
    }

    pub fn insert(
        &mut self,
        difficulty: Difficulty,
        score: u32,
        name: impl Into<String>,
        mark_recent: bool,
    ) -> Option<usize> {
        self.list_mut(difficulty).insert(score, name, mark_recent)
    }

    /// Every entry, tier by tier in [`Difficulty::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Difficulty, &RankedEntry)> {
        Difficulty::ALL
            .into_iter()
            .flat_map(|difficulty| self.list(difficulty).iter().map(move |entry| (difficulty, entry)))
    }
}
