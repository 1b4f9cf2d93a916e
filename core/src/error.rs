use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Board must have at least one row and one column")]
    InvalidBoardSize,
    #[error("Rank {rank} is out of range, list holds {count} entries")]
    RankOutOfRange { rank: usize, count: usize },
    #[error("Unknown difficulty")]
    UnknownDifficulty,
    #[error("Adversary rule `{0}` must be at least 1")]
    InvalidRules(&'static str),
}

pub type Result<T> = core::result::Result<T, GameError>;
