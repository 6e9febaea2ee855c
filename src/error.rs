use thiserror::Error;

use crate::card::Suit;

/// Errors that can occur when manipulating the board.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("malformed move: {0}")]
    Parse(#[from] ParseMoveError),
    #[error("illegal move: {0}")]
    IllegalMove(#[from] IllegalMove),
    #[error("invalid card: {0}")]
    Card(#[from] CardError),
    #[error("invalid deal: {0}")]
    InvalidDeal(&'static str),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
}

/// Rejected card construction input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CardError {
    #[error("rank {0} is outside 1..=13")]
    InvalidRank(u8),
    #[error("unknown rank token {0:?}")]
    UnknownRank(String),
    #[error("unknown suit token {0:?}")]
    UnknownSuit(String),
    #[error("card id {0} is outside 1..=52")]
    InvalidId(u8),
}

/// Reasons a move string fails to decode.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseMoveError {
    #[error("expected exactly one ';' between source and destination")]
    MissingSeparator,
    #[error("source and destination must both be present")]
    EmptySide,
    #[error("unknown target {0:?}, expected T, F or D")]
    UnknownTarget(char),
    #[error("foundation targets need a suit letter, got {0:?}")]
    ExpectedSuit(String),
    #[error("tableau and freecell targets need a number, got {0:?}")]
    ExpectedNumber(String),
    #[error("unknown suit token {0:?}")]
    UnknownSuit(String),
    #[error("slot numbers start at 1")]
    ZeroIndex,
    #[error("only tableau sources may carry a run size")]
    SizeOnNonTableau,
    #[error("the destination cannot carry a run size")]
    SizeOnDestination,
    #[error("invalid run size {0:?}")]
    InvalidSize(String),
}

/// Details of moves rejected by the rules.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IllegalMove {
    #[error("tableau {0} does not exist")]
    TableauIndex(usize),
    #[error("freecell {0} does not exist")]
    FreecellIndex(usize),
    #[error("no card available in the selected source")]
    NoCardAvailable,
    #[error("source and destination are the same")]
    SameLocation,
    #[error("freecell {0} is already occupied")]
    FreecellOccupied(usize),
    #[error("card must be one rank lower and of the opposite colour")]
    PatienceMismatch,
    #[error("card does not belong on the {0:?} foundation")]
    SuitMismatch(Suit),
    #[error("an empty foundation only accepts an ace")]
    FoundationNeedsAce,
    #[error("card does not continue the foundation sequence")]
    FoundationMismatch,
    #[error("run of {requested} requested but only {available} cards are in sequence")]
    RunTooLong { requested: usize, available: usize },
    #[error("runs may only be moved onto a tableau")]
    SuperMoveDestination,
    #[error("run of {requested} exceeds the free capacity of {capacity}")]
    ExceedsCapacity { requested: usize, capacity: usize },
}
