//! Freecell rules engine: board zones, move decoding, move validation and supermoves.

pub mod board;
pub mod card;
pub mod error;
pub mod moves;
pub mod pile;
pub mod state;
pub mod visualize;

pub use crate::board::{Board, BoardBuilder, BoardConfig, DEFAULT_SEED, SupermoveRule};
pub use crate::card::{Card, Color, Rank, Suit};
pub use crate::error::{CardError, GameError, IllegalMove, ParseMoveError};
pub use crate::moves::{Location, MoveCommand, Source, SuperMove, Target, decode_move_string};
pub use crate::pile::Pile;
pub use crate::state::BoardView;
pub use crate::visualize::{
    VisualOptions, color_card_string, describe_move, render_board, render_board_with_options,
};
