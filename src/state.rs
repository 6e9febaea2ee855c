use serde::{Deserialize, Serialize};

use crate::card::{Card, NUM_FOUNDATIONS, NUM_FREECELLS, NUM_TABLEAUS, Suit};

/// Read-only snapshot of a board, used for rendering and comparisons.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardView {
    pub freecells: [Option<Card>; NUM_FREECELLS],
    /// Indexed by [`Suit::index`], bottom card first.
    pub foundations: [Vec<Card>; NUM_FOUNDATIONS],
    /// Bottom card first.
    pub tableaus: [Vec<Card>; NUM_TABLEAUS],
    pub moves_played: usize,
    pub initialized: bool,
}

impl BoardView {
    pub fn foundation_top(&self, suit: Suit) -> Option<Card> {
        self.foundations[suit.index()].last().copied()
    }

    pub fn card_count(&self) -> usize {
        self.freecells.iter().flatten().count()
            + self.foundations.iter().map(Vec::len).sum::<usize>()
            + self.tableaus.iter().map(Vec::len).sum::<usize>()
    }
}
