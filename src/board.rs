use std::array::from_fn;

use log::{debug, trace, warn};
use rand::seq::SliceRandom;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::card::{Card, NUM_CARDS, NUM_FOUNDATIONS, NUM_FREECELLS, NUM_TABLEAUS, Rank, Suit};
use crate::error::{GameError, IllegalMove};
use crate::moves::{Location, MoveCommand, Source, decode_move_string};
use crate::pile::Pile;
use crate::state::BoardView;

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 0xF4EE_CE11_5EED_0052;

/// How large a supermove may be.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum SupermoveRule {
    /// Any run that is in sequence may move.
    #[default]
    Unrestricted,
    /// Runs are capped at `(empty freecells + 1) * 2^(empty tableaus)`,
    /// not counting the destination column.
    FreeCellCapacity,
}

/// Configuration required to bootstrap a board.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub seed: u64,
    pub supermove_rule: SupermoveRule,
}

impl BoardConfig {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            supermove_rule: SupermoveRule::default(),
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

/// Builder that enables deterministic deals and hand-made positions.
pub struct BoardBuilder {
    config: BoardConfig,
    order: Option<Vec<u8>>,
    tableaus: Vec<(usize, Vec<Card>)>,
    freecells: Vec<(usize, Card)>,
    foundations: Vec<(Suit, Vec<Card>)>,
}

impl BoardBuilder {
    pub fn new() -> Self {
        Self {
            config: BoardConfig::default(),
            order: None,
            tableaus: Vec::new(),
            freecells: Vec::new(),
            foundations: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn with_supermove_rule(mut self, rule: SupermoveRule) -> Self {
        self.config.supermove_rule = rule;
        self
    }

    /// Deal this permutation of card ids instead of a seeded shuffle.
    pub fn with_order(mut self, ids: Vec<u8>) -> Self {
        self.order = Some(ids);
        self
    }

    /// Place `cards` (bottom first) on tableau `column` (1-based). Any layout
    /// call replaces the deal with an explicit position.
    pub fn with_tableau(mut self, column: usize, cards: Vec<Card>) -> Self {
        self.tableaus.push((column, cards));
        self
    }

    pub fn with_freecell(mut self, cell: usize, card: Card) -> Self {
        self.freecells.push((cell, card));
        self
    }

    /// Foundation cards must run Ace upward in `suit`.
    pub fn with_foundation(mut self, suit: Suit, cards: Vec<Card>) -> Self {
        self.foundations.push((suit, cards));
        self
    }

    pub fn build(self) -> Result<Board, GameError> {
        let has_layout =
            !self.tableaus.is_empty() || !self.freecells.is_empty() || !self.foundations.is_empty();
        if has_layout {
            if self.order.is_some() {
                return Err(GameError::InvalidConfiguration(
                    "an explicit layout cannot be combined with a deal order",
                ));
            }
            return Board::from_layout(self);
        }

        let mut board = Board::new(self.config);
        match self.order {
            Some(order) => board.deal_order(&order)?,
            None => {
                let mut rng = StdRng::seed_from_u64(self.config.seed);
                board.deal(&mut rng)?;
            }
        }
        Ok(board)
    }
}

impl Default for BoardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Freecell board: foundations, freecells, tableaus and the applied-move log.
#[derive(Clone, Debug)]
pub struct Board {
    config: BoardConfig,
    foundations: [Pile; NUM_FOUNDATIONS],
    freecells: [Option<Card>; NUM_FREECELLS],
    tableaus: [Pile; NUM_TABLEAUS],
    history: Vec<MoveCommand>,
    initialized: bool,
}

impl Board {
    pub fn builder() -> BoardBuilder {
        BoardBuilder::new()
    }

    /// An empty, undealt board.
    pub fn new(config: BoardConfig) -> Self {
        Self {
            config,
            foundations: from_fn(|_| Pile::new()),
            freecells: [None; NUM_FREECELLS],
            tableaus: from_fn(|_| Pile::new()),
            history: Vec::new(),
            initialized: false,
        }
    }

    pub fn config(&self) -> BoardConfig {
        self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn history(&self) -> &[MoveCommand] {
        &self.history
    }

    pub fn foundation(&self, suit: Suit) -> &Pile {
        &self.foundations[suit.index()]
    }

    pub fn freecells(&self) -> &[Option<Card>; NUM_FREECELLS] {
        &self.freecells
    }

    pub fn tableaus(&self) -> &[Pile; NUM_TABLEAUS] {
        &self.tableaus
    }

    /// Tableau by 1-based column number.
    pub fn tableau(&self, column: usize) -> Option<&Pile> {
        column.checked_sub(1).and_then(|idx| self.tableaus.get(idx))
    }

    /// Cards currently on the board across all zones.
    pub fn card_count(&self) -> usize {
        self.foundations.iter().map(Pile::len).sum::<usize>()
            + self.freecells.iter().flatten().count()
            + self.tableaus.iter().map(Pile::len).sum::<usize>()
    }

    pub fn view(&self) -> BoardView {
        BoardView {
            freecells: self.freecells,
            foundations: from_fn(|idx| self.foundations[idx].cards().to_vec()),
            tableaus: from_fn(|idx| self.tableaus[idx].cards().to_vec()),
            moves_played: self.history.len(),
            initialized: self.initialized,
        }
    }

    /// Empties every zone and the move log so the board can be dealt again.
    pub fn reset(&mut self) {
        self.foundations.iter_mut().for_each(Pile::clear);
        self.freecells = [None; NUM_FREECELLS];
        self.tableaus.iter_mut().for_each(Pile::clear);
        self.history.clear();
        self.initialized = false;
    }

    /// Shuffles the deck with `rng` and deals it. Does nothing if the board
    /// has already been dealt.
    pub fn deal<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), GameError> {
        if self.initialized {
            warn!("deal ignored: board is already dealt");
            return Ok(());
        }
        let mut ids: Vec<u8> = (1..=NUM_CARDS as u8).collect();
        ids.shuffle(rng);
        self.deal_order(&ids)
    }

    /// Deals `ids` round-robin across the tableaus, first id to tableau 1.
    /// `ids` must be a permutation of `1..=52`.
    pub fn deal_order(&mut self, ids: &[u8]) -> Result<(), GameError> {
        if self.initialized {
            warn!("deal ignored: board is already dealt");
            return Ok(());
        }
        if ids.len() != NUM_CARDS {
            return Err(GameError::InvalidDeal("expected exactly 52 card ids"));
        }
        let mut seen = [false; NUM_CARDS + 1];
        let mut cards = Vec::with_capacity(NUM_CARDS);
        for &id in ids {
            let card = Card::from_id(id)?;
            if std::mem::replace(&mut seen[id as usize], true) {
                return Err(GameError::InvalidDeal("duplicate card id"));
            }
            cards.push(card);
        }

        for (n, card) in cards.into_iter().enumerate() {
            self.tableaus[n % NUM_TABLEAUS].push(card);
        }
        self.initialized = true;
        debug!(
            "dealt 52 cards, column sizes {:?}",
            self.tableaus.iter().map(Pile::len).collect::<Vec<_>>()
        );
        Ok(())
    }

    /// Whether `move_text` decodes and is legal in the current position.
    pub fn can_move(&self, move_text: &str) -> bool {
        self.check(move_text).is_ok()
    }

    /// Decodes and validates `move_text` without changing the board.
    pub fn check(&self, move_text: &str) -> Result<MoveCommand, GameError> {
        let command = decode(move_text)?;
        if let Err(reason) = self.validate(&command) {
            trace!("rejected {command}: {reason}");
            return Err(reason.into());
        }
        Ok(command)
    }

    /// Decodes, validates and applies `move_text`.
    pub fn apply_move(&mut self, move_text: &str) -> Result<MoveCommand, GameError> {
        let command = decode(move_text)?;
        self.apply(command)?;
        Ok(command)
    }

    /// Applies an already decoded move. The board is untouched on error.
    pub fn apply(&mut self, command: MoveCommand) -> Result<(), GameError> {
        if let Err(reason) = self.validate(&command) {
            trace!("rejected {command}: {reason}");
            return Err(reason.into());
        }

        let cards: Vec<Card> = match command.source {
            Source::Super(run) => self.tableaus[run.column - 1].take_top(run.size),
            Source::Single(Location::Tableau(n)) => vec![self.tableaus[n - 1].pop()],
            Source::Single(Location::Freecell(n)) => self.freecells[n - 1].take().into_iter().collect(),
            Source::Single(Location::Foundation(suit)) => {
                vec![self.foundations[suit.index()].pop()]
            }
        };
        match command.destination {
            Location::Tableau(n) => self.tableaus[n - 1].extend(cards),
            Location::Freecell(n) => self.freecells[n - 1] = cards.into_iter().next(),
            Location::Foundation(suit) => self.foundations[suit.index()].extend(cards),
        }

        self.history.push(command);
        debug!("applied {command} (move {})", self.history.len());
        Ok(())
    }

    /// Checks a decoded move against the current position.
    pub fn validate(&self, command: &MoveCommand) -> Result<(), IllegalMove> {
        let moving = self.moving_card(&command.source)?;
        if command.source.location() == command.destination {
            return Err(IllegalMove::SameLocation);
        }

        if let Source::Super(run) = command.source {
            if !matches!(command.destination, Location::Tableau(_)) {
                return Err(IllegalMove::SuperMoveDestination);
            }
            if self.config.supermove_rule == SupermoveRule::FreeCellCapacity {
                let capacity = self.supermove_capacity(command.destination);
                if run.size > capacity {
                    return Err(IllegalMove::ExceedsCapacity {
                        requested: run.size,
                        capacity,
                    });
                }
            }
        }

        match command.destination {
            Location::Tableau(n) => match self.tableau_at(n)?.top_card() {
                None => Ok(()),
                Some(landing) if moving.can_place_patience(&landing) => Ok(()),
                Some(_) => Err(IllegalMove::PatienceMismatch),
            },
            Location::Freecell(n) => match self.freecell_at(n)? {
                None => Ok(()),
                Some(_) => Err(IllegalMove::FreecellOccupied(n)),
            },
            Location::Foundation(suit) => {
                if moving.suit() != suit {
                    return Err(IllegalMove::SuitMismatch(suit));
                }
                match self.foundations[suit.index()].top_card() {
                    None if moving.rank() == Rank::ACE => Ok(()),
                    None => Err(IllegalMove::FoundationNeedsAce),
                    Some(landing) if moving.can_place_foundation(&landing) => Ok(()),
                    Some(_) => Err(IllegalMove::FoundationMismatch),
                }
            }
        }
    }

    /// Largest run the free zones allow onto `destination`.
    pub fn supermove_capacity(&self, destination: Location) -> usize {
        let free_cells = self.freecells.iter().filter(|cell| cell.is_none()).count();
        let empty_columns = self
            .tableaus
            .iter()
            .enumerate()
            .filter(|(idx, pile)| pile.is_empty() && destination != Location::Tableau(idx + 1))
            .count();
        (free_cells + 1) << empty_columns
    }

    fn moving_card(&self, source: &Source) -> Result<Card, IllegalMove> {
        match source {
            Source::Super(run) => {
                let pile = self.tableau_at(run.column)?;
                let available = pile.stack_size();
                if run.size > available {
                    return Err(IllegalMove::RunTooLong {
                        requested: run.size,
                        available,
                    });
                }
                pile.from_top(run.size).ok_or(IllegalMove::NoCardAvailable)
            }
            Source::Single(Location::Tableau(n)) => self
                .tableau_at(*n)?
                .top_card()
                .ok_or(IllegalMove::NoCardAvailable),
            Source::Single(Location::Freecell(n)) => {
                self.freecell_at(*n)?.ok_or(IllegalMove::NoCardAvailable)
            }
            Source::Single(Location::Foundation(suit)) => self.foundations[suit.index()]
                .top_card()
                .ok_or(IllegalMove::NoCardAvailable),
        }
    }

    fn tableau_at(&self, column: usize) -> Result<&Pile, IllegalMove> {
        self.tableau(column).ok_or(IllegalMove::TableauIndex(column))
    }

    fn freecell_at(&self, cell: usize) -> Result<Option<Card>, IllegalMove> {
        cell.checked_sub(1)
            .and_then(|idx| self.freecells.get(idx))
            .copied()
            .ok_or(IllegalMove::FreecellIndex(cell))
    }

    fn from_layout(builder: BoardBuilder) -> Result<Self, GameError> {
        let BoardBuilder {
            config,
            tableaus,
            freecells,
            foundations,
            ..
        } = builder;
        let mut board = Board::new(config);
        let mut seen = [false; NUM_CARDS + 1];
        let mut claim = |card: Card| -> Result<(), GameError> {
            if std::mem::replace(&mut seen[card.id() as usize], true) {
                return Err(GameError::InvalidConfiguration("card placed more than once"));
            }
            Ok(())
        };

        for (column, cards) in tableaus {
            if !(1..=NUM_TABLEAUS).contains(&column) {
                return Err(GameError::InvalidConfiguration("tableau number out of range"));
            }
            for &card in &cards {
                claim(card)?;
            }
            board.tableaus[column - 1].extend(cards);
        }
        for (cell, card) in freecells {
            if !(1..=NUM_FREECELLS).contains(&cell) {
                return Err(GameError::InvalidConfiguration("freecell number out of range"));
            }
            if board.freecells[cell - 1].is_some() {
                return Err(GameError::InvalidConfiguration("freecell filled twice"));
            }
            claim(card)?;
            board.freecells[cell - 1] = Some(card);
        }
        for (suit, cards) in foundations {
            for (depth, &card) in cards.iter().enumerate() {
                if card.suit() != suit || card.rank().value() as usize != depth + 1 {
                    return Err(GameError::InvalidConfiguration(
                        "foundation cards must run ace upward in one suit",
                    ));
                }
                claim(card)?;
            }
            board.foundations[suit.index()].extend(cards);
        }

        board.initialized = true;
        debug!("built layout with {} cards", board.card_count());
        Ok(board)
    }
}

fn decode(move_text: &str) -> Result<MoveCommand, GameError> {
    decode_move_string(move_text).map_err(|err| {
        trace!("rejected {move_text:?}: {err}");
        GameError::from(err)
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use log::{LevelFilter, Log, Metadata, Record};

    use super::*;

    struct CaptureLogger {
        lines: Mutex<Vec<String>>,
    }

    impl Log for CaptureLogger {
        fn enabled(&self, _metadata: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            if let Ok(mut lines) = self.lines.lock() {
                lines.push(format!("{} {}", record.level(), record.args()));
            }
        }

        fn flush(&self) {}
    }

    static LOGGER: CaptureLogger = CaptureLogger {
        lines: Mutex::new(Vec::new()),
    };

    fn logged(needle: &str) -> bool {
        LOGGER
            .lines
            .lock()
            .map(|lines| lines.iter().any(|line| line.starts_with("TRACE") && line.contains(needle)))
            .unwrap_or(false)
    }

    fn cards(list: &[&str]) -> Vec<Card> {
        list.iter().map(|c| c.parse().expect("card")).collect()
    }

    #[test]
    fn new_board_is_empty_and_undealt() {
        let board = Board::new(BoardConfig::default());
        assert!(!board.is_initialized());
        assert_eq!(board.card_count(), 0);
        assert!(!board.can_move("T1;F1"));
    }

    #[test]
    fn every_rejection_path_is_traced() -> Result<(), GameError> {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(LevelFilter::Trace);
        let mut board = Board::builder()
            .with_tableau(1, cards(&["9S"]))
            .with_tableau(2, cards(&["9C"]))
            .build()?;

        assert!(!board.can_move("T1;T2"));
        assert!(logged("rejected T1;T2"));
        assert!(board.check("T7;F1").is_err());
        assert!(logged("rejected T7;F1"));
        assert!(board.apply_move("Q4;F1").is_err());
        assert!(logged("rejected \"Q4;F1\""));
        assert!(!board.can_move("T3,x;T4"));
        assert!(logged("rejected \"T3,x;T4\""));
        Ok(())
    }

    #[test]
    fn deal_is_idempotent() -> Result<(), GameError> {
        let mut board = Board::builder().with_seed(7).build()?;
        let before = board.view();
        let mut rng = StdRng::seed_from_u64(99);
        board.deal(&mut rng)?;
        assert_eq!(board.view(), before);
        Ok(())
    }

    #[test]
    fn reset_clears_everything() -> Result<(), GameError> {
        let mut board = Board::builder().with_seed(3).build()?;
        board.apply_move("T1;F1")?;
        assert_eq!(board.history().len(), 1);
        board.reset();
        assert!(!board.is_initialized());
        assert_eq!(board.card_count(), 0);
        assert!(board.history().is_empty());
        let mut rng = StdRng::seed_from_u64(3);
        board.deal(&mut rng)?;
        assert_eq!(board.card_count(), NUM_CARDS);
        Ok(())
    }

    #[test]
    fn capacity_counts_free_zones_except_destination() -> Result<(), GameError> {
        let board = Board::builder()
            .with_tableau(1, cards(&["9S", "8H", "7C"]))
            .with_freecell(1, "KD".parse()?)
            .build()?;
        // 3 free cells, tableaus 2..=8 empty.
        assert_eq!(board.supermove_capacity(Location::Tableau(2)), 4 << 6);
        assert_eq!(board.supermove_capacity(Location::Tableau(1)), 4 << 7);
        Ok(())
    }

    #[test]
    fn layout_rejects_duplicates_and_bad_foundations() {
        let duplicate = Board::builder()
            .with_tableau(1, cards(&["AH"]))
            .with_freecell(2, "AH".parse().expect("card"))
            .build();
        assert!(matches!(duplicate, Err(GameError::InvalidConfiguration(_))));

        let gap = Board::builder()
            .with_foundation(Suit::Clubs, cards(&["AC", "3C"]))
            .build();
        assert!(matches!(gap, Err(GameError::InvalidConfiguration(_))));

        let out_of_range = Board::builder().with_tableau(9, cards(&["2S"])).build();
        assert!(matches!(out_of_range, Err(GameError::InvalidConfiguration(_))));
    }
}
