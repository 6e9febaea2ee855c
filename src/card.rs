use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CardError;

pub const NUM_FOUNDATIONS: usize = 4;
pub const NUM_FREECELLS: usize = 4;
pub const NUM_TABLEAUS: usize = 8;
pub const NUM_CARDS: usize = 52;
pub const RANKS_PER_SUIT: u8 = 13;

/// One of the four French suits.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Hearts,
    Diamonds,
    Spades,
    Clubs,
}

/// Suit tokens accepted by the move protocol, keyed by the uppercase token.
const SUIT_TOKENS: [(&str, Suit); 8] = [
    ("HEARTS", Suit::Hearts),
    ("H", Suit::Hearts),
    ("DIAMONDS", Suit::Diamonds),
    ("D", Suit::Diamonds),
    ("SPADES", Suit::Spades),
    ("S", Suit::Spades),
    ("CLUBS", Suit::Clubs),
    ("C", Suit::Clubs),
];

impl Suit {
    /// Deal order of the suits; also the order used by card ids.
    pub const ALL: [Suit; NUM_FOUNDATIONS] =
        [Suit::Hearts, Suit::Diamonds, Suit::Spades, Suit::Clubs];

    #[inline]
    pub fn color(self) -> Color {
        match self {
            Suit::Hearts | Suit::Diamonds => Color::Red,
            Suit::Spades | Suit::Clubs => Color::Black,
        }
    }

    /// Position of the suit within [`Suit::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Suit::Hearts => 0,
            Suit::Diamonds => 1,
            Suit::Spades => 2,
            Suit::Clubs => 3,
        }
    }

    /// Looks up a full name or single-letter abbreviation, ignoring case.
    pub fn from_token(token: &str) -> Option<Suit> {
        let normalized = token.to_ascii_uppercase();
        SUIT_TOKENS
            .iter()
            .find(|(key, _)| *key == normalized)
            .map(|(_, suit)| *suit)
    }

    pub fn letter(self) -> char {
        match self {
            Suit::Hearts => 'H',
            Suit::Diamonds => 'D',
            Suit::Spades => 'S',
            Suit::Clubs => 'C',
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Suit::Hearts => '\u{2665}',
            Suit::Diamonds => '\u{2666}',
            Suit::Spades => '\u{2660}',
            Suit::Clubs => '\u{2663}',
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Black,
}

/// Card rank between Ace (1) and King (13).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rank(u8);

impl Rank {
    pub const ACE: Rank = Rank(1);
    pub const JACK: Rank = Rank(11);
    pub const QUEEN: Rank = Rank(12);
    pub const KING: Rank = Rank(RANKS_PER_SUIT);

    pub fn new(value: u8) -> Option<Rank> {
        (1..=RANKS_PER_SUIT).contains(&value).then_some(Rank(value))
    }

    #[inline]
    pub fn value(self) -> u8 {
        self.0
    }

    fn from_token(token: &str) -> Option<Rank> {
        match token.to_ascii_uppercase().as_str() {
            "A" => Some(Rank::ACE),
            "J" => Some(Rank::JACK),
            "Q" => Some(Rank::QUEEN),
            "K" => Some(Rank::KING),
            digits => digits.parse::<u8>().ok().and_then(Rank::new),
        }
    }
}

impl TryFrom<u8> for Rank {
    type Error = CardError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rank::new(value).ok_or(CardError::InvalidRank(value))
    }
}

impl From<Rank> for u8 {
    fn from(rank: Rank) -> Self {
        rank.0
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            1 => f.write_str("A"),
            11 => f.write_str("J"),
            12 => f.write_str("Q"),
            13 => f.write_str("K"),
            n => write!(f, "{n}"),
        }
    }
}

/// An immutable playing card.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Decodes a deck id in `1..=52`: ranks cycle fastest, suits follow [`Suit::ALL`].
    pub fn from_id(id: u8) -> Result<Self, CardError> {
        if !(1..=NUM_CARDS as u8).contains(&id) {
            return Err(CardError::InvalidId(id));
        }
        Ok(Self::decode_id(id))
    }

    /// `id` must already be checked to lie in `1..=52`.
    fn decode_id(id: u8) -> Self {
        let zero_based = id - 1;
        Self {
            rank: Rank(zero_based % RANKS_PER_SUIT + 1),
            suit: Suit::ALL[(zero_based / RANKS_PER_SUIT) as usize],
        }
    }

    /// Builds a card from a numeric rank and a suit token such as `"h"` or `"Spades"`.
    pub fn from_rank_and_token(rank: u8, suit: &str) -> Result<Self, CardError> {
        let rank = Rank::new(rank).ok_or(CardError::InvalidRank(rank))?;
        let suit = Suit::from_token(suit).ok_or_else(|| CardError::UnknownSuit(suit.to_string()))?;
        Ok(Self { rank, suit })
    }

    /// Inverse of [`Card::from_id`].
    pub fn id(&self) -> u8 {
        self.suit.index() as u8 * RANKS_PER_SUIT + self.rank.0
    }

    #[inline]
    pub fn rank(&self) -> Rank {
        self.rank
    }

    #[inline]
    pub fn suit(&self) -> Suit {
        self.suit
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.suit.color()
    }

    /// Whether this card may be placed on `landing` in a tableau: one rank
    /// below it and of the opposite colour.
    #[inline]
    pub fn can_place_patience(&self, landing: &Card) -> bool {
        landing.rank.0 == self.rank.0 + 1 && landing.color() != self.color()
    }

    /// Whether this card may be placed on `landing` in a foundation: same
    /// suit and one rank above it.
    #[inline]
    pub fn can_place_foundation(&self, landing: &Card) -> bool {
        self.rank.0 == landing.rank.0 + 1 && landing.suit == self.suit
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// Parses the short form used in tests and layouts, e.g. `"AH"`, `"10s"`, `"qd"`.
impl FromStr for Card {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .char_indices()
            .last()
            .map(|(idx, _)| idx)
            .ok_or_else(|| CardError::UnknownSuit(String::new()))?;
        let (rank_token, suit_token) = s.split_at(split);
        let suit = Suit::from_token(suit_token)
            .ok_or_else(|| CardError::UnknownSuit(suit_token.to_string()))?;
        let rank = Rank::from_token(rank_token)
            .ok_or_else(|| CardError::UnknownRank(rank_token.to_string()))?;
        Ok(Self { rank, suit })
    }
}

/// All 52 cards in id order.
pub fn full_deck() -> Vec<Card> {
    (1..=NUM_CARDS as u8).map(Card::decode_id).collect()
}
