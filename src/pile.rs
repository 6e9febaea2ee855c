use serde::{Deserialize, Serialize};

use crate::card::Card;

/// Ordered stack of cards, bottom first. Backs both foundations and tableaus.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Pile {
    cards: Vec<Card>,
}

impl Pile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn top_card(&self) -> Option<Card> {
        self.cards.last().copied()
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Removes the top card.
    ///
    /// # Panics
    ///
    /// Panics if the pile is empty; check [`Pile::is_empty`] first.
    pub fn pop(&mut self) -> Card {
        match self.cards.pop() {
            Some(card) => card,
            None => panic!("pop from an empty pile"),
        }
    }

    /// Card `depth` positions from the top, where depth 1 is the top card.
    pub fn from_top(&self, depth: usize) -> Option<Card> {
        if depth == 0 || depth > self.cards.len() {
            return None;
        }
        self.cards.get(self.cards.len() - depth).copied()
    }

    /// Removes the top `count` cards, keeping their bottom-to-top order.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `count` cards are present.
    pub fn take_top(&mut self, count: usize) -> Vec<Card> {
        assert!(count <= self.cards.len(), "take_top past the bottom of the pile");
        self.cards.split_off(self.cards.len() - count)
    }

    pub fn extend(&mut self, cards: Vec<Card>) {
        self.cards.extend(cards);
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    /// Index where the movable run at the top of the pile begins.
    ///
    /// Scans downward from the top while each card can be placed on the one
    /// beneath it. Recomputed on every call.
    pub fn stack_index(&self) -> Option<usize> {
        if self.cards.is_empty() {
            return None;
        }
        let mut start = self.cards.len() - 1;
        while start > 0 && self.cards[start].can_place_patience(&self.cards[start - 1]) {
            start -= 1;
        }
        Some(start)
    }

    /// Length of the movable run, 0 for an empty pile.
    pub fn stack_size(&self) -> usize {
        self.stack_index()
            .map(|start| self.cards.len() - start)
            .unwrap_or(0)
    }
}
