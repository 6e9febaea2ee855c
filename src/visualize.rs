use std::fmt::Write;

use crate::card::{Card, Color, Suit};
use crate::moves::{Location, MoveCommand, Source};
use crate::state::BoardView;

const PREFIX: &str = "\x1B[107;";
const MIDFIX: &str = "m ";
const SUFFIX: &str = " \x1B[0m";
const RED: &str = "91";
const BLACK: &str = "30";
const EMPTY_SLOT: &str = " -- ";

/// Customize board rendering for the terminal.
#[derive(Clone, Copy, Debug)]
pub struct VisualOptions {
    /// Wrap cards in ANSI colour sequences.
    pub color: bool,
}

impl Default for VisualOptions {
    fn default() -> Self {
        Self { color: true }
    }
}

/// Renders a card (or an empty slot) on a white background, red or black text.
pub fn color_card_string(card: Option<Card>, options: VisualOptions) -> String {
    let Some(card) = card else {
        return String::from(EMPTY_SLOT);
    };
    if !options.color {
        return format!(" {card} ");
    }
    let code = match card.color() {
        Color::Red => RED,
        Color::Black => BLACK,
    };
    format!("{PREFIX}{code}{MIDFIX}{card}{SUFFIX}")
}

pub fn render_board(view: &BoardView) -> String {
    render_board_with_options(view, VisualOptions::default())
}

pub fn render_board_with_options(view: &BoardView, options: VisualOptions) -> String {
    let mut out = String::new();
    let freecells: String = view
        .freecells
        .iter()
        .map(|cell| color_card_string(*cell, options))
        .collect();
    let foundations: String = Suit::ALL
        .iter()
        .map(|suit| color_card_string(view.foundation_top(*suit), options))
        .collect();
    let _ = writeln!(out, "Freecells: {freecells}");
    let _ = writeln!(out, "Foundations: {foundations}");
    for (idx, column) in view.tableaus.iter().enumerate() {
        let cards: String = column
            .iter()
            .map(|card| color_card_string(Some(*card), options))
            .collect();
        let _ = writeln!(out, "Tableau #{}: {}", idx + 1, cards);
    }
    let _ = writeln!(out, "Moves played: {}", view.moves_played);
    out
}

/// Human-readable description of `command` in the position `view`.
pub fn describe_move(view: &BoardView, command: &MoveCommand) -> String {
    let card = moving_card(view, &command.source)
        .map(|card| card.to_string())
        .unwrap_or_else(|| String::from("--"));
    let from = describe_location(command.source.location());
    let to = describe_location(command.destination);
    match command.source {
        Source::Super(run) => format!("Move {} cards from {card} on {from} to {to}", run.size),
        Source::Single(_) => format!("Move {card} from {from} to {to}"),
    }
}

fn moving_card(view: &BoardView, source: &Source) -> Option<Card> {
    match source {
        Source::Super(run) => {
            let column = view.tableaus.get(run.column.checked_sub(1)?)?;
            column.len().checked_sub(run.size).and_then(|idx| column.get(idx)).copied()
        }
        Source::Single(Location::Tableau(n)) => {
            view.tableaus.get(n.checked_sub(1)?)?.last().copied()
        }
        Source::Single(Location::Freecell(n)) => *view.freecells.get(n.checked_sub(1)?)?,
        Source::Single(Location::Foundation(suit)) => view.foundation_top(*suit),
    }
}

fn describe_location(location: Location) -> String {
    match location {
        Location::Tableau(n) => format!("tableau {n}"),
        Location::Freecell(n) => format!("freecell {n}"),
        Location::Foundation(suit) => format!("the {suit:?} foundation"),
    }
}
