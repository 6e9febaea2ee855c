use std::collections::HashSet;

use freecell::{Board, BoardConfig, BoardView, DEFAULT_SEED, GameError, Location, MoveCommand, Suit};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn dealt_ids(view: &BoardView) -> Vec<u8> {
    view.tableaus.iter().flatten().map(|card| card.id()).collect()
}

fn zone_len(view: &BoardView, location: Location) -> usize {
    match location {
        Location::Tableau(n) => view.tableaus[n - 1].len(),
        Location::Freecell(n) => usize::from(view.freecells[n - 1].is_some()),
        Location::Foundation(suit) => view.foundations[suit.index()].len(),
    }
}

fn candidate_moves() -> Vec<MoveCommand> {
    let mut locations: Vec<Location> = (1..=8).map(Location::Tableau).collect();
    locations.extend((1..=4).map(Location::Freecell));
    locations.extend(Suit::ALL.iter().copied().map(Location::Foundation));

    let mut moves = Vec::new();
    for &source in &locations {
        for &destination in &locations {
            moves.push(MoveCommand::new(source, destination));
        }
    }
    for column in 1..=8 {
        for destination in 1..=8 {
            for size in 2..=13 {
                moves.push(MoveCommand::run(column, size, Location::Tableau(destination)));
            }
        }
    }
    moves
}

#[test]
fn round_robin_deal_fills_columns_in_order() -> Result<(), GameError> {
    let ids: Vec<u8> = (1..=52).collect();
    let board = Board::builder().with_order(ids).build()?;
    let view = board.view();
    let sizes: Vec<usize> = view.tableaus.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![7, 7, 7, 7, 6, 6, 6, 6]);
    // Card n lands on column (n - 1) mod 8.
    assert_eq!(view.tableaus[0][0].id(), 1);
    assert_eq!(view.tableaus[0][1].id(), 9);
    assert_eq!(view.tableaus[3][6].id(), 52);
    assert!(view.initialized);
    Ok(())
}

#[test]
fn deal_order_rejects_bad_permutations() {
    let mut board = Board::new(BoardConfig::default());
    let short: Vec<u8> = (1..=51).collect();
    assert_eq!(
        board.deal_order(&short),
        Err(GameError::InvalidDeal("expected exactly 52 card ids"))
    );
    let mut duplicate: Vec<u8> = (1..=52).collect();
    duplicate[51] = 1;
    assert_eq!(
        board.deal_order(&duplicate),
        Err(GameError::InvalidDeal("duplicate card id"))
    );
    let mut out_of_range: Vec<u8> = (1..=52).collect();
    out_of_range[0] = 53;
    assert!(matches!(board.deal_order(&out_of_range), Err(GameError::Card(_))));
    assert_eq!(board.card_count(), 0);
    assert!(!board.is_initialized());
}

#[test]
fn same_seed_same_deal() -> Result<(), GameError> {
    let first = Board::builder().with_seed(1234).build()?;
    let second = Board::builder().with_seed(1234).build()?;
    let other = Board::builder().with_seed(4321).build()?;
    assert_eq!(first.view(), second.view());
    assert_ne!(first.view(), other.view());

    let mut injected = Board::new(BoardConfig::default());
    injected.deal(&mut StdRng::seed_from_u64(1234))?;
    assert_eq!(injected.view(), first.view());
    Ok(())
}

#[test]
fn default_seed_is_shared_by_config_and_builder() -> Result<(), GameError> {
    assert_eq!(BoardConfig::default().seed, DEFAULT_SEED);
    let implicit = Board::builder().build()?;
    let explicit = Board::builder().with_seed(DEFAULT_SEED).build()?;
    assert_eq!(implicit.view(), explicit.view());
    Ok(())
}

#[test]
fn view_with_out_of_range_rank_is_rejected() -> Result<(), GameError> {
    let board = Board::builder().with_seed(2).build()?;
    let json = serde_json::to_string(&board.view()).expect("serialize");
    let first_rank = board.view().tableaus[0][0].rank().value();
    let tampered = json.replacen(&format!("\"rank\":{first_rank},"), "\"rank\":14,", 1);
    assert_ne!(tampered, json);
    assert!(serde_json::from_str::<BoardView>(&tampered).is_err());
    Ok(())
}

#[test]
fn view_serializes_to_json() -> Result<(), GameError> {
    let board = Board::builder().with_seed(2).build()?;
    let json = serde_json::to_string(&board.view()).expect("serialize");
    let back: BoardView = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, board.view());
    Ok(())
}

proptest! {
    #[test]
    fn any_permutation_deals_every_card_once(
        ids in Just((1..=52u8).collect::<Vec<_>>()).prop_shuffle()
    ) {
        let board = Board::builder().with_order(ids.clone()).build().expect("valid permutation");
        let view = board.view();
        let dealt = dealt_ids(&view);
        prop_assert_eq!(dealt.len(), 52);
        let unique: HashSet<u8> = dealt.iter().copied().collect();
        prop_assert_eq!(unique.len(), 52);
        prop_assert!(dealt.iter().all(|id| (1..=52).contains(id)));
        for (n, id) in ids.iter().enumerate() {
            prop_assert_eq!(view.tableaus[n % 8][n / 8].id(), *id);
        }
    }

    #[test]
    fn random_play_moves_exact_run_and_keeps_cards(
        seed in any::<u64>(),
        picks in prop::collection::vec(any::<usize>(), 1..40)
    ) {
        let mut board = Board::builder().with_seed(seed).build().expect("seeded deal");
        let candidates = candidate_moves();
        for pick in picks {
            let legal: Vec<MoveCommand> = candidates
                .iter()
                .copied()
                .filter(|command| board.validate(command).is_ok())
                .collect();
            if legal.is_empty() {
                break;
            }
            let command = legal[pick % legal.len()];
            let before = board.view();
            let size = command.source.size();
            let moved: Vec<_> = match command.source.location() {
                Location::Tableau(n) => {
                    let column = &before.tableaus[n - 1];
                    column[column.len() - size..].to_vec()
                }
                Location::Freecell(n) => before.freecells[n - 1].into_iter().collect(),
                Location::Foundation(suit) => before.foundation_top(suit).into_iter().collect(),
            };

            board.apply(command).expect("validated move applies");
            let after = board.view();
            prop_assert_eq!(after.card_count(), 52);
            prop_assert_eq!(
                zone_len(&after, command.source.location()),
                zone_len(&before, command.source.location()) - size
            );
            prop_assert_eq!(
                zone_len(&after, command.destination),
                zone_len(&before, command.destination) + size
            );
            if let Location::Tableau(n) = command.destination {
                let column = &after.tableaus[n - 1];
                prop_assert_eq!(&column[column.len() - size..], &moved[..]);
            }
        }
        prop_assert_eq!(board.card_count(), 52);
    }
}
