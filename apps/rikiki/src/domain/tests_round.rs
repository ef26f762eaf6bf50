use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::domain::{BidOutcome, Card, Player, PlayerId, Rank, Round, RoundState, Suit};
use crate::errors::domain::{DomainError, ValidationKind};

fn c(tok: &str) -> Card {
    tok.parse().unwrap()
}

fn roster(names: &[&str], rng: &mut ChaCha20Rng) -> Vec<Player> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let mut p = Player::new(i + 1, *name, rng);
            p.confirm(name, rng).unwrap();
            p
        })
        .collect()
}

fn setup(names: &[&str], hand_size: u8) -> (Vec<Player>, Round) {
    let mut rng = ChaCha20Rng::seed_from_u64(7);
    let mut players = roster(names, &mut rng);
    let order: Vec<usize> = (0..players.len()).collect();
    let round = Round::start(1, &mut players, &order, hand_size, &mut rng).unwrap();
    (players, round)
}

fn ids(players: &[Player]) -> Vec<PlayerId> {
    players.iter().map(|p| p.id().clone()).collect()
}

fn bid_all(round: &mut Round, ids: &[PlayerId]) {
    for id in ids {
        round.place_bid(id, 0).unwrap();
    }
}

#[test]
fn start_deals_to_every_seat() {
    let (players, round) = setup(&["Anna", "Bert", "Cleo"], 5);
    assert_eq!(round.state(), RoundState::Bidding);
    assert_eq!(round.players().len(), 3);
    assert_eq!(round.current_player().unwrap().id, *players[0].id());
    for p in &players {
        assert_eq!(p.card_count(), 5);
        assert_eq!(p.round(), Some(1));
    }
    assert!(round.trump().is_some());
}

#[test]
fn start_rejects_invalid_tables() {
    let mut rng = ChaCha20Rng::seed_from_u64(1);
    let mut players = roster(&["Anna", "Bert"], &mut rng);

    let err = Round::start(1, &mut players, &[0], 3, &mut rng).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::InvalidPlayerCount, _)
    ));

    let err = Round::start(1, &mut players, &[0, 1], 27, &mut rng).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::InvalidHandSize, _)
    ));
    let err = Round::start(1, &mut players, &[0, 1], 0, &mut rng).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::InvalidHandSize, _)
    ));

    players.push(Player::new(3, "Cleo", &mut rng));
    let err = Round::start(1, &mut players, &[0, 1, 2], 3, &mut rng).unwrap_err();
    assert!(matches!(err, DomainError::IllegalState(_)));
    // Nobody was dealt anything
    assert!(players.iter().all(|p| p.card_count() == 0));
}

#[test]
fn no_trump_when_deck_runs_out() {
    let (_, round) = setup(&["A", "B", "C", "D"], 13);
    assert!(round.trump().is_none());
    let (_, round) = setup(&["A", "B", "C", "D"], 12);
    assert!(round.trump().is_some());
}

#[test]
fn bidding_follows_seat_order() {
    let (players, mut round) = setup(&["Anna", "Bert", "Cleo"], 4);
    let ids = ids(&players);

    let err = round.place_bid(&ids[1], 1).unwrap_err();
    match err {
        DomainError::OutOfTurn {
            operation,
            expected,
            offending,
        } => {
            assert_eq!(operation, "bid");
            assert_eq!(expected.name, "Anna");
            assert_eq!(offending.name, "Bert");
        }
        other => panic!("unexpected {other:?}"),
    }

    assert_eq!(
        round.place_bid(&ids[0], 1).unwrap(),
        BidOutcome::AwaitingBid {
            next: ids[1].clone()
        }
    );
    round.place_bid(&ids[1], 2).unwrap();
    assert_eq!(
        round.place_bid(&ids[2], 0).unwrap(),
        BidOutcome::BiddingComplete
    );
    assert_eq!(round.state(), RoundState::Playing);
    assert_eq!(round.current_player().unwrap().id, ids[0]);
    assert_eq!(round.bids().len(), 3);

    let err = round.place_bid(&ids[0], 1).unwrap_err();
    assert!(matches!(err, DomainError::IllegalState(_)));
}

#[test]
fn round_rejects_out_of_range_bid() {
    let (players, mut round) = setup(&["Anna", "Bert"], 2);
    let err = round.place_bid(players[0].id(), 3).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::InvalidBid, _)
    ));
    assert!(round.bids().is_empty());
}

#[test]
fn no_play_during_bidding() {
    let (players, mut round) = setup(&["Anna", "Bert"], 2);
    let err = round.play_card(players[0].id(), c("2C"), 1).unwrap_err();
    assert!(matches!(err, DomainError::IllegalState(_)));
}

#[test]
fn tricks_pause_then_resume_with_winner() {
    let (players, mut round) = setup(&["Anna", "Bert"], 2);
    let ids = ids(&players);
    bid_all(&mut round, &ids);

    let first = round.play_card(&ids[0], c("2H"), 1).unwrap();
    assert_eq!(first.trick_winner, None);
    let err = round.play_card(&ids[0], c("3H"), 0).unwrap_err();
    assert!(matches!(err, DomainError::OutOfTurn { operation: "play", .. }));

    let done = round.play_card(&ids[1], c("KH"), 1).unwrap();
    assert_eq!(done.trick_winner.as_ref(), Some(&ids[1]));
    assert!(!done.round_finished);
    assert_eq!(round.state(), RoundState::BetweenTricks);
    assert_eq!(round.current_trick().len(), 2);
    assert_eq!(round.current_player().unwrap().id, ids[1]);
    assert_eq!(round.last_trick_winner(), Some(&ids[1]));

    // Winner leads; the finished trick is cleared by the first card
    round.play_card(&ids[1], c("4C"), 0).unwrap();
    assert_eq!(round.state(), RoundState::Playing);
    assert_eq!(round.current_trick().len(), 1);

    let last = round.play_card(&ids[0], c("3C"), 0).unwrap();
    assert_eq!(last.trick_winner.as_ref(), Some(&ids[1]));
    assert!(last.round_finished);
    assert_eq!(round.state(), RoundState::Done);
    assert_eq!(round.tricks_played(), 2);
    assert!(round.current_player().is_none());
}

#[test]
fn card_counts_out_of_step_are_illegal() {
    let (players, mut round) = setup(&["Anna", "Bert"], 3);
    let ids = ids(&players);
    bid_all(&mut round, &ids);

    // Anna holds 3 cards, so 2 must be left after her play
    let err = round.play_card(&ids[0], c("2H"), 0).unwrap_err();
    assert!(matches!(err, DomainError::IllegalState(_)));
    let err = round.play_card(&ids[0], c("2H"), 3).unwrap_err();
    assert!(matches!(err, DomainError::IllegalState(_)));
    assert!(round.current_trick().is_empty());
    assert_eq!(round.players()[0].cards_left, 3);

    round.play_card(&ids[0], c("2H"), 2).unwrap();
    assert_eq!(round.players()[0].cards_left, 2);
    assert_eq!(round.current_trick().len(), 1);
}

#[test]
fn leading_play_follows_trump_and_lead() {
    let (players, mut round) = setup(&["Anna", "Bert", "Cleo"], 4);
    let ids = ids(&players);
    bid_all(&mut round, &ids);
    let trump = round.trump().unwrap();
    assert!(round.leading_play().is_none());

    let lead_suit = Suit::ALL.into_iter().find(|&s| s != trump.suit).unwrap();
    let lead = Card {
        suit: lead_suit,
        rank: Rank::Ten,
    };
    round.play_card(&ids[0], lead, 3).unwrap();
    assert_eq!(round.leading_play().unwrap().player, ids[0]);

    let higher = Card {
        suit: lead.suit,
        rank: Rank::King,
    };
    round.play_card(&ids[1], higher, 3).unwrap();
    assert_eq!(round.leading_play().unwrap().card, higher);

    let low_trump = Card {
        suit: trump.suit,
        rank: Rank::Two,
    };
    let done = round.play_card(&ids[2], low_trump, 3).unwrap();
    assert_eq!(done.trick_winner.as_ref(), Some(&ids[2]));
    assert_eq!(round.current_player().unwrap().id, ids[2]);
}

#[test]
fn status_summary_tracks_progress() {
    let (players, mut round) = setup(&["Anna", "Bert"], 3);
    let s0 = round.status_summary();
    round.place_bid(players[0].id(), 1).unwrap();
    let s1 = round.status_summary();
    assert_ne!(s0, s1);
    assert_eq!(s1, round.status_summary());
}
