use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::domain::{Card, Player, Round, RoundState};
use crate::errors::domain::{DomainError, ValidationKind};

fn rng() -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(42)
}

fn confirmed(seq: usize, name: &str, rng: &mut ChaCha20Rng) -> Player {
    let mut p = Player::new(seq, name, rng);
    p.confirm(name, rng).unwrap();
    p
}

fn two_player_round(hand_size: u8) -> (Vec<Player>, Round, ChaCha20Rng) {
    let mut rng = rng();
    let mut roster = vec![confirmed(1, "Anna", &mut rng), confirmed(2, "Bert", &mut rng)];
    let round = Round::start(1, &mut roster, &[0, 1], hand_size, &mut rng).unwrap();
    (roster, round, rng)
}

#[test]
fn name_falls_back_to_provisional() {
    let mut rng = rng();
    let mut p = Player::new(1, "Anna", &mut rng);
    assert_eq!(p.name(), "Anna");
    assert!(!p.is_confirmed());
    p.confirm("   ", &mut rng).unwrap();
    assert!(p.is_confirmed());
    assert_eq!(p.name(), "Anna");
}

#[test]
fn confirm_renames_and_rotates_secret() {
    let mut rng = rng();
    let mut p = Player::new(1, "Anna", &mut rng);
    let invite = p.secret_id().to_string();
    let id = p.id().clone();
    assert!(p.cookie().is_none());

    p.confirm("Annie", &mut rng).unwrap();
    assert_eq!(p.name(), "Annie");
    assert_eq!(p.provisional_name(), "Anna");
    assert_ne!(p.secret_id(), invite);
    assert!(p.cookie().is_some());
    assert_eq!(p.id(), &id);
}

#[test]
fn second_confirmation_rejected() {
    let mut rng = rng();
    let mut p = confirmed(1, "Anna", &mut rng);
    let err = p.confirm("Other", &mut rng).unwrap_err();
    assert!(matches!(err, DomainError::IllegalState(_)));
    assert_eq!(p.name(), "Anna");
}

#[test]
fn unconfirmed_player_gets_no_cards() {
    let mut rng = rng();
    let mut p = Player::new(1, "Anna", &mut rng);
    let cards = vec!["2C".parse::<Card>().unwrap()];
    assert!(matches!(
        p.accept_cards(1, cards),
        Err(DomainError::IllegalState(_))
    ));
}

#[test]
fn accept_cards_resets_bid_and_tricks() {
    let (mut roster, mut round, _) = two_player_round(3);
    roster[0].place_bid(1, &mut round).unwrap();
    assert_eq!(roster[0].bid(), Some(1));
    let hand = roster[0].cards().to_vec();
    roster[0].accept_cards(1, hand).unwrap();
    assert_eq!(roster[0].bid(), None);
    assert_eq!(roster[0].tricks(), 0);
}

#[test]
fn cannot_take_cards_for_another_round_while_holding_some() {
    let (mut roster, _round, _) = two_player_round(3);
    let err = roster[0]
        .accept_cards(2, vec!["2C".parse().unwrap()])
        .unwrap_err();
    assert!(matches!(err, DomainError::IllegalState(_)));
}

#[test]
fn bid_bounds() {
    let (mut roster, mut round, _) = two_player_round(3);
    let err = roster[0].place_bid(4, &mut round).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::InvalidBid, _)
    ));
    assert!(!roster[0].has_bid());
    roster[0].place_bid(3, &mut round).unwrap();
    roster[1].place_bid(0, &mut round).unwrap();
    assert_eq!(round.state(), RoundState::Playing);
}

#[test]
fn bid_kept_only_when_round_accepts() {
    let (mut roster, mut round, _) = two_player_round(3);
    let err = roster[1].place_bid(1, &mut round).unwrap_err();
    assert!(matches!(err, DomainError::OutOfTurn { .. }));
    assert!(!roster[1].has_bid());
}

#[test]
fn player_without_cards_cannot_bid() {
    let mut rng = rng();
    let (_, mut round, _) = two_player_round(3);
    let mut outsider = confirmed(3, "Cleo", &mut rng);
    let err = outsider.place_bid(0, &mut round).unwrap_err();
    assert!(matches!(err, DomainError::IllegalState(_)));
}

#[test]
fn play_requires_bid() {
    let (mut roster, mut round, _) = two_player_round(3);
    let card = roster[0].cards()[0];
    let err = roster[0].play_card(card, &mut round).unwrap_err();
    assert!(matches!(err, DomainError::IllegalState(_)));
    assert_eq!(roster[0].card_count(), 3);
}

#[test]
fn unheld_card_not_allowed() {
    let (mut roster, mut round, _) = two_player_round(3);
    roster[0].place_bid(0, &mut round).unwrap();
    roster[1].place_bid(0, &mut round).unwrap();
    let foreign = roster[1].cards()[0];
    let err = roster[0].play_card(foreign, &mut round).unwrap_err();
    assert!(matches!(err, DomainError::CardNotAllowed { card, .. } if card == foreign));
}

#[test]
fn rejected_play_keeps_hand_intact() {
    let (mut roster, mut round, _) = two_player_round(5);
    roster[0].place_bid(0, &mut round).unwrap();
    roster[1].place_bid(0, &mut round).unwrap();

    // Bert tries to lead although it is Anna's turn
    let before = roster[1].cards().to_vec();
    let card = before[2];
    let err = roster[1].play_card(card, &mut round).unwrap_err();
    assert!(matches!(err, DomainError::OutOfTurn { .. }));
    assert_eq!(roster[1].cards(), before.as_slice());
}

#[test]
fn add_trick_requires_bid() {
    let (mut roster, mut round, _) = two_player_round(2);
    assert!(roster[0].add_trick().is_err());
    roster[0].place_bid(1, &mut round).unwrap();
    roster[0].add_trick().unwrap();
    assert_eq!(roster[0].tricks(), 1);
}

#[test]
fn playable_cards_follow_suit() {
    let (mut roster, mut round, _) = two_player_round(6);
    roster[0].place_bid(0, &mut round).unwrap();
    roster[1].place_bid(0, &mut round).unwrap();

    assert_eq!(roster[0].playable_cards(&round), roster[0].cards().to_vec());
    let lead = roster[0].cards()[0];
    roster[0].play_card(lead, &mut round).unwrap();

    let playable = roster[1].playable_cards(&round);
    let follows: Vec<Card> = roster[1]
        .cards()
        .iter()
        .copied()
        .filter(|c| c.suit == lead.suit)
        .collect();
    if follows.is_empty() {
        assert_eq!(playable, roster[1].cards().to_vec());
    } else {
        assert_eq!(playable, follows);
    }
}

#[test]
fn update_secret_requires_confirmation() {
    let mut rng = rng();
    let mut p = Player::new(1, "Anna", &mut rng);
    assert!(p.update_secret(&mut rng).is_err());

    p.confirm("Anna", &mut rng).unwrap();
    let (secret, cookie) = (p.secret_id().to_string(), p.cookie().map(str::to_string));
    p.update_secret(&mut rng).unwrap();
    assert_ne!(p.secret_id(), secret);
    assert_ne!(p.cookie().map(str::to_string), cookie);
}

#[test]
fn reset_keeps_identity_and_link() {
    let (mut roster, _round, _) = two_player_round(4);
    let id = roster[0].id().clone();
    let secret = roster[0].secret_id().to_string();
    roster[0].reset_for_new_game();
    assert!(!roster[0].is_confirmed());
    assert_eq!(roster[0].card_count(), 0);
    assert!(roster[0].round().is_none());
    assert!(roster[0].cookie().is_none());
    assert_eq!(roster[0].id(), &id);
    assert_eq!(roster[0].secret_id(), secret);
    assert_eq!(roster[0].name(), "Anna");
}
