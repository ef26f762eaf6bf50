//! Card dealing: uniform shuffle, contiguous hands, optional trump.

use rand::seq::SliceRandom;
use rand::Rng;

use super::rules::{has_trump, valid_hand_size, MIN_PLAYERS};
use crate::domain::Card;
use crate::errors::domain::{DomainError, ValidationKind};

/// Result of one deal. `hands[i]` belongs to seat `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    pub hands: Vec<Vec<Card>>,
    pub trump: Option<Card>,
}

/// Shuffle a full deck with `rng` and deal `hand_size` cards to each of
/// `player_count` seats in order. The card right after the last hand is
/// revealed as trump when the deck has one to spare for every seat.
///
/// Hands are sorted for display.
pub fn deal_hands<R: Rng + ?Sized>(
    player_count: usize,
    hand_size: u8,
    rng: &mut R,
) -> Result<Deal, DomainError> {
    if player_count < MIN_PLAYERS {
        return Err(DomainError::validation(
            ValidationKind::InvalidPlayerCount,
            format!("At least {MIN_PLAYERS} players are needed, got {player_count}"),
        ));
    }
    if !valid_hand_size(hand_size, player_count) {
        return Err(DomainError::validation(
            ValidationKind::InvalidHandSize,
            format!("Cannot deal {hand_size} cards to {player_count} players"),
        ));
    }

    let mut deck = Card::deck();
    deck.shuffle(rng);

    let size = hand_size as usize;
    let hands = deck
        .chunks(size)
        .take(player_count)
        .map(|chunk| {
            let mut hand = chunk.to_vec();
            hand.sort();
            hand
        })
        .collect();
    let trump = if has_trump(hand_size, player_count) {
        deck.get(size * player_count).copied()
    } else {
        None
    };

    Ok(Deal { hands, trump })
}
