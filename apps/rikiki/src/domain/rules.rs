use std::ops::RangeInclusive;

use super::cards_types::DECK_SIZE;

pub const MIN_PLAYERS: usize = 2;
/// Each player must be able to hold at least two cards in the first round.
pub const MAX_PLAYERS: usize = 26;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Descending,
    Ascending,
}

/// Hand size of the first round: the whole deck split evenly.
pub fn starting_hand_size(player_count: usize) -> u8 {
    if player_count == 0 {
        return 0;
    }
    (DECK_SIZE / player_count) as u8
}

/// Hand size of the round following one of `current` cards, or `None` when
/// the game is over. Sizes run N, N-1, ..., 1, 2, ..., N.
pub fn next_hand_size(current: u8, starting: u8, direction: Direction) -> Option<(u8, Direction)> {
    match direction {
        Direction::Descending if current > 1 => Some((current - 1, Direction::Descending)),
        Direction::Descending if starting > 1 => Some((2, Direction::Ascending)),
        Direction::Descending => None,
        Direction::Ascending if current < starting => Some((current + 1, Direction::Ascending)),
        Direction::Ascending => None,
    }
}

/// Total number of rounds for a game starting at `starting` cards.
pub fn total_rounds(starting: u8) -> u32 {
    (2 * starting as u32).saturating_sub(1)
}

pub fn valid_hand_size(hand_size: u8, player_count: usize) -> bool {
    hand_size > 0 && hand_size as usize * player_count <= DECK_SIZE
}

/// A trump card is revealed only when one card is left over after the deal.
pub fn has_trump(hand_size: u8, player_count: usize) -> bool {
    (hand_size as usize + 1) * player_count <= DECK_SIZE
}

pub fn valid_bid_range(hand_size: u8) -> RangeInclusive<u8> {
    0..=hand_size
}
