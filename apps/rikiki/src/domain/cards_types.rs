//! Core card-related types: Card, Rank, Suit
//!
//! A card is one of 52 values with `index = suit * 13 + rank`. Suits are
//! ordered Clubs, Diamonds, Hearts, Spades and ranks Two (lowest) to Ace.

use std::fmt;

use crate::errors::domain::{DomainError, ValidationKind};

pub const DECK_SIZE: usize = 52;
pub const CARDS_PER_SUIT: u8 = 13;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    fn from_index(i: u8) -> Option<Suit> {
        Suit::ALL.get(i as usize).copied()
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    fn from_index(i: u8) -> Option<Rank> {
        Rank::ALL.get(i as usize).copied()
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub const fn new(suit: Suit, rank: Rank) -> Self {
        Card { suit, rank }
    }

    /// Integer value in `0..52`, the form cards take on the wire.
    pub const fn index(self) -> u8 {
        self.suit as u8 * CARDS_PER_SUIT + self.rank as u8
    }

    pub fn from_index(index: u8) -> Result<Card, DomainError> {
        let suit = Suit::from_index(index / CARDS_PER_SUIT);
        let rank = Rank::from_index(index % CARDS_PER_SUIT);
        match (suit, rank) {
            (Some(suit), Some(rank)) => Ok(Card { suit, rank }),
            _ => Err(DomainError::validation(
                ValidationKind::ParseCard,
                format!("Card index out of range: {index}"),
            )),
        }
    }

    /// Fresh 52-card deck in index order.
    pub fn deck() -> Vec<Card> {
        Suit::ALL
            .iter()
            .flat_map(|&suit| Rank::ALL.iter().map(move |&rank| Card { suit, rank }))
            .collect()
    }
}

// Ord follows the card index: suit order C<D<H<S then rank order.
// Not meaningful for trick resolution, which depends on lead and trump.
impl Ord for Card {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.index().cmp(&other.index())
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

pub(crate) fn rank_char(rank: Rank) -> char {
    match rank {
        Rank::Two => '2',
        Rank::Three => '3',
        Rank::Four => '4',
        Rank::Five => '5',
        Rank::Six => '6',
        Rank::Seven => '7',
        Rank::Eight => '8',
        Rank::Nine => '9',
        Rank::Ten => 'T',
        Rank::Jack => 'J',
        Rank::Queen => 'Q',
        Rank::King => 'K',
        Rank::Ace => 'A',
    }
}

pub(crate) fn suit_char(suit: Suit) -> char {
    match suit {
        Suit::Clubs => 'C',
        Suit::Diamonds => 'D',
        Suit::Hearts => 'H',
        Suit::Spades => 'S',
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", rank_char(self.rank), suit_char(self.suit))
    }
}
