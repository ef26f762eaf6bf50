//! Card game logic: follow-suit legality and comparing card strength

use super::cards_types::{Card, Suit};

pub fn same_suit(a: Card, b: Card) -> bool {
    a.suit == b.suit
}

pub fn hand_has_suit(hand: &[Card], suit: Suit) -> bool {
    hand.iter().any(|c| c.suit == suit)
}

/// Whether `card` may be played from `hand` onto `table` (cards already
/// played to the current trick, lead first).
pub fn card_allowed(card: Card, hand: &[Card], table: &[Card]) -> bool {
    if !hand.contains(&card) {
        return false;
    }
    match table.first() {
        None => true,
        Some(&lead) if same_suit(card, lead) => true,
        Some(&lead) => !hand_has_suit(hand, lead.suit),
    }
}

/// Whether `a` beats `b` in a trick opened by `first` under `trump`.
///
/// Two off-lead, off-trump cards of different suits never beat each other.
/// Trick resolution cannot reach that case because the running winner is
/// always a lead or trump card.
pub fn beats(a: Card, b: Card, first: Card, trump: Option<Card>) -> bool {
    if let Some(trump) = trump {
        match (same_suit(a, trump), same_suit(b, trump)) {
            (true, false) => return true,
            (false, true) => return false,
            (true, true) => return a.rank > b.rank,
            (false, false) => {}
        }
    }
    match (same_suit(a, first), same_suit(b, first)) {
        (true, false) => true,
        (false, true) => false,
        (true, true) => a.rank > b.rank,
        (false, false) => same_suit(a, b) && a.rank > b.rank,
    }
}

/// Index into `trick` of the card currently winning it.
pub fn winning_index(trick: &[Card], trump: Option<Card>) -> Option<usize> {
    let first = *trick.first()?;
    let mut best = 0;
    for (i, &card) in trick.iter().enumerate().skip(1) {
        if beats(card, trick[best], first, trump) {
            best = i;
        }
    }
    Some(best)
}
