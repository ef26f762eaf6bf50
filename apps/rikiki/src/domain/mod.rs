//! Domain layer: cards, players, rounds and the game state machine.
//!
//! Pure and synchronous; randomness is injected by the caller.

pub mod cards_logic;
pub mod cards_parsing;
pub mod cards_serde;
pub mod cards_types;
pub mod dealing;
pub mod game;
pub mod player;
pub mod playerlist;
pub mod round;
pub mod rules;
pub mod tokens;

#[cfg(test)]
mod tests_player;
#[cfg(test)]
mod tests_round;

pub use cards_logic::{beats, card_allowed, hand_has_suit, same_suit};
pub use cards_types::{Card, Rank, Suit};
pub use game::{Game, GameState, RoundAdvance};
pub use player::{Player, PlayerId, RoundNo};
pub use round::{BidOutcome, Play, PlayOutcome, Round, RoundState, Seat};
