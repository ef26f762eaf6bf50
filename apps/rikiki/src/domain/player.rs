//! A seat at the table: identity, secrets, hand, bid and tricks.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::playerlist::normalize_name;
use super::round::{BidOutcome, PlayOutcome, Round};
use super::tokens::{generate_cookie, generate_secret, public_digest};
use crate::domain::Card;
use crate::errors::domain::{DomainError, PlayerRef, ValidationKind};

/// Number of a round within a game, starting at 1.
pub type RoundNo = u32;

/// Stable public identifier of a player, safe to show to everybody.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Derived once from the player's position in the invitation list and
    /// a digest of the invite secret.
    pub fn derive(seq: usize, invite_secret: &str) -> Self {
        PlayerId(format!("p{seq}-{}", public_digest(invite_secret)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        PlayerId(s.to_string())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    id: PlayerId,
    provisional_name: String,
    confirmed_name: Option<String>,
    secret_id: String,
    cookie: Option<String>,
    hand: Vec<Card>,
    bid: Option<u8>,
    tricks: u8,
    round: Option<RoundNo>,
}

impl Player {
    pub fn new<R: Rng + ?Sized>(seq: usize, provisional_name: impl Into<String>, rng: &mut R) -> Self {
        let secret_id = generate_secret(rng);
        Player {
            id: PlayerId::derive(seq, &secret_id),
            provisional_name: provisional_name.into(),
            confirmed_name: None,
            secret_id,
            cookie: None,
            hand: Vec::new(),
            bid: None,
            tricks: 0,
            round: None,
        }
    }

    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    pub fn name(&self) -> &str {
        self.confirmed_name
            .as_deref()
            .unwrap_or(&self.provisional_name)
    }

    pub fn provisional_name(&self) -> &str {
        &self.provisional_name
    }

    pub fn secret_id(&self) -> &str {
        &self.secret_id
    }

    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed_name.is_some()
    }

    pub fn has_bid(&self) -> bool {
        self.bid.is_some()
    }

    pub fn bid(&self) -> Option<u8> {
        self.bid
    }

    pub fn tricks(&self) -> u8 {
        self.tricks
    }

    pub fn cards(&self) -> &[Card] {
        &self.hand
    }

    pub fn card_count(&self) -> usize {
        self.hand.len()
    }

    /// Number of the round that dealt the current hand.
    pub fn round(&self) -> Option<RoundNo> {
        self.round
    }

    pub fn player_ref(&self) -> PlayerRef {
        PlayerRef {
            id: self.id.clone(),
            name: self.name().to_string(),
        }
    }

    /// Cards of the hand that `round` would accept right now.
    pub fn playable_cards(&self, round: &Round) -> Vec<Card> {
        self.hand
            .iter()
            .copied()
            .filter(|&c| round.card_allowed(c, &self.hand))
            .collect()
    }

    /// Take the seat. A blank name keeps the provisional one.
    pub fn confirm<R: Rng + ?Sized>(&mut self, proposed_name: &str, rng: &mut R) -> Result<(), DomainError> {
        if self.is_confirmed() {
            return Err(DomainError::illegal_state(format!(
                "{} has already confirmed",
                self.name()
            )));
        }
        let name = normalize_name(proposed_name);
        self.confirmed_name = Some(if name.is_empty() {
            self.provisional_name.clone()
        } else {
            name
        });
        self.renew_secret(rng);
        Ok(())
    }

    pub(crate) fn ensure_can_accept(&self, round_no: RoundNo) -> Result<(), DomainError> {
        self.ensure_confirmed()?;
        match self.round {
            Some(current) if current != round_no && !self.hand.is_empty() => {
                Err(DomainError::illegal_state(format!(
                    "{} still holds cards from round {current}",
                    self.name()
                )))
            }
            _ => Ok(()),
        }
    }

    pub fn accept_cards(&mut self, round_no: RoundNo, cards: Vec<Card>) -> Result<(), DomainError> {
        self.ensure_can_accept(round_no)?;
        self.hand = cards;
        self.round = Some(round_no);
        self.bid = None;
        self.tricks = 0;
        Ok(())
    }

    pub fn place_bid(&mut self, value: u8, round: &mut Round) -> Result<BidOutcome, DomainError> {
        self.ensure_confirmed()?;
        self.ensure_holds_cards_for(round)?;
        if value > round.hand_size() {
            return Err(DomainError::validation(
                ValidationKind::InvalidBid,
                format!("Bid must be between 0 and {}", round.hand_size()),
            ));
        }
        let outcome = round.place_bid(&self.id, value)?;
        self.bid = Some(value);
        Ok(outcome)
    }

    /// Play `card` into `round`. The hand is left untouched if the round
    /// rejects the play.
    pub fn play_card(&mut self, card: Card, round: &mut Round) -> Result<PlayOutcome, DomainError> {
        self.ensure_confirmed()?;
        self.ensure_holds_cards_for(round)?;
        if self.bid.is_none() {
            return Err(DomainError::illegal_state(format!(
                "{} has not bid yet",
                self.name()
            )));
        }
        let pos = match self.hand.iter().position(|&c| c == card) {
            Some(pos) if round.card_allowed(card, &self.hand) => pos,
            _ => {
                return Err(DomainError::CardNotAllowed {
                    player: self.player_ref(),
                    card,
                })
            }
        };

        self.hand.remove(pos);
        match round.play_card(&self.id, card, self.hand.len()) {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                self.hand.insert(pos, card);
                Err(e)
            }
        }
    }

    pub fn add_trick(&mut self) -> Result<(), DomainError> {
        self.ensure_confirmed()?;
        if self.bid.is_none() {
            return Err(DomainError::illegal_state(format!(
                "{} cannot win a trick without a bid",
                self.name()
            )));
        }
        self.tricks += 1;
        Ok(())
    }

    /// Replace the secret (and session cookie). The old link stops working.
    pub fn update_secret<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), DomainError> {
        self.ensure_confirmed()?;
        self.renew_secret(rng);
        Ok(())
    }

    /// Back to an unconfirmed seat. The current secret becomes the link to
    /// confirm again.
    pub fn reset_for_new_game(&mut self) {
        self.confirmed_name = None;
        self.cookie = None;
        self.hand.clear();
        self.bid = None;
        self.tricks = 0;
        self.round = None;
    }

    fn renew_secret<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.secret_id = generate_secret(rng);
        self.cookie = Some(generate_cookie(rng));
    }

    fn ensure_confirmed(&self) -> Result<(), DomainError> {
        if self.is_confirmed() {
            Ok(())
        } else {
            Err(DomainError::illegal_state(format!(
                "{} has not confirmed",
                self.name()
            )))
        }
    }

    fn ensure_holds_cards_for(&self, round: &Round) -> Result<(), DomainError> {
        if self.hand.is_empty() || self.round != Some(round.number()) {
            return Err(DomainError::illegal_state(format!(
                "{} holds no cards for round {}",
                self.name(),
                round.number()
            )));
        }
        Ok(())
    }
}
