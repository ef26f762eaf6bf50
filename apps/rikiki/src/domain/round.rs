//! One deal: bidding, then tricks until every hand is empty.
//!
//! A round only knows its seats by id and name. It never touches `Player`
//! after the deal; instead every mutation returns an outcome for the
//! caller to act on (crediting the trick winner, finishing the round).

use rand::Rng;
use serde::Serialize;

use super::cards_logic::{card_allowed, winning_index};
use super::dealing::deal_hands;
use super::player::{Player, PlayerId, RoundNo};
use super::rules::{valid_hand_size, MIN_PLAYERS};
use crate::domain::Card;
use crate::errors::domain::{DomainError, PlayerRef, ValidationKind};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundState {
    Bidding,
    Playing,
    /// A trick just completed and is still on display.
    BetweenTricks,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BidOutcome {
    AwaitingBid { next: PlayerId },
    BiddingComplete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayOutcome {
    /// Set when this play completed a trick.
    pub trick_winner: Option<PlayerId>,
    pub round_finished: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub id: PlayerId,
    pub name: String,
    pub bid: Option<u8>,
    pub cards_left: usize,
}

impl Seat {
    fn player_ref(&self) -> PlayerRef {
        PlayerRef {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Play {
    pub player: PlayerId,
    pub card: Card,
}

#[derive(Debug, Clone)]
pub struct Round {
    number: RoundNo,
    seats: Vec<Seat>,
    hand_size: u8,
    trump: Option<Card>,
    state: RoundState,
    current: usize,
    current_trick: Vec<Play>,
    tricks_played: u8,
    last_trick_winner: Option<PlayerId>,
}

impl Round {
    /// Deal a new round to the players at `order` (indexes into `roster`),
    /// in seat order.
    pub fn start<R: Rng + ?Sized>(
        number: RoundNo,
        roster: &mut [Player],
        order: &[usize],
        hand_size: u8,
        rng: &mut R,
    ) -> Result<Round, DomainError> {
        if order.len() < MIN_PLAYERS {
            return Err(DomainError::validation(
                ValidationKind::InvalidPlayerCount,
                format!("A round needs at least {MIN_PLAYERS} players"),
            ));
        }
        for &idx in order {
            let player = roster
                .get(idx)
                .ok_or_else(|| DomainError::illegal_state(format!("no player at seat {idx}")))?;
            player.ensure_can_accept(number)?;
        }
        if !valid_hand_size(hand_size, order.len()) {
            return Err(DomainError::validation(
                ValidationKind::InvalidHandSize,
                format!("Cannot deal {hand_size} cards to {} players", order.len()),
            ));
        }

        let deal = deal_hands(order.len(), hand_size, rng)?;
        let mut seats = Vec::with_capacity(order.len());
        for (&idx, hand) in order.iter().zip(deal.hands) {
            let player = &mut roster[idx];
            player.accept_cards(number, hand)?;
            seats.push(Seat {
                id: player.id().clone(),
                name: player.name().to_string(),
                bid: None,
                cards_left: hand_size as usize,
            });
        }

        Ok(Round {
            number,
            seats,
            hand_size,
            trump: deal.trump,
            state: RoundState::Bidding,
            current: 0,
            current_trick: Vec::new(),
            tricks_played: 0,
            last_trick_winner: None,
        })
    }

    pub fn number(&self) -> RoundNo {
        self.number
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn hand_size(&self) -> u8 {
        self.hand_size
    }

    pub fn trump(&self) -> Option<Card> {
        self.trump
    }

    pub fn players(&self) -> &[Seat] {
        &self.seats
    }

    /// Whose turn it is; `None` once the round is done.
    pub fn current_player(&self) -> Option<&Seat> {
        match self.state {
            RoundState::Done => None,
            _ => self.seats.get(self.current),
        }
    }

    /// Cards on the table. After a trick completes they stay visible until
    /// the next card is played.
    pub fn current_trick(&self) -> &[Play] {
        &self.current_trick
    }

    /// The play currently winning the trick on the table.
    pub fn leading_play(&self) -> Option<&Play> {
        let cards: Vec<Card> = self.current_trick.iter().map(|p| p.card).collect();
        winning_index(&cards, self.trump).map(|i| &self.current_trick[i])
    }

    pub fn bids(&self) -> Vec<(PlayerId, u8)> {
        self.seats
            .iter()
            .filter_map(|s| s.bid.map(|b| (s.id.clone(), b)))
            .collect()
    }

    pub fn tricks_played(&self) -> u8 {
        self.tricks_played
    }

    pub fn last_trick_winner(&self) -> Option<&PlayerId> {
        self.last_trick_winner.as_ref()
    }

    pub fn card_allowed(&self, card: Card, hand: &[Card]) -> bool {
        let table: Vec<Card> = match self.state {
            RoundState::Playing => self.current_trick.iter().map(|p| p.card).collect(),
            _ => Vec::new(),
        };
        card_allowed(card, hand, &table)
    }

    pub fn place_bid(&mut self, player: &PlayerId, value: u8) -> Result<BidOutcome, DomainError> {
        if self.state != RoundState::Bidding {
            return Err(DomainError::illegal_state(format!(
                "round {} is not taking bids",
                self.number
            )));
        }
        self.ensure_turn("bid", player)?;
        if value > self.hand_size {
            return Err(DomainError::validation(
                ValidationKind::InvalidBid,
                format!("Bid must be between 0 and {}", self.hand_size),
            ));
        }

        self.seats[self.current].bid = Some(value);
        self.current += 1;
        if self.current == self.seats.len() {
            self.current = 0;
            self.state = RoundState::Playing;
            return Ok(BidOutcome::BiddingComplete);
        }
        Ok(BidOutcome::AwaitingBid {
            next: self.seats[self.current].id.clone(),
        })
    }

    /// Record `card` for `player`, who has `cards_left` cards after playing it.
    ///
    /// The round keeps its own count per seat; a `cards_left` that is not
    /// exactly one below it is rejected.
    pub fn play_card(
        &mut self,
        player: &PlayerId,
        card: Card,
        cards_left: usize,
    ) -> Result<PlayOutcome, DomainError> {
        if !matches!(self.state, RoundState::Playing | RoundState::BetweenTricks) {
            return Err(DomainError::illegal_state(format!(
                "round {} is not accepting cards",
                self.number
            )));
        }
        self.ensure_turn("play", player)?;

        let seat = self.current;
        let expected_left = self.seats[seat].cards_left.checked_sub(1);
        if expected_left != Some(cards_left) {
            return Err(DomainError::illegal_state(format!(
                "{} has {} cards in round {}, not {}",
                self.seats[seat].name,
                self.seats[seat].cards_left,
                self.number,
                cards_left + 1
            )));
        }

        let n = self.seats.len();
        let fresh_trick = self.state == RoundState::BetweenTricks;
        let trick_len = if fresh_trick { 0 } else { self.current_trick.len() };
        let completes = trick_len + 1 == n;
        if completes {
            let emptied = self
                .seats
                .iter()
                .enumerate()
                .filter(|&(i, s)| {
                    let left = if i == seat { cards_left } else { s.cards_left };
                    left == 0
                })
                .count();
            if emptied > 0 && emptied < n {
                return Err(DomainError::illegal_state(
                    "some players ran out of cards before others",
                ));
            }
        }

        if fresh_trick {
            self.current_trick.clear();
            self.state = RoundState::Playing;
        }

        self.seats[seat].cards_left = cards_left;
        self.current_trick.push(Play {
            player: player.clone(),
            card,
        });
        self.current = (self.current + 1) % n;

        if !completes {
            return Ok(PlayOutcome {
                trick_winner: None,
                round_finished: false,
            });
        }

        let winner_id = match self.leading_play() {
            Some(play) => play.player.clone(),
            None => player.clone(),
        };
        let winner = self
            .seats
            .iter()
            .position(|s| s.id == winner_id)
            .unwrap_or(seat);
        self.tricks_played += 1;
        self.last_trick_winner = Some(winner_id.clone());
        let round_finished = self.seats.iter().all(|s| s.cards_left == 0);
        if round_finished {
            self.state = RoundState::Done;
        } else {
            self.state = RoundState::BetweenTricks;
            self.current = winner;
        }
        Ok(PlayOutcome {
            trick_winner: Some(winner_id),
            round_finished,
        })
    }

    /// Cheap fingerprint of the visible state, for "nothing changed" polling.
    pub fn status_summary(&self) -> String {
        let detail: Vec<String> = match self.state {
            RoundState::Bidding => self
                .seats
                .iter()
                .filter_map(|s| s.bid.map(|b| b.to_string()))
                .collect(),
            _ => self.seats.iter().map(|s| s.cards_left.to_string()).collect(),
        };
        format!(
            "{:?}:{}:{}:{}",
            self.state,
            self.current,
            self.current_trick.len(),
            detail.join(",")
        )
    }

    fn ensure_turn(&self, operation: &'static str, player: &PlayerId) -> Result<(), DomainError> {
        let expected = &self.seats[self.current];
        if &expected.id == player {
            return Ok(());
        }
        let offending = self
            .seats
            .iter()
            .find(|s| &s.id == player)
            .map(Seat::player_ref)
            .unwrap_or_else(|| PlayerRef {
                id: player.clone(),
                name: player.to_string(),
            });
        Err(DomainError::OutOfTurn {
            operation,
            expected: expected.player_ref(),
            offending,
        })
    }
}
