//! The whole game: roster, confirmation, and the sequence of rounds.
//!
//! `Game` is the only place where players and the current round meet. It
//! forwards player actions to the round and applies the outcomes the round
//! reports (crediting tricks, pausing between rounds).

use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use serde::Serialize;
use tracing::{debug, info};

use super::player::{Player, PlayerId};
use super::round::{BidOutcome, PlayOutcome, Round, RoundState};
use super::rules::{next_hand_size, starting_hand_size, Direction, MAX_PLAYERS, MIN_PLAYERS};
use super::tokens::{generate_csrf_token, tokens_match};
use crate::domain::Card;
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};

const RESHUFFLE_ATTEMPTS: usize = 8;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameState {
    Confirming,
    Playing,
    PausedBetweenRounds,
    Done,
}

/// Result of asking for the next round.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundAdvance {
    Started,
    GameOver,
    /// Somebody else already moved the game on.
    AlreadyAdvanced,
}

#[derive(Debug)]
pub struct Game {
    players: Vec<Player>,
    /// Indexes into `players`, in turn order for the current round.
    confirmed_players: Vec<usize>,
    state: GameState,
    current_hand_size: u8,
    starting_hand_size: u8,
    direction: Direction,
    round: Option<Round>,
    rounds_played: u32,
    csrf_token: String,
    rng: ChaCha20Rng,
}

impl Game {
    pub fn new<I, S>(names: I, mut rng: ChaCha20Rng) -> Result<Game, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let players: Vec<Player> = names
            .into_iter()
            .enumerate()
            .map(|(seq, name)| Player::new(seq + 1, name, &mut rng))
            .collect();
        if players.is_empty() || players.len() > MAX_PLAYERS {
            return Err(DomainError::validation(
                ValidationKind::InvalidPlayerCount,
                format!("A game needs 1 to {MAX_PLAYERS} players"),
            ));
        }
        let csrf_token = generate_csrf_token(&mut rng);
        info!(players = players.len(), "Game created");
        Ok(Game {
            players,
            confirmed_players: Vec::new(),
            state: GameState::Confirming,
            current_hand_size: 0,
            starting_hand_size: 0,
            direction: Direction::Descending,
            round: None,
            rounds_played: 0,
            csrf_token,
            rng,
        })
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Turn order of the current round.
    pub fn confirmed_players(&self) -> impl Iterator<Item = &Player> + '_ {
        self.confirmed_players.iter().map(|&i| &self.players[i])
    }

    pub fn confirmed_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_confirmed()).count()
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn current_hand_size(&self) -> u8 {
        self.current_hand_size
    }

    pub fn starting_hand_size(&self) -> u8 {
        self.starting_hand_size
    }

    /// Current round, or the finished one while paused or done.
    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn csrf_token(&self) -> &str {
        &self.csrf_token
    }

    pub fn start_game(&mut self) -> Result<(), DomainError> {
        if self.state != GameState::Confirming {
            return Err(DomainError::illegal_state("the game has already started"));
        }
        let confirmed: Vec<usize> = self
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_confirmed())
            .map(|(i, _)| i)
            .collect();
        if confirmed.len() < MIN_PLAYERS {
            return Err(DomainError::illegal_state(format!(
                "at least {MIN_PLAYERS} players must confirm, {} did",
                confirmed.len()
            )));
        }

        let hand_size = starting_hand_size(confirmed.len());
        let round = Round::start(1, &mut self.players, &confirmed, hand_size, &mut self.rng)?;
        self.confirmed_players = confirmed;
        self.starting_hand_size = hand_size;
        self.current_hand_size = hand_size;
        self.direction = Direction::Descending;
        self.round = Some(round);
        self.state = GameState::Playing;
        info!(
            players = self.confirmed_players.len(),
            hand_size, "Game started"
        );
        Ok(())
    }

    /// Confirm the seat of `id`, only possible before the game starts.
    pub fn confirm_player(&mut self, id: &PlayerId, name: &str) -> Result<(), DomainError> {
        let idx = self.index_of(id)?;
        if self.state != GameState::Confirming {
            return Err(DomainError::illegal_state(
                "too late to confirm, the game has started",
            ));
        }
        self.players[idx].confirm(name, &mut self.rng)?;
        info!(player_id = %id, "Player confirmed");
        Ok(())
    }

    pub fn place_bid(&mut self, id: &PlayerId, value: u8) -> Result<BidOutcome, DomainError> {
        let idx = self.index_of(id)?;
        let round = active_round(self.state, &mut self.round)?;
        let outcome = self.players[idx].place_bid(value, round)?;
        debug!(player_id = %id, bid = value, "Bid placed");
        Ok(outcome)
    }

    pub fn play_card(&mut self, id: &PlayerId, card: Card) -> Result<PlayOutcome, DomainError> {
        let idx = self.index_of(id)?;
        let round = active_round(self.state, &mut self.round)?;
        let outcome = self.players[idx].play_card(card, round)?;

        if let Some(winner) = &outcome.trick_winner {
            let w = self.index_of(winner)?;
            self.players[w].add_trick()?;
            debug!(player_id = %winner, "Trick won");
        }
        if outcome.round_finished {
            self.round_finished()?;
        }
        Ok(outcome)
    }

    /// Pause between rounds. Only valid once the current round is done.
    pub fn round_finished(&mut self) -> Result<(), DomainError> {
        if self.state != GameState::Playing {
            return Err(DomainError::illegal_state("no round is being played"));
        }
        if self.round.as_ref().map(Round::state) != Some(RoundState::Done) {
            return Err(DomainError::illegal_state(
                "the current round still has cards to play",
            ));
        }
        self.state = GameState::PausedBetweenRounds;
        self.rounds_played += 1;
        info!(
            round = self.rounds_played,
            hand_size = self.current_hand_size,
            "Round finished"
        );
        Ok(())
    }

    /// Move on after a finished round. Repeated requests from players who
    /// clicked at the same time report `AlreadyAdvanced`.
    pub fn start_next_round(&mut self) -> Result<RoundAdvance, DomainError> {
        match self.state {
            GameState::Done => return Ok(RoundAdvance::AlreadyAdvanced),
            GameState::Playing if self.is_fresh_round() => {
                return Ok(RoundAdvance::AlreadyAdvanced)
            }
            GameState::PausedBetweenRounds => {}
            _ => {
                return Err(DomainError::illegal_state(
                    "the current round is not finished",
                ))
            }
        }

        let Some((hand_size, direction)) =
            next_hand_size(self.current_hand_size, self.starting_hand_size, self.direction)
        else {
            self.state = GameState::Done;
            info!(rounds = self.rounds_played, "Game over");
            return Ok(RoundAdvance::GameOver);
        };

        let mut order = self.confirmed_players.clone();
        order.rotate_left(1);
        let number = self.round.as_ref().map_or(1, |r| r.number() + 1);
        let round = Round::start(number, &mut self.players, &order, hand_size, &mut self.rng)?;

        self.confirmed_players = order;
        self.current_hand_size = hand_size;
        self.direction = direction;
        self.round = Some(round);
        self.state = GameState::Playing;
        info!(round = number, hand_size, "Round started");
        Ok(RoundAdvance::Started)
    }

    /// Play again with the same invitations once a game is over. Players
    /// confirm anew through their current links.
    pub fn restart_with_same_players(&mut self) -> Result<(), DomainError> {
        if self.state != GameState::Done {
            return Err(DomainError::illegal_state("the game is not over"));
        }
        for player in &mut self.players {
            player.reset_for_new_game();
        }
        if self.players.len() > 1 {
            let before: Vec<PlayerId> = self.players.iter().map(|p| p.id().clone()).collect();
            for _ in 0..RESHUFFLE_ATTEMPTS {
                self.players.shuffle(&mut self.rng);
                if self.players.iter().map(Player::id).ne(before.iter()) {
                    break;
                }
            }
        }
        self.confirmed_players.clear();
        self.round = None;
        self.rounds_played = 0;
        self.current_hand_size = 0;
        self.starting_hand_size = 0;
        self.direction = Direction::Descending;
        self.state = GameState::Confirming;
        info!(players = self.players.len(), "Game restarted");
        Ok(())
    }

    /// Issue a fresh secret to `id`, e.g. after they lost their link.
    pub fn rotate_secret(&mut self, id: &PlayerId, csrf_token: &str) -> Result<&Player, DomainError> {
        if !tokens_match(&self.csrf_token, csrf_token) {
            return Err(DomainError::forbidden("stale or missing CSRF token"));
        }
        let idx = self.index_of(id)?;
        self.players[idx].update_secret(&mut self.rng)?;
        info!(player_id = %id, "Secret rotated");
        Ok(&self.players[idx])
    }

    pub fn player_by_id(&self, id: &PlayerId) -> Result<&Player, DomainError> {
        self.players
            .iter()
            .find(|p| p.id() == id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, "no such player"))
    }

    pub fn player_by_secret_id(&self, secret_id: &str) -> Result<&Player, DomainError> {
        self.players
            .iter()
            .find(|p| tokens_match(p.secret_id(), secret_id))
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, "unknown secret"))
    }

    pub fn player_by_cookie(&self, cookie: &str) -> Result<&Player, DomainError> {
        self.players
            .iter()
            .find(|p| p.cookie().is_some_and(|c| tokens_match(c, cookie)))
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, "unknown session"))
    }

    /// Cheap fingerprint of everything a status poll shows.
    pub fn status_summary(&self) -> String {
        let name_checksum: usize = self
            .players
            .iter()
            .filter(|p| p.is_confirmed())
            .map(|p| p.name().len())
            .sum();
        let round = match (self.state, &self.round) {
            (GameState::Confirming, _) | (_, None) => "-".to_string(),
            (_, Some(r)) => format!("{}/{}", r.number(), r.status_summary()),
        };
        format!(
            "{}:{}:{:?}:{}",
            self.confirmed_count(),
            name_checksum,
            self.state,
            round
        )
    }

    fn index_of(&self, id: &PlayerId) -> Result<usize, DomainError> {
        self.players
            .iter()
            .position(|p| p.id() == id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, "no such player"))
    }

    fn is_fresh_round(&self) -> bool {
        self.round
            .as_ref()
            .is_some_and(|r| r.state() == RoundState::Bidding && r.bids().is_empty())
    }
}

fn active_round(state: GameState, round: &mut Option<Round>) -> Result<&mut Round, DomainError> {
    match round {
        Some(round) if state == GameState::Playing => Ok(round),
        _ => Err(DomainError::illegal_state("no round is being played")),
    }
}
