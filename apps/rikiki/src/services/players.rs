//! Player use-cases. Every call identifies the player by the secret in
//! their private link, or by the session cookie when restoring a link.

use serde::Serialize;
use tracing::info;

use crate::domain::rules::valid_bid_range;
use crate::domain::{
    Card, Game, GameState, Play, Player, PlayerId, Round, RoundAdvance, RoundState,
};
use crate::error::AppError;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::state::AppState;

/// What the confirmation page shows before the player commits.
#[derive(Debug, Serialize)]
pub struct ConfirmInfo {
    pub name: String,
    pub too_late: bool,
    pub already_confirmed: bool,
}

/// A new link (and session cookie) issued on confirmation or restore.
#[derive(Debug, Serialize)]
pub struct IssuedLink {
    pub secret_id: String,
    pub player_url: String,
    #[serde(skip)]
    pub cookie: String,
}

#[derive(Debug, Serialize)]
pub struct RestoreInfo {
    pub name: String,
    pub csrf_token: String,
}

#[derive(Debug, Serialize)]
pub struct SeatView {
    pub id: PlayerId,
    pub name: String,
    pub bid: Option<u8>,
    pub tricks: u8,
    pub cards_left: usize,
}

#[derive(Debug, Serialize)]
pub struct RoundView {
    pub number: u32,
    pub state: RoundState,
    pub hand_size: u8,
    pub trump: Option<Card>,
    pub current_player: Option<PlayerId>,
    pub seats: Vec<SeatView>,
    pub table: Vec<Play>,
    pub last_trick_winner: Option<PlayerId>,
}

/// Everything one player's screen needs. Other players' hands never
/// appear here.
#[derive(Debug, Serialize)]
pub struct PlayerStatus {
    pub id: PlayerId,
    pub name: String,
    pub confirmed: bool,
    pub game_state: GameState,
    pub hand: Vec<Card>,
    pub bid: Option<u8>,
    pub tricks: u8,
    pub your_turn: bool,
    /// Bids the player may place now; empty unless it is their turn to bid.
    pub valid_bids: Vec<u8>,
    /// Cards the player may play now; empty unless it is their turn to play.
    pub playable: Vec<Card>,
    pub round: Option<RoundView>,
}

/// Body of bid / play / finish responses. Moves that are merely wrong
/// right now come back as `ok: false` so the player can try again.
#[derive(Debug, Serialize)]
pub struct ActionResult {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advance: Option<RoundAdvance>,
}

impl ActionResult {
    fn accepted() -> Self {
        Self {
            ok: true,
            error: None,
            advance: None,
        }
    }

    fn rejected(err: &DomainError) -> Self {
        Self {
            ok: false,
            error: Some(err.to_string()),
            advance: None,
        }
    }
}

/// Split player mistakes (turned into `ok: false`) from real failures.
fn player_outcome(result: Result<(), DomainError>) -> Result<ActionResult, AppError> {
    match result {
        Ok(()) => Ok(ActionResult::accepted()),
        Err(err)
            if err.is_player_retryable()
                || matches!(err, DomainError::Validation(ValidationKind::InvalidBid, _)) =>
        {
            Ok(ActionResult::rejected(&err))
        }
        Err(err) => Err(err.into()),
    }
}

pub struct PlayerService<'a> {
    state: &'a AppState,
}

impl<'a> PlayerService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub fn confirm_info(&self, secret_id: &str) -> Result<ConfirmInfo, AppError> {
        self.state.with_game(|game| {
            let player = game.player_by_secret_id(secret_id)?;
            Ok(ConfirmInfo {
                name: player.name().to_string(),
                too_late: game.state() != GameState::Confirming,
                already_confirmed: player.is_confirmed(),
            })
        })
    }

    /// Take the seat. The invite secret is replaced, so the returned link
    /// is the one to keep.
    pub fn confirm(&self, secret_id: &str, player_name: &str) -> Result<IssuedLink, AppError> {
        self.state.with_game(|game| {
            let id = game.player_by_secret_id(secret_id)?.id().clone();
            game.confirm_player(&id, player_name)?;
            issued_link(self.state, game.player_by_id(&id)?)
        })
    }

    /// Status plus the game summary it was built from, for the ETag.
    pub fn status(&self, secret_id: &str) -> Result<(PlayerStatus, String), AppError> {
        self.state.with_game(|game| {
            let player = game.player_by_secret_id(secret_id)?;
            Ok((player_status(game, player), game.status_summary()))
        })
    }

    pub fn place_bid(&self, secret_id: &str, bid: u8) -> Result<ActionResult, AppError> {
        self.state.with_game(|game| {
            let id = game.player_by_secret_id(secret_id)?.id().clone();
            player_outcome(game.place_bid(&id, bid).map(drop))
        })
    }

    pub fn play_card(&self, secret_id: &str, card: Card) -> Result<ActionResult, AppError> {
        self.state.with_game(|game| {
            let id = game.player_by_secret_id(secret_id)?.id().clone();
            player_outcome(game.play_card(&id, card).map(drop))
        })
    }

    /// "Next round" button. Several players usually click it at once; all
    /// but the first see `ALREADY_ADVANCED`.
    pub fn finish_round(&self, secret_id: &str) -> Result<ActionResult, AppError> {
        self.state.with_game(|game| {
            let player = game.player_by_secret_id(secret_id)?;
            if !player.is_confirmed() {
                return Err(DomainError::illegal_state(format!(
                    "{} is not playing in this game",
                    player.name()
                ))
                .into());
            }
            let advance = game.start_next_round()?;
            Ok(ActionResult {
                advance: Some(advance),
                ..ActionResult::accepted()
            })
        })
    }

    pub fn restore_info(&self, cookie: &str) -> Result<RestoreInfo, AppError> {
        self.state.with_game(|game| {
            let player = game.player_by_cookie(cookie)?;
            Ok(RestoreInfo {
                name: player.name().to_string(),
                csrf_token: game.csrf_token().to_string(),
            })
        })
    }

    /// Issue a fresh link to the player holding `cookie`. The old link
    /// stops working.
    pub fn restore(&self, cookie: &str, csrf_token: &str) -> Result<IssuedLink, AppError> {
        self.state.with_game(|game| {
            let id = game.player_by_cookie(cookie)?.id().clone();
            let player = game.rotate_secret(&id, csrf_token)?;
            info!(player_id = %id, "Player link restored");
            issued_link(self.state, player)
        })
    }
}

fn issued_link(state: &AppState, player: &Player) -> Result<IssuedLink, AppError> {
    let cookie = player
        .cookie()
        .ok_or_else(|| AppError::internal("confirmed player has no session cookie"))?;
    Ok(IssuedLink {
        secret_id: player.secret_id().to_string(),
        player_url: state.config().player_url(player.secret_id()),
        cookie: cookie.to_string(),
    })
}

fn player_status(game: &Game, player: &Player) -> PlayerStatus {
    let round = game.round().filter(|_| game.state() != GameState::Confirming);
    let your_turn = round
        .and_then(Round::current_player)
        .is_some_and(|seat| &seat.id == player.id());
    let round_state = round.map(Round::state);

    let valid_bids = match round {
        Some(r) if your_turn && r.state() == RoundState::Bidding => {
            valid_bid_range(r.hand_size()).collect()
        }
        _ => Vec::new(),
    };
    let playable = match (round, round_state) {
        (Some(r), Some(RoundState::Playing | RoundState::BetweenTricks)) if your_turn => {
            player.playable_cards(r)
        }
        _ => Vec::new(),
    };

    PlayerStatus {
        id: player.id().clone(),
        name: player.name().to_string(),
        confirmed: player.is_confirmed(),
        game_state: game.state(),
        hand: player.cards().to_vec(),
        bid: player.bid(),
        tricks: player.tricks(),
        your_turn,
        valid_bids,
        playable,
        round: round.map(|r| round_view(game, r)),
    }
}

fn round_view(game: &Game, round: &Round) -> RoundView {
    RoundView {
        number: round.number(),
        state: round.state(),
        hand_size: round.hand_size(),
        trump: round.trump(),
        current_player: round.current_player().map(|s| s.id.clone()),
        seats: round
            .players()
            .iter()
            .map(|seat| SeatView {
                id: seat.id.clone(),
                name: seat.name.clone(),
                bid: seat.bid,
                tricks: game.player_by_id(&seat.id).map_or(0, Player::tricks),
                cards_left: seat.cards_left,
            })
            .collect(),
        table: round.current_trick().to_vec(),
        last_trick_winner: round.last_trick_winner().cloned(),
    }
}
