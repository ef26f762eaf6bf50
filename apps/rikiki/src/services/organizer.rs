//! Organizer use-cases: set up the game, watch confirmations, start and
//! restart it.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::domain::playerlist::parse_playerlist;
use crate::domain::rules::total_rounds;
use crate::domain::{Game, GameState, PlayerId};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct OrganizerPlayer {
    pub id: PlayerId,
    pub name: String,
    pub confirmed: bool,
    /// Private link to hand to this player.
    pub link: String,
}

#[derive(Debug, Serialize)]
pub struct OrganizerView {
    pub state: GameState,
    pub csrf_token: String,
    pub rounds_played: u32,
    /// Known once the game has started.
    pub total_rounds: Option<u32>,
    pub confirmed: usize,
    pub players: Vec<OrganizerPlayer>,
}

/// Dashboard poll: who has confirmed so far, and how big hands are.
#[derive(Debug, Serialize)]
pub struct GameStatus {
    pub state: GameState,
    pub players: BTreeMap<PlayerId, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_card_count: Option<u8>,
}

pub struct OrganizerService<'a> {
    state: &'a AppState,
}

impl<'a> OrganizerService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Replace the current game (if any) with a fresh one for `playerlist`.
    pub fn setup_game(&self, playerlist: &str) -> Result<OrganizerView, AppError> {
        let names = parse_playerlist(playerlist)?;
        let game = Game::new(names, self.state.next_game_rng())?;
        let view = organizer_view(&game, self.state.config());
        if self.state.has_game() {
            info!(players = view.players.len(), "Replacing the running game");
        }
        self.state.replace_game(game);
        Ok(view)
    }

    pub fn view(&self) -> Result<OrganizerView, AppError> {
        let config = self.state.config();
        self.state.with_game(|game| Ok(organizer_view(game, config)))
    }

    /// Status plus the summary it was built from, for the ETag.
    pub fn status(&self) -> Result<(GameStatus, String), AppError> {
        self.state.with_game(|game| Ok((game_status(game), game.status_summary())))
    }

    pub fn start(&self) -> Result<OrganizerView, AppError> {
        let config = self.state.config();
        self.state.with_game(|game| {
            game.start_game()?;
            Ok(organizer_view(game, config))
        })
    }

    pub fn restart(&self) -> Result<OrganizerView, AppError> {
        let config = self.state.config();
        self.state.with_game(|game| {
            game.restart_with_same_players()?;
            Ok(organizer_view(game, config))
        })
    }
}

fn organizer_view(game: &Game, config: &Config) -> OrganizerView {
    OrganizerView {
        state: game.state(),
        csrf_token: game.csrf_token().to_string(),
        rounds_played: game.rounds_played(),
        total_rounds: match game.state() {
            GameState::Confirming => None,
            _ => Some(total_rounds(game.starting_hand_size())),
        },
        confirmed: game.confirmed_count(),
        players: game
            .players()
            .iter()
            .map(|p| OrganizerPlayer {
                id: p.id().clone(),
                name: p.name().to_string(),
                confirmed: p.is_confirmed(),
                link: config.player_url(p.secret_id()),
            })
            .collect(),
    }
}

fn game_status(game: &Game) -> GameStatus {
    GameStatus {
        state: game.state(),
        players: game
            .players()
            .iter()
            .filter(|p| p.is_confirmed())
            .map(|p| (p.id().clone(), p.name().to_string()))
            .collect(),
        current_card_count: match game.state() {
            GameState::Confirming => None,
            _ => Some(game.current_hand_size()),
        },
    }
}
