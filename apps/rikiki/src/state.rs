use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::config::Config;
use crate::domain::tokens::tokens_match;
use crate::domain::Game;
use crate::error::AppError;

/// Shared application state: configuration and the one game this server
/// hosts. Every request locks the slot, acts, and unlocks.
#[derive(Debug, Clone)]
pub struct AppState {
    config: Arc<Config>,
    game: Arc<Mutex<Option<Game>>>,
    games_created: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            game: Arc::new(Mutex::new(None)),
            games_created: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn for_tests() -> Self {
        Self::new(Config::for_tests())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Rejects anything but the configured organizer secret.
    pub fn check_organizer(&self, supplied: &str) -> Result<(), AppError> {
        if tokens_match(&self.config.organizer_secret, supplied) {
            Ok(())
        } else {
            Err(AppError::forbidden())
        }
    }

    /// Random source for the next game. With a configured seed, the n-th
    /// game of the process is always dealt the same way.
    pub fn next_game_rng(&self) -> ChaCha20Rng {
        let n = self.games_created.fetch_add(1, Ordering::Relaxed);
        match self.config.rng_seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed.wrapping_add(n)),
            None => ChaCha20Rng::from_os_rng(),
        }
    }

    /// Install `game`, dropping whatever was there.
    pub fn replace_game(&self, game: Game) {
        *self.game.lock() = Some(game);
    }

    pub fn has_game(&self) -> bool {
        self.game.lock().is_some()
    }

    /// Run `f` on the game under the lock; `GAME_NOT_FOUND` when there is none.
    pub fn with_game<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Game) -> Result<T, AppError>,
    {
        let mut slot = self.game.lock();
        let game = slot.as_mut().ok_or_else(AppError::game_not_found)?;
        f(game)
    }
}
