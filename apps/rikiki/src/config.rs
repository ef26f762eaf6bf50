//! Process configuration, read once at startup from `RIKIKI_*` variables.

use std::env;

use crate::domain::tokens::generate_secret;
use crate::error::AppError;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_JSON_PAYLOAD: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Path segment guarding every organizer route.
    pub organizer_secret: String,
    /// Base URL used when handing out player links.
    pub public_url: String,
    /// Makes games reproducible when set.
    pub rng_seed: Option<u64>,
    pub max_json_payload: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = var("RIKIKI_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_var(&var, "RIKIKI_PORT")?.unwrap_or(DEFAULT_PORT);
        let organizer_secret = match var("RIKIKI_ORGANIZER_SECRET") {
            Some(secret) => {
                if !secret.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
                    return Err(AppError::config(
                        "RIKIKI_ORGANIZER_SECRET must be URL-safe (letters, digits, '-', '_')",
                    ));
                }
                secret
            }
            None => generate_secret(&mut rand::rng()),
        };
        let public_url = var("RIKIKI_PUBLIC_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("http://localhost:{port}"));
        let rng_seed = parse_var(&var, "RIKIKI_RNG_SEED")?;
        let max_json_payload =
            parse_var(&var, "RIKIKI_MAX_JSON_PAYLOAD")?.unwrap_or(DEFAULT_MAX_JSON_PAYLOAD);
        if max_json_payload == 0 {
            return Err(AppError::config("RIKIKI_MAX_JSON_PAYLOAD must be positive"));
        }

        Ok(Config {
            host,
            port,
            organizer_secret,
            public_url,
            rng_seed,
            max_json_payload,
        })
    }

    /// Fixed secret and seed so tests can build URLs and predict deals.
    pub fn for_tests() -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            organizer_secret: "organizer-test-secret".to_string(),
            public_url: "http://rikiki.test".to_string(),
            rng_seed: Some(42),
            max_json_payload: DEFAULT_MAX_JSON_PAYLOAD,
        }
    }

    pub fn organizer_url(&self) -> String {
        format!("{}/organizer/{}/game", self.public_url, self.organizer_secret)
    }

    pub fn player_url(&self, secret_id: &str) -> String {
        format!("{}/player/{secret_id}", self.public_url)
    }
}

fn parse_var<T, F>(var: F, key: &str) -> Result<Option<T>, AppError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    var(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|_| AppError::config(format!("{key} has an invalid value: '{raw}'")))
        })
        .transpose()
}
