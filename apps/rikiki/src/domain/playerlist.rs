//! Parsing of the organizer's player list: one name per line.

use std::collections::HashSet;

use lazy_regex::regex;
use unicode_normalization::UnicodeNormalization;

use super::rules::MAX_PLAYERS;
use crate::errors::domain::{DomainError, ValidationKind};

pub const MAX_PLAYERLIST_BYTES: usize = 10_000;

fn invalid(detail: &str) -> DomainError {
    DomainError::validation(ValidationKind::InvalidPlayerList, detail)
}

/// NFC-normalized name with runs of whitespace collapsed to one space.
pub fn normalize_name(raw: &str) -> String {
    let nfc: String = raw.trim().nfc().collect();
    regex!(r"\s+").replace_all(&nfc, " ").into_owned()
}

/// Split `input` into player names.
///
/// Blank lines are dropped, as are names repeating an earlier one
/// case-insensitively (the first spelling wins).
pub fn parse_playerlist(input: &str) -> Result<Vec<String>, DomainError> {
    if input.len() > MAX_PLAYERLIST_BYTES {
        return Err(invalid("Player list too large"));
    }

    let mut seen = HashSet::new();
    let names: Vec<String> = input
        .lines()
        .map(normalize_name)
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(name.to_lowercase()))
        .collect();

    if names.is_empty() {
        return Err(invalid("No player list provided"));
    }
    if names.len() > MAX_PLAYERS {
        return Err(invalid("Too many players"));
    }
    Ok(names)
}
