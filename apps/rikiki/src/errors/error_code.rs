//! Error codes for the Rikiki API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Access
    /// Unknown organizer secret, player secret or session cookie
    Forbidden,
    /// CSRF token missing or stale
    CsrfMismatch,

    // Request Validation
    /// Invalid bid provided
    InvalidBid,
    /// Card not held or follow-suit violation
    CardNotAllowed,
    /// Out of turn
    OutOfTurn,
    /// Operation not allowed in the current game/round state
    IllegalState,
    /// Card could not be parsed
    ParseCard,
    /// Organizer player list rejected
    InvalidPlayerList,
    /// Hand size outside of the deck bounds
    InvalidHandSize,
    /// Too few/many players for the operation
    InvalidPlayerCount,
    /// General bad request error
    BadRequest,
    /// Invalid or missing HTTP header
    InvalidHeader,

    // Resource Not Found
    /// No game has been set up yet
    GameNotFound,
    /// Player lookup failed
    PlayerNotFound,

    // System Errors
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Forbidden => "FORBIDDEN",
            Self::CsrfMismatch => "CSRF_MISMATCH",

            Self::InvalidBid => "INVALID_BID",
            Self::CardNotAllowed => "CARD_NOT_ALLOWED",
            Self::OutOfTurn => "OUT_OF_TURN",
            Self::IllegalState => "ILLEGAL_STATE",
            Self::ParseCard => "PARSE_CARD",
            Self::InvalidPlayerList => "INVALID_PLAYER_LIST",
            Self::InvalidHandSize => "INVALID_HAND_SIZE",
            Self::InvalidPlayerCount => "INVALID_PLAYER_COUNT",
            Self::BadRequest => "BAD_REQUEST",
            Self::InvalidHeader => "INVALID_HEADER",

            Self::GameNotFound => "GAME_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",

            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
