//! Domain-level error type used by the rules engine and the services.
//!
//! This error type is HTTP-agnostic. Handlers convert it into
//! `crate::error::AppError` through the provided `From<DomainError>`
//! implementation, which is the single place where error kinds meet
//! status codes.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::domain::{Card, PlayerId};

/// Validation kinds for range / input failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    InvalidBid,
    InvalidHandSize,
    InvalidPlayerCount,
    InvalidPlayerList,
    ParseCard,
}

/// Domain-level not found entities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Player,
    Game,
}

/// Who did (or should have done) something; enough for a UI to explain
/// an out-of-turn or illegal-card rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRef {
    pub id: PlayerId,
    pub name: String,
}

impl Display for PlayerRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.name)
    }
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Operation not permitted in the current Game/Round/Player state
    IllegalState(String),
    /// A player acted while it was somebody else's turn
    OutOfTurn {
        operation: &'static str,
        expected: PlayerRef,
        offending: PlayerRef,
    },
    /// The card is not held or violates the follow-suit rule
    CardNotAllowed { player: PlayerRef, card: Card },
    /// Input outside the mathematically valid bounds
    Validation(ValidationKind, String),
    /// Lookup by id / secret / cookie failed
    NotFound(NotFoundKind, String),
    /// Request not authorized for a roster mutation (bad CSRF token)
    Forbidden(String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::IllegalState(d) => write!(f, "illegal state: {d}"),
            DomainError::OutOfTurn {
                operation,
                expected,
                offending,
            } => write!(
                f,
                "it is {expected}'s turn to {operation}, not {offending}'s"
            ),
            DomainError::CardNotAllowed { player, card } => {
                write!(f, "{player} may not play {card} now")
            }
            DomainError::Validation(kind, d) => write!(f, "validation error {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::Forbidden(d) => write!(f, "forbidden: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn illegal_state(detail: impl Into<String>) -> Self {
        Self::IllegalState(detail.into())
    }
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::Forbidden(detail.into())
    }

    /// Legitimate player action that is invalid right now; the UI should
    /// explain it and let the player try again.
    pub fn is_player_retryable(&self) -> bool {
        matches!(
            self,
            DomainError::OutOfTurn { .. } | DomainError::CardNotAllowed { .. }
        )
    }
}
