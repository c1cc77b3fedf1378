//! Error types for cardeeno operations.
//!
//! This module provides the error taxonomy for the learning core with
//! structured error codes for programmatic handling. Validation failures
//! are rejected before any state change; protocol violations (bad flips,
//! actions on closed sessions) leave session state untouched.

use thiserror::Error;

/// Result type alias for cardeeno operations.
pub type CardeenoResult<T> = Result<T, CardeenoError>;

/// Main error type for all cardeeno operations.
#[derive(Error, Debug)]
pub enum CardeenoError {
    /// Input validation failed (bad limit, malformed identity).
    ///
    /// Rejected before any state change; the caller must correct the input.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String, code: ErrorCode },

    /// A referenced user, card, set, session, or tile does not exist.
    ///
    /// Surfaced to the caller; retrying without fixing the reference
    /// will fail again.
    #[error("Invalid reference: {message}")]
    InvalidReference {
        message: String,
        code: ErrorCode,
        reference: Option<String>,
    },

    /// A flip that the current round state does not allow.
    #[error("Invalid move: {message}")]
    InvalidMove { message: String, code: ErrorCode },

    /// An action was received after the session reached its terminal state.
    #[error("Session '{session_id}' is closed")]
    SessionClosed { session_id: String },

    /// `finalize` was called a second time on the same session.
    #[error("Session '{session_id}' is already finalized")]
    SessionAlreadyFinalized { session_id: String },

    /// A session start was attempted with too few cards.
    #[error("Insufficient cards to start a session: need {needed}, have {available}")]
    InsufficientCards { needed: usize, available: usize },

    /// A write to the persistence collaborator failed.
    ///
    /// Already-applied in-memory state is not rolled back; the failure is
    /// reported to the invoking operation.
    #[error("Persistence error: {message}")]
    Persistence {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Argument validation (ARG_xxx)
    ArgInvalidLimit,
    ArgMalformedId,

    // References (REF_xxx)
    RefUnknownSet,
    RefUnknownCard,
    RefUnknownSession,
    RefUnknownTile,

    // Moves (MOVE_xxx)
    MoveTileMatched,
    MoveTileAlreadyShown,

    // Session lifecycle (SES_xxx)
    SesClosed,
    SesAlreadyFinalized,
    SesTooFewCards,

    // Persistence (PST_xxx)
    PstWriteFailed,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ArgInvalidLimit => "ARG_001",
            ErrorCode::ArgMalformedId => "ARG_002",
            ErrorCode::RefUnknownSet => "REF_001",
            ErrorCode::RefUnknownCard => "REF_002",
            ErrorCode::RefUnknownSession => "REF_003",
            ErrorCode::RefUnknownTile => "REF_004",
            ErrorCode::MoveTileMatched => "MOVE_001",
            ErrorCode::MoveTileAlreadyShown => "MOVE_002",
            ErrorCode::SesClosed => "SES_001",
            ErrorCode::SesAlreadyFinalized => "SES_002",
            ErrorCode::SesTooFewCards => "SES_003",
            ErrorCode::PstWriteFailed => "PST_001",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl CardeenoError {
    /// Create an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
            code: ErrorCode::ArgInvalidLimit,
        }
    }

    /// Create an invalid-argument error for a malformed identity field.
    pub fn malformed_id(field: &str) -> Self {
        Self::InvalidArgument {
            message: format!("'{}' must be a non-empty identifier", field),
            code: ErrorCode::ArgMalformedId,
        }
    }

    /// Create an invalid-reference error for an unknown set.
    pub fn unknown_set(set_id: impl Into<String>) -> Self {
        let id = set_id.into();
        Self::InvalidReference {
            message: format!("set '{}' not found", id),
            code: ErrorCode::RefUnknownSet,
            reference: Some(id),
        }
    }

    /// Create an invalid-reference error for an unknown card.
    pub fn unknown_card(card_id: impl Into<String>) -> Self {
        let id = card_id.into();
        Self::InvalidReference {
            message: format!("card '{}' not found", id),
            code: ErrorCode::RefUnknownCard,
            reference: Some(id),
        }
    }

    /// Create an invalid-reference error for an unknown session.
    pub fn unknown_session(session_id: impl Into<String>) -> Self {
        let id = session_id.into();
        Self::InvalidReference {
            message: format!("session '{}' not found", id),
            code: ErrorCode::RefUnknownSession,
            reference: Some(id),
        }
    }

    /// Create an invalid-reference error for an unknown tile.
    pub fn unknown_tile(tile_id: impl Into<String>) -> Self {
        let id = tile_id.into();
        Self::InvalidReference {
            message: format!("tile '{}' is not part of this session", id),
            code: ErrorCode::RefUnknownTile,
            reference: Some(id),
        }
    }

    /// Create an invalid-move error for a tile whose pair is already matched.
    pub fn tile_matched(tile_id: &str) -> Self {
        Self::InvalidMove {
            message: format!("tile '{}' is already matched", tile_id),
            code: ErrorCode::MoveTileMatched,
        }
    }

    /// Create an invalid-move error for re-flipping the currently shown tile.
    pub fn tile_already_shown(tile_id: &str) -> Self {
        Self::InvalidMove {
            message: format!("tile '{}' is already face up", tile_id),
            code: ErrorCode::MoveTileAlreadyShown,
        }
    }

    /// Create a persistence error.
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
            code: ErrorCode::PstWriteFailed,
            source: None,
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidArgument { code, .. } => *code,
            Self::InvalidReference { code, .. } => *code,
            Self::InvalidMove { code, .. } => *code,
            Self::SessionClosed { .. } => ErrorCode::SesClosed,
            Self::SessionAlreadyFinalized { .. } => ErrorCode::SesAlreadyFinalized,
            Self::InsufficientCards { .. } => ErrorCode::SesTooFewCards,
            Self::Persistence { code, .. } => *code,
            Self::Internal(_) => ErrorCode::Internal,
        }
    }
}

/// Validate that an identifier field is non-empty.
pub(crate) fn ensure_id(value: &str, field: &str) -> CardeenoResult<()> {
    if value.trim().is_empty() {
        return Err(CardeenoError::malformed_id(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_error() {
        let err = CardeenoError::invalid_argument("limit must be positive");
        assert_eq!(err.code(), ErrorCode::ArgInvalidLimit);
        assert!(err.to_string().contains("limit must be positive"));
    }

    #[test]
    fn test_unknown_card_error() {
        let err = CardeenoError::unknown_card("card-7");
        assert_eq!(err.code(), ErrorCode::RefUnknownCard);
        match err {
            CardeenoError::InvalidReference { reference, .. } => {
                assert_eq!(reference.as_deref(), Some("card-7"));
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_session_lifecycle_codes() {
        let closed = CardeenoError::SessionClosed {
            session_id: "s1".to_string(),
        };
        assert_eq!(closed.code(), ErrorCode::SesClosed);

        let finalized = CardeenoError::SessionAlreadyFinalized {
            session_id: "s1".to_string(),
        };
        assert_eq!(finalized.code(), ErrorCode::SesAlreadyFinalized);

        let short = CardeenoError::InsufficientCards {
            needed: 2,
            available: 1,
        };
        assert_eq!(short.code(), ErrorCode::SesTooFewCards);
        assert!(short.to_string().contains("need 2, have 1"));
    }

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::ArgInvalidLimit.as_str(), "ARG_001");
        assert_eq!(ErrorCode::RefUnknownSet.as_str(), "REF_001");
        assert_eq!(ErrorCode::MoveTileMatched.as_str(), "MOVE_001");
        assert_eq!(ErrorCode::PstWriteFailed.as_str(), "PST_001");
    }

    #[test]
    fn test_ensure_id() {
        assert!(ensure_id("user-1", "user_id").is_ok());
        assert!(ensure_id("", "user_id").is_err());
        assert!(ensure_id("   ", "user_id").is_err());
    }
}
