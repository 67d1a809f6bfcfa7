//! Session Errors
//!
//! Every way a hacking session can refuse to run. Validation errors are found
//! once, at construction, and short-circuit everything after via the
//! session's setup flag. The timeout is found only inside the bootstrap loop.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by sessions and the lifecycle manager
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionError {
    /// The solution word is not exactly 8 characters
    #[error("Solution must be exactly 8 characters (got {length})")]
    InvalidSolution {
        /// Character count of the rejected solution
        length: usize,
    },

    /// Lives outside 1..=10
    #[error("Lives must be between 1 and 10 (got {lives})")]
    InvalidLives {
        /// The rejected life count
        lives: i32,
    },

    /// Speed bounds outside 10..=200 or inverted
    #[error("Invalid speed range {min}..{max} (min >= 10, max <= 200, min <= max)")]
    InvalidSpeedRange {
        /// Requested minimum column speed
        min: i32,
        /// Requested maximum column speed
        max: i32,
    },

    /// A lifecycle call was made on a session that failed validation
    #[error("Session is not set up: {reason}")]
    NotSetup {
        /// The validation failure recorded at construction
        reason: Box<SessionError>,
    },

    /// A session is already alive
    #[error("A hacking session is already running")]
    AlreadyRunning,

    /// `start` was called twice on the same session
    #[error("Session was already started")]
    AlreadyStarted,

    /// The rendering surface never became ready
    #[error("Surface did not load after {attempts} poll attempts")]
    SurfaceLoadTimeout {
        /// Number of failed readiness polls
        attempts: u32,
    },
}

impl SessionError {
    /// Whether this error comes from parameter validation
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidSolution { .. } | Self::InvalidLives { .. } | Self::InvalidSpeedRange { .. }
        )
    }
}
