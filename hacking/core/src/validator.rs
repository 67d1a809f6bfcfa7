//! Session Parameter Validation
//!
//! Checks start parameters before a session may touch the host. Constraints
//! are checked in a fixed order and the first violation wins.

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Required solution length, in Unicode scalar values (`char`s)
///
/// A character outside the Basic Multilingual Plane counts once here, where
/// a UTF-16 length would count it twice. The two rules agree on all BMP text.
pub const SOLUTION_LENGTH: usize = 8;

/// Lowest accepted life count
pub const MIN_LIVES: i32 = 1;

/// Highest accepted life count
pub const MAX_LIVES: i32 = 10;

/// Slowest accepted column speed
pub const SPEED_FLOOR: i32 = 10;

/// Fastest accepted column speed
pub const SPEED_CEILING: i32 = 200;

/// Lives used when a start request omits them
pub const DEFAULT_LIVES: i32 = 3;

/// Minimum speed used when a start request omits it
pub const DEFAULT_MIN_SPEED: i32 = 10;

/// Maximum speed used when a start request omits it
pub const DEFAULT_MAX_SPEED: i32 = 100;

/// Raw, unvalidated start parameters
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionParams {
    /// Solution word, any case
    pub solution: String,
    /// Mistakes allowed before failing
    pub lives: i32,
    /// Lower bound for column speeds
    pub min_speed: i32,
    /// Upper bound for column speeds
    pub max_speed: i32,
}

impl SessionParams {
    /// Parameters with default lives and speeds
    pub fn new(solution: impl Into<String>) -> Self {
        Self {
            solution: solution.into(),
            lives: DEFAULT_LIVES,
            min_speed: DEFAULT_MIN_SPEED,
            max_speed: DEFAULT_MAX_SPEED,
        }
    }

    /// Set the life count
    #[must_use]
    pub fn with_lives(mut self, lives: i32) -> Self {
        self.lives = lives;
        self
    }

    /// Set the column speed bounds
    #[must_use]
    pub fn with_speed_range(mut self, min_speed: i32, max_speed: i32) -> Self {
        self.min_speed = min_speed;
        self.max_speed = max_speed;
        self
    }

    /// Validate and normalize
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint: solution length, then lives,
    /// then the speed range.
    pub fn validate(&self) -> Result<ValidatedParams, SessionError> {
        let length = self.solution.chars().count();
        if length != SOLUTION_LENGTH {
            return Err(SessionError::InvalidSolution { length });
        }

        if !(MIN_LIVES..=MAX_LIVES).contains(&self.lives) {
            return Err(SessionError::InvalidLives { lives: self.lives });
        }

        if self.min_speed < SPEED_FLOOR
            || self.max_speed > SPEED_CEILING
            || self.min_speed > self.max_speed
        {
            return Err(SessionError::InvalidSpeedRange {
                min: self.min_speed,
                max: self.max_speed,
            });
        }

        Ok(ValidatedParams {
            solution: self.solution.to_uppercase(),
            lives: self.lives.unsigned_abs(),
            speed_range: SpeedRange {
                min: self.min_speed,
                max: self.max_speed,
            },
        })
    }
}

/// Column speed bounds, already checked
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedRange {
    /// Inclusive lower bound
    pub min: i32,
    /// Exclusive upper bound (equal to `min` for a fixed speed)
    pub max: i32,
}

/// Parameters that passed validation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedParams {
    /// Upper-cased solution
    pub solution: String,
    /// Starting lives, 1..=10
    pub lives: u32,
    /// Column speed bounds
    pub speed_range: SpeedRange,
}
