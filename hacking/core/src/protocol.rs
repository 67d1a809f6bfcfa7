//! Surface Protocol
//!
//! Names, codes and bindings understood by the `Hacking_PC` surface. These
//! are fixed by the host content and are not configurable.

use serde::{Deserialize, Serialize};

/// Movie requested from the host
pub const SURFACE_MOVIE: &str = "Hacking_PC";

/// Method names on the surface
pub mod method {
    /// Background mode (int)
    pub const SET_BACKGROUND: &str = "SET_BACKGROUND";
    /// Run a layout program (int)
    pub const RUN_PROGRAM: &str = "RUN_PROGRAM";
    /// Lives display (int lives, int style)
    pub const SET_LIVES: &str = "SET_LIVES";
    /// Solution word (string)
    pub const SET_ROULETTE_WORD: &str = "SET_ROULETTE_WORD";
    /// Column speed (int column, float speed)
    pub const SET_COLUMN_SPEED: &str = "SET_COLUMN_SPEED";
    /// Logical column event (int)
    pub const SET_INPUT_EVENT: &str = "SET_INPUT_EVENT";
    /// Confirm the current column; returns an outcome code
    pub const SET_INPUT_EVENT_SELECT: &str = "SET_INPUT_EVENT_SELECT";
    /// Outcome banner (bool success, string text)
    pub const SET_ROULETTE_OUTCOME: &str = "SET_ROULETTE_OUTCOME";
    /// Freeze the columns after a mismatch
    pub const STOP_ROULETTE: &str = "STOP_ROULETTE";
    /// Re-spin the columns
    pub const RESET_ROULETTE: &str = "RESET_ROULETTE";
}

/// Layout programs run once at bootstrap, in order
pub const SETUP_PROGRAMS: [i32; 2] = [4, 83];

/// Style argument passed with every `SET_LIVES`
pub const LIVES_DISPLAY_STYLE: i32 = 2;

/// Number of rotating columns
pub const COLUMN_COUNT: i32 = 8;

/// Banner text shown on success
pub const SUCCESS_TEXT: &str = "Successful Hacked";

/// Control group all bindings are read from
pub const CONTROL_GROUP: u32 = 2;

/// Raw control that confirms the current column
pub const CONFIRM_CONTROL: u32 = 201;

/// Two raw controls forwarded as one logical column event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnBinding {
    /// First raw control
    pub primary: u32,
    /// Alternate raw control
    pub alternate: u32,
    /// Logical event sent to the surface
    pub event: i32,
}

/// Column bindings scanned every tick, in order
pub const COLUMN_BINDINGS: [ColumnBinding; 4] = [
    ColumnBinding {
        primary: 32,
        alternate: 172,
        event: 8,
    },
    ColumnBinding {
        primary: 33,
        alternate: 173,
        event: 9,
    },
    ColumnBinding {
        primary: 34,
        alternate: 174,
        event: 10,
    },
    ColumnBinding {
        primary: 35,
        alternate: 175,
        event: 11,
    },
];

/// Audio cue names
pub mod cue {
    /// Column moved
    pub const MOVE_CURSOR: &str = "HACKING_MOVE_CURSOR";
    /// Puzzle solved
    pub const SUCCESS: &str = "HACKING_SUCCESS";
    /// Wrong column
    pub const CLICK_BAD: &str = "HACKING_CLICK_BAD";
    /// Correct character
    pub const CLICK: &str = "HACKING_CLICK";
    /// Speech played when the last life is lost
    pub const OUT_OF_LIVES_SPEECH: &str = "GENERIC_CURSE_HIGH";
    /// Speech parameters for the out-of-lives line
    pub const OUT_OF_LIVES_SPEECH_PARAMS: &str = "SPEECH_PARAMS_FORCE_FRONTEND";
}

/// Result of a confirm request, decoded from the surface's integer code
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Whole solution matched
    Success,
    /// Wrong character selected for a column
    Mismatch,
    /// Correct character, puzzle continues
    Click,
    /// Anything the surface may add later
    Unknown(i32),
}

impl Outcome {
    /// Code the surface returns on success
    pub const SUCCESS_CODE: i32 = 86;
    /// Code the surface returns on a column mismatch
    pub const MISMATCH_CODE: i32 = 87;
    /// Code the surface returns on a correct character
    pub const CLICK_CODE: i32 = 92;

    /// Decode a raw return value
    #[must_use]
    pub fn from_code(code: i32) -> Self {
        match code {
            Self::SUCCESS_CODE => Self::Success,
            Self::MISMATCH_CODE => Self::Mismatch,
            Self::CLICK_CODE => Self::Click,
            other => Self::Unknown(other),
        }
    }

    /// Raw code for this outcome
    #[must_use]
    pub fn code(&self) -> i32 {
        match self {
            Self::Success => Self::SUCCESS_CODE,
            Self::Mismatch => Self::MISMATCH_CODE,
            Self::Click => Self::CLICK_CODE,
            Self::Unknown(code) => *code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_code() {
        assert_eq!(Outcome::from_code(86), Outcome::Success);
        assert_eq!(Outcome::from_code(87), Outcome::Mismatch);
        assert_eq!(Outcome::from_code(92), Outcome::Click);
        assert_eq!(Outcome::from_code(0), Outcome::Unknown(0));
        assert_eq!(Outcome::from_code(-1).code(), -1);
    }

    #[test]
    fn test_column_events_are_distinct() {
        let events: Vec<i32> = COLUMN_BINDINGS.iter().map(|b| b.event).collect();
        assert_eq!(events, vec![8, 9, 10, 11]);
        assert!(COLUMN_BINDINGS.iter().all(|b| b.primary != b.alternate));
    }
}
