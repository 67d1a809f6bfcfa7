//! Host Bus Messages
//!
//! Commands the host sends to the game core and events the core publishes
//! back. Both are plain serde types so the host bus can carry them however
//! it likes; the core only ever sees typed values.

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Unique session identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generate a new unique session ID
    ///
    /// Uses an atomic counter combined with timestamp to ensure uniqueness
    /// even when multiple sessions are created in the same millisecond.
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        use std::time::{SystemTime, UNIX_EPOCH};

        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let count = COUNTER.fetch_add(1, Ordering::SeqCst);
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        Self(format!("session_{timestamp}_{count}"))
    }

    /// Get the string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Commands from the host to the game core
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameCommand {
    /// Start a new session; omitted values fall back to configured defaults
    Start {
        /// 8-character solution word
        solution: String,
        /// Mistakes allowed
        lives: Option<i32>,
        /// Lower column speed bound
        min_speed: Option<i32>,
        /// Upper column speed bound
        max_speed: Option<i32>,
    },
}

/// Events published by the game core
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// A session was accepted and is bootstrapping its surface
    Started {
        /// The new session
        session_id: SessionId,
        /// Lives the session starts with
        lives: u32,
    },

    /// A session finished; published exactly once per completed session
    Result {
        /// The finished session
        session_id: SessionId,
        /// Whether the puzzle was solved
        success: bool,
    },

    /// A session died without an outcome (e.g. the surface never loaded)
    Aborted {
        /// The dead session
        session_id: SessionId,
        /// Why it died
        reason: SessionError,
    },
}

impl GameEvent {
    /// Session this event is about
    #[must_use]
    pub fn session_id(&self) -> &SessionId {
        match self {
            Self::Started { session_id, .. }
            | Self::Result { session_id, .. }
            | Self::Aborted { session_id, .. } => session_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_session_id_unique() {
        let a = SessionId::new();
        let b = SessionId::new();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("session_"));
    }

    #[test]
    fn test_start_command_optional_fields() {
        let cmd: GameCommand =
            serde_json::from_str(r#"{"type":"start","solution":"password"}"#).unwrap();
        assert_eq!(
            cmd,
            GameCommand::Start {
                solution: "password".to_string(),
                lives: None,
                min_speed: None,
                max_speed: None,
            }
        );

        let cmd: GameCommand = serde_json::from_str(
            r#"{"type":"start","solution":"PASSWORD","lives":5,"min_speed":20,"max_speed":40}"#,
        )
        .unwrap();
        assert!(matches!(
            cmd,
            GameCommand::Start {
                lives: Some(5),
                min_speed: Some(20),
                max_speed: Some(40),
                ..
            }
        ));
    }

    #[test]
    fn test_aborted_event_carries_reason() {
        let event = GameEvent::Aborted {
            session_id: SessionId("session_1_0".to_string()),
            reason: SessionError::SurfaceLoadTimeout { attempts: 100 },
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "aborted");
        assert_eq!(json["session_id"], "session_1_0");
        assert_eq!(json["reason"]["kind"], "surface_load_timeout");
        assert_eq!(event.session_id().as_str(), "session_1_0");
    }
}
