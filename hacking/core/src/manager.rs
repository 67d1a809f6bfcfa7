//! Game Manager - Session Lifecycle
//!
//! The manager is the sole owner of the "current session" slot. It accepts
//! start requests, drives the live session once per frame, and publishes
//! lifecycle events to the host bus.
//!
//! # Design Philosophy
//!
//! Like the host traits, the manager is UI-agnostic. It talks to the outside
//! world through:
//! - [`GameCommand`]: start requests FROM the host
//! - [`GameEvent`]: lifecycle events TO the host bus
//!
//! At most one session exists at a time. A second start while one is alive
//! is rejected and leaves the live session untouched.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::error::SessionError;
use crate::events::{GameCommand, GameEvent, SessionId};
use crate::host::Host;
use crate::session::{Session, TickOutcome};
use crate::validator::SessionParams;

/// Owns the host, the config and the single session slot
pub struct GameManager<H: Host> {
    /// The host platform
    host: H,
    /// Configuration
    config: GameConfig,
    /// The live session, if any
    current: Option<Session>,
    /// Channel to the host bus
    tx: mpsc::UnboundedSender<GameEvent>,
}

impl<H: Host> GameManager<H> {
    /// Create a manager publishing events on `tx`
    pub fn new(host: H, config: GameConfig, tx: mpsc::UnboundedSender<GameEvent>) -> Self {
        Self {
            host,
            config,
            current: None,
            tx,
        }
    }

    /// The host
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably (tests and simulators script it between ticks)
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Whether a session is alive
    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }

    /// The live session
    pub fn current_session(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// Start a session with explicit parameters
    ///
    /// # Errors
    ///
    /// - [`SessionError::AlreadyRunning`] if a session is alive
    /// - a validation error if `params` are invalid (the slot stays free)
    /// - [`SessionError::SurfaceLoadTimeout`] if the first poll already uses
    ///   up the attempt budget; [`GameEvent::Aborted`] is published for the
    ///   session and the slot stays free, as for a timeout found on a later
    ///   tick
    pub fn request_start(&mut self, params: SessionParams) -> Result<SessionId, SessionError> {
        if let Some(ref current) = self.current {
            warn!(session_id = %current.id(), "Start rejected: session already running");
            return Err(SessionError::AlreadyRunning);
        }

        let mut session = Session::new(&params, &self.config);
        if let Some(e) = session.setup_error() {
            return Err(e.clone());
        }

        if let Err(reason) = session.start(&mut self.host) {
            self.publish(GameEvent::Aborted {
                session_id: session.id().clone(),
                reason: reason.clone(),
            });
            return Err(reason);
        }

        let session_id = session.id().clone();
        let lives = session.lives_remaining();
        self.current = Some(session);
        self.publish(GameEvent::Started {
            session_id: session_id.clone(),
            lives,
        });
        Ok(session_id)
    }

    /// Start a session, filling omitted values from the config
    ///
    /// Returns `false` if the start was rejected for any reason.
    pub fn start(
        &mut self,
        solution: &str,
        lives: Option<i32>,
        min_speed: Option<i32>,
        max_speed: Option<i32>,
    ) -> bool {
        let params = self.params_with_defaults(solution, lives, min_speed, max_speed);
        match self.request_start(params) {
            Ok(_) => true,
            Err(e) if e.is_validation() => {
                warn!(error = %e, "Start request has invalid parameters");
                false
            }
            Err(e) => {
                info!(error = %e, "Start request refused");
                false
            }
        }
    }

    /// Handle a command from the host bus
    ///
    /// # Errors
    ///
    /// Same as [`GameManager::request_start`].
    pub fn handle_command(&mut self, command: GameCommand) -> Result<SessionId, SessionError> {
        match command {
            GameCommand::Start {
                solution,
                lives,
                min_speed,
                max_speed,
            } => {
                let params = self.params_with_defaults(&solution, lives, min_speed, max_speed);
                self.request_start(params)
            }
        }
    }

    /// Drive the live session by one frame
    pub fn tick(&mut self) -> TickOutcome {
        let Some(session) = self.current.as_mut() else {
            return TickOutcome::Inert;
        };

        let outcome = session.tick(&mut self.host);
        match &outcome {
            TickOutcome::Completed { success } => self.on_result(*success),
            TickOutcome::Aborted(reason) => {
                if let Some(session) = self.current.take() {
                    self.publish(GameEvent::Aborted {
                        session_id: session.id().clone(),
                        reason: reason.clone(),
                    });
                }
            }
            TickOutcome::Inert | TickOutcome::Continue => {}
        }
        outcome
    }

    /// Clear the slot and publish the session's result
    ///
    /// Called once a session completes. With no session alive this does
    /// nothing, so a duplicate notification cannot publish twice.
    pub fn on_result(&mut self, success: bool) {
        let Some(session) = self.current.take() else {
            warn!(success, "Result ignored: no session running");
            return;
        };

        info!(session_id = %session.id(), success, "Result of hacking game");
        self.publish(GameEvent::Result {
            session_id: session.id().clone(),
            success,
        });
    }

    fn params_with_defaults(
        &self,
        solution: &str,
        lives: Option<i32>,
        min_speed: Option<i32>,
        max_speed: Option<i32>,
    ) -> SessionParams {
        SessionParams::new(solution)
            .with_lives(lives.unwrap_or(self.config.default_lives))
            .with_speed_range(
                min_speed.unwrap_or(self.config.default_min_speed),
                max_speed.unwrap_or(self.config.default_max_speed),
            )
    }

    fn publish(&self, event: GameEvent) {
        debug!(session_id = %event.session_id(), event = ?event, "Publishing game event");
        if self.tx.send(event).is_err() {
            warn!("Event bus closed, dropping game event");
        }
    }
}
