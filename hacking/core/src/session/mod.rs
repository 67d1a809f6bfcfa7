//! Hacking Session
//!
//! One game of the rotating-lock puzzle, from surface bootstrap to the final
//! outcome. A session never calls the host on its own; the lifecycle manager
//! hands it the host once per frame through [`Session::tick`].
//!
//! # Tick Order
//!
//! Every running tick does, in this order:
//!
//! ```text
//! draw surface
//!   → dispatch input      (only while no transition is pending)
//!   → resolve outcome     (every tick, even with a Reset pending)
//!   → fire deferred transition
//! ```
//!
//! Resolving before firing means a confirm answered this tick is handled
//! before any transition that was already due.

mod bootstrap;
mod input;
mod outcome;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::error::SessionError;
use crate::events::SessionId;
use crate::host::{Host, MethodCall, ReturnHandle, Rgba, SurfaceHandle};
use crate::protocol::{method, SURFACE_MOVIE};
use crate::timer::{PendingAction, TransitionTimer};
use crate::validator::{SessionParams, SpeedRange, ValidatedParams};

/// Where a session is in its lifecycle
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// Constructed, `start` not yet called
    Created,
    /// Waiting for the surface to load
    Bootstrapping {
        /// Failed readiness polls so far
        attempts: u32,
        /// Clock value at which the next poll is due
        next_poll_at: u64,
    },
    /// Surface initialized, ticking every frame
    Running,
    /// Finished with an outcome
    Completed {
        /// Whether the puzzle was solved
        success: bool,
    },
    /// Died without an outcome
    Aborted(SessionError),
}

impl SessionPhase {
    /// Whether the session will never act again
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Aborted(_))
    }
}

/// What a single tick produced
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The session has nothing left to do (or never could)
    Inert,
    /// Still bootstrapping or playing
    Continue,
    /// The session just finished; reported on exactly one tick
    Completed {
        /// Whether the puzzle was solved
        success: bool,
    },
    /// The session just died; reported on exactly one tick
    Aborted(SessionError),
}

/// Delays and budgets copied out of the config at construction
#[derive(Clone, Copy, Debug)]
struct SessionTiming {
    retry_delay_ms: u64,
    max_attempts: u32,
    reset_delay_ms: u64,
    end_delay_ms: u64,
}

impl From<&GameConfig> for SessionTiming {
    fn from(config: &GameConfig) -> Self {
        Self {
            retry_delay_ms: config.bootstrap_retry_delay_ms,
            max_attempts: config.bootstrap_max_attempts,
            reset_delay_ms: config.reset_delay_ms,
            end_delay_ms: config.end_delay_ms,
        }
    }
}

/// A single hacking game
pub struct Session {
    id: SessionId,
    params: Result<ValidatedParams, SessionError>,
    lives_remaining: u32,
    surface: Option<SurfaceHandle>,
    timer: TransitionTimer,
    pending_confirm: Option<ReturnHandle>,
    finished: bool,
    phase: SessionPhase,
    column_speeds: Vec<f32>,
    timing: SessionTiming,
    rng: StdRng,
}

impl Session {
    /// Build a session, validating `params`
    ///
    /// Invalid parameters do not fail construction; the session records the
    /// error and every later call on it is a no-op reporting
    /// [`SessionError::NotSetup`].
    pub fn new(params: &SessionParams, config: &GameConfig) -> Self {
        let id = SessionId::new();
        let params = params.validate();
        if let Err(ref e) = params {
            warn!(session_id = %id, error = %e, "Session parameters rejected");
        }

        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            id,
            params,
            lives_remaining: 0,
            surface: None,
            timer: TransitionTimer::new(),
            pending_confirm: None,
            finished: false,
            phase: SessionPhase::Created,
            column_speeds: Vec::new(),
            timing: SessionTiming::from(config),
            rng,
        }
    }

    /// Session identifier
    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Current lifecycle phase
    #[must_use]
    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    /// Whether the parameters passed validation
    #[must_use]
    pub fn is_setup_valid(&self) -> bool {
        self.params.is_ok()
    }

    /// Validation failure recorded at construction
    #[must_use]
    pub fn setup_error(&self) -> Option<&SessionError> {
        self.params.as_ref().err()
    }

    /// Upper-cased solution
    #[must_use]
    pub fn solution(&self) -> Option<&str> {
        self.params.as_ref().ok().map(|p| p.solution.as_str())
    }

    /// Lives the session started with
    #[must_use]
    pub fn lives_initial(&self) -> Option<u32> {
        self.params.as_ref().ok().map(|p| p.lives)
    }

    /// Lives left (0 before start)
    #[must_use]
    pub fn lives_remaining(&self) -> u32 {
        self.lives_remaining
    }

    /// Column speed bounds
    #[must_use]
    pub fn speed_range(&self) -> Option<SpeedRange> {
        self.params.as_ref().ok().map(|p| p.speed_range)
    }

    /// Speeds pushed to the columns at bootstrap
    #[must_use]
    pub fn column_speeds(&self) -> &[f32] {
        &self.column_speeds
    }

    /// Live surface handle, if any
    #[must_use]
    pub fn surface(&self) -> Option<SurfaceHandle> {
        self.surface
    }

    /// Pending deferred transition
    #[must_use]
    pub fn pending_action(&self) -> PendingAction {
        self.timer.action()
    }

    /// Deadline of the pending transition (0 when none)
    #[must_use]
    pub fn deadline(&self) -> u64 {
        self.timer.deadline()
    }

    /// Whether a confirm request is in flight
    #[must_use]
    pub fn has_pending_confirm(&self) -> bool {
        self.pending_confirm.is_some()
    }

    /// Whether the surface has been released
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Disable host input, request the surface and make the first poll
    ///
    /// # Errors
    ///
    /// - [`SessionError::NotSetup`] if validation failed at construction
    /// - [`SessionError::AlreadyStarted`] if called twice
    /// - [`SessionError::SurfaceLoadTimeout`] if the attempt budget is used
    ///   up by the very first poll
    pub fn start<H: Host>(&mut self, host: &mut H) -> Result<(), SessionError> {
        let lives = match &self.params {
            Ok(params) => params.lives,
            Err(e) => {
                warn!(session_id = %self.id, "Start ignored: session is not set up");
                return Err(SessionError::NotSetup {
                    reason: Box::new(e.clone()),
                });
            }
        };

        if self.phase != SessionPhase::Created {
            warn!(session_id = %self.id, phase = ?self.phase, "Start ignored: already started");
            return Err(SessionError::AlreadyStarted);
        }

        host.set_input_enabled(false);
        let handle = host.create(SURFACE_MOVIE);
        self.surface = Some(handle);
        self.lives_remaining = lives;
        self.phase = SessionPhase::Bootstrapping {
            attempts: 0,
            next_poll_at: host.now_ms(),
        };

        info!(session_id = %self.id, surface = handle.0, lives, "Session starting");

        match self.poll_bootstrap(host) {
            TickOutcome::Aborted(e) => Err(e),
            _ => Ok(()),
        }
    }

    /// Advance the session by one frame
    pub fn tick<H: Host>(&mut self, host: &mut H) -> TickOutcome {
        if self.params.is_err() {
            debug!(session_id = %self.id, "Tick ignored: session is not set up");
            return TickOutcome::Inert;
        }

        match self.phase {
            SessionPhase::Created | SessionPhase::Completed { .. } | SessionPhase::Aborted(_) => {
                TickOutcome::Inert
            }
            SessionPhase::Bootstrapping { next_poll_at, .. } => {
                if host.now_ms() < next_poll_at {
                    TickOutcome::Continue
                } else {
                    self.poll_bootstrap(host)
                }
            }
            SessionPhase::Running => self.update(host),
        }
    }

    /// One running frame
    fn update<H: Host>(&mut self, host: &mut H) -> TickOutcome {
        let now = host.now_ms();

        if let Some(handle) = self.surface {
            host.draw_fullscreen(handle, Rgba::WHITE);
            if self.timer.is_idle() {
                self.dispatch_input(host, handle);
            }
        }

        self.resolve_outcome(host, now);

        match self.timer.poll(now) {
            Some(action) => self.fire(host, action),
            None => TickOutcome::Continue,
        }
    }

    /// Run a transition whose deadline has passed
    fn fire<H: Host>(&mut self, host: &mut H, action: PendingAction) -> TickOutcome {
        debug!(session_id = %self.id, action = ?action, "Deferred transition firing");
        match action {
            PendingAction::None => TickOutcome::Continue,
            PendingAction::Reset => {
                if let Some(handle) = self.surface {
                    host.invoke(handle, &MethodCall::new(method::RESET_ROULETTE));
                }
                TickOutcome::Continue
            }
            PendingAction::RemoveThenSucceed => self.finish(host, true),
            PendingAction::RemoveThenFail => self.finish(host, false),
        }
    }

    /// Schedule a transition, warning if one was already pending
    fn schedule(&mut self, action: PendingAction, now: u64, delay_ms: u64) {
        if let Some(replaced) = self.timer.schedule(action, now, delay_ms) {
            warn!(
                session_id = %self.id,
                replaced = ?replaced,
                action = ?action,
                "Replacing a pending transition"
            );
        }
    }

    /// Tear down after a terminal transition
    fn finish<H: Host>(&mut self, host: &mut H, success: bool) -> TickOutcome {
        self.release_surface(host);
        self.pending_confirm = None;
        host.set_input_enabled(true);
        self.phase = SessionPhase::Completed { success };
        info!(session_id = %self.id, success, "Session completed");
        TickOutcome::Completed { success }
    }

    /// Tear down after a fatal error
    fn abort<H: Host>(&mut self, host: &mut H, error: SessionError) -> TickOutcome {
        tracing::error!(session_id = %self.id, error = %error, "Session aborted");
        self.release_surface(host);
        self.pending_confirm = None;
        host.set_input_enabled(true);
        self.phase = SessionPhase::Aborted(error.clone());
        TickOutcome::Aborted(error)
    }

    /// Release the surface once; later calls are no-ops
    fn release_surface<H: Host>(&mut self, host: &mut H) {
        if let Some(handle) = self.surface.take() {
            host.release(handle);
            debug!(session_id = %self.id, surface = handle.0, "Surface released");
        }
        self.finished = true;
    }

    /// Lives as the int the surface expects
    fn lives_arg(lives: u32) -> i32 {
        i32::try_from(lives).unwrap_or(i32::MAX)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("phase", &self.phase)
            .field("lives_remaining", &self.lives_remaining)
            .field("surface", &self.surface)
            .field("timer", &self.timer)
            .field("pending_confirm", &self.pending_confirm)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}
