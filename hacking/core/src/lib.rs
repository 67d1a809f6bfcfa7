//! Hacking Core - Headless Session Logic for the Rotating-Lock Minigame
//!
//! This crate implements a single-player "hacking" minigame session: the
//! player must stop eight spinning columns on the letters of a hidden word,
//! with a limited number of mistakes. Rendering, input, audio and timing are
//! supplied by the host through the traits in [`host`]; the crate itself is
//! pure, synchronous, tick-driven game logic.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                           Host Platform                          │
//! │  ┌──────────┐  ┌─────────┐  ┌────────┐  ┌─────────┐  ┌─────────┐  │
//! │  │ Surface  │  │  Input  │  │ Audio  │  │ Control │  │  Clock  │  │
//! │  └────┬─────┘  └────┬────┘  └───┬────┘  └────┬────┘  └────┬────┘  │
//! └───────┼─────────────┼───────────┼────────────┼────────────┼──────┘
//!         └─────────────┴───────────┴─────┬──────┴────────────┘
//!                                         │ &mut H: Host, once per frame
//! ┌───────────────────────────────────────┼──────────────────────────┐
//! │                     HACKING CORE      │                          │
//! │  ┌────────────────────────────────────┴───────────────────────┐  │
//! │  │                 GameManager (one session slot)             │  │
//! │  │  ┌───────────┐  ┌───────────┐  ┌──────────┐  ┌───────────┐  │  │
//! │  │  │ Bootstrap │→ │   Input   │→ │ Outcome  │→ │ Deferred  │  │  │
//! │  │  │  polling  │  │ dispatch  │  │ resolver │  │   timer   │  │  │
//! │  │  └───────────┘  └───────────┘  └──────────┘  └───────────┘  │  │
//! │  └────────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────┬───────────────────────────────┘
//!                                    │ GameEvent (Started / Result / Aborted)
//!                                    ▼
//!                                host bus
//! ```
//!
//! # Key Types
//!
//! - [`GameManager`]: owns the host and the single session slot
//! - [`Session`]: one game, from surface bootstrap to outcome
//! - [`SessionParams`]: start parameters and their validation
//! - [`GameEvent`] / [`GameCommand`]: host bus messages
//! - [`GameConfig`]: TOML + environment configuration
//!
//! # Quick Start
//!
//! ```ignore
//! use hacking_core::{GameConfig, GameEvent, GameManager};
//! use tokio::sync::mpsc;
//!
//! let (tx, mut rx) = mpsc::unbounded_channel::<GameEvent>();
//! let mut manager = GameManager::new(my_host, GameConfig::default(), tx);
//!
//! assert!(manager.start("password", None, None, None));
//!
//! // Once per frame
//! loop {
//!     manager.tick();
//!     while let Ok(event) = rx.try_recv() {
//!         // Forward to the host bus
//!     }
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`config`]: TOML configuration loading
//! - [`error`]: session error taxonomy
//! - [`events`]: host bus commands and events
//! - [`host`]: host platform traits
//! - [`manager`]: session lifecycle and the single-session slot
//! - [`protocol`]: surface method names, control codes and outcome codes
//! - [`session`]: the session state machine
//! - [`testing`]: scriptable mock host
//! - [`timer`]: single-slot deferred transitions
//! - [`validator`]: start parameter validation

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod events;
pub mod host;
pub mod manager;
pub mod protocol;
pub mod session;
pub mod testing;
pub mod timer;
pub mod validator;

// Re-exports for convenience
pub use config::{
    default_config_path, load_config, load_config_from_path, ConfigError, ConfigSource,
    GameConfig, HackingToml,
};
pub use error::SessionError;
pub use events::{GameCommand, GameEvent, SessionId};
pub use host::{
    AudioCues, Clock, Host, HostControl, InputSource, MethodArg, MethodCall, RenderSurface,
    ReturnHandle, Rgba, SurfaceHandle,
};
pub use manager::GameManager;
pub use protocol::Outcome;
pub use session::{Session, SessionPhase, TickOutcome};
pub use timer::{PendingAction, TransitionTimer};
pub use validator::{SessionParams, SpeedRange, ValidatedParams};
