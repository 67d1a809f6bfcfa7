//! Scripted player
//!
//! Drives a [`GameManager`] over a [`MockHost`] one frame at a time. Every
//! frame the player nudges a column and presses confirm; confirms are
//! answered from the script, and once the script runs out every answer is a
//! miss.

use std::collections::VecDeque;

use clap::ValueEnum;
use tokio::sync::mpsc;
use tracing::debug;

use hacking_core::protocol::{COLUMN_BINDINGS, CONFIRM_CONTROL};
use hacking_core::testing::MockHost;
use hacking_core::{GameConfig, GameEvent, GameManager, Outcome, SessionError, SessionParams};

/// One scripted confirm answer
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ScriptStep {
    /// Column stopped on the right letter
    Hit,
    /// Column stopped on a wrong letter
    Miss,
    /// Final column solved the word
    Win,
}

impl ScriptStep {
    /// Outcome code the surface would answer with
    pub fn code(self) -> i32 {
        match self {
            Self::Hit => Outcome::CLICK_CODE,
            Self::Miss => Outcome::MISMATCH_CODE,
            Self::Win => Outcome::SUCCESS_CODE,
        }
    }
}

/// A session plus the scripted player driving it
pub struct Simulator {
    manager: GameManager<MockHost>,
    events: mpsc::UnboundedReceiver<GameEvent>,
    script: VecDeque<ScriptStep>,
    tick_ms: u64,
    frame: usize,
}

impl Simulator {
    /// Build a simulator over `host`
    pub fn new(host: MockHost, config: GameConfig, script: Vec<ScriptStep>, tick_ms: u64) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        Self {
            manager: GameManager::new(host, config, tx),
            events,
            script: script.into(),
            tick_ms,
            frame: 0,
        }
    }

    /// Start the session
    ///
    /// # Errors
    ///
    /// Whatever the manager rejects the start with.
    pub fn start(&mut self, params: SessionParams) -> Result<(), SessionError> {
        self.manager.request_start(params).map(|_| ())
    }

    /// Play one frame and return the events it produced
    pub fn step(&mut self) -> Vec<GameEvent> {
        self.play_input();
        self.manager.tick();
        self.manager.host_mut().end_frame(self.tick_ms);
        self.frame += 1;

        let mut produced = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            produced.push(event);
        }
        produced
    }

    /// Drain events published outside of `step` (the start event)
    pub fn drain(&mut self) -> Vec<GameEvent> {
        let mut produced = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            produced.push(event);
        }
        produced
    }

    /// Frames played so far
    pub fn frames(&self) -> usize {
        self.frame
    }

    /// Whether a session is still alive
    pub fn is_running(&self) -> bool {
        self.manager.is_running()
    }

    fn play_input(&mut self) {
        let binding = COLUMN_BINDINGS[self.frame % COLUMN_BINDINGS.len()];
        let host = self.manager.host_mut();

        if !host.has_queued_outcomes() {
            let step = self.script.pop_front().unwrap_or(ScriptStep::Miss);
            debug!(frame = self.frame, step = ?step, "Queueing scripted answer");
            host.queue_outcome(step.code());
        }

        host.press(binding.primary);
        host.press(CONFIRM_CONTROL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulator(script: Vec<ScriptStep>, lives: i32) -> Simulator {
        let config = GameConfig::default().with_rng_seed(11);
        let mut sim = Simulator::new(MockHost::new(), config, script, 16);
        sim.start(SessionParams::new("PASSWORD").with_lives(lives))
            .unwrap();
        sim
    }

    fn play_out(sim: &mut Simulator) -> Vec<GameEvent> {
        let mut events = sim.drain();
        while sim.is_running() && sim.frames() < 10_000 {
            events.extend(sim.step());
        }
        events
    }

    #[test]
    fn test_step_codes() {
        assert_eq!(ScriptStep::Hit.code(), 92);
        assert_eq!(ScriptStep::Miss.code(), 87);
        assert_eq!(ScriptStep::Win.code(), 86);
    }

    #[test]
    fn test_winning_script() {
        let mut sim = simulator(vec![ScriptStep::Hit, ScriptStep::Miss, ScriptStep::Win], 3);
        let events = play_out(&mut sim);
        assert!(matches!(events[0], GameEvent::Started { .. }));
        assert!(matches!(
            events.last(),
            Some(GameEvent::Result { success: true, .. })
        ));
    }

    #[test]
    fn test_exhausted_script_misses_until_failure() {
        let mut sim = simulator(vec![ScriptStep::Hit], 2);
        let events = play_out(&mut sim);
        assert!(matches!(
            events.last(),
            Some(GameEvent::Result { success: false, .. })
        ));
    }

    #[test]
    fn test_never_ready_surface_aborts() {
        let config = GameConfig::default().with_rng_seed(11);
        let mut sim = Simulator::new(MockHost::new().never_ready(), config, Vec::new(), 16);
        sim.start(SessionParams::new("PASSWORD")).unwrap();
        let events = play_out(&mut sim);
        assert!(matches!(events.last(), Some(GameEvent::Aborted { .. })));
    }
}
