//! Mock Host
//!
//! An in-memory [`Host`](crate::host::Host) that records every call and lets
//! tests (and the simulator) script readiness, presses and confirm answers
//! against a manual clock.
//!
//! # Usage
//!
//! ```ignore
//! use hacking_core::testing::MockHost;
//!
//! let mut host = MockHost::new().ready_after(2);
//! host.queue_outcome(86);
//! host.press(hacking_core::protocol::CONFIRM_CONTROL);
//! session.tick(&mut host);
//! host.end_frame(16);
//! ```

use std::cell::Cell;
use std::collections::{HashMap, HashSet, VecDeque};

use crate::host::{
    AudioCues, Clock, HostControl, InputSource, MethodArg, MethodCall, RenderSurface, ReturnHandle,
    Rgba, SurfaceHandle,
};
use crate::protocol::{method, CONTROL_GROUP};

/// One recorded host interaction
#[derive(Clone, Debug, PartialEq)]
pub enum HostCall {
    /// `set_input_enabled`
    SetInputEnabled(bool),
    /// `create`
    Create {
        /// Movie name
        movie: String,
        /// Handle handed out
        handle: SurfaceHandle,
    },
    /// `invoke`
    Invoke {
        /// Target surface
        handle: SurfaceHandle,
        /// The call
        call: MethodCall,
    },
    /// `invoke_with_return`
    InvokeWithReturn {
        /// Target surface
        handle: SurfaceHandle,
        /// The call
        call: MethodCall,
        /// Return handle handed out
        ret: ReturnHandle,
    },
    /// `read_return_int`
    ReadReturn {
        /// Handle read
        ret: ReturnHandle,
        /// Value returned
        value: i32,
    },
    /// `draw_fullscreen`
    Draw {
        /// Surface drawn
        handle: SurfaceHandle,
    },
    /// `release`
    Release {
        /// Surface released
        handle: SurfaceHandle,
    },
    /// `play_frontend`
    Sound(String),
    /// `play_speech`
    Speech {
        /// Speech line
        speech: String,
        /// Speech parameters
        params: String,
    },
}

/// Scriptable in-memory host
#[derive(Debug)]
pub struct MockHost {
    now: u64,
    next_handle: i32,
    ready_after: Option<u32>,
    ready_polls: Cell<u32>,
    pressed: HashSet<(u32, u32)>,
    queued_outcomes: VecDeque<i32>,
    returns: HashMap<ReturnHandle, Option<i32>>,
    input_enabled: bool,
    calls: Vec<HostCall>,
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHost {
    /// Host whose surface is ready on the first poll
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: 0,
            next_handle: 1,
            ready_after: Some(1),
            ready_polls: Cell::new(0),
            pressed: HashSet::new(),
            queued_outcomes: VecDeque::new(),
            returns: HashMap::new(),
            input_enabled: true,
            calls: Vec::new(),
        }
    }

    /// Surface reports ready on the `polls`-th readiness poll
    #[must_use]
    pub fn ready_after(mut self, polls: u32) -> Self {
        self.ready_after = Some(polls.max(1));
        self
    }

    /// Surface never reports ready
    #[must_use]
    pub fn never_ready(mut self) -> Self {
        self.ready_after = None;
        self
    }

    // ------------------------------------------------------------------
    // Scripting
    // ------------------------------------------------------------------

    /// Current clock value
    #[must_use]
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Set the clock
    pub fn set_now(&mut self, now: u64) {
        self.now = now;
    }

    /// Move the clock forward
    pub fn advance(&mut self, ms: u64) {
        self.now = self.now.saturating_add(ms);
    }

    /// Mark a control in the default group as just pressed
    pub fn press(&mut self, code: u32) {
        self.pressed.insert((CONTROL_GROUP, code));
    }

    /// Mark a control in any group as just pressed
    pub fn press_in(&mut self, group: u32, code: u32) {
        self.pressed.insert((group, code));
    }

    /// Clear presses and advance the clock
    pub fn end_frame(&mut self, ms: u64) {
        self.pressed.clear();
        self.advance(ms);
    }

    /// Answer the next confirm with `code`, ready immediately
    pub fn queue_outcome(&mut self, code: i32) {
        self.queued_outcomes.push_back(code);
    }

    /// Make every unresolved return value ready with `code`
    pub fn resolve_pending(&mut self, code: i32) {
        for value in self.returns.values_mut().filter(|v| v.is_none()) {
            *value = Some(code);
        }
    }

    /// Forget recorded calls
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    /// Everything recorded so far
    #[must_use]
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Surface method calls (with or without return), in order
    #[must_use]
    pub fn invocations(&self) -> Vec<&MethodCall> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Invoke { call, .. } | HostCall::InvokeWithReturn { call, .. } => {
                    Some(call)
                }
                _ => None,
            })
            .collect()
    }

    /// Surface method calls with this name
    #[must_use]
    pub fn invocations_named(&self, name: &str) -> Vec<&MethodCall> {
        self.invocations()
            .into_iter()
            .filter(|c| c.name == name)
            .collect()
    }

    /// Number of surface method calls with this name
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.invocations_named(name).len()
    }

    /// Frontend sounds played, in order
    #[must_use]
    pub fn sounds(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Sound(sound) => Some(sound.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Lives value of the most recent `SET_LIVES`
    #[must_use]
    pub fn last_lives_display(&self) -> Option<i32> {
        self.invocations_named(method::SET_LIVES)
            .last()
            .and_then(|call| match call.args.first() {
                Some(MethodArg::Int(lives)) => Some(*lives),
                _ => None,
            })
    }

    /// Number of `release` calls
    #[must_use]
    pub fn release_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, HostCall::Release { .. }))
            .count()
    }

    /// Number of readiness polls
    #[must_use]
    pub fn ready_polls(&self) -> u32 {
        self.ready_polls.get()
    }

    /// Whether player input is currently enabled
    #[must_use]
    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    /// Whether a confirm answer is still waiting to be handed out
    #[must_use]
    pub fn has_queued_outcomes(&self) -> bool {
        !self.queued_outcomes.is_empty()
    }

    /// Whether a return value was handed out but not yet resolved
    #[must_use]
    pub fn has_unresolved_returns(&self) -> bool {
        self.returns.values().any(Option::is_none)
    }
}

impl RenderSurface for MockHost {
    fn create(&mut self, movie: &str) -> SurfaceHandle {
        let handle = SurfaceHandle(self.next_handle);
        self.next_handle += 1;
        self.calls.push(HostCall::Create {
            movie: movie.to_string(),
            handle,
        });
        handle
    }

    fn is_ready(&self, _handle: SurfaceHandle) -> bool {
        let polls = self.ready_polls.get() + 1;
        self.ready_polls.set(polls);
        self.ready_after.is_some_and(|after| polls >= after)
    }

    fn invoke(&mut self, handle: SurfaceHandle, call: &MethodCall) {
        self.calls.push(HostCall::Invoke {
            handle,
            call: call.clone(),
        });
    }

    fn invoke_with_return(&mut self, handle: SurfaceHandle, call: &MethodCall) -> ReturnHandle {
        let ret = ReturnHandle(self.next_handle);
        self.next_handle += 1;
        self.returns.insert(ret, self.queued_outcomes.pop_front());
        self.calls.push(HostCall::InvokeWithReturn {
            handle,
            call: call.clone(),
            ret,
        });
        ret
    }

    fn is_return_ready(&self, handle: ReturnHandle) -> bool {
        matches!(self.returns.get(&handle), Some(Some(_)))
    }

    fn read_return_int(&mut self, handle: ReturnHandle) -> i32 {
        let value = self.returns.remove(&handle).flatten().unwrap_or_default();
        self.calls.push(HostCall::ReadReturn { ret: handle, value });
        value
    }

    fn draw_fullscreen(&mut self, handle: SurfaceHandle, _tint: Rgba) {
        self.calls.push(HostCall::Draw { handle });
    }

    fn release(&mut self, handle: SurfaceHandle) {
        self.calls.push(HostCall::Release { handle });
    }
}

impl InputSource for MockHost {
    fn was_just_pressed(&self, group: u32, code: u32) -> bool {
        self.pressed.contains(&(group, code))
    }
}

impl AudioCues for MockHost {
    fn play_frontend(&mut self, sound: &str) {
        self.calls.push(HostCall::Sound(sound.to_string()));
    }

    fn play_speech(&mut self, speech: &str, params: &str) {
        self.calls.push(HostCall::Speech {
            speech: speech.to_string(),
            params: params.to_string(),
        });
    }
}

impl HostControl for MockHost {
    fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
        self.calls.push(HostCall::SetInputEnabled(enabled));
    }
}

impl Clock for MockHost {
    fn now_ms(&self) -> u64 {
        self.now
    }
}
