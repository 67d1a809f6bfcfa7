//! Input dispatch: raw controls to logical column events and confirm.

use tracing::debug;

use super::Session;
use crate::host::{Host, MethodCall, SurfaceHandle};
use crate::protocol::{cue, method, COLUMN_BINDINGS, CONFIRM_CONTROL, CONTROL_GROUP};

impl Session {
    /// Forward this frame's presses to the surface
    ///
    /// Only called while no transition is pending.
    pub(super) fn dispatch_input<H: Host>(&mut self, host: &mut H, handle: SurfaceHandle) {
        for binding in COLUMN_BINDINGS {
            if host.was_just_pressed(CONTROL_GROUP, binding.primary)
                || host.was_just_pressed(CONTROL_GROUP, binding.alternate)
            {
                host.play_frontend(cue::MOVE_CURSOR);
                host.invoke(
                    handle,
                    &MethodCall::new(method::SET_INPUT_EVENT).int(binding.event),
                );
            }
        }

        if !host.was_just_pressed(CONTROL_GROUP, CONFIRM_CONTROL) {
            return;
        }

        if self.pending_confirm.is_some() {
            debug!(session_id = %self.id, "Confirm ignored: previous confirm still in flight");
            return;
        }

        let select = MethodCall::new(method::SET_INPUT_EVENT_SELECT);
        self.pending_confirm = Some(host.invoke_with_return(handle, &select));
    }
}
