//! Outcome resolution: reading confirm results and applying the lives rule.

use tracing::{debug, info};

use super::Session;
use crate::host::{Host, MethodCall};
use crate::protocol::{cue, method, Outcome, SUCCESS_TEXT};
use crate::timer::PendingAction;

impl Session {
    /// Handle the in-flight confirm if its result is ready
    ///
    /// Runs every running tick, including while a `Reset` is pending, so a
    /// confirm issued before the transition was scheduled still resolves.
    pub(super) fn resolve_outcome<H: Host>(&mut self, host: &mut H, now: u64) {
        let Some(ret) = self.pending_confirm else {
            return;
        };
        let Some(handle) = self.surface else {
            self.pending_confirm = None;
            return;
        };
        if !host.is_return_ready(ret) {
            return;
        }

        let outcome = Outcome::from_code(host.read_return_int(ret));
        self.pending_confirm = None;

        if !self.timer.is_idle() {
            debug!(
                session_id = %self.id,
                pending = ?self.timer.action(),
                outcome = ?outcome,
                "Confirm resolved while a transition is pending"
            );
        }

        match outcome {
            Outcome::Success => {
                host.play_frontend(cue::SUCCESS);
                host.invoke(
                    handle,
                    &MethodCall::new(method::SET_ROULETTE_OUTCOME)
                        .bool(true)
                        .string(SUCCESS_TEXT),
                );
                info!(session_id = %self.id, "Solution found");
                self.schedule(
                    PendingAction::RemoveThenSucceed,
                    now,
                    self.timing.end_delay_ms,
                );
            }
            Outcome::Mismatch => {
                host.play_frontend(cue::CLICK_BAD);
                self.lives_remaining = self.lives_remaining.saturating_sub(1);
                info!(
                    session_id = %self.id,
                    lives_remaining = self.lives_remaining,
                    "Column mismatch"
                );

                if self.lives_remaining == 0 {
                    self.release_surface(host);
                    host.play_speech(cue::OUT_OF_LIVES_SPEECH, cue::OUT_OF_LIVES_SPEECH_PARAMS);
                    self.schedule(PendingAction::RemoveThenFail, now, self.timing.end_delay_ms);
                } else {
                    host.invoke(handle, &MethodCall::new(method::STOP_ROULETTE));
                    self.push_lives(host, handle);
                    self.schedule(PendingAction::Reset, now, self.timing.reset_delay_ms);
                }
            }
            Outcome::Click => {
                host.play_frontend(cue::CLICK);
            }
            Outcome::Unknown(code) => {
                debug!(session_id = %self.id, code, "Ignoring unknown outcome code");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::host::MethodArg;
    use crate::protocol::CONFIRM_CONTROL;
    use crate::session::{SessionPhase, TickOutcome};
    use crate::testing::{HostCall, MockHost};
    use crate::validator::SessionParams;
    use pretty_assertions::assert_eq;

    fn running(lives: i32) -> (MockHost, Session) {
        let mut host = MockHost::new();
        host.set_now(1_000);
        let params = SessionParams::new("PASSWORD").with_lives(lives);
        let mut session = Session::new(&params, &GameConfig::default());
        session.start(&mut host).unwrap();
        host.clear_calls();
        (host, session)
    }

    fn answer(host: &mut MockHost, session: &mut Session, code: i32) {
        host.queue_outcome(code);
        host.press(CONFIRM_CONTROL);
        session.tick(host);
        host.end_frame(0);
    }

    #[test]
    fn test_success_banner_and_deadline() {
        let (mut host, mut session) = running(3);
        answer(&mut host, &mut session, Outcome::SUCCESS_CODE);

        let banner = host.invocations_named(method::SET_ROULETTE_OUTCOME);
        assert_eq!(
            banner[0].args,
            vec![
                MethodArg::Bool(true),
                MethodArg::Str("Successful Hacked".to_string())
            ]
        );
        assert_eq!(host.sounds(), vec![cue::SUCCESS]);
        assert_eq!(session.pending_action(), PendingAction::RemoveThenSucceed);
        assert_eq!(session.deadline(), 3_000);
    }

    #[test]
    fn test_mismatch_refreshes_lives_and_schedules_reset() {
        let (mut host, mut session) = running(3);
        answer(&mut host, &mut session, Outcome::MISMATCH_CODE);

        assert_eq!(session.lives_remaining(), 2);
        assert_eq!(session.pending_action(), PendingAction::Reset);
        assert_eq!(session.deadline(), 1_500);
        assert_eq!(host.sounds(), vec![cue::CLICK_BAD]);
        assert_eq!(host.last_lives_display(), Some(2));
        assert_eq!(host.release_count(), 0);
    }

    #[test]
    fn test_final_mismatch_curses_and_releases() {
        let (mut host, mut session) = running(1);
        answer(&mut host, &mut session, Outcome::MISMATCH_CODE);

        assert_eq!(session.lives_remaining(), 0);
        assert_eq!(session.pending_action(), PendingAction::RemoveThenFail);
        assert_eq!(session.deadline(), 3_000);
        assert!(session.is_finished());
        assert!(host.calls().iter().any(|c| matches!(
            c,
            HostCall::Speech { speech, .. } if speech == cue::OUT_OF_LIVES_SPEECH
        )));
        assert_eq!(host.count(method::STOP_ROULETTE), 0);
    }

    #[test]
    fn test_lives_decrease_by_one_per_mismatch() {
        let (mut host, mut session) = running(3);
        for expected in [2, 1, 0] {
            answer(&mut host, &mut session, Outcome::MISMATCH_CODE);
            assert_eq!(session.lives_remaining(), expected);
            if expected > 0 {
                host.set_now(session.deadline());
                assert_eq!(session.tick(&mut host), TickOutcome::Continue);
            }
        }

        host.set_now(session.deadline());
        assert_eq!(session.tick(&mut host), TickOutcome::Completed { success: false });
        assert_eq!(session.lives_remaining(), 0);
        assert_eq!(session.phase(), &SessionPhase::Completed { success: false });
    }

    #[test]
    fn test_stale_confirm_resolves_during_reset() {
        let (mut host, mut session) = running(3);

        // First confirm stays in flight
        host.press(CONFIRM_CONTROL);
        session.tick(&mut host);
        host.end_frame(0);
        assert!(session.has_pending_confirm());

        // Force a pending reset, then let the stale confirm land
        session.schedule(PendingAction::Reset, host.now(), 500);
        host.resolve_pending(Outcome::CLICK_CODE);
        session.tick(&mut host);

        assert!(!session.has_pending_confirm());
        assert_eq!(host.sounds(), vec![cue::CLICK]);
        assert_eq!(session.pending_action(), PendingAction::Reset);
    }
}
