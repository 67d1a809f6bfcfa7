//! Surface bootstrap: bounded readiness polling and one-time setup.

use rand::Rng;
use tracing::{debug, info};

use super::{Session, SessionPhase, TickOutcome};
use crate::error::SessionError;
use crate::host::{Host, MethodCall, SurfaceHandle};
use crate::protocol::{method, COLUMN_COUNT, LIVES_DISPLAY_STYLE, SETUP_PROGRAMS};
use crate::validator::SpeedRange;

impl Session {
    /// Poll the surface once; initialize it if ready, else back off
    pub(super) fn poll_bootstrap<H: Host>(&mut self, host: &mut H) -> TickOutcome {
        let SessionPhase::Bootstrapping { attempts, .. } = self.phase else {
            return TickOutcome::Inert;
        };
        let Some(handle) = self.surface else {
            return self.abort(host, SessionError::SurfaceLoadTimeout { attempts });
        };

        if host.is_ready(handle) {
            self.initialize_surface(host, handle);
            self.phase = SessionPhase::Running;
            info!(session_id = %self.id, attempts, "Surface ready, session running");
            return TickOutcome::Continue;
        }

        let attempts = attempts + 1;
        if attempts >= self.timing.max_attempts {
            return self.abort(host, SessionError::SurfaceLoadTimeout { attempts });
        }

        let next_poll_at = host.now_ms().saturating_add(self.timing.retry_delay_ms);
        debug!(session_id = %self.id, attempts, next_poll_at, "Surface not ready");
        self.phase = SessionPhase::Bootstrapping {
            attempts,
            next_poll_at,
        };
        TickOutcome::Continue
    }

    /// One-time setup calls, in the order the surface expects them
    fn initialize_surface<H: Host>(&mut self, host: &mut H, handle: SurfaceHandle) {
        let Ok(params) = &self.params else {
            return;
        };
        let solution = params.solution.clone();
        let speed_range = params.speed_range;

        host.invoke(handle, &MethodCall::new(method::SET_BACKGROUND).int(0));
        for program in SETUP_PROGRAMS {
            host.invoke(handle, &MethodCall::new(method::RUN_PROGRAM).int(program));
        }
        self.push_lives(host, handle);
        host.invoke(
            handle,
            &MethodCall::new(method::SET_ROULETTE_WORD).string(solution),
        );

        self.column_speeds.clear();
        for column in 0..COLUMN_COUNT {
            let speed = self.roll_speed(speed_range);
            self.column_speeds.push(speed);
            host.invoke(
                handle,
                &MethodCall::new(method::SET_COLUMN_SPEED)
                    .int(column)
                    .float(speed),
            );
        }
    }

    /// Uniform in `[min, max)`, or exactly `min` for a fixed speed
    #[allow(clippy::cast_precision_loss)]
    fn roll_speed(&mut self, range: SpeedRange) -> f32 {
        let min = range.min as f32;
        let max = range.max as f32;
        if min < max {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    /// Push the current lives to the surface
    pub(super) fn push_lives<H: Host>(&self, host: &mut H, handle: SurfaceHandle) {
        host.invoke(
            handle,
            &MethodCall::new(method::SET_LIVES)
                .int(Self::lives_arg(self.lives_remaining))
                .int(LIVES_DISPLAY_STYLE),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::host::MethodArg;
    use crate::testing::{HostCall, MockHost};
    use crate::validator::SessionParams;
    use pretty_assertions::assert_eq;

    fn start(host: &mut MockHost, params: &SessionParams) -> (Session, Result<(), SessionError>) {
        let mut session = Session::new(params, &GameConfig::default().with_rng_seed(1));
        let result = session.start(host);
        (session, result)
    }

    #[test]
    fn test_setup_calls_in_order() {
        let mut host = MockHost::new();
        let (session, result) = start(&mut host, &SessionParams::new("password"));
        result.unwrap();

        let names: Vec<&str> = host
            .invocations()
            .into_iter()
            .map(|call| call.name.as_str())
            .collect();
        let mut expected = vec![
            method::SET_BACKGROUND,
            method::RUN_PROGRAM,
            method::RUN_PROGRAM,
            method::SET_LIVES,
            method::SET_ROULETTE_WORD,
        ];
        expected.extend(std::iter::repeat(method::SET_COLUMN_SPEED).take(8));
        assert_eq!(names, expected);

        let calls = host.invocations();
        assert_eq!(calls[0].args, vec![MethodArg::Int(0)]);
        assert_eq!(calls[1].args, vec![MethodArg::Int(4)]);
        assert_eq!(calls[2].args, vec![MethodArg::Int(83)]);
        assert_eq!(calls[3].args, vec![MethodArg::Int(3), MethodArg::Int(2)]);
        assert_eq!(calls[4].args, vec![MethodArg::Str("PASSWORD".to_string())]);
        assert_eq!(session.column_speeds().len(), 8);
    }

    #[test]
    fn test_input_disabled_before_surface_created() {
        let mut host = MockHost::new();
        let (_session, result) = start(&mut host, &SessionParams::new("PASSWORD"));
        result.unwrap();

        assert!(matches!(
            &host.calls()[..2],
            [HostCall::SetInputEnabled(false), HostCall::Create { .. }]
        ));
    }

    #[test]
    fn test_column_speeds_within_range() {
        let mut host = MockHost::new();
        let params = SessionParams::new("PASSWORD").with_speed_range(40, 60);
        let (session, result) = start(&mut host, &params);
        result.unwrap();

        for (column, call) in host
            .invocations_named(method::SET_COLUMN_SPEED)
            .iter()
            .enumerate()
        {
            let [MethodArg::Int(index), MethodArg::Float(speed)] = call.args.as_slice() else {
                panic!("unexpected SET_COLUMN_SPEED args: {:?}", call.args);
            };
            let speed = *speed;
            assert_eq!(usize::try_from(*index).unwrap(), column);
            assert!((40.0..60.0).contains(&speed), "speed {speed} out of range");
            assert_eq!(session.column_speeds()[column], speed);
        }
    }

    #[test]
    fn test_fixed_speed_when_bounds_equal() {
        let mut host = MockHost::new();
        let params = SessionParams::new("PASSWORD").with_speed_range(50, 50);
        let (session, result) = start(&mut host, &params);
        result.unwrap();
        assert!(session.column_speeds().iter().all(|s| (*s - 50.0).abs() < f32::EPSILON));
    }

    #[test]
    fn test_same_seed_same_speeds() {
        let mut host_a = MockHost::new();
        let mut host_b = MockHost::new();
        let (a, _) = start(&mut host_a, &SessionParams::new("PASSWORD"));
        let (b, _) = start(&mut host_b, &SessionParams::new("PASSWORD"));
        assert_eq!(a.column_speeds(), b.column_speeds());
    }

    #[test]
    fn test_retries_until_ready() {
        let mut host = MockHost::new().ready_after(3);
        let (mut session, result) = start(&mut host, &SessionParams::new("PASSWORD"));
        result.unwrap();
        assert_eq!(
            session.phase(),
            &SessionPhase::Bootstrapping {
                attempts: 1,
                next_poll_at: 25
            }
        );

        // Not due yet: no poll
        host.set_now(24);
        assert_eq!(session.tick(&mut host), TickOutcome::Continue);
        assert_eq!(host.ready_polls(), 1);

        host.set_now(25);
        session.tick(&mut host);
        assert_eq!(host.ready_polls(), 2);

        host.set_now(50);
        session.tick(&mut host);
        assert_eq!(host.ready_polls(), 3);
        assert_eq!(session.phase(), &SessionPhase::Running);
        assert_eq!(host.count(method::SET_ROULETTE_WORD), 1);
    }

    #[test]
    fn test_timeout_after_attempt_budget() {
        let mut host = MockHost::new().never_ready();
        let (mut session, result) = start(&mut host, &SessionParams::new("PASSWORD"));
        result.unwrap();

        let mut outcome = TickOutcome::Continue;
        for _ in 0..200 {
            host.advance(25);
            outcome = session.tick(&mut host);
            if outcome != TickOutcome::Continue {
                break;
            }
        }

        assert_eq!(
            outcome,
            TickOutcome::Aborted(SessionError::SurfaceLoadTimeout { attempts: 100 })
        );
        assert_eq!(host.ready_polls(), 100);
        assert!(host.input_enabled());
        assert_eq!(host.release_count(), 1);
        assert_eq!(host.count(method::SET_ROULETTE_WORD), 0);
        assert_eq!(session.tick(&mut host), TickOutcome::Inert);
    }

    #[test]
    fn test_single_attempt_budget_fails_in_start() {
        let mut host = MockHost::new().never_ready();
        let mut config = GameConfig::default();
        config.bootstrap_max_attempts = 1;
        let mut session = Session::new(&SessionParams::new("PASSWORD"), &config);
        assert_eq!(
            session.start(&mut host),
            Err(SessionError::SurfaceLoadTimeout { attempts: 1 })
        );
        assert!(session.phase().is_terminal());
    }
}
