//! Stop convergence state machine
//!
//! ```text
//!     ┌───────────┐
//!     │ Requested │
//!     └─────┬─────┘
//!           │ stop issued
//!     ┌─────▼───────┐  still stopping,
//!     │ PollingFast │◀─ attempts left
//!     └─────┬───────┘
//!           │ attempts exhausted (notify once)
//!     ┌─────▼───────┐  still stopping,
//!     │ PollingSlow │◀─ time left
//!     └─────┬───────┘
//!           │ deadline passed
//!     ┌─────▼────┐
//!     │ TimedOut │
//!     └──────────┘
//!
//!   any polling state ── not active/deactivating ──▶ Converged
//! ```
//!
//! Failed (a status query erroring) is not a phase here: the manager
//! propagates the error and drops the machine.
//!
//! The machine holds no clock. The manager feeds it the observed
//! ActiveState and the time elapsed since the stop command was issued, and
//! does what the returned [`Step`] says.

use std::time::Duration;

use super::state::is_still_stopping;
use crate::config::StopPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopPhase {
    Requested,
    /// `attempt` polls have already been answered
    PollingFast { attempt: u32 },
    PollingSlow,
    Converged,
    TimedOut,
}

impl StopPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Converged | Self::TimedOut)
    }
}

/// What the manager should do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Sleep, then query ActiveState again. `notify` is set exactly once per
    /// stop, on the step that enters the slow phase.
    Poll { after: Duration, notify: bool },
    Converged,
    TimedOut,
}

#[derive(Debug, Clone)]
pub struct StopMachine {
    policy: StopPolicy,
    timeout: Duration,
    phase: StopPhase,
}

impl StopMachine {
    pub fn new(policy: StopPolicy, timeout: Duration) -> Self {
        Self {
            policy,
            timeout,
            phase: StopPhase::Requested,
        }
    }

    pub fn phase(&self) -> StopPhase {
        self.phase
    }

    /// The stop command went through; the first poll happens immediately
    pub fn stop_issued(&mut self) {
        if self.phase == StopPhase::Requested {
            self.phase = StopPhase::PollingFast { attempt: 0 };
        }
    }

    /// Feed one poll result
    pub fn observe(&mut self, active_state: &str, elapsed: Duration) -> Step {
        match self.phase {
            StopPhase::Converged => return Step::Converged,
            StopPhase::TimedOut => return Step::TimedOut,
            StopPhase::Requested | StopPhase::PollingFast { .. } | StopPhase::PollingSlow => {}
        }

        if !is_still_stopping(active_state) {
            self.phase = StopPhase::Converged;
            return Step::Converged;
        }

        match self.phase {
            StopPhase::Requested | StopPhase::PollingFast { .. } => {
                let attempt = match self.phase {
                    StopPhase::PollingFast { attempt } => attempt + 1,
                    _ => 1,
                };
                if attempt < self.policy.fast_attempts {
                    self.phase = StopPhase::PollingFast { attempt };
                    Step::Poll {
                        after: self.policy.fast_delay,
                        notify: false,
                    }
                } else {
                    self.phase = StopPhase::PollingSlow;
                    Step::Poll {
                        after: self.policy.slow_interval,
                        notify: true,
                    }
                }
            }
            _ => {
                if elapsed >= self.timeout {
                    self.phase = StopPhase::TimedOut;
                    Step::TimedOut
                } else {
                    Step::Poll {
                        after: self.policy.slow_interval,
                        notify: false,
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(attempts: u32) -> StopPolicy {
        StopPolicy {
            fast_attempts: attempts,
            fast_delay: Duration::from_millis(1),
            slow_interval: Duration::from_millis(5),
        }
    }

    fn machine(attempts: u32, timeout: Duration) -> StopMachine {
        let mut m = StopMachine::new(policy(attempts), timeout);
        m.stop_issued();
        m
    }

    #[test]
    fn test_starts_requested() {
        let m = StopMachine::new(policy(2), Duration::from_secs(1));
        assert_eq!(m.phase(), StopPhase::Requested);
        assert!(!m.phase().is_terminal());
    }

    #[test]
    fn test_converges_on_first_poll() {
        let mut m = machine(3, Duration::from_secs(1));
        assert_eq!(m.observe("inactive", Duration::ZERO), Step::Converged);
        assert_eq!(m.phase(), StopPhase::Converged);
        assert!(m.phase().is_terminal());
    }

    #[test]
    fn test_unknown_state_converges() {
        let mut m = machine(3, Duration::from_secs(1));
        assert_eq!(m.observe("whatever", Duration::ZERO), Step::Converged);
    }

    #[test]
    fn test_fast_phase_then_slow_with_single_notify() {
        let mut m = machine(3, Duration::from_secs(1));
        let fast = Step::Poll {
            after: Duration::from_millis(1),
            notify: false,
        };
        let slow = Step::Poll {
            after: Duration::from_millis(5),
            notify: false,
        };

        assert_eq!(m.observe("active", Duration::ZERO), fast);
        assert_eq!(m.phase(), StopPhase::PollingFast { attempt: 1 });
        assert_eq!(m.observe("deactivating", Duration::ZERO), fast);
        assert_eq!(
            m.observe("active", Duration::ZERO),
            Step::Poll {
                after: Duration::from_millis(5),
                notify: true
            }
        );
        assert_eq!(m.phase(), StopPhase::PollingSlow);
        assert_eq!(m.observe("active", Duration::from_millis(10)), slow);
        assert_eq!(m.observe("active", Duration::from_millis(20)), slow);
        assert_eq!(m.observe("inactive", Duration::from_millis(30)), Step::Converged);
    }

    #[test]
    fn test_fast_phase_ignores_deadline() {
        let mut m = machine(3, Duration::ZERO);
        assert!(matches!(
            m.observe("active", Duration::from_secs(5)),
            Step::Poll { notify: false, .. }
        ));
    }

    #[test]
    fn test_times_out_in_slow_phase() {
        let mut m = machine(1, Duration::from_millis(10));
        assert!(matches!(m.observe("active", Duration::ZERO), Step::Poll { notify: true, .. }));
        assert!(matches!(
            m.observe("active", Duration::from_millis(5)),
            Step::Poll { notify: false, .. }
        ));
        assert_eq!(m.observe("active", Duration::from_millis(10)), Step::TimedOut);
        assert_eq!(m.phase(), StopPhase::TimedOut);
        // terminal phases are sticky
        assert_eq!(m.observe("inactive", Duration::from_millis(11)), Step::TimedOut);
    }

    #[test]
    fn test_zero_attempts_goes_straight_to_slow() {
        let mut m = machine(0, Duration::from_secs(1));
        assert!(matches!(m.observe("active", Duration::ZERO), Step::Poll { notify: true, .. }));
        assert_eq!(m.phase(), StopPhase::PollingSlow);
    }
}
