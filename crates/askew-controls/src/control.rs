#![forbid(unsafe_code)]

//! The protocol every control behavior unit speaks.
//!
//! A host drives a control with three calls:
//!
//! 1. [`Control::sync`] whenever the externally stored value changes,
//! 2. [`Control::handle`] once per user interaction,
//! 3. [`Control::tick`] (or [`Control::advance_to`]) as time passes.
//!
//! Resolved state is read back through [`Control::resolved`]; every change of
//! it is also pushed to the commit sink the control was built with, and
//! counted by [`Control::version`].

use askew_core::{BehaviorKind, Duration, Interaction};

/// Upper bound on timer firings in one [`Control::run_until_idle`] call.
pub const MAX_IDLE_STEPS: usize = 10_000;

/// A control behavior unit.
pub trait Control {
    /// Shape of the committed value.
    type Value: Clone + PartialEq + std::fmt::Debug;

    /// Short control name used in log fields.
    const NAME: &'static str;

    /// The configured behavior kind.
    fn behavior(&self) -> BehaviorKind;

    /// The behavior kind actually applied, after unsupported kinds fall back
    /// to regular.
    fn effective_behavior(&self) -> BehaviorKind;

    /// Last committed value.
    fn resolved(&self) -> &Self::Value;

    /// Resynchronize with an externally supplied value. Pending timers are
    /// left running.
    fn sync(&mut self, current: Self::Value);

    /// Consume one user interaction.
    fn handle(&mut self, interaction: &Interaction);

    /// Current virtual time of this control.
    fn now(&self) -> Duration;

    /// Earliest pending timer deadline.
    fn next_deadline(&self) -> Option<Duration>;

    /// Fire every timer due at or before `deadline` and move the clock
    /// there. Returns the number of timers fired.
    fn advance_to(&mut self, deadline: Duration) -> usize;

    /// Cancel every outstanding timer.
    fn reset(&mut self);

    /// Number of commits emitted so far.
    fn version(&self) -> u64;

    /// Let `elapsed` pass.
    fn tick(&mut self, elapsed: Duration) -> usize {
        let target = self.now() + elapsed;
        self.advance_to(target)
    }

    /// Whether no timer is pending.
    fn is_idle(&self) -> bool {
        self.next_deadline().is_none()
    }

    /// Fire timers until none remain, bounded by [`MAX_IDLE_STEPS`].
    fn run_until_idle(&mut self) -> usize {
        let mut fired = 0;
        let mut steps = 0;
        while let Some(deadline) = self.next_deadline() {
            if steps >= MAX_IDLE_STEPS {
                tracing::warn!(control = Self::NAME, fired, "run_until_idle step limit reached");
                break;
            }
            steps += 1;
            fired += self.advance_to(deadline);
        }
        fired
    }
}

/// Trace an interaction a control has no use for.
pub(crate) fn ignored(control: &'static str, interaction: &Interaction, reason: &'static str) {
    tracing::trace!(control, interaction = interaction.kind(), reason, "interaction ignored");
}
