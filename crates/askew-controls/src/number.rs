#![forbid(unsafe_code)]

//! Numeric field.
//!
//! Validation runs on every keystroke regardless of behavior: empty input is
//! valid and means "no value"; anything else must parse, respect `min` and
//! `max`, and sit on the `step` grid. Nothing is committed while the input is
//! invalid, with one exception: the pirate takeover replaces the value with a
//! sentinel string outright.
//!
//! # Behaviors
//!
//! | Kind    | Effect                                                            |
//! |---------|-------------------------------------------------------------------|
//! | Regular | Commit the parsed value after a delay.                            |
//! | Shifty  | After a delay, drift the value by random offsets, committing each |
//! |         | step, for a fixed number of steps.                                |
//! | Pirate  | A typed digit arms a takeover; once it fires, input is ignored.   |
//!
//! Toxic falls back to regular.

use std::fmt;

use askew_core::{
    BehaviorKind, CommitPort, CommitSink, Duration, Fired, Interaction, RandomSource,
    SeededRandom, TimerSet,
};

use crate::config::NumberConfig;
use crate::control::{Control, ignored};

const SUPPORTED: [BehaviorKind; 3] = [BehaviorKind::Regular, BehaviorKind::Shifty, BehaviorKind::Pirate];

/// Tolerance for the step grid check.
pub const STEP_EPSILON: f64 = 1e-9;

/// Committed value of a number field.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NumberValue {
    /// No value.
    #[default]
    Empty,
    /// A number.
    Number(f64),
    /// A non-numeric takeover value.
    Sentinel(String),
}

impl NumberValue {
    /// The numeric value, if there is one.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Whether there is no value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl From<Option<f64>> for NumberValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Empty, Self::Number)
    }
}

impl fmt::Display for NumberValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Number(n) => write!(f, "{n}"),
            Self::Sentinel(s) => f.write_str(s),
        }
    }
}

/// Step granularity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Step {
    /// Any value is aligned.
    #[default]
    Any,
    /// Values must be a multiple of this step away from the base.
    Value(f64),
}

/// Why typed input cannot be committed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Input did not parse as a finite number.
    #[error("Please enter a valid number.")]
    NotANumber,
    /// Below the configured minimum.
    #[error("Value must be ≥ {min}.")]
    BelowMin {
        /// Configured minimum.
        min: f64,
    },
    /// Above the configured maximum.
    #[error("Value must be ≤ {max}.")]
    AboveMax {
        /// Configured maximum.
        max: f64,
    },
    /// Off the step grid.
    #[error("Value must align to step of {step}.")]
    Misaligned {
        /// Configured step.
        step: f64,
    },
}

/// Static constraints of a number field.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NumberOptions {
    /// Inclusive lower bound; also the base of the step grid.
    pub min: Option<f64>,
    /// Inclusive upper bound.
    pub max: Option<f64>,
    /// Step grid.
    pub step: Step,
}

impl NumberOptions {
    /// Set the minimum (builder).
    #[must_use]
    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Set the maximum (builder).
    #[must_use]
    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Set the step (builder).
    #[must_use]
    pub fn with_step(mut self, step: Step) -> Self {
        self.step = step;
        self
    }

    /// Validate raw input. `Ok(None)` is the empty input.
    pub fn validate(&self, raw: &str) -> Result<Option<f64>, ValidationError> {
        if raw.is_empty() {
            return Ok(None);
        }
        let value = raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or(ValidationError::NotANumber)?;

        if let Some(min) = self.min
            && value < min
        {
            return Err(ValidationError::BelowMin { min });
        }
        if let Some(max) = self.max
            && value > max
        {
            return Err(ValidationError::AboveMax { max });
        }
        if let Step::Value(step) = self.step
            && step.is_finite()
            && step > 0.0
        {
            let base = self.min.unwrap_or(0.0);
            let remainder = ((value - base) % step).abs();
            if remainder > STEP_EPSILON && (remainder - step).abs() > STEP_EPSILON {
                return Err(ValidationError::Misaligned { step });
            }
        }
        Ok(Some(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum NumberSlot {
    Primary,
    Drift,
    Pirate,
}

#[derive(Debug, Clone, PartialEq)]
enum NumberAction {
    Commit(NumberValue),
    StartDrift(f64),
    DriftStep,
    Takeover,
}

#[derive(Debug, Clone, Copy, Default)]
struct DriftRun {
    current: f64,
    steps: u32,
}

/// Number field behavior unit.
#[derive(Debug)]
pub struct NumberField {
    behavior: BehaviorKind,
    config: NumberConfig,
    options: NumberOptions,
    display: String,
    value: NumberValue,
    error: Option<ValidationError>,
    pirate_mode: bool,
    show_pirate_message: bool,
    drift: DriftRun,
    timers: TimerSet<NumberSlot, NumberAction>,
    rng: Box<dyn RandomSource>,
    port: CommitPort<NumberValue>,
}

impl NumberField {
    /// Mount a field seeded from the externally stored value.
    pub fn new(behavior: BehaviorKind, options: NumberOptions, current: NumberValue) -> Self {
        let mut field = Self {
            behavior,
            config: NumberConfig::default(),
            options,
            display: String::new(),
            value: NumberValue::Empty,
            error: None,
            pirate_mode: false,
            show_pirate_message: false,
            drift: DriftRun::default(),
            timers: TimerSet::new(),
            rng: Box::new(SeededRandom::from_entropy()),
            port: CommitPort::new(),
        };
        field.sync(current);
        field
    }

    /// Use `config` for delays, drift band and sentinel (builder).
    #[must_use]
    pub fn with_config(mut self, config: NumberConfig) -> Self {
        self.config = config;
        self
    }

    /// Use `rng` for drift offsets and precision (builder).
    #[must_use]
    pub fn with_random(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Send committed values to `sink` (builder).
    #[must_use]
    pub fn on_commit(mut self, sink: impl CommitSink<NumberValue> + 'static) -> Self {
        self.port.connect(sink);
        self
    }

    /// Constraints in effect.
    #[must_use]
    pub fn options(&self) -> &NumberOptions {
        &self.options
    }

    /// Text shown in the field, including in-progress input like `"3."`.
    #[must_use]
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Committed value.
    #[must_use]
    pub fn value(&self) -> &NumberValue {
        &self.value
    }

    /// Current validation error.
    #[must_use]
    pub fn validation_error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    /// Current validation message; empty while valid.
    #[must_use]
    pub fn validation_message(&self) -> String {
        self.error.as_ref().map(ToString::to_string).unwrap_or_default()
    }

    /// Whether the committed value is a number.
    #[must_use]
    pub fn is_valid_number(&self) -> bool {
        self.value.as_number().is_some_and(|n| !n.is_nan())
    }

    /// Whether the pirate takeover has fired.
    #[must_use]
    pub fn is_pirate_mode(&self) -> bool {
        self.pirate_mode
    }

    /// Whether the host should show the pirate message.
    #[must_use]
    pub fn show_pirate_message(&self) -> bool {
        self.show_pirate_message
    }

    /// Whether a shifty drift run is in progress.
    #[must_use]
    pub fn is_drifting(&self) -> bool {
        self.timers.is_pending(&NumberSlot::Drift)
    }

    fn commit(&mut self, value: NumberValue) {
        if value == self.value {
            tracing::trace!(control = Self::NAME, "commit skipped, value unchanged");
            return;
        }
        self.publish(value);
    }

    /// Emit `value` even when it equals the committed one; each drift step
    /// counts as its own change.
    fn publish(&mut self, value: NumberValue) {
        if !matches!(value, NumberValue::Sentinel(_)) && self.error.is_some() {
            tracing::debug!(control = Self::NAME, "commit blocked by validation error");
            return;
        }
        self.value = value;
        self.port.emit(&self.value);
        tracing::debug!(
            control = Self::NAME,
            value = %self.value,
            version = self.port.version(),
            "commit"
        );
    }

    fn input(&mut self, raw: &str) {
        let behavior = self.effective_behavior();
        if behavior == BehaviorKind::Pirate && self.pirate_mode {
            tracing::trace!(control = Self::NAME, "input ignored in pirate mode");
            return;
        }

        let parsed = self.options.validate(raw);
        self.error = parsed.as_ref().err().cloned();
        self.display = raw.to_owned();

        self.timers.cancel(&NumberSlot::Primary);
        self.timers.cancel(&NumberSlot::Pirate);
        if self.timers.cancel(&NumberSlot::Drift) {
            tracing::debug!(control = Self::NAME, steps = self.drift.steps, "drift run interrupted");
        }
        self.drift = DriftRun::default();

        let Ok(parsed) = parsed else {
            if behavior == BehaviorKind::Pirate {
                self.arm_pirate(raw);
            }
            return;
        };

        match behavior {
            BehaviorKind::Shifty => {
                if let Some(n) = parsed {
                    self.timers.schedule_once(
                        NumberSlot::Primary,
                        self.config.shifty_start_delay(),
                        NumberAction::StartDrift(n),
                    );
                }
            }
            BehaviorKind::Pirate => self.arm_pirate(raw),
            _ => {
                self.timers.schedule_once(
                    NumberSlot::Primary,
                    self.config.commit_delay(),
                    NumberAction::Commit(parsed.into()),
                );
            }
        }
    }

    fn arm_pirate(&mut self, raw: &str) {
        if raw.chars().any(|c| c.is_ascii_digit()) {
            self.show_pirate_message = true;
            self.timers.schedule_once(
                NumberSlot::Pirate,
                self.config.pirate_delay(),
                NumberAction::Takeover,
            );
        }
    }

    fn start_drift(&mut self, typed: f64) {
        if self.error.is_some() {
            return;
        }
        // drift perturbs the committed value; the typed one seeds a fresh field
        let from = self.value.as_number().unwrap_or(typed);
        self.drift = DriftRun {
            current: from,
            steps: 0,
        };
        let period = self.config.shifty_period();
        self.timers
            .schedule_every(NumberSlot::Drift, period, period, NumberAction::DriftStep);
        tracing::debug!(control = Self::NAME, from, typed, "drift run started");
    }

    fn drift_step(&mut self) {
        let offset = self.rng.int_in(self.config.drift_min, self.config.drift_max);
        let places = self.rng.int_in(0, i64::from(self.config.max_decimal_places));
        let places = usize::try_from(places).unwrap_or(0);

        let drifted = self.drift.current + offset as f64;
        let formatted = format!("{drifted:.places$}");
        let value = formatted.parse::<f64>().unwrap_or(drifted);

        self.drift.current = value;
        self.drift.steps += 1;
        self.display = formatted;
        self.publish(NumberValue::Number(value));

        if self.drift.steps >= self.config.shifty_iterations {
            self.timers.cancel(&NumberSlot::Drift);
            tracing::debug!(control = Self::NAME, steps = self.drift.steps, "drift run finished");
        }
    }

    fn take_over(&mut self) {
        let sentinel = self.config.pirate_sentinel.clone();
        self.pirate_mode = true;
        self.show_pirate_message = true;
        self.error = None;
        self.display.clone_from(&sentinel);
        tracing::debug!(control = Self::NAME, "pirate takeover");
        self.commit(NumberValue::Sentinel(sentinel));
    }
}

impl Control for NumberField {
    type Value = NumberValue;

    const NAME: &'static str = "number";

    fn behavior(&self) -> BehaviorKind {
        self.behavior
    }

    fn effective_behavior(&self) -> BehaviorKind {
        self.behavior.restricted_to(&SUPPORTED)
    }

    fn resolved(&self) -> &NumberValue {
        &self.value
    }

    fn sync(&mut self, current: NumberValue) {
        match current {
            NumberValue::Number(n) if n.is_nan() => {
                tracing::trace!(control = Self::NAME, "NaN sync ignored");
            }
            NumberValue::Empty => {
                self.value = NumberValue::Empty;
                self.display.clear();
                self.pirate_mode = false;
                self.show_pirate_message = false;
                self.error = None;
            }
            NumberValue::Number(n) => {
                self.value = NumberValue::Number(n);
                self.display = n.to_string();
                self.error = None;
            }
            NumberValue::Sentinel(s) => {
                self.display.clone_from(&s);
                self.value = NumberValue::Sentinel(s);
                self.pirate_mode = true;
                self.show_pirate_message = true;
                self.error = None;
            }
        }
    }

    fn handle(&mut self, interaction: &Interaction) {
        match interaction {
            Interaction::Input { value } | Interaction::Change { value } => self.input(value),
            _ => ignored(Self::NAME, interaction, "not an input"),
        }
    }

    fn now(&self) -> Duration {
        self.timers.now()
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    fn advance_to(&mut self, deadline: Duration) -> usize {
        let mut fired = 0;
        while let Some(Fired { action, .. }) = self.timers.pop_due(deadline) {
            fired += 1;
            match action {
                NumberAction::Commit(value) => self.commit(value),
                NumberAction::StartDrift(from) => self.start_drift(from),
                NumberAction::DriftStep => self.drift_step(),
                NumberAction::Takeover => self.take_over(),
            }
        }
        self.timers.settle(deadline);
        fired
    }

    fn reset(&mut self) {
        let cancelled = self.timers.cancel_all();
        self.drift = DriftRun::default();
        tracing::debug!(control = Self::NAME, cancelled, "reset");
    }

    fn version(&self) -> u64 {
        self.port.version()
    }
}
