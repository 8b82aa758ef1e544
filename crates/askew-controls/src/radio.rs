#![forbid(unsafe_code)]

//! Radio group.
//!
//! - Regular: a selection commits after a delay; a newer selection replaces
//!   the pending one, so superseded choices are never committed.
//! - Shifty: the choice commits at once, then is silently swapped for a
//!   random different option.
//! - Toxic: the choice commits at once and flips a once-per-lifetime flag the
//!   host uses to swap the surrounding question text.

use askew_core::{
    BehaviorKind, CommitPort, CommitSink, Duration, Fired, Interaction, RandomSource,
    SeededRandom, TimerSet, choose,
};

use crate::config::RadioConfig;
use crate::control::{Control, ignored};

const SUPPORTED: [BehaviorKind; 3] = [BehaviorKind::Regular, BehaviorKind::Shifty, BehaviorKind::Toxic];

/// One radio option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioOption {
    /// Submitted value.
    pub value: String,
    /// Label text. Never altered.
    pub label: String,
}

impl RadioOption {
    /// Option with `value` and `label`.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct SelectionSlot;

#[derive(Debug, Clone, PartialEq, Eq)]
enum RadioAction {
    Commit(String),
    Repick { chosen: String },
}

/// Radio group behavior unit.
#[derive(Debug)]
pub struct RadioGroup {
    behavior: BehaviorKind,
    config: RadioConfig,
    options: Vec<RadioOption>,
    selected: Option<String>,
    has_selected_once: bool,
    timers: TimerSet<SelectionSlot, RadioAction>,
    rng: Box<dyn RandomSource>,
    port: CommitPort<Option<String>>,
}

impl RadioGroup {
    /// Mount a group seeded from the externally stored choice.
    pub fn new(behavior: BehaviorKind, options: Vec<RadioOption>, current: Option<String>) -> Self {
        Self {
            behavior,
            config: RadioConfig::default(),
            options,
            selected: current,
            has_selected_once: false,
            timers: TimerSet::new(),
            rng: Box::new(SeededRandom::from_entropy()),
            port: CommitPort::new(),
        }
    }

    /// Use `config` for delays (builder).
    #[must_use]
    pub fn with_config(mut self, config: RadioConfig) -> Self {
        self.config = config;
        self
    }

    /// Use `rng` for shifty re-picks (builder).
    #[must_use]
    pub fn with_random(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Send committed choices to `sink` (builder).
    #[must_use]
    pub fn on_commit(mut self, sink: impl CommitSink<Option<String>> + 'static) -> Self {
        self.port.connect(sink);
        self
    }

    /// Options in display order.
    #[must_use]
    pub fn options(&self) -> &[RadioOption] {
        &self.options
    }

    /// Committed choice.
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Choice to render: a pending regular selection, else the committed one.
    #[must_use]
    pub fn displayed(&self) -> Option<&str> {
        match self.timers.pending_action(&SelectionSlot) {
            Some(RadioAction::Commit(value)) => Some(value),
            _ => self.selected(),
        }
    }

    /// Whether the host should show the altered question text.
    #[must_use]
    pub fn should_show_altered_question(&self) -> bool {
        self.effective_behavior() == BehaviorKind::Toxic && self.has_selected_once
    }

    fn is_option(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }

    fn commit(&mut self, value: String) {
        if self.selected.as_deref() == Some(value.as_str()) {
            return;
        }
        self.selected = Some(value);
        self.port.emit(&self.selected);
        tracing::debug!(
            control = Self::NAME,
            selected = self.selected.as_deref().unwrap_or_default(),
            version = self.port.version(),
            "commit"
        );
    }

    fn select(&mut self, value: &str) {
        self.timers.cancel(&SelectionSlot);
        match self.effective_behavior() {
            BehaviorKind::Shifty => {
                self.commit(value.to_owned());
                self.timers.schedule_once(
                    SelectionSlot,
                    self.config.shifty_repick_delay(),
                    RadioAction::Repick {
                        chosen: value.to_owned(),
                    },
                );
            }
            BehaviorKind::Toxic => {
                self.commit(value.to_owned());
                self.has_selected_once = true;
            }
            _ => {
                self.timers.schedule_once(
                    SelectionSlot,
                    self.config.commit_delay(),
                    RadioAction::Commit(value.to_owned()),
                );
            }
        }
    }

    fn repick(&mut self, chosen: &str) {
        let others: Vec<&str> = self
            .options
            .iter()
            .map(|o| o.value.as_str())
            .filter(|v| *v != chosen)
            .collect();
        let Some(other) = choose(self.rng.as_mut(), &others).map(|v| (*v).to_owned()) else {
            return;
        };
        tracing::debug!(control = Self::NAME, chosen, other = %other, "shifty re-pick");
        self.commit(other);
    }
}

impl Control for RadioGroup {
    type Value = Option<String>;

    const NAME: &'static str = "radio";

    fn behavior(&self) -> BehaviorKind {
        self.behavior
    }

    fn effective_behavior(&self) -> BehaviorKind {
        self.behavior.restricted_to(&SUPPORTED)
    }

    fn resolved(&self) -> &Option<String> {
        &self.selected
    }

    fn sync(&mut self, current: Option<String>) {
        self.selected = current;
    }

    fn handle(&mut self, interaction: &Interaction) {
        match interaction {
            Interaction::Change { value } if self.is_option(value) => self.select(value),
            Interaction::Change { .. } => ignored(Self::NAME, interaction, "unknown option"),
            _ => ignored(Self::NAME, interaction, "not a change"),
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
                RadioAction::Commit(value) => self.commit(value),
                RadioAction::Repick { chosen } => self.repick(&chosen),
            }
        }
        self.timers.settle(deadline);
        fired
    }

    fn reset(&mut self) {
        let cancelled = self.timers.cancel_all();
        tracing::debug!(control = Self::NAME, cancelled, "reset");
    }

    fn version(&self) -> u64 {
        self.port.version()
    }
}
