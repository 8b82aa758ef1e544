#![forbid(unsafe_code)]

//! Checkbox group.
//!
//! A toggle is computed from the committed selection, never from the native
//! checkbox state. Each option has its own timer slot, so toggling one box
//! supersedes only that box's pending toggle.
//!
//! - Regular: the toggle commits after a delay.
//! - Shifty: the first N checks commit at once and are reverted after a
//!   delay; everything else commits at once.
//! - Toxic: the first N checks swap the option's label with a random other
//!   option's label, permanently. Selection itself behaves normally.

use std::collections::BTreeMap;

use askew_core::{
    BehaviorKind, CommitPort, CommitSink, Duration, Fired, Interaction, RandomSource,
    SeededRandom, TimerSet, choose,
};

use crate::config::CheckboxConfig;
use crate::control::{Control, ignored};

const SUPPORTED: [BehaviorKind; 3] = [BehaviorKind::Regular, BehaviorKind::Shifty, BehaviorKind::Toxic];

/// One checkbox: its submitted value and canonical label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOption {
    /// Value placed in the selection when checked.
    pub value: String,
    /// Canonical label text.
    pub label: String,
}

impl CheckOption {
    /// Option with `value` and `label`.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CheckAction {
    Apply { checked: bool },
    Revert,
}

/// Checkbox group behavior unit.
#[derive(Debug)]
pub struct CheckboxGroup {
    behavior: BehaviorKind,
    config: CheckboxConfig,
    options: Vec<CheckOption>,
    labels: BTreeMap<String, String>,
    selected: Vec<String>,
    qualifying_checks: u32,
    timers: TimerSet<String, CheckAction>,
    rng: Box<dyn RandomSource>,
    port: CommitPort<Vec<String>>,
}

impl CheckboxGroup {
    /// Mount a group seeded from the externally stored selection.
    pub fn new(behavior: BehaviorKind, options: Vec<CheckOption>, current: Vec<String>) -> Self {
        let labels = options
            .iter()
            .map(|o| (o.value.clone(), o.label.clone()))
            .collect();
        let mut group = Self {
            behavior,
            config: CheckboxConfig::default(),
            options,
            labels,
            selected: Vec::new(),
            qualifying_checks: 0,
            timers: TimerSet::new(),
            rng: Box::new(SeededRandom::from_entropy()),
            port: CommitPort::new(),
        };
        group.sync(current);
        group
    }

    /// Use `config` for delays and thresholds (builder).
    #[must_use]
    pub fn with_config(mut self, config: CheckboxConfig) -> Self {
        self.config = config;
        self
    }

    /// Use `rng` for label swaps (builder).
    #[must_use]
    pub fn with_random(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Send committed selections to `sink` (builder).
    #[must_use]
    pub fn on_commit(mut self, sink: impl CommitSink<Vec<String>> + 'static) -> Self {
        self.port.connect(sink);
        self
    }

    /// Options in display order.
    #[must_use]
    pub fn options(&self) -> &[CheckOption] {
        &self.options
    }

    /// Committed selection, in check order.
    #[must_use]
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    /// Whether `value` is in the committed selection.
    #[must_use]
    pub fn is_checked(&self, value: &str) -> bool {
        self.selected.iter().any(|v| v == value)
    }

    /// Whether a toggle or revert for `value` is still pending.
    #[must_use]
    pub fn is_pending(&self, value: &str) -> bool {
        self.timers.is_pending(&value.to_owned())
    }

    /// What the box for `value` should show right now: a pending regular
    /// toggle shows its target state, otherwise the committed state.
    #[must_use]
    pub fn displayed_checked(&self, value: &str) -> bool {
        match self.timers.pending_action(&value.to_owned()) {
            Some(CheckAction::Apply { checked }) => *checked,
            _ => self.is_checked(value),
        }
    }

    /// Label currently shown for `value`; empty for unknown values.
    #[must_use]
    pub fn label(&self, value: &str) -> &str {
        self.labels.get(value).map(String::as_str).unwrap_or("")
    }

    /// Checks that consumed the shifty/toxic threshold so far.
    #[must_use]
    pub fn qualifying_checks(&self) -> u32 {
        self.qualifying_checks
    }

    fn is_option(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }

    fn apply(&mut self, value: &str, checked: bool) {
        let mut next = self.selected.clone();
        if checked {
            if !next.iter().any(|v| v == value) {
                next.push(value.to_owned());
            }
        } else {
            next.retain(|v| v != value);
        }
        if next == self.selected {
            return;
        }
        self.selected = next;
        self.port.emit(&self.selected);
        tracing::debug!(
            control = Self::NAME,
            value,
            checked,
            version = self.port.version(),
            "commit"
        );
    }

    fn swap_label(&mut self, value: &str) {
        let others: Vec<&str> = self
            .options
            .iter()
            .map(|o| o.value.as_str())
            .filter(|v| *v != value)
            .collect();
        let Some(other) = choose(self.rng.as_mut(), &others).map(|v| (*v).to_owned()) else {
            return;
        };
        let mine = self.labels.get(value).cloned().unwrap_or_default();
        let theirs = self.labels.get(&other).cloned().unwrap_or_default();
        tracing::debug!(control = Self::NAME, value, other = %other, "label swap");
        self.labels.insert(value.to_owned(), theirs);
        self.labels.insert(other, mine);
    }

    fn toggle(&mut self, value: &str) {
        let should_check = !self.is_checked(value);
        self.timers.cancel(&value.to_owned());

        match self.effective_behavior() {
            BehaviorKind::Shifty => {
                if should_check && self.qualifying_checks < self.config.shifty_threshold {
                    self.qualifying_checks += 1;
                    self.apply(value, true);
                    self.timers.schedule_once(
                        value.to_owned(),
                        self.config.shifty_revert_delay(),
                        CheckAction::Revert,
                    );
                } else {
                    self.apply(value, should_check);
                }
            }
            BehaviorKind::Toxic => {
                if should_check && self.qualifying_checks < self.config.toxic_threshold {
                    self.qualifying_checks += 1;
                    self.swap_label(value);
                }
                self.apply(value, should_check);
            }
            _ => {
                self.timers.schedule_once(
                    value.to_owned(),
                    self.config.commit_delay(),
                    CheckAction::Apply {
                        checked: should_check,
                    },
                );
            }
        }
    }
}

impl Control for CheckboxGroup {
    type Value = Vec<String>;

    const NAME: &'static str = "checkbox";

    fn behavior(&self) -> BehaviorKind {
        self.behavior
    }

    fn effective_behavior(&self) -> BehaviorKind {
        self.behavior.restricted_to(&SUPPORTED)
    }

    fn resolved(&self) -> &Vec<String> {
        &self.selected
    }

    fn sync(&mut self, current: Vec<String>) {
        let mut deduped: Vec<String> = Vec::with_capacity(current.len());
        for value in current {
            if !deduped.contains(&value) {
                deduped.push(value);
            }
        }
        self.selected = deduped;
    }

    fn handle(&mut self, interaction: &Interaction) {
        match interaction {
            Interaction::Change { value } if self.is_option(value) => self.toggle(value),
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
        while let Some(Fired { key, action, .. }) = self.timers.pop_due(deadline) {
            fired += 1;
            match action {
                CheckAction::Apply { checked } => self.apply(&key, checked),
                CheckAction::Revert => self.apply(&key, false),
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
