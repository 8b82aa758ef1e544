#![forbid(unsafe_code)]

//! Free-text field.
//!
//! Regular input is a passthrough. Shifty input commits after a short delay,
//! and on a fixed cycle of keystrokes the last character is dropped first.
//! Toxic input replaces the word being typed with one from a replacement
//! pool the moment it is longer than one character.

use unicode_segmentation::UnicodeSegmentation;

use askew_core::{
    BehaviorKind, CommitPort, CommitSink, Duration, Fired, Interaction, RandomSource,
    SeededRandom, TimerSet, choose,
};

use crate::config::TextConfig;
use crate::control::{Control, ignored};

const SUPPORTED: [BehaviorKind; 3] = [BehaviorKind::Regular, BehaviorKind::Shifty, BehaviorKind::Toxic];

/// Static options of a text field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextOptions {
    /// Toxic replacement pool. Toxic input is a passthrough while empty.
    pub replacements: Vec<String>,
}

impl TextOptions {
    /// Options with the given replacement pool.
    pub fn with_replacements<I, S>(replacements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replacements: replacements.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct InputSlot;

#[derive(Debug, Clone, PartialEq, Eq)]
struct ShiftyCommit {
    typed: String,
    lose: bool,
}

/// Text field behavior unit.
#[derive(Debug)]
pub struct TextField {
    behavior: BehaviorKind,
    config: TextConfig,
    options: TextOptions,
    display: String,
    value: String,
    keystrokes: u64,
    timers: TimerSet<InputSlot, ShiftyCommit>,
    rng: Box<dyn RandomSource>,
    port: CommitPort<String>,
}

impl TextField {
    /// Mount a field seeded from the externally stored text.
    pub fn new(behavior: BehaviorKind, options: TextOptions, current: impl Into<String>) -> Self {
        let current = current.into();
        Self {
            behavior,
            config: TextConfig::default(),
            options,
            display: current.clone(),
            value: current,
            keystrokes: 0,
            timers: TimerSet::new(),
            rng: Box::new(SeededRandom::from_entropy()),
            port: CommitPort::new(),
        }
    }

    /// Use `config` for the shifty delay and loss cycle (builder).
    #[must_use]
    pub fn with_config(mut self, config: TextConfig) -> Self {
        self.config = config;
        self
    }

    /// Use `rng` for toxic replacements (builder).
    #[must_use]
    pub fn with_random(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Send committed text to `sink` (builder).
    #[must_use]
    pub fn on_commit(mut self, sink: impl CommitSink<String> + 'static) -> Self {
        self.port.connect(sink);
        self
    }

    /// Text currently shown in the field.
    #[must_use]
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Committed text.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Shifty keystrokes seen so far.
    #[must_use]
    pub fn keystrokes(&self) -> u64 {
        self.keystrokes
    }

    /// Whether a delayed shifty commit is outstanding.
    #[must_use]
    pub fn is_input_delayed(&self) -> bool {
        self.effective_behavior() == BehaviorKind::Shifty && self.timers.is_pending(&InputSlot)
    }

    fn commit(&mut self, text: String) {
        self.display.clone_from(&text);
        if self.value == text {
            return;
        }
        self.value = text;
        self.port.emit(&self.value);
        tracing::debug!(
            control = Self::NAME,
            len = self.value.len(),
            version = self.port.version(),
            "commit"
        );
    }

    fn input(&mut self, typed: &str) {
        self.timers.cancel(&InputSlot);
        self.display = typed.to_owned();
        match self.effective_behavior() {
            BehaviorKind::Shifty => {
                self.keystrokes += 1;
                let lose = self.config.loses_keystroke(self.keystrokes);
                self.timers.schedule_once(
                    InputSlot,
                    self.config.shifty_delay(),
                    ShiftyCommit {
                        typed: typed.to_owned(),
                        lose,
                    },
                );
            }
            BehaviorKind::Toxic => {
                let text = self.poison(typed).unwrap_or_else(|| typed.to_owned());
                self.commit(text);
            }
            _ => self.commit(typed.to_owned()),
        }
    }

    /// Replace the trailing word of `typed`, if it is long enough and the pool
    /// has something to offer.
    fn poison(&mut self, typed: &str) -> Option<String> {
        let words: Vec<&str> = typed.split_whitespace().collect();
        let (last, head) = words.split_last()?;
        if last.graphemes(true).count() <= 1 {
            return None;
        }
        let replacement = choose(self.rng.as_mut(), &self.options.replacements)?;
        tracing::debug!(control = Self::NAME, word = *last, replacement = %replacement, "toxic swap");
        if head.is_empty() {
            Some(replacement.clone())
        } else {
            Some(format!("{} {replacement}", head.join(" ")))
        }
    }

    fn settle_shifty(&mut self, pending: ShiftyCommit) {
        let ShiftyCommit { typed, lose } = pending;
        let text = if lose {
            drop_last_grapheme(&typed).to_owned()
        } else {
            typed
        };
        if lose {
            tracing::debug!(control = Self::NAME, keystroke = self.keystrokes, "keystroke lost");
        }
        self.commit(text);
    }
}

fn drop_last_grapheme(text: &str) -> &str {
    match text.grapheme_indices(true).next_back() {
        Some((start, _)) => &text[..start],
        None => text,
    }
}

impl Control for TextField {
    type Value = String;

    const NAME: &'static str = "text";

    fn behavior(&self) -> BehaviorKind {
        self.behavior
    }

    fn effective_behavior(&self) -> BehaviorKind {
        self.behavior.restricted_to(&SUPPORTED)
    }

    fn resolved(&self) -> &String {
        &self.value
    }

    fn sync(&mut self, current: String) {
        if current != self.value {
            self.display.clone_from(&current);
            self.value = current;
        }
    }

    fn handle(&mut self, interaction: &Interaction) {
        match interaction {
            Interaction::Input { value } => self.input(value),
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
            self.settle_shifty(action);
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
