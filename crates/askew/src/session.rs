#![forbid(unsafe_code)]

//! Scripted playback of interactions on a control's virtual clock.
//!
//! A [`Script`] is a list of [`Cue`]s, each an interaction at an offset from
//! the start of playback. [`play`] walks the script: before each cue it fires
//! every timer due by then, then hands the interaction to the control. After
//! the last cue it lets the control run until no timer is left.
//!
//! With the `serde` feature a script can be loaded from JSON:
//!
//! ```json
//! [
//!   { "at_ms": 0,   "interaction": { "kind": "input", "value": "5" } },
//!   { "at_ms": 1100, "interaction": { "kind": "input", "value": "59" } }
//! ]
//! ```

use askew_controls::Control;
use askew_core::{Duration, Interaction};

/// One interaction at an offset from the start of playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    /// Offset from the start of playback.
    pub at: Duration,
    /// What the user does.
    pub interaction: Interaction,
}

/// Interactions ordered by offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    cues: Vec<Cue>,
}

impl Script {
    /// An empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `interaction` at offset `at` (builder). Cues with equal offsets
    /// keep insertion order.
    #[must_use]
    pub fn at(mut self, at: Duration, interaction: Interaction) -> Self {
        self.push(at, interaction);
        self
    }

    /// Add `interaction` `after` the latest cue (builder).
    #[must_use]
    pub fn then(self, after: Duration, interaction: Interaction) -> Self {
        let at = self.end() + after;
        self.at(at, interaction)
    }

    /// Add `interaction` at offset `at`.
    pub fn push(&mut self, at: Duration, interaction: Interaction) {
        let index = self.cues.partition_point(|cue| cue.at <= at);
        self.cues.insert(index, Cue { at, interaction });
    }

    /// Cues in playback order.
    #[must_use]
    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    /// Number of cues.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    /// Whether the script has no cues.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Offset of the last cue.
    #[must_use]
    pub fn end(&self) -> Duration {
        self.cues.last().map_or(Duration::ZERO, |cue| cue.at)
    }
}

impl FromIterator<Cue> for Script {
    fn from_iter<I: IntoIterator<Item = Cue>>(iter: I) -> Self {
        let mut script = Self::new();
        for cue in iter {
            script.push(cue.at, cue.interaction);
        }
        script
    }
}

#[cfg(feature = "serde")]
mod wire {
    use serde::{Deserialize, Serialize};

    use super::{Cue, Duration, Interaction, Script};

    #[derive(Serialize, Deserialize)]
    struct WireCue {
        at_ms: u64,
        interaction: Interaction,
    }

    impl Script {
        /// Parse a JSON array of `{ "at_ms", "interaction" }` objects.
        pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
            let wire: Vec<WireCue> = serde_json::from_str(s)?;
            Ok(wire
                .into_iter()
                .map(|cue| Cue {
                    at: Duration::from_millis(cue.at_ms),
                    interaction: cue.interaction,
                })
                .collect())
        }

        /// Serialize to the JSON form accepted by [`Script::from_json_str`].
        pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
            let wire: Vec<WireCue> = self
                .cues
                .iter()
                .map(|cue| WireCue {
                    at_ms: u64::try_from(cue.at.as_millis()).unwrap_or(u64::MAX),
                    interaction: cue.interaction.clone(),
                })
                .collect();
            serde_json::to_string_pretty(&wire)
        }
    }
}

/// Control state right after a cue was handled.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<V> {
    /// Control clock when the cue was handled.
    pub at: Duration,
    /// Interaction kind, as in log fields.
    pub kind: &'static str,
    /// Committed value after the cue.
    pub resolved: V,
    /// Commit count after the cue.
    pub version: u64,
}

/// Outcome of [`play`].
#[derive(Debug, Clone, PartialEq)]
pub struct Playback<V> {
    /// One frame per cue.
    pub frames: Vec<Frame<V>>,
    /// Committed value once every timer has fired.
    pub resolved: V,
    /// Commits emitted during playback.
    pub commits: u64,
    /// Timers fired during playback.
    pub timers_fired: usize,
    /// Control clock at the end of playback.
    pub finished_at: Duration,
}

/// Play `script` against `control`, then run it until idle.
///
/// Offsets are relative to the control's clock when playback starts.
pub fn play<C: Control>(control: &mut C, script: &Script) -> Playback<C::Value> {
    let span = tracing::debug_span!("playback", control = C::NAME, cues = script.len());
    let _guard = span.enter();

    let start = control.now();
    let first_version = control.version();
    let mut timers_fired = 0;
    let mut frames = Vec::with_capacity(script.len());

    for cue in script.cues() {
        timers_fired += control.advance_to(start + cue.at);
        control.handle(&cue.interaction);
        frames.push(Frame {
            at: control.now(),
            kind: cue.interaction.kind(),
            resolved: control.resolved().clone(),
            version: control.version(),
        });
    }
    timers_fired += control.run_until_idle();

    let playback = Playback {
        frames,
        resolved: control.resolved().clone(),
        commits: control.version() - first_version,
        timers_fired,
        finished_at: control.now(),
    };
    tracing::debug!(
        commits = playback.commits,
        timers_fired = playback.timers_fired,
        "playback finished"
    );
    playback
}
