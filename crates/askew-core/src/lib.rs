#![forbid(unsafe_code)]

//! Askew core primitives.
//!
//! Shared building blocks for the misbehaving form controls in
//! `askew-controls`:
//!
//! - [`timer::TimerSet`] - keyed, cancellable, virtual-clock timers
//! - [`random::RandomSource`] - injectable uniform randomness
//! - [`interaction::Interaction`] - toolkit-independent user events
//! - [`behavior::BehaviorKind`] - the misbehavior selector
//! - [`commit::CommitPort`] - outbound commit channel
//! - [`announce::Announcer`] - screen-reader status text

pub mod announce;
pub mod behavior;
pub mod commit;
pub mod interaction;
pub mod random;
pub mod timer;

pub use announce::Announcer;
pub use behavior::{BehaviorKind, UnknownBehavior};
pub use commit::{CommitPort, CommitRecorder, CommitSink};
pub use interaction::{DropZone, Interaction};
pub use random::{RandomSource, ScriptedRandom, SeededRandom, choose};
pub use timer::{Cadence, Fired, TimerSet};
pub use web_time::Duration;
