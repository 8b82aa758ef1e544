#![forbid(unsafe_code)]

//! Askew: form controls that misbehave on purpose.
//!
//! This crate re-exports the primitives from `askew-core` and the controls
//! from `askew-controls`, and adds:
//!
//! - [`logging`] - `tracing` subscriber bootstrap
//! - [`session`] - scripted interaction playback on the virtual clock
//!
//! # Example
//!
//! ```
//! use askew::prelude::*;
//!
//! let recorder = CommitRecorder::new();
//! let mut radio = RadioGroup::new(
//!     BehaviorKind::Regular,
//!     vec![RadioOption::new("a", "A"), RadioOption::new("b", "B")],
//!     None,
//! )
//! .on_commit(recorder.sink());
//!
//! let script = Script::new()
//!     .at(Duration::ZERO, Interaction::change("a"))
//!     .at(Duration::from_millis(100), Interaction::change("b"));
//! let playback = play(&mut radio, &script);
//!
//! assert_eq!(playback.resolved, Some("b".to_owned()));
//! assert_eq!(recorder.len(), 1);
//! ```

pub mod logging;
pub mod session;

pub use askew_controls as controls;
pub use askew_core as core;

pub use askew_controls::{
    Assignments, BehaviorConfig, CheckOption, CheckboxGroup, Control, DragDropOptions,
    DragDropSorter, NumberField, NumberOptions, NumberValue, RadioGroup, RadioOption, Step,
    TextField, TextOptions, ValidationError,
};
pub use askew_core::{
    BehaviorKind, CommitRecorder, DropZone, Duration, Interaction, RandomSource, ScriptedRandom,
    SeededRandom,
};
pub use session::{Cue, Frame, Playback, Script, play};

/// Everything a host needs to mount and drive controls.
pub mod prelude {
    pub use crate::session::{Cue, Playback, Script, play};
    pub use askew_controls::{
        Assignments, BehaviorConfig, CheckOption, CheckboxGroup, Control, DragDropOptions,
        DragDropSorter, NumberField, NumberOptions, NumberValue, RadioGroup, RadioOption, Step,
        TextField, TextOptions,
    };
    pub use askew_core::{
        BehaviorKind, CommitRecorder, DropZone, Duration, Interaction, ScriptedRandom,
        SeededRandom,
    };
}
