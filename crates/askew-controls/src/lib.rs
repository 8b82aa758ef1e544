#![forbid(unsafe_code)]

//! Misbehaving form controls.
//!
//! Each control is a small state machine implementing [`Control`]: it takes
//! user [`Interaction`](askew_core::Interaction)s, applies its configured
//! [`BehaviorKind`](askew_core::BehaviorKind), and on a virtual clock decides
//! which value is committed to the host.
//!
//! | Control            | Committed value        | Behaviors               |
//! |--------------------|------------------------|-------------------------|
//! | [`DragDropSorter`] | [`Assignments`]        | regular, shifty         |
//! | [`CheckboxGroup`]  | `Vec<String>`          | regular, shifty, toxic  |
//! | [`RadioGroup`]     | `Option<String>`       | regular, shifty, toxic  |
//! | [`TextField`]      | `String`               | regular, shifty, toxic  |
//! | [`NumberField`]    | [`NumberValue`]        | regular, shifty, pirate |
//!
//! Unsupported behaviors fall back to regular. Delays and thresholds come
//! from [`BehaviorConfig`].

pub mod checkbox;
pub mod config;
pub mod control;
pub mod drag_drop;
pub mod number;
pub mod radio;
pub mod text;

pub use checkbox::{CheckOption, CheckboxGroup};
pub use config::{
    BehaviorConfig, CheckboxConfig, ConfigError, DragDropConfig, NumberConfig, RadioConfig,
    RelocationPolicy, TextConfig,
};
pub use control::{Control, MAX_IDLE_STEPS};
pub use drag_drop::{Assignments, DragDropOptions, DragDropSorter};
pub use number::{NumberField, NumberOptions, NumberValue, Step, ValidationError};
pub use radio::{RadioGroup, RadioOption};
pub use text::{TextField, TextOptions};
