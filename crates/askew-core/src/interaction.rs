#![forbid(unsafe_code)]

//! Raw user interactions, detached from any UI toolkit's event object.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where a dragged item was released or hovered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DropZone {
    /// A named category bucket.
    Category(String),
    /// The pool of unassigned items.
    Pool,
}

impl DropZone {
    /// Category zone for `id`.
    pub fn category(id: impl Into<String>) -> Self {
        Self::Category(id.into())
    }
}

/// One user-originated event forwarded by the host.
///
/// Controls act on the variants that concern them and ignore the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Interaction {
    /// An item was picked up.
    DragStart { item: String },
    /// The current drag finished, wherever it ended.
    DragEnd,
    /// The drag pointer entered a zone.
    DragOver { zone: DropZone },
    /// The drag pointer left a zone.
    DragLeave { zone: DropZone },
    /// An item was released on a zone. `payload` is the transferred item id,
    /// absent when the transfer carried nothing.
    Drop { zone: DropZone, payload: Option<String> },
    /// A checkbox or radio option identified by `value` was activated.
    Change { value: String },
    /// The full current text of an input element.
    Input { value: String },
}

impl Interaction {
    /// Drop `item` on category `category`.
    pub fn drop_on(category: impl Into<String>, item: impl Into<String>) -> Self {
        Self::Drop {
            zone: DropZone::Category(category.into()),
            payload: Some(item.into()),
        }
    }

    /// Drop `item` back on the pool.
    pub fn drop_on_pool(item: impl Into<String>) -> Self {
        Self::Drop {
            zone: DropZone::Pool,
            payload: Some(item.into()),
        }
    }

    /// Start dragging `item`.
    pub fn drag_start(item: impl Into<String>) -> Self {
        Self::DragStart { item: item.into() }
    }

    /// Activate option `value`.
    pub fn change(value: impl Into<String>) -> Self {
        Self::Change {
            value: value.into(),
        }
    }

    /// Report the input's text.
    pub fn input(value: impl Into<String>) -> Self {
        Self::Input {
            value: value.into(),
        }
    }

    /// Short operation name for log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::DragStart { .. } => "drag_start",
            Self::DragEnd => "drag_end",
            Self::DragOver { .. } => "drag_over",
            Self::DragLeave { .. } => "drag_leave",
            Self::Drop { .. } => "drop",
            Self::Change { .. } => "change",
            Self::Input { .. } => "input",
        }
    }
}
