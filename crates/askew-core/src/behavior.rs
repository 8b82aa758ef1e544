#![forbid(unsafe_code)]

//! Behavior kind selector.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Misbehavior policy applied to a control instance. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BehaviorKind {
    /// Plain, possibly delayed, behavior.
    #[default]
    Regular,
    /// Values drift, revert or relocate after the fact.
    Shifty,
    /// Labels, words or questions mutate.
    Toxic,
    /// Input is taken over by a fixed sentinel.
    Pirate,
}

impl BehaviorKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 4] = [Self::Regular, Self::Shifty, Self::Toxic, Self::Pirate];

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Shifty => "shifty",
            Self::Toxic => "toxic",
            Self::Pirate => "pirate",
        }
    }

    /// Parse a configured name. Unknown names fall back to [`Self::Regular`].
    #[must_use]
    pub fn parse_lenient(name: &str) -> Self {
        name.parse().unwrap_or_else(|err: UnknownBehavior| {
            tracing::warn!(name = %err.0, "unknown behavior kind, using regular");
            Self::Regular
        })
    }

    /// This kind if `supported` contains it, otherwise [`Self::Regular`].
    #[must_use]
    pub fn restricted_to(self, supported: &[Self]) -> Self {
        if supported.contains(&self) {
            self
        } else {
            Self::Regular
        }
    }
}

impl fmt::Display for BehaviorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A behavior name that matched no kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBehavior(pub String);

impl fmt::Display for UnknownBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown behavior kind `{}`", self.0)
    }
}

impl std::error::Error for UnknownBehavior {}

impl FromStr for BehaviorKind {
    type Err = UnknownBehavior;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownBehavior(trimmed.to_owned()))
    }
}
