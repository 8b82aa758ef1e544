#![forbid(unsafe_code)]

//! Policy-as-data configuration for the control behaviors.
//!
//! Every delay and threshold the controls use lives in [`BehaviorConfig`],
//! which can be loaded from TOML or JSON at startup.
//!
//! ```toml
//! [drag_drop]
//! relocate_every = 3
//! relocation_policy = "per_category"
//!
//! [checkbox]
//! shifty_threshold = 1
//! ```
//!
//! ```rust,ignore
//! let config = BehaviorConfig::from_toml_file("askew.toml")?;
//! ```
//!
//! `BehaviorConfig::default()` carries the literal delays the controls were
//! designed around.

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use askew_core::Duration;

// ---------------------------------------------------------------------------
// Top-level BehaviorConfig
// ---------------------------------------------------------------------------

/// Every tunable delay and threshold, grouped per control kind.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct BehaviorConfig {
    /// Drag-drop sorter parameters.
    pub drag_drop: DragDropConfig,
    /// Checkbox group parameters.
    pub checkbox: CheckboxConfig,
    /// Radio group parameters.
    pub radio: RadioConfig,
    /// Text field parameters.
    pub text: TextConfig,
    /// Number field parameters.
    pub number: NumberConfig,
}

impl BehaviorConfig {
    /// Load from a TOML string and validate.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string and validate.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Serialize to a TOML string.
    #[cfg(feature = "config")]
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::TomlSerialize)
    }

    #[cfg(feature = "config")]
    fn validated(self) -> Result<Self, ConfigError> {
        let problems = self.validate();
        if problems.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(problems))
        }
    }

    /// Check every parameter. An empty list means the config is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.drag_drop.relocate_every == 0 {
            errors.push("drag_drop.relocate_every must be > 0".into());
        }

        if self.text.loss_cycle == 0 {
            errors.push("text.loss_cycle must be > 0".into());
        }
        for position in &self.text.loss_positions {
            if *position == 0 || *position > self.text.loss_cycle {
                errors.push(format!(
                    "text.loss_positions entries must be in 1..={}, got {position}",
                    self.text.loss_cycle
                ));
            }
        }

        if self.number.drift_min > self.number.drift_max {
            errors.push(format!(
                "number.drift_min ({}) must be <= number.drift_max ({})",
                self.number.drift_min, self.number.drift_max
            ));
        }
        if self.number.shifty_period_ms == 0 {
            errors.push("number.shifty_period_ms must be > 0".into());
        }
        if self.number.shifty_iterations == 0 {
            errors.push("number.shifty_iterations must be > 0".into());
        }
        if self.number.max_decimal_places > MAX_DECIMAL_PLACES {
            errors.push(format!(
                "number.max_decimal_places must be <= {MAX_DECIMAL_PLACES}, got {}",
                self.number.max_decimal_places
            ));
        }
        if self.number.pirate_sentinel.is_empty() {
            errors.push("number.pirate_sentinel must not be empty".into());
        }

        errors
    }
}

/// Upper bound for the drift formatting precision.
pub const MAX_DECIMAL_PLACES: u32 = 9;

// ---------------------------------------------------------------------------
// Drag-drop
// ---------------------------------------------------------------------------

/// How shifty drag-drop decides a drop should be relocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum RelocationPolicy {
    /// Every Nth drop into any category relocates.
    #[default]
    Global,
    /// Every Nth placement into the same category relocates.
    PerCategory,
}

/// Drag-drop sorter parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct DragDropConfig {
    /// Relocate on every Nth counted drop.
    pub relocate_every: u32,
    /// Which drops are counted.
    pub relocation_policy: RelocationPolicy,
    /// Delay before a relocation moves the item.
    pub relocation_delay_ms: u64,
    /// How long an announcement stays visible.
    pub announcement_window_ms: u64,
}

impl Default for DragDropConfig {
    fn default() -> Self {
        Self {
            relocate_every: 3,
            relocation_policy: RelocationPolicy::Global,
            relocation_delay_ms: 200,
            announcement_window_ms: 1_000,
        }
    }
}

impl DragDropConfig {
    /// Relocation delay as a duration.
    #[must_use]
    pub fn relocation_delay(&self) -> Duration {
        Duration::from_millis(self.relocation_delay_ms)
    }

    /// Announcement window as a duration.
    #[must_use]
    pub fn announcement_window(&self) -> Duration {
        Duration::from_millis(self.announcement_window_ms)
    }
}

// ---------------------------------------------------------------------------
// Checkbox
// ---------------------------------------------------------------------------

/// Checkbox group parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct CheckboxConfig {
    /// Regular: delay before a toggle commits.
    pub commit_delay_ms: u64,
    /// Shifty: how many checks get reverted.
    pub shifty_threshold: u32,
    /// Shifty: delay before a reverted check is unchecked.
    pub shifty_revert_delay_ms: u64,
    /// Toxic: how many checks swap labels.
    pub toxic_threshold: u32,
}

impl Default for CheckboxConfig {
    fn default() -> Self {
        Self {
            commit_delay_ms: 500,
            shifty_threshold: 2,
            shifty_revert_delay_ms: 800,
            toxic_threshold: 2,
        }
    }
}

impl CheckboxConfig {
    /// Regular commit delay as a duration.
    #[must_use]
    pub fn commit_delay(&self) -> Duration {
        Duration::from_millis(self.commit_delay_ms)
    }

    /// Shifty revert delay as a duration.
    #[must_use]
    pub fn shifty_revert_delay(&self) -> Duration {
        Duration::from_millis(self.shifty_revert_delay_ms)
    }
}

// ---------------------------------------------------------------------------
// Radio
// ---------------------------------------------------------------------------

/// Radio group parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct RadioConfig {
    /// Regular: delay before a selection commits.
    pub commit_delay_ms: u64,
    /// Shifty: delay before the selection is swapped for another option.
    pub shifty_repick_delay_ms: u64,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            commit_delay_ms: 600,
            shifty_repick_delay_ms: 600,
        }
    }
}

impl RadioConfig {
    /// Regular commit delay as a duration.
    #[must_use]
    pub fn commit_delay(&self) -> Duration {
        Duration::from_millis(self.commit_delay_ms)
    }

    /// Shifty re-pick delay as a duration.
    #[must_use]
    pub fn shifty_repick_delay(&self) -> Duration {
        Duration::from_millis(self.shifty_repick_delay_ms)
    }
}

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

/// Text field parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct TextConfig {
    /// Shifty: delay before a keystroke commits.
    pub shifty_delay_ms: u64,
    /// Shifty: length of the keystroke cycle.
    pub loss_cycle: u32,
    /// Shifty: 1-based positions within the cycle that lose their character.
    pub loss_positions: Vec<u32>,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            shifty_delay_ms: 300,
            loss_cycle: 5,
            loss_positions: vec![2, 5],
        }
    }
}

impl TextConfig {
    /// Shifty delay as a duration.
    #[must_use]
    pub fn shifty_delay(&self) -> Duration {
        Duration::from_millis(self.shifty_delay_ms)
    }

    /// Whether the `keystroke`-th keystroke (1-based) loses its character.
    #[must_use]
    pub fn loses_keystroke(&self, keystroke: u64) -> bool {
        if self.loss_cycle == 0 || keystroke == 0 {
            return false;
        }
        let position = (keystroke - 1) % u64::from(self.loss_cycle) + 1;
        self.loss_positions
            .iter()
            .any(|p| u64::from(*p) == position)
    }
}

// ---------------------------------------------------------------------------
// Number
// ---------------------------------------------------------------------------

/// Number field parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct NumberConfig {
    /// Regular: delay before a valid value commits.
    pub commit_delay_ms: u64,
    /// Shifty: delay before the drift run starts.
    pub shifty_start_delay_ms: u64,
    /// Shifty: interval between drift steps.
    pub shifty_period_ms: u64,
    /// Shifty: drift steps per run.
    pub shifty_iterations: u32,
    /// Shifty: smallest drift offset.
    pub drift_min: i64,
    /// Shifty: largest drift offset.
    pub drift_max: i64,
    /// Shifty: upper bound for the random display precision.
    pub max_decimal_places: u32,
    /// Pirate: delay before the takeover.
    pub pirate_delay_ms: u64,
    /// Pirate: text that replaces the value.
    pub pirate_sentinel: String,
}

impl Default for NumberConfig {
    fn default() -> Self {
        Self {
            commit_delay_ms: 500,
            shifty_start_delay_ms: 200,
            shifty_period_ms: 200,
            shifty_iterations: 10,
            drift_min: -49,
            drift_max: 59,
            max_decimal_places: 3,
            pirate_delay_ms: 1_200,
            pirate_sentinel: "ARRRGH!".into(),
        }
    }
}

impl NumberConfig {
    /// Regular commit delay as a duration.
    #[must_use]
    pub fn commit_delay(&self) -> Duration {
        Duration::from_millis(self.commit_delay_ms)
    }

    /// Shifty start delay as a duration.
    #[must_use]
    pub fn shifty_start_delay(&self) -> Duration {
        Duration::from_millis(self.shifty_start_delay_ms)
    }

    /// Shifty step period as a duration.
    #[must_use]
    pub fn shifty_period(&self) -> Duration {
        Duration::from_millis(self.shifty_period_ms)
    }

    /// Pirate takeover delay as a duration.
    #[must_use]
    pub fn pirate_delay(&self) -> Duration {
        Duration::from_millis(self.pirate_delay_ms)
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a behavior configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// TOML serialization error.
    #[cfg(feature = "config")]
    TomlSerialize(toml::ser::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::TomlSerialize(e) => write!(f, "TOML serialize error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::TomlSerialize(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(BehaviorConfig::default().validate().is_empty());
    }

    #[test]
    fn defaults_match_designed_delays() {
        let config = BehaviorConfig::default();
        assert_eq!(config.drag_drop.relocation_delay(), Duration::from_millis(200));
        assert_eq!(config.checkbox.commit_delay(), Duration::from_millis(500));
        assert_eq!(config.radio.commit_delay(), Duration::from_millis(600));
        assert_eq!(config.text.shifty_delay(), Duration::from_millis(300));
        assert_eq!(config.number.pirate_delay(), Duration::from_millis(1_200));
        assert_eq!(config.number.pirate_sentinel, "ARRRGH!");
    }

    #[test]
    fn loss_positions_follow_five_cycle() {
        let text = TextConfig::default();
        let lost: Vec<u64> = (1..=12).filter(|k| text.loses_keystroke(*k)).collect();
        assert_eq!(lost, vec![2, 5, 7, 10, 12]);
        assert!(!text.loses_keystroke(0));
    }

    #[test]
    fn validate_reports_every_problem() {
        let mut config = BehaviorConfig::default();
        config.drag_drop.relocate_every = 0;
        config.text.loss_positions = vec![0, 6];
        config.number.drift_min = 10;
        config.number.drift_max = -10;
        config.number.pirate_sentinel.clear();
        let problems = config.validate();
        assert_eq!(problems.len(), 5, "{problems:?}");
    }

    #[cfg(feature = "config")]
    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = BehaviorConfig::from_toml_str(
            r#"
            [drag_drop]
            relocation_policy = "per_category"

            [checkbox]
            shifty_threshold = 1
            "#,
        )
        .unwrap();
        assert_eq!(config.drag_drop.relocation_policy, RelocationPolicy::PerCategory);
        assert_eq!(config.drag_drop.relocate_every, 3);
        assert_eq!(config.checkbox.shifty_threshold, 1);
        assert_eq!(config.checkbox.toxic_threshold, 2);
        assert_eq!(config.number, NumberConfig::default());
    }

    #[cfg(feature = "config")]
    #[test]
    fn invalid_json_is_rejected_by_validation() {
        let err = BehaviorConfig::from_json_str(r#"{"number": {"shifty_iterations": 0}}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref p) if p.len() == 1));
        assert!(err.to_string().contains("shifty_iterations"));
    }

    #[cfg(feature = "config")]
    #[test]
    fn file_loading_round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("askew.toml");
        let mut config = BehaviorConfig::default();
        config.radio.commit_delay_ms = 250;
        std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();
        assert_eq!(BehaviorConfig::from_toml_file(&path).unwrap(), config);
    }

    #[cfg(feature = "config")]
    #[test]
    fn missing_file_is_io_error() {
        let err = BehaviorConfig::from_json_file("/nonexistent/askew.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
