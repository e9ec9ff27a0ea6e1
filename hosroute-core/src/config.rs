//! Preparation settings.
//!
//! [`PrepConfig`] collects every knob the pipeline reads. The defaults
//! describe a single-depot US fleet over one week.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{HosRules, MapNodeId, Minutes};

/// One week, in minutes.
pub const DEFAULT_HORIZON_MINUTES: Minutes = 10_080;

/// Baseline added to every accumulator dimension.
///
/// Restores are negative, so solver dimensions start here instead of at zero
/// and every reading is taken relative to it.
pub const DEFAULT_ACCUMULATOR_BASELINE: Minutes = 1000;

/// Errors from validating or loading a [`PrepConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The break rules are unusable.
    #[error("invalid break rules: {reason}")]
    InvalidRules {
        /// What is wrong with them.
        reason: String,
    },
    /// A numeric setting is out of range.
    #[error("{field} must be {expectation}, got {value}")]
    OutOfRange {
        /// Setting name.
        field: &'static str,
        /// Accepted range, in words.
        expectation: &'static str,
        /// Value supplied.
        value: i64,
    },
    /// The configuration document could not be parsed.
    #[error("malformed configuration: {message}")]
    Malformed {
        /// Parser message.
        message: String,
    },
}

/// Settings for graph construction, augmentation and the solver handoff.
///
/// # Examples
///
/// ```
/// use hosroute_core::PrepConfig;
///
/// let config = PrepConfig {
///     horizon: 4 * 1440,
///     ..PrepConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct PrepConfig {
    /// Planning horizon in minutes.
    pub horizon: Minutes,
    /// Map-space location of the depot.
    pub depot: MapNodeId,
    /// Driving limits and rests.
    pub rules: HosRules,
    /// Model Hours-of-Service breaks at all.
    pub use_breaks: bool,
    /// Most break nodes a single leg may receive.
    pub max_breaks_per_leg: usize,
    /// Vehicles available.
    pub vehicle_count: usize,
    /// Loads a vehicle can carry at once.
    pub vehicle_capacity: i64,
    /// Cost of putting a vehicle on the road.
    pub vehicle_fixed_cost: i64,
    /// Offset for the drive and short-break dimensions.
    pub accumulator_baseline: Minutes,
    /// Penalty for leaving a pickup or dropoff unserved.
    pub demand_drop_penalty: i64,
    /// Penalty for skipping a break node.
    pub break_drop_penalty: i64,
    /// Narrow dropoff windows from the pickup window and leg time.
    pub constrain_dropoff_windows: bool,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON_MINUTES,
            depot: MapNodeId(0),
            rules: HosRules::default(),
            use_breaks: true,
            max_breaks_per_leg: 100,
            vehicle_count: 100,
            vehicle_capacity: 1,
            vehicle_fixed_cost: 1000,
            accumulator_baseline: DEFAULT_ACCUMULATOR_BASELINE,
            demand_drop_penalty: 1_000_000_000,
            break_drop_penalty: 1_000_000,
            constrain_dropoff_windows: false,
        }
    }
}

impl PrepConfig {
    /// Reject settings the pipeline cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRules`] for unusable rules and
    /// [`ConfigError::OutOfRange`] for a non-positive horizon, an empty
    /// fleet, a zero capacity, a zero break limit or a negative baseline.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.use_breaks {
            self.rules.validate()?;
        }
        positive("horizon", self.horizon)?;
        positive("vehicle_capacity", self.vehicle_capacity)?;
        positive("vehicle_count", count(self.vehicle_count))?;
        positive("max_breaks_per_leg", count(self.max_breaks_per_leg))?;
        if self.accumulator_baseline < 0 {
            return Err(ConfigError::OutOfRange {
                field: "accumulator_baseline",
                expectation: "non-negative",
                value: self.accumulator_baseline,
            });
        }
        Ok(())
    }

    /// Parse a JSON document, filling omitted fields from the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Malformed`] when the document does not parse,
    /// or any error from [`Self::validate`].
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|err| ConfigError::Malformed {
            message: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }
}

fn count(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

const fn positive(field: &'static str, value: i64) -> Result<(), ConfigError> {
    if value > 0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            expectation: "positive",
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BreakRule;
    use rstest::rstest;

    #[rstest]
    fn defaults_validate() {
        assert!(PrepConfig::default().validate().is_ok());
    }

    #[rstest]
    #[case(PrepConfig { horizon: 0, ..PrepConfig::default() }, "horizon")]
    #[case(PrepConfig { vehicle_count: 0, ..PrepConfig::default() }, "vehicle_count")]
    #[case(PrepConfig { vehicle_capacity: 0, ..PrepConfig::default() }, "vehicle_capacity")]
    #[case(PrepConfig { max_breaks_per_leg: 0, ..PrepConfig::default() }, "max_breaks_per_leg")]
    #[case(PrepConfig { accumulator_baseline: -1, ..PrepConfig::default() }, "accumulator_baseline")]
    fn out_of_range_settings_are_named(#[case] config: PrepConfig, #[case] expected: &str) {
        match config.validate() {
            Err(ConfigError::OutOfRange { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected OutOfRange for {expected}, got {other:?}"),
        }
    }

    #[rstest]
    fn rules_are_ignored_without_breaks() {
        let config = PrepConfig {
            use_breaks: false,
            rules: HosRules::new(BreakRule::SHORT, BreakRule::LONG),
            ..PrepConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn json_overrides_merge_with_defaults() {
        let config = PrepConfig::from_json_str(r#"{"horizon": 2880, "use_breaks": false}"#)
            .expect("overrides parse");
        assert_eq!(config.horizon, 2880);
        assert!(!config.use_breaks);
        assert_eq!(config.vehicle_count, 100);
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn json_rules_round_out_partial_documents() {
        let config =
            PrepConfig::from_json_str(r#"{"rules": {"long": {"period": 600, "rest": 480}}}"#)
                .expect("partial rules parse");
        assert_eq!(config.rules.long, BreakRule::new(600, 480));
        assert_eq!(config.rules.short, BreakRule::SHORT);
    }

    #[cfg(feature = "serde")]
    #[rstest]
    #[case("{not json")]
    #[case(r#"{"horizon": -5}"#)]
    fn bad_documents_are_rejected(#[case] json: &str) {
        assert!(PrepConfig::from_json_str(json).is_err());
    }
}
