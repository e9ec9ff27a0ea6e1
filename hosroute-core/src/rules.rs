//! Hours-of-Service break rules and the leg arithmetic built on them.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Minutes;
use crate::config::ConfigError;

/// A driving limit and the rest that resets it.
///
/// `period` is how long a driver may accumulate before the rest becomes
/// mandatory and `rest` is how long the stop lasts.
///
/// # Examples
///
/// ```
/// use hosroute_core::BreakRule;
///
/// assert_eq!(BreakRule::LONG.restore_delta(), -660);
/// assert_eq!(BreakRule::SHORT.split(700), (480, 220));
/// assert_eq!(BreakRule::LONG.stints(1450), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BreakRule {
    /// Minutes of driving allowed before the rest is due.
    pub period: Minutes,
    /// Minutes spent resting.
    pub rest: Minutes,
}

impl BreakRule {
    /// Eleven hours of driving, then ten hours off.
    pub const LONG: Self = Self::new(660, 600);
    /// Eight hours of driving, then a thirty-minute break.
    pub const SHORT: Self = Self::new(480, 30);

    /// Construct a rule.
    #[must_use]
    pub const fn new(period: Minutes, rest: Minutes) -> Self {
        Self { period, rest }
    }

    /// Change applied to the matching accumulator once the rest is taken.
    #[must_use]
    pub const fn restore_delta(self) -> Minutes {
        -self.period
    }

    /// Split `segment` at this rule's period.
    ///
    /// The first part is capped at the period and the second is whatever is
    /// left, so the two always sum to `segment`.
    #[must_use]
    pub const fn split(self, segment: Minutes) -> (Minutes, Minutes) {
        let before = if segment < self.period {
            segment
        } else {
            self.period
        };
        (before, segment - before)
    }

    /// Number of driving stints of at most one period needed to cover `drive`.
    ///
    /// Non-positive drives need no stints.
    #[must_use]
    pub const fn stints(self, drive: Minutes) -> Minutes {
        if drive <= 0 || self.period <= 0 {
            return 0;
        }
        let whole = drive.div_euclid(self.period);
        if drive.rem_euclid(self.period) == 0 {
            whole
        } else {
            whole + 1
        }
    }

    /// Number of times the full period fits in `drive`.
    #[must_use]
    pub const fn whole_periods(self, drive: Minutes) -> Minutes {
        if drive <= 0 || self.period <= 0 {
            return 0;
        }
        drive.div_euclid(self.period)
    }
}

/// Which of the two rules a break satisfies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BreakKind {
    /// Thirty-minute break against the eight-hour limit.
    Short,
    /// Ten-hour rest against the eleven-hour limit.
    Long,
}

impl BreakKind {
    /// The kind that must follow this one in a chain.
    #[must_use]
    pub const fn alternate(self) -> Self {
        match self {
            Self::Short => Self::Long,
            Self::Long => Self::Short,
        }
    }
}

/// The long and short rules applied together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct HosRules {
    /// The daily driving limit.
    pub long: BreakRule,
    /// The rolling limit between short breaks.
    pub short: BreakRule,
}

impl HosRules {
    /// Pair two rules without validating them.
    #[must_use]
    pub const fn new(long: BreakRule, short: BreakRule) -> Self {
        Self { long, short }
    }

    /// The rule for `kind`.
    #[must_use]
    pub const fn rule(&self, kind: BreakKind) -> BreakRule {
        match kind {
            BreakKind::Short => self.short,
            BreakKind::Long => self.long,
        }
    }

    /// Short-accumulator credit granted by a long break.
    ///
    /// A long rest is always preceded by a short one in a chain, so it only
    /// credits the part of the long period the short rule has not already
    /// restored. This is an approximation, exact only when the short period
    /// divides the long period once.
    #[must_use]
    pub const fn long_break_short_credit(&self) -> Minutes {
        -(self.long.period - self.short.period)
    }

    /// Worst-case rest minutes a driver needs to cover `drive`.
    ///
    /// Every full long period is followed by a long rest paired with a short
    /// break, and the remainder needs one more short break when it runs past
    /// the short period. A drive of exactly one long period already needs
    /// both, since a clock may not reach its period between breaks.
    ///
    /// # Examples
    ///
    /// ```
    /// use hosroute_core::HosRules;
    ///
    /// let rules = HosRules::default();
    /// assert_eq!(rules.estimate_rest(300), 0);
    /// assert_eq!(rules.estimate_rest(500), 30);
    /// assert_eq!(rules.estimate_rest(660), 600 + 30);
    /// assert_eq!(rules.estimate_rest(1450), 2 * 600 + 2 * 30);
    /// ```
    #[must_use]
    pub const fn estimate_rest(&self, drive: Minutes) -> Minutes {
        let long_count = self.long.whole_periods(drive);
        let remainder = drive - long_count * self.long.period;
        let short_count = if remainder > self.short.period {
            long_count + 1
        } else {
            long_count
        };
        long_count * self.long.rest + short_count * self.short.rest
    }

    /// Check the rules describe a usable pair.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRules`] when a period or rest is not
    /// positive, or when the long rule does not dominate the short one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Self { long, short } = self;
        if short.period <= 0 || short.rest <= 0 {
            return Err(ConfigError::InvalidRules {
                reason: "short period and rest must be positive".to_owned(),
            });
        }
        if long.period <= short.period {
            return Err(ConfigError::InvalidRules {
                reason: format!(
                    "long period {} must exceed short period {}",
                    long.period, short.period
                ),
            });
        }
        if long.rest <= short.rest {
            return Err(ConfigError::InvalidRules {
                reason: format!(
                    "long rest {} must exceed short rest {}",
                    long.rest, short.rest
                ),
            });
        }
        Ok(())
    }
}

impl Default for HosRules {
    fn default() -> Self {
        Self::new(BreakRule::LONG, BreakRule::SHORT)
    }
}
