use rand::Rng;

use crate::config::ScheduleSettings;
use crate::error::IntervalIssue;

/// Interval bounds as the user entered them; may be invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalBounds {
    pub min_secs: i64,
    pub max_secs: i64,
}

impl IntervalBounds {
    pub fn new(min_secs: i64, max_secs: i64) -> Self {
        Self { min_secs, max_secs }
    }

    /// Check every rule and report all violations at once.
    pub fn validate(&self, ceiling_secs: u64) -> Result<ValidBounds, Vec<IntervalIssue>> {
        let mut issues = Vec::new();

        if self.min_secs <= 0 {
            issues.push(IntervalIssue::NotPositive { min: self.min_secs });
        }
        if self.min_secs > self.max_secs {
            issues.push(IntervalIssue::MinAboveMax {
                min: self.min_secs,
                max: self.max_secs,
            });
        }
        if i128::from(self.max_secs) > i128::from(ceiling_secs) {
            issues.push(IntervalIssue::AboveCeiling {
                max: self.max_secs,
                ceiling: ceiling_secs,
            });
        }

        if !issues.is_empty() {
            return Err(issues);
        }

        // Both are positive here.
        let to_ms = |secs: i64| (secs as u64).saturating_mul(1000);
        Ok(ValidBounds {
            min_ms: to_ms(self.min_secs),
            max_ms: to_ms(self.max_secs),
        })
    }
}

impl From<&ScheduleSettings> for IntervalBounds {
    fn from(s: &ScheduleSettings) -> Self {
        Self::new(s.min_interval_secs, s.max_interval_secs)
    }
}

/// Bounds that passed validation, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidBounds {
    min_ms: u64,
    max_ms: u64,
}

impl ValidBounds {
    /// Uniform draw in `[min, max]` milliseconds.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        rng.gen_range(self.min_ms..=self.max_ms)
    }
}
