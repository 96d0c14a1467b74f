//! Solver and soft-constraint configuration.
//!
//! Configuration is an explicit value passed into `build` and `solve`;
//! there is no process-wide solver state. Loading these values from a
//! file is left to the caller (all types are `serde`-serializable).

use serde::{Deserialize, Serialize};

use crate::models::ClockTime;
use crate::validation::{ValidationError, ValidationErrorKind};

/// Longest accepted wall-clock budget (one hour).
pub const MAX_TIME_LIMIT_MS: u64 = 3_600_000;

/// Weights of the soft constraints in the total soft score.
///
/// Total = `preference`·S1 + `undesirable_time`·S2 + `workload`·S3,
/// lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoftWeights {
    /// Weight per instructor-preference mismatch (S1).
    pub preference: f64,
    /// Weight per session in an undesirable slot (S2).
    pub undesirable_time: f64,
    /// Weight of the per-instructor workload variance (S3).
    pub workload: f64,
}

impl Default for SoftWeights {
    fn default() -> Self {
        Self {
            preference: 1.0,
            undesirable_time: 1.0,
            workload: 1.0,
        }
    }
}

impl SoftWeights {
    /// Creates a weight set.
    pub fn new(preference: f64, undesirable_time: f64, workload: f64) -> Self {
        Self {
            preference,
            undesirable_time,
            workload,
        }
    }
}

/// Soft-constraint settings: weights plus the clock cutoffs that define
/// "morning", "afternoon", and undesirable start times.
///
/// # Examples
///
/// ```
/// use u_timetable::config::{SoftConstraintConfig, SoftWeights};
/// use u_timetable::models::ClockTime;
///
/// let soft = SoftConstraintConfig::default()
///     .with_weights(SoftWeights::new(2.0, 1.0, 0.5))
///     .with_late_cutoff(ClockTime::hm(16, 0));
/// assert!(soft.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftConstraintConfig {
    /// Soft-constraint weights.
    pub weights: SoftWeights,
    /// Slots starting before this time are undesirable.
    pub early_cutoff: ClockTime,
    /// Slots starting at or after this time are undesirable.
    pub late_cutoff: ClockTime,
    /// Boundary between morning and afternoon for instructor preferences.
    pub midday: ClockTime,
}

impl Default for SoftConstraintConfig {
    fn default() -> Self {
        Self {
            weights: SoftWeights::default(),
            early_cutoff: ClockTime::hm(10, 0),
            late_cutoff: ClockTime::hm(15, 0),
            midday: ClockTime::hm(12, 0),
        }
    }
}

impl SoftConstraintConfig {
    pub fn with_weights(mut self, weights: SoftWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_early_cutoff(mut self, cutoff: ClockTime) -> Self {
        self.early_cutoff = cutoff;
        self
    }

    pub fn with_late_cutoff(mut self, cutoff: ClockTime) -> Self {
        self.late_cutoff = cutoff;
        self
    }

    pub fn with_midday(mut self, midday: ClockTime) -> Self {
        self.midday = midday;
        self
    }

    /// Checks that weights are finite and non-negative, that every cutoff
    /// lies within one day, and that the early cutoff precedes the late one.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        let w = &self.weights;
        for (name, value) in [
            ("preference", w.preference),
            ("undesirable_time", w.undesirable_time),
            ("workload", w.workload),
        ] {
            if !value.is_finite() || value < 0.0 {
                errors.push(invalid(format!(
                    "Soft weight '{name}' must be finite and non-negative, got {value}"
                )));
            }
        }
        for (name, time) in [
            ("early_cutoff", self.early_cutoff),
            ("late_cutoff", self.late_cutoff),
            ("midday", self.midday),
        ] {
            if !time.is_valid() {
                errors.push(invalid(format!(
                    "'{name}' must be at most 23:59, got {} minutes",
                    time.minutes()
                )));
            }
        }
        if self.early_cutoff >= self.late_cutoff {
            errors.push(invalid(format!(
                "Early cutoff {} must precede late cutoff {}",
                self.early_cutoff, self.late_cutoff
            )));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Configuration for the backtracking search.
///
/// # Examples
///
/// ```
/// use u_timetable::config::SolverConfig;
///
/// let config = SolverConfig::default()
///     .with_max_iterations(20_000)
///     .with_time_limit_ms(5_000)
///     .with_seed(7)
///     .with_randomization_factor(0.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Maximum number of TRY steps per attempt. Must be positive.
    pub max_iterations: u64,
    /// Wall-clock budget per attempt in milliseconds. 0 = no limit.
    pub time_limit_ms: u64,
    /// Random seed for value-order perturbation.
    pub seed: u64,
    /// Value-order perturbation in [0, 1]. 0 = deterministic, 1 = uniform shuffle.
    pub randomization_factor: f64,
    /// Prune neighbouring domains after each assignment.
    pub forward_checking: bool,
    /// Independent attempts for `solve_best_of` (seeds `seed`, `seed + 1`, ...).
    pub attempts: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 5_000,
            time_limit_ms: 300_000,
            seed: 42,
            randomization_factor: 0.1,
            forward_checking: true,
            attempts: 1,
        }
    }
}

impl SolverConfig {
    pub fn with_max_iterations(mut self, n: u64) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_randomization_factor(mut self, factor: f64) -> Self {
        self.randomization_factor = factor;
        self
    }

    pub fn with_forward_checking(mut self, enabled: bool) -> Self {
        self.forward_checking = enabled;
        self
    }

    pub fn with_attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts;
        self
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if self.max_iterations == 0 {
            errors.push(invalid("max_iterations must be positive"));
        }
        if self.time_limit_ms > MAX_TIME_LIMIT_MS {
            errors.push(invalid(format!(
                "time_limit_ms must be at most {MAX_TIME_LIMIT_MS}, got {}",
                self.time_limit_ms
            )));
        }
        if !(0.0..=1.0).contains(&self.randomization_factor) {
            errors.push(invalid(format!(
                "randomization_factor must be in [0, 1], got {}",
                self.randomization_factor
            )));
        }
        if self.attempts == 0 {
            errors.push(invalid("attempts must be at least 1"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn invalid(message: impl Into<String>) -> ValidationError {
    ValidationError::new(ValidationErrorKind::InvalidConfig, message)
}
