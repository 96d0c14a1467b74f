//! Error taxonomy.
//!
//! | Error | Cause | Fatal |
//! |-------|-------|-------|
//! | `Configuration` | Malformed or empty input tables, invalid config values | yes |
//! | `UnsatisfiableDomain` | A session has no legal candidate before search | yes |
//! | `SearchExhausted` | Iteration/time budget or root candidates exhausted | no |
//! | `InvariantViolation` | A solved timetable failed hard-constraint certification | yes |
//!
//! Hard constraints are never relaxed automatically. A caller may retry an
//! exhausted search with a larger budget, another seed, or different soft
//! weights.

use thiserror::Error;

use crate::csp::SearchExhausted;
use crate::models::Violation;
use crate::validation::ValidationError;

/// Errors produced while building or solving a timetabling problem.
#[derive(Debug, Error)]
pub enum TimetableError {
    /// Input tables or configuration values are malformed.
    #[error("invalid input ({} problem(s)): {}", .0.len(), first_message(.0))]
    Configuration(Vec<ValidationError>),

    /// A session has an empty domain, so no timetable can exist.
    #[error("session '{session_id}' has no legal (timeslot, room, instructor) candidate")]
    UnsatisfiableDomain {
        /// The first session (in input order) with an empty domain.
        session_id: String,
    },

    /// The search stopped without placing every session.
    #[error(
        "search exhausted ({:?}) after {} iteration(s) with {} session(s) unassigned",
        .0.reason,
        .0.iterations_used,
        .0.unassigned_session_ids.len()
    )]
    SearchExhausted(Box<SearchExhausted>),

    /// A timetable reported as solved violates hard constraints.
    #[error("solved timetable has {} hard violation(s)", .violations.len())]
    InvariantViolation {
        /// The violations found during certification.
        violations: Vec<Violation>,
    },
}

impl TimetableError {
    /// Whether retrying with another budget, seed, or weights can help.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TimetableError::SearchExhausted(_))
    }
}

impl From<Vec<ValidationError>> for TimetableError {
    fn from(errors: Vec<ValidationError>) -> Self {
        TimetableError::Configuration(errors)
    }
}

impl From<ValidationError> for TimetableError {
    fn from(error: ValidationError) -> Self {
        TimetableError::Configuration(vec![error])
    }
}

fn first_message(errors: &[ValidationError]) -> &str {
    errors.first().map(|e| e.message.as_str()).unwrap_or("")
}
