//! Post-hoc validation and quality scoring of timetables.
//!
//! The evaluator never trusts the search: it resolves every placement by
//! ID and recomputes hard violations, the soft breakdown, and reporting
//! KPIs from the model alone.

mod evaluator;
mod kpi;

pub use evaluator::{Evaluation, SolutionEvaluator};
pub use kpi::{RoomUsage, TimetableKpi};
