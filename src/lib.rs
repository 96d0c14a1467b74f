//! Course timetabling as constraint satisfaction.
//!
//! Assigns class sessions to (timeslot, room, instructor) triples so that
//! no instructor or room is double-booked and every room fits its session,
//! while keeping soft penalties (instructor preferences, undesirable
//! times, workload imbalance) low.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Session`, `Room`, `Timeslot`, `Instructor`,
//!   `Timetable`, `Assignment`, `Violation`
//! - **`validation`**: Input integrity checks (empty tables, duplicate IDs, time ranges)
//! - **`config`**: `SolverConfig` budgets and `SoftConstraintConfig` weights
//! - **`csp`**: Domain building, constraint checks, MRV ordering, backtracking search
//! - **`evaluation`**: Independent hard/soft re-scoring and reporting KPIs
//! - **`error`**: `TimetableError` taxonomy
//!
//! # Example
//!
//! ```
//! use u_timetable::config::{SoftConstraintConfig, SolverConfig};
//! use u_timetable::models::*;
//!
//! let sessions = vec![
//!     Session::new("CS101-L", "CS101", DeliveryType::Lecture).with_enrolled(28),
//!     Session::new("CS101-P", "CS101", DeliveryType::Lab).with_enrolled(18),
//! ];
//! let rooms = vec![Room::classroom("R1", 30), Room::lab("L1", 20)];
//! let timeslots = vec![
//!     Timeslot::new("MON-1", Weekday::Monday, ClockTime::hm(10, 0), ClockTime::hm(11, 30)),
//!     Timeslot::new("MON-2", Weekday::Monday, ClockTime::hm(13, 0), ClockTime::hm(14, 30)),
//! ];
//! let instructors = vec![Instructor::new("I1").with_qualification("CS101")];
//!
//! let model = u_timetable::build(
//!     sessions,
//!     rooms,
//!     timeslots,
//!     instructors,
//!     SoftConstraintConfig::default(),
//! )
//! .unwrap();
//! let solution = u_timetable::solve(&model, &SolverConfig::default())
//!     .unwrap()
//!     .into_result()
//!     .unwrap();
//! assert_eq!(solution.timetable.len(), 2);
//! assert_eq!(solution.hard_violations, 0);
//! ```
//!
//! # References
//!
//! - Russell & Norvig (2021), "Artificial Intelligence: A Modern Approach", Ch. 6
//! - Haralick & Elliott (1980), "Increasing tree search efficiency for
//!   constraint satisfaction problems"
//! - Schaerf (1999), "A Survey of Automated Timetabling"

pub mod config;
pub mod csp;
pub mod error;
pub mod evaluation;
pub mod models;
pub mod validation;

pub use config::{SoftConstraintConfig, SoftWeights, SolverConfig};
pub use csp::{BacktrackingSolver, DomainModel, SearchExhausted, Solution, SolveOutcome};
pub use error::TimetableError;

use models::{Instructor, Room, Session, Timeslot};

/// Builds the frozen problem model.
///
/// # Errors
/// - `Configuration` for malformed tables or soft settings
/// - `UnsatisfiableDomain` if a session has no legal candidate
pub fn build(
    sessions: Vec<Session>,
    rooms: Vec<Room>,
    timeslots: Vec<Timeslot>,
    instructors: Vec<Instructor>,
    soft: SoftConstraintConfig,
) -> Result<DomainModel, TimetableError> {
    DomainModel::build(sessions, rooms, timeslots, instructors, soft)
}

/// Solves `model` with the default heuristics, running `config.attempts`
/// independent attempts (one by default).
///
/// An exhausted search is returned as `Ok(SolveOutcome::Exhausted(..))`;
/// use [`SolveOutcome::into_result`] to treat it as an error.
pub fn solve(model: &DomainModel, config: &SolverConfig) -> Result<SolveOutcome, TimetableError> {
    BacktrackingSolver::new(config.clone()).solve_best_of(model)
}
