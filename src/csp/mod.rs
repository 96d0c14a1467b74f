//! Constraint-satisfaction core.
//!
//! # Components
//!
//! | Module | Role |
//! |--------|------|
//! | `domain` | Initial candidate sets and static indexes |
//! | `constraints` | Hard checks (H1..H4) and soft penalties (S1..S3) |
//! | `ordering` | Variable selection (MRV + degree) and value ordering |
//! | `state` | Per-attempt assignment, live domains, undo trail |
//! | `engine` | Frame-stack backtracking with forward checking |
//! | `result` | Solutions, exhausted searches, statistics |

mod constraints;
mod domain;
mod engine;
mod ordering;
mod result;
mod state;

pub use constraints::{
    candidate_penalty, preference_violated, undesirable_time, workload_variance, HardConstraint,
    OccupancyIndex, SoftScore, WorkloadTracker,
};
pub use domain::{Candidate, DomainModel, SessionDomain};
pub use engine::BacktrackingSolver;
pub use ordering::{
    InputOrder, MostConstrained, PenaltyOrdering, ScoredCandidate, ValueOrdering,
    VariableSelector,
};
pub use result::{SearchExhausted, SearchStats, Solution, SolveOutcome, TerminationReason};
pub use state::SearchState;
