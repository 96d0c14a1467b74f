//! Search outcomes and statistics.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::csp::constraints::SoftScore;
use crate::csp::domain::{Candidate, DomainModel};
use crate::error::TimetableError;
use crate::models::{Assignment, Timetable};

/// Counters collected during one search attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// TRY steps taken.
    pub iterations: u64,
    /// Candidates committed.
    pub assignments: u64,
    /// Frames popped after exhausting their candidates.
    pub backtracks: u64,
    /// Candidates removed by forward checking.
    pub pruned: u64,
    /// Forward checks that emptied a domain.
    pub wipeouts: u64,
    /// Deepest number of simultaneously assigned sessions.
    pub max_depth: u64,
    /// Wall-clock time of the attempt.
    pub elapsed: Duration,
}

impl SearchStats {
    #[inline]
    pub fn on_iteration(&mut self) {
        self.iterations = self.iterations.saturating_add(1);
    }

    #[inline]
    pub fn on_assignment(&mut self, depth: usize) {
        self.assignments = self.assignments.saturating_add(1);
        self.max_depth = self.max_depth.max(depth as u64);
    }

    #[inline]
    pub fn on_backtrack(&mut self) {
        self.backtracks = self.backtracks.saturating_add(1);
    }

    #[inline]
    pub fn on_pruned(&mut self, count: usize) {
        self.pruned = self.pruned.saturating_add(count as u64);
    }

    #[inline]
    pub fn on_wipeout(&mut self) {
        self.wipeouts = self.wipeouts.saturating_add(1);
    }
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Search statistics:")?;
        writeln!(f, "  Iterations:   {}", self.iterations)?;
        writeln!(f, "  Assignments:  {}", self.assignments)?;
        writeln!(f, "  Backtracks:   {}", self.backtracks)?;
        writeln!(f, "  Pruned:       {}", self.pruned)?;
        writeln!(f, "  Wipeouts:     {}", self.wipeouts)?;
        writeln!(f, "  Max depth:    {}", self.max_depth)?;
        writeln!(f, "  Elapsed:      {:.2?}", self.elapsed)?;
        Ok(())
    }
}

/// Why a search stopped without a complete timetable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminationReason {
    /// Every candidate of the first session was tried.
    RootExhausted,
    /// The iteration budget ran out.
    IterationLimit,
    /// The wall-clock budget ran out.
    TimeLimit,
}

/// A complete timetable with zero hard violations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// Every session's placement.
    pub timetable: Timetable,
    /// Always 0; certified by the evaluator before a solution is returned.
    pub hard_violations: usize,
    /// Soft-score breakdown.
    pub soft_score: SoftScore,
    /// TRY steps used by the attempt that produced this solution.
    pub iterations_used: u64,
    /// Wall-clock time of that attempt.
    pub elapsed_seconds: f64,
    /// Seed of that attempt.
    pub seed: u64,
    /// Search counters of that attempt.
    pub stats: SearchStats,
}

/// A search that stopped before placing every session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchExhausted {
    /// Deepest consistent partial timetable reached.
    pub partial: Timetable,
    /// Sessions missing from `partial`, in input order.
    pub unassigned_session_ids: Vec<String>,
    pub reason: TerminationReason,
    pub iterations_used: u64,
    pub elapsed_seconds: f64,
    pub seed: u64,
    pub stats: SearchStats,
}

/// Result of a solve call that did not fail on input or invariants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SolveOutcome {
    Solved(Solution),
    Exhausted(SearchExhausted),
}

impl SolveOutcome {
    pub fn is_solved(&self) -> bool {
        matches!(self, SolveOutcome::Solved(_))
    }

    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SolveOutcome::Solved(solution) => Some(solution),
            SolveOutcome::Exhausted(_) => None,
        }
    }

    pub fn exhausted(&self) -> Option<&SearchExhausted> {
        match self {
            SolveOutcome::Solved(_) => None,
            SolveOutcome::Exhausted(exhausted) => Some(exhausted),
        }
    }

    /// Search counters of the attempt behind this outcome.
    pub fn stats(&self) -> &SearchStats {
        match self {
            SolveOutcome::Solved(solution) => &solution.stats,
            SolveOutcome::Exhausted(exhausted) => &exhausted.stats,
        }
    }

    /// Converts an exhausted search into [`TimetableError::SearchExhausted`].
    pub fn into_result(self) -> Result<Solution, TimetableError> {
        match self {
            SolveOutcome::Solved(solution) => Ok(solution),
            SolveOutcome::Exhausted(exhausted) => {
                Err(TimetableError::SearchExhausted(Box::new(exhausted)))
            }
        }
    }
}

/// Converts index placements into an id-keyed timetable.
pub(crate) fn to_timetable(model: &DomainModel, placements: &[Option<Candidate>]) -> Timetable {
    placements
        .iter()
        .enumerate()
        .filter_map(|(s, c)| c.map(|c| (s, c)))
        .map(|(s, c)| {
            Assignment::new(
                model.sessions()[s].id.as_str(),
                model.timeslots()[c.timeslot].id.as_str(),
                model.rooms()[c.room].id.as_str(),
                model.instructors()[c.instructor].id.as_str(),
            )
        })
        .collect()
}
