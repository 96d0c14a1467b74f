//! Backtracking search with forward checking.
//!
//! # State machine
//! ```text
//! SELECT ──▶ TRY ──▶ hard check ──pass──▶ ASSIGN + FORWARD-CHECK ──ok──▶ SELECT
//!             ▲          │fail                        │wipeout
//!             └──────────┴────────────────────────────┘
//!  TRY with no candidates left ──▶ BACKTRACK (pop frame, undo parent) ──▶ TRY
//! ```
//! Recursion is replaced by an explicit stack of [`Frame`]s, one per
//! assigned (or being-assigned) session. Each frame owns its ordered
//! candidate list, the index of the next untried candidate, and the trail
//! mark to restore when its current placement is undone.
//!
//! Terminal states are SOLVED (all sessions placed, certified by the
//! evaluator) and FAILED (root exhausted or budget exceeded). A failed
//! attempt reports the deepest partial timetable it reached.
//!
//! # Budgets
//! Every TRY counts one iteration. The engine stops before a TRY that
//! would exceed `max_iterations`, and when the elapsed time reaches
//! `time_limit_ms` (0 = no limit); both are checked at every TRY.
//!
//! # Reference
//! Russell & Norvig (2021), "Artificial Intelligence: A Modern Approach",
//! Ch. 6.3 (Backtracking Search for CSPs)

use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::SolverConfig;
use crate::csp::constraints::candidate_penalty;
use crate::csp::domain::{Candidate, DomainModel};
use crate::csp::ordering::{
    MostConstrained, PenaltyOrdering, ScoredCandidate, ValueOrdering, VariableSelector,
};
use crate::csp::result::{
    to_timetable, SearchExhausted, SearchStats, Solution, SolveOutcome, TerminationReason,
};
use crate::csp::state::SearchState;
use crate::error::TimetableError;
use crate::evaluation::SolutionEvaluator;

/// One level of the search stack.
#[derive(Debug, Clone)]
struct Frame {
    session: usize,
    ordered: Vec<Candidate>,
    next: usize,
    trail_mark: usize,
    placed: bool,
}

impl Frame {
    fn new(session: usize, ordered: Vec<Candidate>, trail_mark: usize) -> Self {
        Self {
            session,
            ordered,
            next: 0,
            trail_mark,
            placed: false,
        }
    }
}

/// Depth-first backtracking solver.
///
/// # Examples
///
/// ```
/// use u_timetable::config::{SoftConstraintConfig, SolverConfig};
/// use u_timetable::csp::{BacktrackingSolver, DomainModel};
/// use u_timetable::models::*;
///
/// let model = DomainModel::build(
///     vec![Session::new("S1", "CS101", DeliveryType::Lecture).with_enrolled(25)],
///     vec![Room::classroom("R1", 30)],
///     vec![Timeslot::new("T1", Weekday::Monday, ClockTime::hm(10, 0), ClockTime::hm(11, 30))],
///     vec![Instructor::new("I1").with_qualification("CS101")],
///     SoftConstraintConfig::default(),
/// )
/// .unwrap();
///
/// let outcome = BacktrackingSolver::new(SolverConfig::default()).solve(&model).unwrap();
/// let solution = outcome.into_result().unwrap();
/// assert_eq!(solution.timetable.len(), 1);
/// assert_eq!(solution.hard_violations, 0);
/// ```
#[derive(Debug, Clone)]
pub struct BacktrackingSolver {
    config: SolverConfig,
    selector: Arc<dyn VariableSelector>,
    ordering: Option<Arc<dyn ValueOrdering>>,
}

impl BacktrackingSolver {
    /// Creates a solver with MRV selection and penalty-based value ordering.
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            selector: Arc::new(MostConstrained),
            ordering: None,
        }
    }

    /// Replaces the variable selector.
    pub fn with_selector<V: VariableSelector + 'static>(mut self, selector: V) -> Self {
        self.selector = Arc::new(selector);
        self
    }

    /// Replaces the value ordering. By default a [`PenaltyOrdering`] with
    /// the configured randomization factor is used.
    pub fn with_value_ordering<O: ValueOrdering + 'static>(mut self, ordering: O) -> Self {
        self.ordering = Some(Arc::new(ordering));
        self
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Runs one attempt with `config.seed`.
    ///
    /// # Errors
    /// - `Configuration` if the solver config is invalid
    /// - `InvariantViolation` if a complete timetable fails certification
    pub fn solve(&self, model: &DomainModel) -> Result<SolveOutcome, TimetableError> {
        self.config.validate()?;
        self.attempt(model, self.config.seed)
    }

    /// Runs `config.attempts` independent attempts with seeds `seed`,
    /// `seed + 1`, ... and keeps the best outcome.
    ///
    /// A solved attempt beats any exhausted one; among solved attempts the
    /// lowest soft total wins, among exhausted ones the deepest partial.
    /// Ties keep the earlier attempt.
    pub fn solve_best_of(&self, model: &DomainModel) -> Result<SolveOutcome, TimetableError> {
        self.config.validate()?;

        let mut best = self.attempt(model, self.config.seed)?;
        for k in 1..self.config.attempts {
            let seed = self.config.seed.wrapping_add(k as u64);
            debug!(
                "restart {}/{} with seed {}",
                k + 1,
                self.config.attempts,
                seed
            );
            let outcome = self.attempt(model, seed)?;
            if is_better(&outcome, &best) {
                best = outcome;
            }
        }
        Ok(best)
    }

    fn attempt(&self, model: &DomainModel, seed: u64) -> Result<SolveOutcome, TimetableError> {
        let start = Instant::now();
        let time_limit =
            (self.config.time_limit_ms > 0).then(|| Duration::from_millis(self.config.time_limit_ms));
        let ordering: Arc<dyn ValueOrdering> = match &self.ordering {
            Some(ordering) => Arc::clone(ordering),
            None => Arc::new(PenaltyOrdering::new(self.config.randomization_factor)),
        };

        info!(
            "solving {} sessions ({} / {}, seed {}, max {} iterations)",
            model.num_sessions(),
            self.selector.name(),
            ordering.name(),
            seed,
            self.config.max_iterations
        );

        let mut rng = StdRng::seed_from_u64(seed);
        let mut state = SearchState::new(model);
        let mut stats = SearchStats::default();
        let mut frames: Vec<Frame> = Vec::with_capacity(model.num_sessions());
        let mut best = state.snapshot();
        let mut best_depth = 0;

        let stop = 'search: loop {
            // SELECT
            let Some(session) = self.selector.select(model, &state) else {
                break 'search None;
            };
            let ordered = ordered_candidates(model, &state, session, ordering.as_ref(), &mut rng);
            frames.push(Frame::new(session, ordered, state.trail_mark()));

            loop {
                let Some(frame) = frames.last_mut() else {
                    break 'search Some(TerminationReason::RootExhausted);
                };

                if frame.placed {
                    state.restore(frame.trail_mark);
                    state.unassign(frame.session);
                    frame.placed = false;
                }

                // BACKTRACK
                let Some(&candidate) = frame.ordered.get(frame.next) else {
                    let exhausted = frame.session;
                    frames.pop();
                    stats.on_backtrack();
                    trace!(
                        "backtrack: session {} exhausted at depth {}",
                        model.sessions()[exhausted].id,
                        frames.len()
                    );
                    continue;
                };

                // TRY
                if stats.iterations >= self.config.max_iterations {
                    break 'search Some(TerminationReason::IterationLimit);
                }
                if time_limit.is_some_and(|limit| start.elapsed() >= limit) {
                    break 'search Some(TerminationReason::TimeLimit);
                }
                stats.on_iteration();
                frame.next += 1;

                if state.check(model, frame.session, candidate).is_some() {
                    continue;
                }

                // ASSIGN
                state.assign(frame.session, candidate);
                frame.placed = true;
                let depth = state.assigned_count();
                stats.on_assignment(depth);
                if depth > best_depth {
                    best_depth = depth;
                    best = state.snapshot();
                }

                // FORWARD-CHECK
                if self.config.forward_checking {
                    match state.forward_check(model, frame.session, candidate) {
                        Ok(removed) => stats.on_pruned(removed),
                        Err(wiped) => {
                            stats.on_wipeout();
                            trace!(
                                "wipeout: placing {} empties {}",
                                model.sessions()[frame.session].id,
                                model.sessions()[wiped].id
                            );
                            continue;
                        }
                    }
                }

                continue 'search;
            }
        };

        stats.elapsed = start.elapsed();
        let elapsed_seconds = stats.elapsed.as_secs_f64();

        let Some(reason) = stop else {
            let timetable = to_timetable(model, &state.snapshot());
            let evaluation = SolutionEvaluator::certify(model, &timetable)?;
            info!(
                "solved {} sessions in {} iterations ({:.3}s), soft score {:.3}",
                timetable.len(),
                stats.iterations,
                elapsed_seconds,
                evaluation.soft.total
            );
            return Ok(SolveOutcome::Solved(Solution {
                timetable,
                hard_violations: 0,
                soft_score: evaluation.soft,
                iterations_used: stats.iterations,
                elapsed_seconds,
                seed,
                stats,
            }));
        };

        let unassigned_session_ids: Vec<String> = model
            .sessions()
            .iter()
            .zip(&best)
            .filter(|(_, placed)| placed.is_none())
            .map(|(s, _)| s.id.clone())
            .collect();

        match reason {
            TerminationReason::RootExhausted => info!(
                "search exhausted after {} iterations, {} session(s) unassigned",
                stats.iterations,
                unassigned_session_ids.len()
            ),
            _ => debug!(
                "budget exceeded ({:?}) after {} iterations, best depth {}/{}",
                reason,
                stats.iterations,
                best_depth,
                model.num_sessions()
            ),
        }

        Ok(SolveOutcome::Exhausted(SearchExhausted {
            partial: to_timetable(model, &best),
            unassigned_session_ids,
            reason,
            iterations_used: stats.iterations,
            elapsed_seconds,
            seed,
            stats,
        }))
    }
}

/// Live candidates of `session`, scored against the current workload and
/// ordered by `ordering`.
fn ordered_candidates(
    model: &DomainModel,
    state: &SearchState,
    session: usize,
    ordering: &dyn ValueOrdering,
    rng: &mut StdRng,
) -> Vec<Candidate> {
    let scored = state
        .live_candidates(model, session)
        .map(|c| ScoredCandidate::new(c, candidate_penalty(model, state.workload(), c)))
        .collect();
    ordering.order(scored, rng)
}

fn is_better(challenger: &SolveOutcome, incumbent: &SolveOutcome) -> bool {
    match (challenger, incumbent) {
        (SolveOutcome::Solved(c), SolveOutcome::Solved(i)) => c.soft_score.total < i.soft_score.total,
        (SolveOutcome::Solved(_), SolveOutcome::Exhausted(_)) => true,
        (SolveOutcome::Exhausted(_), SolveOutcome::Solved(_)) => false,
        (SolveOutcome::Exhausted(c), SolveOutcome::Exhausted(i)) => c.partial.len() > i.partial.len(),
    }
}
