//! Mutable search state of one attempt.
//!
//! Holds the partial assignment, the occupancy index, running workloads,
//! and the live/pruned status of every candidate. Pruning is recorded on
//! an undo trail so that a backtrack restores exactly the candidates its
//! forward check removed, in LIFO order.
//!
//! # Trail discipline
//! Callers take a [`SearchState::trail_mark`] before assigning and call
//! [`SearchState::restore`] with that mark when undoing. Marks must be
//! restored in reverse order of creation.

use crate::csp::constraints::{HardConstraint, OccupancyIndex, WorkloadTracker};
use crate::csp::domain::{Candidate, DomainModel};

/// Per-attempt search state over a [`DomainModel`].
#[derive(Debug, Clone)]
pub struct SearchState {
    assigned: Vec<Option<Candidate>>,
    assigned_count: usize,
    occupancy: OccupancyIndex,
    workload: WorkloadTracker,
    pruned: Vec<Vec<bool>>,
    live: Vec<usize>,
    trail: Vec<(usize, usize)>,
    visit_stamp: Vec<u64>,
    stamp: u64,
}

impl SearchState {
    /// Fresh state: nothing assigned, every initial candidate live.
    pub fn new(model: &DomainModel) -> Self {
        let n = model.num_sessions();
        let pruned = (0..n).map(|s| vec![false; model.domain(s).len()]).collect();
        let live = (0..n).map(|s| model.domain(s).len()).collect();
        Self {
            assigned: vec![None; n],
            assigned_count: 0,
            occupancy: OccupancyIndex::new(model),
            workload: WorkloadTracker::new(model.instructors().len()),
            pruned,
            live,
            trail: Vec::new(),
            visit_stamp: vec![0; n],
            stamp: 0,
        }
    }

    #[inline]
    pub fn is_assigned(&self, session: usize) -> bool {
        self.assigned[session].is_some()
    }

    #[inline]
    pub fn assignment(&self, session: usize) -> Option<Candidate> {
        self.assigned[session]
    }

    #[inline]
    pub fn assigned_count(&self) -> usize {
        self.assigned_count
    }

    /// Whether every session is placed.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.assigned_count == self.assigned.len()
    }

    /// Number of live candidates of a session.
    #[inline]
    pub fn live_count(&self, session: usize) -> usize {
        self.live[session]
    }

    /// Whether candidate `k` of a session has not been pruned.
    #[inline]
    pub fn is_live(&self, session: usize, k: usize) -> bool {
        !self.pruned[session][k]
    }

    /// Live candidates of a session in index order.
    pub fn live_candidates<'a>(
        &'a self,
        model: &'a DomainModel,
        session: usize,
    ) -> impl Iterator<Item = Candidate> + 'a {
        let domain = model.domain(session);
        (0..domain.len())
            .filter(move |&k| !self.pruned[session][k])
            .map(move |k| domain.candidate(k))
    }

    /// Unassigned sessions in input order.
    pub fn unassigned(&self) -> impl Iterator<Item = usize> + '_ {
        self.assigned
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_none())
            .map(|(s, _)| s)
    }

    pub fn workload(&self) -> &WorkloadTracker {
        &self.workload
    }

    /// Checks H1..H4 against the current assignment.
    pub fn check(
        &self,
        model: &DomainModel,
        session: usize,
        candidate: Candidate,
    ) -> Option<HardConstraint> {
        self.occupancy.check(model, session, candidate)
    }

    /// Commits `session` to `candidate`.
    pub fn assign(&mut self, session: usize, candidate: Candidate) {
        debug_assert!(self.assigned[session].is_none());
        self.occupancy.occupy(session, candidate);
        self.workload.add(candidate.instructor);
        self.assigned[session] = Some(candidate);
        self.assigned_count += 1;
    }

    /// Removes the placement of `session`, if any.
    pub fn unassign(&mut self, session: usize) {
        if let Some(candidate) = self.assigned[session].take() {
            self.occupancy.release(candidate);
            self.workload.remove(candidate.instructor);
            self.assigned_count -= 1;
        }
    }

    /// Current trail length, to restore to later.
    #[inline]
    pub fn trail_mark(&self) -> usize {
        self.trail.len()
    }

    /// Revives every candidate pruned since `mark`.
    pub fn restore(&mut self, mark: usize) {
        while self.trail.len() > mark {
            if let Some((session, k)) = self.trail.pop() {
                self.pruned[session][k] = false;
                self.live[session] += 1;
            }
        }
    }

    /// Prunes candidates of unassigned sessions that clash with `session`
    /// placed at `candidate`.
    ///
    /// Only sessions able to use the same room or instructor are visited,
    /// and only their candidate blocks for timeslots overlapping
    /// `candidate.timeslot`. Returns the number of candidates pruned, or
    /// `Err(other)` as soon as `other`'s domain is wiped out. Prunings
    /// made before a wipeout stay on the trail.
    pub fn forward_check(
        &mut self,
        model: &DomainModel,
        session: usize,
        candidate: Candidate,
    ) -> Result<usize, usize> {
        let mut removed = 0;
        for &t in model.overlapping(candidate.timeslot) {
            self.stamp += 1;
            let users = model
                .room_users(candidate.room)
                .iter()
                .chain(model.instructor_users(candidate.instructor));
            for &other in users {
                if other == session
                    || self.assigned[other].is_some()
                    || self.visit_stamp[other] == self.stamp
                {
                    continue;
                }
                self.visit_stamp[other] = self.stamp;

                let domain = model.domain(other);
                for k in domain.block(t) {
                    if self.pruned[other][k] {
                        continue;
                    }
                    let c = domain.candidate(k);
                    if c.room == candidate.room || c.instructor == candidate.instructor {
                        self.pruned[other][k] = true;
                        self.live[other] -= 1;
                        self.trail.push((other, k));
                        removed += 1;
                    }
                }
                if self.live[other] == 0 {
                    return Err(other);
                }
            }
        }
        Ok(removed)
    }

    /// Copy of the current placements, indexed by session.
    pub fn snapshot(&self) -> Vec<Option<Candidate>> {
        self.assigned.clone()
    }
}
