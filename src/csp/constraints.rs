//! Constraint Engine.
//!
//! Hard constraints are checked against an [`OccupancyIndex`] of the
//! current partial assignment; soft constraints only produce penalties.
//!
//! | Code | Kind | Rule |
//! |------|------|------|
//! | H1 | hard | an instructor teaches one session at a time |
//! | H2 | hard | a room hosts one session at a time |
//! | H3 | hard | room capacity ≥ enrolment |
//! | H4 | hard | room type matches delivery type |
//! | S1 | soft | instructor preference honoured |
//! | S2 | soft | no start before the early or at/after the late cutoff |
//! | S3 | soft | balanced instructor workload (variance) |

use serde::{Deserialize, Serialize};

use crate::config::{SoftConstraintConfig, SoftWeights};
use crate::csp::domain::{Candidate, DomainModel};
use crate::models::{Preference, Timeslot, Weekday};

/// A violated hard constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HardConstraint {
    /// H1: the instructor already teaches in an overlapping slot.
    InstructorConflict,
    /// H2: the room is already used in an overlapping slot.
    RoomConflict,
    /// H3: the room is too small.
    Capacity,
    /// H4: the room type does not match the delivery type.
    RoomType,
}

/// Which session occupies each (timeslot, room) and (timeslot, instructor).
///
/// Dense grids sized `timeslots × rooms` and `timeslots × instructors`.
#[derive(Debug, Clone)]
pub struct OccupancyIndex {
    num_rooms: usize,
    num_instructors: usize,
    rooms: Vec<Option<usize>>,
    instructors: Vec<Option<usize>>,
}

impl OccupancyIndex {
    /// Creates an empty index for the model's tables.
    pub fn new(model: &DomainModel) -> Self {
        let num_timeslots = model.timeslots().len();
        let num_rooms = model.rooms().len();
        let num_instructors = model.instructors().len();
        Self {
            num_rooms,
            num_instructors,
            rooms: vec![None; num_timeslots * num_rooms],
            instructors: vec![None; num_timeslots * num_instructors],
        }
    }

    /// Session holding `room` in exactly `timeslot`.
    #[inline]
    pub fn room_occupant(&self, timeslot: usize, room: usize) -> Option<usize> {
        self.rooms[timeslot * self.num_rooms + room]
    }

    /// Session taught by `instructor` in exactly `timeslot`.
    #[inline]
    pub fn instructor_occupant(&self, timeslot: usize, instructor: usize) -> Option<usize> {
        self.instructors[timeslot * self.num_instructors + instructor]
    }

    /// Records `session` at `candidate`.
    pub fn occupy(&mut self, session: usize, candidate: Candidate) {
        self.rooms[candidate.timeslot * self.num_rooms + candidate.room] = Some(session);
        self.instructors[candidate.timeslot * self.num_instructors + candidate.instructor] =
            Some(session);
    }

    /// Records `session` only in the cells of `candidate` that are free.
    pub fn occupy_free(&mut self, session: usize, candidate: Candidate) {
        let room = &mut self.rooms[candidate.timeslot * self.num_rooms + candidate.room];
        room.get_or_insert(session);
        let instructor =
            &mut self.instructors[candidate.timeslot * self.num_instructors + candidate.instructor];
        instructor.get_or_insert(session);
    }

    /// Clears the cells of `candidate`.
    pub fn release(&mut self, candidate: Candidate) {
        self.rooms[candidate.timeslot * self.num_rooms + candidate.room] = None;
        self.instructors[candidate.timeslot * self.num_instructors + candidate.instructor] = None;
    }

    /// Checks H1..H4 for placing `session` at `candidate`.
    ///
    /// Returns the first violated constraint in H1, H2, H3, H4 order. An
    /// occupant equal to `session` itself is not a conflict.
    pub fn check(
        &self,
        model: &DomainModel,
        session: usize,
        candidate: Candidate,
    ) -> Option<HardConstraint> {
        let overlapping = model.overlapping(candidate.timeslot);
        let clash = |occupant: Option<usize>| occupant.is_some_and(|o| o != session);

        if overlapping
            .iter()
            .any(|&t| clash(self.instructor_occupant(t, candidate.instructor)))
        {
            return Some(HardConstraint::InstructorConflict);
        }
        if overlapping
            .iter()
            .any(|&t| clash(self.room_occupant(t, candidate.room)))
        {
            return Some(HardConstraint::RoomConflict);
        }

        let s = &model.sessions()[session];
        let room = &model.rooms()[candidate.room];
        if !room.fits(s.enrolled) {
            return Some(HardConstraint::Capacity);
        }
        if room.room_type != s.required_room_type() {
            return Some(HardConstraint::RoomType);
        }
        None
    }
}

/// S1: whether `slot` goes against an instructor's preference.
pub fn preference_violated(
    preference: Preference,
    slot: &Timeslot,
    soft: &SoftConstraintConfig,
) -> bool {
    match preference {
        Preference::Any => false,
        Preference::Morning => slot.start >= soft.midday,
        Preference::Afternoon => slot.start < soft.midday,
        Preference::NoThursday => slot.day == Weekday::Thursday,
    }
}

/// S2: whether `slot` starts at an undesirable time.
pub fn undesirable_time(slot: &Timeslot, soft: &SoftConstraintConfig) -> bool {
    slot.start < soft.early_cutoff || slot.start >= soft.late_cutoff
}

/// S3: population variance of per-instructor session counts.
pub fn workload_variance(loads: &[u32]) -> f64 {
    if loads.is_empty() {
        return 0.0;
    }
    let n = loads.len() as f64;
    let mean = loads.iter().map(|&c| c as f64).sum::<f64>() / n;
    loads
        .iter()
        .map(|&c| {
            let d = c as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n
}

/// Soft-score breakdown of a (partial or total) timetable.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SoftScore {
    /// S1 count.
    pub preference_violations: u32,
    /// S2 count.
    pub undesirable_time_violations: u32,
    /// S3 variance.
    pub workload_variance: f64,
    /// Weighted sum, lower is better.
    pub total: f64,
}

impl SoftScore {
    /// Combines raw S1..S3 values with `weights`.
    pub fn new(
        preference_violations: u32,
        undesirable_time_violations: u32,
        workload_variance: f64,
        weights: &SoftWeights,
    ) -> Self {
        let total = weights.preference * preference_violations as f64
            + weights.undesirable_time * undesirable_time_violations as f64
            + weights.workload * workload_variance;
        Self {
            preference_violations,
            undesirable_time_violations,
            workload_variance,
            total,
        }
    }

    /// Scores a set of placements; each candidate counts once.
    pub fn from_placements<'a>(
        model: &DomainModel,
        placements: impl IntoIterator<Item = &'a Candidate>,
    ) -> Self {
        let soft = model.soft_config();
        let mut loads = vec![0u32; model.instructors().len()];
        let mut s1 = 0;
        let mut s2 = 0;
        for c in placements {
            let slot = &model.timeslots()[c.timeslot];
            if preference_violated(model.instructors()[c.instructor].preference, slot, soft) {
                s1 += 1;
            }
            if undesirable_time(slot, soft) {
                s2 += 1;
            }
            loads[c.instructor] += 1;
        }
        Self::new(s1, s2, workload_variance(&loads), &soft.weights)
    }
}

/// Running per-instructor loads with O(1) variance updates.
#[derive(Debug, Clone)]
pub struct WorkloadTracker {
    loads: Vec<u32>,
    sum: u64,
    sum_sq: u64,
}

impl WorkloadTracker {
    pub fn new(num_instructors: usize) -> Self {
        Self {
            loads: vec![0; num_instructors],
            sum: 0,
            sum_sq: 0,
        }
    }

    pub fn add(&mut self, instructor: usize) {
        let c = self.loads[instructor] as u64;
        self.sum_sq += 2 * c + 1;
        self.sum += 1;
        self.loads[instructor] += 1;
    }

    pub fn remove(&mut self, instructor: usize) {
        let c = self.loads[instructor] as u64;
        if c == 0 {
            return;
        }
        self.sum_sq -= 2 * c - 1;
        self.sum -= 1;
        self.loads[instructor] -= 1;
    }

    pub fn loads(&self) -> &[u32] {
        &self.loads
    }

    /// Current population variance.
    pub fn variance(&self) -> f64 {
        if self.loads.is_empty() {
            return 0.0;
        }
        let n = self.loads.len() as f64;
        let mean = self.sum as f64 / n;
        (self.sum_sq as f64 / n - mean * mean).max(0.0)
    }

    /// Variance change if `instructor` took one more session.
    pub fn marginal_increase(&self, instructor: usize) -> f64 {
        if self.loads.is_empty() {
            return 0.0;
        }
        let n = self.loads.len() as f64;
        let c = self.loads[instructor] as f64;
        (2.0 * c + 1.0) / n - (2.0 * self.sum as f64 + 1.0) / (n * n)
    }
}

/// Weighted soft penalty of placing a session at `candidate` given the
/// current workload. Used to rank values; never to reject them.
pub fn candidate_penalty(
    model: &DomainModel,
    workload: &WorkloadTracker,
    candidate: Candidate,
) -> f64 {
    let soft = model.soft_config();
    let w = &soft.weights;
    let slot = &model.timeslots()[candidate.timeslot];
    let mut penalty = w.workload * workload.marginal_increase(candidate.instructor);
    if preference_violated(model.instructors()[candidate.instructor].preference, slot, soft) {
        penalty += w.preference;
    }
    if undesirable_time(slot, soft) {
        penalty += w.undesirable_time;
    }
    penalty
}
