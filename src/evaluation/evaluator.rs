//! Solution Evaluator.
//!
//! Recomputes hard violations and the soft-score breakdown of a timetable
//! from scratch, independent of the search state that produced it.

use serde::{Deserialize, Serialize};

use crate::csp::{Candidate, DomainModel, OccupancyIndex, SoftScore};
use crate::error::TimetableError;
use crate::evaluation::TimetableKpi;
use crate::models::{Timetable, Violation, ViolationType};

/// Full evaluation of a timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Hard-constraint violations; empty for a valid complete timetable.
    pub hard_violations: Vec<Violation>,
    /// Soft breakdown over the resolvable placements.
    pub soft: SoftScore,
    /// Reporting summaries.
    pub kpi: TimetableKpi,
}

impl Evaluation {
    /// Whether the timetable is complete and violates no hard constraint.
    pub fn is_valid(&self) -> bool {
        self.hard_violations.is_empty()
    }

    /// Number of violations of one type.
    pub fn count(&self, violation_type: ViolationType) -> usize {
        self.hard_violations
            .iter()
            .filter(|v| v.violation_type == violation_type)
            .count()
    }
}

/// Stateless evaluator.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolutionEvaluator;

impl SolutionEvaluator {
    /// Evaluates `timetable` against `model`.
    ///
    /// Placements are visited in session-ID order. A conflict is reported
    /// against the later session; the earlier one keeps the room or
    /// instructor cell.
    pub fn evaluate(model: &DomainModel, timetable: &Timetable) -> Evaluation {
        let mut violations = Vec::new();
        let mut occupancy = OccupancyIndex::new(model);
        let mut placements: Vec<Candidate> = Vec::with_capacity(timetable.len());

        for a in timetable.iter() {
            let resolved = (
                model.session_index(&a.session_id),
                model.timeslot_index(&a.timeslot_id),
                model.room_index(&a.room_id),
                model.instructor_index(&a.instructor_id),
            );
            let (Some(s), Some(t), Some(r), Some(i)) = resolved else {
                violations.push(Violation::new(
                    ViolationType::UnknownReference,
                    a.session_id.as_str(),
                    format!(
                        "Placement ({}, {}, {}) references an unknown ID",
                        a.timeslot_id, a.room_id, a.instructor_id
                    ),
                ));
                continue;
            };

            let candidate = Candidate::new(t, r, i);
            let session = &model.sessions()[s];
            let room = &model.rooms()[r];
            let instructor = &model.instructors()[i];

            for &u in model.overlapping(t) {
                if let Some(other) = occupancy.instructor_occupant(u, i).filter(|&o| o != s) {
                    violations.push(Violation::new(
                        ViolationType::InstructorConflict,
                        session.id.as_str(),
                        format!(
                            "Instructor '{}' also teaches '{}' in an overlapping slot",
                            instructor.id,
                            model.sessions()[other].id
                        ),
                    ));
                }
                if let Some(other) = occupancy.room_occupant(u, r).filter(|&o| o != s) {
                    violations.push(Violation::new(
                        ViolationType::RoomConflict,
                        session.id.as_str(),
                        format!(
                            "Room '{}' also hosts '{}' in an overlapping slot",
                            room.id,
                            model.sessions()[other].id
                        ),
                    ));
                }
            }
            if !room.fits(session.enrolled) {
                violations.push(Violation::new(
                    ViolationType::CapacityExceeded,
                    session.id.as_str(),
                    format!(
                        "Room '{}' seats {} but {} are enrolled",
                        room.id, room.capacity, session.enrolled
                    ),
                ));
            }
            if room.room_type != session.required_room_type() {
                violations.push(Violation::new(
                    ViolationType::RoomTypeMismatch,
                    session.id.as_str(),
                    format!(
                        "{} session placed in {} room '{}'",
                        session.delivery, room.room_type, room.id
                    ),
                ));
            }
            if !instructor.is_qualified_for(&session.course_code) {
                violations.push(Violation::new(
                    ViolationType::Unqualified,
                    session.id.as_str(),
                    format!(
                        "Instructor '{}' is not qualified for {}",
                        instructor.id, session.course_code
                    ),
                ));
            }

            occupancy.occupy_free(s, candidate);
            placements.push(candidate);
        }

        for session in model.sessions() {
            if !timetable.contains(&session.id) {
                violations.push(Violation::new(
                    ViolationType::Unassigned,
                    session.id.as_str(),
                    "Session has no placement",
                ));
            }
        }

        Evaluation {
            hard_violations: violations,
            soft: SoftScore::from_placements(model, &placements),
            kpi: TimetableKpi::calculate(model, timetable),
        }
    }

    /// Evaluates a timetable claimed to be solved.
    ///
    /// # Errors
    /// `InvariantViolation` if any hard violation is found.
    pub fn certify(model: &DomainModel, timetable: &Timetable) -> Result<Evaluation, TimetableError> {
        let evaluation = Self::evaluate(model, timetable);
        if evaluation.is_valid() {
            Ok(evaluation)
        } else {
            Err(TimetableError::InvariantViolation {
                violations: evaluation.hard_violations,
            })
        }
    }
}
