//! Timetable (solution) model.
//!
//! A timetable maps sessions to their placement: a (timeslot, room,
//! instructor) triple. It may be partial (search in progress or
//! exhausted) or total (solved). Hard-constraint violations found by the
//! evaluator are reported as [`Violation`]s.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A session placement.
///
/// Records that a specific session meets in a specific timeslot and room
/// with a specific instructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    /// Placed session ID.
    pub session_id: String,
    /// Assigned timeslot ID.
    pub timeslot_id: String,
    /// Assigned room ID.
    pub room_id: String,
    /// Assigned instructor ID.
    pub instructor_id: String,
}

impl Assignment {
    /// Creates a new assignment.
    pub fn new(
        session_id: impl Into<String>,
        timeslot_id: impl Into<String>,
        room_id: impl Into<String>,
        instructor_id: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            timeslot_id: timeslot_id.into(),
            room_id: room_id.into(),
            instructor_id: instructor_id.into(),
        }
    }
}

/// A partial or total mapping from sessions to assignments.
///
/// Keyed by session ID; iteration order is by session ID so that
/// reports derived from a timetable are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timetable {
    assignments: BTreeMap<String, Assignment>,
}

impl Timetable {
    /// Creates an empty timetable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a session, replacing any earlier placement of the same session.
    pub fn insert(&mut self, assignment: Assignment) -> Option<Assignment> {
        self.assignments
            .insert(assignment.session_id.clone(), assignment)
    }

    /// Removes a session's placement.
    pub fn remove(&mut self, session_id: &str) -> Option<Assignment> {
        self.assignments.remove(session_id)
    }

    /// The placement of a session, if any.
    pub fn get(&self, session_id: &str) -> Option<&Assignment> {
        self.assignments.get(session_id)
    }

    /// Whether a session is placed.
    pub fn contains(&self, session_id: &str) -> bool {
        self.assignments.contains_key(session_id)
    }

    /// Number of placed sessions.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether no session is placed.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Iterates placements in session-ID order.
    pub fn iter(&self) -> impl Iterator<Item = &Assignment> {
        self.assignments.values()
    }
}

impl FromIterator<Assignment> for Timetable {
    fn from_iter<I: IntoIterator<Item = Assignment>>(iter: I) -> Self {
        let mut timetable = Timetable::new();
        for assignment in iter {
            timetable.insert(assignment);
        }
        timetable
    }
}

/// A hard-constraint violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Related session ID.
    pub session_id: String,
    /// Human-readable description.
    pub message: String,
}

/// Classification of hard-constraint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationType {
    /// Instructor teaches two sessions at overlapping times (H1).
    InstructorConflict,
    /// Room hosts two sessions at overlapping times (H2).
    RoomConflict,
    /// Room has fewer seats than enrolled students (H3).
    CapacityExceeded,
    /// Room type does not match the delivery type (H4).
    RoomTypeMismatch,
    /// Instructor is not qualified for the course.
    Unqualified,
    /// A session of the problem has no placement.
    Unassigned,
    /// A placement references an unknown session, timeslot, room, or instructor.
    UnknownReference,
}

impl Violation {
    /// Creates a violation.
    pub fn new(
        violation_type: ViolationType,
        session_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            session_id: session_id.into(),
            message: message.into(),
        }
    }
}
