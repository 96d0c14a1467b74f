//! Input validation for timetabling problems.
//!
//! Checks structural integrity of the normalized resource tables before
//! domains are built. Detects:
//! - Empty tables
//! - Duplicate IDs (per table)
//! - Non-positive room capacities
//! - Clock times past 23:59
//! - Timeslots whose end does not follow their start
//! - Sessions without a course code
//!
//! Value-level problems (unknown preference strings, malformed clock
//! times) are rejected earlier, when records are parsed into models.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::models::{Instructor, Room, Session, Timeslot};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    /// A required table has no rows.
    EmptyTable,
    /// Two entities in the same table share an ID.
    DuplicateId,
    /// A value is outside its closed set or has the wrong format.
    InvalidValue,
    /// A room capacity is zero.
    InvalidCapacity,
    /// A timeslot ends at or before its start.
    InvalidTimeRange,
    /// A solver or soft-constraint setting is out of range.
    InvalidConfig,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn invalid_value(field: &str, value: &str) -> Self {
        Self::new(
            ValidationErrorKind::InvalidValue,
            format!("Invalid {field}: '{value}'"),
        )
    }
}

/// Validates the input tables of a timetabling problem.
///
/// Checks:
/// 1. No table is empty
/// 2. No duplicate session, room, timeslot, or instructor IDs
/// 3. Every room has a positive capacity
/// 4. Every timeslot lies within one day and ends after it starts
/// 5. Every session names a course
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    sessions: &[Session],
    rooms: &[Room],
    timeslots: &[Timeslot],
    instructors: &[Instructor],
) -> ValidationResult {
    let mut errors = Vec::new();

    for (table, len) in [
        ("sessions", sessions.len()),
        ("rooms", rooms.len()),
        ("timeslots", timeslots.len()),
        ("instructors", instructors.len()),
    ] {
        if len == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyTable,
                format!("No {table} supplied"),
            ));
        }
    }

    check_unique("session", sessions.iter().map(|s| s.id.as_str()), &mut errors);
    check_unique("room", rooms.iter().map(|r| r.id.as_str()), &mut errors);
    check_unique("timeslot", timeslots.iter().map(|t| t.id.as_str()), &mut errors);
    check_unique(
        "instructor",
        instructors.iter().map(|i| i.id.as_str()),
        &mut errors,
    );

    for room in rooms {
        if room.capacity == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCapacity,
                format!("Room '{}' has zero capacity", room.id),
            ));
        }
    }

    for slot in timeslots {
        for time in [slot.start, slot.end] {
            if !time.is_valid() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidValue,
                    format!(
                        "Timeslot '{}' has time {} minutes past midnight, beyond 23:59",
                        slot.id,
                        time.minutes()
                    ),
                ));
            }
        }
        if slot.end <= slot.start {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidTimeRange,
                format!(
                    "Timeslot '{}' ends at {} but starts at {}",
                    slot.id, slot.end, slot.start
                ),
            ));
        }
    }

    for session in sessions {
        if session.course_code.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidValue,
                format!("Session '{}' has no course code", session.id),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_unique<'a>(
    entity: &str,
    ids: impl Iterator<Item = &'a str>,
    errors: &mut Vec<ValidationError>,
) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {entity} ID: {id}"),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClockTime, DeliveryType, Preference, Weekday};

    fn sample_sessions() -> Vec<Session> {
        vec![
            Session::new("S1", "CS101", DeliveryType::Lecture).with_enrolled(25),
            Session::new("S2", "CS101", DeliveryType::Lab).with_enrolled(18),
        ]
    }

    fn sample_rooms() -> Vec<Room> {
        vec![Room::classroom("R1", 30), Room::lab("L1", 20)]
    }

    fn sample_timeslots() -> Vec<Timeslot> {
        vec![
            Timeslot::new("T1", Weekday::Monday, ClockTime::hm(9, 0), ClockTime::hm(10, 30)),
            Timeslot::new("T2", Weekday::Monday, ClockTime::hm(11, 0), ClockTime::hm(12, 30)),
        ]
    }

    fn sample_instructors() -> Vec<Instructor> {
        vec![Instructor::new("I1")
            .with_qualification("CS101")
            .with_preference(Preference::Morning)]
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_input(
            &sample_sessions(),
            &sample_rooms(),
            &sample_timeslots(),
            &sample_instructors()
        )
        .is_ok());
    }

    #[test]
    fn test_empty_tables() {
        let errors = validate_input(&[], &[], &sample_timeslots(), &sample_instructors())
            .unwrap_err();
        let empty: Vec<_> = errors
            .iter()
            .filter(|e| e.kind == ValidationErrorKind::EmptyTable)
            .collect();
        assert_eq!(empty.len(), 2);
        assert!(empty.iter().any(|e| e.message.contains("rooms")));
    }

    #[test]
    fn test_duplicate_room_id() {
        let rooms = vec![Room::classroom("R1", 30), Room::lab("R1", 20)];
        let errors = validate_input(
            &sample_sessions(),
            &rooms,
            &sample_timeslots(),
            &sample_instructors(),
        )
        .unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("room")));
    }

    #[test]
    fn test_zero_capacity() {
        let rooms = vec![Room::classroom("R1", 0)];
        let errors = validate_input(
            &sample_sessions(),
            &rooms,
            &sample_timeslots(),
            &sample_instructors(),
        )
        .unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidCapacity));
    }

    #[test]
    fn test_inverted_timeslot() {
        let slots = vec![Timeslot::new(
            "T1",
            Weekday::Tuesday,
            ClockTime::hm(11, 0),
            ClockTime::hm(9, 0),
        )];
        let errors = validate_input(
            &sample_sessions(),
            &sample_rooms(),
            &slots,
            &sample_instructors(),
        )
        .unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidTimeRange));
    }

    #[test]
    fn test_time_past_midnight() {
        let slots = vec![Timeslot::new(
            "LATE",
            Weekday::Friday,
            ClockTime::hm(23, 0),
            ClockTime::hm(24, 30),
        )];
        let errors = validate_input(
            &sample_sessions(),
            &sample_rooms(),
            &slots,
            &sample_instructors(),
        )
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::InvalidValue);
        assert!(errors[0].message.contains("LATE"));
    }

    #[test]
    fn test_multiple_errors() {
        let sessions = vec![
            Session::new("S1", "", DeliveryType::Lecture),
            Session::new("S1", "CS101", DeliveryType::Lab),
        ];
        let errors = validate_input(&sessions, &[], &sample_timeslots(), &sample_instructors())
            .unwrap_err();
        assert!(errors.len() >= 3);
    }
}
