//! Session model.
//!
//! A session is an atomic class meeting (lecture, lab, or tutorial of one
//! course for one student section) that needs exactly one timeslot, one
//! room, and one instructor.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::RoomType;
use crate::validation::ValidationError;

/// A class session to be placed in the timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier.
    pub id: String,
    /// Course code, matched against instructor qualifications.
    pub course_code: String,
    /// How the session is delivered; determines the required room type.
    pub delivery: DeliveryType,
    /// Number of enrolled students.
    pub enrolled: u32,
    /// Owning section / student group.
    pub section_id: String,
}

/// Session delivery type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryType {
    /// Lecture (LEC).
    Lecture,
    /// Laboratory session (LAB).
    Lab,
    /// Tutorial (TUT).
    Tutorial,
}

impl DeliveryType {
    /// The room type this delivery type must be held in.
    ///
    /// Labs need lab rooms; lectures and tutorials need classrooms.
    pub fn required_room_type(self) -> RoomType {
        match self {
            DeliveryType::Lab => RoomType::Lab,
            DeliveryType::Lecture | DeliveryType::Tutorial => RoomType::Classroom,
        }
    }
}

impl FromStr for DeliveryType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LEC" | "LECTURE" => Ok(DeliveryType::Lecture),
            "LAB" => Ok(DeliveryType::Lab),
            "TUT" | "TUTORIAL" => Ok(DeliveryType::Tutorial),
            _ => Err(ValidationError::invalid_value("delivery type", s)),
        }
    }
}

impl fmt::Display for DeliveryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            DeliveryType::Lecture => "LEC",
            DeliveryType::Lab => "LAB",
            DeliveryType::Tutorial => "TUT",
        };
        f.write_str(code)
    }
}

impl Session {
    /// Creates a new session with no enrolment and no section.
    pub fn new(
        id: impl Into<String>,
        course_code: impl Into<String>,
        delivery: DeliveryType,
    ) -> Self {
        Self {
            id: id.into(),
            course_code: course_code.into(),
            delivery,
            enrolled: 0,
            section_id: String::new(),
        }
    }

    /// Sets the enrolled student count.
    pub fn with_enrolled(mut self, enrolled: u32) -> Self {
        self.enrolled = enrolled;
        self
    }

    /// Sets the owning section.
    pub fn with_section(mut self, section_id: impl Into<String>) -> Self {
        self.section_id = section_id.into();
        self
    }

    /// The room type this session must be held in.
    #[inline]
    pub fn required_room_type(&self) -> RoomType {
        self.delivery.required_room_type()
    }
}
