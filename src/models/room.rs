//! Room model.
//!
//! Rooms host sessions. A room has a type (classroom or lab) and a seat
//! capacity; both are hard requirements for every session placed in it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::validation::ValidationError;

/// A teaching room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier.
    pub id: String,
    /// Room classification.
    pub room_type: RoomType,
    /// Number of seats.
    pub capacity: u32,
}

/// Room type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomType {
    /// Lecture hall or classroom (hosts lectures and tutorials).
    Classroom,
    /// Laboratory (hosts lab sessions).
    Lab,
}

impl FromStr for RoomType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CLASSROOM" | "LECTURE" => Ok(RoomType::Classroom),
            "LAB" => Ok(RoomType::Lab),
            _ => Err(ValidationError::invalid_value("room type", s)),
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomType::Classroom => f.write_str("Classroom"),
            RoomType::Lab => f.write_str("Lab"),
        }
    }
}

impl Room {
    /// Creates a new room.
    pub fn new(id: impl Into<String>, room_type: RoomType, capacity: u32) -> Self {
        Self {
            id: id.into(),
            room_type,
            capacity,
        }
    }

    /// Creates a classroom.
    pub fn classroom(id: impl Into<String>, capacity: u32) -> Self {
        Self::new(id, RoomType::Classroom, capacity)
    }

    /// Creates a lab.
    pub fn lab(id: impl Into<String>, capacity: u32) -> Self {
        Self::new(id, RoomType::Lab, capacity)
    }

    /// Whether this room can seat `enrolled` students.
    #[inline]
    pub fn fits(&self, enrolled: u32) -> bool {
        self.capacity >= enrolled
    }
}
