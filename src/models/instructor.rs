//! Instructor model.
//!
//! Instructors teach sessions of the courses they are qualified for and
//! declare a single timing preference, which is scored as a soft
//! constraint and never blocks a placement.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::validation::ValidationError;

/// An instructor who can be assigned to sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructor {
    /// Unique instructor identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Course codes this instructor may teach.
    pub qualifications: BTreeSet<String>,
    /// Declared timing preference.
    pub preference: Preference,
}

/// Timing preference of an instructor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Preference {
    /// No preference.
    #[default]
    Any,
    /// Prefers sessions starting before midday.
    Morning,
    /// Prefers sessions starting at or after midday.
    Afternoon,
    /// Prefers not to teach on Thursdays.
    NoThursday,
}

impl FromStr for Preference {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ANY" => Ok(Preference::Any),
            "MORNING" => Ok(Preference::Morning),
            "AFTERNOON" => Ok(Preference::Afternoon),
            "NO_THURSDAY" | "NO-THURSDAY" | "NOTHURSDAY" => Ok(Preference::NoThursday),
            _ => Err(ValidationError::invalid_value("instructor preference", s)),
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Preference::Any => "ANY",
            Preference::Morning => "MORNING",
            Preference::Afternoon => "AFTERNOON",
            Preference::NoThursday => "NO_THURSDAY",
        };
        f.write_str(name)
    }
}

impl Instructor {
    /// Creates an instructor with no qualifications and no preference.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            qualifications: BTreeSet::new(),
            preference: Preference::Any,
        }
    }

    /// Sets the instructor name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a qualified course code.
    pub fn with_qualification(mut self, course_code: impl Into<String>) -> Self {
        self.qualifications.insert(course_code.into());
        self
    }

    /// Adds several qualified course codes.
    pub fn with_qualifications<I, S>(mut self, course_codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.qualifications
            .extend(course_codes.into_iter().map(Into::into));
        self
    }

    /// Sets the timing preference.
    pub fn with_preference(mut self, preference: Preference) -> Self {
        self.preference = preference;
        self
    }

    /// Whether this instructor may teach the given course.
    #[inline]
    pub fn is_qualified_for(&self, course_code: &str) -> bool {
        self.qualifications.contains(course_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instructor_builder() {
        let i = Instructor::new("I1")
            .with_name("Dr. Rahman")
            .with_qualification("CS101")
            .with_qualifications(["CS201", "CS301"])
            .with_preference(Preference::NoThursday);

        assert_eq!(i.id, "I1");
        assert_eq!(i.name, "Dr. Rahman");
        assert_eq!(i.qualifications.len(), 3);
        assert!(i.is_qualified_for("CS201"));
        assert!(!i.is_qualified_for("MA101"));
        assert_eq!(i.preference, Preference::NoThursday);
    }

    #[test]
    fn test_parse_preference() {
        assert_eq!("Morning".parse::<Preference>().unwrap(), Preference::Morning);
        assert_eq!("No_Thursday".parse::<Preference>().unwrap(), Preference::NoThursday);
        assert_eq!("any".parse::<Preference>().unwrap(), Preference::Any);
        assert!("Evening".parse::<Preference>().is_err());
        assert!("".parse::<Preference>().is_err());
    }

    #[test]
    fn test_preference_display_roundtrip() {
        for p in [
            Preference::Any,
            Preference::Morning,
            Preference::Afternoon,
            Preference::NoThursday,
        ] {
            assert_eq!(p.to_string().parse::<Preference>().unwrap(), p);
        }
    }
}
