//! Timeslot model.
//!
//! A timeslot is a weekly recurring meeting window `[start, end)` on one
//! day. Clock times are minutes since midnight.
//!
//! # Overlap
//! Two timeslots conflict when they fall on the same day and their
//! half-open intervals intersect. Identical slots always conflict.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::validation::ValidationError;

/// A weekly timeslot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeslot {
    /// Unique timeslot identifier.
    pub id: String,
    /// Day of the week.
    pub day: Weekday,
    /// Start time (inclusive).
    pub start: ClockTime,
    /// End time (exclusive).
    pub end: ClockTime,
}

/// Day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// Time of day in minutes since midnight.
///
/// Deserializes from minutes since midnight and rejects values past 23:59.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct ClockTime(u16);

impl ClockTime {
    /// Latest representable time (23:59).
    pub const MAX_MINUTES: u16 = 24 * 60 - 1;

    /// Creates a clock time from hours and minutes.
    ///
    /// Minutes carry into hours. A result past 23:59 is kept as is and
    /// rejected by [`validate_input`](crate::validation::validate_input).
    pub fn hm(hours: u16, minutes: u16) -> Self {
        Self(hours.saturating_mul(60).saturating_add(minutes))
    }

    /// Whether the time lies within one day (00:00..=23:59).
    #[inline]
    pub fn is_valid(self) -> bool {
        self.0 <= Self::MAX_MINUTES
    }

    /// Minutes since midnight.
    #[inline]
    pub fn minutes(self) -> u16 {
        self.0
    }

    /// Hour component (0..=23).
    #[inline]
    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    /// Minute component (0..=59).
    #[inline]
    pub fn minute(self) -> u16 {
        self.0 % 60
    }
}

impl FromStr for ClockTime {
    type Err = ValidationError;

    /// Parses `HH:MM` (24-hour) or `H:MM AM` / `H:MM PM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::invalid_value("clock time", s);
        let upper = s.trim().to_ascii_uppercase();

        let (clock, meridiem) = if let Some(rest) = upper.strip_suffix("AM") {
            (rest.trim_end(), Some(false))
        } else if let Some(rest) = upper.strip_suffix("PM") {
            (rest.trim_end(), Some(true))
        } else {
            (upper.as_str(), None)
        };

        let (h, m) = clock.split_once(':').ok_or_else(invalid)?;
        if m.len() != 2 {
            return Err(invalid());
        }
        let hours: u16 = h.parse().map_err(|_| invalid())?;
        let minutes: u16 = m.parse().map_err(|_| invalid())?;
        if minutes > 59 {
            return Err(invalid());
        }

        let hours = match meridiem {
            None if hours <= 23 => hours,
            Some(pm) if (1..=12).contains(&hours) => (hours % 12) + if pm { 12 } else { 0 },
            _ => return Err(invalid()),
        };

        Ok(Self(hours * 60 + minutes))
    }
}

impl TryFrom<u16> for ClockTime {
    type Error = ValidationError;

    fn try_from(minutes: u16) -> Result<Self, Self::Error> {
        if minutes > Self::MAX_MINUTES {
            return Err(ValidationError::invalid_value(
                "clock time",
                &minutes.to_string(),
            ));
        }
        Ok(Self(minutes))
    }
}

impl From<ClockTime> for u16 {
    fn from(time: ClockTime) -> Self {
        time.0
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for Weekday {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let day = match s.trim().to_ascii_lowercase().as_str() {
            "monday" | "mon" => Weekday::Monday,
            "tuesday" | "tue" => Weekday::Tuesday,
            "wednesday" | "wed" => Weekday::Wednesday,
            "thursday" | "thu" => Weekday::Thursday,
            "friday" | "fri" => Weekday::Friday,
            "saturday" | "sat" => Weekday::Saturday,
            "sunday" | "sun" => Weekday::Sunday,
            _ => return Err(ValidationError::invalid_value("day", s)),
        };
        Ok(day)
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl Timeslot {
    /// Creates a new timeslot.
    pub fn new(id: impl Into<String>, day: Weekday, start: ClockTime, end: ClockTime) -> Self {
        Self {
            id: id.into(),
            day,
            start,
            end,
        }
    }

    /// Length of the slot in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> u16 {
        self.end.minutes().saturating_sub(self.start.minutes())
    }

    /// Whether two slots occupy overlapping time on the same day.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.day == other.day && self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for Timeslot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}-{}", self.day, self.start, self.end)
    }
}
