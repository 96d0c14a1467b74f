//! Timetabling domain models.
//!
//! Provides the core data types for course timetabling problems and
//! their solutions. All resource tables are immutable once loaded.
//!
//! # Domain Mappings
//!
//! | u-timetable | University | Training center |
//! |-------------|-----------|-----------------|
//! | Session | Lecture/Lab/Tutorial meeting | Course block |
//! | Timeslot | Weekly teaching period | Session window |
//! | Room | Classroom/Lab | Training room |
//! | Instructor | Lecturer/TA | Trainer |
//! | Timetable | Semester timetable | Training plan |

mod instructor;
mod room;
mod session;
mod timeslot;
mod timetable;

pub use instructor::{Instructor, Preference};
pub use room::{Room, RoomType};
pub use session::{DeliveryType, Session};
pub use timeslot::{ClockTime, Timeslot, Weekday};
pub use timetable::{Assignment, Timetable, Violation, ViolationType};
