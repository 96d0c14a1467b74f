//! Timetable quality metrics (KPIs).
//!
//! Reporting summaries computed from a (partial or total) timetable and
//! the model it was built from.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Instructor load | Sessions taught per instructor (zero included) |
//! | Load spread | max load - min load |
//! | Room utilization | Sessions in the room / number of timeslots |
//! | Average fill | Mean enrolled / capacity over the room's sessions |
//! | Sessions by day | Placements per weekday |
//! | Sessions by start | Placements per start time |

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::csp::DomainModel;
use crate::models::{ClockTime, Timetable, Weekday};

/// Usage summary of one room.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RoomUsage {
    /// Sessions placed in the room.
    pub sessions: usize,
    /// Fraction of timeslots in which the room is used (0.0..1.0).
    pub utilization: f64,
    /// Mean seat occupancy of the room's sessions (0.0..1.0).
    pub average_fill: f64,
}

/// Timetable performance indicators.
///
/// Maps are ordered so that repeated calculations compare equal.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimetableKpi {
    /// Placements that reference known sessions and resources.
    pub sessions_scheduled: usize,
    /// Sessions per instructor ID.
    pub instructor_load: BTreeMap<String, usize>,
    /// Usage per room ID.
    pub room_usage: BTreeMap<String, RoomUsage>,
    /// Mean room utilization.
    pub avg_utilization: f64,
    /// Placements per weekday.
    pub sessions_by_day: BTreeMap<Weekday, usize>,
    /// Placements per slot start time.
    pub sessions_by_start: BTreeMap<ClockTime, usize>,
}

impl TimetableKpi {
    /// Computes KPIs; placements with unknown IDs are skipped.
    pub fn calculate(model: &DomainModel, timetable: &Timetable) -> Self {
        let mut kpi = Self {
            instructor_load: model
                .instructors()
                .iter()
                .map(|i| (i.id.clone(), 0))
                .collect(),
            ..Self::default()
        };
        let mut fill_sum: BTreeMap<String, f64> = BTreeMap::new();
        for room in model.rooms() {
            kpi.room_usage.insert(room.id.clone(), RoomUsage::default());
        }

        for a in timetable.iter() {
            let (Some(s), Some(t), Some(r), Some(_)) = (
                model.session_index(&a.session_id),
                model.timeslot_index(&a.timeslot_id),
                model.room_index(&a.room_id),
                model.instructor_index(&a.instructor_id),
            ) else {
                continue;
            };
            let session = &model.sessions()[s];
            let slot = &model.timeslots()[t];
            let room = &model.rooms()[r];

            kpi.sessions_scheduled += 1;
            *kpi.instructor_load.entry(a.instructor_id.clone()).or_default() += 1;
            if let Some(usage) = kpi.room_usage.get_mut(&room.id) {
                usage.sessions += 1;
            }
            *fill_sum.entry(room.id.clone()).or_default() +=
                session.enrolled as f64 / room.capacity.max(1) as f64;
            *kpi.sessions_by_day.entry(slot.day).or_default() += 1;
            *kpi.sessions_by_start.entry(slot.start).or_default() += 1;
        }

        let num_slots = model.timeslots().len().max(1) as f64;
        for (room_id, usage) in kpi.room_usage.iter_mut() {
            usage.utilization = usage.sessions as f64 / num_slots;
            if usage.sessions > 0 {
                usage.average_fill =
                    fill_sum.get(room_id).copied().unwrap_or(0.0) / usage.sessions as f64;
            }
        }

        kpi.avg_utilization = if kpi.room_usage.is_empty() {
            0.0
        } else {
            kpi.room_usage.values().map(|u| u.utilization).sum::<f64>()
                / kpi.room_usage.len() as f64
        };

        kpi
    }

    /// Difference between the busiest and the least busy instructor.
    pub fn load_spread(&self) -> usize {
        let max = self.instructor_load.values().max().copied().unwrap_or(0);
        let min = self.instructor_load.values().min().copied().unwrap_or(0);
        max - min
    }

    /// Whether the timetable meets the given reporting thresholds.
    pub fn meets_thresholds(&self, max_load_spread: usize, min_utilization: f64) -> bool {
        self.load_spread() <= max_load_spread && self.avg_utilization >= min_utilization
    }
}
