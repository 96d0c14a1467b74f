//! Domain Builder.
//!
//! Computes, once and before any search, every session's set of legal
//! (timeslot, room, instructor) candidates from the resource tables, and
//! the static indexes the search relies on.
//!
//! # Candidate layout
//! A session's domain is the cross product of all timeslots with the
//! (room, instructor) pairs that satisfy the static hard constraints
//! (room type, capacity, qualification). Candidates are numbered
//! timeslot-major, so the candidates of one timeslot form a contiguous
//! block; forward checking only ever scans the blocks of the timeslots
//! that overlap a new assignment.
//!
//! # Reference
//! Russell & Norvig (2021), "Artificial Intelligence: A Modern Approach",
//! Ch. 6 (Constraint Satisfaction Problems)

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Range;

use crate::config::SoftConstraintConfig;
use crate::error::TimetableError;
use crate::models::{Instructor, Room, Session, Timeslot};
use crate::validation::validate_input;

/// A (timeslot, room, instructor) triple, as indices into the model tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Candidate {
    /// Timeslot index.
    pub timeslot: usize,
    /// Room index.
    pub room: usize,
    /// Instructor index.
    pub instructor: usize,
}

impl Candidate {
    pub fn new(timeslot: usize, room: usize, instructor: usize) -> Self {
        Self {
            timeslot,
            room,
            instructor,
        }
    }
}

/// The initial domain of one session.
///
/// Stored implicitly as `timeslots × pairs`; candidate `k` lives in
/// timeslot `k / pairs.len()`.
#[derive(Debug, Clone)]
pub struct SessionDomain {
    pairs: Vec<(usize, usize)>,
    num_timeslots: usize,
}

impl SessionDomain {
    /// Number of candidates.
    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len() * self.num_timeslots
    }

    /// Whether the domain has no candidates.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The candidate with index `k`.
    #[inline]
    pub fn candidate(&self, k: usize) -> Candidate {
        let (room, instructor) = self.pairs[k % self.pairs.len()];
        Candidate::new(k / self.pairs.len(), room, instructor)
    }

    /// Candidate indices belonging to one timeslot.
    #[inline]
    pub fn block(&self, timeslot: usize) -> Range<usize> {
        let p = self.pairs.len();
        timeslot * p..(timeslot + 1) * p
    }

    /// The legal (room, instructor) pairs, shared by every timeslot.
    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    /// Iterates all candidates in index order.
    pub fn iter(&self) -> impl Iterator<Item = Candidate> + '_ {
        (0..self.len()).map(move |k| self.candidate(k))
    }
}

/// The frozen problem: resource tables, initial domains, and indexes.
///
/// Built once by [`DomainModel::build`]; read-only afterwards. Every
/// search attempt keeps its mutable state elsewhere, so a model can be
/// shared by any number of attempts.
#[derive(Debug, Clone)]
pub struct DomainModel {
    sessions: Vec<Session>,
    rooms: Vec<Room>,
    timeslots: Vec<Timeslot>,
    instructors: Vec<Instructor>,
    soft: SoftConstraintConfig,
    domains: Vec<SessionDomain>,
    session_index: HashMap<String, usize>,
    room_index: HashMap<String, usize>,
    timeslot_index: HashMap<String, usize>,
    instructor_index: HashMap<String, usize>,
    /// timeslot → timeslots overlapping it (itself included).
    overlapping: Vec<Vec<usize>>,
    /// room → sessions that have it in their domain.
    room_users: Vec<Vec<usize>>,
    /// instructor → sessions that have them in their domain.
    instructor_users: Vec<Vec<usize>>,
    /// session → sessions sharing a room or instructor with it.
    neighbors: Vec<Vec<usize>>,
}

impl DomainModel {
    /// Validates the tables, builds every session's domain, and fails with
    /// [`TimetableError::UnsatisfiableDomain`] if any domain is empty.
    ///
    /// # Errors
    /// - `Configuration` for malformed tables or soft settings
    /// - `UnsatisfiableDomain` naming the first session without candidates
    pub fn build(
        sessions: Vec<Session>,
        rooms: Vec<Room>,
        timeslots: Vec<Timeslot>,
        instructors: Vec<Instructor>,
        soft: SoftConstraintConfig,
    ) -> Result<Self, TimetableError> {
        validate_input(&sessions, &rooms, &timeslots, &instructors)?;
        soft.validate()?;

        let mut domains = Vec::with_capacity(sessions.len());
        for session in &sessions {
            let pairs = legal_pairs(session, &rooms, &instructors);
            if pairs.is_empty() {
                return Err(TimetableError::UnsatisfiableDomain {
                    session_id: session.id.clone(),
                });
            }
            domains.push(SessionDomain {
                pairs,
                num_timeslots: timeslots.len(),
            });
        }

        let overlapping = timeslots
            .iter()
            .map(|a| {
                timeslots
                    .iter()
                    .enumerate()
                    .filter(|(_, b)| a.overlaps(b))
                    .map(|(j, _)| j)
                    .collect()
            })
            .collect();

        let mut room_users = vec![Vec::new(); rooms.len()];
        let mut instructor_users = vec![Vec::new(); instructors.len()];
        for (s, domain) in domains.iter().enumerate() {
            for &(room, instructor) in &domain.pairs {
                push_unique(&mut room_users[room], s);
                push_unique(&mut instructor_users[instructor], s);
            }
        }

        let neighbors = build_neighbors(sessions.len(), &room_users, &instructor_users);

        let model = Self {
            session_index: index_by_id(sessions.iter().map(|s| s.id.as_str())),
            room_index: index_by_id(rooms.iter().map(|r| r.id.as_str())),
            timeslot_index: index_by_id(timeslots.iter().map(|t| t.id.as_str())),
            instructor_index: index_by_id(instructors.iter().map(|i| i.id.as_str())),
            sessions,
            rooms,
            timeslots,
            instructors,
            soft,
            domains,
            overlapping,
            room_users,
            instructor_users,
            neighbors,
        };

        debug!(
            "built domains: {} sessions, {} rooms, {} timeslots, {} instructors, avg domain {:.1}",
            model.sessions.len(),
            model.rooms.len(),
            model.timeslots.len(),
            model.instructors.len(),
            model.average_domain_size()
        );

        Ok(model)
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn timeslots(&self) -> &[Timeslot] {
        &self.timeslots
    }

    pub fn instructors(&self) -> &[Instructor] {
        &self.instructors
    }

    /// Soft-constraint settings fixed for this model.
    pub fn soft_config(&self) -> &SoftConstraintConfig {
        &self.soft
    }

    /// Number of sessions (search variables).
    #[inline]
    pub fn num_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Initial domain of a session.
    #[inline]
    pub fn domain(&self, session: usize) -> &SessionDomain {
        &self.domains[session]
    }

    /// Timeslots overlapping `timeslot`, itself included.
    #[inline]
    pub fn overlapping(&self, timeslot: usize) -> &[usize] {
        &self.overlapping[timeslot]
    }

    /// Sessions whose domain contains `room`.
    #[inline]
    pub fn room_users(&self, room: usize) -> &[usize] {
        &self.room_users[room]
    }

    /// Sessions whose domain contains `instructor`.
    #[inline]
    pub fn instructor_users(&self, instructor: usize) -> &[usize] {
        &self.instructor_users[instructor]
    }

    /// Sessions sharing at least one room or instructor with `session`.
    #[inline]
    pub fn neighbors(&self, session: usize) -> &[usize] {
        &self.neighbors[session]
    }

    pub fn session_index(&self, id: &str) -> Option<usize> {
        self.session_index.get(id).copied()
    }

    pub fn room_index(&self, id: &str) -> Option<usize> {
        self.room_index.get(id).copied()
    }

    pub fn timeslot_index(&self, id: &str) -> Option<usize> {
        self.timeslot_index.get(id).copied()
    }

    pub fn instructor_index(&self, id: &str) -> Option<usize> {
        self.instructor_index.get(id).copied()
    }

    /// Mean initial domain size over all sessions.
    pub fn average_domain_size(&self) -> f64 {
        if self.domains.is_empty() {
            return 0.0;
        }
        let total: usize = self.domains.iter().map(SessionDomain::len).sum();
        total as f64 / self.domains.len() as f64
    }
}

/// (room, instructor) pairs satisfying type, capacity, and qualification.
fn legal_pairs(session: &Session, rooms: &[Room], instructors: &[Instructor]) -> Vec<(usize, usize)> {
    let required = session.required_room_type();
    let qualified: Vec<usize> = instructors
        .iter()
        .enumerate()
        .filter(|(_, i)| i.is_qualified_for(&session.course_code))
        .map(|(j, _)| j)
        .collect();

    rooms
        .iter()
        .enumerate()
        .filter(|(_, r)| r.room_type == required && r.fits(session.enrolled))
        .flat_map(|(r, _)| qualified.iter().map(move |&i| (r, i)))
        .collect()
}

fn build_neighbors(
    num_sessions: usize,
    room_users: &[Vec<usize>],
    instructor_users: &[Vec<usize>],
) -> Vec<Vec<usize>> {
    let mut neighbors = vec![Vec::new(); num_sessions];
    let mut seen = vec![usize::MAX; num_sessions];

    for s in 0..num_sessions {
        seen[s] = s;
        for users in room_users.iter().chain(instructor_users) {
            if !users.contains(&s) {
                continue;
            }
            for &o in users {
                if seen[o] != s {
                    seen[o] = s;
                    neighbors[s].push(o);
                }
            }
        }
        neighbors[s].sort_unstable();
    }

    neighbors
}

fn push_unique(list: &mut Vec<usize>, value: usize) {
    if list.last() != Some(&value) {
        list.push(value);
    }
}

fn index_by_id<'a>(ids: impl Iterator<Item = &'a str>) -> HashMap<String, usize> {
    ids.enumerate().map(|(i, id)| (id.to_string(), i)).collect()
}
