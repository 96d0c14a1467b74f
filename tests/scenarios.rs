//! End-to-end scenarios through the public `build` / `solve` API.

use u_timetable::config::{SoftConstraintConfig, SoftWeights, SolverConfig};
use u_timetable::csp::{SolveOutcome, TerminationReason};
use u_timetable::evaluation::SolutionEvaluator;
use u_timetable::models::*;
use u_timetable::{build, solve, TimetableError};

fn slot(id: &str, day: Weekday, h: u16, m: u16, minutes: u16) -> Timeslot {
    let start = ClockTime::hm(h, m);
    let end = ClockTime::hm(h, m + minutes);
    Timeslot::new(id, day, start, end)
}

fn deterministic() -> SolverConfig {
    SolverConfig::default().with_randomization_factor(0.0)
}

/// A week of two sections across four courses.
fn sample_department() -> (Vec<Session>, Vec<Room>, Vec<Timeslot>, Vec<Instructor>) {
    let courses = ["CS101", "CS102", "MA101", "PH101"];
    let mut sessions = Vec::new();
    for course in courses {
        for section in ["A", "B"] {
            sessions.push(
                Session::new(format!("{course}-{section}-LEC"), course, DeliveryType::Lecture)
                    .with_enrolled(35)
                    .with_section(section),
            );
            sessions.push(
                Session::new(format!("{course}-{section}-LAB"), course, DeliveryType::Lab)
                    .with_enrolled(18)
                    .with_section(section),
            );
        }
    }

    let rooms = vec![
        Room::classroom("R101", 40),
        Room::classroom("R102", 60),
        Room::lab("LAB1", 20),
        Room::lab("LAB2", 24),
    ];

    let mut timeslots = Vec::new();
    for day in [Weekday::Monday, Weekday::Tuesday, Weekday::Wednesday] {
        for (i, (h, m)) in [(9, 0), (10, 45), (13, 0), (14, 45)].into_iter().enumerate() {
            timeslots.push(slot(&format!("{day}-{i}"), day, h, m, 90));
        }
    }

    let instructors = vec![
        Instructor::new("I1")
            .with_qualifications(["CS101", "CS102"])
            .with_preference(Preference::Morning),
        Instructor::new("I2")
            .with_qualifications(["CS102", "MA101"])
            .with_preference(Preference::Afternoon),
        Instructor::new("I3").with_qualifications(["MA101", "PH101"]),
        Instructor::new("I4")
            .with_qualifications(["PH101", "CS101"])
            .with_preference(Preference::NoThursday),
    ];

    (sessions, rooms, timeslots, instructors)
}

#[test]
fn scenario_a_small_instance_is_solved() {
    let sessions = vec![
        Session::new("S1", "CS101", DeliveryType::Lecture).with_enrolled(28),
        Session::new("S2", "CS101", DeliveryType::Tutorial).with_enrolled(22),
        Session::new("S3", "CS102", DeliveryType::Lab).with_enrolled(16),
    ];
    let rooms = vec![Room::classroom("LEC-1", 30), Room::lab("LAB-1", 20)];
    let timeslots = vec![
        slot("T1", Weekday::Monday, 10, 0, 90),
        slot("T2", Weekday::Tuesday, 10, 0, 90),
    ];
    let instructors = vec![
        Instructor::new("I1").with_qualifications(["CS101", "CS102"]),
        Instructor::new("I2").with_qualifications(["CS101", "CS102"]),
    ];

    let model = build(
        sessions,
        rooms,
        timeslots,
        instructors,
        SoftConstraintConfig::default(),
    )
    .unwrap();
    let solution = solve(&model, &deterministic())
        .unwrap()
        .into_result()
        .unwrap();

    assert_eq!(solution.timetable.len(), 3);
    assert_eq!(solution.hard_violations, 0);
    assert_eq!(solution.timetable.get("S3").unwrap().room_id, "LAB-1");

    let eval = SolutionEvaluator::evaluate(&model, &solution.timetable);
    assert!(eval.is_valid());
    assert_eq!(eval.soft, solution.soft_score);
}

#[test]
fn scenario_b_colliding_windows_exhaust_search() {
    let sessions = vec![
        Session::new("ALG-1", "CS201", DeliveryType::Lecture).with_enrolled(25),
        Session::new("ALG-2", "CS201", DeliveryType::Lecture).with_enrolled(25),
    ];
    let rooms = vec![Room::classroom("R1", 40), Room::classroom("R2", 40)];
    // The only two windows overlap on Monday morning.
    let timeslots = vec![
        slot("MON-A", Weekday::Monday, 10, 0, 90),
        slot("MON-B", Weekday::Monday, 11, 0, 90),
    ];
    let instructors = vec![
        Instructor::new("ONLY").with_qualification("CS201"),
        Instructor::new("OTHER").with_qualification("MA101"),
    ];

    let model = build(
        sessions,
        rooms,
        timeslots,
        instructors,
        SoftConstraintConfig::default(),
    )
    .unwrap();

    for forward_checking in [true, false] {
        let config = deterministic().with_forward_checking(forward_checking);
        let outcome = solve(&model, &config).unwrap();
        let SolveOutcome::Exhausted(exhausted) = &outcome else {
            panic!("expected exhausted search, got {outcome:?}");
        };
        assert_eq!(exhausted.reason, TerminationReason::RootExhausted);
        assert_eq!(exhausted.unassigned_session_ids, vec!["ALG-2"]);
        assert!(exhausted.partial.contains("ALG-1"));

        match outcome.into_result() {
            Err(err @ TimetableError::SearchExhausted(_)) => assert!(err.is_retryable()),
            other => panic!("expected SearchExhausted, got {other:?}"),
        }
    }
}

#[test]
fn scenario_c_oversized_session_fails_at_build() {
    let sessions = vec![
        Session::new("SMALL", "CS101", DeliveryType::Lecture).with_enrolled(20),
        Session::new("HUGE", "CS101", DeliveryType::Lecture).with_enrolled(80),
    ];
    let rooms = vec![
        Room::classroom("R1", 40),
        Room::classroom("R2", 79),
        Room::lab("L1", 100),
    ];
    let timeslots = vec![slot("T1", Weekday::Friday, 10, 0, 60)];
    let instructors = vec![Instructor::new("I1").with_qualification("CS101")];

    let err = build(
        sessions,
        rooms,
        timeslots,
        instructors,
        SoftConstraintConfig::default(),
    )
    .unwrap_err();
    match err {
        TimetableError::UnsatisfiableDomain { session_id } => assert_eq!(session_id, "HUGE"),
        other => panic!("expected UnsatisfiableDomain, got {other}"),
    }
}

#[test]
fn department_week_is_solved_and_certified() {
    let (sessions, rooms, timeslots, instructors) = sample_department();
    let model = build(
        sessions,
        rooms,
        timeslots,
        instructors,
        SoftConstraintConfig::default(),
    )
    .unwrap();

    let solution = solve(&model, &SolverConfig::default().with_seed(3))
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(solution.timetable.len(), 16);

    let eval = SolutionEvaluator::certify(&model, &solution.timetable).unwrap();
    assert_eq!(eval.kpi.sessions_scheduled, 16);
    assert_eq!(eval.kpi.instructor_load.values().sum::<usize>(), 16);
    assert_eq!(eval.kpi.sessions_by_day.values().sum::<usize>(), 16);
}

#[test]
fn repeated_runs_are_identical() {
    let (sessions, rooms, timeslots, instructors) = sample_department();
    let model = build(
        sessions,
        rooms,
        timeslots,
        instructors,
        SoftConstraintConfig::default(),
    )
    .unwrap();

    let first = solve(&model, &deterministic()).unwrap();
    for _ in 0..3 {
        let again = solve(&model, &deterministic()).unwrap();
        assert_eq!(
            first.solution().map(|s| &s.timetable),
            again.solution().map(|s| &s.timetable)
        );
        assert_eq!(first.stats().iterations, again.stats().iterations);
    }
}

#[test]
fn soft_weights_change_only_scores() {
    let (sessions, rooms, timeslots, instructors) = sample_department();
    let heavy = SoftConstraintConfig::default().with_weights(SoftWeights::new(10.0, 0.0, 0.0));
    let model = build(sessions, rooms, timeslots, instructors, heavy).unwrap();

    let solution = solve(&model, &deterministic())
        .unwrap()
        .into_result()
        .unwrap();
    let s = solution.soft_score;
    assert!((s.total - 10.0 * s.preference_violations as f64).abs() < 1e-9);
}

#[test]
fn tampered_solution_fails_certification() {
    let (sessions, rooms, timeslots, instructors) = sample_department();
    let model = build(
        sessions,
        rooms,
        timeslots,
        instructors,
        SoftConstraintConfig::default(),
    )
    .unwrap();
    let solution = solve(&model, &deterministic())
        .unwrap()
        .into_result()
        .unwrap();

    // Move one lab into the room and slot of another lab.
    let mut timetable = solution.timetable.clone();
    let labs: Vec<Assignment> = timetable
        .iter()
        .filter(|a| a.session_id.ends_with("LAB"))
        .take(2)
        .cloned()
        .collect();
    timetable.insert(Assignment::new(
        labs[1].session_id.as_str(),
        labs[0].timeslot_id.as_str(),
        labs[0].room_id.as_str(),
        labs[1].instructor_id.as_str(),
    ));

    match SolutionEvaluator::certify(&model, &timetable) {
        Err(TimetableError::InvariantViolation { violations }) => {
            assert!(violations
                .iter()
                .any(|v| v.violation_type == ViolationType::RoomConflict));
        }
        other => panic!("expected InvariantViolation, got {other:?}"),
    }
}

#[test]
fn solution_json_roundtrip() {
    let (sessions, rooms, timeslots, instructors) = sample_department();
    let model = build(
        sessions,
        rooms,
        timeslots,
        instructors,
        SoftConstraintConfig::default(),
    )
    .unwrap();
    let solution = solve(&model, &deterministic())
        .unwrap()
        .into_result()
        .unwrap();

    let json = serde_json::to_string(&solution).unwrap();
    let back: u_timetable::Solution = serde_json::from_str(&json).unwrap();
    assert_eq!(back, solution);
}

#[test]
fn malformed_input_is_a_configuration_error() {
    let err = build(
        vec![Session::new("S1", "CS101", DeliveryType::Lecture)],
        vec![Room::classroom("R1", 0)],
        vec![slot("T1", Weekday::Monday, 10, 0, 60)],
        vec![Instructor::new("I1").with_qualification("CS101")],
        SoftConstraintConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, TimetableError::Configuration(_)));
    assert!(!err.is_retryable());
}

#[test]
fn tiny_budget_returns_partial() {
    let (sessions, rooms, timeslots, instructors) = sample_department();
    let model = build(
        sessions,
        rooms,
        timeslots,
        instructors,
        SoftConstraintConfig::default(),
    )
    .unwrap();
    let outcome = solve(&model, &deterministic().with_max_iterations(5)).unwrap();
    let exhausted = outcome.exhausted().unwrap();
    assert_eq!(exhausted.reason, TerminationReason::IterationLimit);
    assert_eq!(exhausted.iterations_used, 5);
    assert_eq!(
        exhausted.partial.len() + exhausted.unassigned_session_ids.len(),
        16
    );
    assert!(SolutionEvaluator::evaluate(&model, &exhausted.partial)
        .hard_violations
        .iter()
        .all(|v| v.violation_type == ViolationType::Unassigned));
}

#[test]
fn wall_clock_budget_stops_hopeless_search() {
    // Thirteen lectures for one instructor, twelve disjoint hours.
    let sessions = (0..13)
        .map(|i| Session::new(format!("L{i:02}"), "MA201", DeliveryType::Lecture).with_enrolled(20))
        .collect();
    let timeslots = (0..12)
        .map(|i| slot(&format!("H{i:02}"), Weekday::Wednesday, 8 + i, 0, 50))
        .collect();
    let model = build(
        sessions,
        vec![Room::classroom("R1", 30), Room::classroom("R2", 30)],
        timeslots,
        vec![Instructor::new("SOLO").with_qualification("MA201")],
        SoftConstraintConfig::default(),
    )
    .unwrap();

    let config = deterministic()
        .with_max_iterations(u64::MAX)
        .with_time_limit_ms(50);
    let outcome = solve(&model, &config).unwrap();
    let exhausted = outcome.exhausted().unwrap();
    assert_eq!(exhausted.reason, TerminationReason::TimeLimit);
    assert!(!exhausted.unassigned_session_ids.is_empty());
    assert_eq!(
        exhausted.partial.len() + exhausted.unassigned_session_ids.len(),
        13
    );
    assert!(SolutionEvaluator::evaluate(&model, &exhausted.partial)
        .hard_violations
        .iter()
        .all(|v| v.violation_type == ViolationType::Unassigned));

    match outcome.into_result() {
        Err(err @ TimetableError::SearchExhausted(_)) => assert!(err.is_retryable()),
        other => panic!("expected SearchExhausted, got {other:?}"),
    }
}
