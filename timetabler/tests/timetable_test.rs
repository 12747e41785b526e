use std::collections::HashMap;

use maxsat::{CadicalSolver, Weight};
use timetabler::data::{Classroom, Course, Data, Instructor, MinorLabel, Program, Segment, Slot};
use timetabler::{
    CustomConstraintError, FieldType, ProgramRole, RuleTag, SolveOutcome, TimeTabler, Weights,
};

fn slot(name: &str, is_minor: bool, is_morning: bool) -> Slot {
    Slot {
        name: name.to_string(),
        is_minor,
        is_morning,
    }
}

fn course(name: &str, classroom: usize, instructor: usize, minor_label: usize) -> Course {
    Course {
        name: name.to_string(),
        classroom,
        instructor,
        segment: 0,
        minor_label,
        programs: Vec::new(),
    }
}

/// Registry with one segment, the given slots/classrooms/instructors
/// and the usual No/Yes minor labels
fn registry(
    courses: Vec<Course>,
    slots: Vec<Slot>,
    classrooms: usize,
    instructors: usize,
    programs: Vec<Program>,
) -> Data {
    Data::new(
        courses,
        (1..=instructors)
            .map(|i| Instructor {
                name: format!("I{}", i),
            })
            .collect(),
        (1..=classrooms)
            .map(|i| Classroom {
                name: format!("R{}", i),
            })
            .collect(),
        slots,
        vec![Segment {
            name: "Full".to_string(),
            start: 1,
            end: 6,
        }],
        programs,
        vec![
            MinorLabel {
                name: "No".to_string(),
                is_minor: false,
            },
            MinorLabel {
                name: "Yes".to_string(),
                is_minor: true,
            },
        ],
    )
}

/// Hard structural rules, soft preferences, with per-test overrides
fn weights(overrides: &[(RuleTag, Weight)]) -> Weights {
    let mut map: HashMap<RuleTag, Weight> = RuleTag::ALL
        .into_iter()
        .map(|tag| {
            let weight = match tag {
                RuleTag::CoreInMorningTime => Weight::Soft(5),
                RuleTag::ElectiveInNonMorningTime => Weight::Soft(3),
                _ => Weight::Hard,
            };
            (tag, weight)
        })
        .collect();
    for (tag, weight) in overrides {
        map.insert(*tag, *weight);
    }
    Weights::from_map(&map).unwrap()
}

fn solve(data: Data, weights: &Weights, custom: Option<&str>) -> SolveOutcome {
    let mut tabler = TimeTabler::new(data, CadicalSolver::new());
    tabler.compile(weights);
    if let Some(input) = custom {
        tabler.add_custom(input).unwrap();
    }
    tabler.solve()
}

fn expect_solved(outcome: SolveOutcome) -> (timetabler::Timetable, u64) {
    match outcome {
        SolveOutcome::Solved { timetable, cost } => (timetable, cost),
        SolveOutcome::Infeasible => panic!("expected a model, got unsat"),
        SolveOutcome::Unknown => panic!("expected a model, got unknown"),
    }
}

#[test]
fn shared_instructor_forces_different_slots() {
    let data = registry(
        vec![course("C1", 0, 0, 0), course("C2", 0, 0, 0)],
        vec![slot("S1", false, false), slot("S2", false, false)],
        1,
        1,
        Vec::new(),
    );
    let (timetable, _) = expect_solved(solve(data, &weights(&[]), None));
    assert!(timetable.failed_witnesses.is_empty());
    let s1 = timetable.rows[0].slot.clone().unwrap();
    let s2 = timetable.rows[1].slot.clone().unwrap();
    assert_ne!(s1, s2);
}

#[test]
fn unavoidable_clash_is_unsat() {
    let data = registry(
        vec![course("C1", 0, 0, 0), course("C2", 0, 0, 0)],
        vec![slot("S1", false, false)],
        1,
        1,
        Vec::new(),
    );
    assert!(matches!(
        solve(data, &weights(&[]), None),
        SolveOutcome::Infeasible
    ));
}

#[test]
fn minor_course_lands_in_the_minor_slot() {
    let data = registry(
        vec![course("Cm", 0, 0, 1), course("Cn", 0, 0, 0)],
        vec![slot("M1", true, false), slot("S1", false, false)],
        1,
        1,
        Vec::new(),
    );
    let (timetable, _) = expect_solved(solve(data, &weights(&[]), None));
    assert_eq!(timetable.rows[0].slot.as_deref(), Some("M1"));
    assert_eq!(timetable.rows[1].slot.as_deref(), Some("S1"));
}

#[test]
fn core_course_prefers_the_morning_slot() {
    let mut core_course = course("C1", 0, 0, 0);
    core_course.programs = vec![0];
    let data = registry(
        vec![core_course],
        vec![slot("Morning", false, true), slot("Afternoon", false, false)],
        1,
        1,
        vec![
            Program {
                name: "CSE".to_string(),
                role: ProgramRole::Core,
            },
            Program {
                name: "CSE".to_string(),
                role: ProgramRole::Elective,
            },
        ],
    );
    let (timetable, cost) = expect_solved(solve(data, &weights(&[]), None));
    assert_eq!(timetable.rows[0].slot.as_deref(), Some("Morning"));
    assert_eq!(cost, 0);
}

fn same_slot_registry() -> Data {
    registry(
        vec![course("C1", 0, 0, 0), course("C2", 1, 0, 0)],
        vec![slot("S1", false, false), slot("S2", false, false)],
        2,
        1,
        Vec::new(),
    )
}

const SAME_SLOT_RULE: &str = "COURSE {C1,C2} INSTRUCTOR {I1} IN SLOT SAME WEIGHT -1";

#[test]
fn same_slot_request_clashes_with_the_instructor_rule() {
    assert!(matches!(
        solve(same_slot_registry(), &weights(&[]), Some(SAME_SLOT_RULE)),
        SolveOutcome::Infeasible
    ));
}

#[test]
fn same_slot_request_wins_once_the_instructor_rule_is_toothless() {
    let weights = weights(&[(RuleTag::InstructorSingleCourseAtATime, Weight::Soft(0))]);
    let (timetable, _) = expect_solved(solve(same_slot_registry(), &weights, Some(SAME_SLOT_RULE)));
    assert_eq!(timetable.rows[0].slot, timetable.rows[1].slot);
}

#[test]
fn unknown_course_in_custom_constraints_is_fatal() {
    let data = registry(
        vec![course("C1", 0, 0, 0)],
        vec![slot("S1", false, false)],
        1,
        1,
        Vec::new(),
    );
    let mut tabler = TimeTabler::new(data, CadicalSolver::new());
    tabler.compile(&weights(&[]));
    match tabler.add_custom("COURSE {Ghost} IN SLOT * WEIGHT 1") {
        Err(CustomConstraintError::UnknownName { kind, name, .. }) => {
            assert_eq!(kind, "Course");
            assert_eq!(name, "Ghost");
        }
        other => panic!("expected an unknown-name error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn empty_slot_domain_falsifies_the_witness() {
    let data = registry(
        vec![course("C1", 0, 0, 0)],
        Vec::new(),
        1,
        1,
        Vec::new(),
    );
    let weights = weights(&[(RuleTag::Witness, Weight::Soft(10))]);
    let (timetable, cost) = expect_solved(solve(data, &weights, None));
    assert_eq!(cost, 10);
    assert_eq!(timetable.rows[0].slot, None);
    assert_eq!(
        timetable.failed_witnesses,
        vec![("C1".to_string(), FieldType::Slot)]
    );
}

#[test]
fn the_shipped_demo_configuration_solves() {
    let (data, weights) = timetabler::load(
        include_str!("../../config/fields.txt"),
        include_str!("../../config/courses.txt"),
    )
    .unwrap();
    let outcome = solve(data, &weights, Some(include_str!("../../config/custom.txt")));
    let (timetable, _) = expect_solved(outcome);
    assert_eq!(timetable.rows.len(), 4);
    assert!(timetable.failed_witnesses.is_empty());
    // the two CSE offerings were kept apart by the custom rule
    assert_ne!(timetable.rows[0].slot, timetable.rows[1].slot);
    // the minor course sits in the only minor slot
    assert_eq!(timetable.rows[3].slot.as_deref(), Some("M1"));
}
