use std::collections::HashSet;

use proptest::prelude::*;

use timetabler::data::{
    Classroom, Course, Data, Instructor, MinorLabel, Program, ProgramRole, Segment, Slot,
};
use timetabler::{FieldType, VarAllocator};

/// A registry with the requested collection sizes and throwaway names
fn synthetic(
    courses: usize,
    slots: usize,
    classrooms: usize,
    instructors: usize,
    segments: usize,
    programs: usize,
    labels: usize,
) -> Data {
    Data::new(
        (0..courses)
            .map(|i| Course {
                name: format!("C{}", i),
                classroom: 0,
                instructor: 0,
                segment: 0,
                minor_label: 0,
                programs: Vec::new(),
            })
            .collect(),
        (0..instructors)
            .map(|i| Instructor {
                name: format!("I{}", i),
            })
            .collect(),
        (0..classrooms)
            .map(|i| Classroom {
                name: format!("R{}", i),
            })
            .collect(),
        (0..slots)
            .map(|i| Slot {
                name: format!("S{}", i),
                is_minor: i % 2 == 0,
                is_morning: i % 3 == 0,
            })
            .collect(),
        (0..segments)
            .map(|i| Segment {
                name: format!("G{}", i),
                start: i as u32,
                end: i as u32 + 1,
            })
            .collect(),
        (0..programs)
            .map(|i| Program {
                name: format!("P{}", i / 2),
                role: if i % 2 == 0 {
                    ProgramRole::Core
                } else {
                    ProgramRole::Elective
                },
            })
            .collect(),
        (0..labels)
            .map(|i| MinorLabel {
                name: format!("L{}", i),
                is_minor: i == 1,
            })
            .collect(),
    )
}

proptest! {
    #[test]
    fn identifiers_are_dense_unique_and_block_ordered(
        courses in 0..4usize,
        slots in 0..4usize,
        classrooms in 0..3usize,
        instructors in 0..3usize,
        segments in 0..3usize,
        programs in 0..4usize,
        labels in 0..3usize,
    ) {
        let data = synthetic(
            courses, slots, classrooms, instructors, segments, programs, labels,
        );
        let vars = VarAllocator::allocate(&data);

        let mut seen = HashSet::new();
        let mut max_assign = 0;
        for course in 0..courses {
            for field in FieldType::ALL {
                for value in 0..data.field_cardinality(field) {
                    let id = vars.assign_var(course, field, value);
                    prop_assert!(id >= 1);
                    prop_assert!(seen.insert(id), "assignment id {} handed out twice", id);
                    max_assign = max_assign.max(id);
                }
            }
        }
        for course in 0..courses {
            for field in FieldType::ALL {
                let id = vars.high_var(course, field);
                prop_assert!(id > max_assign, "witness ids must follow all assignment ids");
                prop_assert!(seen.insert(id), "witness id {} handed out twice", id);
            }
        }

        prop_assert_eq!(seen.len(), vars.count());
        prop_assert_eq!(seen, (1..=vars.count()).collect::<HashSet<_>>());
    }

    #[test]
    fn allocation_is_deterministic(courses in 1..4usize, slots in 1..4usize) {
        let data = synthetic(courses, slots, 2, 2, 2, 2, 2);
        let first = VarAllocator::allocate(&data);
        let second = VarAllocator::allocate(&data);
        for course in 0..courses {
            for field in FieldType::ALL {
                prop_assert_eq!(first.high_var(course, field), second.high_var(course, field));
                for value in 0..data.field_cardinality(field) {
                    prop_assert_eq!(
                        first.assign_var(course, field, value),
                        second.assign_var(course, field, value)
                    );
                }
            }
        }
    }
}
