mod entities;
/// Parsing of the fields descriptor and the courses table
pub mod loader;

pub use entities::{
    Classroom, Course, Data, FieldType, Instructor, MinorLabel, Program, ProgramRole, Segment,
    Slot,
};

#[cfg(test)]
pub(crate) mod test_fixtures {
    use super::*;

    fn named(name: &str) -> String {
        name.to_string()
    }

    /// A registry small enough for exhaustive truth-table checks but
    /// covering every entity kind
    pub fn small_data() -> Data {
        let slots = vec![
            Slot {
                name: named("S1"),
                is_minor: false,
                is_morning: true,
            },
            Slot {
                name: named("S2"),
                is_minor: false,
                is_morning: false,
            },
            Slot {
                name: named("M1"),
                is_minor: true,
                is_morning: false,
            },
        ];
        let segments = vec![
            Segment {
                name: named("Full"),
                start: 1,
                end: 6,
            },
            Segment {
                name: named("FirstHalf"),
                start: 1,
                end: 3,
            },
            Segment {
                name: named("SecondHalf"),
                start: 4,
                end: 6,
            },
        ];
        let programs = vec![
            Program {
                name: named("CSE"),
                role: ProgramRole::Core,
            },
            Program {
                name: named("CSE"),
                role: ProgramRole::Elective,
            },
            Program {
                name: named("EE"),
                role: ProgramRole::Core,
            },
            Program {
                name: named("EE"),
                role: ProgramRole::Elective,
            },
        ];
        let courses = vec![
            Course {
                name: named("C1"),
                classroom: 0,
                instructor: 0,
                segment: 0,
                minor_label: 0,
                programs: vec![0],
            },
            Course {
                name: named("C2"),
                classroom: 1,
                instructor: 1,
                segment: 1,
                minor_label: 0,
                programs: vec![1, 2],
            },
        ];
        Data::new(
            courses,
            vec![
                Instructor { name: named("I1") },
                Instructor { name: named("I2") },
            ],
            vec![
                Classroom { name: named("R1") },
                Classroom { name: named("R2") },
            ],
            slots,
            segments,
            programs,
            vec![
                MinorLabel {
                    name: named("No"),
                    is_minor: false,
                },
                MinorLabel {
                    name: named("Yes"),
                    is_minor: true,
                },
            ],
        )
    }
}
