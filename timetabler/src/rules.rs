use std::collections::HashMap;
use std::fmt;

use maxsat::{ClauseDatabase, MaxSatSolver, Weight, CNF};

use crate::data::FieldType;
use crate::encode::ConstraintEncoder;

/// Tags of the predefined rule set. Every tag must be assigned a
/// weight by the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleTag {
    InstructorSingleCourseAtATime,
    ClassroomSingleCourseAtATime,
    ProgramSingleCoreCourseAtATime,
    MinorInMinorTime,
    ProgramAtMostOneOfCoreOrElective,
    ExactlyOneSlotPerCourse,
    ExactlyOneClassroomPerCourse,
    ExactlyOneInstructorPerCourse,
    ExactlyOneIsMinorPerCourse,
    ExactlyOneSegmentPerCourse,
    CoreInMorningTime,
    ElectiveInNonMorningTime,
    ExistingAssignments,
    Witness,
}

impl RuleTag {
    pub const ALL: [RuleTag; 14] = [
        RuleTag::InstructorSingleCourseAtATime,
        RuleTag::ClassroomSingleCourseAtATime,
        RuleTag::ProgramSingleCoreCourseAtATime,
        RuleTag::MinorInMinorTime,
        RuleTag::ProgramAtMostOneOfCoreOrElective,
        RuleTag::ExactlyOneSlotPerCourse,
        RuleTag::ExactlyOneClassroomPerCourse,
        RuleTag::ExactlyOneInstructorPerCourse,
        RuleTag::ExactlyOneIsMinorPerCourse,
        RuleTag::ExactlyOneSegmentPerCourse,
        RuleTag::CoreInMorningTime,
        RuleTag::ElectiveInNonMorningTime,
        RuleTag::ExistingAssignments,
        RuleTag::Witness,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RuleTag::InstructorSingleCourseAtATime => "instructorSingleCourseAtATime",
            RuleTag::ClassroomSingleCourseAtATime => "classroomSingleCourseAtATime",
            RuleTag::ProgramSingleCoreCourseAtATime => "programSingleCoreCourseAtATime",
            RuleTag::MinorInMinorTime => "minorInMinorTime",
            RuleTag::ProgramAtMostOneOfCoreOrElective => "programAtMostOneOfCoreOrElective",
            RuleTag::ExactlyOneSlotPerCourse => "exactlyOneSlotPerCourse",
            RuleTag::ExactlyOneClassroomPerCourse => "exactlyOneClassroomPerCourse",
            RuleTag::ExactlyOneInstructorPerCourse => "exactlyOneInstructorPerCourse",
            RuleTag::ExactlyOneIsMinorPerCourse => "exactlyOneIsMinorPerCourse",
            RuleTag::ExactlyOneSegmentPerCourse => "exactlyOneSegmentPerCourse",
            RuleTag::CoreInMorningTime => "coreInMorningTime",
            RuleTag::ElectiveInNonMorningTime => "electiveInNonMorningTime",
            RuleTag::ExistingAssignments => "existingAssignments",
            RuleTag::Witness => "witness",
        }
    }

    pub fn from_name(name: &str) -> Option<RuleTag> {
        RuleTag::ALL.into_iter().find(|tag| tag.name() == name)
    }

    /// The exactly-one rule governing `field`
    pub fn exactly_one(field: FieldType) -> Option<RuleTag> {
        match field {
            FieldType::Slot => Some(RuleTag::ExactlyOneSlotPerCourse),
            FieldType::Classroom => Some(RuleTag::ExactlyOneClassroomPerCourse),
            FieldType::Instructor => Some(RuleTag::ExactlyOneInstructorPerCourse),
            FieldType::IsMinor => Some(RuleTag::ExactlyOneIsMinorPerCourse),
            FieldType::Segment => Some(RuleTag::ExactlyOneSegmentPerCourse),
            FieldType::Program => None,
        }
    }
}

impl fmt::Display for RuleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Total weight assignment for the predefined rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Weights([Weight; RuleTag::ALL.len()]);

impl Weights {
    /// Builds the table, rejecting incomplete maps with the first
    /// missing tag
    pub fn from_map(map: &HashMap<RuleTag, Weight>) -> Result<Weights, RuleTag> {
        let mut table = [Weight::Hard; RuleTag::ALL.len()];
        for tag in RuleTag::ALL {
            match map.get(&tag) {
                Some(weight) => table[tag as usize] = *weight,
                None => return Err(tag),
            }
        }
        Ok(Weights(table))
    }

    #[inline]
    pub fn get(&self, tag: RuleTag) -> Weight {
        self.0[tag as usize]
    }
}

/// Assembles the predefined rule catalogue and hands each rule to the
/// solver facade with its configured weight
pub struct ConstraintAdder<'a> {
    encoder: &'a ConstraintEncoder<'a>,
    weights: &'a Weights,
}

impl<'a> ConstraintAdder<'a> {
    pub fn new(encoder: &'a ConstraintEncoder<'a>, weights: &'a Weights) -> ConstraintAdder<'a> {
        ConstraintAdder { encoder, weights }
    }

    fn courses(&self) -> usize {
        self.encoder.data().courses.len()
    }

    /// Ordered course pairs with `i < j`; self-pairs are never encoded
    fn course_pairs(&self) -> impl Iterator<Item = (usize, usize)> {
        let n = self.courses();
        (0..n).flat_map(move |i| (i + 1..n).map(move |j| (i, j)))
    }

    /// *different value of `field` ∨ non-overlapping time*, for every
    /// course pair
    fn field_single_value_at_a_time(&self, field: FieldType) -> CNF {
        let mut result = CNF::empty();
        for (i, j) in self.course_pairs() {
            let antecedent = self.encoder.has_same_field_type_not_same_value(i, j, field);
            let consequent = self.encoder.not_intersecting_time(i, j);
            result = result.and(antecedent.or(consequent));
        }
        result
    }

    fn instructor_single_course_at_a_time(&self) -> CNF {
        self.field_single_value_at_a_time(FieldType::Instructor)
    }

    fn classroom_single_course_at_a_time(&self) -> CNF {
        self.field_single_value_at_a_time(FieldType::Classroom)
    }

    /// *no common core program ∨ non-overlapping time*; the antecedent
    /// is a constant fragment, so innocent pairs contribute nothing
    fn program_single_core_course_at_a_time(&self) -> CNF {
        let mut result = CNF::empty();
        for (i, j) in self.course_pairs() {
            let antecedent = self.encoder.has_no_common_core_program(i, j);
            let consequent = self.encoder.not_intersecting_time(i, j);
            result = result.and(antecedent.or(consequent));
        }
        result
    }

    /// *minor course ⇔ slot is a minor slot*, both implications
    fn minor_in_minor_time(&self) -> CNF {
        let mut result = CNF::empty();
        for course in 0..self.courses() {
            let minor = self.encoder.is_minor_course(course);
            let minor_time = self.encoder.slot_in_minor_time(course);
            result = result.and(minor.implies(minor_time.clone()));
            result = result.and(minor_time.implies(minor));
        }
        result
    }

    fn program_at_most_one_of_core_or_elective(&self) -> CNF {
        let mut result = CNF::empty();
        for course in 0..self.courses() {
            result = result.and(self.encoder.program_at_most_one_of_core_or_elective(course));
        }
        result
    }

    /// `H[c,F] ⇒ hasExactlyOneFieldValueTrue(c,F)` per course
    fn exactly_one_field_value_per_course(&self, field: FieldType) -> CNF {
        let mut result = CNF::empty();
        for course in 0..self.courses() {
            let witness = self.encoder.high_level_witness(course, field);
            let structure = self.encoder.has_exactly_one_field_value_true(course, field);
            result = result.and(witness.implies(structure));
        }
        result
    }

    /// The weighted unit clauses driving the witnesses true
    fn witness_units(&self) -> CNF {
        let mut result = CNF::empty();
        for course in 0..self.courses() {
            for field in FieldType::EXACTLY_ONE {
                result = result.and(self.encoder.high_level_witness(course, field));
            }
        }
        result
    }

    fn core_in_morning_time(&self) -> CNF {
        let mut result = CNF::empty();
        for course in 0..self.courses() {
            let core = self.encoder.is_core_course(course);
            let morning = self.encoder.course_in_morning_time(course);
            result = result.and(core.implies(morning));
        }
        result
    }

    fn elective_in_non_morning_time(&self) -> CNF {
        let mut result = CNF::empty();
        for course in 0..self.courses() {
            let elective = self.encoder.is_elective_course(course);
            let morning = self.encoder.course_in_morning_time(course);
            result = result.and(elective.implies(morning.not()));
        }
        result
    }

    fn existing_assignment_preferences(&self) -> CNF {
        let mut result = CNF::empty();
        for course in 0..self.courses() {
            result = result.and(self.encoder.existing_assignments(course));
        }
        result
    }

    /// Emits every predefined rule into the database, each as one
    /// batch under its own configured weight
    pub fn add_all<S: MaxSatSolver>(&self, database: &mut ClauseDatabase<S>) {
        let mut submit = |tag: RuleTag, fragment: CNF| {
            log::debug!("rule {}: {} clauses", tag, fragment.len());
            database.add(fragment, self.weights.get(tag));
        };

        submit(
            RuleTag::InstructorSingleCourseAtATime,
            self.instructor_single_course_at_a_time(),
        );
        submit(
            RuleTag::ClassroomSingleCourseAtATime,
            self.classroom_single_course_at_a_time(),
        );
        submit(
            RuleTag::ProgramSingleCoreCourseAtATime,
            self.program_single_core_course_at_a_time(),
        );
        submit(RuleTag::MinorInMinorTime, self.minor_in_minor_time());
        submit(
            RuleTag::ProgramAtMostOneOfCoreOrElective,
            self.program_at_most_one_of_core_or_elective(),
        );
        for field in FieldType::EXACTLY_ONE {
            let tag = match RuleTag::exactly_one(field) {
                Some(tag) => tag,
                None => continue,
            };
            submit(tag, self.exactly_one_field_value_per_course(field));
        }
        submit(RuleTag::CoreInMorningTime, self.core_in_morning_time());
        submit(
            RuleTag::ElectiveInNonMorningTime,
            self.elective_in_non_morning_time(),
        );
        submit(
            RuleTag::ExistingAssignments,
            self.existing_assignment_preferences(),
        );
        submit(RuleTag::Witness, self.witness_units());
    }
}
