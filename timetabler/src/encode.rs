use itertools::Itertools;
use maxsat::{CNFClause, CNFVar, CNF};

use crate::data::{Data, FieldType, ProgramRole};
use crate::vars::VarAllocator;

/// Pure translation of semantic predicates over entity indices into
/// clause fragments. Reads the registry and the allocator, never the
/// solver.
pub struct ConstraintEncoder<'a> {
    data: &'a Data,
    vars: &'a VarAllocator,
}

impl<'a> ConstraintEncoder<'a> {
    pub fn new(data: &'a Data, vars: &'a VarAllocator) -> ConstraintEncoder<'a> {
        ConstraintEncoder { data, vars }
    }

    pub fn data(&self) -> &Data {
        self.data
    }

    #[inline]
    fn assign(&self, course: usize, field: FieldType, value: usize, sign: bool) -> CNFVar {
        CNFVar::new(self.vars.assign_var(course, field, value), sign)
    }

    /// Unit fragment holding the high-level witness `H[course, field]`
    pub fn high_level_witness(&self, course: usize, field: FieldType) -> CNF {
        CNF::unit(CNFVar::pos(self.vars.high_var(course, field)))
    }

    /// `⋁_v X[c,F,v]` together with the pairwise at-most-one clauses.
    /// An empty value domain yields the empty clause, so the anomaly
    /// stays visible to the solver.
    pub fn has_exactly_one_field_value_true(&self, course: usize, field: FieldType) -> CNF {
        let size = self.data.field_cardinality(field);
        let mut result = CNF::single(
            (0..size)
                .map(|value| self.assign(course, field, value, true))
                .collect(),
        );
        for (v1, v2) in (0..size).tuple_combinations() {
            let mut clause = CNFClause::with_capacity(2);
            clause.push(self.assign(course, field, v1, false));
            clause.push(self.assign(course, field, v2, false));
            result.push(clause);
        }
        result
    }

    /// `⋁_v (X[c₁,F,v] ∧ X[c₂,F,v])`, expanded by distribution. The
    /// result grows with 2^|F|; callers keep the field small.
    pub fn has_same_field_type_and_value(
        &self,
        first: usize,
        second: usize,
        field: FieldType,
    ) -> CNF {
        let size = self.data.field_cardinality(field);
        (0..size).fold(CNF::contradiction(), |acc, value| {
            let both = CNF::unit(self.assign(first, field, value, true))
                .and(CNF::unit(self.assign(second, field, value, true)));
            acc.or(both)
        })
    }

    /// Negation of [`Self::has_same_field_type_and_value`] in its
    /// polynomial form: `⋀_v (¬X[c₁,F,v] ∨ ¬X[c₂,F,v])`
    pub fn not_same_field_value(&self, first: usize, second: usize, field: FieldType) -> CNF {
        let size = self.data.field_cardinality(field);
        (0..size)
            .map(|value| {
                let mut clause = CNFClause::with_capacity(2);
                clause.push(self.assign(first, field, value, false));
                clause.push(self.assign(second, field, value, false));
                clause
            })
            .collect()
    }

    /// Both courses carry *some* value of `field` and the values
    /// disagree: `⋁_{v₁≠v₂} (X[c₁,F,v₁] ∧ X[c₂,F,v₂])`.
    ///
    /// Emitted as the equivalent polynomial CNF
    /// `(⋁_v a_v) ∧ (⋁_v b_v) ∧ ⋀_v (¬a_v ∨ ¬b_v ∨ ⋁_{w≠v}(a_w ∨ b_w))`
    /// instead of the exponential distribution of the definition.
    pub fn has_same_field_type_not_same_value(
        &self,
        first: usize,
        second: usize,
        field: FieldType,
    ) -> CNF {
        let size = self.data.field_cardinality(field);
        let mut result = CNF::single(
            (0..size)
                .map(|value| self.assign(first, field, value, true))
                .collect(),
        );
        result.push(
            (0..size)
                .map(|value| self.assign(second, field, value, true))
                .collect(),
        );
        for value in 0..size {
            let mut clause = CNFClause::new();
            clause.push(self.assign(first, field, value, false));
            clause.push(self.assign(second, field, value, false));
            for other in (0..size).filter(|&other| other != value) {
                clause.push(self.assign(first, field, other, true));
                clause.push(self.assign(second, field, other, true));
            }
            result.push(clause);
        }
        result
    }

    /// `⋁_{v ∈ values} X[c,F,v]`; the empty list yields the empty
    /// clause
    pub fn has_field_type_listed_values(
        &self,
        course: usize,
        field: FieldType,
        values: &[usize],
    ) -> CNF {
        CNF::single(
            values
                .iter()
                .map(|&value| self.assign(course, field, value, true))
                .collect(),
        )
    }

    /// The chosen (slot, segment) pairs of the two courses never meet
    /// in real time: one blocking clause per slot and overlapping
    /// segment pair
    pub fn not_intersecting_time(&self, first: usize, second: usize) -> CNF {
        let slots = self.data.field_cardinality(FieldType::Slot);
        let segments = self.data.field_cardinality(FieldType::Segment);
        let mut result = CNF::empty();
        for slot in 0..slots {
            for (g1, g2) in (0..segments).cartesian_product(0..segments) {
                if !self.data.segments_overlap(g1, g2) {
                    continue;
                }
                let mut clause = CNFClause::with_capacity(4);
                clause.push(self.assign(first, FieldType::Slot, slot, false));
                clause.push(self.assign(first, FieldType::Segment, g1, false));
                clause.push(self.assign(second, FieldType::Slot, slot, false));
                clause.push(self.assign(second, FieldType::Segment, g2, false));
                result.push(clause);
            }
        }
        result
    }

    /// Constant fragment: true iff no program lists both courses as
    /// core. Decided entirely over static metadata.
    pub fn has_no_common_core_program(&self, first: usize, second: usize) -> CNF {
        let programs = &self.data.programs;
        let shared_core = self.data.courses[first]
            .programs_with_role(programs, ProgramRole::Core)
            .any(|p| self.data.courses[second].programs.contains(&p));
        if shared_core {
            CNF::contradiction()
        } else {
            CNF::empty()
        }
    }

    /// The single literal marking the course as minor; without a
    /// minor-flagged label the predicate is unsatisfiable
    pub fn is_minor_course(&self, course: usize) -> CNF {
        match self.data.minor_label_index() {
            Some(value) => CNF::unit(self.assign(course, FieldType::IsMinor, value, true)),
            None => CNF::contradiction(),
        }
    }

    fn in_declared_programs(&self, course: usize, role: ProgramRole) -> CNF {
        let values: Vec<usize> = self.data.courses[course]
            .programs_with_role(&self.data.programs, role)
            .collect();
        self.has_field_type_listed_values(course, FieldType::Program, &values)
    }

    pub fn is_core_course(&self, course: usize) -> CNF {
        self.in_declared_programs(course, ProgramRole::Core)
    }

    pub fn is_elective_course(&self, course: usize) -> CNF {
        self.in_declared_programs(course, ProgramRole::Elective)
    }

    fn slot_with<F: Fn(&crate::data::Slot) -> bool>(&self, course: usize, keep: F) -> CNF {
        let values: Vec<usize> = self
            .data
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| keep(slot))
            .map(|(value, _)| value)
            .collect();
        self.has_field_type_listed_values(course, FieldType::Slot, &values)
    }

    pub fn slot_in_minor_time(&self, course: usize) -> CNF {
        self.slot_with(course, |slot| slot.is_minor)
    }

    pub fn course_in_morning_time(&self, course: usize) -> CNF {
        self.slot_with(course, |slot| slot.is_morning)
    }

    /// For every base program with a core and an elective entry the
    /// course may take at most one of the two
    pub fn program_at_most_one_of_core_or_elective(&self, course: usize) -> CNF {
        let programs = &self.data.programs;
        let mut result = CNF::empty();
        for (core, elective) in (0..programs.len()).cartesian_product(0..programs.len()) {
            if programs[core].role == ProgramRole::Core
                && programs[elective].role == ProgramRole::Elective
                && programs[core].name == programs[elective].name
            {
                let mut clause = CNFClause::with_capacity(2);
                clause.push(self.assign(course, FieldType::Program, core, false));
                clause.push(self.assign(course, FieldType::Program, elective, false));
                result.push(clause);
            }
        }
        result
    }

    /// Unit literals pinning the course to its loaded default
    /// classroom, instructor, segment, minor-label and declared
    /// program entries
    pub fn existing_assignments(&self, course: usize) -> CNF {
        let loaded = &self.data.courses[course];
        let mut result = CNF::empty();
        result.push(CNFClause::single(self.assign(
            course,
            FieldType::Classroom,
            loaded.classroom,
            true,
        )));
        result.push(CNFClause::single(self.assign(
            course,
            FieldType::Instructor,
            loaded.instructor,
            true,
        )));
        result.push(CNFClause::single(self.assign(
            course,
            FieldType::Segment,
            loaded.segment,
            true,
        )));
        result.push(CNFClause::single(self.assign(
            course,
            FieldType::IsMinor,
            loaded.minor_label,
            true,
        )));
        for &program in &loaded.programs {
            result.push(CNFClause::single(self.assign(
                course,
                FieldType::Program,
                program,
                true,
            )));
        }
        result
    }
}
