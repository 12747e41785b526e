use maxsat::VarId;

use crate::data::{Data, FieldType};

/// Dense, deterministic allocation of the propositional variables.
///
/// Assignment variables come first, ordered by course ascending, then
/// by field in the fixed `FieldType` enumeration, then by value
/// ascending. The high-level witness variables follow the whole
/// assignment block in the same course/field order. Identifiers start
/// at 1 and leave no gaps.
#[derive(Debug, Clone)]
pub struct VarAllocator {
    field_sizes: [usize; FieldType::ALL.len()],
    offsets: [usize; FieldType::ALL.len()],
    per_course: usize,
    num_courses: usize,
    high_base: usize,
}

impl VarAllocator {
    pub fn allocate(data: &Data) -> VarAllocator {
        let mut field_sizes = [0; FieldType::ALL.len()];
        let mut offsets = [0; FieldType::ALL.len()];
        let mut per_course = 0;
        for field in FieldType::ALL {
            offsets[field.index()] = per_course;
            field_sizes[field.index()] = data.field_cardinality(field);
            per_course += field_sizes[field.index()];
        }
        let num_courses = data.courses.len();
        VarAllocator {
            field_sizes,
            offsets,
            per_course,
            num_courses,
            high_base: num_courses * per_course,
        }
    }

    /// Identifier of the assignment variable `X[course, field, value]`
    #[inline]
    pub fn assign_var(&self, course: usize, field: FieldType, value: usize) -> VarId {
        debug_assert!(course < self.num_courses);
        debug_assert!(value < self.field_sizes[field.index()]);
        1 + course * self.per_course + self.offsets[field.index()] + value
    }

    /// Identifier of the high-level witness variable `H[course, field]`
    #[inline]
    pub fn high_var(&self, course: usize, field: FieldType) -> VarId {
        debug_assert!(course < self.num_courses);
        1 + self.high_base + course * FieldType::ALL.len() + field.index()
    }

    /// Number of values of `field`, as seen at allocation time
    #[inline]
    pub fn field_size(&self, field: FieldType) -> usize {
        self.field_sizes[field.index()]
    }

    /// Total number of allocated variables, reported to the solver
    #[inline]
    pub fn count(&self) -> usize {
        self.high_base + self.num_courses * FieldType::ALL.len()
    }
}
