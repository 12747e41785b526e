use std::fmt;

/// The six classes of assignable course attributes. The declaration
/// order is the fixed enumeration used by the variable allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldType {
    Slot,
    Classroom,
    Instructor,
    Segment,
    IsMinor,
    Program,
}

impl FieldType {
    pub const ALL: [FieldType; 6] = [
        FieldType::Slot,
        FieldType::Classroom,
        FieldType::Instructor,
        FieldType::Segment,
        FieldType::IsMinor,
        FieldType::Program,
    ];

    /// Fields governed by a per-course exactly-one structural rule.
    /// Program membership is the one multi-valued field.
    pub const EXACTLY_ONE: [FieldType; 5] = [
        FieldType::Slot,
        FieldType::Classroom,
        FieldType::Instructor,
        FieldType::Segment,
        FieldType::IsMinor,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            FieldType::Slot => "slot",
            FieldType::Classroom => "classroom",
            FieldType::Instructor => "instructor",
            FieldType::Segment => "segment",
            FieldType::IsMinor => "isMinor",
            FieldType::Program => "program",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Role a program entry declares for the courses listed under it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramRole {
    Core,
    Elective,
}

impl ProgramRole {
    pub fn name(self) -> &'static str {
        match self {
            ProgramRole::Core => "core",
            ProgramRole::Elective => "elective",
        }
    }
}

impl fmt::Display for ProgramRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone)]
pub struct Instructor {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Classroom {
    pub name: String,
}

/// A lecture slot with its derived predicates
#[derive(Debug, Clone)]
pub struct Slot {
    pub name: String,
    pub is_minor: bool,
    pub is_morning: bool,
}

/// A part of the term, as a closed range of period indices
#[derive(Debug, Clone)]
pub struct Segment {
    pub name: String,
    pub start: u32,
    pub end: u32,
}

impl Segment {
    pub fn overlaps(&self, other: &Segment) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// One (base program, role) entry; each base program contributes a
/// core and an elective entry to the collection
#[derive(Debug, Clone)]
pub struct Program {
    pub name: String,
    pub role: ProgramRole,
}

impl Program {
    /// The qualified name used for lookups, e.g. `"CSE core"`
    pub fn name_with_role(&self) -> String {
        format!("{} {}", self.name, self.role)
    }
}

#[derive(Debug, Clone)]
pub struct MinorLabel {
    pub name: String,
    pub is_minor: bool,
}

/// A course together with its existing (default) assignment and the
/// program entries it belongs to
#[derive(Debug, Clone)]
pub struct Course {
    pub name: String,
    pub classroom: usize,
    pub instructor: usize,
    pub segment: usize,
    pub minor_label: usize,
    pub programs: Vec<usize>,
}

impl Course {
    /// Program entries declared for this course carrying `role`
    pub fn programs_with_role<'a>(
        &'a self,
        programs: &'a [Program],
        role: ProgramRole,
    ) -> impl Iterator<Item = usize> + 'a {
        self.programs
            .iter()
            .copied()
            .filter(move |&p| programs[p].role == role)
    }
}

/// The entity registry: every collection is indexed by its position
/// and never re-numbered after loading
#[derive(Debug, Clone)]
pub struct Data {
    pub courses: Vec<Course>,
    pub instructors: Vec<Instructor>,
    pub classrooms: Vec<Classroom>,
    pub slots: Vec<Slot>,
    pub segments: Vec<Segment>,
    pub programs: Vec<Program>,
    pub minor_labels: Vec<MinorLabel>,
    overlap: Vec<Vec<bool>>,
}

impl Data {
    pub fn new(
        courses: Vec<Course>,
        instructors: Vec<Instructor>,
        classrooms: Vec<Classroom>,
        slots: Vec<Slot>,
        segments: Vec<Segment>,
        programs: Vec<Program>,
        minor_labels: Vec<MinorLabel>,
    ) -> Data {
        let overlap = segments
            .iter()
            .map(|a| segments.iter().map(|b| a.overlaps(b)).collect())
            .collect();
        Data {
            courses,
            instructors,
            classrooms,
            slots,
            segments,
            programs,
            minor_labels,
            overlap,
        }
    }

    pub fn field_cardinality(&self, field: FieldType) -> usize {
        match field {
            FieldType::Slot => self.slots.len(),
            FieldType::Classroom => self.classrooms.len(),
            FieldType::Instructor => self.instructors.len(),
            FieldType::Segment => self.segments.len(),
            FieldType::IsMinor => self.minor_labels.len(),
            FieldType::Program => self.programs.len(),
        }
    }

    /// Precomputed symmetric reflexive overlap relation on segments
    pub fn segments_overlap(&self, a: usize, b: usize) -> bool {
        self.overlap[a][b]
    }

    /// Index of the minor-label that flags a course as minor
    pub fn minor_label_index(&self) -> Option<usize> {
        self.minor_labels.iter().position(|label| label.is_minor)
    }

    pub fn field_value_name(&self, field: FieldType, value: usize) -> String {
        match field {
            FieldType::Slot => self.slots[value].name.clone(),
            FieldType::Classroom => self.classrooms[value].name.clone(),
            FieldType::Instructor => self.instructors[value].name.clone(),
            FieldType::Segment => self.segments[value].name.clone(),
            FieldType::IsMinor => self.minor_labels[value].name.clone(),
            FieldType::Program => self.programs[value].name_with_role(),
        }
    }

    pub fn course_index(&self, name: &str) -> Option<usize> {
        self.courses.iter().position(|c| c.name == name)
    }

    /// Resolves a name against the value collection of `field`
    pub fn field_value_index(&self, field: FieldType, name: &str) -> Option<usize> {
        match field {
            FieldType::Slot => self.slots.iter().position(|s| s.name == name),
            FieldType::Classroom => self.classrooms.iter().position(|c| c.name == name),
            FieldType::Instructor => self.instructors.iter().position(|i| i.name == name),
            FieldType::Segment => self.segments.iter().position(|s| s.name == name),
            FieldType::IsMinor => self.minor_labels.iter().position(|l| l.name == name),
            FieldType::Program => self
                .programs
                .iter()
                .position(|p| p.name_with_role() == name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(name: &str, start: u32, end: u32) -> Segment {
        Segment {
            name: name.to_string(),
            start,
            end,
        }
    }

    #[test]
    fn segment_overlap_is_reflexive_and_symmetric() {
        let a = segment("a", 1, 3);
        let b = segment("b", 3, 4);
        let c = segment("c", 4, 6);
        assert!(a.overlaps(&a));
        assert!(a.overlaps(&b) && b.overlaps(&a));
        assert!(!a.overlaps(&c) && !c.overlaps(&a));
    }

    #[test]
    fn field_enumeration_is_stable() {
        let indices: Vec<usize> = FieldType::ALL.iter().map(|f| f.index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
    }
}
