use std::collections::HashMap;

use thiserror::Error;

use maxsat::Weight;

use crate::data::{
    Classroom, Course, Data, Instructor, MinorLabel, Program, ProgramRole, Segment, Slot,
};
use crate::rules::{RuleTag, Weights};

/// Fatal configuration errors, each carrying the offending symbol and
/// line
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("line {line}: unknown section {name:?}")]
    UnknownSection { name: String, line: usize },

    #[error("line {line}: record outside of any section")]
    RecordOutsideSection { line: usize },

    #[error("line {line}: expected {expected}, found {found} fields")]
    WrongFieldCount {
        line: usize,
        expected: &'static str,
        found: usize,
    },

    #[error("line {line}: could not parse number {text:?}")]
    BadNumber { line: usize, text: String },

    #[error("line {line}: unknown flag {text:?}, expected {expected:?} or \"-\"")]
    BadFlag {
        line: usize,
        text: String,
        expected: &'static str,
    },

    #[error("line {line}: unknown program role {text:?}")]
    BadRole { line: usize, text: String },

    #[error("line {line}: {kind} {name:?} does not exist")]
    UnknownName {
        kind: &'static str,
        name: String,
        line: usize,
    },

    #[error("line {line}: unknown weight tag {name:?}")]
    UnknownWeightTag { name: String, line: usize },

    #[error("line {line}: duplicate weight tag {name}")]
    DuplicateWeightTag { name: &'static str, line: usize },

    #[error("no weight configured for rule {0}")]
    MissingWeightTag(RuleTag),

    #[error("required domain {0} is empty")]
    EmptyDomain(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Slots,
    Classrooms,
    Instructors,
    Segments,
    Programs,
    Minors,
    WeightTable,
}

/// Everything the fields descriptor supplies: the value collections of
/// all six fields plus the weight of every predefined rule
#[derive(Debug)]
pub struct FieldsDescriptor {
    pub slots: Vec<Slot>,
    pub classrooms: Vec<Classroom>,
    pub instructors: Vec<Instructor>,
    pub segments: Vec<Segment>,
    pub programs: Vec<Program>,
    pub minor_labels: Vec<MinorLabel>,
    pub weights: Weights,
}

/// Strips the comment tail and surrounding whitespace
fn significant(line: &str) -> &str {
    line.split('#').next().unwrap_or("").trim()
}

fn parse_flag(token: &str, expected: &'static str, line: usize) -> Result<bool, LoaderError> {
    if token == expected {
        Ok(true)
    } else if token == "-" {
        Ok(false)
    } else {
        Err(LoaderError::BadFlag {
            line,
            text: token.to_string(),
            expected,
        })
    }
}

fn parse_number(token: &str, line: usize) -> Result<u32, LoaderError> {
    token.parse::<u32>().map_err(|_| LoaderError::BadNumber {
        line,
        text: token.to_string(),
    })
}

/// Parses the fields descriptor (see SPEC_FULL §6.1 for the format)
pub fn parse_fields(input: &str) -> Result<FieldsDescriptor, LoaderError> {
    let mut slots = Vec::new();
    let mut classrooms = Vec::new();
    let mut instructors = Vec::new();
    let mut segments = Vec::new();
    let mut programs = Vec::new();
    let mut minor_labels = Vec::new();
    let mut weight_map: HashMap<RuleTag, Weight> = HashMap::new();

    let mut section: Option<Section> = None;

    for (line_text, line) in input.lines().zip(1..) {
        let record = significant(line_text);
        if record.is_empty() {
            continue;
        }

        if let Some(name) = record.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
            section = Some(match name {
                "slots" => Section::Slots,
                "classrooms" => Section::Classrooms,
                "instructors" => Section::Instructors,
                "segments" => Section::Segments,
                "programs" => Section::Programs,
                "minors" => Section::Minors,
                "weights" => Section::WeightTable,
                _ => {
                    return Err(LoaderError::UnknownSection {
                        name: name.to_string(),
                        line,
                    })
                }
            });
            continue;
        }

        let fields: Vec<&str> = record.split_whitespace().collect();
        match section.ok_or(LoaderError::RecordOutsideSection { line })? {
            Section::Slots => {
                if fields.len() != 3 {
                    return Err(LoaderError::WrongFieldCount {
                        line,
                        expected: "3 (name, minor flag, morning flag)",
                        found: fields.len(),
                    });
                }
                slots.push(Slot {
                    name: fields[0].to_string(),
                    is_minor: parse_flag(fields[1], "minor", line)?,
                    is_morning: parse_flag(fields[2], "morning", line)?,
                });
            }
            Section::Classrooms => {
                if fields.len() != 1 {
                    return Err(LoaderError::WrongFieldCount {
                        line,
                        expected: "1 (name)",
                        found: fields.len(),
                    });
                }
                classrooms.push(Classroom {
                    name: fields[0].to_string(),
                });
            }
            Section::Instructors => {
                if fields.len() != 1 {
                    return Err(LoaderError::WrongFieldCount {
                        line,
                        expected: "1 (name)",
                        found: fields.len(),
                    });
                }
                instructors.push(Instructor {
                    name: fields[0].to_string(),
                });
            }
            Section::Segments => {
                if fields.len() != 3 {
                    return Err(LoaderError::WrongFieldCount {
                        line,
                        expected: "3 (name, first period, last period)",
                        found: fields.len(),
                    });
                }
                segments.push(Segment {
                    name: fields[0].to_string(),
                    start: parse_number(fields[1], line)?,
                    end: parse_number(fields[2], line)?,
                });
            }
            Section::Programs => {
                if fields.len() != 2 {
                    return Err(LoaderError::WrongFieldCount {
                        line,
                        expected: "2 (name, role)",
                        found: fields.len(),
                    });
                }
                let role = match fields[1] {
                    "core" => ProgramRole::Core,
                    "elective" => ProgramRole::Elective,
                    other => {
                        return Err(LoaderError::BadRole {
                            line,
                            text: other.to_string(),
                        })
                    }
                };
                programs.push(Program {
                    name: fields[0].to_string(),
                    role,
                });
            }
            Section::Minors => {
                if fields.len() != 2 {
                    return Err(LoaderError::WrongFieldCount {
                        line,
                        expected: "2 (name, minor flag)",
                        found: fields.len(),
                    });
                }
                minor_labels.push(MinorLabel {
                    name: fields[0].to_string(),
                    is_minor: parse_flag(fields[1], "minor", line)?,
                });
            }
            Section::WeightTable => {
                if fields.len() != 2 {
                    return Err(LoaderError::WrongFieldCount {
                        line,
                        expected: "2 (tag, weight)",
                        found: fields.len(),
                    });
                }
                let tag =
                    RuleTag::from_name(fields[0]).ok_or_else(|| LoaderError::UnknownWeightTag {
                        name: fields[0].to_string(),
                        line,
                    })?;
                let weight = fields[1]
                    .parse::<i64>()
                    .map(Weight::from_integer)
                    .map_err(|_| LoaderError::BadNumber {
                        line,
                        text: fields[1].to_string(),
                    })?;
                if weight_map.insert(tag, weight).is_some() {
                    return Err(LoaderError::DuplicateWeightTag {
                        name: tag.name(),
                        line,
                    });
                }
            }
        }
    }

    if slots.is_empty() {
        return Err(LoaderError::EmptyDomain("slots"));
    }
    if classrooms.is_empty() {
        return Err(LoaderError::EmptyDomain("classrooms"));
    }
    if instructors.is_empty() {
        return Err(LoaderError::EmptyDomain("instructors"));
    }
    if segments.is_empty() {
        return Err(LoaderError::EmptyDomain("segments"));
    }
    if minor_labels.is_empty() {
        return Err(LoaderError::EmptyDomain("minors"));
    }
    let weights = Weights::from_map(&weight_map).map_err(LoaderError::MissingWeightTag)?;

    Ok(FieldsDescriptor {
        slots,
        classrooms,
        instructors,
        segments,
        programs,
        minor_labels,
        weights,
    })
}

fn find<T>(
    items: &[T],
    name: &str,
    kind: &'static str,
    line: usize,
    by: impl Fn(&T) -> &str,
) -> Result<usize, LoaderError> {
    items
        .iter()
        .position(|item| by(item) == name)
        .ok_or_else(|| LoaderError::UnknownName {
            kind,
            name: name.to_string(),
            line,
        })
}

/// Parses the courses table against an already-parsed descriptor
pub fn parse_courses(
    input: &str,
    descriptor: &FieldsDescriptor,
) -> Result<Vec<Course>, LoaderError> {
    let mut courses = Vec::new();

    for (line_text, line) in input.lines().zip(1..) {
        let record = significant(line_text);
        if record.is_empty() {
            continue;
        }

        let columns: Vec<&str> = record.split(',').map(str::trim).collect();
        if columns.len() != 6 {
            return Err(LoaderError::WrongFieldCount {
                line,
                expected: "6 (name, classroom, instructor, segment, minor, programs)",
                found: columns.len(),
            });
        }

        let mut program_entries = Vec::new();
        if !columns[5].is_empty() {
            for item in columns[5].split(';') {
                let (name, role_text) =
                    item.split_once(':')
                        .ok_or_else(|| LoaderError::BadRole {
                            line,
                            text: item.to_string(),
                        })?;
                let role = match role_text.trim() {
                    "core" => ProgramRole::Core,
                    "elective" => ProgramRole::Elective,
                    other => {
                        return Err(LoaderError::BadRole {
                            line,
                            text: other.to_string(),
                        })
                    }
                };
                let name = name.trim();
                let index = descriptor
                    .programs
                    .iter()
                    .position(|p| p.name == name && p.role == role)
                    .ok_or_else(|| LoaderError::UnknownName {
                        kind: "Program",
                        name: format!("{} {}", name, role),
                        line,
                    })?;
                program_entries.push(index);
            }
        }

        courses.push(Course {
            name: columns[0].to_string(),
            classroom: find(&descriptor.classrooms, columns[1], "Classroom", line, |c| {
                &c.name
            })?,
            instructor: find(
                &descriptor.instructors,
                columns[2],
                "Instructor",
                line,
                |i| &i.name,
            )?,
            segment: find(&descriptor.segments, columns[3], "Segment", line, |s| {
                &s.name
            })?,
            minor_label: find(&descriptor.minor_labels, columns[4], "IsMinor", line, |m| {
                &m.name
            })?,
            programs: program_entries,
        });
    }

    Ok(courses)
}

/// Loads both input files into the registry and the weight table
pub fn load(fields_text: &str, courses_text: &str) -> Result<(Data, Weights), LoaderError> {
    let descriptor = parse_fields(fields_text)?;
    let courses = parse_courses(courses_text, &descriptor)?;
    log::info!(
        "loaded {} courses, {} slots, {} classrooms, {} instructors, {} segments, {} programs",
        courses.len(),
        descriptor.slots.len(),
        descriptor.classrooms.len(),
        descriptor.instructors.len(),
        descriptor.segments.len(),
        descriptor.programs.len(),
    );
    let FieldsDescriptor {
        slots,
        classrooms,
        instructors,
        segments,
        programs,
        minor_labels,
        weights,
    } = descriptor;
    let data = Data::new(
        courses,
        instructors,
        classrooms,
        slots,
        segments,
        programs,
        minor_labels,
    );
    Ok((data, weights))
}
