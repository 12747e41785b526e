use std::fmt;

use maxsat::{ClauseDatabase, MaxSatSolver};

use crate::custom::{parse_custom_constraints, CustomConstraintError};
use crate::data::{Data, FieldType};
use crate::encode::ConstraintEncoder;
use crate::rules::{ConstraintAdder, Weights};
use crate::vars::VarAllocator;

/// Owns the registry, the allocator and the solver facade, and drives
/// the compile-solve-decode pipeline
pub struct TimeTabler<S> {
    data: Data,
    vars: VarAllocator,
    database: ClauseDatabase<S>,
}

/// Result of a solve, with the decoded timetable on success
pub enum SolveOutcome {
    Solved { timetable: Timetable, cost: u64 },
    Infeasible,
    Unknown,
}

/// Decoded assignment of one course
#[derive(Debug, Clone)]
pub struct CourseSchedule {
    pub course: String,
    pub slot: Option<String>,
    pub classroom: Option<String>,
    pub instructor: Option<String>,
    pub segment: Option<String>,
    pub minor_label: Option<String>,
    pub programs: Vec<String>,
}

/// The decoded model: one row per course plus every falsified
/// high-level witness
#[derive(Debug, Clone)]
pub struct Timetable {
    pub rows: Vec<CourseSchedule>,
    pub failed_witnesses: Vec<(String, FieldType)>,
}

impl<S: MaxSatSolver> TimeTabler<S> {
    /// Allocates the variables for `data` and registers them with the
    /// backend
    pub fn new(data: Data, solver: S) -> TimeTabler<S> {
        let vars = VarAllocator::allocate(&data);
        let mut database = ClauseDatabase::new(solver);
        database.register_vars(vars.count());
        log::debug!("allocated {} variables", vars.count());
        TimeTabler {
            data,
            vars,
            database,
        }
    }

    pub fn data(&self) -> &Data {
        &self.data
    }

    pub fn vars(&self) -> &VarAllocator {
        &self.vars
    }

    /// Emits the predefined rule catalogue into the clause database
    pub fn compile(&mut self, weights: &Weights) {
        let encoder = ConstraintEncoder::new(&self.data, &self.vars);
        ConstraintAdder::new(&encoder, weights).add_all(&mut self.database);
    }

    /// Parses a custom-constraint file and submits its weighted
    /// fragments
    pub fn add_custom(&mut self, input: &str) -> Result<usize, CustomConstraintError> {
        let encoder = ConstraintEncoder::new(&self.data, &self.vars);
        parse_custom_constraints(input, &encoder, &mut self.database)
    }

    /// Runs the MaxSAT search and decodes the model
    pub fn solve(&mut self) -> SolveOutcome {
        match self.database.solve() {
            maxsat::MaxSatSolution::Satisfiable { cost, .. } => SolveOutcome::Solved {
                timetable: self.decode(),
                cost,
            },
            maxsat::MaxSatSolution::Unsatisfiable => SolveOutcome::Infeasible,
            maxsat::MaxSatSolution::Unknown => SolveOutcome::Unknown,
        }
    }

    fn decoded_value(&self, course: usize, field: FieldType) -> Option<String> {
        (0..self.data.field_cardinality(field))
            .find(|&value| self.database.value(self.vars.assign_var(course, field, value))
                == Some(true))
            .map(|value| self.data.field_value_name(field, value))
    }

    fn decode(&self) -> Timetable {
        let rows = (0..self.data.courses.len())
            .map(|course| CourseSchedule {
                course: self.data.courses[course].name.clone(),
                slot: self.decoded_value(course, FieldType::Slot),
                classroom: self.decoded_value(course, FieldType::Classroom),
                instructor: self.decoded_value(course, FieldType::Instructor),
                segment: self.decoded_value(course, FieldType::Segment),
                minor_label: self.decoded_value(course, FieldType::IsMinor),
                programs: (0..self.data.field_cardinality(FieldType::Program))
                    .filter(|&value| {
                        self.database
                            .value(self.vars.assign_var(course, FieldType::Program, value))
                            == Some(true)
                    })
                    .map(|value| self.data.field_value_name(FieldType::Program, value))
                    .collect(),
            })
            .collect();

        let mut failed_witnesses = Vec::new();
        for course in 0..self.data.courses.len() {
            for field in FieldType::EXACTLY_ONE {
                if self.database.value(self.vars.high_var(course, field)) == Some(false) {
                    failed_witnesses.push((self.data.courses[course].name.clone(), field));
                }
            }
        }

        Timetable {
            rows,
            failed_witnesses,
        }
    }
}

fn cell(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

impl fmt::Display for Timetable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<12} {:<10} {:<12} {:<12} {:<12} {:<8} programs",
            "course", "slot", "classroom", "instructor", "segment", "minor"
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<12} {:<10} {:<12} {:<12} {:<12} {:<8} {}",
                row.course,
                cell(&row.slot),
                cell(&row.classroom),
                cell(&row.instructor),
                cell(&row.segment),
                cell(&row.minor_label),
                row.programs.join(", ")
            )?;
        }
        for (course, field) in &self.failed_witnesses {
            writeln!(
                f,
                "warning: the exactly-one rule for field {} could not be met for course {}",
                field, course
            )?;
        }
        Ok(())
    }
}
