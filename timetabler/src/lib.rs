/// The custom-constraint language front-end
pub mod custom;
/// Entities, the registry and the input-file loader
pub mod data;
/// Module mapping semantic predicates to clause fragments
pub mod encode;
/// The predefined rule catalogue and its weights
pub mod rules;
/// The compile-solve-decode driver
pub mod tabler;
/// Module that numbers the propositional variables
pub mod vars;

pub use custom::{parse_custom_constraints, CustomConstraintError};
pub use data::loader::{load, LoaderError};
pub use data::{Course, Data, FieldType, ProgramRole};
pub use encode::ConstraintEncoder;
pub use rules::{ConstraintAdder, RuleTag, Weights};
pub use tabler::{SolveOutcome, TimeTabler, Timetable};
pub use vars::VarAllocator;
