/// The CNF representation of clause fragments and the fragment algebra
pub mod cnf;
/// The cadical-backed MaxSAT engine
mod cadical_backend;
/// The buffered weighted-clause front of the backend
mod facade;
/// Module that specifies the output of a solver
mod solution;
/// The backend trait which has to be implemented by each MaxSAT engine
pub mod solver;

pub use cadical_backend::CadicalSolver;
pub use cnf::{CNFClause, CNFVar, VarId, CNF};
pub use facade::{ClauseDatabase, Weight};
pub use solution::{MaxSatSolution, Valuation};
pub use solver::MaxSatSolver;
