use crate::cnf::{CNFClause, VarId};
use crate::solution::MaxSatSolution;

/// Contract every pluggable MaxSAT engine has to satisfy. Variables are
/// registered up front, clauses are submitted as hard or weighted-soft,
/// `solve` runs the search, and `value` reads the model afterwards.
pub trait MaxSatSolver {
    /// Registers a fresh variable and returns its identifier
    fn new_var(&mut self) -> VarId;

    /// Adds a clause every model must satisfy
    fn add_hard_clause(&mut self, clause: &CNFClause);

    /// Adds a clause whose violation costs `weight`
    fn add_soft_clause(&mut self, clause: &CNFClause, weight: u64);

    /// Runs the MaxSAT search over everything submitted so far
    fn solve(&mut self) -> MaxSatSolution;

    /// Truth value of `id` in the model found by the last successful
    /// `solve`; `None` when unsolved or out of range
    fn value(&self, id: VarId) -> Option<bool>;
}
