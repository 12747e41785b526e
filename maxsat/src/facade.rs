use crate::cnf::{CNF, VarId};
use crate::solution::MaxSatSolution;
use crate::solver::MaxSatSolver;

/// Weight of a submitted fragment. Following the configuration
/// convention of the input files and the DSL, any negative integer
/// denotes a hard constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Hard,
    Soft(u64),
}

impl Weight {
    pub fn from_integer(weight: i64) -> Weight {
        if weight < 0 {
            Weight::Hard
        } else {
            Weight::Soft(weight as u64)
        }
    }

    pub fn is_hard(&self) -> bool {
        matches!(self, Weight::Hard)
    }
}

/// Buffered front of a MaxSAT backend.
///
/// Fragments are collected together with their weights and converted
/// into the backend's clause representation exactly once, when `solve`
/// is called. Afterwards the model is served through `value`.
pub struct ClauseDatabase<S> {
    solver: S,
    buffer: Vec<(CNF, Weight)>,
}

impl<S: MaxSatSolver> ClauseDatabase<S> {
    pub fn new(solver: S) -> ClauseDatabase<S> {
        ClauseDatabase {
            solver,
            buffer: Vec::new(),
        }
    }

    /// Registers `count` fresh backend variables and returns the last
    /// identifier handed out
    pub fn register_vars(&mut self, count: usize) -> VarId {
        let mut last = 0;
        for _ in 0..count {
            last = self.solver.new_var();
        }
        last
    }

    /// Buffers a weighted fragment for later submission
    pub fn add(&mut self, fragment: CNF, weight: Weight) {
        self.buffer.push((fragment, weight));
    }

    /// Flushes the buffer into the backend and runs the search
    pub fn solve(&mut self) -> MaxSatSolution {
        let submissions = std::mem::take(&mut self.buffer);
        let mut hard = 0usize;
        let mut soft = 0usize;
        for (fragment, weight) in &submissions {
            for clause in &fragment.clauses {
                match weight {
                    Weight::Hard => {
                        self.solver.add_hard_clause(clause);
                        hard += 1;
                    }
                    Weight::Soft(w) => {
                        self.solver.add_soft_clause(clause, *w);
                        soft += 1;
                    }
                }
            }
        }
        log::info!("submitting {} hard and {} soft clauses", hard, soft);
        self.solver.solve()
    }

    /// Truth value of `id` in the last model
    pub fn value(&self, id: VarId) -> Option<bool> {
        self.solver.value(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cadical_backend::CadicalSolver;
    use crate::cnf::{CNFClause, CNFVar};

    #[test]
    fn hard_weight_from_negative_integer() {
        assert!(Weight::from_integer(-1).is_hard());
        assert_eq!(Weight::from_integer(7), Weight::Soft(7));
    }

    #[test]
    fn buffered_fragments_reach_the_backend() {
        let mut db = ClauseDatabase::new(CadicalSolver::new());
        db.register_vars(2);
        db.add(CNF::unit(CNFVar::pos(1)), Weight::Hard);
        db.add(
            CNF::single(CNFClause::single(CNFVar::neg(2))),
            Weight::Soft(4),
        );
        db.add(CNF::unit(CNFVar::pos(2)), Weight::Hard);
        let solution = db.solve();
        assert_eq!(solution.cost(), Some(4));
        assert_eq!(db.value(1), Some(true));
        assert_eq!(db.value(2), Some(true));
    }
}
