use crate::cnf::{CNFClause, VarId};
use crate::solution::{MaxSatSolution, Valuation};
use crate::solver::MaxSatSolver;

/// MaxSAT engine on top of the cadical SAT solver.
///
/// Every soft clause gets a relaxation literal; the aggregate penalty
/// `Σ wᵢ·rᵢ` is bounded with a sequential weighted counter and the
/// bound is tightened by linear search until the instance turns
/// unsatisfiable, which proves the previously found model optimal.
pub struct CadicalSolver {
    num_vars: usize,
    hard: Vec<CNFClause>,
    soft: Vec<(CNFClause, u64)>,
    model: Option<Valuation>,
}

enum Attempt {
    Sat(Valuation),
    Unsat,
    Interrupted,
}

impl CadicalSolver {
    pub fn new() -> CadicalSolver {
        CadicalSolver {
            num_vars: 0,
            hard: Vec::new(),
            soft: Vec::new(),
            model: None,
        }
    }

    /// Total weight violated by `model`
    fn cost_of(&self, model: &Valuation) -> u64 {
        self.soft
            .iter()
            .filter(|(clause, _)| !clause.evaluate(model))
            .map(|(_, weight)| *weight)
            .sum()
    }

    /// One SAT call: hard clauses, relaxed soft clauses and the
    /// counter keeping `Σ wᵢ·rᵢ ≤ bound`
    fn attempt(&self, bound: u64) -> Attempt {
        let mut solver: cadical::Solver = Default::default();

        for clause in &self.hard {
            solver.add_clause(clause.vars.iter().map(|lit| lit.to_i32()));
        }

        let mut relax = Vec::with_capacity(self.soft.len());
        let mut weights = Vec::with_capacity(self.soft.len());
        let mut next_var = self.num_vars as i32;
        for (clause, weight) in self.soft.iter().filter(|(_, w)| *w > 0) {
            next_var += 1;
            relax.push(next_var);
            weights.push(*weight);
            solver.add_clause(
                clause
                    .vars
                    .iter()
                    .map(|lit| lit.to_i32())
                    .chain(std::iter::once(next_var)),
            );
        }

        encode_weighted_bound(&mut solver, &relax, &weights, bound, &mut next_var);

        match solver.solve() {
            None => Attempt::Interrupted,
            Some(false) => Attempt::Unsat,
            Some(true) => Attempt::Sat(
                (1..=self.num_vars)
                    .map(|variable| {
                        // an undecided variable can be chosen arbitrarily
                        solver.value(variable as i32).unwrap_or(true)
                    })
                    .collect(),
            ),
        }
    }
}

impl Default for CadicalSolver {
    fn default() -> Self {
        CadicalSolver::new()
    }
}

impl MaxSatSolver for CadicalSolver {
    fn new_var(&mut self) -> VarId {
        self.num_vars += 1;
        self.num_vars
    }

    fn add_hard_clause(&mut self, clause: &CNFClause) {
        self.hard.push(clause.clone());
    }

    fn add_soft_clause(&mut self, clause: &CNFClause, weight: u64) {
        self.soft.push((clause.clone(), weight));
    }

    fn solve(&mut self) -> MaxSatSolution {
        self.model = None;
        let mut bound: u64 = self
            .soft
            .iter()
            .map(|(_, weight)| *weight)
            .sum();
        let mut best: Option<(Valuation, u64)> = None;

        loop {
            match self.attempt(bound) {
                Attempt::Sat(model) => {
                    let cost = self.cost_of(&model);
                    log::debug!(
                        "maxsat model of cost {} within bound {}",
                        cost,
                        bound
                    );
                    let optimal = cost == 0;
                    best = Some((model, cost));
                    if optimal {
                        break;
                    }
                    bound = cost - 1;
                }
                Attempt::Unsat => break,
                Attempt::Interrupted => {
                    if best.is_none() {
                        return MaxSatSolution::Unknown;
                    }
                    break;
                }
            }
        }

        match best {
            Some((model, cost)) => {
                self.model = Some(model.clone());
                MaxSatSolution::Satisfiable { model, cost }
            }
            None => MaxSatSolution::Unsatisfiable,
        }
    }

    fn value(&self, id: VarId) -> Option<bool> {
        self.model
            .as_ref()
            .and_then(|model| model.get(id.checked_sub(1)?))
            .copied()
    }
}

/// Sequential weighted counter for `Σ wᵢ·xᵢ ≤ bound`.
///
/// Register `s(i,j)` (true ⇐ the first `i+1` inputs weigh at least
/// `j`) ladders the partial sums; taking an input whose weight would
/// push a prefix past the bound is forbidden.
fn encode_weighted_bound(
    solver: &mut cadical::Solver,
    inputs: &[i32],
    weights: &[u64],
    bound: u64,
    next_var: &mut i32,
) {
    let total: u64 = weights.iter().sum();
    if total <= bound {
        return;
    }
    if bound == 0 {
        for input in inputs {
            solver.add_clause(std::iter::once(-input));
        }
        return;
    }

    let k = bound as usize;
    let mut previous: Vec<i32> = Vec::new();

    for (i, (&input, &weight)) in inputs.iter().zip(weights).enumerate() {
        let w = weight as usize;

        if weight > bound {
            solver.add_clause(std::iter::once(-input));
        }

        let current: Vec<i32> = (0..k)
            .map(|_| {
                *next_var += 1;
                *next_var
            })
            .collect();

        // carry the prefix sums forward
        if i > 0 {
            for j in 0..k {
                solver.add_clause([-previous[j], current[j]].iter().copied());
            }
        }

        // taking this input alone reaches its own weight
        for j in 0..w.min(k) {
            solver.add_clause([-input, current[j]].iter().copied());
        }

        if i > 0 && w <= k {
            // adding w on top of a known prefix sum
            for j in 0..k - w {
                solver.add_clause([-input, -previous[j], current[j + w]].iter().copied());
            }
            // overflow: prefix of k+1-w plus this input exceeds the bound
            solver.add_clause([-input, -previous[k - w]].iter().copied());
        }

        previous = current;
    }
}
