use itertools::Itertools;
use std::collections::HashSet;
use std::fmt;

/// Type used for referencing logical variables
pub type VarId = usize;

/// A clause fragment: a logical formula in CNF form (conjunction of
/// clauses). The empty fragment is the constant *true*; a fragment
/// holding a single empty clause is the constant *false*.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CNF {
    /// Vector of inner clauses
    pub clauses: Vec<CNFClause>,
}

/// Representation of a clause (disjunction of literals)
#[derive(Clone, Debug, Default, PartialEq, PartialOrd, Eq, Ord)]
pub struct CNFClause {
    /// Vector of inner literals, kept sorted and duplicate-free
    pub vars: Vec<CNFVar>,
}

/// Logical literal
#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Hash)]
pub struct CNFVar {
    /// Identifier of a variable
    pub id: VarId,
    /// Variable is negated iff `sign == false`
    pub sign: bool,
}

impl CNF {
    /// Creates an empty CNF formula (the constant true)
    #[inline]
    pub fn empty() -> CNF {
        CNF { clauses: Vec::new() }
    }

    /// Creates the unsatisfiable formula holding a single empty clause
    #[inline]
    pub fn contradiction() -> CNF {
        CNF {
            clauses: vec![CNFClause::new()],
        }
    }

    /// Creates a singleton CNF formula out of a single clause
    #[inline]
    pub fn single(clause: CNFClause) -> CNF {
        CNF {
            clauses: vec![clause],
        }
    }

    /// Creates a formula holding one unit clause
    #[inline]
    pub fn unit(var: CNFVar) -> CNF {
        CNF::single(CNFClause::single(var))
    }

    /// Adds a new clause to the formula
    #[inline]
    pub fn push(&mut self, c: CNFClause) {
        self.clauses.push(c);
    }

    /// Returns number of clauses in the formula
    #[inline]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Checks whether the formula is the constant true
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Collects all variable identifiers that appear in the formula
    #[inline]
    pub fn vars(&self) -> HashSet<VarId> {
        self.clauses
            .iter()
            .flat_map(|clause| clause.vars.iter().map(CNFVar::id))
            .unique()
            .collect()
    }

    /// Conjunction: concatenation of the clause lists
    pub fn and(mut self, other: CNF) -> CNF {
        self.clauses.extend(other.clauses);
        self
    }

    /// Disjunction by distribution: every clause of `self` is unioned
    /// with every clause of `other`. A constant-true operand makes the
    /// result constant-true; the constant-false fragment is the
    /// identity. Use-sites keep both operands small.
    pub fn or(self, other: CNF) -> CNF {
        if self.is_empty() || other.is_empty() {
            return CNF::empty();
        }
        let mut clauses = Vec::with_capacity(self.len() * other.len());
        for left in &self.clauses {
            for right in &other.clauses {
                let mut merged = left.clone();
                merged.extend(right.clone());
                clauses.push(merged);
            }
        }
        CNF { clauses }
    }

    /// Negation by de Morgan expansion: `¬(⋀ Cᵢ)` becomes
    /// `⋁ᵢ ⋀_{l ∈ Cᵢ} ¬l`, re-distributed into CNF. Only applied to
    /// fragments whose disjunctive normal form is small.
    pub fn not(&self) -> CNF {
        let mut result = CNF::contradiction();
        for clause in &self.clauses {
            let negated_term: CNF = clause
                .vars
                .iter()
                .map(|literal| CNFClause::single(-*literal))
                .collect();
            result = result.or(negated_term);
        }
        result
    }

    /// Implication, defined as `¬self ∨ conclusion`
    pub fn implies(&self, conclusion: CNF) -> CNF {
        self.not().or(conclusion)
    }

    /// Evaluates the formula under a total assignment indexed by
    /// `id - 1`
    pub fn evaluate(&self, assignment: &[bool]) -> bool {
        self.clauses
            .iter()
            .all(|clause| clause.evaluate(assignment))
    }
}

impl FromIterator<CNFClause> for CNF {
    fn from_iter<I: IntoIterator<Item = CNFClause>>(iter: I) -> Self {
        CNF {
            clauses: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for CNF {
    type Item = CNFClause;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.clauses.into_iter()
    }
}

impl CNFClause {
    /// Creates an empty CNF clause
    #[inline]
    pub fn new() -> CNFClause {
        CNFClause { vars: Vec::new() }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> CNFClause {
        CNFClause {
            vars: Vec::with_capacity(capacity),
        }
    }

    /// Creates a CNF clause containing a single literal
    #[inline]
    pub fn single(var: CNFVar) -> CNFClause {
        CNFClause { vars: vec![var] }
    }

    /// Adds a single literal into the clause, keeping the literal list
    /// sorted and free of duplicates
    #[inline]
    pub fn push(&mut self, v: CNFVar) {
        match self.vars.binary_search(&v) {
            Ok(_) => {} // we could check for contradiction here
            Err(pos) => self.vars.insert(pos, v),
        }
    }

    /// Concatenates clauses
    #[inline]
    pub fn extend(&mut self, c: CNFClause) {
        self.vars.reserve(c.len());
        for v in c {
            self.push(v)
        }
    }

    /// Calculates number of literals in clause
    #[inline]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Evaluates the clause under a total assignment indexed by
    /// `id - 1`
    pub fn evaluate(&self, assignment: &[bool]) -> bool {
        self.vars
            .iter()
            .any(|var| !(assignment[var.id - 1] ^ var.sign))
    }
}

impl FromIterator<CNFVar> for CNFClause {
    fn from_iter<I: IntoIterator<Item = CNFVar>>(iter: I) -> Self {
        let mut clause = CNFClause::new();
        for var in iter {
            clause.push(var);
        }
        clause
    }
}

impl IntoIterator for CNFClause {
    type Item = CNFVar;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.vars.into_iter()
    }
}

impl CNFVar {
    /// Creates a literal with given identifier and positivity
    #[inline]
    pub fn new(id: VarId, sign: bool) -> CNFVar {
        CNFVar { id, sign }
    }

    /// Creates a positive literal with given identifier
    #[inline]
    pub fn pos(id: VarId) -> CNFVar {
        CNFVar { id, sign: true }
    }

    /// Creates a negative literal with given identifier
    #[inline]
    pub fn neg(id: VarId) -> CNFVar {
        CNFVar { id, sign: false }
    }

    /// Gets the identifier of a variable
    #[inline]
    pub fn id(&self) -> VarId {
        self.id
    }

    /// Checks if the literal is positive
    #[inline]
    pub fn sign(&self) -> bool {
        self.sign
    }

    /// Converts to signed integer. The absolute value indicates
    /// the identifier and sign states for positivity.
    ///
    /// **NOTE** it is not integer-overflow friendly.
    pub fn to_i32(&self) -> i32 {
        if self.sign {
            self.id as i32
        } else {
            -(self.id as i32)
        }
    }
}

impl std::ops::Neg for CNFVar {
    type Output = CNFVar;
    fn neg(mut self) -> Self::Output {
        self.sign = !self.sign;
        self
    }
}

impl From<CNFVar> for (VarId, bool) {
    fn from(lit: CNFVar) -> Self {
        (lit.id, lit.sign)
    }
}

impl fmt::Display for CNF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.clauses {
            writeln!(f, "{}", c)?;
        }
        write!(f, "")
    }
}

impl fmt::Display for CNFClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.vars {
            write!(f, "({})  ", c)?;
        }
        write!(f, "")
    }
}

impl fmt::Display for CNFVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_i32())
    }
}
