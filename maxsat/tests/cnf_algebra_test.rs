use proptest::{bool::weighted, collection::vec, prelude::*};

use maxsat::{CNFClause, CNFVar, CNF};

const NUM_VARIABLES: usize = 5;

fn build_cnf(clauses: Vec<Vec<(usize, bool)>>) -> CNF {
    clauses
        .iter()
        .map(|clause| {
            clause
                .iter()
                .map(|(id, sign)| CNFVar::new(*id, *sign))
                .collect::<CNFClause>()
        })
        .collect()
}

/// Strategy for formulae small enough that `not` (a distributive
/// de Morgan expansion) stays tractable even when applied twice
fn small_formula() -> impl Strategy<Value = CNF> {
    vec(vec((1..=NUM_VARIABLES, weighted(0.5)), 1..=2), 0..=2).prop_map(build_cnf)
}

fn formula() -> impl Strategy<Value = CNF> {
    vec(vec((1..=NUM_VARIABLES, weighted(0.5)), 1..=3), 0..=3).prop_map(build_cnf)
}

fn assignments() -> impl Iterator<Item = Vec<bool>> {
    (0..1usize << NUM_VARIABLES)
        .map(|bits| (0..NUM_VARIABLES).map(|v| bits & (1 << v) != 0).collect())
}

fn equivalent(left: &CNF, right: &CNF) -> bool {
    assignments().all(|assignment| left.evaluate(&assignment) == right.evaluate(&assignment))
}

proptest! {
    #[test]
    fn and_is_conjunction(a in formula(), b in formula()) {
        let joined = a.clone().and(b.clone());
        for assignment in assignments() {
            prop_assert_eq!(
                joined.evaluate(&assignment),
                a.evaluate(&assignment) && b.evaluate(&assignment)
            );
        }
    }

    #[test]
    fn or_is_disjunction(a in formula(), b in formula()) {
        let joined = a.clone().or(b.clone());
        for assignment in assignments() {
            prop_assert_eq!(
                joined.evaluate(&assignment),
                a.evaluate(&assignment) || b.evaluate(&assignment)
            );
        }
    }

    #[test]
    fn not_is_negation(a in small_formula()) {
        let negated = a.not();
        for assignment in assignments() {
            prop_assert_eq!(negated.evaluate(&assignment), !a.evaluate(&assignment));
        }
    }

    #[test]
    fn double_negation_preserves_semantics(a in small_formula()) {
        prop_assert!(equivalent(&a.not().not(), &a));
    }

    #[test]
    fn implication_matches_its_definition(a in small_formula(), b in formula()) {
        let implication = a.implies(b.clone());
        let definition = a.not().or(b.clone());
        prop_assert!(equivalent(&implication, &definition));
        for assignment in assignments() {
            prop_assert_eq!(
                implication.evaluate(&assignment),
                !a.evaluate(&assignment) || b.evaluate(&assignment)
            );
        }
    }

    #[test]
    fn disjunction_commutes_semantically(a in formula(), b in formula()) {
        prop_assert!(equivalent(&a.clone().or(b.clone()), &b.or(a)));
    }
}
