pub type Valuation = Vec<bool>;

/// Outcome of a MaxSAT search. `Satisfiable` carries the optimum model
/// together with the total weight of violated soft clauses.
#[derive(Clone, PartialEq, Eq)]
pub enum MaxSatSolution {
    Satisfiable { model: Valuation, cost: u64 },
    Unsatisfiable,
    Unknown,
}

impl MaxSatSolution {
    pub fn is_sat(&self) -> bool {
        match self {
            MaxSatSolution::Satisfiable { .. } => true,
            _ => false,
        }
    }

    pub fn is_unsat(&self) -> bool {
        match self {
            MaxSatSolution::Unsatisfiable => true,
            _ => false,
        }
    }

    pub fn is_unknown(&self) -> bool {
        match self {
            MaxSatSolution::Unknown => true,
            _ => false,
        }
    }

    pub fn cost(&self) -> Option<u64> {
        match self {
            MaxSatSolution::Satisfiable { cost, .. } => Some(*cost),
            _ => None,
        }
    }

    pub fn model(&self) -> Option<&Valuation> {
        match self {
            MaxSatSolution::Satisfiable { model, .. } => Some(model),
            _ => None,
        }
    }

    /// Renders the solution in the MaxSAT-evaluation output style
    pub fn to_dimacs(&self) -> String {
        match self {
            MaxSatSolution::Unsatisfiable => "s UNSATISFIABLE\n".to_string(),
            MaxSatSolution::Unknown => "s UNKNOWN\n".to_string(),
            MaxSatSolution::Satisfiable { model, cost } => {
                format!(
                    "o {}\ns OPTIMUM FOUND\nv {} 0\n",
                    cost,
                    model
                        .iter()
                        .enumerate()
                        .map(|(id, sign)| {
                            format!("{}{}", if *sign { "" } else { "-" }, id + 1)
                        })
                        .collect::<Vec<String>>()
                        .join(" ")
                )
            }
        }
    }
}

impl std::fmt::Debug for MaxSatSolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_dimacs())
    }
}
