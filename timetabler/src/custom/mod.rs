use pest::iterators::Pair;
use pest::Parser;
use thiserror::Error;

use maxsat::{ClauseDatabase, MaxSatSolver, Weight, CNF};

use crate::data::{Data, FieldType};
use crate::encode::ConstraintEncoder;

#[derive(pest_derive::Parser)]
#[grammar = "custom/constraint.pest"]
struct ConstraintParser;

/// Fatal failures of the custom-constraint front-end; every variant
/// carries the position the message points at
#[derive(Debug, Error)]
pub enum CustomConstraintError {
    #[error("error parsing custom constraints\n{0}")]
    Grammar(Box<pest::error::Error<Rule>>),

    #[error("line {line}, column {column}: {kind} {name:?} does not exist")]
    UnknownName {
        kind: &'static str,
        name: String,
        line: usize,
        column: usize,
    },

    #[error("line {line}, column {column}: SAME and NOTSAME are only valid on SLOT and CLASSROOM")]
    MisplacedSame { line: usize, column: usize },

    #[error("line {line}, column {column}: weight {text:?} is out of range")]
    WeightOutOfRange {
        line: usize,
        column: usize,
        text: String,
    },
}

/// How a `values` production resolved against the registry
enum ParsedValues {
    All,
    Listed(Vec<usize>),
    Same,
    NotSame,
}

/// Consequent declaration of a single SLOT/CLASSROOM decl
enum DeclValues {
    Listed(Vec<usize>),
    Same,
    NotSame,
}

/// One parsed `constraint_expr` with all names resolved to indices
struct ConstraintExpr {
    courses: Vec<usize>,
    filters: Vec<(FieldType, Vec<usize>)>,
    negated: bool,
    decls: Vec<(FieldType, DeclValues)>,
}

/// Parses the whole constraint file and submits every weighted
/// constraint to the database. Returns the number of constraints
/// submitted.
pub fn parse_custom_constraints<S: MaxSatSolver>(
    input: &str,
    encoder: &ConstraintEncoder,
    database: &mut ClauseDatabase<S>,
) -> Result<usize, CustomConstraintError> {
    let file = ConstraintParser::parse(Rule::file, input)
        .map_err(|error| CustomConstraintError::Grammar(Box::new(error)))?
        .next()
        .unwrap();

    let mut submitted = 0;
    for pair in file.into_inner() {
        if pair.as_rule() != Rule::wconstraint {
            continue;
        }
        let mut inner = pair.into_inner();
        let fragment = build_or(inner.next().unwrap(), encoder)?;
        let weight = parse_weight(inner.next().unwrap())?;
        log::debug!(
            "custom constraint #{}: {} clauses, weight {:?}",
            submitted + 1,
            fragment.len(),
            weight
        );
        database.add(fragment, weight);
        submitted += 1;
    }
    Ok(submitted)
}

fn parse_weight(pair: Pair<Rule>) -> Result<Weight, CustomConstraintError> {
    let (line, column) = pair.as_span().start_pos().line_col();
    let text = pair.as_str();
    text.parse::<i64>()
        .map(Weight::from_integer)
        .map_err(|_| CustomConstraintError::WeightOutOfRange {
            line,
            column,
            text: text.to_string(),
        })
}

fn build_or(
    pair: Pair<Rule>,
    encoder: &ConstraintEncoder,
) -> Result<CNF, CustomConstraintError> {
    let mut result: Option<CNF> = None;
    for child in pair.into_inner() {
        let fragment = build_and(child, encoder)?;
        result = Some(match result {
            None => fragment,
            Some(accumulated) => accumulated.or(fragment),
        });
    }
    Ok(result.unwrap_or_else(CNF::empty))
}

fn build_and(
    pair: Pair<Rule>,
    encoder: &ConstraintEncoder,
) -> Result<CNF, CustomConstraintError> {
    let mut result = CNF::empty();
    for child in pair.into_inner() {
        result = result.and(build_val(child, encoder)?);
    }
    Ok(result)
}

fn build_val(
    pair: Pair<Rule>,
    encoder: &ConstraintEncoder,
) -> Result<CNF, CustomConstraintError> {
    let inner = pair.into_inner().next().unwrap();
    match inner.as_rule() {
        Rule::constraint_expr => {
            let expr = resolve_expr(inner, encoder.data())?;
            Ok(encode_expr(&expr, encoder))
        }
        Rule::constraint_not => {
            let braced = inner.into_inner().next().unwrap();
            let body = build_or(braced.into_inner().next().unwrap(), encoder)?;
            Ok(body.not())
        }
        Rule::braced => build_or(inner.into_inner().next().unwrap(), encoder),
        rule => unreachable!("constraint_val cannot contain {:?}", rule),
    }
}

/// Antecedent of one selected course: conjunction of the listed-value
/// filters
fn antecedent(expr: &ConstraintExpr, course: usize, encoder: &ConstraintEncoder) -> CNF {
    let mut result = CNF::empty();
    for (field, values) in &expr.filters {
        result = result.and(encoder.has_field_type_listed_values(course, *field, values));
    }
    result
}

fn encode_expr(expr: &ConstraintExpr, encoder: &ConstraintEncoder) -> CNF {
    let mut total = CNF::empty();
    for (position, &course) in expr.courses.iter().enumerate() {
        let guard = antecedent(expr, course, encoder);
        let mut consequent = CNF::empty();
        for (field, decl) in &expr.decls {
            match decl {
                DeclValues::Listed(values) => {
                    consequent = consequent
                        .and(encoder.has_field_type_listed_values(course, *field, values));
                }
                DeclValues::Same | DeclValues::NotSame => {
                    // pair with every later course of the selection
                    for &other in &expr.courses[position + 1..] {
                        let other_guard = antecedent(expr, other, encoder);
                        let pairing = match decl {
                            DeclValues::Same => {
                                encoder.has_same_field_type_and_value(course, other, *field)
                            }
                            _ => encoder.not_same_field_value(course, other, *field),
                        };
                        consequent = consequent.and(other_guard.implies(pairing));
                    }
                }
            }
        }
        if expr.negated {
            consequent = consequent.not();
        }
        total = total.and(guard.implies(consequent));
    }
    total
}

fn resolve_expr(pair: Pair<Rule>, data: &Data) -> Result<ConstraintExpr, CustomConstraintError> {
    let mut expr = ConstraintExpr {
        courses: Vec::new(),
        filters: Vec::new(),
        negated: false,
        decls: Vec::new(),
    };

    for child in pair.into_inner() {
        match child.as_rule() {
            Rule::course_decl => {
                let values = child.into_inner().next().unwrap();
                match resolve_values(values, None, data)? {
                    ParsedValues::All => expr.courses = (0..data.courses.len()).collect(),
                    ParsedValues::Listed(courses) => expr.courses = courses,
                    _ => unreachable!("resolve_values rejects SAME on courses"),
                }
            }
            Rule::field_decl => {
                let mut inner = child.into_inner();
                let field = antecedent_field(inner.next().unwrap());
                let values = inner.next().unwrap();
                let span = values.as_span();
                match resolve_values(values, Some(field), data)? {
                    ParsedValues::All => {
                        expr.filters
                            .push((field, (0..data.field_cardinality(field)).collect()));
                    }
                    ParsedValues::Listed(values) => expr.filters.push((field, values)),
                    _ => {
                        let (line, column) = span.start_pos().line_col();
                        return Err(CustomConstraintError::MisplacedSame { line, column });
                    }
                }
            }
            Rule::negated => expr.negated = true,
            Rule::decl => {
                let mut inner = child.into_inner();
                let field = consequent_field(inner.next().unwrap());
                let values = inner.next().unwrap();
                let parsed = match resolve_values(values, Some(field), data)? {
                    ParsedValues::All => {
                        DeclValues::Listed((0..data.field_cardinality(field)).collect())
                    }
                    ParsedValues::Listed(values) => DeclValues::Listed(values),
                    ParsedValues::Same => DeclValues::Same,
                    ParsedValues::NotSame => DeclValues::NotSame,
                };
                expr.decls.push((field, parsed));
            }
            rule => unreachable!("constraint_expr cannot contain {:?}", rule),
        }
    }
    Ok(expr)
}

fn antecedent_field(pair: Pair<Rule>) -> FieldType {
    match pair.into_inner().next().unwrap().as_rule() {
        Rule::instructor_kw => FieldType::Instructor,
        Rule::segment_kw => FieldType::Segment,
        Rule::isminor_kw => FieldType::IsMinor,
        Rule::program_kw => FieldType::Program,
        rule => unreachable!("not an antecedent field: {:?}", rule),
    }
}

fn consequent_field(pair: Pair<Rule>) -> FieldType {
    match pair.into_inner().next().unwrap().as_rule() {
        Rule::slot_kw => FieldType::Slot,
        Rule::classroom_kw => FieldType::Classroom,
        rule => unreachable!("not a consequent field: {:?}", rule),
    }
}

fn lookup_kind(field: Option<FieldType>) -> &'static str {
    match field {
        None => "Course",
        Some(FieldType::Slot) => "Slot",
        Some(FieldType::Classroom) => "Classroom",
        Some(FieldType::Instructor) => "Instructor",
        Some(FieldType::Segment) => "Segment",
        Some(FieldType::IsMinor) => "IsMinor",
        Some(FieldType::Program) => "Program",
    }
}

/// Resolves a `values` production; `field` is `None` when the values
/// select courses
fn resolve_values(
    pair: Pair<Rule>,
    field: Option<FieldType>,
    data: &Data,
) -> Result<ParsedValues, CustomConstraintError> {
    let inner = pair.into_inner().next().unwrap();
    match inner.as_rule() {
        Rule::all_values => Ok(ParsedValues::All),
        Rule::same_values | Rule::notsame_values => {
            let same = inner.as_rule() == Rule::same_values;
            match field {
                Some(FieldType::Slot) | Some(FieldType::Classroom) => Ok(if same {
                    ParsedValues::Same
                } else {
                    ParsedValues::NotSame
                }),
                _ => {
                    let (line, column) = inner.as_span().start_pos().line_col();
                    Err(CustomConstraintError::MisplacedSame { line, column })
                }
            }
        }
        Rule::list_values => {
            let mut indices = Vec::new();
            for value in inner.into_inner() {
                let (line, column) = value.as_span().start_pos().line_col();
                let name = unquote(value.as_str());
                let resolved = match field {
                    None => data.course_index(name),
                    Some(field) => data.field_value_index(field, name),
                };
                match resolved {
                    Some(index) => indices.push(index),
                    None => {
                        return Err(CustomConstraintError::UnknownName {
                            kind: lookup_kind(field),
                            name: name.to_string(),
                            line,
                            column,
                        })
                    }
                }
            }
            Ok(ParsedValues::Listed(indices))
        }
        rule => unreachable!("values cannot contain {:?}", rule),
    }
}

fn unquote(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_fixtures::small_data;
    use crate::vars::VarAllocator;
    use maxsat::CadicalSolver;

    fn parse(input: &str) -> Result<usize, CustomConstraintError> {
        let data = small_data();
        let vars = VarAllocator::allocate(&data);
        let encoder = ConstraintEncoder::new(&data, &vars);
        let mut database = ClauseDatabase::new(CadicalSolver::new());
        database.register_vars(vars.count());
        parse_custom_constraints(input, &encoder, &mut database)
    }

    #[test]
    fn accepts_the_basic_shapes() {
        assert_eq!(parse("COURSE {C1} IN SLOT {S1} WEIGHT 5").unwrap(), 1);
        assert_eq!(
            parse("COURSE {C1,C2} INSTRUCTOR {I1} IN SLOT SAME WEIGHT -1").unwrap(),
            1
        );
        assert_eq!(
            parse(
                "COURSE * IN CLASSROOM {R1} AND SLOT {S1,S2} WEIGHT 2\n\
                 COURSE {C2} NOT IN SLOT {M1} WEIGHT -1"
            )
            .unwrap(),
            2
        );
        assert_eq!(
            parse("NOT (COURSE {C1} IN SLOT {S1}) OR COURSE {C2} IN SLOT {S2} WEIGHT 3").unwrap(),
            1
        );
        assert_eq!(parse("# only a comment\n").unwrap(), 0);
    }

    #[test]
    fn quoted_names_resolve() {
        assert_eq!(
            parse("COURSE {C1} PROGRAM {\"CSE core\"} IN SLOT * WEIGHT 1").unwrap(),
            1
        );
    }

    #[test]
    fn unknown_course_is_reported_with_its_position() {
        match parse("COURSE {Ghost} IN SLOT * WEIGHT 1") {
            Err(CustomConstraintError::UnknownName {
                kind,
                name,
                line,
                column,
            }) => {
                assert_eq!(kind, "Course");
                assert_eq!(name, "Ghost");
                assert_eq!(line, 1);
                assert!(column > 1);
            }
            other => panic!("expected unknown-name error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn unknown_slot_is_reported() {
        assert!(matches!(
            parse("COURSE {C1} IN SLOT {S9} WEIGHT 1"),
            Err(CustomConstraintError::UnknownName { kind: "Slot", .. })
        ));
    }

    #[test]
    fn same_is_rejected_on_antecedent_fields() {
        assert!(matches!(
            parse("COURSE * INSTRUCTOR SAME IN SLOT * WEIGHT 1"),
            Err(CustomConstraintError::MisplacedSame { .. })
        ));
    }

    #[test]
    fn grammar_mismatch_is_fatal() {
        assert!(matches!(
            parse("COURSE {C1} SLOT {S1} WEIGHT 1"),
            Err(CustomConstraintError::Grammar(_))
        ));
        assert!(matches!(
            parse("COURSE {C1} IN SLOT {S1}"),
            Err(CustomConstraintError::Grammar(_))
        ));
    }

    #[test]
    fn weight_overflow_is_reported() {
        assert!(matches!(
            parse("COURSE {C1} IN SLOT * WEIGHT 99999999999999999999"),
            Err(CustomConstraintError::WeightOutOfRange { .. })
        ));
    }
}
