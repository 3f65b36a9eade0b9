// tests/parser_tests.rs

use resfilter_lang::ast::{
    Clause, ClauseBody, CompOp, Comparison, Connective, Formula, Operand, OperatorCall, RightHand,
    Statement, Term,
};
use resfilter_lang::parser::{ParseError, parse_filter};
use resfilter_lang::{FieldPath, Value};

fn parse(input: &str) -> Formula {
    parse_filter(input).unwrap_or_else(|e| panic!("Failed to parse '{}': {}", input, e))
}

fn field(name: &str) -> Operand {
    Operand::Field(FieldPath::parse(name).unwrap())
}

fn comparison(clause: &Clause) -> &Comparison {
    match &clause.body {
        ClauseBody::Statement(Statement::Comparison(c)) => c,
        other => panic!("Expected comparison, got {:?}", other),
    }
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn test_simple_comparison() {
    let formula = parse("c=200");
    assert!(formula.rest.is_empty());
    assert!(!formula.first.negated);

    let c = comparison(&formula.first);
    assert_eq!(c.left.operand, field("c"));
    assert_eq!(c.op, CompOp::Equal);
    assert_eq!(
        c.right,
        RightHand::Term(Term {
            operand: Operand::Integer(200),
            operator: None
        })
    );
}

#[test]
fn test_all_comparison_operators() {
    let test_cases = vec![
        ("c=1", CompOp::Equal),
        ("c==1", CompOp::Equal),
        ("c!=1", CompOp::NotEqual),
        ("c<1", CompOp::LessThan),
        ("c>1", CompOp::GreaterThan),
        ("c<=1", CompOp::LessEqual),
        ("c>=1", CompOp::GreaterEqual),
        ("c=~'1'", CompOp::Matches),
        ("c~'1'", CompOp::Contains),
        ("c!~'1'", CompOp::NotContains),
        ("c:=1", CompOp::Assign),
        ("c=+1", CompOp::AppendAssign),
        ("c=-1", CompOp::PrependAssign),
    ];

    for (input, expected) in test_cases {
        let formula = parse(input);
        assert_eq!(comparison(&formula.first).op, expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_bare_term_statement() {
    let formula = parse("FUZZ|unique()");
    match &formula.first.body {
        ClauseBody::Statement(Statement::Term(term)) => {
            assert_eq!(term.operand, Operand::Placeholder { index: 1, field: None });
            let call = term.operator.as_ref().unwrap();
            assert_eq!(call.name, "unique");
            assert_eq!(call.arg1, None);
            assert_eq!(call.location, 5);
        }
        other => panic!("Expected bare term, got {:?}", other),
    }
}

#[test]
fn test_baseline_and_error_markers() {
    assert_eq!(comparison(&parse("c=BBB").first).right, RightHand::Baseline);
    assert_eq!(comparison(&parse("c=XXX").first).right, RightHand::ErrorMarker);
}

// ============================================================================
// Operator Calls
// ============================================================================

#[test]
fn test_operator_arguments() {
    let formula = parse("FUZZ|replace('a', 'b')='bb'");
    let call = comparison(&formula.first).left.operator.clone().unwrap();
    assert_eq!(
        call,
        OperatorCall {
            name: "replace".to_string(),
            arg1: Some(Value::from("a")),
            arg2: Some(Value::from("b")),
            location: 5,
        }
    );
}

#[test]
fn test_integer_argument() {
    let formula = parse("FUZZ|sw(12)");
    let ClauseBody::Statement(Statement::Term(term)) = &formula.first.body else {
        panic!("Expected bare term");
    };
    assert_eq!(term.operator.as_ref().unwrap().arg1, Some(Value::Integer(12)));
}

#[test]
fn test_operator_on_right_hand_side() {
    let formula = parse("url:=url|replace('http','https')");
    let c = comparison(&formula.first);
    assert_eq!(c.op, CompOp::Assign);
    let RightHand::Term(term) = &c.right else {
        panic!("Expected term on the right");
    };
    assert_eq!(term.operand, field("url"));
    assert_eq!(term.operator.as_ref().unwrap().name, "replace");
}

#[test]
fn test_only_one_operator_per_term() {
    assert!(matches!(
        parse_filter("FUZZ|lower()|upper()"),
        Err(ParseError::MultipleOperators { .. })
    ));
    assert!(matches!(
        parse_filter("FUZZ[url|lower()]|upper()"),
        Err(ParseError::MultipleOperators { .. })
    ));
}

// ============================================================================
// Placeholders
// ============================================================================

#[test]
fn test_placeholder_projection() {
    let formula = parse("FUZ2Z[headers.Server]~'nginx'");
    assert_eq!(
        comparison(&formula.first).left.operand,
        Operand::Placeholder {
            index: 2,
            field: Some(FieldPath::parse("headers.Server").unwrap())
        }
    );
}

#[test]
fn test_bracketed_operator_forms() {
    let formula = parse("FUZZ[url|lower()]");
    let ClauseBody::Statement(Statement::Term(term)) = &formula.first.body else {
        panic!("Expected bare term");
    };
    assert_eq!(
        term.operand,
        Operand::Placeholder {
            index: 1,
            field: Some(FieldPath::parse("url").unwrap())
        }
    );
    assert_eq!(term.operator.as_ref().unwrap().name, "lower");

    let formula = parse("FUZZ[|unique()]");
    let ClauseBody::Statement(Statement::Term(term)) = &formula.first.body else {
        panic!("Expected bare term");
    };
    assert_eq!(term.operand, Operand::Placeholder { index: 1, field: None });
    assert_eq!(term.operator.as_ref().unwrap().location, 6);
}

#[test]
fn test_empty_brackets_rejected() {
    assert!(parse_filter("FUZZ[]").is_err());
}

// ============================================================================
// Formulas
// ============================================================================

#[test]
fn test_connectives_are_flat() {
    let formula = parse("c=200 or c=301 and l>5");
    let connectives: Vec<_> = formula.rest.iter().map(|(c, _)| *c).collect();
    assert_eq!(connectives, vec![Connective::Or, Connective::And]);
    assert_eq!(formula.clauses().count(), 3);
}

#[test]
fn test_not_binds_to_one_clause() {
    let formula = parse("not c=404 and l>10");
    assert!(formula.first.negated);
    assert!(!formula.rest[0].1.negated);
}

#[test]
fn test_parenthesized_group() {
    let formula = parse("not (c=404 or c=500) and l>10");
    assert!(formula.first.negated);
    match &formula.first.body {
        ClauseBody::Group(inner) => {
            assert_eq!(inner.rest.len(), 1);
            assert_eq!(inner.rest[0].0, Connective::Or);
        }
        other => panic!("Expected group, got {:?}", other),
    }
}

#[test]
fn test_nested_groups() {
    let formula = parse("((c=200))");
    let ClauseBody::Group(outer) = &formula.first.body else {
        panic!("Expected group");
    };
    assert!(matches!(outer.first.body, ClauseBody::Group(_)));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_syntax_errors() {
    let bad = vec![
        "",
        "c=",
        "c=200 and",
        "(c=200",
        "c=200)",
        "c=200 l=3",
        "and c=200",
        "FUZZ|unique(",
        "FUZZ|('a')",
        "FUZZ|r('a',)",
        "c=BBB|lower()",
    ];

    for input in bad {
        assert!(parse_filter(input).is_err(), "Expected error for: {:?}", input);
    }
}

#[test]
fn test_error_reports_position() {
    let err = parse_filter("c=200 l=3").unwrap_err();
    match err {
        ParseError::UnexpectedToken { position, .. } => assert_eq!(position.offset, 6),
        other => panic!("Expected unexpected token, got {:?}", other),
    }
}

#[test]
fn test_lex_errors_surface() {
    assert!(matches!(parse_filter("FUZ1Z=1"), Err(ParseError::Lex(_))));
}
