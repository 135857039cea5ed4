//! Tests for the formula parser

mod common;

use proptest::prelude::*;
use rstest::rstest;

use ktab::domain::{parse, Formula, Notation, SyntaxError, MAX_NESTING};

use common::arb_formula;

#[rstest]
#[case("p", "p")]
#[case("  p1_x ", "p1_x")]
#[case("~~p", "~~p")]
#[case("p & q | r", "p & q | r")]
#[case("p | q & r", "p | q & r")]
#[case("(p | q) & r", "(p | q) & r")]
#[case("p -> q -> r", "p -> q -> r")]
#[case("(p -> q) -> r", "(p -> q) -> r")]
#[case("[]<>p", "[]<>p")]
#[case("~[](p & q)", "~[](p & q)")]
#[case("□(p ∧ q) → ◇p", "[](p & q) -> <>p")]
#[case("¬p ∨ q", "~p | q")]
#[case("◻♢◊p", "[]<><>p")]
#[case("((p))", "p")]
fn given_well_formed_text_when_parsing_then_renders_canonically(
    #[case] input: &str,
    #[case] expected: &str,
) {
    let formula = parse(input).expect("parse");
    assert_eq!(formula.to_string(), expected);
}

#[test]
fn given_mixed_connectives_when_parsing_then_precedence_and_associativity_hold() {
    // Arrange
    let p = Formula::atom("p");
    let q = Formula::atom("q");
    let r = Formula::atom("r");

    // Act
    let implication = parse("p -> q -> r").unwrap();
    let disjunction = parse("p | q | r").unwrap();
    let mixed = parse("~p & q -> r").unwrap();

    // Assert
    assert_eq!(
        implication,
        Formula::implies(p.clone(), Formula::implies(q.clone(), r.clone()))
    );
    assert_eq!(
        disjunction,
        Formula::or(Formula::or(p.clone(), q.clone()), r.clone())
    );
    assert_eq!(
        mixed,
        Formula::implies(Formula::and(Formula::not(p), q), r)
    );
}

#[rstest]
#[case("", SyntaxError::Empty)]
#[case("   ", SyntaxError::Empty)]
#[case("p &", SyntaxError::UnexpectedEnd)]
#[case("~", SyntaxError::UnexpectedEnd)]
#[case("(p & q", SyntaxError::UnbalancedParen { position: 0 })]
#[case("p & q)", SyntaxError::UnbalancedParen { position: 5 })]
#[case("p q", SyntaxError::TrailingInput { found: "q".into(), position: 2 })]
#[case("& p", SyntaxError::UnexpectedToken { found: "&".into(), position: 0 })]
#[case("()", SyntaxError::UnexpectedToken { found: ")".into(), position: 1 })]
#[case("(p q)", SyntaxError::UnexpectedToken { found: "q".into(), position: 3 })]
#[case("P", SyntaxError::UnknownToken { found: "P".into(), position: 0 })]
#[case("p <-> q", SyntaxError::UnknownToken { found: "<".into(), position: 2 })]
#[case("p - q", SyntaxError::UnknownToken { found: "-".into(), position: 2 })]
#[case("¬p ∧ 1", SyntaxError::UnknownToken { found: "1".into(), position: 5 })]
fn given_malformed_text_when_parsing_then_reports_syntax_error(
    #[case] input: &str,
    #[case] expected: SyntaxError,
) {
    assert_eq!(parse(input), Err(expected));
}

#[test]
fn given_syntax_error_when_displayed_then_mentions_position() {
    let err = parse("p & q)").unwrap_err();
    assert_eq!(err.position(), Some(5));
    assert_eq!(err.to_string(), "unbalanced parenthesis at position 5");
}

#[test]
fn given_unicode_notation_when_rendering_then_uses_glyphs() {
    let formula = parse("[](p -> q) -> []p -> []q").unwrap();
    assert_eq!(formula.render(Notation::Unicode), "□(p → q) → □p → □q");
}

proptest! {
    #[test]
    fn rendered_formula_parses_back_to_same_ast(formula in arb_formula()) {
        prop_assert_eq!(parse(&formula.to_string()), Ok(formula.clone()));
        prop_assert_eq!(parse(&formula.render(Notation::Unicode)), Ok(formula));
    }
}

#[rstest]
#[case::negations(format!("{}p", "~".repeat(300)), 256)]
#[case::parentheses(format!("{}p{}", "(".repeat(300), ")".repeat(300)), 256)]
#[case::implication_chain(format!("{}p", "p -> ".repeat(300)), 5 * 256 + 2)]
fn given_nesting_beyond_limit_when_parsing_then_too_deep(
    #[case] input: String,
    #[case] position: usize,
) {
    assert_eq!(
        parse(&input),
        Err(SyntaxError::TooDeep {
            limit: MAX_NESTING,
            position,
        })
    );
}

#[test]
fn given_nesting_at_limit_when_parsing_then_accepted() {
    let input = format!("{}p", "<>".repeat(MAX_NESTING));

    let formula = parse(&input).expect("parse");

    assert_eq!(formula.profile().modal_depth, MAX_NESTING);
}

#[test]
fn given_very_deep_input_when_parsing_then_error_instead_of_stack_overflow() {
    let input = format!("{}p", "~".repeat(200_000));

    let err = parse(&input).unwrap_err();

    assert!(matches!(err, SyntaxError::TooDeep { .. }));
    assert_eq!(err.position(), Some(MAX_NESTING));
}
