use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

use super::*;
use crate::ast::{Chain, Term};

fn scope(text: &str) -> Expr {
	Expr::Scope(ScopePattern::new(text.split('.')))
}

fn chains(selector: &str) -> Vec<String> {
	parse(selector).unwrap().chains().iter().map(ToString::to_string).collect()
}

#[test]
fn test_parse_single_scope() {
	let selector = parse("string.quoted.double").unwrap();
	assert_eq!(selector.expr(), Some(&scope("string.quoted.double")));
}

#[test]
fn test_parse_chain() {
	let selector = parse("source.js string.quoted").unwrap();
	assert_eq!(selector.expr(), Some(&Expr::Chain(vec![scope("source.js"), scope("string.quoted")])));
}

#[test]
fn test_parse_alternation_with_pipe_and_comma() {
	let pipe = parse("a.b | c.d").unwrap();
	let comma = parse("a.b, c.d").unwrap();
	let expected = Expr::Alternation(vec![scope("a.b"), scope("c.d")]);
	assert_eq!(pipe.expr(), Some(&expected));
	assert_eq!(comma.expr(), Some(&expected));
}

#[test]
fn test_parse_group_and_exclusion() {
	let selector = parse("text.html -(source | comment)").unwrap();
	assert_eq!(
		selector.expr(),
		Some(&Expr::Chain(vec![
			scope("text.html"),
			Expr::Exclusion(Box::new(Expr::Group(Box::new(Expr::Alternation(vec![scope("source"), scope("comment")]))))),
		]))
	);
}

#[test]
fn test_hyphen_inside_word_is_part_of_word() {
	let selector = parse("source.c-family").unwrap();
	assert_eq!(selector.expr(), Some(&scope("source.c-family")));
}

#[test]
fn test_numeric_component() {
	let selector = parse("markup.heading.1.markdown").unwrap();
	assert_eq!(selector.expr(), Some(&scope("markup.heading.1.markdown")));
}

#[test]
fn test_empty_selector_is_universal() {
	for text in ["", "   ", "\t"] {
		let selector = parse(text).unwrap();
		assert!(selector.is_empty());
		assert_eq!(selector.chains(), vec![Chain::default()]);
	}
}

#[rstest]
#[case("a.", ParseErrorKind::EmptyScopeName, 1)]
#[case("a..b", ParseErrorKind::EmptyScopeName, 1)]
#[case("a. b", ParseErrorKind::EmptyScopeName, 1)]
#[case("a .b", ParseErrorKind::EmptyScopeName, 2)]
#[case("a . b", ParseErrorKind::EmptyScopeName, 2)]
#[case("(a.b", ParseErrorKind::UnbalancedParen, 0)]
#[case("x (a | b", ParseErrorKind::UnbalancedParen, 2)]
#[case("a.b)", ParseErrorKind::UnbalancedParen, 3)]
#[case(")", ParseErrorKind::UnbalancedParen, 0)]
#[case("a |", ParseErrorKind::TrailingOperator, 3)]
#[case("a -", ParseErrorKind::TrailingOperator, 3)]
#[case("| a", ParseErrorKind::MissingTerm, 0)]
#[case("a || b", ParseErrorKind::MissingTerm, 3)]
#[case("()", ParseErrorKind::EmptyGroup, 1)]
#[case(".a", ParseErrorKind::UnexpectedToken, 0)]
#[case("(a)b", ParseErrorKind::UnexpectedToken, 3)]
fn test_parse_errors(#[case] input: &str, #[case] kind: ParseErrorKind, #[case] position: usize) {
	let err = parse(input).unwrap_err();
	assert_eq!((err.kind, err.position), (kind, position), "input {input:?}: {err}");
}

#[test]
fn test_deeply_nested_groups_are_rejected() {
	let err = parse(&"(".repeat(5000)).unwrap_err();
	assert_eq!((err.kind, err.position), (ParseErrorKind::TooDeep, MAX_NESTING));

	let nested = format!("{}a{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
	assert_eq!(chains(&nested), vec!["a"]);
}

#[test]
fn test_repeated_exclusions_are_rejected() {
	let err = parse(&format!("{}a", "-".repeat(5000))).unwrap_err();
	assert_eq!((err.kind, err.position), (ParseErrorKind::TooDeep, MAX_NESTING));
	assert!(parse("- - a").is_ok());
}

#[test]
fn test_expansion_is_capped() {
	assert_eq!(parse(&"(a | b) ".repeat(12)).unwrap().chains().len(), MAX_CHAINS);

	let err = parse(&"(a | b) ".repeat(20)).unwrap_err();
	assert_eq!((err.kind, err.position), (ParseErrorKind::TooComplex, 0));

	let excluded = format!("a -({})", "(b | c) ".repeat(12));
	assert_eq!(parse(&excluded).unwrap_err().kind, ParseErrorKind::TooComplex);
}

#[test]
fn test_error_display_has_position() {
	let err = parse("a..b").unwrap_err();
	assert_eq!(err.to_string(), "Parse error at position 1: expected a scope name component after '.'");
}

#[test]
fn test_flatten_distributes_groups() {
	assert_eq!(chains("(a | b) c"), vec!["a c", "b c"]);
	assert_eq!(chains("x (a | b) (c | d)"), vec!["x a c", "x a d", "x b c", "x b d"]);
	assert_eq!(chains("(a b) c"), vec!["a b c"]);
}

#[test]
fn test_flatten_attaches_exclusion_to_preceding_term() {
	let flat = parse("source.php string -string.regexp").unwrap().chains();
	assert_eq!(flat.len(), 1);
	let chain = &flat[0];
	assert_eq!(chain.terms.len(), 2);
	assert!(chain.terms[0].excludes.is_empty());
	assert_eq!(chain.terms[1].excludes, vec![Chain::new(vec![Term::new(ScopePattern::new(["string", "regexp"]))])]);
}

#[test]
fn test_flatten_leading_exclusion_attaches_to_following_term() {
	assert_eq!(chains("-comment string"), vec!["string -(comment)"]);
}

#[test]
fn test_flatten_only_exclusions_is_universal() {
	let flat = parse("-comment").unwrap().chains();
	assert_eq!(flat.len(), 1);
	assert!(flat[0].is_universal());
	assert_eq!(flat[0].to_string(), "* -(comment)");
}

#[test]
fn test_flatten_exclusion_after_group_applies_to_each_alternative() {
	assert_eq!(chains("(a | b) -c"), vec!["a -(c)", "b -(c)"]);
	assert_eq!(chains("a -(b | c)"), vec!["a -(b | c)"]);
}

proptest! {
	#[test]
	fn prop_parse_never_panics(input in "[a-z .,|()\\-]{0,24}") {
		let _ = parse(&input);
	}

	#[test]
	fn prop_valid_scope_round_trips(words in proptest::collection::vec("[a-z][a-z0-9]{0,5}", 1..5)) {
		let text = words.join(".");
		let selector = parse(&text).unwrap();
		prop_assert_eq!(selector.expr(), Some(&scope(&text)));
	}
}
