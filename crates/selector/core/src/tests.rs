use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;
use tessera_scope::ScopeStack;
use tessera_selector_parser::{ParseErrorKind, Selector};

use super::*;

fn stack(text: &str) -> ScopeStack {
	ScopeStack::parse(text).unwrap()
}

fn trie(rules: &[(&str, &'static str)]) -> SelectorTrie<&'static str> {
	let mut trie = SelectorTrie::new();
	for &(selector, payload) in rules {
		trie.insert(selector, payload).unwrap();
	}
	trie
}

fn sorted(mut hits: Vec<&&'static str>) -> Vec<&'static str> {
	hits.sort();
	hits.into_iter().copied().collect()
}

#[rstest]
#[case("string", "string.quoted.double", true)]
#[case("string.quoted", "string.quoted.double", true)]
#[case("string.quoted.double", "string.quoted", false)]
#[case("string.quoted", "string.unquoted", false)]
#[case("String", "string.quoted", false)]
#[case("source.js string", "source.js meta.block string.quoted", true)]
#[case("source.js string", "string.quoted source.js", false)]
#[case("source string", "source.js", false)]
#[case("comment | string", "source.js comment.line", true)]
#[case("comment, string", "source.js string.quoted", true)]
#[case("(meta | source) string", "meta.block string.quoted", true)]
fn test_selector_matches_stack(#[case] selector: &str, #[case] scopes: &str, #[case] expected: bool) {
	let trie = trie(&[(selector, "hit")]);
	let hits = trie.resolve(&stack(scopes));
	assert_eq!(!hits.is_empty(), expected, "{selector:?} against {scopes:?}");
	assert_eq!(matches(&Selector::parse(selector).unwrap(), &stack(scopes)), expected);
}

#[test]
fn test_descendant_skips_intermediate_scopes() {
	let trie = trie(&[("text.html source.js", "embedded")]);
	assert_eq!(trie.resolve(&stack("text.html.basic meta.tag source.js.embedded string.quoted")), vec![&"embedded"]);
}

#[test]
fn test_multiple_matches_are_all_returned() {
	let trie = trie(&[("source", "source"), ("string", "string"), ("source string", "nested"), ("comment", "comment")]);
	let hits = trie.resolve(&stack("source.js string.quoted"));
	assert_eq!(sorted(hits), vec!["nested", "source", "string"]);
}

#[test]
fn test_resolve_walks_innermost_level_first() {
	let trie = trie(&[("source", "outer"), ("string", "inner")]);
	assert_eq!(trie.resolve(&stack("source.js string.quoted")), vec![&"inner", &"outer"]);
}

#[test]
fn test_exclusion_rejects_excluded_scope() {
	let trie = trie(&[("string -string.regexp", "plain")]);
	assert_eq!(trie.resolve(&stack("source.js string.quoted")), vec![&"plain"]);
	assert!(trie.resolve(&stack("source.js string.regexp")).is_empty());
}

#[test]
fn test_exclusion_is_checked_at_the_term_level() {
	let trie = trie(&[("source -source.css string", "code")]);
	assert_eq!(trie.resolve(&stack("source.js string.quoted")), vec![&"code"]);
	assert!(trie.resolve(&stack("source.css string.quoted")).is_empty());
}

#[test]
fn test_exclusion_only_selector_is_universal() {
	let trie = trie(&[("-comment", "code")]);
	assert_eq!(trie.resolve(&stack("source.js")), vec![&"code"]);
	assert!(trie.resolve(&stack("source.js comment.line")).is_empty());
	assert!(trie.resolve(&ScopeStack::new()).is_empty());
}

#[test]
fn test_empty_selector_matches_every_stack() {
	let trie = trie(&[("", "default")]);
	assert_eq!(trie.resolve(&stack("source.js string")), vec![&"default"]);
	assert_eq!(trie.resolve(&ScopeStack::new()), vec![&"default"]);
}

#[test]
fn test_empty_stack_matches_nothing_scoped() {
	let trie = trie(&[("source", "source"), ("source string", "string")]);
	assert!(trie.resolve(&ScopeStack::new()).is_empty());
	assert_eq!(trie.resolve_best(&ScopeStack::new()), None);
}

#[test]
fn test_long_chain_on_deep_repeated_stack() {
	let trie = trie(&[("a a a a a a a a", "deep")]);
	let stack = ScopeStack::from_names(std::iter::repeat_n("a.b", 40)).unwrap();
	assert_eq!(trie.resolve(&stack), vec![&"deep"]);
	assert_eq!(
		trie.resolve_ranked(&stack)[0].specificity,
		Specificity {
			level: 39,
			components: 8,
			terms: 8
		}
	);
}

#[test]
fn test_ancestors_sharing_a_node_all_match() {
	let trie = trie(&[("a x", "a"), ("b x", "b"), ("a.b x", "ab")]);
	assert_eq!(sorted(trie.resolve(&stack("b a.c a.b x"))), vec!["a", "ab", "b"]);
}

#[test]
fn test_excluded_ancestor_falls_back_to_farther_scope() {
	let trie = trie(&[("a -a.b x", "hit")]);
	assert_eq!(trie.resolve(&stack("a.c a.b x")), vec![&"hit"]);
	assert!(trie.resolve(&stack("a.b x")).is_empty());
}

#[rstest]
#[case(&[("string", "short"), ("string.quoted", "long")], "string.quoted.double", "long")]
#[case(&[("source.js", "outer"), ("string", "inner")], "source.js string.quoted", "inner")]
#[case(&[("string", "bare"), ("source string", "chained")], "source.js string.quoted", "chained")]
#[case(&[("", "default"), ("source", "scoped")], "source.js", "scoped")]
#[case(&[("-comment", "universal"), ("source", "scoped")], "source.js", "scoped")]
#[case(&[("string", "first"), ("string", "second")], "string.quoted", "first")]
fn test_resolve_best_prefers_specific(#[case] rules: &[(&str, &'static str)], #[case] scopes: &str, #[case] expected: &str) {
	let trie = trie(rules);
	assert_eq!(trie.resolve_best(&stack(scopes)).copied(), Some(expected));
}

#[test]
fn test_resolve_ranked_reports_specificity() {
	let trie = trie(&[("string", "bare"), ("source string.quoted", "chained"), ("", "default")]);
	let ranked = trie.resolve_ranked(&stack("source.js string.quoted"));
	let summary: Vec<_> = ranked.iter().map(|hit| (*hit.payload, hit.specificity)).collect();
	assert_eq!(
		summary,
		vec![
			(
				"chained",
				Specificity {
					level: 1,
					components: 3,
					terms: 2
				}
			),
			(
				"bare",
				Specificity {
					level: 1,
					components: 1,
					terms: 1
				}
			),
			("default", Specificity::default()),
		]
	);
	assert!(ranked[2].specificity.is_universal());
}

#[test]
fn test_alternatives_of_one_payload_are_deduplicated() {
	let trie = trie(&[("string | string.quoted", "string")]);
	let ranked = trie.resolve_ranked(&stack("string.quoted.double"));
	assert_eq!(ranked.len(), 1);
	assert_eq!(ranked[0].specificity.components, 2);
}

#[test]
fn test_resolve_where_filters_payloads() {
	let trie = trie(&[("source", "keep"), ("source", "drop")]);
	let hits = trie.resolve_where(&stack("source.js"), |payload| *payload != "drop");
	assert_eq!(hits, vec![&"keep"]);
	assert_eq!(trie.resolve_best_where(&stack("source.js"), |payload| payload.starts_with('d')), Some(&"drop"));
}

#[test]
fn test_resolve_top_returns_ties() {
	let trie = trie(&[("string", "a"), ("string", "b"), ("source", "outer")]);
	assert_eq!(trie.resolve_top(&stack("source.js string.quoted")), vec![&"a", &"b"]);
	assert!(trie.resolve_top(&stack("comment")).is_empty());
}

#[test]
fn test_insert_rejects_malformed_selector() {
	let mut trie = SelectorTrie::new();
	trie.insert("source", "ok").unwrap();
	let dump = trie.dump();

	let err = trie.insert("source..js", "bad").unwrap_err();
	assert_eq!(err.position, 6);
	assert_eq!(trie.len(), 1);
	assert_eq!(trie.dump(), dump);
}

#[test]
fn test_insert_rejects_oversized_expansion() {
	let mut trie = trie(&[("source", "ok")]);
	let err = trie.insert(&"(a | b) ".repeat(20), "bad").unwrap_err();
	assert_eq!(err.kind, ParseErrorKind::TooComplex);
	assert_eq!(trie.len(), 1);
	assert_eq!(trie.resolve(&stack("source.js")), vec![&"ok"]);
}

#[test]
fn test_merge_empty_fragment_is_noop() {
	let mut trie = trie(&[("source.js string", "a"), ("comment", "b")]);
	let before = (trie.dump(), trie.len(), trie.node_count());
	trie.merge(SelectorTrie::new());
	assert_eq!((trie.dump(), trie.len(), trie.node_count()), before);
}

#[test]
fn test_merge_shares_common_prefixes() {
	let mut trie = trie(&[("string.quoted", "a")]);
	let nodes = trie.node_count();
	trie.merge(SelectorTrie::parse("string.quoted", "b").unwrap());
	assert_eq!(trie.node_count(), nodes);
	assert_eq!(trie.len(), 2);
	assert_eq!(trie.resolve(&stack("string.quoted")), vec![&"a", &"b"]);
}

#[test]
fn test_merge_order_does_not_change_results() {
	let rules = [("source.js string", "a"), ("string -string.regexp", "b"), ("comment | string.quoted", "c")];
	let forward = trie(&rules);
	let mut reversed_rules = rules;
	reversed_rules.reverse();
	let reversed = trie(&reversed_rules);

	for scopes in ["source.js string.quoted", "source.js string.regexp", "comment.line", "string.quoted"] {
		let stack = stack(scopes);
		assert_eq!(sorted(forward.resolve(&stack)), sorted(reversed.resolve(&stack)), "{scopes}");
	}
}

#[test]
fn test_clear_removes_everything() {
	let mut trie = trie(&[("source", "a"), ("", "b")]);
	trie.clear();
	assert!(trie.is_empty());
	assert_eq!(trie.len(), 0);
	assert_eq!(trie.node_count(), 1);
	assert!(trie.resolve(&stack("source")).is_empty());
}

#[test]
fn test_dump_shows_edges() {
	let trie = trie(&[("source.js string", "a"), ("comment", "b")]);
	assert_eq!(trie.dump(), "|comment [1]\n|string\n  <source\n    .js [1]\n");
}

fn term() -> impl Strategy<Value = String> {
	(proptest::bool::weighted(0.25), "[abc](\\.[abc])?").prop_map(|(exclude, scope)| match exclude {
		true => format!("-{scope}"),
		false => scope,
	})
}

fn selector() -> impl Strategy<Value = String> {
	proptest::collection::vec(proptest::collection::vec(term(), 1..4).prop_map(|terms| terms.join(" ")), 1..3)
		.prop_map(|chains| chains.join(" | "))
}

fn scopes() -> impl Strategy<Value = Vec<String>> {
	proptest::collection::vec("[abc](\\.[abc]){0,2}", 0..5)
}

proptest! {
	#[test]
	fn prop_trie_agrees_with_direct_evaluation(selector in selector(), scopes in scopes()) {
		let parsed = Selector::parse(&selector).unwrap();
		let trie = SelectorTrie::from_selector(&parsed, ());
		let stack = ScopeStack::from_names(&scopes).unwrap();
		prop_assert_eq!(!trie.resolve(&stack).is_empty(), matches(&parsed, &stack), "{} against {:?}", selector, scopes);
	}

	#[test]
	fn prop_best_is_top_ranked(selectors in proptest::collection::vec(selector(), 1..5), scopes in scopes()) {
		let mut trie = SelectorTrie::new();
		for (index, selector) in selectors.iter().enumerate() {
			trie.insert(selector, index).unwrap();
		}
		let stack = ScopeStack::from_names(&scopes).unwrap();
		let ranked = trie.resolve_ranked(&stack);
		prop_assert_eq!(trie.resolve_best(&stack), ranked.first().map(|hit| hit.payload));
	}
}
