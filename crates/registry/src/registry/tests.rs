use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use tessera_scope::ScopeStack;

use super::*;
use crate::bundle::{BundleDef, MemoryBundleSource};
use crate::resources::{ActionKind, IndentKind, Modifiers, Shortcut};

const JAVASCRIPT: &str = r##"
name = "JavaScript"
uuid = "JS"

[[snippets]]
name = "function"
uuid = "JS-1"
scope = "source.js"
trigger = "fun"
content = "function ${1}() {}"

[[snippets]]
name = "function in string"
uuid = "JS-2"
scope = "source.js string"
trigger = "fun"
content = "fun"

[[snippets]]
name = "log"
uuid = "JS-3"
scope = "source.js"
trigger = "log"
key_equivalent = "^l"
content = "console.log()"

[[commands]]
name = "Run"
uuid = "JS-4"
scope = "source.js"
key_equivalent = "@r"
content = "node $FILE"

[[commands]]
name = "Broken"
uuid = "JS-5"
scope = "source.js (string"

[[commands]]
uuid = "JS-6"
scope = "source.js"

[[drag_commands]]
name = "Insert Image"
uuid = "JS-7"
scope = "source.js"
extensions = ["png", "JPG"]

[[preferences]]
name = "Indentation"
scope = "source.js"
[preferences.settings]
increase_indent_pattern = "\\{$"
decrease_indent_pattern = "^\\s*\\}"
completions = ["const", "let"]
completion_command = "complete-js"
shell_variables = [
	{ name = "TM_COMMENT_START", value = "// " },
	{ name = "TM_LINT", value = "eslint" },
]
smart_typing_pairs = [["(", ")"], ["{", "}"]]

[[preferences]]
name = "Comments"
scope = "source.js comment"
[preferences.settings]
shell_variables = [{ name = "TM_COMMENT_START", value = "/* " }]
disable_default_completion = true

[[preferences]]
name = "Strings: no increase"
scope = "source.js string"
[preferences.settings]
decrease_indent_pattern = "^\\s*\""

[[preferences]]
name = "Symbols"
scope = "source.js entity.name.function"
[preferences.settings]
show_in_symbol_list = true
symbol_transformation = "s/^/fn /"

[[syntaxes]]
name = "JavaScript"
scope_name = "source.js"
file_types = ["js", "mjs"]
key_equivalent = "^~@j"
folding_start_marker = "\\{\\s*$"
folding_stop_marker = "^\\s*\\}"

[[themes]]
name = "Night"
uuid = "NIGHT"
settings = [
	{ foreground = "#F8F8F8", background = "#141414" },
	{ name = "String", scope = "string", foreground = "#8F9D6A" },
	{ name = "Double string", scope = "string.quoted.double", foreground = "#A0B070", font_style = "italic" },
	{ name = "JS keyword", scope = "source.js keyword", foreground = "#CDA869", font_style = "bold" },
]
"##;

fn stack(text: &str) -> ScopeStack {
	ScopeStack::parse(text).unwrap()
}

fn source() -> MemoryBundleSource {
	MemoryBundleSource::new().with("javascript", BundleDef::from_toml_str(JAVASCRIPT).unwrap())
}

fn loaded() -> ResourceRegistry {
	let mut registry = ResourceRegistry::default();
	let mut source = source();
	registry.load(&mut source, LoadMode::Init);
	registry.load_all(&source);
	registry
}

fn names(actions: &[Arc<Action>]) -> Vec<&str> {
	actions.iter().map(|action| action.name.as_str()).collect()
}

#[test]
fn test_style_uses_best_match_and_falls_back() {
	let mut registry = loaded();
	assert!(registry.set_theme("Night"));
	assert_eq!(registry.theme().background, Color::rgb(0x14, 0x14, 0x14));

	let double = registry.style(&stack("source.js string.quoted.double"));
	assert_eq!(double.name, "Double string");
	assert_eq!(double.font_style, crate::resources::FontStyle::ITALIC);
	assert_eq!(registry.style(&stack("source.js string.quoted.single")).name, "String");
	assert_eq!(registry.style(&stack("source.js meta keyword.control")).name, "JS keyword");
	assert_eq!(registry.style(&stack("text.plain")), registry.default_style());
}

#[test]
fn test_set_unknown_theme_keeps_current() {
	let mut registry = loaded();
	assert_eq!(registry.theme().name, "Default");
	assert!(!registry.set_theme("Day"));
	assert_eq!(registry.theme().name, "Default");
	assert_eq!(registry.theme_names().collect::<Vec<_>>(), vec!["Night"]);
}

#[test]
fn test_configured_default_theme_is_applied_after_load() {
	let config = RegistryConfig {
		default_theme: Some("Night".to_string()),
		..RegistryConfig::default()
	};
	let mut registry = ResourceRegistry::new(config).unwrap();
	let mut source = source();
	registry.load(&mut source, LoadMode::Init);
	assert_eq!(registry.theme().name, "Default");
	registry.load_all(&source);
	assert_eq!(registry.theme().name, "Night");
}

#[test]
fn test_all_actions() {
	let registry = loaded();
	let actions = registry.all_actions(&stack("source.js string.quoted"));
	let mut all = names(&actions);
	all.sort();
	assert_eq!(all, vec!["Run", "function", "function in string", "log"]);
	assert!(registry.all_actions(&stack("source.python")).is_empty());
}

#[test]
fn test_actions_for_key_includes_syntaxes() {
	let registry = loaded();
	let run = Shortcut::new("r", Modifiers::COMMAND);
	assert_eq!(names(&registry.actions_for_key(&stack("source.js"), &run)), vec!["Run"]);
	assert!(registry.actions_for_key(&stack("source.python"), &run).is_empty());

	let syntax_key = Shortcut::parse("^~@j").unwrap();
	let hits = registry.actions_for_key(&stack("text.plain"), &syntax_key);
	assert_eq!(names(&hits), vec!["JavaScript"]);
	assert_eq!(hits[0].kind, ActionKind::Syntax);
}

#[test]
fn test_trigger_keeps_most_specific() {
	let registry = loaded();
	assert_eq!(names(&registry.actions_for_trigger("fun", &stack("source.js"))), vec!["function"]);
	assert_eq!(names(&registry.actions_for_trigger("fun", &stack("source.js string.quoted"))), vec!["function in string"]);
	assert!(registry.actions_for_trigger("nope", &stack("source.js")).is_empty());
	assert!(registry.actions_for_trigger("fun", &stack("source.python")).is_empty());
}

#[test]
fn test_drag_commands_filter_by_extension() {
	let registry = loaded();
	assert_eq!(registry.drag_commands(&stack("source.js"), "jpg").len(), 1);
	assert!(registry.drag_commands(&stack("source.js"), "gif").is_empty());
}

#[test]
fn test_indent_pattern_skips_rules_without_the_pattern() {
	let registry = loaded();
	let string = stack("source.js string.quoted");
	assert_eq!(registry.indent_pattern(&string, IndentKind::Increase), "\\{$");
	assert_eq!(registry.indent_pattern(&string, IndentKind::Decrease), "^\\s*\"");
	assert_eq!(registry.indent_pattern(&string, IndentKind::Unindented), "");
	assert_eq!(registry.indent_pattern(&stack("source.python"), IndentKind::Increase), "");
}

#[test]
fn test_shell_variables_union_most_specific_wins() {
	let registry = loaded();
	let vars = registry.shell_variables(&stack("source.js comment.line"));
	let expected: BTreeMap<String, String> = [("TM_COMMENT_START", "/* "), ("TM_LINT", "eslint")]
		.into_iter()
		.map(|(k, v)| (k.to_string(), v.to_string()))
		.collect();
	assert_eq!(vars, expected);
	assert_eq!(registry.shell_variables(&stack("source.js"))["TM_COMMENT_START"], "// ");
	assert!(registry.shell_variables(&stack("text.plain")).is_empty());
}

#[test]
fn test_preference_queries() {
	let registry = loaded();
	let js = stack("source.js");
	assert_eq!(registry.smart_typing_pairs(&js).get("("), Some(&")".to_string()));
	assert!(registry.smart_typing_pairs(&stack("text.plain")).is_empty());
	assert_eq!(registry.completion_list(&js), Some(&["const".to_string(), "let".to_string()][..]));
	assert_eq!(registry.completion_command(&js).map(|cmd| cmd.command.as_str()), Some("complete-js"));
	assert_eq!(registry.completion_command(&js).map(|cmd| &*cmd.bundle), Some("JavaScript"));
	assert!(!registry.disable_default_completion(&js));
	assert!(registry.disable_default_completion(&stack("source.js comment.block")));
	assert_eq!(registry.symbol_transform(&stack("source.js meta entity.name.function.js")), Some("s/^/fn /"));
	assert_eq!(registry.symbol_transform(&js), None);
}

#[test]
fn test_fold_rule_and_syntax_lookup() {
	let registry = loaded();
	let rule = registry.fold_rule(&stack("source.js meta.block")).unwrap();
	assert_eq!(rule.id, "source.js");
	assert_eq!(rule.end_marker, "^\\s*\\}");
	assert_eq!(registry.fold_rule(&stack("text.plain")), None);

	assert_eq!(registry.syntax_for("app.mjs"), "JavaScript");
	assert_eq!(registry.syntax_for("notes.txt"), "Plain Text");
	assert_eq!(registry.syntax("JavaScript").map(|s| s.scope_name.as_str()), Some("source.js"));
}

#[test]
fn test_bad_items_are_reported_and_skipped() {
	let registry = loaded();
	let problems = registry.problems();
	assert_eq!(problems.len(), 2, "{problems:#?}");

	assert_eq!(problems[0].kind, ProblemKind::InvalidSelector);
	assert_eq!(problems[0].item, "Broken");
	assert_eq!(problems[0].selector.as_deref(), Some("source.js (string"));
	assert_eq!(&*problems[0].bundle, "JavaScript");

	assert_eq!(problems[1].kind, ProblemKind::MissingIdentity);
	assert_eq!(problems[1].item, "JS-6");
}

#[test]
fn test_problem_cap() {
	let mut bundle = BundleDef::from_toml_str(JAVASCRIPT).unwrap();
	bundle.commands = (0..10)
		.map(|i| crate::bundle::ActionDef {
			name: Some(format!("bad {i}")),
			uuid: Some(i.to_string()),
			scope: "a..b".to_string(),
			..Default::default()
		})
		.collect();
	let config = RegistryConfig {
		max_problems: 3,
		..RegistryConfig::default()
	};
	let mut registry = ResourceRegistry::new(config).unwrap();
	let mut source = MemoryBundleSource::new().with("js", bundle);
	registry.load(&mut source, LoadMode::Init);
	registry.load_all(&source);

	assert_eq!(registry.problems().len(), 3);
	assert_eq!(registry.problem_count(), 10);
}

#[test]
fn test_idle_loading_is_incremental() {
	let mut source = source().with(
		"python",
		BundleDef::from_toml_str(
			r#"
name = "Python"
[[snippets]]
name = "def"
uuid = "PY-1"
scope = "source.python"
trigger = "def"
"#,
		)
		.unwrap(),
	);

	let mut registry = ResourceRegistry::default();
	registry.load(&mut source, LoadMode::Init);
	assert!(!registry.all_bundles_loaded());
	assert_eq!(registry.syntaxes().len(), 1);
	assert!(registry.fold_rule(&stack("source.js")).is_some());
	assert!(registry.all_actions(&stack("source.js")).is_empty());

	assert!(registry.do_idle(&source));
	assert_eq!(registry.all_actions(&stack("source.js")).len(), 3);
	assert!(registry.all_actions(&stack("source.python")).is_empty());

	assert!(!registry.do_idle(&source));
	assert!(registry.all_bundles_loaded());
	assert_eq!(names(&registry.all_actions(&stack("source.python"))), vec!["def"]);
	assert_eq!(registry.loaded_bundles().iter().map(|b| &**b).collect::<Vec<_>>(), vec!["JavaScript", "Python"]);
	assert!(!registry.do_idle(&source));
}

#[test]
fn test_reload_discards_stale_state() {
	let mut registry = loaded();
	assert!(!registry.all_actions(&stack("source.js")).is_empty());
	assert_eq!(registry.generation(), 1);

	let mut other = MemoryBundleSource::new().with(
		"plain",
		BundleDef::from_toml_str("name = \"Plain\"\n[[snippets]]\nname = \"x\"\nuuid = \"P\"\nscope = \"text.plain\"").unwrap(),
	);
	registry.load(&mut other, LoadMode::Reload);
	registry.load_all(&other);

	assert_eq!(registry.generation(), 2);
	assert!(registry.all_actions(&stack("source.js")).is_empty());
	assert!(registry.fold_rule(&stack("source.js")).is_none());
	assert!(registry.problems().is_empty());
	assert_eq!(names(&registry.all_actions(&stack("text.plain"))), vec!["x"]);
}

#[test]
fn test_repeated_init_does_not_duplicate() {
	let mut registry = loaded();
	let before = (registry.syntaxes().len(), registry.all_actions(&stack("source.js")).len());

	let mut source = source();
	registry.load(&mut source, LoadMode::Init);
	registry.load_all(&source);

	assert_eq!(registry.generation(), 2);
	assert_eq!((registry.syntaxes().len(), registry.all_actions(&stack("source.js")).len()), before);
	assert_eq!(registry.theme_names().collect::<Vec<_>>(), vec!["Night"]);
	assert_eq!(registry.loaded_bundles().len(), 1);
	assert_eq!(registry.fold_rule(&stack("source.js")).map(|rule| rule.id.as_str()), Some("source.js"));
}

#[test]
fn test_theme_selection_survives_reload() {
	let mut registry = loaded();
	assert!(registry.set_theme("Night"));

	let mut source = source();
	registry.load(&mut source, LoadMode::Reload);
	assert_eq!(registry.theme().name, "Default");
	registry.load_all(&source);
	assert_eq!(registry.theme().name, "Night");
}

#[test]
fn test_missing_bundle_is_a_problem() {
	struct Flaky;

	impl BundleSource for Flaky {
		fn bundle_ids(&self) -> Vec<String> {
			vec!["gone".to_string()]
		}

		fn load(&self, id: &str) -> Result<BundleDef, crate::error::BundleError> {
			Err(crate::error::BundleError::Unknown(id.to_string()))
		}
	}

	let mut registry = ResourceRegistry::default();
	registry.load(&mut Flaky, LoadMode::Init);
	assert!(registry.all_bundles_loaded());
	assert_eq!(registry.problems().len(), 1);
	assert_eq!(registry.problems()[0].kind, ProblemKind::BundleUnavailable);
	assert_eq!(registry.problems()[0].to_string(), "gone: : unknown bundle: gone");
}
