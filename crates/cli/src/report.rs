//! Plain-text rendering of query results.

use std::fmt::Write;
use std::sync::Arc;

use tessera_registry::{Action, ActionKind, ResourceRegistry, Style};
use tessera_scope::ScopeStack;
use tessera_selector::parser::{ParseError, Selector};

pub fn chains(selector: &Selector) -> String {
	let mut out = String::new();
	for chain in selector.chains() {
		let _ = writeln!(out, "{chain}");
	}
	out
}

/// The selector, a caret under the error position, then the message.
pub fn parse_error(selector: &str, err: &ParseError) -> String {
	let column = selector.get(..err.position).map_or(err.position, |prefix| prefix.chars().count());
	format!("{selector}\n{}^\n{err}\n", " ".repeat(column))
}

pub fn style(style: &Style) -> String {
	let mut out = style.name.clone();
	if !style.scope.is_empty() {
		let _ = write!(out, " ({})", style.scope);
	}
	if let Some(fg) = style.foreground {
		let _ = write!(out, " fg={fg}");
	}
	if let Some(bg) = style.background {
		let _ = write!(out, " bg={bg}");
	}
	for (name, _) in style.font_style.iter_names() {
		let _ = write!(out, " {}", name.to_lowercase());
	}
	out
}

fn action(action: &Action) -> String {
	let kind = match action.kind {
		ActionKind::Snippet => "snippet",
		ActionKind::Command => "command",
		ActionKind::Syntax => "syntax",
	};
	let mut out = format!("{kind} {:?} [{}]", action.name, action.bundle);
	if let Some(trigger) = &action.trigger {
		let _ = write!(out, " trigger={trigger}");
	}
	if let Some(shortcut) = &action.shortcut {
		let _ = write!(out, " key={shortcut}");
	}
	out
}

pub fn resolution(registry: &ResourceRegistry, stack: &ScopeStack, actions: &[Arc<Action>]) -> String {
	let mut out = String::new();
	let _ = writeln!(out, "stack: {stack}");
	let _ = writeln!(out, "theme: {}", registry.theme().name);
	let _ = writeln!(out, "style: {}", style(registry.style(stack)));

	let vars = registry.shell_variables(stack);
	if !vars.is_empty() {
		let _ = writeln!(out, "shell variables:");
		for (name, value) in &vars {
			let _ = writeln!(out, "  {name}={value:?}");
		}
	}

	if let Some(rule) = registry.fold_rule(stack) {
		let _ = writeln!(out, "fold: {} {:?} .. {:?}", rule.id, rule.start_marker, rule.end_marker);
	}

	let _ = writeln!(out, "actions: {}", actions.len());
	for hit in actions {
		let _ = writeln!(out, "  {}", action(hit));
	}
	out
}

pub fn problems(registry: &ResourceRegistry) -> String {
	let mut out = String::new();
	for problem in registry.problems() {
		let _ = writeln!(out, "{problem}");
	}
	let hidden = registry.problem_count() - registry.problems().len();
	if hidden > 0 {
		let _ = writeln!(out, "... and {hidden} more");
	}
	if registry.problem_count() == 0 {
		let _ = writeln!(out, "{} bundles loaded without problems", registry.loaded_bundles().len());
	}
	out
}
