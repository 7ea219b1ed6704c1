//! Registration of bundle items into the registry's tries.

use std::collections::BTreeMap;
use std::sync::Arc;

use tessera_selector::SelectorTrie;
use tessera_selector::parser::Selector;
use tracing::debug;

use super::diagnostics::{ProblemKind, Problems, RegistryProblem};
use super::{LoadedTheme, ResourceRegistry, Tries};
use crate::bundle::{ActionDef, BundleDef, BundleSource, DragCommandDef, PreferenceDef, SyntaxDef, ThemeDef};
use crate::resources::{Action, ActionKind, CompletionCommand, DragCommand, FoldRule, IndentRules, Shortcut, Style, SyntaxInfo, Theme};

impl ResourceRegistry {
	/// Registers the syntaxes of `bundle`: syntax info, fold rules and syntax key equivalents.
	pub(super) fn register_syntaxes(&mut self, id: &str, bundle: &BundleDef) {
		let name = bundle_name(id, bundle);
		let since = self.problems.total();
		let mut loader = Loader {
			bundle: Arc::clone(&name),
			problems: &mut self.problems,
		};

		for def in &bundle.syntaxes {
			let Some(syntax) = loader.syntax(def, &mut self.tries.folds) else {
				continue;
			};
			if let Some(shortcut) = &syntax.shortcut {
				self.syntax_actions.push(Arc::new(Action {
					kind: ActionKind::Syntax,
					name: syntax.name.clone(),
					uuid: syntax.scope_name.clone(),
					bundle: Arc::clone(&name),
					scope: String::new(),
					trigger: None,
					shortcut: Some(shortcut.clone()),
					content: syntax.name.clone(),
				}));
			}
			self.syntaxes.push(Arc::new(syntax));
		}

		self.warn_problems(&name, since);
	}

	/// Loads one bundle and merges everything except its syntaxes.
	pub(super) fn load_bundle<S: BundleSource + ?Sized>(&mut self, source: &S, id: &str) {
		let since = self.problems.total();
		let bundle = match source.load(id) {
			Ok(bundle) => bundle,
			Err(err) => {
				self.problems.push(RegistryProblem {
					kind: ProblemKind::BundleUnavailable,
					bundle: Arc::from(id),
					item: String::new(),
					selector: None,
					message: err.to_string(),
				});
				self.warn_problems(id, since);
				return;
			}
		};

		let name = bundle_name(id, &bundle);
		let mut loader = Loader {
			bundle: Arc::clone(&name),
			problems: &mut self.problems,
		};

		for def in &bundle.snippets {
			loader.action(&mut self.tries, ActionKind::Snippet, def);
		}
		for def in &bundle.commands {
			loader.action(&mut self.tries, ActionKind::Command, def);
		}
		for def in &bundle.drag_commands {
			loader.drag_command(&mut self.tries.drag_commands, def);
		}
		for def in &bundle.preferences {
			loader.preference(&mut self.tries, def);
		}
		for def in &bundle.themes {
			let theme = loader.theme(def, &self.default_style);
			self.themes.push(Arc::new(theme));
		}

		debug!(bundle = %name, generation = self.generation, "bundle loaded");
		self.loaded.push(Arc::clone(&name));
		self.warn_problems(&name, since);
	}
}

fn bundle_name(id: &str, bundle: &BundleDef) -> Arc<str> {
	match bundle.name.trim() {
		"" => Arc::from(id),
		name => Arc::from(name),
	}
}

fn item_label(name: Option<&str>, uuid: Option<&str>, fallback: &str) -> String {
	name.or(uuid).filter(|label| !label.is_empty()).unwrap_or(fallback).to_string()
}

/// Registers the items of one bundle, recording problems against it.
struct Loader<'a> {
	bundle: Arc<str>,
	problems: &'a mut Problems,
}

impl Loader<'_> {
	fn problem(&mut self, kind: ProblemKind, item: &str, selector: Option<&str>, message: impl Into<String>) {
		self.problems.push(RegistryProblem {
			kind,
			bundle: Arc::clone(&self.bundle),
			item: item.to_string(),
			selector: selector.map(str::to_string),
			message: message.into(),
		});
	}

	fn selector(&mut self, item: &str, text: &str) -> Option<Selector> {
		match Selector::parse(text) {
			Ok(selector) => Some(selector),
			Err(err) => {
				self.problem(ProblemKind::InvalidSelector, item, Some(text), err.to_string());
				None
			}
		}
	}

	fn shortcut(&mut self, item: &str, key: Option<&str>) -> Option<Shortcut> {
		let key = key.filter(|key| !key.is_empty())?;
		match Shortcut::parse(key) {
			Ok(shortcut) => Some(shortcut),
			Err(err) => {
				self.problem(ProblemKind::InvalidKeyEquivalent, item, None, err.to_string());
				None
			}
		}
	}

	/// Returns the name and uuid of an item, or records a problem if either is missing.
	fn identity(&mut self, kind: &str, name: Option<&str>, uuid: Option<&str>) -> Option<(String, String)> {
		match (name.filter(|n| !n.is_empty()), uuid.filter(|u| !u.is_empty())) {
			(Some(name), Some(uuid)) => Some((name.to_string(), uuid.to_string())),
			_ => {
				let label = item_label(name, uuid, kind);
				self.problem(ProblemKind::MissingIdentity, &label, None, format!("{kind} without name or uuid skipped"));
				None
			}
		}
	}

	fn action(&mut self, tries: &mut Tries, kind: ActionKind, def: &ActionDef) {
		let label = match kind {
			ActionKind::Snippet => "snippet",
			_ => "command",
		};
		let Some((name, uuid)) = self.identity(label, def.name.as_deref(), def.uuid.as_deref()) else {
			return;
		};
		let Some(selector) = self.selector(&name, &def.scope) else {
			return;
		};

		let shortcut = self.shortcut(&name, def.key_equivalent.as_deref());
		let trigger = def.trigger.clone().filter(|trigger| !trigger.is_empty());
		let action = Arc::new(Action {
			kind,
			name,
			uuid,
			bundle: Arc::clone(&self.bundle),
			scope: def.scope.clone(),
			trigger: trigger.clone(),
			shortcut,
			content: def.content.clone(),
		});

		if let Some(trigger) = trigger {
			tries
				.triggers
				.entry(trigger)
				.or_default()
				.merge(SelectorTrie::from_selector(&selector, Arc::clone(&action)));
		}
		tries.actions.merge(SelectorTrie::from_selector(&selector, action));
	}

	fn drag_command(&mut self, trie: &mut SelectorTrie<Arc<DragCommand>>, def: &DragCommandDef) {
		let Some((name, uuid)) = self.identity("drag command", def.name.as_deref(), def.uuid.as_deref()) else {
			return;
		};
		let Some(selector) = self.selector(&name, &def.scope) else {
			return;
		};

		let command = DragCommand {
			name,
			uuid,
			bundle: Arc::clone(&self.bundle),
			scope: def.scope.clone(),
			extensions: def.extensions.iter().map(|ext| ext.trim_start_matches('.').to_string()).collect(),
			content: def.content.clone(),
		};
		trie.merge(SelectorTrie::from_selector(&selector, Arc::new(command)));
	}

	fn preference(&mut self, tries: &mut Tries, def: &PreferenceDef) {
		let label = item_label(def.name.as_deref(), None, &def.scope);
		let Some(selector) = self.selector(&label, &def.scope) else {
			return;
		};
		let settings = &def.settings;
		let pattern = |value: &Option<String>| value.clone().unwrap_or_default();

		let indent = IndentRules {
			increase: pattern(&settings.increase_indent_pattern),
			decrease: pattern(&settings.decrease_indent_pattern),
			indent_next_line: pattern(&settings.indent_next_line_pattern),
			unindented: pattern(&settings.unindented_line_pattern),
		};
		if !indent.is_empty() {
			tries.indent.merge(SelectorTrie::from_selector(&selector, indent));
		}

		if !settings.shell_variables.is_empty() {
			let vars: BTreeMap<_, _> = settings.shell_variables.iter().map(|var| (var.name.clone(), var.value.clone())).collect();
			tries.shell_variables.merge(SelectorTrie::from_selector(&selector, vars));
		}

		if !settings.smart_typing_pairs.is_empty() {
			let pairs: BTreeMap<_, _> = settings.smart_typing_pairs.iter().map(|[open, close]| (open.clone(), close.clone())).collect();
			tries.smart_typing_pairs.merge(SelectorTrie::from_selector(&selector, pairs));
		}

		if !settings.completions.is_empty() {
			tries.completions.merge(SelectorTrie::from_selector(&selector, settings.completions.clone()));
		}

		if let Some(command) = settings.completion_command.as_ref().filter(|command| !command.is_empty()) {
			let command = CompletionCommand {
				command: command.clone(),
				bundle: Arc::clone(&self.bundle),
			};
			tries.completion_commands.merge(SelectorTrie::from_selector(&selector, command));
		}

		if settings.disable_default_completion {
			tries.disable_completion.merge(SelectorTrie::from_selector(&selector, ()));
		}

		if settings.show_in_symbol_list {
			let transform = settings.symbol_transformation.clone().unwrap_or_default();
			tries.symbol_transforms.merge(SelectorTrie::from_selector(&selector, transform));
		}
	}

	fn syntax(&mut self, def: &SyntaxDef, folds: &mut SelectorTrie<FoldRule>) -> Option<SyntaxInfo> {
		if def.name.is_empty() {
			let label = item_label(None, Some(def.scope_name.as_str()), "syntax");
			self.problem(ProblemKind::MissingIdentity, &label, None, "syntax without name skipped");
			return None;
		}

		let markers = (def.folding_start_marker.as_deref(), def.folding_stop_marker.as_deref());
		if let (Some(start), Some(end)) = markers
			&& !start.is_empty()
			&& !end.is_empty()
			&& !def.scope_name.is_empty()
			&& let Some(selector) = self.selector(&def.name, &def.scope_name)
		{
			let rule = FoldRule {
				id: def.scope_name.clone(),
				start_marker: start.to_string(),
				end_marker: end.to_string(),
			};
			folds.merge(SelectorTrie::from_selector(&selector, rule));
		}

		Some(SyntaxInfo {
			name: def.name.clone(),
			scope_name: def.scope_name.clone(),
			file_types: def.file_types.clone(),
			shortcut: self.shortcut(&def.name, def.key_equivalent.as_deref()),
			bundle: Arc::clone(&self.bundle),
		})
	}

	fn theme(&mut self, def: &ThemeDef, defaults: &Style) -> LoadedTheme {
		let (theme, issues) = Theme::from_def(def, defaults);
		for issue in issues {
			self.problem(ProblemKind::InvalidColor, &format!("{}: {}", def.name, issue.setting), None, issue.error.to_string());
		}

		let mut styles = SelectorTrie::new();
		for style in &theme.styles {
			if style.scope.trim().is_empty() {
				continue;
			}
			let label = item_label(Some(style.name.as_str()), None, &style.scope);
			if let Some(selector) = self.selector(&label, &style.scope) {
				styles.merge(SelectorTrie::from_selector(&selector, Arc::clone(style)));
			}
		}

		LoadedTheme {
			theme: Arc::new(theme),
			styles,
		}
	}
}
