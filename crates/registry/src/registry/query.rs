//! Typed scope-stack queries, one per resource kind.

use std::collections::BTreeMap;
use std::sync::Arc;

use tessera_scope::ScopeStack;
use tracing::trace;

use super::ResourceRegistry;
use crate::resources::{Action, CompletionCommand, DragCommand, FoldRule, IndentKind, Shortcut, Style, SyntaxInfo};

/// Resource kinds whose trie can be rendered with [`ResourceRegistry::dump`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrieKind {
	Styles,
	Actions,
	DragCommands,
	Indent,
	ShellVariables,
	SmartTypingPairs,
	Completions,
	CompletionCommands,
	DisableCompletion,
	SymbolTransforms,
	Folds,
}

impl ResourceRegistry {
	/// Style of the current theme for `stack`, or the default style.
	pub fn style(&self, stack: &ScopeStack) -> &Style {
		match self.theme.styles.resolve_best(stack) {
			Some(style) => style.as_ref(),
			None => self.default_style(),
		}
	}

	/// Every snippet and command applicable at `stack`.
	pub fn all_actions(&self, stack: &ScopeStack) -> Vec<Arc<Action>> {
		let hits: Vec<_> = self.tries.actions.resolve(stack).into_iter().cloned().collect();
		trace!(hits = hits.len(), "all_actions");
		hits
	}

	/// Actions bound to `shortcut` at `stack`, followed by syntaxes with that key equivalent.
	pub fn actions_for_key(&self, stack: &ScopeStack, shortcut: &Shortcut) -> Vec<Arc<Action>> {
		let mut hits: Vec<_> = self
			.tries
			.actions
			.resolve_where(stack, |action| action.matches_shortcut(shortcut))
			.into_iter()
			.cloned()
			.collect();
		hits.extend(self.syntax_actions.iter().filter(|action| action.matches_shortcut(shortcut)).cloned());
		trace!(%shortcut, hits = hits.len(), "actions_for_key");
		hits
	}

	/// Actions whose tab trigger is `trigger`, keeping only the most specific matches.
	pub fn actions_for_trigger(&self, trigger: &str, stack: &ScopeStack) -> Vec<Arc<Action>> {
		let Some(trie) = self.tries.triggers.get(trigger) else {
			return Vec::new();
		};
		let hits: Vec<_> = trie.resolve_top(stack).into_iter().cloned().collect();
		trace!(trigger, hits = hits.len(), "actions_for_trigger");
		hits
	}

	/// Drag commands at `stack` accepting files with extension `ext`.
	pub fn drag_commands(&self, stack: &ScopeStack, ext: &str) -> Vec<Arc<DragCommand>> {
		self.tries
			.drag_commands
			.resolve_where(stack, |command| command.accepts(ext))
			.into_iter()
			.cloned()
			.collect()
	}

	/// The most specific non-empty indentation pattern of `kind`, or `""`.
	pub fn indent_pattern(&self, stack: &ScopeStack, kind: IndentKind) -> &str {
		self.tries
			.indent
			.resolve_best_where(stack, |rules| rules.has(kind))
			.map_or("", |rules| rules.pattern(kind))
	}

	/// Union of all shell variables at `stack`; the most specific definition wins per name.
	pub fn shell_variables(&self, stack: &ScopeStack) -> BTreeMap<String, String> {
		let mut vars = BTreeMap::new();
		for hit in self.tries.shell_variables.resolve_ranked(stack).into_iter().rev() {
			vars.extend(hit.payload.iter().map(|(name, value)| (name.clone(), value.clone())));
		}
		vars
	}

	pub fn smart_typing_pairs(&self, stack: &ScopeStack) -> BTreeMap<String, String> {
		self.tries.smart_typing_pairs.resolve_best(stack).cloned().unwrap_or_default()
	}

	pub fn completion_list(&self, stack: &ScopeStack) -> Option<&[String]> {
		self.tries.completions.resolve_best(stack).map(Vec::as_slice)
	}

	pub fn completion_command(&self, stack: &ScopeStack) -> Option<&CompletionCommand> {
		self.tries.completion_commands.resolve_best(stack)
	}

	pub fn disable_default_completion(&self, stack: &ScopeStack) -> bool {
		self.tries.disable_completion.resolve_best(stack).is_some()
	}

	/// Transformation for symbol-list entries at `stack`; `None` if symbols there are not listed.
	pub fn symbol_transform(&self, stack: &ScopeStack) -> Option<&str> {
		self.tries.symbol_transforms.resolve_best(stack).map(String::as_str)
	}

	pub fn fold_rule(&self, stack: &ScopeStack) -> Option<&FoldRule> {
		self.tries.folds.resolve_best(stack)
	}

	pub fn syntaxes(&self) -> &[Arc<SyntaxInfo>] {
		&self.syntaxes
	}

	pub fn syntax(&self, name: &str) -> Option<&SyntaxInfo> {
		self.syntaxes.iter().find(|syntax| syntax.name == name).map(|syntax| &**syntax)
	}

	/// Name of the first syntax handling `file_name`, or the configured default syntax.
	pub fn syntax_for(&self, file_name: &str) -> &str {
		self.syntaxes
			.iter()
			.find(|syntax| syntax.handles(file_name))
			.map_or(self.config().default_syntax.as_str(), |syntax| syntax.name.as_str())
	}

	/// Renders the node structure of one trie.
	pub fn dump(&self, kind: TrieKind) -> String {
		let tries = &self.tries;
		match kind {
			TrieKind::Styles => self.theme.styles.dump(),
			TrieKind::Actions => tries.actions.dump(),
			TrieKind::DragCommands => tries.drag_commands.dump(),
			TrieKind::Indent => tries.indent.dump(),
			TrieKind::ShellVariables => tries.shell_variables.dump(),
			TrieKind::SmartTypingPairs => tries.smart_typing_pairs.dump(),
			TrieKind::Completions => tries.completions.dump(),
			TrieKind::CompletionCommands => tries.completion_commands.dump(),
			TrieKind::DisableCompletion => tries.disable_completion.dump(),
			TrieKind::SymbolTransforms => tries.symbol_transforms.dump(),
			TrieKind::Folds => tries.folds.dump(),
		}
	}
}
