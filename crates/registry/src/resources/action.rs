use std::sync::Arc;

use super::key::Shortcut;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
	Snippet,
	Command,
	/// A syntax selectable through its key equivalent.
	Syntax,
}

/// A bundle item the user can invoke: a snippet, a command or a syntax switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
	pub kind: ActionKind,
	pub name: String,
	pub uuid: String,
	pub bundle: Arc<str>,
	pub scope: String,
	pub trigger: Option<String>,
	pub shortcut: Option<Shortcut>,
	pub content: String,
}

impl Action {
	pub fn is_snippet(&self) -> bool {
		self.kind == ActionKind::Snippet
	}

	pub fn matches_shortcut(&self, shortcut: &Shortcut) -> bool {
		self.shortcut.as_ref() == Some(shortcut)
	}
}

/// A command run when files are dropped onto the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragCommand {
	pub name: String,
	pub uuid: String,
	pub bundle: Arc<str>,
	pub scope: String,
	/// File extensions accepted, without the leading dot.
	pub extensions: Vec<String>,
	pub content: String,
}

impl DragCommand {
	/// Case-insensitive extension check; a leading dot on `ext` is ignored.
	pub fn accepts(&self, ext: &str) -> bool {
		let ext = ext.strip_prefix('.').unwrap_or(ext);
		self.extensions.iter().any(|candidate| candidate.eq_ignore_ascii_case(ext))
	}
}

/// A shell command producing completions, and the bundle that supplied it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionCommand {
	pub command: String,
	pub bundle: Arc<str>,
}
