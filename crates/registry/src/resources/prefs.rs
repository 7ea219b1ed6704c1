use std::sync::Arc;

use super::key::Shortcut;

/// Which indentation pattern a query asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndentKind {
	Increase,
	Decrease,
	IndentNextLine,
	Unindented,
}

impl IndentKind {
	pub const ALL: [Self; 4] = [Self::Increase, Self::Decrease, Self::IndentNextLine, Self::Unindented];
}

/// Indentation regex patterns from one preference item. Empty means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndentRules {
	pub increase: String,
	pub decrease: String,
	pub indent_next_line: String,
	pub unindented: String,
}

impl IndentRules {
	pub fn pattern(&self, kind: IndentKind) -> &str {
		match kind {
			IndentKind::Increase => &self.increase,
			IndentKind::Decrease => &self.decrease,
			IndentKind::IndentNextLine => &self.indent_next_line,
			IndentKind::Unindented => &self.unindented,
		}
	}

	pub fn has(&self, kind: IndentKind) -> bool {
		!self.pattern(kind).is_empty()
	}

	pub fn is_empty(&self) -> bool {
		IndentKind::ALL.iter().all(|&kind| !self.has(kind))
	}
}

/// Start and end markers delimiting foldable regions for a syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldRule {
	/// Scope name of the syntax the rule came from.
	pub id: String,
	pub start_marker: String,
	pub end_marker: String,
}

/// A language grammar known to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxInfo {
	pub name: String,
	pub scope_name: String,
	pub file_types: Vec<String>,
	pub shortcut: Option<Shortcut>,
	pub bundle: Arc<str>,
}

impl SyntaxInfo {
	/// Matches `file_name` against the file types, either as the whole file
	/// name (`Makefile`) or as its extension (`rs`), case-insensitively.
	pub fn handles(&self, file_name: &str) -> bool {
		let ext = file_name.rsplit_once('.').map(|(_, ext)| ext);
		self.file_types
			.iter()
			.any(|ty| ty.eq_ignore_ascii_case(file_name) || ext.is_some_and(|ext| ty.eq_ignore_ascii_case(ext)))
	}
}
