use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use crate::name::{ScopeError, ScopeName};

/// Ordered chain of scope names enclosing a document position.
///
/// Index 0 is the outermost (root) context, the last index is the innermost.
/// An empty stack is valid; only universal selectors match it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ScopeStack {
	scopes: Vec<ScopeName>,
}

impl ScopeStack {
	/// Creates an empty stack.
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses each item as a scope name, outermost first.
	pub fn from_names<I, S>(names: I) -> Result<Self, ScopeError>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let scopes = names.into_iter().map(|name| ScopeName::new(name.as_ref())).collect::<Result<_, _>>()?;
		Ok(Self { scopes })
	}

	/// Parses a whitespace-separated list of scope names, outermost first.
	pub fn parse(text: &str) -> Result<Self, ScopeError> {
		Self::from_names(text.split_whitespace())
	}

	/// Appends a new innermost scope.
	pub fn push(&mut self, scope: ScopeName) {
		self.scopes.push(scope);
	}

	/// Removes and returns the innermost scope.
	pub fn pop(&mut self) -> Option<ScopeName> {
		self.scopes.pop()
	}

	pub fn len(&self) -> usize {
		self.scopes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.scopes.is_empty()
	}

	pub fn get(&self, level: usize) -> Option<&ScopeName> {
		self.scopes.get(level)
	}

	/// The innermost (current) scope.
	pub fn innermost(&self) -> Option<&ScopeName> {
		self.scopes.last()
	}

	/// Iterates outermost first.
	pub fn iter(&self) -> std::slice::Iter<'_, ScopeName> {
		self.scopes.iter()
	}

	pub fn as_slice(&self) -> &[ScopeName] {
		&self.scopes
	}
}

impl Index<usize> for ScopeStack {
	type Output = ScopeName;

	fn index(&self, level: usize) -> &Self::Output {
		&self.scopes[level]
	}
}

impl From<Vec<ScopeName>> for ScopeStack {
	fn from(scopes: Vec<ScopeName>) -> Self {
		Self { scopes }
	}
}

impl FromIterator<ScopeName> for ScopeStack {
	fn from_iter<T: IntoIterator<Item = ScopeName>>(iter: T) -> Self {
		Self {
			scopes: iter.into_iter().collect(),
		}
	}
}

impl<'a> IntoIterator for &'a ScopeStack {
	type Item = &'a ScopeName;
	type IntoIter = std::slice::Iter<'a, ScopeName>;

	fn into_iter(self) -> Self::IntoIter {
		self.scopes.iter()
	}
}

impl FromStr for ScopeStack {
	type Err = ScopeError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl fmt::Display for ScopeStack {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, scope) in self.scopes.iter().enumerate() {
			if i > 0 {
				f.write_str(" ")?;
			}
			write!(f, "{scope}")?;
		}
		Ok(())
	}
}
