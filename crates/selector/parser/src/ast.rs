use std::fmt;
use std::sync::Arc;

use tessera_scope::{SCOPE_SEP, ScopeName};

use crate::parser::{ParseError, parse};

/// A dotted scope pattern, matched component-by-component as a prefix.
///
/// The empty pattern is universal and matches every scope name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ScopePattern {
	words: Vec<Arc<str>>,
}

impl ScopePattern {
	pub fn new<I, S>(words: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<Arc<str>>,
	{
		Self {
			words: words.into_iter().map(Into::into).collect(),
		}
	}

	/// The pattern matching every scope.
	pub fn universal() -> Self {
		Self::default()
	}

	pub fn words(&self) -> &[Arc<str>] {
		&self.words
	}

	pub fn len(&self) -> usize {
		self.words.len()
	}

	pub fn is_universal(&self) -> bool {
		self.words.is_empty()
	}

	/// `string.quoted` matches `string.quoted.double` but not `string.single`.
	pub fn matches(&self, scope: &ScopeName) -> bool {
		scope.starts_with(self.words.iter().map(|w| &**w))
	}
}

impl fmt::Display for ScopePattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.words.is_empty() {
			return f.write_str("*");
		}
		for (i, word) in self.words.iter().enumerate() {
			if i > 0 {
				write!(f, "{SCOPE_SEP}")?;
			}
			f.write_str(word)?;
		}
		Ok(())
	}
}

/// Selector syntax tree, built once per selector string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
	/// A dotted scope name pattern.
	Scope(ScopePattern),
	/// Whitespace-separated terms; the last term is innermost.
	Chain(Vec<Expr>),
	/// `|`/`,` separated alternatives.
	Alternation(Vec<Expr>),
	/// A parenthesized sub-expression.
	Group(Box<Expr>),
	/// A `-` prefixed term.
	Exclusion(Box<Expr>),
}

/// One positive term of a flattened chain together with the selectors it excludes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
	pub pattern: ScopePattern,
	/// Alternatives that must not match at the stack position this term matched.
	pub excludes: Vec<Chain>,
}

impl Term {
	pub fn new(pattern: ScopePattern) -> Self {
		Self {
			pattern,
			excludes: Vec::new(),
		}
	}
}

/// A flattened descendant chain, outermost term first.
///
/// A chain with no terms is universal: it matches any position whose innermost
/// scope is not matched by one of `excludes`. For chains with terms, exclusions
/// live on the individual [`Term`]s and `excludes` stays empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chain {
	pub terms: Vec<Term>,
	pub excludes: Vec<Chain>,
}

impl Chain {
	pub fn new(terms: Vec<Term>) -> Self {
		Self {
			terms,
			excludes: Vec::new(),
		}
	}

	pub fn is_universal(&self) -> bool {
		self.terms.is_empty()
	}

	/// The innermost term, which is the entry point of the trie walk.
	pub fn innermost(&self) -> Option<&Term> {
		self.terms.last()
	}
}

impl fmt::Display for Chain {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.terms.is_empty() {
			f.write_str("*")?;
			return write_excludes(f, &self.excludes);
		}
		for (i, term) in self.terms.iter().enumerate() {
			if i > 0 {
				f.write_str(" ")?;
			}
			write!(f, "{}", term.pattern)?;
			write_excludes(f, &term.excludes)?;
		}
		Ok(())
	}
}

fn write_excludes(f: &mut fmt::Formatter<'_>, excludes: &[Chain]) -> fmt::Result {
	if excludes.is_empty() {
		return Ok(());
	}
	f.write_str(" -(")?;
	for (i, chain) in excludes.iter().enumerate() {
		if i > 0 {
			f.write_str(" | ")?;
		}
		write!(f, "{chain}")?;
	}
	f.write_str(")")
}

/// A parsed selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
	source: Arc<str>,
	expr: Option<Expr>,
}

impl Selector {
	pub(crate) fn new(source: &str, expr: Option<Expr>) -> Self {
		Self {
			source: Arc::from(source),
			expr,
		}
	}

	/// Parses selector text. See [`parse`].
	pub fn parse(source: &str) -> Result<Self, ParseError> {
		parse(source)
	}

	/// Selector text as written.
	pub fn source(&self) -> &str {
		&self.source
	}

	/// Syntax tree, or `None` for the empty selector.
	pub fn expr(&self) -> Option<&Expr> {
		self.expr.as_ref()
	}

	/// Returns `true` for the empty selector, which matches every stack.
	pub fn is_empty(&self) -> bool {
		self.expr.is_none()
	}

	/// Flattens the selector into alternative descendant chains.
	///
	/// Groups distribute over chains, so `(a | b) c` yields `a c` and `b c`.
	/// The empty selector yields a single universal chain.
	pub fn chains(&self) -> Vec<Chain> {
		match &self.expr {
			Some(expr) => crate::flatten::flatten(expr),
			None => vec![Chain::default()],
		}
	}
}

impl fmt::Display for Selector {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.source)
	}
}
