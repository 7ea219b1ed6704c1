//! # Parser
//!
//! Recursive-descent parser for scope selectors.
//!
//! ## Tokens
//!
//! - `word`: starts with any character that is not whitespace or one of `. , | ( ) -`
//!   and runs until whitespace or one of `. , | ( )`. A `-` inside a word is part of it.
//! - `.` separates scope name components.
//! - `|` and `,` separate alternatives.
//! - `(` and `)` group.
//! - `-` at the start of a token excludes the following term.
//!
//! Whitespace between terms is the descendant combinator; the last term of a chain
//! is the innermost scope.

use std::fmt;

use crate::ast::{Expr, ScopePattern, Selector};
use crate::flatten;

#[cfg(test)]
mod tests;

/// Deepest allowed nesting of groups and exclusions.
pub const MAX_NESTING: usize = 128;

/// Most chains a selector may flatten into, excluded chains included.
pub const MAX_CHAINS: usize = 4096;

/// Classification of a selector parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
	/// A token that cannot appear at this position.
	UnexpectedToken,
	/// `(` without a matching `)`, or a stray `)`.
	UnbalancedParen,
	/// A `.` that is not followed by a word.
	EmptyScopeName,
	/// `()`.
	EmptyGroup,
	/// An operator with nothing after it (`a |`, `a -`).
	TrailingOperator,
	/// An alternative or group with no term (`| a`, `a || b`).
	MissingTerm,
	/// Groups or exclusions nested deeper than [`MAX_NESTING`].
	TooDeep,
	/// Grouped alternatives that flatten into more than [`MAX_CHAINS`] chains.
	TooComplex,
}

/// Represents an error that occurred during parsing.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ParseError {
	pub kind: ParseErrorKind,
	/// Human-readable description of the parse error.
	pub message: String,
	/// Byte offset in the input where the error occurred.
	pub position: usize,
}

impl fmt::Display for ParseError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Parse error at position {}: {}", self.position, self.message)
	}
}

impl std::error::Error for ParseError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
	Eof,
	Word,
	Dot,
	Or,
	ParenStart,
	ParenEnd,
	Minus,
}

impl TokenKind {
	fn describe(self) -> &'static str {
		match self {
			Self::Eof => "end of input",
			Self::Word => "scope name",
			Self::Dot => "'.'",
			Self::Or => "'|'",
			Self::ParenStart => "'('",
			Self::ParenEnd => "')'",
			Self::Minus => "'-'",
		}
	}

	/// Tokens that may start a term.
	fn starts_term(self) -> bool {
		matches!(self, Self::Word | Self::ParenStart | Self::Minus)
	}
}

#[derive(Debug, Clone, Copy)]
struct Token<'a> {
	kind: TokenKind,
	text: &'a str,
	position: usize,
}

fn is_delimiter(ch: char) -> bool {
	ch.is_whitespace() || matches!(ch, '.' | ',' | '|' | '(' | ')')
}

/// Maintains the parser's state for recursive descent parsing.
struct Parser<'a> {
	/// The full input string being parsed.
	input: &'a str,
	/// Byte position of the next unread character.
	position: usize,
	/// One token of lookahead.
	current: Token<'a>,
	/// Groups and exclusions currently open.
	depth: usize,
}

impl<'a> Parser<'a> {
	fn new(input: &'a str) -> Self {
		let mut parser = Self {
			input,
			position: 0,
			current: Token {
				kind: TokenKind::Eof,
				text: "",
				position: 0,
			},
			depth: 0,
		};
		parser.advance();
		parser
	}

	fn rest(&self) -> &'a str {
		&self.input[self.position..]
	}

	/// Reads the next token into `current`.
	fn advance(&mut self) {
		let skipped = self.rest().len() - self.rest().trim_start().len();
		self.position += skipped;

		let start = self.position;
		let Some(ch) = self.rest().chars().next() else {
			self.current = Token {
				kind: TokenKind::Eof,
				text: "",
				position: start,
			};
			return;
		};

		let kind = match ch {
			'.' => TokenKind::Dot,
			',' | '|' => TokenKind::Or,
			'(' => TokenKind::ParenStart,
			')' => TokenKind::ParenEnd,
			'-' => TokenKind::Minus,
			_ => TokenKind::Word,
		};

		let len = match kind {
			TokenKind::Word => self.rest().find(is_delimiter).unwrap_or(self.rest().len()),
			_ => ch.len_utf8(),
		};

		self.position += len;
		self.current = Token {
			kind,
			text: &self.input[start..start + len],
			position: start,
		};
	}

	fn peek(&self) -> TokenKind {
		self.current.kind
	}

	/// Returns `true` if there is whitespace right before the current token.
	fn preceded_by_space(&self) -> bool {
		self.input[..self.current.position].ends_with(char::is_whitespace)
	}

	fn error(&self, kind: ParseErrorKind, message: String) -> ParseError {
		ParseError {
			kind,
			message,
			position: self.current.position,
		}
	}

	/// Opens a group or exclusion at the current token.
	fn enter(&mut self) -> Result<(), ParseError> {
		if self.depth >= MAX_NESTING {
			return Err(self.error(ParseErrorKind::TooDeep, format!("selector nests deeper than {MAX_NESTING} levels")));
		}
		self.depth += 1;
		Ok(())
	}

	fn leave(&mut self) {
		self.depth -= 1;
	}

	fn unexpected(&self, expected: &str) -> ParseError {
		let kind = match self.peek() {
			TokenKind::ParenEnd => ParseErrorKind::UnbalancedParen,
			TokenKind::Eof => ParseErrorKind::TrailingOperator,
			TokenKind::Or => ParseErrorKind::MissingTerm,
			_ => ParseErrorKind::UnexpectedToken,
		};
		let found = match self.peek() {
			TokenKind::Word => format!("'{}'", self.current.text),
			other => other.describe().to_string(),
		};
		self.error(kind, format!("expected {expected}, found {found}"))
	}
}

/// Parses selector text into a [`Selector`].
///
/// An empty or all-whitespace selector is valid and matches every scope stack.
///
/// # Errors
///
/// Returns a [`ParseError`] with the byte position of the first offending token.
pub fn parse(s: &str) -> Result<Selector, ParseError> {
	let mut parser = Parser::new(s);
	if parser.peek() == TokenKind::Eof {
		return Ok(Selector::new(s, None));
	}

	let expr = parse_alternation(&mut parser)?;

	match parser.peek() {
		TokenKind::Eof if flatten::expansion(&expr) > MAX_CHAINS => Err(ParseError {
			kind: ParseErrorKind::TooComplex,
			message: format!("selector expands to more than {MAX_CHAINS} chains"),
			position: 0,
		}),
		TokenKind::Eof => Ok(Selector::new(s, Some(expr))),
		TokenKind::ParenEnd => Err(parser.error(ParseErrorKind::UnbalancedParen, "unmatched ')'".to_string())),
		_ => Err(parser.unexpected("end of input")),
	}
}

/// Grammar: `alternation = chain (OR chain)*`
fn parse_alternation(parser: &mut Parser) -> Result<Expr, ParseError> {
	let mut alternatives = vec![parse_chain(parser)?];

	while parser.peek() == TokenKind::Or {
		parser.advance();
		alternatives.push(parse_chain(parser)?);
	}

	Ok(match alternatives.len() {
		1 => alternatives.swap_remove(0),
		_ => Expr::Alternation(alternatives),
	})
}

/// Grammar: `chain = term term*`
fn parse_chain(parser: &mut Parser) -> Result<Expr, ParseError> {
	if !parser.peek().starts_term() {
		return Err(parser.unexpected("a scope selector"));
	}

	let mut terms = Vec::new();
	while parser.peek().starts_term() {
		// A word glued to a preceding group, as in `(a)b`, is malformed.
		if !terms.is_empty() && parser.peek() == TokenKind::Word && !parser.preceded_by_space() {
			return Err(parser.unexpected("whitespace, '|' or ')'"));
		}
		terms.push(parse_term(parser)?);
	}

	Ok(match terms.len() {
		1 => terms.swap_remove(0),
		_ => Expr::Chain(terms),
	})
}

/// Grammar: `term = scope | MINUS term | PAREN_START alternation PAREN_END`
fn parse_term(parser: &mut Parser) -> Result<Expr, ParseError> {
	match parser.peek() {
		TokenKind::Word => parse_scope(parser).map(Expr::Scope),
		TokenKind::Minus => {
			parser.enter()?;
			parser.advance();
			if !parser.peek().starts_term() {
				return Err(parser.unexpected("a term after '-'"));
			}
			let inner = parse_term(parser)?;
			parser.leave();
			Ok(Expr::Exclusion(Box::new(inner)))
		}
		TokenKind::ParenStart => {
			let open = parser.current.position;
			parser.enter()?;
			parser.advance();
			if parser.peek() == TokenKind::ParenEnd {
				return Err(parser.error(ParseErrorKind::EmptyGroup, "empty group '()'".to_string()));
			}

			let inner = parse_alternation(parser)?;
			if parser.peek() != TokenKind::ParenEnd {
				return Err(ParseError {
					kind: ParseErrorKind::UnbalancedParen,
					message: format!("unclosed '(' opened at position {open}"),
					position: open,
				});
			}
			parser.advance();
			parser.leave();
			Ok(Expr::Group(Box::new(inner)))
		}
		_ => Err(parser.unexpected("a scope selector")),
	}
}

/// Grammar: `scope = WORD (DOT WORD)*`
fn parse_scope(parser: &mut Parser) -> Result<ScopePattern, ParseError> {
	let mut words = vec![parser.current.text];
	parser.advance();

	while parser.peek() == TokenKind::Dot {
		let dot = parser.current.position;
		if parser.preceded_by_space() {
			return Err(ParseError {
				kind: ParseErrorKind::EmptyScopeName,
				message: "expected a scope name component before '.'".to_string(),
				position: dot,
			});
		}
		parser.advance();
		if parser.peek() != TokenKind::Word || parser.preceded_by_space() {
			return Err(ParseError {
				kind: ParseErrorKind::EmptyScopeName,
				message: "expected a scope name component after '.'".to_string(),
				position: dot,
			});
		}
		words.push(parser.current.text);
		parser.advance();
	}

	Ok(ScopePattern::new(words))
}
