//! Scope selector parsing.
//!
//! Turns selector text such as `source.js string.quoted - string.regexp` or
//! `(meta.tag | text.html) entity.name` into a small AST, and flattens that AST
//! into alternatives of descendant [`Chain`]s ready to be indexed by a selector trie.
//!
//! ```text
//! selector    = alternation?
//! alternation = chain (("|" | ",") chain)*
//! chain       = term term*
//! term        = scope | "-" term | "(" alternation ")"
//! scope       = word ("." word)*
//! ```
//!
//! Groups and exclusions nest at most [`parser::MAX_NESTING`] deep, and a
//! selector may flatten into at most [`parser::MAX_CHAINS`] chains.

mod ast;
mod flatten;
pub mod parser;

pub use ast::{Chain, Expr, ScopePattern, Selector, Term};
pub use parser::{ParseError, ParseErrorKind, parse};
