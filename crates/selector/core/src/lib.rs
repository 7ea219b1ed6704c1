//! Scope selector trie.
//!
//! [`SelectorTrie`] indexes payloads of any type by scope selector and answers
//! "which payloads apply at this scope stack" queries. One trie exists per
//! resource kind; all of them share this implementation.
//!
//! - Selectors are parsed into fragments with [`SelectorTrie::from_selector`] and
//!   combined with [`SelectorTrie::merge`].
//! - Queries walk the stack from the innermost scope outward. [`SelectorTrie::resolve`]
//!   collects every hit; [`SelectorTrie::resolve_best`] ranks hits by [`Specificity`].

pub use eval::matches;
pub use specificity::Specificity;
pub use tessera_selector_parser as parser;
pub use trie::{Ranked, SelectorTrie};

mod eval;
mod matcher;
mod specificity;
mod trie;

#[cfg(test)]
mod tests;
