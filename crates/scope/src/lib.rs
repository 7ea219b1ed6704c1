//! Scope names and scope stacks.
//!
//! A [`ScopeName`] is a dotted syntactic category such as `string.quoted.double`.
//! A [`ScopeStack`] is the chain of scope names enclosing a document position,
//! outermost first and innermost last. Both are immutable snapshots that selector
//! matching reads from; neither knows anything about selectors.

mod name;
mod stack;

pub use name::{SCOPE_SEP, ScopeError, ScopeName};
pub use stack::ScopeStack;
