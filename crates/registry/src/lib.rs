//! Resource registry for scope-dependent editor resources.
//!
//! Bundles contribute styles (through themes), snippets, commands, drag
//! commands, preferences and syntaxes, each tagged with a scope selector. The
//! [`ResourceRegistry`] merges them into one selector trie per resource kind
//! and answers typed queries for a [`ScopeStack`](tessera_scope::ScopeStack).

pub mod bundle;
mod config;
pub mod error;
mod registry;
pub mod resources;

pub use bundle::{BundleDef, BundleSource, DirBundleSource, MemoryBundleSource};
pub use config::{RegistryConfig, StyleDef};
pub use error::{BundleError, ColorError, ConfigError, KeyError};
pub use registry::{LoadMode, ProblemKind, RegistryProblem, ResourceRegistry, TrieKind};
pub use resources::{
	Action, ActionKind, Color, CompletionCommand, DragCommand, FoldRule, FontStyle, IndentKind, IndentRules, Modifiers, Shortcut, Style, SyntaxInfo, Theme,
};
