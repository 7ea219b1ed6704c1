use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tessera_registry::TrieKind;

#[derive(Parser, Debug)]
#[command(name = "tessera")]
#[command(about = "Inspect bundles and scope selectors")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Raise log verbosity (-v debug, -vv trace); RUST_LOG overrides
	#[arg(short, long, action = ArgAction::Count, global = true)]
	pub verbose: u8,

	/// Registry configuration file (TOML)
	#[arg(long, value_name = "FILE", global = true)]
	pub config: Option<PathBuf>,

	/// Directory holding one `<id>.toml` file per bundle
	pub bundles: PathBuf,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Show the resources that apply at a scope stack
	Resolve {
		/// Scope names, outermost first
		#[arg(required = true)]
		stack: Vec<String>,

		/// Only list actions bound to this key equivalent (e.g. `^~@j`)
		#[arg(long, value_name = "KEY")]
		key: Option<String>,

		/// Only list actions with this tab trigger
		#[arg(long, conflicts_with = "key")]
		trigger: Option<String>,

		/// Theme to resolve styles with
		#[arg(long, short = 't')]
		theme: Option<String>,
	},
	/// Load every bundle and report selector problems
	Check,
	/// Parse a selector and print its flattened chains
	Parse {
		/// Selector text, e.g. `source.js string - string.regexp`
		selector: String,
	},
	/// Print the node structure of one resource trie
	Dump {
		/// Resource kind
		#[arg(value_enum, default_value_t = DumpKind::Styles)]
		kind: DumpKind,
	},
}

/// Trie names accepted by `dump`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpKind {
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

impl From<DumpKind> for TrieKind {
	fn from(kind: DumpKind) -> Self {
		match kind {
			DumpKind::Styles => Self::Styles,
			DumpKind::Actions => Self::Actions,
			DumpKind::DragCommands => Self::DragCommands,
			DumpKind::Indent => Self::Indent,
			DumpKind::ShellVariables => Self::ShellVariables,
			DumpKind::SmartTypingPairs => Self::SmartTypingPairs,
			DumpKind::Completions => Self::Completions,
			DumpKind::CompletionCommands => Self::CompletionCommands,
			DumpKind::DisableCompletion => Self::DisableCompletion,
			DumpKind::SymbolTransforms => Self::SymbolTransforms,
			DumpKind::Folds => Self::Folds,
		}
	}
}
