//! Resource registry: one selector trie per resource kind, filled from bundles.
//!
//! Loading happens in generations. [`ResourceRegistry::load`] starts a
//! generation: depending on the [`LoadMode`] it discards the previous one,
//! registers every bundle's syntaxes at once and queues the bundles.
//! [`ResourceRegistry::do_idle`] then merges queued bundles a few at a time;
//! queries made in between see whatever has been merged so far.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tessera_selector::SelectorTrie;
use tracing::{debug, info, warn};

use crate::bundle::BundleSource;
use crate::config::RegistryConfig;
use crate::error::ConfigError;
use crate::resources::{Action, Color, CompletionCommand, DragCommand, FoldRule, IndentRules, Style, SyntaxInfo, Theme};

mod diagnostics;
mod load;
mod query;

pub use diagnostics::{ProblemKind, RegistryProblem};
use diagnostics::Problems;
pub use query::TrieKind;

/// How [`ResourceRegistry::load`] treats what is already registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
	/// Load from `source` without rescanning it. State left by an earlier
	/// generation is discarded, so repeating it behaves like [`LoadMode::Reload`].
	Init,
	/// Rescan the source, then rebuild everything.
	Update,
	/// Rebuild everything from the current bundle set.
	Reload,
}

/// A theme together with the style trie built from its scoped settings.
#[derive(Debug, Clone)]
pub(crate) struct LoadedTheme {
	pub(crate) theme: Arc<Theme>,
	pub(crate) styles: SelectorTrie<Arc<Style>>,
}

/// Per-kind tries rebuilt on every load generation.
#[derive(Debug, Default)]
pub(crate) struct Tries {
	pub(crate) actions: SelectorTrie<Arc<Action>>,
	pub(crate) triggers: FxHashMap<String, SelectorTrie<Arc<Action>>>,
	pub(crate) drag_commands: SelectorTrie<Arc<DragCommand>>,
	pub(crate) indent: SelectorTrie<IndentRules>,
	pub(crate) shell_variables: SelectorTrie<BTreeMap<String, String>>,
	pub(crate) smart_typing_pairs: SelectorTrie<BTreeMap<String, String>>,
	pub(crate) completions: SelectorTrie<Vec<String>>,
	pub(crate) completion_commands: SelectorTrie<CompletionCommand>,
	pub(crate) disable_completion: SelectorTrie<()>,
	pub(crate) symbol_transforms: SelectorTrie<String>,
	pub(crate) folds: SelectorTrie<FoldRule>,
}

/// Owner of every scope-dependent resource contributed by bundles.
#[derive(Debug)]
pub struct ResourceRegistry {
	config: RegistryConfig,
	default_style: Arc<Style>,
	builtin_theme: Arc<LoadedTheme>,
	pub(crate) tries: Tries,
	pub(crate) syntaxes: Vec<Arc<SyntaxInfo>>,
	/// Syntax switches reachable through key equivalents.
	pub(crate) syntax_actions: Vec<Arc<Action>>,
	pub(crate) themes: Vec<Arc<LoadedTheme>>,
	pub(crate) theme: Arc<LoadedTheme>,
	/// Theme picked with [`set_theme`](Self::set_theme); survives reloads.
	selected_theme: Option<String>,
	queue: VecDeque<String>,
	loaded: Vec<Arc<str>>,
	generation: u64,
	pub(crate) problems: Problems,
}

impl Default for ResourceRegistry {
	fn default() -> Self {
		Self::with_default_style(RegistryConfig::default(), Style::fallback(Color::BLACK, Color::WHITE))
	}
}

impl ResourceRegistry {
	/// Creates an empty registry.
	///
	/// # Errors
	///
	/// Returns [`ConfigError::DefaultStyle`] if the configured fallback style has malformed colors.
	pub fn new(config: RegistryConfig) -> Result<Self, ConfigError> {
		let style = config.default_style.to_style()?;
		Ok(Self::with_default_style(config, style))
	}

	fn with_default_style(config: RegistryConfig, style: Style) -> Self {
		let builtin = Arc::new(LoadedTheme {
			theme: Arc::new(Theme {
				name: "Default".to_string(),
				uuid: String::new(),
				foreground: style.foreground.unwrap_or(Color::BLACK),
				background: style.background.unwrap_or(Color::WHITE),
				styles: Vec::new(),
			}),
			styles: SelectorTrie::new(),
		});
		let problems = Problems::new(config.max_problems);

		Self {
			config,
			default_style: Arc::new(style),
			theme: Arc::clone(&builtin),
			builtin_theme: builtin,
			tries: Tries::default(),
			syntaxes: Vec::new(),
			syntax_actions: Vec::new(),
			themes: Vec::new(),
			selected_theme: None,
			queue: VecDeque::new(),
			loaded: Vec::new(),
			generation: 0,
			problems,
		}
	}

	pub fn config(&self) -> &RegistryConfig {
		&self.config
	}

	/// Starts a load generation.
	///
	/// Syntaxes of every bundle are registered immediately; everything else is
	/// queued for [`do_idle`](Self::do_idle) or [`load_all`](Self::load_all).
	pub fn load<S: BundleSource + ?Sized>(&mut self, source: &mut S, mode: LoadMode) {
		self.generation += 1;
		self.problems.clear();

		match mode {
			LoadMode::Init | LoadMode::Reload => self.clear(),
			LoadMode::Update => {
				self.clear();
				if let Err(err) = source.refresh() {
					self.problems.push(RegistryProblem {
						kind: ProblemKind::BundleUnavailable,
						bundle: Arc::from(""),
						item: String::new(),
						selector: None,
						message: err.to_string(),
					});
				}
			}
		}

		self.queue.clear();

		for id in source.bundle_ids() {
			match source.load(&id) {
				Ok(bundle) => {
					self.register_syntaxes(&id, &bundle);
					self.queue.push_back(id);
				}
				Err(err) => self.problems.push(RegistryProblem {
					kind: ProblemKind::BundleUnavailable,
					bundle: Arc::from(id.as_str()),
					item: String::new(),
					selector: None,
					message: err.to_string(),
				}),
			}
		}

		debug!(generation = self.generation, ?mode, bundles = self.queue.len(), syntaxes = self.syntaxes.len(), "started bundle load");
		self.apply_preferred_theme();
		if self.queue.is_empty() {
			self.finish_generation();
		}
	}

	/// Loads the next batch of queued bundles. Returns `true` while more remain.
	pub fn do_idle<S: BundleSource + ?Sized>(&mut self, source: &S) -> bool {
		if self.queue.is_empty() {
			return false;
		}

		for _ in 0..self.config.idle_batch.max(1) {
			let Some(id) = self.queue.pop_front() else {
				break;
			};
			self.load_bundle(source, &id);
		}

		self.apply_preferred_theme();
		if self.queue.is_empty() {
			self.finish_generation();
			return false;
		}
		true
	}

	/// Loads every queued bundle.
	pub fn load_all<S: BundleSource + ?Sized>(&mut self, source: &S) {
		while self.do_idle(source) {}
	}

	pub fn all_bundles_loaded(&self) -> bool {
		self.queue.is_empty()
	}

	/// Number of load generations started so far.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Names of bundles merged in the current generation, in load order.
	pub fn loaded_bundles(&self) -> &[Arc<str>] {
		&self.loaded
	}

	/// Problems kept for the current generation.
	pub fn problems(&self) -> &[RegistryProblem] {
		self.problems.kept()
	}

	/// Problems reported in the current generation, including those over the cap.
	pub fn problem_count(&self) -> usize {
		self.problems.total()
	}

	/// Drops every registered resource and collected theme.
	pub fn clear(&mut self) {
		self.tries = Tries::default();
		self.syntaxes.clear();
		self.syntax_actions.clear();
		self.themes.clear();
		self.theme = Arc::clone(&self.builtin_theme);
		self.queue.clear();
		self.loaded.clear();
	}

	/// Switches to the theme called `name`.
	///
	/// Returns `false`, keeping the current theme, when no loaded bundle provides it.
	pub fn set_theme(&mut self, name: &str) -> bool {
		let Some(theme) = self.themes.iter().find(|loaded| loaded.theme.name == name) else {
			return false;
		};
		self.theme = Arc::clone(theme);
		self.selected_theme = Some(name.to_string());
		debug!(theme = name, "theme applied");
		true
	}

	pub fn theme(&self) -> &Theme {
		&self.theme.theme
	}

	/// Names of all themes collected so far.
	pub fn theme_names(&self) -> impl Iterator<Item = &str> {
		self.themes.iter().map(|loaded| loaded.theme.name.as_str())
	}

	pub fn default_style(&self) -> &Style {
		&self.default_style
	}

	fn apply_preferred_theme(&mut self) {
		let Some(name) = self.selected_theme.as_ref().or(self.config.default_theme.as_ref()) else {
			return;
		};
		if self.theme.theme.name == *name {
			return;
		}
		if let Some(theme) = self.themes.iter().find(|loaded| loaded.theme.name == *name) {
			self.theme = Arc::clone(theme);
			debug!(theme = %name, "theme applied");
		}
	}

	fn finish_generation(&self) {
		info!(
			generation = self.generation,
			bundles = self.loaded.len(),
			actions = self.tries.actions.len(),
			drag_commands = self.tries.drag_commands.len(),
			preferences = self.tries.indent.len() + self.tries.shell_variables.len() + self.tries.completions.len(),
			syntaxes = self.syntaxes.len(),
			themes = self.themes.len(),
			problems = self.problems.total(),
			"bundle load complete"
		);
	}

	fn warn_problems(&self, bundle: &str, since: usize) {
		let new = self.problems.total() - since;
		if new == 0 {
			return;
		}
		let samples: Vec<_> = self.problems.kept().iter().skip(since).take(5).collect();
		warn!(bundle, count = new, ?samples, "bundle load problems");
	}
}

#[cfg(test)]
mod tests;
