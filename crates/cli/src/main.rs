//! `tessera`: loads a directory of TOML bundles and answers scope queries from the command line.

mod cli;
mod report;

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::Parser;
use cli::{Cli, Command};
use tessera_registry::{DirBundleSource, LoadMode, RegistryConfig, ResourceRegistry, Shortcut};
use tessera_scope::ScopeStack;
use tessera_selector::parser::Selector;
use tracing::info;

fn main() -> anyhow::Result<ExitCode> {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);

	match cli.command {
		Command::Parse { selector } => return Ok(parse_selector(&selector)),
		Command::Resolve { stack, key, trigger, theme } => {
			let mut registry = load_registry(cli.config.as_deref(), &cli.bundles)?;
			if let Some(name) = theme
				&& !registry.set_theme(&name)
			{
				let known: Vec<_> = registry.theme_names().collect();
				bail!("unknown theme {name:?} (available: {})", known.join(", "));
			}

			let stack = ScopeStack::from_names(&stack).context("invalid scope stack")?;
			let actions = match (key, trigger) {
				(Some(key), _) => {
					let shortcut = Shortcut::parse(&key).with_context(|| format!("invalid key equivalent {key:?}"))?;
					registry.actions_for_key(&stack, &shortcut)
				}
				(None, Some(trigger)) => registry.actions_for_trigger(&trigger, &stack),
				(None, None) => registry.all_actions(&stack),
			};
			print!("{}", report::resolution(&registry, &stack, &actions));
		}
		Command::Check => {
			let registry = load_registry(cli.config.as_deref(), &cli.bundles)?;
			print!("{}", report::problems(&registry));
			if registry.problem_count() > 0 {
				return Ok(ExitCode::FAILURE);
			}
		}
		Command::Dump { kind } => {
			let registry = load_registry(cli.config.as_deref(), &cli.bundles)?;
			print!("{}", registry.dump(kind.into()));
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn parse_selector(selector: &str) -> ExitCode {
	match Selector::parse(selector) {
		Ok(parsed) => {
			print!("{}", report::chains(&parsed));
			ExitCode::SUCCESS
		}
		Err(err) => {
			eprint!("{}", report::parse_error(selector, &err));
			ExitCode::FAILURE
		}
	}
}

fn load_registry(config: Option<&Path>, bundles: &Path) -> anyhow::Result<ResourceRegistry> {
	let config = match config {
		Some(path) => RegistryConfig::from_path(path).with_context(|| format!("failed to read config {}", path.display()))?,
		None => RegistryConfig::default(),
	};
	let mut registry = ResourceRegistry::new(config).context("invalid registry configuration")?;
	let mut source = DirBundleSource::new(bundles).with_context(|| format!("failed to open bundle directory {}", bundles.display()))?;

	registry.load(&mut source, LoadMode::Init);
	registry.load_all(&source);
	info!(bundles = registry.loaded_bundles().len(), problems = registry.problem_count(), "registry ready");
	Ok(registry)
}

fn setup_tracing(verbose: u8) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
		0 => EnvFilter::new("warn"),
		1 => EnvFilter::new("debug"),
		_ => EnvFilter::new("trace"),
	});

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
