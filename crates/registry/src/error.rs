//! Error types for configuration, bundle sources and bundle item values.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when reading registry configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or an unknown key.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// The default style carries a malformed color.
	#[error("invalid default style: {0}")]
	DefaultStyle(#[from] ColorError),
}

/// Errors raised by a [`BundleSource`](crate::BundleSource).
#[derive(Debug, Error)]
pub enum BundleError {
	/// No bundle with the requested id.
	#[error("unknown bundle: {0}")]
	Unknown(String),

	/// Error reading a bundle file or directory.
	#[error("I/O error reading {path}: {error}")]
	Io {
		path: PathBuf,
		error: std::io::Error,
	},

	/// A bundle file is not a valid bundle definition.
	#[error("invalid bundle {path}: {error}")]
	Decode {
		path: PathBuf,
		error: toml::de::Error,
	},
}

/// A color value could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
	#[error("color must start with '#': {0:?}")]
	MissingHash(String),
	#[error("expected #RRGGBB or #RRGGBBAA, got {0:?}")]
	Length(String),
	#[error("invalid hex digits in {0:?}")]
	Digits(String),
}

/// A key equivalent could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
	#[error("key equivalent is empty")]
	Empty,
	#[error("key equivalent {0:?} has modifiers but no key")]
	MissingKey(String),
	#[error("key equivalent {0:?} has more than one key")]
	TrailingKeys(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
