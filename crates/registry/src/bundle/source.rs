use std::path::{Path, PathBuf};

use super::BundleDef;
use crate::error::BundleError;

/// Where the registry gets bundles from.
///
/// Bundle ids are opaque to the registry; it loads them in the order
/// [`bundle_ids`](Self::bundle_ids) returns.
pub trait BundleSource {
	fn bundle_ids(&self) -> Vec<String>;

	fn load(&self, id: &str) -> Result<BundleDef, BundleError>;

	/// Picks up bundles added or removed since the last scan.
	fn refresh(&mut self) -> Result<(), BundleError> {
		Ok(())
	}
}

/// Bundles held in memory, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryBundleSource {
	bundles: Vec<(String, BundleDef)>,
}

impl MemoryBundleSource {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a bundle, replacing any bundle with the same id in place.
	pub fn insert(&mut self, id: impl Into<String>, bundle: BundleDef) {
		let id = id.into();
		match self.bundles.iter_mut().find(|(existing, _)| *existing == id) {
			Some(slot) => slot.1 = bundle,
			None => self.bundles.push((id, bundle)),
		}
	}

	pub fn with(mut self, id: impl Into<String>, bundle: BundleDef) -> Self {
		self.insert(id, bundle);
		self
	}

	pub fn remove(&mut self, id: &str) -> Option<BundleDef> {
		let index = self.bundles.iter().position(|(existing, _)| existing == id)?;
		Some(self.bundles.remove(index).1)
	}
}

impl BundleSource for MemoryBundleSource {
	fn bundle_ids(&self) -> Vec<String> {
		self.bundles.iter().map(|(id, _)| id.clone()).collect()
	}

	fn load(&self, id: &str) -> Result<BundleDef, BundleError> {
		self.bundles
			.iter()
			.find(|(existing, _)| existing == id)
			.map(|(_, bundle)| bundle.clone())
			.ok_or_else(|| BundleError::Unknown(id.to_string()))
	}
}

/// A directory holding one `<id>.toml` file per bundle.
///
/// The directory is scanned on construction and on [`refresh`](BundleSource::refresh);
/// ids are file stems sorted by name.
#[derive(Debug, Clone)]
pub struct DirBundleSource {
	root: PathBuf,
	ids: Vec<String>,
}

impl DirBundleSource {
	pub fn new(root: impl Into<PathBuf>) -> Result<Self, BundleError> {
		let mut source = Self {
			root: root.into(),
			ids: Vec::new(),
		};
		source.refresh()?;
		Ok(source)
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	fn path_of(&self, id: &str) -> PathBuf {
		self.root.join(format!("{id}.toml"))
	}

	fn scan(&self) -> Result<Vec<String>, BundleError> {
		let io = |error: std::io::Error| BundleError::Io {
			path: self.root.clone(),
			error,
		};

		let mut ids = Vec::new();
		for entry in std::fs::read_dir(&self.root).map_err(io)? {
			let path = entry.map_err(io)?.path();
			if !path.is_file() || path.extension().is_none_or(|ext| ext != "toml") {
				continue;
			}
			if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
				ids.push(stem.to_string());
			}
		}
		ids.sort();
		Ok(ids)
	}
}

impl BundleSource for DirBundleSource {
	fn bundle_ids(&self) -> Vec<String> {
		self.ids.clone()
	}

	fn load(&self, id: &str) -> Result<BundleDef, BundleError> {
		if !self.ids.iter().any(|known| known == id) {
			return Err(BundleError::Unknown(id.to_string()));
		}

		let path = self.path_of(id);
		let text = std::fs::read_to_string(&path).map_err(|error| BundleError::Io { path: path.clone(), error })?;
		BundleDef::from_toml_str(&text).map_err(|error| BundleError::Decode { path, error })
	}

	fn refresh(&mut self) -> Result<(), BundleError> {
		self.ids = self.scan()?;
		tracing::debug!(root = %self.root.display(), bundles = self.ids.len(), "scanned bundle directory");
		Ok(())
	}
}
