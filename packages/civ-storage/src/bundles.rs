use std::{
	fs,
	io::ErrorKind,
	path::{Path, PathBuf},
};

use serde_json::Value;

use crate::{Error, Result, fs as store_fs};

/// Raw search responses, one JSON file per entity.
pub struct ResponseStore {
	dir: PathBuf,
}
impl ResponseStore {
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}

	pub fn path_for(&self, entity_id: &str) -> Result<PathBuf> {
		store_fs::entity_file(&self.dir, entity_id, "json")
	}

	pub fn exists(&self, entity_id: &str) -> Result<bool> {
		Ok(self.path_for(entity_id)?.is_file())
	}

	pub fn write(&self, entity_id: &str, documents: &[Value]) -> Result<PathBuf> {
		let path = self.path_for(entity_id)?;
		let bytes = serde_json::to_vec_pretty(documents).map_err(Error::json(&path))?;

		store_fs::write_atomic(&path, &bytes)?;

		Ok(path)
	}

	/// `Ok(None)` when no bundle was ever written for the entity.
	pub fn read(&self, entity_id: &str) -> Result<Option<Vec<Value>>> {
		let path = self.path_for(entity_id)?;
		let bytes = match fs::read(&path) {
			Ok(bytes) => bytes,
			Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
			Err(err) => return Err(Error::Io { path, source: err }),
		};
		let documents: Vec<Value> = serde_json::from_slice(&bytes).map_err(Error::json(&path))?;

		Ok(Some(documents))
	}
}
