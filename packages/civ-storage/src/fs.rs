use std::{
	fs,
	path::{Path, PathBuf},
};

use crate::{Error, Result};

/// Replaces `path` with `bytes` so readers only ever observe the old or the new content.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
	ensure_parent(path)?;

	let tmp_path = tmp_path_for(path);

	fs::write(&tmp_path, bytes).map_err(Error::io(&tmp_path))?;
	fs::rename(&tmp_path, path).map_err(Error::io(path))?;

	Ok(())
}

pub fn ensure_dir(dir: &Path) -> Result<()> {
	fs::create_dir_all(dir).map_err(Error::io(dir))
}

/// File name for a per-entity artifact.
pub fn entity_file(dir: &Path, entity_id: &str, extension: &str) -> Result<PathBuf> {
	validate_entity_id(entity_id)?;

	Ok(dir.join(format!("{entity_id}.{extension}")))
}

/// Rejects ids that would escape the artifact directory or change when trimmed.
pub fn validate_entity_id(entity_id: &str) -> Result<()> {
	let trimmed = entity_id.trim();

	if trimmed.is_empty()
		|| trimmed == "."
		|| trimmed == ".."
		|| trimmed.contains(['/', '\\'])
		|| trimmed != entity_id
	{
		return Err(Error::InvalidArgument(format!(
			"Entity id {entity_id:?} cannot be used as a file name."
		)));
	}

	Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
	match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
		_ => Ok(()),
	}
}

fn tmp_path_for(path: &Path) -> PathBuf {
	let mut name = path.file_name().map(|name| name.to_os_string()).unwrap_or_default();

	name.push(".tmp");

	path.with_file_name(name)
}
