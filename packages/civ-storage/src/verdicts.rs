use std::{
	fs,
	path::{Path, PathBuf},
};

use civ_domain::Verdict;

use crate::{Error, Result, fs as store_fs};

pub const VERDICT_COLUMNS: [&str; 5] =
	["entity_id", "channel_id", "title", "description", "judgment"];

/// Per-entity verdict tables, one CSV file per entity.
pub struct VerdictStore {
	dir: PathBuf,
}
impl VerdictStore {
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}

	pub fn path_for(&self, entity_id: &str) -> Result<PathBuf> {
		store_fs::entity_file(&self.dir, entity_id, "csv")
	}

	/// Replaces the entity's table. The header is written even when there are no verdicts.
	pub fn write(&self, entity_id: &str, verdicts: &[Verdict]) -> Result<PathBuf> {
		let path = self.path_for(entity_id)?;
		let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(Vec::new());

		writer.write_record(VERDICT_COLUMNS).map_err(Error::csv(&path))?;

		for verdict in verdicts {
			writer.serialize(verdict).map_err(Error::csv(&path))?;
		}

		let bytes = writer.into_inner().map_err(|err| Error::Malformed {
			path: path.clone(),
			message: format!("Failed to flush verdict buffer: {err}."),
		})?;

		store_fs::write_atomic(&path, &bytes)?;

		Ok(path)
	}

	pub fn read(&self, entity_id: &str) -> Result<Vec<Verdict>> {
		read_table(&self.path_for(entity_id)?)
	}

	/// All `*.csv` tables in the directory, sorted by file name. A missing directory has none.
	pub fn list_tables(&self) -> Result<Vec<PathBuf>> {
		if !self.dir.is_dir() {
			return Ok(Vec::new());
		}

		let mut tables = Vec::new();

		for entry in fs::read_dir(&self.dir).map_err(Error::io(&self.dir))? {
			let path = entry.map_err(Error::io(&self.dir))?.path();

			if path.is_file() && path.extension().map(|ext| ext == "csv").unwrap_or(false) {
				tables.push(path);
			}
		}

		tables.sort();

		Ok(tables)
	}
}

/// Reads one table. Empty files, missing columns and unparseable rows are all reported as
/// [`Error::Malformed`].
pub fn read_table(path: &Path) -> Result<Vec<Verdict>> {
	let bytes = fs::read(path).map_err(Error::io(path))?;
	let malformed = |message: String| Error::Malformed { path: path.to_path_buf(), message };

	if bytes.iter().all(u8::is_ascii_whitespace) {
		return Err(malformed("Verdict table is empty.".to_string()));
	}

	let mut reader = csv::Reader::from_reader(bytes.as_slice());
	let header = reader.headers().map_err(|err| malformed(err.to_string()))?;

	for column in VERDICT_COLUMNS {
		if !header.iter().any(|name| name == column) {
			return Err(malformed(format!("Verdict table is missing the {column} column.")));
		}
	}

	let mut verdicts = Vec::new();

	for row in reader.deserialize::<Verdict>() {
		verdicts.push(row.map_err(|err| malformed(err.to_string()))?);
	}

	Ok(verdicts)
}
