use std::path::Path;

use crate::{Error, Result, fs as store_fs};

/// Writes the consolidated report. Rows shorter than the header are padded with empty cells.
pub fn write_report(path: &Path, header: &[String], rows: &[Vec<String>]) -> Result<()> {
	let mut writer = csv::Writer::from_writer(Vec::new());

	writer.write_record(header).map_err(Error::csv(path))?;

	for row in rows {
		let mut cells = row.clone();

		cells.resize(header.len(), String::new());
		writer.write_record(&cells).map_err(Error::csv(path))?;
	}

	let bytes = writer.into_inner().map_err(|err| Error::Malformed {
		path: path.to_path_buf(),
		message: format!("Failed to flush report buffer: {err}."),
	})?;

	store_fs::write_atomic(path, &bytes)
}
