use std::path::Path;

use civ_domain::{Ledger, LedgerEntry};

use crate::{Error, Result, fs as store_fs, ledger::RESERVED_COLUMNS};

/// Builds a fresh ledger from the seed list. Columns other than the id and label columns are
/// carried as entity metadata.
pub fn read_seed(path: &Path, seed: &civ_config::Seed) -> Result<Ledger> {
	let mut reader = csv::Reader::from_path(path).map_err(Error::csv(path))?;
	let header = reader.headers().map_err(Error::csv(path))?.clone();
	let position = |name: &str| {
		header.iter().position(|column| column == name).ok_or_else(|| Error::Malformed {
			path: path.to_path_buf(),
			message: format!("Seed list is missing the {name} column."),
		})
	};
	let id_idx = position(&seed.id_column)?;
	let label_idx = position(&seed.label_column)?;
	let mut metadata = Vec::new();

	for (idx, name) in header.iter().enumerate() {
		if idx == id_idx || idx == label_idx {
			continue;
		}
		if RESERVED_COLUMNS.contains(&name) {
			tracing::warn!(
				column = name,
				"Ignoring seed column that clashes with a ledger column."
			);

			continue;
		}

		metadata.push((idx, name.to_string()));
	}

	let mut ledger = Ledger::new(metadata.iter().map(|(_, name)| name.clone()).collect());

	for (row, record) in reader.records().enumerate() {
		let record = record.map_err(Error::csv(path))?;
		let entity_id = record.get(id_idx).unwrap_or_default().trim();

		if entity_id.is_empty() {
			return Err(Error::Malformed {
				path: path.to_path_buf(),
				message: format!("Seed row {} has an empty {}.", row + 1, seed.id_column),
			});
		}

		if let Err(err) = store_fs::validate_entity_id(entity_id) {
			return Err(Error::Malformed {
				path: path.to_path_buf(),
				message: format!("Seed row {}: {err}", row + 1),
			});
		}

		let label = record.get(label_idx).unwrap_or_default().trim();
		let mut entry = LedgerEntry::new(entity_id, label);

		for (idx, name) in &metadata {
			entry.metadata.push((name.clone(), record.get(*idx).unwrap_or_default().to_string()));
		}

		ledger.push(entry)?;
	}

	Ok(ledger)
}
