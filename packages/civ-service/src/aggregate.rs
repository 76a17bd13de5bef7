//! Consolidated report of every positively judged channel, one row per ledger entity.

use std::{
	cmp::Ordering,
	collections::{HashMap, HashSet},
	path::{Path, PathBuf},
};

use civ_domain::{Judgment, Ledger, Verdict};
use civ_storage::{
	ledger::{ENTITY_ID_COLUMN, LABEL_COLUMN},
	report, verdicts,
};

use crate::{CivService, Result};

const CANDIDATE_COLUMNS: [&str; 3] = ["URL", "title", "description"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedTable {
	pub path: PathBuf,
	pub reason: String,
}

#[derive(Debug, Default)]
pub struct AggregateReport {
	pub output: PathBuf,
	pub rows: usize,
	/// Widest candidate group count across all rows.
	pub max_candidates: usize,
	pub skipped_tables: Vec<SkippedTable>,
}

/// One accepted channel, already reduced to report cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelCells {
	pub url: String,
	pub title: String,
	pub description: String,
}

impl CivService {
	/// Rebuilds the report from the verdict tables and the ledger. Unreadable tables are
	/// skipped.
	pub fn aggregate(&self) -> Result<AggregateReport> {
		let ledger = self.load_existing_ledger(&self.ledger_store())?;
		let tables = self.verdict_store().list_tables()?;
		let mut channels = HashMap::new();
		let mut skipped_tables = Vec::new();

		for path in tables {
			match read_entity_table(&path) {
				Ok((entity_id, verdicts)) => {
					if ledger.get(&entity_id).is_none() {
						tracing::warn!(
							path = %path.display(),
							entity_id = %entity_id,
							"Verdict table has no ledger entry. Skipping."
						);
						skipped_tables.push(SkippedTable {
							path,
							reason: format!("Entity {entity_id:?} is not in the ledger."),
						});

						continue;
					}

					channels.insert(
						entity_id,
						accepted_channels(verdicts, &self.cfg.report.profile_url_base),
					);
				},
				Err(reason) => {
					tracing::warn!(
						path = %path.display(),
						reason = %reason,
						"Skipping verdict table."
					);
					skipped_tables.push(SkippedTable { path, reason });
				},
			}
		}

		let (header, rows) =
			build_report(&ledger, &channels, self.cfg.report.sort_by_entity_id);
		let max_candidates = channels.values().map(Vec::len).max().unwrap_or(0);

		report::write_report(&self.cfg.paths.report, &header, &rows)?;

		tracing::info!(
			output = %self.cfg.paths.report.display(),
			rows = rows.len(),
			skipped = skipped_tables.len(),
			"Wrote channel report."
		);

		Ok(AggregateReport {
			output: self.cfg.paths.report.clone(),
			rows: rows.len(),
			max_candidates,
			skipped_tables,
		})
	}
}

/// Keeps `yes` verdicts, drops exact duplicates in first-seen order, and maps each channel to
/// its profile URL.
pub fn accepted_channels(verdicts: Vec<Verdict>, profile_url_base: &str) -> Vec<ChannelCells> {
	let mut seen = HashSet::new();

	verdicts
		.into_iter()
		.filter(|verdict| verdict.judgment == Judgment::Yes)
		.filter(|verdict| seen.insert(verdict.clone()))
		.map(|verdict| ChannelCells {
			url: format!("{profile_url_base}{}", verdict.channel_id),
			title: verdict.title,
			description: verdict.description,
		})
		.collect()
}

/// Left-joins the flattened channels onto the ledger. Status columns are left out.
pub fn build_report(
	ledger: &Ledger,
	channels: &HashMap<String, Vec<ChannelCells>>,
	sort_by_entity_id: bool,
) -> (Vec<String>, Vec<Vec<String>>) {
	let max_candidates = channels.values().map(Vec::len).max().unwrap_or(0);
	let mut header = vec![ENTITY_ID_COLUMN.to_string(), LABEL_COLUMN.to_string()];

	header.extend(ledger.metadata_columns().iter().cloned());

	for occurrence in 1..=max_candidates {
		header.extend(CANDIDATE_COLUMNS.iter().map(|column| format!("{column}_{occurrence}")));
	}

	let mut entries = ledger.entries().iter().collect::<Vec<_>>();

	if sort_by_entity_id {
		entries.sort_by(|a, b| compare_entity_ids(&a.entity_id, &b.entity_id));
	}

	let rows = entries
		.into_iter()
		.map(|entry| {
			let mut row = vec![entry.entity_id.clone(), entry.label.clone()];

			for column in ledger.metadata_columns() {
				row.push(entry.metadata_value(column).unwrap_or_default().to_string());
			}

			for cells in channels.get(&entry.entity_id).into_iter().flatten() {
				row.extend([cells.url.clone(), cells.title.clone(), cells.description.clone()]);
			}

			row.resize(header.len(), String::new());

			row
		})
		.collect();

	(header, rows)
}

/// Numeric ids sort numerically; anything else sorts as text after them.
fn compare_entity_ids(a: &str, b: &str) -> Ordering {
	match (a.parse::<u64>(), b.parse::<u64>()) {
		(Ok(x), Ok(y)) => x.cmp(&y),
		(Ok(_), Err(_)) => Ordering::Less,
		(Err(_), Ok(_)) => Ordering::Greater,
		(Err(_), Err(_)) => a.cmp(b),
	}
}

/// The table's entity id is its file stem; rows naming a different entity make it malformed.
fn read_entity_table(path: &Path) -> Result<(String, Vec<Verdict>), String> {
	let entity_id = path
		.file_stem()
		.and_then(|stem| stem.to_str())
		.map(str::to_string)
		.ok_or_else(|| "Verdict table name is not a valid entity id.".to_string())?;
	let verdicts = verdicts::read_table(path).map_err(|err| err.to_string())?;

	if let Some(stray) = verdicts.iter().find(|verdict| verdict.entity_id != entity_id) {
		return Err(format!(
			"Verdict table for {entity_id:?} contains a row for {:?}.",
			stray.entity_id
		));
	}

	Ok((entity_id, verdicts))
}
