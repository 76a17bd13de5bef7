//! Durable ledger file with a backup taken before every overwrite.

use std::{
	fs,
	path::{Path, PathBuf},
};

use time::{OffsetDateTime, macros::format_description};

use civ_domain::{AnalyzeStatus, CrawlStatus, Ledger, LedgerEntry};

use crate::{Error, Result, fs as store_fs};

pub const ENTITY_ID_COLUMN: &str = "entity_id";
pub const LABEL_COLUMN: &str = "label";
pub const CRAWL_STATUS_COLUMN: &str = "crawl_status";
pub const ANALYZE_STATUS_COLUMN: &str = "analyze_status";
pub const RESERVED_COLUMNS: [&str; 4] =
	[ENTITY_ID_COLUMN, LABEL_COLUMN, CRAWL_STATUS_COLUMN, ANALYZE_STATUS_COLUMN];

pub struct LedgerStore {
	path: PathBuf,
	backup_dir: PathBuf,
}
impl LedgerStore {
	pub fn new(path: impl Into<PathBuf>, backup_dir: impl Into<PathBuf>) -> Self {
		Self { path: path.into(), backup_dir: backup_dir.into() }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn backup_dir(&self) -> &Path {
		&self.backup_dir
	}

	pub fn exists(&self) -> bool {
		self.path.is_file()
	}

	/// Loads the ledger, creating it from the seed list when no ledger file exists yet. The
	/// initial write takes no backup.
	pub fn load_or_seed(&self, seed_path: &Path, seed: &civ_config::Seed) -> Result<Ledger> {
		if self.exists() {
			return self.load();
		}

		let ledger = crate::seed::read_seed(seed_path, seed)?;

		tracing::info!(
			ledger = %self.path.display(),
			entities = ledger.len(),
			"Created ledger from seed list."
		);

		store_fs::write_atomic(&self.path, &encode_ledger(&ledger)?)?;

		Ok(ledger)
	}

	pub fn load(&self) -> Result<Ledger> {
		let bytes = fs::read(&self.path).map_err(Error::io(&self.path))?;

		decode_ledger(&self.path, &bytes)
	}

	pub fn save(&self, ledger: &Ledger) -> Result<Option<PathBuf>> {
		self.save_at(ledger, OffsetDateTime::now_utc())
	}

	/// Backs up the current ledger file (if any) and then replaces it. Returns the backup path.
	pub fn save_at(&self, ledger: &Ledger, now: OffsetDateTime) -> Result<Option<PathBuf>> {
		let backup = if self.exists() { Some(self.backup(now)?) } else { None };

		store_fs::write_atomic(&self.path, &encode_ledger(ledger)?)?;

		Ok(backup)
	}

	fn backup(&self, now: OffsetDateTime) -> Result<PathBuf> {
		store_fs::ensure_dir(&self.backup_dir)?;

		let stamp = now.format(format_description!("[year][month][day]_[hour][minute][second]"))?;
		let stem = self.path.file_stem().and_then(|s| s.to_str()).unwrap_or("ledger");
		let extension = self.path.extension().and_then(|s| s.to_str()).unwrap_or("csv");
		let mut target = self.backup_dir.join(format!("{stem}_{stamp}.{extension}"));
		let mut counter = 1_u32;

		while target.exists() {
			target = self.backup_dir.join(format!("{stem}_{stamp}_{counter}.{extension}"));
			counter += 1;
		}

		fs::copy(&self.path, &target).map_err(Error::io(&target))?;

		Ok(target)
	}
}

pub fn encode_ledger(ledger: &Ledger) -> Result<Vec<u8>> {
	let mut writer = csv::Writer::from_writer(Vec::new());
	let mut header = vec![ENTITY_ID_COLUMN, LABEL_COLUMN];

	header.extend(ledger.metadata_columns().iter().map(String::as_str));
	header.extend([CRAWL_STATUS_COLUMN, ANALYZE_STATUS_COLUMN]);
	writer.write_record(&header).map_err(Error::csv("<ledger>"))?;

	for entry in ledger.entries() {
		let mut record = vec![entry.entity_id.clone(), entry.label.clone()];

		for column in ledger.metadata_columns() {
			record.push(entry.metadata_value(column).unwrap_or_default().to_string());
		}

		record.push(entry.crawl_status.as_token().to_string());
		record.push(entry.analyze_status.to_token());
		writer.write_record(&record).map_err(Error::csv("<ledger>"))?;
	}

	writer
		.into_inner()
		.map_err(|err| Error::InvalidArgument(format!("Failed to flush ledger buffer: {err}.")))
}

pub fn decode_ledger(path: &Path, bytes: &[u8]) -> Result<Ledger> {
	let mut reader = csv::Reader::from_reader(bytes);
	let header = reader.headers().map_err(Error::csv(path))?.clone();
	let position = |name: &str| {
		header.iter().position(|column| column == name).ok_or_else(|| Error::Malformed {
			path: path.to_path_buf(),
			message: format!("Ledger is missing the {name} column."),
		})
	};
	let id_idx = position(ENTITY_ID_COLUMN)?;
	let label_idx = position(LABEL_COLUMN)?;
	let crawl_idx = position(CRAWL_STATUS_COLUMN)?;
	let analyze_idx = position(ANALYZE_STATUS_COLUMN)?;
	let metadata = header
		.iter()
		.enumerate()
		.filter(|(_, name)| !RESERVED_COLUMNS.contains(name))
		.map(|(idx, name)| (idx, name.to_string()))
		.collect::<Vec<_>>();
	let mut ledger = Ledger::new(metadata.iter().map(|(_, name)| name.clone()).collect());

	for record in reader.records() {
		let record = record.map_err(Error::csv(path))?;
		let field = |idx: usize| record.get(idx).unwrap_or_default();
		let crawl_status = CrawlStatus::parse(field(crawl_idx)).map_err(|err| Error::Malformed {
			path: path.to_path_buf(),
			message: format!("Entity {:?}: {err}", field(id_idx)),
		})?;
		let mut entry = LedgerEntry::new(field(id_idx), field(label_idx));

		for (idx, name) in &metadata {
			entry.metadata.push((name.clone(), field(*idx).to_string()));
		}

		entry.crawl_status = crawl_status;
		entry.analyze_status = AnalyzeStatus::parse(field(analyze_idx));

		ledger.push(entry)?;
	}

	Ok(ledger)
}
