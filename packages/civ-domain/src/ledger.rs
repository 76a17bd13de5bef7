//! Per-entity progress tracking.
//!
//! The ledger is the only record of pipeline progress. Entries keep the order in which they were
//! seeded, are never removed, and only their two status fields ever change.

use std::{collections::HashMap, fmt};

const TOKEN_YES: &str = "yes";
const TOKEN_NO: &str = "no";
const ERROR_PREFIX: &str = "error:";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
	#[error("Entity {entity_id:?} is already tracked.")]
	DuplicateEntity { entity_id: String },
	#[error("Entity {entity_id:?} is not tracked.")]
	UnknownEntity { entity_id: String },
	#[error("Entity {entity_id:?} cannot leave analyze pending before its crawl is done.")]
	CrawlNotDone { entity_id: String },
	#[error("Unrecognized crawl status {token:?}.")]
	InvalidCrawlStatus { token: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CrawlStatus {
	#[default]
	Pending,
	Done,
}
impl CrawlStatus {
	pub fn parse(token: &str) -> Result<Self, LedgerError> {
		match token.trim().to_ascii_lowercase().as_str() {
			"" | TOKEN_NO => Ok(Self::Pending),
			TOKEN_YES => Ok(Self::Done),
			_ => Err(LedgerError::InvalidCrawlStatus { token: token.to_string() }),
		}
	}

	pub fn as_token(self) -> &'static str {
		match self {
			Self::Pending => TOKEN_NO,
			Self::Done => TOKEN_YES,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
	/// The judge provider failed or replied with something other than yes/no.
	Judge,
	/// The response bundle exists but could not be read as a list of documents.
	Bundle,
	/// The verdict table could not be written.
	Storage,
	/// Free text carried over from a ledger written without failure kinds.
	Unknown,
}
impl FailureKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Judge => "judge",
			Self::Bundle => "bundle",
			Self::Storage => "storage",
			Self::Unknown => "unknown",
		}
	}

	fn parse(raw: &str) -> Option<Self> {
		match raw {
			"judge" => Some(Self::Judge),
			"bundle" => Some(Self::Bundle),
			"storage" => Some(Self::Storage),
			"unknown" => Some(Self::Unknown),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AnalyzeStatus {
	#[default]
	Pending,
	Done,
	Error {
		kind: FailureKind,
		message: String,
	},
}
impl AnalyzeStatus {
	/// Reads a ledger cell. Never fails: text that is not a known token is kept as an
	/// [`FailureKind::Unknown`] error so the row is retried rather than silently dropped.
	pub fn parse(token: &str) -> Self {
		let trimmed = token.trim();

		match trimmed.to_ascii_lowercase().as_str() {
			"" | TOKEN_NO => return Self::Pending,
			TOKEN_YES => return Self::Done,
			_ => {},
		}

		if let Some(rest) = trimmed.strip_prefix(ERROR_PREFIX)
			&& let Some((kind, message)) = rest.split_once(':')
			&& let Some(kind) = FailureKind::parse(kind.trim())
		{
			return Self::Error { kind, message: message.trim().to_string() };
		}

		Self::Error { kind: FailureKind::Unknown, message: trimmed.to_string() }
	}

	pub fn to_token(&self) -> String {
		match self {
			Self::Pending => TOKEN_NO.to_string(),
			Self::Done => TOKEN_YES.to_string(),
			Self::Error { kind, message } => format!("{ERROR_PREFIX}{}: {message}", kind.as_str()),
		}
	}

	pub fn is_done(&self) -> bool {
		matches!(self, Self::Done)
	}
}
impl fmt::Display for AnalyzeStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_token())
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
	pub entity_id: String,
	pub label: String,
	/// Extra seed columns, in seed column order.
	pub metadata: Vec<(String, String)>,
	pub crawl_status: CrawlStatus,
	pub analyze_status: AnalyzeStatus,
}
impl LedgerEntry {
	pub fn new(entity_id: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			entity_id: entity_id.into(),
			label: label.into(),
			metadata: Vec::new(),
			crawl_status: CrawlStatus::Pending,
			analyze_status: AnalyzeStatus::Pending,
		}
	}

	pub fn with_metadata(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.metadata.push((name.into(), value.into()));

		self
	}

	pub fn needs_crawl(&self) -> bool {
		self.crawl_status == CrawlStatus::Pending
	}

	pub fn needs_analysis(&self) -> bool {
		self.crawl_status == CrawlStatus::Done && !self.analyze_status.is_done()
	}

	pub fn metadata_value(&self, name: &str) -> Option<&str> {
		self.metadata.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
	}
}

/// Ordered mapping from entity id to entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
	metadata_columns: Vec<String>,
	entries: Vec<LedgerEntry>,
	index: HashMap<String, usize>,
}
impl Ledger {
	pub fn new(metadata_columns: Vec<String>) -> Self {
		Self { metadata_columns, entries: Vec::new(), index: HashMap::new() }
	}

	pub fn metadata_columns(&self) -> &[String] {
		&self.metadata_columns
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn entries(&self) -> &[LedgerEntry] {
		&self.entries
	}

	pub fn get(&self, entity_id: &str) -> Option<&LedgerEntry> {
		self.index.get(entity_id).map(|&idx| &self.entries[idx])
	}

	/// Ids in ledger order, for callers that mutate entries while walking the ledger.
	pub fn entity_ids(&self) -> Vec<String> {
		self.entries.iter().map(|entry| entry.entity_id.clone()).collect()
	}

	pub fn push(&mut self, entry: LedgerEntry) -> Result<(), LedgerError> {
		if self.index.contains_key(&entry.entity_id) {
			return Err(LedgerError::DuplicateEntity { entity_id: entry.entity_id });
		}

		for (name, _) in &entry.metadata {
			if !self.metadata_columns.contains(name) {
				self.metadata_columns.push(name.clone());
			}
		}

		self.index.insert(entry.entity_id.clone(), self.entries.len());
		self.entries.push(entry);

		Ok(())
	}

	pub fn mark_crawled(&mut self, entity_id: &str) -> Result<(), LedgerError> {
		self.entry_mut(entity_id)?.crawl_status = CrawlStatus::Done;

		Ok(())
	}

	pub fn set_analyze_status(
		&mut self,
		entity_id: &str,
		status: AnalyzeStatus,
	) -> Result<(), LedgerError> {
		let entry = self.entry_mut(entity_id)?;

		if status != AnalyzeStatus::Pending && entry.crawl_status != CrawlStatus::Done {
			return Err(LedgerError::CrawlNotDone { entity_id: entity_id.to_string() });
		}

		entry.analyze_status = status;

		Ok(())
	}

	/// Puts an entity back to the start of the pipeline.
	pub fn reset_crawl(&mut self, entity_id: &str) -> Result<(), LedgerError> {
		let entry = self.entry_mut(entity_id)?;

		entry.crawl_status = CrawlStatus::Pending;
		entry.analyze_status = AnalyzeStatus::Pending;

		Ok(())
	}

	fn entry_mut(&mut self, entity_id: &str) -> Result<&mut LedgerEntry, LedgerError> {
		let idx = self
			.index
			.get(entity_id)
			.copied()
			.ok_or_else(|| LedgerError::UnknownEntity { entity_id: entity_id.to_string() })?;

		Ok(&mut self.entries[idx])
	}
}
