pub mod aggregate;
pub mod analyze;
pub mod crawl;
pub mod reconcile;
pub mod video;

mod error;

pub use aggregate::{AggregateReport, SkippedTable};
pub use analyze::{AnalyzeReport, RowFailure};
pub use crawl::{CrawlReport, CrawlStop, StopReason};
pub use error::{Error, Result};
pub use reconcile::ReconcileReport;
pub use video::VideoArchiveReport;

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

use civ_config::{
	Config, LlmProviderConfig, SearchProviderConfig, TranscriptProviderConfig, VideoProviderConfig,
};
use civ_domain::{Judgment, Ledger, VideoInfo};
use civ_providers::{judge, search, transcript, video as video_api};
use civ_storage::{bundles::ResponseStore, ledger::LedgerStore, verdicts::VerdictStore};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait SearchProvider
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		cfg: &'a SearchProviderConfig,
		query: &'a str,
	) -> BoxFuture<'a, civ_providers::Result<Value>>;
}

pub trait JudgeProvider
where
	Self: Send + Sync,
{
	fn classify<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		prompt: &'a str,
		blurb: &'a str,
	) -> BoxFuture<'a, civ_providers::Result<Judgment>>;
}

pub trait VideoProvider
where
	Self: Send + Sync,
{
	fn video_info<'a>(
		&'a self,
		cfg: &'a VideoProviderConfig,
		video_id: &'a str,
	) -> BoxFuture<'a, civ_providers::Result<Option<VideoInfo>>>;
}

pub trait TranscriptProvider
where
	Self: Send + Sync,
{
	fn transcript<'a>(
		&'a self,
		cfg: &'a TranscriptProviderConfig,
		video_id: &'a str,
	) -> BoxFuture<'a, civ_providers::Result<String>>;
}

#[derive(Clone)]
pub struct Providers {
	pub search: Arc<dyn SearchProvider>,
	pub judge: Arc<dyn JudgeProvider>,
	pub video: Arc<dyn VideoProvider>,
	pub transcript: Arc<dyn TranscriptProvider>,
}
impl Providers {
	pub fn new(
		search: Arc<dyn SearchProvider>,
		judge: Arc<dyn JudgeProvider>,
		video: Arc<dyn VideoProvider>,
		transcript: Arc<dyn TranscriptProvider>,
	) -> Self {
		Self { search, judge, video, transcript }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self {
			search: provider.clone(),
			judge: provider.clone(),
			video: provider.clone(),
			transcript: provider,
		}
	}
}

pub struct CivService {
	pub cfg: Config,
	pub providers: Providers,
}
impl CivService {
	pub fn new(cfg: Config) -> Self {
		Self { cfg, providers: Providers::default() }
	}

	pub fn with_providers(cfg: Config, providers: Providers) -> Self {
		Self { cfg, providers }
	}

	pub fn ledger_store(&self) -> LedgerStore {
		LedgerStore::new(&self.cfg.paths.ledger, &self.cfg.paths.backup_dir)
	}

	pub fn response_store(&self) -> ResponseStore {
		ResponseStore::new(&self.cfg.paths.responses_dir)
	}

	pub fn verdict_store(&self) -> VerdictStore {
		VerdictStore::new(&self.cfg.paths.analyses_dir)
	}

	/// Loads the ledger, seeding it on the very first run.
	pub fn load_or_seed_ledger(&self, store: &LedgerStore) -> Result<Ledger> {
		Ok(store.load_or_seed(&self.cfg.paths.seed, &self.cfg.seed)?)
	}

	/// Loads an existing ledger. Steps that only read pipeline output never seed.
	pub fn load_existing_ledger(&self, store: &LedgerStore) -> Result<Ledger> {
		if !store.exists() {
			return Err(Error::InvalidRequest {
				message: format!(
					"No ledger at {}; run the crawl step first.",
					store.path().display()
				),
			});
		}

		Ok(store.load()?)
	}
}

struct DefaultProviders;
impl SearchProvider for DefaultProviders {
	fn search<'a>(
		&'a self,
		cfg: &'a SearchProviderConfig,
		query: &'a str,
	) -> BoxFuture<'a, civ_providers::Result<Value>> {
		Box::pin(search::search(cfg, query))
	}
}
impl JudgeProvider for DefaultProviders {
	fn classify<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		prompt: &'a str,
		blurb: &'a str,
	) -> BoxFuture<'a, civ_providers::Result<Judgment>> {
		Box::pin(judge::classify(cfg, prompt, blurb))
	}
}
impl VideoProvider for DefaultProviders {
	fn video_info<'a>(
		&'a self,
		cfg: &'a VideoProviderConfig,
		video_id: &'a str,
	) -> BoxFuture<'a, civ_providers::Result<Option<VideoInfo>>> {
		Box::pin(video_api::video_info(cfg, video_id))
	}
}
impl TranscriptProvider for DefaultProviders {
	fn transcript<'a>(
		&'a self,
		cfg: &'a TranscriptProviderConfig,
		video_id: &'a str,
	) -> BoxFuture<'a, civ_providers::Result<String>> {
		Box::pin(transcript::transcript(cfg, video_id))
	}
}
