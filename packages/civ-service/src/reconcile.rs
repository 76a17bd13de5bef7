//! Repairs disagreements between the ledger and the artifacts it describes.
//!
//! The ledger stays authoritative; this pass only changes it where an artifact proves a status
//! wrong:
//! - crawl done but no bundle: the entity goes back to pending for both steps;
//! - crawl pending but a complete bundle exists (the process died between writing the bundle and
//!   saving the ledger): the crawl is adopted instead of spending quota again;
//! - analysis done but the verdict table is missing or unreadable: analysis goes back to pending;
//! - crawl pending with an analysis status already set (a hand-edited ledger): analysis goes
//!   back to pending.

use civ_domain::{AnalyzeStatus, CrawlStatus};
use civ_storage::verdicts;

use crate::{CivService, Result};

#[derive(Debug, Default)]
pub struct ReconcileReport {
	pub dry_run: bool,
	pub crawl_reset: Vec<String>,
	pub crawl_adopted: Vec<String>,
	pub analyze_reset: Vec<String>,
}
impl ReconcileReport {
	pub fn changed(&self) -> usize {
		self.crawl_reset.len() + self.crawl_adopted.len() + self.analyze_reset.len()
	}
}

impl CivService {
	pub fn reconcile(&self, dry_run: bool) -> Result<ReconcileReport> {
		let ledger_store = self.ledger_store();
		let responses = self.response_store();
		let verdict_store = self.verdict_store();
		let mut ledger = self.load_existing_ledger(&ledger_store)?;
		let mut report = ReconcileReport { dry_run, ..Default::default() };

		for entity_id in ledger.entity_ids() {
			let Some(entry) = ledger.get(&entity_id) else {
				continue;
			};
			let crawl_status = entry.crawl_status;
			let analysis_done = entry.analyze_status.is_done();
			let analysis_pending = entry.analyze_status == AnalyzeStatus::Pending;
			let bundle_readable = matches!(responses.read(&entity_id), Ok(Some(_)));

			match crawl_status {
				CrawlStatus::Done if !bundle_readable => {
					tracing::warn!(
						entity_id = %entity_id,
						"Crawl marked done but bundle is missing."
					);

					if !dry_run {
						ledger.reset_crawl(&entity_id)?;
					}

					report.crawl_reset.push(entity_id);
				},
				CrawlStatus::Pending if bundle_readable => {
					tracing::warn!(entity_id = %entity_id, "Found a bundle for a pending crawl.");

					if !dry_run {
						ledger.mark_crawled(&entity_id)?;
					}

					report.crawl_adopted.push(entity_id);
				},
				CrawlStatus::Done if analysis_done => {
					let table_ok = verdict_store
						.path_for(&entity_id)
						.and_then(|path| verdicts::read_table(&path))
						.is_ok();

					if table_ok {
						continue;
					}

					tracing::warn!(
						entity_id = %entity_id,
						"Analysis marked done but verdict table is missing or unreadable."
					);

					if !dry_run {
						ledger.set_analyze_status(&entity_id, AnalyzeStatus::Pending)?;
					}

					report.analyze_reset.push(entity_id);
				},
				CrawlStatus::Pending if !analysis_pending => {
					tracing::warn!(
						entity_id = %entity_id,
						"Analysis status set on an entity that was never crawled."
					);

					if !dry_run {
						ledger.set_analyze_status(&entity_id, AnalyzeStatus::Pending)?;
					}

					report.analyze_reset.push(entity_id);
				},
				_ => continue,
			}

			if !dry_run {
				ledger_store.save(&ledger)?;
			}
		}

		tracing::info!(
			dry_run,
			crawl_reset = report.crawl_reset.len(),
			crawl_adopted = report.crawl_adopted.len(),
			analyze_reset = report.analyze_reset.len(),
			"Reconciled ledger with artifacts."
		);

		Ok(report)
	}
}
