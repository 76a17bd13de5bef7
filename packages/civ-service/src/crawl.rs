use serde_json::Value;

use civ_domain::query;

use crate::{CivService, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
	/// The search quota is spent; the next run resumes from the same entity.
	QuotaExceeded,
	ProviderFailure,
}

/// Why and where a crawl run halted. The entity named here is still pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlStop {
	pub entity_id: String,
	pub query: String,
	pub reason: StopReason,
	pub message: String,
}

#[derive(Debug, Default)]
pub struct CrawlReport {
	pub crawled: Vec<String>,
	pub skipped: usize,
	pub stop: Option<CrawlStop>,
}
impl CrawlReport {
	pub fn stopped_on_quota(&self) -> bool {
		self.stop.as_ref().map(|stop| stop.reason == StopReason::QuotaExceeded).unwrap_or(false)
	}
}

impl CivService {
	/// Searches every entity that has not been crawled yet, in ledger order.
	///
	/// Each entity's responses are written as one bundle only after all of its queries have
	/// succeeded, and the ledger is saved before the next entity starts. The first provider
	/// failure ends the run with the failing entity still pending.
	pub async fn crawl(&self) -> Result<CrawlReport> {
		let ledger_store = self.ledger_store();
		let responses = self.response_store();
		let mut ledger = self.load_or_seed_ledger(&ledger_store)?;
		let mut report = CrawlReport::default();

		for entity_id in ledger.entity_ids() {
			let Some(entry) = ledger.get(&entity_id) else {
				continue;
			};

			if !entry.needs_crawl() {
				report.skipped += 1;

				continue;
			}

			// Ids that cannot name a bundle file are refused before any quota is spent.
			responses.path_for(&entity_id)?;

			let queries = query::build_queries(&self.cfg.crawl.query_templates, &entry.label);
			let documents = match self.fetch_bundle(&entity_id, &queries).await {
				Ok(documents) => documents,
				Err(stop) => {
					match stop.reason {
						StopReason::QuotaExceeded => tracing::warn!(
							entity_id = %stop.entity_id,
							query = %stop.query,
							"Search quota exhausted. Stopping crawl; rerun after the quota resets."
						),
						StopReason::ProviderFailure => tracing::error!(
							entity_id = %stop.entity_id,
							query = %stop.query,
							error = %stop.message,
							"Search failed. Stopping crawl."
						),
					}

					report.stop = Some(stop);

					break;
				},
			};

			responses.write(&entity_id, &documents)?;
			ledger.mark_crawled(&entity_id)?;
			ledger_store.save(&ledger)?;

			tracing::info!(entity_id = %entity_id, queries = queries.len(), "Crawled entity.");

			report.crawled.push(entity_id);
		}

		Ok(report)
	}

	async fn fetch_bundle(
		&self,
		entity_id: &str,
		queries: &[String],
	) -> Result<Vec<Value>, CrawlStop> {
		let mut documents = Vec::with_capacity(queries.len());

		for query in queries {
			match self.providers.search.search(&self.cfg.providers.search, query).await {
				Ok(document) => documents.push(document),
				Err(err) => {
					let reason = if err.is_quota_exceeded() {
						StopReason::QuotaExceeded
					} else {
						StopReason::ProviderFailure
					};

					return Err(CrawlStop {
						entity_id: entity_id.to_string(),
						query: query.clone(),
						reason,
						message: err.to_string(),
					});
				},
			}
		}

		Ok(documents)
	}
}
