use serde_json::Value;

use civ_domain::{
	AnalyzeStatus, FailureKind, Verdict,
	candidate::{self, Candidate},
};

use crate::{CivService, Result};

/// A row-level analysis failure. Recorded in the ledger, never propagated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
	pub kind: FailureKind,
	pub message: String,
}
impl From<RowFailure> for AnalyzeStatus {
	fn from(failure: RowFailure) -> Self {
		Self::Error { kind: failure.kind, message: failure.message }
	}
}

#[derive(Debug, Default)]
pub struct AnalyzeReport {
	pub analyzed: Vec<String>,
	pub failed: Vec<(String, RowFailure)>,
	pub missing_bundles: Vec<String>,
	pub skipped: usize,
}

impl CivService {
	/// Judges every candidate of every crawled entity whose analysis is not done yet.
	///
	/// Entities without a bundle are left untouched. Any other failure is written into the
	/// entity's `analyze_status` and the run moves on to the next entity.
	pub async fn analyze(&self) -> Result<AnalyzeReport> {
		let ledger_store = self.ledger_store();
		let responses = self.response_store();
		let mut ledger = self.load_or_seed_ledger(&ledger_store)?;
		let mut report = AnalyzeReport::default();

		for entity_id in ledger.entity_ids() {
			if !ledger.get(&entity_id).map(|entry| entry.needs_analysis()).unwrap_or(false) {
				report.skipped += 1;

				continue;
			}

			let documents = match responses.read(&entity_id) {
				Ok(Some(documents)) => Ok(documents),
				Ok(None) => {
					tracing::warn!(
						entity_id = %entity_id,
						"Response bundle is missing. Leaving entity for a later run."
					);
					report.missing_bundles.push(entity_id);

					continue;
				},
				Err(err) => Err(RowFailure { kind: FailureKind::Bundle, message: err.to_string() }),
			};
			let outcome = match documents {
				Ok(documents) => self.analyze_entity(&entity_id, &documents).await,
				Err(failure) => Err(failure),
			};
			let status = match outcome {
				Ok(count) => {
					tracing::info!(entity_id = %entity_id, candidates = count, "Analyzed entity.");
					report.analyzed.push(entity_id.clone());

					AnalyzeStatus::Done
				},
				Err(failure) => {
					tracing::warn!(
						entity_id = %entity_id,
						kind = failure.kind.as_str(),
						error = %failure.message,
						"Analysis failed. Recording failure and continuing."
					);
					report.failed.push((entity_id.clone(), failure.clone()));

					failure.into()
				},
			};

			ledger.set_analyze_status(&entity_id, status)?;
			ledger_store.save(&ledger)?;
		}

		Ok(report)
	}

	/// Judges every candidate, then replaces the entity's verdict table. Returns the candidate
	/// count.
	async fn analyze_entity(
		&self,
		entity_id: &str,
		documents: &[Value],
	) -> Result<usize, RowFailure> {
		let candidates = candidate::candidates_from_bundle(documents);
		let mut verdicts = Vec::with_capacity(candidates.len());

		for candidate in candidates {
			verdicts.push(self.judge_candidate(entity_id, candidate).await?);
		}

		self.verdict_store()
			.write(entity_id, &verdicts)
			.map_err(|err| RowFailure { kind: FailureKind::Storage, message: err.to_string() })?;

		Ok(verdicts.len())
	}

	async fn judge_candidate(
		&self,
		entity_id: &str,
		candidate: Candidate,
	) -> Result<Verdict, RowFailure> {
		let blurb = candidate::judgment_blurb(&candidate);
		let judgment = self
			.providers
			.judge
			.classify(&self.cfg.providers.judge, &self.cfg.analyze.prompt, &blurb)
			.await
			.map_err(|err| RowFailure { kind: FailureKind::Judge, message: err.to_string() })?;

		tracing::debug!(
			entity_id,
			channel_id = %candidate.channel_id,
			judgment = judgment.as_token(),
			"Judged candidate."
		);

		Ok(Verdict::new(entity_id, candidate, judgment))
	}
}
