use std::path::PathBuf;

use clap::{Parser, Subcommand};

use civ_service::{
	AggregateReport, AnalyzeReport, CivService, CrawlReport, ReconcileReport, StopReason,
	VideoArchiveReport,
};

#[derive(Debug, Parser)]
#[command(
	version = civ_cli::VERSION,
	rename_all = "kebab",
	styles = civ_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[command(subcommand)]
	pub step: Step,
}

#[derive(Debug, Subcommand)]
pub enum Step {
	/// Search for channels of every entity not crawled yet. Stops at the first quota error.
	Crawl,
	/// Judge the crawled candidates of every entity not analyzed yet.
	Analyze,
	/// Rebuild the consolidated report from the verdict tables.
	Aggregate,
	/// Bring ledger statuses back in line with the files on disk.
	Reconcile {
		/// Report what would change without saving the ledger.
		#[arg(long)]
		dry_run: bool,
	},
	/// Archive one video's metadata and transcript.
	Video {
		#[arg(long, value_name = "VIDEO_ID")]
		id: String,
	},
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = civ_config::load(&args.config)?;

	civ_cli::init_tracing(&config.service.log_level);

	let service = CivService::new(config);

	match args.step {
		Step::Crawl => log_crawl(&service.crawl().await?),
		Step::Analyze => log_analyze(&service.analyze().await?),
		Step::Aggregate => log_aggregate(&service.aggregate()?),
		Step::Reconcile { dry_run } => log_reconcile(&service.reconcile(dry_run)?),
		Step::Video { id } => log_video(&service.archive_video(&id).await?),
	}

	Ok(())
}

fn log_crawl(report: &CrawlReport) {
	match &report.stop {
		None => tracing::info!(
			crawled = report.crawled.len(),
			skipped = report.skipped,
			"Crawl finished."
		),
		Some(stop) if stop.reason == StopReason::QuotaExceeded => tracing::info!(
			crawled = report.crawled.len(),
			resume_at = %stop.entity_id,
			"Crawl paused on quota. Run again once the quota resets."
		),
		Some(stop) => tracing::warn!(
			crawled = report.crawled.len(),
			entity_id = %stop.entity_id,
			error = %stop.message,
			"Crawl stopped early."
		),
	}
}

fn log_analyze(report: &AnalyzeReport) {
	tracing::info!(
		analyzed = report.analyzed.len(),
		failed = report.failed.len(),
		missing_bundles = report.missing_bundles.len(),
		skipped = report.skipped,
		"Analysis finished."
	);
}

fn log_aggregate(report: &AggregateReport) {
	tracing::info!(
		output = %report.output.display(),
		rows = report.rows,
		max_candidates = report.max_candidates,
		skipped_tables = report.skipped_tables.len(),
		"Aggregation finished."
	);
}

fn log_reconcile(report: &ReconcileReport) {
	tracing::info!(dry_run = report.dry_run, changed = report.changed(), "Reconcile finished.");
}

fn log_video(report: &VideoArchiveReport) {
	if report.metadata.is_none() {
		tracing::warn!(video_id = %report.video_id, "Nothing archived.");

		return;
	}

	tracing::info!(
		video_id = %report.video_id,
		transcript = report.transcript.is_some(),
		"Video archived."
	);
}
