use std::fs;

use civ_domain::CrawlStatus;
use civ_service::{Error, StopReason};
use civ_testkit::TestWorkspace;

use super::{ScriptedJudge, ScriptedSearch, load_ledger, seed_four, service};

#[tokio::test]
async fn crawl_resumes_after_quota_without_requerying_done_entities() {
	let workspace = TestWorkspace::new().expect("Failed to create workspace.");

	seed_four(&workspace);

	let search = ScriptedSearch::default().quota_on("Town of Charlie");
	let first = service(&workspace, search.clone(), ScriptedJudge::answering_yes());
	let report = first.crawl().await.expect("Crawl failed.");

	assert_eq!(report.crawled, vec!["1", "2"]);
	assert!(report.stopped_on_quota());
	assert_eq!(report.stop.as_ref().map(|stop| stop.entity_id.as_str()), Some("3"));

	let ledger = load_ledger(&workspace);
	let statuses = ledger.entries().iter().map(|entry| entry.crawl_status).collect::<Vec<_>>();

	assert_eq!(
		statuses,
		vec![CrawlStatus::Done, CrawlStatus::Done, CrawlStatus::Pending, CrawlStatus::Pending]
	);

	let resumed_search = ScriptedSearch::default();
	let second = service(&workspace, resumed_search.clone(), ScriptedJudge::answering_yes());
	let report = second.crawl().await.expect("Crawl failed.");

	assert_eq!(report.crawled, vec!["3", "4"]);
	assert_eq!(report.skipped, 2);
	assert!(report.stop.is_none());
	assert_eq!(
		resumed_search.calls(),
		vec!["Town of Charlie", "City of Charlie", "Town of Delta", "City of Delta"]
	);
}

#[tokio::test]
async fn quota_on_a_later_query_leaves_no_partial_bundle() {
	let workspace = TestWorkspace::new().expect("Failed to create workspace.");

	seed_four(&workspace);

	let search = ScriptedSearch::default().quota_on("City of Charlie");
	let report = service(&workspace, search.clone(), ScriptedJudge::answering_yes())
		.crawl()
		.await
		.expect("Crawl failed.");
	let stop = report.stop.expect("Crawl should have stopped.");

	assert_eq!(stop.entity_id, "3");
	assert_eq!(stop.query, "City of Charlie");
	assert_eq!(stop.reason, StopReason::QuotaExceeded);
	assert!(search.calls().contains(&"Town of Charlie".to_string()));
	assert!(!workspace.path("responses/3.json").exists());
	assert!(load_ledger(&workspace).get("3").expect("Missing entity.").needs_crawl());
}

#[tokio::test]
async fn other_search_failures_also_halt_the_run() {
	let workspace = TestWorkspace::new().expect("Failed to create workspace.");

	seed_four(&workspace);

	let search = ScriptedSearch::default().fail_on("Town of Bravo");
	let report = service(&workspace, search.clone(), ScriptedJudge::answering_yes())
		.crawl()
		.await
		.expect("Crawl failed.");

	assert_eq!(report.crawled, vec!["1"]);
	assert_eq!(report.stop.map(|stop| stop.reason), Some(StopReason::ProviderFailure));
	assert!(!search.calls().iter().any(|query| query.contains("Charlie")));
}

#[tokio::test]
async fn every_ledger_save_leaves_a_backup() {
	let workspace = TestWorkspace::new().expect("Failed to create workspace.");

	seed_four(&workspace);

	let service = service(&workspace, ScriptedSearch::default(), ScriptedJudge::answering_yes());

	service.crawl().await.expect("Crawl failed.");

	assert_eq!(workspace.list("backups").expect("Failed to list backups.").len(), 4);

	service.analyze().await.expect("Analyze failed.");

	assert_eq!(workspace.list("backups").expect("Failed to list backups.").len(), 8);
}

#[tokio::test]
async fn seed_with_unusable_id_fails_before_any_search() {
	let workspace = TestWorkspace::new().expect("Failed to create workspace.");

	workspace
		.write_seed(&[], &[&["NY/1", "Albany"], &["2", "Bravo"]])
		.expect("Failed to write seed.");

	let search = ScriptedSearch::default();
	let err = service(&workspace, search.clone(), ScriptedJudge::answering_yes())
		.crawl()
		.await
		.expect_err("Crawl should reject the seed.");

	assert!(matches!(err, Error::Storage { .. }), "Unexpected error: {err}");
	assert!(search.calls().is_empty());
	assert!(!workspace.path("ledger.csv").exists());
}

#[tokio::test]
async fn ledger_id_that_cannot_name_a_bundle_spends_no_quota() {
	let workspace = TestWorkspace::new().expect("Failed to create workspace.");

	fs::write(
		workspace.path("ledger.csv"),
		"entity_id,label,crawl_status,analyze_status\nNY/1,Albany,no,no\n2,Bravo,no,no\n",
	)
	.expect("Failed to write ledger.");

	let search = ScriptedSearch::default();
	let service = service(&workspace, search.clone(), ScriptedJudge::answering_yes());

	for _ in 0..2 {
		let err = service.crawl().await.expect_err("Crawl should reject the entity id.");

		assert!(matches!(err, Error::InvalidRequest { .. }), "Unexpected error: {err}");
	}

	assert!(search.calls().is_empty());
	assert!(workspace.list("responses").expect("Failed to list bundles.").is_empty());
	assert!(workspace.list("backups").expect("Failed to list backups.").is_empty());
}
