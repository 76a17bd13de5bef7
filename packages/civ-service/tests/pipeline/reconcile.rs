use std::fs;

use civ_domain::{AnalyzeStatus, CrawlStatus};
use civ_testkit::TestWorkspace;

use super::{ScriptedJudge, ScriptedSearch, load_ledger, seed_four, service};

/// Entities 1-3 crawled and analyzed, entity 4 pending. Then three artifacts go out of sync:
/// bundle 2 is lost, table 3 is lost, and a bundle for 4 appears.
async fn drifted_workspace() -> TestWorkspace {
	let workspace = TestWorkspace::new().expect("Failed to create workspace.");

	seed_four(&workspace);

	let service = service(
		&workspace,
		ScriptedSearch::default().quota_on("Town of Delta"),
		ScriptedJudge::answering_yes(),
	);

	service.crawl().await.expect("Crawl failed.");
	service.analyze().await.expect("Analyze failed.");
	fs::remove_file(workspace.path("responses/2.json")).expect("Failed to remove bundle.");
	fs::remove_file(workspace.path("analyses/3.csv")).expect("Failed to remove table.");
	fs::copy(workspace.path("responses/1.json"), workspace.path("responses/4.json"))
		.expect("Failed to place bundle.");

	workspace
}

#[tokio::test]
async fn dry_run_reports_without_touching_the_ledger() {
	let workspace = drifted_workspace().await;
	let before = fs::read(workspace.path("ledger.csv")).expect("Failed to read ledger.");
	let backups = workspace.list("backups").expect("Failed to list backups.").len();
	let report = service(&workspace, ScriptedSearch::default(), ScriptedJudge::answering_yes())
		.reconcile(true)
		.expect("Reconcile failed.");

	assert!(report.dry_run);
	assert_eq!(report.crawl_reset, vec!["2"]);
	assert_eq!(report.crawl_adopted, vec!["4"]);
	assert_eq!(report.analyze_reset, vec!["3"]);
	assert_eq!(fs::read(workspace.path("ledger.csv")).expect("Failed to read ledger."), before);
	assert_eq!(workspace.list("backups").expect("Failed to list backups.").len(), backups);
}

#[tokio::test]
async fn reconcile_realigns_statuses_with_artifacts() {
	let workspace = drifted_workspace().await;
	let report = service(&workspace, ScriptedSearch::default(), ScriptedJudge::answering_yes())
		.reconcile(false)
		.expect("Reconcile failed.");

	assert_eq!(report.changed(), 3);

	let ledger = load_ledger(&workspace);
	let statuses = ledger
		.entries()
		.iter()
		.map(|entry| (entry.crawl_status, entry.analyze_status.clone()))
		.collect::<Vec<_>>();

	assert_eq!(
		statuses,
		vec![
			(CrawlStatus::Done, AnalyzeStatus::Done),
			(CrawlStatus::Pending, AnalyzeStatus::Pending),
			(CrawlStatus::Done, AnalyzeStatus::Pending),
			(CrawlStatus::Done, AnalyzeStatus::Pending),
		]
	);

	let again = service(&workspace, ScriptedSearch::default(), ScriptedJudge::answering_yes())
		.reconcile(false)
		.expect("Reconcile failed.");

	assert_eq!(again.changed(), 0);
}

#[tokio::test]
async fn adopted_bundle_is_not_searched_again() {
	let workspace = drifted_workspace().await;
	let search = ScriptedSearch::default();
	let service = service(&workspace, search.clone(), ScriptedJudge::answering_yes());

	service.reconcile(false).expect("Reconcile failed.");
	service.crawl().await.expect("Crawl failed.");

	assert_eq!(search.calls(), vec!["Town of Bravo", "City of Bravo"]);
}

#[tokio::test]
async fn analysis_status_without_a_crawl_is_reset() {
	let workspace = TestWorkspace::new().expect("Failed to create workspace.");

	fs::write(
		workspace.path("ledger.csv"),
		"entity_id,label,crawl_status,analyze_status\n\
		 1,Alpha,no,yes\n\
		 2,Bravo,no,error:judge: timed out\n\
		 3,Charlie,no,no\n",
	)
	.expect("Failed to write ledger.");

	let report = service(&workspace, ScriptedSearch::default(), ScriptedJudge::answering_yes())
		.reconcile(false)
		.expect("Reconcile failed.");

	assert_eq!(report.analyze_reset, vec!["1", "2"]);
	assert!(report.crawl_reset.is_empty());
	assert!(report.crawl_adopted.is_empty());

	let ledger = load_ledger(&workspace);

	for entry in ledger.entries() {
		assert_eq!(entry.crawl_status, CrawlStatus::Pending);
		assert_eq!(entry.analyze_status, AnalyzeStatus::Pending);
	}
}
