use std::fs;

use civ_domain::{AnalyzeStatus, FailureKind};
use civ_testkit::TestWorkspace;

use super::{ScriptedJudge, ScriptedSearch, hit, load_ledger, seed_four, service};

#[tokio::test]
async fn judge_failure_is_recorded_and_does_not_block_later_entities() {
	let workspace = TestWorkspace::new().expect("Failed to create workspace.");

	seed_four(&workspace);

	let search = ScriptedSearch::default()
		.with_hits("Town of Bravo", vec![hit("b1", "Bravo Town Hall", "Meetings")])
		.with_hits("Town of Charlie", vec![hit("c1", "Charlie Civic", "Official")]);
	let judge = ScriptedJudge::answering_yes().fail_on_title("Bravo Town Hall");
	let service = service(&workspace, search, judge);

	service.crawl().await.expect("Crawl failed.");

	let report = service.analyze().await.expect("Analyze failed.");

	assert_eq!(report.analyzed, vec!["1", "3", "4"]);
	assert_eq!(report.failed.len(), 1);

	let ledger = load_ledger(&workspace);

	assert!(ledger.get("3").expect("Missing entity.").analyze_status.is_done());

	match &ledger.get("2").expect("Missing entity.").analyze_status {
		AnalyzeStatus::Error { kind, message } => {
			assert_eq!(*kind, FailureKind::Judge);
			assert!(message.contains("judge unavailable"), "Unexpected message: {message}");
		},
		other => panic!("Expected a recorded failure, got {other:?}."),
	}
}

#[tokio::test]
async fn failed_entities_are_retried_on_the_next_run() {
	let workspace = TestWorkspace::new().expect("Failed to create workspace.");

	seed_four(&workspace);

	let search = ScriptedSearch::default()
		.with_hits("Town of Bravo", vec![hit("b1", "Bravo Town Hall", "Meetings")]);

	let failing = service(
		&workspace,
		search.clone(),
		ScriptedJudge::answering_yes().fail_on_title("Bravo Town Hall"),
	);

	failing.crawl().await.expect("Crawl failed.");
	failing.analyze().await.expect("Analyze failed.");

	let judge = ScriptedJudge::answering_yes();
	let report =
		service(&workspace, search, judge.clone()).analyze().await.expect("Analyze failed.");

	assert_eq!(report.analyzed, vec!["2"]);
	assert_eq!(report.skipped, 3);
	assert_eq!(judge.calls(), 1);
}

#[tokio::test]
async fn second_analyze_run_leaves_tables_untouched() {
	let workspace = TestWorkspace::new().expect("Failed to create workspace.");

	seed_four(&workspace);

	let search = ScriptedSearch::default().with_hits(
		"Town of Alpha",
		vec![hit("a1", "Alpha", "One"), hit("a2", "Alpha News", "Two")],
	);
	let service = service(&workspace, search, ScriptedJudge::answering_yes());

	service.crawl().await.expect("Crawl failed.");
	service.analyze().await.expect("Analyze failed.");

	let first = fs::read(workspace.path("analyses/1.csv")).expect("Failed to read table.");
	let report = service.analyze().await.expect("Analyze failed.");
	let second = fs::read(workspace.path("analyses/1.csv")).expect("Failed to read table.");

	assert!(report.analyzed.is_empty());
	assert_eq!(first, second);
	assert_eq!(
		String::from_utf8(first).expect("Table must be utf-8."),
		"entity_id,channel_id,title,description,judgment\n\
		 1,a1,Alpha,One,yes\n\
		 1,a2,Alpha News,Two,yes\n"
	);
}

#[tokio::test]
async fn missing_bundle_leaves_entity_pending() {
	let workspace = TestWorkspace::new().expect("Failed to create workspace.");

	seed_four(&workspace);

	let service = service(&workspace, ScriptedSearch::default(), ScriptedJudge::answering_yes());

	service.crawl().await.expect("Crawl failed.");
	fs::remove_file(workspace.path("responses/2.json")).expect("Failed to remove bundle.");

	let report = service.analyze().await.expect("Analyze failed.");

	assert_eq!(report.missing_bundles, vec!["2"]);
	assert_eq!(report.analyzed, vec!["1", "3", "4"]);
	assert_eq!(
		load_ledger(&workspace).get("2").expect("Missing entity.").analyze_status,
		AnalyzeStatus::Pending
	);
}

#[tokio::test]
async fn unreadable_bundle_is_recorded_as_bundle_failure() {
	let workspace = TestWorkspace::new().expect("Failed to create workspace.");

	seed_four(&workspace);

	let service = service(&workspace, ScriptedSearch::default(), ScriptedJudge::answering_yes());

	service.crawl().await.expect("Crawl failed.");
	fs::write(workspace.path("responses/4.json"), "{ not json").expect("Failed to corrupt bundle.");
	service.analyze().await.expect("Analyze failed.");

	assert!(matches!(
		load_ledger(&workspace).get("4").expect("Missing entity.").analyze_status,
		AnalyzeStatus::Error { kind: FailureKind::Bundle, .. }
	));
}
