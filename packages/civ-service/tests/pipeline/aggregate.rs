use std::fs;

use civ_service::Error;
use civ_testkit::TestWorkspace;

use super::{ScriptedJudge, ScriptedSearch, hit, seed_four, service};

#[tokio::test]
async fn single_accepted_channel_flattens_into_one_report_row() {
	let workspace = TestWorkspace::new().expect("Failed to create workspace.");

	workspace.write_seed(&[], &[&["1", "Springfield"]]).expect("Failed to write seed.");

	let search = ScriptedSearch::default()
		.with_hits(
			"Town of Springfield",
			vec![
				hit("abc", "City of Springfield", "Official channel"),
				hit("gym", "Springfield Gym", "Workouts"),
			],
		)
		.with_hits(
			"City of Springfield",
			vec![hit("abc", "City of Springfield", "Official channel")],
		);
	let judge = ScriptedJudge::answering_yes().reject_title("Springfield Gym");
	let service = service(&workspace, search, judge);

	service.crawl().await.expect("Crawl failed.");
	service.analyze().await.expect("Analyze failed.");

	let report = service.aggregate().expect("Aggregate failed.");

	assert_eq!(report.rows, 1);
	assert_eq!(report.max_candidates, 1);
	assert!(report.skipped_tables.is_empty());
	assert_eq!(
		workspace.read_to_string("report.csv").expect("Failed to read report."),
		"entity_id,label,URL_1,title_1,description_1\n\
		 1,Springfield,https://www.youtube.com/channel/abc,City of Springfield,Official channel\n"
	);
}

#[tokio::test]
async fn unreadable_and_orphan_tables_are_skipped() {
	let workspace = TestWorkspace::new().expect("Failed to create workspace.");

	seed_four(&workspace);

	let search = ScriptedSearch::default()
		.with_hits("Town of Alpha", vec![hit("a1", "Alpha Hall", "Official")]);
	let service = service(&workspace, search, ScriptedJudge::answering_yes());

	service.crawl().await.expect("Crawl failed.");
	service.analyze().await.expect("Analyze failed.");
	fs::write(workspace.path("analyses/2.csv"), "entity_id,channel_id\n2,b1\n")
		.expect("Failed to corrupt table.");
	fs::write(
		workspace.path("analyses/99.csv"),
		"entity_id,channel_id,title,description,judgment\n",
	)
	.expect("Failed to write orphan table.");

	let report = service.aggregate().expect("Aggregate failed.");
	let skipped = report
		.skipped_tables
		.iter()
		.filter_map(|table| table.path.file_name().and_then(|name| name.to_str()))
		.collect::<Vec<_>>();

	assert_eq!(skipped, vec!["2.csv", "99.csv"]);
	assert_eq!(report.rows, 4);
	assert_eq!(
		workspace.read_to_string("report.csv").expect("Failed to read report."),
		"entity_id,label,region,URL_1,title_1,description_1\n\
		 1,Alpha,North,https://www.youtube.com/channel/a1,Alpha Hall,Official\n\
		 2,Bravo,North,,,\n\
		 3,Charlie,South,,,\n\
		 4,Delta,South,,,\n"
	);
}

#[tokio::test]
async fn aggregate_requires_an_existing_ledger() {
	let workspace = TestWorkspace::new().expect("Failed to create workspace.");

	seed_four(&workspace);

	let err = service(&workspace, ScriptedSearch::default(), ScriptedJudge::answering_yes())
		.aggregate()
		.expect_err("Aggregate should fail without a ledger.");

	assert!(matches!(err, Error::InvalidRequest { .. }), "Unexpected error: {err}");
	assert!(!workspace.path("ledger.csv").exists());
	assert!(!workspace.path("report.csv").exists());
}
