use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};

use civ_config::TranscriptProviderConfig;
use civ_domain::VideoInfo;
use civ_service::{CivService, Providers};
use civ_testkit::TestWorkspace;

use super::{ScriptedJudge, ScriptedSearch, StubTranscript, StubVideo};

fn sample_video() -> VideoInfo {
	VideoInfo {
		vid_id: "v1".to_string(),
		vid_title: "Council meeting".to_string(),
		vid_desc: "Regular session".to_string(),
		vid_upload_date: "2026-10-01T18:00:00Z".to_string(),
		vid_length_min: 62.5,
		vid_views: 120,
		vid_likes: 4,
		channel_id: "abc".to_string(),
		channel_title: "City of Springfield".to_string(),
	}
}

fn video_service(
	workspace: &TestWorkspace,
	info: Option<VideoInfo>,
	transcript: Option<&str>,
	with_transcript_provider: bool,
) -> (CivService, Arc<AtomicUsize>) {
	let calls = Arc::new(AtomicUsize::new(0));
	let mut cfg = civ_testkit::test_config(workspace);

	if with_transcript_provider {
		cfg.providers.transcript = Some(TranscriptProviderConfig {
			api_base: "http://127.0.0.1:9".to_string(),
			path: "/transcript".to_string(),
			api_key: None,
			timeout_ms: 1_000,
			default_headers: Default::default(),
		});
	}

	let providers = Providers::new(
		Arc::new(ScriptedSearch::default()),
		Arc::new(ScriptedJudge::answering_yes()),
		Arc::new(StubVideo { info }),
		Arc::new(StubTranscript { text: transcript.map(str::to_string), calls: calls.clone() }),
	);

	(CivService::with_providers(cfg, providers), calls)
}

#[tokio::test]
async fn archives_metadata_and_transcript() {
	let workspace = TestWorkspace::new().expect("Failed to create workspace.");
	let (service, _) =
		video_service(&workspace, Some(sample_video()), Some("Call to order."), true);
	let report = service.archive_video("v1").await.expect("Archive failed.");

	assert_eq!(report.metadata, Some(workspace.path("videos/v1.json")));
	assert_eq!(report.transcript, Some(workspace.path("videos/v1_transcript.csv")));
	assert!(report.transcript_error.is_none());

	let saved: VideoInfo = serde_json::from_str(
		&workspace.read_to_string("videos/v1.json").expect("Failed to read metadata."),
	)
	.expect("Metadata must be valid JSON.");

	assert_eq!(saved, sample_video());
	assert_eq!(
		workspace.read_to_string("videos/v1_transcript.csv").expect("Failed to read transcript."),
		"Call to order.\n"
	);
}

#[tokio::test]
async fn transcript_failure_keeps_metadata() {
	let workspace = TestWorkspace::new().expect("Failed to create workspace.");
	let (service, calls) = video_service(&workspace, Some(sample_video()), None, true);
	let report = service.archive_video("v1").await.expect("Archive failed.");

	assert_eq!(calls.load(Ordering::SeqCst), 1);
	assert!(workspace.path("videos/v1.json").is_file());
	assert!(!workspace.path("videos/v1_transcript.csv").exists());
	assert!(report.transcript.is_none());
	assert!(report.transcript_error.is_some());
}

#[tokio::test]
async fn transcript_is_skipped_without_a_provider() {
	let workspace = TestWorkspace::new().expect("Failed to create workspace.");
	let (service, calls) = video_service(&workspace, Some(sample_video()), Some("unused"), false);
	let report = service.archive_video("v1").await.expect("Archive failed.");

	assert_eq!(calls.load(Ordering::SeqCst), 0);
	assert!(report.metadata.is_some());
	assert!(report.transcript.is_none());
}

#[tokio::test]
async fn missing_video_writes_nothing() {
	let workspace = TestWorkspace::new().expect("Failed to create workspace.");
	let (service, calls) = video_service(&workspace, None, Some("unused"), true);
	let report = service.archive_video("nope").await.expect("Archive failed.");

	assert!(report.metadata.is_none());
	assert_eq!(calls.load(Ordering::SeqCst), 0);
	assert!(workspace.list("videos").expect("Failed to list videos.").is_empty());
}
