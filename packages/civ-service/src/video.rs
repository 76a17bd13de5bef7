use std::path::PathBuf;

use civ_storage::videos::VideoArchive;

use crate::{CivService, Result};

#[derive(Debug, Default)]
pub struct VideoArchiveReport {
	pub video_id: String,
	/// `None` when the video does not exist.
	pub metadata: Option<PathBuf>,
	pub transcript: Option<PathBuf>,
	pub transcript_error: Option<String>,
}

impl CivService {
	/// Saves a video's metadata and, when a transcript provider is configured, its transcript.
	/// A transcript failure does not undo the metadata file.
	pub async fn archive_video(&self, video_id: &str) -> Result<VideoArchiveReport> {
		let archive = VideoArchive::new(&self.cfg.paths.videos_dir);
		let mut report =
			VideoArchiveReport { video_id: video_id.to_string(), ..Default::default() };
		let Some(info) =
			self.providers.video.video_info(&self.cfg.providers.video, video_id).await?
		else {
			tracing::warn!(video_id, "Video not found.");

			return Ok(report);
		};

		report.metadata = Some(archive.write_metadata(&info)?);

		let Some(transcript_cfg) = self.cfg.providers.transcript.as_ref() else {
			tracing::info!(video_id, "No transcript provider configured. Skipping transcript.");

			return Ok(report);
		};

		match self.providers.transcript.transcript(transcript_cfg, video_id).await {
			Ok(text) => {
				report.transcript = Some(archive.write_transcript(video_id, &text)?);
			},
			Err(err) => {
				tracing::warn!(video_id, error = %err, "Transcript unavailable.");

				report.transcript_error = Some(err.to_string());
			},
		}

		Ok(report)
	}
}
