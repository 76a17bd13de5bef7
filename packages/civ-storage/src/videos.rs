use std::path::{Path, PathBuf};

use civ_domain::VideoInfo;

use crate::{Error, Result, fs as store_fs};

/// Archived video metadata (`<id>.json`) and transcripts (`<id>_transcript.csv`).
pub struct VideoArchive {
	dir: PathBuf,
}
impl VideoArchive {
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}

	pub fn write_metadata(&self, info: &VideoInfo) -> Result<PathBuf> {
		let path = store_fs::entity_file(&self.dir, &info.vid_id, "json")?;
		let bytes = serde_json::to_vec_pretty(info).map_err(Error::json(&path))?;

		store_fs::write_atomic(&path, &bytes)?;
		tracing::info!(path = %path.display(), "Saved video metadata.");

		Ok(path)
	}

	/// The whole transcript goes into a single CSV cell.
	pub fn write_transcript(&self, video_id: &str, transcript: &str) -> Result<PathBuf> {
		let path = store_fs::entity_file(&self.dir, &format!("{video_id}_transcript"), "csv")?;
		let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(Vec::new());

		writer.write_record([transcript]).map_err(Error::csv(&path))?;

		let bytes = writer.into_inner().map_err(|err| Error::Malformed {
			path: path.clone(),
			message: format!("Failed to flush transcript buffer: {err}."),
		})?;

		store_fs::write_atomic(&path, &bytes)?;
		tracing::info!(path = %path.display(), "Saved video transcript.");

		Ok(path)
	}
}
