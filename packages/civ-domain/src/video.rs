use serde::{Deserialize, Serialize};

/// Archived metadata for a single video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
	pub vid_id: String,
	pub vid_title: String,
	pub vid_desc: String,
	pub vid_upload_date: String,
	pub vid_length_min: f64,
	pub vid_views: u64,
	pub vid_likes: u64,
	pub channel_id: String,
	pub channel_title: String,
}
