use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use civ_domain::{VideoInfo, duration};

use crate::{Error, Result};

/// Fetches snippet, content details and statistics for one video. `None` when the id is unknown.
pub async fn video_info(
	cfg: &civ_config::VideoProviderConfig,
	video_id: &str,
) -> Result<Option<VideoInfo>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let res = client
		.get(url)
		.headers(crate::extra_headers(&cfg.default_headers)?)
		.query(&[
			("part", "snippet,contentDetails,statistics"),
			("id", video_id),
			("key", cfg.api_key.as_str()),
		])
		.send()
		.await?;
	let status = res.status();
	let body = res.text().await?;

	if !status.is_success() {
		return Err(crate::classify_failure(status, &body));
	}

	parse_video_response(video_id, &serde_json::from_str(&body)?)
}

fn parse_video_response(video_id: &str, json: &Value) -> Result<Option<VideoInfo>> {
	let Some(video) = json.get("items").and_then(Value::as_array).and_then(|items| items.first())
	else {
		tracing::debug!(video_id, "Video not found.");

		return Ok(None);
	};
	let snippet = &video["snippet"];
	let raw_duration = video["contentDetails"]["duration"].as_str().ok_or_else(|| {
		Error::InvalidResponse {
			message: "Video response is missing contentDetails.duration.".to_string(),
		}
	})?;
	let vid_length_min = duration::parse_minutes(raw_duration)
		.map_err(|err| Error::InvalidResponse { message: err.to_string() })?;

	Ok(Some(VideoInfo {
		vid_id: video_id.to_string(),
		vid_title: string_field(snippet, "title"),
		vid_desc: string_field(snippet, "description"),
		vid_upload_date: string_field(snippet, "publishedAt"),
		vid_length_min,
		vid_views: count_field(&video["statistics"], "viewCount"),
		vid_likes: count_field(&video["statistics"], "likeCount"),
		channel_id: string_field(snippet, "channelId"),
		channel_title: string_field(snippet, "channelTitle"),
	}))
}

fn string_field(object: &Value, key: &str) -> String {
	object.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
}

// The Data API encodes counts as strings and omits them when hidden.
fn count_field(statistics: &Value, key: &str) -> u64 {
	match statistics.get(key) {
		Some(Value::String(raw)) => raw.parse().unwrap_or(0),
		Some(value) => value.as_u64().unwrap_or(0),
		None => 0,
	}
}
