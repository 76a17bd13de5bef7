use std::time::Duration;

use reqwest::{Client, header::HeaderMap};
use serde_json::Value;

use crate::{Error, Result};

/// Fetches the caption track for a video and joins its segments with single spaces.
pub async fn transcript(
	cfg: &civ_config::TranscriptProviderConfig,
	video_id: &str,
) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let headers: HeaderMap = match cfg.api_key.as_deref() {
		Some(key) => crate::auth_headers(key, &cfg.default_headers)?,
		None => crate::extra_headers(&cfg.default_headers)?,
	};
	let res = client.get(url).headers(headers).query(&[("video_id", video_id)]).send().await?;
	let status = res.status();
	let body = res.text().await?;

	if !status.is_success() {
		return Err(crate::classify_failure(status, &body));
	}

	join_segments(&serde_json::from_str(&body)?)
}

fn join_segments(json: &Value) -> Result<String> {
	let segments = json
		.as_array()
		.or_else(|| json.get("segments").and_then(Value::as_array))
		.ok_or_else(|| Error::InvalidResponse {
			message: "Transcript response is missing segments.".to_string(),
		})?;
	let texts = segments
		.iter()
		.map(|segment| {
			segment.get("text").and_then(Value::as_str).ok_or_else(|| Error::InvalidResponse {
				message: "Transcript segment is missing text.".to_string(),
			})
		})
		.collect::<Result<Vec<_>>>()?;

	Ok(texts.join(" "))
}
