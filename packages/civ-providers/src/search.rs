use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

/// Runs one channel search and returns the raw response document.
pub async fn search(cfg: &civ_config::SearchProviderConfig, query: &str) -> Result<Value> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let max_results = cfg.max_results.to_string();
	let res = client
		.get(url)
		.headers(crate::extra_headers(&cfg.default_headers)?)
		.query(&[
			("part", "snippet"),
			("type", "channel"),
			("q", query),
			("maxResults", max_results.as_str()),
			("key", cfg.api_key.as_str()),
		])
		.send()
		.await?;
	let status = res.status();
	let body = res.text().await?;

	if !status.is_success() {
		return Err(crate::classify_failure(status, &body));
	}

	parse_search_response(&body)
}

fn parse_search_response(body: &str) -> Result<Value> {
	let json: Value = serde_json::from_str(body)?;

	if !json.get("items").map(Value::is_array).unwrap_or(false) {
		return Err(Error::InvalidResponse {
			message: "Search response is missing items array.".to_string(),
		});
	}

	Ok(json)
}
