use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use civ_domain::Judgment;

use crate::{Error, Result};

pub async fn classify(
	cfg: &civ_config::LlmProviderConfig,
	prompt: &str,
	blurb: &str,
) -> Result<Judgment> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"messages": [
			{ "role": "system", "content": prompt },
			{ "role": "user", "content": blurb },
		],
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let status = res.status();

	if !status.is_success() {
		let text = res.text().await?;

		return Err(crate::classify_failure(status, &text));
	}

	let json: Value = res.json().await?;

	parse_judge_reply(&json)
}

fn parse_judge_reply(json: &Value) -> Result<Judgment> {
	let content = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.ok_or_else(|| Error::InvalidResponse {
			message: "Judge response is missing message content.".to_string(),
		})?;

	Judgment::from_reply(content).ok_or_else(|| Error::InvalidResponse {
		message: format!("Judge reply {content:?} is neither yes nor no."),
	})
}
