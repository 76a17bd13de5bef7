pub mod judge;
pub mod search;
pub mod transcript;
pub mod video;

mod error;

pub use error::{Error, Result};

use reqwest::{
	StatusCode,
	header::{AUTHORIZATION, HeaderMap, HeaderName},
};
use serde_json::{Map, Value};

/// Error reasons YouTube reports when the daily quota is spent.
const QUOTA_REASONS: [&str; 4] =
	["quotaExceeded", "dailyLimitExceeded", "rateLimitExceeded", "userRateLimitExceeded"];

pub fn auth_headers(api_key: &str, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = extra_headers(default_headers)?;

	headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);

	Ok(headers)
}

pub fn extra_headers(default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: "Default header values must be strings.".to_string(),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}

/// Turns a non-success response into an error, separating quota exhaustion from every other
/// failure.
pub fn classify_failure(status: StatusCode, body: &str) -> Error {
	let parsed = serde_json::from_str::<Value>(body).ok();
	let error = parsed.as_ref().and_then(|json| json.get("error"));
	let message = error
		.and_then(|err| err.get("message"))
		.and_then(Value::as_str)
		.map(str::to_string)
		.unwrap_or_else(|| body.chars().take(512).collect());
	let reasons = error
		.and_then(|err| err.get("errors"))
		.and_then(Value::as_array)
		.map(|errors| {
			errors
				.iter()
				.filter_map(|item| item.get("reason").and_then(Value::as_str))
				.collect::<Vec<_>>()
		})
		.unwrap_or_default();
	let quota_status = matches!(status, StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS);

	if quota_status && reasons.iter().any(|reason| QUOTA_REASONS.contains(reason)) {
		return Error::QuotaExceeded { message };
	}

	Error::Http { status: status.as_u16(), message }
}
