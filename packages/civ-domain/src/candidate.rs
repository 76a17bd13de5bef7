use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
	pub channel_id: String,
	pub title: String,
	pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Judgment {
	Yes,
	No,
}
impl Judgment {
	/// Normalizes a free-text reply. Surrounding whitespace, quotes and punctuation are ignored;
	/// anything else than a bare yes or no is rejected.
	pub fn from_reply(reply: &str) -> Option<Self> {
		let normalized = reply
			.trim()
			.trim_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace())
			.to_lowercase();

		match normalized.as_str() {
			"yes" => Some(Self::Yes),
			"no" => Some(Self::No),
			_ => None,
		}
	}

	pub fn as_token(self) -> &'static str {
		match self {
			Self::Yes => "yes",
			Self::No => "no",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Verdict {
	pub entity_id: String,
	pub channel_id: String,
	pub title: String,
	pub description: String,
	pub judgment: Judgment,
}
impl Verdict {
	pub fn new(entity_id: &str, candidate: Candidate, judgment: Judgment) -> Self {
		Self {
			entity_id: entity_id.to_string(),
			channel_id: candidate.channel_id,
			title: candidate.title,
			description: candidate.description,
			judgment,
		}
	}
}

/// Text submitted to the judge for one candidate.
pub fn judgment_blurb(candidate: &Candidate) -> String {
	format!("Title: {}\nDescription: {}", candidate.title.trim(), candidate.description.trim())
}

/// Extracts one candidate per search hit, in hit order.
///
/// Accepts the YouTube `search.list` shape (`id.channelId`, `snippet.title`,
/// `snippet.description`) as well as flattened `{ id, title, description }` items. Hits without a
/// channel id are skipped.
pub fn candidates_from_document(document: &Value) -> Vec<Candidate> {
	let Some(items) = document.get("items").and_then(Value::as_array) else {
		return Vec::new();
	};

	items.iter().filter_map(candidate_from_item).collect()
}

pub fn candidates_from_bundle(documents: &[Value]) -> Vec<Candidate> {
	documents.iter().flat_map(candidates_from_document).collect()
}

fn candidate_from_item(item: &Value) -> Option<Candidate> {
	let snippet = item.get("snippet");
	let channel_id = match item.get("id") {
		Some(Value::String(id)) => Some(id.as_str()),
		Some(id) => id.get("channelId").and_then(Value::as_str),
		None => None,
	}
	.or_else(|| snippet.and_then(|s| s.get("channelId")).and_then(Value::as_str))
	.or_else(|| item.get("channel_id").and_then(Value::as_str))?;

	if channel_id.trim().is_empty() {
		return None;
	}

	Some(Candidate {
		channel_id: channel_id.to_string(),
		title: text_field(item, snippet, "title"),
		description: text_field(item, snippet, "description"),
	})
}

fn text_field(item: &Value, snippet: Option<&Value>, key: &str) -> String {
	snippet
		.and_then(|s| s.get(key))
		.or_else(|| item.get(key))
		.and_then(Value::as_str)
		.unwrap_or_default()
		.to_string()
}
