use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

pub const LABEL_PLACEHOLDER: &str = "{label}";

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub paths: Paths,
	#[serde(default)]
	pub seed: Seed,
	pub providers: Providers,
	#[serde(default)]
	pub crawl: Crawl,
	#[serde(default)]
	pub analyze: Analyze,
	#[serde(default)]
	pub report: Report,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

/// Every on-disk location the pipeline reads or writes.
#[derive(Debug, Clone, Deserialize)]
pub struct Paths {
	/// Seed list used to create the ledger on the first run.
	pub seed: PathBuf,
	pub ledger: PathBuf,
	pub backup_dir: PathBuf,
	pub responses_dir: PathBuf,
	pub analyses_dir: PathBuf,
	pub report: PathBuf,
	#[serde(default = "default_videos_dir")]
	pub videos_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Seed {
	pub id_column: String,
	pub label_column: String,
}
impl Default for Seed {
	fn default() -> Self {
		Self { id_column: "entity_id".to_string(), label_column: "label".to_string() }
	}
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub search: SearchProviderConfig,
	pub video: VideoProviderConfig,
	pub judge: LlmProviderConfig,
	pub transcript: Option<TranscriptProviderConfig>,
}

#[derive(Debug, Deserialize)]
pub struct SearchProviderConfig {
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	#[serde(default = "default_max_results")]
	pub max_results: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct VideoProviderConfig {
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptProviderConfig {
	pub api_base: String,
	pub path: String,
	/// Optional. Sent as a bearer token when present.
	pub api_key: Option<String>,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Crawl {
	/// Issued in order for every entity. Each template must contain `{label}`.
	pub query_templates: Vec<String>,
}
impl Default for Crawl {
	fn default() -> Self {
		Self {
			query_templates: vec![
				format!("Town of {LABEL_PLACEHOLDER}"),
				format!("City of {LABEL_PLACEHOLDER}"),
			],
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Analyze {
	pub prompt: String,
}
impl Default for Analyze {
	fn default() -> Self {
		Self {
			prompt: "You review YouTube channels. Decide whether the channel described below is \
				an official channel run by a town or city government. Reply with exactly one word: \
				yes or no."
				.to_string(),
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Report {
	pub profile_url_base: String,
	/// Sort report rows by entity id instead of ledger order.
	pub sort_by_entity_id: bool,
}
impl Default for Report {
	fn default() -> Self {
		Self {
			profile_url_base: "https://www.youtube.com/channel/".to_string(),
			sort_by_entity_id: false,
		}
	}
}

fn default_videos_dir() -> PathBuf {
	PathBuf::from("videos")
}

fn default_max_results() -> u32 {
	25
}
