mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Analyze, Config, Crawl, LABEL_PLACEHOLDER, LlmProviderConfig, Paths, Providers, Report,
	SearchProviderConfig, Seed, Service, TranscriptProviderConfig, VideoProviderConfig,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	for (label, key) in [
		("providers.search.api_key", &cfg.providers.search.api_key),
		("providers.video.api_key", &cfg.providers.video.api_key),
		("providers.judge.api_key", &cfg.providers.judge.api_key),
	] {
		if key.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if !(1..=50).contains(&cfg.providers.search.max_results) {
		return Err(Error::Validation {
			message: "providers.search.max_results must be in the range 1-50.".to_string(),
		});
	}
	if !cfg.providers.judge.temperature.is_finite() {
		return Err(Error::Validation {
			message: "providers.judge.temperature must be a finite number.".to_string(),
		});
	}
	if cfg.crawl.query_templates.is_empty() {
		return Err(Error::Validation {
			message: "crawl.query_templates must be non-empty.".to_string(),
		});
	}

	for template in &cfg.crawl.query_templates {
		if !template.contains(LABEL_PLACEHOLDER) {
			return Err(Error::Validation {
				message: format!(
					"crawl.query_templates entry {template:?} must contain {LABEL_PLACEHOLDER}."
				),
			});
		}
	}

	if cfg.analyze.prompt.trim().is_empty() {
		return Err(Error::Validation { message: "analyze.prompt must be non-empty.".to_string() });
	}

	for (label, value) in [
		("seed.id_column", &cfg.seed.id_column),
		("seed.label_column", &cfg.seed.label_column),
		("report.profile_url_base", &cfg.report.profile_url_base),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if cfg.seed.id_column == cfg.seed.label_column {
		return Err(Error::Validation {
			message: "seed.id_column and seed.label_column must differ.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.seed.id_column = cfg.seed.id_column.trim().to_string();
	cfg.seed.label_column = cfg.seed.label_column.trim().to_string();

	if let Some(transcript) = cfg.providers.transcript.as_mut()
		&& transcript.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false)
	{
		transcript.api_key = None;
	}
	if cfg
		.providers
		.transcript
		.as_ref()
		.map(|transcript| transcript.api_base.trim().is_empty())
		.unwrap_or(false)
	{
		cfg.providers.transcript = None;
	}
}
