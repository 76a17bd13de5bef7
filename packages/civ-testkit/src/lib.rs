mod error;

pub use error::{Error, Result};

use std::{
	env, fs,
	path::{Path, PathBuf},
};

use serde_json::Map;
use uuid::Uuid;

use civ_config::{
	Analyze, Config, Crawl, LlmProviderConfig, Paths, Providers, Report, SearchProviderConfig,
	Seed, Service, VideoProviderConfig,
};

/// A private directory under the system temp dir, removed on drop.
pub struct TestWorkspace {
	root: PathBuf,
	cleaned: bool,
}
impl TestWorkspace {
	pub fn new() -> Result<Self> {
		let root = env::temp_dir().join(format!("civ_test_{}", Uuid::new_v4().simple()));

		fs::create_dir_all(&root)
			.map_err(|err| Error::Io { path: root.clone(), source: err })?;

		Ok(Self { root, cleaned: false })
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	pub fn path(&self, relative: &str) -> PathBuf {
		self.root.join(relative)
	}

	pub fn paths(&self) -> Paths {
		Paths {
			seed: self.path("towns.csv"),
			ledger: self.path("ledger.csv"),
			backup_dir: self.path("backups"),
			responses_dir: self.path("responses"),
			analyses_dir: self.path("analyses"),
			report: self.path("report.csv"),
			videos_dir: self.path("videos"),
		}
	}

	/// Writes a seed list with `entity_id,label` columns plus the given extra columns.
	pub fn write_seed(&self, extra_columns: &[&str], rows: &[&[&str]]) -> Result<PathBuf> {
		let mut lines = Vec::with_capacity(rows.len() + 1);
		let mut header = vec!["entity_id", "label"];

		header.extend_from_slice(extra_columns);
		lines.push(header.join(","));

		for row in rows {
			if row.len() != header.len() {
				return Err(Error::Message(format!(
					"Seed row {row:?} has {} cells but the header has {}.",
					row.len(),
					header.len()
				)));
			}

			lines.push(row.join(","));
		}

		let path = self.paths().seed;

		fs::write(&path, lines.join("\n") + "\n")
			.map_err(|err| Error::Io { path: path.clone(), source: err })?;

		Ok(path)
	}

	/// Files directly inside `relative`, sorted. Missing directories have none.
	pub fn list(&self, relative: &str) -> Result<Vec<PathBuf>> {
		let dir = self.path(relative);

		if !dir.is_dir() {
			return Ok(Vec::new());
		}

		let mut files = fs::read_dir(&dir)
			.map_err(|err| Error::Io { path: dir.clone(), source: err })?
			.filter_map(|entry| entry.ok().map(|entry| entry.path()))
			.filter(|path| path.is_file())
			.collect::<Vec<_>>();

		files.sort();

		Ok(files)
	}

	pub fn read_to_string(&self, relative: &str) -> Result<String> {
		let path = self.path(relative);

		fs::read_to_string(&path).map_err(|err| Error::Io { path, source: err })
	}

	pub fn cleanup(mut self) -> Result<()> {
		self.cleanup_inner()
	}

	fn cleanup_inner(&mut self) -> Result<()> {
		if self.cleaned {
			return Ok(());
		}

		fs::remove_dir_all(&self.root)
			.map_err(|err| Error::Io { path: self.root.clone(), source: err })?;

		self.cleaned = true;

		Ok(())
	}
}
impl Drop for TestWorkspace {
	fn drop(&mut self) {
		if let Err(err) = self.cleanup_inner() {
			eprintln!("Test workspace cleanup failed: {err}.");
		}
	}
}

/// A complete config pointing every path into `workspace`. Provider endpoints are unroutable.
pub fn test_config(workspace: &TestWorkspace) -> Config {
	Config {
		service: Service { log_level: "info".to_string() },
		paths: workspace.paths(),
		seed: Seed::default(),
		providers: Providers {
			search: SearchProviderConfig {
				api_base: "http://127.0.0.1:9".to_string(),
				api_key: "search-key".to_string(),
				path: "/youtube/v3/search".to_string(),
				max_results: 5,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
			video: VideoProviderConfig {
				api_base: "http://127.0.0.1:9".to_string(),
				api_key: "video-key".to_string(),
				path: "/youtube/v3/videos".to_string(),
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
			judge: LlmProviderConfig {
				provider_id: "stub".to_string(),
				api_base: "http://127.0.0.1:9".to_string(),
				api_key: "judge-key".to_string(),
				path: "/v1/chat/completions".to_string(),
				model: "m".to_string(),
				temperature: 0.0,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
			transcript: None,
		},
		crawl: Crawl::default(),
		analyze: Analyze::default(),
		report: Report::default(),
	}
}
