use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("I/O failure at {path:?}: {source}")]
	Io { path: PathBuf, source: std::io::Error },
	#[error("CSV failure at {path:?}: {source}")]
	Csv { path: PathBuf, source: csv::Error },
	#[error("JSON failure at {path:?}: {source}")]
	Json { path: PathBuf, source: serde_json::Error },
	#[error("Malformed file at {path:?}: {message}")]
	Malformed { path: PathBuf, message: String },
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
	#[error(transparent)]
	Ledger(#[from] civ_domain::LedgerError),
	#[error(transparent)]
	TimeFormat(#[from] time::error::Format),
}
impl Error {
	pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
		let path = path.into();

		move |source| Self::Io { path, source }
	}

	pub(crate) fn csv(path: impl Into<PathBuf>) -> impl FnOnce(csv::Error) -> Self {
		let path = path.into();

		move |source| Self::Csv { path, source }
	}

	pub(crate) fn json(path: impl Into<PathBuf>) -> impl FnOnce(serde_json::Error) -> Self {
		let path = path.into();

		move |source| Self::Json { path, source }
	}
}
