pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{0}")]
	Message(String),

	#[error("Test workspace I/O failure at {path:?}: {source}")]
	Io { path: std::path::PathBuf, source: std::io::Error },
}
