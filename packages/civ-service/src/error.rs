pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Ledger error: {message}")]
	Ledger { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<civ_storage::Error> for Error {
	fn from(err: civ_storage::Error) -> Self {
		match err {
			civ_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			civ_storage::Error::Ledger(inner) => Self::Ledger { message: inner.to_string() },
			other => Self::Storage { message: other.to_string() },
		}
	}
}

impl From<civ_domain::LedgerError> for Error {
	fn from(err: civ_domain::LedgerError) -> Self {
		Self::Ledger { message: err.to_string() }
	}
}

impl From<civ_providers::Error> for Error {
	fn from(err: civ_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
