pub mod bundles;
pub mod fs;
pub mod ledger;
pub mod report;
pub mod seed;
pub mod verdicts;
pub mod videos;

mod error;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;
