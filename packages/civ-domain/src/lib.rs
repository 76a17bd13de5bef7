pub mod candidate;
pub mod duration;
pub mod ledger;
pub mod query;
pub mod video;

pub use candidate::{Candidate, Judgment, Verdict};
pub use ledger::{AnalyzeStatus, CrawlStatus, FailureKind, Ledger, LedgerEntry, LedgerError};
pub use video::VideoInfo;
