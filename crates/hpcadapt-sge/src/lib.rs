//! Grid Engine integration for hpcadapt.
//!
//! Determine job state from qstat, the accounting log and qacct.

pub mod accounting;
pub mod backend;
pub mod qacct;
pub mod qstat;
pub mod resolver;
pub mod source;
pub mod types;

pub use backend::{
    DEFAULT_ACCOUNTING_FILE, DEFAULT_TAIL_LINES, SgeCli, SgeConfig, SgeQuery, SourceError,
};
pub use resolver::JobStateResolver;
pub use source::JobStateSource;
pub use types::JobState;
