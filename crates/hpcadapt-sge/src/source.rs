//! Job state sources, in the order they are consulted.

use crate::accounting::parse_accounting_tail;
use crate::backend::{SgeQuery, SourceError};
use crate::qacct::parse_qacct;
use crate::qstat::parse_qstat;
use crate::types::JobState;

/// One place job state can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStateSource {
    /// Jobs currently queued or running (qstat)
    LiveQueue,
    /// The last `lines` lines of the accounting log
    AccountingTail { lines: usize },
    /// Per-job accounting summary (qacct)
    AccountingSummary,
}

impl JobStateSource {
    /// Sources from cheapest and most current to most authoritative.
    pub fn cascade(tail_lines: usize) -> Vec<JobStateSource> {
        vec![
            JobStateSource::LiveQueue,
            JobStateSource::AccountingTail { lines: tail_lines },
            JobStateSource::AccountingSummary,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            JobStateSource::LiveQueue => "qstat",
            JobStateSource::AccountingTail { .. } => "accounting log",
            JobStateSource::AccountingSummary => "qacct",
        }
    }

    /// Interpret this source's raw output for `job_id`.
    pub fn parse(&self, raw: &str, job_id: &str) -> Option<JobState> {
        match self {
            JobStateSource::LiveQueue => parse_qstat(raw, job_id),
            JobStateSource::AccountingTail { lines } => parse_accounting_tail(raw, job_id, *lines),
            JobStateSource::AccountingSummary => parse_qacct(raw, job_id),
        }
    }

    /// Fetch this source's output and interpret it for `job_id`.
    pub async fn query<Q: SgeQuery>(
        &self,
        backend: &Q,
        job_id: &str,
    ) -> Result<Option<JobState>, SourceError> {
        let raw = match self {
            JobStateSource::LiveQueue => backend.qstat().await?,
            JobStateSource::AccountingTail { lines } => backend.accounting_tail(*lines).await?,
            JobStateSource::AccountingSummary => backend.qacct(job_id).await?,
        };
        Ok(self.parse(&raw, job_id))
    }
}
