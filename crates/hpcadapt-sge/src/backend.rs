//! Access to Grid Engine's job information.
//!
//! The resolver only sees raw text; how it is fetched lives behind
//! [`SgeQuery`] so the cascade can run against canned output.

use camino::Utf8PathBuf;
use hpcadapt_parsers::{CommandError, command_from_line, run_command, run_command_allow_failure};
use std::future::Future;
use thiserror::Error;

/// Default location of the Grid Engine accounting log.
pub const DEFAULT_ACCOUNTING_FILE: &str = "/var/lib/gridengine/default/common/accounting";

/// Default number of accounting lines scanned from the end of the log.
pub const DEFAULT_TAIL_LINES: usize = 1000;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error("{0} unavailable")]
    Unavailable(String),
}

/// Configuration for querying Grid Engine.
#[derive(Debug, Clone)]
pub struct SgeConfig {
    /// Command line listing queued and running jobs.
    pub qstat_cmd: String,
    /// Command line printing a job's accounting summary; `-j <id>` is appended.
    pub qacct_cmd: String,
    /// Accounting log read by the tail source.
    pub accounting_file: Utf8PathBuf,
    /// Lines scanned from the end of the accounting log.
    pub tail_lines: usize,
}

impl Default for SgeConfig {
    fn default() -> Self {
        Self {
            qstat_cmd: "qstat".to_string(),
            qacct_cmd: "qacct".to_string(),
            accounting_file: Utf8PathBuf::from(DEFAULT_ACCOUNTING_FILE),
            tail_lines: DEFAULT_TAIL_LINES,
        }
    }
}

/// Raw text sources for job state.
pub trait SgeQuery {
    /// Live queue listing, one job per row.
    fn qstat(&self) -> impl Future<Output = Result<String, SourceError>> + Send;

    /// The last `lines` lines of the accounting log, oldest first.
    fn accounting_tail(
        &self,
        lines: usize,
    ) -> impl Future<Output = Result<String, SourceError>> + Send;

    /// Key/value accounting summary for one job.
    fn qacct(&self, job_id: &str) -> impl Future<Output = Result<String, SourceError>> + Send;
}

/// Query Grid Engine through its command line tools.
#[derive(Debug, Clone, Default)]
pub struct SgeCli {
    config: SgeConfig,
}

impl SgeCli {
    pub fn new(config: SgeConfig) -> Self {
        Self { config }
    }
}

impl SgeQuery for SgeCli {
    async fn qstat(&self) -> Result<String, SourceError> {
        let mut cmd = command_from_line(&self.config.qstat_cmd)?;
        Ok(run_command(&mut cmd, "qstat").await?)
    }

    async fn accounting_tail(&self, lines: usize) -> Result<String, SourceError> {
        let path = &self.config.accounting_file;
        if tokio::fs::metadata(path).await.is_err() {
            let what = format!("accounting file {}", path);
            return Err(SourceError::Unavailable(what));
        }

        let mut cmd = tokio::process::Command::new("tail");
        cmd.arg("-n").arg(lines.to_string()).arg(path.as_str());
        Ok(run_command(&mut cmd, "tail").await?)
    }

    async fn qacct(&self, job_id: &str) -> Result<String, SourceError> {
        let mut cmd = command_from_line(&self.config.qacct_cmd)?;
        cmd.args(["-j", job_id]);
        // qacct exits non-zero for unknown jobs; empty stdout means "no record"
        Ok(run_command_allow_failure(&mut cmd, "qacct").await?)
    }
}
