//! Recent job history from the tail of the accounting log.

use crate::types::JobState;
use hpcadapt_parsers::split_delimited;

/// Fields an accounting record needs to carry an exit status.
const MIN_FIELDS: usize = 13;

/// Index of the job number field.
const JOB_NUMBER_FIELD: usize = 5;

/// Index of the exit status field.
const EXIT_STATUS_FIELD: usize = 12;

/// Scan accounting log lines, newest first, for the record of `job_id`.
///
/// `output` holds the log tail in file order; at most the last `max_lines`
/// lines are considered. Comment lines and records with fewer than 13
/// colon-separated fields are skipped. Returns None when the job is not in
/// the window, which does not mean the job never existed.
pub fn parse_accounting_tail(output: &str, job_id: &str, max_lines: usize) -> Option<JobState> {
    output
        .lines()
        .rev()
        .take(max_lines)
        .filter(|line| !line.starts_with('#'))
        .filter_map(|line| split_delimited(line, ':', MIN_FIELDS).ok())
        .find(|fields| fields[JOB_NUMBER_FIELD] == job_id)
        .map(|fields| JobState::from_exit_status(fields[EXIT_STATUS_FIELD]))
}
