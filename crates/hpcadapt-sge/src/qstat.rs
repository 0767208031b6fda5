//! Live queue state via qstat.

use crate::types::JobState;
use hpcadapt_parsers::split_columns;

/// qstat columns:
/// 0 - job-ID
/// 1 - prior
/// 2 - name
/// 3 - user
/// 4 - state
/// 5.. submit/start at, queue, slots, ja-task-ID
const STATE_COLUMN: usize = 4;

/// Classify a qstat state code.
///
/// `r` (running), `qw` (queued, waiting) and `t` (transferring) are running;
/// `Eqw` (error) and `d` (deleted) are failed. Any other code a listed job
/// carries is also treated as running.
pub fn parse_state_code(code: &str) -> JobState {
    match code {
        "r" | "qw" | "t" => JobState::Running,
        "Eqw" | "d" => JobState::Failed,
        other => {
            tracing::debug!("Unrecognized qstat state {:?}, assuming running", other);
            JobState::Running
        }
    }
}

/// Find `job_id` in qstat output and classify its state.
///
/// Header, separator and short rows are ignored. Returns None when the job
/// is not listed.
pub fn parse_qstat(output: &str, job_id: &str) -> Option<JobState> {
    output
        .lines()
        .filter_map(|line| split_columns(line, STATE_COLUMN + 1).ok())
        .find(|cols| cols[0] == job_id)
        .map(|cols| parse_state_code(cols[STATE_COLUMN]))
}
