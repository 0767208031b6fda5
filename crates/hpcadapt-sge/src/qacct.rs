//! Full accounting summary via qacct.

use crate::types::JobState;
use once_cell::sync::Lazy;
use regex::Regex;

/// A `key   value` line of qacct output.
static KEY_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\S+) +(.*?)\s*$").expect("valid key/value regex"));

/// Find the exit status in qacct output for `job_id`.
///
/// qacct may print several records separated by `=====` lines. The first
/// `exit_status` whose record is for `job_id` is used; a record without a
/// `jobnumber` line is assumed to be for the queried job. Returns None for
/// empty output or when no exit status is present.
pub fn parse_qacct(output: &str, job_id: &str) -> Option<JobState> {
    let mut record_matches = true;

    for line in output.lines() {
        if line.starts_with("====") {
            record_matches = true;
            continue;
        }
        let Some(caps) = KEY_VALUE.captures(line) else {
            continue;
        };
        match &caps[1] {
            "jobnumber" => record_matches = &caps[2] == job_id,
            "exit_status" if record_matches => {
                // Newer versions append a description, e.g. "137  (killed)"
                let status = caps[2].split_whitespace().next().unwrap_or("");
                return Some(JobState::from_exit_status(status));
            }
            _ => {}
        }
    }

    None
}
