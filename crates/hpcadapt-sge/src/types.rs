//! Grid Engine job types.

use std::fmt;

/// Lifecycle state of a submitted job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    /// Queued, transferring or executing
    Running,
    /// Finished with exit status 0
    Succeeded,
    /// Finished with a non-zero exit status, in error state, or deleted
    Failed,
    /// No information; reported like `Running`
    Unknown,
}

impl JobState {
    /// Token printed for the workflow engine's status hook.
    pub fn report_token(self) -> &'static str {
        match self {
            JobState::Running | JobState::Unknown => "running",
            JobState::Succeeded => "success",
            JobState::Failed => "failed",
        }
    }

    /// Map an exit status field to a final state: "0" succeeds, anything else fails.
    pub fn from_exit_status(status: &str) -> Self {
        if status.trim() == "0" {
            JobState::Succeeded
        } else {
            JobState::Failed
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.report_token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_token() {
        assert_eq!(JobState::Running.report_token(), "running");
        assert_eq!(JobState::Succeeded.report_token(), "success");
        assert_eq!(JobState::Failed.report_token(), "failed");
        assert_eq!(JobState::Unknown.to_string(), "running");
    }

    #[test]
    fn test_from_exit_status() {
        assert_eq!(JobState::from_exit_status("0"), JobState::Succeeded);
        assert_eq!(JobState::from_exit_status(" 0\n"), JobState::Succeeded);
        assert_eq!(JobState::from_exit_status("1"), JobState::Failed);
        assert_eq!(JobState::from_exit_status("137"), JobState::Failed);
        assert_eq!(JobState::from_exit_status(""), JobState::Failed);
    }
}
