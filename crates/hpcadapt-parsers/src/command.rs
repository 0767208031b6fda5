//! Command execution utilities for scheduler queries.

use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

/// Error type for command execution.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Empty command line")]
    Empty,
    #[error("Failed to execute {command}: {error}")]
    Execution { command: String, error: String },
    #[error("Command {command} failed: {stderr}")]
    Failed { command: String, stderr: String },
}

/// Build a command from a whitespace-separated command line such as `qstat -u *`.
///
/// No shell is involved, so quoting is not interpreted.
pub fn command_from_line(line: &str) -> Result<Command, CommandError> {
    let mut words = line.split_whitespace();
    let program = words.next().ok_or(CommandError::Empty)?;
    let mut cmd = Command::new(program);
    cmd.args(words);
    Ok(cmd)
}

/// Execute a command and return stdout as a string.
///
/// This is a convenience wrapper that handles common error cases
/// and UTF-8 conversion for scheduler command output.
pub async fn run_command(cmd: &mut Command, name: &str) -> Result<String, CommandError> {
    let output = cmd
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| CommandError::Execution {
            command: name.to_string(),
            error: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CommandError::Failed {
            command: name.to_string(),
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Execute a command and return stdout, treating non-zero exit as OK.
///
/// `qacct` exits non-zero for job ids it has never seen; its stdout is
/// still meaningful (empty), so callers decide what absence means.
pub async fn run_command_allow_failure(
    cmd: &mut Command,
    name: &str,
) -> Result<String, CommandError> {
    let output = cmd
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .await
        .map_err(|e| CommandError::Execution {
            command: name.to_string(),
            error: e.to_string(),
        })?;

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
