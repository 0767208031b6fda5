//! Shared parsing utilities for scheduler command output.
//!
//! This crate provides common parsing functions used by both
//! hpcadapt-slurm and hpcadapt-sge to reduce code duplication.

pub mod command;
pub mod memory;
pub mod time;

pub use command::{CommandError, command_from_line, run_command, run_command_allow_failure};
pub use memory::{MEGABYTES_TO_GIGABYTES, megabytes_to_gigabytes, parse_memory_gb};
pub use time::{format_hh_mm_00, is_unlimited, parse_duration, parse_duration_minutes};

/// Split a delimited line and validate field count.
pub fn split_delimited(
    line: &str,
    delimiter: char,
    min_fields: usize,
) -> Result<Vec<&str>, String> {
    let fields: Vec<&str> = line.split(delimiter).collect();
    if fields.len() < min_fields {
        return Err(format!(
            "Expected {} fields, got {}: {}",
            min_fields,
            fields.len(),
            line
        ));
    }
    Ok(fields)
}

/// Split a whitespace-aligned table row into columns.
///
/// Runs of spaces count as one separator, so padded columns from
/// `qstat` or `sinfo -O` come out clean.
pub fn split_columns(line: &str, min_fields: usize) -> Result<Vec<&str>, String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < min_fields {
        return Err(format!(
            "Expected {} columns, got {}: {}",
            min_fields,
            fields.len(),
            line.trim()
        ));
    }
    Ok(fields)
}
