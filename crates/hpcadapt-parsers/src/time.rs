//! Time parsing utilities for scheduler output.

use std::time::Duration;

/// Whether a time or size field means "no limit".
pub fn is_unlimited(s: &str) -> bool {
    matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "infinite" | "unlimited"
    )
}

/// Parse a duration in various formats.
///
/// Supports:
/// - D-HH:MM:SS (SLURM time limit with days)
/// - D-HH:MM and D-HH
/// - HH:MM:SS
/// - MM:SS
/// - Seconds as integer
///
/// Returns None for "UNLIMITED"/"infinite", empty strings and anything unparsable.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if s.is_empty() || s == "-" || is_unlimited(s) {
        return None;
    }

    // Check for day separator (D-HH:MM:SS)
    let parts: Vec<&str> = s.split('-').collect();
    let (days, time_part, has_days) = match parts.as_slice() {
        [days, rest] => (days.parse::<u64>().ok()?, *rest, true),
        [rest] => (0, *rest, false),
        _ => return None,
    };

    let time_parts = time_part
        .split(':')
        .map(|p| p.parse::<u64>().ok())
        .collect::<Option<Vec<u64>>>()?;

    let seconds = match (time_parts.as_slice(), has_days) {
        ([h, m, s], _) => h * 3600 + m * 60 + s,
        ([h, m], true) => h * 3600 + m * 60,
        ([h], true) => h * 3600,
        ([m, s], false) => m * 60 + s,
        ([s], false) => *s,
        _ => return None,
    };

    Some(Duration::from_secs(days * 86400 + seconds))
}

/// Parse a duration and return it in whole minutes (seconds are dropped).
pub fn parse_duration_minutes(s: &str) -> Option<u64> {
    parse_duration(s).map(|d| d.as_secs() / 60)
}

/// Format total minutes as `HH:MM:00`.
///
/// Hours are not folded into days, so 1500 minutes is "25:00:00".
pub fn format_hh_mm_00(minutes: u64) -> String {
    format!("{:02}:{:02}:00", minutes / 60, minutes % 60)
}
