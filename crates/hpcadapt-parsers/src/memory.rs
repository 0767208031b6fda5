//! Memory unit conversion for scheduler capacity output.

/// Factor applied to `sinfo` memory (megabytes) to get gigabytes.
///
/// Decimal, not binary: 256000 MB is reported as 256 GB.
pub const MEGABYTES_TO_GIGABYTES: f64 = 0.001;

/// Convert megabytes to whole gigabytes, truncating any fraction.
///
/// Negative and non-finite inputs yield 0.
pub fn megabytes_to_gigabytes(megabytes: f64) -> u64 {
    if !megabytes.is_finite() || megabytes <= 0.0 {
        return 0;
    }
    (megabytes * MEGABYTES_TO_GIGABYTES) as u64
}

/// Parse a memory column reported in megabytes (e.g. "257000", "257000+")
/// and return it in gigabytes.
///
/// `sinfo` appends `+` when nodes in a group differ; the lower bound is used.
/// Returns None for empty strings or placeholder values.
pub fn parse_memory_gb(s: &str) -> Option<u64> {
    let s = s.trim().trim_end_matches('+');
    if s.is_empty() || s == "-" || s == "N/A" {
        return None;
    }
    s.parse::<f64>().ok().map(megabytes_to_gigabytes)
}
