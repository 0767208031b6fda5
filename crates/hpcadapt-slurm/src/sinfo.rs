//! Query SLURM partition capacity via sinfo.

use crate::types::{PartitionCatalog, PartitionInfo, UNLIMITED_MINUTES};
use hpcadapt_parsers::{
    command_from_line, is_unlimited, parse_duration_minutes, parse_memory_gb, run_command,
    split_columns,
};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SinfoError {
    #[error("Failed to execute sinfo: {0}")]
    ExecutionError(String),
}

/// sinfo -O fields, in column order:
/// partition - Partition name ("*" marks the default)
/// cpus      - CPUs per node
/// memory    - Memory per node (MB)
/// time      - Time limit (D-HH:MM:SS or "infinite")
/// size      - Job size in nodes ("1-4", "1-infinite")
/// cpusload  - CPU load ("0.50", or "0.10-1.20" for a node group)
/// nodes     - Node count of the group
pub const SINFO_FIELDS: &str = "partition,cpus,memory,time,size,cpusload,nodes";

/// Columns a row needs before it is considered; `nodes` is optional.
const MIN_COLUMNS: usize = 6;

/// Header sentinel in the first column.
const HEADER: &str = "PARTITION";

/// One node-group row of sinfo output.
#[derive(Debug, Clone, PartialEq)]
struct SinfoRow {
    partition: String,
    cpus: u32,
    memory_gb: u64,
    time_limit_minutes: u64,
    max_job_size: Option<u32>,
    cpu_load: f64,
    nodes: u32,
}

/// Parse a time limit to minutes; "infinite" maps to `UNLIMITED_MINUTES`.
fn parse_time_limit(s: &str) -> Option<u64> {
    if is_unlimited(s) {
        return Some(UNLIMITED_MINUTES);
    }
    parse_duration_minutes(s)
}

/// Parse a job size ("X-Y" or "X") to its upper bound.
///
/// Returns Ok(None) for an unbounded size.
fn parse_max_job_size(s: &str) -> Result<Option<u32>, String> {
    let upper = s.rsplit('-').next().unwrap_or(s);
    if is_unlimited(upper) {
        return Ok(None);
    }
    upper
        .parse::<u32>()
        .map(Some)
        .map_err(|_| format!("invalid job size: {}", s))
}

/// Parse a CPU load, averaging "min-max" ranges. "N/A" counts as idle.
fn parse_cpu_load(s: &str) -> Option<f64> {
    if s == "N/A" {
        return Some(0.0);
    }
    match s.split_once('-') {
        Some((lo, hi)) => {
            let lo: f64 = lo.parse().ok()?;
            let hi: f64 = hi.parse().ok()?;
            Some((lo + hi) / 2.0)
        }
        None => s.parse().ok(),
    }
}

/// Parse a single line of sinfo output.
///
/// Returns Ok(None) for the header row.
fn parse_sinfo_line(line: &str) -> Result<Option<SinfoRow>, String> {
    let fields = split_columns(line, MIN_COLUMNS)?;
    if fields[0] == HEADER {
        return Ok(None);
    }

    let partition = fields[0].trim_end_matches('*').to_string();
    let cpus = fields[1]
        .parse()
        .map_err(|_| format!("invalid cpus: {}", fields[1]))?;
    let memory_gb = parse_memory_gb(fields[2])
        .ok_or_else(|| format!("invalid memory: {}", fields[2]))?;
    let time_limit_minutes = parse_time_limit(fields[3])
        .ok_or_else(|| format!("invalid time limit: {}", fields[3]))?;
    let max_job_size = parse_max_job_size(fields[4])?;
    let cpu_load = parse_cpu_load(fields[5])
        .ok_or_else(|| format!("invalid cpu load: {}", fields[5]))?;
    let nodes = match fields.get(6) {
        Some(n) => n.parse().map_err(|_| format!("invalid node count: {}", n))?,
        None => 1,
    };

    Ok(Some(SinfoRow {
        partition,
        cpus,
        memory_gb,
        time_limit_minutes,
        max_job_size,
        cpu_load,
        nodes,
    }))
}

/// Running totals for one partition while folding its rows.
struct Aggregate {
    first: SinfoRow,
    load_sum: f64,
    rows: u32,
    nodes: u32,
}

/// Parse sinfo output into a catalog.
///
/// Rows of the same partition are folded together: capacity comes from the
/// first row, CPU load is averaged and node counts are summed. Malformed rows
/// are skipped. The catalog is ordered by partition name.
pub fn parse_sinfo(output: &str) -> PartitionCatalog {
    let mut groups: BTreeMap<String, Aggregate> = BTreeMap::new();

    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let row = match parse_sinfo_line(line) {
            Ok(Some(row)) => row,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!("Failed to parse sinfo line: {}", e);
                continue;
            }
        };

        match groups.get_mut(&row.partition) {
            Some(agg) => {
                agg.load_sum += row.cpu_load;
                agg.rows += 1;
                agg.nodes += row.nodes;
            }
            None => {
                groups.insert(
                    row.partition.clone(),
                    Aggregate {
                        load_sum: row.cpu_load,
                        rows: 1,
                        nodes: row.nodes,
                        first: row,
                    },
                );
            }
        }
    }

    let partitions = groups
        .into_values()
        .map(|agg| PartitionInfo {
            name: agg.first.partition,
            cpus: agg.first.cpus,
            memory_gb: agg.first.memory_gb,
            time_limit_minutes: agg.first.time_limit_minutes,
            max_job_size: agg.first.max_job_size,
            avg_cpu_load: agg.load_sum / f64::from(agg.rows),
            node_count: agg.nodes,
        })
        .collect();

    PartitionCatalog::new(partitions)
}

/// Query partition capacity with sinfo.
///
/// `sinfo_cmd` is the command line used to invoke sinfo (normally just "sinfo").
pub async fn query_partitions(sinfo_cmd: &str) -> Result<PartitionCatalog, SinfoError> {
    let mut cmd =
        command_from_line(sinfo_cmd).map_err(|e| SinfoError::ExecutionError(e.to_string()))?;
    cmd.args(["-e", "-O", SINFO_FIELDS]);

    let stdout = run_command(&mut cmd, "sinfo")
        .await
        .map_err(|e| SinfoError::ExecutionError(e.to_string()))?;

    let catalog = parse_sinfo(&stdout);
    tracing::debug!("sinfo reported {} partitions", catalog.len());
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINFO_OUTPUT: &str = "\
PARTITION           CPUS                MEMORY              TIMELIMIT           JOB_SIZE            CPU_LOAD            NODES
short*              32                  257000              4:00:00             1-infinite          0.50                10
short*              32                  257000              4:00:00             1-infinite          1.50                6
long                64                  512000+             7-00:00:00          1-4                 0.10-0.30           4
gpu                 48                  384000              2-00:00:00          1                   N/A                 2
debug               8                   64000               30:00               1-2                 0.00                1
";

    #[test]
    fn test_parse_time_limit() {
        assert_eq!(parse_time_limit("4:00:00"), Some(240));
        assert_eq!(parse_time_limit("7-00:00:00"), Some(10080));
        assert_eq!(parse_time_limit("30:00"), Some(30));
        assert_eq!(parse_time_limit("infinite"), Some(UNLIMITED_MINUTES));
        assert_eq!(parse_time_limit("n/a"), None);
    }

    #[test]
    fn test_parse_max_job_size() {
        assert_eq!(parse_max_job_size("1-4"), Ok(Some(4)));
        assert_eq!(parse_max_job_size("2"), Ok(Some(2)));
        assert_eq!(parse_max_job_size("1-infinite"), Ok(None));
        assert!(parse_max_job_size("x-y").is_err());
    }

    #[test]
    fn test_parse_cpu_load() {
        assert_eq!(parse_cpu_load("0.50"), Some(0.5));
        assert_eq!(parse_cpu_load("0.10-0.30"), Some(0.2));
        assert_eq!(parse_cpu_load("N/A"), Some(0.0));
        assert_eq!(parse_cpu_load("busy"), None);
    }

    #[test]
    fn test_parse_sinfo_line() {
        let header = SINFO_OUTPUT.lines().next().unwrap();
        assert_eq!(parse_sinfo_line(header), Ok(None));

        let row = parse_sinfo_line("long  64  512000+  7-00:00:00  1-4  0.10-0.30  4")
            .unwrap()
            .unwrap();
        assert_eq!(row.partition, "long");
        assert_eq!(row.memory_gb, 512);
        assert_eq!(row.time_limit_minutes, 10080);
        assert_eq!(row.max_job_size, Some(4));
        assert_eq!(row.nodes, 4);

        // Without the nodes column a row counts as a single node
        let row = parse_sinfo_line("debug 8 64000 30:00 1-2 0.00")
            .unwrap()
            .unwrap();
        assert_eq!(row.nodes, 1);

        assert!(parse_sinfo_line("short 32 257000").is_err());
        assert!(parse_sinfo_line("short many 257000 4:00:00 1 0.5").is_err());
    }

    #[test]
    fn test_parse_sinfo_aggregates_partitions() {
        let catalog = parse_sinfo(SINFO_OUTPUT);
        assert_eq!(catalog.len(), 4);

        let names: Vec<&str> = catalog.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["debug", "gpu", "long", "short"]);

        let short = catalog.get("short").unwrap();
        assert_eq!(short.cpus, 32);
        assert_eq!(short.memory_gb, 257);
        assert_eq!(short.time_limit_minutes, 240);
        assert_eq!(short.max_job_size, None);
        assert_eq!(short.avg_cpu_load, 1.0);
        assert_eq!(short.node_count, 16);

        let gpu = catalog.get("gpu").unwrap();
        assert_eq!(gpu.max_job_size, Some(1));
        assert_eq!(gpu.avg_cpu_load, 0.0);
        assert_eq!(gpu.node_count, 2);
    }

    #[test]
    fn test_parse_sinfo_skips_malformed_rows() {
        let output = "\
PARTITION CPUS MEMORY TIMELIMIT JOB_SIZE CPU_LOAD NODES
broken 32
weird 32 lots 4:00:00 1 0.5 1
ok 32 64000 1:00:00 1 0.5 3
";
        let catalog = parse_sinfo(output);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("ok").unwrap().node_count, 3);
    }

    #[test]
    fn test_parse_sinfo_empty() {
        assert!(parse_sinfo("").is_empty());
        let header_only = "PARTITION CPUS MEMORY TIMELIMIT JOB_SIZE CPU_LOAD\n";
        assert!(parse_sinfo(header_only).is_empty());
    }

    #[test]
    fn test_select_from_parsed_catalog() {
        let catalog = parse_sinfo(SINFO_OUTPUT);
        let request = crate::ResourceRequest::new(300, 600);
        let choice = crate::select_partition(&request, &catalog);
        // gpu (384G, 2 days) is tighter on memory than long (512G)
        assert_eq!(choice.partition_name, "gpu");
        assert_eq!(choice.time_string(), "10:00:00");
    }

    #[tokio::test]
    async fn test_query_partitions_missing_binary() {
        let result = query_partitions("nonexistent_sinfo_12345").await;
        assert!(matches!(result, Err(SinfoError::ExecutionError(_))));
    }
}
