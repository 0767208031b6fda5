//! SLURM resource and partition types.

use hpcadapt_parsers::format_hh_mm_00;
use serde::Serialize;
use std::fmt;

/// Time limit used for partitions reporting `infinite`.
pub const UNLIMITED_MINUTES: u64 = u32::MAX as u64;

/// A resource amount as handed over by the workflow engine.
///
/// Values that are not plain non-negative integers (e.g. "00:59:00" or a
/// placeholder string) are carried through untouched as `Raw`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Quantity {
    Value(u64),
    Raw(String),
}

impl Quantity {
    pub fn parse(s: &str) -> Self {
        match s.trim().parse::<u64>() {
            Ok(v) => Quantity::Value(v),
            Err(_) => Quantity::Raw(s.to_string()),
        }
    }

    /// Numeric value, if there is one.
    pub fn value(&self) -> Option<u64> {
        match self {
            Quantity::Value(v) => Some(*v),
            Quantity::Raw(_) => None,
        }
    }
}

impl From<u64> for Quantity {
    fn from(v: u64) -> Self {
        Quantity::Value(v)
    }
}

impl From<&str> for Quantity {
    fn from(s: &str) -> Self {
        Quantity::parse(s)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Value(v) => write!(f, "{}", v),
            Quantity::Raw(s) => f.write_str(s),
        }
    }
}

/// Resources a job asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceRequest {
    /// CPUs per task (at least 1)
    pub cpus: u32,

    /// Memory in gigabytes
    pub memory_gb: Quantity,

    /// Wall time in minutes
    pub wall_time_minutes: Quantity,

    /// Number of GPUs
    pub gpu_count: Option<u32>,

    /// Local scratch space in gigabytes
    pub tmpfs_gb: Option<u64>,

    /// Whether the job runs under MPI
    pub uses_mpi: bool,
}

impl ResourceRequest {
    /// A single-CPU request with the given memory and wall time.
    pub fn new(memory_gb: impl Into<Quantity>, wall_time_minutes: impl Into<Quantity>) -> Self {
        Self {
            cpus: 1,
            memory_gb: memory_gb.into(),
            wall_time_minutes: wall_time_minutes.into(),
            gpu_count: None,
            tmpfs_gb: None,
            uses_mpi: false,
        }
    }
}

/// Capacity of one SLURM partition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionInfo {
    /// Partition name (unique within a catalog)
    pub name: String,

    /// CPUs per node
    pub cpus: u32,

    /// Memory per node in gigabytes
    pub memory_gb: u64,

    /// Time limit in minutes (`UNLIMITED_MINUTES` for infinite)
    pub time_limit_minutes: u64,

    /// Maximum nodes per job (None when unbounded)
    pub max_job_size: Option<u32>,

    /// Mean CPU load over the partition's node groups
    pub avg_cpu_load: f64,

    /// Number of nodes
    pub node_count: u32,
}

/// Snapshot of cluster partitions, built fresh for every selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartitionCatalog {
    partitions: Vec<PartitionInfo>,
}

impl PartitionCatalog {
    /// Build a catalog from partitions, dropping later duplicates of a name.
    pub fn new(partitions: Vec<PartitionInfo>) -> Self {
        let mut unique: Vec<PartitionInfo> = Vec::with_capacity(partitions.len());
        for partition in partitions {
            if unique.iter().any(|p| p.name == partition.name) {
                tracing::warn!(
                    "Duplicate partition {} in catalog, ignoring",
                    partition.name
                );
                continue;
            }
            unique.push(partition);
        }
        Self { partitions: unique }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PartitionInfo> {
        self.partitions.iter()
    }

    #[cfg(test)]
    pub(crate) fn get(&self, name: &str) -> Option<&PartitionInfo> {
        self.partitions.iter().find(|p| p.name == name)
    }

    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }
}

/// Where a job should go and with how much memory/time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionChoice {
    /// Selected partition; empty lets the scheduler use its default
    pub partition_name: String,

    /// Memory in gigabytes, possibly capped to the partition's capacity
    pub memory_gb: Quantity,

    /// Wall time in minutes, possibly capped to the partition's limit
    pub time_minutes: Quantity,
}

impl PartitionChoice {
    /// Leave partition selection to the scheduler and pass the request through.
    pub fn scheduler_default(request: &ResourceRequest) -> Self {
        Self {
            partition_name: String::new(),
            memory_gb: request.memory_gb.clone(),
            time_minutes: request.wall_time_minutes.clone(),
        }
    }

    pub fn is_scheduler_default(&self) -> bool {
        self.partition_name.is_empty()
    }

    /// Wall time as `HH:MM:00`, or the raw value when it was never numeric.
    pub fn time_string(&self) -> String {
        match &self.time_minutes {
            Quantity::Value(minutes) => format_hh_mm_00(*minutes),
            Quantity::Raw(raw) => raw.clone(),
        }
    }
}
