//! SLURM integration for hpcadapt.
//!
//! Read partition capacity via sinfo and pick the partition a job should go to.

pub mod select;
pub mod sinfo;
pub mod types;

pub use select::select_partition;
pub use sinfo::{SINFO_FIELDS, SinfoError, parse_sinfo, query_partitions};
pub use types::{
    PartitionCatalog, PartitionChoice, PartitionInfo, Quantity, ResourceRequest, UNLIMITED_MINUTES,
};
