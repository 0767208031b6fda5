//! Partition selection.
//!
//! Pick the partition that fits a job most tightly. When nothing can hold the
//! job as requested, fall back to the closest partition and cap memory and
//! wall time to what it offers.

use crate::types::{PartitionCatalog, PartitionChoice, PartitionInfo, Quantity, ResourceRequest};
use std::cmp::Ordering;

/// A partition paired with its distance from the request.
struct Candidate<'a> {
    partition: &'a PartitionInfo,
    delta_mem: u64,
    delta_time: u64,
}

/// Tightest fit first, then more nodes, then lower load.
fn rank(a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
    let (pa, pb) = (a.partition, b.partition);
    a.delta_mem
        .cmp(&b.delta_mem)
        .then(a.delta_time.cmp(&b.delta_time))
        .then(pb.node_count.cmp(&pa.node_count))
        .then(pa.avg_cpu_load.total_cmp(&pb.avg_cpu_load))
}

/// Best candidate; on a full tie the earliest in catalog order wins.
fn best<'a>(candidates: impl Iterator<Item = Candidate<'a>>) -> Option<Candidate<'a>> {
    candidates.min_by(rank)
}

/// Choose a partition for `request` from `catalog`.
///
/// Never fails. Non-numeric memory or time, or an empty catalog, yield an
/// empty partition name with the request passed through unchanged.
pub fn select_partition(
    request: &ResourceRequest,
    catalog: &PartitionCatalog,
) -> PartitionChoice {
    let mem = request.memory_gb.value();
    let time = request.wall_time_minutes.value();
    let (Some(mem), Some(time)) = (mem, time) else {
        tracing::debug!(
            "Non-numeric resources (mem={}, time={}), using scheduler default partition",
            request.memory_gb,
            request.wall_time_minutes
        );
        return PartitionChoice::scheduler_default(request);
    };

    let exact = best(catalog.iter().filter_map(|p| {
        Some(Candidate {
            partition: p,
            delta_mem: p.memory_gb.checked_sub(mem)?,
            delta_time: p.time_limit_minutes.checked_sub(time)?,
        })
    }));

    if let Some(chosen) = exact {
        tracing::debug!(
            "Partition {} fits mem={}G time={}m",
            chosen.partition.name,
            mem,
            time
        );
        return PartitionChoice {
            partition_name: chosen.partition.name.clone(),
            memory_gb: Quantity::Value(mem),
            time_minutes: Quantity::Value(time),
        };
    }

    let closest = best(catalog.iter().map(|p| Candidate {
        partition: p,
        delta_mem: p.memory_gb.abs_diff(mem),
        delta_time: p.time_limit_minutes.abs_diff(time),
    }));

    match closest {
        Some(chosen) => {
            let p = chosen.partition;
            let capped_mem = mem.min(p.memory_gb);
            let capped_time = time.min(p.time_limit_minutes);
            tracing::warn!(
                "No partition fits mem={}G time={}m; using {} with mem={}G time={}m",
                mem,
                time,
                p.name,
                capped_mem,
                capped_time
            );
            PartitionChoice {
                partition_name: p.name.clone(),
                memory_gb: Quantity::Value(capped_mem),
                time_minutes: Quantity::Value(capped_time),
            }
        }
        None => {
            tracing::debug!("Empty partition catalog, using scheduler default partition");
            PartitionChoice::scheduler_default(request)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partition(name: &str, mem: u64, time: u64, nodes: u32, load: f64) -> PartitionInfo {
        PartitionInfo {
            name: name.to_string(),
            cpus: 16,
            memory_gb: mem,
            time_limit_minutes: time,
            max_job_size: None,
            avg_cpu_load: load,
            node_count: nodes,
        }
    }

    #[test]
    fn test_single_exact_fit() {
        let catalog = PartitionCatalog::new(vec![
            partition("A", 32, 120, 2, 0.1),
            partition("B", 64, 60, 1, 0.5),
        ]);
        let choice = select_partition(&ResourceRequest::new(16, 90), &catalog);
        assert_eq!(choice.partition_name, "A");
        assert_eq!(choice.memory_gb, Quantity::Value(16));
        assert_eq!(choice.time_string(), "01:30:00");
    }

    #[test]
    fn test_tightest_fit_wins() {
        let catalog = PartitionCatalog::new(vec![
            partition("big", 512, 10080, 4, 0.0),
            partition("medium", 128, 1440, 20, 0.9),
            partition("small", 64, 240, 50, 0.2),
        ]);
        let choice = select_partition(&ResourceRequest::new(100, 60), &catalog);
        assert_eq!(choice.partition_name, "medium");
        assert_eq!(choice.memory_gb, Quantity::Value(100));
        assert_eq!(choice.time_minutes, Quantity::Value(60));
    }

    #[test]
    fn test_memory_delta_before_time_delta() {
        // "x" is tighter on time but looser on memory
        let catalog = PartitionCatalog::new(vec![
            partition("x", 128, 60, 1, 0.0),
            partition("y", 64, 10080, 1, 0.0),
        ]);
        let choice = select_partition(&ResourceRequest::new(32, 60), &catalog);
        assert_eq!(choice.partition_name, "y");
    }

    #[test]
    fn test_tie_prefers_more_nodes() {
        let catalog = PartitionCatalog::new(vec![
            partition("few", 64, 120, 2, 0.0),
            partition("many", 64, 120, 10, 0.9),
        ]);
        let choice = select_partition(&ResourceRequest::new(32, 60), &catalog);
        assert_eq!(choice.partition_name, "many");
    }

    #[test]
    fn test_tie_prefers_lower_load() {
        let catalog = PartitionCatalog::new(vec![
            partition("busy", 64, 120, 10, 0.8),
            partition("idle", 64, 120, 10, 0.3),
        ]);
        let choice = select_partition(&ResourceRequest::new(32, 60), &catalog);
        assert_eq!(choice.partition_name, "idle");
    }

    #[test]
    fn test_full_tie_keeps_catalog_order() {
        let catalog = PartitionCatalog::new(vec![
            partition("first", 64, 120, 10, 0.5),
            partition("second", 64, 120, 10, 0.5),
        ]);
        let choice = select_partition(&ResourceRequest::new(32, 60), &catalog);
        assert_eq!(choice.partition_name, "first");
    }

    #[test]
    fn test_degraded_fit_caps_request() {
        let catalog = PartitionCatalog::new(vec![
            partition("fat", 256, 1440, 2, 0.1),
            partition("thin", 128, 60, 8, 0.1),
        ]);
        // Nothing has 500G; "fat" is closest on memory
        let choice = select_partition(&ResourceRequest::new(500, 120), &catalog);
        assert_eq!(choice.partition_name, "fat");
        assert_eq!(choice.memory_gb, Quantity::Value(256));
        // Time already fits, so it is left alone
        assert_eq!(choice.time_minutes, Quantity::Value(120));
        assert_eq!(choice.time_string(), "02:00:00");
    }

    #[test]
    fn test_degraded_fit_prefers_memory_closeness() {
        let catalog = PartitionCatalog::new(vec![
            partition("short", 64, 240, 4, 0.2),
            partition("long", 16, 4320, 4, 0.2),
        ]);
        // "short" is too short and "long" lacks memory
        let choice = select_partition(&ResourceRequest::new(32, 4000), &catalog);
        // |64-32| = 32 vs |16-32| = 16, so "long" is closer on memory
        assert_eq!(choice.partition_name, "long");
        assert_eq!(choice.memory_gb, Quantity::Value(16));
        assert_eq!(choice.time_minutes, Quantity::Value(4000));
    }

    #[test]
    fn test_degraded_fit_never_raises() {
        let catalog = PartitionCatalog::new(vec![partition("only", 8, 30, 1, 0.0)]);
        let choice = select_partition(&ResourceRequest::new(4, 600), &catalog);
        assert_eq!(choice.partition_name, "only");
        assert_eq!(choice.memory_gb, Quantity::Value(4));
        assert_eq!(choice.time_minutes, Quantity::Value(30));
        assert_eq!(choice.time_string(), "00:30:00");
    }

    #[test]
    fn test_degraded_tie_break() {
        let catalog = PartitionCatalog::new(vec![
            partition("a", 16, 60, 1, 0.1),
            partition("b", 16, 60, 3, 0.9),
        ]);
        let choice = select_partition(&ResourceRequest::new(64, 600), &catalog);
        assert_eq!(choice.partition_name, "b");
        assert_eq!(choice.memory_gb, Quantity::Value(16));
        assert_eq!(choice.time_minutes, Quantity::Value(60));
    }

    #[test]
    fn test_non_numeric_memory_passes_through() {
        let catalog = PartitionCatalog::new(vec![partition("A", 32, 120, 2, 0.1)]);
        let request = ResourceRequest::new("{resources.mem}", 90);
        let choice = select_partition(&request, &catalog);
        assert!(choice.is_scheduler_default());
        assert_eq!(
            choice.memory_gb,
            Quantity::Raw("{resources.mem}".to_string())
        );
        assert_eq!(choice.time_minutes, Quantity::Value(90));
    }

    #[test]
    fn test_non_numeric_time_passes_through() {
        let catalog = PartitionCatalog::new(vec![partition("A", 32, 120, 2, 0.1)]);
        let choice = select_partition(&ResourceRequest::new(8, "00:59:00"), &catalog);
        assert_eq!(choice.partition_name, "");
        assert_eq!(choice.memory_gb, Quantity::Value(8));
        assert_eq!(choice.time_string(), "00:59:00");
    }

    #[test]
    fn test_empty_catalog() {
        let choice = select_partition(&ResourceRequest::new(8, 90), &PartitionCatalog::default());
        assert!(choice.is_scheduler_default());
        assert_eq!(choice.memory_gb, Quantity::Value(8));
        assert_eq!(choice.time_string(), "01:30:00");
    }

    #[test]
    fn test_unlimited_partition_is_a_fit() {
        let catalog = PartitionCatalog::new(vec![
            partition("bounded", 64, 60, 4, 0.0),
            partition("forever", 64, crate::types::UNLIMITED_MINUTES, 4, 0.0),
        ]);
        let choice = select_partition(&ResourceRequest::new(32, 20000), &catalog);
        assert_eq!(choice.partition_name, "forever");
        assert_eq!(choice.time_minutes, Quantity::Value(20000));
    }
}
