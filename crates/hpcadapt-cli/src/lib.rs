//! CLI argument parsing for hpcadapt.

use camino::Utf8PathBuf;
use clap::builder::NonEmptyStringValueParser;
use clap::{Args as ClapArgs, Parser, Subcommand};
use hpcadapt_sge::{DEFAULT_ACCOUNTING_FILE, DEFAULT_TAIL_LINES, SgeConfig};
use hpcadapt_slurm::{Quantity, ResourceRequest};

#[derive(Parser, Debug)]
#[command(name = "hpcadapt")]
#[command(about = "Pick SLURM partitions and report Grid Engine job state for workflow engines")]
pub struct Args {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the state of a Grid Engine job: running, success or failed
    Status(StatusArgs),
    /// Choose a SLURM partition for a job's memory and wall time
    Partition(PartitionArgs),
}

#[derive(ClapArgs, Debug)]
pub struct StatusArgs {
    /// Job id assigned by the scheduler
    #[arg(value_parser = NonEmptyStringValueParser::new())]
    pub job_id: String,

    /// Accounting log lines to scan, newest first
    #[arg(long, env = "HPCADAPT_TAIL_LINES", default_value_t = DEFAULT_TAIL_LINES)]
    pub tail_lines: usize,

    /// Grid Engine accounting log
    #[arg(long, env = "HPCADAPT_ACCOUNTING_FILE", default_value = DEFAULT_ACCOUNTING_FILE)]
    pub accounting_file: Utf8PathBuf,

    /// Command listing queued and running jobs
    #[arg(long, default_value = "qstat")]
    pub qstat: String,

    /// Command printing a job's accounting summary
    #[arg(long, default_value = "qacct")]
    pub qacct: String,
}

impl StatusArgs {
    pub fn sge_config(&self) -> SgeConfig {
        SgeConfig {
            qstat_cmd: self.qstat.clone(),
            qacct_cmd: self.qacct.clone(),
            accounting_file: self.accounting_file.clone(),
            tail_lines: self.tail_lines,
        }
    }
}

#[derive(ClapArgs, Debug)]
pub struct PartitionArgs {
    /// Memory in GB
    #[arg(long)]
    pub mem: String,

    /// Wall time in minutes
    #[arg(long)]
    pub time: String,

    /// CPUs per task (echoed in --json output, not used for selection)
    #[arg(long, default_value_t = 1)]
    pub cpus: u32,

    /// GPUs (echoed in --json output, not used for selection)
    #[arg(long)]
    pub gpus: Option<u32>,

    /// Local scratch in GB (echoed in --json output, not used for selection)
    #[arg(long)]
    pub tmpfs: Option<u64>,

    /// Job uses MPI (echoed in --json output, not used for selection)
    #[arg(long)]
    pub mpi: bool,

    /// Command reporting partition capacity
    #[arg(long, default_value = "sinfo")]
    pub sinfo: String,

    /// Print the choice as JSON
    #[arg(long)]
    pub json: bool,
}

impl PartitionArgs {
    pub fn resource_request(&self) -> ResourceRequest {
        ResourceRequest {
            cpus: self.cpus.max(1),
            memory_gb: Quantity::parse(&self.mem),
            wall_time_minutes: Quantity::parse(&self.time),
            gpu_count: self.gpus,
            tmpfs_gb: self.tmpfs,
            uses_mpi: self.mpi,
        }
    }
}
