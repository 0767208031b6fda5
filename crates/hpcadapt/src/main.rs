//! hpcadapt - scheduler adapter for workflow engines.

mod logging;

use clap::Parser;
use hpcadapt_cli::{Args, Command, PartitionArgs, StatusArgs};
use hpcadapt_sge::{JobStateResolver, SgeCli};
use hpcadapt_slurm::{
    PartitionCatalog, PartitionChoice, ResourceRequest, query_partitions, select_partition,
};
use miette::{IntoDiagnostic, Result};
use std::future::Future;
use std::io;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    match args.command {
        Command::Status(status_args) => status(status_args).await,
        Command::Partition(partition_args) => partition(partition_args).await,
    }
}

/// Completes once `signal` reports an interrupt. If the handler could not be
/// installed it never completes, so the status check runs to the end.
async fn interrupted(signal: impl Future<Output = io::Result<()>>) {
    if let Err(e) = signal.await {
        tracing::warn!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Print the job's report token. Ctrl-C while checking reports "failed".
async fn status(args: StatusArgs) -> Result<()> {
    let config = args.sge_config();
    let resolver = JobStateResolver::new(SgeCli::new(config.clone()), &config);
    let ctrl_c = interrupted(tokio::signal::ctrl_c());
    let state = resolver.resolve_or_interrupt(&args.job_id, ctrl_c).await;
    println!("{}", state.report_token());
    Ok(())
}

/// Print the partition choice for the requested resources.
async fn partition(args: PartitionArgs) -> Result<()> {
    let request = args.resource_request();
    let catalog = match query_partitions(&args.sinfo).await {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::warn!("{}; leaving partition choice to the scheduler", e);
            PartitionCatalog::default()
        }
    };

    let choice = select_partition(&request, &catalog);
    println!("{}", render_choice(&request, &choice, args.json)?);
    Ok(())
}

/// Tab-separated `partition mem time`, or a JSON object that also echoes the request.
fn render_choice(
    request: &ResourceRequest,
    choice: &PartitionChoice,
    json: bool,
) -> Result<String> {
    if json {
        let value = serde_json::json!({
            "partition": choice.partition_name,
            "mem_gb": choice.memory_gb,
            "time": choice.time_string(),
            "request": request,
        });
        serde_json::to_string(&value).into_diagnostic()
    } else {
        Ok(format!(
            "{}\t{}\t{}",
            choice.partition_name,
            choice.memory_gb,
            choice.time_string()
        ))
    }
}
