//! Workflow command handlers
//!
//! Builds an engine for the selected profile, runs the workflow with a
//! spinner fed by poller progress events, and reports the outcome.

use std::time::Duration;

use auroractl_core::workflows::{clone_in_time, delete_cluster, restore_from_snapshot, upgrade_in_place};
use auroractl_core::{
    CloneParams, DeleteParams, ProgressCallback, ProgressEvent, SnapshotRestoreParams,
    UpgradeParams, WorkflowOutcome, WorkflowReport,
};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::cli::{self, WorkflowCommands};
use crate::connection::{ConnectionManager, Overrides};
use crate::error::{AuroraCtlError, CliDiagnostic, Result as CliResult};
use crate::output::{self, OutputFormat};

/// How a workflow run should report back
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub overrides: Overrides,
    pub output: cli::OutputFormat,
    pub strict: bool,
}

pub async fn handle_workflow_command(
    command: &WorkflowCommands,
    conn_mgr: &ConnectionManager,
    options: &RunOptions,
) -> CliResult<()> {
    let missing = command.missing();
    if !missing.is_empty() {
        // nothing to run, so no profile region or credentials are resolved
        warn!(workflow = command.name(), ?missing, "Required arguments missing, nothing to do");
        let outcome = WorkflowOutcome::Skipped {
            workflow: command.name(),
            missing,
        };
        return report_outcome(&outcome, options);
    }

    let spinner = (options.output == cli::OutputFormat::Auto).then(|| new_spinner(command.name()));

    let mut engine = conn_mgr.create_engine(&options.overrides).await?;
    if let Some(pb) = &spinner {
        engine = engine.with_progress(progress_callback(pb.clone()));
    }

    debug!(workflow = command.name(), "Running workflow");
    let result = match command {
        WorkflowCommands::UpgradeClusterVersion(args) => {
            upgrade_in_place(&engine, &UpgradeParams::from(args)).await
        }
        WorkflowCommands::CloneClusterInTime(args) => {
            clone_in_time(&engine, &CloneParams::from(args)).await
        }
        WorkflowCommands::RestoreFromSnapshot(args) => {
            restore_from_snapshot(&engine, &SnapshotRestoreParams::from(args)).await
        }
        WorkflowCommands::DeleteCluster(args) => {
            delete_cluster(&engine, &DeleteParams::from(args)).await
        }
    };

    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }

    report_outcome(&result?, options)
}

fn report_outcome(outcome: &WorkflowOutcome, options: &RunOptions) -> CliResult<()> {
    let format = OutputFormat::from_cli(options.output);

    match outcome {
        WorkflowOutcome::Skipped { workflow, missing } => {
            let flags: Vec<String> = missing.iter().map(|name| as_flag(name)).collect();
            if options.strict {
                return Err(AuroraCtlError::WorkflowSkipped {
                    workflow: *workflow,
                    missing: flags,
                });
            }

            CliDiagnostic::warning(&format!("{workflow} did nothing"))
                .detail(&format!("missing {}", flags.join(", ")))
                .tip("pass --strict to treat this as an error")
                .print();
            if let Some(format) = format {
                output::print_output(outcome, format)?;
            }
        }
        WorkflowOutcome::Completed(report) => {
            info!(
                workflow = report.workflow,
                cluster = %report.cluster,
                steps = report.steps.len(),
                "Workflow completed"
            );
            match format {
                Some(format) => output::print_output(outcome, format)?,
                None => print_report(report),
            }
        }
    }
    Ok(())
}

fn print_report(report: &WorkflowReport) {
    println!(
        "{} {} finished in {} ({})",
        "✓".green().bold(),
        report.workflow,
        format_elapsed(report.elapsed),
        report.cluster.bold()
    );
    for step in &report.steps {
        println!("  - {step}");
    }
}

/// `source_cluster_identifier` -> `--source-cluster-identifier`
fn as_flag(name: &str) -> String {
    format!("--{}", name.replace('_', "-"))
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    match (secs / 3600, secs % 3600 / 60, secs % 60) {
        (0, 0, s) => format!("{s}s"),
        (0, m, s) => format!("{m}m {s}s"),
        (h, m, s) => format!("{h}h {m}m {s}s"),
    }
}

fn new_spinner(workflow: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) =
        ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed_precise}]")
    {
        pb.set_style(style);
    }
    pb.set_message(format!("Running {workflow}"));
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

fn progress_callback(pb: ProgressBar) -> ProgressCallback {
    Box::new(move |event: ProgressEvent| match event {
        ProgressEvent::Started { resource } => {
            pb.set_message(format!("Waiting for {resource}"));
        }
        ProgressEvent::Polling {
            resource,
            attempt,
            elapsed,
        } => {
            pb.set_message(format!(
                "Waiting for {resource} (check {attempt}, {})",
                format_elapsed(elapsed)
            ));
        }
        ProgressEvent::Ready {
            resource, elapsed, ..
        } => {
            pb.println(format!(
                "{} {resource} after {}",
                "✓".green(),
                format_elapsed(elapsed)
            ));
        }
        ProgressEvent::Failed { resource, error } => {
            pb.println(format!("{} {resource}: {error}", "✗".red()));
        }
    })
}
