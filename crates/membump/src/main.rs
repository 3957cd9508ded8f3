//! Command-line front end for bumping memory settings in Oozie workflows.

use anyhow::{Context, bail};
use clap::Parser;
use log::{LevelFilter, info, warn};
use membump_engine::{PropertyOutcome, TransformMode, ValueOutcome};
use membump_workflow::{HdfsStore, LocalStore, OozieCli, PatchReport, WorkflowPatcher};
use std::path::PathBuf;

/// Conversion factor for the gigabyte-denominated `--add` argument.
const MEGABYTES_PER_GIGABYTE: i64 = 1024;

/// Command-line options for the memory bumper.
#[derive(Debug, Parser)]
#[command(name = "membump", version)]
struct Cli {
    /// Coordinator action id of the killed job to patch
    #[arg(
        value_name = "ACTION_ID",
        required_unless_present = "local",
        conflicts_with = "local"
    )]
    action_id: Option<String>,
    /// Gigabytes to add to each eligible memory setting
    #[arg(short = 'a', long = "add", value_name = "GB", default_value_t = 1)]
    add: i64,
    /// Patch only the YARN application-master settings
    #[arg(long)]
    yarn: bool,
    /// Patch a workflow definition on the local filesystem instead
    #[arg(long, value_name = "FILE")]
    local: Option<PathBuf>,
}

/// Entry point for the membump command-line tool.
fn main() -> anyhow::Result<()> {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .try_init();

    let cli = Cli::parse();
    let delta_mb = cli.add * MEGABYTES_PER_GIGABYTE;
    let mode = if cli.yarn {
        TransformMode::YarnOnly
    } else {
        TransformMode::GeneralMapReduce
    };
    info!(
        "starting memory bump (delta_mb={}, yarn_only={}, local={})",
        delta_mb,
        cli.yarn,
        cli.local.is_some()
    );

    let patcher = WorkflowPatcher::new(delta_mb, mode);
    let report = if let Some(path) = cli.local.as_ref() {
        let path = path.to_string_lossy();
        patcher
            .patch_file(&LocalStore, &path)
            .with_context(|| format!("failed to patch local file {path}"))?
    } else {
        let Some(action_id) = cli.action_id.as_deref() else {
            bail!("an action id is required unless --local is given");
        };
        let scheduler = OozieCli::new().context("oozie client unavailable")?;
        let store = HdfsStore::new().context("hadoop filesystem client unavailable")?;
        patcher
            .patch_job(&scheduler, &store, action_id)
            .with_context(|| format!("failed to patch job {action_id}"))?
    };

    render_report(&report);
    Ok(())
}

/// Log the per-property outcomes and the closing summary of a patch run.
fn render_report(report: &PatchReport) {
    if !report.namespace.is_empty() {
        info!(
            "definition elements carry the namespace prefix '{}'",
            report.namespace
        );
    }
    for outcome in &report.outcomes {
        describe_outcome(outcome);
    }
    match report.backup_path.as_ref() {
        Some(backup) => info!(
            "updated {} (properties_changed={}, backup={})",
            report.app_path, report.modified, backup
        ),
        None => info!("no changes required for {}", report.app_path),
    }
}

/// Log one property outcome at a level matching its severity.
fn describe_outcome(outcome: &PropertyOutcome) {
    match &outcome.outcome {
        ValueOutcome::Updated(next) => {
            info!(
                "updating property '{}': '{}' -> '{}'",
                outcome.name, outcome.previous, next
            );
        }
        ValueOutcome::Unchanged => {
            info!(
                "property '{}' already satisfies the bump (value={})",
                outcome.name, outcome.previous
            );
        }
        ValueOutcome::Unrecognized => {
            warn!(
                "unrecognized value format for property '{}' (value={})",
                outcome.name, outcome.previous
            );
        }
    }
}
