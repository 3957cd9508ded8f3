//! Scheduler queries resolving a job to its status and definition path.

use crate::WorkflowError;
use crate::command::run_capture;
use log::{debug, info};
use std::path::PathBuf;

/// Scheduler command-line client binary.
const OOZIE_BINARY: &str = "oozie";

/// Report label carrying the job status.
pub(crate) const STATUS_LABEL: &str = "Status";
/// Report label carrying the id of the spawned job.
pub(crate) const EXTERNAL_ID_LABEL: &str = "External ID";
/// Report label carrying the definition path.
pub(crate) const APP_PATH_LABEL: &str = "App Path";

/// Fields extracted from a scheduler job report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobInfo {
    /// Current job status, e.g. `KILLED`.
    pub status: Option<String>,
    /// Id of the job this one spawned (the workflow id on a coordinator
    /// action report).
    pub external_id: Option<String>,
    /// Storage location of the job's definition document.
    pub app_path: Option<String>,
}

/// Query surface of the job scheduler.
pub trait JobScheduler {
    /// Fetch the labelled report for `job_id` and extract its fields.
    fn info(&self, job_id: &str) -> Result<JobInfo, WorkflowError>;
}

/// Scheduler client shelling out to the `oozie` command-line tool.
pub struct OozieCli {
    binary: PathBuf,
}

impl OozieCli {
    /// Resolve the `oozie` binary from PATH.
    pub fn new() -> Result<Self, WorkflowError> {
        let binary = which::which(OOZIE_BINARY).map_err(|_| {
            WorkflowError::DependencyMissing(format!("{OOZIE_BINARY} not found in PATH"))
        })?;
        info!("oozie client initialized (path={})", binary.display());
        Ok(Self { binary })
    }
}

impl JobScheduler for OozieCli {
    fn info(&self, job_id: &str) -> Result<JobInfo, WorkflowError> {
        let output = run_capture(&self.binary.to_string_lossy(), &["job", "-info", job_id])?;
        let info = parse_job_report(&String::from_utf8_lossy(&output));
        debug!(
            "scheduler report parsed (job={job_id}, status={:?})",
            info.status
        );
        Ok(info)
    }
}

/// Extract the labelled fields from an `oozie job -info` report.
///
/// Report lines look like `Status    : KILLED`. Labels are matched exactly
/// after trimming, so `External Status` never shadows `Status`. The first
/// occurrence of each label wins, and a `-` value counts as absent.
pub(crate) fn parse_job_report(report: &str) -> JobInfo {
    let mut info = JobInfo::default();
    for line in report.lines() {
        let Some((label, value)) = line.split_once(':') else {
            continue;
        };
        let label = label.trim();
        let value = value.trim();
        if value.is_empty() || value == "-" {
            continue;
        }
        match label {
            STATUS_LABEL if info.status.is_none() => {
                info.status = Some(value.to_string());
            }
            EXTERNAL_ID_LABEL if info.external_id.is_none() => {
                info.external_id = Some(value.to_string());
            }
            APP_PATH_LABEL if info.app_path.is_none() => {
                info.app_path = Some(value.to_string());
            }
            _ => {}
        }
    }
    info
}

/// Strip a `scheme://authority` prefix down to the absolute path.
///
/// `hdfs://host:8020/projects/x` becomes `/projects/x`; a plain path passes
/// through unchanged.
pub fn strip_filesystem_authority(path: &str) -> &str {
    let Some(scheme_end) = path.find("://") else {
        return path;
    };
    let rest = &path[scheme_end + 3..];
    match rest.find('/') {
        Some(slash) => &rest[slash..],
        None => "/",
    }
}
