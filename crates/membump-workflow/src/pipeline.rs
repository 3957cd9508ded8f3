//! End-to-end patching of a scheduled job's workflow definition.

use crate::WorkflowError;
use crate::scheduler::{
    APP_PATH_LABEL, EXTERNAL_ID_LABEL, JobScheduler, STATUS_LABEL, strip_filesystem_authority,
};
use crate::store::DocumentStore;
use log::{info, warn};
use membump_engine::{MutationResult, PropertyOutcome, TransformMode, mutate};

/// Job status required before a definition may be patched.
const TERMINAL_STATUS: &str = "KILLED";

/// Outcome of one pipeline run.
#[derive(Debug, Clone)]
pub struct PatchReport {
    /// Path the document was fetched from (and republished to).
    pub app_path: String,
    /// Where the original was moved, when a backup was taken.
    pub backup_path: Option<String>,
    /// Namespace prefix detected in the document.
    pub namespace: String,
    /// Per-property outcomes from the mutation pass.
    pub outcomes: Vec<PropertyOutcome>,
    /// Number of values rewritten.
    pub modified: usize,
}

/// Drives the status gate, path resolution, and the fetch/mutate/publish
/// cycle over a scheduler and a document store.
pub struct WorkflowPatcher {
    delta_mb: i64,
    mode: TransformMode,
}

impl WorkflowPatcher {
    /// New patcher applying `delta_mb` in `mode`.
    pub fn new(delta_mb: i64, mode: TransformMode) -> Self {
        Self { delta_mb, mode }
    }

    /// Patch the definition behind a coordinator action.
    ///
    /// The action must be in the KILLED state; a live job fails the run
    /// before anything is fetched. The action's external id names the
    /// spawned workflow job, whose own report carries the definition path.
    pub fn patch_job(
        &self,
        scheduler: &dyn JobScheduler,
        store: &dyn DocumentStore,
        action_id: &str,
    ) -> Result<PatchReport, WorkflowError> {
        let action = scheduler.info(action_id)?;
        let status = action
            .status
            .ok_or(WorkflowError::MissingField(STATUS_LABEL))?;
        if status != TERMINAL_STATUS {
            warn!("job {action_id} is {status}; kill it first: oozie job -kill <coord-id>");
            return Err(WorkflowError::NotTerminated {
                id: action_id.to_string(),
                status,
            });
        }
        info!("job {action_id} is {status}; resolving its workflow definition");

        let workflow_id = action
            .external_id
            .ok_or(WorkflowError::MissingField(EXTERNAL_ID_LABEL))?;
        info!("resolved workflow id {workflow_id}");

        let workflow = scheduler.info(&workflow_id)?;
        let app_path = workflow
            .app_path
            .ok_or(WorkflowError::MissingField(APP_PATH_LABEL))?;
        let app_path = strip_filesystem_authority(&app_path).to_string();
        info!("resolved definition path {app_path}");

        self.patch_document(store, app_path)
    }

    /// Patch the definition at a known path, skipping the scheduler.
    pub fn patch_file(
        &self,
        store: &dyn DocumentStore,
        path: &str,
    ) -> Result<PatchReport, WorkflowError> {
        self.patch_document(store, path.to_string())
    }

    fn patch_document(
        &self,
        store: &dyn DocumentStore,
        app_path: String,
    ) -> Result<PatchReport, WorkflowError> {
        let original = store.fetch(&app_path)?;
        let MutationResult {
            namespace,
            outcomes,
            modified,
            document,
        } = mutate(&original, self.delta_mb, self.mode)?;

        let backup_path = match document {
            Some(patched) => {
                let backup = store.backup(&app_path)?;
                store.publish(&app_path, &patched)?;
                Some(backup)
            }
            None => {
                info!("no properties needed changes; leaving {app_path} untouched");
                None
            }
        };

        Ok(PatchReport {
            app_path,
            backup_path,
            namespace,
            outcomes,
            modified,
        })
    }
}
