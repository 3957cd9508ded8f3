//! Orchestration around the mutation engine.
//!
//! Resolves a scheduled job to its workflow definition, gates on the job
//! being killed, and drives the fetch/mutate/backup/publish cycle. The
//! scheduler and the document store sit behind traits; the production
//! implementations wrap the `oozie` and `hadoop` command-line clients.

mod command;
mod error;
mod pipeline;
mod scheduler;
mod store;

/// Public error type for client and pipeline operations.
pub use error::WorkflowError;
/// Patch pipeline and its report.
pub use pipeline::{PatchReport, WorkflowPatcher};
/// Scheduler query surface.
pub use scheduler::{JobInfo, JobScheduler, OozieCli, strip_filesystem_authority};
/// Document storage surface.
pub use store::{DocumentStore, HdfsStore, LocalStore};
