//! Fetch, backup, and publish operations for workflow documents.

use crate::WorkflowError;
use crate::command::{run_capture, run_with_stdin};
use chrono::{DateTime, Local};
use log::info;
use std::borrow::Cow;
use std::fs;
use std::path::PathBuf;

/// Filesystem command-line client binary.
const HADOOP_BINARY: &str = "hadoop";
/// Timestamp layout used in backup names.
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Storage operations over a document path.
///
/// Paths are plain strings: distributed filesystem paths are not local OS
/// paths.
pub trait DocumentStore {
    /// Read the document bytes at `path`.
    fn fetch(&self, path: &str) -> Result<Vec<u8>, WorkflowError>;
    /// Rename the document aside to a timestamped backup, returning the
    /// backup path.
    fn backup(&self, path: &str) -> Result<String, WorkflowError>;
    /// Write `bytes` at `path`.
    fn publish(&self, path: &str, bytes: &[u8]) -> Result<(), WorkflowError>;
}

/// Backup destination for `path` at `moment`.
pub(crate) fn backup_destination(path: &str, moment: DateTime<Local>) -> String {
    format!("{path}_bak_{}", moment.format(BACKUP_TIMESTAMP_FORMAT))
}

/// Store shelling out to the `hadoop` filesystem client.
pub struct HdfsStore {
    binary: PathBuf,
}

impl HdfsStore {
    /// Resolve the `hadoop` binary from PATH.
    pub fn new() -> Result<Self, WorkflowError> {
        let binary = which::which(HADOOP_BINARY).map_err(|_| {
            WorkflowError::DependencyMissing(format!("{HADOOP_BINARY} not found in PATH"))
        })?;
        info!(
            "hadoop filesystem client initialized (path={})",
            binary.display()
        );
        Ok(Self { binary })
    }

    fn program(&self) -> Cow<'_, str> {
        self.binary.to_string_lossy()
    }
}

impl DocumentStore for HdfsStore {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, WorkflowError> {
        run_capture(&self.program(), &["fs", "-cat", path])
    }

    fn backup(&self, path: &str) -> Result<String, WorkflowError> {
        let destination = backup_destination(path, Local::now());
        run_capture(&self.program(), &["fs", "-mv", path, &destination])?;
        info!("backup created at {destination}");
        Ok(destination)
    }

    fn publish(&self, path: &str, bytes: &[u8]) -> Result<(), WorkflowError> {
        run_with_stdin(&self.program(), &["fs", "-put", "-", path], bytes)?;
        info!("document published to {path}");
        Ok(())
    }
}

/// Store reading and writing the local filesystem.
pub struct LocalStore;

impl DocumentStore for LocalStore {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, WorkflowError> {
        Ok(fs::read(path)?)
    }

    fn backup(&self, path: &str) -> Result<String, WorkflowError> {
        let destination = backup_destination(path, Local::now());
        fs::rename(path, &destination)?;
        info!("backup created at {destination}");
        Ok(destination)
    }

    fn publish(&self, path: &str, bytes: &[u8]) -> Result<(), WorkflowError> {
        Ok(fs::write(path, bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn backup_names_carry_a_timestamp_suffix() {
        let moment = Local
            .with_ymd_and_hms(2024, 3, 9, 14, 30, 5)
            .single()
            .expect("unambiguous local time");
        assert_eq!(
            backup_destination("/projects/gam/workflow.xml", moment),
            "/projects/gam/workflow.xml_bak_20240309_143005"
        );
    }

    #[test]
    fn local_store_fetches_and_publishes() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("workflow.xml");
        let path = path.to_string_lossy();
        fs::write(&*path, b"<configuration/>").expect("seed file");

        let store = LocalStore;
        assert_eq!(store.fetch(&path).expect("fetch"), b"<configuration/>");

        store.publish(&path, b"<configuration></configuration>").expect("publish");
        assert_eq!(
            fs::read(&*path).expect("read back"),
            b"<configuration></configuration>"
        );
    }

    #[test]
    fn local_store_backup_moves_the_original() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("workflow.xml");
        let path = path.to_string_lossy();
        fs::write(&*path, b"original").expect("seed file");

        let store = LocalStore;
        let backup = store.backup(&path).expect("backup");

        assert!(backup.starts_with(&format!("{path}_bak_")));
        assert!(!fs::exists(&*path).expect("check original"));
        assert_eq!(fs::read(&backup).expect("read backup"), b"original");
    }

    #[test]
    fn local_store_fetch_reports_missing_files() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("absent.xml");
        let err = LocalStore.fetch(&path.to_string_lossy()).unwrap_err();
        assert!(matches!(err, WorkflowError::Io(_)));
    }
}
