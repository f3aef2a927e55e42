//! The per-request conversion record.
//!
//! A [`ConversionJob`] owns the two staging paths for one request. Both
//! paths derive from the same freshly generated v4 uuid, so concurrent
//! requests sharing the staging directories can never collide. Dropping
//! the job deletes both files best-effort, which makes cleanup run on
//! every exit path out of the handler, early `?` returns and panics
//! included.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

/// Linear lifecycle of a conversion request.
///
/// `Running` leads to exactly one of `Succeeded` / `Failed`; there is no
/// branching beyond that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

/// One uploaded document staged for conversion.
#[derive(Debug)]
pub struct ConversionJob {
    id: Uuid,
    input_path: PathBuf,
    output_path: PathBuf,
    status: JobStatus,
}

impl ConversionJob {
    /// Create a fresh job with uuid-derived staging paths:
    /// `<upload_dir>/<uuid>.cdr` and `<output_dir>/<uuid>.png`.
    pub fn new(upload_dir: &Path, output_dir: &Path) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            input_path: upload_dir.join(format!("{id}.cdr")),
            output_path: output_dir.join(format!("{id}.png")),
            status: JobStatus::Pending,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn mark_running(&mut self) {
        self.status = JobStatus::Running;
    }

    pub fn mark_succeeded(&mut self) {
        self.status = JobStatus::Succeeded;
    }

    pub fn mark_failed(&mut self) {
        self.status = JobStatus::Failed;
    }
}

impl Drop for ConversionJob {
    fn drop(&mut self) {
        debug!(job_id = %self.id, status = ?self.status, "cleaning up staging files");
        for path in [&self.input_path, &self.output_path] {
            if let Err(err) = std::fs::remove_file(path) {
                // Missing files are expected on most failure paths; anything
                // else is logged for operational visibility but never
                // surfaced, so it cannot mask the primary result.
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!(
                        job_id = %self.id,
                        path = %path.display(),
                        error = %err,
                        "failed to remove staging file"
                    );
                }
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn paths_share_one_uuid() {
        let dir = tempfile::tempdir().unwrap();
        let job = ConversionJob::new(dir.path(), dir.path());
        assert_eq!(
            job.input_path().file_stem(),
            job.output_path().file_stem()
        );
        assert_eq!(job.input_path().extension().unwrap(), "cdr");
        assert_eq!(job.output_path().extension().unwrap(), "png");
        assert_eq!(
            job.input_path().file_stem().unwrap().to_str().unwrap(),
            job.id().to_string()
        );
    }

    #[test]
    fn fresh_jobs_never_collide() {
        let dir = tempfile::tempdir().unwrap();
        let a = ConversionJob::new(dir.path(), dir.path());
        let b = ConversionJob::new(dir.path(), dir.path());
        assert_ne!(a.input_path(), b.input_path());
        assert_ne!(a.output_path(), b.output_path());
    }

    #[test]
    fn drop_removes_staged_files() {
        let dir = tempfile::tempdir().unwrap();
        let (input, output) = {
            let job = ConversionJob::new(dir.path(), dir.path());
            std::fs::write(job.input_path(), b"cdr bytes").unwrap();
            std::fs::write(job.output_path(), b"png bytes").unwrap();
            (job.input_path().to_owned(), job.output_path().to_owned())
        };
        assert!(!input.exists());
        assert!(!output.exists());
    }

    #[test]
    fn drop_tolerates_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        // Neither staging file was ever written; dropping must not panic.
        let _job = ConversionJob::new(dir.path(), dir.path());
    }

    #[test]
    fn status_transitions_are_linear() {
        let dir = tempfile::tempdir().unwrap();
        let mut job = ConversionJob::new(dir.path(), dir.path());
        assert_eq!(job.status(), JobStatus::Pending);
        job.mark_running();
        assert_eq!(job.status(), JobStatus::Running);
        job.mark_succeeded();
        assert_eq!(job.status(), JobStatus::Succeeded);
    }
}
