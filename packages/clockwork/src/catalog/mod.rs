//! Job catalog: the owning store of every job known to the engine.

mod memory;

pub use memory::MemoryCatalog;

use thiserror::Error;
use uuid::Uuid;

use crate::job::{Job, JobStatus};

/// Errors returned by catalog operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("job {0} not found")]
    NotFound(Uuid),

    #[error("job {0} already exists")]
    Exists(Uuid),
}

/// Concurrency-safe store of jobs with status-indexed queries.
///
/// The catalog exclusively owns all jobs. Every read returns a by-value
/// snapshot, so holding a returned [`Job`] never lets the caller mutate
/// catalog state; changes are written back through [`Catalog::update`].
/// Individual operations are linearizable.
pub trait Catalog: Send + Sync {
    /// Insert a new job; rejects duplicate ids with [`CatalogError::Exists`].
    fn add(&self, job: Job) -> Result<(), CatalogError>;

    /// Replace an existing job; the id must already be present.
    fn update(&self, job: Job) -> Result<(), CatalogError>;

    fn delete(&self, id: Uuid) -> Result<(), CatalogError>;

    fn get(&self, id: Uuid) -> Result<Job, CatalogError>;

    fn all(&self) -> Vec<Job>;

    fn enable(&self, id: Uuid) -> Result<(), CatalogError>;

    fn disable(&self, id: Uuid) -> Result<(), CatalogError>;

    fn has_enabled_jobs(&self) -> bool;

    /// Number of recorded runs for a job.
    fn run_count(&self, id: Uuid) -> Result<usize, CatalogError>;

    /// Snapshot of jobs currently in `status`.
    fn jobs_with_status(&self, status: JobStatus) -> Vec<Job>;

    fn inactive_jobs(&self) -> Vec<Job> {
        self.jobs_with_status(JobStatus::Inactive)
    }

    fn available_jobs(&self) -> Vec<Job> {
        self.jobs_with_status(JobStatus::Available)
    }

    fn schedulable_jobs(&self) -> Vec<Job> {
        self.jobs_with_status(JobStatus::Schedulable)
    }

    fn runnable_jobs(&self) -> Vec<Job> {
        self.jobs_with_status(JobStatus::Runnable)
    }

    fn pending_jobs(&self) -> Vec<Job> {
        self.jobs_with_status(JobStatus::Pending)
    }
}
