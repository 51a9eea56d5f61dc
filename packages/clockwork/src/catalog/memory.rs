use std::collections::HashMap;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::job::{Job, JobStatus};

use super::{Catalog, CatalogError};

/// Reference in-memory catalog.
///
/// One mutex protects the whole map. Every operation locks, scans or
/// mutates, and returns fresh values; the lock is never held across an
/// await point or a channel operation. Status queries are O(N) per scan,
/// which the promoter loops amortize by being rate-limited upstream.
#[derive(Default)]
pub struct MemoryCatalog {
    jobs: Mutex<HashMap<Uuid, Job>>,
}

impl MemoryCatalog {
    pub fn new() -> MemoryCatalog {
        MemoryCatalog::default()
    }

    pub fn len(&self) -> usize {
        self.jobs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.lock().is_empty()
    }
}

impl Catalog for MemoryCatalog {
    fn add(&self, job: Job) -> Result<(), CatalogError> {
        let mut jobs = self.jobs.lock();
        if jobs.contains_key(&job.id()) {
            return Err(CatalogError::Exists(job.id()));
        }
        jobs.insert(job.id(), job);
        Ok(())
    }

    fn update(&self, job: Job) -> Result<(), CatalogError> {
        let mut jobs = self.jobs.lock();
        if !jobs.contains_key(&job.id()) {
            return Err(CatalogError::NotFound(job.id()));
        }
        jobs.insert(job.id(), job);
        Ok(())
    }

    fn delete(&self, id: Uuid) -> Result<(), CatalogError> {
        self.jobs
            .lock()
            .remove(&id)
            .map(|_| ())
            .ok_or(CatalogError::NotFound(id))
    }

    fn get(&self, id: Uuid) -> Result<Job, CatalogError> {
        self.jobs
            .lock()
            .get(&id)
            .cloned()
            .ok_or(CatalogError::NotFound(id))
    }

    fn all(&self) -> Vec<Job> {
        self.jobs.lock().values().cloned().collect()
    }

    fn enable(&self, id: Uuid) -> Result<(), CatalogError> {
        let mut jobs = self.jobs.lock();
        let job = jobs.get_mut(&id).ok_or(CatalogError::NotFound(id))?;
        job.enable();
        Ok(())
    }

    fn disable(&self, id: Uuid) -> Result<(), CatalogError> {
        let mut jobs = self.jobs.lock();
        let job = jobs.get_mut(&id).ok_or(CatalogError::NotFound(id))?;
        job.disable();
        Ok(())
    }

    fn has_enabled_jobs(&self) -> bool {
        self.jobs.lock().values().any(Job::enabled)
    }

    fn run_count(&self, id: Uuid) -> Result<usize, CatalogError> {
        self.jobs
            .lock()
            .get(&id)
            .map(Job::run_count)
            .ok_or(CatalogError::NotFound(id))
    }

    fn jobs_with_status(&self, status: JobStatus) -> Vec<Job> {
        self.jobs
            .lock()
            .values()
            .filter(|job| job.status() == status)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cron::Schedule;
    use crate::task::stock::EmptyTask;
    use crate::task::Sequence;

    fn sample_job(name: &str) -> Job {
        Job::new(
            name,
            Schedule::parse("@everysecond").unwrap(),
            0,
            Sequence::new(vec![Box::new(EmptyTask::new())]),
        )
    }

    #[test]
    fn add_then_get_returns_the_job() {
        let catalog = MemoryCatalog::new();
        let job = sample_job("alpha");
        let id = job.id();

        catalog.add(job).unwrap();
        let fetched = catalog.get(id).unwrap();
        assert_eq!(fetched.id(), id);
        assert_eq!(fetched.name(), "alpha");
    }

    #[test]
    fn duplicate_add_rejects_and_keeps_one_copy() {
        let catalog = MemoryCatalog::new();
        let job = sample_job("alpha");
        let id = job.id();

        catalog.add(job.clone()).unwrap();
        assert_eq!(catalog.add(job), Err(CatalogError::Exists(id)));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn missing_ids_return_not_found() {
        let catalog = MemoryCatalog::new();
        let id = Uuid::new_v4();

        assert_eq!(catalog.get(id).unwrap_err(), CatalogError::NotFound(id));
        assert_eq!(catalog.delete(id), Err(CatalogError::NotFound(id)));

        let ghost = sample_job("ghost");
        let ghost_id = ghost.id();
        assert_eq!(catalog.update(ghost), Err(CatalogError::NotFound(ghost_id)));
    }

    #[test]
    fn delete_removes_the_job() {
        let catalog = MemoryCatalog::new();
        let job = sample_job("alpha");
        let id = job.id();

        catalog.add(job).unwrap();
        catalog.delete(id).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn disable_of_the_only_enabled_job_clears_has_enabled_jobs() {
        let catalog = MemoryCatalog::new();
        let job = sample_job("alpha");
        let id = job.id();

        catalog.add(job).unwrap();
        assert!(catalog.has_enabled_jobs());

        catalog.disable(id).unwrap();
        assert!(!catalog.has_enabled_jobs());

        catalog.enable(id).unwrap();
        assert!(catalog.has_enabled_jobs());
    }

    #[test]
    fn status_queries_return_exactly_matching_jobs() {
        let catalog = MemoryCatalog::new();
        let mut schedulable = sample_job("schedulable");
        schedulable.set_status(JobStatus::Schedulable);
        let schedulable_id = schedulable.id();
        let inactive = sample_job("inactive");

        catalog.add(schedulable).unwrap();
        catalog.add(inactive).unwrap();

        let found = catalog.schedulable_jobs();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id(), schedulable_id);
        assert_eq!(catalog.inactive_jobs().len(), 1);
        assert!(catalog.pending_jobs().is_empty());
    }

    #[test]
    fn snapshots_do_not_leak_mutations() {
        let catalog = MemoryCatalog::new();
        let job = sample_job("alpha");
        let id = job.id();
        catalog.add(job).unwrap();

        let mut snapshot = catalog.get(id).unwrap();
        snapshot.set_status(JobStatus::Active);
        snapshot.disable();

        let fresh = catalog.get(id).unwrap();
        assert_eq!(fresh.status(), JobStatus::Inactive);
        assert!(fresh.enabled());
    }

    #[test]
    fn run_count_tracks_history_length() {
        let catalog = MemoryCatalog::new();
        let mut job = sample_job("alpha");
        let id = job.id();
        job.history_mut()
            .push(crate::job::RunResult::started(chrono::Utc::now()));
        catalog.add(job).unwrap();

        assert_eq!(catalog.run_count(id).unwrap(), 1);
    }
}
