//! Job model: identity, schedule, lifecycle status and run history.

mod result;

pub use result::RunResult;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cron::Schedule;
use crate::task::Sequence;

/// Lifecycle status of a job.
///
/// Promotion follows a fixed path; the orchestrator's promoter stages
/// advance jobs one step at a time:
///
/// ```text
/// Inactive → Available → Schedulable → Runnable → Pending → Active
///                                                              │
///                        Completed / Error ◄───────────────────┘
/// ```
///
/// Completed and Error jobs with runs remaining cycle back to Inactive;
/// jobs at their run cap are disabled and keep their final status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Inactive,
    Available,
    Schedulable,
    Runnable,
    Pending,
    Active,
    Completed,
    Error,
}

/// A named, scheduled, bounded-run sequence of tasks.
///
/// Name, schedule, run cap and task sequence are fixed at creation; the
/// enabled flag, status and history mutate over the job's life. All such
/// mutation flows through the owning catalog, and readers only ever see
/// by-value snapshots.
#[derive(Debug, Clone)]
pub struct Job {
    id: Uuid,
    name: String,
    schedule: Schedule,
    enabled: bool,
    status: JobStatus,
    max_runs: usize,
    sequence: Sequence,
    history: Vec<RunResult>,
}

impl Job {
    /// Create an enabled, inactive job. A `max_runs` of zero means
    /// unlimited runs.
    pub fn new(
        name: impl Into<String>,
        schedule: Schedule,
        max_runs: usize,
        sequence: Sequence,
    ) -> Job {
        Job {
            id: Uuid::new_v4(),
            name: name.into(),
            schedule,
            enabled: true,
            status: JobStatus::Inactive,
            max_runs,
            sequence,
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn set_status(&mut self, status: JobStatus) {
        self.status = status;
    }

    pub fn max_runs(&self) -> usize {
        self.max_runs
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn sequence_mut(&mut self) -> &mut Sequence {
        &mut self.sequence
    }

    /// Results of past runs (and the in-flight run, while active),
    /// oldest first.
    pub fn history(&self) -> &[RunResult] {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut Vec<RunResult> {
        &mut self.history
    }

    pub fn run_count(&self) -> usize {
        self.history.len()
    }

    pub fn last_result(&self) -> Option<&RunResult> {
        self.history.last()
    }

    /// Enabled and either unlimited or below the run cap.
    pub fn is_eligible(&self) -> bool {
        self.enabled && (self.max_runs == 0 || self.history.len() < self.max_runs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::stock::EmptyTask;

    fn sample_job(max_runs: usize) -> Job {
        Job::new(
            "sample",
            Schedule::parse("@everysecond").unwrap(),
            max_runs,
            Sequence::new(vec![Box::new(EmptyTask::new())]),
        )
    }

    #[test]
    fn new_job_is_enabled_and_inactive() {
        let job = sample_job(0);
        assert!(job.enabled());
        assert_eq!(job.status(), JobStatus::Inactive);
        assert!(job.history().is_empty());
    }

    #[test]
    fn jobs_get_distinct_ids() {
        assert_ne!(sample_job(0).id(), sample_job(0).id());
    }

    #[test]
    fn zero_max_runs_means_unlimited() {
        let mut job = sample_job(0);
        for _ in 0..10 {
            job.history_mut().push(RunResult::started(chrono::Utc::now()));
        }
        assert!(job.is_eligible());
    }

    #[test]
    fn run_cap_ends_eligibility() {
        let mut job = sample_job(2);
        assert!(job.is_eligible());
        job.history_mut().push(RunResult::started(chrono::Utc::now()));
        assert!(job.is_eligible());
        job.history_mut().push(RunResult::started(chrono::Utc::now()));
        assert!(!job.is_eligible());
    }

    #[test]
    fn disabled_job_is_not_eligible() {
        let mut job = sample_job(0);
        job.disable();
        assert!(!job.is_eligible());
        job.enable();
        assert!(job.is_eligible());
    }
}
