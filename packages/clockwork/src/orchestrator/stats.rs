use uuid::Uuid;

use crate::job::{Job, JobStatus};
use crate::task::TaskStatus;

/// Job population counters, one per lifecycle status plus totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobCounts {
    pub configured: usize,
    pub enabled: usize,
    pub disabled: usize,
    pub inactive: usize,
    pub available: usize,
    pub schedulable: usize,
    pub runnable: usize,
    pub pending: usize,
    pub active: usize,
    pub completed: usize,
    pub error: usize,
}

/// Per-job task progress derived from the most recent run result.
#[derive(Debug, Clone)]
pub struct TaskTally {
    pub id: Uuid,
    pub name: String,
    /// Tasks recorded by the current (most recent) result.
    pub completed: usize,
    /// Tasks in the job's sequence.
    pub total: usize,
    /// Whether the most recent result holds an errored or canceled task.
    pub has_errors: bool,
}

/// Point-in-time snapshot of the engine's job population.
#[derive(Debug, Clone, Default)]
pub struct Stats {
    pub jobs: JobCounts,
    pub tasks: Vec<TaskTally>,
}

impl Stats {
    /// Tally a catalog snapshot.
    pub fn from_jobs(jobs: &[Job]) -> Stats {
        let mut counts = JobCounts {
            configured: jobs.len(),
            ..JobCounts::default()
        };
        let mut tasks = Vec::with_capacity(jobs.len());

        for job in jobs {
            if job.enabled() {
                counts.enabled += 1;
            } else {
                counts.disabled += 1;
            }
            match job.status() {
                JobStatus::Inactive => counts.inactive += 1,
                JobStatus::Available => counts.available += 1,
                JobStatus::Schedulable => counts.schedulable += 1,
                JobStatus::Runnable => counts.runnable += 1,
                JobStatus::Pending => counts.pending += 1,
                JobStatus::Active => counts.active += 1,
                JobStatus::Completed => counts.completed += 1,
                JobStatus::Error => counts.error += 1,
            }

            let current = job.last_result();
            tasks.push(TaskTally {
                id: job.id(),
                name: job.name().to_string(),
                completed: current.map(|r| r.tasks().len()).unwrap_or(0),
                total: job.sequence().len(),
                has_errors: current.is_some_and(|r| {
                    r.tasks().iter().any(|t| {
                        matches!(t.status(), TaskStatus::Error | TaskStatus::Canceled)
                    })
                }),
            });
        }

        Stats {
            jobs: counts,
            tasks,
        }
    }

    pub fn has_task_errors(&self) -> bool {
        self.tasks.iter().any(|t| t.has_errors)
    }

    pub fn tasks_completed(&self) -> usize {
        self.tasks.iter().map(|t| t.completed).sum()
    }

    pub fn tasks_total(&self) -> usize {
        self.tasks.iter().map(|t| t.total).sum()
    }
}
