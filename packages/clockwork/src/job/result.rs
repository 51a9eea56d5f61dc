use chrono::{DateTime, Duration, Utc};

use crate::task::{Message, Task};

use super::JobStatus;

/// Record of one job run.
///
/// Created when the run starts (status [`JobStatus::Active`], no finish
/// time) and finalized exactly once when the run completes. Finalized
/// results never change.
#[derive(Debug, Clone)]
pub struct RunResult {
    start: DateTime<Utc>,
    finish: Option<DateTime<Utc>>,
    status: JobStatus,
    messages: Vec<Message>,
    tasks: Vec<Box<dyn Task>>,
}

impl RunResult {
    /// A run that has just begun.
    pub fn started(start: DateTime<Utc>) -> RunResult {
        RunResult {
            start,
            finish: None,
            status: JobStatus::Active,
            messages: Vec::new(),
            tasks: Vec::new(),
        }
    }

    /// Finalize with the aggregate status, intercom messages and the
    /// executed-task snapshot.
    pub fn finalize(
        self,
        finish: DateTime<Utc>,
        status: JobStatus,
        messages: Vec<Message>,
        tasks: Vec<Box<dyn Task>>,
    ) -> RunResult {
        RunResult {
            start: self.start,
            finish: Some(finish),
            status,
            messages,
            tasks,
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn finish(&self) -> Option<DateTime<Utc>> {
        self.finish
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn is_finalized(&self) -> bool {
        self.finish.is_some()
    }

    /// Intercom messages collected during the run, in emission order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Snapshot of the executed tasks, in execution order.
    pub fn tasks(&self) -> &[Box<dyn Task>] {
        &self.tasks
    }

    /// Wall-clock duration of the run; `None` while still running.
    pub fn runtime(&self) -> Option<Duration> {
        self.finish.map(|finish| finish - self.start)
    }
}
