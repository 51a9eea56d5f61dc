use std::any::Any;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::task::{Handler, Message, Pipeline, Task, TaskStatus};

use super::{settle_pipeline, DEFAULT_MAX_CONCURRENT};

pub const TIME_LOG_TASK_KIND: &str = "timelog";

/// Capture the current instant and report it on the intercom.
#[derive(Debug, Clone, Default)]
pub struct TimeLogTask {
    timestamp: Option<DateTime<Utc>>,
    status: TaskStatus,
}

impl TimeLogTask {
    pub fn new() -> TimeLogTask {
        TimeLogTask::default()
    }

    /// The instant captured by the last execution, if any.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }
}

impl Task for TimeLogTask {
    fn kind(&self) -> &'static str {
        TIME_LOG_TASK_KIND
    }

    fn status(&self) -> TaskStatus {
        self.status
    }

    fn with_status(mut self: Box<Self>, status: TaskStatus) -> Box<dyn Task> {
        self.status = status;
        self
    }

    fn write_to_pipeline(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_box(&self) -> Box<dyn Task> {
        Box::new(self.clone())
    }
}

pub struct TimeLogTaskHandler {
    max_concurrent: usize,
}

impl Default for TimeLogTaskHandler {
    fn default() -> Self {
        TimeLogTaskHandler {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }
}

impl TimeLogTaskHandler {
    pub fn with_max_concurrent(max_concurrent: usize) -> TimeLogTaskHandler {
        TimeLogTaskHandler { max_concurrent }
    }
}

#[async_trait]
impl Handler for TimeLogTaskHandler {
    fn kind(&self) -> &'static str {
        TIME_LOG_TASK_KIND
    }

    fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    async fn execute(&self, task: Box<dyn Task>, pipeline: &Pipeline) -> Box<dyn Task> {
        let timestamp = Utc::now();
        let data = pipeline.take();

        let finished: Box<dyn Task> = match task.as_any().downcast_ref::<TimeLogTask>() {
            Some(time_log) => {
                pipeline.intercom().add(Message::log_with(
                    "time",
                    TIME_LOG_TASK_KIND,
                    serde_json::json!(timestamp),
                ));
                let mut time_log = time_log.clone();
                time_log.timestamp = Some(timestamp);
                time_log.status = TaskStatus::Completed;
                Box::new(time_log)
            }
            None => {
                pipeline.intercom().add(Message::error(
                    "task is not a timelog task",
                    task.kind(),
                    "downcast failed",
                ));
                task.with_status(TaskStatus::Error)
            }
        };

        settle_pipeline(finished.as_ref(), pipeline, data);
        finished
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::task::{Intercom, MessageKind};

    #[tokio::test]
    async fn captures_a_timestamp_and_logs_it() {
        let handler = TimeLogTaskHandler::default();
        let intercom = Arc::new(Intercom::new("job"));
        let pipeline = Pipeline::new(Arc::clone(&intercom));

        let before = Utc::now();
        let task = handler
            .execute(Box::new(TimeLogTask::new()), &pipeline)
            .await;
        let after = Utc::now();

        assert_eq!(task.status(), TaskStatus::Completed);
        let captured = task
            .as_any()
            .downcast_ref::<TimeLogTask>()
            .unwrap()
            .timestamp()
            .unwrap();
        assert!(captured >= before && captured <= after);

        let logs = intercom.get(MessageKind::Log);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].text, "time");
        assert_eq!(logs[0].task, "timelog");
    }
}
