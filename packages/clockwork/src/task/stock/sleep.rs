use std::any::Any;
use std::time::Duration;

use async_trait::async_trait;

use crate::task::{Handler, Pipeline, Task, TaskStatus};

use super::{settle_pipeline, DEFAULT_MAX_CONCURRENT};

pub const SLEEP_TASK_KIND: &str = "sleep";

/// Sleep for a fixed number of milliseconds.
#[derive(Debug, Clone)]
pub struct SleepTask {
    milliseconds: u64,
    write_output: bool,
    status: TaskStatus,
}

impl SleepTask {
    pub fn new(milliseconds: u64) -> SleepTask {
        SleepTask {
            milliseconds,
            write_output: true,
            status: TaskStatus::Pending,
        }
    }

    pub fn without_pipeline_write(mut self) -> SleepTask {
        self.write_output = false;
        self
    }

    pub fn milliseconds(&self) -> u64 {
        self.milliseconds
    }
}

impl Task for SleepTask {
    fn kind(&self) -> &'static str {
        SLEEP_TASK_KIND
    }

    fn status(&self) -> TaskStatus {
        self.status
    }

    fn with_status(mut self: Box<Self>, status: TaskStatus) -> Box<dyn Task> {
        self.status = status;
        self
    }

    fn write_to_pipeline(&self) -> bool {
        self.write_output
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_box(&self) -> Box<dyn Task> {
        Box::new(self.clone())
    }
}

pub struct SleepTaskHandler {
    max_concurrent: usize,
}

impl Default for SleepTaskHandler {
    fn default() -> Self {
        SleepTaskHandler {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }
}

impl SleepTaskHandler {
    pub fn with_max_concurrent(max_concurrent: usize) -> SleepTaskHandler {
        SleepTaskHandler { max_concurrent }
    }
}

#[async_trait]
impl Handler for SleepTaskHandler {
    fn kind(&self) -> &'static str {
        SLEEP_TASK_KIND
    }

    fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    async fn execute(&self, task: Box<dyn Task>, pipeline: &Pipeline) -> Box<dyn Task> {
        let millis = match task.as_any().downcast_ref::<SleepTask>() {
            Some(sleep) => sleep.milliseconds(),
            None => {
                pipeline.intercom().add(crate::task::Message::error(
                    "task is not a sleep task",
                    task.kind(),
                    "downcast failed",
                ));
                return task.with_status(TaskStatus::Error);
            }
        };

        tokio::time::sleep(Duration::from_millis(millis)).await;

        let data = pipeline.take();
        settle_pipeline(task.as_ref(), pipeline, data);
        task.with_status(TaskStatus::Completed)
    }
}
