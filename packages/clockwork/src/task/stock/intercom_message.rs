use std::any::Any;

use async_trait::async_trait;

use crate::task::{Handler, Message, Pipeline, Task, TaskStatus};

use super::{settle_pipeline, DEFAULT_MAX_CONCURRENT};

pub const INTERCOM_MESSAGE_TASK_KIND: &str = "intercom";

/// Emit a fixed log message on the run's intercom.
#[derive(Debug, Clone)]
pub struct IntercomMessageTask {
    message: String,
    status: TaskStatus,
}

impl IntercomMessageTask {
    pub fn new(message: impl Into<String>) -> IntercomMessageTask {
        IntercomMessageTask {
            message: message.into(),
            status: TaskStatus::Pending,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Task for IntercomMessageTask {
    fn kind(&self) -> &'static str {
        INTERCOM_MESSAGE_TASK_KIND
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

pub struct IntercomMessageTaskHandler {
    max_concurrent: usize,
}

impl Default for IntercomMessageTaskHandler {
    fn default() -> Self {
        IntercomMessageTaskHandler {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }
}

impl IntercomMessageTaskHandler {
    pub fn with_max_concurrent(max_concurrent: usize) -> IntercomMessageTaskHandler {
        IntercomMessageTaskHandler { max_concurrent }
    }
}

#[async_trait]
impl Handler for IntercomMessageTaskHandler {
    fn kind(&self) -> &'static str {
        INTERCOM_MESSAGE_TASK_KIND
    }

    fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    async fn execute(&self, task: Box<dyn Task>, pipeline: &Pipeline) -> Box<dyn Task> {
        let data = pipeline.take();

        let status = match task.as_any().downcast_ref::<IntercomMessageTask>() {
            Some(emit) => {
                pipeline.intercom().add(Message::log(
                    emit.message().to_string(),
                    INTERCOM_MESSAGE_TASK_KIND,
                ));
                TaskStatus::Completed
            }
            None => {
                pipeline.intercom().add(Message::error(
                    "task is not an intercom message task",
                    task.kind(),
                    "downcast failed",
                ));
                TaskStatus::Error
            }
        };

        settle_pipeline(task.as_ref(), pipeline, data);
        task.with_status(status)
    }
}
