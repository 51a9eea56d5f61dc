use std::any::Any;

use async_trait::async_trait;

use crate::task::{Handler, Pipeline, Task, TaskStatus};

use super::{settle_pipeline, DEFAULT_MAX_CONCURRENT};

pub const PRINT_TASK_KIND: &str = "print";

/// Print a message to stdout.
#[derive(Debug, Clone)]
pub struct PrintTask {
    message: String,
    write_output: bool,
    status: TaskStatus,
}

impl PrintTask {
    pub fn new(message: impl Into<String>) -> PrintTask {
        PrintTask {
            message: message.into(),
            write_output: true,
            status: TaskStatus::Pending,
        }
    }

    pub fn without_pipeline_write(mut self) -> PrintTask {
        self.write_output = false;
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Task for PrintTask {
    fn kind(&self) -> &'static str {
        PRINT_TASK_KIND
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

pub struct PrintTaskHandler {
    max_concurrent: usize,
}

impl Default for PrintTaskHandler {
    fn default() -> Self {
        PrintTaskHandler {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }
}

impl PrintTaskHandler {
    pub fn with_max_concurrent(max_concurrent: usize) -> PrintTaskHandler {
        PrintTaskHandler { max_concurrent }
    }
}

#[async_trait]
impl Handler for PrintTaskHandler {
    fn kind(&self) -> &'static str {
        PRINT_TASK_KIND
    }

    fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    async fn execute(&self, task: Box<dyn Task>, pipeline: &Pipeline) -> Box<dyn Task> {
        let data = pipeline.take();

        match task.as_any().downcast_ref::<PrintTask>() {
            Some(print) => println!("{}", print.message()),
            None => {
                pipeline.intercom().add(crate::task::Message::error(
                    "task is not a print task",
                    task.kind(),
                    "downcast failed",
                ));
                settle_pipeline(task.as_ref(), pipeline, data);
                return task.with_status(TaskStatus::Error);
            }
        }

        settle_pipeline(task.as_ref(), pipeline, data);
        task.with_status(TaskStatus::Completed)
    }
}
