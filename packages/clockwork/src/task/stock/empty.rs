use std::any::Any;

use async_trait::async_trait;

use crate::task::{Handler, Pipeline, Task, TaskStatus};

use super::{settle_pipeline, DEFAULT_MAX_CONCURRENT};

pub const EMPTY_TASK_KIND: &str = "empty";

/// A task that does nothing. Useful as a scheduling probe.
#[derive(Debug, Clone)]
pub struct EmptyTask {
    write_output: bool,
    status: TaskStatus,
}

impl Default for EmptyTask {
    fn default() -> Self {
        EmptyTask {
            write_output: true,
            status: TaskStatus::Pending,
        }
    }
}

impl EmptyTask {
    pub fn new() -> EmptyTask {
        EmptyTask::default()
    }

    pub fn without_pipeline_write(mut self) -> EmptyTask {
        self.write_output = false;
        self
    }
}

impl Task for EmptyTask {
    fn kind(&self) -> &'static str {
        EMPTY_TASK_KIND
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

pub struct EmptyTaskHandler {
    max_concurrent: usize,
}

impl Default for EmptyTaskHandler {
    fn default() -> Self {
        EmptyTaskHandler {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }
}

impl EmptyTaskHandler {
    pub fn with_max_concurrent(max_concurrent: usize) -> EmptyTaskHandler {
        EmptyTaskHandler { max_concurrent }
    }
}

#[async_trait]
impl Handler for EmptyTaskHandler {
    fn kind(&self) -> &'static str {
        EMPTY_TASK_KIND
    }

    fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    async fn execute(&self, task: Box<dyn Task>, pipeline: &Pipeline) -> Box<dyn Task> {
        let data = pipeline.take();
        settle_pipeline(task.as_ref(), pipeline, data);
        task.with_status(TaskStatus::Completed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::task::Intercom;

    #[tokio::test]
    async fn completes_without_side_effects() {
        let handler = EmptyTaskHandler::default();
        let intercom = Arc::new(Intercom::new("job"));
        let pipeline = Pipeline::new(Arc::clone(&intercom));

        let task = handler.execute(Box::new(EmptyTask::new()), &pipeline).await;

        assert_eq!(task.status(), TaskStatus::Completed);
        assert!(intercom.get_all().is_empty());
        assert!(!pipeline.is_empty());
    }
}
