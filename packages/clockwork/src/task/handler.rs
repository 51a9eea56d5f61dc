use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use super::{Pipeline, Task, TaskStatus};

/// Executor for one task kind.
///
/// Handlers are stateless: every run-specific input arrives through the
/// task value and the pipeline. A handler signals failure by adding an
/// error message to the run's intercom and returning the task with
/// [`TaskStatus::Error`]; it never panics the run.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Kind of tasks this handler accepts. Must equal the kind of every
    /// task dispatched to it.
    fn kind(&self) -> &'static str;

    /// Upper bound on concurrently executing invocations.
    fn max_concurrent(&self) -> usize;

    /// Run one task to completion and return it with its new status.
    async fn execute(&self, task: Box<dyn Task>, pipeline: &Pipeline) -> Box<dyn Task>;
}

/// A handler plus an admission cap.
///
/// Callers are admitted up to `max_concurrent` at a time; excess callers
/// wait on the semaphore rather than spinning.
pub struct HandlerPool {
    handler: Box<dyn Handler>,
    permits: Arc<Semaphore>,
    max_concurrent: usize,
}

impl HandlerPool {
    pub fn new(handler: impl Handler + 'static) -> HandlerPool {
        let max_concurrent = handler.max_concurrent().max(1);
        HandlerPool {
            handler: Box::new(handler),
            permits: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
        }
    }

    pub fn kind(&self) -> &'static str {
        self.handler.kind()
    }

    /// Invocations currently holding a permit.
    pub fn active(&self) -> usize {
        self.max_concurrent - self.permits.available_permits()
    }

    /// Remaining admission slots.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Wait for admission, then run the handler.
    pub async fn execute(&self, task: Box<dyn Task>, pipeline: &Pipeline) -> Box<dyn Task> {
        let _permit = match self.permits.acquire().await {
            Ok(permit) => permit,
            // The semaphore is never closed while the pool is alive;
            // treat a closed semaphore as a canceled execution.
            Err(_) => return task.with_status(TaskStatus::Canceled),
        };
        self.handler.execute(task, pipeline).await
    }
}
