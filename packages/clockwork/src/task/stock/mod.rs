//! Stock task kinds and their handlers.
//!
//! These are reference implementations of the [`Handler`](super::Handler)
//! contract: a timed sleep, a console print, a timestamp logger, an
//! intercom message emitter and a no-op. Each handler ships with a
//! generous default admission cap that callers narrow per deployment.

mod empty;
mod intercom_message;
mod print;
mod sleep;
mod time_log;

pub use empty::{EmptyTask, EmptyTaskHandler, EMPTY_TASK_KIND};
pub use intercom_message::{
    IntercomMessageTask, IntercomMessageTaskHandler, INTERCOM_MESSAGE_TASK_KIND,
};
pub use print::{PrintTask, PrintTaskHandler, PRINT_TASK_KIND};
pub use sleep::{SleepTask, SleepTaskHandler, SLEEP_TASK_KIND};
pub use time_log::{TimeLogTask, TimeLogTaskHandler, TIME_LOG_TASK_KIND};

use super::{Pipeline, PipelineData, Task};

/// Default admission cap for stock handler pools.
pub const DEFAULT_MAX_CONCURRENT: usize = 10_000;

/// Apply the pipeline discipline: return the taken value when the task
/// writes to the pipeline, drop it otherwise.
fn settle_pipeline(task: &dyn Task, pipeline: &Pipeline, data: Option<PipelineData>) {
    if task.write_to_pipeline() {
        if let Some(data) = data {
            pipeline.put(data);
        }
    }
}
