//! Tasks, handlers and the machinery that executes them.
//!
//! A [`Task`] is a value: a kind tag, parameters, a status and a
//! `write_to_pipeline` flag. A [`Handler`] consumes a task plus the run's
//! [`Pipeline`] slot and returns the task with a new status. Handlers are
//! wrapped in a [`HandlerPool`] that caps per-kind concurrency, and pools
//! are looked up by kind through the [`HandlerRepository`].
//!
//! # Architecture
//!
//! ```text
//! Sequence::execute
//!     │
//!     ├─► open Pipeline (single slot, seeded with empty data map)
//!     ├─► for each task in order:
//!     │       HandlerRepository::execute(task, pipeline)
//!     │           └─► HandlerPool::execute (semaphore admission)
//!     │                   └─► Handler::execute(task, pipeline)
//!     └─► record returned tasks in the executed snapshot
//! ```

mod handler;
mod intercom;
mod message;
mod pipeline;
mod repository;
mod sequence;
pub mod stock;

pub use handler::{Handler, HandlerPool};
pub use intercom::Intercom;
pub use message::{IntercomEnvelope, Message, MessageKind};
pub use pipeline::{Pipeline, PipelineData};
pub use repository::HandlerRepository;
pub use sequence::Sequence;

use std::any::Any;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a single task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    Active,
    Completed,
    Error,
    Canceled,
}

/// One unit of work inside a sequence.
///
/// Tasks are value-typed: a handler consumes one and returns a
/// (potentially mutated) replacement. The `kind` string is the stable
/// identifier used for handler lookup and must match the kind exposed by
/// the task's handler.
pub trait Task: fmt::Debug + Send + Sync {
    /// Stable kind tag used for handler lookup.
    fn kind(&self) -> &'static str;

    fn status(&self) -> TaskStatus;

    /// Consume the task and return it with a new status.
    fn with_status(self: Box<Self>, status: TaskStatus) -> Box<dyn Task>;

    /// Whether the handler should return the pipeline value it read so
    /// the next task can see it.
    fn write_to_pipeline(&self) -> bool;

    /// Downcast support so handlers can read concrete parameters.
    fn as_any(&self) -> &dyn Any;

    fn clone_box(&self) -> Box<dyn Task>;
}

impl Clone for Box<dyn Task> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
