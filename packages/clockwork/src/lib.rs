//! # Clockwork
//!
//! A cron-driven, in-process job-orchestration engine. A catalog of
//! named jobs (each bound to a cron schedule, a run cap and an ordered
//! sequence of typed tasks) is driven through a lifecycle state machine
//! by promoter loops, dispatched to a bounded worker pool, and executed
//! by handler pools that cap per-kind concurrency. Every run produces an
//! immutable [`RunResult`]; in-band messages and errors travel over a
//! per-run [`Intercom`].
//!
//! ## Core concepts
//!
//! - **Catalog**: owning, concurrency-safe store of all jobs; readers
//!   only ever see by-value snapshots.
//! - **Promoter**: a long-lived loop advancing jobs of one status to
//!   the next: Inactive → Available → Schedulable → Runnable → Pending.
//! - **Worker**: pops Pending-turned-Active jobs from a bounded queue
//!   and runs their task sequence to completion.
//! - **Handler pool**: admission-capped executor for one task kind.
//!
//! ## Guarantees
//!
//! - Within one run, tasks execute strictly in sequence order.
//! - A job is dispatched at most once per cycle; the Pending → Active
//!   transition happens under the catalog lock in a single dispatcher.
//! - Cancellation never preempts a running sequence: in-flight runs
//!   finish and are finalized before the engine reports stopped.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use clockwork::task::stock::{SleepTask, SleepTaskHandler};
//! use clockwork::{
//!     HandlerPool, HandlerRepository, Job, MemoryCatalog, Orchestrator,
//!     OrchestratorConfig, Schedule, Sequence,
//! };
//! use tokio_util::sync::CancellationToken;
//!
//! let catalog = Arc::new(MemoryCatalog::new());
//! catalog.add(Job::new(
//!     "nightly-probe",
//!     Schedule::parse("@everysecond")?,
//!     1,
//!     Sequence::new(vec![Box::new(SleepTask::new(10))]),
//! ))?;
//!
//! let mut handlers = HandlerRepository::new();
//! handlers.register(HandlerPool::new(SleepTaskHandler::default()))?;
//!
//! let config = OrchestratorConfig::new(4, 0, 250)?
//!     .with_on_message(|envelope| println!("{}: {}", envelope.job, envelope.message.text));
//! let orchestrator = Orchestrator::new(catalog, handlers, config);
//!
//! let cancel = CancellationToken::new();
//! orchestrator.start(cancel.clone());
//! // ... later
//! cancel.cancel();
//! ```

pub mod catalog;
pub mod cron;
pub mod error;
pub mod job;
pub mod orchestrator;
pub mod task;

pub use catalog::{Catalog, CatalogError, MemoryCatalog};
pub use cron::{CronError, Schedule};
pub use error::EngineError;
pub use job::{Job, JobStatus, RunResult};
pub use orchestrator::{JobCounts, Orchestrator, OrchestratorConfig, Stats, TaskTally};
pub use task::{
    Handler, HandlerPool, HandlerRepository, Intercom, IntercomEnvelope, Message, MessageKind,
    Pipeline, PipelineData, Sequence, Task, TaskStatus,
};
