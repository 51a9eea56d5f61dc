//! The state-machine driver: promotes jobs through their lifecycle,
//! dispatches due runs to a bounded worker pool and drains results.
//!
//! # Architecture
//!
//! ```text
//! Orchestrator::start(cancel)
//!     │
//!     ├─► error drain ◄──────────── error channel ◄── promoters/workers
//!     ├─► message drain ◄────────── intercom-out ◄─── running tasks
//!     │
//!     ├─► promoter: Inactive    → Available
//!     ├─► promoter: Available   → Schedulable
//!     ├─► promoter: Schedulable → Runnable      (cron due check, paced)
//!     ├─► promoter: Runnable    → Pending
//!     ├─► dispatcher: Pending   → Active ──► bounded queue (max_jobs)
//!     │                                           │
//!     └─► workers (max_jobs) ◄────────────────────┘
//!             └─► run sequence, finalize result, write back to catalog
//! ```
//!
//! Cancellation stops every promoter, closes the dispatch queue, lets
//! workers drain what is already queued, and only then reports the
//! orchestrator as stopped.

mod config;
mod promoter;
mod stats;
mod worker;

pub use config::{ErrorCallback, MessageCallback, OrchestratorConfig};
pub use stats::{JobCounts, Stats, TaskTally};

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::catalog::Catalog;
use crate::error::EngineError;
use crate::job::JobStatus;
use crate::task::{HandlerRepository, IntercomEnvelope};

use self::worker::WorkerContext;

/// Cron-driven job engine over a catalog and a handler repository.
pub struct Orchestrator {
    catalog: Arc<dyn Catalog>,
    repository: Arc<HandlerRepository>,
    config: OrchestratorConfig,
    is_started: Arc<AtomicBool>,
    running_jobs: Arc<AtomicUsize>,
}

impl Orchestrator {
    /// The repository must already hold a pool for every task kind the
    /// catalog's jobs use; registration is closed once the orchestrator
    /// takes ownership.
    pub fn new(
        catalog: Arc<dyn Catalog>,
        repository: HandlerRepository,
        config: OrchestratorConfig,
    ) -> Orchestrator {
        Orchestrator {
            catalog,
            repository: Arc::new(repository),
            config,
            is_started: Arc::new(AtomicBool::new(false)),
            running_jobs: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn is_started(&self) -> bool {
        self.is_started.load(Ordering::SeqCst)
    }

    /// Jobs currently executing a sequence.
    pub fn running_jobs(&self) -> usize {
        self.running_jobs.load(Ordering::SeqCst)
    }

    pub fn handlers(&self) -> &Arc<HandlerRepository> {
        &self.repository
    }

    /// Snapshot the catalog and tally job and task counts.
    pub fn statistics(&self) -> Stats {
        Stats::from_jobs(&self.catalog.all())
    }

    /// Launch every long-lived activity. Returns immediately; all
    /// spawned tasks observe `cancel` and wind down when it fires.
    ///
    /// Calling `start` on an already started orchestrator is a no-op.
    pub fn start(&self, cancel: CancellationToken) {
        if self.is_started.swap(true, Ordering::SeqCst) {
            debug!("orchestrator already started");
            return;
        }
        info!(
            max_jobs = self.config.max_jobs(),
            schedule_interval_ms = self.config.schedule_interval().as_millis() as u64,
            "orchestrator starting"
        );

        let (error_tx, error_rx) = mpsc::unbounded_channel::<EngineError>();
        let (message_tx, message_rx) = mpsc::unbounded_channel::<IntercomEnvelope>();
        let (job_tx, job_rx) = mpsc::channel(self.config.max_jobs());

        tokio::spawn(error_drain(error_rx, self.config.on_error()));
        tokio::spawn(message_drain(message_rx, self.config.on_message()));

        let queue = Arc::new(Mutex::new(job_rx));
        let context = WorkerContext {
            catalog: Arc::clone(&self.catalog),
            repository: Arc::clone(&self.repository),
            running_jobs: Arc::clone(&self.running_jobs),
            errors: error_tx.clone(),
            messages: message_tx,
        };
        let mut workers = Vec::with_capacity(self.config.max_jobs());
        for worker_id in 0..self.config.max_jobs() {
            workers.push(tokio::spawn(worker::run_worker(
                worker_id,
                context.clone(),
                Arc::clone(&queue),
            )));
        }

        // Shutdown monitor: once cancellation fires, wait for every
        // worker to finish its in-flight run before reporting stopped.
        let is_started = Arc::clone(&self.is_started);
        let monitor_cancel = cancel.clone();
        tokio::spawn(async move {
            monitor_cancel.cancelled().await;
            for handle in workers {
                let _ = handle.await;
            }
            is_started.store(false, Ordering::SeqCst);
            info!("orchestrator stopped");
        });

        // Promoters start only after the configured delay.
        let catalog = Arc::clone(&self.catalog);
        let start_delay = self.config.start_delay();
        let schedule_interval = self.config.schedule_interval();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    // job_tx drops here, closing the queue for workers.
                    return;
                }
                _ = tokio::time::sleep(start_delay) => {}
            }

            let stages = [
                (JobStatus::Inactive, JobStatus::Available),
                (JobStatus::Available, JobStatus::Schedulable),
                (JobStatus::Runnable, JobStatus::Pending),
            ];
            for (from, to) in stages {
                tokio::spawn(promoter::promote_loop(
                    Arc::clone(&catalog),
                    cancel.clone(),
                    error_tx.clone(),
                    from,
                    to,
                ));
            }
            tokio::spawn(promoter::schedule_loop(
                Arc::clone(&catalog),
                cancel.clone(),
                error_tx.clone(),
                schedule_interval,
            ));
            tokio::spawn(promoter::dispatch_loop(catalog, cancel, error_tx, job_tx));
        });
    }
}

async fn error_drain(
    mut errors: mpsc::UnboundedReceiver<EngineError>,
    on_error: Option<ErrorCallback>,
) {
    while let Some(engine_error) = errors.recv().await {
        error!(error = %engine_error, "engine error");
        if let Some(callback) = &on_error {
            callback(engine_error);
        }
    }
    debug!("error drain stopped");
}

async fn message_drain(
    mut messages: mpsc::UnboundedReceiver<IntercomEnvelope>,
    on_message: Option<MessageCallback>,
) {
    while let Some(envelope) = messages.recv().await {
        debug!(job = %envelope.job, text = %envelope.message.text, "intercom message");
        if let Some(callback) = &on_message {
            callback(envelope);
        }
    }
    debug!("message drain stopped");
}
