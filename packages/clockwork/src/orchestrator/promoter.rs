//! Promoter stages: long-lived loops that each advance jobs of one
//! status to the next.
//!
//! Stages run concurrently and communicate only through the catalog;
//! each status is owned by exactly one stage, so a job is never touched
//! by two stages at once. Stages without a pacing sleep yield to the
//! scheduler between passes and otherwise throttle only via catalog
//! contention and downstream channel capacity.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::catalog::Catalog;
use crate::error::EngineError;
use crate::job::{Job, JobStatus};

/// Promote every enabled job currently in `from` to `to`.
fn promote_pass(
    catalog: &Arc<dyn Catalog>,
    errors: &mpsc::UnboundedSender<EngineError>,
    from: JobStatus,
    to: JobStatus,
) {
    for mut job in catalog.jobs_with_status(from) {
        if !job.enabled() {
            continue;
        }
        trace!(job_id = %job.id(), ?from, ?to, "promoting job");
        job.set_status(to);
        if let Err(error) = catalog.update(job) {
            let _ = errors.send(error.into());
        }
    }
}

/// Unpaced stage: Inactive → Available, Available → Schedulable and
/// Runnable → Pending all share this loop.
pub(super) async fn promote_loop(
    catalog: Arc<dyn Catalog>,
    cancel: CancellationToken,
    errors: mpsc::UnboundedSender<EngineError>,
    from: JobStatus,
    to: JobStatus,
) {
    while !cancel.is_cancelled() {
        promote_pass(&catalog, &errors, from, to);
        tokio::task::yield_now().await;
    }
    debug!(?from, ?to, "promoter stopped");
}

/// Paced stage: Schedulable → Runnable for jobs whose schedule is due,
/// then sleep `interval`.
pub(super) async fn schedule_loop(
    catalog: Arc<dyn Catalog>,
    cancel: CancellationToken,
    errors: mpsc::UnboundedSender<EngineError>,
    interval: Duration,
) {
    loop {
        if cancel.is_cancelled() {
            break;
        }
        let now = Utc::now();
        for mut job in catalog.schedulable_jobs() {
            if !job.enabled() || !job.schedule().is_due(now) {
                continue;
            }
            trace!(job_id = %job.id(), "schedule due, promoting to runnable");
            job.set_status(JobStatus::Runnable);
            if let Err(error) = catalog.update(job) {
                let _ = errors.send(error.into());
            }
        }
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }
    debug!("schedule promoter stopped");
}

/// Final stage: Pending → Active, then hand the job to the worker pool.
///
/// Owns the producing side of the bounded dispatch channel. On
/// cancellation the sender is dropped, which closes the channel and lets
/// workers drain whatever is already queued before exiting.
pub(super) async fn dispatch_loop(
    catalog: Arc<dyn Catalog>,
    cancel: CancellationToken,
    errors: mpsc::UnboundedSender<EngineError>,
    queue: mpsc::Sender<Job>,
) {
    'outer: while !cancel.is_cancelled() {
        for mut job in catalog.pending_jobs() {
            if cancel.is_cancelled() {
                break 'outer;
            }
            if !job.enabled() {
                continue;
            }
            job.set_status(JobStatus::Active);
            if let Err(error) = catalog.update(job.clone()) {
                let _ = errors.send(error.into());
                continue;
            }
            trace!(job_id = %job.id(), job_name = %job.name(), "dispatching job");
            if queue.send(job).await.is_err() {
                // Workers are gone; nothing left to dispatch to.
                break 'outer;
            }
        }
        tokio::task::yield_now().await;
    }
    debug!("dispatcher stopped");
}
