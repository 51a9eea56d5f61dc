//! Worker pool: consumes dispatched jobs and runs their sequences.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::error::EngineError;
use crate::job::{Job, JobStatus, RunResult};
use crate::task::{HandlerRepository, Intercom, IntercomEnvelope};

/// Everything a worker needs to run jobs.
#[derive(Clone)]
pub(super) struct WorkerContext {
    pub catalog: Arc<dyn Catalog>,
    pub repository: Arc<HandlerRepository>,
    pub running_jobs: Arc<AtomicUsize>,
    pub errors: mpsc::UnboundedSender<EngineError>,
    pub messages: mpsc::UnboundedSender<IntercomEnvelope>,
}

/// One worker: drain the dispatch queue until it closes.
///
/// Workers do not observe the cancellation token directly. Cancellation
/// closes the queue's producing side; each worker then finishes whatever
/// it already holds and exits when `recv` returns `None`. In-flight
/// sequences always run to completion.
pub(super) async fn run_worker(
    worker_id: usize,
    context: WorkerContext,
    queue: Arc<Mutex<mpsc::Receiver<Job>>>,
) {
    debug!(worker_id, "worker started");
    loop {
        let job = { queue.lock().await.recv().await };
        let Some(job) = job else { break };

        context.running_jobs.fetch_add(1, Ordering::SeqCst);
        run_job(&context, job).await;
        context.running_jobs.fetch_sub(1, Ordering::SeqCst);
    }
    debug!(worker_id, "worker stopped");
}

/// Execute one run of a job and write the outcome back to the catalog.
async fn run_job(context: &WorkerContext, mut job: Job) {
    let started = Utc::now();
    info!(job_id = %job.id(), job_name = %job.name(), "job run starting");

    // Record the open result first so statistics see the run in flight.
    job.history_mut().push(RunResult::started(started));
    if let Err(error) = context.catalog.update(job.clone()) {
        let _ = context.errors.send(error.into());
    }

    let intercom = Arc::new(Intercom::with_forward(
        job.name().to_string(),
        context.messages.clone(),
    ));
    let outcome = job
        .sequence_mut()
        .execute(&context.repository, Arc::clone(&intercom))
        .await;
    let finish = Utc::now();

    let status = if outcome.is_err() || intercom.has_errors() {
        JobStatus::Error
    } else {
        JobStatus::Completed
    };

    let messages = intercom.get_all();
    let executed = job.sequence().executed().to_vec();
    job.sequence_mut().reset_history();

    if let Some(open) = job.history_mut().pop() {
        let finalized = open.finalize(finish, status, messages, executed);
        job.history_mut().push(finalized);
    }

    match outcome {
        Ok(()) => {
            info!(
                job_id = %job.id(),
                job_name = %job.name(),
                ?status,
                runs = job.run_count(),
                "job run finished"
            );
        }
        Err(error) => {
            warn!(job_id = %job.id(), job_name = %job.name(), %error, "job run aborted");
            let _ = context.errors.send(error);
        }
    }

    job.set_status(status);
    if job.max_runs() > 0 && job.run_count() >= job.max_runs() {
        job.disable();
        info!(
            job_id = %job.id(),
            job_name = %job.name(),
            max_runs = job.max_runs(),
            "job reached its run cap, disabling"
        );
    } else {
        job.set_status(JobStatus::Inactive);
    }

    if let Err(error) = context.catalog.update(job) {
        let _ = context.errors.send(error.into());
    }
}
