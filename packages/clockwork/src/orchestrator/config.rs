use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::EngineError;
use crate::task::IntercomEnvelope;

/// Callback invoked for every engine error drained from the error channel.
pub type ErrorCallback = Arc<dyn Fn(EngineError) + Send + Sync>;

/// Callback invoked for every intercom message leaving a running job.
pub type MessageCallback = Arc<dyn Fn(IntercomEnvelope) + Send + Sync>;

/// Orchestrator tuning knobs.
///
/// `max_jobs` sets both the worker count and the dispatch-channel
/// capacity. `start_delay` is observed before any promoter stage starts;
/// `schedule_interval` paces the due-check stage.
#[derive(Clone)]
pub struct OrchestratorConfig {
    max_jobs: usize,
    start_delay: Duration,
    schedule_interval: Duration,
    on_error: Option<ErrorCallback>,
    on_message: Option<MessageCallback>,
}

impl OrchestratorConfig {
    /// Validate and build a configuration. Durations are milliseconds.
    pub fn new(
        max_jobs: usize,
        start_delay_ms: u64,
        schedule_interval_ms: u64,
    ) -> Result<OrchestratorConfig, EngineError> {
        if max_jobs == 0 {
            return Err(EngineError::Config("max_jobs must be at least 1".into()));
        }
        if schedule_interval_ms == 0 {
            return Err(EngineError::Config(
                "schedule_interval_ms must be positive".into(),
            ));
        }
        Ok(OrchestratorConfig {
            max_jobs,
            start_delay: Duration::from_millis(start_delay_ms),
            schedule_interval: Duration::from_millis(schedule_interval_ms),
            on_error: None,
            on_message: None,
        })
    }

    pub fn with_on_error(
        mut self,
        on_error: impl Fn(EngineError) + Send + Sync + 'static,
    ) -> OrchestratorConfig {
        self.on_error = Some(Arc::new(on_error));
        self
    }

    pub fn with_on_message(
        mut self,
        on_message: impl Fn(IntercomEnvelope) + Send + Sync + 'static,
    ) -> OrchestratorConfig {
        self.on_message = Some(Arc::new(on_message));
        self
    }

    pub fn max_jobs(&self) -> usize {
        self.max_jobs
    }

    pub fn start_delay(&self) -> Duration {
        self.start_delay
    }

    pub fn schedule_interval(&self) -> Duration {
        self.schedule_interval
    }

    pub(crate) fn on_error(&self) -> Option<ErrorCallback> {
        self.on_error.clone()
    }

    pub(crate) fn on_message(&self) -> Option<MessageCallback> {
        self.on_message.clone()
    }
}

impl fmt::Debug for OrchestratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrchestratorConfig")
            .field("max_jobs", &self.max_jobs)
            .field("start_delay", &self.start_delay)
            .field("schedule_interval", &self.schedule_interval)
            .field("on_error", &self.on_error.is_some())
            .field("on_message", &self.on_message.is_some())
            .finish()
    }
}
