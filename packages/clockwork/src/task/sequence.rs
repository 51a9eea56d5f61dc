use std::sync::Arc;

use crate::error::EngineError;

use super::{HandlerRepository, Intercom, Pipeline, Task, TaskStatus};

/// Ordered task list with per-run bookkeeping.
///
/// The task list is fixed once the owning job is created; each run
/// populates a distinct `executed` snapshot (the returned tasks, in
/// order) which [`Sequence::reset_history`] clears between runs.
#[derive(Debug, Clone, Default)]
pub struct Sequence {
    tasks: Vec<Box<dyn Task>>,
    executed: Vec<Box<dyn Task>>,
    active: bool,
    active_idx: usize,
}

impl Sequence {
    pub fn new(tasks: Vec<Box<dyn Task>>) -> Sequence {
        Sequence {
            tasks,
            executed: Vec::new(),
            active: false,
            active_idx: 0,
        }
    }

    /// Append a task. Only meaningful before the first run.
    pub fn push_task(&mut self, task: Box<dyn Task>) {
        self.tasks.push(task);
    }

    pub fn push_tasks(&mut self, tasks: impl IntoIterator<Item = Box<dyn Task>>) {
        self.tasks.extend(tasks);
    }

    pub fn tasks(&self) -> &[Box<dyn Task>] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Snapshot of tasks finished during the current (or last) run.
    pub fn executed(&self) -> &[Box<dyn Task>] {
        &self.executed
    }

    pub fn executed_len(&self) -> usize {
        self.executed.len()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn active_index(&self) -> usize {
        self.active_idx
    }

    /// The task currently in flight, while a run is active.
    pub fn active_task(&self) -> Option<&dyn Task> {
        if self.active {
            self.tasks.get(self.active_idx).map(Box::as_ref)
        } else {
            None
        }
    }

    /// Clear the executed snapshot between runs.
    pub fn reset_history(&mut self) {
        self.executed.clear();
    }

    /// Run every task in order through the handler repository.
    ///
    /// Opens a fresh single-slot pipeline seeded with an empty data map
    /// and the given intercom. Per-task `Error` statuses do not abort
    /// the run; the job-level status aggregates them via the intercom.
    /// An unregistered task kind does abort: the offending and remaining
    /// tasks are recorded as `Canceled` and the error is returned.
    pub async fn execute(
        &mut self,
        repository: &HandlerRepository,
        intercom: Arc<Intercom>,
    ) -> Result<(), EngineError> {
        let pipeline = Pipeline::new(intercom);

        self.active = true;
        self.executed.clear();

        for index in 0..self.tasks.len() {
            self.active_idx = index;
            let task = self.tasks[index]
                .clone_box()
                .with_status(TaskStatus::Active);
            match repository.execute(task, &pipeline).await {
                Ok(finished) => self.executed.push(finished),
                Err(error) => {
                    for remaining in &self.tasks[index..] {
                        self.executed
                            .push(remaining.clone_box().with_status(TaskStatus::Canceled));
                    }
                    self.active = false;
                    return Err(error);
                }
            }
        }

        self.active = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::stock::{
        EmptyTask, EmptyTaskHandler, PrintTask, PrintTaskHandler, SleepTask, SleepTaskHandler,
    };
    use crate::task::HandlerPool;

    fn stock_repository() -> HandlerRepository {
        let mut repository = HandlerRepository::new();
        repository
            .register_many([
                HandlerPool::new(EmptyTaskHandler::default()),
                HandlerPool::new(SleepTaskHandler::default()),
                HandlerPool::new(PrintTaskHandler::default()),
            ])
            .unwrap();
        repository
    }

    fn three_task_sequence() -> Sequence {
        Sequence::new(vec![
            Box::new(EmptyTask::new()),
            Box::new(SleepTask::new(1)),
            Box::new(PrintTask::new("done")),
        ])
    }

    #[tokio::test]
    async fn executed_snapshot_matches_sequence_length_and_order() {
        let repository = stock_repository();
        let mut sequence = three_task_sequence();

        sequence
            .execute(&repository, Arc::new(Intercom::new("job")))
            .await
            .unwrap();

        assert_eq!(sequence.executed_len(), sequence.len());
        let kinds: Vec<&str> = sequence.executed().iter().map(|t| t.kind()).collect();
        assert_eq!(kinds, ["empty", "sleep", "print"]);
        assert!(sequence
            .executed()
            .iter()
            .all(|t| t.status() == TaskStatus::Completed));
        assert!(!sequence.is_active());
    }

    #[tokio::test]
    async fn reset_history_clears_and_rerun_repopulates() {
        let repository = stock_repository();
        let mut sequence = three_task_sequence();

        sequence
            .execute(&repository, Arc::new(Intercom::new("job")))
            .await
            .unwrap();
        sequence.reset_history();
        assert_eq!(sequence.executed_len(), 0);

        sequence
            .execute(&repository, Arc::new(Intercom::new("job")))
            .await
            .unwrap();
        assert_eq!(sequence.executed_len(), 3);
    }

    #[tokio::test]
    async fn unknown_kind_aborts_and_cancels_the_tail() {
        // Repository without the sleep handler.
        let mut repository = HandlerRepository::new();
        repository
            .register(HandlerPool::new(EmptyTaskHandler::default()))
            .unwrap();

        let mut sequence = Sequence::new(vec![
            Box::new(EmptyTask::new()),
            Box::new(SleepTask::new(1)),
            Box::new(EmptyTask::new()),
        ]);

        let err = sequence
            .execute(&repository, Arc::new(Intercom::new("job")))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownTaskKind { kind } if kind == "sleep"));

        let statuses: Vec<TaskStatus> =
            sequence.executed().iter().map(|t| t.status()).collect();
        assert_eq!(
            statuses,
            [
                TaskStatus::Completed,
                TaskStatus::Canceled,
                TaskStatus::Canceled
            ]
        );
    }

    #[tokio::test]
    async fn empty_sequence_completes_immediately() {
        let repository = stock_repository();
        let mut sequence = Sequence::new(Vec::new());
        sequence
            .execute(&repository, Arc::new(Intercom::new("job")))
            .await
            .unwrap();
        assert_eq!(sequence.executed_len(), 0);
    }
}
