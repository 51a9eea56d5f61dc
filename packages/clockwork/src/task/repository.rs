use std::collections::HashMap;

use crate::error::EngineError;

use super::{HandlerPool, Pipeline, Task};

/// Registry mapping task kinds to handler pools.
///
/// Registration happens once at startup; afterwards the repository is
/// shared immutably (behind an `Arc`) by every worker. Dispatching a
/// task whose kind has no pool is an [`EngineError::UnknownTaskKind`]:
/// fatal to the run, never silently skipped.
#[derive(Default)]
pub struct HandlerRepository {
    pools: HashMap<&'static str, HandlerPool>,
}

impl HandlerRepository {
    pub fn new() -> HandlerRepository {
        HandlerRepository {
            pools: HashMap::new(),
        }
    }

    /// Register a pool; rejects duplicate kinds.
    pub fn register(&mut self, pool: HandlerPool) -> Result<(), EngineError> {
        let kind = pool.kind();
        if self.pools.contains_key(kind) {
            return Err(EngineError::AlreadyRegistered { kind });
        }
        self.pools.insert(kind, pool);
        Ok(())
    }

    pub fn register_many(
        &mut self,
        pools: impl IntoIterator<Item = HandlerPool>,
    ) -> Result<(), EngineError> {
        for pool in pools {
            self.register(pool)?;
        }
        Ok(())
    }

    /// Dispatch a task to the pool registered for its kind.
    pub async fn execute(
        &self,
        task: Box<dyn Task>,
        pipeline: &Pipeline,
    ) -> Result<Box<dyn Task>, EngineError> {
        let pool = self
            .pools
            .get(task.kind())
            .ok_or_else(|| EngineError::UnknownTaskKind {
                kind: task.kind().to_string(),
            })?;
        Ok(pool.execute(task, pipeline).await)
    }

    pub fn is_registered(&self, kind: &str) -> bool {
        self.pools.contains_key(kind)
    }

    pub fn handler_kinds(&self) -> Vec<&'static str> {
        self.pools.keys().copied().collect()
    }

    pub fn pool(&self, kind: &str) -> Option<&HandlerPool> {
        self.pools.get(kind)
    }
}
