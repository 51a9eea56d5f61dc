//! Engine-level error taxonomy.

use thiserror::Error;

use crate::catalog::CatalogError;

/// Errors raised by the orchestrator, handler repository and workers.
///
/// Cron parse errors ([`crate::cron::CronError`]) and catalog errors
/// ([`CatalogError`]) have their own types; catalog errors are wrapped
/// here when they surface through the orchestrator's error channel.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A task was dispatched whose kind has no registered handler pool.
    /// Fatal to the run that contained it.
    #[error("no handler registered for task kind {kind:?}")]
    UnknownTaskKind { kind: String },

    /// A handler pool was registered twice for the same kind.
    #[error("handler pool for task kind {kind:?} is already registered")]
    AlreadyRegistered { kind: &'static str },

    /// The orchestrator configuration is unusable.
    #[error("invalid orchestrator configuration: {0}")]
    Config(String),

    /// A catalog operation failed inside a promoter or worker.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
