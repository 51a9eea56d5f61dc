//! Cron expression parsing and matching.
//!
//! A [`Schedule`] is parsed once from a 5, 6 or 7 field cron expression
//! (or one of the `@`-macros) and answers a single question: is this
//! instant due? Parsing is eager, with every field decoded into a value
//! form up front, so [`Schedule::is_due`] is side-effect-free and cheap.
//!
//! Field layout after standardization:
//!
//! ```text
//! second minute hour day-of-month month day-of-week [year]
//! ```
//!
//! A 5-field expression gets a leading `0` second. A 6-field expression
//! is either second-first (default) or, when its last field looks like a
//! year (`\d{4,}`), minute-first with a trailing year.

mod element;
mod position;
mod schedule;

pub use element::{Element, ElementSpec};
pub use position::Position;
pub use schedule::Schedule;

use thiserror::Error;

/// Errors produced while parsing a cron expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CronError {
    /// The expression does not conform to the cron grammar.
    #[error("invalid cron expression: {0}")]
    InvalidExpression(String),

    /// Values in a multi or range element are not ascending.
    #[error("invalid order of values in {0} field")]
    InvalidOrder(&'static str),
}
