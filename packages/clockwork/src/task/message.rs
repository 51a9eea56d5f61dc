use serde::{Deserialize, Serialize};

/// Classification of an intercom message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Log,
    Error,
}

/// One in-band message emitted by a task during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Human-readable text.
    pub text: String,
    /// Kind tag of the originating task.
    pub task: String,
    pub kind: MessageKind,
    /// Opaque payload; error messages carry the rendered error here.
    pub payload: Option<serde_json::Value>,
}

impl Message {
    pub fn log(text: impl Into<String>, task: impl Into<String>) -> Message {
        Message {
            text: text.into(),
            task: task.into(),
            kind: MessageKind::Log,
            payload: None,
        }
    }

    pub fn log_with(
        text: impl Into<String>,
        task: impl Into<String>,
        payload: serde_json::Value,
    ) -> Message {
        Message {
            text: text.into(),
            task: task.into(),
            kind: MessageKind::Log,
            payload: Some(payload),
        }
    }

    pub fn error(
        text: impl Into<String>,
        task: impl Into<String>,
        error: impl std::fmt::Display,
    ) -> Message {
        Message {
            text: text.into(),
            task: task.into(),
            kind: MessageKind::Error,
            payload: Some(serde_json::Value::String(error.to_string())),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == MessageKind::Error
    }
}

/// A message leaving a job's intercom, tagged with the job name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntercomEnvelope {
    pub job: String,
    pub message: Message,
}
