use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::Intercom;

/// Freeform key-value payload passed between adjacent tasks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineData {
    pub values: HashMap<String, serde_json::Value>,
}

impl PipelineData {
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.values.get(key)
    }
}

/// Single-slot rendezvous shared across one sequence execution.
///
/// At most one [`PipelineData`] value is in flight. The executing handler
/// takes the value and either puts it back (when the task's
/// `write_to_pipeline` is set) or drops it. A dropped value simply leaves
/// the slot empty for downstream tasks; nothing blocks.
pub struct Pipeline {
    intercom: Arc<Intercom>,
    slot: Mutex<Option<PipelineData>>,
}

impl Pipeline {
    /// Open a pipeline seeded with an empty data map.
    pub fn new(intercom: Arc<Intercom>) -> Pipeline {
        Pipeline {
            intercom,
            slot: Mutex::new(Some(PipelineData::default())),
        }
    }

    pub fn intercom(&self) -> &Arc<Intercom> {
        &self.intercom
    }

    /// Remove the in-flight value, if any.
    pub fn take(&self) -> Option<PipelineData> {
        self.slot.lock().take()
    }

    /// Put a value back in flight, replacing whatever was there.
    pub fn put(&self, data: PipelineData) {
        *self.slot.lock() = Some(data);
    }

    pub fn is_empty(&self) -> bool {
        self.slot.lock().is_none()
    }
}
