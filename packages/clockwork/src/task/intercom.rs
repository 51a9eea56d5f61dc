use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::{IntercomEnvelope, Message, MessageKind};

/// Per-job mailbox for in-band messages produced by running tasks.
///
/// Messages are appended in the order [`Intercom::add`] completes;
/// concurrent adds from multiple handlers interleave but each append is
/// atomic. When constructed with a forward channel, every added message
/// is also sent out as an [`IntercomEnvelope`] tagged with the job name.
pub struct Intercom {
    job_name: String,
    messages: Mutex<Vec<Message>>,
    forward: Option<mpsc::UnboundedSender<IntercomEnvelope>>,
}

impl Intercom {
    pub fn new(job_name: impl Into<String>) -> Intercom {
        Intercom {
            job_name: job_name.into(),
            messages: Mutex::new(Vec::new()),
            forward: None,
        }
    }

    /// Create an intercom that mirrors every message to `forward`.
    pub fn with_forward(
        job_name: impl Into<String>,
        forward: mpsc::UnboundedSender<IntercomEnvelope>,
    ) -> Intercom {
        Intercom {
            job_name: job_name.into(),
            messages: Mutex::new(Vec::new()),
            forward: Some(forward),
        }
    }

    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    pub fn add(&self, message: Message) {
        self.messages.lock().push(message.clone());
        if let Some(forward) = &self.forward {
            // The drain may already be gone during shutdown.
            let _ = forward.send(IntercomEnvelope {
                job: self.job_name.clone(),
                message,
            });
        }
    }

    /// Messages of one kind, in insertion order.
    pub fn get(&self, kind: MessageKind) -> Vec<Message> {
        self.messages
            .lock()
            .iter()
            .filter(|m| m.kind == kind)
            .cloned()
            .collect()
    }

    /// All messages, in insertion order.
    pub fn get_all(&self) -> Vec<Message> {
        self.messages.lock().clone()
    }

    pub fn errors(&self) -> Vec<Message> {
        self.get(MessageKind::Error)
    }

    pub fn has_errors(&self) -> bool {
        self.messages.lock().iter().any(Message::is_error)
    }

    pub fn count_errors(&self) -> usize {
        self.messages.lock().iter().filter(|m| m.is_error()).count()
    }

    /// Clear the buffer. Only valid between runs; never call while a
    /// handler may still add.
    pub fn reset(&self) {
        self.messages.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_keep_insertion_order() {
        let intercom = Intercom::new("job");
        intercom.add(Message::log("one", "print"));
        intercom.add(Message::error("two", "print", "err"));
        intercom.add(Message::log("three", "print"));

        let all = intercom.get_all();
        let texts: Vec<&str> = all.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["one", "two", "three"]);
    }

    #[test]
    fn error_accounting() {
        let intercom = Intercom::new("job");
        assert!(!intercom.has_errors());
        assert_eq!(intercom.count_errors(), 0);

        intercom.add(Message::log("fine", "print"));
        intercom.add(Message::error("broken", "sleep", "nope"));

        assert!(intercom.has_errors());
        assert_eq!(intercom.count_errors(), 1);
        assert_eq!(intercom.errors().len(), 1);
        assert_eq!(intercom.get(MessageKind::Log).len(), 1);
    }

    #[test]
    fn reset_empties_the_buffer() {
        let intercom = Intercom::new("job");
        intercom.add(Message::error("broken", "sleep", "nope"));
        intercom.reset();
        assert!(intercom.get_all().is_empty());
        assert!(!intercom.has_errors());
    }

    #[tokio::test]
    async fn forwarding_tags_messages_with_the_job_name() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let intercom = Intercom::with_forward("nightly-report", tx);
        intercom.add(Message::log("hello", "print"));

        let envelope = rx.recv().await.unwrap();
        assert_eq!(envelope.job, "nightly-report");
        assert_eq!(envelope.message.text, "hello");
    }
}
