use std::sync::mpsc::{Receiver, Sender, channel};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepoEvent {
    /// The active repository changed (switch, import, removal fallback).
    /// Subscribers re-pull their derived data.
    ActiveChanged,
}

/// Explicit broadcast channel for cross-panel notification. Subscribers own
/// a plain mpsc receiver and drain it from their frame update; senders that
/// hung up are dropped on the next emit.
#[derive(Default)]
pub struct RepoEvents {
    senders: Vec<Sender<RepoEvent>>,
}

impl RepoEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Receiver<RepoEvent> {
        let (tx, rx) = channel();
        self.senders.push(tx);
        rx
    }

    pub fn emit(&mut self, event: RepoEvent) {
        self.senders.retain(|sender| sender.send(event).is_ok());
    }
}
