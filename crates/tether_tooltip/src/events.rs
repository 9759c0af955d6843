//! Lifecycle notifications.
//!
//! Every subscriber gets its own channel. Events are delivered synchronously,
//! in subscription order; subscribers whose receiver was dropped are pruned
//! on the next emit.

use crossbeam_channel::{Receiver, Sender};

use tether_dom::NodeId;

/// Lifecycle events emitted by a controller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PanelEvent {
    /// The panel element was created.
    Init,
    /// The panel became visible.
    Show {
        /// Anchor the panel was opened for, if any.
        anchor: Option<NodeId>,
    },
    /// The panel was hidden (or a pending reveal was cancelled).
    Hide,
    /// Fetched content was stored in the cache.
    Load {
        /// Content key.
        key: String,
    },
    /// The controller was disposed.
    Dispose,
}

/// Fan-out of [`PanelEvent`]s to subscribers.
#[derive(Debug, Default)]
pub struct EventEmitter {
    subscribers: Vec<Sender<PanelEvent>>,
}

impl EventEmitter {
    /// Creates an emitter with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a subscriber and returns its receiving end.
    pub fn subscribe(&mut self) -> Receiver<PanelEvent> {
        let (sender, receiver) = crossbeam_channel::unbounded();
        self.subscribers.push(sender);
        receiver
    }

    /// Delivers an event to every live subscriber.
    pub fn emit(&mut self, event: &PanelEvent) {
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }

    /// Number of live subscribers as of the last emit.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
