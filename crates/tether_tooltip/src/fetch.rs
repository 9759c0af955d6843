//! Deferred content fetching.
//!
//! The controller hands each request to a [`ContentFetcher`] together with a
//! [`FetchResponder`]. The fetcher answers through the responder whenever it
//! likes: inline, later on the same loop, or from another thread. Answers are
//! picked up by [`FloatingPanelController::complete_fetches`].
//!
//! [`FloatingPanelController::complete_fetches`]: crate::FloatingPanelController::complete_fetches

use std::collections::HashMap;

use crossbeam_channel::{Receiver, Sender};

/// Identifies one issued fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    /// Content key being fetched.
    pub key: String,
    /// Controller generation at the time of the request.
    pub generation: u64,
}

/// A fetcher's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// The request being answered.
    pub ticket: FetchTicket,
    /// Content on success, a reason on failure.
    pub result: Result<String, String>,
}

/// Sending half handed to fetchers.
#[derive(Debug, Clone)]
pub struct FetchResponder {
    sender: Sender<FetchResponse>,
}

impl FetchResponder {
    /// Answers with content. Returns false if the controller is gone.
    pub fn succeed(&self, ticket: FetchTicket, content: impl Into<String>) -> bool {
        self.send(FetchResponse {
            ticket,
            result: Ok(content.into()),
        })
    }

    /// Answers with a failure. Returns false if the controller is gone.
    pub fn fail(&self, ticket: FetchTicket, reason: impl Into<String>) -> bool {
        self.send(FetchResponse {
            ticket,
            result: Err(reason.into()),
        })
    }

    /// Sends a prepared response. Returns false if the controller is gone.
    pub fn send(&self, response: FetchResponse) -> bool {
        self.sender.send(response).is_ok()
    }
}

/// Creates a connected responder and receiver.
#[must_use]
pub fn response_channel() -> (FetchResponder, Receiver<FetchResponse>) {
    let (sender, receiver) = crossbeam_channel::unbounded();
    (FetchResponder { sender }, receiver)
}

/// Source of deferred content.
pub trait ContentFetcher {
    /// Starts fetching `ticket.key`. Exactly one answer should eventually be
    /// sent through `responder`.
    fn fetch(&mut self, ticket: FetchTicket, responder: FetchResponder);
}

impl<F> ContentFetcher for F
where
    F: FnMut(FetchTicket, FetchResponder),
{
    fn fetch(&mut self, ticket: FetchTicket, responder: FetchResponder) {
        self(ticket, responder);
    }
}

/// Answers immediately from a fixed table. Unknown keys fail.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    documents: HashMap<String, String>,
}

impl StaticFetcher {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, content: impl Into<String>) -> Self {
        self.documents.insert(key.into(), content.into());
        self
    }
}

impl ContentFetcher for StaticFetcher {
    fn fetch(&mut self, ticket: FetchTicket, responder: FetchResponder) {
        match self.documents.get(&ticket.key) {
            Some(content) => {
                let content = content.clone();
                responder.succeed(ticket, content);
            }
            None => {
                let reason = format!("no document for {:?}", ticket.key);
                responder.fail(ticket, reason);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(key: &str) -> FetchTicket {
        FetchTicket {
            key: key.to_string(),
            generation: 1,
        }
    }

    #[test]
    fn test_static_fetcher_answers_inline() {
        let (responder, receiver) = response_channel();
        let mut fetcher = StaticFetcher::new().with("/a", "Alpha");

        fetcher.fetch(ticket("/a"), responder.clone());
        fetcher.fetch(ticket("/missing"), responder);

        let first = receiver.try_recv().unwrap();
        assert_eq!(first.result, Ok("Alpha".to_string()));

        let second = receiver.try_recv().unwrap();
        assert!(second.result.is_err());
        assert_eq!(second.ticket.key, "/missing");
    }

    #[test]
    fn test_closure_fetcher() {
        let (responder, receiver) = response_channel();
        let mut seen = Vec::new();
        let mut fetcher = |ticket: FetchTicket, responder: FetchResponder| {
            seen.push(ticket.key.clone());
            responder.succeed(ticket, "ok");
        };

        fetcher.fetch(ticket("/x"), responder);
        drop(fetcher);

        assert_eq!(seen, vec!["/x".to_string()]);
        assert_eq!(receiver.len(), 1);
    }

    #[test]
    fn test_responder_reports_dropped_receiver() {
        let (responder, receiver) = response_channel();
        drop(receiver);

        assert!(!responder.succeed(ticket("/x"), "late"));
    }
}
