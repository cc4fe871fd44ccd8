//! Lifecycle hooks fired around every attempt.
//!
//! Observers run synchronously, in registration order, on whatever thread is
//! driving the call. They see the [`CallState`] as it is at that point. A
//! panicking observer is not caught: the panic unwinds through the call.

use crate::state::CallState;
use std::fmt;
use std::sync::Arc;

/// A lifecycle observer.
pub type Observer = Arc<dyn Fn(&CallState) + Send + Sync>;

/// The points in an attempt where observers are notified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallEvent {
    /// The request is built and about to be sent.
    Sending,
    /// A success response arrived; the body is not read yet.
    Received,
    /// An error response arrived and was classified.
    ReceivedError,
    /// The attempt finished, whatever its outcome.
    Completed,
}

/// Ordered observer lists, one per [`CallEvent`].
#[derive(Clone, Default)]
pub struct CallEvents {
    sending: Vec<Observer>,
    received: Vec<Observer>,
    received_error: Vec<Observer>,
    completed: Vec<Observer>,
}

impl CallEvents {
    /// Registers an observer for `event`.
    pub fn subscribe(&mut self, event: CallEvent, observer: Observer) {
        self.list_mut(event).push(observer);
    }

    /// Invokes every observer registered for `event`.
    pub fn emit(&self, event: CallEvent, state: &CallState) {
        for observer in self.list(event) {
            observer(state);
        }
    }

    fn list(&self, event: CallEvent) -> &[Observer] {
        match event {
            CallEvent::Sending => &self.sending,
            CallEvent::Received => &self.received,
            CallEvent::ReceivedError => &self.received_error,
            CallEvent::Completed => &self.completed,
        }
    }

    fn list_mut(&mut self, event: CallEvent) -> &mut Vec<Observer> {
        match event {
            CallEvent::Sending => &mut self.sending,
            CallEvent::Received => &mut self.received,
            CallEvent::ReceivedError => &mut self.received_error,
            CallEvent::Completed => &mut self.completed,
        }
    }
}

impl fmt::Debug for CallEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallEvents")
            .field("sending", &self.sending.len())
            .field("received", &self.received.len())
            .field("received_error", &self.received_error.len())
            .field("completed", &self.completed.len())
            .finish()
    }
}
