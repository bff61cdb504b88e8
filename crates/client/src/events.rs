//! Session lifecycle events.
//!
//! The pipeline never navigates; it only announces. The application shell
//! subscribes here and decides what "go back to the login screen" means for
//! its routing. Broadcast fan-out: every subscriber gets a copy of every
//! event, dead subscribers are pruned on publish.

use std::sync::{Arc, Mutex, mpsc};
use std::time::Duration;

/// A change in session state worth reacting to outside the session layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A login completed and a profile-backed session exists.
    LoggedIn,

    /// The user explicitly ended the session.
    LoggedOut,

    /// The backend rejected the credential; the session was force-ended.
    /// Emitted at most once per session, however many in-flight requests
    /// observed the rejection.
    SessionExpired,
}

/// A subscription to session events.
#[derive(Debug)]
pub struct Subscription {
    receiver: mpsc::Receiver<SessionEvent>,
}

impl Subscription {
    /// Block until the next event is available.
    pub fn recv(&self) -> Result<SessionEvent, mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Receive without blocking.
    pub fn try_recv(&self) -> Result<SessionEvent, mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for an event.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<SessionEvent, mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Broadcast bus for [`SessionEvent`]s.
///
/// Cheap to clone; clones share the subscriber list.
#[derive(Debug, Clone, Default)]
pub struct SessionEventBus {
    subscribers: Arc<Mutex<Vec<mpsc::Sender<SessionEvent>>>>,
}

impl SessionEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fan `event` out to every live subscriber.
    ///
    /// Best-effort: subscribers whose receiving end is gone are dropped
    /// while publishing.
    pub fn publish(&self, event: SessionEvent) {
        match self.subscribers.lock() {
            Ok(mut subs) => subs.retain(|tx| tx.send(event).is_ok()),
            Err(_) => tracing::error!("session event bus poisoned; {event:?} not delivered"),
        }
    }

    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel();

        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }

        Subscription { receiver: rx }
    }
}
