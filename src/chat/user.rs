//! User and mailbox types.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::{SendTimeoutError, TrySendError};
use tokio_util::sync::CancellationToken;

/// Mailbox capacity per user.
pub const MAILBOX_CAPACITY: usize = 100;

/// How long a push waits for space in a full mailbox before dropping the line.
pub const DELIVER_TIMEOUT: Duration = Duration::from_secs(1);

/// Outcome of a mailbox push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// The line was queued.
    Delivered,
    /// The mailbox stayed full past the delivery deadline; the line was dropped.
    TimedOut,
    /// The receiving side is gone.
    Closed,
}

/// Bounded FIFO of formatted lines awaiting delivery to a user's connection.
///
/// Both halves travel with the `User` value copy: the engine pushes into the
/// sender half, the transport's write loop drains the shared receiver.
#[derive(Debug, Clone)]
pub struct Mailbox {
    tx: mpsc::Sender<String>,
    rx: Arc<Mutex<mpsc::Receiver<String>>>,
}

impl Mailbox {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(MAILBOX_CAPACITY);
        Self {
            tx,
            rx: Arc::new(Mutex::new(rx)),
        }
    }

    /// Push one line under the delivery policy: non-blocking first, then wait
    /// up to [`DELIVER_TIMEOUT`] for space, then drop.
    pub async fn push(&self, line: String) -> PushOutcome {
        match self.tx.try_send(line) {
            Ok(()) => PushOutcome::Delivered,
            Err(TrySendError::Closed(_)) => PushOutcome::Closed,
            Err(TrySendError::Full(line)) => {
                match self.tx.send_timeout(line, DELIVER_TIMEOUT).await {
                    Ok(()) => PushOutcome::Delivered,
                    Err(SendTimeoutError::Timeout(_)) => PushOutcome::TimedOut,
                    Err(SendTimeoutError::Closed(_)) => PushOutcome::Closed,
                }
            }
        }
    }

    /// Wait for the next queued line.
    pub async fn recv(&self) -> Option<String> {
        self.rx.lock().await.recv().await
    }

    /// Take the next queued line without waiting, if there is one.
    pub async fn try_recv(&self) -> Option<String> {
        self.rx.lock().await.try_recv().ok()
    }
}

impl Default for Mailbox {
    fn default() -> Self {
        Self::new()
    }
}

/// A chat user.
///
/// Owned authoritatively by the entity store; lookups hand out value copies.
/// `dead` is a soft-delete flag: ids stay dense and are never reused.
#[derive(Debug, Clone)]
pub struct User {
    pub id: usize,
    pub name: String,
    /// Room that plain (non-command) text from this user is published to.
    pub active_room: usize,
    pub mailbox: Mailbox,
    /// Cancelled when the user quits; tears down the connection write loop.
    pub close: CancellationToken,
    pub dead: bool,
}

impl User {
    pub(crate) fn new(id: usize, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            active_room: 0,
            mailbox: Mailbox::new(),
            close: CancellationToken::new(),
            dead: false,
        }
    }
}
