//! Caller-facing engine errors.
//!
//! The engine has two feedback channels. The REST gateway path surfaces these
//! typed errors, which the gateway maps to HTTP status codes. The line
//! transport path never sees an error value: command feedback is pushed into
//! the requesting user's mailbox as a plain info line.

use thiserror::Error;

/// Errors returned to gateway callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("user {0} not found")]
    UserNotFound(usize),

    #[error("room {0} not found")]
    RoomNotFound(usize),
}
