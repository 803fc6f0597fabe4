//! The chat engine: entity store, room-membership state machine and
//! publish/broadcast logic behind a single locked facade.
//!
//! All shared state lives in the registry arena; the membership and publish
//! modules implement the state transitions and the fan-out policy on top of
//! it; [`ChatService`] is the facade that owns the lock and is shared with
//! the transport and gateway collaborators.

mod membership;
mod message;
mod publish;
mod registry;
mod room;
mod service;
mod user;

pub use message::{Message, PublishInput};
pub use room::Room;
pub use service::ChatService;
pub use user::{DELIVER_TIMEOUT, MAILBOX_CAPACITY, Mailbox, PushOutcome, User};
