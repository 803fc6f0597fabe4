//! Engine facade: one exclusive lock around the entity store.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::error;

use super::message::{Message, PublishInput};
use super::registry::Registry;
use super::room::Room;
use super::user::User;
use crate::error::EngineError;
use crate::sink::LogSink;

/// The chat engine.
///
/// Constructed once per process and shared by `Arc` with the transport and
/// gateway collaborators. Every mutating operation runs under the exclusive
/// lock; pure lookups take the shared lock. Publish holds the exclusive lock
/// for the entire fan-out, including per-recipient delivery deadlines, so a
/// slow consumer can stall all other mutating operations for up to a second
/// per recipient.
pub struct ChatService {
    state: RwLock<Registry>,
    sink: Arc<dyn LogSink>,
}

impl ChatService {
    /// Build an engine that appends published lines to `sink`.
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            state: RwLock::new(Registry::default()),
            sink,
        }
    }

    /// Seed the store: the Default room (room 0) first, then the System user
    /// (user 0). Must run once before any other operation.
    pub async fn run(&self) {
        self.state.write().await.seed();
    }

    /// Create a user with a fresh bounded mailbox, auto-subscribed to the
    /// Default room. Returns a value copy.
    pub async fn create_user(&self, name: &str) -> User {
        self.state.write().await.create_user(name)
    }

    /// Broadcast to the room's members, commit the message to history and
    /// the durable log, and return it. Delivery drops are logged, never
    /// returned; a failing log sink is reported and does not fail the
    /// publish.
    pub async fn publish(
        &self,
        input: PublishInput,
        user_id: usize,
        system_message: bool,
    ) -> Result<Message, EngineError> {
        let mut state = self.state.write().await;
        let (message, line) = state.publish(input, user_id, system_message).await?;
        if let Err(e) = self.sink.append(&line).await {
            error!(error = %e, "failed to append message to the log sink");
        }
        Ok(message)
    }

    pub async fn subscribe(&self, user_id: usize, room_id: usize) {
        self.state.write().await.subscribe(user_id, room_id).await;
    }

    pub async fn unsubscribe(&self, user_id: usize, room_id: usize) {
        self.state.write().await.unsubscribe(user_id, room_id).await;
    }

    pub async fn switch_room(&self, user_id: usize, room_id: usize) {
        self.state.write().await.switch_room(user_id, room_id).await;
    }

    pub async fn create_room(&self, name: &str, user_id: usize, user_name: &str) {
        self.state
            .write()
            .await
            .create_room(name, user_id, user_name)
            .await;
    }

    /// Report the user's active room via its mailbox.
    pub async fn get_active_room(&self, user_id: usize) {
        self.state.read().await.active_room_info(user_id).await;
    }

    /// Report all rooms via the user's mailbox.
    pub async fn list_rooms(&self, user_id: usize) {
        self.state.read().await.list_rooms_info(user_id).await;
    }

    pub async fn get_user(&self, id: usize) -> Option<User> {
        self.state.read().await.user(id).cloned()
    }

    pub async fn get_room(&self, id: usize) -> Option<Room> {
        self.state.read().await.room(id).cloned()
    }

    /// Full ordered history. The returned messages are copies; mutating them
    /// never touches the store.
    pub async fn get_messages(&self) -> Vec<Message> {
        self.state.read().await.messages().to_vec()
    }

    pub async fn get_users(&self) -> Vec<User> {
        self.state.read().await.users().to_vec()
    }

    pub async fn get_rooms(&self) -> Vec<Room> {
        self.state.read().await.rooms().to_vec()
    }

    /// Soft-delete: mark the user dead so fan-out skips it. The mailbox and
    /// memberships stay in place and the id is never reused.
    ///
    /// Mutates user state, so it takes the exclusive lock.
    pub async fn remove_user(&self, id: usize) {
        self.state.write().await.mark_dead(id);
    }
}
