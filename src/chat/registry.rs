//! Entity store: stable-indexed collections of users, rooms and messages.

use tracing::info;

use super::message::Message;
use super::room::Room;
use super::user::User;

/// Reserved sender identity for system-originated broadcasts. Never a
/// message recipient.
pub(crate) const SYSTEM_USER: usize = 0;

/// Every user is auto-joined here at creation, so falling back to it is
/// always a valid membership.
pub(crate) const DEFAULT_ROOM: usize = 0;

/// Growable arena keyed by sequential id.
///
/// Entries are never physically removed; users are soft-deleted via the
/// `dead` flag so indices stay stable. Message ids equal their position in
/// the history.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    users: Vec<User>,
    rooms: Vec<Room>,
    messages: Vec<Message>,
}

impl Registry {
    /// Seed the store: the Default room first, then the System user, which is
    /// auto-joined to it like any other user. Both land at id 0.
    pub(crate) fn seed(&mut self) {
        self.create_default_room();
        self.create_user("System");
    }

    fn create_default_room(&mut self) {
        let room = Room::new(self.rooms.len(), "Default");
        self.rooms.push(room);
        info!("Default room created");
    }

    /// Append a new user with a fresh bounded mailbox, auto-subscribed to the
    /// Default room and with the active room set there. Returns a value copy.
    pub(crate) fn create_user(&mut self, name: &str) -> User {
        let id = self.users.len();
        let user = User::new(id, name);
        if let Some(default_room) = self.rooms.get_mut(DEFAULT_ROOM) {
            default_room.members.insert(id, name.to_string());
        }
        self.users.push(user.clone());
        user
    }

    /// Range-checked lookup: an id at or past the collection length is absent.
    pub(crate) fn user(&self, id: usize) -> Option<&User> {
        self.users.get(id)
    }

    pub(crate) fn user_mut(&mut self, id: usize) -> Option<&mut User> {
        self.users.get_mut(id)
    }

    pub(crate) fn room(&self, id: usize) -> Option<&Room> {
        self.rooms.get(id)
    }

    pub(crate) fn room_mut(&mut self, id: usize) -> Option<&mut Room> {
        self.rooms.get_mut(id)
    }

    pub(crate) fn users(&self) -> &[User] {
        &self.users
    }

    pub(crate) fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub(crate) fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub(crate) fn push_room(&mut self, room: Room) {
        self.rooms.push(room);
    }

    /// Soft delete. The mailbox and memberships are left untouched; the
    /// publish path skips dead members.
    pub(crate) fn mark_dead(&mut self, id: usize) {
        if let Some(user) = self.users.get_mut(id) {
            user.dead = true;
        }
    }

    /// Commit a message to history; its id is the next sequential index.
    pub(crate) fn save_message(
        &mut self,
        user_id: usize,
        room_id: usize,
        user_name: String,
        room_name: String,
        text: String,
        timestamp: String,
    ) -> Message {
        let message = Message {
            id: self.messages.len(),
            user_id,
            room_id,
            user_name,
            room_name,
            text,
            timestamp,
        };
        self.messages.push(message.clone());
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_creates_default_room_then_system_user() {
        let mut registry = Registry::default();
        registry.seed();

        assert_eq!(registry.users().len(), 1);
        assert_eq!(registry.users()[0].id, 0);
        assert_eq!(registry.users()[0].name, "System");
        assert_eq!(registry.rooms().len(), 1);
        assert_eq!(registry.rooms()[0].id, 0);
        assert_eq!(registry.rooms()[0].name, "Default");
        // The system user is a member of Default like any other user.
        assert!(registry.rooms()[0].is_member(SYSTEM_USER));
    }

    #[test]
    fn create_user_assigns_dense_ids_in_call_order() {
        let mut registry = Registry::default();
        registry.seed();

        assert_eq!(registry.create_user("a").id, 1);
        assert_eq!(registry.create_user("b").id, 2);
        assert_eq!(registry.create_user("c").id, 3);
    }

    #[test]
    fn create_user_auto_subscribes_to_default_room() {
        let mut registry = Registry::default();
        registry.seed();

        let user = registry.create_user("alice");
        assert_eq!(user.active_room, DEFAULT_ROOM);
        let default_room = registry.room(DEFAULT_ROOM).unwrap();
        assert_eq!(default_room.members.get(&user.id).map(String::as_str), Some("alice"));
    }

    #[test]
    fn lookups_are_range_checked() {
        let mut registry = Registry::default();
        registry.seed();

        assert!(registry.user(0).is_some());
        assert!(registry.user(1).is_none());
        assert!(registry.room(0).is_some());
        assert!(registry.room(7).is_none());
    }

    #[test]
    fn mark_dead_keeps_the_entry_resolvable() {
        let mut registry = Registry::default();
        registry.seed();
        let user = registry.create_user("alice");

        registry.mark_dead(user.id);
        let found = registry.user(user.id).unwrap();
        assert!(found.dead);
        assert_eq!(found.name, "alice");
    }

    #[test]
    fn mark_dead_out_of_range_is_a_no_op() {
        let mut registry = Registry::default();
        registry.seed();
        registry.mark_dead(42);
        assert_eq!(registry.users().len(), 1);
    }

    #[test]
    fn save_message_ids_equal_history_position() {
        let mut registry = Registry::default();
        registry.seed();

        let first = registry.save_message(
            1,
            0,
            "a".into(),
            "Default".into(),
            "hi".into(),
            "20260101000000".into(),
        );
        let second = registry.save_message(
            2,
            0,
            "b".into(),
            "Default".into(),
            "yo".into(),
            "20260101000001".into(),
        );
        assert_eq!(first.id, 0);
        assert_eq!(second.id, 1);
        assert_eq!(registry.messages().len(), 2);
    }
}
