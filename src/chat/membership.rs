//! Room membership: subscribe, unsubscribe, switch and the read-side info
//! queries.
//!
//! Every outcome on this path is a human-readable info line pushed onto the
//! requesting user's mailbox. There is no error return for the transport
//! layer to inspect; an unknown room id is feedback, not a failure.

use tracing::debug;

use super::registry::{DEFAULT_ROOM, Registry};
use super::room::Room;
use super::user::PushOutcome;

impl Registry {
    /// Deliver one info line to a user, best effort.
    pub(crate) async fn send_info(&self, user_id: usize, info: String) {
        let Some(user) = self.user(user_id) else {
            debug!(user_id, "info line for unknown user dropped");
            return;
        };
        if user.mailbox.push(info).await != PushOutcome::Delivered {
            debug!(user_id, "info line dropped");
        }
    }

    /// Add the user to a room's member set.
    pub(crate) async fn subscribe(&mut self, user_id: usize, room_id: usize) {
        let Some(user_name) = self.user(user_id).map(|u| u.name.clone()) else {
            return;
        };
        let Some(room) = self.room(room_id) else {
            self.send_info(user_id, format!("Room {room_id} not found!!\n")).await;
            return;
        };
        let room_name = room.name.clone();
        if room.is_member(user_id) {
            self.send_info(user_id, format!("Already subscribed to room {room_name}!!\n"))
                .await;
            return;
        }
        if let Some(room) = self.room_mut(room_id) {
            room.members.insert(user_id, user_name);
        }
        self.send_info(user_id, format!("Subscribed to {room_name}!!\n")).await;
    }

    /// Remove the user from a room's member set. Leaving the active room
    /// falls back to the Default room, which is always a valid membership.
    pub(crate) async fn unsubscribe(&mut self, user_id: usize, room_id: usize) {
        let Some(room) = self.room(room_id) else {
            self.send_info(user_id, format!("Room {room_id} not found!!\n")).await;
            return;
        };
        let room_name = room.name.clone();
        if !room.is_member(user_id) {
            self.send_info(user_id, format!("User is not subscribed to {room_name}!!\n"))
                .await;
            return;
        }
        if let Some(room) = self.room_mut(room_id) {
            room.members.remove(&user_id);
        }
        if let Some(user) = self.user_mut(user_id)
            && user.active_room == room_id
        {
            user.active_room = DEFAULT_ROOM;
        }
        self.send_info(user_id, format!("Unsubscribed {room_name}!!\n")).await;
    }

    /// Make a room the user's active room. Requires prior membership.
    pub(crate) async fn switch_room(&mut self, user_id: usize, room_id: usize) {
        let Some(room) = self.room(room_id) else {
            self.send_info(user_id, format!("Room {room_id} not found!!\n")).await;
            return;
        };
        let room_name = room.name.clone();
        let is_member = room.is_member(user_id);
        let Some(active_room) = self.user(user_id).map(|u| u.active_room) else {
            return;
        };

        if active_room == room_id {
            self.send_info(user_id, format!("Already in room {room_name}!!\n")).await;
        } else if is_member {
            if let Some(user) = self.user_mut(user_id) {
                user.active_room = room_id;
            }
            self.send_info(user_id, format!("Switched to {room_name}!!\n")).await;
        } else {
            self.send_info(user_id, format!("Subscribe to {room_name} before switching!!\n"))
                .await;
        }
    }

    /// Create a room and auto-subscribe the creator. Room names are unique;
    /// a duplicate name creates nothing and only emits feedback.
    pub(crate) async fn create_room(&mut self, name: &str, user_id: usize, user_name: &str) {
        if self.rooms().iter().any(|r| r.name == name) {
            self.send_info(user_id, "Room with similar name already exists!!\n".to_string())
                .await;
            return;
        }
        let mut room = Room::new(self.rooms().len(), name);
        room.members.insert(user_id, user_name.to_string());
        self.push_room(room);
        self.send_info(user_id, format!("Room {name} created!!\n")).await;
    }

    /// Report the user's active room.
    pub(crate) async fn active_room_info(&self, user_id: usize) {
        let Some(active_room) = self.user(user_id).map(|u| u.active_room) else {
            return;
        };
        let Some(room) = self.room(active_room) else {
            return;
        };
        self.send_info(user_id, format!("Active room is {} - {active_room}!!\n", room.name))
            .await;
    }

    /// Report all rooms, one `id-name` line each.
    pub(crate) async fn list_rooms_info(&self, user_id: usize) {
        let mut info = String::from("List of rooms: \n");
        for room in self.rooms() {
            info.push_str(&format!("{}-{}\n", room.id, room.name));
        }
        self.send_info(user_id, info).await;
    }
}
