//! Publish: recipient resolution, formatting and best-effort fan-out.

use chrono::Utc;
use tracing::{debug, warn};

use super::message::{Message, PublishInput};
use super::registry::{Registry, SYSTEM_USER};
use super::user::PushOutcome;
use crate::error::EngineError;

impl Registry {
    /// Broadcast a message to the room's members and commit it to history.
    ///
    /// Fan-out skips the sender, the system user and dead members. Delivery
    /// is best effort and lossy: a recipient whose mailbox stays full past
    /// the delivery deadline loses the message, which is logged and never
    /// surfaced to the publisher. Returns the saved message together with the
    /// formatted line for the durable log.
    pub(crate) async fn publish(
        &mut self,
        input: PublishInput,
        user_id: usize,
        system_message: bool,
    ) -> Result<(Message, String), EngineError> {
        let sender_name = self
            .user(user_id)
            .map(|u| u.name.clone())
            .ok_or(EngineError::UserNotFound(user_id))?;
        let room = self
            .room(input.room)
            .ok_or(EngineError::RoomNotFound(input.room))?;
        let room_name = room.name.clone();
        let member_ids: Vec<usize> = room.members.keys().copied().collect();

        let timestamp = timestamp_now();
        let display_name = if system_message { "System" } else { sender_name.as_str() };
        let line = format_line(&timestamp, &room_name, display_name, &input.text);

        for id in member_ids {
            if id == user_id || id == SYSTEM_USER {
                continue;
            }
            let Some(member) = self.user(id) else {
                continue;
            };
            if member.dead {
                continue;
            }
            match member.mailbox.push(line.clone()).await {
                PushOutcome::Delivered => {}
                PushOutcome::TimedOut => {
                    warn!(user_id = id, room = %room_name, "delivery timed out, message dropped");
                }
                PushOutcome::Closed => {
                    debug!(user_id = id, "mailbox closed, message dropped");
                }
            }
        }

        // A system message is attributed to the system user in history.
        let (saved_user_id, saved_user_name) = if system_message {
            let system_name = self
                .user(SYSTEM_USER)
                .map(|u| u.name.clone())
                .unwrap_or_else(|| "System".to_string());
            (SYSTEM_USER, system_name)
        } else {
            (user_id, sender_name)
        };
        let message = self.save_message(
            saved_user_id,
            input.room,
            saved_user_name,
            room_name,
            input.text,
            timestamp,
        );
        Ok((message, line))
    }
}

/// `YYYYMMDDHHMMSS`: fixed width, lexicographically sortable.
fn timestamp_now() -> String {
    Utc::now().format("%Y%m%d%H%M%S").to_string()
}

fn format_line(timestamp: &str, room_name: &str, display_name: &str, text: &str) -> String {
    format!("{timestamp} Room:{room_name} |{display_name}| {text}\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::User;

    async fn seeded_with(names: &[&str]) -> (Registry, Vec<User>) {
        let mut registry = Registry::default();
        registry.seed();
        let mut users = Vec::new();
        for name in names {
            users.push(registry.create_user(name));
        }
        (registry, users)
    }

    fn input(room: usize, text: &str) -> PublishInput {
        PublishInput {
            room,
            text: text.to_string(),
        }
    }

    #[test]
    fn timestamp_is_fixed_width_digits() {
        let stamp = timestamp_now();
        assert_eq!(stamp.len(), 14);
        assert!(stamp.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn line_format_matches_the_log_contract() {
        let line = format_line("20260806120000", "Default", "alice", "hi");
        assert_eq!(line, "20260806120000 Room:Default |alice| hi\n");
    }

    #[tokio::test]
    async fn publish_reaches_every_other_member() {
        let (mut registry, users) = seeded_with(&["alice", "bob", "carol"]).await;

        let (message, line) = registry.publish(input(0, "hi"), 1, false).await.unwrap();

        assert_eq!(message.id, 0);
        assert_eq!(message.user_id, 1);
        assert_eq!(message.room_id, 0);
        assert_eq!(message.text, "hi");
        assert_eq!(registry.messages().len(), 1);

        // Sender hears nothing; the other members get the formatted line.
        assert_eq!(users[0].mailbox.try_recv().await, None);
        assert_eq!(users[1].mailbox.try_recv().await.as_deref(), Some(line.as_str()));
        assert_eq!(users[2].mailbox.try_recv().await.as_deref(), Some(line.as_str()));
        assert!(line.ends_with(" Room:Default |alice| hi\n"));
    }

    #[tokio::test]
    async fn publish_skips_the_system_user() {
        let (mut registry, _users) = seeded_with(&["alice"]).await;

        registry.publish(input(0, "hi"), 1, false).await.unwrap();

        let system = registry.user(SYSTEM_USER).unwrap();
        assert_eq!(system.mailbox.try_recv().await, None);
    }

    #[tokio::test]
    async fn publish_skips_dead_members() {
        let (mut registry, users) = seeded_with(&["alice", "bob"]).await;
        registry.mark_dead(2);

        registry.publish(input(0, "hi"), 1, false).await.unwrap();

        assert_eq!(users[1].mailbox.try_recv().await, None);
        assert_eq!(registry.messages().len(), 1);
    }

    #[tokio::test]
    async fn publish_scopes_fan_out_to_the_room() {
        let (mut registry, users) = seeded_with(&["alice", "bob"]).await;
        registry.create_room("Tech", 1, "alice").await;
        users[0].mailbox.try_recv().await; // room created

        registry.publish(input(1, "tech talk"), 1, false).await.unwrap();

        // Bob is not a Tech member and hears nothing.
        assert_eq!(users[1].mailbox.try_recv().await, None);
        assert_eq!(registry.messages()[0].room_name, "Tech");
    }

    #[tokio::test]
    async fn system_message_is_attributed_to_the_system_user() {
        let (mut registry, users) = seeded_with(&["alice", "bob"]).await;

        let (message, line) = registry.publish(input(0, "maintenance"), 1, true).await.unwrap();

        assert_eq!(message.user_id, SYSTEM_USER);
        assert_eq!(message.user_name, "System");
        assert!(line.contains("|System| maintenance"));
        let delivered = users[1].mailbox.try_recv().await.unwrap();
        assert!(delivered.contains("|System| maintenance"));
    }

    #[tokio::test]
    async fn publish_to_unknown_room_is_an_error() {
        let (mut registry, _users) = seeded_with(&["alice"]).await;

        let err = registry.publish(input(9, "hi"), 1, false).await.unwrap_err();
        assert_eq!(err, EngineError::RoomNotFound(9));
        assert!(registry.messages().is_empty());
    }

    #[tokio::test]
    async fn publish_from_unknown_user_is_an_error() {
        let (mut registry, _users) = seeded_with(&[]).await;

        let err = registry.publish(input(0, "hi"), 5, false).await.unwrap_err();
        assert_eq!(err, EngineError::UserNotFound(5));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_consumer_loses_the_message_but_publish_succeeds() {
        let (mut registry, users) = seeded_with(&["alice", "bob"]).await;

        // Fill bob's mailbox to capacity so the next delivery must wait.
        for i in 0..crate::chat::MAILBOX_CAPACITY {
            users[1].mailbox.push(format!("{i}\n")).await;
        }

        let (message, _line) = registry.publish(input(0, "hi"), 1, false).await.unwrap();

        // History still advances; the drop is invisible to the publisher.
        assert_eq!(message.id, 0);
        assert_eq!(registry.messages().len(), 1);
    }
}
