//! Room state.

use std::collections::HashMap;

/// A chat room.
///
/// `members` maps user id to the display-name snapshot taken when the user
/// joined; renaming a user never rewrites past memberships.
#[derive(Debug, Clone, Default)]
pub struct Room {
    pub id: usize,
    pub name: String,
    pub members: HashMap<usize, String>,
}

impl Room {
    pub(crate) fn new(id: usize, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            members: HashMap::new(),
        }
    }

    /// Whether the user is currently subscribed to this room.
    pub fn is_member(&self, user_id: usize) -> bool {
        self.members.contains_key(&user_id)
    }
}
