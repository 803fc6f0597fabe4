//! chatterd - an in-process multi-room chat engine with a line-based TCP
//! transport and a REST gateway.
//!
//! The engine ([`chat::ChatService`]) owns users, rooms and the append-only
//! message history, and fans published messages out to subscribed users'
//! bounded mailboxes. The transport ([`network`]) and the gateway ([`http`])
//! are thin collaborators driving a shared `Arc<ChatService>`.

pub mod chat;
pub mod config;
pub mod error;
pub mod http;
pub mod network;
pub mod sink;
