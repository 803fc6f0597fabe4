//! Line-oriented TCP transport.
//!
//! One task per connection reads commands and plain text; a second task per
//! connection drains the user's mailbox back to the socket until the close
//! signal fires.

mod command;
mod connection;
mod gateway;

pub use command::{Command, ParseError};
pub use connection::Connection;
pub use gateway::Gateway;
