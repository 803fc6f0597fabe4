//! Per-connection read and write loops.
//!
//! The connection runs a short sequential handshake (username prompt), then
//! splits the socket: a spawned write task drains the user's mailbox until
//! the close signal fires, while the read loop parses commands and publishes
//! plain text to the user's active room.

use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedWriteHalf;
use tokio_util::codec::{FramedRead, LinesCodec};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::command::{Command, ParseError};
use crate::chat::{ChatService, Mailbox, PublishInput, User};

const COMMANDS_HELP: &str = "\
***Available commands***
/help - lists all the available commands
/rooms - lists all the available rooms
/createroom - creates new room - Ex: /createroom roomName
/subscribe - subscribes to a room - Ex: /subscribe roomId
/unsubscribe - unsubscribes from a room - Ex: /unsubscribe roomId
/switch - switches to a room - Ex: /switch roomId
/activeroom - displays the active room of a user - Ex: /activeroom
/quit
";

/// A client connection handler.
pub struct Connection {
    stream: TcpStream,
    addr: SocketAddr,
    service: Arc<ChatService>,
}

impl Connection {
    pub fn new(stream: TcpStream, addr: SocketAddr, service: Arc<ChatService>) -> Self {
        Self {
            stream,
            addr,
            service,
        }
    }

    /// Run the connection: username handshake, then concurrent read/write.
    #[instrument(skip(self), fields(addr = %self.addr), name = "connection")]
    pub async fn run(self) -> anyhow::Result<()> {
        info!("client connected");
        let (read_half, mut write_half) = self.stream.into_split();
        let mut lines = FramedRead::new(read_half, LinesCodec::new());

        // Handshake: get a name before anything concurrent is spawned.
        write_half.write_all(b"Enter your username: ").await?;
        let name = match lines.next().await {
            Some(Ok(line)) => line.trim().to_string(),
            _ => {
                info!("client disconnected during handshake");
                return Ok(());
            }
        };

        let user = self.service.create_user(&name).await;
        info!(user_id = user.id, name = %user.name, "user joined");
        write_half.write_all(COMMANDS_HELP.as_bytes()).await?;

        // Write loop: drains the mailbox until the close signal fires.
        let writer = tokio::spawn(write_loop(
            write_half,
            user.mailbox.clone(),
            user.close.clone(),
        ));

        while let Some(result) = lines.next().await {
            let line = match result {
                Ok(line) => line,
                Err(e) => {
                    warn!(user_id = user.id, error = %e, "read error");
                    break;
                }
            };
            let text = line.trim();
            if text.is_empty() {
                continue;
            }
            if text.starts_with('/') {
                if handle_command(&self.service, &user, text).await {
                    break;
                }
            } else {
                // Publish to whatever room is active right now.
                let Some(current) = self.service.get_user(user.id).await else {
                    break;
                };
                let input = PublishInput {
                    room: current.active_room,
                    text: text.to_string(),
                };
                if let Err(e) = self.service.publish(input, user.id, false).await {
                    warn!(user_id = user.id, error = %e, "publish failed");
                }
            }
        }

        // EOF, read error or /quit all tear down the same way: soft-delete
        // the user and stop the write loop.
        self.service.remove_user(user.id).await;
        user.close.cancel();
        let _ = writer.await;
        info!(user_id = user.id, "client disconnected");
        Ok(())
    }
}

/// Dispatch one command line. Returns `true` when the client quits.
async fn handle_command(service: &ChatService, user: &User, line: &str) -> bool {
    match Command::parse(line) {
        Ok(Command::Help) => {
            user.mailbox.push(COMMANDS_HELP.to_string()).await;
        }
        Ok(Command::Rooms) => service.list_rooms(user.id).await,
        Ok(Command::CreateRoom(name)) => {
            service.create_room(&name, user.id, &user.name).await;
        }
        Ok(Command::Subscribe(room_id)) => service.subscribe(user.id, room_id).await,
        Ok(Command::Unsubscribe(room_id)) => {
            service.unsubscribe(user.id, room_id).await;
        }
        Ok(Command::Switch(room_id)) => service.switch_room(user.id, room_id).await,
        Ok(Command::ActiveRoom) => service.get_active_room(user.id).await,
        Ok(Command::Quit) => return true,
        Err(ParseError::MissingOptions) => {
            user.mailbox.push("Options missing!!!\n".to_string()).await;
        }
        Err(ParseError::Unknown) => {
            user.mailbox.push("Unknown Command!!!\n".to_string()).await;
        }
    }
    false
}

async fn write_loop(mut write_half: OwnedWriteHalf, mailbox: Mailbox, close: CancellationToken) {
    loop {
        tokio::select! {
            line = mailbox.recv() => {
                let Some(line) = line else { break };
                if let Err(e) = write_half.write_all(line.as_bytes()).await {
                    debug!(error = %e, "write error, closing write loop");
                    break;
                }
            }
            _ = close.cancelled() => break,
        }
    }
}
