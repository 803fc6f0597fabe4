//! TCP listener for the line transport.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use super::connection::Connection;
use crate::chat::ChatService;

/// Accepts client connections and spawns one handler task per socket.
pub struct Gateway {
    listener: TcpListener,
    service: Arc<ChatService>,
}

impl Gateway {
    /// Bind the transport listener.
    pub async fn bind(addr: &str, service: Arc<ChatService>) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!(addr = %listener.local_addr()?, "transport listening");
        Ok(Self { listener, service })
    }

    /// Accept loop. Runs until the process exits.
    pub async fn run(self) -> anyhow::Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let service = Arc::clone(&self.service);
                    tokio::spawn(async move {
                        if let Err(e) = Connection::new(stream, addr, service).run().await {
                            warn!(addr = %addr, error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    warn!(error = %e, "failed to accept connection");
                }
            }
        }
    }
}
