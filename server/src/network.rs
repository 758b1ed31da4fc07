//! TCP listener feeding accepted connections to the matchmaker

use crate::matchmaker::Matchmaker;
use crate::session::{Session, SessionId};
use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Accept loop for the game server.
pub struct Server {
    listener: TcpListener,
    matchmaker: Arc<Matchmaker>,
    next_session_id: SessionId,
}

impl Server {
    pub async fn bind(addr: &str, matchmaker: Arc<Matchmaker>) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!("Server listening on {}", listener.local_addr()?);

        Ok(Server {
            listener,
            matchmaker,
            next_session_id: 1,
        })
    }

    /// Actual bound address; useful when binding to port 0.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections forever. Each one becomes a session that is
    /// enrolled immediately and handshakes on its own task, so a failing
    /// connection never stops the loop.
    pub async fn run(mut self) -> std::io::Result<()> {
        info!("Server started successfully");

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let session_id = self.next_session_id;
                    self.next_session_id = self.next_session_id.wrapping_add(1);
                    info!("Client {} connected from {}", session_id, addr);

                    let session = Arc::new(Session::new(session_id, addr.to_string(), stream));
                    self.matchmaker.admit(session).await;
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Dictionary;
    use crate::game::GameRules;
    use crate::session::welcome_lines;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpStream;

    #[tokio::test]
    async fn test_bind_reports_ephemeral_port() {
        let matchmaker = Arc::new(Matchmaker::new(
            Arc::new(Dictionary::default()),
            GameRules::default(),
        ));
        let server = Server::bind("127.0.0.1:0", matchmaker).await.unwrap();
        assert_ne!(server.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn test_accepted_connection_is_welcomed() {
        let matchmaker = Arc::new(Matchmaker::new(
            Arc::new(Dictionary::default()),
            GameRules::default(),
        ));
        let server = Server::bind("127.0.0.1:0", Arc::clone(&matchmaker))
            .await
            .unwrap();
        let addr = server.local_addr().unwrap();
        tokio::spawn(server.run());

        let stream = TcpStream::connect(addr).await.unwrap();
        let (reader, mut writer) = stream.into_split();
        writer.write_all(b"zoe\n").await.unwrap();

        let mut lines = BufReader::new(reader).lines();
        let first = lines.next_line().await.unwrap().unwrap();
        assert_eq!(first, welcome_lines("zoe", 8)[0]);
        assert_eq!(matchmaker.waiting_count().await, 1);
    }
}
