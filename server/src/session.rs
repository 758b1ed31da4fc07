//! Per-connection sessions and the readiness gate.
//!
//! A session wraps one line-oriented connection. Its first line is the
//! player's name; once that arrives the session publishes the constructed
//! [`Player`] through a watch channel. The player and the "ready" flag are a
//! single [`Readiness`] value, so anyone observing `Ready` also holds the
//! player. A session that never produces a usable name settles on `Rejected`
//! and can never become ready afterwards.

use crate::error::SessionError;
use crate::player::Player;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tokio::sync::{watch, Mutex};
use tokio::time::timeout;

pub type SessionId = u32;

/// Player state shared between a session and the match it plays in.
pub type PlayerHandle = Arc<Mutex<Player>>;

type LineReader = Lines<BufReader<Box<dyn AsyncRead + Send + Unpin>>>;
type LineWriter = Box<dyn AsyncWrite + Send + Unpin>;

pub const INVALID_NAME_MESSAGE: &str = "Invalid name. Connection closing.";

#[derive(Debug, Clone)]
pub enum Readiness {
    Pending,
    Ready(PlayerHandle),
    Rejected,
}

impl Readiness {
    fn is_settled(&self) -> bool {
        !matches!(self, Readiness::Pending)
    }
}

pub struct Session {
    id: SessionId,
    peer: String,
    reader: Mutex<LineReader>,
    writer: Mutex<Option<LineWriter>>,
    readiness: watch::Sender<Readiness>,
    closed: AtomicBool,
}

impl Session {
    /// Wraps any bidirectional byte stream; `peer` is only used in logs.
    pub fn new<S>(id: SessionId, peer: impl Into<String>, stream: S) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (read_half, write_half) = tokio::io::split(stream);
        let read_half: Box<dyn AsyncRead + Send + Unpin> = Box::new(read_half);
        let write_half: LineWriter = Box::new(write_half);
        let (readiness, _) = watch::channel(Readiness::Pending);

        Self {
            id,
            peer: peer.into(),
            reader: Mutex::new(BufReader::new(read_half).lines()),
            writer: Mutex::new(Some(write_half)),
            readiness,
            closed: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Snapshot of the readiness gate.
    pub fn readiness(&self) -> Readiness {
        self.readiness.borrow().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Reads the name line and settles the readiness gate.
    ///
    /// A missing (EOF) or blank name sends a rejection, closes the connection
    /// and settles on `Rejected`. Otherwise the welcome text is sent and the
    /// new player is published, waking every task in [`Session::await_ready`].
    /// `turns_per_player` is only used in the welcome text.
    pub async fn handshake(&self, turns_per_player: u32) -> Result<PlayerHandle, SessionError> {
        let name = self
            .receive_line()
            .await
            .map(|line| line.trim().to_string())
            .filter(|name| !name.is_empty());

        let Some(name) = name else {
            info!("Session {} ({}) rejected: no player name", self.id, self.peer);
            self.readiness.send_replace(Readiness::Rejected);
            if let Err(e) = self.send(INVALID_NAME_MESSAGE).await {
                debug!("Could not deliver rejection to session {}: {}", self.id, e);
            }
            self.close().await;
            return Err(SessionError::Rejected);
        };

        for line in welcome_lines(&name, turns_per_player) {
            if let Err(e) = self.send(&line).await {
                debug!("Could not deliver welcome to session {}: {}", self.id, e);
                break;
            }
        }

        let player = Arc::new(Mutex::new(Player::new(name.as_str())));
        self.readiness
            .send_replace(Readiness::Ready(Arc::clone(&player)));
        info!("Session {} ({}) ready as '{}'", self.id, self.peer, name);

        Ok(player)
    }

    /// Waits until the handshake has settled. Safe to call from any number
    /// of tasks, before or after the player is published.
    pub async fn await_ready(&self) -> Result<PlayerHandle, SessionError> {
        let mut receiver = self.readiness.subscribe();
        let settled = receiver
            .wait_for(Readiness::is_settled)
            .await
            .map_err(|_| SessionError::Closed)?;

        match &*settled {
            Readiness::Ready(player) => Ok(Arc::clone(player)),
            _ => Err(SessionError::Rejected),
        }
    }

    /// Sends one newline-terminated line.
    pub async fn send(&self, message: &str) -> Result<(), SessionError> {
        let mut writer = self.writer.lock().await;
        let writer = writer.as_mut().ok_or(SessionError::Closed)?;
        writer.write_all(format!("{}\n", message).as_bytes()).await?;
        writer.flush().await?;
        Ok(())
    }

    /// Reads the next line. `None` means the peer is gone and must be
    /// treated as a quit, never retried.
    pub async fn receive_line(&self) -> Option<String> {
        if self.is_closed() {
            return None;
        }

        let mut reader = self.reader.lock().await;
        match reader.next_line().await {
            Ok(line) => line,
            Err(e) => {
                warn!("Read error on session {} ({}): {}", self.id, self.peer, e);
                None
            }
        }
    }

    /// True once the peer has closed its side. Pending input is left
    /// buffered for the next [`Session::receive_line`], never consumed.
    pub async fn has_hung_up(&self) -> bool {
        if self.is_closed() {
            return true;
        }

        let mut reader = self.reader.lock().await;
        match timeout(Duration::ZERO, reader.get_mut().fill_buf()).await {
            Ok(Ok(buffered)) => buffered.is_empty(),
            Ok(Err(e)) => {
                debug!("Session {} read side failed: {}", self.id, e);
                true
            }
            // Nothing to read yet: the peer is still there.
            Err(_) => false,
        }
    }

    /// Shuts down the outgoing side; the peer sees end of stream.
    pub async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        let writer = self.writer.lock().await.take();
        if let Some(mut writer) = writer {
            if let Err(e) = writer.shutdown().await {
                debug!("Shutdown of session {} failed: {}", self.id, e);
            }
            debug!("Session {} ({}) closed", self.id, self.peer);
        }
    }
}

/// Lines sent to a player right after their name is accepted.
pub fn welcome_lines(name: &str, turns_per_player: u32) -> [String; 3] {
    [
        format!("Welcome! You have joined the game as: {}.", name),
        format!("Type '{}' at any time to quit the game.", shared::QUIT_SENTINEL),
        format!(
            "You will have {} chances to input words that total more points than your opponent.",
            turns_per_player
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::duplex;
    use tokio_test::io::Builder;

    const TURNS: u32 = 8;

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let mock = Builder::new()
            .read(b"   \n")
            .write(format!("{}\n", INVALID_NAME_MESSAGE).as_bytes())
            .build();
        let session = Session::new(1, "mock", mock);

        let result = session.handshake(TURNS).await;
        assert!(matches!(result, Err(SessionError::Rejected)));
        assert!(matches!(session.readiness(), Readiness::Rejected));
        assert!(session.is_closed());
        assert!(matches!(
            session.await_ready().await,
            Err(SessionError::Rejected)
        ));
        assert!(matches!(
            session.send("late").await,
            Err(SessionError::Closed)
        ));
    }

    #[tokio::test]
    async fn test_name_publishes_player() {
        let mut builder = Builder::new();
        builder.read(b"  alice \r\n");
        for line in welcome_lines("alice", TURNS) {
            builder.write(format!("{}\n", line).as_bytes());
        }
        let session = Session::new(2, "mock", builder.build());

        let player = session.handshake(TURNS).await.unwrap();
        assert_eq!(player.lock().await.name(), "alice");

        let ready = session.await_ready().await.unwrap();
        assert!(Arc::ptr_eq(&player, &ready));
    }

    #[test]
    fn test_welcome_announces_turn_budget() {
        let lines = welcome_lines("carol", 3);
        assert_eq!(lines[0], "Welcome! You have joined the game as: carol.");
        assert_eq!(
            lines[2],
            "You will have 3 chances to input words that total more points than your opponent."
        );
    }

    #[tokio::test]
    async fn test_eof_before_name_is_rejected() {
        let (server_end, client_end) = duplex(1024);
        drop(client_end);
        let session = Session::new(3, "duplex", server_end);

        assert!(matches!(
            session.handshake(TURNS).await,
            Err(SessionError::Rejected)
        ));
        assert!(matches!(session.readiness(), Readiness::Rejected));
    }

    #[tokio::test]
    async fn test_waiters_registered_before_publish_all_wake() {
        let (server_end, mut client_end) = duplex(4096);
        let session = Arc::new(Session::new(4, "duplex", server_end));

        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let session = Arc::clone(&session);
                tokio::spawn(async move { session.await_ready().await })
            })
            .collect();

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(matches!(session.readiness(), Readiness::Pending));

        client_end.write_all(b"bob\n").await.unwrap();
        let player = session.handshake(TURNS).await.unwrap();

        for waiter in waiters {
            let ready = timeout(Duration::from_secs(1), waiter)
                .await
                .unwrap()
                .unwrap()
                .unwrap();
            assert!(Arc::ptr_eq(&player, &ready));
        }
    }

    #[tokio::test]
    async fn test_receive_line_reports_disconnect() {
        let (server_end, mut client_end) = duplex(1024);
        let session = Session::new(5, "duplex", server_end);

        client_end.write_all(b"hello\r\n").await.unwrap();
        drop(client_end);

        assert_eq!(session.receive_line().await.as_deref(), Some("hello"));
        assert_eq!(session.receive_line().await, None);
    }

    #[tokio::test]
    async fn test_hang_up_detected_without_consuming_input() {
        let (server_end, mut client_end) = duplex(1024);
        let session = Session::new(7, "duplex", server_end);
        assert!(!session.has_hung_up().await);

        client_end.write_all(b"pending\n").await.unwrap();
        assert!(!session.has_hung_up().await);

        drop(client_end);
        assert!(!session.has_hung_up().await);
        assert_eq!(session.receive_line().await.as_deref(), Some("pending"));
        assert!(session.has_hung_up().await);
    }

    #[tokio::test]
    async fn test_close_ends_peer_stream() {
        let (server_end, client_end) = duplex(1024);
        let session = Session::new(6, "duplex", server_end);
        let mut lines = BufReader::new(client_end).lines();

        session.send("bye").await.unwrap();
        session.close().await;

        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("bye"));
        assert_eq!(lines.next_line().await.unwrap(), None);
        assert_eq!(session.receive_line().await, None);
    }
}
