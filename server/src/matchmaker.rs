//! Pairing of waiting connections into matches
//!
//! The matchmaker keeps a FIFO of sessions in arrival order and a registry of
//! running matches, both behind one lock. Sessions are enrolled as soon as
//! they connect, before their name is known, so pairing order follows arrival
//! order rather than handshake speed.
//!
//! Pairing pops the two longest-waiting sessions while holding the lock, then
//! waits for both readiness gates on a separate task with the lock released.
//! A third connection can never be slipped into a pending pair, and a slow
//! name never stalls the accept loop or other pairings.

use crate::dictionary::WordValidator;
use crate::error::SessionError;
use crate::game::{GameRules, Match, MatchId};
use crate::letter_pool::LetterPool;
use crate::session::{PlayerHandle, Session, SessionId};
use log::{debug, info};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Registry entry for a running match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveMatch {
    pub id: MatchId,
    pub players: [String; 2],
}

#[derive(Default)]
struct Lobby {
    waiting: VecDeque<Arc<Session>>,
    active: HashMap<MatchId, ActiveMatch>,
}

pub struct Matchmaker {
    lobby: Mutex<Lobby>,
    dictionary: Arc<dyn WordValidator>,
    rules: GameRules,
    next_match_id: AtomicU64,
}

impl Matchmaker {
    pub fn new(dictionary: Arc<dyn WordValidator>, rules: GameRules) -> Self {
        Self {
            lobby: Mutex::new(Lobby::default()),
            dictionary,
            rules,
            next_match_id: AtomicU64::new(1),
        }
    }

    /// Entry point for a freshly accepted connection: enrolls it in arrival
    /// order, then runs its name handshake on a task of its own. A session
    /// rejected while still queued is withdrawn.
    pub async fn admit(self: &Arc<Self>, session: Arc<Session>) {
        self.enroll(Arc::clone(&session)).await;

        let turns_per_player = self.rules.turns_per_player();
        let matchmaker = Arc::clone(self);
        tokio::spawn(async move {
            if session.handshake(turns_per_player).await.is_err() {
                matchmaker.withdraw(session.id()).await;
            }
        });
    }

    /// Appends a session to the queue and pairs as many as possible.
    pub async fn enroll(self: &Arc<Self>, session: Arc<Session>) {
        let mut lobby = self.lobby.lock().await;
        debug!("Session {} ({}) enrolled", session.id(), session.peer());
        lobby.waiting.push_back(session);
        self.pair_waiting(&mut lobby);
    }

    /// Removes a session that is still queued. Returns false if it had
    /// already been taken for pairing.
    pub async fn withdraw(&self, session_id: SessionId) -> bool {
        let mut lobby = self.lobby.lock().await;
        match lobby.waiting.iter().position(|s| s.id() == session_id) {
            Some(index) => {
                lobby.waiting.remove(index);
                debug!("Session {} withdrawn from queue", session_id);
                true
            }
            None => false,
        }
    }

    /// Drops a finished match from the registry.
    pub async fn retire(&self, match_id: MatchId) -> bool {
        let removed = self.lobby.lock().await.active.remove(&match_id);
        if let Some(entry) = &removed {
            info!(
                "Match {} retired ({} vs {})",
                entry.id, entry.players[0], entry.players[1]
            );
        }
        removed.is_some()
    }

    pub async fn waiting_count(&self) -> usize {
        self.lobby.lock().await.waiting.len()
    }

    pub async fn active_matches(&self) -> Vec<ActiveMatch> {
        let lobby = self.lobby.lock().await;
        let mut matches: Vec<ActiveMatch> = lobby.active.values().cloned().collect();
        matches.sort_by_key(|m| m.id);
        matches
    }

    fn pair_waiting(self: &Arc<Self>, lobby: &mut Lobby) {
        while lobby.waiting.len() >= 2 {
            let (Some(first), Some(second)) = (lobby.waiting.pop_front(), lobby.waiting.pop_front())
            else {
                break;
            };
            debug!("Pairing sessions {} and {}", first.id(), second.id());

            let matchmaker = Arc::clone(self);
            tokio::spawn(async move {
                matchmaker.pair(first, second).await;
            });
        }
    }

    /// Waits for both sessions to settle. If one was rejected or has hung up
    /// in the meantime, the survivor goes back to the front of the queue,
    /// keeping its place.
    async fn pair(self: Arc<Self>, first: Arc<Session>, second: Arc<Session>) {
        let first_ready = first.await_ready().await;
        let second_ready = second.await_ready().await;
        let first_player = usable_player(&first, first_ready).await;
        let second_player = usable_player(&second, second_ready).await;

        match (first_player, second_player) {
            (Some(first_player), Some(second_player)) => {
                self.launch([first, second], [first_player, second_player])
                    .await;
            }
            (Some(_), None) => self.requeue(first).await,
            (None, Some(_)) => self.requeue(second).await,
            (None, None) => {
                debug!(
                    "Sessions {} and {} both dropped from pairing",
                    first.id(),
                    second.id()
                );
            }
        }
    }

    async fn requeue(self: &Arc<Self>, session: Arc<Session>) {
        let mut lobby = self.lobby.lock().await;
        lobby.waiting.push_front(session);
        self.pair_waiting(&mut lobby);
    }

    async fn launch(self: &Arc<Self>, sessions: [Arc<Session>; 2], players: [PlayerHandle; 2]) {
        let id = self.next_match_id.fetch_add(1, Ordering::SeqCst);
        let names = [
            players[0].lock().await.name().to_string(),
            players[1].lock().await.name().to_string(),
        ];

        let game = Match::new(
            id,
            sessions,
            players,
            LetterPool::new(),
            Arc::clone(&self.dictionary),
            self.rules,
        );

        self.lobby
            .lock()
            .await
            .active
            .insert(id, ActiveMatch { id, players: names });

        let matchmaker = Arc::clone(self);
        tokio::spawn(async move {
            let summary = game.run().await;
            matchmaker.retire(summary.id).await;
        });
    }
}

/// The session's player, provided it became ready and its peer is still
/// connected. A peer that hung up while queued is closed here.
async fn usable_player(
    session: &Session,
    readiness: Result<PlayerHandle, SessionError>,
) -> Option<PlayerHandle> {
    let player = match readiness {
        Ok(player) => player,
        Err(e) => {
            debug!("Session {} dropped from pairing: {}", session.id(), e);
            return None;
        }
    };

    if session.has_hung_up().await {
        info!(
            "Session {} ({}) hung up while waiting for an opponent",
            session.id(),
            session.peer()
        );
        session.close().await;
        return None;
    }
    Some(player)
}
