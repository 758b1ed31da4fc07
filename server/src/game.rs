//! The per-match turn engine.
//!
//! A [`Match`] owns a private [`LetterPool`] and the two paired players. Its
//! turn loop is the only code that prompts players or touches the pool, so
//! exactly one player is active at a time and turns alternate 0, 1, 0, 1, ...

use crate::dictionary::WordValidator;
use crate::error::PlayError;
use crate::letter_pool::LetterPool;
use crate::player::Player;
use crate::session::{PlayerHandle, Session};
use log::{debug, info, warn};
use serde::Serialize;
use shared::{
    outcome_message, ClientCommand, EndReason, GameResult, MAX_TURNS, PASS_SENTINEL,
    QUIT_SENTINEL, TURN_PROMPT_PREFIX,
};
use std::sync::Arc;

pub type MatchId = u64;

pub const QUIT_MESSAGE: &str =
    "You or your opponent has elected to quit the game. Closing the connection now.";
pub const OPPONENT_DISCONNECTED_MESSAGE: &str =
    "Your opponent has disconnected. Closing the connection now.";
pub const PASS_MESSAGE: &str = "You have chosen to pass this turn and redraw letters.";
pub const NO_WORD_MESSAGE: &str = "No word entered.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRules {
    /// Total turns across both players before the match ends. Kept even so
    /// both players get the same number of turns; see [`parse_turn_cap`].
    pub max_turns: u32,
    /// When set, a refused word costs the player their turn instead of
    /// re-prompting them.
    pub rejected_word_ends_turn: bool,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            max_turns: MAX_TURNS,
            rejected_word_ends_turn: false,
        }
    }
}

impl GameRules {
    /// Turns each player gets, as announced in the welcome text.
    pub fn turns_per_player(&self) -> u32 {
        self.max_turns / 2
    }
}

/// Command-line parser for the turn cap. Only positive even numbers are
/// accepted, since player 0 always moves first.
pub fn parse_turn_cap(value: &str) -> Result<u32, String> {
    let turns: u32 = value
        .parse()
        .map_err(|e| format!("'{}' is not a turn count: {}", value, e))?;
    if turns == 0 || turns % 2 != 0 {
        return Err(format!(
            "turn cap must be a positive even number, got {}",
            turns
        ));
    }
    Ok(turns)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchState {
    InProgress,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TurnAction {
    Word { word: String, points: u32 },
    Pass,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnRecord {
    pub player: usize,
    pub action: TurnAction,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    pub id: MatchId,
    pub players: [String; 2],
    pub scores: [u32; 2],
    pub turns: Vec<TurnRecord>,
    pub end_reason: EndReason,
}

enum TurnOutcome {
    Completed(TurnAction),
    Quit,
    Disconnected,
}

pub struct Match {
    id: MatchId,
    sessions: [Arc<Session>; 2],
    players: [PlayerHandle; 2],
    pool: LetterPool,
    dictionary: Arc<dyn WordValidator>,
    rules: GameRules,
    active: usize,
    turns: Vec<TurnRecord>,
    state: MatchState,
}

impl Match {
    pub fn new(
        id: MatchId,
        sessions: [Arc<Session>; 2],
        players: [PlayerHandle; 2],
        pool: LetterPool,
        dictionary: Arc<dyn WordValidator>,
        rules: GameRules,
    ) -> Self {
        Self {
            id,
            sessions,
            players,
            pool,
            dictionary,
            rules,
            active: 0,
            turns: Vec::new(),
            state: MatchState::InProgress,
        }
    }

    pub fn id(&self) -> MatchId {
        self.id
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    /// Runs turns until the pool empties, the turn cap is hit, or a player
    /// quits or disconnects. Both connections are closed on return.
    pub async fn run(mut self) -> MatchSummary {
        let names = [
            self.players[0].lock().await.name().to_string(),
            self.players[1].lock().await.name().to_string(),
        ];
        info!("Match {} started: {} vs {}", self.id, names[0], names[1]);

        let end_reason = loop {
            if self.pool.is_empty() {
                break EndReason::PoolExhausted;
            }
            if self.turns.len() as u32 >= self.rules.max_turns {
                break EndReason::TurnLimit;
            }

            match self.play_turn(&names).await {
                TurnOutcome::Completed(action) => {
                    self.turns.push(TurnRecord {
                        player: self.active,
                        action,
                    });
                    self.active = 1 - self.active;
                }
                TurnOutcome::Quit => break EndReason::Quit,
                TurnOutcome::Disconnected => break EndReason::Disconnected,
            }
        };
        self.state = MatchState::Finished;

        let scores = [
            self.players[0].lock().await.score(),
            self.players[1].lock().await.score(),
        ];
        if matches!(end_reason, EndReason::TurnLimit | EndReason::PoolExhausted) {
            for index in 0..2 {
                let result = GameResult::from_scores(scores[index], scores[1 - index]);
                let message = outcome_message(result, scores[index], scores[1 - index]);
                self.notify(index, &message).await;
            }
        }

        for session in &self.sessions {
            session.close().await;
        }

        let summary = MatchSummary {
            id: self.id,
            players: names,
            scores,
            turns: self.turns,
            end_reason,
        };
        match serde_json::to_string(&summary) {
            Ok(json) => info!("Match {} finished ({}): {}", self.id, end_reason, json),
            Err(e) => warn!("Match {} finished ({}); summary unavailable: {}", self.id, end_reason, e),
        }
        summary
    }

    /// One turn for the active player. Refused input re-prompts the same
    /// player unless the rules say a refusal ends the turn.
    async fn play_turn(&self, names: &[String; 2]) -> TurnOutcome {
        let active = self.active;
        let waiting = 1 - active;
        self.notify(
            waiting,
            &format!("Waiting for {} to take their turn.", names[active]),
        )
        .await;

        let mut player = self.players[active].lock().await;
        player.fill_rack(&self.pool);

        loop {
            let prompt = format!(
                "{} Your letters: {}. Enter a word, '{}' to pass and redraw letters, or '{}' to quit:",
                TURN_PROMPT_PREFIX,
                player.rack_display(),
                PASS_SENTINEL,
                QUIT_SENTINEL
            );
            self.notify(active, &prompt).await;

            let Some(line) = self.sessions[active].receive_line().await else {
                info!("Match {}: {} disconnected", self.id, names[active]);
                self.notify(waiting, OPPONENT_DISCONNECTED_MESSAGE).await;
                return TurnOutcome::Disconnected;
            };

            let refusal = match ClientCommand::parse(&line) {
                ClientCommand::Quit => {
                    info!("Match {}: {} quit", self.id, names[active]);
                    self.notify(0, QUIT_MESSAGE).await;
                    self.notify(1, QUIT_MESSAGE).await;
                    return TurnOutcome::Quit;
                }
                ClientCommand::Pass => {
                    player.redraw(&self.pool);
                    self.notify(active, PASS_MESSAGE).await;
                    return TurnOutcome::Completed(TurnAction::Pass);
                }
                ClientCommand::Blank => NO_WORD_MESSAGE.to_string(),
                ClientCommand::Word(word) => match self.validate(&player, &word) {
                    Ok(points) => {
                        // Validated above under the same lock.
                        let played = player.play(&word);
                        debug_assert!(played, "validated word no longer fits the rack");
                        player.add_score(points);
                        debug!("Match {}: {} played '{}' for {}", self.id, names[active], word, points);
                        self.notify(active, &format!("Word accepted! Your score: {}", player.score()))
                            .await;
                        return TurnOutcome::Completed(TurnAction::Word { word, points });
                    }
                    Err(e) => e.to_string(),
                },
            };

            if self.rules.rejected_word_ends_turn {
                self.notify(active, &format!("{} Turn passed.", refusal)).await;
                return TurnOutcome::Completed(TurnAction::Rejected);
            }
            self.notify(active, &format!("{} Try again.", refusal)).await;
        }
    }

    /// Rack check first, so impossible words never reach the dictionary.
    fn validate(&self, player: &Player, word: &str) -> Result<u32, PlayError> {
        if !player.can_form(word) {
            return Err(PlayError::InsufficientLetters);
        }
        if !self.dictionary.is_valid(word) {
            return Err(PlayError::InvalidWord);
        }
        Ok(LetterPool::word_points(word))
    }

    async fn notify(&self, index: usize, message: &str) {
        if let Err(e) = self.sessions[index].send(message).await {
            debug!(
                "Match {}: could not reach session {}: {}",
                self.id,
                self.sessions[index].id(),
                e
            );
        }
    }
}
