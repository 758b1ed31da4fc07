use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_PORT: u16 = 12345;
pub const RACK_SIZE: usize = 7;
pub const MAX_TURNS: u32 = 16;

/// Input line that ends the match for both players.
pub const QUIT_SENTINEL: &str = "0";
/// Input line that returns the whole rack to the pool and redraws.
pub const PASS_SENTINEL: &str = "1";

/// Every turn prompt starts with this text; clients answer it with one line.
/// Only the line start is checked, since player names show up mid-line.
pub const TURN_PROMPT_PREFIX: &str = "It's your turn!";

const WIN_PREFIX: &str = "You win!";
const LOSS_PREFIX: &str = "You lost.";
const TIE_PREFIX: &str = "You tied!";

/// A line sent by a player once the match has started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    Quit,
    Pass,
    /// Candidate word, trimmed and lowercased.
    Word(String),
    Blank,
}

impl ClientCommand {
    pub fn parse(line: &str) -> Self {
        let normalized = line.trim().to_lowercase();
        match normalized.as_str() {
            "" => ClientCommand::Blank,
            QUIT_SENTINEL => ClientCommand::Quit,
            PASS_SENTINEL => ClientCommand::Pass,
            _ => ClientCommand::Word(normalized),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Win,
    Loss,
    Tie,
}

impl GameResult {
    pub fn from_scores(own: u32, opponent: u32) -> Self {
        match own.cmp(&opponent) {
            std::cmp::Ordering::Greater => GameResult::Win,
            std::cmp::Ordering::Less => GameResult::Loss,
            std::cmp::Ordering::Equal => GameResult::Tie,
        }
    }
}

/// Why a match stopped.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    TurnLimit,
    PoolExhausted,
    Quit,
    Disconnected,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            EndReason::TurnLimit => "turn limit reached",
            EndReason::PoolExhausted => "letter pool exhausted",
            EndReason::Quit => "player quit",
            EndReason::Disconnected => "player disconnected",
        };
        f.write_str(text)
    }
}

/// Final line a player receives, naming their own result and both scores.
pub fn outcome_message(result: GameResult, own: u32, opponent: u32) -> String {
    match result {
        GameResult::Win => format!(
            "{} You scored {} points, and your opponent only scored {} points.",
            WIN_PREFIX, own, opponent
        ),
        GameResult::Loss => format!(
            "{} Your opponent scored {} points, and you scored {} points.",
            LOSS_PREFIX, opponent, own
        ),
        GameResult::Tie => format!(
            "{} You and your opponent both scored {} points.",
            TIE_PREFIX, own
        ),
    }
}

/// How a client should react to a line from the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerLine {
    Prompt,
    Outcome(GameResult),
    Notice,
}

pub fn classify_line(line: &str) -> ServerLine {
    if line.starts_with(TURN_PROMPT_PREFIX) {
        ServerLine::Prompt
    } else if line.starts_with(WIN_PREFIX) {
        ServerLine::Outcome(GameResult::Win)
    } else if line.starts_with(LOSS_PREFIX) {
        ServerLine::Outcome(GameResult::Loss)
    } else if line.starts_with(TIE_PREFIX) {
        ServerLine::Outcome(GameResult::Tie)
    } else {
        ServerLine::Notice
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sentinels() {
        assert_eq!(ClientCommand::parse("0"), ClientCommand::Quit);
        assert_eq!(ClientCommand::parse(" 1 \r"), ClientCommand::Pass);
        assert_eq!(ClientCommand::parse(""), ClientCommand::Blank);
        assert_eq!(ClientCommand::parse("   "), ClientCommand::Blank);
    }

    #[test]
    fn test_parse_word_is_case_folded() {
        assert_eq!(
            ClientCommand::parse("  CaT "),
            ClientCommand::Word("cat".to_string())
        );
        assert_eq!(
            ClientCommand::parse("10"),
            ClientCommand::Word("10".to_string())
        );
    }

    #[test]
    fn test_result_from_scores() {
        assert_eq!(GameResult::from_scores(10, 3), GameResult::Win);
        assert_eq!(GameResult::from_scores(3, 10), GameResult::Loss);
        assert_eq!(GameResult::from_scores(0, 0), GameResult::Tie);
    }

    #[test]
    fn test_outcome_messages_mention_both_scores() {
        let win = outcome_message(GameResult::Win, 16, 8);
        assert!(win.contains("16") && win.contains("8"));

        let loss = outcome_message(GameResult::Loss, 8, 16);
        assert_eq!(
            loss,
            "You lost. Your opponent scored 16 points, and you scored 8 points."
        );
    }

    #[test]
    fn test_classify_round_trips_outcomes() {
        for result in [GameResult::Win, GameResult::Loss, GameResult::Tie] {
            let line = outcome_message(result, 4, 4);
            assert_eq!(classify_line(&line), ServerLine::Outcome(result));
        }
    }

    #[test]
    fn test_classify_prompt_and_notice() {
        let prompt = format!("{} Your letters: [A]. Enter a word:", TURN_PROMPT_PREFIX);
        assert_eq!(classify_line(&prompt), ServerLine::Prompt);
        assert_eq!(classify_line("Word accepted!"), ServerLine::Notice);
    }

    #[test]
    fn test_names_cannot_pose_as_prompts() {
        for name in ["Enter a word", "It's your turn!", "You win!"] {
            let waiting = format!("Waiting for {} to take their turn.", name);
            assert_eq!(classify_line(&waiting), ServerLine::Notice);
            let welcome = format!("Welcome! You have joined the game as: {}.", name);
            assert_eq!(classify_line(&welcome), ServerLine::Notice);
        }
    }

    #[test]
    fn test_end_reason_serializes() {
        let json = serde_json::to_string(&EndReason::PoolExhausted).unwrap();
        assert_eq!(json, "\"PoolExhausted\"");
        assert_eq!(EndReason::Quit.to_string(), "player quit");
    }
}
