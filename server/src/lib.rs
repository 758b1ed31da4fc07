//! # Word Game Server Library
//!
//! Server side of a two-player, turn-based word game played over plain
//! newline-terminated text connections. Players send their name, get paired
//! with an opponent, and take turns spelling words from a rack of seven
//! lettered tiles drawn from a shared bag. Words are checked against the
//! rack and a dictionary and scored by flat per-letter points.
//!
//! ## Architecture Design
//!
//! ### Task-per-connection
//! Every accepted connection is wrapped in a [`session::Session`] and gets
//! its own task for the name handshake. The session publishes its player
//! through a readiness gate that any number of tasks can wait on.
//!
//! ### Arrival-order pairing
//! The [`matchmaker::Matchmaker`] enrolls sessions as they connect, pairs
//! the two longest-waiting ones, and waits for both to become ready on a
//! separate task before launching a match. Rejected sessions, and ready ones
//! whose peer hung up while queued, never reach a match; a surviving partner
//! keeps its place at the head of the queue.
//!
//! ### Task-per-match
//! Each [`game::Match`] runs its turn loop on its own task with a private
//! [`letter_pool::LetterPool`]. Only the active player is ever prompted, so
//! the pool is never raced during normal play.
//!
//! ## Module Organization
//!
//! - `letter_pool`: tile bag, frequency and point tables
//! - `player`: rack and score state, rack composition checks
//! - `session`: connection wrapper and readiness gate
//! - `matchmaker`: waiting queue and active match registry
//! - `game`: turn engine, rules, match summaries
//! - `dictionary`: word list loading and lookups
//! - `network`: TCP accept loop
//! - `error`: session and play errors
//!
//! ## Limitations
//!
//! There is no read timeout. A peer that stays connected but never answers
//! stalls its match (and, before its name arrives, its pending pairing)
//! indefinitely. Disconnects and the quit sentinel are the only ways a match
//! ends early.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::dictionary::Dictionary;
//! use server::game::GameRules;
//! use server::matchmaker::Matchmaker;
//! use server::network::Server;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dictionary = Arc::new(Dictionary::load("words_alpha.txt"));
//!     let matchmaker = Arc::new(Matchmaker::new(dictionary, GameRules::default()));
//!
//!     let server = Server::bind("0.0.0.0:12345", matchmaker).await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod dictionary;
pub mod error;
pub mod game;
pub mod letter_pool;
pub mod matchmaker;
pub mod network;
pub mod player;
pub mod session;
