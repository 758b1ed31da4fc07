//! # Word Game Client Library
//!
//! Plain line-oriented client for the word game server. It forwards the
//! player's name, prints everything the server says, answers each turn prompt
//! with one line typed by the player, and stops at the final result line.
//!
//! ## Module Organization
//!
//! ### Input Module (`input`)
//! Reads trimmed lines from the terminal (or any buffered source in tests).
//!
//! ### Network Module (`network`)
//! Owns the server connection and the prompt/answer loop. Server lines are
//! classified with the shared protocol helpers, so the client needs no
//! knowledge of the exact message wording beyond the prompt and result
//! markers.

pub mod input;
pub mod network;
