//! Chess rules engine: mailbox board, legal move generation, make/undo,
//! and checkmate/stalemate detection.
//!
//! The [`engine`] module is the whole of the rules core. [`config`] holds
//! the environment-driven settings for the interactive driver binary.

pub mod config;
pub mod engine;
