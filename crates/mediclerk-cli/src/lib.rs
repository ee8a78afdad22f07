//! mediclerk-cli
//!
//! Terminal front-end for the clerking service: configuration and session
//! persistence, interactive form filling, and the command handlers behind
//! the `mediclerk` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod prompt;
pub mod session_store;
pub mod store;
pub mod values;
