//! Chat Command Bot Library
//!
//! A minimal command-dispatch layer on top of an external chat client.
//!
//! This crate provides the core functionality for:
//! - Registering commands by label and aliases
//! - Resolving message text to a command (case-insensitive, first registered wins)
//! - Dispatching prefixed messages to command handlers
//! - Loading the client id, token and prefix from dotted-path configuration

pub mod client;
pub mod commands;
pub mod config;
pub mod dispatcher;
