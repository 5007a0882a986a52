//! Chat Relay Backend Library
//!
//! This library exposes modules for testing and external use.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod app;
pub mod chat;
pub mod config;
pub mod error;
pub mod export;
pub mod llm;
pub mod references;
pub mod session;
/// Application state management
///
/// Handles credentials, conversations and the shared router state.
pub mod state;
pub mod templates;
