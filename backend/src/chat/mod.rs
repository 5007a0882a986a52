//! Chat module
//!
//! Turn model and the orchestrator that relays messages to the model.

pub mod models;
pub mod orchestrator;

pub use models::{Turn, TurnId};
pub use orchestrator::{ChatOrchestrator, ChatReply};
