//! blockspy-app - Application state and orchestration for BlockSpy
//!
//! This crate implements the TEA (The Elm Architecture) pattern: a single
//! [`AppState`] changed only by [`handler::update`], with every network or
//! disk operation described as an [`UpdateAction`] and run by
//! [`actions::handle_action`] in a background task that reports back through
//! a [`Message`].
//!
//! The single-flight rules live in the state types:
//! - one open details view, tagged by a generation counter
//!   ([`details::DetailsState`])
//! - one console socket ([`console_session::ConsoleSession`])
//! - one server list fetch at a time ([`server_list::ServerListState`])

pub mod actions;
pub mod config;
pub mod console_session;
pub mod details;
pub mod dialogs;
pub mod handler;
pub mod input_key;
pub mod message;
pub mod process;
pub mod server_list;
pub mod signals;
pub mod state;

// Re-export primary types
pub use actions::Services;
pub use handler::{UpdateAction, UpdateResult};
pub use input_key::InputKey;
pub use message::Message;
pub use state::{AppState, View};
