//! # deathcounter-engine
//!
//! Wires the counter store to a game server: host seam, command
//! registration, the two event handlers and the runtime that drains the
//! event bus.

pub mod command;
pub mod engine;
pub mod handlers;
pub mod host;

pub use command::{CommandContext, CommandError, CommandRegistry, CommandDefinition, Parameter};
pub use engine::{DeathCounterRuntime, EngineError};
pub use handlers::{EventHandlers, DEATHS_COMMAND, TARGET_PLAYER_KEY};
pub use host::{ChatColor, ChatMessage, Host};
