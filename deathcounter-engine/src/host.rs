//! The game server side of the seam.
//!
//! A host adapter implements [`Host`] so the runtime can look up online
//! players and answer command sources without knowing anything about the
//! server's own API.

use std::fmt;

use deathcounter_core::{Actor, PlayerRef};

use crate::command::CommandError;

/// Text colour of a chat reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatColor {
    Yellow,
    Red,
}

/// A chat-style reply addressed to a single command source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub text: String,
    pub color: ChatColor,
}

impl ChatMessage {
    pub fn new(text: impl Into<String>, color: ChatColor) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }
}

impl fmt::Display for ChatMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

pub trait Host {
    /// Resolves an online player by display name.
    fn find_player(&self, name: &str) -> Option<PlayerRef>;

    /// Delivers a reply to the command source only, never broadcast.
    fn send_message(&mut self, recipient: &Actor, message: ChatMessage);

    /// Reports a failed command back to whoever ran it.
    fn command_failed(&mut self, source: &Actor, error: &CommandError);
}
