//! Host notifications the death counter reacts to.

use crate::player::Actor;

/// Event delivered by the host's dispatch thread.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// An entity died and was removed from the world.
    EntityDestroyed { entity: Actor },

    /// Someone ran a registered command.
    CommandInvoked {
        source: Actor,
        command: String,
        args: Vec<String>,
    },
}

impl GameEvent {
    #[inline]
    pub fn death(entity: Actor) -> Self {
        GameEvent::EntityDestroyed { entity }
    }

    pub fn command<I, S>(source: Actor, command: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        GameEvent::CommandInvoked {
            source,
            command: command.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::EntityDestroyed { .. } => "entity_destroyed",
            GameEvent::CommandInvoked { .. } => "command_invoked",
        }
    }
}
