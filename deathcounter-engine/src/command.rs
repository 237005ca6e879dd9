//! Command registration and dispatch.
//!
//! A command is a name, at most one typed parameter and an executor. The
//! registry parses raw arguments into typed values (resolving player names
//! through the [`Host`]) before the executor runs, so executors only ever
//! see well-formed input.
//!
//! Executors receive the registry's state by shared reference: commands
//! answer questions, they never mutate.

use std::collections::HashMap;

use thiserror::Error;

use deathcounter_core::{Actor, PlayerRef};

use crate::engine::EngineError;
use crate::host::{ChatMessage, Host};

/// User-facing command failures. `Display` is the text shown to the source.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("You must be a player to use this command!")]
    InvalidInvoker,

    #[error("No online player named '{0}'")]
    UnknownPlayer(String),

    #[error("Unknown command '{0}'")]
    UnknownCommand(String),

    #[error("Usage: {0}")]
    Usage(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParameterKind {
    /// An online player, given by display name.
    Player,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Parameter {
    pub key: &'static str,
    pub kind: ParameterKind,
    pub optional: bool,
}

impl Parameter {
    pub fn player(key: &'static str) -> Self {
        Self {
            key,
            kind: ParameterKind::Player,
            optional: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// Parsed invocation handed to an executor.
#[derive(Debug)]
pub struct CommandContext {
    source: Actor,
    players: HashMap<&'static str, PlayerRef>,
}

impl CommandContext {
    pub fn new(source: Actor) -> Self {
        Self {
            source,
            players: HashMap::new(),
        }
    }

    pub fn with_player(mut self, key: &'static str, player: PlayerRef) -> Self {
        self.players.insert(key, player);
        self
    }

    #[inline]
    pub fn source(&self) -> &Actor {
        &self.source
    }

    /// The player bound to `key`, if the argument was given.
    #[inline]
    pub fn one_player(&self, key: &str) -> Option<&PlayerRef> {
        self.players.get(key)
    }
}

pub type Executor<S> = Box<dyn Fn(&S, &CommandContext) -> Result<ChatMessage, CommandError>>;

pub struct CommandDefinition<S> {
    name: String,
    parameter: Option<Parameter>,
    executor: Executor<S>,
}

impl<S> CommandDefinition<S> {
    pub fn new<F>(name: impl Into<String>, executor: F) -> Self
    where
        F: Fn(&S, &CommandContext) -> Result<ChatMessage, CommandError> + 'static,
    {
        Self {
            name: name.into().to_lowercase(),
            parameter: None,
            executor: Box::new(executor),
        }
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameter = Some(parameter);
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// e.g. `/deaths [player]`
    pub fn usage(&self) -> String {
        match self.parameter {
            Some(p) if p.optional => format!("/{} [{}]", self.name, p.key),
            Some(p) => format!("/{} <{}>", self.name, p.key),
            None => format!("/{}", self.name),
        }
    }

    fn parse<H: Host + ?Sized>(
        &self,
        source: Actor,
        args: &[String],
        host: &H,
    ) -> Result<CommandContext, CommandError> {
        let usage = || CommandError::Usage(self.usage());
        let context = CommandContext::new(source);

        match (self.parameter, args) {
            (None, []) => Ok(context),
            (None, _) => Err(usage()),
            (Some(p), []) if p.optional => Ok(context),
            (Some(_), []) => Err(usage()),
            (Some(p), [raw]) => match p.kind {
                ParameterKind::Player => {
                    let player = host
                        .find_player(raw)
                        .ok_or_else(|| CommandError::UnknownPlayer(raw.clone()))?;
                    Ok(context.with_player(p.key, player))
                }
            },
            (Some(_), _) => Err(usage()),
        }
    }
}

pub struct CommandRegistry<S> {
    commands: HashMap<String, CommandDefinition<S>>,
}

impl<S> Default for CommandRegistry<S> {
    fn default() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }
}

impl<S> CommandRegistry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, definition: CommandDefinition<S>) -> Result<(), EngineError> {
        if self.commands.contains_key(definition.name()) {
            return Err(EngineError::DuplicateCommand(definition.name));
        }
        self.commands.insert(definition.name.clone(), definition);
        Ok(())
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(&name.to_lowercase())
    }

    /// Parses `args` for the named command and runs its executor.
    pub fn dispatch<H: Host + ?Sized>(
        &self,
        state: &S,
        source: Actor,
        name: &str,
        args: &[String],
        host: &H,
    ) -> Result<ChatMessage, CommandError> {
        let definition = self
            .commands
            .get(&name.to_lowercase())
            .ok_or_else(|| CommandError::UnknownCommand(name.to_string()))?;
        let context = definition.parse(source, args, host)?;
        (definition.executor)(state, &context)
    }
}
