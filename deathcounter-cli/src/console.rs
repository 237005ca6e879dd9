//! Line-oriented stand-in for a game server.
//!
//! `ConsoleHost` keeps a table of "online" players and prints replies to a
//! writer. `ConsoleSession` turns typed lines into [`GameEvent`]s and drives
//! the runtime with them, one line at a time.

use std::collections::BTreeMap;
use std::io::{BufRead, Write};

use deathcounter_core::events::GameEvent;
use deathcounter_core::{Actor, PlayerId, PlayerRef};
use deathcounter_engine::{ChatMessage, CommandError, DeathCounterRuntime, Host};

use crate::error::CliError;

pub const HELP: &str = "\
join <name> [uuid]        bring a player online
leave <name>              take a player offline
die <name>                the player dies
kill <kind>               a non-player entity dies
as <name> <command> ...   run a command as a player
<command> ...             run a command from the console
players                   list online players
quit                      exit";

pub struct ConsoleHost<W> {
    // Keyed by lower-cased name; lookups are case-insensitive.
    online: BTreeMap<String, PlayerRef>,
    out: W,
}

impl<W: Write> ConsoleHost<W> {
    pub fn new(out: W) -> Self {
        Self {
            online: BTreeMap::new(),
            out,
        }
    }

    pub fn join(&mut self, name: &str, id: Option<PlayerId>) -> Result<&PlayerRef, CliError> {
        let key = name.to_lowercase();
        if self.online.contains_key(&key) {
            return Err(CliError::AlreadyOnline(name.to_string()));
        }
        let player = PlayerRef::new(id.unwrap_or_else(PlayerId::new_random), name);
        Ok(self.online.entry(key).or_insert(player))
    }

    pub fn leave(&mut self, name: &str) -> Option<PlayerRef> {
        self.online.remove(&name.to_lowercase())
    }

    pub fn online(&self, name: &str) -> Option<&PlayerRef> {
        self.online.get(&name.to_lowercase())
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerRef> {
        self.online.values()
    }

    pub fn actor_for(&self, name: &str) -> Result<Actor, CliError> {
        self.online(name)
            .cloned()
            .map(Actor::Player)
            .ok_or_else(|| CliError::UnknownPlayer(name.to_string()))
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Host for ConsoleHost<W> {
    fn find_player(&self, name: &str) -> Option<PlayerRef> {
        self.online(name).cloned()
    }

    fn send_message(&mut self, recipient: &Actor, message: ChatMessage) {
        let _ = writeln!(self.out, "[to {}] {}", recipient, message);
    }

    fn command_failed(&mut self, source: &Actor, error: &CommandError) {
        let _ = writeln!(self.out, "[to {}] error: {}", source, error);
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConsoleInput {
    Join { name: String, id: Option<PlayerId> },
    Leave { name: String },
    Die { name: String },
    Kill { kind: String },
    As { name: String, command: String, args: Vec<String> },
    Command { command: String, args: Vec<String> },
    Players,
    Help,
    Quit,
    Empty,
}

pub fn parse_line(line: &str) -> Result<ConsoleInput, CliError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(ConsoleInput::Empty);
    };
    let mut rest: Vec<String> = words.map(str::to_string).collect();

    let input = match head {
        "join" => match rest.as_slice() {
            [name] => ConsoleInput::Join {
                name: name.clone(),
                id: None,
            },
            [name, raw] => ConsoleInput::Join {
                name: name.clone(),
                id: Some(
                    raw.parse()
                        .map_err(|_| CliError::InvalidPlayerId(raw.clone()))?,
                ),
            },
            _ => return Err(CliError::MissingArgument("join", "<name> [uuid]")),
        },
        "leave" => ConsoleInput::Leave {
            name: single(rest, "leave", "<name>")?,
        },
        "die" => ConsoleInput::Die {
            name: single(rest, "die", "<name>")?,
        },
        "kill" => ConsoleInput::Kill {
            kind: single(rest, "kill", "<kind>")?,
        },
        "as" => {
            if rest.len() < 2 {
                return Err(CliError::MissingArgument("as", "<name> <command> [args...]"));
            }
            let name = rest.remove(0);
            let command = rest.remove(0);
            ConsoleInput::As {
                name,
                command,
                args: rest,
            }
        }
        "players" => ConsoleInput::Players,
        "help" => ConsoleInput::Help,
        "quit" | "exit" => ConsoleInput::Quit,
        command if command.chars().all(|c| c.is_ascii_alphanumeric()) => {
            ConsoleInput::Command {
                command: command.to_string(),
                args: rest,
            }
        }
        other => return Err(CliError::Syntax(other.to_string())),
    };
    Ok(input)
}

fn single(mut rest: Vec<String>, command: &'static str, usage: &'static str) -> Result<String, CliError> {
    match rest.len() {
        1 => Ok(rest.remove(0)),
        _ => Err(CliError::MissingArgument(command, usage)),
    }
}

pub struct ConsoleSession<W> {
    runtime: DeathCounterRuntime,
    host: ConsoleHost<W>,
}

impl<W: Write> ConsoleSession<W> {
    pub fn new(runtime: DeathCounterRuntime, host: ConsoleHost<W>) -> Self {
        Self { runtime, host }
    }

    /// Applies one parsed line. Returns `false` once the operator quits.
    pub fn apply(&mut self, input: ConsoleInput) -> anyhow::Result<bool> {
        let event = match input {
            ConsoleInput::Empty => return Ok(true),
            ConsoleInput::Quit => return Ok(false),
            ConsoleInput::Help => {
                writeln!(self.host.out(), "{}", HELP)?;
                return Ok(true);
            }
            ConsoleInput::Players => {
                let names: Vec<String> = self
                    .host
                    .players()
                    .map(|p| format!("{} ({})", p.name, p.id))
                    .collect();
                writeln!(self.host.out(), "online: {}", names.join(", "))?;
                return Ok(true);
            }
            ConsoleInput::Join { name, id } => {
                let player = self.host.join(&name, id)?.clone();
                writeln!(self.host.out(), "{} joined as {}", player.name, player.id)?;
                return Ok(true);
            }
            ConsoleInput::Leave { name } => {
                self.host
                    .leave(&name)
                    .ok_or_else(|| CliError::UnknownPlayer(name))?;
                return Ok(true);
            }
            ConsoleInput::Die { name } => GameEvent::death(self.host.actor_for(&name)?),
            ConsoleInput::Kill { kind } => GameEvent::death(Actor::entity(kind)),
            ConsoleInput::As {
                name,
                command,
                args,
            } => GameEvent::command(self.host.actor_for(&name)?, command, args),
            ConsoleInput::Command { command, args } => {
                GameEvent::command(Actor::Console, command, args)
            }
        };

        self.runtime.publish(event)?;
        self.runtime.pump(&mut self.host);
        Ok(true)
    }

    /// Reads lines until EOF or `quit`. Bad lines are reported and skipped.
    pub fn run<R: BufRead>(&mut self, input: R) -> anyhow::Result<()> {
        for line in input.lines() {
            let line = line?;
            let keep_going = match parse_line(&line) {
                Ok(parsed) => match self.apply(parsed) {
                    Ok(keep_going) => keep_going,
                    Err(e) => {
                        writeln!(self.host.out(), "error: {}", e)?;
                        true
                    }
                },
                Err(e) => {
                    writeln!(self.host.out(), "error: {}", e)?;
                    true
                }
            };
            if !keep_going {
                break;
            }
        }
        Ok(())
    }

    pub fn into_host(self) -> ConsoleHost<W> {
        self.host
    }
}
