//! Scripted replays.
//!
//! A scenario lists the players that are online and a sequence of deaths
//! and command invocations:
//!
//! ```yaml
//! players:
//!   - name: Alex
//!     id: 5a2e2b1a-0000-4000-8000-000000000001
//!   - name: Sam
//! events:
//!   - type: death
//!     player: Alex
//!   - type: entity_death
//!     kind: zombie
//!   - type: command
//!     source: Sam
//!     command: deaths
//!     args: [Alex]
//! ```
//!
//! A command without `source` is run from the console.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use deathcounter_core::events::GameEvent;
use deathcounter_core::{Actor, PlayerId};
use deathcounter_engine::DeathCounterRuntime;

use crate::console::ConsoleHost;
use crate::error::CliError;

#[derive(Debug, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub players: Vec<ScenarioPlayer>,
    pub events: Vec<ScenarioEvent>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScenarioPlayer {
    pub name: String,
    /// Random when omitted.
    #[serde(default)]
    pub id: Option<PlayerId>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioEvent {
    Death {
        player: String,
    },
    EntityDeath {
        kind: String,
    },
    Command {
        #[serde(default)]
        source: Option<String>,
        command: String,
        #[serde(default)]
        args: Vec<String>,
    },
}

impl Scenario {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| CliError::ScenarioRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| CliError::ScenarioParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Brings the scenario's players online on `host`.
    pub fn seat_players<W: Write>(&self, host: &mut ConsoleHost<W>) -> Result<(), CliError> {
        for player in &self.players {
            host.join(&player.name, player.id)?;
        }
        Ok(())
    }

    /// Replays every event through `runtime`, one at a time. Returns the
    /// number of events handled.
    pub fn replay<W: Write>(
        &self,
        runtime: &mut DeathCounterRuntime,
        host: &mut ConsoleHost<W>,
    ) -> anyhow::Result<usize> {
        let mut handled = 0;
        for event in &self.events {
            runtime.publish(event.to_game_event(host)?)?;
            handled += runtime.pump(host);
        }
        Ok(handled)
    }
}

impl ScenarioEvent {
    pub fn to_game_event<W: Write>(&self, host: &ConsoleHost<W>) -> Result<GameEvent, CliError> {
        let event = match self {
            ScenarioEvent::Death { player } => GameEvent::death(host.actor_for(player)?),
            ScenarioEvent::EntityDeath { kind } => GameEvent::death(Actor::entity(kind.clone())),
            ScenarioEvent::Command {
                source,
                command,
                args,
            } => {
                let source = match source {
                    Some(name) => host.actor_for(name)?,
                    None => Actor::Console,
                };
                GameEvent::command(source, command.clone(), args.iter().cloned())
            }
        };
        Ok(event)
    }
}
