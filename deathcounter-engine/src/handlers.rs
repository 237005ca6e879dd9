//! Death and query handlers.
//!
//! `EventHandlers` owns the [`CounterStore`] for the lifetime of the runtime
//! and is the only thing that touches the data file after startup. Both
//! handlers are independent and keep no state between calls besides the
//! store itself.

use std::path::{Path, PathBuf};

use tracing::info;

use deathcounter_core::{Actor, CounterStore, DeathCount, LoadOutcome};
use deathcounter_telemetry::MetricsRecorder;

use crate::command::{CommandContext, CommandError, CommandDefinition, Parameter};
use crate::host::{ChatColor, ChatMessage};

/// Name of the query command.
pub const DEATHS_COMMAND: &str = "deaths";

/// Key of the optional target argument of [`DEATHS_COMMAND`].
pub const TARGET_PLAYER_KEY: &str = "player";

pub struct EventHandlers {
    store: CounterStore,
    data_file: PathBuf,
    metrics: Option<MetricsRecorder>,
}

impl EventHandlers {
    /// Empty handlers persisting to `data_file`. Nothing is read until
    /// [`load`](Self::load).
    pub fn new(data_file: impl Into<PathBuf>) -> Self {
        Self {
            store: CounterStore::new(),
            data_file: data_file.into(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: MetricsRecorder) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Reads the persisted counts. Failures are logged by the store.
    pub fn load(&mut self) -> LoadOutcome {
        let outcome = self.store.load(&self.data_file);
        if let Some(metrics) = &self.metrics {
            metrics.tracked_players.set(self.store.len() as i64);
        }
        outcome
    }

    #[inline]
    pub fn store(&self) -> &CounterStore {
        &self.store
    }

    #[inline]
    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// Counts a death if `entity` is a player and persists immediately.
    ///
    /// Returns the player's new tally, or `None` for non-player entities
    /// (which cause neither a mutation nor a save).
    pub fn on_entity_destroyed(&mut self, entity: &Actor) -> Option<DeathCount> {
        let player = entity.as_player()?;

        let count = self.store.increment(player.id);
        info!("{} has now died {} times.", player.name, count);
        if let Some(metrics) = &self.metrics {
            metrics.record_death(self.store.len());
        }

        if !self.store.save(&self.data_file) {
            if let Some(metrics) = &self.metrics {
                metrics.record_save_failure();
            }
        }
        Some(count)
    }

    /// Executor of `/deaths [player]`. Read-only.
    pub fn on_deaths_command(&self, ctx: &CommandContext) -> Result<ChatMessage, CommandError> {
        let invoker = ctx
            .source()
            .as_player()
            .ok_or(CommandError::InvalidInvoker)?;
        let target = ctx.one_player(TARGET_PLAYER_KEY).unwrap_or(invoker);

        if let Some(metrics) = &self.metrics {
            metrics.record_query();
        }

        Ok(match self.store.get(&target.id) {
            None => ChatMessage::new(
                format!("{} has not died yet.", target.name),
                ChatColor::Yellow,
            ),
            Some(deaths) => ChatMessage::new(
                format!("{} has died {} times.", target.name, deaths),
                ChatColor::Red,
            ),
        })
    }

    /// Registration record for the `deaths` command.
    pub fn deaths_command() -> CommandDefinition<EventHandlers> {
        CommandDefinition::new(DEATHS_COMMAND, EventHandlers::on_deaths_command)
            .with_parameter(Parameter::player(TARGET_PLAYER_KEY).optional())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deathcounter_core::{PlayerId, PlayerRef};
    use tracing_test::traced_test;

    struct ScratchDir(PathBuf);

    impl ScratchDir {
        fn new() -> Self {
            let dir = std::env::temp_dir().join(format!("deathcounter-{}", PlayerId::new_random()));
            std::fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }

        fn path(&self, name: &str) -> PathBuf {
            self.0.join(name)
        }
    }

    impl Drop for ScratchDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    fn player(name: &str) -> PlayerRef {
        PlayerRef::new(PlayerId::new_random(), name)
    }

    #[traced_test]
    #[test]
    fn player_death_increments_and_saves() {
        let dir = ScratchDir::new();
        let path = dir.path("deaths.json");
        let mut handlers = EventHandlers::new(&path);
        let alex = player("Alex");

        assert_eq!(handlers.on_entity_destroyed(&Actor::Player(alex.clone())), Some(1));
        assert_eq!(handlers.on_entity_destroyed(&Actor::Player(alex.clone())), Some(2));
        assert!(logs_contain("Alex has now died 2 times."));

        let mut reloaded = CounterStore::new();
        reloaded.load(&path);
        assert_eq!(reloaded.get(&alex.id), Some(2));
    }

    #[test]
    fn non_player_death_is_ignored() {
        let dir = ScratchDir::new();
        let path = dir.path("deaths.json");
        let mut handlers = EventHandlers::new(&path);

        assert_eq!(handlers.on_entity_destroyed(&Actor::entity("zombie")), None);
        assert!(handlers.store().is_empty());
        assert!(!path.exists(), "no save for non-player deaths");
    }

    #[test]
    fn console_cannot_query() {
        let dir = ScratchDir::new();
        let handlers = EventHandlers::new(dir.path("deaths.json"));

        let ctx = CommandContext::new(Actor::Console);
        assert_eq!(
            handlers.on_deaths_command(&ctx),
            Err(CommandError::InvalidInvoker)
        );
        assert!(handlers.store().is_empty());
    }

    #[test]
    fn query_defaults_to_invoker() {
        let dir = ScratchDir::new();
        let mut handlers = EventHandlers::new(dir.path("deaths.json"));
        let x = player("X");
        handlers.on_entity_destroyed(&Actor::Player(x.clone()));
        handlers.on_entity_destroyed(&Actor::Player(x.clone()));

        let reply = handlers
            .on_deaths_command(&CommandContext::new(Actor::Player(x)))
            .unwrap();
        assert_eq!(reply, ChatMessage::new("X has died 2 times.", ChatColor::Red));
    }

    #[test]
    fn query_named_target_without_deaths() {
        let dir = ScratchDir::new();
        let path = dir.path("deaths.json");
        let handlers = EventHandlers::new(&path);

        let ctx = CommandContext::new(Actor::Player(player("Alex")))
            .with_player(TARGET_PLAYER_KEY, player("Sam"));
        let reply = handlers.on_deaths_command(&ctx).unwrap();
        assert_eq!(reply, ChatMessage::new("Sam has not died yet.", ChatColor::Yellow));
        assert!(handlers.store().is_empty());
        assert!(!path.exists(), "queries never save");
    }

    #[test]
    fn metrics_follow_deaths_queries_and_save_failures() {
        let dir = ScratchDir::new();
        // A directory at the data file path makes every save fail.
        let path = dir.path("occupied");
        std::fs::create_dir_all(&path).unwrap();
        let metrics = MetricsRecorder::new().unwrap();
        let mut handlers = EventHandlers::new(&path).with_metrics(metrics.clone());
        let alex = player("Alex");

        assert_eq!(handlers.on_entity_destroyed(&Actor::Player(alex.clone())), Some(1));
        handlers
            .on_deaths_command(&CommandContext::new(Actor::Player(alex.clone())))
            .unwrap();

        assert_eq!(metrics.deaths.get(), 1);
        assert_eq!(metrics.save_failures.get(), 1);
        assert_eq!(metrics.queries.get(), 1);
        assert_eq!(metrics.tracked_players.get(), 1);
        assert_eq!(handlers.store().get(&alex.id), Some(1));
    }

    #[test]
    fn deaths_command_shape() {
        let definition = EventHandlers::deaths_command();
        assert_eq!(definition.name(), "deaths");
        assert_eq!(definition.usage(), "/deaths [player]");
    }
}
