// deathcounter-engine/src/engine/runtime.rs

/*!
# Runtime

Owns the handlers, the command registry and the event bus. The host pushes
[`GameEvent`]s with [`DeathCounterRuntime::publish`] and calls
[`DeathCounterRuntime::pump`] from its dispatch thread; every event is
handled to completion before the next one is taken.
*/

use tracing::{debug, info, instrument};

use deathcounter_config::DeathCounterConfig;
use deathcounter_core::events::{EventBus, GameEvent};
use deathcounter_core::Actor;
use deathcounter_telemetry::MetricsRecorder;

use super::EngineError;
use crate::command::{CommandError, CommandRegistry};
use crate::handlers::EventHandlers;
use crate::host::Host;

pub struct DeathCounterRuntime {
    handlers: EventHandlers,
    commands: CommandRegistry<EventHandlers>,
    bus: EventBus,
}

impl DeathCounterRuntime {
    /// Loads persisted counts and registers the `deaths` command.
    pub fn start(
        config: &DeathCounterConfig,
        metrics: Option<MetricsRecorder>,
    ) -> Result<Self, EngineError> {
        info!("Deathcounter plugin is loading...");

        let mut handlers = EventHandlers::new(config.storage.data_file.clone());
        if let Some(metrics) = metrics {
            handlers = handlers.with_metrics(metrics);
        }
        handlers.load();

        let mut commands = CommandRegistry::new();
        commands.register(EventHandlers::deaths_command())?;

        Ok(Self {
            handlers,
            commands,
            bus: EventBus::with_capacity(config.event_bus.capacity),
        })
    }

    /// Queues an event for the next [`pump`](Self::pump).
    pub fn publish(&self, event: GameEvent) -> Result<(), EngineError> {
        self.bus.event_enqueue(event)?;
        Ok(())
    }

    #[inline]
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    #[inline]
    pub fn handlers(&self) -> &EventHandlers {
        &self.handlers
    }

    /// Handles every queued event in order. Returns how many were handled.
    pub fn pump<H: Host + ?Sized>(&mut self, host: &mut H) -> usize {
        let mut handled = 0;
        while let Some(event) = self.bus.event_dequeue() {
            self.handle(event, host);
            handled += 1;
        }
        handled
    }

    /// Routes a single event, bypassing the queue.
    #[instrument(level = "debug", skip_all, fields(kind = event.kind()))]
    pub fn handle<H: Host + ?Sized>(&mut self, event: GameEvent, host: &mut H) {
        match event {
            GameEvent::EntityDestroyed { entity } => {
                self.handlers.on_entity_destroyed(&entity);
            }
            GameEvent::CommandInvoked {
                source,
                command,
                args,
            } => self.run_command(source, &command, &args, host),
        }
    }

    fn run_command<H: Host + ?Sized>(
        &mut self,
        source: Actor,
        command: &str,
        args: &[String],
        host: &mut H,
    ) {
        let result = self
            .commands
            .dispatch(&self.handlers, source.clone(), command, args, &*host);
        match result {
            Ok(reply) => host.send_message(&source, reply),
            Err(error) => {
                // A console invoker is answered, never logged.
                if error != CommandError::InvalidInvoker {
                    debug!(%source, command, %error, "Command rejected");
                }
                host.command_failed(&source, &error);
            }
        }
    }
}
