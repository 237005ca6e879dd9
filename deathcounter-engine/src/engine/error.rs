use thiserror::Error;

use deathcounter_core::events::EventError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Command '{0}' is already registered")]
    DuplicateCommand(String),

    #[error("Event delivery failed: {0}")]
    Event(#[from] EventError),
}
