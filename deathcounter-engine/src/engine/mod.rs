mod error;
mod runtime;

pub use self::{error::EngineError, runtime::DeathCounterRuntime};

pub mod prelude {
    pub use super::{DeathCounterRuntime, EngineError};
}
