//! ## deathcounter-core::events
//! **Host events and the queue that carries them to the handlers**

pub mod bus;
pub mod game;

pub use bus::{EventBus, EventError};
pub use game::GameEvent;
