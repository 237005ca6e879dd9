//! # deathcounter-core
//!
//! Per-player death tally for a multiplayer game server.
//!
//! ### Key Submodules:
//! - `player`: player identifiers and the host's actor handles
//! - `store`: `CounterStore`, the in-memory tally and its JSON snapshot
//! - `events`: host events and the bounded queue that delivers them
//!
//! Everything here is synchronous; the host delivers events serially.

pub mod error;
pub mod events;
pub mod player;
pub mod store;

pub mod prelude {
    pub use crate::error::*;
    pub use crate::events::*;
    pub use crate::player::*;
    pub use crate::store::*;
}

pub use error::StoreError;
pub use player::{Actor, DeathCount, PlayerId, PlayerRef};
pub use store::{CounterStore, LoadOutcome};
