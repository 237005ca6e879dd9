//! Player identity and the actor handles the host hands us.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tally of recorded deaths for a single player.
pub type DeathCount = u64;

/// Stable account identifier, independent of the display name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(Uuid);

impl PlayerId {
    #[inline]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Fresh random identifier, used when a host has no account id to offer.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    #[inline]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Hyphenated lower-case form; this is also the on-disk key format.
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for PlayerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl From<Uuid> for PlayerId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// An online player as reported by the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRef {
    pub id: PlayerId,
    pub name: String,
}

impl PlayerRef {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Opaque handle for whatever caused or suffered an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Actor {
    Player(PlayerRef),
    /// Any non-player entity (mobs, item frames, ...).
    Entity { kind: String },
    /// Server console or another non-entity command source.
    Console,
}

impl Actor {
    /// Returns the player behind this actor, if it is one.
    #[inline]
    pub fn as_player(&self) -> Option<&PlayerRef> {
        match self {
            Actor::Player(player) => Some(player),
            _ => None,
        }
    }

    pub fn entity(kind: impl Into<String>) -> Self {
        Actor::Entity { kind: kind.into() }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actor::Player(player) => f.write_str(&player.name),
            Actor::Entity { kind } => write!(f, "entity:{}", kind),
            Actor::Console => f.write_str("console"),
        }
    }
}
