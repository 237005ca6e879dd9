//! Event delivery parameters.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

/// Event bus configuration for host -> handler delivery.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct EventBusConfig {
    /// Maximum number of undelivered events before the host is pushed back.
    #[serde(default = "default_capacity")]
    #[validate(range(min = 1, max = 1048576))]
    pub capacity: usize,
}

fn default_capacity() -> usize {
    1024
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}
