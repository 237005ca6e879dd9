use std::path::PathBuf;

use thiserror::Error;

/// Problems with operator input: console lines and scenario files.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Unrecognised input '{0}', type 'help' for commands")]
    Syntax(String),

    #[error("'{0}' expects {1}")]
    MissingArgument(&'static str, &'static str),

    #[error("Invalid player id '{0}'")]
    InvalidPlayerId(String),

    #[error("No online player named '{0}'")]
    UnknownPlayer(String),

    #[error("Player '{0}' is already online")]
    AlreadyOnline(String),

    #[error("Failed to read scenario {path}: {source}")]
    ScenarioRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed scenario {path}: {source}")]
    ScenarioParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
