//! # Error Taxonomy
//!
//! Typed failures raised at module seams. Startup configuration errors are fatal,
//! command load and dispatch errors are recovered where they occur.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal: the process must not start.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Recovered: one command unit is skipped, the rest still register.
#[derive(Debug, Error)]
pub enum CommandLoadError {
    #[error("failed to load command unit '{unit}': {reason}")]
    Load { unit: String, reason: String },

    #[error("command unit '{unit}' exports no registration function")]
    MissingExport { unit: String },

    #[error("command unit '{unit}' failed to register: {reason}")]
    Register { unit: String, reason: String },
}

impl CommandLoadError {
    pub fn unit(&self) -> &str {
        match self {
            Self::Load { unit, .. } | Self::MissingExport { unit } | Self::Register { unit, .. } => {
                unit
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("invalid command name {0:?}")]
    InvalidName(String),

    #[error("command '{command}' failed: {source}")]
    Handler {
        command: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_lists_every_variable() {
        let err = ConfigError::Missing(vec!["DISCORD_TOKEN", "API_URL"]);
        assert_eq!(
            err.to_string(),
            "missing required environment variables: DISCORD_TOKEN, API_URL"
        );
    }

    #[test]
    fn test_load_error_unit_name() {
        let err = CommandLoadError::MissingExport {
            unit: "broken".to_string(),
        };
        assert_eq!(err.unit(), "broken");
    }
}
