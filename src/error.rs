use std::{path::PathBuf, result::Result as StdResult};

use thiserror::Error;

pub type Result<T> = StdResult<T, Error>;

/// An enum for describing and handling various errors encountered while
/// collecting commits, rendering, or writing changelogs.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no version specified")]
    MissingVersion,

    #[error("failed to read config file {0}: {1}")]
    ConfigRead(PathBuf, #[source] std::io::Error),

    #[error("failed to parse config file {0}: {1}")]
    ConfigParse(PathBuf, #[source] toml::de::Error),

    #[error("incorrect format for config file: {0}")]
    ConfigFormat(PathBuf),

    #[error("cannot get current directory")]
    CurrentDir,

    /// The version control collaborator failed, or there was nothing to read
    #[error("error running `git {command}`: {message}")]
    Git { command: String, message: String },

    /// Reading or writing the changelog file failed
    #[error("failed to persist changelog to {path}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("fatal I/O error while writing changelog")]
    Io(#[from] std::io::Error),

    #[error("failed to convert date to string format")]
    TimeFormat(#[from] time::error::Format),
}

impl Error {
    pub(crate) fn git<C: Into<String>, M: Into<String>>(command: C, message: M) -> Self {
        Error::Git {
            command: command.into(),
            message: message.into(),
        }
    }

    pub(crate) fn persistence<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Error::Persistence {
            path: path.into(),
            source,
        }
    }
}
