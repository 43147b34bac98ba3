use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with status {status}: {stderr}")]
    Failed {
        command: String,
        status: i32,
        stderr: String,
    },
}

#[derive(Debug, Error)]
pub enum VagrantError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("malformed vagrant status line: {0:?}")]
    MalformedStatusLine(String),

    #[error("malformed vagrant ssh-config line: {0:?}")]
    MalformedConfigLine(String),

    #[error("failed to read vagrant options from {path}: {source}")]
    OptionsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid vagrant options in {path}: {source}")]
    OptionsJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("the vagrant connector is already configured")]
    AlreadyConfigured,

    #[error("No running Vagrant instances found!")]
    NoRunningInstances,
}

#[derive(Debug, Error)]
pub enum DeployError {
    #[error("no deploy context is active: pass state and host explicitly or activate the ambient context")]
    NoContext,

    #[error("invalid deploy options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}
