use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CadenceError {
    #[error("unknown command '{id}' (valid commands: {})", .valid.join(", "))]
    UnknownCommand { id: String, valid: Vec<String> },

    #[error("feature not found: {0}")]
    FeatureNotFound(String),

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("no 'next:' line in {}", .0.display())]
    NoNextCommand(PathBuf),

    #[error("missing argument: --{0}")]
    MissingArgument(&'static str),

    #[error("artifact not found: {}", .0.display())]
    MissingArtifact(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CadenceError>;
