use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("configuration file not found in '{0}'")]
    NotFound(PathBuf),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("unable to access storage key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to serialize value for key '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("storage lock was poisoned")]
    Poisoned,
}

/// Failures of a portal operation, surfaced to the control that initiated it.
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("no content with id '{0}'")]
    ContentNotFound(String),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl PortalError {
    pub fn validation(field: &'static str, message: impl ToString) -> PortalError {
        PortalError::Validation {
            field,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("no quiz is in progress")]
    NotAsking,
    #[error("no answer has been selected")]
    NoSelection,
    #[error("option {option} is out of range for a question with {options} options")]
    OptionOutOfRange { option: usize, options: usize },
    #[error("content '{0}' is not a quiz")]
    NotAQuiz(String),
    #[error("quiz '{0}' has no questions")]
    EmptyQuiz(String),
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Portal(#[from] PortalError),
    #[error(transparent)]
    Cors(#[from] rocket_cors::Error),
}
