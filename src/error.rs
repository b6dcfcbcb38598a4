//! Error types for the mentorship service

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Request did not match the expected shape (bad id, blank field, bad JSON)
    #[error("{0}")]
    Validation(String),

    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// The backing database rejected the operation or could not be reached
    #[error("Database error: {0}")]
    PersistenceUnavailable(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn student_not_found(id: impl ToString) -> Self {
        Error::NotFound {
            resource: "Student",
            id: id.to_string(),
        }
    }

    /// Stable machine-readable name used in error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation_error",
            Error::NotFound { .. } => "not_found",
            Error::PersistenceUnavailable(_) => "persistence_unavailable",
            Error::Config(_) | Error::Io(_) | Error::Toml(_) => "internal_error",
        }
    }
}

impl From<mongodb::error::Error> for Error {
    fn from(err: mongodb::error::Error) -> Self {
        Error::PersistenceUnavailable(err.to_string())
    }
}
