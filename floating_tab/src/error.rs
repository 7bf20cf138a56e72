use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("configuration could not be loaded: {0}")]
    Figment(#[from] Box<figment::Error>),
    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),
    #[error("no timer runtime available; a tokio runtime is required")]
    TimerUnavailable,
}

impl From<figment::Error> for Error {
    fn from(error: figment::Error) -> Self {
        Error::Figment(Box::new(error))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
