use mongodb::error::Error as DbError;
use thiserror::Error;

use crate::{
    model::common::Cycle,
    pairing::{InvalidInput, PairingError, Violation},
};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("Failed to load configuration: {0}")]
    Config(#[from] Box<figment::Error>),
    #[error("Failed to initialise logging: {0}")]
    Logging(String),
    #[error(transparent)]
    Pairing(#[from] PairingError),
    #[error("Invalid pairing: {0}")]
    Violation(#[from] Violation),
    #[error("Pairs for {0} have already been drawn")]
    CycleAlreadyDrawn(Cycle),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl From<InvalidInput> for Error {
    fn from(err: InvalidInput) -> Self {
        Self::Pairing(err.into())
    }
}
