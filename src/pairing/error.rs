use thiserror::Error;

use super::Participant;

/// Input the generator refuses to work with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("at least 2 participants are needed for a draw, got {0}")]
    TooFewParticipants(usize),
    #[error("participant {0} appears more than once in the roster")]
    DuplicateParticipant(Participant),
    #[error("the maximum number of attempts must be positive")]
    ZeroAttempts,
}

/// Why no assignment was produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PairingError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
    /// Every attempt violated a constraint. The constraints may be
    /// unsatisfiable, or merely tight enough to need more attempts.
    #[error("no valid pairing found after {attempts} attempts")]
    GenerationFailed { attempts: u32 },
}
