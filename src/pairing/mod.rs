//! The constrained random pairing generator.
//!
//! Everything in here is synchronous and free of I/O: the caller supplies the
//! roster, constraints and a random source, and gets back either a complete,
//! valid [`Assignment`] or a [`PairingError`]. Nothing in this module logs.

mod assignment;
mod error;
mod exclusions;
mod generator;
mod participant;
mod rules;

pub use assignment::{Assignment, PriorAssignment, Violation};
pub use error::{InvalidInput, PairingError};
pub use exclusions::Exclusions;
pub use generator::generate;
pub use participant::{Participant, Roster};
pub use rules::{PairingRules, DEFAULT_MAX_ATTEMPTS};
