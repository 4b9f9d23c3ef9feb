//! The collaborators a draw needs: where participants, history and
//! exclusions come from, and where the result goes.
//!
//! Two implementations exist: [`MongoStore`] for real use and [`MemoryStore`]
//! for tests and dry runs.

use async_trait::async_trait;

use crate::{
    error::Result,
    model::common::{Cycle, ReceiverLookup},
    pairing::{Assignment, Exclusions, Participant, PriorAssignment},
};

mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// What to do when a cycle already has pairs stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Refuse with [`crate::error::Error::CycleAlreadyDrawn`].
    #[default]
    RejectExisting,
    /// Replace the stored pairs as one atomic write.
    Replace,
}

/// Supplies the current participants. Administrative accounts are excluded.
#[async_trait]
pub trait RosterSource {
    async fn list_participants(&self) -> Result<Vec<Participant>>;
}

/// Supplies the pairs stored for a cycle; empty if none were drawn.
#[async_trait]
pub trait HistorySource {
    async fn get_assignment(&self, cycle: Cycle) -> Result<PriorAssignment>;
}

/// Supplies who must not give to whom.
#[async_trait]
pub trait ExclusionSource {
    async fn get_exclusions(&self) -> Result<Exclusions>;
}

/// Persists a cycle's assignment, all pairs or none.
#[async_trait]
pub trait AssignmentSink {
    async fn store_assignment(
        &self,
        cycle: Cycle,
        assignment: &Assignment,
        mode: WriteMode,
    ) -> Result<()>;
}

/// Answers "who do I give to?" for one participant.
#[async_trait]
pub trait AssignmentLookup {
    async fn get_receiver(&self, participant: &Participant, cycle: Cycle)
        -> Result<ReceiverLookup>;
}

/// Statically configured exclusions.
#[async_trait]
impl ExclusionSource for Exclusions {
    async fn get_exclusions(&self) -> Result<Exclusions> {
        Ok(self.clone())
    }
}
