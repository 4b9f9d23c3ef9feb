use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    error::{Error, Result},
    model::common::{Cycle, ReceiverLookup},
    pairing::{Assignment, Participant, PriorAssignment},
};

use super::{AssignmentLookup, AssignmentSink, HistorySource, RosterSource, WriteMode};

#[derive(Debug, Default)]
struct State {
    /// Account name -> is admin.
    accounts: BTreeMap<Participant, bool>,
    pairs: BTreeMap<Cycle, PriorAssignment>,
}

/// Keeps accounts and pairs in memory only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the given (non-admin) participants.
    pub fn with_participants<I, P>(participants: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Participant>,
    {
        let accounts = participants
            .into_iter()
            .map(|p| (p.into(), false))
            .collect();
        Self {
            state: Mutex::new(State {
                accounts,
                pairs: BTreeMap::new(),
            }),
        }
    }

    /// Add an account, failing if the name is taken.
    pub async fn add_account(&self, name: Participant, admin: bool) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.accounts.contains_key(&name) {
            return Err(Error::BadRequest(format!("Account name already in use: {name}")));
        }
        state.accounts.insert(name, admin);
        Ok(())
    }

    /// Load a cycle as if it had been stored earlier, e.g. by a previous run.
    pub async fn seed_cycle(&self, cycle: Cycle, pairs: PriorAssignment) {
        self.state.lock().await.pairs.insert(cycle, pairs);
    }
}

#[async_trait]
impl RosterSource for MemoryStore {
    async fn list_participants(&self) -> Result<Vec<Participant>> {
        let state = self.state.lock().await;
        Ok(state
            .accounts
            .iter()
            .filter(|(_, admin)| !**admin)
            .map(|(name, _)| name.clone())
            .collect())
    }
}

#[async_trait]
impl HistorySource for MemoryStore {
    async fn get_assignment(&self, cycle: Cycle) -> Result<PriorAssignment> {
        let state = self.state.lock().await;
        Ok(state.pairs.get(&cycle).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl AssignmentSink for MemoryStore {
    async fn store_assignment(
        &self,
        cycle: Cycle,
        assignment: &Assignment,
        mode: WriteMode,
    ) -> Result<()> {
        let mut state = self.state.lock().await;
        let drawn = state.pairs.get(&cycle).map_or(false, |pairs| !pairs.is_empty());
        if drawn && mode == WriteMode::RejectExisting {
            return Err(Error::CycleAlreadyDrawn(cycle));
        }
        state.pairs.insert(cycle, assignment.as_pairs().clone());
        Ok(())
    }
}

#[async_trait]
impl AssignmentLookup for MemoryStore {
    async fn get_receiver(
        &self,
        participant: &Participant,
        cycle: Cycle,
    ) -> Result<ReceiverLookup> {
        let state = self.state.lock().await;
        Ok(state
            .pairs
            .get(&cycle)
            .and_then(|pairs| pairs.get(participant))
            .cloned()
            .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{rngs::StdRng, SeedableRng};

    use crate::pairing::{generate, Exclusions, PairingRules, Roster};

    fn assignment(roster: &Roster, seed: u64) -> Assignment {
        generate(
            roster,
            &Exclusions::new(),
            &PriorAssignment::new(),
            &PairingRules::default(),
            &mut StdRng::seed_from_u64(seed),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn admins_are_not_participants() {
        let store = MemoryStore::with_participants(["Max", "Anka"]);
        store.add_account("admin".into(), true).await.unwrap();
        assert_eq!(
            store.list_participants().await.unwrap(),
            vec![Participant::from("Anka"), Participant::from("Max")]
        );
        assert!(matches!(
            store.add_account("Max".into(), false).await,
            Err(Error::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn rejects_second_write_unless_replacing() {
        let store = MemoryStore::new();
        let cycle = Cycle::new(2025);
        let first = assignment(&Roster::abcd(), 1);
        let second = assignment(&Roster::abcd(), 2);

        store
            .store_assignment(cycle, &first, WriteMode::RejectExisting)
            .await
            .unwrap();
        assert!(matches!(
            store
                .store_assignment(cycle, &second, WriteMode::RejectExisting)
                .await,
            Err(Error::CycleAlreadyDrawn(c)) if c == cycle
        ));
        assert_eq!(&store.get_assignment(cycle).await.unwrap(), first.as_pairs());

        store
            .store_assignment(cycle, &second, WriteMode::Replace)
            .await
            .unwrap();
        assert_eq!(&store.get_assignment(cycle).await.unwrap(), second.as_pairs());
    }

    #[tokio::test]
    async fn lookup_reports_unassigned() {
        let store = MemoryStore::new();
        let cycle = Cycle::new(2025);
        let drawn = assignment(&Roster::abcd(), 3);
        store
            .store_assignment(cycle, &drawn, WriteMode::RejectExisting)
            .await
            .unwrap();

        let a = Participant::from("A");
        let lookup = store.get_receiver(&a, cycle).await.unwrap();
        assert_eq!(lookup.assigned(), drawn.receiver_of(&a));
        assert_eq!(lookup.to_string(), drawn.receiver_of(&a).unwrap().as_str());
        let missing = store.get_receiver(&"Z".into(), cycle).await.unwrap();
        assert_eq!(missing, ReceiverLookup::Unassigned);
        assert_eq!(missing.assigned(), None);
        assert_eq!(
            store.get_receiver(&a, cycle.previous()).await.unwrap(),
            ReceiverLookup::Unassigned
        );
        assert_eq!(ReceiverLookup::Unassigned.to_string(), "?");
    }
}
