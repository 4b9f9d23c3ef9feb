use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::{Participant, Roster};

/// Maps each giver to the participants they must not give to.
///
/// Entries are directional and applied exactly as supplied: excluding B for A
/// says nothing about whether B may give to A.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Exclusions(HashMap<Participant, HashSet<Participant>>);

impl Exclusions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forbid `giver` from giving to `receiver`.
    pub fn exclude(
        &mut self,
        giver: impl Into<Participant>,
        receiver: impl Into<Participant>,
    ) -> &mut Self {
        self.0
            .entry(giver.into())
            .or_default()
            .insert(receiver.into());
        self
    }

    /// Forbid both directions between `a` and `b`.
    pub fn exclude_each_other(
        &mut self,
        a: impl Into<Participant>,
        b: impl Into<Participant>,
    ) -> &mut Self {
        let (a, b) = (a.into(), b.into());
        self.exclude(a.clone(), b.clone());
        self.exclude(b, a)
    }

    /// Is `giver` forbidden from giving to `receiver`?
    pub fn forbids(&self, giver: &Participant, receiver: &Participant) -> bool {
        self.0
            .get(giver)
            .map_or(false, |excluded| excluded.contains(receiver))
    }

    /// The participants `giver` must not give to.
    pub fn excluded_for(&self, giver: &Participant) -> impl Iterator<Item = &Participant> {
        self.0.get(giver).into_iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(HashSet::is_empty)
    }

    /// Everyone named in these exclusions who is not on the roster.
    /// Such entries are harmless but usually point at a stale configuration.
    pub fn unknown_participants(&self, roster: &Roster) -> BTreeSet<&Participant> {
        self.0
            .iter()
            .flat_map(|(giver, receivers)| std::iter::once(giver).chain(receivers))
            .filter(|participant| !roster.contains(participant))
            .collect()
    }
}

impl FromIterator<(Participant, Participant)> for Exclusions {
    fn from_iter<T: IntoIterator<Item = (Participant, Participant)>>(iter: T) -> Self {
        let mut exclusions = Self::new();
        for (giver, receiver) in iter {
            exclusions.exclude(giver, receiver);
        }
        exclusions
    }
}
