use std::collections::{BTreeMap, HashSet};
use std::fmt::{Display, Formatter};

use serde::Serialize;
use thiserror::Error;

use super::{Exclusions, PairingRules, Participant, Roster};

/// A giver → receiver mapping, as recorded for a cycle. May be empty.
pub type PriorAssignment = BTreeMap<Participant, Participant>;

/// A constraint broken by a giver → receiver mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("{0} has no receiver")]
    MissingGiver(Participant),
    #[error("giver {0} is not a participant")]
    UnknownGiver(Participant),
    #[error("receiver {0} is not a participant")]
    UnknownReceiver(Participant),
    #[error("{0} would receive more than one gift")]
    DuplicateReceiver(Participant),
    #[error("{0} would give to themselves")]
    SelfPairing(Participant),
    #[error("{giver} must not give to {receiver}")]
    Excluded {
        giver: Participant,
        receiver: Participant,
    },
    #[error("{giver} already gave to {receiver} last cycle")]
    RepeatOfPrior {
        giver: Participant,
        receiver: Participant,
    },
    #[error("{0} and {1} would give to each other")]
    Mutual(Participant, Participant),
}

/// Check a single giver → receiver pair in isolation.
///
/// The mutual-pairing rule depends on the rest of the assignment and is left
/// to the caller.
pub(super) fn check_pair(
    giver: &Participant,
    receiver: &Participant,
    exclusions: &Exclusions,
    prior: &PriorAssignment,
    rules: &PairingRules,
) -> Result<(), Violation> {
    if giver == receiver {
        return Err(Violation::SelfPairing(giver.clone()));
    }
    if exclusions.forbids(giver, receiver) {
        return Err(Violation::Excluded {
            giver: giver.clone(),
            receiver: receiver.clone(),
        });
    }
    if !rules.allow_repeat_of_prior_pairing && prior.get(giver) == Some(receiver) {
        return Err(Violation::RepeatOfPrior {
            giver: giver.clone(),
            receiver: receiver.clone(),
        });
    }
    Ok(())
}

/// A valid pairing for one cycle: every participant gives exactly once,
/// receives exactly once, and never from themselves.
///
/// Only obtainable from the generator or by verifying recorded pairs, so any
/// value of this type satisfies the constraints it was checked against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Assignment(PriorAssignment);

impl Assignment {
    /// Wrap pairs that the generator has already checked.
    pub(super) fn from_checked(pairs: PriorAssignment) -> Self {
        Self(pairs)
    }

    /// Verify hand-supplied pairs against the roster and constraints.
    pub fn from_pairs(
        pairs: PriorAssignment,
        roster: &Roster,
        exclusions: &Exclusions,
        prior: &PriorAssignment,
        rules: &PairingRules,
    ) -> Result<Self, Violation> {
        check_all(&pairs, roster, exclusions, prior, rules)?;
        Ok(Self(pairs))
    }

    /// Re-check this assignment, e.g. against a different set of rules.
    pub fn verify(
        &self,
        roster: &Roster,
        exclusions: &Exclusions,
        prior: &PriorAssignment,
        rules: &PairingRules,
    ) -> Result<(), Violation> {
        check_all(&self.0, roster, exclusions, prior, rules)
    }

    pub fn receiver_of(&self, giver: &Participant) -> Option<&Participant> {
        self.0.get(giver)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pairs in giver order.
    pub fn iter(&self) -> impl Iterator<Item = (&Participant, &Participant)> {
        self.0.iter()
    }

    pub fn as_pairs(&self) -> &PriorAssignment {
        &self.0
    }

    pub fn into_pairs(self) -> PriorAssignment {
        self.0
    }
}

impl Display for Assignment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (giver, receiver) in &self.0 {
            writeln!(f, "{giver} -> {receiver}")?;
        }
        Ok(())
    }
}

fn check_all(
    pairs: &PriorAssignment,
    roster: &Roster,
    exclusions: &Exclusions,
    prior: &PriorAssignment,
    rules: &PairingRules,
) -> Result<(), Violation> {
    let mut receivers = HashSet::with_capacity(pairs.len());
    for (giver, receiver) in pairs {
        if !roster.contains(giver) {
            return Err(Violation::UnknownGiver(giver.clone()));
        }
        if !roster.contains(receiver) {
            return Err(Violation::UnknownReceiver(receiver.clone()));
        }
        if !receivers.insert(receiver) {
            return Err(Violation::DuplicateReceiver(receiver.clone()));
        }
        check_pair(giver, receiver, exclusions, prior, rules)?;
        if !rules.allow_mutual_pairing && pairs.get(receiver) == Some(giver) {
            let (a, b) = if giver < receiver {
                (giver, receiver)
            } else {
                (receiver, giver)
            };
            return Err(Violation::Mutual(a.clone(), b.clone()));
        }
    }

    // Givers are unique keys and all on the roster, so checking the count
    // is enough; find the first missing one for the report.
    if pairs.len() != roster.len() {
        if let Some(missing) = roster.iter().find(|p| !pairs.contains_key(*p)) {
            return Err(Violation::MissingGiver(missing.clone()));
        }
    }
    Ok(())
}
