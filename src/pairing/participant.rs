use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::ops::Deref;

use mongodb::bson::Bson;
use serde::{Deserialize, Serialize};

use super::InvalidInput;

/// A participant in the draw, identified by their unique name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Participant(String);

impl Participant {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Participant {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Borrow<str> for Participant {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Display for Participant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Participant {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Participant {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<Participant> for Bson {
    fn from(participant: Participant) -> Self {
        Bson::String(participant.0)
    }
}

/// The set of participants taking part in one cycle.
///
/// Order is preserved as given: it is the order in which givers are walked
/// during generation. A roster always holds at least two distinct participants,
/// since no derangement exists for fewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster(Vec<Participant>);

impl Roster {
    /// Validate the given participants into a roster.
    pub fn new<I, P>(participants: I) -> Result<Self, InvalidInput>
    where
        I: IntoIterator<Item = P>,
        P: Into<Participant>,
    {
        let participants: Vec<Participant> = participants.into_iter().map(Into::into).collect();

        let mut seen = HashSet::with_capacity(participants.len());
        for participant in &participants {
            if !seen.insert(participant) {
                return Err(InvalidInput::DuplicateParticipant(participant.clone()));
            }
        }

        if participants.len() < 2 {
            return Err(InvalidInput::TooFewParticipants(participants.len()));
        }

        Ok(Self(participants))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, participant: &Participant) -> bool {
        self.0.contains(participant)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Participant] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Participant;
    type IntoIter = std::slice::Iter<'a, Participant>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_fewer_than_two() {
        assert_eq!(
            Roster::new(Vec::<Participant>::new()),
            Err(InvalidInput::TooFewParticipants(0))
        );
        assert_eq!(
            Roster::new(["Max"]),
            Err(InvalidInput::TooFewParticipants(1))
        );
    }

    #[test]
    fn rejects_duplicates() {
        assert_eq!(
            Roster::new(["Max", "Anka", "Max"]),
            Err(InvalidInput::DuplicateParticipant("Max".into()))
        );
    }

    #[test]
    fn duplicate_reported_before_size() {
        assert_eq!(
            Roster::new(["Max", "Max"]),
            Err(InvalidInput::DuplicateParticipant("Max".into()))
        );
    }

    #[test]
    fn keeps_order() {
        let roster = Roster::new(["C", "A", "B"]).unwrap();
        let names: Vec<&str> = roster.iter().map(Participant::as_str).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
        assert!(roster.contains(&"A".into()));
        assert!(!roster.contains(&"D".into()));
    }
}
