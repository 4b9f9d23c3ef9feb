use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::pairing::Participant;

/// What a participant sees when asking who they give to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ReceiverLookup {
    Assigned(Participant),
    /// No pairing stored for this participant and cycle.
    Unassigned,
}

impl ReceiverLookup {
    pub fn assigned(&self) -> Option<&Participant> {
        match self {
            Self::Assigned(receiver) => Some(receiver),
            Self::Unassigned => None,
        }
    }
}

impl From<Option<Participant>> for ReceiverLookup {
    fn from(receiver: Option<Participant>) -> Self {
        receiver.map_or(Self::Unassigned, Self::Assigned)
    }
}

/// Unassigned receivers show as `?`.
impl Display for ReceiverLookup {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Assigned(receiver) => write!(f, "{receiver}"),
            Self::Unassigned => f.write_str("?"),
        }
    }
}
