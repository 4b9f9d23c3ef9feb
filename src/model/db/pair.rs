use std::ops::Deref;

use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::{
    model::{common::Cycle, mongodb::Id},
    pairing::{Assignment, Participant},
};

/// One giver → receiver pair of a stored cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairCore {
    pub cycle: Cycle,
    pub giver: Participant,
    pub receiver: Participant,
    /// When the pair was written.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub drawn_at: DateTime<Utc>,
}

impl PairCore {
    /// Split an assignment into one record per giver, all stamped with the same time.
    pub fn from_assignment(cycle: Cycle, assignment: &Assignment) -> Vec<Self> {
        let drawn_at = Utc::now();
        assignment
            .iter()
            .map(|(giver, receiver)| Self {
                cycle,
                giver: giver.clone(),
                receiver: receiver.clone(),
                drawn_at,
            })
            .collect()
    }
}

/// A pair without an ID.
pub type NewPair = PairCore;

/// A pair from the database, with its unique ID.
#[derive(Debug, Serialize, Deserialize)]
pub struct Pair {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub pair: PairCore,
}

impl Deref for Pair {
    type Target = PairCore;

    fn deref(&self) -> &Self::Target {
        &self.pair
    }
}
