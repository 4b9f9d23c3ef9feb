use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::{model::mongodb::Id, pairing::Participant};

/// Core account data, as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountCore {
    /// Unique display name, which is also the participant identifier.
    pub name: Participant,
    /// Administrative accounts run the draw but never take part in it.
    #[serde(default)]
    pub admin: bool,
}

impl AccountCore {
    pub fn participant(name: impl Into<Participant>) -> Self {
        Self {
            name: name.into(),
            admin: false,
        }
    }

    pub fn admin(name: impl Into<Participant>) -> Self {
        Self {
            name: name.into(),
            admin: true,
        }
    }
}

/// An account without an ID.
pub type NewAccount = AccountCore;

/// An account from the database, with its unique ID.
#[derive(Debug, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub account: AccountCore,
}

impl Deref for Account {
    type Target = AccountCore;

    fn deref(&self) -> &Self::Target {
        &self.account
    }
}
