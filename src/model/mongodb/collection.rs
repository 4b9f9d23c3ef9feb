use std::ops::Deref;

use mongodb::{
    bson::doc, error::Error as DbError, options::IndexOptions, Collection, Database, IndexModel,
};

use crate::model::db::{Account, NewAccount, NewPair, Pair};

/// A type that can be directly inserted/read to/from the database.
pub trait MongoCollection {
    /// The name of the collection.
    const NAME: &'static str;
}

/// A database collection of the given type.
pub struct Coll<T>(Collection<T>);

impl<T> Coll<T>
where
    T: MongoCollection,
{
    /// Get a handle on this collection in the given database.
    pub fn from_db(db: &Database) -> Self {
        Self(db.collection(T::NAME))
    }
}

// `Derive(Clone)` would only derive if `T: Clone`, but we don't need that bound.
impl<T> Clone for Coll<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Deref for Coll<T> {
    type Target = Collection<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// Account collections
pub const ACCOUNTS: &str = "accounts";
impl MongoCollection for Account {
    const NAME: &'static str = ACCOUNTS;
}
impl MongoCollection for NewAccount {
    const NAME: &'static str = ACCOUNTS;
}

// Pair collections
pub const PAIRS: &str = "pairs";
impl MongoCollection for Pair {
    const NAME: &'static str = PAIRS;
}
impl MongoCollection for NewPair {
    const NAME: &'static str = PAIRS;
}

/// Ensure that all the required indexes exist on the given database.
///
/// This operation is idempotent.
pub async fn ensure_indexes_exist(db: &Database) -> Result<(), DbError> {
    debug!("Ensuring collection indexes exist");

    let unique = IndexOptions::builder().unique(true).build();

    // Account collection.
    let account_index = IndexModel::builder()
        .keys(doc! {"name": 1})
        .options(unique.clone())
        .build();
    Coll::<Account>::from_db(db)
        .create_index(account_index, None)
        .await?;

    // Pair collection: one receiver per giver and one giver per receiver, per cycle.
    let giver_index = IndexModel::builder()
        .keys(doc! {"cycle": 1, "giver": 1})
        .options(unique.clone())
        .build();
    let receiver_index = IndexModel::builder()
        .keys(doc! {"cycle": 1, "receiver": 1})
        .options(unique)
        .build();
    Coll::<Pair>::from_db(db)
        .create_indexes([giver_index, receiver_index], None)
        .await?;

    Ok(())
}
