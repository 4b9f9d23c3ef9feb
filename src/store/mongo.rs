use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::FindOptions, Client, Database};

use crate::{
    error::{Error, Result},
    model::{
        common::{Cycle, ReceiverLookup},
        db::{Account, AccountCore, NewAccount, NewPair, Pair, PairCore},
        mongodb::{ensure_indexes_exist, is_duplicate_key_error, Coll},
    },
    pairing::{Assignment, Participant, PriorAssignment},
    Config,
};

use super::{AssignmentLookup, AssignmentSink, HistorySource, RosterSource, WriteMode};

/// Accounts and pairs kept in MongoDB.
///
/// Storing a cycle runs in a transaction, so the deployment must be a replica
/// set (a single-node one will do).
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    accounts: Coll<Account>,
    new_accounts: Coll<NewAccount>,
    pairs: Coll<Pair>,
    new_pairs: Coll<NewPair>,
}

impl MongoStore {
    /// Wrap an existing connection.
    pub fn new(client: Client, db: &Database) -> Self {
        Self {
            client,
            accounts: Coll::from_db(db),
            new_accounts: Coll::from_db(db),
            pairs: Coll::from_db(db),
            new_pairs: Coll::from_db(db),
        }
    }

    /// Connect to the configured database and make sure its indexes exist.
    pub async fn connect(config: &Config) -> Result<Self> {
        info!("Connecting to database {}...", config.db_name());
        let client = Client::with_uri_str(config.db_uri()).await?;
        let db = client.database(config.db_name());
        ensure_indexes_exist(&db).await?;
        info!("...database connection online!");
        Ok(Self::new(client, &db))
    }

    /// All accounts, admins included, by name.
    pub async fn accounts(&self) -> Result<Vec<Account>> {
        let options = FindOptions::builder().sort(doc! {"name": 1}).build();
        Ok(self.accounts.find(None, options).await?.try_collect().await?)
    }

    /// Add an account, failing if the name is taken.
    pub async fn add_account(&self, account: AccountCore) -> Result<()> {
        match self.new_accounts.insert_one(&account, None).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key_error(&e) => Err(Error::BadRequest(format!(
                "Account name already in use: {}",
                account.name
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove an account. Pairs already drawn for it are kept as history.
    pub async fn remove_account(&self, name: &Participant) -> Result<()> {
        let result = self
            .accounts
            .delete_one(doc! {"name": name.as_str()}, None)
            .await?;
        if result.deleted_count == 0 {
            Err(Error::not_found(format!("Account {name}")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RosterSource for MongoStore {
    async fn list_participants(&self) -> Result<Vec<Participant>> {
        let filter = doc! {"admin": false};
        let options = FindOptions::builder().sort(doc! {"name": 1}).build();
        let accounts: Vec<Account> = self.accounts.find(filter, options).await?.try_collect().await?;
        Ok(accounts
            .into_iter()
            .map(|account| account.account.name)
            .collect())
    }
}

#[async_trait]
impl HistorySource for MongoStore {
    async fn get_assignment(&self, cycle: Cycle) -> Result<PriorAssignment> {
        let pairs: Vec<Pair> = self
            .pairs
            .find(doc! {"cycle": cycle}, None)
            .await?
            .try_collect()
            .await?;
        Ok(pairs
            .into_iter()
            .map(|Pair { pair, .. }| (pair.giver, pair.receiver))
            .collect())
    }
}

#[async_trait]
impl AssignmentSink for MongoStore {
    async fn store_assignment(
        &self,
        cycle: Cycle,
        assignment: &Assignment,
        mode: WriteMode,
    ) -> Result<()> {
        let new_pairs = PairCore::from_assignment(cycle, assignment);
        let filter = doc! {"cycle": cycle};

        let mut session = self.client.start_session(None).await?;
        session.start_transaction(None).await?;

        match mode {
            WriteMode::RejectExisting => {
                let existing = self
                    .pairs
                    .count_documents_with_session(filter, None, &mut session)
                    .await?;
                if existing > 0 {
                    session.abort_transaction().await?;
                    return Err(Error::CycleAlreadyDrawn(cycle));
                }
            }
            WriteMode::Replace => {
                let removed = self
                    .pairs
                    .delete_many_with_session(filter, None, &mut session)
                    .await?;
                if removed.deleted_count > 0 {
                    warn!(
                        "Replacing {} stored pairs for {cycle}",
                        removed.deleted_count
                    );
                }
            }
        }

        if !new_pairs.is_empty() {
            // A concurrent draw for the same cycle trips the unique index.
            if let Err(e) = self
                .new_pairs
                .insert_many_with_session(&new_pairs, None, &mut session)
                .await
            {
                return Err(if is_duplicate_key_error(&e) {
                    Error::CycleAlreadyDrawn(cycle)
                } else {
                    e.into()
                });
            }
        }

        session.commit_transaction().await?;
        Ok(())
    }
}

#[async_trait]
impl AssignmentLookup for MongoStore {
    async fn get_receiver(
        &self,
        participant: &Participant,
        cycle: Cycle,
    ) -> Result<ReceiverLookup> {
        let filter = doc! {
            "cycle": cycle,
            "giver": participant.as_str(),
        };
        let pair = self.pairs.find_one(filter, None).await?;
        Ok(pair.map(|pair| pair.pair.receiver).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use mongodb::Database;
    use rand::{rngs::StdRng, SeedableRng};

    use crate::pairing::{generate, Exclusions, PairingRules, Roster};

    async fn family(store: &MongoStore) {
        for name in ["Max", "Anka", "Roswitha", "Jürgen", "Katharina", "Christoph"] {
            store
                .add_account(AccountCore::participant(name))
                .await
                .unwrap();
        }
        store.add_account(AccountCore::admin("admin")).await.unwrap();
    }

    fn draw(roster: &Roster, seed: u64) -> Assignment {
        generate(
            roster,
            &Exclusions::example(),
            &PriorAssignment::new(),
            &PairingRules::default(),
            &mut StdRng::seed_from_u64(seed),
        )
        .unwrap()
    }

    #[store_test]
    async fn roster_excludes_admins(client: Client, db: Database) {
        let store = MongoStore::new(client, &db);
        family(&store).await;

        let participants = store.list_participants().await.unwrap();
        assert_eq!(participants.len(), 6);
        assert!(!participants.contains(&"admin".into()));
        assert_eq!(store.accounts().await.unwrap().len(), 7);

        assert!(matches!(
            store.add_account(AccountCore::participant("Max")).await,
            Err(Error::BadRequest(_))
        ));
        store.remove_account(&"Max".into()).await.unwrap();
        assert!(matches!(
            store.remove_account(&"Max".into()).await,
            Err(Error::NotFound(_))
        ));
        assert_eq!(store.list_participants().await.unwrap().len(), 5);
    }

    #[store_test]
    async fn stores_and_reads_back_a_cycle(client: Client, db: Database) {
        let store = MongoStore::new(client, &db);
        family(&store).await;
        let roster = Roster::new(store.list_participants().await.unwrap()).unwrap();
        let cycle = Cycle::new(2025);
        let assignment = draw(&roster, 11);

        store
            .store_assignment(cycle, &assignment, WriteMode::RejectExisting)
            .await
            .unwrap();
        assert_eq!(&store.get_assignment(cycle).await.unwrap(), assignment.as_pairs());
        assert!(store.get_assignment(cycle.previous()).await.unwrap().is_empty());

        let max = Participant::from("Max");
        assert_eq!(
            store.get_receiver(&max, cycle).await.unwrap(),
            ReceiverLookup::Assigned(assignment.receiver_of(&max).unwrap().clone())
        );
        assert_eq!(
            store.get_receiver(&"admin".into(), cycle).await.unwrap(),
            ReceiverLookup::Unassigned
        );
    }

    #[store_test]
    async fn second_draw_rejected_unless_replacing(client: Client, db: Database, pairs: Coll<Pair>) {
        let store = MongoStore::new(client, &db);
        family(&store).await;
        let roster = Roster::new(store.list_participants().await.unwrap()).unwrap();
        let cycle = Cycle::new(2025);
        let first = draw(&roster, 1);
        let second = draw(&roster, 2);

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
        // Nothing was duplicated by the rejected write.
        assert_eq!(pairs.count_documents(doc! {"cycle": cycle}, None).await.unwrap(), 6);

        store
            .store_assignment(cycle, &second, WriteMode::Replace)
            .await
            .unwrap();
        assert_eq!(&store.get_assignment(cycle).await.unwrap(), second.as_pairs());
        assert_eq!(pairs.count_documents(doc! {"cycle": cycle}, None).await.unwrap(), 6);
    }
}
