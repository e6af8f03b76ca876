//! The ledger store: per-user collections of transactions, categories, goals and
//! recurring templates, backed by SQLite.
//!
//! Each collection offers add/update/delete/list and snapshot subscriptions.
//! Mutations publish the owning user's new snapshot once the SQL statement has
//! committed.

mod subscription;

use std::{
    fmt::Display,
    sync::{Arc, Mutex, MutexGuard},
};

use rusqlite::Connection;

use crate::{
    Error, GoalId, TransactionId, UserID,
    category::Category,
    goal::{Goal, set_goal_amount},
    recurring::RecurringTemplate,
    transaction::{Transaction, TransactionBuilder},
};

pub use subscription::{SnapshotHub, Subscription};

/// A record kind stored in the ledger.
///
/// Every operation is scoped to the owning user: records that belong to
/// another user behave as if they do not exist.
pub trait Record: Clone + Send + Sync + Sized + 'static {
    /// The database ID type of the record.
    type Id: Copy + Display + Send;
    /// The validated data needed to create or update a record.
    type Fields;

    /// Insert a new record for `user_id` and return it.
    fn insert(user_id: UserID, fields: Self::Fields, connection: &Connection)
    -> Result<Self, Error>;

    /// Replace the user-editable fields of the record `id` and return the updated record.
    fn update(
        user_id: UserID,
        id: Self::Id,
        fields: Self::Fields,
        connection: &Connection,
    ) -> Result<Self, Error>;

    /// Delete the record `id` and return the deleted record.
    fn delete(user_id: UserID, id: Self::Id, connection: &Connection) -> Result<Self, Error>;

    /// Select every record owned by `user_id`.
    fn select_by_user(user_id: UserID, connection: &Connection) -> Result<Vec<Self>, Error>;
}

/// Acquire the database lock.
///
/// # Errors
/// Returns an [Error::DatabaseLockError] if the lock is poisoned.
pub(crate) fn lock_connection(
    connection: &Mutex<Connection>,
) -> Result<MutexGuard<'_, Connection>, Error> {
    connection.lock().map_err(|error| {
        tracing::error!("Could not acquire database lock: {error}");
        Error::DatabaseLockError
    })
}

/// A collection of one record kind with snapshot subscriptions.
pub struct Collection<R: Record> {
    connection: Arc<Mutex<Connection>>,
    hub: SnapshotHub<R>,
}

impl<R: Record> Clone for Collection<R> {
    fn clone(&self) -> Self {
        Self {
            connection: self.connection.clone(),
            hub: self.hub.clone(),
        }
    }
}

impl<R: Record> Collection<R> {
    /// Create a collection over the shared SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self {
            connection,
            hub: SnapshotHub::default(),
        }
    }

    /// Add a record for `user_id`.
    pub fn add(&self, user_id: UserID, fields: R::Fields) -> Result<R, Error> {
        let record = R::insert(user_id, fields, &*lock_connection(&self.connection)?)?;
        self.publish(user_id);

        Ok(record)
    }

    /// Update the record `id` owned by `user_id`.
    pub fn update(&self, user_id: UserID, id: R::Id, fields: R::Fields) -> Result<R, Error> {
        let record = R::update(user_id, id, fields, &*lock_connection(&self.connection)?)?;
        self.publish(user_id);

        Ok(record)
    }

    /// Delete the record `id` owned by `user_id`.
    pub fn delete(&self, user_id: UserID, id: R::Id) -> Result<R, Error> {
        let record = R::delete(user_id, id, &*lock_connection(&self.connection)?)?;
        self.publish(user_id);

        Ok(record)
    }

    /// List every record owned by `user_id`.
    pub fn list_by_user(&self, user_id: UserID) -> Result<Vec<R>, Error> {
        R::select_by_user(user_id, &*lock_connection(&self.connection)?)
    }

    /// Subscribe to `user_id`'s snapshots.
    ///
    /// `callback` is called with the current snapshot before this function
    /// returns, and again after every change to the collection.
    /// The callback must not mutate the ledger.
    pub fn subscribe(
        &self,
        user_id: UserID,
        callback: impl Fn(&[R]) + Send + Sync + 'static,
    ) -> Result<Subscription, Error> {
        let callback = Arc::new(callback);
        let _delivery = self.hub.begin_delivery();
        let snapshot = self.list_by_user(user_id)?;
        let listener = callback.clone();
        let subscription = self
            .hub
            .register(user_id, move |records: &[R]| (*listener)(records));
        (*callback)(&snapshot);

        Ok(subscription)
    }

    /// Send the current snapshot of `user_id`'s records to their listeners.
    ///
    /// Errors are logged, not returned: the mutation that triggered the
    /// publish has already been committed.
    pub fn publish(&self, user_id: UserID) {
        if !self.hub.has_listeners(user_id) {
            return;
        }

        let _delivery = self.hub.begin_delivery();
        match self.list_by_user(user_id) {
            Ok(snapshot) => self.hub.notify(user_id, &snapshot),
            Err(error) => {
                tracing::error!("Could not publish snapshot for user {user_id}: {error}")
            }
        }
    }
}

impl Collection<Goal> {
    /// Overwrite the current amount of the goal `id`, clamped to zero.
    pub fn update_amount(&self, user_id: UserID, id: GoalId, amount: f64) -> Result<Goal, Error> {
        let goal = set_goal_amount(user_id, id, amount, &*lock_connection(&self.connection)?)?;
        self.publish(user_id);

        Ok(goal)
    }
}

/// The four collections of the ledger over one shared database connection.
///
/// Use the transaction methods on [Ledger] rather than the transaction
/// collection directly: they also publish goal snapshots, since saving a
/// transaction can change a goal's current amount.
#[derive(Clone)]
pub struct Ledger {
    connection: Arc<Mutex<Connection>>,
    transactions: Collection<Transaction>,
    categories: Collection<Category>,
    goals: Collection<Goal>,
    recurring: Collection<RecurringTemplate>,
}

impl Ledger {
    /// Create the ledger over an initialized database connection.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self {
            transactions: Collection::new(connection.clone()),
            categories: Collection::new(connection.clone()),
            goals: Collection::new(connection.clone()),
            recurring: Collection::new(connection.clone()),
            connection,
        }
    }

    /// Acquire the database lock.
    pub fn connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        lock_connection(&self.connection)
    }

    /// The transaction collection, for listing and subscribing.
    pub fn transactions(&self) -> &Collection<Transaction> {
        &self.transactions
    }

    /// The category collection.
    pub fn categories(&self) -> &Collection<Category> {
        &self.categories
    }

    /// The savings goal collection.
    pub fn goals(&self) -> &Collection<Goal> {
        &self.goals
    }

    /// The recurring template collection.
    pub fn recurring(&self) -> &Collection<RecurringTemplate> {
        &self.recurring
    }

    /// Add a transaction and apply its contribution to the linked goal.
    pub fn add_transaction(
        &self,
        user_id: UserID,
        builder: TransactionBuilder,
    ) -> Result<Transaction, Error> {
        let transaction = self.transactions.add(user_id, builder)?;

        if transaction.goal_contribution().is_some() {
            self.goals.publish(user_id);
        }

        Ok(transaction)
    }

    /// Edit a transaction, moving its contribution between goals as needed.
    pub fn update_transaction(
        &self,
        user_id: UserID,
        id: TransactionId,
        builder: TransactionBuilder,
    ) -> Result<Transaction, Error> {
        let transaction = self.transactions.update(user_id, id, builder)?;
        self.goals.publish(user_id);

        Ok(transaction)
    }

    /// Delete a transaction and withdraw its contribution from the linked goal.
    pub fn delete_transaction(
        &self,
        user_id: UserID,
        id: TransactionId,
    ) -> Result<Transaction, Error> {
        let transaction = self.transactions.delete(user_id, id)?;

        if transaction.goal_contribution().is_some() {
            self.goals.publish(user_id);
        }

        Ok(transaction)
    }

    /// Send the current snapshot of every collection to `user_id`'s listeners.
    pub fn publish_all(&self, user_id: UserID) {
        self.transactions.publish(user_id);
        self.categories.publish(user_id);
        self.goals.publish(user_id);
        self.recurring.publish(user_id);
    }
}

/// Delete every record owned by `user_id` from the four collections.
///
/// Callers should run this inside a SQL transaction together with any other
/// account cleanup so that a failure leaves the account untouched.
pub(crate) fn purge_user_records(user_id: UserID, connection: &Connection) -> Result<(), Error> {
    let user_id = user_id.as_i64();

    connection.execute("DELETE FROM \"transaction\" WHERE user_id = ?1", [user_id])?;
    connection.execute("DELETE FROM category WHERE user_id = ?1", [user_id])?;
    connection.execute("DELETE FROM goal WHERE user_id = ?1", [user_id])?;
    connection.execute("DELETE FROM recurring_template WHERE user_id = ?1", [user_id])?;

    Ok(())
}

#[cfg(test)]
mod collection_tests {
    use std::sync::{Arc, Mutex};

    use time::macros::date;

    use crate::{
        Error, UserID,
        category::{CategoryFields, CategoryKind},
        ledger::purge_user_records,
        test_utils::{must_create_test_ledger, test_category_fields},
        transaction::{Transaction, TransactionType},
        validation::{Amount, Name},
    };

    #[test]
    fn records_are_scoped_to_their_owner() {
        let ledger = must_create_test_ledger();
        let alice = UserID::new(1);
        let bob = UserID::new(2);
        let category = ledger
            .categories()
            .add(alice, test_category_fields("Food", CategoryKind::Expense))
            .unwrap();

        assert_eq!(ledger.categories().list_by_user(bob), Ok(vec![]));
        assert_eq!(
            ledger.categories().delete(bob, category.id),
            Err(Error::DeleteMissingCategory)
        );
        assert_eq!(
            ledger.categories().update(
                bob,
                category.id,
                test_category_fields("Stolen", CategoryKind::Both)
            ),
            Err(Error::UpdateMissingCategory)
        );
        assert_eq!(ledger.categories().list_by_user(alice), Ok(vec![category]));
    }

    #[test]
    fn subscribe_delivers_current_snapshot_then_changes() {
        let ledger = must_create_test_ledger();
        let user_id = UserID::new(1);
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();
        let first = ledger
            .categories()
            .add(user_id, test_category_fields("Salary", CategoryKind::Income))
            .unwrap();

        let subscription = ledger
            .categories()
            .subscribe(user_id, move |categories| {
                sink.lock().unwrap().push(categories.len())
            })
            .unwrap();
        let second = ledger
            .categories()
            .add(user_id, test_category_fields("Bonus", CategoryKind::Income))
            .unwrap();
        ledger.categories().delete(user_id, first.id).unwrap();
        subscription.unsubscribe();
        ledger.categories().delete(user_id, second.id).unwrap();

        assert_eq!(*received.lock().unwrap(), vec![1, 2, 1]);
    }

    #[test]
    fn other_users_mutations_are_not_delivered() {
        let ledger = must_create_test_ledger();
        let received = Arc::new(Mutex::new(0));
        let sink = received.clone();
        let _subscription = ledger
            .categories()
            .subscribe(UserID::new(1), move |_| *sink.lock().unwrap() += 1)
            .unwrap();

        ledger
            .categories()
            .add(
                UserID::new(2),
                CategoryFields {
                    name: Name::new_unchecked("Other"),
                    color: "#000000".to_owned(),
                    kind: CategoryKind::Both,
                },
            )
            .unwrap();

        // Only the initial snapshot.
        assert_eq!(*received.lock().unwrap(), 1);
    }

    #[test]
    fn purge_removes_only_the_users_records() {
        let ledger = must_create_test_ledger();
        let alice = UserID::new(1);
        let bob = UserID::new(2);
        for user_id in [alice, bob] {
            ledger
                .categories()
                .add(user_id, test_category_fields("Food", CategoryKind::Expense))
                .unwrap();
            ledger
                .add_transaction(
                    user_id,
                    Transaction::build(
                        TransactionType::Expense,
                        Amount::new(10.0).unwrap(),
                        date!(2025 - 03 - 01),
                        "Lunch",
                        1,
                    ),
                )
                .unwrap();
        }

        purge_user_records(alice, &ledger.connection().unwrap()).unwrap();

        assert_eq!(ledger.categories().list_by_user(alice), Ok(vec![]));
        assert_eq!(ledger.transactions().list_by_user(alice), Ok(vec![]));
        assert_eq!(ledger.categories().list_by_user(bob).unwrap().len(), 1);
        assert_eq!(ledger.transactions().list_by_user(bob).unwrap().len(), 1);
    }
}
