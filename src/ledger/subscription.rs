//! Push-based snapshot subscriptions.
//!
//! Listeners register a callback per user and receive the user's whole
//! collection every time it changes. The returned [Subscription] cancels the
//! registration when dropped.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
};

use crate::UserID;

type Callback<T> = Arc<dyn Fn(&[T]) + Send + Sync>;

struct Listeners<T> {
    next_id: u64,
    by_user: HashMap<UserID, Vec<(u64, Callback<T>)>>,
}

impl<T> Listeners<T> {
    fn remove(&mut self, user_id: UserID, listener_id: u64) {
        if let Some(callbacks) = self.by_user.get_mut(&user_id) {
            callbacks.retain(|(id, _)| *id != listener_id);

            if callbacks.is_empty() {
                self.by_user.remove(&user_id);
            }
        }
    }
}

/// Fans out collection snapshots to the listeners registered for each user.
pub struct SnapshotHub<T> {
    listeners: Arc<Mutex<Listeners<T>>>,
    /// Serializes snapshot delivery so listeners never see an older snapshot after a newer one.
    delivery: Arc<Mutex<()>>,
}

impl<T> Clone for SnapshotHub<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: self.listeners.clone(),
            delivery: self.delivery.clone(),
        }
    }
}

impl<T> Default for SnapshotHub<T> {
    fn default() -> Self {
        Self {
            listeners: Arc::new(Mutex::new(Listeners {
                next_id: 0,
                by_user: HashMap::new(),
            })),
            delivery: Arc::new(Mutex::new(())),
        }
    }
}

impl<T: Send + Sync + 'static> SnapshotHub<T> {
    /// Register `callback` for `user_id`'s snapshots.
    pub fn register(
        &self,
        user_id: UserID,
        callback: impl Fn(&[T]) + Send + Sync + 'static,
    ) -> Subscription {
        let listener_id = {
            let mut listeners = lock(&self.listeners);
            let listener_id = listeners.next_id;
            listeners.next_id += 1;
            listeners
                .by_user
                .entry(user_id)
                .or_default()
                .push((listener_id, Arc::new(callback)));
            listener_id
        };

        let listeners: Weak<Mutex<Listeners<T>>> = Arc::downgrade(&self.listeners);

        Subscription::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                lock(&listeners).remove(user_id, listener_id);
            }
        })
    }

    /// Whether anyone is listening to `user_id`'s snapshots.
    pub fn has_listeners(&self, user_id: UserID) -> bool {
        lock(&self.listeners).by_user.contains_key(&user_id)
    }

    /// Hold the delivery lock while reading and delivering a snapshot.
    ///
    /// Callbacks are invoked with this lock held, so they must not publish to the same hub.
    pub fn begin_delivery(&self) -> MutexGuard<'_, ()> {
        lock(&self.delivery)
    }

    /// Send `snapshot` to every listener registered for `user_id`.
    ///
    /// The listener lock is released before the callbacks run.
    pub fn notify(&self, user_id: UserID, snapshot: &[T]) {
        let callbacks: Vec<Callback<T>> = match lock(&self.listeners).by_user.get(&user_id) {
            Some(callbacks) => callbacks.iter().map(|(_, callback)| callback.clone()).collect(),
            None => return,
        };

        for callback in callbacks {
            callback(snapshot);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // The listener map is valid even if a callback panicked while it was held.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A handle to an active snapshot subscription.
///
/// Dropping the handle unsubscribes the listener.
#[must_use = "dropping a subscription immediately unsubscribes it"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    fn new(unsubscribe: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// Stop receiving snapshots.
    pub fn unsubscribe(mut self) {
        self.cancel();
    }

    fn cancel(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}
