//! Server-sent events that push collection snapshots to the signed-in user.
//!
//! On connect the client receives the current snapshot of each of its four
//! collections. Afterwards, every change to a collection sends that
//! collection's new snapshot. Each event is named after its collection.

use std::{
    convert::Infallible,
    pin::Pin,
    task::{Context, Poll},
};

use axum::{
    Extension,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio_stream::{Stream, StreamExt, wrappers::UnboundedReceiverStream};

use crate::{
    Error, UserID,
    ledger::{Collection, Ledger, Record, Subscription},
};

/// A snapshot of one collection, ready to be sent to the client.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotEvent {
    /// The collection name, e.g. "transactions".
    pub name: &'static str,
    /// The whole collection as a JSON array.
    pub data: Value,
}

/// The snapshots for a user, in the order the collections changed.
///
/// The subscriptions live as long as the stream, so dropping the stream
/// when the client disconnects stops the snapshots.
pub struct SnapshotStream {
    snapshots: UnboundedReceiverStream<SnapshotEvent>,
    _subscriptions: Vec<Subscription>,
}

impl Stream for SnapshotStream {
    type Item = SnapshotEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.get_mut().snapshots).poll_next(cx)
    }
}

/// Subscribe to all of `user_id`'s collections.
///
/// The current snapshots are queued before this function returns.
///
/// # Errors
/// Returns an error if a collection could not be read.
pub fn snapshot_stream(ledger: &Ledger, user_id: UserID) -> Result<SnapshotStream, Error> {
    let (sender, receiver) = mpsc::unbounded_channel();

    let subscriptions = vec![
        forward_snapshots(ledger.transactions(), "transactions", user_id, sender.clone())?,
        forward_snapshots(ledger.categories(), "categories", user_id, sender.clone())?,
        forward_snapshots(ledger.goals(), "goals", user_id, sender.clone())?,
        forward_snapshots(ledger.recurring(), "recurring", user_id, sender)?,
    ];

    Ok(SnapshotStream {
        snapshots: UnboundedReceiverStream::new(receiver),
        _subscriptions: subscriptions,
    })
}

fn forward_snapshots<R: Record + Serialize>(
    collection: &Collection<R>,
    name: &'static str,
    user_id: UserID,
    sender: UnboundedSender<SnapshotEvent>,
) -> Result<Subscription, Error> {
    collection.subscribe(user_id, move |records: &[R]| {
        let data = match serde_json::to_value(records) {
            Ok(data) => data,
            Err(error) => {
                tracing::error!("Could not serialize {name} snapshot for user {user_id}: {error}");
                return;
            }
        };

        // The receiver is gone once the client disconnects.
        let _ = sender.send(SnapshotEvent { name, data });
    })
}

/// Stream the signed-in user's collection snapshots as server-sent events.
pub async fn events_endpoint(
    State(ledger): State<Ledger>,
    Extension(user_id): Extension<UserID>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, Error> {
    let snapshots = snapshot_stream(&ledger, user_id)?;
    tracing::debug!("User {user_id} subscribed to collection snapshots");

    let events = snapshots.map(|snapshot| {
        Ok::<_, Infallible>(
            Event::default()
                .event(snapshot.name)
                .data(snapshot.data.to_string()),
        )
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::new()))
}
