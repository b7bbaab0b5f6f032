//! Per-lobby event broadcast with replay-latest semantics.
//!
//! Each lobby owns one [`EventChannel`]. Publishers (the registry at
//! creation, the simulation loop per turn) push [`LobbyEvent`]s in; any
//! number of subscribers consume them at their own pace through
//! independent unbounded queues, so a stalled SSE connection never slows
//! the publisher or another subscriber.

use std::pin::Pin;
use std::sync::{Mutex, PoisonError};
use std::task::{Context, Poll};

use futures_util::Stream;
use skirmish_protocol::LobbyEvent;
use tokio::sync::mpsc;

/// Multicast channel for one lobby's events.
///
/// Holds the most recently published event so late joiners start their
/// stream with it (replay-latest), plus the live subscriber sinks.
/// Created together with its lobby and disposed when the lobby is
/// removed.
#[derive(Debug, Default)]
pub struct EventChannel {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    last: Option<LobbyEvent>,
    sinks: Vec<mpsc::UnboundedSender<LobbyEvent>>,
    closed: bool,
}

impl EventChannel {
    /// Creates an open channel with no history and no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes an event to every live subscriber.
    ///
    /// Updates the replay cell first, then fans out. Dead sinks
    /// (subscriber dropped its stream) are pruned as a side effect.
    /// Publishing on a disposed channel is a silent no-op.
    ///
    /// Publishers serialize on the internal lock, which is what gives
    /// every subscriber the same observed order. Delivery itself is a
    /// non-blocking push into each subscriber's own queue.
    pub fn publish(&self, event: LobbyEvent) {
        let mut inner = self.lock();
        if inner.closed {
            tracing::trace!(kind = event.kind(), "publish on disposed channel dropped");
            return;
        }
        inner.last = Some(event.clone());
        inner.sinks.retain(|sink| sink.send(event.clone()).is_ok());
    }

    /// Registers a new subscriber and returns its stream.
    ///
    /// If an event has been published before, the stream begins with the
    /// most recent one, then every event published thereafter, in order.
    /// Subscribing to a disposed channel yields the final event (if any)
    /// and then immediately completes, so a subscriber that lost the race
    /// with teardown can still read the terminal frame.
    pub fn subscribe(&self) -> EventStream {
        let mut inner = self.lock();
        let (tx, rx) = mpsc::unbounded_channel();
        if let Some(last) = &inner.last {
            // Cannot fail: we hold the only sender and rx is alive.
            let _ = tx.send(last.clone());
        }
        if !inner.closed {
            inner.sinks.push(tx);
        }
        EventStream { rx }
    }

    /// Closes the channel. Idempotent.
    ///
    /// Active streams complete (without error) once they drain whatever
    /// is already queued; subsequent publishes are dropped.
    pub fn dispose(&self) {
        let mut inner = self.lock();
        if !inner.closed {
            inner.closed = true;
            inner.sinks.clear();
            tracing::debug!("event channel disposed");
        }
    }

    /// Whether [`dispose`](Self::dispose) has been called.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// The most recently published event, if any.
    pub fn last_event(&self) -> Option<LobbyEvent> {
        self.lock().last.clone()
    }

    /// Number of currently registered subscriber sinks.
    ///
    /// Dropped subscribers are only pruned on publish, so this may
    /// overcount between publishes.
    pub fn subscriber_count(&self) -> usize {
        self.lock().sinks.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The subscriber half of an [`EventChannel`].
///
/// A lazy, finite sequence: it yields events in publish order and
/// terminates once the channel is disposed and the backlog is drained.
/// Also implements [`Stream`] so transports (SSE, WebSocket) can drive it
/// with their usual combinators.
#[derive(Debug)]
pub struct EventStream {
    rx: mpsc::UnboundedReceiver<LobbyEvent>,
}

impl EventStream {
    /// Waits for the next event. Returns `None` once the channel has been
    /// disposed and all queued events have been consumed.
    pub async fn recv(&mut self) -> Option<LobbyEvent> {
        self.rx.recv().await
    }

    /// Non-blocking variant of [`recv`](Self::recv); `None` when nothing
    /// is currently queued or the stream has terminated.
    pub fn try_next(&mut self) -> Option<LobbyEvent> {
        self.rx.try_recv().ok()
    }
}

impl Stream for EventStream {
    type Item = LobbyEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}
