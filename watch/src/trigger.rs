//! Notification trigger.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::error::{SinkClosed, WatchResult};
use crate::event::WatchEvent;

/// A consumer of committed change events.
pub trait WatchSink: Send + Sync {
    /// Deliver one event. Must not block.
    fn deliver(&self, event: &WatchEvent) -> WatchResult<()>;
}

/// Sink that forwards events into an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: Sender<WatchEvent>,
}

impl ChannelSink {
    /// Create a sink and the receiver its events arrive on.
    pub fn new() -> (Self, Receiver<WatchEvent>) {
        let (sender, receiver) = channel::unbounded();
        (Self { sender }, receiver)
    }
}

impl WatchSink for ChannelSink {
    fn deliver(&self, event: &WatchEvent) -> WatchResult<()> {
        self.sender.send(event.clone()).map_err(|_| SinkClosed)
    }
}

/// In-memory sink that keeps every event it sees.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<WatchEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all recorded events, in delivery order.
    pub fn events(&self) -> Vec<WatchEvent> {
        self.events.lock().clone()
    }

    /// Remove and return all recorded events.
    pub fn drain(&self) -> Vec<WatchEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl WatchSink for RecordingSink {
    fn deliver(&self, event: &WatchEvent) -> WatchResult<()> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}

/// Fans committed change events out to the registered sinks.
///
/// `fire` is called by the executor while it still holds the namespace
/// serialization point, so every sink sees batches in commit order.
#[derive(Default)]
pub struct NotificationTrigger {
    sinks: Mutex<Vec<Arc<dyn WatchSink>>>,
    fired: AtomicU64,
}

impl NotificationTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sink.
    pub fn add_sink(&self, sink: Arc<dyn WatchSink>) {
        self.sinks.lock().push(sink);
    }

    /// Register a channel sink and return its receiver. The sink is
    /// dropped on the first delivery after the receiver goes away.
    pub fn subscribe(&self) -> Receiver<WatchEvent> {
        let (sink, receiver) = ChannelSink::new();
        self.add_sink(Arc::new(sink));
        receiver
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.lock().len()
    }

    /// Total number of events fired so far.
    pub fn fired(&self) -> u64 {
        self.fired.load(Ordering::Relaxed)
    }

    /// Deliver `events`, in order, to every sink.
    pub fn fire(&self, events: &[WatchEvent]) {
        if events.is_empty() {
            return;
        }

        let mut sinks = self.sinks.lock();
        let before = sinks.len();
        sinks.retain(|sink| {
            events.iter().all(|event| {
                trace!(%event, "delivering watch event");
                sink.deliver(event).is_ok()
            })
        });
        if sinks.len() < before {
            debug!(dropped = before - sinks.len(), "dropped closed watch sinks");
        }
        self.fired.fetch_add(events.len() as u64, Ordering::Relaxed);
    }
}

impl std::fmt::Debug for NotificationTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationTrigger")
            .field("sinks", &self.sink_count())
            .field("fired", &self.fired())
            .finish()
    }
}
