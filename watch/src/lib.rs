//! Arbor Watch Trigger
//!
//! Commit-time change events for the (external) watch-delivery subsystem.
//!
//! Responsibilities:
//! - Describe a committed change as a (path, kind, zxid) event
//! - Fan events out to registered sinks, in commit order
//! - Drop sinks whose consumer has gone away

mod error;
mod event;
mod trigger;

pub use error::{SinkClosed, WatchResult};
pub use event::{EventKind, WatchEvent};
pub use trigger::{ChannelSink, NotificationTrigger, RecordingSink, WatchSink};
