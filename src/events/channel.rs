// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Named-event broadcast channel
//!
//! Synchronous dispatch in emission order; subscribers for an event kind are
//! invoked in subscription order. There is no buffering: subscribing after
//! an event has fired never replays it, and emitting with zero subscribers
//! is a silent no-op.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::capture::record::{RequestInfo, ResponseInfo};
use crate::http::target::RequestTarget;
use crate::http::transport::{ResponseHead, Scheme};

/// Subscriber callback type
pub type EventCallback = Arc<dyn Fn(&LogEvent) + Send + Sync>;

/// The four observable moments of a captured request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A request is about to be issued
    Before,
    /// A response head arrived (raw pass-through, pre-finalization)
    Response,
    /// The response was fully drained
    Success,
    /// The exchange failed at some stage
    Error,
}

/// Event payloads handed to subscribers
///
/// `Success` and `Error` carry owned snapshots; the capture session does not
/// mutate fields an already-fired event reported.
#[derive(Debug, Clone)]
pub enum LogEvent {
    Before {
        scheme: Scheme,
        target: RequestTarget,
    },
    Response {
        request: RequestInfo,
        head: ResponseHead,
    },
    Success {
        request: RequestInfo,
        response: ResponseInfo,
    },
    Error {
        request: RequestInfo,
        response: ResponseInfo,
    },
}

impl LogEvent {
    /// Which named event this payload belongs to
    pub fn kind(&self) -> EventKind {
        match self {
            LogEvent::Before { .. } => EventKind::Before,
            LogEvent::Response { .. } => EventKind::Response,
            LogEvent::Success { .. } => EventKind::Success,
            LogEvent::Error { .. } => EventKind::Error,
        }
    }
}

/// Handle for removing a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

struct Subscriber {
    id: u64,
    kind: EventKind,
    once: bool,
    callback: EventCallback,
}

/// Broadcast channel for capture events
#[derive(Clone)]
pub struct EventChannel {
    inner: Arc<Inner>,
}

struct Inner {
    subscribers: RwLock<Vec<Subscriber>>,
    next_id: RwLock<u64>,
}

impl Default for EventChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl EventChannel {
    /// Create an empty channel
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                subscribers: RwLock::new(Vec::new()),
                next_id: RwLock::new(0),
            }),
        }
    }

    /// Subscribe to an event kind
    pub fn on(&self, kind: EventKind, callback: EventCallback) -> SubscriptionId {
        self.subscribe(kind, callback, false)
    }

    /// Subscribe to an event kind for a single delivery
    pub fn once(&self, kind: EventKind, callback: EventCallback) -> SubscriptionId {
        self.subscribe(kind, callback, true)
    }

    /// Remove a subscription; returns false when it was already gone
    pub fn off(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.inner.subscribers.write();
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id.0);
        subscribers.len() != before
    }

    /// Dispatch an event to every matching subscriber, in subscription order
    ///
    /// Callbacks run outside the subscriber-list lock, so they may
    /// subscribe or unsubscribe reentrantly.
    pub fn emit(&self, event: &LogEvent) {
        let kind = event.kind();
        let callbacks: Vec<EventCallback> = {
            let mut subscribers = self.inner.subscribers.write();
            let matched: Vec<EventCallback> = subscribers
                .iter()
                .filter(|s| s.kind == kind)
                .map(|s| Arc::clone(&s.callback))
                .collect();
            subscribers.retain(|s| !(s.once && s.kind == kind));
            matched
        };
        for callback in callbacks {
            callback(event);
        }
    }

    /// Number of live subscriptions for an event kind
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.inner
            .subscribers
            .read()
            .iter()
            .filter(|s| s.kind == kind)
            .count()
    }

    fn subscribe(&self, kind: EventKind, callback: EventCallback, once: bool) -> SubscriptionId {
        let id = {
            let mut next = self.inner.next_id.write();
            *next += 1;
            *next
        };
        self.inner.subscribers.write().push(Subscriber {
            id,
            kind,
            once,
            callback,
        });
        SubscriptionId(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn error_event() -> LogEvent {
        LogEvent::Error {
            request: RequestInfo::default(),
            response: ResponseInfo::default(),
        }
    }

    fn success_event() -> LogEvent {
        LogEvent::Success {
            request: RequestInfo::default(),
            response: ResponseInfo::default(),
        }
    }

    #[test]
    fn test_dispatch_in_subscription_order() {
        let channel = EventChannel::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let seen = Arc::clone(&seen);
            channel.on(
                EventKind::Success,
                Arc::new(move |_| seen.lock().push(tag)),
            );
        }

        channel.emit(&success_event());
        assert_eq!(*seen.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_once_fires_single_delivery() {
        let channel = EventChannel::new();
        let count = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&count);
        channel.once(EventKind::Error, Arc::new(move |_| *counter.lock() += 1));

        channel.emit(&error_event());
        channel.emit(&error_event());
        assert_eq!(*count.lock(), 1);
        assert_eq!(channel.subscriber_count(EventKind::Error), 0);
    }

    #[test]
    fn test_off_removes_subscription() {
        let channel = EventChannel::new();
        let count = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&count);
        let id = channel.on(EventKind::Success, Arc::new(move |_| *counter.lock() += 1));

        assert!(channel.off(id));
        assert!(!channel.off(id));
        channel.emit(&success_event());
        assert_eq!(*count.lock(), 0);
    }

    #[test]
    fn test_emit_without_subscribers_is_noop() {
        let channel = EventChannel::new();
        channel.emit(&success_event());
    }

    #[test]
    fn test_kind_filtering() {
        let channel = EventChannel::new();
        let count = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&count);
        channel.on(EventKind::Error, Arc::new(move |_| *counter.lock() += 1));

        channel.emit(&success_event());
        assert_eq!(*count.lock(), 0);
        channel.emit(&error_event());
        assert_eq!(*count.lock(), 1);
    }

    #[test]
    fn test_no_replay_for_late_subscribers() {
        let channel = EventChannel::new();
        channel.emit(&success_event());

        let count = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&count);
        channel.on(EventKind::Success, Arc::new(move |_| *counter.lock() += 1));
        assert_eq!(*count.lock(), 0);
    }

    #[test]
    fn test_reentrant_unsubscribe_from_callback() {
        let channel = EventChannel::new();
        let channel2 = channel.clone();
        let slot: Arc<Mutex<Option<SubscriptionId>>> = Arc::new(Mutex::new(None));
        let slot2 = Arc::clone(&slot);

        let id = channel.on(
            EventKind::Success,
            Arc::new(move |_| {
                if let Some(id) = slot2.lock().take() {
                    channel2.off(id);
                }
            }),
        );
        *slot.lock() = Some(id);

        channel.emit(&success_event());
        assert_eq!(channel.subscriber_count(EventKind::Success), 0);
    }
}
