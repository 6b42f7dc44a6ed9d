//! Synchronous publish/subscribe for [`GameEvent`]s.
//!
//! Handlers run on the publishing thread, in subscription order, before
//! `publish` returns. A panicking handler is logged and skipped; the
//! remaining handlers still see the event.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use serde::{Deserialize, Serialize};

use crate::events::{EventKind, GameEvent};

/// Which events a subscription receives.
pub enum EventFilter {
    /// Every event.
    All,
    /// Events of one kind.
    Kind(EventKind),
    /// Events the predicate accepts.
    Predicate(Box<dyn Fn(&GameEvent) -> bool>),
}

impl EventFilter {
    /// Filter from a closure.
    pub fn predicate(f: impl Fn(&GameEvent) -> bool + 'static) -> Self {
        EventFilter::Predicate(Box::new(f))
    }

    /// Whether `event` passes the filter.
    #[must_use]
    pub fn matches(&self, event: &GameEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Kind(kind) => event.kind() == *kind,
            EventFilter::Predicate(f) => f(event),
        }
    }
}

impl From<EventKind> for EventFilter {
    fn from(kind: EventKind) -> Self {
        EventFilter::Kind(kind)
    }
}

impl fmt::Debug for EventFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventFilter::All => f.write_str("All"),
            EventFilter::Kind(kind) => f.debug_tuple("Kind").field(kind).finish(),
            EventFilter::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriptionId(pub u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

struct Subscription {
    id: SubscriptionId,
    filter: EventFilter,
    handler: Box<dyn FnMut(&GameEvent)>,
}

/// In-process event bus.
#[derive(Default)]
pub struct EventBus {
    subscriptions: Vec<Subscription>,
    next_id: u64,
}

impl EventBus {
    /// Bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for events passing `filter`.
    pub fn subscribe(
        &mut self,
        filter: impl Into<EventFilter>,
        handler: impl FnMut(&GameEvent) + 'static,
    ) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.subscriptions.push(Subscription {
            id,
            filter: filter.into(),
            handler: Box::new(handler),
        });
        id
    }

    /// Drop a subscription. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    /// Deliver `event` to every matching subscriber.
    ///
    /// Returns how many handlers completed without panicking.
    pub fn publish(&mut self, event: &GameEvent) -> usize {
        let mut delivered = 0;
        for sub in &mut self.subscriptions {
            if !sub.filter.matches(event) {
                continue;
            }
            let handler = &mut sub.handler;
            match catch_unwind(AssertUnwindSafe(|| handler(event))) {
                Ok(()) => delivered += 1,
                Err(payload) => {
                    let message = payload
                        .downcast_ref::<&str>()
                        .map(|s| (*s).to_string())
                        .or_else(|| payload.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "non-string panic".to_string());
                    tracing::error!(
                        subscription = %sub.id,
                        event = %event.kind(),
                        %message,
                        "event handler panicked"
                    );
                }
            }
        }
        delivered
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Whether nobody is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field(
                "subscriptions",
                &self.subscriptions.iter().map(|s| s.id).collect::<Vec<_>>(),
            )
            .finish()
    }
}
