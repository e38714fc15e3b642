//! The notification event bus.
//!
//! Owns the pending-event queue, the subscription registry, and the type-hash
//! cache. All state lives behind `RefCell` so that handlers can re-enter the
//! bus (post, subscribe, unsubscribe) while a dispatch is in progress; no
//! borrow is held across a callback invocation.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use crate::error::FlushError;
use crate::event::Event;
use crate::registry::{TypeHash, TypeRegistry};
use crate::subscription::EventSubscription;

/// Default cap on events dispatched by a single [`EventBus::flush`].
pub const DEFAULT_FLUSH_CAP: usize = 10_000;

struct Queued {
    event: Box<dyn Event>,
    hashes: Rc<[TypeHash]>,
}

/// Publish/subscribe hub with priority ordering and lineage-aware dispatch.
///
/// Expected call pattern over a host tick: any number of `subscribe`,
/// `unsubscribe` and `post_event` calls, then exactly one `flush` at a fixed
/// point in the frame. `post_event_instantly` bypasses the queue for
/// must-happen-now notifications.
pub struct EventBus {
    queue: RefCell<VecDeque<Queued>>,
    subscriptions: RefCell<HashMap<TypeHash, Vec<EventSubscription>>>,
    registry: RefCell<TypeRegistry>,
    flush_cap: usize,
}

impl EventBus {
    /// Creates a bus with the default flush cap.
    pub fn new() -> Self {
        Self::with_flush_cap(DEFAULT_FLUSH_CAP)
    }

    /// Creates a bus that aborts a flush after `flush_cap` dispatched events.
    pub fn with_flush_cap(flush_cap: usize) -> Self {
        Self {
            queue: RefCell::new(VecDeque::new()),
            subscriptions: RefCell::new(HashMap::new()),
            registry: RefCell::new(TypeRegistry::new()),
            flush_cap,
        }
    }

    /// Registers a subscription and returns the handle to unsubscribe with.
    ///
    /// The bucket for the subscription's type hash is kept in non-increasing
    /// priority order; the insert is a stable binary search, so equal
    /// priorities preserve registration order. Duplicate callbacks are
    /// permitted and deliver independently.
    pub fn subscribe(&self, subscription: EventSubscription) -> EventSubscription {
        let mut subs = self.subscriptions.borrow_mut();
        let bucket = subs.entry(subscription.type_hash()).or_default();
        let index = bucket.partition_point(|s| s.priority() >= subscription.priority());
        bucket.insert(index, subscription.clone());
        subscription
    }

    /// Removes a subscription; silently does nothing if it is not registered.
    pub fn unsubscribe(&self, subscription: &EventSubscription) {
        let mut subs = self.subscriptions.borrow_mut();
        if let Some(bucket) = subs.get_mut(&subscription.type_hash())
            && let Some(index) = bucket.iter().position(|s| s == subscription)
        {
            bucket.remove(index);
        }
    }

    /// Enqueues an event for the next [`flush`](EventBus::flush).
    pub fn post_event<E: Event>(&self, event: E) {
        let hashes = self.registry.borrow_mut().hashes_of::<E>();
        self.queue.borrow_mut().push_back(Queued {
            event: Box::new(event),
            hashes,
        });
    }

    /// Dispatches an event synchronously, bypassing the queue.
    ///
    /// Delivery happens before any earlier-posted but not-yet-flushed event.
    pub fn post_event_instantly<E: Event>(&self, event: E) {
        let hashes = self.registry.borrow_mut().hashes_of::<E>();
        self.dispatch(&event, &hashes);
    }

    /// Drains the queue in FIFO order, returning the number of events
    /// dispatched.
    ///
    /// Events posted by handlers during the flush join the same drain; the
    /// loop runs until the queue is empty rather than snapshotting it once.
    /// If the cap is hit the remaining events stay queued, with the
    /// undispatched head back in front.
    pub fn flush(&self) -> Result<usize, FlushError> {
        let mut dispatched = 0;
        loop {
            let Some(queued) = self.queue.borrow_mut().pop_front() else {
                return Ok(dispatched);
            };
            if dispatched >= self.flush_cap {
                self.queue.borrow_mut().push_front(queued);
                return Err(FlushError::Runaway {
                    dispatched,
                    cap: self.flush_cap,
                });
            }
            self.dispatch(queued.event.as_ref(), &queued.hashes);
            dispatched += 1;
        }
    }

    /// Number of events currently awaiting flush.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Drops every cached type-hash list (the explicit equivalent of the
    /// original's editor-exit cache clear).
    pub fn reset_type_cache(&self) {
        self.registry.borrow_mut().reset();
    }

    /// Delivers one event to every matching subscription.
    ///
    /// Candidate order is deterministic: buckets are concatenated in the
    /// event's lineage order (concrete type first, ancestors after), each
    /// bucket already priority-ordered. There is no global cross-bucket
    /// resort; ordering across different type hashes is the lineage order,
    /// not priority.
    fn dispatch(&self, event: &dyn Event, hashes: &[TypeHash]) {
        // Snapshot the candidates so handlers may mutate the registry.
        let candidates: Vec<EventSubscription> = {
            let subs = self.subscriptions.borrow();
            hashes
                .iter()
                .filter_map(|hash| subs.get(hash))
                .flat_map(|bucket| bucket.iter().cloned())
                .collect()
        };

        if candidates.is_empty() {
            tracing::trace!(target: "event_system", "no subscribers for dispatched event");
            return;
        }

        for subscription in candidates {
            // A handler earlier in this dispatch may have unsubscribed it.
            if !self.is_registered(&subscription) {
                continue;
            }

            let outcome = panic::catch_unwind(AssertUnwindSafe(|| subscription.invoke(event)));
            let delivered = match outcome {
                Ok(delivered) => delivered,
                Err(_) => {
                    tracing::error!(
                        target: "event_system",
                        type_hash = subscription.type_hash().value(),
                        "event handler panicked; continuing with remaining subscribers"
                    );
                    // The callback did receive the event before panicking.
                    true
                }
            };

            // A skipped invocation (typed subscription, other concrete type
            // from the same lineage) is not a delivery and must not consume
            // a fire-once subscription.
            if delivered && subscription.used_once() {
                self.unsubscribe(&subscription);
            }
        }
    }

    fn is_registered(&self, subscription: &EventSubscription) -> bool {
        self.subscriptions
            .borrow()
            .get(&subscription.type_hash())
            .is_some_and(|bucket| bucket.contains(subscription))
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Lineage;
    use std::cell::Cell;

    struct Ping;
    impl Event for Ping {
        fn lineage() -> Lineage {
            Lineage::of("tests::Ping")
        }
    }

    struct Pong;
    impl Event for Pong {
        fn lineage() -> Lineage {
            Lineage::of("tests::Pong")
        }
    }

    #[test]
    fn queued_event_waits_for_flush() {
        let bus = EventBus::new();
        let hits = Rc::new(Cell::new(0));

        let hits_cb = Rc::clone(&hits);
        bus.subscribe(EventSubscription::on(move |_: &Ping| {
            hits_cb.set(hits_cb.get() + 1);
        }));

        bus.post_event(Ping);
        assert_eq!(hits.get(), 0);
        assert_eq!(bus.pending(), 1);

        assert_eq!(bus.flush(), Ok(1));
        assert_eq!(hits.get(), 1);
        assert_eq!(bus.pending(), 0);
    }

    #[test]
    fn instant_post_bypasses_queue() {
        let bus = EventBus::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let log = Rc::clone(&order);
        bus.subscribe(EventSubscription::on(move |_: &Ping| {
            log.borrow_mut().push("queued");
        }));
        let log = Rc::clone(&order);
        bus.subscribe(EventSubscription::on(move |_: &Pong| {
            log.borrow_mut().push("instant");
        }));

        bus.post_event(Ping);
        bus.post_event_instantly(Pong);
        bus.flush().unwrap();

        assert_eq!(*order.borrow(), ["instant", "queued"]);
    }

    #[test]
    fn unsubscribe_of_unknown_subscription_is_a_no_op() {
        let bus = EventBus::new();
        let stray = EventSubscription::on(|_: &Ping| {});
        bus.unsubscribe(&stray);
    }

    #[test]
    fn dispatch_without_subscribers_is_a_no_op() {
        let bus = EventBus::new();
        bus.post_event(Ping);
        assert_eq!(bus.flush(), Ok(1));
    }

    #[test]
    fn events_posted_during_flush_join_the_same_drain() {
        let bus = Rc::new(EventBus::new());
        let hits = Rc::new(Cell::new(0));

        let bus_cb = Rc::clone(&bus);
        bus.subscribe(EventSubscription::on(move |_: &Ping| {
            bus_cb.post_event(Pong);
        }));
        let hits_cb = Rc::clone(&hits);
        bus.subscribe(EventSubscription::on(move |_: &Pong| {
            hits_cb.set(hits_cb.get() + 1);
        }));

        bus.post_event(Ping);
        assert_eq!(bus.flush(), Ok(2));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn runaway_flush_is_capped() {
        let bus = Rc::new(EventBus::with_flush_cap(50));

        let bus_cb = Rc::clone(&bus);
        bus.subscribe(EventSubscription::on(move |_: &Ping| {
            // Re-posts unconditionally: the queue never drains.
            bus_cb.post_event(Ping);
        }));

        bus.post_event(Ping);
        assert_eq!(
            bus.flush(),
            Err(FlushError::Runaway {
                dispatched: 50,
                cap: 50
            })
        );
        assert_eq!(bus.pending(), 1);
    }
}
