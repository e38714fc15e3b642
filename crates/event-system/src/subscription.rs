//! Subscription handles.
//!
//! A subscription pairs a callback with the hash of the event type it listens
//! for, a priority, and a fire-once flag. Handles are cheaply cloneable and
//! compare by callback identity: the clone returned from
//! [`EventBus::subscribe`](crate::EventBus::subscribe) is the token a
//! consumer later passes to `unsubscribe`.

use std::rc::Rc;

use crate::event::Event;
use crate::registry::TypeHash;

/// The erased callback returns whether it actually delivered the event;
/// a typed callback skips (returns `false`) when the concrete payload is
/// another type from the same lineage.
struct Inner {
    callback: Box<dyn Fn(&dyn Event) -> bool>,
    used_once: bool,
    priority: i32,
    type_hash: TypeHash,
}

/// A registered (or registerable) listener for one event type hash.
///
/// Two handles are equal iff they share the same inner allocation, which is
/// the Rust rendition of "equality is callback identity". Subscribing the
/// same closure through two separately constructed handles yields two
/// independent subscriptions and two deliveries.
#[derive(Clone)]
pub struct EventSubscription {
    inner: Rc<Inner>,
}

impl EventSubscription {
    /// Exact-type subscription: fires only when the posted payload's concrete
    /// type is `E`.
    ///
    /// A descendant event reaching `E`'s bucket through its lineage cannot be
    /// viewed as an `E` (Rust has no data inheritance), so it is skipped with
    /// a warning; listen with [`EventSubscription::broad`] to observe a whole
    /// lineage subtree.
    pub fn typed<E: Event>(
        callback: impl Fn(&E) + 'static,
        priority: i32,
        used_once: bool,
    ) -> Self {
        let erased = move |event: &dyn Event| match event.downcast_ref::<E>() {
            Some(concrete) => {
                callback(concrete);
                true
            }
            None => {
                tracing::warn!(
                    target: "event_system",
                    "typed subscription skipped a lineage-matched event of another concrete type"
                );
                false
            }
        };
        Self::from_parts(Box::new(erased), TypeHash::of::<E>(), priority, used_once)
    }

    /// Lineage subscription: registered on `E`'s own hash, so it fires for
    /// `E` and for every event whose lineage declares `E`'s name. The
    /// callback receives the type-erased payload and may downcast as needed.
    pub fn broad<E: Event>(
        callback: impl Fn(&dyn Event) + 'static,
        priority: i32,
        used_once: bool,
    ) -> Self {
        let erased = move |event: &dyn Event| {
            callback(event);
            true
        };
        Self::from_parts(Box::new(erased), TypeHash::of::<E>(), priority, used_once)
    }

    /// Convenience for the common case: exact-type, priority 0, fires every
    /// time.
    pub fn on<E: Event>(callback: impl Fn(&E) + 'static) -> Self {
        Self::typed(callback, 0, false)
    }

    /// Convenience: exact-type, priority 0, removed after the first delivery.
    pub fn once<E: Event>(callback: impl Fn(&E) + 'static) -> Self {
        Self::typed(callback, 0, true)
    }

    fn from_parts(
        callback: Box<dyn Fn(&dyn Event) -> bool>,
        type_hash: TypeHash,
        priority: i32,
        used_once: bool,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                callback,
                used_once,
                priority,
                type_hash,
            }),
        }
    }

    /// Hash of the event type this subscription is registered against.
    pub fn type_hash(&self) -> TypeHash {
        self.inner.type_hash
    }

    /// Higher priorities are invoked earlier within a bucket.
    pub fn priority(&self) -> i32 {
        self.inner.priority
    }

    /// Whether the subscription is removed after its first delivery.
    pub fn used_once(&self) -> bool {
        self.inner.used_once
    }

    /// Invokes the callback; `false` means the event was skipped rather
    /// than delivered (a fire-once subscription must not be consumed).
    pub(crate) fn invoke(&self, event: &dyn Event) -> bool {
        (self.inner.callback)(event)
    }
}

impl PartialEq for EventSubscription {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for EventSubscription {}

impl std::fmt::Debug for EventSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSubscription")
            .field("type_hash", &self.inner.type_hash)
            .field("priority", &self.inner.priority)
            .field("used_once", &self.inner.used_once)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Lineage;

    struct Ping;
    impl Event for Ping {
        fn lineage() -> Lineage {
            Lineage::of("tests::Ping")
        }
    }

    #[test]
    fn clones_are_equal_fresh_handles_are_not() {
        let a = EventSubscription::on(|_: &Ping| {});
        let b = a.clone();
        let c = EventSubscription::on(|_: &Ping| {});

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    struct Pong;
    impl Event for Pong {
        fn lineage() -> Lineage {
            Lineage::of("tests::Pong").extends(Ping::lineage())
        }
    }

    #[test]
    fn invoke_reports_whether_it_delivered() {
        let typed = EventSubscription::on(|_: &Ping| {});
        assert!(typed.invoke(&Ping));
        // Same lineage, different concrete type: skipped, not delivered.
        assert!(!typed.invoke(&Pong));

        let broad = EventSubscription::broad::<Ping>(|_| {}, 0, false);
        assert!(broad.invoke(&Pong));
    }

    #[test]
    fn typed_subscription_carries_own_hash() {
        let sub = EventSubscription::typed(|_: &Ping| {}, 3, true);
        assert_eq!(sub.type_hash(), TypeHash::of::<Ping>());
        assert_eq!(sub.priority(), 3);
        assert!(sub.used_once());
    }
}
