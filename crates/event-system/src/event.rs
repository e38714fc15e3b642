//! Event payload trait and lineage declarations.
//!
//! Every payload type posted to the bus implements [`Event`] and declares a
//! [`Lineage`]: the ordered list of fully-qualified type names it answers to.
//! The lineage replaces the original runtime reflection walk over base
//! classes and interfaces with an explicit per-type table, which keeps
//! dispatch deterministic and portable.

use std::any::Any;
use std::rc::{Rc, Weak};

/// Ordered list of type names an event type answers to.
///
/// The first entry is the type's own fully-qualified name; every further
/// entry is an ancestor or capability name. Lineages compose: a derived type
/// starts with its own name and appends its parent's lineage, so the whole
/// hierarchy is walked at declaration time rather than via reflection.
///
/// Duplicate names are tolerated (a diamond of capabilities can reach the
/// same name twice); the registry dedupes while preserving first-occurrence
/// order. Universal root types (`object` equivalents) are simply never
/// declared.
///
/// # Example
///
/// ```
/// use event_system::Lineage;
///
/// fn game_event() -> Lineage {
///     Lineage::of("demo::GameEvent")
/// }
///
/// let damaged = Lineage::of("demo::Damaged").extends(game_event());
/// assert_eq!(damaged.names(), ["demo::Damaged", "demo::GameEvent"]);
/// ```
#[derive(Debug, Clone)]
pub struct Lineage {
    names: Vec<&'static str>,
}

impl Lineage {
    /// Starts a lineage with the type's own fully-qualified name.
    pub fn of(name: &'static str) -> Self {
        Self { names: vec![name] }
    }

    /// Appends a parent or capability lineage after this type's own names.
    pub fn extends(mut self, parent: Lineage) -> Self {
        self.names.extend(parent.names);
        self
    }

    /// The declared names, own name first.
    pub fn names(&self) -> &[&'static str] {
        &self.names
    }
}

/// A payload that can be posted to the bus.
///
/// Payloads are constructed by the producer immediately before posting and
/// must not be mutated after handoff; the bus owns them transiently (queue or
/// dispatch stack) and drops them after delivery.
pub trait Event: Any {
    /// The lineage of type names this event answers to, own name first.
    fn lineage() -> Lineage
    where
        Self: Sized;

    /// Identity of the producer, if the payload carries one.
    ///
    /// The bus never stores or upgrades this; it exists so consumers can
    /// distinguish senders without the bus keeping anything alive.
    fn sender(&self) -> Option<&SenderRef> {
        None
    }
}

impl dyn Event {
    /// Downcasts to a concrete event type.
    pub fn downcast_ref<E: Event>(&self) -> Option<&E> {
        (self as &dyn Any).downcast_ref::<E>()
    }

    /// Returns `true` if the concrete payload is an `E`.
    pub fn is<E: Event>(&self) -> bool {
        (self as &dyn Any).is::<E>()
    }
}

/// Weak, identity-only reference to the object that produced an event.
///
/// Holding one never keeps the sender alive.
#[derive(Clone)]
pub struct SenderRef(Weak<dyn Any>);

impl SenderRef {
    /// Captures the identity of a shared sender.
    pub fn new<T: Any>(sender: &Rc<T>) -> Self {
        // Bind as `Weak<T>` first; the unsize coercion happens at the
        // constructor call.
        let weak: Weak<T> = Rc::downgrade(sender);
        Self(weak)
    }

    /// Attempts to recover the sender, if it is still alive.
    pub fn upgrade(&self) -> Option<Rc<dyn Any>> {
        self.0.upgrade()
    }

    /// Returns `true` if this reference identifies `other`.
    pub fn is_sender<T: Any>(&self, other: &Rc<T>) -> bool {
        match self.0.upgrade() {
            Some(alive) => std::ptr::addr_eq(Rc::as_ptr(&alive), Rc::as_ptr(other)),
            None => false,
        }
    }
}

impl std::fmt::Debug for SenderRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = if self.0.strong_count() > 0 {
            "alive"
        } else {
            "dropped"
        };
        write!(f, "SenderRef({state})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Base;
    impl Event for Base {
        fn lineage() -> Lineage {
            Lineage::of("tests::Base")
        }
    }

    struct Derived;
    impl Event for Derived {
        fn lineage() -> Lineage {
            Lineage::of("tests::Derived").extends(Base::lineage())
        }
    }

    #[test]
    fn lineage_composes_own_name_first() {
        let lineage = Derived::lineage();
        assert_eq!(lineage.names(), ["tests::Derived", "tests::Base"]);
    }

    #[test]
    fn dyn_downcast_recovers_concrete_type() {
        let boxed: Box<dyn Event> = Box::new(Derived);
        assert!(boxed.is::<Derived>());
        assert!(!boxed.is::<Base>());
        assert!(boxed.downcast_ref::<Derived>().is_some());
    }

    #[test]
    fn sender_ref_is_identity_only() {
        let producer = Rc::new(42u32);
        let sender = SenderRef::new(&producer);
        assert!(sender.is_sender(&producer));
        assert!(sender.upgrade().is_some());

        drop(producer);
        assert!(sender.upgrade().is_none());
    }
}
