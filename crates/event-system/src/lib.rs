//! Priority-ordered notification event bus with lineage-aware dispatch.
//!
//! Producers post event payloads to an [`EventBus`]; consumers register an
//! [`EventSubscription`] against an event type and receive callbacks either
//! when the host flushes the queue (batched, once per tick) or immediately
//! via the instant path. Dispatch is polymorphic: every event type declares a
//! [`Lineage`] of type names (itself plus its ancestors and capabilities), and
//! a subscription registered against an ancestor name also receives derived
//! events.
//!
//! # Design
//!
//! - **Explicit instance, no singleton**: construct an [`EventBus`] and pass
//!   it to whoever needs it. Single-instance-per-process is a host decision,
//!   not a library one.
//! - **Single-threaded tick model**: all calls are expected on one logical
//!   thread (the host's per-frame update). The bus uses `Rc`/`RefCell`
//!   internally and is deliberately not `Send`; handlers may re-enter the bus
//!   (subscribe, unsubscribe, post) during dispatch.
//! - **Stable hashing**: type names are hashed with a SHA-256 truncation
//!   ([`TypeHash`]), never with `std::hash`, so hashes are stable across runs
//!   and processes.
//!
//! # Example
//!
//! ```
//! use event_system::{Event, EventBus, EventSubscription, Lineage};
//!
//! struct Damaged { amount: u32 }
//!
//! impl Event for Damaged {
//!     fn lineage() -> Lineage {
//!         Lineage::of("demo::Damaged")
//!     }
//! }
//!
//! let bus = EventBus::new();
//! bus.subscribe(EventSubscription::on(|ev: &Damaged| {
//!     assert_eq!(ev.amount, 7);
//! }));
//! bus.post_event(Damaged { amount: 7 });
//! bus.flush().unwrap();
//! ```

pub mod bus;
pub mod error;
pub mod event;
pub mod registry;
pub mod subscription;

// Re-export core types for ergonomic API
pub use bus::EventBus;
pub use error::FlushError;
pub use event::{Event, Lineage, SenderRef};
pub use registry::{TypeHash, TypeRegistry};
pub use subscription::EventSubscription;
