//! Stable type-name hashing and the per-bus hash cache.
//!
//! Dispatch matches subscriptions to events by integer hashes of
//! fully-qualified type names. The hash must be stable within a process (and
//! is, in fact, stable across processes): `std::hash` gives no such
//! guarantee, so names are digested with SHA-256 and truncated to 64 bits.
//! Collision probability at that width is negligible for any realistic set
//! of event types.

use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use sha2::{Digest, Sha256};

use crate::event::{Event, Lineage};

/// Stable 64-bit identifier for a fully-qualified type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeHash(u64);

impl TypeHash {
    /// Hashes a fully-qualified type name.
    pub fn of_name(name: &str) -> Self {
        let digest = Sha256::digest(name.as_bytes());
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        Self(u64::from_be_bytes(prefix))
    }

    /// The hash of an event type's own name (the first lineage entry).
    pub fn of<E: Event>() -> Self {
        let lineage = E::lineage();
        let own = lineage
            .names()
            .first()
            .copied()
            .expect("event lineage must declare at least the type's own name");
        Self::of_name(own)
    }

    /// Raw hash value, for diagnostics.
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Memoizes the hash list computed from each event type's lineage.
///
/// The cache is keyed by `TypeId` and computed once per type for the life of
/// the registry. Hosts that reload event definitions (the original cleared
/// its cache on editor-mode exit) call [`TypeRegistry::reset`].
#[derive(Debug, Default)]
pub struct TypeRegistry {
    cache: HashMap<TypeId, Rc<[TypeHash]>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The ordered, deduplicated hash list for `E`.
    ///
    /// Order follows the lineage declaration (own name first, ancestors
    /// after); a name reached twice through a capability diamond contributes
    /// one hash at its first occurrence.
    pub fn hashes_of<E: Event>(&mut self) -> Rc<[TypeHash]> {
        self.cache
            .entry(TypeId::of::<E>())
            .or_insert_with(|| compute_hashes(&E::lineage()))
            .clone()
    }

    /// Drops every cached hash list.
    pub fn reset(&mut self) {
        self.cache.clear();
    }
}

fn compute_hashes(lineage: &Lineage) -> Rc<[TypeHash]> {
    let mut seen = HashSet::new();
    let mut hashes = Vec::with_capacity(lineage.names().len());
    for name in lineage.names() {
        let hash = TypeHash::of_name(name);
        if seen.insert(hash) {
            hashes.push(hash);
        }
    }
    hashes.into()
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

    struct Diamond;
    impl Event for Diamond {
        fn lineage() -> Lineage {
            Lineage::of("tests::Diamond")
                .extends(Base::lineage())
                .extends(Base::lineage())
        }
    }

    #[test]
    fn hash_is_deterministic() {
        assert_eq!(
            TypeHash::of_name("tests::Base"),
            TypeHash::of_name("tests::Base")
        );
        assert_ne!(
            TypeHash::of_name("tests::Base"),
            TypeHash::of_name("tests::Derived")
        );
    }

    #[test]
    fn own_hash_is_first_lineage_entry() {
        assert_eq!(TypeHash::of::<Derived>(), TypeHash::of_name("tests::Derived"));
    }

    #[test]
    fn hashes_follow_lineage_order() {
        let mut registry = TypeRegistry::new();
        let hashes = registry.hashes_of::<Derived>();
        assert_eq!(
            hashes.as_ref(),
            [
                TypeHash::of_name("tests::Derived"),
                TypeHash::of_name("tests::Base"),
            ]
        );
    }

    #[test]
    fn duplicate_lineage_names_are_deduped() {
        let mut registry = TypeRegistry::new();
        let hashes = registry.hashes_of::<Diamond>();
        assert_eq!(hashes.len(), 2);
    }

    #[test]
    fn cache_returns_same_allocation_until_reset() {
        let mut registry = TypeRegistry::new();
        let first = registry.hashes_of::<Base>();
        let second = registry.hashes_of::<Base>();
        assert!(Rc::ptr_eq(&first, &second));

        registry.reset();
        let third = registry.hashes_of::<Base>();
        assert!(!Rc::ptr_eq(&first, &third));
    }
}
