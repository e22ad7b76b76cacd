//! Typed component storage
//!
//! Components are plain data attached to entities. Each component type is
//! assigned a stable small-integer [`ComponentKind`] the first time it is
//! registered; per-entity storage is a slot vector indexed by that kind, so
//! the hot path never hashes a `TypeId`.

use ahash::AHashMap;
use std::any::{Any, TypeId};

/// Marker trait for component data
///
/// Components carry only data; behavior lives in systems. Implement this for
/// every type attached to entities.
pub trait Component: Any + 'static {}

/// Stable small-integer tag for a registered component type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentKind(u32);

impl ComponentKind {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Assigns each component type a [`ComponentKind`] on first registration
///
/// Registration is idempotent: registering the same type twice returns the
/// same kind.
#[derive(Default)]
pub struct KindRegistry {
    kinds: AHashMap<TypeId, ComponentKind>,
    next: u32,
}

impl KindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: Component>(&mut self) -> ComponentKind {
        if let Some(&kind) = self.kinds.get(&TypeId::of::<T>()) {
            return kind;
        }
        let kind = ComponentKind(self.next);
        self.next += 1;
        self.kinds.insert(TypeId::of::<T>(), kind);
        kind
    }

    pub fn get<T: Component>(&self) -> Option<ComponentKind> {
        self.kinds.get(&TypeId::of::<T>()).copied()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

/// Per-entity mapping from component kind to component instance
///
/// An entity holds at most one instance per kind. `has(kind)` is true iff a
/// component of that kind was added and not yet removed.
#[derive(Default)]
pub struct ComponentContainer {
    slots: Vec<Option<Box<dyn Any>>>,
}

impl ComponentContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, kind: ComponentKind) -> bool {
        self.slots
            .get(kind.index())
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }

    pub fn has_all(&self, kinds: &[ComponentKind]) -> bool {
        kinds.iter().all(|&k| self.has(k))
    }

    /// Insert or overwrite the component stored under `kind`
    pub(crate) fn insert(&mut self, kind: ComponentKind, value: Box<dyn Any>) {
        let idx = kind.index();
        if idx >= self.slots.len() {
            self.slots.resize_with(idx + 1, || None);
        }
        self.slots[idx] = Some(value);
    }

    /// Remove the component stored under `kind`; returns whether one was present
    pub(crate) fn remove(&mut self, kind: ComponentKind) -> bool {
        match self.slots.get_mut(kind.index()) {
            Some(slot) => slot.take().is_some(),
            None => false,
        }
    }

    /// Borrow the component of type `T` stored under `kind`, if present
    ///
    /// Returns None both when the slot is empty and when `kind` was
    /// registered for a different type, so callers never need a separate
    /// `has` check before access.
    pub fn get<T: Component>(&self, kind: ComponentKind) -> Option<&T> {
        self.slots
            .get(kind.index())
            .and_then(|slot| slot.as_ref())
            .and_then(|boxed| boxed.downcast_ref::<T>())
    }

    pub fn get_mut<T: Component>(&mut self, kind: ComponentKind) -> Option<&mut T> {
        self.slots
            .get_mut(kind.index())
            .and_then(|slot| slot.as_mut())
            .and_then(|boxed| boxed.downcast_mut::<T>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Health(u32);
    impl Component for Health {}

    struct Stamina(u32);
    impl Component for Stamina {}

    #[test]
    fn test_registration_is_idempotent() {
        let mut reg = KindRegistry::new();
        let a = reg.register::<Health>();
        let b = reg.register::<Health>();
        assert_eq!(a, b);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_distinct_types_distinct_kinds() {
        let mut reg = KindRegistry::new();
        let a = reg.register::<Health>();
        let b = reg.register::<Stamina>();
        assert_ne!(a, b);
    }

    #[test]
    fn test_container_insert_get_remove() {
        let mut reg = KindRegistry::new();
        let kind = reg.register::<Health>();

        let mut container = ComponentContainer::new();
        assert!(!container.has(kind));
        assert!(container.get::<Health>(kind).is_none());

        container.insert(kind, Box::new(Health(30)));
        assert!(container.has(kind));
        assert_eq!(container.get::<Health>(kind).unwrap().0, 30);

        container.get_mut::<Health>(kind).unwrap().0 = 25;
        assert_eq!(container.get::<Health>(kind).unwrap().0, 25);

        assert!(container.remove(kind));
        assert!(!container.has(kind));
        // Removing an absent component is a no-op
        assert!(!container.remove(kind));
    }

    #[test]
    fn test_insert_overwrites_by_kind() {
        let mut reg = KindRegistry::new();
        let kind = reg.register::<Health>();

        let mut container = ComponentContainer::new();
        container.insert(kind, Box::new(Health(10)));
        container.insert(kind, Box::new(Health(99)));
        assert_eq!(container.get::<Health>(kind).unwrap().0, 99);
    }

    #[test]
    fn test_has_all() {
        let mut reg = KindRegistry::new();
        let health = reg.register::<Health>();
        let stamina = reg.register::<Stamina>();

        let mut container = ComponentContainer::new();
        container.insert(health, Box::new(Health(10)));
        assert!(container.has_all(&[health]));
        assert!(!container.has_all(&[health, stamina]));

        container.insert(stamina, Box::new(Stamina(5)));
        assert!(container.has_all(&[health, stamina]));
    }
}
