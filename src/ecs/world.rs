//! ECS World - entity registry and per-entity component storage
//!
//! Entity destruction is deferred: `destroy_entity` only queues the handle,
//! and the scheduler flushes the queue at end-of-tick so no system ever
//! observes a half-destroyed entity mid-tick.

use ahash::AHashMap;

use crate::core::error::{Result, SimError};
use crate::core::types::{EntityId, Tick};
use crate::ecs::component::{Component, ComponentContainer, ComponentKind, KindRegistry};

/// The simulation world containing all entities and their components
pub struct World {
    current_tick: Tick,
    kinds: KindRegistry,
    entities: AHashMap<EntityId, ComponentContainer>,
    next_id: u64,
    pending_destroy: Vec<EntityId>,
}

impl World {
    pub fn new() -> Self {
        Self {
            current_tick: 0,
            kinds: KindRegistry::new(),
            entities: AHashMap::new(),
            next_id: 0,
            pending_destroy: Vec::new(),
        }
    }

    pub fn current_tick(&self) -> Tick {
        self.current_tick
    }

    pub(crate) fn advance_tick(&mut self) {
        self.current_tick += 1;
    }

    /// Register (or look up) the kind tag for component type `T`
    pub fn register_kind<T: Component>(&mut self) -> ComponentKind {
        self.kinds.register::<T>()
    }

    pub fn kind_of<T: Component>(&self) -> Option<ComponentKind> {
        self.kinds.get::<T>()
    }

    /// Allocate a new entity with an empty component container
    ///
    /// Handles are strictly increasing and never reused.
    pub fn create_entity(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.insert(id, ComponentContainer::new());
        id
    }

    /// Queue an entity for destruction at the end of the current tick
    ///
    /// The entity stays fully usable (components, system memberships) until
    /// the scheduler flushes the queue. Unknown or already-queued handles are
    /// ignored.
    pub fn destroy_entity(&mut self, entity: EntityId) {
        if self.entities.contains_key(&entity) && !self.pending_destroy.contains(&entity) {
            self.pending_destroy.push(entity);
        }
    }

    /// Whether the entity currently exists in the registry
    ///
    /// Stays true for entities queued for destruction until the end-of-tick
    /// flush, matching what systems observe. Callers holding entity lists
    /// across a tick boundary should check this instead of relying on
    /// `components` failing.
    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.entities.contains_key(&entity)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entity_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied()
    }

    /// Attach a component to an entity, overwriting any existing one of the
    /// same type
    ///
    /// Fails with `EntityNotFound` for a destroyed/unknown entity; silently
    /// ignoring that would mask use-after-destroy bugs.
    pub fn add_component<T: Component>(&mut self, entity: EntityId, component: T) -> Result<ComponentKind> {
        let kind = self.kinds.register::<T>();
        let container = self
            .entities
            .get_mut(&entity)
            .ok_or(SimError::EntityNotFound(entity))?;
        container.insert(kind, Box::new(component));
        Ok(kind)
    }

    /// Detach the component of type `T`; a no-op if the entity does not have
    /// one
    pub fn remove_component<T: Component>(&mut self, entity: EntityId) -> Result<()> {
        let container = self
            .entities
            .get_mut(&entity)
            .ok_or(SimError::EntityNotFound(entity))?;
        if let Some(kind) = self.kinds.get::<T>() {
            container.remove(kind);
        }
        Ok(())
    }

    pub fn components(&self, entity: EntityId) -> Result<&ComponentContainer> {
        self.entities
            .get(&entity)
            .ok_or(SimError::EntityNotFound(entity))
    }

    pub fn components_mut(&mut self, entity: EntityId) -> Result<&mut ComponentContainer> {
        self.entities
            .get_mut(&entity)
            .ok_or(SimError::EntityNotFound(entity))
    }

    /// Borrow an entity's component of type `T`, if attached
    pub fn get_component<T: Component>(&self, entity: EntityId) -> Result<Option<&T>> {
        let container = self.components(entity)?;
        Ok(self.kinds.get::<T>().and_then(|kind| container.get(kind)))
    }

    pub fn get_component_mut<T: Component>(&mut self, entity: EntityId) -> Result<Option<&mut T>> {
        let kind = self.kinds.get::<T>();
        let container = self
            .entities
            .get_mut(&entity)
            .ok_or(SimError::EntityNotFound(entity))?;
        Ok(kind.and_then(move |k| container.get_mut(k)))
    }

    /// Drain the destruction queue, removing each entity from the registry
    ///
    /// Called by the scheduler after all systems have run. Returns the
    /// destroyed handles so the scheduler can purge its matching sets.
    pub(crate) fn flush_destroyed(&mut self) -> Vec<EntityId> {
        let destroyed: Vec<EntityId> = self.pending_destroy.drain(..).collect();
        for entity in &destroyed {
            self.entities.remove(entity);
        }
        destroyed
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
