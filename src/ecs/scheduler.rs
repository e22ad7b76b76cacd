//! System scheduler - owns the world, maintains per-system matching sets and
//! drives per-tick updates
//!
//! The scheduler is the kernel's single public surface: entity and component
//! operations go through it so that every system's matching set is
//! re-established synchronously before the next system in registration order
//! runs. Systems execute strictly in registration order within a tick; there
//! is no reordering and no parallelism. Deferred entity destruction is
//! flushed after all systems have run.

use ahash::AHashSet;

use crate::core::error::Result;
use crate::core::types::{EntityId, Tick};
use crate::ecs::component::{Component, ComponentContainer, ComponentKind};
use crate::ecs::event::{BehaviorEvent, EventBus, EventKind, SubscriberId};
use crate::ecs::world::World;

/// Handle identifying a registered system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SystemId(u32);

/// Everything a system may touch during one update call
///
/// Systems receive the world and bus by reference, which makes reentrant
/// scheduler calls (adding systems or refreshing memberships mid-update)
/// unrepresentable. Component data mutation is fine; adding or removing
/// whole components from inside an update is not supported and must go
/// through the scheduler between ticks.
pub struct SystemCtx<'a> {
    pub world: &'a mut World,
    pub bus: &'a mut EventBus,
    /// Snapshot of the system's matching set for this tick
    pub entities: &'a [EntityId],
    pub tick: Tick,
}

/// A behavior unit operating once per tick on all entities holding its
/// required component set
pub trait System {
    fn name(&self) -> &str;

    /// The component kinds an entity must hold to be in this system's
    /// matching set; must be non-empty and stable after registration
    fn required(&self) -> &[ComponentKind];

    fn update(&mut self, ctx: &mut SystemCtx);
}

struct SystemEntry {
    id: SystemId,
    system: Box<dyn System>,
    required: Vec<ComponentKind>,
    matching: AHashSet<EntityId>,
}

/// Owns the world, the event bus and all registered systems
pub struct Scheduler {
    world: World,
    bus: EventBus,
    systems: Vec<SystemEntry>,
    next_system_id: u32,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            bus: EventBus::new(),
            systems: Vec::new(),
            next_system_id: 0,
        }
    }

    // === Entity / component surface (membership-maintaining) ===

    pub fn create_entity(&mut self) -> EntityId {
        self.world.create_entity()
    }

    /// Queue an entity for destruction; applied when `tick()` flushes
    pub fn destroy_entity(&mut self, entity: EntityId) {
        self.world.destroy_entity(entity);
    }

    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.world.is_alive(entity)
    }

    pub fn entity_count(&self) -> usize {
        self.world.entity_count()
    }

    pub fn current_tick(&self) -> Tick {
        self.world.current_tick()
    }

    pub fn register_kind<T: Component>(&mut self) -> ComponentKind {
        self.world.register_kind::<T>()
    }

    /// Attach a component and re-evaluate the entity's system memberships
    pub fn add_component<T: Component>(&mut self, entity: EntityId, component: T) -> Result<()> {
        self.world.add_component(entity, component)?;
        self.refresh_membership(entity);
        Ok(())
    }

    /// Detach a component (no-op if absent) and re-evaluate memberships
    pub fn remove_component<T: Component>(&mut self, entity: EntityId) -> Result<()> {
        self.world.remove_component::<T>(entity)?;
        self.refresh_membership(entity);
        Ok(())
    }

    pub fn components(&self, entity: EntityId) -> Result<&ComponentContainer> {
        self.world.components(entity)
    }

    pub fn get_component<T: Component>(&self, entity: EntityId) -> Result<Option<&T>> {
        self.world.get_component(entity)
    }

    pub fn get_component_mut<T: Component>(&mut self, entity: EntityId) -> Result<Option<&mut T>> {
        self.world.get_component_mut(entity)
    }

    /// Event bus access for external subscribers (inspection layers, tests)
    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    pub fn subscribe<F>(&mut self, kind: EventKind, callback: F) -> SubscriberId
    where
        F: FnMut(&BehaviorEvent) + 'static,
    {
        self.bus.subscribe(kind, callback)
    }

    // === System surface ===

    /// Register a system and compute its initial matching set
    ///
    /// A system declaring an empty required-component set can never be driven
    /// correctly, so it is rejected: logged and dropped, returning None.
    pub fn add_system(&mut self, system: Box<dyn System>) -> Option<SystemId> {
        let required = system.required().to_vec();
        if required.is_empty() {
            tracing::warn!(
                system = system.name(),
                "rejecting system with empty required component set"
            );
            return None;
        }

        let mut matching = AHashSet::new();
        for entity in self.world.entity_ids() {
            if let Ok(container) = self.world.components(entity) {
                if container.has_all(&required) {
                    matching.insert(entity);
                }
            }
        }

        let id = SystemId(self.next_system_id);
        self.next_system_id += 1;
        tracing::debug!(
            system = system.name(),
            initial_matches = matching.len(),
            "registered system"
        );
        self.systems.push(SystemEntry {
            id,
            system,
            required,
            matching,
        });
        Some(id)
    }

    /// Deregister a system; returns whether it was present
    pub fn remove_system(&mut self, id: SystemId) -> bool {
        let before = self.systems.len();
        self.systems.retain(|entry| entry.id != id);
        self.systems.len() < before
    }

    /// The system's current matching set, for inspection and tests
    pub fn matching(&self, id: SystemId) -> Option<&AHashSet<EntityId>> {
        self.systems
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.matching)
    }

    /// Run one simulation step
    ///
    /// Every registered system updates once, in registration order, against a
    /// snapshot of its matching set. After all systems have run, the
    /// destruction queue is drained: each destroyed entity leaves the
    /// registry and every matching set. Finally the tick counter advances.
    pub fn tick(&mut self) {
        let tick = self.world.current_tick();

        for i in 0..self.systems.len() {
            let entry = &mut self.systems[i];
            let snapshot: Vec<EntityId> = entry.matching.iter().copied().collect();
            let mut ctx = SystemCtx {
                world: &mut self.world,
                bus: &mut self.bus,
                entities: &snapshot,
                tick,
            };
            entry.system.update(&mut ctx);
        }

        for entity in self.world.flush_destroyed() {
            for entry in &mut self.systems {
                entry.matching.remove(&entity);
            }
        }

        self.world.advance_tick();
    }

    fn refresh_membership(&mut self, entity: EntityId) {
        match self.world.components(entity) {
            Ok(container) => {
                for entry in &mut self.systems {
                    if container.has_all(&entry.required) {
                        entry.matching.insert(entity);
                    } else {
                        entry.matching.remove(&entity);
                    }
                }
            }
            Err(_) => {
                for entry in &mut self.systems {
                    entry.matching.remove(&entity);
                }
            }
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
