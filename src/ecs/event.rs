//! Event bus - typed publish/subscribe channel for behavior transitions
//!
//! Systems announce state transitions here instead of calling each other
//! directly. The bus is keyed by [`EventKind`] and owned by the scheduler,
//! which passes it by reference into every system update, so the dependency
//! is explicit rather than global state.
//!
//! Delivery is synchronous and in registration order, FIFO within a single
//! publish. The bus holds no history: subscribers present at publish time
//! are the only recipients. A panicking callback propagates to the publisher
//! and skips the remaining callbacks; the bus does not catch it.

use ahash::AHashMap;

use crate::core::types::{EntityId, Tick};

/// The kinds of events the behavior system publishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    SurvivalMode,
    AddressingUrgentNeed,
    PursuingGoal,
    GoalCompleted,
    NewGoalChosen,
}

impl EventKind {
    /// Stable wire name, useful for logs and external consumers
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SurvivalMode => "behavior:survival_mode",
            Self::AddressingUrgentNeed => "behavior:addressing_urgent_need",
            Self::PursuingGoal => "behavior:pursuing_goal",
            Self::GoalCompleted => "behavior:goal_completed",
            Self::NewGoalChosen => "behavior:new_goal_chosen",
        }
    }
}

/// Events published by the behavior decision system
#[derive(Debug, Clone)]
pub enum BehaviorEvent {
    /// A life-threatening need took over this entity's tick
    SurvivalMode {
        entity: EntityId,
        need: String,
        value: f64,
        tick: Tick,
    },
    /// An urgent (but not life-threatening) need is being addressed
    AddressingUrgentNeed {
        entity: EntityId,
        need: String,
        value: f64,
        tick: Tick,
    },
    /// The entity advanced its highest-priority goal
    PursuingGoal {
        entity: EntityId,
        goal: String,
        progress: f64,
        tick: Tick,
    },
    /// A goal reached full progress and was removed
    GoalCompleted {
        entity: EntityId,
        goal: String,
        tick: Tick,
    },
    /// An idle entity adopted a new goal
    NewGoalChosen {
        entity: EntityId,
        goal: String,
        tick: Tick,
    },
}

impl BehaviorEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::SurvivalMode { .. } => EventKind::SurvivalMode,
            Self::AddressingUrgentNeed { .. } => EventKind::AddressingUrgentNeed,
            Self::PursuingGoal { .. } => EventKind::PursuingGoal,
            Self::GoalCompleted { .. } => EventKind::GoalCompleted,
            Self::NewGoalChosen { .. } => EventKind::NewGoalChosen,
        }
    }
}

/// Handle returned by `subscribe`, used to unsubscribe
///
/// Rust closures are not comparable, so removal is by handle rather than by
/// callback reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberId(u64);

type Callback = Box<dyn FnMut(&BehaviorEvent)>;

/// Publish/subscribe channel keyed by event kind
#[derive(Default)]
pub struct EventBus {
    channels: AHashMap<EventKind, Vec<(SubscriberId, Callback)>>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for one event kind
    pub fn subscribe<F>(&mut self, kind: EventKind, callback: F) -> SubscriberId
    where
        F: FnMut(&BehaviorEvent) + 'static,
    {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.channels
            .entry(kind)
            .or_default()
            .push((id, Box::new(callback)));
        id
    }

    /// Remove a subscription; returns whether it was present
    pub fn unsubscribe(&mut self, kind: EventKind, id: SubscriberId) -> bool {
        match self.channels.get_mut(&kind) {
            Some(subscribers) => {
                let before = subscribers.len();
                subscribers.retain(|(sid, _)| *sid != id);
                subscribers.len() < before
            }
            None => false,
        }
    }

    /// Deliver an event to every current subscriber of its kind, in
    /// registration order
    pub fn publish(&mut self, event: BehaviorEvent) {
        if let Some(subscribers) = self.channels.get_mut(&event.kind()) {
            for (_, callback) in subscribers.iter_mut() {
                callback(&event);
            }
        }
    }
}
