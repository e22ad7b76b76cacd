//! Behavior decision system
//!
//! Once per tick, each matching entity gets exactly one decision, chosen by
//! a fixed precedence: survival beats urgent needs beats goal pursuit beats
//! adopting a new goal. The decision step is a pure function of the entity's
//! components; mutation happens in a separate apply step, which keeps the
//! precedence testable without standing up the whole ECS.
//!
//! There is no hidden state machine: every tick re-derives the decision from
//! Needs/Goals/Attributes, so checkpointing the components checkpoints the
//! behavior.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::config::config;
use crate::core::error::Result;
use crate::core::types::{EntityId, Tick};
use crate::ecs::component::ComponentKind;
use crate::ecs::event::{BehaviorEvent, EventBus};
use crate::ecs::scheduler::{Scheduler, System, SystemCtx};
use crate::ecs::world::World;
use crate::entity::attributes::Attributes;
use crate::entity::goals::{Goals, GOAL_COMPLETE};
use crate::entity::needs::Needs;
use crate::entity::Position;

/// Below this a need is life-threatening and preempts everything
pub const SURVIVAL_THRESHOLD: f64 = -50_000.0;

/// Below this (but above survival) a need is urgent
pub const URGENT_THRESHOLD: f64 = -10_000.0;

/// Attribute names that bias the weighted new-goal choice
pub const ATTR_ANALYTICAL: &str = "analytical ability";
pub const ATTR_SOCIAL: &str = "social awareness";
pub const ATTR_CREATIVITY: &str = "creativity";

/// One entity's decision for one tick
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// A life-threatening need; hard-coded seek action, nothing else runs
    Survive { need: String, value: f64 },
    /// An urgent need; softer seeking
    AddressNeed { need: String, value: f64 },
    /// Advance the highest-priority goal
    PursueGoal { id: String },
    /// No pressure and no goals: adopt a new one
    AdoptGoal { id: String, priority: i32 },
}

/// Per-tick progress for a pursued goal
///
/// Unknown goal ids degrade to a small neutral increment rather than failing.
pub fn progress_increment(goal_id: &str) -> f64 {
    match goal_id {
        "explore" => 5.0,
        "socialize" => 4.0,
        "craft" => 3.0,
        "idle" => 1.0,
        id if id.starts_with("satisfy_") => 5.0,
        _ => 2.0,
    }
}

/// Decide what an entity does this tick
///
/// Pure: reads components, touches nothing but the rng. The four branches
/// are mutually exclusive and evaluated in precedence order.
pub fn decide<R: Rng>(
    needs: &Needs,
    goals: &Goals,
    attributes: Option<&Attributes>,
    rng: &mut R,
) -> Decision {
    // 1. Survival: first life-threatening need found wins
    if let Some((name, need)) = needs.iter().find(|(_, n)| n.value < SURVIVAL_THRESHOLD) {
        return Decision::Survive {
            need: name.to_string(),
            value: need.value,
        };
    }

    // 2. Urgent: survival is ruled out, so anything below the urgent line is
    // in [SURVIVAL_THRESHOLD, URGENT_THRESHOLD)
    if let Some((name, need)) = needs.iter().find(|(_, n)| n.value < URGENT_THRESHOLD) {
        return Decision::AddressNeed {
            need: name.to_string(),
            value: need.value,
        };
    }

    // 3. Goal pursuit
    if let Some(goal) = goals.highest_priority() {
        return Decision::PursueGoal {
            id: goal.id.clone(),
        };
    }

    // 4. Idle: adopt something new
    let (id, priority) = choose_new_goal(attributes, rng);
    Decision::AdoptGoal { id, priority }
}

/// Weighted new-goal choice biased by attributes
///
/// Falls back to an "idle" goal of priority 1 when the entity has no
/// attribute component or every weight is zero.
fn choose_new_goal<R: Rng>(attributes: Option<&Attributes>, rng: &mut R) -> (String, i32) {
    let idle = ("idle".to_string(), 1);
    let Some(attrs) = attributes else {
        return idle;
    };

    let options = [
        ("explore", attrs.get(ATTR_ANALYTICAL)),
        ("socialize", attrs.get(ATTR_SOCIAL)),
        ("craft", attrs.get(ATTR_CREATIVITY)),
    ];
    let total: i64 = options.iter().map(|(_, w)| (*w).max(0) as i64).sum();
    if total == 0 {
        return idle;
    }

    let mut roll = rng.gen_range(0..total);
    for (id, weight) in options {
        let weight = weight.max(0) as i64;
        if roll < weight {
            return (id.to_string(), config().new_goal_priority);
        }
        roll -= weight;
    }
    idle
}

/// The system driving one decision per matching entity per tick
///
/// Requires Goals, Needs and Position; Attributes are optional and only
/// bias the new-goal choice.
pub struct BehaviorSystem {
    required: [ComponentKind; 3],
    needs_kind: ComponentKind,
    goals_kind: ComponentKind,
    position_kind: ComponentKind,
    attributes_kind: ComponentKind,
    rng: ChaCha8Rng,
}

impl BehaviorSystem {
    pub fn new(sched: &mut Scheduler, seed: u64) -> Self {
        let needs_kind = sched.register_kind::<Needs>();
        let goals_kind = sched.register_kind::<Goals>();
        let position_kind = sched.register_kind::<Position>();
        let attributes_kind = sched.register_kind::<Attributes>();
        Self {
            required: [goals_kind, needs_kind, position_kind],
            needs_kind,
            goals_kind,
            position_kind,
            attributes_kind,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn apply(
        &mut self,
        entity: EntityId,
        decision: Decision,
        world: &mut World,
        bus: &mut EventBus,
        tick: Tick,
    ) -> Result<()> {
        let cfg = config();
        match decision {
            Decision::Survive { need, value } => {
                self.seek(entity, &need, world, cfg.seek_speed, tick)?;
                bus.publish(BehaviorEvent::SurvivalMode {
                    entity,
                    need,
                    value,
                    tick,
                });
            }
            Decision::AddressNeed { need, value } => {
                self.seek(
                    entity,
                    &need,
                    world,
                    cfg.seek_speed * cfg.urgent_seek_factor,
                    tick,
                )?;
                bus.publish(BehaviorEvent::AddressingUrgentNeed {
                    entity,
                    need,
                    value,
                    tick,
                });
            }
            Decision::PursueGoal { id } => {
                let increment = progress_increment(&id);
                let (progress, completed) = {
                    let container = world.components_mut(entity)?;
                    let Some(goals) = container.get_mut::<Goals>(self.goals_kind) else {
                        return Ok(());
                    };
                    let Some(goal) = goals.get_mut(&id) else {
                        return Ok(());
                    };
                    goal.progress += increment;
                    let progress = goal.progress;
                    let completed = progress >= GOAL_COMPLETE;
                    if completed {
                        goals.remove(&id);
                    }
                    (progress, completed)
                };

                bus.publish(BehaviorEvent::PursuingGoal {
                    entity,
                    goal: id.clone(),
                    progress,
                    tick,
                });

                if completed {
                    // satisfy_<need> goals cascade into the needs model
                    if let Some(need_name) = id.strip_prefix("satisfy_") {
                        let need_name = need_name.to_uppercase();
                        let container = world.components_mut(entity)?;
                        if let Some(needs) = container.get_mut::<Needs>(self.needs_kind) {
                            if !needs.satisfy(&need_name, tick) {
                                tracing::debug!(
                                    ?entity,
                                    need = %need_name,
                                    "completed satisfy goal for a need the entity does not have"
                                );
                            }
                        }
                    }
                    bus.publish(BehaviorEvent::GoalCompleted {
                        entity,
                        goal: id,
                        tick,
                    });
                }
            }
            Decision::AdoptGoal { id, priority } => {
                let container = world.components_mut(entity)?;
                let Some(goals) = container.get_mut::<Goals>(self.goals_kind) else {
                    return Ok(());
                };
                if goals.add(id.clone(), priority) {
                    bus.publish(BehaviorEvent::NewGoalChosen {
                        entity,
                        goal: id,
                        tick,
                    });
                }
            }
        }
        Ok(())
    }

    /// Move toward the resource site for a need; consume it on arrival
    fn seek(
        &self,
        entity: EntityId,
        need_name: &str,
        world: &mut World,
        speed: f32,
        tick: Tick,
    ) -> Result<()> {
        let cfg = config();
        // Needs the sites do not cover fall back to shelter
        let target = match need_name {
            "FOOD" => cfg.food_site,
            "WATER" => cfg.water_site,
            _ => cfg.shelter_site,
        };

        let arrived = {
            let container = world.components_mut(entity)?;
            let Some(pos) = container.get_mut::<Position>(self.position_kind) else {
                return Ok(());
            };
            let delta = target - pos.0;
            let dist = delta.length();
            if dist <= cfg.site_arrival_radius {
                true
            } else {
                let step = speed.min(dist);
                pos.0 = pos.0 + delta.normalize() * step;
                false
            }
        };

        if arrived {
            let container = world.components_mut(entity)?;
            if let Some(needs) = container.get_mut::<Needs>(self.needs_kind) {
                needs.satisfy(need_name, tick);
            }
        }
        Ok(())
    }
}

impl System for BehaviorSystem {
    fn name(&self) -> &str {
        "behavior_decision"
    }

    fn required(&self) -> &[ComponentKind] {
        &self.required
    }

    fn update(&mut self, ctx: &mut SystemCtx) {
        let entities = ctx.entities;
        let tick = ctx.tick;
        let world = &mut *ctx.world;
        let bus = &mut *ctx.bus;

        for &entity in entities {
            // Entities destroyed earlier this tick linger in the snapshot;
            // skip them instead of aborting the whole update
            let decision = {
                let container = match world.components(entity) {
                    Ok(c) => c,
                    Err(_) => continue,
                };
                let (Some(needs), Some(goals)) = (
                    container.get::<Needs>(self.needs_kind),
                    container.get::<Goals>(self.goals_kind),
                ) else {
                    continue;
                };
                let attributes = container.get::<Attributes>(self.attributes_kind);
                decide(needs, goals, attributes, &mut self.rng)
            };

            if let Err(err) = self.apply(entity, decision, world, bus, tick) {
                tracing::debug!(?entity, %err, "skipping entity this tick");
            }
        }
    }
}
