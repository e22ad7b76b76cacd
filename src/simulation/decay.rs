//! Passive need decay
//!
//! Runs before the behavior system so each tick's decisions see the decayed
//! values. One tick is one unit of time; the global decay multiplier scales
//! the whole simulation's metabolism without touching per-need rates.

use crate::core::config::config;
use crate::ecs::component::ComponentKind;
use crate::ecs::scheduler::{Scheduler, System, SystemCtx};
use crate::entity::needs::Needs;

pub struct NeedDecaySystem {
    required: [ComponentKind; 1],
    needs_kind: ComponentKind,
}

impl NeedDecaySystem {
    pub fn new(sched: &mut Scheduler) -> Self {
        let needs_kind = sched.register_kind::<Needs>();
        Self {
            required: [needs_kind],
            needs_kind,
        }
    }
}

impl System for NeedDecaySystem {
    fn name(&self) -> &str {
        "need_decay"
    }

    fn required(&self) -> &[ComponentKind] {
        &self.required
    }

    fn update(&mut self, ctx: &mut SystemCtx) {
        let dt = config().decay_multiplier;
        for &entity in ctx.entities {
            let Ok(container) = ctx.world.components_mut(entity) else {
                continue;
            };
            if let Some(needs) = container.get_mut::<Needs>(self.needs_kind) {
                needs.decay(dt);
            }
        }
    }
}
