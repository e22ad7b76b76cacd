//! Demo binary: a handful of creatures living out their needs and goals
//!
//! Spawns seeded creatures, wires logging subscribers onto the behavior
//! event bus, runs a fixed number of ticks and prints a closing summary.
//! The same seed reproduces the same run.

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

use vivarium::core::error::Result;
use vivarium::core::types::EntityId;
use vivarium::ecs::event::EventKind;
use vivarium::ecs::scheduler::Scheduler;
use vivarium::entity::attributes::Attributes;
use vivarium::entity::goals::Goals;
use vivarium::entity::needs::{focus_description, Need, NeedCategory, Needs};
use vivarium::entity::Position;
use vivarium::simulation::behavior::{
    BehaviorSystem, ATTR_ANALYTICAL, ATTR_CREATIVITY, ATTR_SOCIAL,
};
use vivarium::simulation::decay::NeedDecaySystem;

#[derive(Parser, Debug)]
#[command(name = "vivarium", about = "Tick-based creature simulation demo")]
struct Args {
    /// Number of creatures to spawn
    #[arg(long, default_value_t = 5)]
    creatures: usize,

    /// Number of ticks to run
    #[arg(long, default_value_t = 200)]
    ticks: u64,

    /// Rng seed for spawning and behavior
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vivarium=info")),
        )
        .init();

    let args = Args::parse();
    tracing::info!(
        creatures = args.creatures,
        ticks = args.ticks,
        seed = args.seed,
        "starting simulation"
    );

    let mut sched = Scheduler::new();

    // Decay before decisions, so each tick reacts to fresh values
    let decay = NeedDecaySystem::new(&mut sched);
    sched.add_system(Box::new(decay));
    let behavior = BehaviorSystem::new(&mut sched, args.seed);
    sched.add_system(Box::new(behavior));

    for kind in [
        EventKind::SurvivalMode,
        EventKind::AddressingUrgentNeed,
        EventKind::PursuingGoal,
        EventKind::GoalCompleted,
        EventKind::NewGoalChosen,
    ] {
        sched.subscribe(kind, move |event| {
            tracing::info!(channel = kind.as_str(), ?event, "behavior event");
        });
    }

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let creatures: Vec<EntityId> = (0..args.creatures)
        .map(|_| spawn_creature(&mut sched, &mut rng))
        .collect::<Result<_>>()?;

    for _ in 0..args.ticks {
        sched.tick();
    }

    println!(
        "--- after {} ticks, {} creatures ---",
        sched.current_tick(),
        sched.entity_count()
    );
    for &id in &creatures {
        let Some(needs) = sched.get_component::<Needs>(id)? else {
            continue;
        };
        let focus = needs.calculate_focus();
        let worst: Vec<String> = needs
            .critical(2)
            .into_iter()
            .map(|(name, need)| format!("{name}={:.0}", need.value))
            .collect();
        let goals: Vec<&str> = match sched.get_component::<Goals>(id)? {
            Some(goals) => goals.iter().map(|g| g.id.as_str()).collect(),
            None => Vec::new(),
        };
        println!(
            "{id:?}: focus {focus} ({}), worst needs [{}], goals [{}]",
            focus_description(focus),
            worst.join(", "),
            goals.join(", ")
        );
    }

    Ok(())
}

/// Spawn one creature with randomized needs, attributes and position
fn spawn_creature(sched: &mut Scheduler, rng: &mut ChaCha8Rng) -> Result<EntityId> {
    let entity = sched.create_entity();

    let mut needs = Needs::new();
    needs.insert(
        "FOOD",
        Need::new(
            rng.gen_range(100.0..400.0),
            400.0,
            rng.gen_range(5.0..20.0),
            8,
            NeedCategory::Physiological,
        ),
    );
    needs.insert(
        "WATER",
        Need::new(
            rng.gen_range(100.0..400.0),
            400.0,
            rng.gen_range(10.0..30.0),
            9,
            NeedCategory::Physiological,
        ),
    );
    needs.insert(
        "REST",
        Need::new(
            rng.gen_range(100.0..400.0),
            400.0,
            rng.gen_range(2.0..10.0),
            5,
            NeedCategory::Safety,
        ),
    );
    needs.insert(
        "FRIENDSHIP",
        Need::new(
            rng.gen_range(0.0..300.0),
            300.0,
            rng.gen_range(1.0..5.0),
            3,
            NeedCategory::Social,
        ),
    );
    sched.add_component(entity, needs)?;

    let mut attrs = Attributes::new();
    attrs.set_base(ATTR_ANALYTICAL, rng.gen_range(500..2500));
    attrs.set_base(ATTR_SOCIAL, rng.gen_range(500..2500));
    attrs.set_base(ATTR_CREATIVITY, rng.gen_range(500..2500));
    sched.add_component(entity, attrs)?;

    sched.add_component(entity, Goals::new())?;
    sched.add_component(
        entity,
        Position::new(rng.gen_range(-30.0..30.0), rng.gen_range(-30.0..30.0)),
    )?;

    Ok(entity)
}
