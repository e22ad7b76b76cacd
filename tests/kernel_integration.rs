//! Kernel-level integration: registry, scheduler membership, destruction
//! lifecycle and component checkpointing

use vivarium::ecs::scheduler::Scheduler;
use vivarium::entity::attributes::Attributes;
use vivarium::entity::goals::Goals;
use vivarium::entity::needs::{Need, NeedCategory, Needs};
use vivarium::entity::Position;
use vivarium::simulation::behavior::BehaviorSystem;
use vivarium::simulation::decay::NeedDecaySystem;

fn full_creature(sched: &mut Scheduler) -> vivarium::core::types::EntityId {
    let e = sched.create_entity();
    let mut needs = Needs::new();
    needs.insert(
        "FOOD",
        Need::new(200.0, 400.0, 10.0, 8, NeedCategory::Physiological),
    );
    sched.add_component(e, needs).unwrap();
    sched.add_component(e, Goals::new()).unwrap();
    sched.add_component(e, Position::new(0.0, 0.0)).unwrap();
    e
}

#[test]
fn test_entity_ids_are_unique_and_increasing() {
    let mut sched = Scheduler::new();
    let a = sched.create_entity();
    let b = sched.create_entity();
    sched.destroy_entity(a);
    sched.tick();
    let c = sched.create_entity();

    assert!(a < b);
    assert!(b < c);
    // Destroyed ids are never reused
    assert_ne!(c, a);
}

#[test]
fn test_destroyed_entity_stays_alive_until_flush() {
    let mut sched = Scheduler::new();
    let decay = NeedDecaySystem::new(&mut sched);
    sched.add_system(Box::new(decay));

    let e = full_creature(&mut sched);
    sched.destroy_entity(e);

    // Queued, not gone: the registry still answers for it this tick
    assert!(sched.is_alive(e));
    assert!(sched.get_component::<Needs>(e).unwrap().is_some());

    sched.tick();
    assert!(!sched.is_alive(e));
    assert!(sched.get_component::<Needs>(e).is_err());
    assert_eq!(sched.entity_count(), 0);
}

#[test]
fn test_double_destroy_is_harmless() {
    let mut sched = Scheduler::new();
    let e = full_creature(&mut sched);
    sched.destroy_entity(e);
    sched.destroy_entity(e);
    sched.tick();
    assert!(!sched.is_alive(e));
    assert_eq!(sched.entity_count(), 0);
}

#[test]
fn test_destroyed_entity_leaves_every_matching_set() {
    let mut sched = Scheduler::new();
    let decay = NeedDecaySystem::new(&mut sched);
    let decay_id = sched.add_system(Box::new(decay)).unwrap();
    let behavior = BehaviorSystem::new(&mut sched, 3);
    let behavior_id = sched.add_system(Box::new(behavior)).unwrap();

    let e = full_creature(&mut sched);
    assert!(sched.matching(decay_id).unwrap().contains(&e));
    assert!(sched.matching(behavior_id).unwrap().contains(&e));

    sched.destroy_entity(e);
    sched.tick();
    assert!(sched.matching(decay_id).unwrap().is_empty());
    assert!(sched.matching(behavior_id).unwrap().is_empty());
}

#[test]
fn test_component_removal_drops_membership_only() {
    let mut sched = Scheduler::new();
    let behavior = BehaviorSystem::new(&mut sched, 3);
    let id = sched.add_system(Box::new(behavior)).unwrap();

    let e = full_creature(&mut sched);
    assert!(sched.matching(id).unwrap().contains(&e));

    sched.remove_component::<Position>(e).unwrap();
    assert!(!sched.matching(id).unwrap().contains(&e));
    // Still alive, still holding its other components
    assert!(sched.is_alive(e));
    assert!(sched.get_component::<Needs>(e).unwrap().is_some());

    // Removing an absent component is a no-op
    sched.remove_component::<Position>(e).unwrap();
    assert!(sched.is_alive(e));
}

#[test]
fn test_full_run_keeps_registry_consistent() {
    let mut sched = Scheduler::new();
    let decay = NeedDecaySystem::new(&mut sched);
    sched.add_system(Box::new(decay));
    let behavior = BehaviorSystem::new(&mut sched, 99);
    sched.add_system(Box::new(behavior));

    let creatures: Vec<_> = (0..4).map(|_| full_creature(&mut sched)).collect();
    for _ in 0..50 {
        sched.tick();
    }

    assert_eq!(sched.current_tick(), 50);
    assert_eq!(sched.entity_count(), 4);
    for &e in &creatures {
        assert!(sched.is_alive(e));
        // 50 ticks of decay at rate 10 from 200: clamped well above the floor
        let needs = sched.get_component::<Needs>(e).unwrap().unwrap();
        assert!(needs.get("FOOD").is_some());
    }
}

#[test]
fn test_component_state_round_trips_through_json() {
    let mut needs = Needs::new();
    needs.insert(
        "FOOD",
        Need::new(150.0, 400.0, 10.0, 8, NeedCategory::Physiological),
    );
    needs.insert(
        "WATER",
        Need::new(-2_000.0, 400.0, 20.0, 9, NeedCategory::Physiological),
    );
    let mut attrs = Attributes::new();
    attrs.set_base("creativity", 1800);
    attrs.set("creativity", 1600);
    let mut goals = Goals::new();
    goals.add("craft", 4);
    goals.get_mut("craft").unwrap().progress = 42.5;
    let pos = Position::new(3.0, -7.5);

    let needs2: Needs = serde_json::from_str(&serde_json::to_string(&needs).unwrap()).unwrap();
    let attrs2: Attributes =
        serde_json::from_str(&serde_json::to_string(&attrs).unwrap()).unwrap();
    let goals2: Goals = serde_json::from_str(&serde_json::to_string(&goals).unwrap()).unwrap();
    let pos2: Position = serde_json::from_str(&serde_json::to_string(&pos).unwrap()).unwrap();

    assert_eq!(needs2.calculate_focus(), needs.calculate_focus());
    assert_eq!(needs2.get("WATER").unwrap().value, -2_000.0);
    assert_eq!(attrs2.base("creativity"), 1800);
    assert_eq!(attrs2.get("creativity"), 1600);
    assert_eq!(goals2.get("craft").unwrap().progress, 42.5);
    assert_eq!(pos2, pos);
}

#[test]
fn test_focus_is_neutral_with_no_needs() {
    let needs = Needs::new();
    assert_eq!(needs.calculate_focus(), 100);
}
