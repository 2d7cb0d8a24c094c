use std::sync::Arc;

use combat_core::{
    CombatConfig, CombatLog, CombatSinks, CombatTarget, Combatant, ControlEffect, ControlFlags, DamageEffect,
    DamageType, Effect, EntityId, InteractionRegistry, Payload, ResultCategory, ResultKind, Vitals,
};

fn create_defender() -> Combatant {
    Combatant::builder(EntityId(2))
        .vitals(Vitals::new(EntityId(2), 100.0).unwrap())
        .interactions(Arc::new(InteractionRegistry::new()))
        .build()
        .unwrap()
}

fn jab() -> Payload {
    Payload::new(EntityId(1)).effect(Effect::new(DamageEffect::new(1.0, DamageType::True)))
}

#[test]
fn hits_across_three_ticks_are_windowed_from_the_fourth() {
    let mut defender = create_defender();
    let mut log = CombatLog::unbounded();

    for _ in 1..=3 {
        log.advance(0.1);
        defender.process_payload(&jab(), &mut CombatSinks::new(&mut log));
    }
    log.advance(0.1);

    assert_eq!(log.current_frame().0, 4);
    assert!(log.events(ResultCategory::Damage).is_empty());

    let frames: Vec<u64> = log
        .events_within_ticks(ResultCategory::Damage, 2)
        .iter()
        .map(|e| e.frame.0)
        .collect();
    assert_eq!(frames, vec![2, 3]);
    assert_eq!(log.events_within_ticks(ResultCategory::Damage, 10).len(), 3);
}

#[test]
fn decision_layer_can_poll_for_control_this_frame() {
    let mut defender = create_defender();
    let mut log = CombatLog::unbounded();
    let stun = Payload::new(EntityId(1))
        .effect(Effect::new(ControlEffect::engage(ControlFlags::STUNNED)));

    log.advance(0.1);
    defender.process_payload(&stun, &mut CombatSinks::new(&mut log));

    assert!(log.has_event_where(ResultCategory::Control, |r| matches!(
        r.kind,
        ResultKind::Control { flags, engaged: true } if flags.contains(ControlFlags::STUNNED)
    )));

    log.advance(0.1);
    assert!(!log.has_event(ResultCategory::Control));
    assert_eq!(log.events_within_time(ResultCategory::Control, 0.15).len(), 1);
}

#[test]
fn configured_retention_bounds_memory() {
    let config = CombatConfig {
        log_retention_ticks: 0,
        log_retention_seconds: 1.0,
        ..CombatConfig::default()
    };
    let mut defender = create_defender();
    let mut log = CombatLog::new(&config);

    for _ in 0..50 {
        log.advance(0.1);
        defender.process_payload(&jab(), &mut CombatSinks::new(&mut log));
    }

    // Only the last second of hits (about ten frames) is retained.
    assert!(log.len() <= 11);
    assert!(log.len() >= 10);
    assert_eq!(defender.vitals().health(), 50.0);
}
