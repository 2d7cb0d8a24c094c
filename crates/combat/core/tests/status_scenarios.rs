use std::sync::Arc;

use combat_core::{
    Category, CategoryInteraction, CombatListener, CombatLog, CombatResult, CombatSinks, CombatTarget,
    Combatant, DamageEffect, DamageType, DurationBehavior, Effect, EffectKind, EntityId,
    InteractionKind, InteractionRegistry, OverflowBehavior, Payload, ResultCategory, ResultKind,
    StackPolicy, StatusSpec, Tag, Vitals,
};

const ATTACKER: EntityId = EntityId(1);
const DEFENDER: EntityId = EntityId(2);

fn create_defender(interactions: InteractionRegistry) -> Combatant {
    Combatant::builder(DEFENDER)
        .vitals(Vitals::new(DEFENDER, 100.0).unwrap())
        .interactions(Arc::new(interactions))
        .build()
        .unwrap()
}

fn apply_status(spec: &Arc<StatusSpec>) -> Payload {
    Payload::new(ATTACKER).effect(Effect::new(EffectKind::ApplyStatus(Arc::clone(spec))))
}

fn expired(log: &CombatLog) -> Vec<(String, bool)> {
    log.entries()
        .filter_map(|entry| match &entry.result.kind {
            ResultKind::StatusExpired {
                status,
                was_dispelled,
                ..
            } => Some((status.clone(), *was_dispelled)),
            _ => None,
        })
        .collect()
}

#[test]
fn duration_status_expires_once_with_end_effect_logged_on_that_tick() {
    let burn_tag = Tag::new("Burn", 5);
    let burn = StatusSpec::duration("Burn", 2.0)
        .tag(burn_tag.clone())
        .on_end(Effect::new(DamageEffect::new(5.0, DamageType::True)))
        .shared();
    let mut defender = create_defender(InteractionRegistry::new());
    let mut log = CombatLog::unbounded();

    log.advance(0.1);
    defender.process_payload(&apply_status(&burn), &mut CombatSinks::new(&mut log));
    assert_eq!(defender.statuses().tag_count(&burn_tag), 1);

    let mut expired_on = None;
    for _ in 0..30 {
        log.advance(0.1);
        defender.tick(0.1, &mut CombatSinks::new(&mut log));
        if expired_on.is_none() && log.has_event(ResultCategory::StatusExpired) {
            expired_on = Some(log.current_frame());
            assert!(log.has_event_where(ResultCategory::Damage, |r| r.damage() == 5.0));
        }
    }

    assert!(expired_on.is_some());
    assert_eq!(expired(&log), vec![("Burn".to_owned(), false)]);
    assert_eq!(defender.statuses().tag_count(&burn_tag), 0);
    assert_eq!(defender.vitals().health(), 95.0);
}

#[test]
fn bidirectional_cancel_both_stops_fire_before_water_is_admitted() {
    let fire = Category::new("Fire");
    let water = Category::new("Water");
    let interactions = InteractionRegistry::new().with(
        CategoryInteraction::new(&fire, &water, InteractionKind::CancelBoth).bidirectional(),
    );
    let burn = StatusSpec::duration("Burn", 5.0)
        .tag(Tag::builder("Burn").category(&fire).build())
        .shared();
    let soak = StatusSpec::duration("Soak", 5.0)
        .tag(Tag::builder("Soak").category(&water).build())
        .shared();

    let mut defender = create_defender(interactions);
    let mut log = CombatLog::unbounded();
    log.advance(0.1);
    defender.process_payload(&apply_status(&burn), &mut CombatSinks::new(&mut log));
    log.advance(0.1);
    defender.process_payload(&apply_status(&soak), &mut CombatSinks::new(&mut log));

    let order: Vec<String> = log
        .entries()
        .filter(|e| e.frame == log.current_frame())
        .filter_map(|e| match &e.result.kind {
            ResultKind::StatusExpired { status, .. } => Some(format!("expired {status}")),
            ResultKind::StatusApplied { status, .. } => Some(format!("applied {status}")),
            _ => None,
        })
        .collect();
    assert_eq!(order, vec!["expired Burn", "applied Soak"]);
    assert_eq!(expired(&log), vec![("Burn".to_owned(), true)]);

    let names: Vec<&str> = defender.statuses().runners().map(|r| r.name()).collect();
    assert_eq!(names, vec!["Soak"]);
}

#[test]
fn overflow_behaviors() {
    let mut log = CombatLog::unbounded();

    // Reject: the third application is refused and nothing changes.
    let stun = Tag::builder("Stun")
        .stack_policy(StackPolicy::limited(2, OverflowBehavior::Reject))
        .build();
    let stun_spec = StatusSpec::duration("Stun", 3.0).tag(stun.clone()).shared();
    let mut defender = create_defender(InteractionRegistry::new());
    let mut sinks = CombatSinks::new(&mut log);
    assert!(defender.add_status(&stun_spec, ATTACKER, &mut sinks).is_accepted());
    assert!(defender.add_status(&stun_spec, ATTACKER, &mut sinks).is_accepted());
    assert!(!defender.add_status(&stun_spec, ATTACKER, &mut sinks).is_accepted());
    assert_eq!(defender.statuses().tag_count(&stun), 2);

    // RefreshOldest with Max: oldest takes max(remaining, incoming).
    let burn = Tag::builder("Burn")
        .stack_policy(
            StackPolicy::limited(1, OverflowBehavior::RefreshOldest)
                .duration_behavior(DurationBehavior::Max),
        )
        .build();
    let short = StatusSpec::duration("Burn", 2.0).tag(burn.clone()).shared();
    let long = StatusSpec::duration("Burn", 6.0).tag(burn.clone()).shared();
    let mut defender = create_defender(InteractionRegistry::new());
    let first = defender
        .add_status(&short, ATTACKER, &mut sinks)
        .runner()
        .unwrap();
    defender.add_status(&long, ATTACKER, &mut sinks);
    assert_eq!(defender.statuses().len(), 1);
    assert_eq!(
        defender.statuses().runner(first).and_then(|r| r.remaining()),
        Some(6.0)
    );

    // ReplaceOldest: the oldest is dispelled and the count stays at the limit.
    let bleed = Tag::builder("Bleed")
        .stack_policy(StackPolicy::limited(2, OverflowBehavior::ReplaceOldest))
        .build();
    let bleed_spec = StatusSpec::duration("Bleed", 3.0).tag(bleed.clone()).shared();
    let mut defender = create_defender(InteractionRegistry::new());
    let oldest = defender
        .add_status(&bleed_spec, ATTACKER, &mut sinks)
        .runner()
        .unwrap();
    defender.add_status(&bleed_spec, ATTACKER, &mut sinks);
    defender.add_status(&bleed_spec, ATTACKER, &mut sinks);
    assert_eq!(defender.statuses().tag_count(&bleed), 2);
    assert!(defender.statuses().runner(oldest).is_none());
    assert!(defender.statuses().verify_tag_counts());
}

#[test]
fn refresh_oldest_with_default_duration_replaces_remaining_time() {
    let burn = Tag::builder("Burn")
        .stack_policy(StackPolicy::limited(1, OverflowBehavior::RefreshOldest))
        .build();
    let long = StatusSpec::duration("Burn", 6.0).tag(burn.clone()).shared();
    let short = StatusSpec::duration("Burn", 2.0).tag(burn.clone()).shared();
    let mut defender = create_defender(InteractionRegistry::new());
    let mut log = CombatLog::unbounded();

    defender.process_payload(&apply_status(&long), &mut CombatSinks::new(&mut log));
    defender.tick(1.0, &mut CombatSinks::new(&mut log));
    defender.process_payload(&apply_status(&short), &mut CombatSinks::new(&mut log));

    // Independent: the incoming 2s overwrites the 5s left, even though it is shorter.
    let runner = defender.statuses().runners().next().unwrap();
    assert_eq!(runner.remaining(), Some(2.0));
    assert_eq!(defender.statuses().tag_count(&burn), 1);
    let applied = log
        .entries()
        .filter(|entry| entry.result.category() == ResultCategory::StatusApplied)
        .count();
    assert_eq!(applied, 1);

    defender.tick(2.0, &mut CombatSinks::new(&mut log));
    assert!(defender.statuses().is_empty());
    assert_eq!(expired(&log), vec![("Burn".to_string(), false)]);
}

#[derive(Default)]
struct TagTracker {
    started: Vec<String>,
    ended: Vec<String>,
    results: usize,
}

impl CombatListener for TagTracker {
    fn on_result(&mut self, _result: Arc<CombatResult>) {
        self.results += 1;
    }

    fn on_tag_started(&mut self, _entity: EntityId, tag: &Tag) {
        self.started.push(tag.name().to_owned());
    }

    fn on_tag_ended(&mut self, _entity: EntityId, tag: &Tag) {
        self.ended.push(tag.name().to_owned());
    }
}

#[test]
fn tag_transitions_reach_listener_once_per_edge() {
    let poison = Tag::new("Poison", 3);
    let spec = StatusSpec::tick("Poison", 1.0, 0.5)
        .tag(poison.clone())
        .on_tick(Effect::new(DamageEffect::new(1.0, DamageType::True)))
        .shared();
    let mut defender = create_defender(InteractionRegistry::new());
    let mut tracker = TagTracker::default();

    {
        let mut sinks = CombatSinks::new(&mut tracker);
        defender.add_status(&spec, ATTACKER, &mut sinks);
        defender.add_status(&spec, ATTACKER, &mut sinks);
        for _ in 0..10 {
            defender.tick(0.25, &mut sinks);
        }
    }

    assert_eq!(tracker.started, vec!["Poison"]);
    assert_eq!(tracker.ended, vec!["Poison"]);
    // 2 applied + 2 * 2 ticks + 2 expired.
    assert_eq!(tracker.results, 8);
    assert!(!defender.statuses().has_tag(&poison));
}
