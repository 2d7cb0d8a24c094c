//! Fixed-step scenario: one attacker repeatedly hitting a training dummy.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use combat_core::{
    CombatConfig, CombatListener, CombatLog, CombatResult, CombatSinks, CombatTarget, Combatant,
    DamageEffect, DamageType, Effect, EffectKind, EntityId, InteractionRegistry, Magnitude,
    Payload, ResultCategory, StatKind, StatusSpec, TIMER_EPSILON, Tag, VisualController,
    VisualId, Vitals,
};

pub const ATTACKER: EntityId = EntityId(1);
pub const DEFENDER: EntityId = EntityId(2);

/// What the attacker does and what the dummy looks like.
#[derive(Clone, Debug)]
pub struct Scenario {
    pub statuses: Vec<Arc<StatusSpec>>,
    /// Seconds between applications.
    pub every: f32,
    /// Total simulated seconds.
    pub duration: f32,
    /// Direct hit delivered with every application, scaled by attacker power.
    pub hit: Option<Magnitude>,
    pub attacker_power: f32,
    pub defender_health: f32,
    pub defender_armor: f32,
    pub defender_resistance: f32,
}

/// Counters gathered while the scenario runs.
#[derive(Debug, Default)]
pub struct Summary {
    pub counts: BTreeMap<ResultCategory, usize>,
    pub damage_dealt: f32,
    pub tags_started: usize,
    pub tags_ended: usize,
    pub visuals_played: usize,
    pub frames: u64,
    pub retained: usize,
    pub defender_health: f32,
    pub defender_alive: bool,
}

/// Forwards every result into the combat log while counting it.
struct Recorder {
    log: CombatLog,
    summary: Summary,
}

impl CombatListener for Recorder {
    fn on_result(&mut self, result: Arc<CombatResult>) {
        *self.summary.counts.entry(result.category()).or_default() += 1;
        self.summary.damage_dealt += result.damage();
        tracing::trace!(
            frame = %self.log.current_frame(),
            source = %result.source,
            target = %result.target,
            kind = ?result.kind,
            "result"
        );
        self.log.log(result);
    }

    fn on_tag_started(&mut self, entity: EntityId, tag: &Tag) {
        self.summary.tags_started += 1;
        tracing::debug!(%entity, %tag, "tag started");
    }

    fn on_tag_ended(&mut self, entity: EntityId, tag: &Tag) {
        self.summary.tags_ended += 1;
        tracing::debug!(%entity, %tag, "tag ended");
    }
}

#[derive(Default)]
struct TracingVisuals {
    played: usize,
}

impl VisualController for TracingVisuals {
    fn play(&mut self, visual: VisualId, target: EntityId) {
        self.played += 1;
        tracing::trace!(%visual, %target, "play");
    }
}

/// Runs `scenario` at the configured fixed timestep.
pub fn run(
    config: &CombatConfig,
    interactions: Arc<InteractionRegistry>,
    scenario: &Scenario,
) -> Result<Summary> {
    let attacker = Combatant::builder(ATTACKER)
        .vitals(Vitals::new(ATTACKER, 100.0)?.with_stat(StatKind::Power, scenario.attacker_power))
        .interactions(Arc::clone(&interactions))
        .build()?;
    let mut defender = Combatant::builder(DEFENDER)
        .vitals(
            Vitals::new(DEFENDER, scenario.defender_health)?
                .with_stat(StatKind::Armor, scenario.defender_armor)
                .with_stat(StatKind::Resistance, scenario.defender_resistance),
        )
        .interactions(interactions)
        .build()?;

    let payload = build_payload(&attacker, scenario);
    let dt = config.fixed_timestep;
    let steps = (scenario.duration / dt).ceil() as u64;

    let mut recorder = Recorder {
        log: CombatLog::new(config),
        summary: Summary::default(),
    };
    let mut visuals = TracingVisuals::default();
    let mut since_application = scenario.every;

    tracing::info!(
        steps,
        dt,
        effects = payload.effects.len(),
        "starting scenario"
    );

    for _ in 0..steps {
        recorder.log.advance(f64::from(dt));
        let mut sinks = CombatSinks::new(&mut recorder).with_visuals(&mut visuals);

        if since_application + TIMER_EPSILON >= scenario.every {
            let outcome = defender.process_payload(&payload, &mut sinks);
            tracing::debug!(?outcome, "payload delivered");
            since_application = 0.0;
        }

        defender.tick(dt, &mut sinks);
        since_application += dt;

        if !defender.vitals().is_alive() {
            tracing::info!("defender defeated");
            break;
        }
    }

    let mut summary = recorder.summary;
    summary.frames = recorder.log.current_frame().0;
    summary.retained = recorder.log.len();
    summary.visuals_played = visuals.played;
    summary.defender_health = defender.vitals().health();
    summary.defender_alive = defender.vitals().is_alive();
    Ok(summary)
}

fn build_payload(attacker: &Combatant, scenario: &Scenario) -> Payload {
    let mut payload = Payload::new(attacker.entity());

    if let Some(hit) = scenario.hit {
        let amount = hit.resolve(attacker.vitals());
        payload = payload
            .effect(Effect::new(DamageEffect::new(amount, DamageType::Physical)).visual(VisualId(0)));
    }

    for status in &scenario.statuses {
        payload = payload.effect(Effect::new(EffectKind::ApplyStatus(Arc::clone(status))));
    }

    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_content::CatalogLoader;

    fn create_test_scenario(statuses: Vec<Arc<StatusSpec>>) -> Scenario {
        Scenario {
            statuses,
            every: 1.0,
            duration: 5.0,
            hit: None,
            attacker_power: 20.0,
            defender_health: 500.0,
            defender_armor: 0.0,
            defender_resistance: 0.0,
        }
    }

    #[test]
    fn burn_scenario_deals_damage_and_logs_results() {
        let catalog = CatalogLoader::builtin().unwrap();
        let scenario = create_test_scenario(vec![Arc::clone(catalog.status("Burn").unwrap())]);
        let config = CombatConfig {
            fixed_timestep: 0.1,
            ..CombatConfig::unbounded()
        };

        let summary = run(&config, catalog.interactions(), &scenario).unwrap();

        assert!(summary.damage_dealt > 0.0);
        assert!(summary.counts.get(&ResultCategory::StatusApplied).copied().unwrap_or(0) >= 1);
        assert_eq!(summary.tags_started, 1);
        assert!(summary.defender_alive);
        assert_eq!(summary.defender_health, 500.0 - summary.damage_dealt);
        assert_eq!(summary.visuals_played, 0);
    }

    #[test]
    fn scaled_hit_stops_when_defender_dies() {
        let scenario = Scenario {
            hit: Some(Magnitude::Scaled {
                base: 10.0,
                stat: StatKind::Power,
                ratio: 1.0,
            }),
            defender_health: 50.0,
            ..create_test_scenario(Vec::new())
        };
        let config = CombatConfig {
            fixed_timestep: 0.5,
            ..CombatConfig::unbounded()
        };

        let summary = run(&config, Arc::new(InteractionRegistry::new()), &scenario).unwrap();

        // 30 per hit: dead on the second application.
        assert!(!summary.defender_alive);
        assert_eq!(summary.counts.get(&ResultCategory::Damage), Some(&2));
        assert_eq!(summary.frames, 3);
        assert_eq!(summary.visuals_played, 2);
    }
}
