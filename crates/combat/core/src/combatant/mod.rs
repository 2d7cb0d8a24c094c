//! Hit pipeline: a combatant receives payloads, applies effects and republishes results.
//!
//! A [`Combatant`] owns the entity's [`Vitals`] and [`StatusRegistry`]. Effects
//! that need the registry (`ApplyStatus`, `Dispel`) are routed through it; all
//! other effects are applied to the vitals directly. Every result, including
//! status lifecycle transitions, is published to the caller's [`CombatSinks`]
//! as soon as it is produced.

mod payload;
mod sinks;

pub use payload::Payload;
pub use sinks::{CombatListener, CombatSinks, VisualController};

use std::collections::HashSet;
use std::sync::Arc;

use crate::effect::{Effect, EffectContext, EffectKind};
use crate::error::ConfigError;
use crate::interaction::InteractionRegistry;
use crate::result::{CombatResult, ResultKind};
use crate::state::{CombatTarget, EntityId, Vitals};
use crate::status::{Admission, StatusEvent, StatusRegistry, StatusRunner, StatusSpec};
use crate::tag::{Category, TagSet};

/// What happened to a payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitOutcome {
    /// Every effect in the payload was processed.
    Applied,
    /// Refused before any effect: the combatant is invulnerable.
    Invulnerable,
    /// Refused before any effect: the source is in the combatant's exception set.
    Excepted,
}

/// One entity that can receive effects.
#[derive(Debug)]
pub struct Combatant {
    entity: EntityId,
    vitals: Vitals,
    statuses: StatusRegistry,
    invulnerable: bool,
    exceptions: HashSet<EntityId>,
}

impl Combatant {
    pub fn builder(entity: EntityId) -> CombatantBuilder {
        CombatantBuilder {
            entity,
            vitals: None,
            interactions: None,
            invulnerable: false,
            exceptions: HashSet::new(),
        }
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    pub fn vitals_mut(&mut self) -> &mut Vitals {
        &mut self.vitals
    }

    pub fn statuses(&self) -> &StatusRegistry {
        &self.statuses
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable
    }

    pub fn set_invulnerable(&mut self, invulnerable: bool) {
        self.invulnerable = invulnerable;
    }

    /// Ignores every payload from `source` until removed.
    pub fn add_exception(&mut self, source: EntityId) {
        self.exceptions.insert(source);
    }

    pub fn remove_exception(&mut self, source: EntityId) -> bool {
        self.exceptions.remove(&source)
    }

    /// Applies each effect of `payload` in order.
    ///
    /// The whole payload is refused, before any effect, when the combatant is
    /// invulnerable or the source is excepted.
    pub fn process_payload(&mut self, payload: &Payload, sinks: &mut CombatSinks<'_>) -> HitOutcome {
        if self.invulnerable {
            tracing::debug!(entity = %self.entity, source = %payload.source, "payload blocked: invulnerable");
            return HitOutcome::Invulnerable;
        }
        if self.exceptions.contains(&payload.source) {
            tracing::debug!(entity = %self.entity, source = %payload.source, "payload blocked: excepted source");
            return HitOutcome::Excepted;
        }

        let ctx = payload.context();
        for effect in &payload.effects {
            self.apply_effect(effect, &ctx, sinks);
        }
        HitOutcome::Applied
    }

    /// Applies one effect, plays its visual, then publishes the results.
    pub fn apply_effect(&mut self, effect: &Effect, ctx: &EffectContext, sinks: &mut CombatSinks<'_>) {
        let direct = match &effect.kind {
            EffectKind::ApplyStatus(spec) => {
                let runner = StatusRunner::new(Arc::clone(spec), ctx.source).with_potency(ctx.potency);
                let refused = match self.statuses.admit(runner, &mut self.vitals) {
                    Admission::Rejected => Some("rejected"),
                    Admission::Cancelled => Some("cancelled"),
                    Admission::Admitted(_) | Admission::Refreshed(_) => None,
                };
                refused.map(|verdict| {
                    CombatResult::new(
                        ctx.source,
                        self.entity,
                        spec.tags.clone(),
                        ResultKind::Generic {
                            label: format!("{} {verdict}", spec.name),
                        },
                    )
                })
            }
            EffectKind::Dispel(category) => {
                self.statuses.dispel_category(category, &mut self.vitals);
                None
            }
            _ => effect.apply(&mut self.vitals, ctx),
        };

        if let Some(visual) = effect.visual {
            sinks.play(visual, self.entity);
        }

        if let Some(result) = direct {
            sinks.publish(result);
        }
        self.publish_status_events(sinks);
    }

    /// Starts a status from `source` without going through a payload.
    pub fn add_status(
        &mut self,
        spec: &Arc<StatusSpec>,
        source: EntityId,
        sinks: &mut CombatSinks<'_>,
    ) -> Admission {
        let runner = StatusRunner::new(Arc::clone(spec), source);
        let admission = self.statuses.admit(runner, &mut self.vitals);
        self.publish_status_events(sinks);
        admission
    }

    /// Force-stops every status in `category`.
    pub fn dispel(&mut self, category: &Category, sinks: &mut CombatSinks<'_>) -> usize {
        let stopped = self.statuses.dispel_category(category, &mut self.vitals);
        self.publish_status_events(sinks);
        stopped
    }

    pub fn clear_statuses(&mut self, sinks: &mut CombatSinks<'_>) {
        self.statuses.clear_all(&mut self.vitals);
        self.publish_status_events(sinks);
    }

    /// Advances every active status by `dt` seconds.
    pub fn tick(&mut self, dt: f32, sinks: &mut CombatSinks<'_>) {
        self.statuses.tick(dt, &mut self.vitals);
        self.publish_status_events(sinks);
    }

    fn publish_status_events(&mut self, sinks: &mut CombatSinks<'_>) {
        let events: Vec<StatusEvent> = self.statuses.drain_events().collect();
        for event in events {
            let result = match event {
                StatusEvent::RunnerAdded {
                    runner,
                    status,
                    source,
                    tags,
                } => CombatResult::new(
                    source,
                    self.entity,
                    tags,
                    ResultKind::StatusApplied { status, runner },
                ),
                StatusEvent::RunnerRemoved {
                    runner,
                    status,
                    source,
                    tags,
                    was_dispelled,
                } => CombatResult::new(
                    source,
                    self.entity,
                    tags,
                    ResultKind::StatusExpired {
                        status,
                        runner,
                        was_dispelled,
                    },
                ),
                StatusEvent::RunnerRefreshed { runner, remaining } => self.engine_result(format!(
                    "{runner} refreshed to {remaining:.2}s"
                )),
                StatusEvent::InteractionResolved {
                    incoming,
                    existing,
                    kind,
                    runner,
                } => self.engine_result(format!("{kind} {incoming} -> {existing} on {runner}")),
                StatusEvent::TagStarted(tag) => {
                    sinks.listener.on_tag_started(self.entity, &tag);
                    continue;
                }
                StatusEvent::TagEnded(tag) => {
                    sinks.listener.on_tag_ended(self.entity, &tag);
                    continue;
                }
                StatusEvent::EffectApplied(result) => result,
            };
            sinks.publish(result);
        }
    }

    fn engine_result(&self, label: String) -> CombatResult {
        CombatResult::new(
            EntityId::ENVIRONMENT,
            self.entity,
            TagSet::new(),
            ResultKind::Generic { label },
        )
    }
}

/// Builder for [`Combatant`]; every collaborator must be supplied.
#[derive(Debug)]
pub struct CombatantBuilder {
    entity: EntityId,
    vitals: Option<Vitals>,
    interactions: Option<Arc<InteractionRegistry>>,
    invulnerable: bool,
    exceptions: HashSet<EntityId>,
}

impl CombatantBuilder {
    pub fn vitals(mut self, vitals: Vitals) -> Self {
        self.vitals = Some(vitals);
        self
    }

    pub fn interactions(mut self, interactions: Arc<InteractionRegistry>) -> Self {
        self.interactions = Some(interactions);
        self
    }

    pub fn invulnerable(mut self, invulnerable: bool) -> Self {
        self.invulnerable = invulnerable;
        self
    }

    pub fn exception(mut self, source: EntityId) -> Self {
        self.exceptions.insert(source);
        self
    }

    /// # Errors
    ///
    /// Fails if vitals or the interaction registry are missing, or if the vitals
    /// were built for another entity.
    pub fn build(self) -> Result<Combatant, ConfigError> {
        let entity = self.entity;
        let vitals = self.vitals.ok_or(ConfigError::MissingVitals { entity })?;
        let interactions = self
            .interactions
            .ok_or(ConfigError::MissingInteractions { entity })?;

        if vitals.entity() != entity {
            return Err(ConfigError::EntityMismatch {
                entity,
                vitals: vitals.entity(),
            });
        }

        Ok(Combatant {
            entity,
            vitals,
            statuses: StatusRegistry::new(entity, interactions),
            invulnerable: self.invulnerable,
            exceptions: self.exceptions,
        })
    }
}
