//! Per-entity status registry: admission pipeline, runner lifecycle and tag counts.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::error::StatusError;
use crate::interaction::{InteractionKind, InteractionRegistry};
use crate::result::CombatResult;
use crate::state::{CombatTarget, EntityId, RunnerId};
use crate::status::StatusSpec;
use crate::tag::{Category, StackPolicy, StackPolicyResult, Tag, TagSet};

use super::events::StatusEvent;
use super::runner::{DurationChange, RunnerCapabilities, StatusRunner};

/// Outcome of [`StatusRegistry::admit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    /// The runner was appended and started.
    Admitted(RunnerId),
    /// The stack was full; an existing runner absorbed the application.
    Refreshed(RunnerId),
    /// A stack policy refused the runner.
    Rejected,
    /// A `CancelIncoming` interaction refused the runner.
    Cancelled,
}

impl Admission {
    /// True for outcomes where the application took effect.
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Admitted(_) | Self::Refreshed(_))
    }

    pub fn runner(self) -> Option<RunnerId> {
        match self {
            Self::Admitted(id) | Self::Refreshed(id) => Some(id),
            Self::Rejected | Self::Cancelled => None,
        }
    }
}

enum InteractionFlow {
    Continue,
    Cancel,
    Transform(Arc<StatusSpec>),
}

/// Owns every active runner on one entity.
///
/// Runners are kept in admission order (front = oldest) and a tag reference
/// count table is maintained in lockstep: `count[tag]` always equals the number
/// of active runners carrying `tag`, and tags with no runner have no entry.
#[derive(Debug)]
pub struct StatusRegistry {
    entity: EntityId,
    interactions: Arc<InteractionRegistry>,
    runners: Vec<StatusRunner>,
    tag_counts: HashMap<Tag, u32>,
    next_id: u64,
    events: VecDeque<StatusEvent>,
}

impl StatusRegistry {
    pub fn new(entity: EntityId, interactions: Arc<InteractionRegistry>) -> Self {
        Self {
            entity,
            interactions,
            runners: Vec::new(),
            tag_counts: HashMap::new(),
            next_id: 1,
            events: VecDeque::new(),
        }
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn interactions(&self) -> &Arc<InteractionRegistry> {
        &self.interactions
    }

    // ========================================================================
    // Read API
    // ========================================================================

    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tag_counts.contains_key(tag)
    }

    pub fn tag_count(&self, tag: &Tag) -> u32 {
        self.tag_counts.get(tag).copied().unwrap_or(0)
    }

    pub fn runners(&self) -> impl Iterator<Item = &StatusRunner> + '_ {
        self.runners.iter()
    }

    /// Active runners carrying `tag`, oldest first.
    pub fn runners_with_tag<'a>(&'a self, tag: &'a Tag) -> impl Iterator<Item = &'a StatusRunner> + 'a {
        self.runners.iter().filter(move |r| r.tags().contains(tag))
    }

    /// Active runners with a tag in `category` or any of its descendants.
    pub fn runners_with_category<'a>(
        &'a self,
        category: &'a Category,
    ) -> impl Iterator<Item = &'a StatusRunner> + 'a {
        self.runners
            .iter()
            .filter(move |r| r.tags().has_category(category))
    }

    pub fn runner(&self, id: RunnerId) -> Option<&StatusRunner> {
        self.runners.iter().find(|r| r.id() == Some(id))
    }

    pub fn len(&self) -> usize {
        self.runners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runners.is_empty()
    }

    /// Takes every queued lifecycle event, oldest first.
    pub fn drain_events(&mut self) -> impl Iterator<Item = StatusEvent> + '_ {
        self.events.drain(..)
    }

    // ========================================================================
    // Admission
    // ========================================================================

    /// Runs the admission pipeline. Returns false if the runner was refused.
    pub fn add_status(&mut self, runner: StatusRunner, target: &mut dyn CombatTarget) -> bool {
        self.admit(runner, target).is_accepted()
    }

    /// Runs the admission pipeline and reports what happened.
    ///
    /// Order: stack policies, refresh or replace on overflow, category
    /// interactions, then admission. A transform restarts the pipeline once with
    /// the replacement status.
    pub fn admit(&mut self, runner: StatusRunner, target: &mut dyn CombatTarget) -> Admission {
        let mut runner = runner;
        let mut transformed = false;

        loop {
            let (verdict, refresh_tag) = self.evaluate_stacking(runner.tags());

            if verdict.is_reject() {
                tracing::debug!(entity = %self.entity, status = runner.name(), "rejected by stack policy");
                return Admission::Rejected;
            }

            if verdict.contains(StackPolicyResult::REFRESH_OLDEST) {
                return self.refresh_oldest(&runner, refresh_tag.as_ref());
            }

            if verdict.contains(StackPolicyResult::REPLACE_OLDEST)
                && let Some(oldest) = self.oldest_sharing(runner.tags(), RunnerCapabilities::empty())
            {
                tracing::debug!(entity = %self.entity, runner = %oldest, "replacing oldest stack");
                self.stop(oldest, true, target);
            }

            match self.resolve_interactions(&runner, !transformed, target) {
                InteractionFlow::Continue => {}
                InteractionFlow::Cancel => {
                    tracing::debug!(entity = %self.entity, status = runner.name(), "cancelled by interaction");
                    return Admission::Cancelled;
                }
                InteractionFlow::Transform(replacement) => {
                    tracing::debug!(
                        entity = %self.entity,
                        from = runner.name(),
                        to = %replacement.name,
                        "transformed by interaction"
                    );
                    runner = StatusRunner::new(replacement, runner.source()).with_potency(runner.potency());
                    transformed = true;
                    continue;
                }
            }

            return Admission::Admitted(self.insert(runner, target));
        }
    }

    /// Folds every policy-bearing tag's verdict. Also returns the highest
    /// precedence tag whose verdict asked for a refresh; its policy drives the
    /// refreshed duration.
    fn evaluate_stacking(&self, tags: &TagSet) -> (StackPolicyResult, Option<Tag>) {
        let mut verdict = StackPolicyResult::ACCEPT;
        let mut refresh_tag = None;

        for tag in tags.by_priority() {
            let Some(policy) = tag.stack_policy() else {
                continue;
            };
            let result = policy.evaluate(self.tag_count(tag));
            if result.contains(StackPolicyResult::REFRESH_OLDEST) && refresh_tag.is_none() {
                refresh_tag = Some(tag.clone());
            }
            verdict = verdict.combine(result);
        }

        (verdict, refresh_tag)
    }

    fn refresh_oldest(&mut self, incoming: &StatusRunner, tag: Option<&Tag>) -> Admission {
        let policy = tag
            .and_then(Tag::stack_policy)
            .copied()
            .unwrap_or_else(StackPolicy::unlimited);

        let Some(oldest) = self.oldest_sharing(incoming.tags(), RunnerCapabilities::REFRESHABLE) else {
            tracing::debug!(entity = %self.entity, status = incoming.name(), "no refreshable stack, rejecting");
            return Admission::Rejected;
        };
        let Some(runner) = self.runners.iter_mut().find(|r| r.id() == Some(oldest)) else {
            return Admission::Rejected;
        };

        let remaining = runner.remaining().unwrap_or(0.0);
        let incoming_duration = incoming.spec().duration_secs().unwrap_or(remaining);
        let duration = policy.calculate_duration(remaining, incoming_duration);
        runner.refresh(duration);

        tracing::debug!(entity = %self.entity, runner = %oldest, remaining, duration, "refreshed oldest stack");
        self.events.push_back(StatusEvent::RunnerRefreshed {
            runner: oldest,
            remaining: duration,
        });
        Admission::Refreshed(oldest)
    }

    /// Oldest active runner sharing any of `tags` and supporting `required`.
    fn oldest_sharing(&self, tags: &TagSet, required: RunnerCapabilities) -> Option<RunnerId> {
        self.runners
            .iter()
            .filter(|r| r.is_active() && r.supports(required))
            .find(|r| r.tags().intersects(tags))
            .and_then(StatusRunner::id)
    }

    fn resolve_interactions(
        &mut self,
        incoming: &StatusRunner,
        allow_transform: bool,
        target: &mut dyn CombatTarget,
    ) -> InteractionFlow {
        let interactions = Arc::clone(&self.interactions);
        if interactions.is_empty() {
            return InteractionFlow::Continue;
        }

        let snapshot: Vec<(RunnerId, Vec<Category>)> = self
            .runners
            .iter()
            .filter_map(|r| Some((r.id()?, r.tags().categories())))
            .collect();

        for incoming_category in incoming.tags().categories() {
            if !interactions.reacts_to(&incoming_category) {
                continue;
            }

            for (id, existing_categories) in &snapshot {
                // Earlier rules may already have removed this runner.
                if self.runner(*id).is_none() {
                    continue;
                }

                let Some((rule, existing_category)) = existing_categories.iter().find_map(|existing| {
                    interactions
                        .resolve(&incoming_category, existing)
                        .map(|rule| (rule, existing))
                }) else {
                    continue;
                };

                tracing::debug!(
                    entity = %self.entity,
                    incoming = %incoming_category,
                    existing = %existing_category,
                    kind = %rule.kind,
                    runner = %id,
                    "interaction matched"
                );

                match rule.kind {
                    InteractionKind::CancelExisting | InteractionKind::CancelBoth => {
                        self.stop(*id, true, target);
                    }
                    InteractionKind::ReduceDuration => {
                        self.mutate_duration(*id, DurationChange::Reduce(rule.magnitude), target);
                    }
                    InteractionKind::Amplify => {
                        if let Some(runner) = self.runners.iter_mut().find(|r| r.id() == Some(*id)) {
                            runner.amplify(rule.magnitude);
                        }
                    }
                    InteractionKind::CancelIncoming => {
                        self.push_interaction(&incoming_category, existing_category, rule.kind, *id);
                        return InteractionFlow::Cancel;
                    }
                    InteractionKind::Transform => match &rule.replacement {
                        Some(replacement) if allow_transform => {
                            self.push_interaction(&incoming_category, existing_category, rule.kind, *id);
                            return InteractionFlow::Transform(Arc::clone(replacement));
                        }
                        Some(_) => {
                            tracing::debug!(entity = %self.entity, "transform already applied, ignoring");
                            continue;
                        }
                        None => {
                            tracing::warn!(
                                incoming = %incoming_category,
                                existing = %existing_category,
                                "transform rule has no replacement status"
                            );
                            continue;
                        }
                    },
                }

                self.push_interaction(&incoming_category, existing_category, rule.kind, *id);
            }
        }

        InteractionFlow::Continue
    }

    fn push_interaction(
        &mut self,
        incoming: &Category,
        existing: &Category,
        kind: InteractionKind,
        runner: RunnerId,
    ) {
        self.events.push_back(StatusEvent::InteractionResolved {
            incoming: incoming.clone(),
            existing: existing.clone(),
            kind,
            runner,
        });
    }

    /// Appends, counts tags, records and starts the runner.
    fn insert(&mut self, mut runner: StatusRunner, target: &mut dyn CombatTarget) -> RunnerId {
        let id = RunnerId(self.next_id);
        self.next_id += 1;

        for tag in runner.tags() {
            let count = self.tag_counts.entry(tag.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                self.events.push_back(StatusEvent::TagStarted(tag.clone()));
            }
        }
        self.events.push_back(StatusEvent::RunnerAdded {
            runner: id,
            status: runner.name().to_owned(),
            source: runner.source(),
            tags: runner.tags().clone(),
        });
        tracing::debug!(entity = %self.entity, runner = %id, status = runner.name(), "admitted");

        let mut out = Vec::new();
        runner.activate(id, target, &mut out);
        let finished = runner.is_finished();
        self.runners.push(runner);
        self.flush(out);

        if finished {
            self.remove_at(self.runners.len() - 1);
        }
        self.check_tag_counts();
        id
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Advances every runner by `dt`, removing runners as they finish.
    pub fn tick(&mut self, dt: f32, target: &mut dyn CombatTarget) {
        let ids: Vec<RunnerId> = self.runners.iter().filter_map(StatusRunner::id).collect();
        tracing::trace!(entity = %self.entity, dt, runners = ids.len(), "tick");

        for id in ids {
            let Some(index) = self.index_of(id) else {
                continue;
            };
            let mut out = Vec::new();
            self.runners[index].tick(dt, target, &mut out);
            let finished = self.runners[index].is_finished();
            self.flush(out);
            if finished {
                self.remove_at(index);
            }
        }
        self.check_tag_counts();
    }

    /// Stops a runner. Stopping an unknown or removed runner is ignored.
    pub fn stop(&mut self, id: RunnerId, was_dispelled: bool, target: &mut dyn CombatTarget) -> bool {
        let Some(index) = self.index_of(id) else {
            tracing::debug!(entity = %self.entity, runner = %id, "stop of inactive runner ignored");
            return false;
        };

        let mut out = Vec::new();
        self.runners[index].finish(was_dispelled, target, &mut out);
        self.flush(out);
        self.remove_at(index);
        self.check_tag_counts();
        true
    }

    /// Force-stops every runner in `category` (hierarchy-aware). Returns how many stopped.
    pub fn dispel_category(&mut self, category: &Category, target: &mut dyn CombatTarget) -> usize {
        let ids: Vec<RunnerId> = self
            .runners_with_category(category)
            .filter_map(StatusRunner::id)
            .collect();
        tracing::debug!(entity = %self.entity, %category, count = ids.len(), "dispel");

        let mut stopped = 0;
        for id in ids {
            if self.stop(id, true, target) {
                stopped += 1;
            }
        }
        stopped
    }

    /// Force-stops every runner, oldest first.
    pub fn clear_all(&mut self, target: &mut dyn CombatTarget) {
        let ids: Vec<RunnerId> = self.runners.iter().filter_map(StatusRunner::id).collect();
        for id in ids {
            self.stop(id, true, target);
        }
    }

    /// Changes a runner's remaining duration.
    ///
    /// # Errors
    ///
    /// [`StatusError::RunnerNotActive`] for unknown runners and
    /// [`StatusError::Unsupported`] for variants without a mutable duration.
    pub fn modify_duration(
        &mut self,
        id: RunnerId,
        change: DurationChange,
        target: &mut dyn CombatTarget,
    ) -> Result<(), StatusError> {
        let runner = self.runner(id).ok_or(StatusError::RunnerNotActive(id))?;
        if !runner.supports(RunnerCapabilities::DURATION_MUTABLE) {
            return Err(StatusError::Unsupported {
                runner: id,
                operation: "duration change",
            });
        }
        self.mutate_duration(id, change, target);
        Ok(())
    }

    /// Multiplies a runner's potency.
    ///
    /// # Errors
    ///
    /// [`StatusError::RunnerNotActive`] for unknown runners and
    /// [`StatusError::Unsupported`] for variants that cannot be amplified.
    pub fn amplify(&mut self, id: RunnerId, factor: f32) -> Result<(), StatusError> {
        let runner = self
            .runners
            .iter_mut()
            .find(|r| r.id() == Some(id))
            .ok_or(StatusError::RunnerNotActive(id))?;
        if runner.amplify(factor) {
            Ok(())
        } else {
            Err(StatusError::Unsupported {
                runner: id,
                operation: "amplify",
            })
        }
    }

    fn mutate_duration(&mut self, id: RunnerId, change: DurationChange, target: &mut dyn CombatTarget) {
        let Some(index) = self.index_of(id) else {
            return;
        };
        let mut out = Vec::new();
        self.runners[index].modify_duration(change, target, &mut out);
        let finished = self.runners[index].is_finished();
        self.flush(out);
        if finished {
            self.remove_at(index);
        }
        self.check_tag_counts();
    }

    // ========================================================================
    // Bookkeeping
    // ========================================================================

    fn index_of(&self, id: RunnerId) -> Option<usize> {
        self.runners.iter().position(|r| r.id() == Some(id))
    }

    fn flush(&mut self, results: Vec<CombatResult>) {
        self.events
            .extend(results.into_iter().map(StatusEvent::EffectApplied));
    }

    /// Removes a finished runner, decrements tag counts and records the removal.
    fn remove_at(&mut self, index: usize) {
        let runner = self.runners.remove(index);

        for tag in runner.tags() {
            if let Some(count) = self.tag_counts.get_mut(tag) {
                *count -= 1;
                if *count == 0 {
                    self.tag_counts.remove(tag);
                    self.events.push_back(StatusEvent::TagEnded(tag.clone()));
                }
            }
        }

        let Some(id) = runner.id() else {
            return;
        };
        self.events.push_back(StatusEvent::RunnerRemoved {
            runner: id,
            status: runner.name().to_owned(),
            source: runner.source(),
            tags: runner.tags().clone(),
            was_dispelled: runner.was_dispelled(),
        });
    }

    /// Returns true if the tag count table matches the active runners exactly.
    pub fn verify_tag_counts(&self) -> bool {
        let mut expected: HashMap<&Tag, u32> = HashMap::new();
        for tag in self.runners.iter().flat_map(|r| r.tags().iter()) {
            *expected.entry(tag).or_insert(0) += 1;
        }
        expected.len() == self.tag_counts.len()
            && expected
                .iter()
                .all(|(tag, count)| self.tag_counts.get(*tag) == Some(count))
    }

    fn check_tag_counts(&self) {
        debug_assert!(
            self.verify_tag_counts(),
            "tag counts out of sync on {}",
            self.entity
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{DamageEffect, DamageType, Effect};
    use crate::interaction::CategoryInteraction;
    use crate::state::Vitals;
    use crate::tag::{DurationBehavior, OverflowBehavior};

    fn create_test_target() -> Vitals {
        Vitals::new(EntityId(2), 100.0).unwrap()
    }

    fn create_test_registry() -> StatusRegistry {
        StatusRegistry::new(EntityId(2), Arc::new(InteractionRegistry::new()))
    }

    fn runner(spec: &Arc<StatusSpec>) -> StatusRunner {
        StatusRunner::new(Arc::clone(spec), EntityId(1))
    }

    fn removed(registry: &mut StatusRegistry) -> Vec<(RunnerId, bool)> {
        registry
            .drain_events()
            .filter_map(|event| match event {
                StatusEvent::RunnerRemoved {
                    runner,
                    was_dispelled,
                    ..
                } => Some((runner, was_dispelled)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn tag_counts_track_runners() {
        let burn = Tag::new("Burn", 5);
        let spec = StatusSpec::duration("Burn", 1.0).tag(burn.clone()).shared();
        let mut registry = create_test_registry();
        let mut target = create_test_target();

        assert!(registry.add_status(runner(&spec), &mut target));
        assert!(registry.add_status(runner(&spec), &mut target));
        assert_eq!(registry.tag_count(&burn), 2);
        assert!(registry.verify_tag_counts());

        registry.tick(1.0, &mut target);
        assert_eq!(registry.tag_count(&burn), 0);
        assert!(!registry.has_tag(&burn));
        assert!(registry.is_empty());

        let events: Vec<_> = registry.drain_events().collect();
        let started = events.iter().filter(|e| matches!(e, StatusEvent::TagStarted(_))).count();
        let ended = events.iter().filter(|e| matches!(e, StatusEvent::TagEnded(_))).count();
        assert_eq!((started, ended), (1, 1));
    }

    #[test]
    fn reject_overflow_leaves_registry_untouched() {
        let stun = Tag::builder("Stun")
            .stack_policy(StackPolicy::limited(1, OverflowBehavior::Reject))
            .build();
        let spec = StatusSpec::duration("Stun", 1.0).tag(stun.clone()).shared();
        let mut registry = create_test_registry();
        let mut target = create_test_target();

        assert!(registry.add_status(runner(&spec), &mut target));
        assert_eq!(registry.admit(runner(&spec), &mut target), Admission::Rejected);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.tag_count(&stun), 1);
    }

    #[test]
    fn refresh_oldest_extends_without_admitting() {
        let burn = Tag::builder("Burn")
            .stack_policy(
                StackPolicy::limited(2, OverflowBehavior::RefreshOldest)
                    .duration_behavior(DurationBehavior::Extend)
                    .max_total_duration(5.0),
            )
            .build();
        let spec = StatusSpec::duration("Burn", 3.0).tag(burn.clone()).shared();
        let mut registry = create_test_registry();
        let mut target = create_test_target();

        let first = registry.admit(runner(&spec), &mut target).runner().unwrap();
        registry.tick(1.0, &mut target);
        registry.admit(runner(&spec), &mut target);

        assert_eq!(registry.admit(runner(&spec), &mut target), Admission::Refreshed(first));
        assert_eq!(registry.len(), 2);
        // 2 remaining + 3 incoming, capped at 5.
        assert_eq!(registry.runner(first).and_then(StatusRunner::remaining), Some(5.0));
    }

    #[test]
    fn replace_oldest_dispels_then_admits() {
        let bleed = Tag::builder("Bleed")
            .stack_policy(StackPolicy::limited(2, OverflowBehavior::ReplaceOldest))
            .build();
        let spec = StatusSpec::duration("Bleed", 3.0).tag(bleed.clone()).shared();
        let mut registry = create_test_registry();
        let mut target = create_test_target();

        let first = registry.admit(runner(&spec), &mut target).runner().unwrap();
        registry.admit(runner(&spec), &mut target);
        registry.drain_events().for_each(drop);

        assert!(registry.add_status(runner(&spec), &mut target));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.tag_count(&bleed), 2);
        assert!(registry.runner(first).is_none());
        assert_eq!(removed(&mut registry), vec![(first, true)]);
    }

    #[test]
    fn stop_notifies_exactly_once() {
        let spec = StatusSpec::duration("Chill", 5.0).shared();
        let mut registry = create_test_registry();
        let mut target = create_test_target();

        let id = registry.admit(runner(&spec), &mut target).runner().unwrap();
        assert!(registry.stop(id, true, &mut target));
        assert!(!registry.stop(id, false, &mut target));
        registry.tick(10.0, &mut target);

        assert_eq!(removed(&mut registry), vec![(id, true)]);
    }

    #[test]
    fn interactions_apply_in_insertion_order() {
        let fire = Category::new("Fire");
        let water = Category::new("Water");
        let frost = Category::new("Frost");
        let interactions = InteractionRegistry::new()
            .with(CategoryInteraction::new(&water, &fire, InteractionKind::CancelExisting))
            .with(CategoryInteraction::new(&water, &frost, InteractionKind::Amplify).magnitude(2.0));
        let mut registry = StatusRegistry::new(EntityId(2), Arc::new(interactions));
        let mut target = create_test_target();

        let burn = StatusSpec::duration("Burn", 5.0)
            .tag(Tag::builder("Burn").category(&fire).build())
            .shared();
        let chill = StatusSpec::tick("Chill", 5.0, 1.0)
            .tag(Tag::builder("Chill").category(&frost).build())
            .on_tick(Effect::new(DamageEffect::new(1.0, DamageType::True)))
            .shared();
        let soak = StatusSpec::duration("Soak", 5.0)
            .tag(Tag::builder("Soak").category(&water).build())
            .shared();

        let burn_id = registry.admit(runner(&burn), &mut target).runner().unwrap();
        let chill_id = registry.admit(runner(&chill), &mut target).runner().unwrap();
        assert!(registry.add_status(runner(&soak), &mut target));

        assert!(registry.runner(burn_id).is_none());
        assert_eq!(registry.runner(chill_id).map(StatusRunner::potency), Some(2.0));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn reduce_duration_interaction_can_expire_existing() {
        let fire = Category::new("Fire");
        let frost = Category::new("Frost");
        let interactions = InteractionRegistry::new().with(
            CategoryInteraction::new(&fire, &frost, InteractionKind::ReduceDuration).magnitude(2.0),
        );
        let mut registry = StatusRegistry::new(EntityId(2), Arc::new(interactions));
        let mut target = create_test_target();

        let chill = StatusSpec::duration("Chill", 3.0)
            .tag(Tag::builder("Chill").category(&frost).build())
            .shared();
        let burn = StatusSpec::duration("Burn", 3.0)
            .tag(Tag::builder("Burn").category(&fire).build())
            .shared();

        let chill_id = registry.admit(runner(&chill), &mut target).runner().unwrap();
        registry.add_status(runner(&burn), &mut target);
        assert_eq!(registry.runner(chill_id).and_then(StatusRunner::remaining), Some(1.0));

        registry.add_status(runner(&burn), &mut target);
        assert!(registry.runner(chill_id).is_none());
        assert!(registry.verify_tag_counts());
    }

    #[test]
    fn cancel_incoming_refuses_admission() {
        let holy = Category::new("Holy");
        let shadow = Category::new("Shadow");
        let interactions = InteractionRegistry::new()
            .with(CategoryInteraction::new(&shadow, &holy, InteractionKind::CancelIncoming));
        let mut registry = StatusRegistry::new(EntityId(2), Arc::new(interactions));
        let mut target = create_test_target();

        let ward = StatusSpec::duration("Ward", 5.0)
            .tag(Tag::builder("Ward").category(&holy).build())
            .shared();
        let curse = StatusSpec::duration("Curse", 5.0)
            .tag(Tag::builder("Curse").category(&shadow).build())
            .shared();

        registry.add_status(runner(&ward), &mut target);
        assert_eq!(registry.admit(runner(&curse), &mut target), Admission::Cancelled);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn transform_substitutes_replacement_once() {
        let fire = Category::new("Fire");
        let oil = Category::new("Oil");
        let explosion = StatusSpec::delayed("Explosion", 0.0)
            .on_end(Effect::new(DamageEffect::new(30.0, DamageType::True)))
            .shared();
        let interactions = InteractionRegistry::new().with(
            CategoryInteraction::new(&fire, &oil, InteractionKind::Transform)
                .replacement(Arc::clone(&explosion)),
        );
        let mut registry = StatusRegistry::new(EntityId(2), Arc::new(interactions));
        let mut target = create_test_target();

        let slick = StatusSpec::duration("Slick", 5.0)
            .tag(Tag::builder("Slick").category(&oil).build())
            .shared();
        let burn = StatusSpec::duration("Burn", 5.0)
            .tag(Tag::builder("Burn").category(&fire).build())
            .shared();

        registry.add_status(runner(&slick), &mut target);
        assert!(registry.add_status(runner(&burn), &mut target));

        // The explosion fired immediately and finished; Burn never started.
        assert_eq!(target.health(), 70.0);
        assert_eq!(registry.len(), 1);
        assert!(registry.runners().all(|r| r.name() == "Slick"));
    }

    #[test]
    fn dispel_category_is_hierarchy_aware() {
        let elemental = Category::new("Elemental");
        let fire = Category::with_parent("Fire", &elemental);
        let burn = StatusSpec::duration("Burn", 5.0)
            .tag(Tag::builder("Burn").category(&fire).build())
            .shared();
        let haste = StatusSpec::duration("Haste", 5.0).tag(Tag::new("Haste", 0)).shared();
        let mut registry = create_test_registry();
        let mut target = create_test_target();

        registry.add_status(runner(&burn), &mut target);
        registry.add_status(runner(&burn), &mut target);
        registry.add_status(runner(&haste), &mut target);

        assert_eq!(registry.runners_with_category(&elemental).count(), 2);
        assert_eq!(registry.dispel_category(&elemental, &mut target), 2);
        assert_eq!(registry.len(), 1);

        registry.clear_all(&mut target);
        assert!(registry.is_empty());
        assert!(registry.verify_tag_counts());
    }

    #[test]
    fn explicit_operations_report_errors() {
        let fuse = StatusSpec::delayed("Fuse", 5.0).shared();
        let mut registry = create_test_registry();
        let mut target = create_test_target();
        let id = registry.admit(runner(&fuse), &mut target).runner().unwrap();

        assert!(matches!(
            registry.modify_duration(id, DurationChange::Set(1.0), &mut target),
            Err(StatusError::Unsupported { .. })
        ));
        assert_eq!(
            registry.amplify(RunnerId(99), 2.0),
            Err(StatusError::RunnerNotActive(RunnerId(99)))
        );
        assert!(registry.amplify(id, 2.0).is_ok());
    }

    #[test]
    fn parent_category_rule_applies_to_child_status() {
        let elemental = Category::new("Elemental");
        let fire = Category::with_parent("Fire", &elemental);
        let water = Category::new("Water");
        let interactions = InteractionRegistry::new().with(CategoryInteraction::new(
            &water,
            &elemental,
            InteractionKind::CancelExisting,
        ));
        let mut registry = StatusRegistry::new(EntityId(2), Arc::new(interactions));
        let mut target = create_test_target();

        let burn = StatusSpec::duration("Burn", 5.0)
            .tag(Tag::builder("Burn").category(&fire).build())
            .shared();
        let soak = StatusSpec::duration("Soak", 5.0)
            .tag(Tag::builder("Soak").category(&water).build())
            .shared();

        let burn_id = registry.admit(runner(&burn), &mut target).runner().unwrap();
        registry.drain_events().for_each(drop);
        assert!(registry.add_status(runner(&soak), &mut target));

        let names: Vec<&str> = registry.runners().map(StatusRunner::name).collect();
        assert_eq!(names, vec!["Soak"]);
        let resolved: Vec<_> = registry
            .drain_events()
            .filter_map(|event| match event {
                StatusEvent::InteractionResolved { existing, runner, .. } => Some((existing, runner)),
                _ => None,
            })
            .collect();
        assert_eq!(resolved, vec![(fire, burn_id)]);
    }

    #[test]
    fn refresh_policy_comes_from_highest_precedence_tag() {
        let chill = Tag::builder("Chill")
            .priority(5)
            .stack_policy(
                StackPolicy::limited(1, OverflowBehavior::RefreshOldest)
                    .duration_behavior(DurationBehavior::Extend),
            )
            .build();
        let frostbite = Tag::builder("Frostbite")
            .priority(1)
            .stack_policy(StackPolicy::limited(1, OverflowBehavior::RefreshOldest))
            .build();
        let spec = StatusSpec::duration("Freeze", 3.0).tag(chill).tag(frostbite).shared();
        let mut registry = create_test_registry();
        let mut target = create_test_target();

        let first = registry.admit(runner(&spec), &mut target).runner().unwrap();
        registry.tick(1.0, &mut target);

        assert_eq!(registry.admit(runner(&spec), &mut target), Admission::Refreshed(first));
        // Frostbite's default policy replaces the remaining time; Chill would extend it to 5.
        assert_eq!(registry.runner(first).and_then(StatusRunner::remaining), Some(3.0));
    }

    #[test]
    fn interactions_follow_incoming_tag_precedence() {
        let fire = Category::new("Fire");
        let water = Category::new("Water");
        let holy = Category::new("Holy");
        let interactions = InteractionRegistry::new()
            .with(CategoryInteraction::new(&water, &fire, InteractionKind::CancelIncoming))
            .with(CategoryInteraction::new(&holy, &fire, InteractionKind::Amplify).magnitude(2.0));
        let mut registry = StatusRegistry::new(EntityId(2), Arc::new(interactions));
        let mut target = create_test_target();

        let burn = StatusSpec::duration("Burn", 5.0)
            .tag(Tag::builder("Burn").category(&fire).build())
            .shared();
        let blessed_rain = StatusSpec::duration("Blessed Rain", 5.0)
            .tag(Tag::builder("Rain").priority(5).category(&water).build())
            .tag(Tag::builder("Blessing").priority(1).category(&holy).build())
            .shared();

        let burn_id = registry.admit(runner(&burn), &mut target).runner().unwrap();
        assert_eq!(registry.admit(runner(&blessed_rain), &mut target), Admission::Cancelled);

        // Holy outranks Water, so the amplify landed before the cancel.
        assert_eq!(registry.runner(burn_id).map(StatusRunner::potency), Some(2.0));
        assert_eq!(registry.len(), 1);
    }
}
