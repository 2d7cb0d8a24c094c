//! Category interaction rules: what happens when an incoming status meets an active one.
//!
//! The registry is a pure lookup. Applying a rule's consequences is the job of
//! [`crate::status::StatusRegistry::add_status`].

use std::sync::Arc;

use crate::status::StatusSpec;
use crate::tag::Category;

/// Resolution strategy of a matched rule.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum InteractionKind {
    /// Force-stop the existing runner.
    CancelExisting,
    /// Shorten the existing runner by `magnitude` seconds.
    ReduceDuration,
    /// Refuse the incoming runner.
    CancelIncoming,
    /// Force-stop the existing runner; the incoming one is still admitted.
    CancelBoth,
    /// Replace the incoming runner with the rule's replacement status.
    Transform,
    /// Multiply the existing runner's potency by `magnitude`.
    Amplify,
}

/// One rule between an incoming and an existing category.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryInteraction {
    pub incoming: Category,
    pub existing: Category,
    pub kind: InteractionKind,
    /// Seconds for `ReduceDuration`, multiplier for `Amplify`, unused otherwise.
    pub magnitude: f32,
    /// Also match with the roles swapped.
    pub bidirectional: bool,
    /// Status substituted by `Transform`.
    pub replacement: Option<Arc<StatusSpec>>,
}

impl CategoryInteraction {
    pub fn new(incoming: &Category, existing: &Category, kind: InteractionKind) -> Self {
        Self {
            incoming: incoming.clone(),
            existing: existing.clone(),
            kind,
            magnitude: 0.0,
            bidirectional: false,
            replacement: None,
        }
    }

    /// Builder: set magnitude.
    pub fn magnitude(mut self, magnitude: f32) -> Self {
        self.magnitude = magnitude;
        self
    }

    /// Builder: match in both directions.
    pub fn bidirectional(mut self) -> Self {
        self.bidirectional = true;
        self
    }

    /// Builder: set the status a `Transform` substitutes.
    pub fn replacement(mut self, status: Arc<StatusSpec>) -> Self {
        self.replacement = Some(status);
        self
    }

    /// Returns true if the rule applies to this pairing.
    pub fn matches(&self, incoming: &Category, existing: &Category) -> bool {
        (self.incoming == *incoming && self.existing == *existing)
            || (self.bidirectional && self.incoming == *existing && self.existing == *incoming)
    }
}

/// Ordered rule table. The first matching rule wins.
#[derive(Clone, Debug, Default)]
pub struct InteractionRegistry {
    rules: Vec<CategoryInteraction>,
}

impl InteractionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, rule: CategoryInteraction) {
        tracing::debug!(
            incoming = %rule.incoming,
            existing = %rule.existing,
            kind = %rule.kind,
            bidirectional = rule.bidirectional,
            "registered interaction"
        );
        self.rules.push(rule);
    }

    /// Builder: register a rule.
    pub fn with(mut self, rule: CategoryInteraction) -> Self {
        self.register(rule);
        self
    }

    /// First rule matching the pairing. Either side absent matches nothing.
    pub fn find_interaction(
        &self,
        incoming: Option<&Category>,
        existing: Option<&Category>,
    ) -> Option<&CategoryInteraction> {
        let (incoming, existing) = (incoming?, existing?);
        self.rules
            .iter()
            .find(|rule| rule.matches(incoming, existing))
    }

    /// Rules where `category` is the incoming side, plus bidirectional rules
    /// where it is the existing side.
    pub fn interactions_for_incoming<'a>(
        &'a self,
        category: &'a Category,
    ) -> impl Iterator<Item = &'a CategoryInteraction> + 'a {
        self.rules.iter().filter(move |rule| {
            rule.incoming == *category || (rule.bidirectional && rule.existing == *category)
        })
    }

    /// Most specific rule for the pairing. Walks `incoming`'s lineage child
    /// first and, for each step, every ancestor of `existing` child first.
    pub fn resolve(&self, incoming: &Category, existing: &Category) -> Option<&CategoryInteraction> {
        incoming.lineage().find_map(|incoming| {
            existing
                .lineage()
                .find_map(|existing| self.find_interaction(Some(incoming), Some(existing)))
        })
    }

    /// Returns true if some rule can fire when `category`, or a category
    /// under it, arrives.
    pub fn reacts_to(&self, category: &Category) -> bool {
        category
            .lineage()
            .any(|c| self.interactions_for_incoming(c).next().is_some())
    }

    pub fn rules(&self) -> &[CategoryInteraction] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_way_rule_matches_declared_order_only() {
        let water = Category::new("Water");
        let fire = Category::new("Fire");
        let registry = InteractionRegistry::new().with(CategoryInteraction::new(
            &water,
            &fire,
            InteractionKind::CancelExisting,
        ));

        assert!(registry.find_interaction(Some(&water), Some(&fire)).is_some());
        assert!(registry.find_interaction(Some(&fire), Some(&water)).is_none());
    }

    #[test]
    fn bidirectional_rule_matches_both_orders() {
        let water = Category::new("Water");
        let fire = Category::new("Fire");
        let registry = InteractionRegistry::new().with(
            CategoryInteraction::new(&fire, &water, InteractionKind::CancelBoth).bidirectional(),
        );

        assert!(registry.find_interaction(Some(&water), Some(&fire)).is_some());
        assert!(registry.find_interaction(Some(&fire), Some(&water)).is_some());
        assert_eq!(registry.interactions_for_incoming(&water).count(), 1);
    }

    #[test]
    fn absent_category_never_matches() {
        let fire = Category::new("Fire");
        let registry = InteractionRegistry::new().with(CategoryInteraction::new(
            &fire,
            &fire,
            InteractionKind::Amplify,
        ));
        assert!(registry.find_interaction(None, Some(&fire)).is_none());
        assert!(registry.find_interaction(Some(&fire), None).is_none());
    }

    #[test]
    fn first_registered_rule_wins() {
        let fire = Category::new("Fire");
        let frost = Category::new("Frost");
        let registry = InteractionRegistry::new()
            .with(CategoryInteraction::new(&fire, &frost, InteractionKind::ReduceDuration).magnitude(2.0))
            .with(CategoryInteraction::new(&fire, &frost, InteractionKind::CancelExisting));

        let rule = registry.find_interaction(Some(&fire), Some(&frost)).unwrap();
        assert_eq!(rule.kind, InteractionKind::ReduceDuration);
        assert_eq!(rule.magnitude, 2.0);
    }

    #[test]
    fn resolve_prefers_most_specific_pairing() {
        let elemental = Category::new("Elemental");
        let fire = Category::with_parent("Fire", &elemental);
        let water = Category::new("Water");
        let registry = InteractionRegistry::new()
            .with(CategoryInteraction::new(&water, &elemental, InteractionKind::ReduceDuration))
            .with(CategoryInteraction::new(&water, &fire, InteractionKind::CancelExisting));

        assert!(registry.find_interaction(Some(&water), Some(&fire)).is_some());
        assert_eq!(
            registry.resolve(&water, &fire).map(|r| r.kind),
            Some(InteractionKind::CancelExisting)
        );

        let frost = Category::with_parent("Frost", &elemental);
        assert!(registry.find_interaction(Some(&water), Some(&frost)).is_none());
        assert_eq!(
            registry.resolve(&water, &frost).map(|r| r.kind),
            Some(InteractionKind::ReduceDuration)
        );
        assert!(registry.resolve(&water, &Category::new("Holy")).is_none());
    }

    #[test]
    fn parent_rule_covers_incoming_children() {
        let elemental = Category::new("Elemental");
        let fire = Category::with_parent("Fire", &elemental);
        let wet = Category::new("Wet");
        let registry = InteractionRegistry::new().with(CategoryInteraction::new(
            &elemental,
            &wet,
            InteractionKind::Amplify,
        ));

        assert!(registry.reacts_to(&fire));
        assert!(!registry.reacts_to(&wet));
        assert!(registry.resolve(&fire, &wet).is_some());
        assert!(registry.resolve(&wet, &fire).is_none());
    }
}
