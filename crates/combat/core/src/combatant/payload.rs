use crate::effect::{Effect, EffectContext};
use crate::state::EntityId;

/// Ordered effects delivered by one hit, with the identity of who sent them.
#[derive(Clone, Debug, PartialEq)]
pub struct Payload {
    pub source: EntityId,
    pub effects: Vec<Effect>,
    pub potency: f32,
}

impl Payload {
    pub fn new(source: EntityId) -> Self {
        Self {
            source,
            effects: Vec::new(),
            potency: 1.0,
        }
    }

    /// Builder: append an effect.
    pub fn effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Builder: set potency for every effect in the payload.
    pub fn with_potency(mut self, potency: f32) -> Self {
        self.potency = potency;
        self
    }

    pub fn context(&self) -> EffectContext {
        EffectContext::new(self.source).with_potency(self.potency)
    }
}
