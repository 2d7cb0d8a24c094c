//! Outbound boundaries: result listeners and visual playback.

use std::sync::Arc;

use crate::effect::VisualId;
use crate::result::CombatResult;
use crate::state::EntityId;
use crate::tag::Tag;

/// Receives every result a combatant produces, in order, as it happens.
pub trait CombatListener {
    fn on_result(&mut self, result: Arc<CombatResult>);

    /// The first active runner carrying `tag` started on `entity`.
    fn on_tag_started(&mut self, _entity: EntityId, _tag: &Tag) {}

    /// The last active runner carrying `tag` on `entity` finished.
    fn on_tag_ended(&mut self, _entity: EntityId, _tag: &Tag) {}
}

impl CombatListener for Vec<Arc<CombatResult>> {
    fn on_result(&mut self, result: Arc<CombatResult>) {
        self.push(result);
    }
}

/// Fire-and-forget presentation hook.
pub trait VisualController {
    fn play(&mut self, visual: VisualId, target: EntityId);
}

/// Where a combatant publishes results and visuals during one call.
pub struct CombatSinks<'a> {
    pub listener: &'a mut dyn CombatListener,
    pub visuals: Option<&'a mut dyn VisualController>,
}

impl<'a> CombatSinks<'a> {
    pub fn new(listener: &'a mut dyn CombatListener) -> Self {
        Self {
            listener,
            visuals: None,
        }
    }

    /// Builder: attach a visual controller.
    pub fn with_visuals(mut self, visuals: &'a mut dyn VisualController) -> Self {
        self.visuals = Some(visuals);
        self
    }

    pub(crate) fn play(&mut self, visual: VisualId, target: EntityId) {
        if let Some(visuals) = self.visuals.as_deref_mut() {
            visuals.play(visual, target);
        }
    }

    pub(crate) fn publish(&mut self, result: CombatResult) {
        self.listener.on_result(Arc::new(result));
    }
}
