use crate::interaction::InteractionKind;
use crate::result::CombatResult;
use crate::state::{EntityId, RunnerId};
use crate::tag::{Category, Tag, TagSet};

/// Lifecycle notification queued by a [`super::StatusRegistry`].
///
/// Events are queued in the order things happened and drained by the owner
/// with [`super::StatusRegistry::drain_events`].
#[derive(Clone, Debug, PartialEq)]
pub enum StatusEvent {
    /// A runner was admitted and started.
    RunnerAdded {
        runner: RunnerId,
        status: String,
        source: EntityId,
        tags: TagSet,
    },

    /// A runner finished and was removed. Raised exactly once per runner.
    RunnerRemoved {
        runner: RunnerId,
        status: String,
        source: EntityId,
        tags: TagSet,
        was_dispelled: bool,
    },

    /// An overflowing stack refreshed an existing runner instead of being admitted.
    RunnerRefreshed { runner: RunnerId, remaining: f32 },

    /// A category interaction rule fired against an active runner.
    InteractionResolved {
        incoming: Category,
        existing: Category,
        kind: InteractionKind,
        runner: RunnerId,
    },

    /// First runner carrying the tag was admitted.
    TagStarted(Tag),

    /// Last runner carrying the tag was removed.
    TagEnded(Tag),

    /// A runner applied one of its effects.
    EffectApplied(CombatResult),
}
