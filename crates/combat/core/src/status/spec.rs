//! Immutable status definitions shared by every runner created from them.

use std::sync::Arc;

use crate::effect::{Effect, StatusCondition};
use crate::tag::{Tag, TagSet};

use super::RunnerCapabilities;

/// Timing variant of a status.
#[derive(Clone, Debug, PartialEq)]
pub enum StatusSpecKind {
    /// Start effect on admit, end effect on expiry.
    Duration { duration: f32 },

    /// Duration plus a tick effect every `interval` seconds.
    Tick { duration: f32, interval: f32 },

    /// Fires the end effect once after `delay`, then finishes.
    Delayed { delay: f32 },

    /// Every `interval` (every frame if non-positive) applies the tick effect and
    /// checks `condition`; once true, applies the end effect and finishes.
    Condition {
        interval: f32,
        condition: StatusCondition,
    },
}

/// Named, tagged status definition.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusSpec {
    pub name: String,
    pub tags: TagSet,
    pub kind: StatusSpecKind,
    pub on_start: Option<Effect>,
    pub on_tick: Option<Effect>,
    pub on_end: Option<Effect>,
    /// Undo the start effect when the runner finishes (Duration and Tick only).
    pub revertible: bool,
}

impl StatusSpec {
    fn with_kind(name: impl Into<String>, kind: StatusSpecKind) -> Self {
        Self {
            name: name.into(),
            tags: TagSet::new(),
            kind,
            on_start: None,
            on_tick: None,
            on_end: None,
            revertible: false,
        }
    }

    pub fn duration(name: impl Into<String>, duration: f32) -> Self {
        Self::with_kind(name, StatusSpecKind::Duration { duration })
    }

    pub fn tick(name: impl Into<String>, duration: f32, interval: f32) -> Self {
        Self::with_kind(name, StatusSpecKind::Tick { duration, interval })
    }

    pub fn delayed(name: impl Into<String>, delay: f32) -> Self {
        Self::with_kind(name, StatusSpecKind::Delayed { delay })
    }

    pub fn condition(name: impl Into<String>, interval: f32, condition: StatusCondition) -> Self {
        Self::with_kind(
            name,
            StatusSpecKind::Condition {
                interval,
                condition,
            },
        )
    }

    /// Builder: add a tag.
    pub fn tag(mut self, tag: Tag) -> Self {
        self.tags.insert(tag);
        self
    }

    /// Builder: set the effect applied on admission.
    pub fn on_start(mut self, effect: Effect) -> Self {
        self.on_start = Some(effect);
        self
    }

    /// Builder: set the periodic effect.
    pub fn on_tick(mut self, effect: Effect) -> Self {
        self.on_tick = Some(effect);
        self
    }

    /// Builder: set the effect applied when the status ends.
    pub fn on_end(mut self, effect: Effect) -> Self {
        self.on_end = Some(effect);
        self
    }

    /// Builder: revert the start effect on finish.
    pub fn revertible(mut self) -> Self {
        self.revertible = true;
        self
    }

    /// Wraps the definition for sharing between runners and effects.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Initial duration for Duration and Tick statuses.
    pub fn duration_secs(&self) -> Option<f32> {
        match self.kind {
            StatusSpecKind::Duration { duration } | StatusSpecKind::Tick { duration, .. } => {
                Some(duration)
            }
            StatusSpecKind::Delayed { .. } | StatusSpecKind::Condition { .. } => None,
        }
    }

    /// Operations runners built from this definition support.
    pub fn capabilities(&self) -> RunnerCapabilities {
        let mut caps = match self.kind {
            StatusSpecKind::Duration { .. } => {
                RunnerCapabilities::DURATION_MUTABLE
                    | RunnerCapabilities::REFRESHABLE
                    | RunnerCapabilities::AMPLIFIABLE
            }
            StatusSpecKind::Tick { .. } => {
                RunnerCapabilities::TICKABLE
                    | RunnerCapabilities::DURATION_MUTABLE
                    | RunnerCapabilities::REFRESHABLE
                    | RunnerCapabilities::AMPLIFIABLE
            }
            StatusSpecKind::Delayed { .. } => RunnerCapabilities::AMPLIFIABLE,
            StatusSpecKind::Condition { .. } => {
                RunnerCapabilities::TICKABLE | RunnerCapabilities::AMPLIFIABLE
            }
        };
        if self.revertible && self.duration_secs().is_some() {
            caps |= RunnerCapabilities::REVERTIBLE;
        }
        caps
    }
}
