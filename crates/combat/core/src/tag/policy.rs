//! Stack policies: how many same-tagged runners may coexist and what happens on overflow.

use bitflags::bitflags;

/// What to do with an incoming runner once a tag is at its stack limit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OverflowBehavior {
    /// Refuse the incoming runner.
    #[default]
    Reject,
    /// Refresh the oldest same-tagged runner instead of admitting a new one.
    RefreshOldest,
    /// Dispel the oldest same-tagged runner, then admit the incoming one.
    ReplaceOldest,
}

/// How a refreshed runner's remaining duration combines with the incoming duration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DurationBehavior {
    /// Each stack keeps its own timer; a refresh takes the incoming duration.
    #[default]
    Independent,
    /// Remaining and incoming durations add up, capped by `max_total_duration`.
    Extend,
    /// The incoming duration replaces the remaining one.
    Refresh,
    /// The longer of the two wins.
    Max,
    /// The remaining duration is kept unchanged.
    Reject,
}

bitflags! {
    /// Outcome of evaluating a stack policy.
    ///
    /// Exactly one flag is set, except `ACCEPT | REPLACE_OLDEST` (evict, then admit).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct StackPolicyResult: u8 {
        const ACCEPT         = 1 << 0;
        const REJECT         = 1 << 1;
        const REFRESH_OLDEST = 1 << 2;
        const REPLACE_OLDEST = 1 << 3;
    }
}

impl StackPolicyResult {
    /// Evict the oldest runner, then admit.
    pub const ACCEPT_REPLACING: Self = Self::ACCEPT.union(Self::REPLACE_OLDEST);

    /// Folds two per-tag results: the most restrictive one wins.
    ///
    /// Reject beats everything, then RefreshOldest, then ReplaceOldest, then Accept.
    pub fn combine(self, other: Self) -> Self {
        if self.is_reject() || other.is_reject() {
            Self::REJECT
        } else if self.contains(Self::REFRESH_OLDEST) || other.contains(Self::REFRESH_OLDEST) {
            Self::REFRESH_OLDEST
        } else if self.contains(Self::REPLACE_OLDEST) || other.contains(Self::REPLACE_OLDEST) {
            Self::ACCEPT_REPLACING
        } else {
            Self::ACCEPT
        }
    }

    /// Plain rejection (not combined with a refresh or replace instruction).
    pub fn is_reject(self) -> bool {
        self.contains(Self::REJECT)
            && !self.intersects(Self::REFRESH_OLDEST | Self::REPLACE_OLDEST)
    }
}

impl Default for StackPolicyResult {
    fn default() -> Self {
        Self::ACCEPT
    }
}

/// Stateless stacking rule owned by a tag definition.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StackPolicy {
    /// Maximum simultaneous runners carrying the tag (0 = unlimited).
    pub max_stacks: u32,
    pub overflow_behavior: OverflowBehavior,
    pub duration_behavior: DurationBehavior,
    /// Cap applied by [`DurationBehavior::Extend`] in seconds (0 = unlimited).
    pub max_total_duration: f32,
}

impl StackPolicy {
    pub const fn unlimited() -> Self {
        Self {
            max_stacks: 0,
            overflow_behavior: OverflowBehavior::Reject,
            duration_behavior: DurationBehavior::Independent,
            max_total_duration: 0.0,
        }
    }

    pub const fn limited(max_stacks: u32, overflow_behavior: OverflowBehavior) -> Self {
        Self {
            max_stacks,
            overflow_behavior,
            duration_behavior: DurationBehavior::Independent,
            max_total_duration: 0.0,
        }
    }

    /// Builder: set duration behavior.
    pub const fn duration_behavior(mut self, behavior: DurationBehavior) -> Self {
        self.duration_behavior = behavior;
        self
    }

    /// Builder: set the extend cap.
    pub const fn max_total_duration(mut self, seconds: f32) -> Self {
        self.max_total_duration = seconds;
        self
    }

    /// Decides admission given how many runners already carry the tag.
    pub fn evaluate(&self, current_count: u32) -> StackPolicyResult {
        if self.max_stacks == 0 || current_count < self.max_stacks {
            return StackPolicyResult::ACCEPT;
        }

        match self.overflow_behavior {
            OverflowBehavior::Reject => StackPolicyResult::REJECT,
            OverflowBehavior::RefreshOldest => StackPolicyResult::REFRESH_OLDEST,
            OverflowBehavior::ReplaceOldest => StackPolicyResult::ACCEPT_REPLACING,
        }
    }

    /// Duration a refreshed runner should end up with. Never mutates anything.
    pub fn calculate_duration(&self, existing: f32, incoming: f32) -> f32 {
        match self.duration_behavior {
            DurationBehavior::Independent | DurationBehavior::Refresh => incoming,
            DurationBehavior::Extend => {
                let cap = if self.max_total_duration > 0.0 {
                    self.max_total_duration
                } else {
                    f32::INFINITY
                };
                (existing + incoming).min(cap)
            }
            DurationBehavior::Max => existing.max(incoming),
            DurationBehavior::Reject => existing,
        }
    }
}

impl Default for StackPolicy {
    fn default() -> Self {
        Self::unlimited()
    }
}
