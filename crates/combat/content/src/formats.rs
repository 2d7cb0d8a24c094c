//! Authored content formats.
//!
//! These mirror the RON layout of a catalog file. Cross references are plain
//! names; [`crate::CatalogLoader`] turns them into shared engine handles.

use serde::Deserialize;

use combat_core::{
    ControlEffect, DamageEffect, HealEffect, InteractionKind, StackPolicy, StatModifierEffect,
    StatusCondition,
};

/// Top-level layout of `catalog.ron`.
///
/// Every section is resolved in declaration order, so a name can only refer to
/// entries declared before it in the same section.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct CatalogFile {
    pub categories: Vec<CategorySpec>,
    pub tags: Vec<TagSpec>,
    pub statuses: Vec<StatusDef>,
    pub interactions: Vec<InteractionSpec>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CategorySpec {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TagSpec {
    pub name: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub stack_policy: Option<StackPolicy>,
}

/// How a status runner is driven.
#[derive(Clone, Debug, Deserialize)]
pub enum TimingSpec {
    /// Lives for a fixed number of seconds.
    Duration(f32),
    /// Lives for `duration` seconds and fires `on_tick` every `interval`.
    Tick { duration: f32, interval: f32 },
    /// Fires `on_end` once after the delay.
    Delayed(f32),
    /// Fires `on_tick` every `interval` until `condition` holds.
    Condition {
        interval: f32,
        condition: StatusCondition,
    },
}

#[derive(Clone, Debug, Deserialize)]
pub struct StatusDef {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub timing: TimingSpec,
    #[serde(default)]
    pub on_start: Option<EffectSpec>,
    #[serde(default)]
    pub on_tick: Option<EffectSpec>,
    #[serde(default)]
    pub on_end: Option<EffectSpec>,
    #[serde(default)]
    pub revertible: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EffectSpec {
    pub kind: EffectKindSpec,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub visual: Option<u32>,
}

/// Effect payload as authored. Status and category references are by name.
#[derive(Clone, Debug, Deserialize)]
pub enum EffectKindSpec {
    Damage(DamageEffect),
    Heal(HealEffect),
    ModifyStat(StatModifierEffect),
    Control(ControlEffect),
    ApplyStatus(String),
    Dispel(String),
}

#[derive(Clone, Debug, Deserialize)]
pub struct InteractionSpec {
    pub incoming: String,
    pub existing: String,
    pub kind: InteractionKind,
    #[serde(default)]
    pub magnitude: f32,
    #[serde(default)]
    pub bidirectional: bool,
    /// Status name substituted by `Transform` rules.
    #[serde(default)]
    pub replacement: Option<String>,
}
