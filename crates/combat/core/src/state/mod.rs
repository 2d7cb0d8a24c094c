//! Identity, clocks and the per-entity state effects operate on.

mod common;
mod target;
mod vitals;

pub use common::{CombatTime, EntityId, FrameId, RunnerId};
pub use target::{CombatTarget, ControlFlags};
pub use vitals::Vitals;
