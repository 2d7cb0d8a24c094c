//! Status runners and the per-entity registry that admits and retires them.
//!
//! A [`StatusSpec`] is the shared, immutable definition ("Burn: 2 s, 1 damage
//! every 0.5 s, tagged Burn/Fire"). A [`StatusRunner`] is one timed instance of
//! it on one target. The [`StatusRegistry`] decides whether a runner may be
//! admitted (stack policies, then category interactions), keeps tag counts in
//! lockstep with its runners, and queues [`StatusEvent`]s for its owner.

mod events;
mod registry;
mod runner;
mod spec;
mod timer;

pub use events::StatusEvent;
pub use registry::{Admission, StatusRegistry};
pub use runner::{DurationChange, RunnerCapabilities, RunnerState, StatusRunner};
pub use spec::{StatusSpec, StatusSpecKind};
pub use timer::{IntervalTimer, TIMER_EPSILON, Timer};
