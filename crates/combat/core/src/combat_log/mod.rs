//! Time-indexed record of combat results.
//!
//! Consumers (decision layers, UI, tests) ask "did a Damage result land this
//! frame?" or "how many stuns in the last 2 seconds?" without subscribing to
//! anything. Every entry is indexed twice, by frame and by combat time, over the
//! same shared allocation; pruning either index removes the entry from both.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::combatant::CombatListener;
use crate::config::CombatConfig;
use crate::result::{CombatResult, ResultCategory};
use crate::state::{CombatTime, FrameId};

/// A result stamped with when it was logged.
#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub frame: FrameId,
    pub time: CombatTime,
    pub result: Arc<CombatResult>,
}

/// Dual-indexed, prunable combat log.
#[derive(Debug, Default)]
pub struct CombatLog {
    retention_ticks: u64,
    retention_seconds: f64,
    frame: FrameId,
    time: CombatTime,
    by_frame: BTreeMap<FrameId, Vec<Arc<LogEntry>>>,
    by_time: BTreeMap<CombatTime, Vec<Arc<LogEntry>>>,
}

impl CombatLog {
    pub fn new(config: &CombatConfig) -> Self {
        Self {
            retention_ticks: config.log_retention_ticks,
            retention_seconds: config.log_retention_seconds,
            ..Self::default()
        }
    }

    /// Log that never prunes on its own.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn current_frame(&self) -> FrameId {
        self.frame
    }

    pub fn now(&self) -> CombatTime {
        self.time
    }

    /// Moves the clock to an explicit frame and time, then applies retention.
    pub fn begin_frame(&mut self, frame: FrameId, time: CombatTime) {
        self.frame = frame;
        self.time = time;
        self.apply_retention();
    }

    /// Steps to the next frame, `dt` seconds later.
    pub fn advance(&mut self, dt: f64) {
        self.begin_frame(self.frame.next(), self.time + dt);
    }

    fn apply_retention(&mut self) {
        if self.retention_ticks > 0 {
            self.prune_before_tick(self.frame.saturating_back(self.retention_ticks));
        }
        if self.retention_seconds > 0.0 {
            self.prune_before_time(self.time.saturating_back(self.retention_seconds));
        }
    }

    /// Stamps `result` with the current frame and time.
    pub fn log(&mut self, result: impl Into<Arc<CombatResult>>) -> Arc<LogEntry> {
        let entry = Arc::new(LogEntry {
            frame: self.frame,
            time: self.time,
            result: result.into(),
        });
        self.by_frame
            .entry(self.frame)
            .or_default()
            .push(Arc::clone(&entry));
        self.by_time
            .entry(self.time)
            .or_default()
            .push(Arc::clone(&entry));
        entry
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Results of `kind` logged during the current frame.
    pub fn events(&self, kind: ResultCategory) -> Vec<Arc<CombatResult>> {
        self.by_frame
            .get(&self.frame)
            .into_iter()
            .flatten()
            .filter(|entry| entry.result.category() == kind)
            .map(|entry| Arc::clone(&entry.result))
            .collect()
    }

    pub fn has_event(&self, kind: ResultCategory) -> bool {
        self.has_event_where(kind, |_| true)
    }

    /// True if a result of `kind` logged this frame satisfies `predicate`.
    pub fn has_event_where(
        &self,
        kind: ResultCategory,
        predicate: impl Fn(&CombatResult) -> bool,
    ) -> bool {
        self.by_frame.get(&self.frame).is_some_and(|entries| {
            entries
                .iter()
                .any(|entry| entry.result.category() == kind && predicate(&entry.result))
        })
    }

    /// Results of `kind` logged in frames `[current - ticks, current]`, oldest first.
    pub fn events_within_ticks(&self, kind: ResultCategory, ticks: u64) -> Vec<Arc<LogEntry>> {
        let from = self.frame.saturating_back(ticks);
        self.by_frame
            .range(from..=self.frame)
            .flat_map(|(_, entries)| entries)
            .filter(|entry| entry.result.category() == kind)
            .cloned()
            .collect()
    }

    /// Results of `kind` logged at or after `now - seconds`, oldest first.
    pub fn events_within_time(&self, kind: ResultCategory, seconds: f64) -> Vec<Arc<LogEntry>> {
        let from = CombatTime(self.time.seconds() - seconds);
        self.by_time
            .range(from..)
            .flat_map(|(_, entries)| entries)
            .filter(|entry| entry.result.category() == kind)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.by_frame.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_frame.is_empty()
    }

    /// Every retained entry, oldest frame first.
    pub fn entries(&self) -> impl Iterator<Item = &Arc<LogEntry>> + '_ {
        self.by_frame.values().flatten()
    }

    // ========================================================================
    // Pruning
    // ========================================================================

    /// Drops every frame bucket strictly below `cutoff`.
    pub fn prune_before_tick(&mut self, cutoff: FrameId) {
        let kept = self.by_frame.split_off(&cutoff);
        let dropped = std::mem::replace(&mut self.by_frame, kept);
        for entry in dropped.into_values().flatten() {
            remove_entry(&mut self.by_time, entry.time, &entry);
        }
    }

    /// Drops every time bucket strictly below `cutoff`.
    pub fn prune_before_time(&mut self, cutoff: CombatTime) {
        let kept = self.by_time.split_off(&cutoff);
        let dropped = std::mem::replace(&mut self.by_time, kept);
        for entry in dropped.into_values().flatten() {
            remove_entry(&mut self.by_frame, entry.frame, &entry);
        }
    }
}

fn remove_entry<K: Ord>(index: &mut BTreeMap<K, Vec<Arc<LogEntry>>>, key: K, entry: &Arc<LogEntry>) {
    if let Some(bucket) = index.get_mut(&key) {
        bucket.retain(|e| !Arc::ptr_eq(e, entry));
        if bucket.is_empty() {
            index.remove(&key);
        }
    }
}

impl CombatListener for CombatLog {
    fn on_result(&mut self, result: Arc<CombatResult>) {
        self.log(result);
    }
}
