// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Acts as the **[A]gent** for idle detection.
//!
//! Idleness is not a stored state. Each participant only carries the last
//! position sample and the time of its last observed activity, and every query
//! re-derives ACTIVE or IDLE from the elapsed time. Standing still is what makes
//! a participant idle: a sample that repeats the stored one is ignored, while a
//! change of position or heading counts as activity.
//!
//! The tracker is shared behind an `Arc` so that unrelated threads can ask
//! "is this participant idle right now" while the update cycle records samples.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use tablist_core::{Clock, IdleStatus, ParticipantId, PositionSample};

#[derive(Debug, Clone, Copy)]
struct ActivityRecord {
    last_sample: Option<PositionSample>,
    last_activity_ms: u64,
}

#[derive(Debug, Clone, Copy)]
struct IdlePolicy {
    enabled: bool,
    timeout_ms: u64,
}

/// Per-participant activity bookkeeping.
pub struct ActivityTracker {
    clock: Arc<dyn Clock>,
    policy: RwLock<IdlePolicy>,
    records: RwLock<HashMap<ParticipantId, ActivityRecord>>,
}

impl ActivityTracker {
    /// Creates a tracker that reads the time from `clock`.
    pub fn new(clock: Arc<dyn Clock>, enabled: bool, timeout_ms: u64) -> Self {
        Self {
            clock,
            policy: RwLock::new(IdlePolicy {
                enabled,
                timeout_ms,
            }),
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Replaces the detection policy. Recorded activity is kept.
    pub fn set_policy(&self, enabled: bool, timeout_ms: u64) {
        *self.policy.write().unwrap_or_else(PoisonError::into_inner) = IdlePolicy {
            enabled,
            timeout_ms,
        };
    }

    /// Records a position sample. Only a sample that differs from the stored
    /// one, or the first sample ever, counts as activity.
    pub fn record_position_sample(&self, id: ParticipantId, sample: PositionSample) {
        let now = self.clock.now_millis();
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        let record = records.entry(id).or_insert(ActivityRecord {
            last_sample: None,
            last_activity_ms: now,
        });
        if record.last_sample != Some(sample) {
            record.last_sample = Some(sample);
            record.last_activity_ms = now;
        }
    }

    /// Stamps activity for `id` unconditionally, e.g. after a chat message.
    pub fn record_explicit_activity(&self, id: ParticipantId) {
        let now = self.clock.now_millis();
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        records
            .entry(id)
            .and_modify(|record| record.last_activity_ms = now)
            .or_insert(ActivityRecord {
                last_sample: None,
                last_activity_ms: now,
            });
    }

    /// Whether `id` has been inactive for at least the configured timeout.
    ///
    /// Always `false` when detection is disabled or nothing was ever recorded.
    pub fn is_idle(&self, id: ParticipantId) -> bool {
        let policy = *self.policy.read().unwrap_or_else(PoisonError::into_inner);
        if !policy.enabled {
            return false;
        }
        let last_activity_ms = match self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
        {
            Some(record) => record.last_activity_ms,
            None => return false,
        };
        self.clock.now_millis().saturating_sub(last_activity_ms) >= policy.timeout_ms
    }

    /// Drops everything known about a departed participant.
    pub fn forget(&self, id: ParticipantId) {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }

    /// Drops the records of every participant not in `present`.
    pub fn retain_present(&self, present: &HashSet<ParticipantId>) {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|id, _| present.contains(id));
    }

    /// Number of participants with recorded activity.
    pub fn tracked_count(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl IdleStatus for ActivityTracker {
    fn is_idle(&self, id: ParticipantId) -> bool {
        ActivityTracker::is_idle(self, id)
    }
}
