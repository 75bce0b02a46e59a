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

use std::sync::{Arc, PoisonError};

use tablist_core::ParticipantId;

use super::agent::{split_list_text, LastSentMap};
use crate::activity_agent::ActivityTracker;
use crate::order_agent::AssignmentMap;

/// A read-only, cloneable window on the scheduler's per-participant state.
///
/// Meant to be moved to threads that answer transient queries while the
/// driver thread keeps running cycles.
#[derive(Clone)]
pub struct ParticipantView {
    pub(super) activity: Arc<ActivityTracker>,
    pub(super) last_sent: LastSentMap,
    pub(super) assignments: AssignmentMap,
}

impl ParticipantView {
    /// Whether the participant is idle right now.
    pub fn is_idle(&self, id: ParticipantId) -> bool {
        self.activity.is_idle(id)
    }

    /// The header and footer last sent to the participant.
    pub fn last_sent_text(&self, id: ParticipantId) -> Option<(String, String)> {
        self.last_sent
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .map(|text| split_list_text(text))
    }

    /// The engine-owned bucket the participant was placed in.
    pub fn assigned_bucket(&self, id: ParticipantId) -> Option<String> {
        self.assignments
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }
}
