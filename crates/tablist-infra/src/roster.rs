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

//! An in-memory participant registry.

use std::sync::{PoisonError, RwLock};
use tablist_core::{Participant, ParticipantId, ParticipantRegistry};

/// Connected participants, in join order.
#[derive(Debug, Default)]
pub struct InMemoryRoster {
    participants: RwLock<Vec<Participant>>,
}

impl InMemoryRoster {
    /// Creates an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a participant, replacing any previous entry with the same id.
    pub fn join(&self, participant: Participant) {
        let mut participants = self
            .participants
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        participants.retain(|p| p.id != participant.id);
        log::debug!("InMemoryRoster: '{}' joined", participant.name);
        participants.push(participant);
    }

    /// Removes a participant and returns its last snapshot.
    pub fn leave(&self, id: ParticipantId) -> Option<Participant> {
        let mut participants = self
            .participants
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let index = participants.iter().position(|p| p.id == id)?;
        let participant = participants.remove(index);
        log::debug!("InMemoryRoster: '{}' left", participant.name);
        Some(participant)
    }

    /// Applies `edit` to a participant. Returns `false` if it is not connected.
    pub fn update(&self, id: ParticipantId, edit: impl FnOnce(&mut Participant)) -> bool {
        let mut participants = self
            .participants
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match participants.iter_mut().find(|p| p.id == id) {
            Some(participant) => {
                edit(participant);
                true
            }
            None => false,
        }
    }

    /// Looks a participant up by id.
    pub fn get(&self, id: ParticipantId) -> Option<Participant> {
        self.participants
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    /// Number of connected participants.
    pub fn len(&self) -> usize {
        self.participants
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// `true` when nobody is connected.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ParticipantRegistry for InMemoryRoster {
    fn participants(&self) -> Vec<Participant> {
        self.participants
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
