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

//! Output sinks that do not talk to a real client.

use std::sync::{Mutex, PoisonError};
use tablist_core::{OutputSink, Participant, ParticipantId};

/// Writes every output to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl OutputSink for LogSink {
    fn send_list_text(&self, participant: &Participant, header: &str, footer: &str) {
        log::info!(
            "LogSink: List text for '{}': header={:?} footer={:?}",
            participant.name,
            header,
            footer
        );
    }

    fn send_display_name(&self, participant: &Participant, display_name: &str) {
        log::debug!(
            "LogSink: Display name for '{}': {:?}",
            participant.name,
            display_name
        );
    }
}

/// One output captured by a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    /// A header and footer pair.
    ListText {
        /// Recipient.
        participant: ParticipantId,
        /// Resolved header.
        header: String,
        /// Resolved footer.
        footer: String,
    },
    /// A list display name.
    DisplayName {
        /// Recipient.
        participant: ParticipantId,
        /// Resolved name.
        text: String,
    },
}

/// Keeps every output in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything captured so far.
    pub fn events(&self) -> Vec<SinkEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns and clears everything captured so far.
    pub fn take(&self) -> Vec<SinkEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Header and footer pairs sent to `id`, oldest first.
    pub fn list_texts_for(&self, id: ParticipantId) -> Vec<(String, String)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SinkEvent::ListText {
                    participant,
                    header,
                    footer,
                } if participant == id => Some((header, footer)),
                _ => None,
            })
            .collect()
    }

    /// Display names sent to `id`, oldest first.
    pub fn display_names_for(&self, id: ParticipantId) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SinkEvent::DisplayName { participant, text } if participant == id => Some(text),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: SinkEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl OutputSink for RecordingSink {
    fn send_list_text(&self, participant: &Participant, header: &str, footer: &str) {
        self.push(SinkEvent::ListText {
            participant: participant.id,
            header: header.to_string(),
            footer: footer.to_string(),
        });
    }

    fn send_display_name(&self, participant: &Participant, display_name: &str) {
        self.push(SinkEvent::DisplayName {
            participant: participant.id,
            text: display_name.to_string(),
        });
    }
}
