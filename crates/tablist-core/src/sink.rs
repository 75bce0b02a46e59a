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

//! The delivery side of the engine.

use crate::participant::Participant;

/// Physically delivers resolved text to participants.
///
/// Translating the text into a wire format is the implementor's job.
pub trait OutputSink: Send + Sync {
    /// Sends the list header and footer to one participant.
    fn send_list_text(&self, participant: &Participant, header: &str, footer: &str);

    /// Publishes the list name of one participant.
    fn send_display_name(&self, participant: &Participant, display_name: &str);
}
