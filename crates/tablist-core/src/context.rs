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

//! Host context handed to the engine on every tick.

use crate::bucket::BucketStore;
use crate::metrics::MetricsProvider;
use crate::participant::ParticipantRegistry;
use crate::sink::OutputSink;

/// The host's collaborators for one tick.
///
/// The host builds this right before calling into the engine; the engine never
/// keeps any of these references past the call.
pub struct HostContext<'a> {
    /// Who is connected.
    pub registry: &'a dyn ParticipantRegistry,

    /// Server-wide figures. `None` when the host cannot provide them this tick,
    /// in which case every header and footer resolves to an empty string.
    pub metrics: Option<&'a dyn MetricsProvider>,

    /// Where resolved text is delivered.
    pub sink: &'a dyn OutputSink,

    /// The host's bucket storage.
    pub buckets: &'a mut dyn BucketStore,
}
