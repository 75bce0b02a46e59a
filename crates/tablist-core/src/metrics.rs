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

//! Server-wide figures and the per-cycle snapshot that memoizes them.

use std::cell::OnceCell;

/// Source of the server-wide figures shown in the list.
///
/// Every call is expected to be cheap and non-blocking.
pub trait MetricsProvider: Send + Sync {
    /// Mean time spent per host tick, in milliseconds.
    fn mean_tick_time_ms(&self) -> f64;

    /// Number of participants currently connected.
    fn online_count(&self) -> usize;

    /// Maximum number of participants the host accepts.
    fn max_capacity(&self) -> usize;

    /// Memory currently in use, in bytes.
    fn memory_used_bytes(&self) -> u64;

    /// Memory available to the host, in bytes.
    fn memory_max_bytes(&self) -> u64;

    /// Time since the host started, in milliseconds.
    fn uptime_millis(&self) -> u64;
}

/// A view over a [`MetricsProvider`] that lives for exactly one update cycle.
///
/// Each figure is read from the provider the first time it is asked for and
/// then reused, so every participant in the cycle sees the same numbers and a
/// figure no template references is never read at all.
pub struct MetricsSnapshot<'a> {
    provider: &'a dyn MetricsProvider,
    mean_tick_time_ms: OnceCell<f64>,
    online_count: OnceCell<usize>,
    max_capacity: OnceCell<usize>,
    memory: OnceCell<(u64, u64)>,
    uptime_millis: OnceCell<u64>,
}

impl<'a> MetricsSnapshot<'a> {
    /// Starts a new snapshot over `provider`.
    pub fn new(provider: &'a dyn MetricsProvider) -> Self {
        Self {
            provider,
            mean_tick_time_ms: OnceCell::new(),
            online_count: OnceCell::new(),
            max_capacity: OnceCell::new(),
            memory: OnceCell::new(),
            uptime_millis: OnceCell::new(),
        }
    }

    /// Mean time per tick in milliseconds.
    pub fn mean_tick_time_ms(&self) -> f64 {
        *self
            .mean_tick_time_ms
            .get_or_init(|| self.provider.mean_tick_time_ms())
    }

    /// Connected participant count.
    pub fn online_count(&self) -> usize {
        *self
            .online_count
            .get_or_init(|| self.provider.online_count())
    }

    /// Participant capacity.
    pub fn max_capacity(&self) -> usize {
        *self
            .max_capacity
            .get_or_init(|| self.provider.max_capacity())
    }

    /// `(used, max)` memory in bytes, sampled together.
    pub fn memory_bytes(&self) -> (u64, u64) {
        *self.memory.get_or_init(|| {
            (
                self.provider.memory_used_bytes(),
                self.provider.memory_max_bytes(),
            )
        })
    }

    /// Host uptime in milliseconds.
    pub fn uptime_millis(&self) -> u64 {
        *self
            .uptime_millis
            .get_or_init(|| self.provider.uptime_millis())
    }
}

impl std::fmt::Debug for MetricsSnapshot<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsSnapshot")
            .field("mean_tick_time_ms", &self.mean_tick_time_ms.get())
            .field("online_count", &self.online_count.get())
            .field("max_capacity", &self.max_capacity.get())
            .field("memory", &self.memory.get())
            .field("uptime_millis", &self.uptime_millis.get())
            .finish()
    }
}
