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

//! sysinfo-based implementation of the MetricsProvider trait.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use sysinfo::System;
use tablist_core::{Clock, MetricsProvider};

/// Number of tick durations averaged into the mean tick time.
pub const TICK_SAMPLE_WINDOW: usize = 100;

/// A rolling window of tick durations.
#[derive(Debug, Clone)]
pub struct TickTimeSampler {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl TickTimeSampler {
    /// Creates a sampler keeping the last `capacity` durations.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Adds one tick duration, evicting the oldest when the window is full.
    pub fn record(&mut self, tick_time_ms: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(tick_time_ms);
    }

    /// Mean of the recorded durations, zero before the first one.
    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }
}

impl Default for TickTimeSampler {
    fn default() -> Self {
        Self::new(TICK_SAMPLE_WINDOW)
    }
}

/// Host metrics backed by the machine's memory figures.
///
/// The host reports tick durations and the online count; memory comes from
/// `sysinfo` and uptime is measured from construction.
pub struct SystemMetrics {
    system: Arc<Mutex<System>>,
    clock: Arc<dyn Clock>,
    started_ms: u64,
    tick_times: Mutex<TickTimeSampler>,
    online: AtomicUsize,
    capacity: usize,
}

impl SystemMetrics {
    /// Creates a new SystemMetrics for a host accepting `capacity` participants.
    pub fn new(clock: Arc<dyn Clock>, capacity: usize) -> Self {
        let mut system = System::new();
        system.refresh_memory();
        let started_ms = clock.now_millis();
        log::debug!(
            "SystemMetrics: Monitoring {} bytes of memory",
            system.total_memory()
        );
        Self {
            system: Arc::new(Mutex::new(system)),
            clock,
            started_ms,
            tick_times: Mutex::new(TickTimeSampler::default()),
            online: AtomicUsize::new(0),
            capacity,
        }
    }

    /// Refreshes the memory figures.
    pub fn refresh(&self) {
        if let Ok(mut system) = self.system.lock() {
            system.refresh_memory();
        }
    }

    /// Records how long the last host tick took.
    pub fn record_tick(&self, tick_time_ms: f64) {
        if let Ok(mut tick_times) = self.tick_times.lock() {
            tick_times.record(tick_time_ms);
        }
    }

    /// Updates the connected participant count.
    pub fn set_online(&self, online: usize) {
        self.online.store(online, Ordering::Relaxed);
    }
}

impl MetricsProvider for SystemMetrics {
    fn mean_tick_time_ms(&self) -> f64 {
        self.tick_times
            .lock()
            .map(|tick_times| tick_times.mean())
            .unwrap_or(0.0)
    }

    fn online_count(&self) -> usize {
        self.online.load(Ordering::Relaxed)
    }

    fn max_capacity(&self) -> usize {
        self.capacity
    }

    fn memory_used_bytes(&self) -> u64 {
        if let Ok(mut system) = self.system.lock() {
            system.refresh_memory();
            system.used_memory()
        } else {
            0
        }
    }

    fn memory_max_bytes(&self) -> u64 {
        self.system
            .lock()
            .map(|system| system.total_memory())
            .unwrap_or(0)
    }

    fn uptime_millis(&self) -> u64 {
        self.clock.now_millis().saturating_sub(self.started_ms)
    }
}
