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

//! # TabList Agents
//!
//! The stateful subsystems of the engine. Each agent owns its state and drives
//! the stateless strategies from `tablist-lanes`:
//!
//! - [`activity_agent`]: per-participant idle detection.
//! - [`order_agent`]: keeps the host's buckets in the desired list order.
//! - [`update_agent`]: the rate-limited update cycle tying everything together.

#![warn(missing_docs)]

pub mod activity_agent;
pub mod order_agent;
pub mod update_agent;

pub use activity_agent::ActivityTracker;
pub use order_agent::{GroupOrderReconciler, ReconcileReport};
pub use update_agent::{AnimationCursor, CycleReport, ParticipantView, UpdateScheduler};
