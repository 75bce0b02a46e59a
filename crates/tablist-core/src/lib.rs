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

//! # TabList Core
//!
//! Foundational crate containing the traits, core types, and interface contracts
//! shared by the presentation engine and the host that embeds it.
//!
//! Nothing in here performs work on its own. The stateless strategies live in
//! `tablist-lanes`, the stateful subsystems in `tablist-agents`, and concrete
//! collaborator implementations in `tablist-infra`.

#![warn(missing_docs)]

pub mod bucket;
pub mod clock;
pub mod config;
pub mod context;
pub mod metrics;
pub mod participant;
pub mod rank;
pub mod sink;

pub use bucket::{BucketError, BucketSpec, BucketStore, NameTagVisibility};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, SortMode, TabListConfig};
pub use context::HostContext;
pub use metrics::{MetricsProvider, MetricsSnapshot};
pub use participant::{
    IdleStatus, NeverIdle, Participant, ParticipantId, ParticipantRegistry, PositionSample,
};
pub use rank::{NoRanks, Rank, RankProvider};
pub use sink::OutputSink;
