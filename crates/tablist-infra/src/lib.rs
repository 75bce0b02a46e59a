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

//! # TabList Infra
//!
//! Concrete implementations of the collaborator traits defined in
//! `tablist-core`. A real host adapter replaces most of these with bindings to
//! its own server API; they are complete enough to run the engine standalone
//! and to test it end to end.

#![warn(missing_docs)]

pub mod metrics;
pub mod ranks;
pub mod roster;
pub mod scoreboard;
pub mod sink;

pub use metrics::{SystemMetrics, TickTimeSampler};
pub use ranks::StaticRanks;
pub use roster::InMemoryRoster;
pub use scoreboard::InMemoryScoreboard;
pub use sink::{LogSink, RecordingSink, SinkEvent};
