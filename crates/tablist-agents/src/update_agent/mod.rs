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

//! Acts as the **[A]gent** driving the periodic list update.
//!
//! The host calls [`UpdateScheduler::on_tick`] once per tick. Most calls are
//! cheap no-ops; every `update_interval / tick` calls a full cycle runs:
//! - the animation cursor moves on,
//! - position samples are fed to the idle tracker,
//! - the bucket order is reconciled,
//! - header and footer are resolved and sent to whoever's text changed,
//! - every participant's display name is resolved and sent.
//!
//! Chat and disconnect events arrive through [`UpdateScheduler::on_chat`] and
//! [`UpdateScheduler::on_disconnect`]. Other threads observe per-participant
//! state through a [`ParticipantView`].

mod agent;
mod animation;
mod view;

pub use agent::*;
pub use animation::AnimationCursor;
pub use view::ParticipantView;
