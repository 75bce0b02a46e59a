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

//! Participant identity and the per-cycle snapshot the host hands to the engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A stable identifier for a connected participant.
///
/// The identifier outlives name changes and is the key for every piece of
/// side state the engine keeps (activity, last-sent text, bucket assignment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticipantId(Uuid);

impl ParticipantId {
    /// Creates a new, random (version 4) `ParticipantId`.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an identifier the host already owns.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ParticipantId {
    /// Creates a new, random (version 4) `ParticipantId`.
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The part of a participant's position that counts as activity.
///
/// The vertical axis is left out on purpose: falling or being pushed by gravity
/// must not keep an otherwise idle participant active. Yaw is kept, so looking
/// around without moving still counts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PositionSample {
    /// East/west coordinate.
    pub x: f64,
    /// North/south coordinate.
    pub z: f64,
    /// Horizontal view angle in degrees.
    pub yaw: f64,
}

impl PositionSample {
    /// Creates a new sample.
    pub const fn new(x: f64, z: f64, yaw: f64) -> Self {
        Self { x, z, yaw }
    }
}

/// A read-only snapshot of one connected participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Stable identity.
    pub id: ParticipantId,
    /// Display label, with its original case.
    pub name: String,
    /// Round-trip latency in milliseconds.
    pub latency_ms: u32,
    /// Last known position.
    pub position: PositionSample,
    /// Identifier of the world/dimension the participant is in (e.g. `"overworld"`).
    pub world_id: String,
}

impl Participant {
    /// Creates a participant snapshot at the origin with zero latency.
    pub fn new(id: ParticipantId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            latency_ms: 0,
            position: PositionSample::default(),
            world_id: "overworld".to_string(),
        }
    }

    /// Returns a copy with the given latency.
    pub fn with_latency(mut self, latency_ms: u32) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    /// Returns a copy with the given position.
    pub fn with_position(mut self, position: PositionSample) -> Self {
        self.position = position;
        self
    }

    /// Returns a copy placed in the given world.
    pub fn with_world(mut self, world_id: impl Into<String>) -> Self {
        self.world_id = world_id.into();
        self
    }
}

/// The host's list of who is connected right now.
pub trait ParticipantRegistry: Send + Sync {
    /// Returns a snapshot of every connected participant.
    fn participants(&self) -> Vec<Participant>;
}

/// Capability for asking whether a participant is currently idle.
///
/// Handed to the template resolver instead of a process-wide handle, so that
/// `#AFK` and display-name grey-out can be answered without global state.
pub trait IdleStatus: Send + Sync {
    /// Returns `true` if the participant is idle right now.
    fn is_idle(&self, id: ParticipantId) -> bool;
}

/// An `IdleStatus` for hosts that never report anyone as idle.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverIdle;

impl IdleStatus for NeverIdle {
    fn is_idle(&self, _id: ParticipantId) -> bool {
        false
    }
}
