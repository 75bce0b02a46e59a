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

//! Optional rank/permission integration.
//!
//! Whether a rank system is present is decided once, when the host builds the
//! engine, by handing it either a real provider or [`NoRanks`].

use crate::participant::Participant;
use serde::{Deserialize, Serialize};

/// A named rank with a power used for ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rank {
    /// Label shown for `#RANK` and `{rank}`.
    pub name: String,
    /// Higher power sorts first.
    pub power: i32,
}

impl Rank {
    /// Creates a rank.
    pub fn new(name: impl Into<String>, power: i32) -> Self {
        Self {
            name: name.into(),
            power,
        }
    }
}

/// The rank system capability.
pub trait RankProvider: Send + Sync {
    /// Returns `false` for the absent variant.
    fn is_available(&self) -> bool {
        true
    }

    /// The participant's ranks, most relevant (highest power) first.
    fn ranks_of(&self, participant: &Participant) -> Vec<Rank>;

    /// A fully formatted display name owned by the rank system, if it defines one.
    ///
    /// The engine only converts color markup in the returned text.
    fn formatted_name(&self, participant: &Participant) -> Option<String>;

    /// The participant's most relevant rank.
    fn top_rank(&self, participant: &Participant) -> Option<Rank> {
        self.ranks_of(participant).into_iter().next()
    }

    /// The label of the most relevant rank, or an empty string.
    fn rank_name(&self, participant: &Participant) -> String {
        self.top_rank(participant)
            .map(|rank| rank.name)
            .unwrap_or_default()
    }

    /// The power of the most relevant rank, or zero.
    fn rank_power(&self, participant: &Participant) -> i32 {
        self.top_rank(participant).map_or(0, |rank| rank.power)
    }
}

/// The absent rank system. Every participant is rankless with power zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRanks;

impl RankProvider for NoRanks {
    fn is_available(&self) -> bool {
        false
    }

    fn ranks_of(&self, _participant: &Participant) -> Vec<Rank> {
        Vec::new()
    }

    fn formatted_name(&self, _participant: &Participant) -> Option<String> {
        None
    }
}
