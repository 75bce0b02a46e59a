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

//! A fixed rank table.

use std::collections::HashMap;
use tablist_core::{Participant, Rank, RankProvider};

/// Ranks assigned by participant name, with an optional name format.
///
/// The name format may use `{name}` and `{rank}`; participants without a rank
/// get an empty `{rank}`.
#[derive(Debug, Clone, Default)]
pub struct StaticRanks {
    ranks: HashMap<String, Vec<Rank>>,
    name_format: Option<String>,
}

impl StaticRanks {
    /// An empty table without a name format.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants `rank` to the participant called `name`.
    pub fn with_rank(mut self, name: impl Into<String>, rank: Rank) -> Self {
        let ranks = self.ranks.entry(name.into()).or_default();
        ranks.push(rank);
        ranks.sort_by(|a, b| b.power.cmp(&a.power));
        self
    }

    /// Sets the name format handed out as the formatted display name.
    pub fn with_name_format(mut self, format: impl Into<String>) -> Self {
        self.name_format = Some(format.into());
        self
    }
}

impl RankProvider for StaticRanks {
    fn ranks_of(&self, participant: &Participant) -> Vec<Rank> {
        self.ranks
            .get(&participant.name)
            .cloned()
            .unwrap_or_default()
    }

    fn formatted_name(&self, participant: &Participant) -> Option<String> {
        let format = self.name_format.as_ref()?;
        Some(
            format
                .replace("{name}", &participant.name)
                .replace("{rank}", &self.rank_name(participant)),
        )
    }
}
