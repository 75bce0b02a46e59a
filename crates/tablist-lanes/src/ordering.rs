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

//! Participant ordering strategies.

use std::cmp::Reverse;
use tablist_core::{Participant, RankProvider, SortMode};

/// Sorts `participants` in place into the order described by `mode`.
///
/// - [`SortMode::None`] keeps the given order.
/// - [`SortMode::Alphabetical`] orders by name, ignoring case.
/// - [`SortMode::Rank`] puts the highest rank power first and breaks ties by
///   name, ignoring case. Without a rank system every power is zero, so this
///   degrades to alphabetical order.
///
/// The sort is stable. Keys are computed once per participant.
pub fn sort_participants(
    mode: SortMode,
    participants: &mut [Participant],
    ranks: &dyn RankProvider,
) {
    match mode {
        SortMode::None => {}
        SortMode::Alphabetical => {
            participants.sort_by_cached_key(|p| p.name.to_lowercase());
        }
        SortMode::Rank => {
            participants
                .sort_by_cached_key(|p| (Reverse(ranks.rank_power(p)), p.name.to_lowercase()));
        }
    }
}
