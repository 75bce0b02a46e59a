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

//! The immutable configuration snapshot handed to the engine.
//!
//! Reading and writing configuration files is the host's business. This module
//! only defines the materialized shape, its defaults, and the load-time clamp.

use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Duration of one host tick, in milliseconds.
pub const TICK_DURATION_MS: u32 = 50;

/// Allowed range for [`TabListConfig::update_interval_ms`].
pub const UPDATE_INTERVAL_RANGE: RangeInclusive<u32> = 1..=10_000;

/// Allowed range for [`TabListConfig::animation_interval`].
pub const ANIMATION_INTERVAL_RANGE: RangeInclusive<u32> = 1..=200;

/// Allowed range for [`TabListConfig::afk_timeout_secs`].
pub const AFK_TIMEOUT_RANGE: RangeInclusive<u32> = 10..=3_600;

/// How participants are ordered in the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortMode {
    /// The host's natural order. Engine-owned buckets are removed.
    #[default]
    None,
    /// Case-insensitive name order.
    Alphabetical,
    /// Highest rank power first, then case-insensitive name order.
    Rank,
}

impl SortMode {
    /// Returns the canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::None => "NONE",
            SortMode::Alphabetical => "ALPHABETICAL",
            SortMode::Rank => "RANK",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NONE" => Ok(SortMode::None),
            "ALPHABETICAL" => Ok(SortMode::Alphabetical),
            "RANK" => Ok(SortMode::Rank),
            _ => Err(ConfigError::UnknownSortMode(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for SortMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// An error raised while materializing configuration values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The text does not name a known [`SortMode`].
    UnknownSortMode(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownSortMode(text) => write!(
                f,
                "Unknown sort mode '{text}', expected NONE, ALPHABETICAL or RANK"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// A fully materialized configuration snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabListConfig {
    /// Substituted for `#SERVERNAME`.
    pub server_name: String,
    /// Header animation frames. Never empty after [`clamped`](Self::clamped).
    pub header_frames: Vec<String>,
    /// Footer animation frames. Never empty after [`clamped`](Self::clamped).
    pub footer_frames: Vec<String>,
    /// Template for the per-participant list name. Supports `{name}`, `{rank}` and `#AFK`.
    pub display_name_format: String,
    /// Milliseconds between update cycles.
    pub update_interval_ms: u32,
    /// Update cycles between animation frame changes.
    pub animation_interval: u32,
    /// Ordering applied to the list.
    pub sort_mode: SortMode,
    /// Whether idle detection runs at all.
    pub afk_enabled: bool,
    /// Seconds without activity before a participant counts as idle.
    pub afk_timeout_secs: u32,
    /// Prefer the rank provider's own name format when one is present.
    pub rank_formatting_enabled: bool,
}

impl Default for TabListConfig {
    fn default() -> Self {
        Self {
            server_name: "Your Server".to_string(),
            header_frames: vec![
                "#N        &#FF5555&l#SERVERNAME        #N&#AAAAAA&m            #N".to_string(),
                "#N        &#5555FF&l#SERVERNAME        #N&#AAAAAA&m            #N".to_string(),
            ],
            footer_frames: vec![
                "&fOnline: &e#PLAYERCOUNT&7/&e#MAXPLAYERS #N&7TPS: #CTPS &7| MSPT: &#55FFFF#MSPT #N&7Memory: &#AA55FF#MEMORY &7| Uptime: &#FFAA00#UPTIME".to_string(),
                "&fOnline: &e#PLAYERCOUNT&7/&e#MAXPLAYERS #N&7TPS: #CTPS &7| Ping: &#55FFFF#PING&7ms #N&7Memory: &#AA55FF#MEMORY &7| Uptime: &#FFAA00#UPTIME".to_string(),
            ],
            display_name_format: "{name} &7#AFK".to_string(),
            update_interval_ms: 500,
            animation_interval: 4,
            sort_mode: SortMode::None,
            afk_enabled: true,
            afk_timeout_secs: 300,
            rank_formatting_enabled: true,
        }
    }
}

impl TabListConfig {
    /// Brings every bounded field into range and guarantees at least one frame
    /// per frame list.
    ///
    /// This is meant to run once, when the snapshot is built. The engine itself
    /// trusts the values it is given.
    pub fn clamped(mut self) -> Self {
        self.update_interval_ms = clamp(self.update_interval_ms, &UPDATE_INTERVAL_RANGE);
        self.animation_interval = clamp(self.animation_interval, &ANIMATION_INTERVAL_RANGE);
        self.afk_timeout_secs = clamp(self.afk_timeout_secs, &AFK_TIMEOUT_RANGE);
        if self.header_frames.is_empty() {
            self.header_frames.push(String::new());
        }
        if self.footer_frames.is_empty() {
            self.footer_frames.push(String::new());
        }
        self
    }

    /// Number of host ticks between two update cycles.
    ///
    /// Intervals shorter than one tick run a cycle every tick.
    pub fn update_interval_ticks(&self) -> u32 {
        (self.update_interval_ms / TICK_DURATION_MS).max(1)
    }

    /// The idle timeout in milliseconds.
    pub fn afk_timeout_ms(&self) -> u64 {
        u64::from(self.afk_timeout_secs) * 1000
    }
}

fn clamp(value: u32, range: &RangeInclusive<u32>) -> u32 {
    value.clamp(*range.start(), *range.end())
}
