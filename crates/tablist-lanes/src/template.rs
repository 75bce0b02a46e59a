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

//! Placeholder substitution for list headers, footers and display names.
//!
//! Placeholders are plain, case-sensitive tokens found by substring search.
//! A placeholder's value is only computed when its token is present, so a
//! template without `#DATE` never reads the clock and one without `#MEMORY`
//! never asks the host for memory figures.

use crate::markup::{convert_color_codes, strip_color_codes, SECTION_SIGN};
use tablist_core::{Clock, IdleStatus, MetricsSnapshot, Participant, RankProvider, TabListConfig};

/// Placeholder tokens understood by [`resolve`], in substitution order.
pub mod tokens {
    /// Configured server name.
    pub const SERVER_NAME: &str = "#SERVERNAME";
    /// Tick rate with a severity color in front.
    pub const COLORED_TPS: &str = "#CTPS";
    /// Mean milliseconds per tick.
    pub const MSPT: &str = "#MSPT";
    /// Tick rate.
    pub const TPS: &str = "#TPS";
    /// Connected participant count.
    pub const PLAYER_COUNT: &str = "#PLAYERCOUNT";
    /// Memory used and available.
    pub const MEMORY: &str = "#MEMORY";
    /// Host uptime.
    pub const UPTIME: &str = "#UPTIME";
    /// Viewer latency in milliseconds.
    pub const PING: &str = "#PING";
    /// Viewer rank label.
    pub const RANK: &str = "#RANK";
    /// Participant capacity.
    pub const MAX_PLAYERS: &str = "#MAXPLAYERS";
    /// Viewer name.
    pub const PLAYER_NAME: &str = "#PLAYERNAME";
    /// Viewer world identifier.
    pub const WORLD: &str = "#WORLD";
    /// `AFK` when the viewer is idle, empty otherwise.
    pub const AFK: &str = "#AFK";
    /// Current date, `yyyy-MM-dd`.
    pub const DATE: &str = "#DATE";
    /// Current time, `HH:mm`.
    pub const TIME: &str = "#TIME";
    /// Line break.
    pub const NEWLINE: &str = "#N";

    /// Viewer name, display-name templates only.
    pub const NAME_FIELD: &str = "{name}";
    /// Viewer rank label, display-name templates only.
    pub const RANK_FIELD: &str = "{rank}";
}

/// The tick rate a healthy host runs at.
pub const NOMINAL_TICK_RATE: f64 = 20.0;

const OK_TICK_RATE: f64 = 18.0;
const WARN_TICK_RATE: f64 = 15.0;
const IDLE_MARKER: &str = "AFK";
const MEBIBYTE: f64 = 1_048_576.0;

/// Severity band of a tick rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickRateTier {
    /// At or above 18.
    Ok,
    /// At or above 15.
    Warn,
    /// Below 15.
    Bad,
}

impl TickRateTier {
    /// Classifies a tick rate.
    pub fn of(tick_rate: f64) -> Self {
        if tick_rate >= OK_TICK_RATE {
            TickRateTier::Ok
        } else if tick_rate >= WARN_TICK_RATE {
            TickRateTier::Warn
        } else {
            TickRateTier::Bad
        }
    }

    /// The color markup placed in front of the value.
    pub fn markup(&self) -> &'static str {
        match self {
            TickRateTier::Ok => "&a",
            TickRateTier::Warn => "&e",
            TickRateTier::Bad => "&c",
        }
    }
}

/// Derives the tick rate from the mean tick time, capped at [`NOMINAL_TICK_RATE`].
pub fn tick_rate(mean_tick_time_ms: f64) -> f64 {
    if mean_tick_time_ms > 0.0 {
        (1000.0 / mean_tick_time_ms).min(NOMINAL_TICK_RATE)
    } else {
        NOMINAL_TICK_RATE
    }
}

/// Formats an uptime as `HH:MM:SS`, or `D days HH:MM:SS` past the first day.
pub fn format_uptime(uptime_millis: u64) -> String {
    let total_secs = uptime_millis / 1000;
    let seconds = total_secs % 60;
    let minutes = (total_secs / 60) % 60;
    let hours = (total_secs / 3600) % 24;
    let days = total_secs / 86_400;
    if days > 0 {
        format!("{days} days {hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    }
}

/// Formats a figure with one decimal, rounding ties away from zero.
pub fn format_one_decimal(value: f64) -> String {
    format!("{:.1}", (value * 10.0).round() / 10.0)
}

/// Formats memory figures as `used MB / total MB`.
pub fn format_memory(used_bytes: u64, max_bytes: u64) -> String {
    format!(
        "{} MB / {} MB",
        format_one_decimal(used_bytes as f64 / MEBIBYTE),
        format_one_decimal(max_bytes as f64 / MEBIBYTE)
    )
}

/// Everything a resolution may read, besides the viewer.
///
/// The same context is reused for every participant of a cycle.
pub struct ResolveContext<'a> {
    /// The active configuration.
    pub config: &'a TabListConfig,
    /// This cycle's metrics; `None` when the host has none to offer.
    pub metrics: Option<&'a MetricsSnapshot<'a>>,
    /// The rank capability (possibly the absent variant).
    pub ranks: &'a dyn RankProvider,
    /// Idle status of participants.
    pub idle: &'a dyn IdleStatus,
    /// Source of the current date and time.
    pub clock: &'a dyn Clock,
}

impl ResolveContext<'_> {
    fn is_idle(&self, viewer: &Participant) -> bool {
        self.config.afk_enabled && self.idle.is_idle(viewer.id)
    }
}

fn substitute(output: &mut String, token: &str, value: impl FnOnce() -> String) {
    if output.contains(token) {
        *output = output.replace(token, &value());
    }
}

/// Resolves a header or footer template for one viewer.
///
/// A missing template, or a context without metrics, resolves to an empty
/// string rather than a partially substituted one.
pub fn resolve(template: Option<&str>, ctx: &ResolveContext<'_>, viewer: &Participant) -> String {
    let (Some(template), Some(metrics)) = (template, ctx.metrics) else {
        return String::new();
    };

    let mut output = template.to_string();

    substitute(&mut output, tokens::SERVER_NAME, || {
        ctx.config.server_name.clone()
    });

    if [tokens::TPS, tokens::MSPT, tokens::COLORED_TPS]
        .iter()
        .any(|token| output.contains(token))
    {
        let mspt = metrics.mean_tick_time_ms();
        let tps = tick_rate(mspt);
        substitute(&mut output, tokens::COLORED_TPS, || {
            format!("{}{}", TickRateTier::of(tps).markup(), format_one_decimal(tps))
        });
        substitute(&mut output, tokens::MSPT, || format_one_decimal(mspt));
        substitute(&mut output, tokens::TPS, || format_one_decimal(tps));
    }

    substitute(&mut output, tokens::PLAYER_COUNT, || {
        metrics.online_count().to_string()
    });
    substitute(&mut output, tokens::MEMORY, || {
        let (used, max) = metrics.memory_bytes();
        format_memory(used, max)
    });
    substitute(&mut output, tokens::UPTIME, || {
        format_uptime(metrics.uptime_millis())
    });
    substitute(&mut output, tokens::PING, || viewer.latency_ms.to_string());
    substitute(&mut output, tokens::RANK, || ctx.ranks.rank_name(viewer));
    substitute(&mut output, tokens::MAX_PLAYERS, || {
        metrics.max_capacity().to_string()
    });
    substitute(&mut output, tokens::PLAYER_NAME, || viewer.name.clone());
    substitute(&mut output, tokens::WORLD, || viewer.world_id.clone());
    substitute(&mut output, tokens::AFK, || idle_marker(ctx, viewer));

    if output.contains(tokens::DATE) || output.contains(tokens::TIME) {
        let now = ctx.clock.local_now();
        substitute(&mut output, tokens::DATE, || {
            now.format("%Y-%m-%d").to_string()
        });
        substitute(&mut output, tokens::TIME, || now.format("%H:%M").to_string());
    }

    substitute(&mut output, tokens::NEWLINE, || "\n".to_string());

    convert_color_codes(&output)
}

fn idle_marker(ctx: &ResolveContext<'_>, viewer: &Participant) -> String {
    if ctx.is_idle(viewer) {
        IDLE_MARKER.to_string()
    } else {
        String::new()
    }
}

/// Resolves the list name shown for `viewer`.
///
/// With rank formatting enabled and a rank system present, the rank system's
/// own name format wins. Otherwise the configured template is filled in.
/// Idle participants are always rendered flat grey: existing escapes are
/// stripped and a single grey escape is put in front.
pub fn resolve_display_name(ctx: &ResolveContext<'_>, viewer: &Participant) -> String {
    let name = base_display_name(ctx, viewer);
    if ctx.is_idle(viewer) {
        format!("{SECTION_SIGN}7{}", strip_color_codes(&name))
    } else {
        name
    }
}

fn base_display_name(ctx: &ResolveContext<'_>, viewer: &Participant) -> String {
    if ctx.config.rank_formatting_enabled && ctx.ranks.is_available() {
        if let Some(formatted) = ctx.ranks.formatted_name(viewer) {
            return convert_color_codes(&formatted);
        }
    }

    let mut name = ctx.config.display_name_format.clone();
    substitute(&mut name, tokens::NAME_FIELD, || viewer.name.clone());
    substitute(&mut name, tokens::RANK_FIELD, || ctx.ranks.rank_name(viewer));
    substitute(&mut name, tokens::AFK, || idle_marker(ctx, viewer));
    convert_color_codes(&name)
}
