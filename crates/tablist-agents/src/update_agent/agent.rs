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

//! Defines the UpdateScheduler, the owner of all per-cycle state.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use tablist_core::{
    BucketStore, Clock, HostContext, MetricsSnapshot, Participant, ParticipantId, RankProvider,
    TabListConfig,
};
use tablist_lanes::{resolve, resolve_display_name, ResolveContext};

use super::animation::AnimationCursor;
use super::view::ParticipantView;
use crate::activity_agent::ActivityTracker;
use crate::order_agent::{GroupOrderReconciler, ReconcileReport};

/// Joins header and footer into the value compared between cycles.
pub const LIST_TEXT_SEPARATOR: char = '\0';

pub(crate) type LastSentMap = Arc<RwLock<HashMap<ParticipantId, String>>>;

pub(crate) fn split_list_text(text: &str) -> (String, String) {
    match text.split_once(LIST_TEXT_SEPARATOR) {
        Some((header, footer)) => (header.to_string(), footer.to_string()),
        None => (text.to_string(), String::new()),
    }
}

/// What a full update cycle did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Participants whose header and footer changed and were sent.
    pub list_texts_sent: usize,
    /// Participants whose header and footer were unchanged.
    pub list_texts_suppressed: usize,
    /// Display names sent. Always one per participant.
    pub display_names_sent: usize,
    /// Bucket changes made by the reconciler.
    pub reconcile: ReconcileReport,
}

/// Drives the periodic update of every participant's list.
pub struct UpdateScheduler {
    config: TabListConfig,
    clock: Arc<dyn Clock>,
    ranks: Arc<dyn RankProvider>,
    activity: Arc<ActivityTracker>,
    cursor: AnimationCursor,
    reconciler: GroupOrderReconciler,
    ticks_since_update: u32,
    last_sent: LastSentMap,
}

impl UpdateScheduler {
    /// Creates a scheduler for `config`.
    ///
    /// Pass [`NoRanks`](tablist_core::NoRanks) when the host has no rank system.
    pub fn new(config: TabListConfig, clock: Arc<dyn Clock>, ranks: Arc<dyn RankProvider>) -> Self {
        let activity = Arc::new(ActivityTracker::new(
            Arc::clone(&clock),
            config.afk_enabled,
            config.afk_timeout_ms(),
        ));

        log::info!(
            "UpdateScheduler: Created (every {} ticks, sort mode {}, ranks {})",
            config.update_interval_ticks(),
            config.sort_mode,
            if ranks.is_available() { "present" } else { "absent" },
        );

        Self {
            config,
            clock,
            ranks,
            activity,
            cursor: AnimationCursor::new(),
            reconciler: GroupOrderReconciler::new(),
            ticks_since_update: 0,
            last_sent: Arc::default(),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &TabListConfig {
        &self.config
    }

    /// The shared idle tracker.
    pub fn activity(&self) -> Arc<ActivityTracker> {
        Arc::clone(&self.activity)
    }

    /// A handle for reading per-participant state from other threads.
    pub fn view(&self) -> ParticipantView {
        ParticipantView {
            activity: Arc::clone(&self.activity),
            last_sent: Arc::clone(&self.last_sent),
            assignments: self.reconciler.assignments_handle(),
        }
    }

    /// The current animation frame positions.
    pub fn cursor(&self) -> AnimationCursor {
        self.cursor
    }

    /// Called by the host once per tick. Returns `Some` when a full cycle ran.
    pub fn on_tick(&mut self, host: &mut HostContext<'_>) -> Option<CycleReport> {
        self.ticks_since_update += 1;
        if self.ticks_since_update < self.config.update_interval_ticks() {
            return None;
        }
        self.ticks_since_update = 0;
        Some(self.run_cycle(host))
    }

    /// Runs one full cycle regardless of the rate limit.
    pub fn run_cycle(&mut self, host: &mut HostContext<'_>) -> CycleReport {
        let participants = host.registry.participants();

        self.cursor.advance(
            self.config.header_frames.len(),
            self.config.footer_frames.len(),
            self.config.animation_interval,
        );

        let present: HashSet<ParticipantId> = participants.iter().map(|p| p.id).collect();
        self.activity.retain_present(&present);
        self.last_sent
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|id, _| present.contains(id));

        if self.config.afk_enabled {
            for participant in &participants {
                self.activity
                    .record_position_sample(participant.id, participant.position);
            }
        }

        let mut report = CycleReport {
            reconcile: self.reconciler.reconcile(
                self.config.sort_mode,
                &participants,
                self.ranks.as_ref(),
                &mut *host.buckets,
            ),
            ..Default::default()
        };

        let snapshot = host.metrics.map(MetricsSnapshot::new);
        let ctx = ResolveContext {
            config: &self.config,
            metrics: snapshot.as_ref(),
            ranks: self.ranks.as_ref(),
            idle: self.activity.as_ref(),
            clock: self.clock.as_ref(),
        };
        let header = self
            .config
            .header_frames
            .get(self.cursor.header_index())
            .map(String::as_str);
        let footer = self
            .config
            .footer_frames
            .get(self.cursor.footer_index())
            .map(String::as_str);

        for participant in &participants {
            let header_text = resolve(header, &ctx, participant);
            let footer_text = resolve(footer, &ctx, participant);
            if self.remember_list_text(participant.id, &header_text, &footer_text) {
                host.sink
                    .send_list_text(participant, &header_text, &footer_text);
                report.list_texts_sent += 1;
            } else {
                report.list_texts_suppressed += 1;
            }

            let display_name = resolve_display_name(&ctx, participant);
            host.sink.send_display_name(participant, &display_name);
            report.display_names_sent += 1;
        }

        log::debug!(
            "UpdateScheduler: Cycle done (participants={} sent={} suppressed={} buckets +{} ~{} -{})",
            participants.len(),
            report.list_texts_sent,
            report.list_texts_suppressed,
            report.reconcile.created,
            report.reconcile.moved,
            report.reconcile.deleted,
        );

        report
    }

    /// Records explicit activity, e.g. a chat message.
    pub fn on_chat(&self, id: ParticipantId) {
        self.activity.record_explicit_activity(id);
    }

    /// Purges everything kept for a departed participant.
    pub fn on_disconnect(&mut self, participant: &Participant, buckets: &mut dyn BucketStore) {
        self.activity.forget(participant.id);
        self.last_sent
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&participant.id);
        self.reconciler.forget(participant, buckets);
        log::debug!(
            "UpdateScheduler: Forgot '{}' ({})",
            participant.name,
            participant.id
        );
    }

    /// Swaps in a new configuration and starts over from a clean slate.
    ///
    /// Idle history survives; only the detection policy is updated.
    pub fn apply_config(&mut self, config: TabListConfig) {
        self.activity
            .set_policy(config.afk_enabled, config.afk_timeout_ms());
        self.config = config;
        self.reset_state();
        log::info!(
            "UpdateScheduler: Configuration applied (every {} ticks, sort mode {})",
            self.config.update_interval_ticks(),
            self.config.sort_mode,
        );
    }

    /// Clears last-sent text, animation progress, the tick counter and the
    /// remembered sort mode.
    ///
    /// The next cycle sends everyone's list text again and cleans up leftover
    /// buckets. Idle history is kept.
    pub fn reset_state(&mut self) {
        self.ticks_since_update = 0;
        self.last_sent
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.cursor.reset();
        self.reconciler.reset();
    }

    /// Resolves a display name on demand, outside of a cycle.
    pub fn display_name_for(&self, participant: &Participant) -> String {
        let ctx = ResolveContext {
            config: &self.config,
            metrics: None,
            ranks: self.ranks.as_ref(),
            idle: self.activity.as_ref(),
            clock: self.clock.as_ref(),
        };
        resolve_display_name(&ctx, participant)
    }

    /// The header and footer last sent to `id`.
    pub fn last_sent_text(&self, id: ParticipantId) -> Option<(String, String)> {
        self.last_sent
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .map(|text| split_list_text(text))
    }

    /// The engine-owned bucket `id` was placed in by the last cycle.
    pub fn assigned_bucket(&self, id: ParticipantId) -> Option<String> {
        self.reconciler.assigned_bucket(id)
    }

    fn remember_list_text(&self, id: ParticipantId, header: &str, footer: &str) -> bool {
        let combined = format!("{header}{LIST_TEXT_SEPARATOR}{footer}");
        let mut last_sent = self
            .last_sent
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if last_sent.get(&id) == Some(&combined) {
            return false;
        }
        last_sent.insert(id, combined);
        true
    }
}
