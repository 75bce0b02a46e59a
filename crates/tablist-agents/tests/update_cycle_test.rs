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

use std::sync::Arc;
use std::thread;

use tablist_agents::{CycleReport, UpdateScheduler};
use tablist_core::{
    BucketSpec, BucketStore, HostContext, ManualClock, MetricsProvider, NoRanks, Participant,
    ParticipantId, PositionSample, Rank, RankProvider, SortMode, TabListConfig,
};
use tablist_infra::{InMemoryRoster, InMemoryScoreboard, RecordingSink, StaticRanks};

// --- TEST COLLABORATORS ---

struct FixedMetrics {
    mspt: f64,
    online: usize,
}

impl MetricsProvider for FixedMetrics {
    fn mean_tick_time_ms(&self) -> f64 {
        self.mspt
    }
    fn online_count(&self) -> usize {
        self.online
    }
    fn max_capacity(&self) -> usize {
        20
    }
    fn memory_used_bytes(&self) -> u64 {
        256 * 1_048_576
    }
    fn memory_max_bytes(&self) -> u64 {
        1024 * 1_048_576
    }
    fn uptime_millis(&self) -> u64 {
        61_000
    }
}

struct Host {
    clock: Arc<ManualClock>,
    roster: InMemoryRoster,
    metrics: FixedMetrics,
    sink: RecordingSink,
    board: InMemoryScoreboard,
    metrics_available: bool,
}

impl Host {
    fn new() -> Self {
        Self {
            clock: Arc::new(ManualClock::new(1_709_647_629_000)),
            roster: InMemoryRoster::new(),
            metrics: FixedMetrics {
                mspt: 0.0,
                online: 0,
            },
            sink: RecordingSink::new(),
            board: InMemoryScoreboard::new(),
            metrics_available: true,
        }
    }

    fn join(&mut self, name: &str) -> Participant {
        let participant = Participant::new(ParticipantId::new(), name)
            .with_position(PositionSample::new(0.0, 0.0, 0.0));
        self.roster.join(participant.clone());
        self.metrics.online = self.roster.len();
        participant
    }

    fn scheduler(&self, config: TabListConfig, ranks: Arc<dyn RankProvider>) -> UpdateScheduler {
        UpdateScheduler::new(config, self.clock.clone(), ranks)
    }

    fn tick(&mut self, scheduler: &mut UpdateScheduler) -> Option<CycleReport> {
        let metrics: Option<&dyn MetricsProvider> = if self.metrics_available {
            Some(&self.metrics)
        } else {
            None
        };
        let mut ctx = HostContext {
            registry: &self.roster,
            metrics,
            sink: &self.sink,
            buckets: &mut self.board,
        };
        scheduler.on_tick(&mut ctx)
    }

    fn cycle(&mut self, scheduler: &mut UpdateScheduler) -> CycleReport {
        self.tick(scheduler)
            .expect("A one-tick interval must run a cycle on every tick")
    }
}

fn every_tick(header: &str, footer: &str) -> TabListConfig {
    TabListConfig {
        header_frames: vec![header.to_string()],
        footer_frames: vec![footer.to_string()],
        update_interval_ms: 50,
        afk_timeout_secs: 10,
        ..Default::default()
    }
}

// --- TESTS ---

#[test]
fn test_header_resolves_player_count_and_newlines() {
    let mut host = Host::new();
    let viewer = host.join("a");
    for name in ["b", "c", "d", "e"] {
        host.join(name);
    }
    let mut scheduler = host.scheduler(
        every_tick("#N&c#PLAYERCOUNT#N", "#CTPS"),
        Arc::new(NoRanks),
    );

    host.cycle(&mut scheduler);

    assert_eq!(
        host.sink.list_texts_for(viewer.id),
        vec![("\n§c5\n".to_string(), "§a20.0".to_string())]
    );
}

#[test]
fn test_alphabetical_sort_places_participants_in_order() {
    // --- 1. ARRANGE ---
    let mut host = Host::new();
    let bob = host.join("Bob");
    let alice = host.join("alice");
    let config = TabListConfig {
        sort_mode: SortMode::Alphabetical,
        ..every_tick("", "")
    };
    let mut scheduler = host.scheduler(config, Arc::new(NoRanks));

    // --- 2. ACT ---
    let report = host.cycle(&mut scheduler);

    // --- 3. ASSERT ---
    assert_eq!(scheduler.assigned_bucket(alice.id).as_deref(), Some("tl_00001"));
    assert_eq!(scheduler.assigned_bucket(bob.id).as_deref(), Some("tl_00002"));
    assert_eq!(host.board.list_order(), vec!["alice", "Bob"]);
    assert_eq!(report.reconcile.created, 2);
}

#[test]
fn test_sort_mode_round_trip_leaves_no_engine_buckets() {
    let mut host = Host::new();
    host.join("Bob");
    host.join("alice");
    let mut scheduler = host.scheduler(every_tick("", ""), Arc::new(NoRanks));

    host.cycle(&mut scheduler);
    assert!(host.board.buckets_with_prefix("tl_").is_empty());

    scheduler.apply_config(TabListConfig {
        sort_mode: SortMode::Alphabetical,
        ..every_tick("", "")
    });
    host.cycle(&mut scheduler);
    assert_eq!(host.board.buckets_with_prefix("tl_").len(), 2);

    scheduler.apply_config(every_tick("", ""));
    host.cycle(&mut scheduler);
    assert!(
        host.board.buckets_with_prefix("tl_").is_empty(),
        "Switching back to NONE must remove every engine-owned bucket"
    );
}

#[test]
fn test_rank_sort_leaves_foreign_buckets_alone() {
    let mut host = Host::new();
    let admin = host.join("Zed");
    let guest = host.join("amy");
    let builder = host.join("Bea");
    host.board.create(BucketSpec::plain("builders")).unwrap();
    host.board.add("Bea", "builders").unwrap();

    let ranks = StaticRanks::new().with_rank("Zed", Rank::new("Admin", 100));
    let config = TabListConfig {
        sort_mode: SortMode::Rank,
        ..every_tick("", "")
    };
    let mut scheduler = host.scheduler(config, Arc::new(ranks));

    host.cycle(&mut scheduler);
    host.cycle(&mut scheduler);

    assert_eq!(scheduler.assigned_bucket(admin.id).as_deref(), Some("tl_00001"));
    assert_eq!(scheduler.assigned_bucket(guest.id).as_deref(), Some("tl_00002"));
    assert_eq!(scheduler.assigned_bucket(builder.id), None);
    assert_eq!(host.board.bucket_of("Bea").as_deref(), Some("builders"));
    assert_eq!(
        host.board.bucket_names(),
        vec!["builders", "tl_00001", "tl_00002"]
    );
}

#[test]
fn test_unchanged_list_text_is_not_resent() {
    // --- 1. ARRANGE ---
    let mut host = Host::new();
    let steve = host.join("Steve");
    let alex = host.join("Alex");
    let mut scheduler = host.scheduler(
        every_tick("&6Hello #PLAYERNAME", "Ping: #PING"),
        Arc::new(NoRanks),
    );

    // --- 2. ACT ---
    let first = host.cycle(&mut scheduler);
    let second = host.cycle(&mut scheduler);
    host.roster.update(alex.id, |p| p.latency_ms = 42);
    let third = host.cycle(&mut scheduler);

    // --- 3. ASSERT ---
    assert_eq!((first.list_texts_sent, first.list_texts_suppressed), (2, 0));
    assert_eq!((second.list_texts_sent, second.list_texts_suppressed), (0, 2));
    assert_eq!((third.list_texts_sent, third.list_texts_suppressed), (1, 1));

    for report in [first, second, third] {
        assert_eq!(
            report.display_names_sent, 2,
            "Display names are sent on every cycle"
        );
    }

    assert_eq!(host.sink.list_texts_for(steve.id).len(), 1);
    assert_eq!(
        host.sink.list_texts_for(alex.id),
        vec![
            ("§6Hello Alex".to_string(), "Ping: 0".to_string()),
            ("§6Hello Alex".to_string(), "Ping: 42".to_string()),
        ]
    );
    assert_eq!(
        scheduler.last_sent_text(alex.id),
        Some(("§6Hello Alex".to_string(), "Ping: 42".to_string()))
    );
}

#[test]
fn test_cycles_are_rate_limited() {
    let mut host = Host::new();
    host.join("Steve");
    let config = TabListConfig {
        update_interval_ms: 500,
        ..every_tick("", "")
    };
    let mut scheduler = host.scheduler(config, Arc::new(NoRanks));

    for _ in 0..9 {
        assert_eq!(host.tick(&mut scheduler), None);
    }
    assert!(host.tick(&mut scheduler).is_some());
    assert_eq!(host.tick(&mut scheduler), None);
    assert_eq!(host.sink.events().len(), 2);
}

#[test]
fn test_missing_metrics_resolve_to_empty_text() {
    let mut host = Host::new();
    let steve = host.join("Steve");
    host.metrics_available = false;
    let mut scheduler = host.scheduler(
        every_tick("&bWelcome #PLAYERNAME", "#TPS"),
        Arc::new(NoRanks),
    );

    host.cycle(&mut scheduler);

    assert_eq!(
        host.sink.list_texts_for(steve.id),
        vec![(String::new(), String::new())]
    );
    assert_eq!(host.sink.display_names_for(steve.id), vec!["Steve §7"]);
}

#[test]
fn test_idle_participants_turn_grey_until_they_move() {
    // --- 1. ARRANGE ---
    let mut host = Host::new();
    let steve = host.join("Steve");
    let ranks = StaticRanks::new()
        .with_rank("Steve", Rank::new("Admin", 100))
        .with_name_format("&c[{rank}] &f{name}");
    let mut scheduler = host.scheduler(every_tick("", "#AFK"), Arc::new(ranks));

    // --- 2. ACT & ASSERT ---
    host.cycle(&mut scheduler);
    assert!(!scheduler.activity().is_idle(steve.id));

    host.clock.advance_secs(10);
    host.cycle(&mut scheduler);
    assert!(scheduler.activity().is_idle(steve.id));

    host.roster
        .update(steve.id, |p| p.position = PositionSample::new(0.0, 0.0, 90.0));
    host.cycle(&mut scheduler);
    assert!(!scheduler.activity().is_idle(steve.id));

    assert_eq!(
        host.sink.display_names_for(steve.id),
        vec!["§c[Admin] §fSteve", "§7[Admin] Steve", "§c[Admin] §fSteve"]
    );
    let footers: Vec<String> = host
        .sink
        .list_texts_for(steve.id)
        .into_iter()
        .map(|(_, footer)| footer)
        .collect();
    assert_eq!(footers, vec!["", "AFK", ""]);
}

#[test]
fn test_chat_counts_as_activity() {
    let mut host = Host::new();
    let steve = host.join("Steve");
    let mut scheduler = host.scheduler(every_tick("", ""), Arc::new(NoRanks));

    host.cycle(&mut scheduler);
    host.clock.advance_secs(10);
    scheduler.on_chat(steve.id);
    host.cycle(&mut scheduler);

    assert!(!scheduler.activity().is_idle(steve.id));
    assert_eq!(
        scheduler.display_name_for(&host.roster.get(steve.id).unwrap()),
        "Steve §7"
    );
}

#[test]
fn test_disconnect_purges_participant_state() {
    // --- 1. ARRANGE ---
    let mut host = Host::new();
    let alice = host.join("alice");
    let bob = host.join("Bob");
    let config = TabListConfig {
        sort_mode: SortMode::Alphabetical,
        ..every_tick("Hi", "")
    };
    let mut scheduler = host.scheduler(config, Arc::new(NoRanks));
    host.cycle(&mut scheduler);

    // --- 2. ACT ---
    let departed = host.roster.leave(bob.id).unwrap();
    scheduler.on_disconnect(&departed, &mut host.board);

    // --- 3. ASSERT ---
    assert_eq!(scheduler.last_sent_text(bob.id), None);
    assert_eq!(scheduler.assigned_bucket(bob.id), None);
    assert_eq!(scheduler.activity().tracked_count(), 1);
    assert!(!host.board.contains("tl_00002"));
    assert_eq!(host.board.bucket_of("alice").as_deref(), Some("tl_00001"));
    assert!(scheduler.last_sent_text(alice.id).is_some());
}

#[test]
fn test_late_chat_after_disconnect_does_not_revive_state() {
    // --- 1. ARRANGE ---
    let mut host = Host::new();
    host.join("alice");
    let bob = host.join("Bob");
    let mut scheduler = host.scheduler(every_tick("Hi", ""), Arc::new(NoRanks));
    host.cycle(&mut scheduler);

    // --- 2. ACT ---
    let departed = host.roster.leave(bob.id).unwrap();
    scheduler.on_disconnect(&departed, &mut host.board);
    scheduler.on_chat(bob.id);
    for _ in 0..3 {
        host.cycle(&mut scheduler);
    }

    // --- 3. ASSERT ---
    assert_eq!(scheduler.activity().tracked_count(), 1);
    assert!(!scheduler.view().is_idle(bob.id));
}

#[test]
fn test_reload_restarts_the_tick_counter() {
    let mut host = Host::new();
    host.join("Steve");
    let config = TabListConfig {
        update_interval_ms: 500,
        ..every_tick("", "")
    };
    let mut scheduler = host.scheduler(config.clone(), Arc::new(NoRanks));

    for _ in 0..5 {
        assert_eq!(host.tick(&mut scheduler), None);
    }
    scheduler.apply_config(config);

    for _ in 0..9 {
        assert_eq!(host.tick(&mut scheduler), None);
    }
    assert!(host.tick(&mut scheduler).is_some());
}

#[test]
fn test_reload_keeps_idle_history_and_resends_text() {
    let mut host = Host::new();
    let steve = host.join("Steve");
    let mut scheduler = host.scheduler(every_tick("Header", "Footer"), Arc::new(NoRanks));

    host.cycle(&mut scheduler);
    host.clock.advance_secs(10);
    assert!(scheduler.activity().is_idle(steve.id));

    scheduler.apply_config(every_tick("Header", "Footer"));
    assert!(
        scheduler.activity().is_idle(steve.id),
        "A reload must not reset idle history"
    );
    assert_eq!(scheduler.last_sent_text(steve.id), None);

    let report = host.cycle(&mut scheduler);
    assert_eq!(report.list_texts_sent, 1);
}

#[test]
fn test_header_animation_follows_interval() {
    let mut host = Host::new();
    let steve = host.join("Steve");
    let config = TabListConfig {
        header_frames: vec!["one".to_string(), "two".to_string()],
        animation_interval: 2,
        ..every_tick("", "static")
    };
    let mut scheduler = host.scheduler(config, Arc::new(NoRanks));

    for _ in 0..5 {
        host.cycle(&mut scheduler);
    }

    let headers: Vec<String> = host
        .sink
        .list_texts_for(steve.id)
        .into_iter()
        .map(|(header, _)| header)
        .collect();
    assert_eq!(headers, vec!["one", "two", "one"]);
}

#[test]
fn test_view_answers_queries_from_another_thread() {
    let mut host = Host::new();
    let steve = host.join("Steve");
    let config = TabListConfig {
        sort_mode: SortMode::Alphabetical,
        ..every_tick("#PLAYERNAME", "#WORLD")
    };
    let mut scheduler = host.scheduler(config, Arc::new(NoRanks));
    host.cycle(&mut scheduler);
    host.clock.advance_secs(30);

    let view = scheduler.view();
    let answer = thread::spawn(move || {
        (
            view.is_idle(steve.id),
            view.last_sent_text(steve.id),
            view.assigned_bucket(steve.id),
        )
    })
    .join()
    .unwrap();

    assert_eq!(
        answer,
        (
            true,
            Some(("Steve".to_string(), "overworld".to_string())),
            Some("tl_00001".to_string())
        )
    );
}
