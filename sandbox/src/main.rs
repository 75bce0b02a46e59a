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

//! A simulated host: a handful of bots, a fixed tick loop, a chat thread and
//! a status thread querying idle state while the cycle runs.
//!
//! Usage: `sandbox [config.json]`. Without a path the default configuration is
//! used with rank sorting and a short idle timeout.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, Sender};
use tablist_agents::{ParticipantView, UpdateScheduler};
use tablist_core::config::TICK_DURATION_MS;
use tablist_core::{
    Clock, HostContext, Participant, ParticipantId, PositionSample, Rank, SortMode, SystemClock,
    TabListConfig,
};
use tablist_infra::{InMemoryRoster, InMemoryScoreboard, LogSink, StaticRanks, SystemMetrics};

const SIMULATED_TICKS: u32 = 400;
const DISCONNECT_AT_TICK: u32 = 250;
const MAX_PARTICIPANTS: usize = 20;

fn load_config() -> Result<TabListConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(TabListConfig {
            server_name: "Sandbox".to_string(),
            sort_mode: SortMode::Rank,
            afk_timeout_secs: 10,
            ..Default::default()
        });
    };

    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read configuration from {path}"))?;
    let config: TabListConfig = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse configuration in {path}"))?;
    log::info!("Loaded configuration from {path}");
    Ok(config.clamped())
}

fn spawn_chatter(target: ParticipantId, events: Sender<ParticipantId>, running: Arc<AtomicBool>) {
    thread::spawn(move || {
        while running.load(Ordering::Relaxed) {
            thread::sleep(Duration::from_secs(3));
            if events.send(target).is_err() {
                break;
            }
        }
    });
}

fn spawn_status_reporter(
    view: ParticipantView,
    watched: Vec<Participant>,
    running: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while running.load(Ordering::Relaxed) {
            thread::sleep(Duration::from_secs(2));
            for participant in &watched {
                log::info!(
                    "Status: '{}' idle={} bucket={}",
                    participant.name,
                    view.is_idle(participant.id),
                    view.assigned_bucket(participant.id)
                        .unwrap_or_else(|| "-".to_string()),
                );
            }
        }
    })
}

fn drain_chat(scheduler: &UpdateScheduler, chat: &Receiver<ParticipantId>) {
    while let Ok(id) = chat.try_recv() {
        log::debug!("Chat from {id}");
        scheduler.on_chat(id);
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let ranks = StaticRanks::new()
        .with_rank("Owner", Rank::new("Owner", 100))
        .with_rank("Helper", Rank::new("Helper", 40))
        .with_name_format("&#FFAA00[{rank}] &f{name}");

    let roster = InMemoryRoster::new();
    let metrics = SystemMetrics::new(Arc::clone(&clock), MAX_PARTICIPANTS);
    let mut board = InMemoryScoreboard::new();
    let sink = LogSink;

    let walker = Participant::new(ParticipantId::new(), "walker");
    let idler = Participant::new(ParticipantId::new(), "Helper").with_latency(35);
    let talker = Participant::new(ParticipantId::new(), "Owner").with_world("the_nether");
    for participant in [&walker, &idler, &talker] {
        roster.join(participant.clone());
    }

    let mut scheduler = UpdateScheduler::new(config, Arc::clone(&clock), Arc::new(ranks));
    let running = Arc::new(AtomicBool::new(true));
    let (chat_tx, chat_rx) = crossbeam_channel::bounded(16);
    spawn_chatter(talker.id, chat_tx, Arc::clone(&running));
    let reporter = spawn_status_reporter(
        scheduler.view(),
        vec![walker.clone(), idler.clone(), talker.clone()],
        Arc::clone(&running),
    );

    let tick = Duration::from_millis(u64::from(TICK_DURATION_MS));
    for tick_index in 0..SIMULATED_TICKS {
        let started = Instant::now();

        roster.update(walker.id, |p| {
            p.position = PositionSample::new(f64::from(tick_index) * 0.1, 0.0, 0.0);
        });
        if tick_index == DISCONNECT_AT_TICK {
            if let Some(departed) = roster.leave(idler.id) {
                scheduler.on_disconnect(&departed, &mut board);
            }
        }
        metrics.set_online(roster.len());
        drain_chat(&scheduler, &chat_rx);

        let mut host = HostContext {
            registry: &roster,
            metrics: Some(&metrics),
            sink: &sink,
            buckets: &mut board,
        };
        if let Some(report) = scheduler.on_tick(&mut host) {
            log::debug!("Cycle: {report:?}");
        }

        let elapsed = started.elapsed();
        metrics.record_tick(elapsed.as_secs_f64() * 1000.0);
        thread::sleep(tick.saturating_sub(elapsed));
    }

    running.store(false, Ordering::Relaxed);
    reporter
        .join()
        .map_err(|_| anyhow::anyhow!("Status reporter thread panicked"))?;

    log::info!("Final list order: {:?}", board.list_order());
    Ok(())
}
