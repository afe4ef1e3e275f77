//! Oubliette entry point
//!
//! Headless demo driver: runs a seeded descent with a scripted input bot on
//! the fixed timestep and logs the run. Rendering and real input devices
//! plug into the library crate from a separate front end.

use std::path::Path;
use std::time::SystemTime;

use oubliette::consts::*;
use oubliette::records::{RunEntry, RunRecords};
use oubliette::sim::{GameEvent, LevelSignal, LevelState, TickInput, tick};

/// Upper bound on simulated ticks (20 minutes of play)
const MAX_TICKS: u64 = 20 * 60 * 60;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0)
        });

    log::info!("starting descent, seed {seed}");

    let mut state = match LevelState::new(seed) {
        Ok(state) => state,
        Err(e) => {
            log::error!("level generation failed: {e}");
            std::process::exit(1);
        }
    };

    let mut finished = false;
    for tick_index in 0..MAX_TICKS {
        let input = bot_input(&state, tick_index);
        let signal = tick(&mut state, &input, SIM_DT);

        for event in state.take_events() {
            match event {
                GameEvent::PlayerHit => log::debug!("player down on floor {}", state.level_number),
                GameEvent::EnemyKilled => log::debug!("enemy killed"),
                _ => {}
            }
        }

        match signal {
            LevelSignal::Continue => {}
            LevelSignal::EndOfLevel => {
                log::info!(
                    "floor {} cleared in {:.1}s ({} deaths)",
                    state.level_number,
                    state.time_taken,
                    state.player.deaths
                );
                if let Err(e) = state.advance_level() {
                    log::error!("level generation failed: {e}");
                    std::process::exit(1);
                }
            }
            LevelSignal::Finish => {
                state.total_time += state.time_taken;
                finished = true;
                break;
            }
        }
    }

    if finished {
        log::info!(
            "descent complete: {} floors, {:.1}s, {} kills, {} deaths",
            state.level_number,
            state.total_time,
            state.player.enemies_killed,
            state.player.deaths
        );
    } else {
        log::info!(
            "descent abandoned on floor {} after {} ticks",
            state.level_number,
            MAX_TICKS
        );
    }

    record_run(&state);
}

/// Scripted input: walk back and forth with periodic jumps and attacks,
/// respawning immediately after a death. Enough to exercise a full run.
fn bot_input(state: &LevelState, tick_index: u64) -> TickInput {
    if !state.player.alive {
        return TickInput {
            respawn_pressed: true,
            ..Default::default()
        };
    }

    let phase = tick_index % 480;
    TickInput {
        left: phase >= 240,
        right: phase < 240,
        jump_pressed: tick_index % 90 == 0,
        attack_pressed: tick_index % 45 == 0,
        ..Default::default()
    }
}

fn record_run(state: &LevelState) {
    let path = Path::new("oubliette_records.json");
    let mut records = RunRecords::load(path);

    let entry = RunEntry {
        floor: state.level_number,
        total_time: state.total_time,
        kills: state.player.enemies_killed,
        deaths: state.player.deaths,
        seed: state.seed,
        timestamp: SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0),
    };

    match records.add_run(entry) {
        Some(rank) => {
            log::info!("run ranked #{rank}");
            records.save(path);
        }
        None => log::info!("run did not rank"),
    }
}
