//! Headless demo driver
//!
//! Runs one auto-played session at a fixed 60 Hz step, logging notable
//! events, then folds the run into a profile to exercise the persistence
//! path end to end. A rendering front end would replace the policy here
//! with real input and keep everything else.

use glam::Vec2;

use microbot_mayhem::consts::{ARENA_HEIGHT, ARENA_WIDTH};
use microbot_mayhem::sim::{GameEvent, GamePhase, SimulationState, TickInput, tick};
use microbot_mayhem::{MemoryStore, Profile, Storage, Tuning};

const SIM_DT_MS: f64 = 1000.0 / 60.0;
/// Cap on simulated play time for one demo run
const MAX_RUN_MS: f64 = 180_000.0;

/// Demo AI: aim at the nearest enemy, hold fire, and kite away from
/// anything that gets close. With nothing nearby, drift toward the
/// nearest collectible item.
fn demo_input(state: &SimulationState) -> TickInput {
    let player = state.player.pos;
    let nearest_enemy = state
        .enemies
        .iter()
        .min_by(|a, b| {
            a.pos
                .distance_squared(player)
                .partial_cmp(&b.pos.distance_squared(player))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|e| e.pos);

    let mut input = TickInput {
        fire: nearest_enemy.is_some(),
        pointer: nearest_enemy.unwrap_or(Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0)),
        ..Default::default()
    };

    // Kite: step away from a close enemy, biased toward the arena center
    // so the player never pins itself against a wall
    if let Some(enemy) = nearest_enemy
        && enemy.distance(player) < 160.0
    {
        let center = Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0);
        let flee = (player - enemy).normalize_or_zero() + (center - player) * 0.005;
        input.left = flee.x < -0.2;
        input.right = flee.x > 0.2;
        input.up = flee.y < -0.2;
        input.down = flee.y > 0.2;
        return input;
    }

    // Safe: collect the nearest item if one is up
    let item = state
        .power_ups
        .iter()
        .map(|p| p.pos)
        .chain(state.pickups.iter().map(|p| p.pos))
        .min_by(|a, b| {
            a.distance_squared(player)
                .partial_cmp(&b.distance_squared(player))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    if let Some(item) = item {
        let to_item = item - player;
        input.left = to_item.x < -10.0;
        input.right = to_item.x > 10.0;
        input.up = to_item.y < -10.0;
        input.down = to_item.y > 10.0;
    }

    input
}

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
    log::info!("demo run, seed {seed}");

    let mut store = MemoryStore::default();
    let mut profile = Profile::load(&store);

    let mut state = SimulationState::new(
        seed,
        Tuning::default(),
        profile.upgrades,
        false,
    );
    state.start();

    let mut peak_combo = 0;
    while state.phase == GamePhase::Playing && state.clock_ms < MAX_RUN_MS {
        let input = demo_input(&state);
        for event in tick(&mut state, &input, SIM_DT_MS) {
            match event {
                GameEvent::WaveComplete { wave } => log::info!("wave {wave} reached"),
                GameEvent::BossSpawned { wave } => log::info!("boss arrived on wave {wave}"),
                GameEvent::Kill { score, combo, .. } => {
                    log::debug!("kill for {score} (combo x{combo})");
                }
                GameEvent::ComboEnded { length, peak } => {
                    peak_combo = peak;
                    log::debug!("combo ended at {length} (best {peak})");
                }
                GameEvent::GameOver { score, wave, time_ms } => {
                    log::info!(
                        "run over: {score} points, wave {wave}, {:.1} s",
                        time_ms / 1000.0
                    );
                }
                _ => {}
            }
        }
    }

    peak_combo = peak_combo.max(state.combo.peak);
    if profile.record_run(state.score, state.wave.current_wave, peak_combo, state.coins) {
        log::info!("new high score: {}", profile.high_score);
    }
    profile.save(&mut store);

    println!(
        "score {}  wave {}  coins {}  best combo {}",
        state.score, state.wave.current_wave, state.coins, peak_combo
    );
    if let Some(json) = store.load(Profile::STORAGE_KEY) {
        println!("profile: {json}");
    }
}
