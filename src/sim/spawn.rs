//! Enemy spawning and wave progression
//!
//! Spawns arrive three ways: a trickle spawner on an interval, staggered
//! wave batches, and a delayed boss entrance every third wave. Staggered
//! spawns are (deadline, kind) pairs on the state's pending queue, fired
//! from inside the tick - never real timers.

use glam::Vec2;
use rand::Rng;

use super::events::GameEvent;
use super::state::{Enemy, EnemyKind, PendingSpawn, SimulationState, SmartBehavior};
use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH, EDGE_SPAWN_MARGIN};

/// Delay before the boss enters after its wave opens (ms)
const BOSS_ENTRANCE_DELAY_MS: f64 = 1000.0;
/// Stagger between enemies of one wave batch (ms)
const BATCH_STAGGER_MS: f64 = 300.0;

/// Spawn a single enemy just outside a random arena edge.
///
/// Past the early waves a growing share (capped at 30%) come out smart:
/// a random steering personality at 1.2x the drawn speed.
pub fn spawn_enemy(state: &mut SimulationState) {
    let side = state.rng.random_range(0..4u8);
    let pos = match side {
        0 => Vec2::new(
            -EDGE_SPAWN_MARGIN,
            state.rng.random_range(0.0..ARENA_HEIGHT),
        ),
        1 => Vec2::new(
            ARENA_WIDTH + EDGE_SPAWN_MARGIN,
            state.rng.random_range(0.0..ARENA_HEIGHT),
        ),
        2 => Vec2::new(state.rng.random_range(0.0..ARENA_WIDTH), -EDGE_SPAWN_MARGIN),
        _ => Vec2::new(
            state.rng.random_range(0.0..ARENA_WIDTH),
            ARENA_HEIGHT + EDGE_SPAWN_MARGIN,
        ),
    };

    let (speed_min, speed_max) = state.tuning.enemy_speed_range;
    let speed = state.rng.random_range(speed_min..speed_max);
    let radius = 12.0 + state.rng.random_range(0.0..10.0f32);
    let health = 14.0 + state.rng.random_range(0..12) as f32;

    let smart_chance = (state.wave.current_wave as f32 * 0.05).min(0.3);
    let (speed, kind) = if state.rng.random::<f32>() < smart_chance {
        let behavior = SmartBehavior::ALL[state.rng.random_range(0..SmartBehavior::ALL.len())];
        let cooldown = 800.0 + state.rng.random_range(0.0..400.0f64);
        (
            speed * 1.2,
            EnemyKind::Smart {
                behavior,
                next_decision_ms: state.clock_ms + cooldown,
                decision_cooldown_ms: cooldown,
            },
        )
    } else {
        (speed, EnemyKind::Grunt)
    };

    let id = state.next_entity_id();
    state.enemies.push(Enemy {
        id,
        pos,
        vel: Vec2::ZERO,
        radius,
        health,
        max_health: health,
        speed,
        kind,
    });
    state.wave.enemies_this_wave += 1;
}

/// Spawn the boss at top-center, just above the arena
pub fn spawn_boss(state: &mut SimulationState) {
    let id = state.next_entity_id();
    state.enemies.push(Enemy {
        id,
        pos: Vec2::new(ARENA_WIDTH / 2.0, -50.0),
        vel: Vec2::ZERO,
        radius: 40.0,
        health: state.tuning.boss_health,
        max_health: state.tuning.boss_health,
        speed: 1.2,
        kind: EnemyKind::Boss {
            pattern: 0,
            next_attack_ms: state.clock_ms + state.tuning.boss_attack_cooldown_ms,
        },
    });
    state.wave.boss_active = true;
    state.wave.enemies_this_wave += 1;
    log::info!("boss entered on wave {}", state.wave.current_wave);
}

/// Fire pending spawns whose deadline has passed
pub fn process_pending_spawns(state: &mut SimulationState, events: &mut Vec<GameEvent>) {
    let now = state.clock_ms;
    let mut due = Vec::new();
    state.pending_spawns.retain(|&(deadline, what)| {
        if deadline <= now {
            due.push(what);
            false
        } else {
            true
        }
    });

    for what in due {
        match what {
            PendingSpawn::Enemy => spawn_enemy(state),
            PendingSpawn::Boss => {
                spawn_boss(state);
                events.push(GameEvent::BossSpawned {
                    wave: state.wave.current_wave,
                });
            }
        }
    }
}

/// Interval spawner, suppressed during boss fights and above the live cap
pub fn tick_trickle_spawner(state: &mut SimulationState, dt_ms: f64) {
    state.spawn_timer_ms += dt_ms;
    if !state.wave.boss_active
        && state.spawn_timer_ms > state.tuning.spawn_interval_ms
        && state.enemies.len() < state.tuning.max_enemies
    {
        state.spawn_timer_ms = 0.0;
        spawn_enemy(state);
    }
}

/// Periodic difficulty escalation: faster enemies, tighter spawn interval.
/// Monotonic within a session.
pub fn tick_difficulty(state: &mut SimulationState, dt_ms: f64) {
    state.difficulty_timer_ms += dt_ms;
    if state.difficulty_timer_ms > state.tuning.difficulty_interval_ms {
        state.difficulty_timer_ms = 0.0;
        state.tuning.escalate_difficulty();
        log::debug!(
            "difficulty up: speed {:?}, spawn interval {} ms",
            state.tuning.enemy_speed_range,
            state.tuning.spawn_interval_ms
        );
    }
}

/// Number of enemies in a regular wave batch
fn batch_size(wave: u32) -> u32 {
    5 + (wave as f32 * 0.8).floor() as u32
}

/// Wave completion check: the wave is done exactly when every spawned enemy
/// has been defeated and nothing is scheduled. Completion increments the
/// wave and schedules either the boss entrance (every third wave) or the
/// next staggered batch, so it cannot fire twice for one completion.
pub fn check_wave_progress(state: &mut SimulationState, events: &mut Vec<GameEvent>) {
    let complete = state.enemies.is_empty()
        && state.pending_spawns.is_empty()
        && state.wave.enemies_this_wave > 0
        && state.wave.enemies_defeated >= state.wave.enemies_this_wave;
    if !complete {
        return;
    }

    state.wave.current_wave += 1;
    state.wave.enemies_defeated = 0;
    state.wave.enemies_this_wave = 0;
    events.push(GameEvent::WaveComplete {
        wave: state.wave.current_wave,
    });
    log::info!("wave {} begins", state.wave.current_wave);

    if state.wave.current_wave % 3 == 0 {
        state
            .pending_spawns
            .push((state.clock_ms + BOSS_ENTRANCE_DELAY_MS, PendingSpawn::Boss));
    } else {
        for i in 0..batch_size(state.wave.current_wave) {
            state.pending_spawns.push((
                state.clock_ms + i as f64 * BATCH_STAGGER_MS,
                PendingSpawn::Enemy,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::{Tuning, UpgradeLevels};

    fn state() -> SimulationState {
        SimulationState::new(42, Tuning::default(), UpgradeLevels::default(), false)
    }

    #[test]
    fn test_enemies_spawn_outside_arena() {
        let mut state = state();
        for _ in 0..50 {
            spawn_enemy(&mut state);
        }
        for enemy in &state.enemies {
            let p = enemy.pos;
            let outside = p.x < 0.0 || p.x > ARENA_WIDTH || p.y < 0.0 || p.y > ARENA_HEIGHT;
            assert!(outside, "enemy spawned inside the arena at {p:?}");
        }
        assert_eq!(state.wave.enemies_this_wave, 50);
    }

    #[test]
    fn test_spawned_speed_within_range() {
        let mut state = state();
        for _ in 0..50 {
            spawn_enemy(&mut state);
        }
        let (min, max) = state.tuning.enemy_speed_range;
        for enemy in &state.enemies {
            // Smart enemies get a 1.2x bump over the drawn range
            assert!(enemy.speed >= min);
            assert!(enemy.speed <= max * 1.2);
        }
    }

    #[test]
    fn test_boss_spawn_sets_flag_and_counts() {
        let mut state = state();
        spawn_boss(&mut state);
        assert!(state.wave.boss_active);
        assert_eq!(state.wave.enemies_this_wave, 1);
        assert!(state.enemies[0].is_boss());
        assert_eq!(state.enemies[0].pos.y, -50.0);
    }

    #[test]
    fn test_wave_completion_fires_once() {
        let mut state = state();
        state.wave.enemies_this_wave = 4;
        state.wave.enemies_defeated = 4;

        let mut events = Vec::new();
        check_wave_progress(&mut state, &mut events);
        check_wave_progress(&mut state, &mut events);

        let wave_ups = events
            .iter()
            .filter(|e| matches!(e, GameEvent::WaveComplete { .. }))
            .count();
        assert_eq!(wave_ups, 1);
        assert_eq!(state.wave.current_wave, 2);
        // Wave 2 is a regular batch: 5 + floor(2 * 0.8) = 6 staggered spawns
        assert_eq!(state.pending_spawns.len(), 6);
    }

    #[test]
    fn test_no_completion_before_any_spawn() {
        let mut state = state();
        let mut events = Vec::new();
        check_wave_progress(&mut state, &mut events);
        assert!(events.is_empty());
        assert_eq!(state.wave.current_wave, 1);
    }

    #[test]
    fn test_boss_scheduled_every_third_wave() {
        let mut state = state();
        // Complete wave 2 -> wave 3 opens with a boss
        state.wave.current_wave = 2;
        state.wave.enemies_this_wave = 6;
        state.wave.enemies_defeated = 6;

        let mut events = Vec::new();
        check_wave_progress(&mut state, &mut events);
        assert_eq!(state.wave.current_wave, 3);
        assert_eq!(state.pending_spawns.len(), 1);
        assert_eq!(state.pending_spawns[0].1, PendingSpawn::Boss);

        // The boss enters after its delay, not immediately
        process_pending_spawns(&mut state, &mut events);
        assert!(state.enemies.is_empty());

        state.clock_ms = BOSS_ENTRANCE_DELAY_MS;
        process_pending_spawns(&mut state, &mut events);
        assert_eq!(state.enemies.len(), 1);
        assert!(state.enemies[0].is_boss());
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::BossSpawned { wave: 3 }))
        );
    }

    #[test]
    fn test_non_boss_waves_never_schedule_boss() {
        for wave in [1u32, 2, 4, 5, 7, 8] {
            let mut state = state();
            state.wave.current_wave = wave;
            state.wave.enemies_this_wave = 1;
            state.wave.enemies_defeated = 1;

            let mut events = Vec::new();
            check_wave_progress(&mut state, &mut events);
            if state.wave.current_wave % 3 == 0 {
                continue; // covered by the boss test
            }
            assert!(
                state
                    .pending_spawns
                    .iter()
                    .all(|(_, what)| *what == PendingSpawn::Enemy)
            );
        }
    }

    #[test]
    fn test_trickle_spawner_respects_boss_and_cap() {
        let mut state = state();
        state.wave.boss_active = true;
        tick_trickle_spawner(&mut state, 5000.0);
        assert!(state.enemies.is_empty());

        state.wave.boss_active = false;
        tick_trickle_spawner(&mut state, 5000.0);
        assert_eq!(state.enemies.len(), 1);

        // At the cap, the timer keeps accumulating but nothing spawns
        for _ in 0..state.tuning.max_enemies {
            spawn_enemy(&mut state);
        }
        let before = state.enemies.len();
        tick_trickle_spawner(&mut state, 5000.0);
        assert_eq!(state.enemies.len(), before);
    }
}
