//! Enemy steering and attack behavior
//!
//! One dispatch point per enemy kind. Grunts seek, smart enemies layer
//! periodic decisions on top of the seek, the boss holds a stand-off range
//! and cycles three ranged attack patterns on a fixed cooldown.
//!
//! Boss attacks are returned as (position, velocity) pairs; the tick owns
//! entity ID allocation and turns them into live projectiles.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Enemy, EnemyKind, SmartBehavior};
use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::tuning::Tuning;
use crate::{direction, unit_from_angle};

/// Distance the boss tries to keep from the player (px)
pub const BOSS_STANDOFF: f32 = 150.0;
/// Aggressive enemies back off inside this range (px)
const AGGRESSIVE_EVADE_RANGE: f32 = 80.0;
/// Cowardly enemies keep at least this range (px)
const COWARDLY_EVADE_RANGE: f32 = 120.0;

/// Advance one enemy by `dt_s`, appending any boss shots to `shots`
pub fn update_enemy(
    enemy: &mut Enemy,
    player_pos: Vec2,
    now_ms: f64,
    dt_s: f32,
    tuning: &Tuning,
    rng: &mut Pcg32,
    shots: &mut Vec<(Vec2, Vec2)>,
) {
    match enemy.kind {
        EnemyKind::Grunt => {
            seek_and_integrate(enemy, player_pos, dt_s, tuning);
        }
        EnemyKind::Smart {
            behavior,
            next_decision_ms,
            decision_cooldown_ms,
        } => {
            seek_and_integrate(enemy, player_pos, dt_s, tuning);
            if now_ms >= next_decision_ms {
                make_decision(enemy, behavior, player_pos, tuning, rng);
                enemy.kind = EnemyKind::Smart {
                    behavior,
                    next_decision_ms: now_ms + decision_cooldown_ms,
                    decision_cooldown_ms,
                };
            }
        }
        EnemyKind::Boss {
            pattern,
            next_attack_ms,
        } => {
            standoff_and_integrate(enemy, player_pos, dt_s, tuning);
            if now_ms >= next_attack_ms {
                perform_attack(enemy, pattern, player_pos, now_ms, shots);
                enemy.kind = EnemyKind::Boss {
                    pattern: (pattern + 1) % 3,
                    next_attack_ms: now_ms + tuning.boss_attack_cooldown_ms,
                };
            }
        }
    }
}

/// Base seeker: accelerate toward the player, clamp to 1.6x base speed,
/// integrate, and bounce off arena edges with a 0.6x rebound.
fn seek_and_integrate(enemy: &mut Enemy, player_pos: Vec2, dt_s: f32, tuning: &Tuning) {
    let speed_px = enemy.speed * tuning.enemy_speed_scale;
    enemy.vel += direction(enemy.pos, player_pos) * speed_px * dt_s;

    let max_speed = speed_px * 1.6;
    if enemy.vel.length() > max_speed {
        enemy.vel = enemy.vel.normalize() * max_speed;
    }

    enemy.pos += enemy.vel * dt_s;
    bounce_off_edges(enemy);
}

fn bounce_off_edges(enemy: &mut Enemy) {
    let r = enemy.radius;
    if enemy.pos.x < r {
        enemy.pos.x = r;
        enemy.vel.x *= -0.6;
    } else if enemy.pos.x > ARENA_WIDTH - r {
        enemy.pos.x = ARENA_WIDTH - r;
        enemy.vel.x *= -0.6;
    }
    if enemy.pos.y < r {
        enemy.pos.y = r;
        enemy.vel.y *= -0.6;
    } else if enemy.pos.y > ARENA_HEIGHT - r {
        enemy.pos.y = ARENA_HEIGHT - r;
        enemy.vel.y *= -0.6;
    }
}

/// Periodic smart-enemy steering impulse (applied once per decision, not
/// per tick)
fn make_decision(
    enemy: &mut Enemy,
    behavior: SmartBehavior,
    player_pos: Vec2,
    tuning: &Tuning,
    rng: &mut Pcg32,
) {
    let speed_px = enemy.speed * tuning.enemy_speed_scale;
    let distance = enemy.pos.distance(player_pos);

    match behavior {
        SmartBehavior::Aggressive => {
            if distance < AGGRESSIVE_EVADE_RANGE {
                enemy.vel += direction(player_pos, enemy.pos) * speed_px * 1.5;
            }
        }
        SmartBehavior::Cowardly => {
            if distance < COWARDLY_EVADE_RANGE {
                enemy.vel += direction(player_pos, enemy.pos) * speed_px * 1.5;
            } else {
                enemy.vel += direction(enemy.pos, player_pos) * speed_px * 0.8;
            }
        }
        SmartBehavior::Flanker => {
            let to_player = crate::angle_to(enemy.pos, player_pos);
            let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
            let flank = to_player + std::f32::consts::FRAC_PI_2 * sign;
            enemy.vel += unit_from_angle(flank) * speed_px * 0.7;
            enemy.vel += direction(enemy.pos, player_pos) * speed_px * 0.3;
        }
    }
}

/// Boss movement: retreat inside the stand-off range, close at 0.7x accel
/// outside it, speed clamped to 1.2x base. No edge bounce; the boss enters
/// from above the arena and self-regulates around the player.
fn standoff_and_integrate(enemy: &mut Enemy, player_pos: Vec2, dt_s: f32, tuning: &Tuning) {
    let speed_px = enemy.speed * tuning.enemy_speed_scale;
    let to_player = direction(enemy.pos, player_pos);

    if enemy.pos.distance(player_pos) < BOSS_STANDOFF {
        enemy.vel -= to_player * speed_px * dt_s;
    } else {
        enemy.vel += to_player * speed_px * dt_s * 0.7;
    }

    let max_speed = speed_px * 1.2;
    if enemy.vel.length() > max_speed {
        enemy.vel = enemy.vel.normalize() * max_speed;
    }

    enemy.pos += enemy.vel * dt_s;
}

/// Fire the given attack pattern. Patterns advance mod 3 after each
/// invocation; selection is a deterministic cycle, never random.
fn perform_attack(
    enemy: &Enemy,
    pattern: u8,
    player_pos: Vec2,
    now_ms: f64,
    shots: &mut Vec<(Vec2, Vec2)>,
) {
    match pattern {
        // Ring of 12, evenly spaced
        0 => {
            for i in 0..12 {
                let theta = i as f32 / 12.0 * std::f32::consts::TAU;
                shots.push((enemy.pos, unit_from_angle(theta) * 300.0));
            }
        }
        // 8 shots around a base angle that rotates with the clock
        1 => {
            let base = (now_ms / 100.0) as f32;
            for i in 0..8 {
                let theta = base + i as f32 / 8.0 * std::f32::consts::TAU;
                shots.push((enemy.pos, unit_from_angle(theta) * 250.0));
            }
        }
        // Fan of 5 at +-0.2 rad steps around the player direction
        _ => {
            let base = crate::angle_to(enemy.pos, player_pos);
            for i in -2..=2 {
                let theta = base + i as f32 * 0.2;
                shots.push((enemy.pos, unit_from_angle(theta) * 350.0));
            }
        }
    }
}
