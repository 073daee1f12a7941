//! Per-frame simulation step
//!
//! An external driver calls [`tick`] once per frame with the elapsed delta.
//! The step advances spawning, every entity collection and all collision
//! pairs, then returns the tick's side-effect events for presentation and
//! persistence collaborators. All state mutation happens here, serialized
//! on the tick boundary; collaborators only read snapshots between ticks.

use glam::Vec2;
use rand::Rng;

use super::collision::{circles_overlap, circles_overlap_with_tolerance};
use super::events::{DamageSource, GameEvent};
use super::spawn;
use super::state::{
    GamePhase, PowerUpKind, Projectile, ProjectileSource, SimulationState,
};
use crate::consts::*;
use crate::{angle_to, direction, unit_from_angle};

/// Input intent for a single tick, polled from external sources
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
    /// Aim target in arena coordinates (mouse or touch)
    pub pointer: Vec2,
    /// Touch-drag steering toward the pointer
    pub touch: bool,
    /// One-shot pause toggle
    pub pause: bool,
}

/// Advance the simulation by one frame delta (milliseconds).
///
/// No-op outside the `Playing` phase and while paused, apart from the pause
/// toggle itself; a finished game stays frozen until an external reset.
pub fn tick(state: &mut SimulationState, input: &TickInput, dt_ms: f64) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if input.pause {
        state.toggle_pause();
    }
    if !state.is_playing() {
        return events;
    }

    // Guard against huge deltas after a hitch or tab switch
    let dt_ms = dt_ms.clamp(0.0, 100.0);
    let dt_s = (dt_ms / 1000.0) as f32;
    state.clock_ms += dt_ms;

    // 1-2. scheduling: deferred spawns, difficulty, trickle spawner
    spawn::process_pending_spawns(state, &mut events);
    spawn::tick_difficulty(state, dt_ms);
    spawn::tick_trickle_spawner(state, dt_ms);

    // 3. player movement and firing
    update_player(state, input, dt_s, &mut events);

    // 4. projectiles advance; lifetime expiry is independent of collisions
    let now = state.clock_ms;
    for projectile in &mut state.projectiles {
        projectile.pos += projectile.vel * dt_s;
    }
    state.projectiles.retain(|p| !p.expired(now));

    // 5. enemy behavior, projectile hits, deaths and drops
    let boss_shots = update_enemies(state, dt_s);
    resolve_projectile_hits(state, &mut events);
    for (pos, vel) in boss_shots {
        let id = state.next_entity_id();
        state.projectiles.push(Projectile {
            id,
            pos,
            vel,
            radius: BOSS_PROJECTILE_RADIUS,
            spawned_ms: now,
            source: ProjectileSource::Boss,
        });
    }

    // 6. enemy contact with the player
    resolve_enemy_contact(state, &mut events);

    // 7. boss projectiles against the player
    resolve_boss_projectiles(state, &mut events);

    // 8. world items: collect on contact, drop on timeout
    update_items(state, &mut events);

    // 9. combo decay and wave progression
    let now = state.clock_ms;
    if let Some(length) = state.combo.check_decay(now) {
        events.push(GameEvent::ComboEnded {
            length,
            peak: state.combo.peak,
        });
    }
    spawn::check_wave_progress(state, &mut events);

    // 10. terminal condition
    if state.player.health <= 0.0 {
        state.phase = GamePhase::GameOver;
        events.push(GameEvent::GameOver {
            score: state.score,
            wave: state.wave.current_wave,
            time_ms: state.clock_ms,
        });
        log::info!(
            "game over: score {} on wave {} after {:.1} s",
            state.score,
            state.wave.current_wave,
            state.clock_ms / 1000.0
        );
    }

    events
}

/// Step 3: acceleration from input (keyboard or touch-drag), per-tick
/// damping, bounds clamping, aiming and firing
fn update_player(
    state: &mut SimulationState,
    input: &TickInput,
    dt_s: f32,
    events: &mut Vec<GameEvent>,
) {
    let now = state.clock_ms;
    let power_ups = state.tuning.power_ups;
    let player = &mut state.player;

    player.expire_power_ups(now);

    let accel = player.accel * player.speed_multiplier(&power_ups);
    let mut acc = Vec2::ZERO;
    if input.left {
        acc.x -= accel;
    }
    if input.right {
        acc.x += accel;
    }
    if input.up {
        acc.y -= accel;
    }
    if input.down {
        acc.y += accel;
    }
    if input.touch {
        let delta = input.pointer - player.pos;
        if delta.x.abs() > 10.0 || delta.y.abs() > 10.0 {
            acc += delta.normalize_or_zero() * accel;
        }
    }

    player.vel += acc * dt_s;
    player.vel *= PLAYER_DAMPING;
    player.pos += player.vel * dt_s;
    player.pos.x = player.pos.x.clamp(player.radius, ARENA_WIDTH - player.radius);
    player.pos.y = player.pos.y.clamp(player.radius, ARENA_HEIGHT - player.radius);
    player.facing = angle_to(player.pos, input.pointer);
    player.record_trail();

    let cooldown = player.fire_cooldown_ms(&power_ups);
    if input.fire && now - player.last_fire_ms > cooldown {
        player.last_fire_ms = now;
        let triple = player.has_power_up(PowerUpKind::TripleShot);
        let (pos, radius, facing) = (player.pos, player.radius, player.facing);
        let speed = state.tuning.projectile_speed;

        let spread: &[f32] = if triple { &[-0.3, 0.0, 0.3] } else { &[0.0] };
        for &offset in spread {
            let dir = unit_from_angle(facing + offset);
            let id = state.next_entity_id();
            state.projectiles.push(Projectile {
                id,
                pos: pos + dir * (radius + MUZZLE_OFFSET),
                vel: dir * speed,
                radius: PROJECTILE_RADIUS,
                spawned_ms: now,
                source: ProjectileSource::Player,
            });
        }
        events.push(GameEvent::ShotFired { pos });
    }
}

/// Step 5a: advance every enemy's behavior. Boss shots come back as
/// (position, velocity) pairs; the caller owns ID allocation.
fn update_enemies(state: &mut SimulationState, dt_s: f32) -> Vec<(Vec2, Vec2)> {
    let mut shots = Vec::new();
    let SimulationState {
        enemies,
        rng,
        tuning,
        clock_ms,
        player,
        ..
    } = state;
    for enemy in enemies.iter_mut() {
        super::behavior::update_enemy(enemy, player.pos, *clock_ms, dt_s, tuning, rng, &mut shots);
    }
    shots
}

/// Step 5b: player projectiles against enemies. A projectile is consumed by
/// its first hit; an enemy whose health crosses zero dies in the same tick,
/// feeding the combo and rolling item drops.
fn resolve_projectile_hits(state: &mut SimulationState, events: &mut Vec<GameEvent>) {
    let now = state.clock_ms;
    let weekend = state.weekend_bonus;
    // Deferred spawns: positions decided here, entities allocated below
    let mut drop_pickups: Vec<Vec2> = Vec::new();
    let mut drop_power_ups: Vec<(Vec2, PowerUpKind)> = Vec::new();

    {
        let SimulationState {
            enemies,
            projectiles,
            rng,
            combo,
            wave,
            score,
            coins,
            tuning,
            ..
        } = state;

        let mut i = 0;
        while i < enemies.len() {
            let mut j = 0;
            while j < projectiles.len() {
                if projectiles[j].source == ProjectileSource::Player
                    && circles_overlap(
                        enemies[i].pos,
                        enemies[i].radius,
                        projectiles[j].pos,
                        projectiles[j].radius,
                    )
                {
                    let damage = 8.0 + rng.random_range(0.0..10.0f32);
                    enemies[i].health = (enemies[i].health - damage).max(0.0);
                    projectiles.remove(j);
                    if enemies[i].health > 0.0 {
                        events.push(GameEvent::Hit {
                            enemy_id: enemies[i].id,
                            damage,
                        });
                    }
                } else {
                    j += 1;
                }
            }

            if enemies[i].health <= 0.0 {
                let dead = enemies.remove(i);
                if dead.is_boss() {
                    wave.boss_active = false;
                }
                wave.enemies_defeated += 1;
                combo.register_kill(now);

                let base = 10 + rng.random_range(0..20u64);
                let kill_score = combo.score_for(base);
                let kill_coins = combo.coins_for(base, weekend);
                *score += kill_score;
                *coins += kill_coins;
                events.push(GameEvent::Kill {
                    enemy_id: dead.id,
                    pos: dead.pos,
                    score: kill_score,
                    coins: kill_coins,
                    combo: combo.count,
                });

                if rng.random::<f32>() < tuning.pickup_drop_chance {
                    drop_pickups.push(dead.pos);
                }
                let power_up_chance = (tuning.power_up_drop_chance
                    + combo.count as f32 * 0.01)
                    .min(tuning.power_up_drop_cap);
                if rng.random::<f32>() < power_up_chance {
                    let kind =
                        PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];
                    drop_power_ups.push((dead.pos, kind));
                }
            } else {
                i += 1;
            }
        }
    }

    for pos in drop_pickups {
        let id = state.next_entity_id();
        state.pickups.push(super::state::Pickup {
            id,
            pos,
            expires_ms: now + PICKUP_LIFE_MS,
        });
    }
    for (pos, kind) in drop_power_ups {
        let id = state.next_entity_id();
        state.power_ups.push(super::state::PowerUp {
            id,
            pos,
            kind,
            expires_ms: now + POWER_UP_LIFE_MS,
        });
    }
}

/// Step 6: surviving enemies touching the player. A shield reflects the
/// enemy with no damage; otherwise damage plus knockback, and the enemy
/// staggers back.
fn resolve_enemy_contact(state: &mut SimulationState, events: &mut Vec<GameEvent>) {
    let SimulationState {
        enemies,
        player,
        rng,
        ..
    } = state;

    for enemy in enemies.iter_mut() {
        if !circles_overlap_with_tolerance(
            enemy.pos,
            enemy.radius,
            player.pos,
            player.radius,
            CONTACT_TOLERANCE,
        ) {
            continue;
        }

        if player.shield_active {
            enemy.vel *= -0.8;
            events.push(GameEvent::Blocked { enemy_id: enemy.id });
            continue;
        }

        let damage = 8.0 + rng.random_range(0.0..12.0f32);
        player.take_damage(damage);
        player.vel += direction(enemy.pos, player.pos) * CONTACT_KNOCKBACK;
        enemy.vel *= -0.4;
        events.push(GameEvent::DamageTaken {
            amount: damage,
            source: DamageSource::EnemyContact,
        });
    }
}

/// Step 7: boss projectiles against the player. Shield deflects for free;
/// otherwise a fixed 5 damage. Either way the projectile is spent.
fn resolve_boss_projectiles(state: &mut SimulationState, events: &mut Vec<GameEvent>) {
    let SimulationState {
        projectiles,
        player,
        ..
    } = state;

    let mut i = 0;
    while i < projectiles.len() {
        let p = &projectiles[i];
        if p.source == ProjectileSource::Boss
            && circles_overlap(p.pos, p.radius, player.pos, player.radius)
        {
            if player.shield_active {
                events.push(GameEvent::Deflected { pos: p.pos });
            } else {
                player.take_damage(5.0);
                events.push(GameEvent::DamageTaken {
                    amount: 5.0,
                    source: DamageSource::BossProjectile,
                });
            }
            projectiles.remove(i);
        } else {
            i += 1;
        }
    }
}

/// Step 8: heal orbs and power-ups - collected on contact, expired on
/// their deadline
fn update_items(state: &mut SimulationState, events: &mut Vec<GameEvent>) {
    let now = state.clock_ms;
    let power_ups = state.tuning.power_ups;
    let SimulationState {
        pickups,
        power_ups: world_power_ups,
        player,
        rng,
        combo,
        score,
        ..
    } = state;

    let mut i = 0;
    while i < pickups.len() {
        let p = &pickups[i];
        if circles_overlap(p.pos, PICKUP_RADIUS, player.pos, player.radius) {
            let heal = 24.0 + rng.random_range(0.0..18.0f32);
            player.heal(heal);
            *score += combo.score_for(6);
            events.push(GameEvent::PickupCollected { pos: p.pos, heal });
            pickups.remove(i);
        } else if now > p.expires_ms {
            pickups.remove(i);
        } else {
            i += 1;
        }
    }

    let mut i = 0;
    while i < world_power_ups.len() {
        let p = &world_power_ups[i];
        if circles_overlap(p.pos, POWER_UP_RADIUS, player.pos, player.radius) {
            player.apply_power_up(p.kind, now, &power_ups);
            events.push(GameEvent::PowerUpCollected {
                pos: p.pos,
                kind: p.kind,
            });
            world_power_ups.remove(i);
        } else if now > p.expires_ms {
            world_power_ups.remove(i);
        } else {
            i += 1;
        }
    }
}
