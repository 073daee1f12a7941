//! Data-driven game balance
//!
//! Everything a designer would want to tweak lives in [`Tuning`]. The
//! difficulty escalation mutates a copy held by the simulation, never the
//! source values, so every session starts from the same baseline.

use serde::{Deserialize, Serialize};

/// Timed buff durations and related knobs (milliseconds)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PowerUpTuning {
    pub rapid_fire_ms: f64,
    /// Inter-shot cooldown while rapid fire is active
    pub rapid_fire_rate_ms: f64,
    pub shield_ms: f64,
    pub triple_shot_ms: f64,
    pub speed_boost_ms: f64,
    pub speed_boost_multiplier: f32,
}

impl Default for PowerUpTuning {
    fn default() -> Self {
        Self {
            rapid_fire_ms: 5000.0,
            rapid_fire_rate_ms: 80.0,
            shield_ms: 4000.0,
            triple_shot_ms: 3000.0,
            speed_boost_ms: 4000.0,
            speed_boost_multiplier: 1.8,
        }
    }
}

/// Game balance parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    /// Cap on concurrently live enemies for the trickle spawner
    pub max_enemies: usize,
    /// Trickle spawn interval (ms); shrinks as difficulty escalates
    pub spawn_interval_ms: f64,
    /// Enemy speed draw range, in abstract speed units
    pub enemy_speed_range: (f32, f32),
    /// Pixels per second per speed unit
    pub enemy_speed_scale: f32,
    /// Player acceleration (px/s^2)
    pub player_accel: f32,
    /// Base inter-shot cooldown (ms)
    pub player_fire_rate_ms: f64,
    /// Player projectile speed (px/s)
    pub projectile_speed: f32,
    /// Difficulty escalation period (ms of play time)
    pub difficulty_interval_ms: f64,
    /// Speed range widening per escalation (min, max)
    pub difficulty_speed_step: (f32, f32),
    /// Spawn interval reduction per escalation (ms)
    pub difficulty_spawn_step: f64,
    /// Spawn interval floor (ms)
    pub spawn_interval_floor_ms: f64,
    pub boss_health: f32,
    pub boss_attack_cooldown_ms: f64,
    /// Chance an enemy kill drops a heal orb
    pub pickup_drop_chance: f32,
    /// Base chance of a power-up drop; grows 0.01 per combo step
    pub power_up_drop_chance: f32,
    /// Cap on the combo-scaled power-up drop chance
    pub power_up_drop_cap: f32,
    pub power_ups: PowerUpTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_enemies: 12,
            spawn_interval_ms: 1200.0,
            enemy_speed_range: (0.6, 1.6),
            enemy_speed_scale: 60.0,
            player_accel: 320.0,
            player_fire_rate_ms: 180.0,
            projectile_speed: 520.0,
            difficulty_interval_ms: 15_000.0,
            difficulty_speed_step: (0.06, 0.08),
            difficulty_spawn_step: 80.0,
            spawn_interval_floor_ms: 500.0,
            boss_health: 200.0,
            boss_attack_cooldown_ms: 2000.0,
            pickup_drop_chance: 0.35,
            power_up_drop_chance: 0.15,
            power_up_drop_cap: 0.30,
            power_ups: PowerUpTuning::default(),
        }
    }
}

impl Tuning {
    /// Widen the enemy speed range and tighten the spawn interval.
    /// Called by the simulation every `difficulty_interval_ms` of play.
    pub fn escalate_difficulty(&mut self) {
        self.enemy_speed_range.0 += self.difficulty_speed_step.0;
        self.enemy_speed_range.1 += self.difficulty_speed_step.1;
        self.spawn_interval_ms =
            (self.spawn_interval_ms - self.difficulty_spawn_step).max(self.spawn_interval_floor_ms);
    }
}

/// Purchased upgrade levels, each capped at 3 in the shop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeLevels {
    #[serde(default)]
    pub speed: u8,
    #[serde(default)]
    pub health: u8,
    #[serde(default)]
    pub fire_rate: u8,
}

impl UpgradeLevels {
    /// Extra player acceleration (px/s^2)
    pub fn accel_bonus(&self) -> f32 {
        self.speed as f32 * 20.0
    }

    /// Extra maximum health
    pub fn max_health_bonus(&self) -> f32 {
        self.health as f32 * 25.0
    }

    /// Effective fire rate after reduction, floored at the rapid-fire rate
    pub fn effective_fire_rate_ms(&self, base_ms: f64) -> f64 {
        (base_ms - self.fire_rate as f64 * 15.0).max(80.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escalation_floors_spawn_interval() {
        let mut tuning = Tuning::default();
        for _ in 0..20 {
            tuning.escalate_difficulty();
        }
        assert_eq!(tuning.spawn_interval_ms, tuning.spawn_interval_floor_ms);
        assert!(tuning.enemy_speed_range.0 > 0.6);
        assert!(tuning.enemy_speed_range.1 > tuning.enemy_speed_range.0);
    }

    #[test]
    fn test_upgrade_fire_rate_floor() {
        let maxed = UpgradeLevels {
            fire_rate: 3,
            ..Default::default()
        };
        assert_eq!(maxed.effective_fire_rate_ms(180.0), 135.0);
        assert_eq!(maxed.effective_fire_rate_ms(100.0), 80.0);
    }
}
