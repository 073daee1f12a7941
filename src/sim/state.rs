//! Entity model and session state
//!
//! Entities share a flat record (position, velocity, radius, health) with a
//! tagged `kind` for behavior-specific data; behavior dispatch is an explicit
//! match in `behavior.rs`, not virtual dispatch. All timed effects are
//! absolute deadlines against the simulation clock.

use std::collections::HashMap;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::combo::ComboState;
use crate::consts::*;
use crate::tuning::{PowerUpTuning, Tuning, UpgradeLevels};

/// Session phase. `Playing` carries a separate `paused` sub-flag on
/// [`SimulationState`] that freezes the tick without leaving the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Menu,
    Playing,
    GameOver,
}

/// Timed buff kinds collectible from world power-ups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    RapidFire,
    Shield,
    TripleShot,
    SpeedBoost,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::RapidFire,
        PowerUpKind::Shield,
        PowerUpKind::TripleShot,
        PowerUpKind::SpeedBoost,
    ];

    /// Buff duration once collected
    pub fn duration_ms(&self, tuning: &PowerUpTuning) -> f64 {
        match self {
            PowerUpKind::RapidFire => tuning.rapid_fire_ms,
            PowerUpKind::Shield => tuning.shield_ms,
            PowerUpKind::TripleShot => tuning.triple_shot_ms,
            PowerUpKind::SpeedBoost => tuning.speed_boost_ms,
        }
    }
}

/// The player-controlled microbot
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub health: f32,
    pub max_health: f32,
    /// Facing angle toward the pointer (radians)
    pub facing: f32,
    pub last_fire_ms: f64,
    /// Effective inter-shot cooldown after upgrades
    pub fire_rate_ms: f64,
    /// Effective acceleration after upgrades (px/s^2)
    pub accel: f32,
    /// Active buff -> expiry deadline on the simulation clock
    pub active_power_ups: HashMap<PowerUpKind, f64>,
    pub shield_active: bool,
    pub shield_until_ms: f64,
    /// Recent positions while moving fast, newest first. Rendering hint only.
    pub trail: Vec<Vec2>,
}

impl Player {
    pub fn new(tuning: &Tuning, upgrades: UpgradeLevels) -> Self {
        let max_health = PLAYER_MAX_HEALTH + upgrades.max_health_bonus();
        Self {
            pos: Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0),
            vel: Vec2::ZERO,
            radius: PLAYER_RADIUS,
            health: max_health,
            max_health,
            facing: 0.0,
            last_fire_ms: f64::NEG_INFINITY,
            fire_rate_ms: upgrades.effective_fire_rate_ms(tuning.player_fire_rate_ms),
            accel: tuning.player_accel + upgrades.accel_bonus(),
            active_power_ups: HashMap::new(),
            shield_active: false,
            shield_until_ms: 0.0,
            trail: Vec::with_capacity(TRAIL_LENGTH),
        }
    }

    pub fn has_power_up(&self, kind: PowerUpKind) -> bool {
        self.active_power_ups.contains_key(&kind)
    }

    /// Activate or refresh a buff; shields additionally track their own
    /// expiry so damage gating needs no map lookup.
    pub fn apply_power_up(&mut self, kind: PowerUpKind, now_ms: f64, tuning: &PowerUpTuning) {
        let expiry = now_ms + kind.duration_ms(tuning);
        self.active_power_ups.insert(kind, expiry);
        if kind == PowerUpKind::Shield {
            self.shield_active = true;
            self.shield_until_ms = expiry;
        }
    }

    /// Drop buffs whose deadline has passed; clears the shield flag in the
    /// same pass when its expiry lapses.
    pub fn expire_power_ups(&mut self, now_ms: f64) {
        self.active_power_ups.retain(|_, expiry| now_ms <= *expiry);
        if self.shield_active && now_ms > self.shield_until_ms {
            self.shield_active = false;
        }
    }

    /// Cooldown between shots, shortened while rapid fire is active
    pub fn fire_cooldown_ms(&self, tuning: &PowerUpTuning) -> f64 {
        if self.has_power_up(PowerUpKind::RapidFire) {
            tuning.rapid_fire_rate_ms
        } else {
            self.fire_rate_ms
        }
    }

    pub fn speed_multiplier(&self, tuning: &PowerUpTuning) -> f32 {
        if self.has_power_up(PowerUpKind::SpeedBoost) {
            tuning.speed_boost_multiplier
        } else {
            1.0
        }
    }

    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    /// Apply damage, clamping at zero
    pub fn take_damage(&mut self, amount: f32) {
        debug_assert!(amount >= 0.0);
        self.health = (self.health - amount).max(0.0);
    }

    /// Record the motion trail: populated while moving fast, cleared below
    /// the threshold. Bounded to the last [`TRAIL_LENGTH`] positions.
    pub fn record_trail(&mut self) {
        if self.vel.length() > TRAIL_MIN_SPEED {
            self.trail.insert(0, self.pos);
            self.trail.truncate(TRAIL_LENGTH);
        } else {
            self.trail.clear();
        }
    }
}

/// Steering personality for smart enemies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmartBehavior {
    /// Presses the attack but backs off at point-blank range
    Aggressive,
    /// Keeps its distance, closing only when the player is far away
    Cowardly,
    /// Circles perpendicular to the player with a slight approach bias
    Flanker,
}

impl SmartBehavior {
    pub const ALL: [SmartBehavior; 3] = [
        SmartBehavior::Aggressive,
        SmartBehavior::Cowardly,
        SmartBehavior::Flanker,
    ];
}

/// Behavior-specific enemy data
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyKind {
    /// Plain seeker
    Grunt,
    /// Re-evaluates its steering every `decision_cooldown_ms`
    Smart {
        behavior: SmartBehavior,
        next_decision_ms: f64,
        decision_cooldown_ms: f64,
    },
    /// Stand-off attacker cycling three ranged patterns
    Boss { pattern: u8, next_attack_ms: f64 },
}

/// A hostile entity
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub health: f32,
    pub max_health: f32,
    /// Abstract speed units, scaled to px/s by `tuning.enemy_speed_scale`
    pub speed: f32,
    pub kind: EnemyKind,
}

impl Enemy {
    pub fn is_boss(&self) -> bool {
        matches!(self.kind, EnemyKind::Boss { .. })
    }
}

/// Who fired a projectile (decides which collisions it participates in)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileSource {
    Player,
    Boss,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub spawned_ms: f64,
    pub source: ProjectileSource,
}

impl Projectile {
    /// Lifetime expiry, independent of collisions
    pub fn expired(&self, now_ms: f64) -> bool {
        now_ms - self.spawned_ms > PROJECTILE_LIFE_MS
    }
}

/// World item granting a timed buff on contact
#[derive(Debug, Clone)]
pub struct PowerUp {
    pub id: u32,
    pub pos: Vec2,
    pub kind: PowerUpKind,
    pub expires_ms: f64,
}

/// Heal orb
#[derive(Debug, Clone)]
pub struct Pickup {
    pub id: u32,
    pub pos: Vec2,
    pub expires_ms: f64,
}

/// Wave progression counters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WaveState {
    pub current_wave: u32,
    pub enemies_defeated: u32,
    pub enemies_this_wave: u32,
    pub boss_active: bool,
}

impl Default for WaveState {
    fn default() -> Self {
        Self {
            current_wave: 1,
            enemies_defeated: 0,
            enemies_this_wave: 0,
            boss_active: false,
        }
    }
}

/// A spawn scheduled for a future clock deadline (staggered wave batches,
/// the delayed boss entrance)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingSpawn {
    Enemy,
    Boss,
}

/// Complete simulation state, owned by one controller and mutated only
/// inside [`super::tick::tick`]
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Monotonic play-time accumulator (ms); frozen while paused
    pub clock_ms: f64,
    pub phase: GamePhase,
    /// Freezes the simulation without leaving `Playing`
    pub paused: bool,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub pickups: Vec<Pickup>,
    pub power_ups: Vec<PowerUp>,
    pub wave: WaveState,
    pub combo: ComboState,
    pub score: u64,
    pub coins: u64,
    /// External double-coin promotion flag, fixed per session
    pub weekend_bonus: bool,
    /// Elapsed since the last trickle spawn
    pub spawn_timer_ms: f64,
    /// Elapsed since the last difficulty escalation
    pub difficulty_timer_ms: f64,
    /// Deferred spawns as (deadline, what) pairs, fired inside the tick
    pub pending_spawns: Vec<(f64, PendingSpawn)>,
    /// Live balance values; escalates during play, restored from
    /// `base_tuning` on reset
    pub tuning: Tuning,
    base_tuning: Tuning,
    upgrades: UpgradeLevels,
    pub rng: Pcg32,
    next_id: u32,
}

impl SimulationState {
    pub fn new(
        seed: u64,
        tuning: Tuning,
        upgrades: UpgradeLevels,
        weekend_bonus: bool,
    ) -> Self {
        Self {
            seed,
            clock_ms: 0.0,
            phase: GamePhase::Menu,
            paused: false,
            player: Player::new(&tuning, upgrades),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            power_ups: Vec::new(),
            wave: WaveState::default(),
            combo: ComboState::default(),
            score: 0,
            coins: 0,
            weekend_bonus,
            spawn_timer_ms: 0.0,
            difficulty_timer_ms: 0.0,
            pending_spawns: Vec::new(),
            tuning: tuning.clone(),
            base_tuning: tuning,
            upgrades,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing && !self.paused
    }

    /// `menu -> playing`: begin a session with a staggered opening batch.
    /// Ignored outside the menu.
    pub fn start(&mut self) {
        if self.phase != GamePhase::Menu {
            return;
        }
        self.phase = GamePhase::Playing;
        self.player.health = self.player.max_health;
        for i in 0..3 {
            self.pending_spawns
                .push((self.clock_ms + i as f64 * 500.0, PendingSpawn::Enemy));
        }
        log::info!("session started (seed {})", self.seed);
    }

    /// `gameover -> menu`: rebuild the whole session from the base tuning.
    /// Difficulty escalation and the clock never survive a reset.
    pub fn reset(&mut self) {
        *self = Self::new(
            self.seed,
            self.base_tuning.clone(),
            self.upgrades,
            self.weekend_bonus,
        );
    }

    /// Toggle the pause sub-flag; only meaningful while playing
    pub fn toggle_pause(&mut self) {
        if self.phase == GamePhase::Playing {
            self.paused = !self.paused;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(&Tuning::default(), UpgradeLevels::default())
    }

    #[test]
    fn test_power_up_expiry_round_trip() {
        let tuning = PowerUpTuning::default();
        let mut p = player();

        p.apply_power_up(PowerUpKind::RapidFire, 1000.0, &tuning);
        assert!(p.has_power_up(PowerUpKind::RapidFire));
        assert_eq!(p.fire_cooldown_ms(&tuning), tuning.rapid_fire_rate_ms);

        // Still active exactly at the deadline
        p.expire_power_ups(1000.0 + tuning.rapid_fire_ms);
        assert!(p.has_power_up(PowerUpKind::RapidFire));

        // Gone one instant past it
        p.expire_power_ups(1000.0 + tuning.rapid_fire_ms + 0.1);
        assert!(!p.has_power_up(PowerUpKind::RapidFire));
        assert_eq!(p.fire_cooldown_ms(&tuning), p.fire_rate_ms);
    }

    #[test]
    fn test_shield_clears_with_its_expiry() {
        let tuning = PowerUpTuning::default();
        let mut p = player();

        p.apply_power_up(PowerUpKind::Shield, 0.0, &tuning);
        assert!(p.shield_active);

        p.expire_power_ups(tuning.shield_ms - 1.0);
        assert!(p.shield_active);

        p.expire_power_ups(tuning.shield_ms + 1.0);
        assert!(!p.shield_active);
        assert!(!p.has_power_up(PowerUpKind::Shield));
    }

    #[test]
    fn test_reapplying_refreshes_expiry() {
        let tuning = PowerUpTuning::default();
        let mut p = player();

        p.apply_power_up(PowerUpKind::TripleShot, 0.0, &tuning);
        p.apply_power_up(PowerUpKind::TripleShot, 2000.0, &tuning);

        p.expire_power_ups(tuning.triple_shot_ms + 1000.0);
        assert!(p.has_power_up(PowerUpKind::TripleShot));
    }

    #[test]
    fn test_health_clamps_both_ways() {
        let mut p = player();
        p.take_damage(5000.0);
        assert_eq!(p.health, 0.0);
        p.heal(5000.0);
        assert_eq!(p.health, p.max_health);
    }

    #[test]
    fn test_trail_bounded_and_cleared_when_slow() {
        let mut p = player();
        p.vel = Vec2::new(100.0, 0.0);
        for i in 0..10 {
            p.pos = Vec2::new(i as f32, 0.0);
            p.record_trail();
        }
        assert_eq!(p.trail.len(), TRAIL_LENGTH);
        // Newest first
        assert_eq!(p.trail[0], Vec2::new(9.0, 0.0));

        p.vel = Vec2::ZERO;
        p.record_trail();
        assert!(p.trail.is_empty());
    }

    #[test]
    fn test_upgrades_applied_at_construction() {
        let upgrades = UpgradeLevels {
            speed: 2,
            health: 1,
            fire_rate: 3,
        };
        let p = Player::new(&Tuning::default(), upgrades);
        assert_eq!(p.accel, 360.0);
        assert_eq!(p.max_health, 125.0);
        assert_eq!(p.fire_rate_ms, 135.0);
    }

    #[test]
    fn test_session_state_machine() {
        let mut state =
            SimulationState::new(7, Tuning::default(), UpgradeLevels::default(), false);
        assert_eq!(state.phase, GamePhase::Menu);

        state.start();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.pending_spawns.len(), 3);

        // start() from playing is a no-op
        state.start();
        assert_eq!(state.pending_spawns.len(), 3);

        state.phase = GamePhase::GameOver;
        state.score = 500;
        state.reset();
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.score, 0);
        assert_eq!(state.wave.current_wave, 1);
        assert!(state.pending_spawns.is_empty());
    }

    #[test]
    fn test_reset_restores_base_difficulty() {
        let mut state =
            SimulationState::new(7, Tuning::default(), UpgradeLevels::default(), false);
        state.tuning.escalate_difficulty();
        state.tuning.escalate_difficulty();
        state.reset();
        assert_eq!(state.tuning.enemy_speed_range, (0.6, 1.6));
        assert_eq!(state.tuning.spawn_interval_ms, 1200.0);
    }
}
