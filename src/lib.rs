//! Microbot Mayhem - a top-down wave-survival arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, waves, scoring)
//! - `tuning`: Data-driven game balance
//! - `persistence`: Profile save/load through a pluggable storage backend
//!
//! Rendering, input capture and audio are external collaborators: a driver
//! polls its own input sources, calls [`sim::tick`] once per frame and
//! consumes the returned [`sim::GameEvent`] list.

pub mod persistence;
pub mod sim;
pub mod tuning;

pub use persistence::{MemoryStore, Profile, Storage};
pub use tuning::{Tuning, UpgradeLevels};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Arena dimensions (pixels)
    pub const ARENA_WIDTH: f32 = 900.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Enemies spawn this far outside the arena edge
    pub const EDGE_SPAWN_MARGIN: f32 = 20.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 14.0;
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;
    /// Velocity damping applied once per tick (friction)
    pub const PLAYER_DAMPING: f32 = 0.92;
    /// Minimum speed before the motion trail is recorded
    pub const TRAIL_MIN_SPEED: f32 = 50.0;
    /// Maximum trail positions kept (rendering hint only)
    pub const TRAIL_LENGTH: usize = 5;

    /// Projectile defaults
    pub const PROJECTILE_RADIUS: f32 = 4.0;
    pub const BOSS_PROJECTILE_RADIUS: f32 = 6.0;
    pub const PROJECTILE_LIFE_MS: f64 = 1200.0;
    /// Projectiles leave the muzzle this far ahead of the player edge
    pub const MUZZLE_OFFSET: f32 = 6.0;

    /// World item defaults
    pub const PICKUP_RADIUS: f32 = 10.0;
    pub const PICKUP_LIFE_MS: f64 = 12_000.0;
    pub const POWER_UP_RADIUS: f32 = 8.0;
    pub const POWER_UP_LIFE_MS: f64 = 8000.0;

    /// Knockback impulse applied to the player on enemy contact (px/s)
    pub const CONTACT_KNOCKBACK: f32 = 220.0;
    /// Radius slack allowed before enemy contact counts (px)
    pub const CONTACT_TOLERANCE: f32 = 6.0;

    /// Combo decay window (ms since last kill)
    pub const COMBO_WINDOW_MS: f64 = 3000.0;
}

/// Direction from `from` to `to`, or zero when the points coincide
#[inline]
pub fn direction(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Angle (radians) of the vector from `from` to `to`
#[inline]
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Unit vector for an angle in radians
#[inline]
pub fn unit_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}
