//! Per-tick side-effect events
//!
//! The simulation never touches audio, DOM or storage directly; it returns
//! one [`GameEvent`] list per tick and presentation/persistence collaborators
//! consume whatever subset they care about.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::PowerUpKind;

/// What dealt damage to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageSource {
    EnemyContact,
    BossProjectile,
}

/// Discrete event emitted by one simulation tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player fired (one event per trigger pull, even for a triple shot)
    ShotFired { pos: Vec2 },
    /// Projectile damaged an enemy that survived
    Hit { enemy_id: u32, damage: f32 },
    /// Enemy died; score and coins are already multiplier-adjusted
    Kill {
        enemy_id: u32,
        pos: Vec2,
        score: u64,
        coins: u64,
        combo: u32,
    },
    /// Shield reflected an enemy on contact
    Blocked { enemy_id: u32 },
    /// Shield absorbed a boss projectile
    Deflected { pos: Vec2 },
    DamageTaken { amount: f32, source: DamageSource },
    PickupCollected { pos: Vec2, heal: f32 },
    PowerUpCollected { pos: Vec2, kind: PowerUpKind },
    /// Combo streak lapsed; `peak` is the best streak of the run so far
    ComboEnded { length: u32, peak: u32 },
    WaveComplete { wave: u32 },
    BossSpawned { wave: u32 },
    GameOver { score: u64, wave: u32, time_ms: f64 },
}
