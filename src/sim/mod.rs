//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Driven only by the per-frame delta handed to [`tick`]
//! - Seeded RNG only
//! - Every timeout is an absolute clock deadline checked inside the tick
//! - No rendering, audio or platform dependencies

pub mod behavior;
pub mod collision;
pub mod combo;
pub mod events;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{circles_overlap, circles_overlap_with_tolerance};
pub use combo::{COMBO_MULTIPLIERS, ComboState};
pub use events::{DamageSource, GameEvent};
pub use state::{
    Enemy, EnemyKind, GamePhase, Pickup, Player, PowerUp, PowerUpKind, Projectile,
    ProjectileSource, SimulationState, SmartBehavior, WaveState,
};
pub use tick::{TickInput, tick};
