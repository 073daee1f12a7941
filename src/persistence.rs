//! Player profile persistence
//!
//! The profile (coins, bests, purchased upgrades) outlives a session and is
//! stored as JSON under a single key. The [`Storage`] trait keeps the
//! backing store pluggable; a missing or corrupt value falls back to a
//! fresh profile rather than failing the session.

use serde::{Deserialize, Serialize};

use crate::tuning::UpgradeLevels;

/// Key-value backing store for the profile
pub trait Storage {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&mut self, key: &str, value: &str);
}

/// In-memory store, used headless and in tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: std::collections::HashMap<String, String>,
}

impl Storage for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// Upgrade shop price table, indexed by the level being purchased
const UPGRADE_COSTS: [u64; 3] = [50, 120, 250];

/// Maximum purchasable level per upgrade track
pub const MAX_UPGRADE_LEVEL: u8 = 3;

/// Persistent cross-session player data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Profile {
    #[serde(default)]
    pub coins: u64,
    #[serde(default)]
    pub high_score: u64,
    #[serde(default)]
    pub best_wave: u32,
    #[serde(default)]
    pub max_combo: u32,
    #[serde(default)]
    pub upgrades: UpgradeLevels,
}

impl Profile {
    pub const STORAGE_KEY: &'static str = "microbot_mayhem_profile";

    /// Load the profile, falling back to defaults when the stored value is
    /// missing or fails to parse
    pub fn load(store: &impl Storage) -> Self {
        match store.load(Self::STORAGE_KEY) {
            Some(json) => match serde_json::from_str(&json) {
                Ok(profile) => profile,
                Err(err) => {
                    log::warn!("profile corrupt, starting fresh: {err}");
                    Self::default()
                }
            },
            None => {
                log::info!("no saved profile, starting fresh");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut impl Storage) {
        match serde_json::to_string(self) {
            Ok(json) => store.save(Self::STORAGE_KEY, &json),
            Err(err) => log::error!("failed to serialize profile: {err}"),
        }
    }

    /// Fold a finished run into the profile: bank the coins and raise any
    /// bests the run beat. Returns true when the run set a new high score.
    pub fn record_run(&mut self, score: u64, wave: u32, peak_combo: u32, coins: u64) -> bool {
        self.coins += coins;
        let new_best = score > self.high_score;
        self.high_score = self.high_score.max(score);
        self.best_wave = self.best_wave.max(wave);
        self.max_combo = self.max_combo.max(peak_combo);
        new_best
    }

    /// Price of the next level for a track at `current_level`, or `None`
    /// once the track is maxed
    pub fn upgrade_cost(current_level: u8) -> Option<u64> {
        UPGRADE_COSTS.get(current_level as usize).copied()
    }

    /// Buy one level of an upgrade track. Returns false when the track is
    /// maxed or the coins fall short; on success the cost is deducted and
    /// the level bumped.
    pub fn purchase_upgrade(&mut self, track: UpgradeTrack) -> bool {
        let level = match track {
            UpgradeTrack::Speed => &mut self.upgrades.speed,
            UpgradeTrack::Health => &mut self.upgrades.health,
            UpgradeTrack::FireRate => &mut self.upgrades.fire_rate,
        };
        let Some(cost) = Self::upgrade_cost(*level) else {
            return false;
        };
        if self.coins < cost {
            return false;
        }
        self.coins -= cost;
        *level += 1;
        true
    }
}

/// The three purchasable upgrade tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeTrack {
    Speed,
    Health,
    FireRate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_gives_defaults() {
        let store = MemoryStore::default();
        let profile = Profile::load(&store);
        assert_eq!(profile, Profile::default());
    }

    #[test]
    fn test_load_corrupt_gives_defaults() {
        let mut store = MemoryStore::default();
        store.save(Profile::STORAGE_KEY, "{not json");
        let profile = Profile::load(&store);
        assert_eq!(profile, Profile::default());
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut store = MemoryStore::default();
        let mut profile = Profile::default();
        profile.record_run(1200, 5, 8, 34);
        profile.save(&mut store);

        let loaded = Profile::load(&store);
        assert_eq!(loaded, profile);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let mut store = MemoryStore::default();
        store.save(Profile::STORAGE_KEY, r#"{"coins": 75, "high_score": 900}"#);
        let profile = Profile::load(&store);
        assert_eq!(profile.coins, 75);
        assert_eq!(profile.high_score, 900);
        assert_eq!(profile.best_wave, 0);
        assert_eq!(profile.upgrades, UpgradeLevels::default());
    }

    #[test]
    fn test_record_run_keeps_bests() {
        let mut profile = Profile::default();
        assert!(profile.record_run(1000, 6, 12, 40));
        assert!(!profile.record_run(400, 9, 3, 10));

        assert_eq!(profile.coins, 50);
        assert_eq!(profile.high_score, 1000);
        assert_eq!(profile.best_wave, 9);
        assert_eq!(profile.max_combo, 12);
    }

    #[test]
    fn test_purchase_walks_price_table() {
        let mut profile = Profile {
            coins: 420,
            ..Default::default()
        };

        assert!(profile.purchase_upgrade(UpgradeTrack::Speed));
        assert_eq!(profile.coins, 370);
        assert!(profile.purchase_upgrade(UpgradeTrack::Speed));
        assert_eq!(profile.coins, 250);
        assert!(profile.purchase_upgrade(UpgradeTrack::Speed));
        assert_eq!(profile.coins, 0);
        assert_eq!(profile.upgrades.speed, 3);

        // Maxed out
        profile.coins = 1000;
        assert!(!profile.purchase_upgrade(UpgradeTrack::Speed));
        assert_eq!(profile.coins, 1000);
    }

    #[test]
    fn test_purchase_rejected_when_broke() {
        let mut profile = Profile {
            coins: 49,
            ..Default::default()
        };
        assert!(!profile.purchase_upgrade(UpgradeTrack::Health));
        assert_eq!(profile.coins, 49);
        assert_eq!(profile.upgrades.health, 0);
    }
}
