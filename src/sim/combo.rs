//! Consecutive-kill combo tracking and score/coin multipliers
//!
//! A kill extends the streak and pushes the decay deadline out by the combo
//! window; the deadline is a plain timestamp checked each tick, never a
//! real timer.

use serde::{Deserialize, Serialize};

use crate::consts::COMBO_WINDOW_MS;

/// Multiplier table indexed by `combo / 5`, clamped to the last entry
pub const COMBO_MULTIPLIERS: [f32; 6] = [1.0, 1.2, 1.5, 2.0, 2.5, 3.0];

/// Kill-streak accumulator
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ComboState {
    /// Current streak length
    pub count: u32,
    /// Best streak reached this session
    pub peak: u32,
    /// Clock deadline after which the streak resets
    decay_deadline_ms: f64,
}

impl Default for ComboState {
    fn default() -> Self {
        Self {
            count: 0,
            peak: 0,
            decay_deadline_ms: f64::INFINITY,
        }
    }
}

impl ComboState {
    /// Current score multiplier, a pure function of the streak length
    pub fn multiplier(&self) -> f32 {
        let index = (self.count as usize / 5).min(COMBO_MULTIPLIERS.len() - 1);
        COMBO_MULTIPLIERS[index]
    }

    /// Register a kill at `now_ms`: extend the streak, refresh the deadline
    pub fn register_kill(&mut self, now_ms: f64) {
        self.count += 1;
        self.peak = self.peak.max(self.count);
        self.decay_deadline_ms = now_ms + COMBO_WINDOW_MS;
    }

    /// Reset the streak if the decay window has lapsed.
    /// Returns the length of the streak that ended, if one did.
    pub fn check_decay(&mut self, now_ms: f64) -> Option<u32> {
        if self.count > 0 && now_ms >= self.decay_deadline_ms {
            let ended = self.count;
            self.count = 0;
            self.decay_deadline_ms = f64::INFINITY;
            Some(ended)
        } else {
            None
        }
    }

    /// Score awarded for a base amount under the current multiplier
    pub fn score_for(&self, base: u64) -> u64 {
        (base as f32 * self.multiplier()).floor() as u64
    }

    /// Coin yield for a base amount.
    ///
    /// The weekend double-coin promotion is an external, wall-clock rule;
    /// the driver passes it in as a plain flag so the sim stays clock-free.
    pub fn coins_for(&self, base: u64, weekend_bonus: bool) -> u64 {
        let coin_multiplier = if weekend_bonus { 2 } else { 1 };
        (base / 10) * coin_multiplier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplier_table_lookup() {
        let mut combo = ComboState::default();
        assert_eq!(combo.multiplier(), 1.0);

        for _ in 0..5 {
            combo.register_kill(0.0);
        }
        assert_eq!(combo.multiplier(), 1.2);

        for _ in 0..4 {
            combo.register_kill(0.0);
        }
        // combo = 9, still in the 5..9 bracket
        assert_eq!(combo.multiplier(), 1.2);

        combo.register_kill(0.0);
        assert_eq!(combo.multiplier(), 1.5);
    }

    #[test]
    fn test_multiplier_clamps_at_table_end() {
        let mut combo = ComboState::default();
        for _ in 0..40 {
            combo.register_kill(0.0);
        }
        assert_eq!(combo.multiplier(), 3.0);
    }

    #[test]
    fn test_kills_within_window_form_one_streak() {
        let mut combo = ComboState::default();
        // Five kills, each 2500 ms apart - always inside the 3000 ms window
        for i in 0..5 {
            let now = i as f64 * 2500.0;
            assert_eq!(combo.check_decay(now), None);
            combo.register_kill(now);
        }
        assert_eq!(combo.count, 5);
        assert_eq!(combo.multiplier(), 1.2);
    }

    #[test]
    fn test_decay_resets_streak_and_records_peak() {
        let mut combo = ComboState::default();
        combo.register_kill(0.0);
        combo.register_kill(1000.0);

        assert_eq!(combo.check_decay(3999.0), None);
        assert_eq!(combo.check_decay(4000.0), Some(2));
        assert_eq!(combo.count, 0);
        assert_eq!(combo.multiplier(), 1.0);
        assert_eq!(combo.peak, 2);

        // A decayed streak stays decayed
        assert_eq!(combo.check_decay(9999.0), None);
    }

    #[test]
    fn test_score_floors_multiplied_amount() {
        let mut combo = ComboState::default();
        for _ in 0..5 {
            combo.register_kill(0.0);
        }
        // 15 * 1.2 = 18.0; 13 * 1.2 = 15.6 -> 15
        assert_eq!(combo.score_for(15), 18);
        assert_eq!(combo.score_for(13), 15);
    }

    #[test]
    fn test_weekend_doubles_coins() {
        let combo = ComboState::default();
        assert_eq!(combo.coins_for(25, false), 2);
        assert_eq!(combo.coins_for(25, true), 4);
        assert_eq!(combo.coins_for(6, false), 0);
    }
}
