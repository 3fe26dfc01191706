//! Level curve shared by the overall level and every attribute track.
//!
//! Advancing from level `L` to `L + 1` costs `100 * L` XP, so being at level
//! `L` requires `50 * L * (L - 1)` cumulative XP. Levels start at 1 and are a
//! pure, non-decreasing function of cumulative XP.

use serde::{Deserialize, Serialize};

/// XP cost multiplier: the step from level `L` costs `XP_STEP * L`.
pub const XP_STEP: u64 = 100;

/// Cumulative XP required to be at `level` (level 1 requires 0).
pub fn xp_to_reach(level: u32) -> u64 {
    u64::try_from(xp_to_reach_wide(level)).unwrap_or(u64::MAX)
}

fn xp_to_reach_wide(level: u32) -> u128 {
    let level = u128::from(level.max(1));
    u128::from(XP_STEP) * level * (level - 1) / 2
}

/// The level reached with `xp` cumulative experience.
pub fn level_for_xp(xp: u64) -> u32 {
    let xp = u128::from(xp);
    let (mut lo, mut hi) = (1u32, u32::MAX);
    // Invariant: xp_to_reach(lo) <= xp; answer lies in [lo, hi].
    while lo < hi {
        let mid = lo + (hi - lo).div_ceil(2);
        if xp_to_reach_wide(mid) <= xp {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    lo
}

/// Where a given XP total sits on the curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelProgress {
    pub level: u32,
    pub xp: u64,
    /// XP earned since the current level was reached.
    pub xp_into_level: u64,
    /// XP still missing for the next level.
    pub xp_to_next_level: u64,
    /// 0.0 ..= 100.0
    pub progress_percentage: f64,
}

impl LevelProgress {
    pub fn for_xp(xp: u64) -> Self {
        let level = level_for_xp(xp);
        let floor = xp_to_reach(level);
        let step = XP_STEP.saturating_mul(u64::from(level));
        let xp_into_level = xp.saturating_sub(floor);
        let xp_to_next_level = step.saturating_sub(xp_into_level);
        let progress_percentage = if step == 0 {
            100.0
        } else {
            (xp_into_level as f64 / step as f64 * 10_000.0).round() / 100.0
        };

        Self {
            level,
            xp,
            xp_into_level,
            xp_to_next_level,
            progress_percentage,
        }
    }
}

/// Before/after levels for one XP grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelChange {
    pub old_level: u32,
    pub new_level: u32,
}

impl LevelChange {
    pub fn between(old_xp: u64, new_xp: u64) -> Self {
        Self {
            old_level: level_for_xp(old_xp),
            new_level: level_for_xp(new_xp),
        }
    }

    pub fn is_level_up(&self) -> bool {
        self.new_level > self.old_level
    }

    pub fn levels_gained(&self) -> u32 {
        self.new_level.saturating_sub(self.old_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_boundaries() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(99), 1);
        assert_eq!(level_for_xp(100), 2);
        assert_eq!(level_for_xp(299), 2);
        assert_eq!(level_for_xp(300), 3);
        assert_eq!(level_for_xp(599), 3);
        assert_eq!(level_for_xp(600), 4);
    }

    #[test]
    fn reach_and_level_agree() {
        for level in 1..500 {
            assert_eq!(level_for_xp(xp_to_reach(level)), level);
            assert_eq!(level_for_xp(xp_to_reach(level + 1) - 1), level);
        }
    }

    #[test]
    fn level_is_monotonic_in_xp() {
        let mut previous = level_for_xp(0);
        for xp in (0..200_000u64).step_by(7) {
            let level = level_for_xp(xp);
            assert!(level >= previous, "level dropped at xp={xp}");
            previous = level;
        }
    }

    #[test]
    fn extreme_xp_does_not_overflow() {
        let level = level_for_xp(u64::MAX);
        assert!(level > 1);
        assert!(xp_to_reach(level) <= u64::MAX);
        assert!(level_for_xp(u64::MAX - 1) <= level);
    }

    #[test]
    fn progress_within_level() {
        let progress = LevelProgress::for_xp(150);
        assert_eq!(progress.level, 2);
        assert_eq!(progress.xp_into_level, 50);
        assert_eq!(progress.xp_to_next_level, 150);
        assert_eq!(progress.progress_percentage, 25.0);
    }

    #[test]
    fn level_change_detects_multi_level_jumps() {
        let change = LevelChange::between(0, 650);
        assert!(change.is_level_up());
        assert_eq!(change.old_level, 1);
        assert_eq!(change.new_level, 4);
        assert_eq!(change.levels_gained(), 3);
        assert!(!LevelChange::between(10, 20).is_level_up());
    }
}
