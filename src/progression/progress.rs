//! Level progress and transitions
//!
//! Builds on [`Curve`] to answer "how much xp until the next level" and to
//! compute the new member state for add/subtract operations.

use serde::{Deserialize, Serialize};

use super::curve::{Curve, MAX_XP};
use crate::store::MemberRecord;

/// Breakdown of a level transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionDetails {
    /// XP actually gained (positive) or lost (negative)
    pub xp_delta: i64,
    /// Levels actually gained (positive) or lost (negative)
    pub level_delta: i64,
    /// XP at which the level after the new one starts
    pub next_level_xp: i64,
    /// XP at which the new level starts
    pub current_level_xp: i64,
}

/// Where an xp total sits between two levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextLevel {
    pub xp_needed: i64,
    pub current_level: u64,
    pub next_level: u64,
    pub current_level_xp: i64,
    pub next_level_xp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Add,
    Subtract,
}

/// What an add/subtract operation moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Xp(u64),
    Levels(u64),
}

/// Result of applying a [`Change`] to a member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub before: MemberRecord,
    pub after: MemberRecord,
    pub details: TransitionDetails,
}

impl Transition {
    pub fn leveled_up(&self) -> bool {
        self.after.level > self.before.level
    }

    pub fn leveled_down(&self) -> bool {
        self.after.level < self.before.level
    }
}

/// Progress math on top of a curve
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProgressCalculator {
    curve: Curve,
}

impl ProgressCalculator {
    pub fn new(curve: Curve) -> Self {
        Self { curve }
    }

    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    /// XP still needed to reach the next level
    pub fn xp_for_next(&self, current_xp: u64) -> i64 {
        self.next_level(current_xp).xp_needed
    }

    /// Current and next level with their thresholds
    pub fn next_level(&self, current_xp: u64) -> NextLevel {
        let current_xp = current_xp.min(MAX_XP);
        let current_level = self.curve.level_for_xp(current_xp);
        let next_level = current_level + 1;
        let next_level_xp = self.curve.xp_for_level(next_level);
        NextLevel {
            xp_needed: next_level_xp - current_xp as i64,
            current_level,
            next_level,
            current_level_xp: self.curve.xp_for_level(current_level),
            next_level_xp,
        }
    }

    /// Record holding `xp`, capped at [`MAX_XP`]
    pub fn record_for_xp(&self, xp: u64) -> MemberRecord {
        let xp = xp.min(MAX_XP);
        MemberRecord::new(xp, self.curve.level_for_xp(xp))
    }

    /// Record at the start of `level`, kept within the curve's floor and top
    /// levels
    pub fn record_for_level(&self, level: u64) -> MemberRecord {
        let level = level.max(self.curve.floor_level()).min(self.curve.max_level());
        MemberRecord::new(self.curve.xp_for_level(level).max(0) as u64, level)
    }

    /// Starting record for a new member
    pub fn initial_record(&self) -> MemberRecord {
        self.record_for_xp(0)
    }

    /// Apply `change` to `before`.
    ///
    /// XP changes recompute the level. Level changes move xp by the cost
    /// difference between the old and new level, so xp above the old
    /// threshold carries over (capped to the new level's range). Nothing
    /// drops below 0 xp or the curve's floor level, or rises above
    /// [`MAX_XP`] or the matching top level.
    pub fn compute_delta(&self, before: MemberRecord, change: Change, direction: Direction) -> Transition {
        let after = match (change, direction) {
            (Change::Xp(amount), Direction::Add) => self.record_for_xp(before.xp.saturating_add(amount)),
            (Change::Xp(amount), Direction::Subtract) => self.record_for_xp(before.xp.saturating_sub(amount)),
            (Change::Levels(amount), Direction::Add) => {
                let target = before.level.saturating_add(amount).min(self.curve.max_level());
                self.shift_level(before, target)
            }
            (Change::Levels(amount), Direction::Subtract) => {
                let target = before
                    .level
                    .saturating_sub(amount)
                    .max(self.curve.floor_level())
                    .min(before.level)
                    .min(self.curve.max_level());
                self.shift_level(before, target)
            }
        };

        Transition {
            before,
            after,
            details: TransitionDetails {
                xp_delta: difference(after.xp, before.xp),
                level_delta: difference(after.level, before.level),
                next_level_xp: self.curve.xp_for_level(after.level.saturating_add(1)),
                current_level_xp: self.curve.xp_for_level(after.level),
            },
        }
    }

    fn shift_level(&self, before: MemberRecord, level: u64) -> MemberRecord {
        let cost = self
            .curve
            .xp_for_level(level)
            .saturating_sub(self.curve.xp_for_level(before.level));
        let carried = (before.xp.min(MAX_XP) as i64).saturating_add(cost);

        let lowest = self.curve.xp_for_level(level).max(0);
        let highest = (self.curve.xp_for_level(level.saturating_add(1)) - 1)
            .min(MAX_XP as i64)
            .max(lowest);
        MemberRecord::new(carried.clamp(lowest, highest) as u64, level)
    }
}

/// `after - before`, saturating at the ends of `i64`
fn difference(after: u64, before: u64) -> i64 {
    (i128::from(after) - i128::from(before)).clamp(i64::MIN.into(), i64::MAX.into()) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::GrowthConfig;

    fn linear() -> ProgressCalculator {
        ProgressCalculator::new(Curve::new(GrowthConfig::linear(300.0)))
    }

    fn quadratic() -> ProgressCalculator {
        ProgressCalculator::default()
    }

    #[test]
    fn test_xp_for_next() {
        let calc = linear();
        for level in [0u64, 1, 2, 50, 91] {
            let offset = 120;
            let xp = level * 300 + offset;
            assert_eq!(calc.xp_for_next(xp), 300 - offset as i64);
            assert_eq!(
                calc.next_level(xp),
                NextLevel {
                    xp_needed: 300 - offset as i64,
                    current_level: level,
                    next_level: level + 1,
                    current_level_xp: level as i64 * 300,
                    next_level_xp: (level as i64 + 1) * 300,
                }
            );
        }
    }

    #[test]
    fn test_next_level_without_zero_level() {
        let calc = ProgressCalculator::new(Curve::new(GrowthConfig::linear(500.0).with_start_at_zero(false)));
        let next = calc.next_level(999);
        assert_eq!(next.xp_needed, 1);
        assert_eq!(next.current_level, 2);
        assert_eq!(next.current_level_xp, 500);
        assert_eq!(next.next_level_xp, 1000);
    }

    #[test]
    fn test_add_xp_levels_up() {
        let calc = quadratic();
        let t = calc.compute_delta(MemberRecord::default(), Change::Xp(1000), Direction::Add);
        assert_eq!(t.after, MemberRecord::new(1000, 5));
        assert!(t.leveled_up());
        assert_eq!(t.details.xp_delta, 1000);
        assert_eq!(t.details.level_delta, 5);
        assert_eq!(t.details.current_level_xp, 750);
        assert_eq!(t.details.next_level_xp, 1080);
    }

    #[test]
    fn test_subtract_xp_clamps_at_zero() {
        let calc = quadratic();
        let before = MemberRecord::new(200, 2);
        let t = calc.compute_delta(before, Change::Xp(5000), Direction::Subtract);
        assert_eq!(t.after, MemberRecord::new(0, 0));
        assert!(t.leveled_down());
        assert_eq!(t.details.xp_delta, -200);
        assert_eq!(t.details.level_delta, -2);
    }

    #[test]
    fn test_add_level_carries_extra_xp() {
        let calc = linear();
        // 50 xp above the level 2 threshold
        let before = MemberRecord::new(650, 2);
        let t = calc.compute_delta(before, Change::Levels(3), Direction::Add);
        assert_eq!(t.after, MemberRecord::new(1550, 5));
        assert_eq!(t.details.xp_delta, 900);
        assert_eq!(t.details.level_delta, 3);
    }

    #[test]
    fn test_subtract_level_carries_extra_xp() {
        let calc = linear();
        let before = MemberRecord::new(1550, 5);
        let t = calc.compute_delta(before, Change::Levels(2), Direction::Subtract);
        assert_eq!(t.after, MemberRecord::new(950, 3));
        assert!(t.leveled_down());
    }

    #[test]
    fn test_subtract_level_caps_carry_to_new_band() {
        let calc = quadratic();
        // level 10 starts at 3000, level 11 at 3630
        let before = MemberRecord::new(3600, 10);
        let t = calc.compute_delta(before, Change::Levels(9), Direction::Subtract);
        assert_eq!(t.after.level, 1);
        assert_eq!(t.after.xp, 119);
        assert_eq!(calc.curve().level_for_xp(t.after.xp), t.after.level);
    }

    #[test]
    fn test_subtract_level_at_floor_is_noop() {
        let calc = quadratic();
        let t = calc.compute_delta(MemberRecord::default(), Change::Levels(5), Direction::Subtract);
        assert_eq!(t.after, MemberRecord::default());
        assert!(!t.leveled_down());
        assert_eq!(t.details.level_delta, 0);
        assert_eq!(t.details.xp_delta, 0);
    }

    #[test]
    fn test_add_then_subtract_restores() {
        let calc = quadratic();
        let start = calc.record_for_xp(4321);
        let up = calc.compute_delta(start, Change::Xp(777), Direction::Add);
        let down = calc.compute_delta(up.after, Change::Xp(777), Direction::Subtract);
        assert_eq!(down.after, start);
    }

    #[test]
    fn test_huge_amounts_stay_in_range() {
        let calc = linear();
        let top = calc.curve().max_level();

        let t = calc.compute_delta(MemberRecord::default(), Change::Xp(u64::MAX), Direction::Add);
        assert_eq!(t.after, MemberRecord::new(MAX_XP, top));
        assert_eq!(t.details.xp_delta, MAX_XP as i64);
        assert_eq!(t.details.level_delta, top as i64);
        assert!(t.details.next_level_xp > MAX_XP as i64);

        let t = calc.compute_delta(MemberRecord::default(), Change::Levels(u64::MAX), Direction::Add);
        assert_eq!(t.after.level, top);
        assert_eq!(calc.curve().level_for_xp(t.after.xp), top);

        // A record stored before the cap existed
        let stale = MemberRecord::new(u64::MAX, u64::MAX);
        let t = calc.compute_delta(stale, Change::Xp(1), Direction::Subtract);
        assert_eq!(t.after, MemberRecord::new(MAX_XP, top));
        assert!(t.details.xp_delta < 0);
        assert!(t.details.level_delta < 0);
    }

    #[test]
    fn test_next_level_caps_xp() {
        let calc = quadratic();
        let top = calc.curve().max_level();
        let next = calc.next_level(u64::MAX);
        assert_eq!(next.current_level, top);
        assert!(next.xp_needed > 0);
    }

    #[test]
    fn test_record_for_level_respects_floor() {
        let calc = ProgressCalculator::new(Curve::new(GrowthConfig::linear(500.0).with_start_at_zero(false)));
        assert_eq!(calc.record_for_level(0), MemberRecord::new(0, 1));
        assert_eq!(calc.record_for_level(3), MemberRecord::new(1000, 3));
        assert_eq!(calc.initial_record(), MemberRecord::new(0, 1));

        let top = calc.curve().max_level();
        assert_eq!(calc.record_for_level(u64::MAX).level, top);
    }
}
