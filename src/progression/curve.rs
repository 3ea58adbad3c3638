//! Experience curves
//!
//! Converts between levels and xp for the linear, quadratic and cubic growth
//! modes.

use serde::{Deserialize, Serialize};

/// Default quadratic multiplier (`xp = 30 * level²`)
pub const DEFAULT_MULTIPLIER: f64 = 30.0;

/// Default linear gap (`xp = 300 * level`)
pub const DEFAULT_GAP: f64 = 300.0;

/// Smallest usable linear gap or quadratic multiplier. Below it rounded
/// thresholds of neighbouring levels can coincide.
pub const MIN_PARAMETER: f64 = 1.0;

/// Largest xp total a member can hold. Levels and thresholds around it stay
/// exact in f64.
pub const MAX_XP: u64 = 1 << 52;

/// Upper bound for the inverse search. With a parameter of at least
/// [`MIN_PARAMETER`] every mode's threshold here is above [`MAX_XP`].
const SEARCH_LIMIT: u64 = MAX_XP + 2;

/// Growth mode relating level to xp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrowthMode {
    Linear,
    #[default]
    Quadratic,
    Cubic,
}

impl GrowthMode {
    pub fn name(&self) -> &'static str {
        match self {
            GrowthMode::Linear => "linear",
            GrowthMode::Quadratic => "quadratic",
            GrowthMode::Cubic => "cubic",
        }
    }

    /// Default gap or multiplier for this mode
    pub fn default_parameter(&self) -> f64 {
        match self {
            GrowthMode::Linear => DEFAULT_GAP,
            GrowthMode::Quadratic => DEFAULT_MULTIPLIER,
            GrowthMode::Cubic => 0.0,
        }
    }
}

/// Curve configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthConfig {
    pub mode: GrowthMode,
    /// Gap per level (linear) or multiplier (quadratic). Unused by cubic.
    pub gap_or_multiplier: f64,
    /// When false the first level is 1 instead of 0
    pub start_at_zero: bool,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self::quadratic(DEFAULT_MULTIPLIER)
    }
}

impl GrowthConfig {
    pub fn linear(gap: f64) -> Self {
        Self { mode: GrowthMode::Linear, gap_or_multiplier: gap, start_at_zero: true }
    }

    pub fn quadratic(multiplier: f64) -> Self {
        Self { mode: GrowthMode::Quadratic, gap_or_multiplier: multiplier, start_at_zero: true }
    }

    pub fn cubic() -> Self {
        Self { mode: GrowthMode::Cubic, gap_or_multiplier: 0.0, start_at_zero: true }
    }

    pub fn with_start_at_zero(mut self, start_at_zero: bool) -> Self {
        self.start_at_zero = start_at_zero;
        self
    }

    /// Why the parameter cannot drive this mode, if it cannot.
    ///
    /// Non-finite values and linear gaps or quadratic multipliers whose
    /// magnitude is below [`MIN_PARAMETER`] are unusable. A quadratic
    /// multiplier of exactly zero is fine: it selects the cubic curve.
    pub fn parameter_issue(&self) -> Option<String> {
        let p = self.gap_or_multiplier;
        if !p.is_finite() {
            return Some(format!("{} is not a finite number", p));
        }
        match self.mode {
            GrowthMode::Cubic => None,
            GrowthMode::Quadratic if p == 0.0 => None,
            GrowthMode::Linear | GrowthMode::Quadratic if p.abs() < MIN_PARAMETER => Some(format!(
                "{} parameter {} is below {}",
                self.mode.name(),
                p,
                MIN_PARAMETER
            )),
            _ => None,
        }
    }

    /// Bring the parameter into the shape the curve expects.
    ///
    /// Negative parameters become positive, a quadratic multiplier of zero
    /// selects the cubic curve, and an unusable parameter falls back to the
    /// mode's default.
    pub fn normalized(self) -> Self {
        let mut config = self;
        if let Some(issue) = config.parameter_issue() {
            let fallback = config.mode.default_parameter();
            log::warn!("Unusable growth parameter ({}), using default ({})", issue, fallback);
            config.gap_or_multiplier = fallback;
        }
        config.gap_or_multiplier = config.gap_or_multiplier.abs();

        match config.mode {
            GrowthMode::Quadratic if config.gap_or_multiplier == 0.0 => {
                config.mode = GrowthMode::Cubic;
            }
            GrowthMode::Cubic => config.gap_or_multiplier = 0.0,
            _ => {}
        }
        config
    }
}

/// Level/xp conversion for one growth configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Curve {
    config: GrowthConfig,
}

impl Default for Curve {
    fn default() -> Self {
        Self::new(GrowthConfig::default())
    }
}

impl Curve {
    pub fn new(config: GrowthConfig) -> Self {
        Self { config: config.normalized() }
    }

    pub fn config(&self) -> &GrowthConfig {
        &self.config
    }

    /// XP at which `level` starts.
    ///
    /// Can be negative for level 0 when the curve does not start at zero.
    pub fn xp_for_level(&self, level: u64) -> i64 {
        let l = level as f64;
        let p = self.config.gap_or_multiplier;
        let value = match self.config.mode {
            GrowthMode::Cubic => {
                let cube = l.powi(3);
                if self.config.start_at_zero { cube } else { cube - l }
            }
            GrowthMode::Quadratic => {
                let square = p * l * l;
                if self.config.start_at_zero { square } else { square - p }
            }
            GrowthMode::Linear => {
                let line = l * p;
                if self.config.start_at_zero { line } else { line - p }
            }
        };
        value.round() as i64
    }

    /// Level reached with `xp` experience.
    ///
    /// XP exactly on a threshold belongs to the higher level. XP above
    /// [`MAX_XP`] counts as [`MAX_XP`].
    pub fn level_for_xp(&self, xp: u64) -> u64 {
        let budget = xp.min(MAX_XP) as i64;
        let reached = |level: u64| self.xp_for_level(level) <= budget;

        // The closed form usually lands within one level; bisect when it misses
        let estimate = self.estimate_level(budget as u64);
        if estimate.is_finite() && estimate >= 0.0 {
            let guess = (estimate.floor() as u64).min(SEARCH_LIMIT - 1);
            for level in [guess, guess.saturating_sub(1), guess + 1] {
                if reached(level) && !reached(level + 1) {
                    return level;
                }
            }
        }

        // Thresholds never decrease and saturate at i64::MAX, far above the
        // budget. Level 0 is always reached, SEARCH_LIMIT never is.
        let (mut low, mut high) = (0, SEARCH_LIMIT);
        while high - low > 1 {
            let mid = low + (high - low) / 2;
            if reached(mid) {
                low = mid;
            } else {
                high = mid;
            }
        }
        low
    }

    /// Lowest level a member can hold (the level of 0 xp)
    pub fn floor_level(&self) -> u64 {
        self.level_for_xp(0)
    }

    /// Highest level a member can hold (the level of [`MAX_XP`])
    pub fn max_level(&self) -> u64 {
        self.level_for_xp(MAX_XP)
    }

    /// Closed-form inverse used as the search starting point
    fn estimate_level(&self, xp: u64) -> f64 {
        let xp = xp as f64;
        let p = self.config.gap_or_multiplier;
        let start = self.config.start_at_zero;
        match self.config.mode {
            // Only a starting point for the search: without a zero level the
            // exact inverse of `l³ - l` sits slightly above the cube root.
            GrowthMode::Cubic => xp.cbrt(),
            GrowthMode::Quadratic => {
                let adjusted = if start { xp } else { xp + p };
                (adjusted / p).sqrt()
            }
            GrowthMode::Linear => {
                if start { xp / p } else { xp / p + 1.0 }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE_LEVELS: [u64; 9] = [0, 1, 2, 50, 51, 52, 90, 91, 92];

    #[test]
    fn test_linear_levels() {
        let curve = Curve::new(GrowthConfig::linear(300.0));
        assert_eq!(curve.xp_for_level(50), 15000);
        assert_eq!(curve.level_for_xp(15299), 50);
        assert_eq!(curve.level_for_xp(15300), 51);
        for level in SAMPLE_LEVELS {
            assert_eq!(curve.xp_for_level(level), level as i64 * 300);
            assert_eq!(curve.level_for_xp(level * 300 + 150), level);
        }
    }

    #[test]
    fn test_linear_starting_at_one() {
        let curve = Curve::new(GrowthConfig::linear(500.0).with_start_at_zero(false));
        assert_eq!(curve.xp_for_level(0), -500);
        assert_eq!(curve.xp_for_level(1), 0);
        assert_eq!(curve.xp_for_level(2), 500);
        assert_eq!(curve.xp_for_level(51), 25000);
        assert_eq!(curve.xp_for_level(92), 45500);

        assert_eq!(curve.level_for_xp(0), 1);
        assert_eq!(curve.level_for_xp(499), 1);
        assert_eq!(curve.level_for_xp(999), 2);
        assert_eq!(curve.level_for_xp(1350), 3);
        assert_eq!(curve.level_for_xp(25275), 51);
        assert_eq!(curve.level_for_xp(46499), 93);
        assert_eq!(curve.floor_level(), 1);
    }

    #[test]
    fn test_quadratic_levels() {
        let curve = Curve::default();
        assert_eq!(curve.xp_for_level(0), 0);
        assert_eq!(curve.xp_for_level(5), 750);
        assert_eq!(curve.xp_for_level(6), 1080);
        assert_eq!(curve.level_for_xp(1000), 5);
        assert_eq!(curve.level_for_xp(1079), 5);
        assert_eq!(curve.level_for_xp(1080), 6);
    }

    #[test]
    fn test_quadratic_starting_at_one() {
        let curve = Curve::new(GrowthConfig::quadratic(30.0).with_start_at_zero(false));
        assert_eq!(curve.xp_for_level(1), 0);
        assert_eq!(curve.xp_for_level(2), 90);
        assert_eq!(curve.level_for_xp(0), 1);
        assert_eq!(curve.level_for_xp(89), 1);
        assert_eq!(curve.level_for_xp(90), 2);
    }

    #[test]
    fn test_cubic_perfect_cubes() {
        let curve = Curve::new(GrowthConfig::cubic());
        assert_eq!(curve.xp_for_level(4), 64);
        // A float cube root can land just under an exact cube
        assert_eq!(curve.level_for_xp(64), 4);
        assert_eq!(curve.level_for_xp(63), 3);
        assert_eq!(curve.level_for_xp(1_000_000), 100);
    }

    #[test]
    fn test_cubic_without_zero_level() {
        let curve = Curve::new(GrowthConfig::cubic().with_start_at_zero(false));
        assert_eq!(curve.xp_for_level(2), 6);
        assert_eq!(curve.xp_for_level(3), 24);
        assert_eq!(curve.level_for_xp(23), 2);
        assert_eq!(curve.level_for_xp(24), 3);
        assert_eq!(curve.level_for_xp(0), 1);
        assert_eq!(curve.floor_level(), 1);
    }

    #[test]
    fn test_normalization() {
        let negative = Curve::new(GrowthConfig::quadratic(-20.0));
        assert_eq!(negative.config().gap_or_multiplier, 20.0);

        let zero_multiplier = Curve::new(GrowthConfig::quadratic(0.0));
        assert_eq!(zero_multiplier.config().mode, GrowthMode::Cubic);
        assert_eq!(zero_multiplier.xp_for_level(3), 27);

        let zero_gap = Curve::new(GrowthConfig::linear(0.0));
        assert_eq!(zero_gap.config().gap_or_multiplier, DEFAULT_GAP);

        let tiny_gap = Curve::new(GrowthConfig::linear(1e-12));
        assert_eq!(tiny_gap.config().gap_or_multiplier, DEFAULT_GAP);
        assert_eq!(tiny_gap.level_for_xp(0), 0);

        let tiny_multiplier = Curve::new(GrowthConfig::quadratic(0.3));
        assert_eq!(tiny_multiplier.config().gap_or_multiplier, DEFAULT_MULTIPLIER);

        assert!(GrowthConfig::linear(1.0).parameter_issue().is_none());
        assert!(GrowthConfig::linear(-0.5).parameter_issue().is_some());
        assert!(GrowthConfig::quadratic(f64::NAN).parameter_issue().is_some());
    }

    #[test]
    fn test_huge_xp_is_bounded() {
        let configs = [
            GrowthConfig::linear(1.0),
            GrowthConfig::linear(1.0).with_start_at_zero(false),
            GrowthConfig::quadratic(DEFAULT_MULTIPLIER),
            GrowthConfig::cubic().with_start_at_zero(false),
            GrowthConfig::linear(1e300),
        ];
        for config in configs {
            let curve = Curve::new(config);
            let top = curve.max_level();
            assert_eq!(curve.level_for_xp(i64::MAX as u64), top);
            assert_eq!(curve.level_for_xp(u64::MAX), top);
            assert!(curve.xp_for_level(top) <= MAX_XP as i64);
            assert!((MAX_XP as i64) < curve.xp_for_level(top + 1));
        }

        assert_eq!(Curve::new(GrowthConfig::linear(1.0)).max_level(), MAX_XP);
        assert_eq!(Curve::new(GrowthConfig::linear(1e300)).max_level(), 0);
        assert_eq!(Curve::new(GrowthConfig::cubic()).max_level(), 165_140);
    }

    fn default_configs() -> [GrowthConfig; 3] {
        [
            GrowthConfig::linear(DEFAULT_GAP),
            GrowthConfig::quadratic(DEFAULT_MULTIPLIER),
            GrowthConfig::cubic(),
        ]
    }

    proptest! {
        #[test]
        fn prop_level_round_trip(level in 0u64..5_000) {
            for config in default_configs() {
                let curve = Curve::new(config);
                let xp = curve.xp_for_level(level) as u64;
                prop_assert_eq!(curve.level_for_xp(xp), level);
            }
        }

        #[test]
        fn prop_xp_within_level_band(xp in prop_oneof![0u64..50_000_000, 0u64..=MAX_XP]) {
            for config in default_configs() {
                let curve = Curve::new(config);
                let level = curve.level_for_xp(xp);
                prop_assert!(curve.xp_for_level(level) <= xp as i64);
                prop_assert!((xp as i64) < curve.xp_for_level(level + 1));
            }
        }
    }
}
