//! Sensitivity profiles
//!
//! Two static bundles of thresholds and output caps. `strict` surfaces few,
//! high-signal insights and stays silent on thin data; `aggressive` coaches
//! earlier and more often.
//!
//! Ratio thresholds are fractions (`0.05` = 5%). Weight rates are fractions
//! of body weight per week.

use super::metrics::AgeBand;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Name of a built-in profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileName {
    #[default]
    Strict,
    Aggressive,
}

impl ProfileName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileName::Strict => "strict",
            ProfileName::Aggressive => "aggressive",
        }
    }
}

impl std::fmt::Display for ProfileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProfileName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(ProfileName::Strict),
            "aggressive" => Ok(ProfileName::Aggressive),
            _ => Err(Error::UnknownProfile(s.to_string())),
        }
    }
}

/// Numeric thresholds consumed by the rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    // Strength
    pub plateau_ratio: f64,
    pub regression_ratio: f64,
    pub improvement_ratio: f64,

    // Volume
    pub volume_jump_ratio: f64,
    pub volume_drop_ratio: f64,
    /// Weekly-average working sets below which a trained part is under-dosed
    pub under_volume_sets: f64,

    // Consistency and recovery
    pub rest_streak_days: u32,
    pub long_gap_days: u32,
    pub days_since_last: i64,
    pub adherence_low: f64,
    pub weekend_share: f64,

    // Balance bands (low, high)
    pub push_pull: (f64, f64),
    pub quad_ham: (f64, f64),
    pub upper_lower: (f64, f64),

    // Training style
    pub rep_dominance_ratio: f64,
    pub rep_window_weeks: usize,

    // Body weight, per week
    pub weight_loss_fast_rate: f64,
    pub weight_gain_rate: f64,
    pub weight_stable_band: f64,

    /// Band around zero treated as "no movement" by the flat-progress rule
    pub flat_band: f64,
}

/// A named sensitivity profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightProfile {
    pub name: ProfileName,
    pub max_insights: usize,
    pub max_warnings: usize,
    /// Whether warnings may fire on low-confidence data
    pub low_confidence_allowed: bool,
    /// Whether low-confidence data silences every insight
    pub silent_when_low_confidence: bool,
    pub thresholds: Thresholds,
}

impl InsightProfile {
    pub fn strict() -> Self {
        Self {
            name: ProfileName::Strict,
            max_insights: 4,
            max_warnings: 1,
            low_confidence_allowed: false,
            silent_when_low_confidence: true,
            thresholds: Thresholds {
                plateau_ratio: 0.02,
                regression_ratio: -0.05,
                improvement_ratio: 0.05,
                volume_jump_ratio: 0.30,
                volume_drop_ratio: -0.30,
                under_volume_sets: 6.0,
                rest_streak_days: 10,
                long_gap_days: 7,
                days_since_last: 5,
                adherence_low: 0.75,
                weekend_share: 0.7,
                push_pull: (0.7, 1.3),
                quad_ham: (0.6, 2.0),
                upper_lower: (0.5, 2.0),
                rep_dominance_ratio: 0.8,
                rep_window_weeks: 6,
                weight_loss_fast_rate: -0.01,
                weight_gain_rate: 0.005,
                weight_stable_band: 0.0025,
                flat_band: 0.03,
            },
        }
    }

    pub fn aggressive() -> Self {
        Self {
            name: ProfileName::Aggressive,
            max_insights: 8,
            max_warnings: 3,
            low_confidence_allowed: true,
            silent_when_low_confidence: false,
            thresholds: Thresholds {
                plateau_ratio: 0.01,
                regression_ratio: -0.03,
                improvement_ratio: 0.025,
                volume_jump_ratio: 0.20,
                volume_drop_ratio: -0.20,
                under_volume_sets: 8.0,
                rest_streak_days: 7,
                long_gap_days: 5,
                days_since_last: 3,
                adherence_low: 0.9,
                weekend_share: 0.6,
                push_pull: (0.8, 1.2),
                quad_ham: (0.75, 1.6),
                upper_lower: (0.67, 1.5),
                rep_dominance_ratio: 0.65,
                rep_window_weeks: 4,
                weight_loss_fast_rate: -0.0075,
                weight_gain_rate: 0.0035,
                weight_stable_band: 0.002,
                flat_band: 0.05,
            },
        }
    }

    pub fn named(name: ProfileName) -> Self {
        match name {
            ProfileName::Strict => Self::strict(),
            ProfileName::Aggressive => Self::aggressive(),
        }
    }

    /// Look a profile up by its string name.
    pub fn by_name(name: &str) -> Result<Self> {
        Ok(Self::named(name.parse()?))
    }

    /// Override the output caps.
    pub fn with_caps(mut self, max_insights: Option<usize>, max_warnings: Option<usize>) -> Self {
        if let Some(max) = max_insights {
            self.max_insights = max;
        }
        if let Some(max) = max_warnings {
            self.max_warnings = max;
        }
        self
    }

    /// Rest-streak threshold for an age band. Masters get one day less.
    pub fn rest_streak_days(&self, age_band: AgeBand) -> u32 {
        match age_band {
            AgeBand::Standard => self.thresholds.rest_streak_days,
            AgeBand::Masters => self.thresholds.rest_streak_days.saturating_sub(1).max(1),
        }
    }
}

impl Default for InsightProfile {
    fn default() -> Self {
        Self::strict()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_lookup() {
        assert_eq!(InsightProfile::by_name("Strict").unwrap().max_insights, 4);
        assert_eq!(InsightProfile::by_name("aggressive").unwrap().max_warnings, 3);
        assert!(matches!(
            InsightProfile::by_name("lenient"),
            Err(Error::UnknownProfile(_))
        ));
    }

    #[test]
    fn test_strict_is_more_conservative() {
        let strict = InsightProfile::strict();
        let aggressive = InsightProfile::aggressive();
        assert!(strict.max_insights < aggressive.max_insights);
        assert!(strict.thresholds.rest_streak_days > aggressive.thresholds.rest_streak_days);
        assert!(!strict.low_confidence_allowed);
        assert!(aggressive.low_confidence_allowed);
    }

    #[test]
    fn test_masters_rest_streak() {
        let strict = InsightProfile::strict();
        assert_eq!(strict.rest_streak_days(AgeBand::Standard), 10);
        assert_eq!(strict.rest_streak_days(AgeBand::Masters), 9);
    }

    #[test]
    fn test_cap_overrides() {
        let profile = InsightProfile::strict().with_caps(Some(2), None);
        assert_eq!(profile.max_insights, 2);
        assert_eq!(profile.max_warnings, 1);
    }
}
