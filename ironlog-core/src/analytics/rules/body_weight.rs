//! Body-weight vs strength rules
//!
//! Each rule needs both a weekly weight rate over the configured window and
//! a defined strength change; either missing means no insight.

use crate::analytics::engine::InsightRule;
use crate::analytics::insight::{Insight, InsightCategory, Severity};
use crate::analytics::metrics::MetricsSnapshot;
use crate::analytics::profile::InsightProfile;
use crate::format::format_percent;

fn rate_and_strength(metrics: &MetricsSnapshot) -> Option<(f64, f64)> {
    let rate = metrics.weight.weekly_rate()?;
    let strength = metrics.strength.as_ref()?.change?;
    Some((rate, strength))
}

/// Losing weight fast while strength falls.
pub struct FastLossStrengthDrop;

impl InsightRule for FastLossStrengthDrop {
    fn id(&self) -> &str {
        "weight.fast_loss_strength_drop"
    }

    fn evaluate(&self, metrics: &MetricsSnapshot, profile: &InsightProfile) -> Option<Insight> {
        let (rate, strength) = rate_and_strength(metrics)?;
        if rate > profile.thresholds.weight_loss_fast_rate || strength >= 0.0 {
            return None;
        }
        Some(
            Insight::new(
                self.id(),
                Severity::Warn,
                InsightCategory::BodyWeight,
                2,
                "Cutting too fast",
            )
            .message(format!(
                "Body weight is changing {} per week while strength moved {}.",
                format_percent(rate),
                format_percent(strength)
            ))
            .action("Slow the deficit and keep protein high to protect strength."),
        )
    }
}

/// Gaining weight without a matching strength gain.
pub struct GainWithoutStrength;

impl InsightRule for GainWithoutStrength {
    fn id(&self) -> &str {
        "weight.gain_without_strength"
    }

    fn evaluate(&self, metrics: &MetricsSnapshot, profile: &InsightProfile) -> Option<Insight> {
        let (rate, strength) = rate_and_strength(metrics)?;
        let thresholds = &profile.thresholds;
        if rate < thresholds.weight_gain_rate || strength >= thresholds.plateau_ratio {
            return None;
        }
        Some(
            Insight::new(
                self.id(),
                Severity::Nudge,
                InsightCategory::BodyWeight,
                3,
                "Weight up, strength flat",
            )
            .message(format!(
                "Body weight is rising {} per week but strength moved only {}.",
                format_percent(rate),
                format_percent(strength)
            ))
            .action("Tighten the surplus or push progressive overload harder."),
        )
    }
}

/// Holding weight steady while getting stronger.
pub struct StableStrengthGain;

impl InsightRule for StableStrengthGain {
    fn id(&self) -> &str {
        "weight.stable_strength_gain"
    }

    fn evaluate(&self, metrics: &MetricsSnapshot, profile: &InsightProfile) -> Option<Insight> {
        let (rate, strength) = rate_and_strength(metrics)?;
        let thresholds = &profile.thresholds;
        if rate.abs() > thresholds.weight_stable_band || strength < thresholds.improvement_ratio {
            return None;
        }
        Some(
            Insight::new(
                self.id(),
                Severity::Success,
                InsightCategory::BodyWeight,
                5,
                "Stronger at the same weight",
            )
            .message(format!(
                "Strength is up {} while body weight held steady.",
                format_percent(strength)
            ))
            .action("Great recomposition. Keep the current intake."),
        )
    }
}
