//! Strength and training-style rules
//!
//! The e1RM rules compare the dominant exercise's best estimate over its
//! most recent qualifying sessions against the sessions before. Bands are
//! exclusive of each other: regression at or below `regression_ratio`,
//! improvement at or above `improvement_ratio`, plateau strictly inside
//! `±plateau_ratio`.

use crate::analytics::engine::InsightRule;
use crate::analytics::insight::{Insight, InsightCategory, Severity};
use crate::analytics::metrics::MetricsSnapshot;
use crate::analytics::profile::InsightProfile;
use crate::analytics::trends::{RepRangeMix, StrengthTrend};
use crate::format::format_percent;

/// Working sets needed in the rep window before dominance is judged.
const REP_DOMINANCE_MIN_SETS: u32 = 12;

fn strength_change(metrics: &MetricsSnapshot) -> Option<(&StrengthTrend, f64)> {
    let trend = metrics.strength.as_ref()?;
    Some((trend, trend.change?))
}

/// Estimated max on the main lift is falling.
pub struct Regression;

impl InsightRule for Regression {
    fn id(&self) -> &str {
        "strength.regression"
    }

    fn evaluate(&self, metrics: &MetricsSnapshot, profile: &InsightProfile) -> Option<Insight> {
        let (trend, change) = strength_change(metrics)?;
        if change > profile.thresholds.regression_ratio {
            return None;
        }
        Some(
            Insight::new(
                self.id(),
                Severity::Warn,
                InsightCategory::Strength,
                2,
                "Strength is slipping",
            )
            .message(format!(
                "Estimated max on {} changed {} versus your previous sessions.",
                trend.exercise,
                format_percent(change)
            ))
            .action("Check sleep and recovery, and consider a lighter week."),
        )
    }
}

/// Estimated max on the main lift has stalled.
pub struct Plateau;

impl InsightRule for Plateau {
    fn id(&self) -> &str {
        "strength.plateau"
    }

    fn evaluate(&self, metrics: &MetricsSnapshot, profile: &InsightProfile) -> Option<Insight> {
        let (trend, change) = strength_change(metrics)?;
        if change.abs() >= profile.thresholds.plateau_ratio {
            return None;
        }
        Some(
            Insight::new(
                self.id(),
                Severity::Nudge,
                InsightCategory::Strength,
                3,
                "Strength plateau",
            )
            .message(format!(
                "Estimated max on {} has moved {} over your last sessions.",
                trend.exercise,
                format_percent(change)
            ))
            .action("Change the rep scheme or add a small load increase each week."),
        )
    }
}

/// Estimated max on the main lift is climbing.
pub struct Improvement;

impl InsightRule for Improvement {
    fn id(&self) -> &str {
        "strength.improvement"
    }

    fn evaluate(&self, metrics: &MetricsSnapshot, profile: &InsightProfile) -> Option<Insight> {
        let (trend, change) = strength_change(metrics)?;
        if change < profile.thresholds.improvement_ratio {
            return None;
        }
        Some(
            Insight::new(
                self.id(),
                Severity::Success,
                InsightCategory::Strength,
                6,
                "Getting stronger",
            )
            .message(format!(
                "Estimated max on {} is up {}.",
                trend.exercise,
                format_percent(change)
            ))
            .action("Keep progressing the same way."),
        )
    }
}

/// One rep range dominates the profile's trailing window.
pub struct RepDominance;

impl InsightRule for RepDominance {
    fn id(&self) -> &str {
        "style.rep_dominance"
    }

    fn evaluate(&self, metrics: &MetricsSnapshot, profile: &InsightProfile) -> Option<Insight> {
        let weeks = profile.thresholds.rep_window_weeks;
        let mix = RepRangeMix::from_weeks(metrics.trailing_weeks(weeks));
        if mix.total_sets < REP_DOMINANCE_MIN_SETS {
            return None;
        }
        let (range, share) = mix.dominant()?;
        if share < profile.thresholds.rep_dominance_ratio {
            return None;
        }
        Some(
            Insight::new(
                self.id(),
                Severity::Nudge,
                InsightCategory::TrainingStyle,
                4,
                "Same rep range every time",
            )
            .message(format!(
                "{:.0}% of your working sets over {} weeks were {}.",
                share * 100.0,
                weeks,
                range.label()
            ))
            .action("Mix in a block of a different rep range."),
        )
    }
}

/// Neither volume nor strength is moving.
pub struct FlatProgress;

impl InsightRule for FlatProgress {
    fn id(&self) -> &str {
        "progress.flat"
    }

    fn evaluate(&self, metrics: &MetricsSnapshot, profile: &InsightProfile) -> Option<Insight> {
        let volume = metrics.sets.trend?;
        let (_, strength) = strength_change(metrics)?;
        let band = profile.thresholds.flat_band;
        if volume.abs() >= band || strength.abs() >= band {
            return None;
        }
        Some(
            Insight::new(
                self.id(),
                Severity::Nudge,
                InsightCategory::Progress,
                4,
                "Progress has flattened",
            )
            .message(format!(
                "Weekly volume ({}) and strength ({}) have both held flat.",
                format_percent(volume),
                format_percent(strength)
            ))
            .action("Pick one lever, volume or load, and push it for the next block."),
        )
    }
}
