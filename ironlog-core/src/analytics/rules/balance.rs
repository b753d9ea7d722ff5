//! Balance rules: missing categories and ratio bands
//!
//! Ratios come from recent weekly-average sets. A ratio is only judged when
//! both sides were trained; a program without any lower-body work gets no
//! upper/lower alert.

use crate::analytics::engine::InsightRule;
use crate::analytics::insight::{Insight, InsightCategory, Severity};
use crate::analytics::metrics::MetricsSnapshot;
use crate::analytics::profile::InsightProfile;
use crate::format::format_ratio;

fn trained_recently(metrics: &MetricsSnapshot) -> bool {
    metrics.sets.recent > 0.0
}

/// Which side of a band a ratio falls on.
fn outside_band(ratio: f64, (low, high): (f64, f64)) -> Option<&'static str> {
    if ratio > high {
        Some("high")
    } else if ratio < low {
        Some("low")
    } else {
        None
    }
}

/// No core work in the recent window.
pub struct CoreMissing;

impl InsightRule for CoreMissing {
    fn id(&self) -> &str {
        "balance.core_missing"
    }

    fn evaluate(&self, metrics: &MetricsSnapshot, _: &InsightProfile) -> Option<Insight> {
        if !trained_recently(metrics) || metrics.recent_sets("core") > 0.0 {
            return None;
        }
        Some(
            Insight::new(
                self.id(),
                Severity::Nudge,
                InsightCategory::Balance,
                4,
                "No core work",
            )
            .message(format!(
                "No core sets logged in the last {} weeks.",
                metrics.recent_weeks
            ))
            .action("Finish two sessions a week with planks, carries or leg raises."),
        )
    }
}

/// No conditioning work in the recent window.
pub struct CardioMissing;

impl InsightRule for CardioMissing {
    fn id(&self) -> &str {
        "balance.cardio_missing"
    }

    fn evaluate(&self, metrics: &MetricsSnapshot, _: &InsightProfile) -> Option<Insight> {
        let cardio_days = metrics
            .body_part_frequency
            .get("cardio")
            .copied()
            .unwrap_or(0.0);
        if !trained_recently(metrics) || cardio_days > 0.0 {
            return None;
        }
        Some(
            Insight::new(
                self.id(),
                Severity::Info,
                InsightCategory::Conditioning,
                5,
                "No conditioning logged",
            )
            .message(format!(
                "No cardio sessions in the last {} weeks.",
                metrics.recent_weeks
            ))
            .action("Add one or two short conditioning sessions a week."),
        )
    }
}

/// Push volume outside the profile band relative to pull volume.
pub struct PushPull;

impl InsightRule for PushPull {
    fn id(&self) -> &str {
        "balance.push_pull"
    }

    fn evaluate(&self, metrics: &MetricsSnapshot, profile: &InsightProfile) -> Option<Insight> {
        let ratio = metrics.balance.push_pull?;
        let side = outside_band(ratio, profile.thresholds.push_pull)?;
        let action = if side == "high" {
            "Add rows or pull-ups until pulling matches pushing."
        } else {
            "Add presses or push-ups to balance your pulling."
        };
        Some(
            Insight::new(
                self.id(),
                Severity::Warn,
                InsightCategory::Balance,
                2,
                "Push/pull imbalance",
            )
            .message(format!(
                "Push:pull ratio is {} ({:.1} vs {:.1} weekly sets).",
                format_ratio(ratio),
                metrics.balance.push,
                metrics.balance.pull
            ))
            .action(action),
        )
    }
}

/// Quadriceps volume outside the profile band relative to hamstrings.
pub struct QuadHam;

impl InsightRule for QuadHam {
    fn id(&self) -> &str {
        "balance.quad_ham"
    }

    fn evaluate(&self, metrics: &MetricsSnapshot, profile: &InsightProfile) -> Option<Insight> {
        let ratio = metrics.balance.quad_ham?;
        let side = outside_band(ratio, profile.thresholds.quad_ham)?;
        let action = if side == "high" {
            "Add hinges or leg curls for your hamstrings."
        } else {
            "Add squats or lunges for your quadriceps."
        };
        Some(
            Insight::new(
                self.id(),
                Severity::Warn,
                InsightCategory::Balance,
                3,
                "Quad/hamstring imbalance",
            )
            .message(format!(
                "Quad:hamstring ratio is {} ({:.1} vs {:.1} weekly sets).",
                format_ratio(ratio),
                metrics.balance.quadriceps,
                metrics.balance.hamstrings
            ))
            .action(action),
        )
    }
}

/// Upper-body volume outside the profile band relative to lower body.
pub struct UpperLower;

impl InsightRule for UpperLower {
    fn id(&self) -> &str {
        "balance.upper_lower"
    }

    fn evaluate(&self, metrics: &MetricsSnapshot, profile: &InsightProfile) -> Option<Insight> {
        let ratio = metrics.balance.upper_lower?;
        let side = outside_band(ratio, profile.thresholds.upper_lower)?;
        let action = if side == "high" {
            "Give your legs a dedicated session each week."
        } else {
            "Add an upper-body session to even things out."
        };
        Some(
            Insight::new(
                self.id(),
                Severity::Nudge,
                InsightCategory::Balance,
                3,
                "Upper/lower imbalance",
            )
            .message(format!(
                "Upper:lower ratio is {} ({:.1} vs {:.1} weekly sets).",
                format_ratio(ratio),
                metrics.balance.upper,
                metrics.balance.lower
            ))
            .action(action),
        )
    }
}
