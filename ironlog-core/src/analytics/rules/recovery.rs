//! Recovery rules

use crate::analytics::engine::InsightRule;
use crate::analytics::insight::{Insight, InsightCategory, Severity};
use crate::analytics::metrics::MetricsSnapshot;
use crate::analytics::profile::InsightProfile;

/// The current run of consecutive training days reached the rest threshold.
pub struct RestDay;

impl InsightRule for RestDay {
    fn id(&self) -> &str {
        "recovery.rest_day"
    }

    fn evaluate(&self, metrics: &MetricsSnapshot, profile: &InsightProfile) -> Option<Insight> {
        let streak = metrics.current_streak();
        let limit = profile.rest_streak_days(metrics.age_band);
        if streak == 0 || streak < limit {
            return None;
        }
        Some(
            Insight::new(
                self.id(),
                Severity::Warn,
                InsightCategory::Recovery,
                1,
                "Recovery day needed",
            )
            .message(format!(
                "You have trained {} days in a row. Adaptation happens during rest.",
                streak
            ))
            .action("Take a full rest day or an easy mobility session next."),
        )
    }
}
