//! Data-entry rules
//!
//! These look at the data-quality counts over the recent window. They never
//! block other rules; they only point at entries worth fixing.

use crate::analytics::engine::InsightRule;
use crate::analytics::insight::{Insight, InsightCategory, Severity};
use crate::analytics::metrics::MetricsSnapshot;
use crate::analytics::profile::InsightProfile;

fn sessions(count: u32) -> String {
    if count == 1 {
        "1 recent session".to_string()
    } else {
        format!("{} recent sessions", count)
    }
}

/// Loaded exercises logged with reps but no weight.
pub struct LoadedZeroWeight;

impl InsightRule for LoadedZeroWeight {
    fn id(&self) -> &str {
        "data.loaded_zero_weight"
    }

    fn evaluate(&self, metrics: &MetricsSnapshot, _: &InsightProfile) -> Option<Insight> {
        let count = metrics.data_quality.loaded_zero_weight;
        (count > 0).then(|| {
            Insight::new(
                self.id(),
                Severity::Nudge,
                InsightCategory::Data,
                2,
                "Missing weights",
            )
            .message(format!(
                "Found loaded sets with reps but no weight in {}. Those sets do not count toward volume.",
                sessions(count)
            ))
            .action("Add the weight used, or mark the exercise as bodyweight.")
        })
    }
}

/// Bodyweight exercises logged with zero reps.
pub struct BodyweightZeroReps;

impl InsightRule for BodyweightZeroReps {
    fn id(&self) -> &str {
        "data.bodyweight_zero_reps"
    }

    fn evaluate(&self, metrics: &MetricsSnapshot, _: &InsightProfile) -> Option<Insight> {
        let count = metrics.data_quality.bodyweight_no_reps;
        (count > 0).then(|| {
            Insight::new(
                self.id(),
                Severity::Nudge,
                InsightCategory::Data,
                2,
                "Missing reps",
            )
            .message(format!(
                "Found bodyweight sets logged with zero reps in {}.",
                sessions(count)
            ))
            .action("Fill in the reps so these sets count.")
        })
    }
}

/// Exercises logged without any body-part tag.
pub struct MissingBodyPart;

impl InsightRule for MissingBodyPart {
    fn id(&self) -> &str {
        "data.missing_body_part"
    }

    fn evaluate(&self, metrics: &MetricsSnapshot, _: &InsightProfile) -> Option<Insight> {
        let count = metrics.data_quality.missing_body_part;
        (count > 0).then(|| {
            Insight::new(
                self.id(),
                Severity::Nudge,
                InsightCategory::Data,
                3,
                "Untagged exercises",
            )
            .message(format!(
                "Found exercises without a body part in {}, so balance checks cannot see them.",
                sessions(count)
            ))
            .action("Tag each exercise with the body parts it trains.")
        })
    }
}
