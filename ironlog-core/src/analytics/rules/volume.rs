//! Volume rules: week-over-week swings and per-part dosing

use super::{judged_parts, name_list};
use crate::analytics::engine::InsightRule;
use crate::analytics::insight::{Insight, InsightCategory, Severity};
use crate::analytics::metrics::MetricsSnapshot;
use crate::analytics::profile::InsightProfile;
use crate::format::format_percent;

/// Total sets rose sharply between the last two completed weeks.
pub struct VolumeJump;

impl InsightRule for VolumeJump {
    fn id(&self) -> &str {
        "volume.jump"
    }

    fn evaluate(&self, metrics: &MetricsSnapshot, profile: &InsightProfile) -> Option<Insight> {
        let change = metrics.week_over_week?;
        if change < profile.thresholds.volume_jump_ratio {
            return None;
        }
        Some(
            Insight::new(
                self.id(),
                Severity::Warn,
                InsightCategory::Volume,
                2,
                "Volume jumped",
            )
            .message(format!(
                "Weekly working sets changed {} from the week before. Big jumps raise injury risk.",
                format_percent(change)
            ))
            .action("Hold volume steady this week before adding more."),
        )
    }
}

/// Total sets fell sharply between the last two completed weeks.
pub struct VolumeDrop;

impl InsightRule for VolumeDrop {
    fn id(&self) -> &str {
        "volume.drop"
    }

    fn evaluate(&self, metrics: &MetricsSnapshot, profile: &InsightProfile) -> Option<Insight> {
        let change = metrics.week_over_week?;
        if change > profile.thresholds.volume_drop_ratio {
            return None;
        }
        Some(
            Insight::new(
                self.id(),
                Severity::Nudge,
                InsightCategory::Volume,
                3,
                "Volume dropped",
            )
            .message(format!(
                "Weekly working sets changed {} from the week before.",
                format_percent(change)
            ))
            .action("If this was not a planned deload, add a session back this week."),
        )
    }
}

/// Trained body parts averaging fewer weekly sets than the profile minimum.
pub struct UnderVolume;

impl InsightRule for UnderVolume {
    fn id(&self) -> &str {
        "volume.under_volume"
    }

    fn evaluate(&self, metrics: &MetricsSnapshot, profile: &InsightProfile) -> Option<Insight> {
        let minimum = profile.thresholds.under_volume_sets;
        let low: Vec<&str> = judged_parts(metrics)
            .filter(|part| {
                let recent = metrics.recent_sets(part);
                recent > 0.0 && recent < minimum
            })
            .map(|part| part.as_str())
            .collect();
        if low.is_empty() {
            return None;
        }
        Some(
            Insight::new(
                self.id(),
                Severity::Nudge,
                InsightCategory::Volume,
                3,
                "Low weekly volume",
            )
            .message(format!(
                "Averaging under {:.0} working sets per week for {}.",
                minimum,
                name_list(&low)
            ))
            .action("Add two or three sets for these body parts each week."),
        )
    }
}

/// Body parts trained in the baseline weeks but not at all lately.
pub struct MissingFrequency;

impl InsightRule for MissingFrequency {
    fn id(&self) -> &str {
        "volume.missing_frequency"
    }

    fn evaluate(&self, metrics: &MetricsSnapshot, _: &InsightProfile) -> Option<Insight> {
        let dropped: Vec<&str> = judged_parts(metrics)
            .filter(|part| {
                let baseline = metrics.body_parts.get(*part).map_or(0.0, |a| a.baseline);
                let frequency = metrics.body_part_frequency.get(*part).copied().unwrap_or(0.0);
                baseline > 0.0 && frequency == 0.0
            })
            .map(|part| part.as_str())
            .collect();
        if dropped.is_empty() {
            return None;
        }
        Some(
            Insight::new(
                self.id(),
                Severity::Nudge,
                InsightCategory::Frequency,
                4,
                "Body parts dropped from rotation",
            )
            .message(format!(
                "No sessions for {} in the last {} weeks, though you trained them before.",
                name_list(&dropped),
                metrics.recent_weeks
            ))
            .action("Work them back in at least once a week."),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::rules::testing::snapshot;
    use crate::analytics::trends::MovingAverage;

    fn average(recent: f64, baseline: f64) -> MovingAverage {
        MovingAverage {
            recent,
            baseline,
            trend: None,
        }
    }

    #[test]
    fn test_jump_and_drop_bands() {
        let strict = InsightProfile::strict();
        let aggressive = InsightProfile::aggressive();
        let mut metrics = snapshot();

        metrics.week_over_week = Some(0.25);
        assert!(VolumeJump.evaluate(&metrics, &strict).is_none());
        assert!(VolumeJump.evaluate(&metrics, &aggressive).is_some());

        metrics.week_over_week = Some(-0.5);
        assert!(VolumeDrop.evaluate(&metrics, &strict).is_some());
        assert!(VolumeJump.evaluate(&metrics, &strict).is_none());

        metrics.week_over_week = None;
        assert!(VolumeDrop.evaluate(&metrics, &strict).is_none());
    }

    #[test]
    fn test_under_volume_skips_cardio_and_untrained() {
        let mut metrics = snapshot();
        metrics.body_parts.insert("chest".into(), average(10.0, 10.0));
        metrics.body_parts.insert("biceps".into(), average(2.0, 2.0));
        metrics.body_parts.insert("cardio".into(), average(1.0, 1.0));
        metrics.body_parts.insert("calves".into(), average(0.0, 3.0));

        let insight = UnderVolume.evaluate(&metrics, &InsightProfile::strict()).unwrap();
        assert!(insight.message.contains("biceps"));
        assert!(!insight.message.contains("cardio"));
        assert!(!insight.message.contains("calves"));
        assert!(!insight.message.contains("chest"));
    }

    #[test]
    fn test_missing_frequency() {
        let mut metrics = snapshot();
        metrics.body_parts.insert("calves".into(), average(0.0, 3.0));
        metrics.body_part_frequency.insert("calves".into(), 0.0);
        metrics.body_parts.insert("chest".into(), average(8.0, 8.0));
        metrics.body_part_frequency.insert("chest".into(), 2.0);

        let insight = MissingFrequency
            .evaluate(&metrics, &InsightProfile::strict())
            .unwrap();
        assert_eq!(insight.category, InsightCategory::Frequency);
        assert!(insight.message.contains("calves"));
        assert!(!insight.message.contains("chest"));
    }
}
