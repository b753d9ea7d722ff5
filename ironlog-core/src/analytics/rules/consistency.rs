//! Consistency rules: logging density, goal adherence, gaps, weekend skew

use crate::analytics::engine::InsightRule;
use crate::analytics::insight::{Insight, InsightCategory, Severity};
use crate::analytics::metrics::MetricsSnapshot;
use crate::analytics::profile::InsightProfile;
use crate::format::format_percent;

/// Workouts per week below which logging counts as sparse.
const SPARSE_WORKOUTS_PER_WEEK: f64 = 1.0;

/// Recent active days needed before weekend skew is judged.
const WEEKEND_SKEW_MIN_DAYS: usize = 4;

/// History exists but fewer than one workout per week lately.
pub struct SparseLogging;

impl InsightRule for SparseLogging {
    fn id(&self) -> &str {
        "consistency.sparse_logging"
    }

    fn evaluate(&self, metrics: &MetricsSnapshot, _: &InsightProfile) -> Option<Insight> {
        if metrics.total_sessions == 0 || metrics.workouts_per_week >= SPARSE_WORKOUTS_PER_WEEK {
            return None;
        }
        Some(
            Insight::new(
                self.id(),
                Severity::Warn,
                InsightCategory::Consistency,
                1,
                "Logging is sparse",
            )
            .message(format!(
                "Only {:.1} workouts per week over the last {} weeks. Trends need more data points.",
                metrics.workouts_per_week, metrics.recent_weeks
            ))
            .action("Log every session, even short ones, for the next two weeks."),
        )
    }
}

/// Longest break inside the window reached the profile limit.
pub struct LongGap;

impl InsightRule for LongGap {
    fn id(&self) -> &str {
        "consistency.long_gap"
    }

    fn evaluate(&self, metrics: &MetricsSnapshot, profile: &InsightProfile) -> Option<Insight> {
        let gap = metrics.streak.max_gap_days;
        if gap < profile.thresholds.long_gap_days {
            return None;
        }
        Some(
            Insight::new(
                self.id(),
                Severity::Nudge,
                InsightCategory::Consistency,
                3,
                "Long break in training",
            )
            .message(format!(
                "Your longest break in the last {} weeks was {} days.",
                metrics.weeks.len(),
                gap
            ))
            .action("Plan a lighter session for busy weeks instead of skipping entirely."),
        )
    }
}

/// Too many days since the last session.
pub struct DaysSinceLast;

impl InsightRule for DaysSinceLast {
    fn id(&self) -> &str {
        "consistency.days_since_last"
    }

    fn evaluate(&self, metrics: &MetricsSnapshot, profile: &InsightProfile) -> Option<Insight> {
        let days = metrics.streak.days_since_last?;
        if days < profile.thresholds.days_since_last {
            return None;
        }
        Some(
            Insight::new(
                self.id(),
                Severity::Nudge,
                InsightCategory::Consistency,
                2,
                "Time to get back in",
            )
            .message(format!("It has been {} days since your last logged session.", days))
            .action("Schedule your next workout today."),
        )
    }
}

/// Workouts per week well below the weekly goal.
pub struct BelowGoal;

impl InsightRule for BelowGoal {
    fn id(&self) -> &str {
        "consistency.below_goal"
    }

    fn evaluate(&self, metrics: &MetricsSnapshot, profile: &InsightProfile) -> Option<Insight> {
        let goal = metrics.weekly_goal.filter(|g| *g > 0)?;
        if metrics.adherence >= profile.thresholds.adherence_low {
            return None;
        }
        Some(
            Insight::new(
                self.id(),
                Severity::Warn,
                InsightCategory::Consistency,
                2,
                "Falling short of your weekly goal",
            )
            .message(format!(
                "Averaging {:.1} workouts per week against a goal of {} ({:.0}% adherence).",
                metrics.workouts_per_week,
                goal,
                metrics.adherence * 100.0
            ))
            .action("Lower the goal or block fixed training slots in your calendar."),
        )
    }
}

/// Meeting or beating the weekly goal.
pub struct BeatsGoal;

impl InsightRule for BeatsGoal {
    fn id(&self) -> &str {
        "consistency.beats_goal"
    }

    fn evaluate(&self, metrics: &MetricsSnapshot, _: &InsightProfile) -> Option<Insight> {
        let goal = metrics.weekly_goal.filter(|g| *g > 0)?;
        if metrics.adherence < 1.0 {
            return None;
        }
        Some(
            Insight::new(
                self.id(),
                Severity::Success,
                InsightCategory::Consistency,
                5,
                "Weekly goal met",
            )
            .message(format!(
                "Averaging {:.1} workouts per week, at or above your goal of {}.",
                metrics.workouts_per_week, goal
            ))
            .action("Keep the routine. Consider raising the goal if recovery feels good."),
        )
    }
}

/// Most recent training days fall on the weekend.
pub struct WeekendSkew;

impl InsightRule for WeekendSkew {
    fn id(&self) -> &str {
        "consistency.weekend_skew"
    }

    fn evaluate(&self, metrics: &MetricsSnapshot, profile: &InsightProfile) -> Option<Insight> {
        let share = metrics.weekend_share?;
        if metrics.recent_active_days < WEEKEND_SKEW_MIN_DAYS
            || share < profile.thresholds.weekend_share
        {
            return None;
        }
        Some(
            Insight::new(
                self.id(),
                Severity::Nudge,
                InsightCategory::Consistency,
                4,
                "Training is weekend-heavy",
            )
            .message(format!(
                "{} of your recent training days were on Saturday or Sunday.",
                format_percent(share).trim_start_matches('+')
            ))
            .action("Move one session to midweek to spread the load."),
        )
    }
}
