//! Trend and confidence derivations
//!
//! Small pure functions over the weekly series, per-exercise e1RM history,
//! body-weight readings and active dates. [`super::metrics`] stitches them
//! into a [`MetricsSnapshot`](super::MetricsSnapshot).
//!
//! Every ratio here is `Option<f64>`: `None` means "no baseline", which is
//! not the same thing as "no change".

use super::session::SessionStats;
use super::weekly::{days_before, WeeklyStats};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Body parts on the pushing side of the push/pull ratio.
pub const PUSH_PARTS: &[&str] = &["chest", "shoulders", "triceps"];

/// Body parts on the pulling side of the push/pull ratio.
pub const PULL_PARTS: &[&str] = &["back", "biceps"];

/// Upper-body side of the upper/lower ratio.
pub const UPPER_PARTS: &[&str] = &["chest", "back", "shoulders", "biceps", "triceps"];

/// Lower-body side of the upper/lower ratio.
pub const LOWER_PARTS: &[&str] = &["legs", "quadriceps", "hamstrings", "glutes", "calves"];

// ============================================
// Moving averages
// ============================================

/// `(recent - baseline) / baseline`, undefined without a positive baseline.
pub fn percent_change(recent: f64, baseline: f64) -> Option<f64> {
    if baseline > 0.0 && recent.is_finite() {
        Some((recent - baseline) / baseline)
    } else {
        None
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Recent vs baseline means of a weekly metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MovingAverage {
    /// Mean of the last `window` weeks
    pub recent: f64,
    /// Mean of the `window` weeks before that
    pub baseline: f64,
    /// Percent change, `None` without a baseline
    pub trend: Option<f64>,
}

impl MovingAverage {
    /// Split an ascending weekly series into recent and baseline halves.
    ///
    /// Short series shrink the baseline first; an empty baseline leaves the
    /// trend undefined.
    pub fn from_series(values: &[f64], window: usize) -> Self {
        let n = values.len();
        let recent_start = n.saturating_sub(window);
        let baseline_start = recent_start.saturating_sub(window);

        let recent = mean(&values[recent_start..]);
        let baseline_values = &values[baseline_start..recent_start];
        let baseline = mean(baseline_values);
        let trend = if baseline_values.is_empty() {
            None
        } else {
            percent_change(recent, baseline)
        };

        Self {
            recent,
            baseline,
            trend,
        }
    }
}

// ============================================
// Confidence
// ============================================

/// Coarse reliability of the metrics, based on logging density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weeks with at least one workout needed for medium confidence.
pub const MEDIUM_CONFIDENCE_WEEKS: usize = 2;

/// Weeks with at least one workout needed for high confidence.
pub const HIGH_CONFIDENCE_WEEKS: usize = 4;

/// Workouts per week needed for high confidence.
pub const HIGH_CONFIDENCE_WORKOUTS: f64 = 2.0;

/// Classify confidence from the recent window.
///
/// `active_weeks` counts weeks with at least one workout inside the recent
/// window; `workouts_per_week` is the mean over the same window. High
/// always implies the medium condition.
pub fn classify_confidence(active_weeks: usize, workouts_per_week: f64) -> Confidence {
    if active_weeks >= HIGH_CONFIDENCE_WEEKS && workouts_per_week >= HIGH_CONFIDENCE_WORKOUTS {
        Confidence::High
    } else if active_weeks >= MEDIUM_CONFIDENCE_WEEKS {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

// ============================================
// Strength
// ============================================

/// Best-e1RM comparison for the most-trained exercise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrengthTrend {
    /// Exercise name as most recently logged
    pub exercise: String,
    /// Cumulative working sets across the history
    pub total_sets: u32,
    /// Best e1RM over the most recent qualifying sessions
    pub recent_best: Option<f64>,
    /// Best e1RM over the qualifying sessions before those
    pub baseline_best: Option<f64>,
    /// Percent change, `None` when either side is missing
    pub change: Option<f64>,
}

fn exercise_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Per-exercise `(date, best e1RM)` samples, oldest first.
///
/// Sessions where the exercise has no qualifying set are left out.
pub fn exercise_history(sessions: &[SessionStats]) -> BTreeMap<String, Vec<(NaiveDate, f64)>> {
    let mut history: BTreeMap<String, Vec<(NaiveDate, f64)>> = BTreeMap::new();
    for session in sessions {
        for exercise in &session.exercises {
            if exercise.best_e1rm > 0.0 {
                history
                    .entry(exercise_key(&exercise.name))
                    .or_default()
                    .push((session.date, exercise.best_e1rm));
            }
        }
    }
    for samples in history.values_mut() {
        samples.sort_by_key(|(date, _)| *date);
    }
    history
}

/// The exercise with the most cumulative working sets, with its display name.
///
/// Ties go to the alphabetically first exercise.
pub fn dominant_exercise(sessions: &[SessionStats]) -> Option<(String, String, u32)> {
    let mut totals: BTreeMap<String, (String, u32)> = BTreeMap::new();
    for session in sessions {
        for exercise in &session.exercises {
            let entry = totals
                .entry(exercise_key(&exercise.name))
                .or_insert_with(|| (exercise.name.clone(), 0));
            entry.0 = exercise.name.clone();
            entry.1 = entry.1.saturating_add(exercise.sets);
        }
    }

    let mut best: Option<(String, String, u32)> = None;
    for (key, (name, sets)) in totals {
        if sets == 0 {
            continue;
        }
        if best.as_ref().map_or(true, |(_, _, top)| sets > *top) {
            best = Some((key, name, sets));
        }
    }
    best
}

/// Compare best e1RM of the last `window` qualifying sessions against the
/// `window` before, for the dominant exercise.
pub fn strength_trend(sessions: &[SessionStats], window: usize) -> Option<StrengthTrend> {
    let (key, name, total_sets) = dominant_exercise(sessions)?;
    let history = exercise_history(sessions);
    let samples: &[(NaiveDate, f64)] = history.get(&key).map(|v| v.as_slice()).unwrap_or(&[]);

    let n = samples.len();
    let recent_start = n.saturating_sub(window);
    let baseline_start = recent_start.saturating_sub(window);

    let best = |slice: &[(NaiveDate, f64)]| slice.iter().map(|(_, v)| *v).reduce(f64::max);
    let recent_best = best(&samples[recent_start..]);
    let baseline_best = best(&samples[baseline_start..recent_start]);
    let change = match (recent_best, baseline_best) {
        (Some(recent), Some(baseline)) => percent_change(recent, baseline),
        _ => None,
    };

    Some(StrengthTrend {
        exercise: name,
        total_sets,
        recent_best,
        baseline_best,
        change,
    })
}

// ============================================
// Body weight
// ============================================

/// First-to-last body-weight change inside a trailing window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightChange {
    pub first_date: NaiveDate,
    pub first: f64,
    pub last_date: NaiveDate,
    pub last: f64,
    /// `last - first`
    pub delta: f64,
    /// `delta` as a fraction of the most recent known weight
    pub pct: f64,
    /// `pct` scaled to one week; `None` when both readings share a date
    pub weekly_rate: Option<f64>,
}

/// Weight change over `(as_of - window_days, as_of]`.
///
/// `readings` must be in ascending date order. Needs at least two readings
/// inside the window.
pub fn weight_change(
    readings: &[(NaiveDate, f64)],
    as_of: NaiveDate,
    window_days: i64,
) -> Option<WeightChange> {
    let start = days_before(as_of, u64::try_from(window_days).ok()?)?;
    let in_window: Vec<&(NaiveDate, f64)> = readings
        .iter()
        .filter(|(date, _)| *date > start && *date <= as_of)
        .collect();
    if in_window.len() < 2 {
        return None;
    }

    let (first_date, first) = *in_window[0];
    let (last_date, last) = *in_window[in_window.len() - 1];
    if last <= 0.0 {
        return None;
    }

    let delta = last - first;
    let pct = delta / last;
    let span_days = (last_date - first_date).num_days();
    let weekly_rate = (span_days > 0).then(|| pct * 7.0 / span_days as f64);

    Some(WeightChange {
        first_date,
        first,
        last_date,
        last,
        delta,
        pct,
        weekly_rate,
    })
}

// ============================================
// Streaks and gaps
// ============================================

/// Activity streaks over distinct active dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreakStats {
    /// Distinct active dates inside the window
    pub active_days: usize,
    /// Longest run of consecutive active days inside the window
    pub max_streak: u32,
    /// Consecutive active days ending today or yesterday
    pub current_streak: u32,
    /// Most rest days between two consecutive active dates inside the window
    pub max_gap_days: u32,
    /// Days since the most recent active date
    pub days_since_last: Option<i64>,
    pub last_active: Option<NaiveDate>,
}

/// Streak and gap statistics.
///
/// `max_streak`, `max_gap_days` and `active_days` only look at dates from
/// `window_start` on; `current_streak` and `days_since_last` use every
/// date up to `as_of`.
pub fn streak_stats(
    dates: &BTreeSet<NaiveDate>,
    window_start: NaiveDate,
    as_of: NaiveDate,
) -> StreakStats {
    let mut stats = StreakStats::default();

    let mut previous: Option<NaiveDate> = None;
    let mut run = 0u32;
    for date in dates.range(window_start..=as_of) {
        stats.active_days += 1;
        match previous {
            Some(prev) => {
                let diff = (*date - prev).num_days();
                if diff == 1 {
                    run += 1;
                } else {
                    run = 1;
                    let gap = u32::try_from(diff - 1).unwrap_or(u32::MAX);
                    stats.max_gap_days = stats.max_gap_days.max(gap);
                }
            }
            None => run = 1,
        }
        stats.max_streak = stats.max_streak.max(run);
        previous = Some(*date);
    }

    stats.last_active = dates.range(..=as_of).next_back().copied();
    stats.days_since_last = stats.last_active.map(|d| (as_of - d).num_days());

    let mut day = if dates.contains(&as_of) {
        Some(as_of)
    } else {
        as_of.pred_opt()
    };
    while let Some(current) = day.filter(|d| dates.contains(d)) {
        stats.current_streak += 1;
        day = current.pred_opt();
    }

    stats
}

// ============================================
// Balance
// ============================================

/// Push/pull, quadriceps/hamstrings and upper/lower balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BalanceRatios {
    pub push: f64,
    pub pull: f64,
    pub push_pull: Option<f64>,
    pub quadriceps: f64,
    pub hamstrings: f64,
    pub quad_ham: Option<f64>,
    pub upper: f64,
    pub lower: f64,
    pub upper_lower: Option<f64>,
}

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    (numerator > 0.0 && denominator > 0.0).then(|| numerator / denominator)
}

/// Ratios from recent weekly-average sets per body part.
pub fn balance_ratios(recent_sets: &BTreeMap<String, f64>) -> BalanceRatios {
    let sum = |parts: &[&str]| -> f64 {
        parts
            .iter()
            .map(|p| recent_sets.get(*p).copied().unwrap_or(0.0))
            .sum()
    };

    let push = sum(PUSH_PARTS);
    let pull = sum(PULL_PARTS);
    let quadriceps = sum(&["quadriceps"]);
    let hamstrings = sum(&["hamstrings"]);
    let upper = sum(UPPER_PARTS);
    let lower = sum(LOWER_PARTS);

    BalanceRatios {
        push,
        pull,
        push_pull: ratio(push, pull),
        quadriceps,
        hamstrings,
        quad_ham: ratio(quadriceps, hamstrings),
        upper,
        lower,
        upper_lower: ratio(upper, lower),
    }
}

// ============================================
// Rep ranges
// ============================================

/// Rep-range bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RepRange {
    Low,
    Mid,
    High,
}

impl RepRange {
    pub fn label(&self) -> &'static str {
        match self {
            RepRange::Low => "heavy (1-5 reps)",
            RepRange::Mid => "moderate (6-12 reps)",
            RepRange::High => "light (13+ reps)",
        }
    }
}

/// Share of working sets per rep range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RepRangeMix {
    pub total_sets: u32,
    pub low: f64,
    pub mid: f64,
    pub high: f64,
}

impl RepRangeMix {
    /// Mix over the given weeks.
    pub fn from_weeks(weeks: &[WeeklyStats]) -> Self {
        let (low, mid, high) = weeks.iter().fold((0u32, 0u32, 0u32), |acc, w| {
            (
                acc.0.saturating_add(w.rep_buckets.low),
                acc.1.saturating_add(w.rep_buckets.mid),
                acc.2.saturating_add(w.rep_buckets.high),
            )
        });
        let total_sets = low.saturating_add(mid).saturating_add(high);
        if total_sets == 0 {
            return Self::default();
        }
        let total = f64::from(total_sets);
        Self {
            total_sets,
            low: f64::from(low) / total,
            mid: f64::from(mid) / total,
            high: f64::from(high) / total,
        }
    }

    /// Largest bucket and its share; ties favour the lower range.
    pub fn dominant(&self) -> Option<(RepRange, f64)> {
        if self.total_sets == 0 {
            return None;
        }
        let mut best = (RepRange::Low, self.low);
        for candidate in [(RepRange::Mid, self.mid), (RepRange::High, self.high)] {
            if candidate.1 > best.1 {
                best = candidate;
            }
        }
        Some(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use crate::analytics::session::{normalize_session, BodyWeightLookup};
    use crate::types::{ExerciseEntry, SetEntry, WorkoutSession};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_percent_change_needs_baseline() {
        assert_eq!(percent_change(12.0, 10.0), Some(0.2));
        assert_eq!(percent_change(12.0, 0.0), None);
        assert_eq!(percent_change(10.0, 10.0), Some(0.0));
    }

    #[test]
    fn test_moving_average_halves() {
        let values = [1.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 2.0];
        let avg = MovingAverage::from_series(&values, 4);
        assert_eq!(avg.recent, 2.0);
        assert_eq!(avg.baseline, 1.0);
        assert_eq!(avg.trend, Some(1.0));

        let short = MovingAverage::from_series(&[3.0, 3.0], 4);
        assert_eq!(short.recent, 3.0);
        assert_eq!(short.trend, None);

        let zero_base = MovingAverage::from_series(&[0.0, 0.0, 0.0, 0.0, 5.0, 5.0, 5.0, 5.0], 4);
        assert_eq!(zero_base.trend, None);
    }

    #[test]
    fn test_confidence_tiers() {
        assert_eq!(classify_confidence(4, 3.0), Confidence::High);
        assert_eq!(classify_confidence(4, 1.5), Confidence::Medium);
        assert_eq!(classify_confidence(2, 5.0), Confidence::Medium);
        assert_eq!(classify_confidence(1, 5.0), Confidence::Low);
        assert_eq!(classify_confidence(0, 0.0), Confidence::Low);
    }

    #[test]
    fn test_confidence_high_implies_medium() {
        for weeks in 0..=6 {
            for wpw in [0.0, 1.0, 1.99, 2.0, 4.0] {
                if classify_confidence(weeks, wpw) == Confidence::High {
                    assert!(weeks >= MEDIUM_CONFIDENCE_WEEKS);
                }
            }
        }
    }

    #[test]
    fn test_weight_change_window() {
        let readings = vec![
            (date(2025, 2, 1), 190.0),
            (date(2025, 3, 1), 184.0),
            (date(2025, 3, 8), 182.0),
            (date(2025, 3, 15), 180.0),
        ];
        let change = weight_change(&readings, date(2025, 3, 15), 30).unwrap();
        assert_eq!(change.first, 184.0);
        assert_eq!(change.delta, -4.0);
        assert!((change.pct - (-4.0 / 180.0)).abs() < 1e-12);
        assert!((change.weekly_rate.unwrap() - (-4.0 / 180.0) / 2.0).abs() < 1e-12);

        // Only one reading inside 7 days
        assert!(weight_change(&readings, date(2025, 3, 15), 7).is_none());
        assert!(weight_change(&[], date(2025, 3, 15), 30).is_none());
        assert!(weight_change(&readings, date(2025, 3, 15), i64::MAX / 1000).is_none());
        assert!(weight_change(&readings, date(2025, 3, 15), -5).is_none());
    }

    #[test]
    fn test_streak_stats() {
        let dates: BTreeSet<NaiveDate> = [
            date(2025, 3, 1),
            date(2025, 3, 2),
            date(2025, 3, 3),
            date(2025, 3, 7),
            date(2025, 3, 8),
        ]
        .into_iter()
        .collect();

        let stats = streak_stats(&dates, date(2025, 1, 1), date(2025, 3, 9));
        assert_eq!(stats.max_streak, 3);
        assert_eq!(stats.max_gap_days, 3);
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.days_since_last, Some(1));
        assert_eq!(stats.active_days, 5);

        let stale = streak_stats(&dates, date(2025, 1, 1), date(2025, 3, 20));
        assert_eq!(stale.current_streak, 0);
        assert_eq!(stale.days_since_last, Some(12));
    }

    #[test]
    fn test_balance_ratios() {
        let mut recent = BTreeMap::new();
        recent.insert("chest".to_string(), 8.0);
        recent.insert("triceps".to_string(), 4.0);
        recent.insert("back".to_string(), 4.0);
        let balance = balance_ratios(&recent);
        assert_eq!(balance.push, 12.0);
        assert_eq!(balance.pull, 4.0);
        assert_eq!(balance.push_pull, Some(3.0));
        assert_eq!(balance.quad_ham, None);
        assert_eq!(balance.upper_lower, None);
    }

    #[test]
    fn test_strength_trend_uses_dominant_exercise() {
        let lookup = BodyWeightLookup::default();
        let mut sessions = Vec::new();
        for (i, weight) in [200.0, 205.0, 205.0, 210.0, 215.0, 220.0, 220.0, 225.0]
            .into_iter()
            .enumerate()
        {
            let session = WorkoutSession::new(
                date(2025, 1, 1) + Duration::days(i as i64 * 3),
                vec![
                    ExerciseEntry::new("Squat", &["legs"], vec![SetEntry::new(5, weight); 3]),
                    ExerciseEntry::new("Curl", &["biceps"], vec![SetEntry::new(10, 40.0)]),
                ],
            );
            sessions.push(normalize_session(&session, &lookup));
        }

        let trend = strength_trend(&sessions, 4).unwrap();
        assert_eq!(trend.exercise, "Squat");
        assert_eq!(trend.total_sets, 24);
        let expected = (225.0 - 210.0) / 210.0;
        assert!((trend.change.unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_strength_trend_without_baseline() {
        let lookup = BodyWeightLookup::default();
        let session = WorkoutSession::new(
            date(2025, 1, 1),
            vec![ExerciseEntry::new("Bench", &["chest"], vec![SetEntry::new(5, 185.0)])],
        );
        let trend = strength_trend(&[normalize_session(&session, &lookup)], 4).unwrap();
        assert!(trend.recent_best.is_some());
        assert_eq!(trend.baseline_best, None);
        assert_eq!(trend.change, None);
    }

    #[test]
    fn test_rep_mix_dominant() {
        assert_eq!(RepRangeMix::default().dominant(), None);
        let mix = RepRangeMix {
            total_sets: 10,
            low: 0.1,
            mid: 0.8,
            high: 0.1,
        };
        assert_eq!(mix.dominant(), Some((RepRange::Mid, 0.8)));
    }
}
