//! Progress metrics snapshot
//!
//! [`compute_progress_metrics`] runs the whole derivation pipeline:
//!
//! ```text
//! sessions + measurements
//!     │
//!     ▼  session::normalize_sessions
//! SessionStats (per day)
//!     │
//!     ▼  weekly::aggregate_weeks
//! WeeklyStats (zero-filled, ascending)
//!     │
//!     ▼  trends::*
//! MetricsSnapshot
//! ```
//!
//! The snapshot is plain data. It is handed to the insight engine, and the
//! report binary serialises it directly for charts and exports.

use super::session::{normalize_sessions, BodyWeightLookup, SessionStats};
use super::trends::{
    balance_ratios, classify_confidence, percent_change, strength_trend, streak_stats,
    weight_change, BalanceRatios, Confidence, MovingAverage, RepRangeMix, StreakStats,
    StrengthTrend, WeightChange,
};
use super::weekly::{aggregate_weeks, days_before, series_start, WeeklyStats};
use crate::error::{Error, Result};
use crate::types::{BodyWeightMeasurement, WorkoutSession};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Default trailing window of the weekly series.
pub const DEFAULT_WEEKS_BACK: usize = 12;

/// Weeks in each half of a moving-average comparison.
pub const RECENT_WEEKS: usize = 4;

/// Default body-weight trend window.
pub const DEFAULT_WEIGHT_WINDOW_DAYS: i64 = 30;

/// Short body-weight trend window.
pub const SHORT_WEIGHT_WINDOW_DAYS: i64 = 7;

/// Qualifying sessions in each half of the strength comparison.
pub const STRENGTH_SAMPLE_SESSIONS: usize = 4;

// ============================================
// Options
// ============================================

/// Athlete age band. Masters athletes get earlier recovery prompts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeBand {
    #[default]
    Standard,
    Masters,
}

impl AgeBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeBand::Standard => "standard",
            AgeBand::Masters => "masters",
        }
    }
}

impl std::str::FromStr for AgeBand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(AgeBand::Standard),
            "masters" => Ok(AgeBand::Masters),
            other => Err(Error::InvalidInput(format!("unknown age band: {other}"))),
        }
    }
}

/// Inputs to [`compute_progress_metrics`] besides the history itself.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsOptions {
    /// The day treated as "today"
    pub as_of: NaiveDate,
    /// Target workouts per week; `None` disables adherence
    pub weekly_goal: Option<u32>,
    /// Length of the weekly series
    pub weeks_back: usize,
    /// Weeks in each moving-average half
    pub recent_weeks: usize,
    /// Body-weight trend window in days
    pub weight_window_days: i64,
    pub age_band: AgeBand,
}

impl MetricsOptions {
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            weekly_goal: None,
            weeks_back: DEFAULT_WEEKS_BACK,
            recent_weeks: RECENT_WEEKS,
            weight_window_days: DEFAULT_WEIGHT_WINDOW_DAYS,
            age_band: AgeBand::Standard,
        }
    }

    pub fn with_weekly_goal(mut self, goal: Option<u32>) -> Self {
        self.weekly_goal = goal;
        self
    }

    pub fn with_weeks_back(mut self, weeks_back: usize) -> Self {
        self.weeks_back = weeks_back;
        self
    }

    pub fn with_weight_window_days(mut self, days: i64) -> Self {
        self.weight_window_days = days;
        self
    }

    pub fn with_age_band(mut self, age_band: AgeBand) -> Self {
        self.age_band = age_band;
        self
    }

    /// Reject window sizes the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.weeks_back == 0 {
            return Err(Error::InvalidInput("weeks_back must be at least 1".into()));
        }
        if self.recent_weeks == 0 || self.recent_weeks > self.weeks_back {
            return Err(Error::InvalidInput(format!(
                "recent window of {} weeks does not fit a {}-week series",
                self.recent_weeks, self.weeks_back
            )));
        }
        if self.weight_window_days <= 0 {
            return Err(Error::InvalidInput(format!(
                "weight window must be positive, got {} days",
                self.weight_window_days
            )));
        }
        if series_start(self.as_of, self.weeks_back).is_none() {
            return Err(Error::InvalidInput(format!(
                "a {}-week series ending {} starts before the earliest supported date",
                self.weeks_back, self.as_of
            )));
        }
        let window_fits = u64::try_from(self.weight_window_days)
            .ok()
            .and_then(|days| days_before(self.as_of, days))
            .is_some();
        if !window_fits {
            return Err(Error::InvalidInput(format!(
                "a {}-day weight window ending {} starts before the earliest supported date",
                self.weight_window_days, self.as_of
            )));
        }
        Ok(())
    }
}

// ============================================
// Snapshot sections
// ============================================

/// Body-weight summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WeightMetrics {
    /// Most recent reading at or before `as_of`
    pub latest: Option<f64>,
    pub change_7d: Option<WeightChange>,
    /// Change over the configured weight window
    pub change_window: Option<WeightChange>,
    pub window_days: i64,
}

impl WeightMetrics {
    /// Weekly rate over the configured window, as a fraction of body weight.
    pub fn weekly_rate(&self) -> Option<f64> {
        self.change_window.and_then(|c| c.weekly_rate)
    }
}

/// Working sets over trailing day windows ending at `as_of`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RollingTotals {
    pub last_7_sets: u32,
    pub prev_7_sets: u32,
    pub last_30_sets: u32,
    pub last_30_active_days: u32,
}

/// Highest-tonnage session on record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BestSession {
    pub date: NaiveDate,
    pub tonnage: f64,
    pub working_sets: u32,
}

/// Recent sessions raising each data-quality flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DataQuality {
    /// Sessions logged in the recent window, including empty ones
    pub sessions: u32,
    pub loaded_zero_weight: u32,
    pub bodyweight_no_reps: u32,
    pub missing_body_part: u32,
    pub main_lift_sessions: u32,
}

/// Everything the insight engine and the report need, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub as_of: NaiveDate,
    /// Zero-filled weekly series, oldest first
    pub weeks: Vec<WeeklyStats>,
    pub recent_weeks: usize,
    /// Sessions with at least one working set, all time up to `as_of`
    pub total_sessions: usize,

    pub sets: MovingAverage,
    pub tonnage: MovingAverage,
    /// Weekly sets per body part
    pub body_parts: BTreeMap<String, MovingAverage>,
    /// Recent mean of distinct training days per week, per body part
    pub body_part_frequency: BTreeMap<String, f64>,

    pub workouts_per_week: f64,
    pub weekly_goal: Option<u32>,
    /// `workouts_per_week / weekly_goal`, 0 without a goal
    pub adherence: f64,
    /// Recent weeks with at least one workout
    pub active_weeks: usize,
    pub confidence: Confidence,

    /// Total-set change between the last two completed weeks
    pub week_over_week: Option<f64>,
    pub strength: Option<StrengthTrend>,
    pub weight: WeightMetrics,
    pub streak: StreakStats,
    pub balance: BalanceRatios,
    /// Rep-range mix over the recent window
    pub rep_mix: RepRangeMix,
    /// Share of recent active days on Saturday or Sunday
    pub weekend_share: Option<f64>,
    pub recent_active_days: usize,

    pub data_quality: DataQuality,
    pub best_session: Option<BestSession>,
    pub rolling: RollingTotals,
    pub age_band: AgeBand,
}

impl MetricsSnapshot {
    /// The last `n` weeks of the series (fewer if the series is shorter).
    pub fn trailing_weeks(&self, n: usize) -> &[WeeklyStats] {
        &self.weeks[self.weeks.len().saturating_sub(n)..]
    }

    /// The recent moving-average window.
    pub fn recent(&self) -> &[WeeklyStats] {
        self.trailing_weeks(self.recent_weeks)
    }

    /// Current consecutive-day streak.
    pub fn current_streak(&self) -> u32 {
        self.streak.current_streak
    }

    /// Recent weekly-average sets for a body part.
    pub fn recent_sets(&self, part: &str) -> f64 {
        self.body_parts.get(part).map(|a| a.recent).unwrap_or(0.0)
    }

    /// Whether anything at all was logged in the weekly window.
    pub fn has_history(&self) -> bool {
        self.weeks.iter().any(|w| w.is_active())
    }
}

// ============================================
// Computation
// ============================================

fn sum_sets(history: &[SessionStats], from: NaiveDate, to: NaiveDate) -> u32 {
    history
        .iter()
        .filter(|s| s.contributes() && s.date > from && s.date <= to)
        .map(|s| s.total_working_sets)
        .sum()
}

fn rolling_totals(history: &[SessionStats], as_of: NaiveDate) -> RollingTotals {
    let days = |n: u64| days_before(as_of, n).unwrap_or(NaiveDate::MIN);
    let last_30_active_days = history
        .iter()
        .filter(|s| s.contributes() && s.date > days(30) && s.date <= as_of)
        .map(|s| s.date)
        .collect::<BTreeSet<_>>()
        .len() as u32;

    RollingTotals {
        last_7_sets: sum_sets(history, days(7), as_of),
        prev_7_sets: sum_sets(history, days(14), days(7)),
        last_30_sets: sum_sets(history, days(30), as_of),
        last_30_active_days,
    }
}

fn data_quality(history: &[SessionStats], since: NaiveDate) -> DataQuality {
    let mut quality = DataQuality::default();
    for stats in history.iter().filter(|s| s.date >= since) {
        quality.sessions += 1;
        quality.loaded_zero_weight += u32::from(stats.flags.loaded_zero_weight);
        quality.bodyweight_no_reps += u32::from(stats.flags.has_bodyweight_no_reps);
        quality.missing_body_part += u32::from(stats.flags.has_missing_body_part);
        quality.main_lift_sessions += u32::from(stats.flags.has_main_lift);
    }
    quality
}

fn best_session(history: &[SessionStats]) -> Option<BestSession> {
    history
        .iter()
        .filter(|s| s.contributes())
        .fold(None, |best: Option<&SessionStats>, s| match best {
            Some(b) if b.total_tonnage >= s.total_tonnage => Some(b),
            _ => Some(s),
        })
        .map(|s| BestSession {
            date: s.date,
            tonnage: s.total_tonnage,
            working_sets: s.total_working_sets,
        })
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Compute the full metrics snapshot for a history.
///
/// Sessions dated after `options.as_of` are ignored. Sparse or empty
/// history is fine; only unusable options are an error.
pub fn compute_progress_metrics(
    sessions: &[WorkoutSession],
    measurements: &[BodyWeightMeasurement],
    options: &MetricsOptions,
) -> Result<MetricsSnapshot> {
    options.validate()?;
    let as_of = options.as_of;
    let window = options.recent_weeks;

    let history: Vec<SessionStats> = normalize_sessions(sessions, measurements)
        .into_iter()
        .filter(|s| s.date <= as_of)
        .collect();
    let weeks = aggregate_weeks(&history, as_of, options.weeks_back);
    let n = weeks.len();
    let recent = &weeks[n - window..];
    let recent_start = recent[0].week_start;
    let window_start = weeks[0].week_start;

    let series = |f: &dyn Fn(&WeeklyStats) -> f64| -> Vec<f64> { weeks.iter().map(f).collect() };

    let sets = MovingAverage::from_series(&series(&|w| f64::from(w.total_sets)), window);
    let tonnage = MovingAverage::from_series(&series(&|w| w.total_tonnage), window);
    let workouts = MovingAverage::from_series(&series(&|w| f64::from(w.workouts)), window);

    let tracked: BTreeSet<&String> = weeks.iter().flat_map(|w| w.body_parts.keys()).collect();
    let mut body_parts = BTreeMap::new();
    let mut body_part_frequency = BTreeMap::new();
    for part in tracked {
        let values = series(&|w| w.body_part_sets(part));
        body_parts.insert(part.clone(), MovingAverage::from_series(&values, window));
        let days: f64 = recent.iter().map(|w| f64::from(w.body_part_days(part))).sum();
        body_part_frequency.insert(part.clone(), days / window as f64);
    }

    let workouts_per_week = workouts.recent;
    let adherence = match options.weekly_goal {
        Some(goal) if goal > 0 => workouts_per_week / f64::from(goal),
        _ => 0.0,
    };
    let active_weeks = recent.iter().filter(|w| w.is_active()).count();
    let confidence = classify_confidence(active_weeks, workouts_per_week);

    let week_over_week = if n >= 3 {
        percent_change(
            f64::from(weeks[n - 2].total_sets),
            f64::from(weeks[n - 3].total_sets),
        )
    } else {
        None
    };

    let contributing: Vec<SessionStats> =
        history.iter().filter(|s| s.contributes()).cloned().collect();
    let strength = strength_trend(&history, STRENGTH_SAMPLE_SESSIONS);

    let lookup = BodyWeightLookup::new(measurements);
    let readings = lookup.entries();
    let weight = WeightMetrics {
        latest: readings
            .iter()
            .rev()
            .find(|(date, _)| *date <= as_of)
            .map(|(_, w)| *w),
        change_7d: weight_change(readings, as_of, SHORT_WEIGHT_WINDOW_DAYS),
        change_window: weight_change(readings, as_of, options.weight_window_days),
        window_days: options.weight_window_days,
    };

    let active_dates: BTreeSet<NaiveDate> = contributing.iter().map(|s| s.date).collect();
    let streak = streak_stats(&active_dates, window_start, as_of);

    let recent_sets: BTreeMap<String, f64> = body_parts
        .iter()
        .map(|(part, avg)| (part.clone(), avg.recent))
        .collect();
    let balance = balance_ratios(&recent_sets);

    let recent_dates: Vec<NaiveDate> = active_dates.range(recent_start..).copied().collect();
    let weekend_share = if recent_dates.is_empty() {
        None
    } else {
        let weekend = recent_dates.iter().filter(|d| is_weekend(**d)).count();
        Some(weekend as f64 / recent_dates.len() as f64)
    };

    let snapshot = MetricsSnapshot {
        as_of,
        recent_weeks: window,
        total_sessions: contributing.len(),
        sets,
        tonnage,
        body_parts,
        body_part_frequency,
        workouts_per_week,
        weekly_goal: options.weekly_goal,
        adherence,
        active_weeks,
        confidence,
        week_over_week,
        strength,
        weight,
        streak,
        balance,
        rep_mix: RepRangeMix::from_weeks(recent),
        weekend_share,
        recent_active_days: recent_dates.len(),
        data_quality: data_quality(&history, recent_start),
        best_session: best_session(&history),
        rolling: rolling_totals(&history, as_of),
        age_band: options.age_band,
        weeks,
    };

    tracing::info!(
        as_of = %as_of,
        sessions = snapshot.total_sessions,
        weeks = snapshot.weeks.len(),
        workouts_per_week = snapshot.workouts_per_week,
        confidence = %snapshot.confidence,
        "Computed progress metrics"
    );

    Ok(snapshot)
}
