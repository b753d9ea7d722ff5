//! Weekly aggregator
//!
//! Buckets normalised sessions into Monday-based calendar weeks over a
//! trailing window ending with the week that contains `as_of`.
//!
//! The series always has exactly `weeks_back` entries in ascending order.
//! Weeks without sessions are present with zero values, and sessions
//! outside the window are ignored.

use super::session::{RepBuckets, SessionStats};
use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Per-body-part totals for one week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WeeklyBodyPart {
    /// Weighted working sets
    pub sets: f64,
    /// Weighted tonnage
    pub tonnage: f64,
    /// Distinct dates this part was trained
    pub active_days: u32,
}

/// Totals for one calendar week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyStats {
    /// Monday of the week
    pub week_start: NaiveDate,
    pub workouts: u32,
    pub total_sets: u32,
    pub total_tonnage: f64,
    pub body_parts: BTreeMap<String, WeeklyBodyPart>,
    pub rep_buckets: RepBuckets,
}

impl WeeklyStats {
    fn empty(week_start: NaiveDate) -> Self {
        Self {
            week_start,
            workouts: 0,
            total_sets: 0,
            total_tonnage: 0.0,
            body_parts: BTreeMap::new(),
            rep_buckets: RepBuckets::default(),
        }
    }

    /// Whether at least one workout was logged this week.
    pub fn is_active(&self) -> bool {
        self.workouts > 0
    }

    /// Weighted sets for a body part, zero if untrained.
    pub fn body_part_sets(&self, part: &str) -> f64 {
        self.body_parts.get(part).map(|p| p.sets).unwrap_or(0.0)
    }

    /// Distinct training days for a body part, zero if untrained.
    pub fn body_part_days(&self, part: &str) -> u32 {
        self.body_parts.get(part).map(|p| p.active_days).unwrap_or(0)
    }
}

/// `date` moved back by `days`, or `None` past the calendar's lower bound.
pub fn days_before(date: NaiveDate, days: u64) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(days))
}

/// Monday of the week containing `date`.
///
/// Clamps to the earliest representable date at the calendar's lower bound.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    days_before(date, offset).unwrap_or(NaiveDate::MIN)
}

/// Monday of the oldest week in a `weeks_back` series ending at `as_of`.
pub fn series_start(as_of: NaiveDate, weeks_back: usize) -> Option<NaiveDate> {
    let current = days_before(as_of, u64::from(as_of.weekday().num_days_from_monday()))?;
    let span = u64::try_from(weeks_back.checked_sub(1)?).ok()?.checked_mul(7)?;
    days_before(current, span)
}

/// Week-start keys of the trailing window, oldest first.
///
/// Weeks falling before the calendar's lower bound are left out.
pub fn week_keys(as_of: NaiveDate, weeks_back: usize) -> Vec<NaiveDate> {
    let current = week_start(as_of);
    (0..weeks_back as u64)
        .rev()
        .filter_map(|offset| days_before(current, offset.checked_mul(7)?))
        .collect()
}

/// Aggregate sessions into a zero-filled weekly series.
///
/// Sessions that do not [contribute](SessionStats::contributes) are skipped.
pub fn aggregate_weeks(
    sessions: &[SessionStats],
    as_of: NaiveDate,
    weeks_back: usize,
) -> Vec<WeeklyStats> {
    let keys = week_keys(as_of, weeks_back);
    let mut weeks: Vec<WeeklyStats> = keys.iter().map(|k| WeeklyStats::empty(*k)).collect();
    let Some(first) = keys.first().copied() else {
        return weeks;
    };
    let last = week_start(as_of);

    let mut part_dates: Vec<BTreeMap<String, BTreeSet<NaiveDate>>> =
        vec![BTreeMap::new(); weeks.len()];
    let mut skipped = 0usize;

    for stats in sessions.iter().filter(|s| s.contributes()) {
        let key = week_start(stats.date);
        if key < first || key > last {
            skipped += 1;
            continue;
        }
        let idx = ((key - first).num_days() / 7) as usize;
        let week = &mut weeks[idx];

        week.workouts += 1;
        week.total_sets = week.total_sets.saturating_add(stats.total_working_sets);
        week.total_tonnage += stats.total_tonnage;
        week.rep_buckets.merge(&stats.rep_buckets);

        for (part, load) in &stats.body_parts {
            let entry = week.body_parts.entry(part.clone()).or_default();
            entry.sets += load.sets;
            entry.tonnage += load.tonnage;
            part_dates[idx]
                .entry(part.clone())
                .or_default()
                .insert(stats.date);
        }
    }

    for (week, dates) in weeks.iter_mut().zip(part_dates) {
        for (part, days) in dates {
            if let Some(entry) = week.body_parts.get_mut(&part) {
                entry.active_days = days.len() as u32;
            }
        }
    }

    tracing::debug!(
        weeks = weeks.len(),
        first_week = %first,
        outside_window = skipped,
        "Aggregated weekly series"
    );

    weeks
}
