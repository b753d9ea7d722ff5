//! Session normaliser
//!
//! Turns one logged [`WorkoutSession`] into a [`SessionStats`] record:
//! working sets, tonnage, estimated one-rep maxes, the weighted body-part
//! load distribution, rep-range buckets and data-quality flags.
//!
//! ## Classification
//!
//! | Rule | Definition |
//! |------|------------|
//! | Working set | `reps >= 3` and (`weight > 0` or the exercise is bodyweight) |
//! | Effective load | set weight if positive, else body weight on the session date |
//! | Tonnage | `reps * effective load` |
//! | e1RM | `weight * (1 + reps / 30)` over sets with `weight > 0`, `1 <= reps <= 12` |
//!
//! ## Body-part distribution
//!
//! - One tag: 100% to that tag. `full body` is split evenly across
//!   [`FULL_BODY_SPLIT`].
//! - Two or more tags: 60% to the primary (first) tag, the remaining 40%
//!   shared evenly by the secondary tags.
//! - No tags: everything goes to [`UNTAGGED`] so per-part tonnage still
//!   sums to the session total.
//!
//! A session without working sets is still returned (its data-quality flags
//! matter) but [`SessionStats::contributes`] is false and the aggregation
//! stages skip it.

use crate::types::{
    BodyWeightMeasurement, ExerciseEntry, WorkoutSession, FULL_BODY, FULL_BODY_SPLIT, UNTAGGED,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Minimum reps for a set to count toward volume.
pub const MIN_WORKING_REPS: u32 = 3;

/// Highest rep count still used for one-rep-max estimation.
pub const E1RM_MAX_REPS: u32 = 12;

/// Working sets of one exercise in a session that make it a "main lift".
pub const MAIN_LIFT_SETS: u32 = 3;

/// Share of load credited to the primary tag of a multi-tag exercise.
const PRIMARY_SHARE: f64 = 0.6;

/// Upper bound of the low rep bucket (inclusive).
const LOW_REP_MAX: u32 = 5;

/// Upper bound of the mid rep bucket (inclusive).
const MID_REP_MAX: u32 = 12;

// ============================================
// Body-weight lookup
// ============================================

/// Date-keyed body-weight table with most-recent-at-or-before semantics.
#[derive(Debug, Clone, Default)]
pub struct BodyWeightLookup {
    entries: Vec<(NaiveDate, f64)>,
}

impl BodyWeightLookup {
    /// Build the table, discarding non-positive and non-finite readings.
    pub fn new(measurements: &[BodyWeightMeasurement]) -> Self {
        let mut entries: Vec<(NaiveDate, f64)> = measurements
            .iter()
            .filter(|m| m.weight.is_finite() && m.weight > 0.0)
            .map(|m| (m.date, m.weight))
            .collect();
        // Stable: same-day readings keep their logged order, the last one wins.
        entries.sort_by_key(|(date, _)| *date);
        Self { entries }
    }

    /// Body weight to assume on `date`.
    ///
    /// The most recent reading at or before `date`; the first-ever reading
    /// when `date` predates all of them; zero when there are none.
    pub fn weight_on(&self, date: NaiveDate) -> f64 {
        let idx = self.entries.partition_point(|(d, _)| *d <= date);
        if idx == 0 {
            self.entries.first().map(|(_, w)| *w).unwrap_or(0.0)
        } else {
            self.entries[idx - 1].1
        }
    }

    /// Readings in ascending date order.
    pub fn entries(&self) -> &[(NaiveDate, f64)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent reading.
    pub fn latest(&self) -> Option<(NaiveDate, f64)> {
        self.entries.last().copied()
    }
}

// ============================================
// Derived records
// ============================================

/// Weighted load credited to one body part.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BodyPartLoad {
    pub sets: f64,
    pub tonnage: f64,
}

/// Working-set counts by rep range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RepBuckets {
    /// `reps <= 5`
    pub low: u32,
    /// `6..=12` reps
    pub mid: u32,
    /// `reps > 12`
    pub high: u32,
}

impl RepBuckets {
    pub fn record(&mut self, reps: u32) {
        if reps <= LOW_REP_MAX {
            self.low = self.low.saturating_add(1);
        } else if reps <= MID_REP_MAX {
            self.mid = self.mid.saturating_add(1);
        } else {
            self.high = self.high.saturating_add(1);
        }
    }

    pub fn merge(&mut self, other: &RepBuckets) {
        self.low = self.low.saturating_add(other.low);
        self.mid = self.mid.saturating_add(other.mid);
        self.high = self.high.saturating_add(other.high);
    }

    pub fn total(&self) -> u32 {
        self.low + self.mid + self.high
    }
}

/// Data-entry signals raised while normalising a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionFlags {
    /// Some exercise reached [`MAIN_LIFT_SETS`] working sets
    pub has_main_lift: bool,
    /// Some exercise was logged without any body-part tag
    pub has_missing_body_part: bool,
    /// A bodyweight exercise has a set logged with zero reps
    pub has_bodyweight_no_reps: bool,
    /// A loaded exercise has a set with reps but no weight
    pub loaded_zero_weight: bool,
}

/// Per-exercise summary within one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseSummary {
    pub name: String,
    pub bodyweight: bool,
    /// Working sets
    pub sets: u32,
    /// Reps across working sets
    pub reps: u32,
    pub tonnage: f64,
    /// Best e1RM over all sets; 0 when no set qualifies
    pub best_e1rm: f64,
    /// Normalised tags, primary first
    pub body_parts: Vec<String>,
}

/// Classified statistics for one session. Recomputed on every query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStats {
    pub date: NaiveDate,
    pub total_working_sets: u32,
    pub total_tonnage: f64,
    pub exercises: Vec<ExerciseSummary>,
    pub body_parts: BTreeMap<String, BodyPartLoad>,
    pub rep_buckets: RepBuckets,
    pub flags: SessionFlags,
}

impl SessionStats {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            total_working_sets: 0,
            total_tonnage: 0.0,
            exercises: Vec::new(),
            body_parts: BTreeMap::new(),
            rep_buckets: RepBuckets::default(),
            flags: SessionFlags::default(),
        }
    }

    /// Whether this session feeds weekly aggregation and trends.
    pub fn contributes(&self) -> bool {
        self.total_working_sets > 0
    }
}

// ============================================
// Normalisation
// ============================================

/// Epley-style estimate used for strength trends.
pub fn estimate_one_rep_max(weight: f64, reps: u32) -> f64 {
    weight * (1.0 + f64::from(reps) / 30.0)
}

/// Fraction of an exercise's load credited to each body part.
///
/// Shares always sum to 1.0.
pub fn body_part_shares(parts: &[String]) -> BTreeMap<String, f64> {
    let mut shares: BTreeMap<String, f64> = BTreeMap::new();

    let mut credit = |part: &str, share: f64| {
        if part == FULL_BODY {
            let each = share / FULL_BODY_SPLIT.len() as f64;
            for canonical in FULL_BODY_SPLIT {
                *shares.entry(canonical.to_string()).or_insert(0.0) += each;
            }
        } else {
            *shares.entry(part.to_string()).or_insert(0.0) += share;
        }
    };

    match parts {
        [] => credit(UNTAGGED, 1.0),
        [only] => credit(only, 1.0),
        [primary, secondary @ ..] => {
            credit(primary, PRIMARY_SHARE);
            let each = (1.0 - PRIMARY_SHARE) / secondary.len() as f64;
            for part in secondary {
                credit(part, each);
            }
        }
    }

    shares
}

/// Normalise one session against the body-weight table.
pub fn normalize_session(session: &WorkoutSession, body_weight: &BodyWeightLookup) -> SessionStats {
    let mut stats = SessionStats::empty(session.date);

    for exercise in &session.exercises {
        let summary = summarize_exercise(exercise, session.date, body_weight, &mut stats);

        for (part, share) in body_part_shares(&summary.body_parts) {
            let load = stats.body_parts.entry(part).or_default();
            load.sets += f64::from(summary.sets) * share;
            load.tonnage += summary.tonnage * share;
        }

        stats.total_working_sets = stats.total_working_sets.saturating_add(summary.sets);
        stats.total_tonnage += summary.tonnage;
        if summary.sets >= MAIN_LIFT_SETS {
            stats.flags.has_main_lift = true;
        }
        stats.exercises.push(summary);
    }

    tracing::debug!(
        date = %stats.date,
        working_sets = stats.total_working_sets,
        tonnage = stats.total_tonnage,
        exercises = stats.exercises.len(),
        "Normalised session"
    );

    stats
}

fn summarize_exercise(
    exercise: &ExerciseEntry,
    date: NaiveDate,
    body_weight: &BodyWeightLookup,
    stats: &mut SessionStats,
) -> ExerciseSummary {
    let bodyweight = exercise.is_bodyweight();
    let body_parts = exercise.normalized_body_parts();
    if body_parts.is_empty() {
        stats.flags.has_missing_body_part = true;
    }

    let mut summary = ExerciseSummary {
        name: exercise.name.trim().to_string(),
        bodyweight,
        sets: 0,
        reps: 0,
        tonnage: 0.0,
        best_e1rm: 0.0,
        body_parts,
    };

    for set in &exercise.sets {
        if set.is_malformed() {
            tracing::warn!(
                date = %date,
                exercise = %exercise.name,
                reps = ?set.reps,
                weight = ?set.weight,
                "Coercing malformed set values to zero"
            );
        }

        let reps = set.clean_reps();
        let weight = set.clean_weight();

        if bodyweight && set.reps.is_some() && reps == 0 {
            stats.flags.has_bodyweight_no_reps = true;
        }
        if !bodyweight && weight == 0.0 && reps > 0 {
            stats.flags.loaded_zero_weight = true;
        }

        if weight > 0.0 && (1..=E1RM_MAX_REPS).contains(&reps) {
            summary.best_e1rm = summary.best_e1rm.max(estimate_one_rep_max(weight, reps));
        }

        let is_working = reps >= MIN_WORKING_REPS && (weight > 0.0 || bodyweight);
        if !is_working {
            continue;
        }

        let load = if weight > 0.0 {
            weight
        } else {
            body_weight.weight_on(date)
        };

        summary.sets = summary.sets.saturating_add(1);
        summary.reps = summary.reps.saturating_add(reps);
        summary.tonnage += f64::from(reps) * load;
        stats.rep_buckets.record(reps);
    }

    summary
}

/// Normalise a whole history, oldest session first.
///
/// Sessions without working sets are kept; callers filter with
/// [`SessionStats::contributes`] where aggregation is concerned.
pub fn normalize_sessions(
    sessions: &[WorkoutSession],
    measurements: &[BodyWeightMeasurement],
) -> Vec<SessionStats> {
    let lookup = BodyWeightLookup::new(measurements);
    let mut stats: Vec<SessionStats> = sessions
        .iter()
        .map(|s| normalize_session(s, &lookup))
        .collect();
    stats.sort_by_key(|s| s.date);
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExerciseKind, SetEntry};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn single(exercise: ExerciseEntry) -> SessionStats {
        let session = WorkoutSession::new(date(2025, 3, 3), vec![exercise]);
        normalize_session(&session, &BodyWeightLookup::default())
    }

    #[test]
    fn test_multi_tag_distribution() {
        let stats = single(ExerciseEntry::new(
            "Bench Press",
            &["chest", "triceps"],
            vec![SetEntry::new(10, 100.0)],
        ));

        assert_eq!(stats.total_working_sets, 1);
        assert!((stats.total_tonnage - 1000.0).abs() < 1e-9);
        assert!((stats.body_parts["chest"].tonnage - 600.0).abs() < 1e-9);
        assert!((stats.body_parts["triceps"].tonnage - 400.0).abs() < 1e-9);
        assert!((stats.body_parts["chest"].sets - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_three_tag_secondary_split() {
        let shares = body_part_shares(&[
            "back".to_string(),
            "biceps".to_string(),
            "shoulders".to_string(),
        ]);
        assert!((shares["back"] - 0.6).abs() < 1e-9);
        assert!((shares["biceps"] - 0.2).abs() < 1e-9);
        assert!((shares["shoulders"] - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_full_body_split() {
        let stats = single(ExerciseEntry::new(
            "Thruster",
            &["Full Body"],
            vec![SetEntry::new(5, 100.0)],
        ));

        assert_eq!(stats.body_parts.len(), 5);
        for part in FULL_BODY_SPLIT {
            assert!((stats.body_parts[part].tonnage - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_tonnage_conservation() {
        let session = WorkoutSession::new(
            date(2025, 3, 3),
            vec![
                ExerciseEntry::new("Squat", &["legs"], vec![SetEntry::new(5, 225.0); 3]),
                ExerciseEntry::new(
                    "Row",
                    &["back", "biceps", "shoulders"],
                    vec![SetEntry::new(8, 135.0), SetEntry::new(8, 135.0)],
                ),
                ExerciseEntry::new("Clean", &["full body"], vec![SetEntry::new(3, 155.0)]),
                ExerciseEntry::new("Mystery", &[], vec![SetEntry::new(10, 40.0)]),
            ],
        );
        let stats = normalize_session(&session, &BodyWeightLookup::default());

        let per_part: f64 = stats.body_parts.values().map(|l| l.tonnage).sum();
        assert!((per_part - stats.total_tonnage).abs() < 1e-6);
        let per_part_sets: f64 = stats.body_parts.values().map(|l| l.sets).sum();
        assert!((per_part_sets - f64::from(stats.total_working_sets)).abs() < 1e-9);
        assert!(stats.flags.has_missing_body_part);
        assert!(stats.flags.has_main_lift);
    }

    #[test]
    fn test_bodyweight_effective_load() {
        let lookup = BodyWeightLookup::new(&[
            BodyWeightMeasurement::new(date(2025, 2, 1), 185.0),
            BodyWeightMeasurement::new(date(2025, 3, 1), 180.0),
            BodyWeightMeasurement::new(date(2025, 3, 10), 178.0),
        ]);
        let session = WorkoutSession::new(
            date(2025, 3, 5),
            vec![ExerciseEntry::new("Hanging leg raise", &["core"], vec![SetEntry::new(20, 0.0)])
                .with_kind(ExerciseKind::Bodyweight)],
        );

        let stats = normalize_session(&session, &lookup);
        assert!((stats.total_tonnage - 3600.0).abs() < 1e-9);
        assert_eq!(stats.rep_buckets.high, 1);
    }

    #[test]
    fn test_body_weight_lookup_edges() {
        let lookup = BodyWeightLookup::new(&[
            BodyWeightMeasurement::new(date(2025, 3, 10), 178.0),
            BodyWeightMeasurement::new(date(2025, 3, 1), 180.0),
        ]);
        // Predates all readings: first-ever reading
        assert_eq!(lookup.weight_on(date(2025, 1, 1)), 180.0);
        assert_eq!(lookup.weight_on(date(2025, 3, 10)), 178.0);
        assert_eq!(lookup.weight_on(date(2025, 3, 9)), 180.0);
        assert_eq!(BodyWeightLookup::default().weight_on(date(2025, 3, 9)), 0.0);
    }

    #[test]
    fn test_short_sets_never_count() {
        let mut sets = vec![SetEntry::new(5, 100.0)];
        let before = single(ExerciseEntry::new("Press", &["shoulders"], sets.clone()));
        sets.push(SetEntry::new(2, 120.0));
        let after = single(ExerciseEntry::new("Press", &["shoulders"], sets));

        assert_eq!(before.total_working_sets, after.total_working_sets);
        // The double still feeds the e1RM estimate
        assert!(after.exercises[0].best_e1rm > before.exercises[0].best_e1rm);
    }

    #[test]
    fn test_e1rm_ignores_high_rep_sets() {
        let stats = single(ExerciseEntry::new(
            "Curl",
            &["biceps"],
            vec![SetEntry::new(15, 50.0)],
        ));
        assert_eq!(stats.exercises[0].best_e1rm, 0.0);

        let stats = single(ExerciseEntry::new(
            "Deadlift",
            &["back"],
            vec![SetEntry::new(3, 300.0)],
        ));
        assert!((stats.exercises[0].best_e1rm - 330.0).abs() < 1e-9);
    }

    #[test]
    fn test_data_quality_flags() {
        let stats = single(ExerciseEntry::new(
            "Leg Press",
            &["legs"],
            vec![SetEntry {
                reps: Some(10),
                weight: None,
            }],
        ));
        assert!(stats.flags.loaded_zero_weight);
        assert!(!stats.contributes());

        let stats = single(
            ExerciseEntry::new("Pull-up", &["back"], vec![SetEntry::new(0, 0.0)])
                .with_kind(ExerciseKind::Bodyweight),
        );
        assert!(stats.flags.has_bodyweight_no_reps);
        assert!(!stats.flags.loaded_zero_weight);
    }

    #[test]
    fn test_malformed_sets_tolerated() {
        let stats = single(ExerciseEntry::new(
            "Row",
            &["back"],
            vec![
                SetEntry {
                    reps: Some(-4),
                    weight: Some(100.0),
                },
                SetEntry {
                    reps: Some(8),
                    weight: Some(-50.0),
                },
                SetEntry::new(8, 100.0),
            ],
        ));
        assert_eq!(stats.total_working_sets, 1);
        assert_eq!(stats.rep_buckets.mid, 1);
    }

    #[test]
    fn test_absurd_rep_counts_saturate() {
        let stats = single(ExerciseEntry::new(
            "Calf Raise",
            &["calves"],
            vec![SetEntry::new(3_000_000_000, 10.0); 2],
        ));
        assert_eq!(stats.total_working_sets, 2);
        assert_eq!(stats.exercises[0].reps, u32::MAX);
        assert_eq!(stats.rep_buckets.high, 2);
        assert!((stats.total_tonnage - 6.0e10).abs() < 1.0);
    }
}
