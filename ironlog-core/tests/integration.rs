//! Integration tests for the ironlog analytics pipeline
//!
//! These run end-to-end scenarios through the public API only: build a
//! history, compute the metrics snapshot, build insights. The fixture in
//! `tests/fixtures/history.json` is an eight-week three-day split.

use chrono::{Duration, NaiveDate};
use ironlog_core::analytics::{
    aggregate_weeks, build_insights, compute_progress_metrics, create_default_engine,
    normalize_session, normalize_sessions, BodyWeightLookup, Confidence, InsightCategory,
    InsightProfile, MetricsOptions, MetricsSnapshot, Severity,
};
use ironlog_core::history::TrainingHistory;
use ironlog_core::types::{
    BodyWeightMeasurement, ExerciseEntry, ExerciseKind, SetEntry, WorkoutSession,
};
use std::path::PathBuf;

/// Get the path to a fixture file
fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn session(on: NaiveDate, exercises: Vec<ExerciseEntry>) -> WorkoutSession {
    WorkoutSession::new(on, exercises)
}

fn sets(count: usize, reps: i64, weight: f64) -> Vec<SetEntry> {
    vec![SetEntry::new(reps, weight); count]
}

fn metrics(sessions: &[WorkoutSession], as_of: NaiveDate) -> MetricsSnapshot {
    ironlog_core::logging::init_test();
    compute_progress_metrics(sessions, &[], &MetricsOptions::new(as_of)).unwrap()
}

// ============================================
// Session normalisation scenarios
// ============================================

#[test]
fn test_scenario_multi_tag_tonnage_split() {
    let logged = session(
        date(2025, 3, 3),
        vec![ExerciseEntry::new("Bench Press", &["chest", "triceps"], sets(1, 10, 100.0))],
    );
    let stats = normalize_session(&logged, &BodyWeightLookup::default());

    assert!((stats.total_tonnage - 1000.0).abs() < 1e-9);
    assert!((stats.body_parts["chest"].tonnage - 600.0).abs() < 1e-9);
    assert!((stats.body_parts["triceps"].tonnage - 400.0).abs() < 1e-9);
}

#[test]
fn test_scenario_bodyweight_effective_load() {
    let measurements = vec![
        BodyWeightMeasurement::new(date(2025, 2, 20), 183.0),
        BodyWeightMeasurement::new(date(2025, 3, 1), 180.0),
    ];
    let logged = session(
        date(2025, 3, 4),
        vec![ExerciseEntry::new("Hollow rock", &["core", "bodyweight"], sets(1, 20, 0.0))],
    );

    let stats = normalize_sessions(&[logged], &measurements);
    assert_eq!(stats.len(), 1);
    assert!((stats[0].total_tonnage - 3600.0).abs() < 1e-9);
    assert!(stats[0].body_parts.contains_key("core"));
    assert!(!stats[0].body_parts.contains_key("bodyweight"));
}

#[test]
fn test_tonnage_conservation_across_tag_shapes() {
    let logged = session(
        date(2025, 3, 4),
        vec![
            ExerciseEntry::new("Deadlift", &["back"], sets(3, 5, 315.0)),
            ExerciseEntry::new("Dip", &["triceps", "chest", "shoulders"], sets(3, 10, 0.0))
                .with_kind(ExerciseKind::Bodyweight),
            ExerciseEntry::new("Thruster", &["full body"], sets(3, 8, 95.0)),
            ExerciseEntry::new("Sled push", &[], sets(2, 4, 180.0)),
        ],
    );
    let measurements = vec![BodyWeightMeasurement::new(date(2025, 3, 1), 200.0)];
    let stats = &normalize_sessions(&[logged], &measurements)[0];

    let per_part: f64 = stats.body_parts.values().map(|l| l.tonnage).sum();
    assert!((per_part - stats.total_tonnage).abs() < 1e-6);
    assert_eq!(stats.total_working_sets, 11);
}

// ============================================
// Weekly series and confidence
// ============================================

#[test]
fn test_zero_fill_for_any_window() {
    let history = vec![
        session(date(2025, 1, 7), vec![ExerciseEntry::new("Squat", &["legs"], sets(3, 5, 225.0))]),
        session(date(2025, 3, 4), vec![ExerciseEntry::new("Squat", &["legs"], sets(3, 5, 235.0))]),
    ];
    let stats = normalize_sessions(&history, &[]);

    for weeks_back in [1usize, 2, 5, 12, 52] {
        let weeks = aggregate_weeks(&stats, date(2025, 3, 5), weeks_back);
        assert_eq!(weeks.len(), weeks_back);
        assert!(weeks.windows(2).all(|w| w[1].week_start - w[0].week_start == Duration::weeks(1)));
        assert!(weeks.iter().map(|w| w.workouts).sum::<u32>() <= 2);
    }
}

/// Two workouts per week except for a four-week hole in weeks 5-8.
/// `as_of` must be a Sunday.
fn twelve_weeks_with_hole(as_of: NaiveDate) -> Vec<WorkoutSession> {
    let first_monday = as_of - Duration::days(6) - Duration::weeks(11);
    let mut history = Vec::new();
    for week in 0..12 {
        if (4..8).contains(&week) {
            continue;
        }
        let monday = first_monday + Duration::weeks(week);
        for day in [0, 3] {
            history.push(session(
                monday + Duration::days(day),
                vec![ExerciseEntry::new("Squat", &["legs"], sets(3, 5, 225.0))],
            ));
        }
    }
    history
}

#[test]
fn test_scenario_confidence_uses_recent_window() {
    // Sunday, so the current week is complete
    let as_of = date(2025, 3, 30);
    let snapshot = metrics(&twelve_weeks_with_hole(as_of), as_of);

    assert_eq!(snapshot.weeks.iter().filter(|w| w.is_active()).count(), 8);
    assert_eq!(snapshot.active_weeks, 4);
    assert_eq!(snapshot.workouts_per_week, 2.0);
    assert_eq!(snapshot.confidence, Confidence::High);
}

#[test]
fn test_confidence_medium_and_low() {
    let as_of = date(2025, 3, 30);
    let monday = date(2025, 3, 24);
    let squat = || vec![ExerciseEntry::new("Squat", &["legs"], sets(3, 5, 225.0))];

    // Two of the recent four weeks active
    let two_weeks = vec![
        session(monday, squat()),
        session(monday - Duration::weeks(1), squat()),
    ];
    assert_eq!(metrics(&two_weeks, as_of).confidence, Confidence::Medium);

    // Four active weeks, but only one workout each
    let thin: Vec<_> = (0..4)
        .map(|w| session(monday - Duration::weeks(w), squat()))
        .collect();
    assert_eq!(metrics(&thin, as_of).confidence, Confidence::Medium);

    let single = vec![session(monday, squat())];
    assert_eq!(metrics(&single, as_of).confidence, Confidence::Low);
}

// ============================================
// Insight scenarios
// ============================================

/// Eight weeks of 12 chest sets and 4 back sets per week.
fn push_heavy_history(as_of: NaiveDate) -> Vec<WorkoutSession> {
    let first_monday = as_of - Duration::days(6) - Duration::weeks(7);
    let mut history = Vec::new();
    for week in 0..8 {
        let monday = first_monday + Duration::weeks(week);
        for day in [0, 3] {
            history.push(session(
                monday + Duration::days(day),
                vec![
                    ExerciseEntry::new("Bench Press", &["chest"], sets(6, 8, 155.0)),
                    ExerciseEntry::new("Cable Row", &["back"], sets(2, 10, 120.0)),
                ],
            ));
        }
    }
    history
}

#[test]
fn test_scenario_push_pull_imbalance() {
    let as_of = date(2025, 3, 30);
    let snapshot = metrics(&push_heavy_history(as_of), as_of);

    assert!((snapshot.balance.push - 12.0).abs() < 1e-9);
    assert!((snapshot.balance.pull - 4.0).abs() < 1e-9);
    assert!((snapshot.balance.push_pull.unwrap() - 3.0).abs() < 1e-9);
    assert_eq!(snapshot.confidence, Confidence::High);

    let insights = build_insights(&snapshot, &InsightProfile::strict());
    let warnings: Vec<_> = insights.iter().filter(|i| i.severity == Severity::Warn).collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].category, InsightCategory::Balance);
    assert_eq!(warnings[0].id, "balance.push_pull");
}

/// Thirty consecutive training days ending on `as_of`.
fn thirty_day_streak(as_of: NaiveDate) -> Vec<WorkoutSession> {
    (0..30)
        .map(|offset| {
            session(
                as_of - Duration::days(offset),
                vec![ExerciseEntry::new("Goblet Squat", &["legs"], sets(3, 10, 60.0))],
            )
        })
        .collect()
}

#[test]
fn test_scenario_rest_day_needed() {
    let as_of = date(2025, 4, 1);
    let snapshot = metrics(&thirty_day_streak(as_of), as_of);
    assert_eq!(snapshot.current_streak(), 30);
    assert_eq!(snapshot.streak.max_streak, 30);

    let insights = build_insights(&snapshot, &InsightProfile::strict());
    let rest: Vec<_> = insights.iter().filter(|i| i.id == "recovery.rest_day").collect();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].severity, Severity::Warn);
    assert_eq!(rest[0].title, "Recovery day needed");

    let mut patient = InsightProfile::strict();
    patient.thresholds.rest_streak_days = 40;
    let insights = build_insights(&snapshot, &patient);
    assert!(insights.iter().all(|i| i.id != "recovery.rest_day"));
}

#[test]
fn test_strict_profile_silent_on_low_confidence() {
    let as_of = date(2025, 3, 30);
    // One heavy, unbalanced, badly logged session: plenty for rules to say
    let history = vec![session(
        as_of,
        vec![
            ExerciseEntry::new("Bench Press", &["chest"], sets(10, 8, 155.0)),
            ExerciseEntry::new(
                "Leg Press",
                &["quadriceps"],
                vec![SetEntry {
                    reps: Some(10),
                    weight: None,
                }],
            ),
            ExerciseEntry::new("Mystery", &[], sets(3, 10, 40.0)),
        ],
    )];
    let snapshot = metrics(&history, as_of);
    assert_eq!(snapshot.confidence, Confidence::Low);

    let engine = create_default_engine();
    assert!(!engine.candidates(&snapshot, &InsightProfile::strict()).is_empty());
    assert!(build_insights(&snapshot, &InsightProfile::strict()).is_empty());

    let aggressive = build_insights(&snapshot, &InsightProfile::aggressive());
    assert!(!aggressive.is_empty());
}

#[test]
fn test_caps_hold_for_every_scenario() {
    let as_of = date(2025, 3, 30);
    let histories = vec![
        Vec::new(),
        twelve_weeks_with_hole(as_of),
        push_heavy_history(as_of),
        thirty_day_streak(as_of),
    ];

    for history in &histories {
        let snapshot = metrics(history, as_of);
        for profile in [InsightProfile::strict(), InsightProfile::aggressive()] {
            let insights = build_insights(&snapshot, &profile);
            let warnings = insights.iter().filter(|i| i.is_warning()).count();
            assert!(insights.len() <= profile.max_insights);
            assert!(warnings <= profile.max_warnings);
            assert!(insights.windows(2).all(|w| w[0].priority <= w[1].priority));
            assert!(insights.iter().all(|i| i.confidence == snapshot.confidence));
        }
    }
}

// ============================================
// Fixture history
// ============================================

#[test]
fn test_fixture_history_end_to_end() {
    ironlog_core::logging::init_test();
    let history = TrainingHistory::load(fixture_path("history.json")).expect("fixture should load");
    assert_eq!(history.sessions.len(), 24);

    let as_of = date(2025, 3, 2);
    let options = MetricsOptions::new(as_of).with_weekly_goal(Some(3));
    let snapshot =
        compute_progress_metrics(&history.sessions, &history.measurements, &options).unwrap();

    assert_eq!(snapshot.total_sessions, 24);
    assert_eq!(snapshot.confidence, Confidence::High);
    assert!((snapshot.adherence - 1.0).abs() < 1e-9);

    let strength = snapshot.strength.as_ref().unwrap();
    assert_eq!(strength.exercise, "Back Squat");
    assert!(strength.change.unwrap() > 0.05);

    let weight = snapshot.weight.change_window.unwrap();
    assert!((weight.delta - (-1.2)).abs() < 1e-9);

    let candidates = create_default_engine().candidates(&snapshot, &InsightProfile::strict());
    let ids: Vec<&str> = candidates.iter().map(|i| i.id.as_str()).collect();
    assert!(ids.contains(&"strength.improvement"));
    assert!(ids.contains(&"weight.stable_strength_gain"));
    assert!(ids.contains(&"consistency.beats_goal"));
    assert!(!ids.contains(&"data.missing_body_part"));

    let insights = build_insights(&snapshot, &InsightProfile::strict());
    assert!(!insights.is_empty());
    assert!(insights.len() <= 4);
}
