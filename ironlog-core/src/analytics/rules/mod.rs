//! Built-in insight rules
//!
//! Rules are grouped by topic, one file per group:
//!
//! - [`consistency`]: logging density, goals, gaps and weekend skew
//! - [`recovery`]: rest-day prompt from the active streak
//! - [`data_quality`]: data-entry omissions
//! - [`volume`]: week-over-week swings and per-part dosing
//! - [`balance`]: missing categories and ratio bands
//! - [`strength`]: e1RM trends, rep-range dominance, flat progress
//! - [`body_weight`]: weight trend vs strength trend
//!
//! [`create_default_engine`] registers them in catalogue order. That order
//! breaks priority ties, so new rules go where they belong in the list, not
//! at the end.

pub mod balance;
pub mod body_weight;
pub mod consistency;
pub mod data_quality;
pub mod recovery;
pub mod strength;
pub mod volume;

use super::engine::InsightEngine;
use super::insight::Insight;
use super::metrics::MetricsSnapshot;
use super::profile::InsightProfile;
use crate::types::{FULL_BODY, UNTAGGED};

/// Body parts the per-part volume and frequency rules never judge.
pub const UNJUDGED_PARTS: &[&str] = &["cardio", FULL_BODY, UNTAGGED];

/// Body parts eligible for per-part volume and frequency rules.
pub(crate) fn judged_parts(metrics: &MetricsSnapshot) -> impl Iterator<Item = &String> {
    metrics
        .body_parts
        .keys()
        .filter(|part| !UNJUDGED_PARTS.contains(&part.as_str()))
}

/// Join up to three names, noting how many were left out.
pub(crate) fn name_list(names: &[&str]) -> String {
    match names.len() {
        0 => String::new(),
        1..=3 => names.join(", "),
        n => format!("{} and {} more", names[..3].join(", "), n - 3),
    }
}

/// Create an engine with every built-in rule registered.
///
/// ```rust,ignore
/// use ironlog_core::analytics::create_default_engine;
///
/// let engine = create_default_engine();
/// println!("Registered rules: {:?}", engine.rule_ids());
/// ```
pub fn create_default_engine() -> InsightEngine {
    let mut engine = InsightEngine::new();

    engine.register(Box::new(consistency::SparseLogging));
    engine.register(Box::new(recovery::RestDay));
    engine.register(Box::new(data_quality::LoadedZeroWeight));
    engine.register(Box::new(data_quality::BodyweightZeroReps));
    engine.register(Box::new(data_quality::MissingBodyPart));
    engine.register(Box::new(consistency::LongGap));
    engine.register(Box::new(consistency::DaysSinceLast));
    engine.register(Box::new(consistency::BelowGoal));
    engine.register(Box::new(consistency::BeatsGoal));
    engine.register(Box::new(consistency::WeekendSkew));
    engine.register(Box::new(volume::VolumeJump));
    engine.register(Box::new(volume::VolumeDrop));
    engine.register(Box::new(volume::UnderVolume));
    engine.register(Box::new(volume::MissingFrequency));
    engine.register(Box::new(balance::CoreMissing));
    engine.register(Box::new(balance::CardioMissing));
    engine.register(Box::new(balance::PushPull));
    engine.register(Box::new(balance::QuadHam));
    engine.register(Box::new(balance::UpperLower));
    engine.register(Box::new(strength::RepDominance));
    engine.register(Box::new(strength::Regression));
    engine.register(Box::new(strength::Plateau));
    engine.register(Box::new(strength::Improvement));
    engine.register(Box::new(strength::FlatProgress));
    engine.register(Box::new(body_weight::FastLossStrengthDrop));
    engine.register(Box::new(body_weight::GainWithoutStrength));
    engine.register(Box::new(body_weight::StableStrengthGain));

    engine
}

/// Evaluate the built-in catalogue against a snapshot.
pub fn build_insights(metrics: &MetricsSnapshot, profile: &InsightProfile) -> Vec<Insight> {
    create_default_engine().build_insights(metrics, profile)
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::analytics::metrics::{compute_progress_metrics, MetricsOptions, MetricsSnapshot};
    use crate::analytics::trends::Confidence;
    use chrono::NaiveDate;

    /// An empty snapshot marked high-confidence, ready for field tweaks.
    pub fn snapshot() -> MetricsSnapshot {
        let as_of = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        let mut snapshot = compute_progress_metrics(&[], &[], &MetricsOptions::new(as_of)).unwrap();
        snapshot.confidence = Confidence::High;
        snapshot
    }
}
