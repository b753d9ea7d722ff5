//! Training load analytics for ironlog
//!
//! A deterministic pipeline from logged sessions to coaching insights:
//! - Session normalisation (working sets, tonnage, e1RM, body-part load)
//! - Weekly aggregation into a zero-filled trailing series
//! - Trend, streak, balance and confidence derivations
//! - Rule-based insights with profile gating and caps
//!
//! The two entry points are [`compute_progress_metrics`] and
//! [`build_insights`]. Both are pure: nothing is stored between calls.
//!
//! See [`engine`] for the rule framework and [`rules`] for the built-in
//! catalogue.

pub mod engine;
pub mod insight;
pub mod metrics;
pub mod profile;
pub mod rules;
pub mod session;
pub mod trends;
pub mod weekly;

// Engine exports
pub use engine::{apply_caps, InsightEngine, InsightRule, Suppression};
pub use rules::{build_insights, create_default_engine};

// Pipeline exports
pub use insight::{Insight, InsightCategory, Severity};
pub use metrics::{
    compute_progress_metrics, AgeBand, BestSession, DataQuality, MetricsOptions, MetricsSnapshot,
    RollingTotals, WeightMetrics,
};
pub use profile::{InsightProfile, ProfileName, Thresholds};
pub use session::{normalize_session, normalize_sessions, BodyWeightLookup, SessionStats};
pub use trends::{
    BalanceRatios, Confidence, MovingAverage, RepRange, RepRangeMix, StreakStats, StrengthTrend,
    WeightChange,
};
pub use weekly::{aggregate_weeks, WeeklyStats};
