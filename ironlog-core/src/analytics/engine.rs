//! Insight rule engine
//!
//! Rules are independent objects registered with an [`InsightEngine`]. Each
//! one looks at the [`MetricsSnapshot`] and the selected [`InsightProfile`]
//! and either proposes a single [`Insight`] or stays quiet.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      INSIGHT ENGINE                          │
//! │                                                              │
//! │  ┌────────────┐  ┌────────────┐  ┌────────────┐              │
//! │  │ Rule A     │  │ Rule B     │  │ Rule C     │  ...         │
//! │  │ (rest_day) │  │ (plateau)  │  │ (push_pull)│              │
//! │  └─────┬──────┘  └─────┬──────┘  └─────┬──────┘              │
//! │        ▼               ▼               ▼                     │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │            InsightEngine.build_insights()              │  │
//! │  │  - Stamps snapshot confidence on each candidate        │  │
//! │  │  - Drops candidates gated by low confidence            │  │
//! │  │  - Stable sort by priority (registration order ties)   │  │
//! │  │  - Applies max_warnings / max_insights caps            │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ironlog_core::analytics::{create_default_engine, InsightProfile};
//!
//! let engine = create_default_engine();
//! let insights = engine.build_insights(&snapshot, &InsightProfile::strict());
//! for insight in insights {
//!     println!("[{}] {}", insight.severity, insight.title);
//! }
//! ```

use super::insight::Insight;
use super::metrics::MetricsSnapshot;
use super::profile::InsightProfile;
use super::trends::Confidence;

// ============================================
// Rule trait
// ============================================

/// A single insight rule.
///
/// Rules must be pure: the same snapshot and profile always produce the
/// same answer. Missing data means "do not fire", never an error.
///
/// ## Example
///
/// ```rust,ignore
/// use ironlog_core::analytics::{Insight, InsightCategory, InsightRule, Severity};
///
/// pub struct NoSessions;
///
/// impl InsightRule for NoSessions {
///     fn id(&self) -> &str { "custom.no_sessions" }
///
///     fn evaluate(&self, metrics: &MetricsSnapshot, _: &InsightProfile) -> Option<Insight> {
///         (metrics.total_sessions == 0).then(|| {
///             Insight::new(
///                 self.id(),
///                 Severity::Info,
///                 InsightCategory::Consistency,
///                 5,
///                 "Log a session",
///             )
///         })
///     }
/// }
/// ```
pub trait InsightRule: Send + Sync {
    /// Unique id for this rule.
    ///
    /// Convention: `category.rule_name` (e.g., "strength.plateau").
    fn id(&self) -> &str;

    /// Propose an insight, or `None` if the condition does not hold.
    fn evaluate(&self, metrics: &MetricsSnapshot, profile: &InsightProfile) -> Option<Insight>;
}

// ============================================
// Engine
// ============================================

/// Why a candidate insight was dropped before capping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suppression {
    /// A warning on low-confidence data under a profile that disallows it
    LowConfidenceWarning,
    /// Any insight on low-confidence data under a silent profile
    SilentProfile,
}

impl Suppression {
    pub fn as_str(&self) -> &'static str {
        match self {
            Suppression::LowConfidenceWarning => "low_confidence_warning",
            Suppression::SilentProfile => "silent_profile",
        }
    }
}

/// Confidence gate applied to each candidate before sorting.
pub fn gate(
    insight: &Insight,
    confidence: Confidence,
    profile: &InsightProfile,
) -> Option<Suppression> {
    if confidence != Confidence::Low {
        return None;
    }
    if insight.is_warning() && !profile.low_confidence_allowed {
        return Some(Suppression::LowConfidenceWarning);
    }
    if profile.silent_when_low_confidence {
        return Some(Suppression::SilentProfile);
    }
    None
}

/// Keep at most `max_insights` entries and at most `max_warnings` warnings.
///
/// Over-quota warnings are skipped, so later non-warning insights can still
/// fill the remaining slots.
pub fn apply_caps(sorted: Vec<Insight>, max_insights: usize, max_warnings: usize) -> Vec<Insight> {
    let mut kept = Vec::with_capacity(max_insights.min(sorted.len()));
    let mut warnings = 0usize;
    for insight in sorted {
        if kept.len() >= max_insights {
            break;
        }
        if insight.is_warning() {
            if warnings >= max_warnings {
                tracing::debug!(rule = %insight.id, "Warning over quota, skipped");
                continue;
            }
            warnings += 1;
        }
        kept.push(insight);
    }
    kept
}

/// Registry of insight rules, evaluated in registration order.
pub struct InsightEngine {
    rules: Vec<Box<dyn InsightRule>>,
}

impl InsightEngine {
    /// Create an engine without rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Register a rule. Registration order breaks priority ties.
    pub fn register(&mut self, rule: Box<dyn InsightRule>) {
        tracing::trace!(rule = rule.id(), "Registered insight rule");
        self.rules.push(rule);
    }

    /// Ids of registered rules, in registration order.
    pub fn rule_ids(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    /// Check if a rule is registered.
    pub fn has_rule(&self, id: &str) -> bool {
        self.rules.iter().any(|r| r.id() == id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Every insight whose condition holds, before gating and capping.
    ///
    /// Candidates carry the snapshot's confidence and keep registration order.
    pub fn candidates(&self, metrics: &MetricsSnapshot, profile: &InsightProfile) -> Vec<Insight> {
        self.rules
            .iter()
            .filter_map(|rule| {
                let mut insight = rule.evaluate(metrics, profile)?;
                insight.confidence = metrics.confidence;
                tracing::debug!(
                    rule = rule.id(),
                    severity = %insight.severity,
                    priority = insight.priority,
                    "Rule fired"
                );
                Some(insight)
            })
            .collect()
    }

    /// Gate, order and cap the candidates for a profile.
    pub fn build_insights(
        &self,
        metrics: &MetricsSnapshot,
        profile: &InsightProfile,
    ) -> Vec<Insight> {
        let candidates = self.candidates(metrics, profile);
        let fired = candidates.len();

        let mut surviving: Vec<Insight> = candidates
            .into_iter()
            .filter(|insight| match gate(insight, metrics.confidence, profile) {
                Some(reason) => {
                    tracing::debug!(
                        rule = %insight.id,
                        reason = reason.as_str(),
                        "Insight suppressed"
                    );
                    false
                }
                None => true,
            })
            .collect();

        // Stable: equal priorities keep registration order
        surviving.sort_by_key(|insight| insight.priority);
        let gated = surviving.len();
        let insights = apply_caps(surviving, profile.max_insights, profile.max_warnings);

        tracing::info!(
            profile = %profile.name,
            confidence = %metrics.confidence,
            fired,
            gated,
            returned = insights.len(),
            "Built insights"
        );

        insights
    }
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}
