//! Insight output type

use super::trends::Confidence;
use serde::Serialize;

/// How an insight should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Nudge,
    Warn,
    Success,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Nudge => "nudge",
            Severity::Warn => "warn",
            Severity::Success => "success",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Topic an insight belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum InsightCategory {
    Consistency,
    Recovery,
    Data,
    Volume,
    Frequency,
    Balance,
    Conditioning,
    #[serde(rename = "Training Style")]
    TrainingStyle,
    Strength,
    Progress,
    #[serde(rename = "Body Weight")]
    BodyWeight,
}

impl InsightCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightCategory::Consistency => "Consistency",
            InsightCategory::Recovery => "Recovery",
            InsightCategory::Data => "Data",
            InsightCategory::Volume => "Volume",
            InsightCategory::Frequency => "Frequency",
            InsightCategory::Balance => "Balance",
            InsightCategory::Conditioning => "Conditioning",
            InsightCategory::TrainingStyle => "Training Style",
            InsightCategory::Strength => "Strength",
            InsightCategory::Progress => "Progress",
            InsightCategory::BodyWeight => "Body Weight",
        }
    }
}

impl std::fmt::Display for InsightCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One generated coaching message. Regenerated on every evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    /// Stable rule id, e.g. `strength.plateau`
    pub id: String,
    pub severity: Severity,
    pub category: InsightCategory,
    pub title: String,
    pub message: String,
    /// Suggested next step
    pub action: String,
    /// Copied from the metrics snapshot by the engine
    pub confidence: Confidence,
    /// Lower is more important
    pub priority: u8,
}

impl Insight {
    pub fn new(
        id: &str,
        severity: Severity,
        category: InsightCategory,
        priority: u8,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.to_string(),
            severity,
            category,
            title: title.into(),
            message: String::new(),
            action: String::new(),
            confidence: Confidence::Low,
            priority,
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warn
    }
}
