//! Core domain types for ironlog
//!
//! These types are the logged history handed to the engine by its caller.
//! They are read-only here: the engine derives everything else from them on
//! every query and never stores anything back.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Session** | Everything logged on one calendar day |
//! | **Exercise** | One movement inside a session, tagged with body parts |
//! | **Set** | One logged set: reps and an optional external weight |
//! | **Measurement** | A body-weight reading on a calendar day |
//! | **Body part** | A normalised tag such as `chest` or `hamstrings` |
//!
//! Weights are in a single fixed unit chosen by the caller; the engine never
//! converts them. See [`crate::format::WeightUnit`] for display.

use chrono::NaiveDate;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

// ============================================
// Body part tags
// ============================================

/// Tag meaning "the whole body"; its load is split across [`FULL_BODY_SPLIT`].
pub const FULL_BODY: &str = "full body";

/// Capability tag marking a bodyweight exercise. Never receives load.
pub const BODYWEIGHT_TAG: &str = "bodyweight";

/// Bucket receiving sets and tonnage of exercises logged without any tag.
pub const UNTAGGED: &str = "untagged";

/// Canonical tags sharing a full-body exercise evenly.
pub const FULL_BODY_SPLIT: [&str; 5] = ["chest", "back", "legs", "shoulders", "core"];

/// Aliases folded into canonical tags during normalisation.
const BODY_PART_ALIASES: &[(&str, &str)] = &[
    ("quads", "quadriceps"),
    ("quad", "quadriceps"),
    ("hamstring", "hamstrings"),
    ("hams", "hamstrings"),
    ("fullbody", FULL_BODY),
    ("abs", "core"),
    ("lats", "back"),
    ("delts", "shoulders"),
];

/// Normalise a caller-supplied body-part tag.
///
/// Trims, lower-cases, maps `_` and `-` to spaces, collapses repeated
/// whitespace and applies the alias table. Returns `None` for blank tags.
pub fn normalize_body_part(tag: &str) -> Option<String> {
    let lowered = tag.trim().to_lowercase().replace(['_', '-'], " ");
    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }

    let canonical = BODY_PART_ALIASES
        .iter()
        .find(|(alias, _)| *alias == collapsed)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(collapsed);
    Some(canonical)
}

// ============================================
// Exercise classification
// ============================================

/// Load capability of an exercise, supplied by the exercise catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    /// External load expected on every set
    Loaded,
    /// Body weight is the load when no external weight is logged
    Bodyweight,
}

/// Name fragments identifying bodyweight movements in legacy entries.
const BODYWEIGHT_NAME_HINTS: &[&str] = &[
    "push-up",
    "pushup",
    "push up",
    "pull-up",
    "pullup",
    "pull up",
    "chin-up",
    "chinup",
    "chin up",
    "dip",
    "plank",
    "sit-up",
    "situp",
    "sit up",
    "crunch",
    "burpee",
    "air squat",
    "pistol",
    "muscle-up",
    "muscle up",
    "mountain climber",
    "bodyweight",
];

// ============================================
// Logged history
// ============================================

/// One logged set. Both fields may be missing or nonsensical; the
/// normaliser treats negative and non-finite values as unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetEntry {
    /// Repetitions performed
    #[serde(default, deserialize_with = "lenient_reps")]
    pub reps: Option<i64>,
    /// External load in the caller's unit
    #[serde(default, deserialize_with = "lenient_weight")]
    pub weight: Option<f64>,
}

/// Any JSON value an export might put in a numeric set field.
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Int(i64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

impl LooseNumber {
    fn as_reps(&self) -> Option<i64> {
        match self {
            LooseNumber::Int(n) => Some(*n),
            LooseNumber::Float(f) => f.is_finite().then(|| f.trunc() as i64),
            LooseNumber::Text(s) => {
                let s = s.trim();
                s.parse::<i64>().ok().or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite())
                        .map(|f| f.trunc() as i64)
                })
            }
            LooseNumber::Other(_) => None,
        }
    }

    fn as_weight(&self) -> Option<f64> {
        match self {
            LooseNumber::Int(n) => Some(*n as f64),
            LooseNumber::Float(f) => Some(*f),
            LooseNumber::Text(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            LooseNumber::Other(_) => None,
        }
    }

    fn describe(&self) -> String {
        match self {
            LooseNumber::Int(n) => n.to_string(),
            LooseNumber::Float(f) => f.to_string(),
            LooseNumber::Text(s) => format!("{:?}", s),
            LooseNumber::Other(_) => "non-numeric value".to_string(),
        }
    }
}

fn lenient_reps<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<LooseNumber>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let reps = raw.as_reps();
    if !matches!(raw, LooseNumber::Int(_)) {
        tracing::warn!(raw = %raw.describe(), coerced = ?reps, "Coercing non-integer reps");
    }
    Ok(reps)
}

fn lenient_weight<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<LooseNumber>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let weight = raw.as_weight();
    if matches!(raw, LooseNumber::Text(_) | LooseNumber::Other(_)) {
        tracing::warn!(raw = %raw.describe(), coerced = ?weight, "Coercing non-numeric weight");
    }
    Ok(weight)
}

impl SetEntry {
    pub fn new(reps: i64, weight: f64) -> Self {
        Self {
            reps: Some(reps),
            weight: Some(weight),
        }
    }

    /// Reps with unset and negative values collapsed to zero.
    pub fn clean_reps(&self) -> u32 {
        self.reps
            .filter(|r| *r > 0)
            .map(|r| u32::try_from(r).unwrap_or(u32::MAX))
            .unwrap_or(0)
    }

    /// Weight with unset, negative and non-finite values collapsed to zero.
    pub fn clean_weight(&self) -> f64 {
        self.weight
            .filter(|w| w.is_finite() && *w > 0.0)
            .unwrap_or(0.0)
    }

    /// Whether either field needed coercion.
    pub fn is_malformed(&self) -> bool {
        self.reps.is_some_and(|r| r < 0)
            || self.weight.is_some_and(|w| !w.is_finite() || w < 0.0)
    }
}

/// One exercise inside a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEntry {
    /// Display name as logged
    pub name: String,
    /// Body-part tags; the first is primary, the rest secondary
    #[serde(default, alias = "bodyParts")]
    pub body_parts: Vec<String>,
    /// Capability flag from the exercise catalogue
    #[serde(default)]
    pub kind: Option<ExerciseKind>,
    /// Sets in logged order
    #[serde(default)]
    pub sets: Vec<SetEntry>,
}

impl ExerciseEntry {
    pub fn new(name: impl Into<String>, body_parts: &[&str], sets: Vec<SetEntry>) -> Self {
        Self {
            name: name.into(),
            body_parts: body_parts.iter().map(|s| s.to_string()).collect(),
            kind: None,
            sets,
        }
    }

    /// Builder-style setter for the catalogue capability flag.
    pub fn with_kind(mut self, kind: ExerciseKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Normalised body-part tags with the bodyweight marker removed.
    ///
    /// Order is preserved and duplicates are dropped, so the first entry is
    /// still the primary tag.
    pub fn normalized_body_parts(&self) -> Vec<String> {
        let mut parts: Vec<String> = Vec::with_capacity(self.body_parts.len());
        for tag in &self.body_parts {
            if let Some(part) = normalize_body_part(tag) {
                if part != BODYWEIGHT_TAG && !parts.contains(&part) {
                    parts.push(part);
                }
            }
        }
        parts
    }

    /// Resolve the load capability of this exercise.
    ///
    /// The explicit catalogue flag wins. Untagged legacy entries fall back
    /// to a `bodyweight` tag, then to matching the name against known
    /// bodyweight movements.
    pub fn resolved_kind(&self) -> ExerciseKind {
        if let Some(kind) = self.kind {
            return kind;
        }
        let tagged = self
            .body_parts
            .iter()
            .filter_map(|t| normalize_body_part(t))
            .any(|t| t == BODYWEIGHT_TAG);
        if tagged || Self::name_suggests_bodyweight(&self.name) {
            ExerciseKind::Bodyweight
        } else {
            ExerciseKind::Loaded
        }
    }

    pub fn is_bodyweight(&self) -> bool {
        self.resolved_kind() == ExerciseKind::Bodyweight
    }

    fn name_suggests_bodyweight(name: &str) -> bool {
        let lowered = name.to_lowercase();
        BODYWEIGHT_NAME_HINTS
            .iter()
            .any(|hint| lowered.contains(hint))
    }
}

/// Everything logged on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub date: NaiveDate,
    #[serde(default)]
    pub exercises: Vec<ExerciseEntry>,
}

impl WorkoutSession {
    pub fn new(date: NaiveDate, exercises: Vec<ExerciseEntry>) -> Self {
        Self { date, exercises }
    }
}

/// A body-weight reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyWeightMeasurement {
    pub date: NaiveDate,
    #[serde(alias = "weightValue")]
    pub weight: f64,
}

impl BodyWeightMeasurement {
    pub fn new(date: NaiveDate, weight: f64) -> Self {
        Self { date, weight }
    }
}
