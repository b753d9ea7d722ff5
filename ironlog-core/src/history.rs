//! Training history loading
//!
//! The engine itself takes plain slices. This module is the simplest
//! repository in front of it: a JSON export holding every session and
//! body-weight reading, read fully into memory.
//!
//! ```json
//! {
//!   "sessions": [
//!     {"date": "2025-03-04", "exercises": [
//!       {"name": "Bench Press", "bodyParts": ["chest", "triceps"], "sets": [{"reps": 8, "weight": 185}]}
//!     ]}
//!   ],
//!   "measurements": [{"date": "2025-03-01", "weight": 182.4}]
//! }
//! ```

use crate::error::Result;
use crate::types::{BodyWeightMeasurement, WorkoutSession};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Every logged session and body-weight reading for one athlete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    #[serde(default)]
    pub sessions: Vec<WorkoutSession>,
    #[serde(default, alias = "bodyWeights", alias = "body_weights")]
    pub measurements: Vec<BodyWeightMeasurement>,
}

impl TrainingHistory {
    pub fn new(sessions: Vec<WorkoutSession>, measurements: Vec<BodyWeightMeasurement>) -> Self {
        Self {
            sessions,
            measurements,
        }
    }

    /// Load a JSON export from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let history = Self::from_json(&content)?;
        tracing::info!(
            path = %path.display(),
            sessions = history.sessions.len(),
            measurements = history.measurements.len(),
            "Loaded training history"
        );
        Ok(history)
    }

    /// Parse a JSON export.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty() && self.measurements.is_empty()
    }

    /// Most recent date with a session or a reading.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        let session = self.sessions.iter().map(|s| s.date).max();
        let reading = self.measurements.iter().map(|m| m.date).max();
        session.max(reading)
    }
}
