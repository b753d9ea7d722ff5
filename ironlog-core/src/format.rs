//! Formatting helpers shared by insight messages and reports.

use serde::{Deserialize, Serialize};

/// Display unit for weights. The engine itself is unit-agnostic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Lb,
    Kg,
}

impl WeightUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightUnit::Lb => "lb",
            WeightUnit::Kg => "kg",
        }
    }
}

impl std::str::FromStr for WeightUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lb" | "lbs" => Ok(WeightUnit::Lb),
            "kg" | "kgs" => Ok(WeightUnit::Kg),
            other => Err(format!("unknown weight unit: {}", other)),
        }
    }
}

/// Format a ratio as a signed whole percentage (e.g., "+12%").
pub fn format_percent(ratio: f64) -> String {
    let pct = (ratio * 100.0).round();
    if pct > 0.0 {
        format!("+{:.0}%", pct)
    } else if pct < 0.0 {
        format!("{:.0}%", pct)
    } else {
        "0%".to_string()
    }
}

/// Format an optional ratio, or a dash if undefined.
pub fn format_percent_opt(ratio: Option<f64>) -> String {
    ratio.map(format_percent).unwrap_or_else(|| "-".to_string())
}

/// Format a weight with one decimal and its unit (e.g., "182.5 lb").
pub fn format_weight(value: f64, unit: WeightUnit) -> String {
    format!("{:.1} {}", value, unit.as_str())
}

/// Format a signed weight delta (e.g., "-1.5 kg").
pub fn format_weight_delta(delta: f64, unit: WeightUnit) -> String {
    if delta > 0.0 {
        format!("+{:.1} {}", delta, unit.as_str())
    } else {
        format!("{:.1} {}", delta, unit.as_str())
    }
}

/// Format tonnage compactly (e.g., "12.4k").
pub fn format_tonnage(tonnage: f64) -> String {
    if tonnage >= 1_000_000.0 {
        format!("{:.1}M", tonnage / 1_000_000.0)
    } else if tonnage >= 1_000.0 {
        format!("{:.1}k", tonnage / 1_000.0)
    } else {
        format!("{:.0}", tonnage)
    }
}

/// Format a ratio such as push:pull (e.g., "3.00").
pub fn format_ratio(ratio: f64) -> String {
    format!("{:.2}", ratio)
}
