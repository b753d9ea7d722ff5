//! # ironlog-core
//!
//! Core library for ironlog - a training load analytics and insight engine.
//!
//! This library provides:
//! - Domain types for logged sessions, exercises, sets and body weight
//! - The analytics pipeline (normalise, aggregate, trend, insight)
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Data flows through three stages:
//! - **Logged (input):** sessions and body-weight readings owned by the caller
//! - **Derived (metrics):** per-session, weekly and trend metrics, recomputed per query
//! - **Insights (output):** a capped, ordered list of coaching messages
//!
//! ## Example
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use ironlog_core::analytics::{build_insights, compute_progress_metrics, InsightProfile, MetricsOptions};
//! use ironlog_core::history::TrainingHistory;
//!
//! let history = TrainingHistory::load("history.json").expect("failed to load history");
//! let as_of = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
//! let options = MetricsOptions::new(as_of).with_weekly_goal(Some(3));
//!
//! let metrics = compute_progress_metrics(&history.sessions, &history.measurements, &options)
//!     .expect("invalid options");
//! for insight in build_insights(&metrics, &InsightProfile::strict()) {
//!     println!("{}: {}", insight.title, insight.message);
//! }
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use history::TrainingHistory;
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod error;
pub mod format;
pub mod history;
pub mod logging;
pub mod types;
