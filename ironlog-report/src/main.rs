//! ironlog-report - training load report and coaching insights
//!
//! Reads a JSON training history, computes progress metrics as of a given
//! day and prints them with the coaching insights for a profile.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use ironlog_core::analytics::{
    build_insights, compute_progress_metrics, Insight, InsightProfile, MetricsSnapshot,
};
use ironlog_core::format::{
    format_percent, format_percent_opt, format_ratio, format_tonnage, format_weight,
    format_weight_delta, WeightUnit,
};
use ironlog_core::{Config, TrainingHistory};

#[derive(Parser, Debug)]
#[command(name = "ironlog-report")]
#[command(about = "Training load report and coaching insights")]
#[command(version)]
struct Args {
    /// Path to the JSON training history export
    #[arg(long)]
    history: String,

    /// Insight profile (strict or aggressive); overrides the config file
    #[arg(long)]
    profile: Option<String>,

    /// Target workouts per week; overrides the config file
    #[arg(long)]
    weekly_goal: Option<u32>,

    /// Report date (format: YYYY-MM-DD, default: last logged day)
    #[arg(long)]
    as_of: Option<String>,

    /// Weeks in the trailing weekly series
    #[arg(long)]
    weeks_back: Option<usize>,

    /// Display unit for weights (lb or kg)
    #[arg(long)]
    unit: Option<String>,

    /// Export format (md = markdown, json = JSON)
    #[arg(long)]
    export: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = ironlog_core::logging::init(&config.logging).ok();

    let history = TrainingHistory::load(&args.history)
        .with_context(|| format!("failed to load training history from {}", args.history))?;

    let as_of = match &args.as_of {
        Some(date) => NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}'. Use YYYY-MM-DD", date))?,
        None => history
            .latest_date()
            .unwrap_or_else(|| Local::now().date_naive()),
    };

    let profile = match &args.profile {
        Some(name) => InsightProfile::by_name(name)
            .context("failed to resolve insight profile")?
            .with_caps(config.insights.max_insights, config.insights.max_warnings),
        None => config.insight_profile(),
    };

    let unit = match &args.unit {
        Some(unit) => unit.parse::<WeightUnit>().map_err(anyhow::Error::msg)?,
        None => config.athlete.weight_unit,
    };

    let mut options = config.metrics_options(as_of);
    if args.weekly_goal.is_some() {
        options = options.with_weekly_goal(args.weekly_goal);
    }
    if let Some(weeks_back) = args.weeks_back {
        options = options.with_weeks_back(weeks_back);
    }

    let metrics = compute_progress_metrics(&history.sessions, &history.measurements, &options)
        .context("failed to compute progress metrics")?;
    let insights = build_insights(&metrics, &profile);

    tracing::info!(
        as_of = %as_of,
        profile = %profile.name,
        insights = insights.len(),
        "Report generated"
    );

    let report = Report {
        metrics: &metrics,
        insights: &insights,
        profile: &profile,
        unit,
    };

    match args.export.as_deref() {
        Some("json") => report.print_json()?,
        Some("md") => report.print_markdown(),
        Some(other) => {
            anyhow::bail!("Unknown export format: {}. Use 'md' or 'json'", other);
        }
        None => report.print_terminal(),
    }

    Ok(())
}

struct Report<'a> {
    metrics: &'a MetricsSnapshot,
    insights: &'a [Insight],
    profile: &'a InsightProfile,
    unit: WeightUnit,
}

impl Report<'_> {
    fn print_terminal(&self) {
        let m = self.metrics;

        println!();
        println!("  IRONLOG REPORT - week of {}", week_label(m));
        println!("  profile: {}   confidence: {}", self.profile.name, m.confidence);
        println!();

        println!("  ─── Consistency ───");
        println!("  Sessions logged:    {}", m.total_sessions);
        println!("  Workouts per week:  {:.1}", m.workouts_per_week);
        if let Some(goal) = m.weekly_goal {
            println!(
                "  Weekly goal:        {} ({:.0}% adherence)",
                goal,
                m.adherence * 100.0
            );
        }
        println!(
            "  Streak:             {} days (best {})",
            m.streak.current_streak, m.streak.max_streak
        );
        if let Some(days) = m.streak.days_since_last {
            println!("  Days since last:    {}", days);
        }
        println!();

        println!("  ─── Volume ───");
        println!(
            "  Sets / week:        {:.1} ({} vs baseline)",
            m.sets.recent,
            format_percent_opt(m.sets.trend)
        );
        println!(
            "  Tonnage / week:     {} ({} vs baseline)",
            format_tonnage(m.tonnage.recent),
            format_percent_opt(m.tonnage.trend)
        );
        println!(
            "  Last 7 days:        {} sets (prev 7d: {})",
            m.rolling.last_7_sets, m.rolling.prev_7_sets
        );
        if let Some(best) = &m.best_session {
            println!(
                "  Best day:           {} - {}",
                best.date,
                format_tonnage(best.tonnage)
            );
        }
        println!();

        if let Some(strength) = &m.strength {
            println!("  ─── Strength ───");
            println!(
                "  {}: {} ({} sets logged)",
                strength.exercise,
                format_percent_opt(strength.change),
                strength.total_sets
            );
            println!();
        }

        if let Some(latest) = m.weight.latest {
            println!("  ─── Body Weight ───");
            println!("  Latest:             {}", format_weight(latest, self.unit));
            if let Some(change) = &m.weight.change_window {
                println!(
                    "  {} days:            {} ({})",
                    m.weight.window_days,
                    format_weight_delta(change.delta, self.unit),
                    format_percent(change.pct)
                );
            }
            println!();
        }

        let balance = &m.balance;
        if balance.push_pull.is_some() || balance.upper_lower.is_some() {
            println!("  ─── Balance ───");
            if let Some(ratio) = balance.push_pull {
                println!("  Push:pull           {}", format_ratio(ratio));
            }
            if let Some(ratio) = balance.quad_ham {
                println!("  Quad:ham            {}", format_ratio(ratio));
            }
            if let Some(ratio) = balance.upper_lower {
                println!("  Upper:lower         {}", format_ratio(ratio));
            }
            println!();
        }

        println!("  ─── Insights ───");
        if self.insights.is_empty() {
            println!("  Not enough data yet. Keep logging!");
        }
        for insight in self.insights {
            println!(
                "  [{}] {} ({})",
                insight.severity.as_str().to_uppercase(),
                insight.title,
                insight.category
            );
            println!("      {}", insight.message);
            if !insight.action.is_empty() {
                println!("      -> {}", insight.action);
            }
        }
        println!();
    }

    fn print_markdown(&self) {
        let m = self.metrics;

        println!("# Training Report: week of {}", week_label(m));
        println!();
        println!(
            "*Profile: {} | Confidence: {} | As of: {}*",
            self.profile.name, m.confidence, m.as_of
        );
        println!();

        println!("## Summary");
        println!();
        println!("| Metric | Recent | Trend |");
        println!("|--------|--------|-------|");
        println!("| Workouts / week | {:.1} | - |", m.workouts_per_week);
        println!(
            "| Sets / week | {:.1} | {} |",
            m.sets.recent,
            format_percent_opt(m.sets.trend)
        );
        println!(
            "| Tonnage / week | {} | {} |",
            format_tonnage(m.tonnage.recent),
            format_percent_opt(m.tonnage.trend)
        );
        if let Some(strength) = &m.strength {
            println!(
                "| {} e1RM | {} | {} |",
                strength.exercise,
                strength
                    .recent_best
                    .map(|w| format_weight(w, self.unit))
                    .unwrap_or_else(|| "-".to_string()),
                format_percent_opt(strength.change)
            );
        }
        if let Some(latest) = m.weight.latest {
            println!(
                "| Body weight | {} | {} |",
                format_weight(latest, self.unit),
                format_percent_opt(m.weight.change_window.map(|c| c.pct))
            );
        }
        println!();

        let parts: Vec<_> = m
            .body_parts
            .iter()
            .filter(|(_, avg)| avg.recent > 0.0 || avg.baseline > 0.0)
            .collect();
        if !parts.is_empty() {
            println!("## Body Parts");
            println!();
            println!("| Body part | Sets / week | Trend | Days / week |");
            println!("|-----------|-------------|-------|-------------|");
            for (part, avg) in parts {
                let frequency = m.body_part_frequency.get(part).copied().unwrap_or(0.0);
                println!(
                    "| {} | {:.1} | {} | {:.1} |",
                    part,
                    avg.recent,
                    format_percent_opt(avg.trend),
                    frequency
                );
            }
            println!();
        }

        println!("## Insights");
        println!();
        if self.insights.is_empty() {
            println!("Not enough data yet. Keep logging!");
            println!();
        }
        for (i, insight) in self.insights.iter().enumerate() {
            println!(
                "{}. **{}** *({}, {})*",
                i + 1,
                insight.title,
                insight.severity,
                insight.category
            );
            println!("   {}", insight.message);
            if !insight.action.is_empty() {
                println!("   *Next:* {}", insight.action);
            }
        }
        println!();

        println!("---");
        println!("*Generated by ironlog-report*");
    }

    fn print_json(&self) -> Result<()> {
        let json = serde_json::json!({
            "profile": self.profile.name.as_str(),
            "unit": self.unit.as_str(),
            "metrics": self.metrics,
            "insights": self.insights,
        });

        println!("{}", serde_json::to_string_pretty(&json)?);
        Ok(())
    }
}

fn week_label(metrics: &MetricsSnapshot) -> String {
    metrics
        .weeks
        .last()
        .map(|w| w.week_start.to_string())
        .unwrap_or_else(|| metrics.as_of.to_string())
}
