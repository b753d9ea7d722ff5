use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

struct CliTestEnv {
    _temp_dir: TempDir,
    home: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
    history: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(&xdg_config).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");

        let history = home.join("history.json");
        let source = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../ironlog-core/tests/fixtures/history.json");
        fs::copy(source, &history).expect("failed to copy history fixture");

        Self {
            _temp_dir: temp_dir,
            home,
            xdg_config,
            xdg_state,
            history,
        }
    }

    fn history_arg(&self) -> String {
        self.history.to_string_lossy().into_owned()
    }

    fn write_config(&self, toml: &str) {
        let dir = self.xdg_config.join("ironlog");
        fs::create_dir_all(&dir).expect("failed to create config dir");
        fs::write(dir.join("config.toml"), toml).expect("failed to write config");
    }
}

fn run_report(env: &CliTestEnv, args: &[&str]) -> Output {
    let bin_path = PathBuf::from(assert_cmd::cargo::cargo_bin!("ironlog-report"));

    Command::new(bin_path)
        .args(args)
        .env("HOME", &env.home)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("failed to execute ironlog-report: {e}"))
}

fn assert_success(args: &[&str], output: &Output) {
    if output.status.success() {
        return;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    panic!(
        "ironlog-report {} failed\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
        args.join(" "),
        output.status,
        stdout,
        stderr
    );
}

#[test]
fn terminal_report_shows_summary_and_insights() {
    let env = CliTestEnv::new();
    let history = env.history_arg();
    let args = [
        "--history",
        history.as_str(),
        "--as-of",
        "2025-03-02",
        "--weekly-goal",
        "3",
    ];

    let output = run_report(&env, &args);
    assert_success(&args, &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("IRONLOG REPORT - week of 2025-02-24"));
    assert!(stdout.contains("confidence: high"), "got:\n{stdout}");
    assert!(stdout.contains("Sessions logged:    24"));
    assert!(stdout.contains("Back Squat"));
    assert!(stdout.contains("─── Insights ───"));
    assert!(!stdout.contains("Not enough data yet"));

    assert!(
        env.xdg_state.join("ironlog").exists(),
        "log directory should be created under XDG_STATE_HOME"
    );
}

#[test]
fn markdown_export_uses_kg_from_config() {
    let env = CliTestEnv::new();
    env.write_config("[athlete]\nweight_unit = \"kg\"\n");
    let history = env.history_arg();
    let args = [
        "--history",
        history.as_str(),
        "--as-of",
        "2025-03-02",
        "--export",
        "md",
    ];

    let output = run_report(&env, &args);
    assert_success(&args, &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("# Training Report: week of 2025-02-24"));
    assert!(stdout.contains("## Summary"));
    assert!(stdout.contains("## Insights"));
    assert!(stdout.contains(" kg |"), "got:\n{stdout}");
    assert!(stdout.contains("*Generated by ironlog-report*"));
}

#[test]
fn json_export_is_parseable_and_capped_by_profile() {
    let env = CliTestEnv::new();
    let history = env.history_arg();
    let args = [
        "--history",
        history.as_str(),
        "--as-of",
        "2025-03-02",
        "--weekly-goal",
        "3",
        "--profile",
        "strict",
        "--export",
        "json",
    ];

    let output = run_report(&env, &args);
    assert_success(&args, &output);

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert_eq!(json["profile"], "strict");
    assert_eq!(json["unit"], "lb");
    assert_eq!(json["metrics"]["total_sessions"], 24);
    assert_eq!(json["metrics"]["confidence"], "high");
    assert_eq!(json["metrics"]["weeks"].as_array().map(Vec::len), Some(12));

    let insights = json["insights"].as_array().expect("insights array");
    assert!(!insights.is_empty());
    assert!(insights.len() <= 4);
    let warnings = insights
        .iter()
        .filter(|i| i["severity"] == "warn")
        .count();
    assert!(warnings <= 1);
}

#[test]
fn empty_history_reports_not_enough_data() {
    let env = CliTestEnv::new();
    let empty = env.home.join("empty.json");
    fs::write(&empty, "{}").expect("failed to write empty history");
    let history = empty.to_string_lossy().into_owned();
    let args = ["--history", history.as_str(), "--as-of", "2025-03-02"];

    let output = run_report(&env, &args);
    assert_success(&args, &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Sessions logged:    0"));
    assert!(stdout.contains("Not enough data yet"));
}

#[test]
fn invalid_arguments_fail_with_context() {
    let env = CliTestEnv::new();
    let history = env.history_arg();

    let unknown_profile = run_report(
        &env,
        &["--history", history.as_str(), "--profile", "lenient"],
    );
    assert!(!unknown_profile.status.success());
    let stderr = String::from_utf8_lossy(&unknown_profile.stderr);
    assert!(stderr.contains("failed to resolve insight profile"), "got:\n{stderr}");

    let bad_export = run_report(&env, &["--history", history.as_str(), "--export", "csv"]);
    assert!(!bad_export.status.success());
    let stderr = String::from_utf8_lossy(&bad_export.stderr);
    assert!(stderr.contains("Unknown export format: csv"));

    let bad_date = run_report(&env, &["--history", history.as_str(), "--as-of", "03/02/2025"]);
    assert!(!bad_date.status.success());

    let missing = run_report(&env, &["--history", "/nonexistent/ironlog/history.json"]);
    assert!(!missing.status.success());
    let stderr = String::from_utf8_lossy(&missing.stderr);
    assert!(stderr.contains("failed to load training history"));

    let zero_weeks = run_report(&env, &["--history", history.as_str(), "--weeks-back", "0"]);
    assert!(!zero_weeks.status.success());

    let huge_weeks = run_report(
        &env,
        &["--history", history.as_str(), "--weeks-back", "9000000000000000000"],
    );
    assert!(!huge_weeks.status.success());
    let stderr = String::from_utf8_lossy(&huge_weeks.stderr);
    assert!(stderr.contains("failed to compute progress metrics"), "got:\n{stderr}");
    assert!(!stderr.contains("panicked"));
}

#[test]
fn report_date_defaults_to_last_logged_day() {
    let env = CliTestEnv::new();
    let history = env.history_arg();
    let args = ["--history", history.as_str(), "--export", "json"];

    let output = run_report(&env, &args);
    assert_success(&args, &output);

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert_eq!(json["metrics"]["as_of"], "2025-02-28");
    assert_eq!(json["metrics"]["total_sessions"], 24);
}
